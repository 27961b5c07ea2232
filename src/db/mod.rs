mod schema;
mod seed;
mod store;

pub use schema::DB_FILE_NAME;
pub use seed::{SeedData, SeedOutcome, SeedReport};
pub use store::{DataStore, StoreCounts};
