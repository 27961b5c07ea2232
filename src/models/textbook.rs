use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Textbook {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    /// CEFR-style level label such as "A1".
    pub level: Option<String>,
    pub order_index: i64,
}

#[derive(Debug, Clone, Default)]
pub struct NewTextbook {
    pub title: String,
    pub description: Option<String>,
    pub level: Option<String>,
    pub order_index: i64,
}
