mod lesson;
mod textbook;
mod vocabulary;

pub use lesson::{DialogueTurn, Lesson, LessonContent, NewLesson};
pub use textbook::{NewTextbook, Textbook};
pub use vocabulary::{
    category_options, CategoryOption, NewVocabularyItem, PartOfSpeech, VocabularyItem,
    ALL_CATEGORIES,
};
