use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Category value meaning "no part-of-speech filter".
pub const ALL_CATEGORIES: &str = "all";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VocabularyItem {
    pub id: i64,
    pub arabic: String,
    pub transcription: Option<String>,
    pub translation_ru: String,
    pub translation_lang: String,
    /// Free-form; usually one of the [`PartOfSpeech`] values.
    pub part_of_speech: Option<String>,
    pub notes: Option<String>,
    pub audio_url: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewVocabularyItem {
    pub arabic: String,
    pub transcription: Option<String>,
    pub translation_ru: String,
    pub translation_lang: String,
    pub part_of_speech: Option<String>,
    pub notes: Option<String>,
    pub audio_url: Option<String>,
}

impl Default for NewVocabularyItem {
    fn default() -> Self {
        Self {
            arabic: String::new(),
            transcription: None,
            translation_ru: String::new(),
            translation_lang: "ru".to_string(),
            part_of_speech: None,
            notes: None,
            audio_url: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PartOfSpeech {
    Noun,
    Verb,
    Adj,
    Adv,
    Phrase,
}

impl PartOfSpeech {
    pub const ALL: [PartOfSpeech; 5] = [
        PartOfSpeech::Noun,
        PartOfSpeech::Verb,
        PartOfSpeech::Adj,
        PartOfSpeech::Adv,
        PartOfSpeech::Phrase,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            PartOfSpeech::Noun => "noun",
            PartOfSpeech::Verb => "verb",
            PartOfSpeech::Adj => "adj",
            PartOfSpeech::Adv => "adv",
            PartOfSpeech::Phrase => "phrase",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PartOfSpeech::Noun => "Существительное",
            PartOfSpeech::Verb => "Глагол",
            PartOfSpeech::Adj => "Прилагательное",
            PartOfSpeech::Adv => "Наречие",
            PartOfSpeech::Phrase => "Фраза",
        }
    }
}

impl fmt::Display for PartOfSpeech {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PartOfSpeech {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PartOfSpeech::ALL
            .into_iter()
            .find(|pos| pos.as_str() == s)
            .ok_or_else(|| format!("unknown part of speech: {s}"))
    }
}

impl VocabularyItem {
    pub fn part_of_speech_kind(&self) -> Option<PartOfSpeech> {
        self.part_of_speech.as_deref().and_then(|s| s.parse().ok())
    }

    /// Case-insensitive substring match over the Arabic form,
    /// transcription and translation. A blank query matches everything.
    pub fn matches_query(&self, query: &str) -> bool {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return true;
        }

        [
            Some(self.arabic.as_str()),
            self.transcription.as_deref(),
            Some(self.translation_ru.as_str()),
        ]
        .into_iter()
        .flatten()
        .any(|field| field.to_lowercase().contains(&query))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryOption {
    pub value: String,
    pub label: String,
}

/// Filter choices for a word list: "all" first, then each part of speech
/// present in `words`, in first-seen order.
pub fn category_options(words: &[VocabularyItem]) -> Vec<CategoryOption> {
    let mut options = vec![CategoryOption {
        value: ALL_CATEGORIES.to_string(),
        label: "Все".to_string(),
    }];

    for value in words.iter().filter_map(|w| w.part_of_speech.as_deref()) {
        if value.is_empty() || options.iter().any(|o| o.value == value) {
            continue;
        }
        let label = value
            .parse::<PartOfSpeech>()
            .map(|pos| pos.label().to_string())
            .unwrap_or_else(|_| value.to_string());
        options.push(CategoryOption {
            value: value.to_string(),
            label,
        });
    }

    options
}
