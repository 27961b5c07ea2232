use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// One utterance of a lesson dialogue. Any JSON object decodes into a
/// turn: nulls and mistyped fields fall back to empty values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DialogueTurn {
    /// Position within the dialogue, not unique across lessons.
    #[serde(deserialize_with = "lenient_id")]
    pub id: i64,
    #[serde(deserialize_with = "lenient_text")]
    pub arabic: String,
    #[serde(deserialize_with = "lenient_text")]
    pub transcription: String,
    #[serde(deserialize_with = "lenient_text")]
    pub russian: String,
    /// Short role label, one of two per dialogue.
    #[serde(deserialize_with = "lenient_text")]
    pub speaker: String,
}

fn lenient_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    let id = match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    };
    Ok(id.unwrap_or_default())
}

fn lenient_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(scalar_text(&Value::deserialize(deserializer)?).unwrap_or_default())
}

/// Strings as-is, numbers and booleans in their JSON spelling.
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// A lesson row with its `content` column decoded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Lesson {
    pub id: i64,
    pub textbook_id: i64,
    pub number: i64,
    pub title: String,
    pub subtitle: Option<String>,
    /// Raw stored payload, kept alongside the decoded view.
    pub content: Option<String>,
    pub audio_url: Option<String>,
    pub order_index: i64,
    pub turns: Vec<DialogueTurn>,
    pub difficulty: Option<String>,
    pub turn_count: usize,
}

#[derive(Debug, Clone, Default)]
pub struct NewLesson {
    pub textbook_id: i64,
    pub number: i64,
    pub title: String,
    pub subtitle: Option<String>,
    pub content: Option<String>,
    pub audio_url: Option<String>,
    pub order_index: i64,
}

/// Decoded form of `lessons.content`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LessonContent {
    pub turns: Vec<DialogueTurn>,
    pub difficulty: Option<String>,
}

#[derive(Serialize)]
struct StoredContent<'a> {
    dialogues: &'a [DialogueTurn],
    #[serde(skip_serializing_if = "Option::is_none")]
    difficulty: Option<&'a str>,
}

impl LessonContent {
    pub fn new(turns: Vec<DialogueTurn>, difficulty: Option<String>) -> Self {
        Self { turns, difficulty }
    }

    /// Decodes a stored payload. Never fails: anything unreadable
    /// becomes an empty dialogue with no difficulty. Every object in
    /// `dialogues` yields a turn; scalars in the array are skipped.
    pub fn parse(raw: Option<&str>) -> Self {
        let Some(raw) = raw.filter(|s| !s.trim().is_empty()) else {
            return Self::default();
        };

        let parsed: Value = match serde_json::from_str(raw) {
            Ok(value) => value,
            Err(e) => {
                tracing::debug!("Unreadable lesson content: {}", e);
                return Self::default();
            }
        };

        let turns = parsed
            .get("dialogues")
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(|item| DialogueTurn::deserialize(item).ok())
                    .collect()
            })
            .unwrap_or_default();

        let difficulty = ["difficulty", "level"]
            .iter()
            .filter_map(|key| parsed.get(*key))
            .filter(|value| !matches!(value, Value::Bool(false)))
            .filter(|value| value.as_f64() != Some(0.0))
            .filter_map(scalar_text)
            .find(|s| !s.is_empty());

        Self { turns, difficulty }
    }

    pub fn encode(&self) -> serde_json::Result<String> {
        serde_json::to_string(&StoredContent {
            dialogues: &self.turns,
            difficulty: self.difficulty.as_deref(),
        })
    }
}
