use std::collections::HashMap;

use rusqlite::{params, Connection};
use serde::Deserialize;

use crate::error::Result;
use crate::models::{DialogueTurn, LessonContent};

const BUNDLED_SEED: &str = include_str!("../../assets/seed.json");

/// Default content inserted into an empty database.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedData {
    pub textbooks: Vec<SeedTextbook>,
    #[serde(default)]
    pub lessons: Vec<SeedLesson>,
    #[serde(default)]
    pub vocabulary: Vec<SeedWord>,
    #[serde(default)]
    pub lesson_vocabulary: Vec<SeedLink>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedTextbook {
    pub title: String,
    pub description: Option<String>,
    pub level: Option<String>,
    #[serde(default)]
    pub order_index: i64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedLesson {
    /// `order_index` of the owning textbook. Without it the lesson is
    /// added to every textbook.
    pub textbook_order: Option<i64>,
    pub number: i64,
    pub title: String,
    pub subtitle: Option<String>,
    pub difficulty: Option<String>,
    pub audio_url: Option<String>,
    #[serde(default)]
    pub order_index: i64,
    #[serde(default)]
    pub dialogues: Vec<DialogueTurn>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedWord {
    /// Seed-local handle referenced by links; not stored.
    pub key: String,
    pub arabic: String,
    pub transcription: Option<String>,
    pub translation_ru: String,
    #[serde(default = "default_translation_lang")]
    pub translation_lang: String,
    pub part_of_speech: Option<String>,
    pub notes: Option<String>,
    pub audio_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedLink {
    /// Same matching rule as [`SeedLesson::textbook_order`].
    pub textbook_order: Option<i64>,
    pub lesson_number: i64,
    pub vocab_key: String,
    #[serde(default)]
    pub order_index: i64,
}

fn default_translation_lang() -> String {
    "ru".to_string()
}

impl SeedData {
    pub fn bundled() -> Result<Self> {
        Self::from_json(BUNDLED_SEED)
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SeedReport {
    pub textbooks: usize,
    pub lessons: usize,
    pub vocabulary: usize,
    pub links: usize,
    pub skipped_links: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOutcome {
    Seeded(SeedReport),
    /// Textbooks already existed; nothing was written.
    AlreadyPopulated,
}

impl SeedOutcome {
    #[allow(dead_code)]
    pub fn is_seeded(&self) -> bool {
        matches!(self, SeedOutcome::Seeded(_))
    }
}

/// Seed data with lesson payloads already encoded, ready to be moved
/// onto the connection thread.
pub(super) struct SeedPlan {
    data: SeedData,
    contents: Vec<String>,
}

impl SeedPlan {
    pub(super) fn prepare(data: SeedData) -> Result<Self> {
        let contents = data
            .lessons
            .iter()
            .map(|lesson| {
                LessonContent::new(lesson.dialogues.clone(), lesson.difficulty.clone()).encode()
            })
            .collect::<serde_json::Result<Vec<_>>>()?;
        Ok(Self { data, contents })
    }
}

fn matches_textbook(key: Option<i64>, order_index: i64) -> bool {
    key.map_or(true, |k| k == order_index)
}

/// Inserts the plan inside one transaction unless a textbook exists.
pub(super) fn apply(conn: &mut Connection, plan: &SeedPlan) -> rusqlite::Result<SeedOutcome> {
    let tx = conn.transaction()?;

    let existing: i64 = tx.query_row("SELECT COUNT(*) FROM textbooks", [], |row| row.get(0))?;
    if existing > 0 {
        return Ok(SeedOutcome::AlreadyPopulated);
    }

    let data = &plan.data;
    let mut report = SeedReport::default();

    let mut textbook_ids: Vec<(i64, i64)> = Vec::with_capacity(data.textbooks.len());
    for textbook in &data.textbooks {
        tx.execute(
            "INSERT INTO textbooks (title, description, level, order_index) VALUES (?1, ?2, ?3, ?4)",
            params![textbook.title, textbook.description, textbook.level, textbook.order_index],
        )?;
        textbook_ids.push((textbook.order_index, tx.last_insert_rowid()));
        report.textbooks += 1;
    }

    // (textbook order_index, lesson number) -> lesson id
    let mut lesson_ids: HashMap<(i64, i64), i64> = HashMap::new();
    for (lesson, content) in data.lessons.iter().zip(&plan.contents) {
        for (order_index, textbook_id) in &textbook_ids {
            if !matches_textbook(lesson.textbook_order, *order_index) {
                continue;
            }
            tx.execute(
                r#"INSERT INTO lessons (textbook_id, number, title, subtitle, content, audio_url, order_index)
                   VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)"#,
                params![
                    textbook_id,
                    lesson.number,
                    lesson.title,
                    lesson.subtitle,
                    content,
                    lesson.audio_url,
                    lesson.order_index,
                ],
            )?;
            lesson_ids.insert((*order_index, lesson.number), tx.last_insert_rowid());
            report.lessons += 1;
        }
    }

    let mut vocabulary_ids: HashMap<&str, i64> = HashMap::new();
    for word in &data.vocabulary {
        tx.execute(
            r#"INSERT INTO vocabulary (arabic, transcription, translation_ru, translation_lang, part_of_speech, notes, audio_url)
               VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)"#,
            params![
                word.arabic,
                word.transcription,
                word.translation_ru,
                word.translation_lang,
                word.part_of_speech,
                word.notes,
                word.audio_url,
            ],
        )?;
        vocabulary_ids.insert(word.key.as_str(), tx.last_insert_rowid());
        report.vocabulary += 1;
    }

    for link in &data.lesson_vocabulary {
        let Some(vocabulary_id) = vocabulary_ids.get(link.vocab_key.as_str()) else {
            tracing::warn!("Seed link skipped: unknown word key {:?}", link.vocab_key);
            report.skipped_links += 1;
            continue;
        };

        let targets: Vec<i64> = textbook_ids
            .iter()
            .filter(|(order_index, _)| matches_textbook(link.textbook_order, *order_index))
            .filter_map(|(order_index, _)| lesson_ids.get(&(*order_index, link.lesson_number)).copied())
            .collect();

        if targets.is_empty() {
            tracing::warn!("Seed link skipped: no lesson number {}", link.lesson_number);
            report.skipped_links += 1;
            continue;
        }

        for lesson_id in targets {
            let inserted = tx.execute(
                "INSERT INTO lesson_vocabulary (lesson_id, vocabulary_id, order_index) VALUES (?1, ?2, ?3)",
                params![lesson_id, vocabulary_id, link.order_index],
            );
            match inserted {
                Ok(_) => report.links += 1,
                Err(e) => {
                    tracing::warn!("Seed link skipped for lesson {}: {}", lesson_id, e);
                    report.skipped_links += 1;
                }
            }
        }
    }

    tx.commit()?;
    Ok(SeedOutcome::Seeded(report))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DataStore;
    use futures::future::join_all;

    const TWO_TEXTBOOKS: &str = r#"{
        "textbooks": [
            {"title": "Том 1", "orderIndex": 1},
            {"title": "Том 2", "orderIndex": 2}
        ],
        "lessons": [
            {"textbookOrder": 1, "number": 1, "title": "Only in one", "orderIndex": 1},
            {"number": 2, "title": "Shared", "orderIndex": 2, "difficulty": "A1",
             "dialogues": [{"id": 1, "arabic": "نعم", "speaker": "А"}]}
        ],
        "vocabulary": [
            {"key": "yes", "arabic": "نعم", "translationRu": "да", "partOfSpeech": "phrase"},
            {"key": "no", "arabic": "لا", "translationRu": "нет", "partOfSpeech": "phrase"}
        ],
        "lessonVocabulary": [
            {"textbookOrder": 1, "lessonNumber": 1, "vocabKey": "yes", "orderIndex": 1},
            {"lessonNumber": 2, "vocabKey": "no", "orderIndex": 1},
            {"lessonNumber": 7, "vocabKey": "yes", "orderIndex": 1},
            {"lessonNumber": 1, "vocabKey": "missing", "orderIndex": 2},
            {"textbookOrder": 1, "lessonNumber": 1, "vocabKey": "yes", "orderIndex": 3}
        ]
    }"#;

    #[test]
    fn bundled_dataset_parses() {
        let data = SeedData::bundled().unwrap();
        assert_eq!(data.textbooks.len(), 1);
        assert_eq!(data.lessons.len(), 3);
        assert_eq!(data.vocabulary.len(), 9);
        assert_eq!(data.lesson_vocabulary.len(), 9);
        assert!(data.vocabulary.iter().all(|w| w.translation_lang == "ru"));
    }

    #[tokio::test]
    async fn bundled_seed_scenario() {
        let store = DataStore::in_memory();

        let outcome = store.seed_if_empty().await.unwrap();
        assert_eq!(
            outcome,
            SeedOutcome::Seeded(SeedReport {
                textbooks: 1,
                lessons: 3,
                vocabulary: 9,
                links: 9,
                skipped_links: 0,
            })
        );

        let textbooks = store.list_textbooks().await.unwrap();
        assert_eq!(textbooks.len(), 1);
        assert_eq!(textbooks[0].level.as_deref(), Some("A1"));

        let lessons = store.list_lessons_for_textbook(textbooks[0].id).await.unwrap();
        let numbers: Vec<_> = lessons.iter().map(|l| l.number).collect();
        assert_eq!(numbers, [1, 2, 3]);
        assert_eq!(lessons[0].turn_count, 5);
        assert_eq!(lessons[0].difficulty.as_deref(), Some("مبتدئ"));
        assert_eq!(lessons[1].turn_count, 4);

        let words = store.list_vocabulary_for_lesson(lessons[0].id).await.unwrap();
        let arabic: Vec<_> = words.iter().map(|w| w.arabic.as_str()).collect();
        assert_eq!(arabic, ["السلام عليكم", "وعليكم السلام", "اسم"]);
    }

    #[tokio::test]
    async fn second_seed_is_a_no_op() {
        let store = DataStore::in_memory();
        assert!(store.seed_if_empty().await.unwrap().is_seeded());
        let before = store.counts().await.unwrap();

        assert_eq!(store.seed_if_empty().await.unwrap(), SeedOutcome::AlreadyPopulated);
        assert_eq!(store.counts().await.unwrap(), before);
    }

    #[tokio::test]
    async fn concurrent_seeds_insert_once() {
        let store = DataStore::in_memory();

        let outcomes = join_all((0..4).map(|_| store.seed_if_empty())).await;
        let seeded = outcomes
            .iter()
            .filter(|o| o.as_ref().is_ok_and(SeedOutcome::is_seeded))
            .count();

        assert_eq!(seeded, 1);
        assert!(outcomes.iter().all(|o| o.is_ok()));
        assert_eq!(store.counts().await.unwrap().textbooks, 1);
        assert_eq!(store.schema_passes(), 1);
    }

    #[tokio::test]
    async fn lesson_without_textbook_key_joins_every_textbook() {
        let store = DataStore::in_memory();
        let data = SeedData::from_json(TWO_TEXTBOOKS).unwrap();

        let SeedOutcome::Seeded(report) = store.seed_with(data).await.unwrap() else {
            panic!("expected a seeded outcome");
        };
        assert_eq!(report.textbooks, 2);
        assert_eq!(report.lessons, 3);

        let textbooks = store.list_textbooks().await.unwrap();
        let first = store.list_lessons_for_textbook(textbooks[0].id).await.unwrap();
        let second = store.list_lessons_for_textbook(textbooks[1].id).await.unwrap();
        let titles = |lessons: &[crate::models::Lesson]| {
            lessons.iter().map(|l| l.title.clone()).collect::<Vec<_>>()
        };
        assert_eq!(titles(&first), ["Only in one", "Shared"]);
        assert_eq!(titles(&second), ["Shared"]);
        assert_eq!(second[0].turn_count, 1);
        assert_eq!(second[0].difficulty.as_deref(), Some("A1"));

        let shared_words = store.list_vocabulary_for_lesson(second[0].id).await.unwrap();
        assert_eq!(shared_words.len(), 1);
        assert_eq!(shared_words[0].arabic, "لا");
    }

    #[tokio::test]
    async fn unresolvable_links_are_skipped_not_fatal() {
        let store = DataStore::in_memory();
        let data = SeedData::from_json(TWO_TEXTBOOKS).unwrap();

        let SeedOutcome::Seeded(report) = store.seed_with(data).await.unwrap() else {
            panic!("expected a seeded outcome");
        };
        // yes->1 and no->2 in both textbooks; unknown lesson, unknown word
        // and the duplicate pair are skipped.
        assert_eq!(report.links, 3);
        assert_eq!(report.skipped_links, 3);
        assert_eq!(store.counts().await.unwrap().links, 3);
    }

    #[tokio::test]
    async fn missing_textbooks_are_rejected_and_empty_dataset_writes_nothing() {
        assert!(SeedData::from_json(r#"{"lessons": []}"#).is_err());

        let store = DataStore::in_memory();
        let empty = SeedData::default();
        assert_eq!(
            store.seed_with(empty).await.unwrap(),
            SeedOutcome::Seeded(SeedReport::default())
        );
        assert_eq!(store.counts().await.unwrap().textbooks, 0);
    }
}
