use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use futures::future::{BoxFuture, FutureExt, Shared};
use rusqlite::{params, OptionalExtension, Row};
use tokio::sync::Mutex;
use tokio_rusqlite::Connection;

use crate::error::{AppError, Result};
use crate::models::{
    Lesson, LessonContent, NewLesson, NewTextbook, NewVocabularyItem, Textbook, VocabularyItem,
    ALL_CATEGORIES,
};

use super::schema::SCHEMA;
use super::seed::{self, SeedData, SeedOutcome};

const TEXTBOOK_COLUMNS: &str = "id, title, description, level, order_index";
const LESSON_COLUMNS: &str =
    "id, textbook_id, number, title, subtitle, content, audio_url, order_index";
const VOCABULARY_COLUMNS: &str =
    "id, arabic, transcription, translation_ru, translation_lang, part_of_speech, notes, audio_url";

type InitFuture = Shared<BoxFuture<'static, std::result::Result<Connection, Arc<AppError>>>>;

#[derive(Debug, Clone)]
enum Location {
    File(PathBuf),
    Memory,
}

struct InitAttempt {
    id: u64,
    future: InitFuture,
}

#[derive(Default)]
struct InitState {
    attempt: Option<InitAttempt>,
    next_id: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StoreCounts {
    pub textbooks: i64,
    pub lessons: i64,
    pub vocabulary: i64,
    pub links: i64,
}

/// Owner of the study database. The connection is opened lazily by the
/// first operation and every caller shares one initialization attempt.
pub struct DataStore {
    location: Location,
    init: Mutex<InitState>,
    schema_passes: Arc<AtomicUsize>,
}

impl DataStore {
    pub fn new(db_path: impl Into<PathBuf>) -> Self {
        Self::with_location(Location::File(db_path.into()))
    }

    #[allow(dead_code)]
    pub fn in_memory() -> Self {
        Self::with_location(Location::Memory)
    }

    fn with_location(location: Location) -> Self {
        Self {
            location,
            init: Mutex::new(InitState::default()),
            schema_passes: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Opens storage and creates the schema once. Concurrent callers await
    /// the same attempt; a failed attempt is reported to all of them and
    /// the next call starts over.
    pub async fn initialize(&self) -> Result<()> {
        self.connection().await.map(|_| ())
    }

    async fn connection(&self) -> Result<Connection> {
        let (attempt_id, future) = {
            let mut state = self.init.lock().await;
            match &state.attempt {
                Some(attempt) => (attempt.id, attempt.future.clone()),
                None => {
                    let id = state.next_id;
                    state.next_id += 1;
                    let future = open_and_prepare(self.location.clone(), Arc::clone(&self.schema_passes))
                        .map(|result| result.map_err(Arc::new))
                        .boxed()
                        .shared();
                    state.attempt = Some(InitAttempt {
                        id,
                        future: future.clone(),
                    });
                    (id, future)
                }
            }
        };

        match future.await {
            Ok(conn) => Ok(conn),
            Err(e) => {
                let mut state = self.init.lock().await;
                if state.attempt.as_ref().is_some_and(|a| a.id == attempt_id) {
                    tracing::warn!("Storage initialization failed, next call will retry: {}", e);
                    state.attempt = None;
                }
                Err(AppError::Init(e))
            }
        }
    }

    #[cfg(test)]
    pub(crate) fn schema_passes(&self) -> usize {
        self.schema_passes.load(Ordering::SeqCst)
    }

    // Seeding

    pub async fn seed_if_empty(&self) -> Result<SeedOutcome> {
        self.seed_with(SeedData::bundled()?).await
    }

    pub async fn seed_with(&self, data: SeedData) -> Result<SeedOutcome> {
        let plan = seed::SeedPlan::prepare(data)?;
        let conn = self.connection().await?;
        let outcome = conn
            .call(move |conn| Ok(seed::apply(conn, &plan)?))
            .await?;

        match &outcome {
            SeedOutcome::Seeded(report) => tracing::info!(
                "Seeded {} textbooks, {} lessons, {} words, {} links ({} skipped)",
                report.textbooks,
                report.lessons,
                report.vocabulary,
                report.links,
                report.skipped_links
            ),
            SeedOutcome::AlreadyPopulated => tracing::debug!("Database already populated, skipping seed"),
        }

        Ok(outcome)
    }

    // Textbook operations

    pub async fn list_textbooks(&self) -> Result<Vec<Textbook>> {
        let conn = self.connection().await?;
        let textbooks = conn
            .call(|conn| {
                let mut stmt = conn.prepare(&format!(
                    "SELECT {TEXTBOOK_COLUMNS} FROM textbooks ORDER BY order_index ASC, id ASC"
                ))?;
                let textbooks = stmt
                    .query_map([], textbook_from_row)?
                    .collect::<std::result::Result<Vec<_>, _>>()?;
                Ok(textbooks)
            })
            .await?;
        Ok(textbooks)
    }

    #[allow(dead_code)]
    pub async fn insert_textbook(&self, textbook: NewTextbook) -> Result<i64> {
        let conn = self.connection().await?;
        let id = conn
            .call(move |conn| {
                conn.execute(
                    "INSERT INTO textbooks (title, description, level, order_index) VALUES (?1, ?2, ?3, ?4)",
                    params![textbook.title, textbook.description, textbook.level, textbook.order_index],
                )?;
                Ok(conn.last_insert_rowid())
            })
            .await?;
        Ok(id)
    }

    /// Removes a textbook together with its lessons and their word links.
    #[allow(dead_code)]
    pub async fn delete_textbook(&self, id: i64) -> Result<bool> {
        self.delete_by_id("DELETE FROM textbooks WHERE id = ?1", id).await
    }

    // Lesson operations

    pub async fn list_lessons_for_textbook(&self, textbook_id: i64) -> Result<Vec<Lesson>> {
        let conn = self.connection().await?;
        let lessons = conn
            .call(move |conn| {
                let mut stmt = conn.prepare(&format!(
                    "SELECT {LESSON_COLUMNS} FROM lessons WHERE textbook_id = ?1
                     ORDER BY order_index ASC, number ASC, id ASC"
                ))?;
                let lessons = stmt
                    .query_map(params![textbook_id], lesson_from_row)?
                    .collect::<std::result::Result<Vec<_>, _>>()?;
                Ok(lessons)
            })
            .await?;
        Ok(lessons)
    }

    pub async fn get_lesson(&self, id: i64) -> Result<Option<Lesson>> {
        let conn = self.connection().await?;
        let lesson = conn
            .call(move |conn| {
                let mut stmt = conn.prepare(&format!(
                    "SELECT {LESSON_COLUMNS} FROM lessons WHERE id = ?1 LIMIT 1"
                ))?;
                let lesson = stmt.query_row(params![id], lesson_from_row).optional()?;
                Ok(lesson)
            })
            .await?;
        Ok(lesson)
    }

    /// Fails with a constraint violation when `textbook_id` does not exist.
    #[allow(dead_code)]
    pub async fn insert_lesson(&self, lesson: NewLesson) -> Result<i64> {
        let conn = self.connection().await?;
        let id = conn
            .call(move |conn| {
                conn.execute(
                    r#"INSERT INTO lessons (textbook_id, number, title, subtitle, content, audio_url, order_index)
                       VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)"#,
                    params![
                        lesson.textbook_id,
                        lesson.number,
                        lesson.title,
                        lesson.subtitle,
                        lesson.content,
                        lesson.audio_url,
                        lesson.order_index,
                    ],
                )?;
                Ok(conn.last_insert_rowid())
            })
            .await?;
        Ok(id)
    }

    #[allow(dead_code)]
    pub async fn delete_lesson(&self, id: i64) -> Result<bool> {
        self.delete_by_id("DELETE FROM lessons WHERE id = ?1", id).await
    }

    // Vocabulary operations

    pub async fn list_vocabulary_for_lesson(&self, lesson_id: i64) -> Result<Vec<VocabularyItem>> {
        let conn = self.connection().await?;
        let words = conn
            .call(move |conn| {
                let mut stmt = conn.prepare(
                    r#"SELECT v.id, v.arabic, v.transcription, v.translation_ru, v.translation_lang,
                              v.part_of_speech, v.notes, v.audio_url
                       FROM lesson_vocabulary lv
                       JOIN vocabulary v ON lv.vocabulary_id = v.id
                       WHERE lv.lesson_id = ?1
                       ORDER BY lv.order_index ASC, v.id ASC"#,
                )?;
                let words = stmt
                    .query_map(params![lesson_id], vocabulary_from_row)?
                    .collect::<std::result::Result<Vec<_>, _>>()?;
                Ok(words)
            })
            .await?;
        Ok(words)
    }

    pub async fn get_vocabulary_item(&self, id: i64) -> Result<Option<VocabularyItem>> {
        let conn = self.connection().await?;
        let word = conn
            .call(move |conn| {
                let mut stmt = conn.prepare(&format!(
                    "SELECT {VOCABULARY_COLUMNS} FROM vocabulary WHERE id = ?1 LIMIT 1"
                ))?;
                let word = stmt.query_row(params![id], vocabulary_from_row).optional()?;
                Ok(word)
            })
            .await?;
        Ok(word)
    }

    /// Lists words with the given part of speech; `None`, `""` and `"all"`
    /// list every word.
    pub async fn list_vocabulary_by_category(&self, category: Option<&str>) -> Result<Vec<VocabularyItem>> {
        let filter = category
            .filter(|c| !c.is_empty() && *c != ALL_CATEGORIES)
            .map(str::to_string);

        let conn = self.connection().await?;
        let words = conn
            .call(move |conn| {
                let words = match filter {
                    Some(category) => {
                        let mut stmt = conn.prepare(&format!(
                            "SELECT {VOCABULARY_COLUMNS} FROM vocabulary WHERE part_of_speech = ?1 ORDER BY id ASC"
                        ))?;
                        let rows = stmt
                            .query_map(params![category], vocabulary_from_row)?
                            .collect::<std::result::Result<Vec<_>, _>>()?;
                        rows
                    }
                    None => {
                        let mut stmt = conn.prepare(&format!(
                            "SELECT {VOCABULARY_COLUMNS} FROM vocabulary ORDER BY id ASC"
                        ))?;
                        let rows = stmt
                            .query_map([], vocabulary_from_row)?
                            .collect::<std::result::Result<Vec<_>, _>>()?;
                        rows
                    }
                };
                Ok(words)
            })
            .await?;
        Ok(words)
    }

    #[allow(dead_code)]
    pub async fn insert_vocabulary_item(&self, word: NewVocabularyItem) -> Result<i64> {
        let conn = self.connection().await?;
        let id = conn
            .call(move |conn| {
                conn.execute(
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
                Ok(conn.last_insert_rowid())
            })
            .await?;
        Ok(id)
    }

    #[allow(dead_code)]
    pub async fn delete_vocabulary_item(&self, id: i64) -> Result<bool> {
        self.delete_by_id("DELETE FROM vocabulary WHERE id = ?1", id).await
    }

    /// Attaches a word to a lesson. Both rows must exist and the pair
    /// must not be linked yet.
    #[allow(dead_code)]
    pub async fn link_vocabulary(&self, lesson_id: i64, vocabulary_id: i64, order_index: i64) -> Result<()> {
        let conn = self.connection().await?;
        conn.call(move |conn| {
            conn.execute(
                "INSERT INTO lesson_vocabulary (lesson_id, vocabulary_id, order_index) VALUES (?1, ?2, ?3)",
                params![lesson_id, vocabulary_id, order_index],
            )?;
            Ok(())
        })
        .await?;
        Ok(())
    }

    pub async fn counts(&self) -> Result<StoreCounts> {
        let conn = self.connection().await?;
        let counts = conn
            .call(|conn| {
                let count = |table: &str| -> rusqlite::Result<i64> {
                    conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| row.get(0))
                };
                Ok(StoreCounts {
                    textbooks: count("textbooks")?,
                    lessons: count("lessons")?,
                    vocabulary: count("vocabulary")?,
                    links: count("lesson_vocabulary")?,
                })
            })
            .await?;
        Ok(counts)
    }

    async fn delete_by_id(&self, sql: &'static str, id: i64) -> Result<bool> {
        let conn = self.connection().await?;
        let deleted = conn
            .call(move |conn| {
                let changed = conn.execute(sql, params![id])?;
                Ok(changed > 0)
            })
            .await?;
        Ok(deleted)
    }
}

async fn open_and_prepare(location: Location, schema_passes: Arc<AtomicUsize>) -> Result<Connection> {
    let conn = match &location {
        Location::File(path) => {
            tracing::debug!("Opening database at {}", path.display());
            Connection::open(path).await?
        }
        Location::Memory => Connection::open_in_memory().await?,
    };

    conn.call(move |conn| {
        conn.pragma_update(None, "foreign_keys", "ON")?;
        conn.execute_batch(SCHEMA)?;
        schema_passes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    })
    .await?;

    tracing::debug!("Database schema ready");
    Ok(conn)
}

fn textbook_from_row(row: &Row) -> rusqlite::Result<Textbook> {
    Ok(Textbook {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        level: row.get(3)?,
        order_index: row.get(4)?,
    })
}

fn lesson_from_row(row: &Row) -> rusqlite::Result<Lesson> {
    let content: Option<String> = row.get(5)?;
    let LessonContent { turns, difficulty } = LessonContent::parse(content.as_deref());

    Ok(Lesson {
        id: row.get(0)?,
        textbook_id: row.get(1)?,
        number: row.get(2)?,
        title: row.get(3)?,
        subtitle: row.get(4)?,
        content,
        audio_url: row.get(6)?,
        order_index: row.get(7)?,
        turn_count: turns.len(),
        turns,
        difficulty,
    })
}

fn vocabulary_from_row(row: &Row) -> rusqlite::Result<VocabularyItem> {
    Ok(VocabularyItem {
        id: row.get(0)?,
        arabic: row.get(1)?,
        transcription: row.get(2)?,
        translation_ru: row.get(3)?,
        translation_lang: row.get(4)?,
        part_of_speech: row.get(5)?,
        notes: row.get(6)?,
        audio_url: row.get(7)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DialogueTurn, LessonContent};
    use futures::future::join_all;
    use tempfile::TempDir;
    use tokio_test::{assert_err, assert_ok};

    async fn textbook(store: &DataStore, title: &str, order_index: i64) -> i64 {
        store
            .insert_textbook(NewTextbook {
                title: title.to_string(),
                order_index,
                ..Default::default()
            })
            .await
            .unwrap()
    }

    async fn lesson(store: &DataStore, textbook_id: i64, number: i64, order_index: i64, content: Option<&str>) -> i64 {
        store
            .insert_lesson(NewLesson {
                textbook_id,
                number,
                title: format!("Lesson {number}"),
                content: content.map(str::to_string),
                order_index,
                ..Default::default()
            })
            .await
            .unwrap()
    }

    async fn word(store: &DataStore, arabic: &str, pos: Option<&str>) -> i64 {
        store
            .insert_vocabulary_item(NewVocabularyItem {
                arabic: arabic.to_string(),
                translation_ru: format!("{arabic}-ru"),
                part_of_speech: pos.map(str::to_string),
                ..Default::default()
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn concurrent_initialize_runs_schema_once() {
        let store = DataStore::in_memory();

        let results = join_all((0..8).map(|_| store.initialize())).await;

        assert!(results.iter().all(|r| r.is_ok()));
        assert_eq!(store.schema_passes(), 1);

        assert_ok!(store.initialize().await);
        assert_eq!(store.schema_passes(), 1);
    }

    #[tokio::test]
    async fn failed_open_reaches_every_waiter_and_is_retryable() {
        let dir = TempDir::new().unwrap();
        let parent = dir.path().join("not-yet-created");
        let store = DataStore::new(parent.join("study.db"));

        let results = join_all((0..4).map(|_| store.initialize())).await;
        for result in results {
            assert!(matches!(result, Err(AppError::Init(_))));
        }
        assert_eq!(store.schema_passes(), 0);

        std::fs::create_dir_all(&parent).unwrap();
        assert_ok!(store.initialize().await);
        assert_eq!(store.schema_passes(), 1);
    }

    #[tokio::test]
    async fn file_backed_store_keeps_data_across_handles() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("study.db");

        {
            let store = DataStore::new(&path);
            textbook(&store, "Том 1", 1).await;
        }

        let reopened = DataStore::new(&path);
        let textbooks = reopened.list_textbooks().await.unwrap();
        assert_eq!(textbooks.len(), 1);
        assert_eq!(textbooks[0].title, "Том 1");
    }

    #[tokio::test]
    async fn textbooks_order_by_order_index_then_id() {
        let store = DataStore::in_memory();
        let b = textbook(&store, "B", 2).await;
        let a1 = textbook(&store, "A1", 1).await;
        let a2 = textbook(&store, "A2", 1).await;

        let ids: Vec<_> = store.list_textbooks().await.unwrap().iter().map(|t| t.id).collect();
        assert_eq!(ids, [a1, a2, b]);
    }

    #[tokio::test]
    async fn lessons_order_by_order_index_number_then_id() {
        let store = DataStore::in_memory();
        let tb = textbook(&store, "T", 0).await;
        let late = lesson(&store, tb, 1, 5, None).await;
        let second = lesson(&store, tb, 3, 1, None).await;
        let first = lesson(&store, tb, 2, 1, None).await;
        let first_dup = lesson(&store, tb, 2, 1, None).await;

        let ids: Vec<_> = store
            .list_lessons_for_textbook(tb)
            .await
            .unwrap()
            .iter()
            .map(|l| l.id)
            .collect();
        assert_eq!(ids, [first, first_dup, second, late]);
    }

    #[tokio::test]
    async fn unknown_ids_are_not_errors() {
        let store = DataStore::in_memory();
        assert!(store.list_lessons_for_textbook(404).await.unwrap().is_empty());
        assert!(store.list_vocabulary_for_lesson(404).await.unwrap().is_empty());
        assert_eq!(store.get_lesson(404).await.unwrap(), None);
        assert_eq!(store.get_vocabulary_item(404).await.unwrap(), None);
        assert!(!store.delete_textbook(404).await.unwrap());
    }

    #[tokio::test]
    async fn lesson_content_is_normalized_totally() {
        let store = DataStore::in_memory();
        let tb = textbook(&store, "T", 0).await;

        for raw in [None, Some(""), Some("{\"dialogues\": [1,"), Some("{\"title\": \"x\"}")] {
            let id = lesson(&store, tb, 1, 0, raw).await;
            let loaded = store.get_lesson(id).await.unwrap().unwrap();
            assert!(loaded.turns.is_empty(), "turns for {raw:?}");
            assert_eq!(loaded.difficulty, None, "difficulty for {raw:?}");
            assert_eq!(loaded.turn_count, 0);
            assert_eq!(loaded.content.as_deref(), raw);
        }

        let turns: Vec<_> = (1..=5)
            .map(|id| DialogueTurn {
                id,
                arabic: format!("جملة {id}"),
                speaker: if id % 2 == 1 { "А" } else { "Б" }.to_string(),
                ..Default::default()
            })
            .collect();
        let raw = LessonContent::new(turns, Some("beginner".to_string())).encode().unwrap();
        let id = lesson(&store, tb, 2, 0, Some(&raw)).await;

        let loaded = store.get_lesson(id).await.unwrap().unwrap();
        assert_eq!(loaded.turns.len(), 5);
        assert_eq!(loaded.difficulty.as_deref(), Some("beginner"));
        assert_eq!(loaded.turn_count, 5);
        assert_eq!(loaded.turns[4].speaker, "А");
    }

    #[tokio::test]
    async fn turn_with_null_fields_is_counted() {
        let store = DataStore::in_memory();
        let tb = textbook(&store, "Том 1", 1).await;
        let raw = r#"{"dialogues": [{"id": 1, "arabic": "نعم", "transcription": null, "speaker": "А"}]}"#;
        let id = lesson(&store, tb, 1, 0, Some(raw)).await;

        let loaded = store.get_lesson(id).await.unwrap().unwrap();
        assert_eq!(loaded.turn_count, 1);
        assert_eq!(loaded.turns[0].arabic, "نعم");
        assert_eq!(loaded.turns[0].transcription, "");
    }

    #[tokio::test]
    async fn lesson_requires_existing_textbook() {
        let store = DataStore::in_memory();
        let result = store
            .insert_lesson(NewLesson {
                textbook_id: 999,
                number: 1,
                title: "orphan".to_string(),
                ..Default::default()
            })
            .await;

        let err = assert_err!(result);
        assert!(err.is_constraint_violation(), "unexpected error: {err}");
    }

    #[tokio::test]
    async fn deleting_textbook_cascades_to_lessons_and_links() {
        let store = DataStore::in_memory();
        let tb = textbook(&store, "T", 0).await;
        let other = textbook(&store, "Other", 1).await;
        let l1 = lesson(&store, tb, 1, 0, None).await;
        let kept = lesson(&store, other, 1, 0, None).await;
        let w = word(&store, "بيت", Some("noun")).await;
        store.link_vocabulary(l1, w, 1).await.unwrap();
        store.link_vocabulary(kept, w, 1).await.unwrap();

        assert!(store.delete_textbook(tb).await.unwrap());

        assert_eq!(store.get_lesson(l1).await.unwrap(), None);
        assert!(store.list_lessons_for_textbook(tb).await.unwrap().is_empty());
        let counts = store.counts().await.unwrap();
        assert_eq!(counts.lessons, 1);
        assert_eq!(counts.links, 1);
        assert_eq!(counts.vocabulary, 1);
    }

    #[tokio::test]
    async fn deleting_lesson_or_word_removes_links() {
        let store = DataStore::in_memory();
        let tb = textbook(&store, "T", 0).await;
        let l1 = lesson(&store, tb, 1, 0, None).await;
        let l2 = lesson(&store, tb, 2, 0, None).await;
        let w1 = word(&store, "سوق", Some("noun")).await;
        let w2 = word(&store, "كبير", Some("adj")).await;
        store.link_vocabulary(l1, w1, 1).await.unwrap();
        store.link_vocabulary(l1, w2, 2).await.unwrap();
        store.link_vocabulary(l2, w2, 1).await.unwrap();

        store.delete_lesson(l1).await.unwrap();
        assert!(store.list_vocabulary_for_lesson(l1).await.unwrap().is_empty());
        assert_eq!(store.counts().await.unwrap().links, 1);

        store.delete_vocabulary_item(w2).await.unwrap();
        assert!(store.list_vocabulary_for_lesson(l2).await.unwrap().is_empty());
        assert_eq!(store.counts().await.unwrap().links, 0);
    }

    #[tokio::test]
    async fn links_must_be_unique_and_point_at_existing_rows() {
        let store = DataStore::in_memory();
        let tb = textbook(&store, "T", 0).await;
        let l1 = lesson(&store, tb, 1, 0, None).await;
        let w = word(&store, "اسم", Some("noun")).await;

        store.link_vocabulary(l1, w, 1).await.unwrap();
        let duplicate = store.link_vocabulary(l1, w, 2).await.unwrap_err();
        assert!(duplicate.is_constraint_violation());

        let dangling = store.link_vocabulary(l1, 999, 1).await.unwrap_err();
        assert!(dangling.is_constraint_violation());
    }

    #[tokio::test]
    async fn lesson_words_follow_link_order_then_id() {
        let store = DataStore::in_memory();
        let tb = textbook(&store, "T", 0).await;
        let l1 = lesson(&store, tb, 1, 0, None).await;
        let w1 = word(&store, "a", None).await;
        let w2 = word(&store, "b", None).await;
        let w3 = word(&store, "c", None).await;
        store.link_vocabulary(l1, w3, 1).await.unwrap();
        store.link_vocabulary(l1, w2, 2).await.unwrap();
        store.link_vocabulary(l1, w1, 2).await.unwrap();

        let ids: Vec<_> = store
            .list_vocabulary_for_lesson(l1)
            .await
            .unwrap()
            .iter()
            .map(|w| w.id)
            .collect();
        assert_eq!(ids, [w3, w1, w2]);
    }

    #[tokio::test]
    async fn category_filter_treats_all_as_unfiltered() {
        let store = DataStore::in_memory();
        let n1 = word(&store, "بيت", Some("noun")).await;
        let a1 = word(&store, "جميل", Some("adj")).await;
        let n2 = word(&store, "سوق", Some("noun")).await;
        let untagged = word(&store, "؟", None).await;

        let ids = |words: Vec<VocabularyItem>| words.iter().map(|w| w.id).collect::<Vec<_>>();

        let everything = vec![n1, a1, n2, untagged];
        assert_eq!(ids(store.list_vocabulary_by_category(None).await.unwrap()), everything);
        assert_eq!(ids(store.list_vocabulary_by_category(Some("all")).await.unwrap()), everything);
        assert_eq!(ids(store.list_vocabulary_by_category(Some("")).await.unwrap()), everything);
        assert_eq!(ids(store.list_vocabulary_by_category(Some("noun")).await.unwrap()), vec![n1, n2]);
        assert!(store.list_vocabulary_by_category(Some("verb")).await.unwrap().is_empty());

        let item = store.get_vocabulary_item(a1).await.unwrap().unwrap();
        assert_eq!(item.translation_lang, "ru");
        assert_eq!(item.translation_ru, "جميل-ru");
    }
}
