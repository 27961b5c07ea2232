use std::sync::Arc;

use tokio::sync::watch;

use crate::db::{DataStore, StoreCounts};
use crate::error::Result;
use crate::models::{
    category_options, CategoryOption, Lesson, Textbook, VocabularyItem, ALL_CATEGORIES,
};
use crate::settings::{next_arabic_font, SettingToggle, Settings, SettingsPatch, SettingsStore};
use crate::tui::AppAction;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Lessons,
    Vocabulary,
    Settings,
}

impl Tab {
    pub const ALL: [Tab; 3] = [Tab::Lessons, Tab::Vocabulary, Tab::Settings];

    pub fn label(self) -> &'static str {
        match self {
            Tab::Lessons => "Диалоги",
            Tab::Vocabulary => "Словарь",
            Tab::Settings => "Настройки",
        }
    }

    pub fn next(self) -> Self {
        match self {
            Tab::Lessons => Tab::Vocabulary,
            Tab::Vocabulary => Tab::Settings,
            Tab::Settings => Tab::Lessons,
        }
    }

    pub fn index(self) -> usize {
        Tab::ALL.iter().position(|t| *t == self).unwrap_or(0)
    }
}

pub struct App {
    // Data
    pub textbooks: Vec<Textbook>,
    pub lessons: Vec<Lesson>,
    pub lesson_words: Vec<VocabularyItem>,
    pub category_words: Vec<VocabularyItem>,
    pub categories: Vec<CategoryOption>,
    pub selected_word: Option<VocabularyItem>,
    pub settings: Settings,
    /// Totals shown as study progress.
    pub counts: StoreCounts,

    // UI State
    pub tab: Tab,
    pub textbook_index: usize,
    pub lesson_index: usize,
    pub category_index: usize,
    pub word_index: usize,
    pub setting_index: usize,
    pub show_help: bool,
    pub search_active: bool,
    pub search_query: String,
    /// `None` once storage is initialized; otherwise the reason it is not.
    pub not_ready: Option<String>,

    // Services
    store: Arc<DataStore>,
    settings_store: SettingsStore,
    settings_rx: watch::Receiver<Settings>,
}

impl App {
    pub async fn new(store: Arc<DataStore>, settings_store: SettingsStore, default_category: &str) -> Self {
        let settings_rx = settings_store.subscribe();

        let mut app = Self {
            textbooks: Vec::new(),
            lessons: Vec::new(),
            lesson_words: Vec::new(),
            category_words: Vec::new(),
            categories: Vec::new(),
            selected_word: None,
            settings: settings_store.get(),
            counts: StoreCounts::default(),
            tab: Tab::default(),
            textbook_index: 0,
            lesson_index: 0,
            category_index: 0,
            word_index: 0,
            setting_index: 0,
            show_help: false,
            search_active: false,
            search_query: String::new(),
            not_ready: None,
            store,
            settings_store,
            settings_rx,
        };

        app.connect(default_category).await;
        app
    }

    /// Initializes storage and loads every view. Failure leaves the app
    /// running in a not-ready state.
    async fn connect(&mut self, category: &str) {
        match self.try_connect(category).await {
            Ok(()) => self.not_ready = None,
            Err(e) => {
                tracing::error!("Database not ready: {}", e);
                self.not_ready = Some(e.to_string());
            }
        }
    }

    async fn try_connect(&mut self, category: &str) -> Result<()> {
        self.store.initialize().await?;
        self.store.seed_if_empty().await?;
        self.reload(category).await
    }

    async fn reload(&mut self, category: &str) -> Result<()> {
        self.counts = self.store.counts().await?;
        self.textbooks = self.store.list_textbooks().await?;
        self.textbook_index = self.textbook_index.min(self.textbooks.len().saturating_sub(1));
        self.load_lessons().await?;

        let all_words = self.store.list_vocabulary_by_category(None).await?;
        self.categories = category_options(&all_words);
        self.category_index = self
            .categories
            .iter()
            .position(|c| c.value == category)
            .unwrap_or(0);
        self.load_category_words().await
    }

    pub fn is_ready(&self) -> bool {
        self.not_ready.is_none()
    }

    pub fn selected_textbook(&self) -> Option<&Textbook> {
        self.textbooks.get(self.textbook_index)
    }

    pub fn selected_lesson(&self) -> Option<&Lesson> {
        self.lessons.get(self.lesson_index)
    }

    pub fn current_category(&self) -> &str {
        self.categories
            .get(self.category_index)
            .map(|c| c.value.as_str())
            .unwrap_or(ALL_CATEGORIES)
    }

    pub fn visible_words(&self) -> Vec<&VocabularyItem> {
        self.category_words
            .iter()
            .filter(|w| w.matches_query(&self.search_query))
            .collect()
    }

    pub fn selected_setting(&self) -> SettingToggle {
        SettingToggle::ALL[self.setting_index.min(SettingToggle::ALL.len() - 1)]
    }

    /// Picks up settings changes made through any handle on the store.
    pub fn sync_settings(&mut self) {
        if self.settings_rx.has_changed().unwrap_or(false) {
            self.settings = self.settings_rx.borrow_and_update().clone();
        }
    }

    pub async fn handle_action(&mut self, action: AppAction) -> Result<bool> {
        match action {
            AppAction::Quit => return Ok(true),

            AppAction::NextTab => self.tab = self.tab.next(),
            AppAction::SelectTab(tab) => self.tab = tab,

            AppAction::ShowHelp => self.show_help = true,
            AppAction::HideHelp => self.show_help = false,

            AppAction::Reconnect => {
                let category = self.current_category().to_string();
                self.connect(&category).await;
            }

            AppAction::ToggleTranscription => {
                self.settings = self.settings_store.toggle(SettingToggle::AutoTranscription).await;
            }

            AppAction::MoveUp => self.move_selection(-1).await?,
            AppAction::MoveDown => self.move_selection(1).await?,

            AppAction::PrevTextbook | AppAction::NextTextbook if self.is_ready() => {
                let len = self.textbooks.len();
                if len > 1 {
                    self.textbook_index = if matches!(action, AppAction::NextTextbook) {
                        (self.textbook_index + 1) % len
                    } else {
                        (self.textbook_index + len - 1) % len
                    };
                    self.lesson_index = 0;
                    self.load_lessons().await?;
                }
            }

            AppAction::CycleFont => {
                let font = next_arabic_font(&self.settings.arabic_font).to_string();
                let patch = SettingsPatch {
                    arabic_font: Some(font),
                    ..Default::default()
                };
                self.settings = self.settings_store.set(patch).await;
            }

            AppAction::Activate => {
                if self.tab == Tab::Settings {
                    let key = self.selected_setting();
                    self.settings = self.settings_store.toggle(key).await;
                }
            }

            AppAction::CycleCategory if self.is_ready() => {
                if !self.categories.is_empty() {
                    self.category_index = (self.category_index + 1) % self.categories.len();
                    self.load_category_words().await?;
                }
            }

            AppAction::SearchStart => {
                self.tab = Tab::Vocabulary;
                self.search_active = true;
            }
            AppAction::SearchChar(c) => {
                self.search_query.push(c);
                self.on_search_changed().await?;
            }
            AppAction::SearchBackspace => {
                self.search_query.pop();
                self.on_search_changed().await?;
            }
            AppAction::SearchConfirm => self.search_active = false,
            AppAction::SearchCancel => {
                self.search_active = false;
                self.search_query.clear();
                self.on_search_changed().await?;
            }

            AppAction::PrevTextbook | AppAction::NextTextbook | AppAction::CycleCategory => {}
        }

        Ok(false)
    }

    async fn move_selection(&mut self, delta: isize) -> Result<()> {
        match self.tab {
            Tab::Settings => {
                self.setting_index = step(self.setting_index, delta, SettingToggle::ALL.len());
            }
            Tab::Lessons if self.is_ready() => {
                let next = step(self.lesson_index, delta, self.lessons.len());
                if next != self.lesson_index {
                    self.lesson_index = next;
                    self.load_lesson_words().await?;
                }
            }
            Tab::Vocabulary if self.is_ready() => {
                let next = step(self.word_index, delta, self.visible_words().len());
                if next != self.word_index {
                    self.word_index = next;
                    self.load_selected_word().await?;
                }
            }
            _ => {}
        }
        Ok(())
    }

    async fn load_lessons(&mut self) -> Result<()> {
        let textbook_id = self.selected_textbook().map(|t| t.id);
        self.lessons = match textbook_id {
            Some(id) => self.store.list_lessons_for_textbook(id).await?,
            None => Vec::new(),
        };
        self.lesson_index = self.lesson_index.min(self.lessons.len().saturating_sub(1));
        self.load_lesson_words().await
    }

    async fn load_lesson_words(&mut self) -> Result<()> {
        let lesson_id = self.selected_lesson().map(|l| l.id);
        self.lesson_words = match lesson_id {
            Some(id) => self.store.list_vocabulary_for_lesson(id).await?,
            None => Vec::new(),
        };
        Ok(())
    }

    async fn load_category_words(&mut self) -> Result<()> {
        let category = self.current_category().to_string();
        self.category_words = self.store.list_vocabulary_by_category(Some(&category)).await?;
        self.word_index = 0;
        self.load_selected_word().await
    }

    async fn on_search_changed(&mut self) -> Result<()> {
        self.word_index = 0;
        if self.is_ready() {
            self.load_selected_word().await?;
        }
        Ok(())
    }

    async fn load_selected_word(&mut self) -> Result<()> {
        let id = self.visible_words().get(self.word_index).map(|w| w.id);
        self.selected_word = match id {
            Some(id) => self.store.get_vocabulary_item(id).await?,
            None => None,
        };
        Ok(())
    }
}

fn step(index: usize, delta: isize, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    index.saturating_add_signed(delta).min(len - 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    async fn seeded_app(dir: &TempDir) -> App {
        let store = Arc::new(DataStore::new(dir.path().join("study.db")));
        let settings = SettingsStore::load(dir.path().join("settings.json")).await;
        App::new(store, settings, "all").await
    }

    #[test]
    fn step_clamps_to_bounds() {
        assert_eq!(step(0, -1, 3), 0);
        assert_eq!(step(2, 1, 3), 2);
        assert_eq!(step(1, 1, 3), 2);
        assert_eq!(step(5, 1, 0), 0);
    }

    #[tokio::test]
    async fn startup_seeds_and_loads_first_lesson() {
        let dir = TempDir::new().unwrap();
        let app = seeded_app(&dir).await;

        assert!(app.is_ready());
        assert_eq!(app.textbooks.len(), 1);
        assert_eq!(app.lessons.len(), 3);
        assert_eq!(app.lesson_words.len(), 3);
        assert_eq!(app.categories[0].value, "all");
        assert_eq!(app.visible_words().len(), 9);
        assert!(app.selected_word.is_some());
        assert_eq!(app.counts.lessons, 3);
        assert_eq!(app.counts.vocabulary, 9);
    }

    #[tokio::test]
    async fn navigation_loads_lesson_vocabulary() {
        let dir = TempDir::new().unwrap();
        let mut app = seeded_app(&dir).await;

        app.handle_action(AppAction::MoveDown).await.unwrap();
        assert_eq!(app.selected_lesson().map(|l| l.number), Some(2));
        let arabic: Vec<_> = app.lesson_words.iter().map(|w| w.arabic.as_str()).collect();
        assert_eq!(arabic, ["بيت", "كبير", "جميل"]);
    }

    #[tokio::test]
    async fn category_and_search_narrow_the_word_list() {
        let dir = TempDir::new().unwrap();
        let mut app = seeded_app(&dir).await;
        app.handle_action(AppAction::SelectTab(Tab::Vocabulary)).await.unwrap();

        while app.current_category() != "adj" {
            app.handle_action(AppAction::CycleCategory).await.unwrap();
        }
        assert_eq!(app.visible_words().len(), 3);

        for c in "kab".chars() {
            app.handle_action(AppAction::SearchChar(c)).await.unwrap();
        }
        assert_eq!(app.visible_words().len(), 1);
        assert_eq!(app.selected_word.as_ref().map(|w| w.arabic.as_str()), Some("كبير"));

        app.handle_action(AppAction::SearchCancel).await.unwrap();
        assert_eq!(app.visible_words().len(), 3);
    }

    #[tokio::test]
    async fn settings_tab_toggles_and_persists() {
        let dir = TempDir::new().unwrap();
        let mut app = seeded_app(&dir).await;
        app.handle_action(AppAction::SelectTab(Tab::Settings)).await.unwrap();
        app.handle_action(AppAction::MoveDown).await.unwrap();
        app.handle_action(AppAction::Activate).await.unwrap();

        app.handle_action(AppAction::CycleFont).await.unwrap();

        assert!(!app.settings.sound_effects);
        assert_eq!(app.settings.arabic_font, "naskh");
        let reloaded = SettingsStore::load(dir.path().join("settings.json")).await.get();
        assert!(!reloaded.sound_effects);
        assert_eq!(reloaded.arabic_font, "naskh");
    }

    #[tokio::test]
    async fn unavailable_storage_leaves_app_not_ready() {
        let dir = TempDir::new().unwrap();
        let store = Arc::new(DataStore::new(dir.path().join("missing").join("study.db")));
        let settings = SettingsStore::load(dir.path().join("settings.json")).await;
        let mut app = App::new(store, settings, "all").await;

        assert!(!app.is_ready());
        assert!(app.lessons.is_empty());
        app.handle_action(AppAction::MoveDown).await.unwrap();
        app.handle_action(AppAction::CycleCategory).await.unwrap();

        std::fs::create_dir_all(dir.path().join("missing")).unwrap();
        app.handle_action(AppAction::Reconnect).await.unwrap();
        assert!(app.is_ready());
        assert_eq!(app.lessons.len(), 3);
    }
}
