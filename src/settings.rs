use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tokio::sync::watch;

/// Storage key of the settings document; also its file stem on disk.
pub const SETTINGS_STORAGE_KEY: &str = "app.settings.v1";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    pub notifications: bool,
    pub sound_effects: bool,
    pub auto_transcription: bool,
    pub daily_reminder: bool,
    pub dark_theme: bool,
    pub arabic_font: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            notifications: true,
            sound_effects: true,
            auto_transcription: false,
            daily_reminder: true,
            dark_theme: false,
            arabic_font: "standard".to_string(),
        }
    }
}

/// Font presets offered for Arabic text, in cycling order.
pub const ARABIC_FONTS: [&str; 3] = ["standard", "naskh", "large"];

/// Preset after `current`; unknown values restart at the first preset.
pub fn next_arabic_font(current: &str) -> &'static str {
    ARABIC_FONTS
        .iter()
        .position(|f| *f == current)
        .map(|i| ARABIC_FONTS[(i + 1) % ARABIC_FONTS.len()])
        .unwrap_or(ARABIC_FONTS[0])
}

/// Partial update; `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct SettingsPatch {
    pub notifications: Option<bool>,
    pub sound_effects: Option<bool>,
    pub auto_transcription: Option<bool>,
    pub daily_reminder: Option<bool>,
    pub dark_theme: Option<bool>,
    pub arabic_font: Option<String>,
}

impl SettingsPatch {
    fn apply_to(self, settings: &mut Settings) {
        if let Some(v) = self.notifications {
            settings.notifications = v;
        }
        if let Some(v) = self.sound_effects {
            settings.sound_effects = v;
        }
        if let Some(v) = self.auto_transcription {
            settings.auto_transcription = v;
        }
        if let Some(v) = self.daily_reminder {
            settings.daily_reminder = v;
        }
        if let Some(v) = self.dark_theme {
            settings.dark_theme = v;
        }
        if let Some(v) = self.arabic_font {
            settings.arabic_font = v;
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingToggle {
    Notifications,
    SoundEffects,
    AutoTranscription,
    DailyReminder,
    DarkTheme,
}

impl SettingToggle {
    pub const ALL: [SettingToggle; 5] = [
        SettingToggle::Notifications,
        SettingToggle::SoundEffects,
        SettingToggle::AutoTranscription,
        SettingToggle::DailyReminder,
        SettingToggle::DarkTheme,
    ];

    pub fn label(self) -> &'static str {
        match self {
            SettingToggle::Notifications => "Уведомления",
            SettingToggle::SoundEffects => "Звуковые эффекты",
            SettingToggle::AutoTranscription => "Показывать транскрипцию",
            SettingToggle::DailyReminder => "Ежедневное напоминание",
            SettingToggle::DarkTheme => "Тёмная тема",
        }
    }

    pub fn get(self, settings: &Settings) -> bool {
        match self {
            SettingToggle::Notifications => settings.notifications,
            SettingToggle::SoundEffects => settings.sound_effects,
            SettingToggle::AutoTranscription => settings.auto_transcription,
            SettingToggle::DailyReminder => settings.daily_reminder,
            SettingToggle::DarkTheme => settings.dark_theme,
        }
    }

    fn flip(self, settings: &mut Settings) {
        let slot = match self {
            SettingToggle::Notifications => &mut settings.notifications,
            SettingToggle::SoundEffects => &mut settings.sound_effects,
            SettingToggle::AutoTranscription => &mut settings.auto_transcription,
            SettingToggle::DailyReminder => &mut settings.daily_reminder,
            SettingToggle::DarkTheme => &mut settings.dark_theme,
        };
        *slot = !*slot;
    }
}

/// Observable user preferences persisted as one JSON document.
/// Every change is written straight away; storage failures are logged
/// and never reach the caller.
pub struct SettingsStore {
    path: PathBuf,
    tx: watch::Sender<Settings>,
}

impl SettingsStore {
    pub async fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let settings = read_settings(&path).await;
        let (tx, _rx) = watch::channel(settings);
        Self { path, tx }
    }

    pub fn get(&self) -> Settings {
        self.tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Settings> {
        self.tx.subscribe()
    }

    pub async fn set(&self, patch: SettingsPatch) -> Settings {
        self.tx.send_modify(|settings| patch.apply_to(settings));
        self.persist().await
    }

    pub async fn toggle(&self, key: SettingToggle) -> Settings {
        self.tx.send_modify(|settings| key.flip(settings));
        self.persist().await
    }

    async fn persist(&self) -> Settings {
        let settings = self.get();
        if let Err(e) = write_settings(&self.path, &settings).await {
            tracing::warn!("Failed to save settings to {}: {}", self.path.display(), e);
        }
        settings
    }
}

async fn read_settings(path: &Path) -> Settings {
    let raw = match tokio::fs::read_to_string(path).await {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Settings::default(),
        Err(e) => {
            tracing::warn!("Failed to load settings: {}", e);
            return Settings::default();
        }
    };

    let stored = match serde_json::from_str::<Value>(&raw) {
        Ok(Value::Object(stored)) => stored,
        Ok(_) => {
            tracing::warn!("Ignoring settings document that is not an object");
            return Settings::default();
        }
        Err(e) => {
            tracing::warn!("Ignoring unreadable settings document: {}", e);
            return Settings::default();
        }
    };

    merge_over_defaults(stored)
}

/// Overlays stored fields on the defaults one at a time, so a single
/// mistyped value only loses that field.
fn merge_over_defaults(stored: Map<String, Value>) -> Settings {
    let mut settings = Settings::default();
    for (key, value) in stored {
        let mut candidate = match serde_json::to_value(&settings) {
            Ok(Value::Object(fields)) => fields,
            _ => return settings,
        };
        candidate.insert(key.clone(), value);
        match serde_json::from_value(Value::Object(candidate)) {
            Ok(merged) => settings = merged,
            Err(e) => tracing::warn!("Ignoring stored setting {:?}: {}", key, e),
        }
    }
    settings
}

async fn write_settings(path: &Path, settings: &Settings) -> crate::error::Result<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    let content = serde_json::to_string(settings)?;
    tokio::fs::write(path, content).await?;
    Ok(())
}
