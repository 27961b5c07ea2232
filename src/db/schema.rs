/// Storage file name. A schema change ships under a new file name.
pub const DB_FILE_NAME: &str = "bayna_yadayk.db";

pub const SCHEMA: &str = r#"
-- textbooks table
CREATE TABLE IF NOT EXISTS textbooks (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL,
    description TEXT,
    level TEXT,
    order_index INTEGER NOT NULL DEFAULT 0
);

-- lessons table
CREATE TABLE IF NOT EXISTS lessons (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    textbook_id INTEGER NOT NULL REFERENCES textbooks(id) ON DELETE CASCADE,
    number INTEGER NOT NULL,
    title TEXT NOT NULL,
    subtitle TEXT,
    content TEXT,
    audio_url TEXT,
    order_index INTEGER NOT NULL DEFAULT 0
);

CREATE INDEX IF NOT EXISTS idx_lessons_textbook_id ON lessons(textbook_id);

-- vocabulary table
CREATE TABLE IF NOT EXISTS vocabulary (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    arabic TEXT NOT NULL,
    transcription TEXT,
    translation_ru TEXT NOT NULL,
    translation_lang TEXT NOT NULL DEFAULT 'ru',
    part_of_speech TEXT,
    notes TEXT,
    audio_url TEXT
);

CREATE INDEX IF NOT EXISTS idx_vocabulary_part_of_speech ON vocabulary(part_of_speech);

-- lesson_vocabulary join table
CREATE TABLE IF NOT EXISTS lesson_vocabulary (
    lesson_id INTEGER NOT NULL REFERENCES lessons(id) ON DELETE CASCADE,
    vocabulary_id INTEGER NOT NULL REFERENCES vocabulary(id) ON DELETE CASCADE,
    order_index INTEGER NOT NULL DEFAULT 0,
    PRIMARY KEY (lesson_id, vocabulary_id)
);

CREATE INDEX IF NOT EXISTS idx_lesson_vocabulary_vocabulary_id ON lesson_vocabulary(vocabulary_id);
"#;
