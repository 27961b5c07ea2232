use std::io;
use std::sync::Arc;
use std::time::Duration;

use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use crossterm::event::KeyEventKind;
use ratatui::prelude::*;

mod app;
mod config;
mod db;
mod error;
mod models;
mod settings;
mod tui;

use app::App;
use config::Config;
use db::{DataStore, SeedOutcome};
use error::Result;
use settings::SettingsStore;
use tui::{draw, handle_key_event};

enum Command {
    Interactive,
    Seed,
    List,
    Vocab(Option<String>),
}

fn parse_args(args: &[String]) -> Result<Command> {
    match args.get(1).map(String::as_str) {
        None => Ok(Command::Interactive),
        Some("--seed") => Ok(Command::Seed),
        Some("--list") => Ok(Command::List),
        Some("--vocab") => Ok(Command::Vocab(args.get(2).cloned())),
        Some(other) => Err(anyhow::anyhow!(
            "unknown argument {other:?} (expected --seed, --list or --vocab [category])"
        )
        .into()),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging (only show warnings and errors by default)
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();
    let command = parse_args(&args)?;

    let config = Config::load()?;
    let store = Arc::new(DataStore::new(&config.db_path));

    match command {
        Command::Seed => {
            match store.seed_if_empty().await? {
                SeedOutcome::Seeded(report) => println!(
                    "Seeded {} textbooks, {} lessons, {} words",
                    report.textbooks, report.lessons, report.vocabulary
                ),
                SeedOutcome::AlreadyPopulated => println!("Database already populated"),
            }
            let counts = store.counts().await?;
            println!(
                "{} textbooks | {} lessons | {} words | {} links",
                counts.textbooks, counts.lessons, counts.vocabulary, counts.links
            );
            return Ok(());
        }
        Command::List => {
            store.seed_if_empty().await?;
            for textbook in store.list_textbooks().await? {
                println!("{} ({})", textbook.title, textbook.level.as_deref().unwrap_or("-"));
                for lesson in store.list_lessons_for_textbook(textbook.id).await? {
                    println!(
                        "  {:>2}. {} | {} | {} turns",
                        lesson.number,
                        lesson.subtitle.as_deref().unwrap_or(&lesson.title),
                        lesson.difficulty.as_deref().unwrap_or("-"),
                        lesson.turn_count
                    );
                }
            }
            return Ok(());
        }
        Command::Vocab(category) => {
            store.seed_if_empty().await?;
            for word in store.list_vocabulary_by_category(category.as_deref()).await? {
                println!(
                    "{}\t{}\t{}\t{}",
                    word.arabic,
                    word.transcription.as_deref().unwrap_or(""),
                    word.translation_ru,
                    word.part_of_speech.as_deref().unwrap_or("")
                );
            }
            return Ok(());
        }
        Command::Interactive => {}
    }

    // Initialize app; storage failures leave it in a not-ready state
    let settings = SettingsStore::load(&config.settings_path).await;
    let mut app = App::new(Arc::clone(&store), settings, &config.default_category).await;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the app
    let result = run_app(&mut terminal, &mut app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(e) = result {
        eprintln!("Error: {}", e);
    }

    Ok(())
}

async fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    loop {
        app.sync_settings();
        terminal.draw(|frame| draw(frame, app))?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    if let Some(action) = handle_key_event(key, app.search_active, app.show_help) {
                        let should_quit = app.handle_action(action).await?;
                        if should_quit {
                            return Ok(());
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn parses_headless_flags() {
        assert!(matches!(parse_args(&args(&["bin"])), Ok(Command::Interactive)));
        assert!(matches!(parse_args(&args(&["bin", "--seed"])), Ok(Command::Seed)));
        assert!(matches!(
            parse_args(&args(&["bin", "--vocab", "noun"])),
            Ok(Command::Vocab(Some(ref c))) if c == "noun"
        ));
        assert!(matches!(parse_args(&args(&["bin", "--vocab"])), Ok(Command::Vocab(None))));
        assert!(parse_args(&args(&["bin", "--import"])).is_err());
    }
}
