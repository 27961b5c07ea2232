use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::Tab;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppAction {
    Quit,
    NextTab,
    SelectTab(Tab),
    MoveUp,
    MoveDown,
    PrevTextbook,
    NextTextbook,
    Activate,
    CycleCategory,
    ToggleTranscription,
    CycleFont,
    Reconnect,
    ShowHelp,
    HideHelp,
    // Search input actions
    SearchStart,
    SearchChar(char),
    SearchBackspace,
    SearchConfirm,
    SearchCancel,
}

pub fn handle_key_event(key: KeyEvent, search_active: bool, show_help: bool) -> Option<AppAction> {
    // If help is showing, any key closes it
    if show_help {
        return Some(AppAction::HideHelp);
    }

    // Search input mode
    if search_active {
        return match key.code {
            KeyCode::Enter => Some(AppAction::SearchConfirm),
            KeyCode::Esc => Some(AppAction::SearchCancel),
            KeyCode::Backspace => Some(AppAction::SearchBackspace),
            KeyCode::Char(c) => Some(AppAction::SearchChar(c)),
            _ => None,
        };
    }

    // Normal mode
    match (key.code, key.modifiers) {
        (KeyCode::Char('q'), _) => Some(AppAction::Quit),
        (KeyCode::Char('c'), KeyModifiers::CONTROL) => Some(AppAction::Quit),

        (KeyCode::Tab, _) => Some(AppAction::NextTab),
        (KeyCode::Char('1'), _) => Some(AppAction::SelectTab(Tab::Lessons)),
        (KeyCode::Char('2'), _) => Some(AppAction::SelectTab(Tab::Vocabulary)),
        (KeyCode::Char('3'), _) => Some(AppAction::SelectTab(Tab::Settings)),

        (KeyCode::Char('j'), _) | (KeyCode::Down, _) => Some(AppAction::MoveDown),
        (KeyCode::Char('k'), _) | (KeyCode::Up, _) => Some(AppAction::MoveUp),
        (KeyCode::Char('['), _) => Some(AppAction::PrevTextbook),
        (KeyCode::Char(']'), _) => Some(AppAction::NextTextbook),

        (KeyCode::Enter, _) | (KeyCode::Char(' '), _) => Some(AppAction::Activate),

        (KeyCode::Char('c'), _) => Some(AppAction::CycleCategory),
        (KeyCode::Char('t'), _) => Some(AppAction::ToggleTranscription),
        (KeyCode::Char('f'), _) => Some(AppAction::CycleFont),
        (KeyCode::Char('r'), _) => Some(AppAction::Reconnect),
        (KeyCode::Char('/'), _) => Some(AppAction::SearchStart),

        (KeyCode::Char('?'), _) => Some(AppAction::ShowHelp),

        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn help_swallows_every_key() {
        assert_eq!(handle_key_event(key(KeyCode::Char('q')), false, true), Some(AppAction::HideHelp));
    }

    #[test]
    fn search_mode_captures_characters() {
        assert_eq!(
            handle_key_event(key(KeyCode::Char('q')), true, false),
            Some(AppAction::SearchChar('q'))
        );
        assert_eq!(handle_key_event(key(KeyCode::Esc), true, false), Some(AppAction::SearchCancel));
        assert_eq!(handle_key_event(key(KeyCode::Tab), true, false), None);
    }

    #[test]
    fn ctrl_c_quits_but_plain_c_cycles_category() {
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(handle_key_event(ctrl_c, false, false), Some(AppAction::Quit));
        assert_eq!(handle_key_event(key(KeyCode::Char('c')), false, false), Some(AppAction::CycleCategory));
    }

    #[test]
    fn number_keys_select_tabs() {
        assert_eq!(
            handle_key_event(key(KeyCode::Char('3')), false, false),
            Some(AppAction::SelectTab(Tab::Settings))
        );
    }
}
