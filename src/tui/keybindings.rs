use crossterm::event::{KeyCode, KeyEvent};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    CloseWindow,
    MoveUp,
    MoveDown,
    MoveTop,
    MoveBottom,
    Complete,
    OpenFilter,
    ToggleSort,
    Reload,
    OpenInEditor,
    Help,
    Cancel,
    Submit,
    Backspace,
    Char(char),
}

pub struct KeyBindings;

impl KeyBindings {
    pub fn handle_normal(key: KeyEvent) -> Option<Action> {
        match key.code {
            // Close the top window, quitting on the last one
            KeyCode::Char('q') | KeyCode::Esc => Some(Action::CloseWindow),

            // Navigation
            KeyCode::Char('j') | KeyCode::Down => Some(Action::MoveDown),
            KeyCode::Char('k') | KeyCode::Up => Some(Action::MoveUp),
            KeyCode::Char('g') | KeyCode::Home => Some(Action::MoveTop),
            KeyCode::Char('G') | KeyCode::End => Some(Action::MoveBottom),

            // Actions
            KeyCode::Char('x') | KeyCode::Enter => Some(Action::Complete),
            KeyCode::Char('/') => Some(Action::OpenFilter),
            KeyCode::Char('s') => Some(Action::ToggleSort),
            KeyCode::Char('r') => Some(Action::Reload),
            KeyCode::Char('o') => Some(Action::OpenInEditor),
            KeyCode::Char('?') => Some(Action::Help),

            _ => None,
        }
    }

    pub fn handle_input(key: KeyEvent) -> Option<Action> {
        match key.code {
            KeyCode::Esc => Some(Action::Cancel),
            KeyCode::Enter => Some(Action::Submit),
            KeyCode::Backspace => Some(Action::Backspace),
            KeyCode::Char(c) => Some(Action::Char(c)),
            _ => None,
        }
    }

    pub fn handle_help(_key: KeyEvent) -> Option<Action> {
        // Any key closes help
        Some(Action::Cancel)
    }
}
