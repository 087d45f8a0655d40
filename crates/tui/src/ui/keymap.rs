use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppAction {
    Quit,
    NextField,
    PrevField,
    Backspace,
    Split,
    Import,
    Input(char),
    None,
}

pub fn map_key(key: KeyEvent) -> AppAction {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        if let KeyCode::Char('c') = key.code {
            return AppAction::Quit;
        }
        return AppAction::None;
    }

    match key.code {
        KeyCode::Char('q') => AppAction::Quit,
        KeyCode::Char('s') => AppAction::Split,
        KeyCode::Char('i') => AppAction::Import,
        KeyCode::Tab | KeyCode::Down => AppAction::NextField,
        KeyCode::BackTab | KeyCode::Up => AppAction::PrevField,
        KeyCode::Backspace => AppAction::Backspace,
        KeyCode::Char(ch @ ('0'..='9' | '.' | ',' | '-')) => AppAction::Input(ch),
        _ => AppAction::None,
    }
}
