use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::layout::Direction;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppAction {
    Quit,
    Move(Direction),
    MoveToTop,
    MoveToBottom,
    RefreshFeed,
    OpenLink,
    MoreColumns,
    FewerColumns,
    ShowHelp,
    HideHelp,
}

pub fn handle_key_event(key: KeyEvent, show_help: bool) -> Option<AppAction> {
    // If help is showing, any key closes it
    if show_help {
        return Some(AppAction::HideHelp);
    }

    match (key.code, key.modifiers) {
        (KeyCode::Char('q'), _) | (KeyCode::Esc, _) => Some(AppAction::Quit),
        (KeyCode::Char('c'), KeyModifiers::CONTROL) => Some(AppAction::Quit),

        (KeyCode::Char('k'), _) | (KeyCode::Up, _) => Some(AppAction::Move(Direction::Up)),
        (KeyCode::Char('j'), _) | (KeyCode::Down, _) => Some(AppAction::Move(Direction::Down)),
        (KeyCode::Char('h'), _) | (KeyCode::Left, _) => Some(AppAction::Move(Direction::Left)),
        (KeyCode::Char('l'), _) | (KeyCode::Right, _) => Some(AppAction::Move(Direction::Right)),
        (KeyCode::Char('<'), _) | (KeyCode::Home, _) => Some(AppAction::MoveToTop),
        (KeyCode::Char('>'), _) | (KeyCode::End, _) => Some(AppAction::MoveToBottom),

        (KeyCode::Char('r'), _) => Some(AppAction::RefreshFeed),
        (KeyCode::Char('o'), _) | (KeyCode::Enter, _) => Some(AppAction::OpenLink),
        (KeyCode::Char('+'), _) | (KeyCode::Char('='), _) => Some(AppAction::MoreColumns),
        (KeyCode::Char('-'), _) => Some(AppAction::FewerColumns),

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
    fn any_key_closes_help() {
        assert_eq!(
            handle_key_event(key(KeyCode::Char('q')), true),
            Some(AppAction::HideHelp)
        );
    }

    #[test]
    fn arrows_and_vim_keys_move() {
        assert_eq!(
            handle_key_event(key(KeyCode::Down), false),
            Some(AppAction::Move(Direction::Down))
        );
        assert_eq!(
            handle_key_event(key(KeyCode::Char('h')), false),
            Some(AppAction::Move(Direction::Left))
        );
    }

    #[test]
    fn ctrl_c_quits() {
        let event = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(handle_key_event(event, false), Some(AppAction::Quit));
    }

    #[test]
    fn unbound_key_does_nothing() {
        assert_eq!(handle_key_event(key(KeyCode::Char('z')), false), None);
    }
}
