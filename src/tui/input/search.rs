use crossterm::event::{KeyCode, KeyEvent};

use crate::tui::app::App;
use crate::util::unicode;

use super::*;

/// Feed a key to the live search prompt. Returns false for keys the prompt
/// does not use, which then fall through to list navigation.
pub(super) fn handle_search(app: &mut App, key: KeyEvent) -> bool {
    let Some(mut query) = app.search.take() else {
        return false;
    };
    let consumed = match key.code {
        KeyCode::Esc => {
            app.set_search(None);
            return true;
        }
        KeyCode::Backspace => {
            unicode::pop_grapheme(&mut query);
            true
        }
        _ if is_ctrl(&key, 'w') => {
            unicode::pop_word(&mut query);
            true
        }
        _ => match typed_char(&key) {
            Some(c) => {
                query.push(c);
                true
            }
            None => false,
        },
    };
    app.set_search(Some(query));
    consumed
}

#[cfg(test)]
mod tests {
    use crate::tui::app::test_support::*;
    use crate::tui::input::test_keys::*;
    use crossterm::event::KeyCode;

    #[test]
    fn typing_builds_query_and_filters() {
        let (_tmp, mut app) = app_with(&["Buy milk", "Call mum"]);
        press_char(&mut app, '/');
        type_str(&mut app, "mux");
        assert_eq!(app.search.as_deref(), Some("mux"));
        press(&mut app, KeyCode::Backspace);
        assert_eq!(app.search.as_deref(), Some("mu"));
        assert_eq!(app.visible_indices().len(), 1);
        assert_eq!(app.current_record().unwrap().task.title, "Call mum");
    }

    #[test]
    fn letters_do_not_trigger_shortcuts_while_searching() {
        let (_tmp, mut app) = app_with(&["a"]);
        press_char(&mut app, '/');
        press_char(&mut app, 'q');
        press_char(&mut app, 'd');
        assert!(!app.should_quit);
        assert!(app.pending_delete.is_none());
        assert_eq!(app.search.as_deref(), Some("qd"));
    }

    #[test]
    fn arrows_and_enter_fall_through() {
        let (_tmp, mut app) = app_with(&["Work/Report"]);
        press_char(&mut app, '/');
        press(&mut app, KeyCode::Enter);
        assert_eq!(titles(&app), vec!["[Work]", "Report"]);
        press(&mut app, KeyCode::Down);
        assert_eq!(app.selected, 1);
        assert_eq!(app.search.as_deref(), Some(""));
    }

    #[test]
    fn ctrl_w_drops_a_word_and_esc_clears() {
        let (_tmp, mut app) = app_with(&["a"]);
        press_char(&mut app, '/');
        type_str(&mut app, "buy milk");
        press_ctrl(&mut app, 'w');
        assert_eq!(app.search.as_deref(), Some("buy "));
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.search, None);
    }
}
