mod confirm;
mod export;
mod form;
mod navigate;
mod search;
mod select;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::app::{App, Mode};

// Submodules reach each other's handlers via `use super::*;`
#[allow(unused_imports)]
use confirm::*;
#[allow(unused_imports)]
use export::*;
#[allow(unused_imports)]
use form::*;
#[allow(unused_imports)]
use navigate::*;
#[allow(unused_imports)]
use search::*;
#[allow(unused_imports)]
use select::*;

/// Handle a key event in the current mode
pub fn handle_key(app: &mut App, key: KeyEvent) {
    // Ignore bare modifier key presses (Shift, Ctrl, Alt, etc.)
    if matches!(key.code, KeyCode::Modifier(_)) {
        return;
    }
    app.error = None;
    let key = normalize_key(key);

    // Export prompt intercepts all input
    if app.export_prompt.is_some() {
        handle_export_prompt(app, key);
        return;
    }

    match app.mode {
        Mode::List => {
            if app.pending_delete.is_some() {
                handle_confirm(app, key);
            } else if app.search.is_some() && handle_search(app, key) {
                // consumed by the search prompt
            } else {
                handle_navigate(app, key);
            }
        }
        Mode::Edit { .. } | Mode::Add { .. } => handle_form(app, key),
    }
}

/// Shifted letters arrive either as uppercase with SHIFT or as uppercase
/// alone depending on the terminal. Drop SHIFT so both match the same arm.
pub(super) fn normalize_key(mut key: KeyEvent) -> KeyEvent {
    if let KeyCode::Char(c) = key.code
        && key.modifiers.contains(KeyModifiers::SHIFT)
    {
        key.code = KeyCode::Char(c.to_ascii_uppercase());
        key.modifiers.remove(KeyModifiers::SHIFT);
    }
    key
}

/// A character meant as text input, not a shortcut
pub(super) fn typed_char(key: &KeyEvent) -> Option<char> {
    match key.code {
        KeyCode::Char(c) if key.modifiers.difference(KeyModifiers::SHIFT).is_empty() => Some(c),
        _ => None,
    }
}

pub(super) fn is_ctrl(key: &KeyEvent, c: char) -> bool {
    key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char(c)
}

#[cfg(test)]
pub(crate) mod test_keys {
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    use super::handle_key;
    use crate::tui::app::App;

    pub fn press(app: &mut App, code: KeyCode) {
        handle_key(app, KeyEvent::new(code, KeyModifiers::NONE));
    }

    pub fn press_char(app: &mut App, c: char) {
        press(app, KeyCode::Char(c));
    }

    pub fn type_str(app: &mut App, s: &str) {
        for c in s.chars() {
            press_char(app, c);
        }
    }

    pub fn press_ctrl(app: &mut App, c: char) {
        handle_key(app, KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shifted_letters_normalize() {
        let key = normalize_key(KeyEvent::new(KeyCode::Char('s'), KeyModifiers::SHIFT));
        assert_eq!(key.code, KeyCode::Char('S'));
        assert_eq!(key.modifiers, KeyModifiers::NONE);
        let key = normalize_key(KeyEvent::new(KeyCode::Char('V'), KeyModifiers::NONE));
        assert_eq!(key.code, KeyCode::Char('V'));
    }

    #[test]
    fn ctrl_chars_are_not_text() {
        let key = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(typed_char(&key), None);
        assert!(is_ctrl(&key, 'c'));
        let key = KeyEvent::new(KeyCode::Char('x'), KeyModifiers::NONE);
        assert_eq!(typed_char(&key), Some('x'));
    }
}
