use crossterm::event::{KeyCode, KeyEvent};

use crate::tui::app::App;
use crate::tui::form::FormField;
use crate::util::unicode;

use super::*;

pub(super) fn handle_form(app: &mut App, key: KeyEvent) {
    if key.code == KeyCode::Esc || is_ctrl(&key, 'c') {
        app.close_form();
        return;
    }
    if key.code == KeyCode::Enter {
        match app.form_mut().map(|f| f.focus) {
            Some(FormField::Save) => app.submit_form(),
            Some(FormField::Cancel) => app.close_form(),
            _ => {}
        }
        return;
    }

    let Some(form) = app.form_mut() else {
        return;
    };
    match key.code {
        KeyCode::Tab => form.focus = form.focus.next(),
        KeyCode::BackTab => form.focus = form.focus.prev(),
        KeyCode::Left => form.adjust(false),
        KeyCode::Right => form.adjust(true),
        // h/l step status and priority; elsewhere they are just letters
        KeyCode::Char('h') if matches!(form.focus, FormField::Status | FormField::Priority) => {
            form.adjust(false)
        }
        KeyCode::Char('l') if matches!(form.focus, FormField::Status | FormField::Priority) => {
            form.adjust(true)
        }
        KeyCode::Backspace => form.backspace(),
        _ if is_ctrl(&key, 'w') => {
            let focus = form.focus;
            let text = match focus {
                FormField::Title => &mut form.title,
                FormField::Description => &mut form.description,
                FormField::Tags => &mut form.tags,
                _ => return,
            };
            unicode::pop_word(text);
        }
        _ => {
            if let Some(c) = typed_char(&key) {
                form.push_char(c);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::model::task::TaskStatus;
    use crate::tui::app::Mode;
    use crate::tui::app::test_support::*;
    use crate::tui::form::FormField;
    use crate::tui::input::test_keys::*;
    use crossterm::event::KeyCode;

    fn tab_to(app: &mut crate::tui::app::App, field: FormField) {
        for _ in 0..7 {
            if app.form_mut().unwrap().focus == field {
                return;
            }
            press(app, KeyCode::Tab);
        }
        panic!("field {field:?} not reachable");
    }

    #[test]
    fn add_form_end_to_end() {
        let (_tmp, mut app) = app_with(&[]);
        press_char(&mut app, 'a');
        type_str(&mut app, "Home/Fix sink");
        press(&mut app, KeyCode::Tab);
        type_str(&mut app, "call plumber");
        press(&mut app, KeyCode::Tab);
        press_char(&mut app, 'l');
        press(&mut app, KeyCode::Tab);
        press_char(&mut app, 'l');
        press(&mut app, KeyCode::Tab);
        type_str(&mut app, "house, urgent");
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.mode, Mode::List);
        let record = &app.tasks["Home"][0];
        assert_eq!(record.task.title, "Fix sink");
        assert_eq!(record.task.description, "call plumber");
        assert_eq!(record.task.priority, 4);
        assert_eq!(record.task.status, TaskStatus::InProgress);
        assert_eq!(record.task.tags, vec!["house", "urgent"]);
    }

    #[test]
    fn h_and_l_are_text_in_title() {
        let (_tmp, mut app) = app_with(&[]);
        press_char(&mut app, 'a');
        type_str(&mut app, "hello");
        assert_eq!(app.form_mut().unwrap().title, "hello");
        press(&mut app, KeyCode::BackTab);
        assert_eq!(app.form_mut().unwrap().focus, FormField::Cancel);
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.mode, Mode::List);
        assert!(app.tasks.is_empty());
    }

    #[test]
    fn esc_discards_edits() {
        let (_tmp, mut app) = app_with(&["Keep"]);
        press(&mut app, KeyCode::Enter);
        type_str(&mut app, " me");
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.mode, Mode::List);
        assert_eq!(titles(&app), vec!["Keep"]);
    }

    #[test]
    fn edit_form_saves_in_place() {
        let (_tmp, mut app) = app_with(&["Draft"]);
        let path = app.current_record().unwrap().file_path.clone();
        press(&mut app, KeyCode::Enter);
        tab_to(&mut app, FormField::Status);
        press(&mut app, KeyCode::Left);
        tab_to(&mut app, FormField::Save);
        press(&mut app, KeyCode::Enter);
        let task = app.store.read(&path).unwrap();
        assert_eq!(task.title, "Draft");
        assert_eq!(task.status, TaskStatus::Cancelled);
    }

    #[test]
    fn enter_on_text_field_does_nothing() {
        let (_tmp, mut app) = app_with(&[]);
        press_char(&mut app, 'a');
        press(&mut app, KeyCode::Enter);
        assert!(matches!(app.mode, Mode::Add { .. }));
    }
}
