use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::tui::app::{App, ExportPrompt};

use super::*;

pub(super) fn handle_navigate(app: &mut App, key: KeyEvent) {
    if is_ctrl(&key, 'c') {
        app.quit();
        return;
    }
    if key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) {
        return;
    }

    match key.code {
        KeyCode::Char('q') => app.quit(),

        KeyCode::Char('j') | KeyCode::Down => app.move_down(),
        KeyCode::Char('k') | KeyCode::Up => app.move_up(),
        KeyCode::Char(' ') | KeyCode::Enter => app.activate(),

        KeyCode::Char('/') => app.set_search(Some(String::new())),
        KeyCode::Char('i') => app.show_details = !app.show_details,
        KeyCode::Esc => handle_escape(app),

        KeyCode::Char('a') => app.open_add(),
        KeyCode::Char('e') => {
            if let Some(record) = app.current_record().cloned() {
                app.open_edit(record);
            }
        }
        KeyCode::Char('r') => {
            app.reload();
            app.status_message = None;
        }

        KeyCode::Char('y') => app.yank(),
        KeyCode::Char('p') => app.paste(),
        KeyCode::Char('d') => {
            if app.selection.is_empty() {
                app.request_delete();
            } else {
                app.delete_selected();
            }
        }
        KeyCode::Char('s') => app.cycle_status(true),
        KeyCode::Char('S') => app.cycle_status(false),
        KeyCode::Char('u') => app.undo(),

        KeyCode::Char('v') => app.toggle_selection(),
        KeyCode::Char('V') => app.range_selection(),
        KeyCode::Char('x') => {
            if !app.selection.is_empty() {
                app.export_prompt = Some(ExportPrompt::Format);
            }
        }
        _ => {}
    }
}
