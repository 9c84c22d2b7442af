use crossterm::event::{KeyCode, KeyEvent};

use crate::ops::export::ExportFormat;
use crate::tui::app::{App, ExportPrompt};
use crate::util::unicode;

use super::*;

/// Step 1 picks a format with 1/2/3, step 2 reads a path until enter.
pub(super) fn handle_export_prompt(app: &mut App, key: KeyEvent) {
    let Some(prompt) = app.export_prompt.take() else {
        return;
    };
    if key.code == KeyCode::Esc {
        return;
    }
    app.export_prompt = match prompt {
        ExportPrompt::Format => {
            let format = match key.code {
                KeyCode::Char('1') => Some(ExportFormat::Csv),
                KeyCode::Char('2') => Some(ExportFormat::Json),
                KeyCode::Char('3') => Some(ExportFormat::Markdown),
                _ => None,
            };
            Some(match format {
                Some(format) => ExportPrompt::Path {
                    format,
                    path: String::new(),
                },
                None => ExportPrompt::Format,
            })
        }
        ExportPrompt::Path { format, mut path } => match key.code {
            KeyCode::Enter if !path.is_empty() => {
                app.export_selected(format, &path);
                None
            }
            KeyCode::Backspace => {
                unicode::pop_grapheme(&mut path);
                Some(ExportPrompt::Path { format, path })
            }
            _ => {
                if let Some(c) = typed_char(&key) {
                    path.push(c);
                }
                Some(ExportPrompt::Path { format, path })
            }
        },
    };
}
