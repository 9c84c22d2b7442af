use ratatui::Terminal;
use ratatui::backend::TestBackend;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;

use crate::tui::app::App;

pub const TERM_W: u16 = 80;
pub const TERM_H: u16 = 24;

/// Plain text of a buffer, one line per row, with trailing spaces and
/// trailing empty rows removed.
pub fn buffer_text(buf: &Buffer) -> String {
    let Rect { width, height, .. } = buf.area;
    let mut rows: Vec<String> = (0..height)
        .map(|y| {
            let row: String = (0..width).map(|x| buf[(x, y)].symbol()).collect();
            row.trim_end().to_string()
        })
        .collect();
    while rows.last().is_some_and(|r| r.is_empty()) {
        rows.pop();
    }
    rows.join("\n")
}

/// Draw with `f` into a `w`×`h` test terminal and return its text.
pub fn render_to_string<F>(w: u16, h: u16, f: F) -> String
where
    F: FnOnce(&mut ratatui::Frame, Rect),
{
    let mut terminal = Terminal::new(TestBackend::new(w, h)).unwrap();
    terminal
        .draw(|frame| {
            let area = frame.area();
            f(frame, area);
        })
        .unwrap();
    buffer_text(terminal.backend().buffer())
}

/// The whole screen as the event loop would draw it.
pub fn render_app(app: &App, w: u16, h: u16) -> String {
    render_to_string(w, h, |frame, _| super::render(frame, app))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::app::test_support::*;
    use ratatui::widgets::Paragraph;

    #[test]
    fn text_drops_trailing_blanks() {
        let out = render_to_string(10, 4, |frame, area| {
            frame.render_widget(Paragraph::new("hi  \n\nthere"), area);
        });
        assert_eq!(out, "hi\n\nthere");
    }

    #[test]
    fn full_screen_puts_status_on_last_row() {
        let (_tmp, mut app) = app_with(&["Buy milk"]);
        app.status_message = Some("Task deleted. Press 'u' to undo.".into());
        let out = render_app(&app, TERM_W, TERM_H);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), TERM_H as usize);
        assert!(lines[0].contains("TADA - Todo Manager"));
        assert!(out.contains("Buy milk"));
        assert_eq!(lines[TERM_H as usize - 1], "Task deleted. Press 'u' to undo.");
    }

    #[test]
    fn full_screen_overlays_delete_confirm() {
        let (_tmp, mut app) = app_with(&["Buy milk"]);
        select_title(&mut app, "Buy milk");
        app.request_delete();
        let out = render_app(&app, TERM_W, TERM_H);
        assert!(out.contains("Delete task 'Buy milk'? (y/n)"));
    }
}
