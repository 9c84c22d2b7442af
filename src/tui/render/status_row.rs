use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::app::App;
use crate::util::unicode;

/// Render the status row (bottom of screen)
pub fn render_status_row(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let width = area.width as usize;

    let (mut spans, hint) = if let Some(err) = &app.error {
        (
            vec![Span::styled(format!("Error: {err}"), Style::default().fg(theme.error))],
            None,
        )
    } else if let Some(query) = &app.search {
        // Search prompt: /query▌
        (
            vec![
                Span::raw(format!("/{query}")),
                Span::styled("\u{258C}", Style::default().fg(theme.warning)),
            ],
            Some("esc clear"),
        )
    } else if let Some(msg) = &app.status_message {
        (
            vec![Span::styled(msg.clone(), Style::default().fg(theme.warning))],
            None,
        )
    } else if !app.selection.is_empty() {
        (
            vec![Span::styled(
                format!("{} selected", app.selection.len()),
                Style::default().fg(theme.warning),
            )],
            Some("d delete  s cycle  x export  esc clear"),
        )
    } else {
        (Vec::new(), None)
    };

    if let Some(hint) = hint {
        let content_width: usize = spans.iter().map(|s| unicode::display_width(&s.content)).sum();
        let hint_width = unicode::display_width(hint);
        if content_width + hint_width < width {
            spans.push(Span::raw(" ".repeat(width - content_width - hint_width)));
            spans.push(Span::styled(hint, Style::default().fg(theme.muted)));
        }
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
