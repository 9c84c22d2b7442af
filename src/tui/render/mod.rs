pub mod form_view;
pub mod helpers;
pub mod list_view;
pub mod popups;
pub mod status_row;

#[cfg(test)]
pub mod test_helpers;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::Style;
use ratatui::text::Span;
use regex::Regex;

use super::app::{App, Mode};

/// Main render function, dispatches to sub-renderers
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    // Layout: content | status row (1 row)
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(area);

    match &app.mode {
        Mode::List => {
            list_view::render_list_view(frame, app, chunks[0]);
            if app.pending_delete.is_some() {
                popups::render_delete_confirm(frame, app, area);
            }
            if app.export_prompt.is_some() {
                popups::render_export_prompt(frame, app, area);
            }
        }
        Mode::Edit { form, .. } => form_view::render_form_view(frame, app, form, false, chunks[0]),
        Mode::Add { form } => form_view::render_form_view(frame, app, form, true, chunks[0]),
    }

    status_row::render_status_row(frame, app, chunks[1]);
}

/// Push spans for text with regex match highlighting. If no regex or no matches,
/// pushes a single span with `base_style`. Otherwise splits text at match boundaries.
pub(super) fn push_highlighted_spans<'a>(
    spans: &mut Vec<Span<'a>>,
    text: &str,
    base_style: Style,
    highlight_style: Style,
    search_re: Option<&Regex>,
) {
    let Some(re) = search_re else {
        spans.push(Span::styled(text.to_string(), base_style));
        return;
    };

    let mut last_end = 0;
    for m in re.find_iter(text) {
        if m.start() > last_end {
            spans.push(Span::styled(text[last_end..m.start()].to_string(), base_style));
        }
        if m.end() > m.start() {
            spans.push(Span::styled(m.as_str().to_string(), highlight_style));
        }
        last_end = m.end();
    }
    if last_end < text.len() || text.is_empty() {
        spans.push(Span::styled(text[last_end..].to_string(), base_style));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn highlight_splits_on_matches() {
        let re = Regex::new("(?i)mi").unwrap();
        let mut spans = Vec::new();
        let base = Style::default();
        let hl = Style::default().bg(ratatui::style::Color::Cyan);
        push_highlighted_spans(&mut spans, "Buy MILK mid", base, hl, Some(&re));
        let parts: Vec<_> = spans.iter().map(|s| s.content.as_ref()).collect();
        assert_eq!(parts, vec!["Buy ", "MI", "LK ", "mi", "d"]);
        assert_eq!(spans[1].style, hl);
    }

    #[test]
    fn no_regex_is_one_span() {
        let mut spans = Vec::new();
        push_highlighted_spans(&mut spans, "plain", Style::default(), Style::default(), None);
        assert_eq!(spans.len(), 1);
    }
}
