use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::app::{App, Item, RESERVED_LINES, visible_window};
use crate::util::unicode;

use super::helpers::{priority_badge, spans_width, status_icon};
use super::popups;
use super::push_highlighted_spans;

const HEADER: &str = "TADA - Todo Manager";
const HELP: &str =
    "j/k: move • space: expand • enter: edit • a: add • r: refresh • d: delete • q: quit";

/// Header, help line and the visible slice of rows. `area` excludes the
/// status row.
pub fn render_list_view(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let mut lines = vec![
        Line::from(Span::styled(HEADER, Style::default().add_modifier(Modifier::BOLD))),
        Line::from(Span::styled(HELP, Style::default().fg(theme.muted))),
        Line::from(""),
    ];

    let visible = app.visible_indices();
    if visible.is_empty() {
        let msg = if app.items.is_empty() {
            "No tasks found. Press 'a' to add a task."
        } else {
            "No tasks match the search."
        };
        lines.push(Line::from(Span::styled(msg, Style::default().fg(theme.muted))));
        frame.render_widget(Paragraph::new(lines), area);
        return;
    }

    let position = visible
        .iter()
        .position(|&i| i == app.selected)
        .unwrap_or(0);
    // The window is sized on the whole terminal, status row included
    let window = visible_window(visible.len(), position, area.height as usize + 1);
    let search_re = app.active_search_re();
    let width = area.width as usize;

    let mut selected_row = None;
    for (row, &index) in visible[window].iter().enumerate() {
        if index == app.selected {
            selected_row = Some(row);
        }
        lines.push(render_row(app, index, width, search_re.as_ref()));
    }
    frame.render_widget(Paragraph::new(lines), area);

    if app.show_details
        && let Some(row) = selected_row
        && let Some(record) = app.current_record()
    {
        let row_y = area.y + (RESERVED_LINES - 1) as u16 + row as u16;
        popups::render_details(frame, app, record, row_y, area);
    }
}

fn render_row(app: &App, index: usize, width: usize, search_re: Option<&regex::Regex>) -> Line<'static> {
    let theme = &app.theme;
    let item = &app.items[index];
    let mut spans: Vec<Span<'static>> = Vec::new();

    if !app.selection.is_empty() {
        if app.selection.contains(&index) {
            spans.push(Span::styled(
                "[✔] ",
                Style::default().fg(theme.warning).add_modifier(Modifier::BOLD),
            ));
        } else {
            spans.push(Span::raw("    "));
        }
    }

    match item {
        Item::Topic { topic } => {
            let icon = if app.expanded.contains(topic) { "▼" } else { "▶" };
            spans.push(Span::styled(
                format!("{icon} {topic}"),
                Style::default().fg(theme.accent).add_modifier(Modifier::BOLD),
            ));
        }
        Item::Task { topic, record } => {
            let task = &record.task;
            if !topic.is_empty() {
                spans.push(Span::raw("  "));
            }
            spans.push(Span::styled(
                status_icon(task.status),
                Style::default().fg(theme.status_color(task.status)),
            ));
            spans.push(Span::raw(" "));
            if let Some(badge) = priority_badge(task) {
                spans.push(Span::raw(badge));
            }
            let title = unicode::truncate_to_width(&task.title, width.saturating_sub(spans_width(&spans)));
            push_highlighted_spans(
                &mut spans,
                &title,
                Style::default().fg(theme.text),
                Style::default()
                    .fg(theme.search_match_fg)
                    .bg(theme.search_match_bg),
                search_re,
            );
        }
    }

    let line = Line::from(spans);
    if index == app.selected {
        line.style(Style::default().add_modifier(Modifier::REVERSED))
    } else {
        line
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::app::test_support::*;
    use crate::tui::render::test_helpers::*;

    fn draw(app: &App) -> String {
        render_to_string(TERM_W, TERM_H, |frame, area| {
            render_list_view(frame, app, area);
        })
    }

    #[test]
    fn empty_store_shows_hint() {
        let (_tmp, app) = app_with(&[]);
        let out = draw(&app);
        assert!(out.starts_with("TADA - Todo Manager\n"));
        assert!(out.contains("No tasks found. Press 'a' to add a task."));
    }

    #[test]
    fn topics_and_tasks_render_with_icons() {
        let (_tmp, mut app) = app_with(&["Work/Report", "Loose end"]);
        app.expanded.insert("Work".into());
        app.rebuild_items();
        let out = draw(&app);
        let rows: Vec<&str> = out.lines().skip(3).collect();
        assert_eq!(rows, vec!["▼ Work", "  ○ Report", "○ Loose end"]);
    }

    #[test]
    fn priority_badge_and_selection_markers() {
        let (_tmp, mut app) = app_with(&[]);
        crate::ops::task_ops::add(
            &app.store,
            "Urgent",
            crate::ops::task_ops::NewTask {
                priority: 1,
                ..Default::default()
            },
        )
        .unwrap();
        app.reload();
        app.toggle_selection();
        let out = draw(&app);
        assert!(out.contains("[✔] ○ [1] Urgent"), "{out}");
    }

    #[test]
    fn details_popup_sits_under_selected_row() {
        let (_tmp, mut app) = app_with(&["Buy milk"]);
        app.show_details = true;
        let out = draw(&app);
        let lines: Vec<&str> = out.lines().collect();
        assert!(lines[3].contains("Buy milk"));
        assert!(lines[5].contains("Task Details"), "{out}");
        assert!(out.contains("Title: Buy milk"));
        assert!(out.contains("(Press esc/i to close)"));
    }

    #[test]
    fn long_lists_scroll_with_selection() {
        let names: Vec<String> = (0..40).map(|i| format!("task {i:02}")).collect();
        let refs: Vec<&str> = names.iter().map(String::as_str).collect();
        let (_tmp, mut app) = app_with(&refs);
        app.selected = 39;
        // the list area is the terminal minus the status row
        let out = render_to_string(TERM_W, TERM_H - 1, |frame, area| {
            render_list_view(frame, &app, area);
        });
        assert!(out.contains("task 39"));
        assert!(!out.contains("task 00"));
        // header, help, spacer and 20 rows
        assert_eq!(out.lines().count(), 23);
    }
}
