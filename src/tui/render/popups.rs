use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Clear, Paragraph};

use crate::model::task::TaskRecord;
use crate::tui::app::{App, ExportPrompt};

use super::helpers::centered_rect_fixed;

const POPUP_WIDTH: u16 = 50;

fn popup_block(border: Style) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(border)
}

/// Task details drawn just below the row at `row_y`, or above it when there
/// is no room underneath.
pub fn render_details(frame: &mut Frame, app: &App, record: &TaskRecord, row_y: u16, area: Rect) {
    let theme = &app.theme;
    let task = &record.task;
    let label = Style::default().fg(theme.warning).add_modifier(Modifier::BOLD);
    let field = |name: &'static str, value: String| {
        Line::from(vec![Span::styled(name, label), Span::raw(value)])
    };

    let lines = vec![
        Line::from(Span::styled(
            "Task Details",
            Style::default().fg(theme.accent).add_modifier(Modifier::BOLD),
        )),
        field("Title: ", task.title.clone()),
        field("Description: ", task.description.clone()),
        field("Priority: ", task.priority.to_string()),
        field("Status: ", task.status.to_string()),
        field("Tags: ", task.tags.join(", ")),
        Line::from(Span::styled(
            "(Press esc/i to close)",
            Style::default().fg(theme.muted),
        )),
    ];

    let height = (lines.len() as u16 + 2).min(area.height);
    let width = POPUP_WIDTH.min(area.width);
    let bottom = area.y + area.height;
    let y = if row_y + 1 + height <= bottom {
        row_y + 1
    } else {
        row_y.saturating_sub(height).max(area.y)
    };
    let popup = Rect::new(area.x, y, width, height);

    frame.render_widget(Clear, popup);
    frame.render_widget(
        Paragraph::new(lines).block(popup_block(Style::default().fg(theme.accent))),
        popup,
    );
}

pub fn render_delete_confirm(frame: &mut Frame, app: &App, area: Rect) {
    let Some(record) = &app.pending_delete else {
        return;
    };
    let focus = Style::default()
        .fg(app.theme.warning)
        .add_modifier(Modifier::BOLD);
    let line = Line::from(vec![
        Span::styled("Delete task '", focus),
        Span::raw(record.task.title.clone()),
        Span::styled("'? (y/n)", focus),
    ]);

    let popup = centered_rect_fixed(POPUP_WIDTH, 3, area);
    frame.render_widget(Clear, popup);
    frame.render_widget(
        Paragraph::new(line).block(popup_block(Style::default().fg(app.theme.warning))),
        popup,
    );
}

pub fn render_export_prompt(frame: &mut Frame, app: &App, area: Rect) {
    let Some(prompt) = &app.export_prompt else {
        return;
    };
    let theme = &app.theme;
    let title = Style::default().fg(theme.accent).add_modifier(Modifier::BOLD);
    let muted = Style::default().fg(theme.muted);

    let heading = format!("Export {} selected tasks", app.selected_records().len());
    let lines = match prompt {
        ExportPrompt::Format => vec![
            Line::from(Span::styled(heading, title)),
            Line::from("1: csv  2: json  3: md"),
            Line::from(Span::styled("esc: cancel", muted)),
        ],
        ExportPrompt::Path { format, path } => vec![
            Line::from(Span::styled(heading, title)),
            Line::from(vec![
                Span::raw(format!("{format} file: {path}")),
                Span::styled("█", Style::default().fg(theme.warning)),
            ]),
            Line::from(Span::styled("enter: export  esc: cancel", muted)),
        ],
    };

    let popup = centered_rect_fixed(POPUP_WIDTH, lines.len() as u16 + 2, area);
    frame.render_widget(Clear, popup);
    frame.render_widget(
        Paragraph::new(lines).block(popup_block(Style::default().fg(theme.accent))),
        popup,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::export::ExportFormat;
    use crate::tui::app::test_support::*;
    use crate::tui::render::test_helpers::*;

    #[test]
    fn delete_confirm_names_the_task() {
        let (_tmp, mut app) = app_with(&["Buy milk"]);
        app.request_delete();
        let out = render_to_string(TERM_W, TERM_H, |frame, area| {
            render_delete_confirm(frame, &app, area);
        });
        assert!(out.contains("Delete task 'Buy milk'? (y/n)"), "{out}");
        assert!(out.contains('╭'));
    }

    #[test]
    fn export_prompt_steps() {
        let (_tmp, mut app) = app_with(&["a", "b"]);
        app.toggle_selection();
        app.export_prompt = Some(ExportPrompt::Format);
        let out = render_to_string(TERM_W, TERM_H, |frame, area| {
            render_export_prompt(frame, &app, area);
        });
        assert!(out.contains("Export 1 selected tasks"));
        assert!(out.contains("1: csv  2: json  3: md"));

        app.export_prompt = Some(ExportPrompt::Path {
            format: ExportFormat::Markdown,
            path: "out.md".into(),
        });
        let out = render_to_string(TERM_W, TERM_H, |frame, area| {
            render_export_prompt(frame, &app, area);
        });
        assert!(out.contains("md file: out.md█"), "{out}");
    }

    #[test]
    fn details_flip_above_when_no_room() {
        let (_tmp, app) = app_with(&["Buy milk"]);
        let record = app.current_record().unwrap().clone();
        let out = render_to_string(TERM_W, 12, |frame, area| {
            render_details(frame, &app, &record, 11, area);
        });
        let lines: Vec<&str> = out.lines().collect();
        assert!(lines[3].contains("Task Details"), "{out}");
    }
}
