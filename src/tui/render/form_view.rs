use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::app::App;
use crate::tui::form::{FormField, TaskForm};

/// The edit form, or the add form when `adding`
pub fn render_form_view(frame: &mut Frame, app: &App, form: &TaskForm, adding: bool, area: Rect) {
    let theme = &app.theme;
    let focus_style = Style::default().fg(theme.warning).add_modifier(Modifier::BOLD);
    let muted = Style::default().fg(theme.muted);

    let (heading, help, submit) = if adding {
        ("Add New Task", "tab: next field • enter: add/cancel • esc: back", "Add")
    } else {
        ("Edit Task", "tab: next field • enter: save/cancel • esc: back", "Save")
    };

    let status = form.status.to_string();
    let rows: [(FormField, &str, &str, &str); 5] = [
        (
            FormField::Title,
            "Title:",
            form.title.as_str(),
            if adding { "(required)" } else { "" },
        ),
        (FormField::Description, "Description:", form.description.as_str(), ""),
        (FormField::Priority, "Priority:", form.priority.as_str(), "(1-5, default 3)"),
        (FormField::Status, "Status:", status.as_str(), "(h/l to change)"),
        (FormField::Tags, "Tags:", form.tags.as_str(), "(comma separated)"),
    ];

    let mut lines = vec![
        Line::from(Span::styled(heading, Style::default().add_modifier(Modifier::BOLD))),
        Line::from(Span::styled(help, muted)),
        Line::from(""),
    ];
    for (field, label, value, hint) in rows {
        let focused = form.focus == field;
        let mut spans = vec![
            Span::styled(label, if focused { focus_style } else { Style::default() }),
            Span::raw(" "),
            Span::raw(value.to_string()),
        ];
        if focused {
            spans.push(Span::raw("█"));
        }
        if !hint.is_empty() {
            spans.push(Span::raw(" "));
            spans.push(Span::styled(hint, muted));
        }
        lines.push(Line::from(spans));
    }
    lines.push(Line::from(""));

    let button = |field: FormField, text: &str| {
        let style = if form.focus == field { focus_style } else { Style::default() };
        Span::styled(format!("[{text}]"), style)
    };
    lines.push(Line::from(vec![
        button(FormField::Save, submit),
        Span::raw(" "),
        button(FormField::Cancel, "Cancel"),
    ]));

    frame.render_widget(Paragraph::new(lines), area);
}
