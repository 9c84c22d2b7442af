use ratatui::layout::Rect;
use ratatui::text::Span;

use crate::model::task::{DEFAULT_PRIORITY, Task, TaskStatus};
use crate::util::unicode;

/// Row icon for each status
pub(super) fn status_icon(status: TaskStatus) -> &'static str {
    match status {
        TaskStatus::Todo => "○",
        TaskStatus::InProgress => "◐",
        TaskStatus::Done => "●",
        TaskStatus::Paused => "⏸",
        TaskStatus::Cancelled => "✗",
    }
}

/// `[p] ` when the priority differs from the default
pub(super) fn priority_badge(task: &Task) -> Option<String> {
    (task.priority != DEFAULT_PRIORITY).then(|| format!("[{}] ", task.priority))
}

/// Compute total display width of a slice of spans
pub(super) fn spans_width(spans: &[Span]) -> usize {
    spans
        .iter()
        .map(|s| unicode::display_width(&s.content))
        .sum()
}

pub(super) fn centered_rect_fixed(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect::new(x, y, width, height)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn badge_only_for_non_default_priority() {
        let mut task = Task::new("t");
        assert_eq!(priority_badge(&task), None);
        task.priority = 1;
        assert_eq!(priority_badge(&task).as_deref(), Some("[1] "));
    }

    #[test]
    fn centered_rect_fits_inside() {
        let area = Rect::new(0, 0, 20, 10);
        assert_eq!(centered_rect_fixed(10, 4, area), Rect::new(5, 3, 10, 4));
        assert_eq!(centered_rect_fixed(50, 40, area), area);
    }
}
