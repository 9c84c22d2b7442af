use crate::model::task::{DEFAULT_PRIORITY, Task, TaskStatus};
use crate::ops::task_ops::{NewTask, split_tags};
use crate::util::unicode;

const PRIORITY_MIN: i64 = 1;
const PRIORITY_MAX: i64 = 5;

/// Focusable rows of the edit and add forms, in tab order
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FormField {
    #[default]
    Title,
    Description,
    Priority,
    Status,
    Tags,
    Save,
    Cancel,
}

impl FormField {
    const ORDER: [FormField; 7] = [
        FormField::Title,
        FormField::Description,
        FormField::Priority,
        FormField::Status,
        FormField::Tags,
        FormField::Save,
        FormField::Cancel,
    ];

    fn step(self, forward: bool) -> FormField {
        let len = Self::ORDER.len();
        let i = Self::ORDER.iter().position(|f| *f == self).unwrap_or(0);
        let next = if forward { (i + 1) % len } else { (i + len - 1) % len };
        Self::ORDER[next]
    }

    pub fn next(self) -> FormField {
        self.step(true)
    }

    pub fn prev(self) -> FormField {
        self.step(false)
    }

    /// Fields that take typed text
    pub fn is_text(self) -> bool {
        matches!(
            self,
            FormField::Title | FormField::Description | FormField::Priority | FormField::Tags
        )
    }
}

/// Editing buffer shared by the edit and add forms
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskForm {
    pub focus: FormField,
    pub title: String,
    pub description: String,
    /// Digits only; empty keeps the previous priority
    pub priority: String,
    pub status: TaskStatus,
    /// Comma separated
    pub tags: String,
}

impl TaskForm {
    pub fn for_task(task: &Task) -> Self {
        TaskForm {
            focus: FormField::Title,
            title: task.title.clone(),
            description: task.description.clone(),
            priority: task.priority.to_string(),
            status: task.status,
            tags: task.tags.join(", "),
        }
    }

    /// A blank form. A non-empty `topic` pre-fills the title with `topic/`.
    pub fn for_new(topic: &str, default_tags: &[String]) -> Self {
        TaskForm {
            focus: FormField::Title,
            title: if topic.is_empty() {
                String::new()
            } else {
                format!("{topic}/")
            },
            description: String::new(),
            priority: DEFAULT_PRIORITY.to_string(),
            status: TaskStatus::Todo,
            tags: default_tags.join(", "),
        }
    }

    fn focused_text(&mut self) -> Option<&mut String> {
        match self.focus {
            FormField::Title => Some(&mut self.title),
            FormField::Description => Some(&mut self.description),
            FormField::Priority => Some(&mut self.priority),
            FormField::Tags => Some(&mut self.tags),
            _ => None,
        }
    }

    /// Type a character into the focused field. Priority accepts digits only.
    pub fn push_char(&mut self, c: char) {
        if self.focus == FormField::Priority && !c.is_ascii_digit() {
            return;
        }
        if let Some(text) = self.focused_text() {
            text.push(c);
        }
    }

    pub fn backspace(&mut self) {
        if let Some(text) = self.focused_text() {
            unicode::pop_grapheme(text);
        }
    }

    pub fn cycle_status(&mut self, forward: bool) {
        self.status = self.status.cycle(forward);
    }

    /// Move priority by `delta`, clamped to 1..=5. An empty or unreadable
    /// value counts as the default.
    pub fn step_priority(&mut self, delta: i64) {
        let current = self.priority.parse::<i64>().unwrap_or(DEFAULT_PRIORITY);
        self.priority = (current + delta)
            .clamp(PRIORITY_MIN, PRIORITY_MAX)
            .to_string();
    }

    /// Left/right on the focused field
    pub fn adjust(&mut self, forward: bool) {
        match self.focus {
            FormField::Status => self.cycle_status(forward),
            FormField::Priority => self.step_priority(if forward { 1 } else { -1 }),
            _ => {}
        }
    }

    fn parsed_priority(&self) -> Option<i64> {
        if self.priority.is_empty() {
            None
        } else {
            self.priority.parse().ok()
        }
    }

    fn parsed_tags(&self) -> Vec<String> {
        split_tags(&[self.tags.as_str()])
    }

    /// Copy the form onto an existing task. Tags are replaced wholesale; an
    /// empty tag field clears them.
    pub fn apply_to(&self, task: &mut Task) {
        task.title = self.title.clone();
        task.description = self.description.clone();
        if let Some(priority) = self.parsed_priority() {
            task.priority = priority;
        }
        task.status = self.status;
        task.tags = self.parsed_tags();
    }

    /// Fields for a new task; the title (with optional `topic/`) is
    /// `self.title`.
    pub fn to_new_task(&self) -> NewTask {
        NewTask {
            description: self.description.clone(),
            priority: self.parsed_priority().unwrap_or(DEFAULT_PRIORITY),
            tags: self.parsed_tags(),
            status: self.status,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn focus_wraps_both_ways() {
        assert_eq!(FormField::Cancel.next(), FormField::Title);
        assert_eq!(FormField::Title.prev(), FormField::Cancel);
        assert_eq!(FormField::Tags.next(), FormField::Save);
    }

    #[test]
    fn priority_takes_digits_only() {
        let mut form = TaskForm::for_new("", &[]);
        form.focus = FormField::Priority;
        form.backspace();
        form.push_char('x');
        form.push_char('4');
        assert_eq!(form.priority, "4");
    }

    #[test]
    fn priority_steps_are_clamped() {
        let mut form = TaskForm::for_new("", &[]);
        form.focus = FormField::Priority;
        for _ in 0..5 {
            form.adjust(true);
        }
        assert_eq!(form.priority, "5");
        form.priority.clear();
        form.adjust(false);
        assert_eq!(form.priority, "2");
        form.priority = "0".into();
        form.adjust(false);
        assert_eq!(form.priority, "1");
    }

    #[test]
    fn status_field_cycles() {
        let mut form = TaskForm::for_new("", &[]);
        form.focus = FormField::Status;
        form.adjust(false);
        assert_eq!(form.status, TaskStatus::Cancelled);
        form.adjust(true);
        form.adjust(true);
        assert_eq!(form.status, TaskStatus::InProgress);
    }

    #[test]
    fn new_form_prefills_topic_and_tags() {
        let form = TaskForm::for_new("Work", &["a".into(), "b".into()]);
        assert_eq!(form.title, "Work/");
        assert_eq!(form.tags, "a, b");
        assert_eq!(form.priority, "3");
    }

    #[test]
    fn apply_replaces_tags_and_keeps_priority_when_blank() {
        let mut task = Task::new("Old");
        task.priority = 2;
        task.tags = vec!["x".into()];
        let mut form = TaskForm::for_task(&task);
        assert_eq!(form.tags, "x");
        form.title = "New".into();
        form.priority.clear();
        form.tags = " a , b ,".into();
        form.status = TaskStatus::Paused;
        form.apply_to(&mut task);
        assert_eq!(task.title, "New");
        assert_eq!(task.priority, 2);
        assert_eq!(task.tags, vec!["a", "b"]);
        assert_eq!(task.status, TaskStatus::Paused);

        form.tags.clear();
        form.apply_to(&mut task);
        assert!(task.tags.is_empty());
    }

    #[test]
    fn backspace_removes_whole_grapheme() {
        let mut form = TaskForm::for_new("", &[]);
        form.title = "café 🎉".into();
        form.backspace();
        assert_eq!(form.title, "café ");
        form.focus = FormField::Save;
        form.push_char('z');
        form.backspace();
        assert_eq!(form.title, "café ");
    }
}
