use ratatui::style::Color;

use crate::model::TaskStatus;
use crate::model::config::Config;

/// Colour palette for the TUI
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    pub text: Color,
    /// Topic rows and headings
    pub accent: Color,
    /// Help lines and hints
    pub muted: Color,
    /// Focused form labels, prompts and status messages
    pub warning: Color,
    pub error: Color,
    pub search_match_bg: Color,
    pub search_match_fg: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Theme::dark()
    }
}

impl Theme {
    pub fn dark() -> Self {
        Theme {
            text: Color::Reset,
            accent: Color::Indexed(4),
            muted: Color::Indexed(8),
            warning: Color::Indexed(11),
            error: Color::Indexed(9),
            search_match_bg: Color::Indexed(6),
            search_match_fg: Color::Indexed(0),
        }
    }

    pub fn light() -> Self {
        Theme {
            text: Color::Reset,
            accent: Color::Indexed(12),
            muted: Color::Indexed(7),
            warning: Color::Indexed(11),
            error: Color::Indexed(1),
            search_match_bg: Color::Indexed(14),
            search_match_fg: Color::Indexed(0),
        }
    }

    /// Pick the palette named by `theme` in config. Unknown names fall back
    /// to dark.
    pub fn from_config(config: &Config) -> Self {
        match config.theme.as_deref() {
            None | Some("dark") => Theme::dark(),
            Some("light") => Theme::light(),
            Some(other) => {
                log::warn!("unknown theme '{other}', using dark");
                Theme::dark()
            }
        }
    }

    pub fn status_color(&self, status: TaskStatus) -> Color {
        match status {
            TaskStatus::InProgress => self.warning,
            TaskStatus::Done => self.accent,
            TaskStatus::Paused | TaskStatus::Cancelled => self.muted,
            TaskStatus::Todo => self.text,
        }
    }
}
