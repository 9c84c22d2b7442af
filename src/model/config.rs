use serde::{Deserialize, Serialize};

/// Keys accepted by `tada config set`
pub const CONFIG_KEYS: [&str; 4] = ["default_sort", "theme", "default_status", "tags"];

/// Values accepted for `default_sort` and `list --sort`
pub const SORT_KEYS: [&str; 4] = ["created", "priority", "title", "status"];

/// Values accepted for `theme`
pub const THEMES: [&str; 2] = ["dark", "light"];

/// User configuration from config.yaml.
///
/// Every key is optional so that a local file only overrides the keys it
/// actually sets.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Sort key used by `list` when `--sort` is not given
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_sort: Option<String>,
    /// TUI palette: "dark" or "light"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
    /// Status used by `add` when `--status` is not given
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_status: Option<String>,
    /// Tags pre-filled in the TUI add form
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

impl Config {
    /// Overlay `other` on top of `self`, key by key.
    pub fn merged_with(mut self, other: Config) -> Config {
        if other.default_sort.is_some() {
            self.default_sort = other.default_sort;
        }
        if other.theme.is_some() {
            self.theme = other.theme;
        }
        if other.default_status.is_some() {
            self.default_status = other.default_status;
        }
        if other.tags.is_some() {
            self.tags = other.tags;
        }
        self
    }

    /// Set a key from its string form. Returns false for unknown keys.
    pub fn set(&mut self, key: &str, value: &str) -> bool {
        match key {
            "default_sort" => self.default_sort = Some(value.to_string()),
            "theme" => self.theme = Some(value.to_string()),
            "default_status" => self.default_status = Some(value.to_string()),
            "tags" => {
                self.tags = Some(
                    value
                        .split(',')
                        .map(|t| t.trim().to_string())
                        .filter(|t| !t.is_empty())
                        .collect(),
                )
            }
            _ => return false,
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_overrides_only_keys_it_sets() {
        let global = Config {
            default_sort: Some("priority".into()),
            theme: Some("dark".into()),
            ..Default::default()
        };
        let local = Config {
            theme: Some("light".into()),
            ..Default::default()
        };
        let merged = global.merged_with(local);
        assert_eq!(merged.default_sort.as_deref(), Some("priority"));
        assert_eq!(merged.theme.as_deref(), Some("light"));
        assert_eq!(merged.tags, None);
    }

    #[test]
    fn set_known_and_unknown_keys() {
        let mut config = Config::default();
        assert!(config.set("tags", "work, home,"));
        assert_eq!(config.tags, Some(vec!["work".into(), "home".into()]));
        assert!(!config.set("colour", "red"));
    }
}
