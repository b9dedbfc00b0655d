use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

pub const CONFIG_FILENAME: &str = ".tix.json";

const DEFAULT_TICKETS_DIR: &str = ".tickets";
const DEFAULT_CACHE_DIR: &str = ".ticket_cache";

/// Project configuration, stored as `.tix.json` at the project root.
///
/// The first entry of `severities` and `statuses` is the default for new
/// tickets. `colors` maps a severity to a terminal color name consumed by
/// the CLI renderer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TixConfig {
    #[serde(default = "default_tickets_dir")]
    pub tickets_dir: String,

    #[serde(default = "default_cache_dir")]
    pub cache_dir: String,

    /// External command invoked with the new ticket directory after the
    /// first save. Empty disables the hook.
    #[serde(default)]
    pub after_add: String,

    #[serde(default = "default_severities")]
    pub severities: Vec<String>,

    #[serde(default = "default_statuses")]
    pub statuses: Vec<String>,

    #[serde(default = "default_colors")]
    pub colors: HashMap<String, String>,
}

fn default_tickets_dir() -> String {
    DEFAULT_TICKETS_DIR.to_string()
}

fn default_cache_dir() -> String {
    DEFAULT_CACHE_DIR.to_string()
}

fn default_severities() -> Vec<String> {
    ["normal", "blocking", "critical", "minor", "feature", "question"]
        .map(String::from)
        .to_vec()
}

fn default_statuses() -> Vec<String> {
    ["opened", "closed", "postponed", "testing"]
        .map(String::from)
        .to_vec()
}

fn default_colors() -> HashMap<String, String> {
    [
        ("blocking", "bright red"),
        ("critical", "red"),
        ("normal", "magenta"),
        ("minor", "yellow"),
        ("feature", "blue"),
        ("question", "cyan"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

impl Default for TixConfig {
    fn default() -> Self {
        Self {
            tickets_dir: default_tickets_dir(),
            cache_dir: default_cache_dir(),
            after_add: String::new(),
            severities: default_severities(),
            statuses: default_statuses(),
            colors: default_colors(),
        }
    }
}

impl TixConfig {
    /// Load config from the given directory, or return defaults if not found.
    pub fn load<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let path = dir.as_ref().join(CONFIG_FILENAME);
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(&path)?;
        let config: TixConfig = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Save config to the given directory.
    pub fn save<P: AsRef<Path>>(&self, dir: P) -> Result<()> {
        let path = dir.as_ref().join(CONFIG_FILENAME);
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    pub fn default_status(&self) -> &str {
        self.statuses.first().map(String::as_str).unwrap_or("opened")
    }

    pub fn default_severity(&self) -> &str {
        self.severities
            .first()
            .map(String::as_str)
            .unwrap_or("normal")
    }

    /// Terminal color name for a severity, if one is configured.
    pub fn color_for(&self, severity: &str) -> Option<&str> {
        self.colors.get(severity).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config() {
        let config = TixConfig::default();
        assert_eq!(config.tickets_dir, ".tickets");
        assert_eq!(config.cache_dir, ".ticket_cache");
        assert_eq!(config.default_status(), "opened");
        assert_eq!(config.default_severity(), "normal");
        assert!(config.after_add.is_empty());
    }

    #[test]
    fn load_missing_returns_defaults() {
        let temp = TempDir::new().unwrap();
        let config = TixConfig::load(temp.path()).unwrap();
        assert_eq!(config, TixConfig::default());
    }

    #[test]
    fn save_and_load_roundtrip() {
        let temp = TempDir::new().unwrap();
        let mut config = TixConfig::default();
        config.statuses = vec!["new".into(), "done".into()];
        config.after_add = "notify-send".into();
        config.save(temp.path()).unwrap();

        let loaded = TixConfig::load(temp.path()).unwrap();
        assert_eq!(loaded, config);
        assert_eq!(loaded.default_status(), "new");
    }

    #[test]
    fn partial_config_fills_defaults() {
        let temp = TempDir::new().unwrap();
        std::fs::write(
            temp.path().join(CONFIG_FILENAME),
            r#"{ "statuses": ["todo", "done"] }"#,
        )
        .unwrap();

        let config = TixConfig::load(temp.path()).unwrap();
        assert_eq!(config.statuses, vec!["todo", "done"]);
        assert_eq!(config.tickets_dir, ".tickets");
        assert_eq!(config.severities, TixConfig::default().severities);
    }
}
