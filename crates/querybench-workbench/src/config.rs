//! Workbench configuration

use querybench_analyzer::AdvisorConfig;
use querybench_core::{Result, WorkbenchError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

const CONFIG_DIR_NAME: &str = "querybench";
const CONFIG_FILE_NAME: &str = "config.toml";

/// Settings for the workbench facade
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkbenchConfig {
    /// Auto-generated tab titles read `"<prefix> <n>"`
    pub tab_title_prefix: String,
    /// Maximum number of in-memory history entries
    pub history_limit: usize,
    /// Debounce delay for search-as-you-type over history
    pub search_debounce_ms: u64,
    pub advisor: AdvisorConfig,
}

impl Default for WorkbenchConfig {
    fn default() -> Self {
        Self {
            tab_title_prefix: "Query".to_string(),
            history_limit: 1000,
            search_debounce_ms: 250,
            advisor: AdvisorConfig::default(),
        }
    }
}

impl WorkbenchConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tab_title_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.tab_title_prefix = prefix.into();
        self
    }

    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history_limit = limit;
        self
    }

    pub fn with_search_debounce_ms(mut self, delay_ms: u64) -> Self {
        self.search_debounce_ms = delay_ms;
        self
    }

    pub fn with_advisor(mut self, advisor: AdvisorConfig) -> Self {
        self.advisor = advisor;
        self
    }

    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }

    /// `<config_dir>/querybench/config.toml`, if the platform has a config dir
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    /// Load from a TOML file. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no config file, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(e.into()),
        };

        let config = Self::from_toml(&text).map_err(|e| match e {
            WorkbenchError::Configuration(msg) => {
                WorkbenchError::Configuration(format!("{}: {}", path.display(), msg))
            }
            other => other,
        })?;
        tracing::info!(path = %path.display(), "loaded workbench config");
        Ok(config)
    }

    pub fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| WorkbenchError::Configuration(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults() {
        let config = WorkbenchConfig::default();
        assert_eq!(config.tab_title_prefix, "Query");
        assert_eq!(config.history_limit, 1000);
        assert_eq!(config.search_debounce(), Duration::from_millis(250));
        assert_eq!(config.advisor.max_index_columns, 3);
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let config = WorkbenchConfig::from_toml(indoc! {r#"
            tab_title_prefix = "Tab"

            [advisor]
            max_index_columns = 2
        "#})
        .unwrap();

        assert_eq!(config.tab_title_prefix, "Tab");
        assert_eq!(config.history_limit, 1000);
        assert_eq!(config.advisor.max_index_columns, 2);
        assert_eq!(config.advisor.critical_row_threshold, 10_000);
    }

    #[test]
    fn test_invalid_toml() {
        let err = WorkbenchConfig::from_toml("history_limit = \"lots\"").unwrap_err();
        assert!(matches!(err, WorkbenchError::Configuration(_)));
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = WorkbenchConfig::load(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, WorkbenchConfig::default());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "search_debounce_ms = 40\n").unwrap();

        let config = WorkbenchConfig::load(&path).unwrap();
        assert_eq!(config.search_debounce_ms, 40);

        std::fs::write(&path, "search_debounce_ms = [").unwrap();
        let err = WorkbenchConfig::load(&path).unwrap_err();
        assert!(err.message().contains("config.toml"));
    }

    #[test]
    fn test_default_path_ends_with_file_name() {
        if let Some(path) = WorkbenchConfig::default_path() {
            assert!(path.ends_with("querybench/config.toml"));
        }
    }
}
