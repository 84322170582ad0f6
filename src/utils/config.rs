//! Configuration and constants for the report pipeline.

use super::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Current snapshot/report schema version
pub const SCHEMA_VERSION: &str = "1.0.0";

pub const DEFAULT_TIMINGS_TITLE: &str = "Timings";
pub const DEFAULT_DISTRIBUTED_TITLE: &str = "Distributed Operations";

// Tree-branch glyphs for the timings table
pub const BRANCH_CONTINUE: &str = "+- ";
pub const BRANCH_LAST: &str = "\\- ";
pub const PREFIX_VERTICAL: &str = "|  ";
pub const PREFIX_BLANK: &str = "   ";

/// Unit used when rendering durations in text tables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DurationUnit {
    Ns,
    Us,
    Ms,
    S,
    /// Pick the largest unit that keeps the integer part non-zero
    #[default]
    Auto,
}

/// Runtime report configuration, usually loaded from TOML
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Title of the tree-shaped timings table
    pub timings_title: String,

    /// Title of the distributed operations table
    pub distributed_title: String,

    /// Render the distributed operations table at all
    pub show_distributed_table: bool,

    /// Unit for duration cells
    pub duration_unit: DurationUnit,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            timings_title: DEFAULT_TIMINGS_TITLE.to_string(),
            distributed_title: DEFAULT_DISTRIBUTED_TITLE.to_string(),
            show_distributed_table: true,
            duration_unit: DurationUnit::Auto,
        }
    }
}

/// Load a report configuration from a TOML file
///
/// Keys that are not present fall back to their defaults.
///
/// # Example
/// ```ignore
/// let config = load_config("report.toml")?;
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<ReportConfig, ConfigError> {
    let contents = fs::read_to_string(path)?;
    let config: ReportConfig = toml::from_str(&contents)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: ReportConfig = toml::from_str("duration_unit = \"ms\"").unwrap();
        assert_eq!(config.duration_unit, DurationUnit::Ms);
        assert_eq!(config.timings_title, DEFAULT_TIMINGS_TITLE);
        assert!(config.show_distributed_table);
    }

    #[test]
    fn test_load_config_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "timings_title = \"Job\"\nshow_distributed_table = false").unwrap();

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.timings_title, "Job");
        assert!(!config.show_distributed_table);
        assert_eq!(config.duration_unit, DurationUnit::Auto);
    }

    #[test]
    fn test_load_config_invalid_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "timings_title = ").unwrap();
        assert!(matches!(load_config(file.path()), Err(ConfigError::Toml(_))));
    }
}
