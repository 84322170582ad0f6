use std::path::PathBuf;

/// Arguments for the report command
///
/// **Public** - used by main.rs to construct from CLI args
#[derive(Debug, Clone)]
pub struct ReportArgs {
    /// Contributor snapshot files to merge
    pub snapshots: Vec<PathBuf>,

    /// External stage metadata (optional)
    pub stages: Option<PathBuf>,

    /// Output path for the JSON report (optional)
    pub output_json: Option<PathBuf>,

    /// Report configuration TOML (optional)
    pub config: Option<PathBuf>,

    /// Session name shown in the report
    pub session: String,

    /// Skip printing the tables to stdout
    pub quiet: bool,
}

impl Default for ReportArgs {
    fn default() -> Self {
        Self {
            snapshots: Vec::new(),
            stages: None,
            output_json: None,
            config: None,
            session: "timing-tree".to_string(),
            quiet: false,
        }
    }
}

/// Arguments for the merge command
#[derive(Debug, Clone)]
pub struct MergeArgs {
    /// Snapshot files to merge
    pub snapshots: Vec<PathBuf>,

    /// Where to write the merged snapshot
    pub output: PathBuf,

    /// Contributor name recorded in the merged snapshot
    pub contributor: String,
}

impl Default for MergeArgs {
    fn default() -> Self {
        Self {
            snapshots: Vec::new(),
            output: PathBuf::from("merged.json"),
            contributor: "merged".to_string(),
        }
    }
}
