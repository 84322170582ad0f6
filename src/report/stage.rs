//! Stage metadata supplied by the external execution layer.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

/// One scheduling unit of the external engine, matched to distributed
/// operations by name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageTiming {
    #[serde(default)]
    pub stage_name: Option<String>,
    pub stage_id: String,
    #[serde(rename = "duration_ns", with = "crate::utils::nanos")]
    pub duration: Duration,
}

impl StageTiming {
    pub fn new(stage_name: Option<&str>, stage_id: impl Into<String>, duration: Duration) -> Self {
        Self {
            stage_name: stage_name.map(str::to_string),
            stage_id: stage_id.into(),
            duration,
        }
    }
}

/// Name lookup over stage records; the first record for a name wins and
/// unnamed stages are never matched
pub(crate) fn index_by_name(stages: &[StageTiming]) -> HashMap<&str, &StageTiming> {
    let mut index = HashMap::with_capacity(stages.len());
    for stage in stages {
        if let Some(name) = stage.stage_name.as_deref() {
            index.entry(name).or_insert(stage);
        }
    }
    index
}
