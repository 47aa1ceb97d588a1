use datascrub_core::report::AuditEvent;
use datascrub_core::SemanticType;
use serde::Serialize;
use std::collections::BTreeMap;
use tabled::Tabled;

/// Outcome of one pipeline step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StepStatus {
    Success,
    Error,
}

#[derive(Debug, Serialize)]
pub struct StepReport {
    pub step: String,
    pub status: StepStatus,
    pub message: String,
}

/// Output for clean command
#[derive(Debug, Serialize)]
pub struct CleanOutput {
    pub input: String,
    pub output: String,
    pub rows: usize,
    pub columns: usize,
    pub steps: Vec<StepReport>,
    pub events: Vec<AuditEvent>,
}

/// Output for inspect command
#[derive(Debug, Serialize)]
pub struct InspectOutput {
    pub path: String,
    pub rows: usize,
    pub columns: Vec<ColumnInfo>,
}

#[derive(Debug, Serialize, Tabled)]
pub struct ColumnInfo {
    #[tabled(rename = "Column")]
    pub name: String,
    #[tabled(rename = "Type")]
    #[serde(rename = "type")]
    pub semantic_type: SemanticType,
    #[tabled(rename = "Missing")]
    pub missing: usize,
}

/// Output for config command
#[derive(Debug, Serialize)]
pub struct ConfigOutput {
    pub entries: BTreeMap<String, ConfigEntry>,
}

#[derive(Debug, Serialize)]
pub struct ConfigEntry {
    pub value: String,
    pub source: String,
}
