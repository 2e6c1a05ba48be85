use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::fs;
use uuid::Uuid;

use crate::{error::Result, types::RiskAssessment};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceInfo {
    pub file_name: String,
    pub file_size_bytes: u64,
    pub duration_secs: f64,
    pub frame_count: usize,
}

/// An assessment plus the bookkeeping the caller attaches for display and export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub id: Uuid,
    pub analyzed_at: DateTime<Utc>,
    pub source: SourceInfo,
    pub assessment: RiskAssessment,
}

impl AnalysisReport {
    pub fn new(source: SourceInfo, assessment: RiskAssessment) -> Self {
        Self {
            id: Uuid::new_v4(),
            analyzed_at: Utc::now(),
            source,
            assessment,
        }
    }
}

/// Load a report from a file
pub async fn load_report(path: &Path) -> Result<AnalysisReport> {
    let json_content = fs::read_to_string(path).await?;
    let report: AnalysisReport = serde_json::from_str(&json_content)?;
    Ok(report)
}

/// Save a report to a file
pub async fn save_report(report: &AnalysisReport, path: &Path) -> Result<()> {
    let pretty_json = serde_json::to_string_pretty(report)?;
    fs::write(path, &pretty_json).await?;
    Ok(())
}
