use base64::{Engine, engine::general_purpose::STANDARD};
use serde::{Deserialize, Serialize};

/// One still image taken from the video, ready to be sent to the oracle.
#[derive(Debug, Clone, PartialEq)]
pub struct SampledFrame {
    /// Actual playback position of the decoded frame, in seconds.
    pub timestamp_secs: f64,
    /// JPEG-encoded, letterboxed raster.
    pub image: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub segment_index: Option<usize>,
    pub index_in_segment: Option<usize>,
}

impl SampledFrame {
    pub fn to_base64(&self) -> String {
        STANDARD.encode(&self.image)
    }

    pub fn data_url(&self) -> String {
        format!("data:image/jpeg;base64,{}", self.to_base64())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl From<RiskLevel> for Severity {
    fn from(level: RiskLevel) -> Self {
        match level {
            RiskLevel::Low => Severity::Low,
            RiskLevel::Medium => Severity::Medium,
            RiskLevel::High => Severity::High,
        }
    }
}

/// The oracle's categorical judgment, independent of the numeric scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Verdict {
    Authentic,
    Suspicious,
    Manipulated,
}

impl Verdict {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_uppercase().as_str() {
            "AUTHENTIC" => Some(Verdict::Authentic),
            "SUSPICIOUS" => Some(Verdict::Suspicious),
            "MANIPULATED" => Some(Verdict::Manipulated),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalCategory {
    KeyFinding,
    Mouth,
    Eyes,
    FaceBoundary,
    Temporal,
    General,
}

impl SignalCategory {
    pub fn label(&self) -> &'static str {
        match self {
            SignalCategory::KeyFinding => "Key Finding",
            SignalCategory::Mouth => "Mouth & Lip Sync",
            SignalCategory::Eyes => "Eyes & Blinking",
            SignalCategory::FaceBoundary => "Face Boundary",
            SignalCategory::Temporal => "Temporal Consistency",
            SignalCategory::General => "General",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signal {
    pub category: SignalCategory,
    pub description: String,
    pub severity: Severity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
}

/// Per-region 0-10 scores from a structured oracle reply.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegionScores {
    pub mouth: f64,
    pub eyes: f64,
    pub boundary: f64,
    pub temporal: f64,
    pub average: f64,
}

impl RegionScores {
    pub fn new(mouth: f64, eyes: f64, boundary: f64, temporal: f64) -> Self {
        Self {
            mouth,
            eyes,
            boundary,
            temporal,
            average: (mouth + eyes + boundary + temporal) / 4.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub risk_level: RiskLevel,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scores: Option<RegionScores>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verdict: Option<Verdict>,
    pub signals: Vec<Signal>,
    /// Heuristic confidence, always within 30..=95.
    pub confidence: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analysis: Option<String>,
}
