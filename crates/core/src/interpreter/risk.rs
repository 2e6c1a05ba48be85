use crate::types::RiskLevel;

/// Presentation data for a risk level, handed to whatever renders the result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RiskLevelInfo {
    pub label: &'static str,
    /// Hex display color.
    pub color: &'static str,
    pub description: &'static str,
}

const LOW: RiskLevelInfo = RiskLevelInfo {
    label: "Low Risk",
    color: "#22c55e",
    description: "No significant signs of manipulation were found in the sampled frames.",
};

const MEDIUM: RiskLevelInfo = RiskLevelInfo {
    label: "Medium Risk",
    color: "#f59e0b",
    description: "Some inconsistencies were found; the video deserves a closer look.",
};

const HIGH: RiskLevelInfo = RiskLevelInfo {
    label: "High Risk",
    color: "#ef4444",
    description: "Strong indicators of manipulation were found in the sampled frames.",
};

impl RiskLevel {
    pub fn info(&self) -> &'static RiskLevelInfo {
        match self {
            RiskLevel::Low => &LOW,
            RiskLevel::Medium => &MEDIUM,
            RiskLevel::High => &HIGH,
        }
    }
}
