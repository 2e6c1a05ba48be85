//! Fallback for prose replies: one verdict from a fixed phrase list, one
//! generic signal per verdict.

use crate::{
    interpreter::confidence::legacy_confidence,
    types::{RiskAssessment, RiskLevel, Signal, SignalCategory},
};

/// Checked in order; the first phrase found wins. "possibly manipulated" must
/// come before "manipulated", and every manipulation phrase before any
/// authenticity phrase.
const PRIMARY_PHRASES: &[(&str, RiskLevel)] = &[
    ("possibly manipulated", RiskLevel::Medium),
    ("likely manipulated", RiskLevel::High),
    ("manipulated", RiskLevel::High),
    ("suspicious", RiskLevel::Medium),
    ("likely authentic", RiskLevel::Low),
    ("authentic", RiskLevel::Low),
];

pub fn interpret_free_text(text: &str, frame_count: usize) -> RiskAssessment {
    let risk_level = classify(text);
    let signals = vec![verdict_signal(risk_level)];

    RiskAssessment {
        risk_level,
        scores: None,
        verdict: None,
        confidence: legacy_confidence(&signals, frame_count),
        signals,
        analysis: Some(text.trim().to_string()).filter(|t| !t.is_empty()),
    }
}

pub fn classify(text: &str) -> RiskLevel {
    let lower = text.to_lowercase();

    if let Some((_, level)) = PRIMARY_PHRASES
        .iter()
        .find(|(phrase, _)| lower.contains(phrase))
    {
        return *level;
    }

    if lower.contains("no signs of manipulation") {
        RiskLevel::Low
    } else if lower.contains("high confidence") && lower.contains("manipulat") {
        RiskLevel::High
    } else {
        RiskLevel::Medium
    }
}

fn verdict_signal(risk_level: RiskLevel) -> Signal {
    let description = match risk_level {
        RiskLevel::Low => "No significant manipulation indicators detected",
        RiskLevel::Medium => "Possible manipulation indicators detected; manual review recommended",
        RiskLevel::High => "Strong indicators of manipulation detected",
    };

    Signal {
        category: SignalCategory::General,
        description: description.to_string(),
        severity: risk_level.into(),
        score: None,
    }
}
