use crate::{
    interpreter::confidence::structured_confidence,
    oracle::StructuredResponse,
    types::{RegionScores, RiskAssessment, RiskLevel, Severity, Signal, SignalCategory, Verdict},
};

const HIGH_RISK_AVERAGE: f64 = 6.0;
const MEDIUM_RISK_AVERAGE: f64 = 4.0;
const MEDIUM_SEVERITY_SCORE: f64 = 4.0;
const HIGH_SEVERITY_SCORE: f64 = 7.0;

pub fn interpret_structured(response: &StructuredResponse, frame_count: usize) -> RiskAssessment {
    let scores = RegionScores::new(
        response.mouth_score,
        response.eyes_score,
        response.boundary_score,
        response.temporal_score,
    );
    let risk_level = risk_level(scores.average, response.verdict);

    let mut signals = Vec::with_capacity(5);
    if let Some(evidence) = &response.key_evidence {
        signals.push(Signal {
            category: SignalCategory::KeyFinding,
            description: format!("Key Finding: {}", evidence),
            severity: risk_level.into(),
            score: None,
        });
    }

    for (category, score) in [
        (SignalCategory::Mouth, scores.mouth),
        (SignalCategory::Eyes, scores.eyes),
        (SignalCategory::FaceBoundary, scores.boundary),
        (SignalCategory::Temporal, scores.temporal),
    ] {
        let severity = severity(score);
        signals.push(Signal {
            category,
            description: region_description(category, severity).to_string(),
            severity,
            score: Some(score),
        });
    }

    RiskAssessment {
        risk_level,
        scores: Some(scores),
        verdict: response.verdict,
        signals,
        confidence: structured_confidence(scores.average, frame_count),
        analysis: response.detailed_analysis.clone(),
    }
}

pub fn risk_level(average: f64, verdict: Option<Verdict>) -> RiskLevel {
    if average >= HIGH_RISK_AVERAGE || verdict == Some(Verdict::Manipulated) {
        RiskLevel::High
    } else if average >= MEDIUM_RISK_AVERAGE || verdict == Some(Verdict::Suspicious) {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    }
}

pub fn severity(score: f64) -> Severity {
    if score < MEDIUM_SEVERITY_SCORE {
        Severity::Low
    } else if score < HIGH_SEVERITY_SCORE {
        Severity::Medium
    } else {
        Severity::High
    }
}

fn region_description(category: SignalCategory, severity: Severity) -> &'static str {
    match (category, severity) {
        (SignalCategory::Mouth, Severity::Low) => {
            "Lip movement and teeth rendering look natural"
        }
        (SignalCategory::Mouth, Severity::Medium) => {
            "Minor irregularities around the mouth and lips"
        }
        (SignalCategory::Mouth, Severity::High) => {
            "Strong mouth artifacts such as blurred teeth or warped lips"
        }
        (SignalCategory::Eyes, Severity::Low) => "Eye movement and blinking appear natural",
        (SignalCategory::Eyes, Severity::Medium) => {
            "Some irregularities in blinking or eye reflections"
        }
        (SignalCategory::Eyes, Severity::High) => {
            "Unnatural eye behavior or mismatched reflections"
        }
        (SignalCategory::FaceBoundary, Severity::Low) => {
            "Face edges blend naturally with hair and neck"
        }
        (SignalCategory::FaceBoundary, Severity::Medium) => {
            "Slight blending inconsistencies along the face edge"
        }
        (SignalCategory::FaceBoundary, Severity::High) => {
            "Visible seams or blending artifacts at the face boundary"
        }
        (SignalCategory::Temporal, Severity::Low) => {
            "Appearance is consistent across consecutive frames"
        }
        (SignalCategory::Temporal, Severity::Medium) => {
            "Some flicker or drift between consecutive frames"
        }
        (SignalCategory::Temporal, Severity::High) => {
            "Strong inconsistencies between consecutive frames"
        }
        (_, Severity::Low) => "No notable findings",
        (_, Severity::Medium) => "Some irregularities noted",
        (_, Severity::High) => "Significant irregularities noted",
    }
}
