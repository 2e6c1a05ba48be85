use serde::Deserialize;
use serde_json::Value;

use crate::types::Verdict;

/// Score assumed for a region the oracle did not report.
pub const NEUTRAL_SCORE: f64 = 5.0;
pub const MAX_SCORE: f64 = 10.0;

#[derive(Debug, Clone, PartialEq)]
pub struct StructuredResponse {
    pub mouth_score: f64,
    pub eyes_score: f64,
    pub boundary_score: f64,
    pub temporal_score: f64,
    pub verdict: Option<Verdict>,
    pub key_evidence: Option<String>,
    pub detailed_analysis: Option<String>,
}

/// An oracle reply in one of the two shapes it comes in.
#[derive(Debug, Clone, PartialEq)]
pub enum OracleResponse {
    Structured(StructuredResponse),
    FreeText(String),
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawStructured {
    mouth_score: Option<Value>,
    eyes_score: Option<Value>,
    boundary_score: Option<Value>,
    temporal_score: Option<Value>,
    verdict: Option<String>,
    key_evidence: Option<String>,
    detailed_analysis: Option<String>,
}

impl OracleResponse {
    /// Classify a raw reply. Never fails: anything that is not a recognizable
    /// score object, including broken JSON, is treated as prose.
    pub fn parse(raw: &str) -> Self {
        let Some(candidate) = extract_json_object(raw) else {
            return OracleResponse::FreeText(raw.trim().to_string());
        };

        let parsed = match serde_json::from_str::<RawStructured>(candidate) {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!(error = %e, "Oracle reply looked like JSON but did not parse");
                return OracleResponse::FreeText(raw.trim().to_string());
            }
        };

        let scores = [
            parsed.mouth_score.as_ref().and_then(score_value),
            parsed.eyes_score.as_ref().and_then(score_value),
            parsed.boundary_score.as_ref().and_then(score_value),
            parsed.temporal_score.as_ref().and_then(score_value),
        ];
        let verdict = parsed.verdict.as_deref().and_then(Verdict::parse);

        if verdict.is_none() && scores.iter().all(Option::is_none) {
            tracing::debug!("JSON reply carries no scores or verdict, using free-text path");
            return OracleResponse::FreeText(raw.trim().to_string());
        }

        let [mouth, eyes, boundary, temporal] = scores.map(|s| s.unwrap_or(NEUTRAL_SCORE));

        OracleResponse::Structured(StructuredResponse {
            mouth_score: mouth,
            eyes_score: eyes,
            boundary_score: boundary,
            temporal_score: temporal,
            verdict,
            key_evidence: non_empty(parsed.key_evidence),
            detailed_analysis: non_empty(parsed.detailed_analysis),
        })
    }
}

/// Outermost `{...}` in the reply, which also skips Markdown code fences.
fn extract_json_object(raw: &str) -> Option<&str> {
    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    (end > start).then(|| &raw[start..=end])
}

fn score_value(value: &Value) -> Option<f64> {
    let score = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    score.is_finite().then(|| score.clamp(0.0, MAX_SCORE))
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}
