//! Turns an oracle reply into a [`RiskAssessment`].
//!
//! Never fails: replies that can't be read as scores go through the
//! free-text path, and text that matches nothing lands on MEDIUM.

pub mod confidence;
pub mod legacy;
pub mod risk;
pub mod structured;

use crate::{oracle::OracleResponse, types::RiskAssessment};

pub use risk::RiskLevelInfo;

pub fn interpret(response: &OracleResponse, frame_count: usize) -> RiskAssessment {
    let assessment = match response {
        OracleResponse::Structured(structured) => {
            structured::interpret_structured(structured, frame_count)
        }
        OracleResponse::FreeText(text) => legacy::interpret_free_text(text, frame_count),
    };

    tracing::info!(
        risk = ?assessment.risk_level,
        confidence = assessment.confidence,
        signals = assessment.signals.len(),
        structured = matches!(response, OracleResponse::Structured(_)),
        "Interpreted oracle response"
    );
    assessment
}

/// Parse a raw reply and interpret it in one step.
pub fn interpret_raw(raw: &str, frame_count: usize) -> RiskAssessment {
    interpret(&OracleResponse::parse(raw), frame_count)
}
