//! Confidence heuristics. Both blend how decisive the scores are with how
//! much evidence (frames, signals) went in. Uncalibrated.

use crate::types::{Severity, Signal};

pub const MIN_CONFIDENCE: f64 = 30.0;
pub const MAX_CONFIDENCE: f64 = 95.0;

/// `min(95, 50 + avg*5) + min(20, frames*0.8) + |avg - 5|*3`
pub fn structured_confidence(average: f64, frame_count: usize) -> u8 {
    let base = (50.0 + average * 5.0).min(95.0);
    let frames = (frame_count as f64 * 0.8).min(20.0);
    let decisiveness = (average - 5.0).abs() * 3.0;
    clamp_confidence(base + frames + decisiveness)
}

/// `min(70, 50 + frames*3) + 5*(high + low signals) - 3*(medium signals)`
pub fn legacy_confidence(signals: &[Signal], frame_count: usize) -> u8 {
    let base = (50.0 + frame_count as f64 * 3.0).min(70.0);
    let (decisive, uncertain) =
        signals
            .iter()
            .fold((0u32, 0u32), |(decisive, uncertain), signal| match signal.severity {
                Severity::High | Severity::Low => (decisive + 1, uncertain),
                Severity::Medium => (decisive, uncertain + 1),
            });
    clamp_confidence(base + 5.0 * decisive as f64 - 3.0 * uncertain as f64)
}

fn clamp_confidence(raw: f64) -> u8 {
    if raw.is_nan() {
        return MIN_CONFIDENCE as u8;
    }
    raw.clamp(MIN_CONFIDENCE, MAX_CONFIDENCE).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SignalCategory;

    fn signal(severity: Severity) -> Signal {
        Signal {
            category: SignalCategory::General,
            description: String::new(),
            severity,
            score: None,
        }
    }

    #[test]
    fn test_structured_confidence_caps_at_95() {
        assert_eq!(structured_confidence(7.5, 24), 95);
    }

    #[test]
    fn test_structured_confidence_neutral_scores() {
        // 75 + 0 + 0
        assert_eq!(structured_confidence(5.0, 0), 75);
        // 60 + 4.8 + 9
        assert_eq!(structured_confidence(2.0, 6), 74);
    }

    #[test]
    fn test_legacy_confidence() {
        assert_eq!(legacy_confidence(&[signal(Severity::Low)], 6), 73);
        assert_eq!(legacy_confidence(&[signal(Severity::Medium)], 0), 47);
        assert_eq!(legacy_confidence(&[signal(Severity::High)], 24), 75);
    }

    #[test]
    fn test_confidence_always_clamped() {
        let many_medium: Vec<Signal> = (0..20).map(|_| signal(Severity::Medium)).collect();
        assert_eq!(legacy_confidence(&many_medium, 0), 30);

        let many_high: Vec<Signal> = (0..20).map(|_| signal(Severity::High)).collect();
        assert_eq!(legacy_confidence(&many_high, 100), 95);

        for average in [0.0, 2.5, 5.0, 7.5, 10.0] {
            for frames in [0, 1, 24, 1000] {
                let c = structured_confidence(average, frames);
                assert!((30..=95).contains(&c), "{} {} -> {}", average, frames, c);
            }
        }
    }
}
