use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Minimum gap, on top of the segment span, between two random segment starts.
const SEGMENT_GAP_SECS: f64 = 1.0;
const MAX_PLACEMENT_ATTEMPTS: usize = 50;
const EDGE_FRACTION: f64 = 0.1;
const MIN_EDGE_SECS: f64 = 3.0;
/// Below this duration fixed-fraction placement spreads across the safe window.
const SHORT_MEDIA_SECS: f64 = 3.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Placement {
    Uniform,
    #[default]
    RandomNonOverlapping,
    FixedFraction,
}

impl Placement {
    pub fn name(&self) -> &'static str {
        match self {
            Placement::Uniform => "uniform",
            Placement::RandomNonOverlapping => "random-non-overlapping",
            Placement::FixedFraction => "fixed-fraction",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SamplingConfig {
    /// Number of distinct temporal neighborhoods.
    pub segments: usize,
    /// Consecutive frames captured per neighborhood.
    pub frames_per_segment: usize,
    /// Wall-clock span of one neighborhood.
    pub segment_duration_secs: f64,
    pub placement: Placement,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        SamplingPreset::Standard.config()
    }
}

impl SamplingConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.segments == 0 {
            return Err(ConfigError::NoSegments);
        }
        if self.frames_per_segment == 0 {
            return Err(ConfigError::NoFramesPerSegment);
        }
        if !self.segment_duration_secs.is_finite() || self.segment_duration_secs <= 0.0 {
            return Err(ConfigError::InvalidSegmentDuration(
                self.segment_duration_secs,
            ));
        }
        Ok(())
    }

    pub fn total_frames(&self) -> usize {
        self.segments * self.frames_per_segment
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SamplingPreset {
    /// Eight evenly spaced single frames.
    Quick,
    /// Three random 2s neighborhoods of eight frames each.
    #[default]
    Standard,
    /// Three neighborhoods at 25/50/75% of the video, six frames over 1s each.
    Deterministic,
    /// One random 1s neighborhood of fifteen frames.
    Focused,
}

impl SamplingPreset {
    pub fn config(&self) -> SamplingConfig {
        match self {
            SamplingPreset::Quick => SamplingConfig {
                segments: 8,
                frames_per_segment: 1,
                segment_duration_secs: 1.0,
                placement: Placement::Uniform,
            },
            SamplingPreset::Standard => SamplingConfig {
                segments: 3,
                frames_per_segment: 8,
                segment_duration_secs: 2.0,
                placement: Placement::RandomNonOverlapping,
            },
            SamplingPreset::Deterministic => SamplingConfig {
                segments: 3,
                frames_per_segment: 6,
                segment_duration_secs: 1.0,
                placement: Placement::FixedFraction,
            },
            SamplingPreset::Focused => SamplingConfig {
                segments: 1,
                frames_per_segment: 15,
                segment_duration_secs: 1.0,
                placement: Placement::RandomNonOverlapping,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlannedFrame {
    pub requested_secs: f64,
    pub segment_index: Option<usize>,
    pub index_in_segment: Option<usize>,
}

/// Where to seek, in capture order.
#[derive(Debug, Clone, PartialEq)]
pub struct SamplingPlan {
    /// Segment starts, ascending. For uniform placement, one per frame.
    pub segment_starts: Vec<f64>,
    pub frames_per_segment: usize,
    /// Gap between consecutive frames inside a segment.
    pub frame_interval_secs: f64,
    pub frames: Vec<PlannedFrame>,
    /// Set when random placement gave up and spread segments evenly.
    pub fell_back_to_even: bool,
}

impl SamplingPlan {
    pub fn build<R: Rng>(
        duration_secs: f64,
        config: &SamplingConfig,
        rng: &mut R,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let duration = duration_secs.max(0.0);

        if config.placement == Placement::Uniform {
            return Ok(Self::uniform(duration, config.total_frames()));
        }

        let span = config.segment_duration_secs.min(duration);

        let (starts, fell_back_to_even) = match config.placement {
            Placement::RandomNonOverlapping => random_starts(
                config.segments,
                config.segment_duration_secs,
                duration,
                span,
                rng,
            ),
            _ => (
                fixed_fraction_starts(config.segments, duration, SafeWindow::new(duration, span)),
                false,
            ),
        };

        let latest_start = (duration - span).max(0.0);
        let mut segment_starts: Vec<f64> = starts
            .into_iter()
            .map(|start| start.clamp(0.0, latest_start))
            .collect();
        segment_starts.sort_by(f64::total_cmp);

        let frame_interval_secs = span / config.frames_per_segment as f64;
        let frames = segment_starts
            .iter()
            .enumerate()
            .flat_map(|(segment, start)| {
                (0..config.frames_per_segment).map(move |index| PlannedFrame {
                    requested_secs: start + index as f64 * frame_interval_secs,
                    segment_index: Some(segment),
                    index_in_segment: Some(index),
                })
            })
            .collect();

        Ok(Self {
            segment_starts,
            frames_per_segment: config.frames_per_segment,
            frame_interval_secs,
            frames,
            fell_back_to_even,
        })
    }

    fn uniform(duration: f64, count: usize) -> Self {
        let step = duration / (count + 1) as f64;
        let segment_starts: Vec<f64> = (1..=count).map(|k| step * k as f64).collect();
        let frames = segment_starts
            .iter()
            .map(|&requested_secs| PlannedFrame {
                requested_secs,
                segment_index: None,
                index_in_segment: None,
            })
            .collect();

        Self {
            segment_starts,
            frames_per_segment: 1,
            frame_interval_secs: 0.0,
            frames,
            fell_back_to_even: false,
        }
    }

    pub fn total_frames(&self) -> usize {
        self.frames.len()
    }
}

/// Range of admissible segment starts, away from intros and outros.
#[derive(Debug, Clone, Copy, PartialEq)]
struct SafeWindow {
    start: f64,
    end: f64,
}

impl SafeWindow {
    /// Margin of `max(10%, 3s)`, then 10%, then the whole media.
    fn candidates(duration: f64, span: f64) -> [Self; 3] {
        let proportional = duration * EDGE_FRACTION;
        let with_margin = |margin: f64| Self {
            start: margin,
            end: duration - margin - span,
        };

        [
            with_margin(proportional.max(MIN_EDGE_SECS)),
            with_margin(proportional),
            Self::whole(duration, span),
        ]
    }

    fn whole(duration: f64, span: f64) -> Self {
        Self {
            start: 0.0,
            end: (duration - span).max(0.0),
        }
    }

    /// Widest-margin window at least `min_len` long.
    fn fitting(duration: f64, span: f64, min_len: f64) -> Option<Self> {
        Self::candidates(duration, span)
            .into_iter()
            .find(|window| window.len() >= min_len)
    }

    fn new(duration: f64, span: f64) -> Self {
        Self::fitting(duration, span, 0.0).unwrap_or_else(|| Self::whole(duration, span))
    }

    fn len(&self) -> f64 {
        self.end - self.start
    }

    fn evenly_spaced(&self, count: usize) -> Vec<f64> {
        if count == 1 {
            return vec![self.start + self.len() / 2.0];
        }
        let step = self.len() / (count - 1) as f64;
        (0..count).map(|i| self.start + step * i as f64).collect()
    }
}

fn random_starts<R: Rng>(
    count: usize,
    segment_duration: f64,
    duration: f64,
    span: f64,
    rng: &mut R,
) -> (Vec<f64>, bool) {
    let min_gap = segment_duration + SEGMENT_GAP_SECS;
    let required = min_gap * (count - 1) as f64;

    let Some(window) = SafeWindow::fitting(duration, span, required) else {
        tracing::warn!(
            duration,
            segments = count,
            "Media too short for non-overlapping segments, spacing evenly"
        );
        return (SafeWindow::whole(duration, span).evenly_spaced(count), true);
    };

    let mut accepted: Vec<f64> = Vec::with_capacity(count);
    for _ in 0..count {
        let candidate = (0..MAX_PLACEMENT_ATTEMPTS)
            .map(|_| {
                if window.len() > 0.0 {
                    rng.random_range(window.start..=window.end)
                } else {
                    window.start
                }
            })
            .find(|candidate| accepted.iter().all(|s| (candidate - s).abs() >= min_gap));

        match candidate {
            Some(start) => accepted.push(start),
            None => {
                tracing::warn!(
                    accepted = accepted.len(),
                    segments = count,
                    "Random placement exhausted attempts, spacing evenly"
                );
                return (window.evenly_spaced(count), true);
            }
        }
    }

    (accepted, false)
}

fn fixed_fraction_starts(count: usize, duration: f64, window: SafeWindow) -> Vec<f64> {
    if duration < SHORT_MEDIA_SECS {
        return window.evenly_spaced(count);
    }
    (1..=count)
        .map(|k| duration * k as f64 / (count + 1) as f64)
        .collect()
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;

    fn config(placement: Placement, segments: usize, per: usize, span: f64) -> SamplingConfig {
        SamplingConfig {
            segments,
            frames_per_segment: per,
            segment_duration_secs: span,
            placement,
        }
    }

    fn assert_within_media(plan: &SamplingPlan, duration: f64, span: f64) {
        for start in &plan.segment_starts {
            assert!(*start >= 0.0, "negative start {}", start);
            assert!(
                start + span.min(duration) <= duration + 1e-9,
                "segment at {} overruns {}",
                start,
                duration
            );
        }
        for frame in &plan.frames {
            assert!(frame.requested_secs >= 0.0 && frame.requested_secs < duration);
        }
    }

    #[test]
    fn test_uniform_spacing() {
        let mut rng = StdRng::seed_from_u64(1);
        let plan = SamplingPlan::build(90.0, &config(Placement::Uniform, 8, 1, 1.0), &mut rng)
            .unwrap();

        assert_eq!(plan.total_frames(), 8);
        assert_eq!(plan.frames[0].requested_secs, 10.0);
        assert_eq!(plan.frames[7].requested_secs, 80.0);
        assert!(plan.frames.iter().all(|f| f.segment_index.is_none()));
    }

    #[test]
    fn test_uniform_uses_all_requested_frames() {
        let mut rng = StdRng::seed_from_u64(1);
        let plan = SamplingPlan::build(30.0, &config(Placement::Uniform, 2, 3, 1.0), &mut rng)
            .unwrap();
        assert_eq!(plan.total_frames(), 6);
    }

    #[test]
    fn test_fixed_fraction_quarters() {
        let mut rng = StdRng::seed_from_u64(1);
        let plan = SamplingPlan::build(
            100.0,
            &config(Placement::FixedFraction, 3, 6, 1.0),
            &mut rng,
        )
        .unwrap();

        assert_eq!(plan.segment_starts, vec![25.0, 50.0, 75.0]);
        assert_eq!(plan.total_frames(), 18);
        assert_eq!(plan.frames[1].requested_secs, 25.0 + 1.0 / 6.0);
        assert_eq!(plan.frames[6].segment_index, Some(1));
        assert_eq!(plan.frames[6].index_in_segment, Some(0));
    }

    #[test]
    fn test_fixed_fraction_stays_inside_media() {
        let mut rng = StdRng::seed_from_u64(1);
        for duration in [0.4, 1.0, 2.0, 2.9, 3.0, 3.5, 5.0, 7.3, 60.0, 3600.0] {
            for span in [1.0, 2.0] {
                let cfg = config(Placement::FixedFraction, 3, 6, span);
                let plan = SamplingPlan::build(duration, &cfg, &mut rng).unwrap();
                assert_eq!(plan.total_frames(), 18);
                assert_within_media(&plan, duration, span);
            }
        }
    }

    #[test]
    fn test_fixed_fraction_short_media_uses_safe_window() {
        let mut rng = StdRng::seed_from_u64(1);
        let plan =
            SamplingPlan::build(2.5, &config(Placement::FixedFraction, 3, 2, 1.0), &mut rng)
                .unwrap();

        // window is [0.25, 1.25]
        assert_eq!(plan.segment_starts, vec![0.25, 0.75, 1.25]);
    }

    #[test]
    fn test_random_segments_do_not_overlap() {
        for seed in 0..200 {
            let mut rng = StdRng::seed_from_u64(seed);
            let cfg = config(Placement::RandomNonOverlapping, 3, 8, 2.0);
            let plan = SamplingPlan::build(120.0, &cfg, &mut rng).unwrap();

            assert_eq!(plan.total_frames(), 24);
            assert_within_media(&plan, 120.0, 2.0);
            if !plan.fell_back_to_even {
                for pair in plan.segment_starts.windows(2) {
                    assert!(pair[1] - pair[0] >= 3.0, "seed {}: {:?}", seed, pair);
                }
            }
            // safe window keeps away from both ends
            assert!(plan.segment_starts[0] >= 12.0);
            assert!(plan.segment_starts[2] <= 120.0 - 12.0 - 2.0);
        }
    }

    #[test]
    fn test_random_is_reproducible_with_seed() {
        let cfg = config(Placement::RandomNonOverlapping, 3, 8, 2.0);
        let a = SamplingPlan::build(300.0, &cfg, &mut StdRng::seed_from_u64(42)).unwrap();
        let b = SamplingPlan::build(300.0, &cfg, &mut StdRng::seed_from_u64(42)).unwrap();
        assert_eq!(a, b);
    }

    fn assert_min_gap(plan: &SamplingPlan, min_gap: f64) {
        for pair in plan.segment_starts.windows(2) {
            assert!(
                pair[1] - pair[0] >= min_gap - 1e-9,
                "segments too close: {:?}",
                plan.segment_starts
            );
        }
    }

    #[test]
    fn test_random_widens_window_before_spacing_evenly() {
        let cfg = config(Placement::RandomNonOverlapping, 3, 8, 2.0);

        // 8s media: the 3s and 10% margins are too tight, the whole media fits exactly
        let plan = SamplingPlan::build(8.0, &cfg, &mut StdRng::seed_from_u64(7)).unwrap();
        assert!(plan.fell_back_to_even);
        assert_eq!(plan.segment_starts, vec![0.0, 3.0, 6.0]);
        assert_eq!(plan.total_frames(), 24);
        assert_within_media(&plan, 8.0, 2.0);

        for duration in [9.0, 10.0, 12.0, 15.0] {
            for seed in 0..20 {
                let mut rng = StdRng::seed_from_u64(seed);
                let plan = SamplingPlan::build(duration, &cfg, &mut rng).unwrap();

                assert_min_gap(&plan, 3.0);
                assert_within_media(&plan, duration, 2.0);
                let mut requested: Vec<f64> =
                    plan.frames.iter().map(|f| f.requested_secs).collect();
                requested.dedup();
                assert_eq!(requested.len(), 24, "duplicate frames at {}s", duration);
            }
        }
    }

    #[test]
    fn test_random_overlaps_only_when_media_too_short() {
        let mut rng = StdRng::seed_from_u64(7);
        let cfg = config(Placement::RandomNonOverlapping, 3, 8, 2.0);
        // 4s media leaves 2s of admissible starts, three segments need 6s
        let plan = SamplingPlan::build(4.0, &cfg, &mut rng).unwrap();

        assert!(plan.fell_back_to_even);
        assert_eq!(plan.segment_starts, vec![0.0, 1.0, 2.0]);
        assert_within_media(&plan, 4.0, 2.0);
    }

    #[test]
    fn test_random_segments_sorted_ascending() {
        let mut rng = StdRng::seed_from_u64(3);
        let cfg = config(Placement::RandomNonOverlapping, 5, 2, 1.0);
        let plan = SamplingPlan::build(600.0, &cfg, &mut rng).unwrap();
        assert!(plan.segment_starts.windows(2).all(|p| p[0] <= p[1]));
        let requested: Vec<f64> = plan.frames.iter().map(|f| f.requested_secs).collect();
        assert!(requested.windows(2).all(|p| p[0] < p[1]));
    }

    #[test]
    fn test_segment_longer_than_media_shrinks_span() {
        let mut rng = StdRng::seed_from_u64(0);
        let cfg = config(Placement::RandomNonOverlapping, 1, 10, 2.0);
        let plan = SamplingPlan::build(1.5, &cfg, &mut rng).unwrap();

        assert_eq!(plan.segment_starts, vec![0.0]);
        assert!((plan.frame_interval_secs - 0.15).abs() < 1e-9);
        assert_within_media(&plan, 1.5, 2.0);
    }

    #[test]
    fn test_safe_window_margins() {
        assert_eq!(
            SafeWindow::new(120.0, 2.0),
            SafeWindow {
                start: 12.0,
                end: 106.0
            }
        );
        // 10% is below the 3s floor
        assert_eq!(
            SafeWindow::new(20.0, 2.0),
            SafeWindow {
                start: 3.0,
                end: 15.0
            }
        );
        // 3s floor doesn't fit, proportional margin does
        assert_eq!(
            SafeWindow::new(5.0, 1.0),
            SafeWindow {
                start: 0.5,
                end: 3.5
            }
        );
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut rng = StdRng::seed_from_u64(0);
        let cfg = config(Placement::FixedFraction, 0, 6, 1.0);
        assert!(SamplingPlan::build(10.0, &cfg, &mut rng).is_err());
        let cfg = config(Placement::FixedFraction, 3, 6, f64::NAN);
        assert!(SamplingPlan::build(10.0, &cfg, &mut rng).is_err());
    }
}
