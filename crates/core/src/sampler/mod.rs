//! Frame sampling.
//!
//! Picks a handful of timestamps from a video and captures one still per
//! timestamp, strictly one seek at a time. Frames inside a segment are
//! consecutive so the oracle can look for frame-to-frame artifacts.

pub mod plan;
pub mod render;

use rand::{SeedableRng, rngs::StdRng};

use crate::{
    error::SamplerError,
    source::VideoSource,
    types::SampledFrame,
};

pub use plan::{PlannedFrame, Placement, SamplingConfig, SamplingPlan, SamplingPreset};
pub use render::{RenderOptions, RenderedFrame, render_frame};

/// Share of the overall progress bar that belongs to sampling.
pub const SAMPLING_PROGRESS: ProgressRange = ProgressRange {
    start: 0.0,
    end: 30.0,
};

/// Maps `completed / total` into a sub-range of an outer progress scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressRange {
    pub start: f64,
    pub end: f64,
}

impl ProgressRange {
    pub fn scale(&self, completed: usize, total: usize) -> f64 {
        if total == 0 {
            return self.end;
        }
        let fraction = (completed as f64 / total as f64).clamp(0.0, 1.0);
        self.start + (self.end - self.start) * fraction
    }
}

pub struct FrameSampler {
    config: SamplingConfig,
    render: RenderOptions,
    progress: ProgressRange,
    rng: StdRng,
}

impl FrameSampler {
    /// Sampler with an OS-seeded random source.
    pub fn new(config: SamplingConfig) -> Self {
        Self {
            config,
            render: RenderOptions::default(),
            progress: SAMPLING_PROGRESS,
            rng: StdRng::from_os_rng(),
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = rng;
        self
    }

    pub fn with_render_options(mut self, render: RenderOptions) -> Self {
        self.render = render;
        self
    }

    pub fn with_progress_range(mut self, progress: ProgressRange) -> Self {
        self.progress = progress;
        self
    }

    pub fn config(&self) -> &SamplingConfig {
        &self.config
    }

    /// Capture every planned frame from `source`, reporting progress after
    /// each one. The source is released before returning, whatever the
    /// outcome; any failed capture fails the whole pass.
    pub async fn sample<S, P>(
        &mut self,
        mut source: S,
        mut on_progress: P,
    ) -> Result<Vec<SampledFrame>, SamplerError>
    where
        S: VideoSource,
        P: FnMut(f64),
    {
        let result = self.capture_all(&mut source, &mut on_progress).await;
        source.release().await;

        if let Err(e) = &result {
            tracing::warn!(error = %e, "Sampling failed");
        }
        result
    }

    async fn capture_all<S, P>(
        &mut self,
        source: &mut S,
        on_progress: &mut P,
    ) -> Result<Vec<SampledFrame>, SamplerError>
    where
        S: VideoSource,
        P: FnMut(f64),
    {
        let duration = source.metadata().duration_secs;
        let plan = SamplingPlan::build(duration, &self.config, &mut self.rng)?;
        let total = plan.total_frames();

        tracing::info!(
            duration,
            placement = self.config.placement.name(),
            segments = plan.segment_starts.len(),
            frames = total,
            "Sampling frames"
        );

        let mut frames = Vec::with_capacity(total);
        on_progress(self.progress.scale(0, total));

        for planned in &plan.frames {
            let raw = source.capture(planned.requested_secs).await?;
            let rendered = render_frame(&raw.image, &self.render)?;

            tracing::debug!(
                requested = planned.requested_secs,
                actual = raw.timestamp_secs,
                segment = ?planned.segment_index,
                index = ?planned.index_in_segment,
                bytes = rendered.jpeg.len(),
                "Captured frame"
            );

            frames.push(SampledFrame {
                timestamp_secs: raw.timestamp_secs,
                image: rendered.jpeg,
                width: rendered.width,
                height: rendered.height,
                segment_index: planned.segment_index,
                index_in_segment: planned.index_in_segment,
            });
            on_progress(self.progress.scale(frames.len(), total));
        }

        if frames.len() != self.config.total_frames() {
            return Err(SamplerError::FrameCount {
                expected: self.config.total_frames(),
                actual: frames.len(),
            });
        }

        Ok(frames)
    }
}
