//! Deepcheck Core Library
//!
//! Samples short runs of consecutive frames from a video, sends them to a
//! vision-language model with a forensic prompt, and turns the model's reply
//! into a risk level with supporting signals.

pub mod error;
pub mod format;
pub mod interpreter;
pub mod oracle;
pub mod report;
pub mod sampler;
pub mod source;
pub mod types;

// Re-export commonly used items at crate root
pub use error::{ConfigError, DeepcheckError, OracleError, Result, SamplerError};
pub use format::{format_precise_timestamp, format_report_readable, format_timestamp};
pub use interpreter::{RiskLevelInfo, interpret, interpret_raw};
pub use oracle::{OracleClient, OracleConfig, OracleResponse, Provider, StructuredResponse};
pub use report::{AnalysisReport, SourceInfo, load_report, save_report};
pub use sampler::{
    FrameSampler, Placement, ProgressRange, RenderOptions, SAMPLING_PROGRESS, SamplingConfig,
    SamplingPlan, SamplingPreset,
};
pub use source::{FfmpegSource, RawFrame, VideoMetadata, VideoSource};
pub use types::{
    RegionScores, RiskAssessment, RiskLevel, SampledFrame, Severity, Signal, SignalCategory,
    Verdict,
};
