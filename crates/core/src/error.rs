use std::path::PathBuf;

use thiserror::Error;

use crate::oracle::ProviderError;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("segments must be at least 1")]
    NoSegments,

    #[error("frames per segment must be at least 1")]
    NoFramesPerSegment,

    #[error("segment duration must be a positive number of seconds, got {0}")]
    InvalidSegmentDuration(f64),
}

#[derive(Error, Debug)]
pub enum SamplerError {
    #[error("Decode failed for {path}: {reason}")]
    Decode { path: PathBuf, reason: String },

    #[error("Seek to {timestamp:.3}s failed: {reason}")]
    Seek { timestamp: f64, reason: String },

    #[error("Invalid sampling configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Frame encoding failed: {0}")]
    Render(#[from] image::ImageError),

    #[error("Sampler produced {actual} frames, expected {expected}")]
    FrameCount { expected: usize, actual: usize },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum OracleError {
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    #[error("No frames to analyze")]
    NoFrames,

    #[error("Oracle request timed out after {0}s")]
    Timeout(u64),

    #[error("Oracle returned {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("Invalid oracle response: {0}")]
    InvalidResponse(serde_json::Value),

    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),
}

#[derive(Error, Debug)]
pub enum DeepcheckError {
    #[error(transparent)]
    Sampler(#[from] SamplerError),

    #[error(transparent)]
    Oracle(#[from] OracleError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    JsonError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, DeepcheckError>;
