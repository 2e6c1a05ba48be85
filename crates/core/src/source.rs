//! Decodable video handles.
//!
//! A [`VideoSource`] is owned by exactly one sampling pass. The production
//! implementation shells out to `ffprobe`/`ffmpeg`, one process per seek.

use std::path::{Path, PathBuf};

use image::{DynamicImage, ImageFormat};
use serde::Deserialize;
use tokio::{fs, process::Command};

use crate::error::SamplerError;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VideoMetadata {
    pub duration_secs: f64,
    pub width: u32,
    pub height: u32,
}

/// A decoded frame at the position the decoder actually landed on.
#[derive(Debug, Clone)]
pub struct RawFrame {
    pub timestamp_secs: f64,
    pub image: DynamicImage,
}

pub trait VideoSource {
    fn metadata(&self) -> &VideoMetadata;

    /// Seek to `at_secs` and decode one frame. Callers must not issue
    /// overlapping captures on the same source.
    async fn capture(&mut self, at_secs: f64) -> Result<RawFrame, SamplerError>;

    /// Free the underlying decode resource.
    async fn release(self);
}

#[derive(Debug, Deserialize)]
struct FfprobeOutput {
    #[serde(default)]
    streams: Vec<FfprobeStream>,
    format: Option<FfprobeFormat>,
}

#[derive(Debug, Deserialize)]
struct FfprobeStream {
    codec_type: Option<String>,
    width: Option<u32>,
    height: Option<u32>,
    duration: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FfprobeFormat {
    duration: Option<String>,
}

/// Private directory holding an uploaded video for the length of one pass.
/// Removed on release, or on drop if the pass is abandoned.
#[derive(Debug)]
struct ScratchDir {
    path: PathBuf,
    removed: bool,
}

impl ScratchDir {
    async fn create() -> std::io::Result<Self> {
        let path =
            std::env::temp_dir().join(format!("deepcheck_source_{}", rand::random::<u64>()));
        fs::create_dir_all(&path).await?;
        Ok(Self {
            path,
            removed: false,
        })
    }

    /// Write an upload into a fresh scratch dir, keeping its extension.
    async fn stage(bytes: &[u8], file_name: &str) -> std::io::Result<(Self, PathBuf)> {
        let scratch = Self::create().await?;
        let extension = Path::new(file_name)
            .extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
            .unwrap_or_else(|| "mp4".to_string());
        let path = scratch.path.join(format!("input.{}", extension));
        fs::write(&path, bytes).await?;
        Ok((scratch, path))
    }

    async fn remove(mut self) {
        if let Err(e) = fs::remove_dir_all(&self.path).await {
            tracing::warn!(path = %self.path.display(), error = %e, "Failed to remove scratch dir");
        }
        self.removed = true;
    }
}

impl Drop for ScratchDir {
    fn drop(&mut self) {
        if !self.removed {
            let _ = std::fs::remove_dir_all(&self.path);
        }
    }
}

#[derive(Debug)]
pub struct FfmpegSource {
    path: PathBuf,
    metadata: VideoMetadata,
    scratch: Option<ScratchDir>,
}

impl FfmpegSource {
    /// Open a video file on disk and read its duration and dimensions.
    pub async fn open(path: &Path) -> Result<Self, SamplerError> {
        let metadata = probe(path).await?;
        tracing::debug!(
            path = %path.display(),
            duration = metadata.duration_secs,
            width = metadata.width,
            height = metadata.height,
            "Opened video source"
        );

        Ok(Self {
            path: path.to_path_buf(),
            metadata,
            scratch: None,
        })
    }

    /// Stage an in-memory upload on disk and open it. The staged copy lives
    /// until [`VideoSource::release`] or drop.
    pub async fn from_bytes(bytes: &[u8], file_name: &str) -> Result<Self, SamplerError> {
        let (scratch, path) = ScratchDir::stage(bytes, file_name).await?;
        let mut source = Self::open(&path).await?;
        source.scratch = Some(scratch);
        Ok(source)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl VideoSource for FfmpegSource {
    fn metadata(&self) -> &VideoMetadata {
        &self.metadata
    }

    async fn capture(&mut self, at_secs: f64) -> Result<RawFrame, SamplerError> {
        let seek_failed = |reason: String| SamplerError::Seek {
            timestamp: at_secs,
            reason,
        };

        let output = Command::new("ffmpeg")
            .args(["-hide_banner", "-nostdin", "-loglevel", "info"])
            .args(["-ss", &format!("{:.3}", at_secs), "-copyts"])
            .arg("-i")
            .arg(&self.path)
            .args(["-an", "-sn", "-frames:v", "1", "-vf", "showinfo"])
            .args(["-f", "image2pipe", "-vcodec", "png", "-"])
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| seek_failed(format!("failed to run ffmpeg: {}", e)))?;

        let stderr = String::from_utf8_lossy(&output.stderr);
        if !output.status.success() {
            return Err(seek_failed(stderr.trim().to_string()));
        }
        if output.stdout.is_empty() {
            return Err(seek_failed("no frame decoded at this position".to_string()));
        }

        let image = image::load_from_memory_with_format(&output.stdout, ImageFormat::Png)
            .map_err(|e| seek_failed(format!("undecodable frame: {}", e)))?;

        Ok(RawFrame {
            timestamp_secs: parse_pts_time(&stderr).unwrap_or(at_secs),
            image,
        })
    }

    async fn release(mut self) {
        if let Some(scratch) = self.scratch.take() {
            scratch.remove().await;
        }
    }
}

async fn probe(path: &Path) -> Result<VideoMetadata, SamplerError> {
    let decode_failed = |reason: String| SamplerError::Decode {
        path: path.to_path_buf(),
        reason,
    };

    let output = Command::new("ffprobe")
        .args(["-v", "error", "-print_format", "json"])
        .args(["-show_format", "-show_streams"])
        .arg(path)
        .kill_on_drop(true)
        .output()
        .await
        .map_err(|e| decode_failed(format!("failed to run ffprobe: {}", e)))?;

    if !output.status.success() {
        return Err(decode_failed(
            String::from_utf8_lossy(&output.stderr).trim().to_string(),
        ));
    }

    let probe: FfprobeOutput = serde_json::from_slice(&output.stdout)
        .map_err(|e| decode_failed(format!("unreadable ffprobe output: {}", e)))?;

    metadata_from_probe(&probe).map_err(decode_failed)
}

fn metadata_from_probe(probe: &FfprobeOutput) -> Result<VideoMetadata, String> {
    let stream = probe
        .streams
        .iter()
        .find(|s| s.codec_type.as_deref() == Some("video"))
        .ok_or_else(|| "no video stream".to_string())?;

    let duration_secs = probe
        .format
        .as_ref()
        .and_then(|f| f.duration.as_deref())
        .and_then(|d| d.parse::<f64>().ok())
        .or_else(|| stream.duration.as_deref().and_then(|d| d.parse().ok()))
        .filter(|d| d.is_finite() && *d > 0.0)
        .ok_or_else(|| "missing or zero duration".to_string())?;

    match (stream.width, stream.height) {
        (Some(width), Some(height)) if width > 0 && height > 0 => Ok(VideoMetadata {
            duration_secs,
            width,
            height,
        }),
        _ => Err("missing frame dimensions".to_string()),
    }
}

/// Extract the first `pts_time:` value printed by ffmpeg's `showinfo` filter.
fn parse_pts_time(stderr: &str) -> Option<f64> {
    stderr
        .lines()
        .filter(|line| line.contains("showinfo"))
        .find_map(|line| {
            let rest = &line[line.find("pts_time:")? + "pts_time:".len()..];
            rest.split_whitespace().next()?.parse::<f64>().ok()
        })
        .filter(|t| t.is_finite() && *t >= 0.0)
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn test_parse_pts_time_from_showinfo() {
        let stderr = "Input #0, mov,mp4\n\
            [Parsed_showinfo_0 @ 0x5581] config in time_base: 1/15360\n\
            [Parsed_showinfo_0 @ 0x5581] n:   0 pts: 190464 pts_time:12.4    duration: 512\n";
        assert_eq!(parse_pts_time(stderr), Some(12.4));
    }

    #[test]
    fn test_parse_pts_time_missing() {
        assert_eq!(parse_pts_time("frame=    1 fps=0.0 q=-0.0"), None);
    }

    #[test]
    fn test_metadata_prefers_format_duration() {
        let probe: FfprobeOutput = serde_json::from_str(
            r#"{
                "streams": [
                    {"codec_type": "audio", "duration": "9.0"},
                    {"codec_type": "video", "width": 1920, "height": 1080, "duration": "10.0"}
                ],
                "format": {"duration": "10.5"}
            }"#,
        )
        .unwrap();

        let metadata = metadata_from_probe(&probe).unwrap();
        assert_eq!(metadata.duration_secs, 10.5);
        assert_eq!((metadata.width, metadata.height), (1920, 1080));
    }

    #[test]
    fn test_metadata_falls_back_to_stream_duration() {
        let probe: FfprobeOutput = serde_json::from_str(
            r#"{"streams": [{"codec_type": "video", "width": 640, "height": 360, "duration": "4.2"}],
                "format": {}}"#,
        )
        .unwrap();

        assert_eq!(metadata_from_probe(&probe).unwrap().duration_secs, 4.2);
    }

    #[test]
    fn test_metadata_rejects_audio_only() {
        let probe: FfprobeOutput = serde_json::from_str(
            r#"{"streams": [{"codec_type": "audio"}], "format": {"duration": "3.0"}}"#,
        )
        .unwrap();

        assert!(metadata_from_probe(&probe).is_err());
    }

    #[tokio::test]
    async fn test_scratch_dir_removed_on_drop() {
        let scratch = ScratchDir::create().await.unwrap();
        let path = scratch.path.clone();
        assert!(path.exists());
        drop(scratch);
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_release_removes_staged_upload() {
        let (scratch, path) = ScratchDir::stage(b"not really a video", "clip.WEBM")
            .await
            .unwrap();
        let dir = scratch.path.clone();
        assert_eq!(path.file_name().unwrap(), "input.webm");
        assert!(path.exists());

        let source = FfmpegSource {
            path,
            metadata: VideoMetadata {
                duration_secs: 1.0,
                width: 2,
                height: 2,
            },
            scratch: Some(scratch),
        };
        source.release().await;
        assert!(!dir.exists());
    }

    #[tokio::test]
    async fn test_from_bytes_rejects_undecodable_upload() {
        // fails in ffprobe, or when spawning it if ffprobe isn't installed
        let result = FfmpegSource::from_bytes(b"not really a video", "clip.mp4").await;
        assert_matches!(result, Err(SamplerError::Decode { .. }));
    }
}
