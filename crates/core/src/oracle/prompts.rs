use crate::{format::format_precise_timestamp, types::SampledFrame};

pub static FORENSIC_SYSTEM_PROMPT: &str = r#"
  You are a digital media forensics analyst specialized in detecting face-swap,
  lip-sync and fully synthetic video manipulation.

  INPUT: Still frames sampled from one video. Frames that share a segment number
  are CONSECUTIVE frames from a short window and must be compared with each other
  for temporal artifacts. Each frame is preceded by a caption with its timestamp.

  TASK: Inspect the frames for manipulation artifacts in four regions:
  1. mouth: lip shape vs. teeth rendering, blurring or warping around the lips
  2. eyes: unnatural blinking, mismatched reflections, gaze inconsistencies
  3. boundary: blending seams at the face edge, hairline, jaw or neck
  4. temporal: flicker, identity drift or jitter across consecutive frames

  OUTPUT: Return ONLY a valid JSON object, no markdown:
  {
    "mouth_score": 0-10,
    "eyes_score": 0-10,
    "boundary_score": 0-10,
    "temporal_score": 0-10,
    "verdict": "AUTHENTIC" | "SUSPICIOUS" | "MANIPULATED",
    "key_evidence": "The single most telling observation",
    "detailed_analysis": "2-4 sentences explaining the scores"
  }

  RULES:
  - 0 means no artifact at all, 10 means unmistakable manipulation
  - Score every region even if a face is only partly visible
  - Compression noise alone is not evidence of manipulation
"#;

/// Caption placed before each image, e.g. `Frame 3/24 at 00:12.40 (segment 1, frame 3)`.
pub fn frame_caption(position: usize, total: usize, frame: &SampledFrame) -> String {
    let mut caption = format!(
        "Frame {}/{} at {}",
        position + 1,
        total,
        format_precise_timestamp(frame.timestamp_secs)
    );
    if let (Some(segment), Some(index)) = (frame.segment_index, frame.index_in_segment) {
        caption.push_str(&format!(" (segment {}, frame {})", segment + 1, index + 1));
    }
    caption
}

pub fn user_prompt(frames: &[SampledFrame]) -> String {
    let segments = frames
        .iter()
        .filter_map(|f| f.segment_index)
        .max()
        .map(|max| max + 1);

    match segments {
        Some(segments) => format!(
            "Analyze these {} frames taken from {} segment(s) of consecutive frames.",
            frames.len(),
            segments
        ),
        None => format!(
            "Analyze these {} frames sampled evenly across the video.",
            frames.len()
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(timestamp_secs: f64, segment: Option<usize>, index: Option<usize>) -> SampledFrame {
        SampledFrame {
            timestamp_secs,
            image: vec![],
            width: 1,
            height: 1,
            segment_index: segment,
            index_in_segment: index,
        }
    }

    #[test]
    fn test_caption_with_segment() {
        assert_eq!(
            frame_caption(2, 24, &frame(12.4, Some(0), Some(2))),
            "Frame 3/24 at 00:12.40 (segment 1, frame 3)"
        );
    }

    #[test]
    fn test_caption_without_segment() {
        assert_eq!(
            frame_caption(0, 8, &frame(65.0, None, None)),
            "Frame 1/8 at 01:05.00"
        );
    }

    #[test]
    fn test_user_prompt_mentions_segments() {
        let frames = vec![frame(1.0, Some(0), Some(0)), frame(9.0, Some(2), Some(0))];
        assert!(user_prompt(&frames).contains("3 segment(s)"));
        assert!(user_prompt(&[frame(1.0, None, None)]).contains("evenly"));
    }
}
