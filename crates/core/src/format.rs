use crate::{report::AnalysisReport, types::Severity};

/// Format seconds as MM:SS timestamp
pub fn format_timestamp(seconds: f64) -> String {
    let mins = (seconds / 60.0) as u32;
    let secs = (seconds % 60.0) as u32;
    format!("{:02}:{:02}", mins, secs)
}

/// Format seconds as MM:SS.ss, for frames a fraction of a second apart
pub fn format_precise_timestamp(seconds: f64) -> String {
    let seconds = seconds.max(0.0);
    let mins = (seconds / 60.0) as u32;
    let secs = seconds - mins as f64 * 60.0;
    format!("{:02}:{:05.2}", mins, secs)
}

fn severity_marker(severity: Severity) -> &'static str {
    match severity {
        Severity::Low => "[low]   ",
        Severity::Medium => "[medium]",
        Severity::High => "[high]  ",
    }
}

/// Format an analysis report as human-readable markdown
pub fn format_report_readable(report: &AnalysisReport) -> String {
    let assessment = &report.assessment;
    let info = assessment.risk_level.info();
    let mut output = String::new();

    output.push_str(&format!("# {}\n\n", info.label));
    output.push_str(&format!("{}\n\n", info.description));

    output.push_str(&format!(
        "**File:** {} | **Duration:** {} | **Frames analyzed:** {} | **Confidence:** {}%\n\n",
        report.source.file_name,
        format_timestamp(report.source.duration_secs),
        report.source.frame_count,
        assessment.confidence
    ));

    if let Some(verdict) = assessment.verdict {
        output.push_str(&format!("**Model verdict:** {:?}\n\n", verdict));
    }

    if let Some(scores) = &assessment.scores {
        output.push_str("## Region Scores\n\n");
        output.push_str(&format!("• Mouth: {:.1}/10\n", scores.mouth));
        output.push_str(&format!("• Eyes: {:.1}/10\n", scores.eyes));
        output.push_str(&format!("• Face boundary: {:.1}/10\n", scores.boundary));
        output.push_str(&format!("• Temporal: {:.1}/10\n", scores.temporal));
        output.push_str(&format!("• Average: {:.2}/10\n", scores.average));
        output.push('\n');
    }

    output.push_str("## Signals\n\n");
    for signal in &assessment.signals {
        output.push_str(&format!(
            "{} {}: {}\n",
            severity_marker(signal.severity),
            signal.category.label(),
            signal.description
        ));
    }
    output.push('\n');

    if let Some(analysis) = &assessment.analysis {
        output.push_str("## Analysis\n\n");
        output.push_str(analysis);
        output.push_str("\n\n");
    }

    output.push_str(&format!(
        "Analysis {} at {}\n",
        report.id,
        report.analyzed_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_timestamp() {
        assert_eq!(format_timestamp(0.0), "00:00");
        assert_eq!(format_timestamp(125.9), "02:05");
    }

    #[test]
    fn test_format_precise_timestamp() {
        assert_eq!(format_precise_timestamp(12.4), "00:12.40");
        assert_eq!(format_precise_timestamp(65.0), "01:05.00");
        assert_eq!(format_precise_timestamp(-1.0), "00:00.00");
    }
}
