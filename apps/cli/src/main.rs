use std::{
    path::PathBuf,
    time::{Duration, Instant},
};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::fs;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use deepcheck_core::{
    AnalysisReport, FfmpegSource, FrameSampler, OracleClient, OracleConfig, OracleResponse,
    Placement, Provider, SamplingConfig, SamplingPreset, SourceInfo, VideoSource,
    format_report_readable, interpret, save_report,
};

/// Where the oracle call and interpretation sit on the 0-100 progress bar.
const ORACLE_PROGRESS: u64 = 30;
const INTERPRET_PROGRESS: u64 = 90;

fn format_duration(d: Duration) -> String {
    let secs = d.as_secs_f64();
    if secs < 60.0 {
        format!("{:.1}s", secs)
    } else {
        format!("{:.0}m {:.0}s", (secs / 60.0).floor(), (secs % 60.0).floor())
    }
}

/// CLI wrapper for Provider enum (needed for clap ValueEnum)
#[derive(Clone, Copy, Default, ValueEnum)]
enum CliProvider {
    #[default]
    Openai,
    Grok,
    Gemini,
}

impl From<CliProvider> for Provider {
    fn from(cli: CliProvider) -> Self {
        match cli {
            CliProvider::Openai => Provider::Openai,
            CliProvider::Grok => Provider::Grok,
            CliProvider::Gemini => Provider::Gemini,
        }
    }
}

#[derive(Clone, Copy, Default, ValueEnum)]
enum CliPreset {
    Quick,
    #[default]
    Standard,
    Deterministic,
    Focused,
}

impl From<CliPreset> for SamplingPreset {
    fn from(cli: CliPreset) -> Self {
        match cli {
            CliPreset::Quick => SamplingPreset::Quick,
            CliPreset::Standard => SamplingPreset::Standard,
            CliPreset::Deterministic => SamplingPreset::Deterministic,
            CliPreset::Focused => SamplingPreset::Focused,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum CliPlacement {
    Uniform,
    Random,
    Fixed,
}

impl From<CliPlacement> for Placement {
    fn from(cli: CliPlacement) -> Self {
        match cli {
            CliPlacement::Uniform => Placement::Uniform,
            CliPlacement::Random => Placement::RandomNonOverlapping,
            CliPlacement::Fixed => Placement::FixedFraction,
        }
    }
}

#[derive(Parser)]
#[command(name = "deepcheck")]
#[command(
    about = "Sample frames from a video and ask a vision model how likely it is to be manipulated"
)]
struct Cli {
    /// Video file
    video: PathBuf,

    /// Vision model provider
    #[arg(short, long, default_value = "openai")]
    provider: CliProvider,

    /// Sampling preset
    #[arg(long, default_value = "standard")]
    preset: CliPreset,

    /// Override the preset's segment placement
    #[arg(long)]
    placement: Option<CliPlacement>,

    /// Override the number of segments
    #[arg(long)]
    segments: Option<usize>,

    /// Override the number of consecutive frames per segment
    #[arg(long)]
    frames_per_segment: Option<usize>,

    /// Override the span of one segment, in seconds
    #[arg(long)]
    segment_duration: Option<f64>,

    /// Seed for random segment placement, for reproducible runs
    #[arg(long)]
    seed: Option<u64>,

    /// Oracle request timeout, in seconds
    #[arg(long, default_value_t = 120)]
    timeout: u64,

    /// Where to write the JSON report. Defaults to <video>.deepcheck.json
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print the JSON report instead of the readable one
    #[arg(long)]
    json: bool,
}

impl Cli {
    fn sampling_config(&self) -> SamplingConfig {
        let mut config = SamplingPreset::from(self.preset).config();
        if let Some(placement) = self.placement {
            config.placement = placement.into();
        }
        if let Some(segments) = self.segments {
            config.segments = segments;
        }
        if let Some(frames) = self.frames_per_segment {
            config.frames_per_segment = frames;
        }
        if let Some(span) = self.segment_duration {
            config.segment_duration_secs = span;
        }
        config
    }
}

fn create_spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
            .template("{spinner:.cyan} {msg}")
            .unwrap(),
    );
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

fn create_progress_bar() -> ProgressBar {
    let pb = ProgressBar::new(100);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.cyan} [{bar:40.cyan/blue}] {pos:>3}% {msg}")
            .unwrap()
            .progress_chars("=> "),
    );
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "deepcheck=warn,deepcheck_core=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();
    let provider: Provider = cli.provider.into();
    let sampling_config = cli.sampling_config();
    sampling_config.validate()?;

    // Validate API key early
    let oracle = match OracleClient::from_env(
        provider,
        OracleConfig {
            timeout_secs: cli.timeout,
            ..OracleConfig::default()
        },
    ) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            std::process::exit(1);
        }
    };

    println!(
        "\n{}  {}\n",
        style("deepcheck").cyan().bold(),
        style("Video Manipulation Check").dim()
    );

    let total_start = Instant::now();

    // Step 1: Probe
    let spinner = create_spinner("Reading video...");
    let source = FfmpegSource::open(&cli.video)
        .await
        .with_context(|| format!("cannot open {}", cli.video.display()))?;
    let metadata = *source.metadata();
    let file_size_bytes = fs::metadata(&cli.video).await?.len();
    spinner.finish_with_message(format!(
        "{} Opened: {} {}",
        style("✓").green().bold(),
        style(cli.video.display()).dim(),
        style(format!(
            "[{}x{}, {:.1}s]",
            metadata.width, metadata.height, metadata.duration_secs
        ))
        .dim()
    ));

    // Step 2: Sample frames (0-30%)
    let step_start = Instant::now();
    let pb = create_progress_bar();
    pb.set_message(format!(
        "Sampling {} frames ({})...",
        sampling_config.total_frames(),
        sampling_config.placement.name()
    ));

    let mut sampler = FrameSampler::new(sampling_config);
    if let Some(seed) = cli.seed {
        sampler = sampler.with_seed(seed);
    }
    let frames = match sampler
        .sample(source, |progress| pb.set_position(progress.round() as u64))
        .await
    {
        Ok(frames) => frames,
        Err(e) => {
            pb.abandon_with_message(format!("{} Sampling failed", style("✗").red().bold()));
            return Err(e.into());
        }
    };
    pb.println(format!(
        "{} Sampled {} frames {}",
        style("✓").green().bold(),
        frames.len(),
        style(format!("[{}]", format_duration(step_start.elapsed()))).dim()
    ));

    // Step 3: Ask the oracle (30-90%)
    let step_start = Instant::now();
    pb.set_position(ORACLE_PROGRESS);
    pb.set_message(format!("Analyzing with {}...", provider.name()));
    let raw = match oracle.analyze(&frames).await {
        Ok(raw) => raw,
        Err(e) => {
            pb.abandon_with_message(format!("{} Analysis failed", style("✗").red().bold()));
            return Err(e.into());
        }
    };
    pb.println(format!(
        "{} Analyzed with {} {}",
        style("✓").green().bold(),
        provider.name(),
        style(format!("[{}]", format_duration(step_start.elapsed()))).dim()
    ));

    // Step 4: Interpret (90-100%)
    pb.set_position(INTERPRET_PROGRESS);
    pb.set_message("Interpreting response...");
    let response = OracleResponse::parse(&raw);
    let assessment = interpret(&response, frames.len());
    pb.set_position(100);
    pb.finish_and_clear();

    let file_name = cli
        .video
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| cli.video.display().to_string());
    let report = AnalysisReport::new(
        SourceInfo {
            file_name,
            file_size_bytes,
            duration_secs: metadata.duration_secs,
            frame_count: frames.len(),
        },
        assessment,
    );

    let report_path = cli
        .output
        .clone()
        .unwrap_or_else(|| cli.video.with_extension("deepcheck.json"));
    save_report(&report, &report_path).await?;
    tracing::info!(
        path = %report_path.display(),
        risk = ?report.assessment.risk_level,
        "Report saved"
    );

    println!(
        "\n{} {}\n",
        style("Total time:").dim(),
        style(format_duration(total_start.elapsed())).cyan().bold()
    );

    println!(
        "{} {}\n",
        style("Saved:").dim(),
        style(report_path.display()).cyan()
    );
    println!("{}", style("─".repeat(60)).dim());

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", format_report_readable(&report));
    }

    Ok(())
}
