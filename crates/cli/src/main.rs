use std::path::PathBuf;
use std::process;
use std::str::FromStr;

use clap::Parser;

use whisper_cleaner_core::censoring::domain::audio_excisor::ExcisionMode;
use whisper_cleaner_core::pipeline::batch_runner::{BatchRunner, BatchSummary};
use whisper_cleaner_core::pipeline::clean_config::CleanConfig;
use whisper_cleaner_core::shared::constants::AUDIO_EXTENSIONS;
use whisper_cleaner_core::transcription::domain::model_size::ModelSize;

/// Profanity removal for audio files: transcribe, flag, excise.
#[derive(Parser)]
#[command(name = "whisper-cleaner", version)]
struct Cli {
    /// Directory of audio files to clean.
    input_directory: PathBuf,

    /// Whisper model size: tiny, base, small, medium, large.
    #[arg(short, long, default_value = "base")]
    model_size: String,

    /// Where cleaned files, originals and logs go (defaults to the input directory).
    #[arg(short, long)]
    output_directory: Option<PathBuf>,

    /// Profanity score at or above which a word is excised (0.0-1.0).
    #[arg(short, long, default_value = "0.98")]
    threshold: f32,

    /// Seconds of audio removed on each side of a flagged word.
    #[arg(short, long, default_value = "0.0")]
    padding: f64,

    /// Excision mode: mute (silence, keeps duration) or remove (cut, shortens).
    #[arg(long, default_value = "mute")]
    mode: String,

    /// Worker threads (defaults to available parallelism).
    #[arg(short, long)]
    jobs: Option<usize>,

    /// Analyze and report without writing or moving any files.
    #[arg(long)]
    dry_run: bool,

    /// Show debug output.
    #[arg(short, long)]
    verbose: bool,

    /// Only show errors.
    #[arg(short, long)]
    quiet: bool,
}

fn main() {
    let cli = Cli::parse();
    init_logging(&cli);

    match run(&cli) {
        Ok(summary) => {
            report(&summary, cli.dry_run);
            if summary.failed > 0 || summary.total() == 0 {
                process::exit(1);
            }
        }
        Err(e) => {
            log::error!("{e}");
            process::exit(1);
        }
    }
}

fn run(cli: &Cli) -> Result<BatchSummary, Box<dyn std::error::Error>> {
    validate(cli)?;

    let config = CleanConfig {
        model_size: ModelSize::from_str(&cli.model_size)?,
        threshold: cli.threshold,
        padding: cli.padding,
        mode: parse_mode(&cli.mode)?,
        dry_run: cli.dry_run,
        jobs: cli.jobs,
        ..CleanConfig::default()
    };

    let output_dir = cli
        .output_directory
        .clone()
        .unwrap_or_else(|| cli.input_directory.clone());

    let summary = BatchRunner::new(config).run(&cli.input_directory, &output_dir)?;
    Ok(summary)
}

fn validate(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    if !cli.input_directory.exists() {
        return Err(format!(
            "Input directory not found: {}",
            cli.input_directory.display()
        )
        .into());
    }
    if !cli.input_directory.is_dir() {
        return Err(format!(
            "Input path is not a directory: {} (expected a folder of {} files)",
            cli.input_directory.display(),
            AUDIO_EXTENSIONS.join("/")
        )
        .into());
    }
    if cli.verbose && cli.quiet {
        return Err("--verbose and --quiet are mutually exclusive".into());
    }
    if !(0.0..=1.0).contains(&cli.threshold) {
        return Err(format!(
            "Threshold must be between 0.0 and 1.0, got {}",
            cli.threshold
        )
        .into());
    }
    if cli.padding < 0.0 {
        return Err(format!("Padding must be non-negative, got {}", cli.padding).into());
    }
    if let Some(jobs) = cli.jobs {
        if jobs == 0 {
            return Err("Jobs must be at least 1".into());
        }
    }
    Ok(())
}

fn parse_mode(mode: &str) -> Result<ExcisionMode, Box<dyn std::error::Error>> {
    match mode {
        "mute" => Ok(ExcisionMode::Mute),
        "remove" => Ok(ExcisionMode::Remove),
        other => Err(format!("Mode must be 'mute' or 'remove', got '{other}'").into()),
    }
}

fn init_logging(cli: &Cli) {
    let mut builder = env_logger::Builder::from_default_env();
    // An explicit RUST_LOG takes precedence over the verbosity flags
    if let Some(level) = console_level(cli.quiet, cli.verbose, std::env::var_os("RUST_LOG")) {
        builder.filter_level(level);
    }
    builder.init();
}

fn console_level(
    quiet: bool,
    verbose: bool,
    rust_log: Option<std::ffi::OsString>,
) -> Option<log::LevelFilter> {
    if rust_log.is_some() {
        return None;
    }
    Some(if quiet {
        log::LevelFilter::Error
    } else if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    })
}

fn report(summary: &BatchSummary, dry_run: bool) {
    if summary.total() == 0 {
        log::error!("No audio files found");
        return;
    }
    if dry_run {
        log::info!(
            "Dry run: {} file(s) analyzed, {} failed",
            summary.processed,
            summary.failed
        );
    } else {
        log::info!(
            "Cleaned {} file(s), skipped {}, failed {}",
            summary.processed,
            summary.skipped,
            summary.failed
        );
    }
}
