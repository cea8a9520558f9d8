//! CLI entry point for the survey cleaning pipeline.

use anyhow::{Result, anyhow};
use bankprep_processing::{CleaningConfig, Pipeline, SurveyProfiler, io};
use clap::Parser;
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Deterministic cleaning pipeline for the bank telemarketing survey extract",
    long_about = "Turns a semicolon-delimited bank-marketing survey extract into a cleaned,\n\
                  comma-delimited, analysis-ready table.\n\n\
                  EXAMPLES:\n  \
                  # Clean an extract\n  \
                  bankprep-processing -i bank-additional-full.csv -o bank_cleaned.csv\n\n  \
                  # Profile the raw data without cleaning\n  \
                  bankprep-processing -i bank-additional-full.csv --profile\n\n  \
                  # Variant toggles: scale age too, expand weekday names\n  \
                  bankprep-processing -i bank-additional-full.csv --scale-age --expand-weekdays"
)]
struct Args {
    /// Path to the semicolon-delimited survey extract
    #[arg(short, long)]
    input: String,

    /// Path for the cleaned CSV output
    #[arg(short, long, default_value = "bank_cleaned.csv")]
    output: String,

    /// Print a profile of the raw data and exit without cleaning
    #[arg(long)]
    profile: bool,

    /// With --profile, emit the profile as JSON on stdout
    ///
    /// Disables all logging so stdout carries only the JSON document.
    #[arg(long)]
    json: bool,

    /// Include age in min-max scaling (kept raw by default)
    #[arg(long)]
    scale_age: bool,

    /// Expand day_of_week abbreviations to full weekday names
    #[arg(long)]
    expand_weekdays: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Suppress progress output (only show errors)
    #[arg(short, long)]
    quiet: bool,
}

/// Initialize the tracing subscriber for logging.
///
/// When `json_output` is set, logging stays disabled so stdout only carries
/// the JSON document.
fn init_logging(level: &str, quiet: bool, json_output: bool) {
    if json_output {
        return;
    }

    use tracing_subscriber::EnvFilter;

    let effective_level = if quiet { "error" } else { level };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(effective_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn build_config(args: &Args) -> Result<CleaningConfig> {
    let mut builder = CleaningConfig::builder().expand_weekday_names(args.expand_weekdays);

    if args.scale_age {
        builder = builder.scale_exclude(vec![]);
    }

    Ok(builder.build()?)
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args.log_level, args.quiet, args.json && args.profile);

    if !std::path::Path::new(&args.input).exists() {
        return Err(anyhow!("Input file not found: {}", args.input));
    }

    let config = build_config(&args)?;
    let raw = io::load_survey_extract(&args.input)?;

    if args.profile {
        return run_profile(&raw, &config, args.json);
    }

    let raw_shape = (raw.height(), raw.width());
    let pipeline = Pipeline::new(config)?;
    let mut outcome = pipeline.process(raw)?;
    io::write_cleaned_table(&mut outcome.data, &args.output)?;

    print_summary(&args, raw_shape, &outcome);
    Ok(())
}

fn run_profile(
    raw: &polars::prelude::DataFrame,
    config: &CleaningConfig,
    json: bool,
) -> Result<()> {
    let profile = SurveyProfiler::profile(raw, config)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&profile)?);
    } else {
        println!("{}", profile.render());
    }
    Ok(())
}

/// Print a short human-readable run summary.
///
/// Intentionally `println!` rather than logging: this is the primary output
/// of the command and should be visible regardless of log level.
fn print_summary(
    args: &Args,
    raw_shape: (usize, usize),
    outcome: &bankprep_processing::CleaningOutcome,
) {
    info!("Cleaning pipeline finished");

    println!();
    println!("{}", "=".repeat(80));
    println!("CLEANING COMPLETE");
    println!("{}", "=".repeat(80));
    println!(
        "Input:  {} ({} rows x {} columns)",
        args.input, raw_shape.0, raw_shape.1
    );
    println!(
        "Output: {} ({} rows x {} columns)",
        args.output,
        outcome.data.height(),
        outcome.data.width()
    );
    println!();
    println!("Steps applied:");
    for step in &outcome.steps {
        println!("  - {}", step);
    }
    println!("{}", "=".repeat(80));
}
