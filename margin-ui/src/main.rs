use std::fs::File;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Local;
use clap::{Args, Parser, Subcommand, ValueEnum};
use rust_decimal::Decimal;
use tracing::{debug, info};

use margin_core::{CalculationInput, ModelAssumptions};
use margin_data::{AssumptionsLoader, ScenarioLoader};
use margin_ui::app::Estimator;
use margin_ui::export::{
    JsonRenderer, ReportRenderer, TemplateRenderer, TextRenderer, write_report,
};
use margin_ui::logging;
use margin_ui::utils::parse_decimal;

// ─── CLI definition ──────────────────────────────────────────────────────────

/// CAR-T episode financial impact calculator.
///
/// Estimates the annual margin improvement range from shifting CAR-T
/// patients from inpatient to outpatient care.
#[derive(Debug, Parser)]
#[command(name = "margin-estimator", version, about)]
struct Cli {
    /// TOML file overriding the reference assumption set.
    #[arg(long, global = true)]
    assumptions: Option<PathBuf>,

    /// Output format for stdout.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text, global = true)]
    format: OutputFormat,

    /// Append log output to this file.
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    /// Log calculation steps (same as RUST_LOG=debug).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Estimate one scenario from form fields.
    Calculate(CalculateArgs),
    /// Estimate every scenario in a CSV file.
    Batch(BatchArgs),
}

#[derive(Debug, Args)]
struct CalculateArgs {
    /// Payer mix: percent Medicare.
    #[arg(long, default_value_t = 50, value_parser = clap::value_parser!(u8).range(0..=100))]
    medicare_pct: u8,

    /// Inpatient length of stay (days).
    #[arg(long = "los", default_value_t = 10, value_parser = clap::value_parser!(u32).range(5..=20))]
    length_of_stay: u32,

    /// Readmission rate (0-1).
    #[arg(long, default_value = "0.15", value_parser = parse_decimal)]
    readmission_rate: Decimal,

    /// Annual patient volume.
    #[arg(long, default_value_t = 500, value_parser = clap::value_parser!(u32).range(1..))]
    volume: u32,

    /// Percent of volume shifted to outpatient.
    #[arg(long, default_value_t = 75, value_parser = clap::value_parser!(u8).range(0..=100))]
    shift_pct: u8,

    /// Apply the new-technology add-on payment to inpatient cases.
    #[arg(long)]
    ntap: bool,

    /// Also write a report document to this path.
    #[arg(long)]
    report: Option<PathBuf>,

    /// Tera template for the report (defaults to the built-in Markdown layout).
    #[arg(long, requires = "report")]
    template: Option<PathBuf>,
}

#[derive(Debug, Args)]
struct BatchArgs {
    /// CSV file of scenarios.
    #[arg(short, long)]
    file: PathBuf,
}

// ─── commands ────────────────────────────────────────────────────────────────

fn load_assumptions(path: Option<&Path>) -> Result<ModelAssumptions> {
    match path {
        Some(path) => {
            debug!("loading assumptions from {}", path.display());
            AssumptionsLoader::load(path)
                .with_context(|| format!("Failed to load assumptions: {}", path.display()))
        }
        None => Ok(ModelAssumptions::default()),
    }
}

fn renderer(format: OutputFormat) -> Box<dyn ReportRenderer> {
    match format {
        OutputFormat::Text => Box::new(TextRenderer),
        OutputFormat::Json => Box::new(JsonRenderer),
    }
}

fn calculate(
    estimator: &Estimator,
    format: OutputFormat,
    args: CalculateArgs,
) -> Result<()> {
    let input = CalculationInput {
        medicare_pct: args.medicare_pct,
        inpatient_length_of_stay_days: args.length_of_stay,
        readmission_rate: args.readmission_rate,
        patient_volume: args.volume,
        outpatient_shift_pct: args.shift_pct,
        ntap_applies: args.ntap,
    };

    let report = estimator
        .estimate(&input, Local::now())
        .context("Cannot estimate this scenario")?;

    print!("{}", renderer(format).render(&report)?);

    if let Some(path) = &args.report {
        let template = match &args.template {
            Some(template) => TemplateRenderer::from_file(template)
                .with_context(|| format!("Failed to load template: {}", template.display()))?,
            None => TemplateRenderer::new()?,
        };
        write_report(path, &template.render(&report)?)?;
        info!("report saved to {}", path.display());
    }

    Ok(())
}

fn batch(
    estimator: &Estimator,
    format: OutputFormat,
    args: BatchArgs,
) -> Result<()> {
    let file = File::open(&args.file)
        .with_context(|| format!("Failed to open: {}", args.file.display()))?;
    let scenarios = ScenarioLoader::parse(file)
        .with_context(|| format!("Failed to parse CSV: {}", args.file.display()))?;
    info!("parsed {} scenarios from {}", scenarios.len(), args.file.display());

    let entries = estimator.estimate_batch(&scenarios, Local::now())?;
    print!("{}", renderer(format).render_batch(&entries)?);

    Ok(())
}

// ─── entry point ─────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "info" };
    logging::init_logging(level, cli.log_file.as_deref())?;

    let assumptions = load_assumptions(cli.assumptions.as_deref())?;
    let estimator = Estimator::new(assumptions).context("Invalid assumption set")?;

    match cli.command {
        Command::Calculate(args) => calculate(&estimator, cli.format, args),
        Command::Batch(args) => batch(&estimator, cli.format, args),
    }
}
