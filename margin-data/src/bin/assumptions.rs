use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use margin_core::ModelAssumptions;
use margin_data::AssumptionsLoader;

/// Validate an assumption set and print it with every default filled in.
///
/// Without `--file`, prints the reference assumption set, which is a
/// convenient starting point for a custom file.
#[derive(Parser, Debug)]
#[command(name = "margin-assumptions")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to a TOML assumptions file
    #[arg(short, long)]
    file: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let assumptions = match &args.file {
        Some(path) => {
            let assumptions = AssumptionsLoader::load(path)
                .with_context(|| format!("Failed to load assumptions: {}", path.display()))?;
            eprintln!("{} is valid.", path.display());
            assumptions
        }
        None => ModelAssumptions::default(),
    };

    let text =
        AssumptionsLoader::to_toml(&assumptions).context("Failed to render assumptions")?;
    print!("{text}");

    Ok(())
}
