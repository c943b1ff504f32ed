// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// Parses command line arguments with clap and hands off to
// Layer 2. Two commands are supported:
//   1. `prepare` — encode + batch a dialogue file
//   2. `inspect` — show the encoding of one record
//
// Reference: Rust Book §7 (Modules), §12 (CLI programs)

pub mod commands;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, InspectArgs, PrepareArgs};

use crate::application::config::PrepareConfig;
use crate::infra::{logging, output::OutputDir};

#[derive(Parser, Debug)]
#[command(
    name = "dialogue-prep",
    version,
    about = "Turn multi-turn dialogue JSONL into loss-masked causal-LM training batches."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Dispatch to the matching use case. This layer only routes.
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Prepare(args) => run_prepare(args),
            Commands::Inspect(args) => run_inspect(args),
        }
    }
}

fn run_prepare(args: PrepareArgs) -> Result<()> {
    use crate::application::prepare_use_case::PrepareUseCase;

    let config_file = args.config.clone();
    let cfg = match &config_file {
        Some(path) => PrepareConfig::from_json_file(path)?,
        None => args.into(),
    };

    // the log lives next to the data it describes
    let output = OutputDir::new(&cfg.output_dir)?;
    logging::init(Some(&output.log_file()))?;
    if let Some(path) = config_file {
        tracing::info!("Read prepare config from '{}'", path);
    }

    let summary = PrepareUseCase::new(cfg).execute()?;

    println!(
        "Prepared {} examples in {} batches | {} tokens | {:.1}% trained on",
        summary.examples,
        summary.batches,
        summary.real_tokens,
        summary.loss_share() * 100.0,
    );
    if let Some(n) = summary.exported {
        println!("Exported {} encoded examples to '{}'", n, output.path().join("encoded.jsonl").display());
    }
    Ok(())
}

fn run_inspect(args: InspectArgs) -> Result<()> {
    use crate::application::inspect_use_case::InspectUseCase;

    logging::init(None)?;

    let index = args.index;
    let use_case = InspectUseCase::from_config(&args.into())?;
    print!("{}", use_case.render(index)?);
    Ok(())
}
