// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// Entry point for all user interaction. Parses arguments with
// `clap` and hands each command to its Layer 2 use case.
//
//   1. `train`    — compare the four models, save the best
//   2. `baseline` — linear regression on uniform data
//   3. `predict`  — predict with the saved model
//   4. `generate` — write a synthetic dataset CSV
//
// Reference: Rust Book §7 (Modules), §12 (CLI programs)

pub mod commands;

use anyhow::Result;
use clap::Parser;
use commands::{BaselineArgs, Commands, GenerateArgs, PredictArgs, TrainArgs};

#[derive(Parser, Debug)]
#[command(
    name = "carbon-models",
    version,
    about = "Train and compare carbon sequestration regression models."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Route the subcommand to its use case.
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Train(args)    => run_train(args),
            Commands::Baseline(args) => run_baseline(args),
            Commands::Predict(args)  => run_predict(args),
            Commands::Generate(args) => run_generate(args),
        }
    }
}

fn run_train(args: TrainArgs) -> Result<()> {
    use crate::application::train_use_case::TrainUseCase;

    tracing::info!("Starting training, output in: {}", args.output_dir);
    TrainUseCase::new(args.into()).execute()?;
    Ok(())
}

fn run_baseline(args: BaselineArgs) -> Result<()> {
    use crate::application::baseline_use_case::BaselineUseCase;

    BaselineUseCase::new(args.into()).execute()?;
    Ok(())
}

fn run_predict(args: PredictArgs) -> Result<()> {
    use crate::application::predict_use_case::PredictUseCase;

    let use_case = PredictUseCase::new(&args.model_dir)?;
    let predicted = use_case.predict(&args.values)?;

    println!("Model: {} (test R² = {:.3})", use_case.model_name(), use_case.test_r2());
    for (name, value) in use_case.feature_names().iter().zip(&args.values) {
        println!("  {:<30}: {}", name, value);
    }
    println!("\nPredicted carbon sequestration: {:.2} tCO₂e/ha", predicted);
    Ok(())
}

fn run_generate(args: GenerateArgs) -> Result<()> {
    use crate::application::generate_use_case::GenerateUseCase;

    let path = args.output_path.clone();
    let rows = GenerateUseCase::new(args.into()).execute()?;
    println!("✓ Wrote {} samples to {}", rows, path);
    Ok(())
}
