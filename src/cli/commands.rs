// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// Defines the subcommands `train`, `baseline`, `predict` and
// `generate` and all their configurable flags. Defaults match a
// plain run writing into ./workspace.
//
// Reference: Rust Book §12 (Building a CLI Program)

use clap::{Args, Subcommand, ValueEnum};

use crate::application::{
    baseline_use_case::BaselineConfig,
    generate_use_case::{GenerateConfig, GeneratorKind},
    train_use_case::TrainConfig,
};
use crate::data::synthetic::{DEFAULT_SAMPLES, DEFAULT_SEED};

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Train and compare all four models, saving the best one
    Train(TrainArgs),

    /// Fit a single linear model on uniform synthetic data
    Baseline(BaselineArgs),

    /// Predict carbon sequestration with the saved best model
    Predict(PredictArgs),

    /// Write a synthetic dataset to CSV
    Generate(GenerateArgs),
}

#[derive(Args, Debug)]
pub struct TrainArgs {
    /// Dataset CSV; synthetic data is generated when it does not exist
    #[arg(long, default_value = "workspace/processed_carbon_data.csv")]
    pub data_path: String,

    /// Directory for the model bundle and result files
    #[arg(long, default_value = "workspace")]
    pub output_dir: String,

    /// Samples to generate when no dataset file is found
    #[arg(long, default_value_t = DEFAULT_SAMPLES)]
    pub n_samples: usize,

    #[arg(long, default_value_t = DEFAULT_SEED)]
    pub seed: u64,

    /// Fraction of samples used for training, the rest for testing
    #[arg(long, default_value_t = 0.8)]
    pub train_fraction: f64,

    /// Shuffle rows with this seed before splitting (sequential split when omitted)
    #[arg(long)]
    pub shuffle_seed: Option<u64>,

    #[arg(long, default_value_t = 20)]
    pub n_trees: usize,

    #[arg(long, default_value_t = 6)]
    pub max_depth: usize,

    /// Boosting stages
    #[arg(long, default_value_t = 30)]
    pub n_estimators: usize,

    #[arg(long, default_value_t = 0.1)]
    pub boosting_lr: f64,

    /// Neurons in the network's hidden layer
    #[arg(long, default_value_t = 15)]
    pub hidden_size: usize,

    #[arg(long, default_value_t = 0.01)]
    pub nn_lr: f64,

    /// Full-batch training epochs for the network
    #[arg(long, default_value_t = 100)]
    pub epochs: usize,
}

impl From<TrainArgs> for TrainConfig {
    fn from(a: TrainArgs) -> Self {
        TrainConfig {
            data_path:      a.data_path,
            output_dir:     a.output_dir,
            n_samples:      a.n_samples,
            seed:           a.seed,
            train_fraction: a.train_fraction,
            shuffle_seed:   a.shuffle_seed,
            n_trees:        a.n_trees,
            max_depth:      a.max_depth,
            n_estimators:   a.n_estimators,
            boosting_lr:    a.boosting_lr,
            hidden_size:    a.hidden_size,
            nn_lr:          a.nn_lr,
            epochs:         a.epochs,
        }
    }
}

#[derive(Args, Debug)]
pub struct BaselineArgs {
    #[arg(long, default_value = "workspace")]
    pub output_dir: String,

    #[arg(long, default_value_t = DEFAULT_SAMPLES)]
    pub n_samples: usize,

    #[arg(long, default_value_t = DEFAULT_SEED)]
    pub seed: u64,

    #[arg(long, default_value_t = 0.8)]
    pub train_fraction: f64,

    #[arg(long)]
    pub shuffle_seed: Option<u64>,
}

impl From<BaselineArgs> for BaselineConfig {
    fn from(a: BaselineArgs) -> Self {
        BaselineConfig {
            output_dir:     a.output_dir,
            n_samples:      a.n_samples,
            seed:           a.seed,
            train_fraction: a.train_fraction,
            shuffle_seed:   a.shuffle_seed,
        }
    }
}

#[derive(Args, Debug)]
pub struct PredictArgs {
    /// One value per feature, in training order
    /// (NDVI, Canopy_Cover_Percent, Soil_Carbon_Percent for generated data)
    #[arg(required = true, num_args = 1.., allow_negative_numbers = true)]
    pub values: Vec<f64>,

    /// Directory where `train` saved the model bundle
    #[arg(long, default_value = "workspace")]
    pub model_dir: String,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum GeneratorArg {
    /// Uniform features, linear target with N(0, 3) noise
    Uniform,
    /// Beta/Gamma features, linear target with N(0, 5) noise
    Distributed,
}

impl From<GeneratorArg> for GeneratorKind {
    fn from(g: GeneratorArg) -> Self {
        match g {
            GeneratorArg::Uniform => GeneratorKind::Uniform,
            GeneratorArg::Distributed => GeneratorKind::Distributed,
        }
    }
}

#[derive(Args, Debug)]
pub struct GenerateArgs {
    #[arg(long, default_value = "workspace/processed_carbon_data.csv")]
    pub output_path: String,

    #[arg(long, default_value_t = DEFAULT_SAMPLES)]
    pub n_samples: usize,

    #[arg(long, default_value_t = DEFAULT_SEED)]
    pub seed: u64,

    #[arg(long, value_enum, default_value_t = GeneratorArg::Distributed)]
    pub generator: GeneratorArg,
}

impl From<GenerateArgs> for GenerateConfig {
    fn from(a: GenerateArgs) -> Self {
        GenerateConfig {
            output_path: a.output_path,
            n_samples:   a.n_samples,
            seed:        a.seed,
            kind:        a.generator.into(),
        }
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Cli;
    use clap::Parser;

    #[test]
    fn test_train_defaults_match_config_default() {
        let cli = Cli::try_parse_from(["carbon-models", "train"]).unwrap();
        match cli.command {
            Commands::Train(args) => assert_eq!(TrainConfig::from(args), TrainConfig::default()),
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_baseline_defaults_match_config_default() {
        let cli = Cli::try_parse_from(["carbon-models", "baseline"]).unwrap();
        match cli.command {
            Commands::Baseline(args) => assert_eq!(BaselineConfig::from(args), BaselineConfig::default()),
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_predict_parses_values() {
        let cli = Cli::try_parse_from(["carbon-models", "predict", "0.6", "70", "-1.5"]).unwrap();
        match cli.command {
            Commands::Predict(args) => {
                assert_eq!(args.values, vec![0.6, 70.0, -1.5]);
                assert_eq!(args.model_dir, "workspace");
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_generate_kind() {
        let cli = Cli::try_parse_from(["carbon-models", "generate", "--generator", "uniform"]).unwrap();
        match cli.command {
            Commands::Generate(args) => {
                assert_eq!(GenerateConfig::from(args).kind, GeneratorKind::Uniform)
            }
            other => panic!("unexpected command {other:?}"),
        }
    }
}
