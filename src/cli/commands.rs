// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// Three subcommands: `serve` (the default when none is given),
// `train` and `count`. Storage locations and the listen port
// can also come from the environment so the same binary runs
// unchanged behind a hosting platform.

use std::path::PathBuf;

use clap::{Args, Subcommand};
use crate::application::train_use_case::TrainConfig;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the HTTP API and serve the front end
    Serve(ServeArgs),

    /// Train once on the stored samples and exit
    Train(TrainCommandArgs),

    /// Print how many samples each label holds
    Count(StorageArgs),
}

/// Where samples and model artifacts live
#[derive(Args, Debug, Clone)]
pub struct StorageArgs {
    /// Root directory of the per-label sample folders
    #[arg(long, env = "SAMPLES_DIR", default_value = "landmarks")]
    pub samples_dir: PathBuf,

    /// Directory for the model, its config, the label map and metrics
    #[arg(long, env = "MODELS_DIR", default_value = "models")]
    pub models_dir: PathBuf,
}

/// Optimiser settings; the defaults are what the web endpoint uses
#[derive(Args, Debug, Clone)]
pub struct TrainArgs {
    /// Number of full passes through the samples
    #[arg(long, default_value_t = 30)]
    pub epochs: usize,

    #[arg(long, default_value_t = 16)]
    pub batch_size: usize,

    /// Adam learning rate
    #[arg(long, default_value_t = 1e-3)]
    pub lr: f64,

    /// Seed for weight initialisation and shuffling
    #[arg(long, default_value_t = 42)]
    pub seed: u64,
}

/// Keeps clap types out of the application layer
impl From<TrainArgs> for TrainConfig {
    fn from(a: TrainArgs) -> Self {
        TrainConfig {
            epochs:     a.epochs,
            batch_size: a.batch_size,
            lr:         a.lr,
            seed:       a.seed,
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct TrainCommandArgs {
    #[command(flatten)]
    pub storage: StorageArgs,

    #[command(flatten)]
    pub train: TrainArgs,
}

#[derive(Args, Debug, Clone)]
pub struct ServeArgs {
    /// Address to bind
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    #[arg(long, env = "PORT", default_value_t = 5000)]
    pub port: u16,

    /// Directory holding index.html and the other front-end files
    #[arg(long, env = "STATIC_DIR", default_value = "frontend")]
    pub static_dir: PathBuf,

    #[command(flatten)]
    pub storage: StorageArgs,

    #[command(flatten)]
    pub train: TrainArgs,
}
