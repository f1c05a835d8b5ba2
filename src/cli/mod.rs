// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// Entry point for all user interaction. Arguments are parsed
// with clap; every command delegates to Layer 2 (or, for
// `serve`, to the HTTP layer which does the same per request).
//
//   1. `serve` — HTTP API for collection, training and prediction
//   2. `train` — one offline training run over the sample store
//   3. `count` — samples per label
//
// Reference: Rust Book §7 (Modules), §12 (CLI programs)

pub mod commands;

use std::net::{IpAddr, SocketAddr};

use anyhow::{Context, Result};
use clap::Parser;
use commands::{Commands, ServeArgs, StorageArgs, TrainCommandArgs};

use crate::application::{collect_use_case::CollectUseCase, train_use_case::TrainUseCase};
use crate::data::sample_dir::DirSampleStore;
use crate::http::AppState;
use crate::infra::artifact_store::ArtifactStore;

#[derive(Parser, Debug)]
#[command(
    name = "landmark-classifier",
    version,
    about = "Collect hand-landmark samples, train a gesture classifier and serve predictions.",
    args_conflicts_with_subcommands = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Server flags, used when no subcommand is given
    #[command(flatten)]
    pub serve: ServeArgs,
}

impl Cli {
    /// Route to the chosen command; no subcommand means `serve`
    pub fn run(self) -> Result<()> {
        match self.command {
            None                           => run_serve(self.serve),
            Some(Commands::Serve(args))    => run_serve(args),
            Some(Commands::Train(args))    => run_train(args),
            Some(Commands::Count(storage)) => run_count(storage),
        }
    }
}

fn run_serve(args: ServeArgs) -> Result<()> {
    let ip: IpAddr = args
        .host
        .parse()
        .with_context(|| format!("Invalid host address '{}'", args.host))?;
    let addr = SocketAddr::new(ip, args.port);

    let state = AppState::open(
        args.storage.samples_dir,
        args.storage.models_dir,
        args.static_dir,
        args.train.into(),
    )?;

    let runtime = tokio::runtime::Runtime::new().context("Failed to start async runtime")?;
    runtime.block_on(crate::http::serve(addr, state))
}

fn run_train(args: TrainCommandArgs) -> Result<()> {
    tracing::info!("Training on samples in: {}", args.storage.samples_dir.display());

    let store     = DirSampleStore::open(&args.storage.samples_dir)?;
    let artifacts = ArtifactStore::open(&args.storage.models_dir)?;
    let outcome   = TrainUseCase::new(&store, &artifacts, args.train.into()).execute()?;

    println!("Training complete. Artifacts saved to {}", artifacts.dir().display());
    for (index, label) in outcome.label_map.iter() {
        println!("  {index}: {label}");
    }
    if let Some(last) = outcome.history.last() {
        println!("Final loss {:.4}, training accuracy {:.1}%", last.loss, last.accuracy * 100.0);
    }
    Ok(())
}

fn run_count(storage: StorageArgs) -> Result<()> {
    let store  = DirSampleStore::open(&storage.samples_dir)?;
    let counts = CollectUseCase::new(&store).counts()?;

    if counts.is_empty() {
        println!("No samples in {}", store.root().display());
    }
    for (label, n) in counts {
        println!("{label}: {n}");
    }
    Ok(())
}
