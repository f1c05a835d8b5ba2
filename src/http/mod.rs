// ============================================================
// Layer 1 — HTTP Presentation Layer
// ============================================================
// JSON endpoints used by the browser front end:
//
//   GET  /                   index.html or {"status": ...}
//   POST /upload_landmarks   store one labelled sample
//   GET  /count              samples per label
//   POST /train_landmarks    train and write artifacts
//   POST /predict_landmarks  classify one sample
//
// Any other path is served from the static directory. Handlers
// only translate JSON to domain types and back; all work happens
// in the Layer 2 use cases.

pub mod error;
pub mod handlers;

use std::{net::SocketAddr, path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use axum::{
    http::{header, Method},
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};

use crate::application::train_use_case::TrainConfig;
use crate::data::sample_dir::DirSampleStore;
use crate::domain::traits::SampleStore;
use crate::infra::artifact_store::ArtifactStore;

use handlers::{count_handler, index_handler, predict_handler, train_handler, upload_handler};

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub store:        Arc<dyn SampleStore>,
    pub artifacts:    Arc<ArtifactStore>,
    pub train_config: TrainConfig,
    pub static_dir:   PathBuf,
}

impl AppState {
    /// Open the sample and artifact directories, creating them if missing
    pub fn open(
        samples_dir:  impl Into<PathBuf>,
        models_dir:   impl Into<PathBuf>,
        static_dir:   impl Into<PathBuf>,
        train_config: TrainConfig,
    ) -> Result<Self> {
        Ok(Self {
            store:      Arc::new(DirSampleStore::open(samples_dir)?),
            artifacts:  Arc::new(ArtifactStore::open(models_dir)?),
            train_config,
            static_dir: static_dir.into(),
        })
    }
}

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/", get(index_handler))
        .route("/upload_landmarks", post(upload_handler))
        .route("/count", get(count_handler))
        .route("/train_landmarks", post(train_handler))
        .route("/predict_landmarks", post(predict_handler))
        .fallback_service(ServeDir::new(&state.static_dir))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind and serve until Ctrl+C
pub async fn serve(addr: SocketAddr, state: AppState) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    tracing::info!("Listening on http://{}", listener.local_addr()?);
    tracing::info!("Model artifacts in {}", state.artifacts.dir().display());

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Cannot listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
}
