use std::collections::BTreeMap;

use axum::{
    extract::{rejection::JsonRejection, State},
    response::{Html, IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::application::{
    collect_use_case::CollectUseCase,
    predict_use_case::PredictUseCase,
    train_use_case::TrainUseCase,
};
use crate::domain::{
    error::{ServiceError, ServiceResult},
    label_map::LabelMap,
    sample::{Label, Landmarks},
};
use crate::http::AppState;

// ─── Request / response bodies ────────────────────────────────────────────────

/// Both fields are optional at the serde level so a missing field
/// becomes a 400 with our own message instead of an extractor error.
#[derive(Debug, Default, Deserialize)]
pub struct UploadRequest {
    #[serde(default)]
    pub label:     Option<Value>,
    #[serde(default)]
    pub landmarks: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PredictRequest {
    #[serde(default)]
    pub landmarks: Option<Value>,
}

#[derive(Debug, Serialize)]
pub struct SavedResponse {
    pub message: &'static str,
    pub label:   String,
}

#[derive(Debug, Serialize)]
pub struct TrainedResponse {
    pub message: &'static str,
    pub classes: LabelMap,
}

#[derive(Debug, Serialize)]
pub struct PredictionResponse {
    pub prediction: String,
    pub confidence: f32,
}

// ─── Handlers ─────────────────────────────────────────────────────────────────

/// Serve the front-end entry page, or a status object when none is deployed
pub async fn index_handler(State(state): State<AppState>) -> Response {
    match tokio::fs::read_to_string(state.static_dir.join("index.html")).await {
        Ok(html) => Html(html).into_response(),
        Err(_) => Json(serde_json::json!({ "status": "backend running" })).into_response(),
    }
}

pub async fn upload_handler(
    State(state): State<AppState>,
    body: Result<Json<UploadRequest>, JsonRejection>,
) -> ServiceResult<Json<SavedResponse>> {
    let missing = || ServiceError::validation("label and landmarks required");
    let Json(req) = body.map_err(|_| missing())?;
    let (Some(label), Some(landmarks)) = (req.label, req.landmarks) else {
        return Err(missing());
    };

    let label     = Label::from_json(&label)?;
    let landmarks = Landmarks::from_json(&landmarks)?;
    let label = run_blocking("Upload", move || {
        CollectUseCase::new(state.store.as_ref()).upload(&label, &landmarks)?;
        Ok(label)
    })
    .await?;

    Ok(Json(SavedResponse { message: "saved", label: label.to_string() }))
}

pub async fn count_handler(
    State(state): State<AppState>,
) -> ServiceResult<Json<BTreeMap<String, usize>>> {
    let counts = run_blocking("Count", move || {
        CollectUseCase::new(state.store.as_ref()).counts()
    })
    .await?;
    Ok(Json(counts))
}

/// Runs the whole fit inline; the client waits for the response.
pub async fn train_handler(State(state): State<AppState>) -> ServiceResult<Json<TrainedResponse>> {
    let outcome = run_blocking("Training", move || {
        TrainUseCase::new(state.store.as_ref(), &state.artifacts, state.train_config.clone())
            .execute()
    })
    .await?;

    Ok(Json(TrainedResponse { message: "trained", classes: outcome.label_map }))
}

pub async fn predict_handler(
    State(state): State<AppState>,
    body: Result<Json<PredictRequest>, JsonRejection>,
) -> ServiceResult<Json<PredictionResponse>> {
    let missing = || ServiceError::validation("landmarks required");
    let Json(req) = body.map_err(|_| missing())?;
    let landmarks = Landmarks::from_json(&req.landmarks.ok_or_else(missing)?)?;

    let prediction = run_blocking("Prediction", move || {
        PredictUseCase::new(&state.artifacts).execute(&landmarks)
    })
    .await?;

    Ok(Json(PredictionResponse {
        prediction: prediction.label,
        confidence: prediction.confidence,
    }))
}

/// Store and model work touches the filesystem and the CPU, so it
/// runs on tokio's blocking pool instead of an async worker.
async fn run_blocking<T, F>(task: &'static str, f: F) -> ServiceResult<T>
where
    F: FnOnce() -> ServiceResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| ServiceError::from(anyhow::anyhow!("{task} task failed: {e}")))?
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::train_use_case::TrainConfig;
    use axum::{
        body::Body,
        extract::FromRequest,
        http::{header, Request, StatusCode},
    };
    use serde_json::json;
    use tempfile::TempDir;

    fn state(tmp: &TempDir) -> AppState {
        let cfg = TrainConfig { epochs: 40, batch_size: 4, ..TrainConfig::default() };
        AppState::open(
            tmp.path().join("landmarks"),
            tmp.path().join("models"),
            tmp.path().join("frontend"),
            cfg,
        )
        .unwrap()
    }

    async fn body_json(resp: Response) -> Value {
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn upload(state: &AppState, label: Value, landmarks: Value) -> Response {
        let req = UploadRequest { label: Some(label), landmarks: Some(landmarks) };
        upload_handler(State(state.clone()), Ok(Json(req))).await.into_response()
    }

    /// Run a raw body through the same Json extractor axum uses
    async fn extract<T>(content_type: &str, body: &'static str) -> Result<Json<T>, JsonRejection>
    where
        T: serde::de::DeserializeOwned,
    {
        let req = Request::builder()
            .method("POST")
            .header(header::CONTENT_TYPE, content_type)
            .body(Body::from(body))
            .unwrap();
        Json::<T>::from_request(req, &()).await
    }

    async fn counts(state: &AppState) -> Value {
        body_json(count_handler(State(state.clone())).await.into_response()).await
    }

    #[tokio::test]
    async fn test_index_without_frontend_reports_status() {
        let tmp  = TempDir::new().unwrap();
        let resp = index_handler(State(state(&tmp))).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_json(resp).await, json!({"status": "backend running"}));
    }

    #[tokio::test]
    async fn test_index_serves_frontend_page() {
        let tmp   = TempDir::new().unwrap();
        let state = state(&tmp);
        std::fs::create_dir_all(&state.static_dir).unwrap();
        std::fs::write(state.static_dir.join("index.html"), "<h1>signs</h1>").unwrap();

        let resp  = index_handler(State(state)).await;
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], b"<h1>signs</h1>");
    }

    #[tokio::test]
    async fn test_upload_then_count() {
        let tmp   = TempDir::new().unwrap();
        let state = state(&tmp);
        assert_eq!(counts(&state).await, json!({}));

        let resp = upload(&state, json!(" A "), json!([[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]])).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_json(resp).await, json!({"message": "saved", "label": "A"}));
        assert_eq!(counts(&state).await, json!({"A": 1}));

        upload(&state, json!("A"), json!([[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]])).await;
        assert_eq!(counts(&state).await, json!({"A": 2}));
    }

    #[tokio::test]
    async fn test_invalid_uploads_write_nothing() {
        let tmp   = TempDir::new().unwrap();
        let state = state(&tmp);

        let blank = upload(&state, json!("   "), json!([1.0, 2.0])).await;
        assert_eq!(blank.status(), StatusCode::BAD_REQUEST);

        let req = UploadRequest { label: Some(json!("A")), landmarks: None };
        let missing = upload_handler(State(state.clone()), Ok(Json(req))).await.into_response();
        assert_eq!(missing.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(missing).await, json!({"error": "label and landmarks required"}));

        let ragged = upload(&state, json!("A"), json!([[1.0], [2.0, 3.0]])).await;
        assert_eq!(ragged.status(), StatusCode::BAD_REQUEST);

        assert_eq!(counts(&state).await, json!({}));
        let dirs = std::fs::read_dir(tmp.path().join("landmarks")).unwrap().count();
        assert_eq!(dirs, 0);
    }

    #[tokio::test]
    async fn test_dot_label_rejected_and_nothing_written() {
        let tmp   = TempDir::new().unwrap();
        let state = state(&tmp);

        let resp = upload(&state, json!("."), json!([1.0, 2.0])).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(counts(&state).await, json!({}));
        let entries = std::fs::read_dir(tmp.path().join("landmarks")).unwrap().count();
        assert_eq!(entries, 0);

        let resp = upload(&state, json!("dot"), json!([1.0, 2.0])).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(counts(&state).await, json!({"dot": 1}));
    }

    #[tokio::test]
    async fn test_malformed_upload_body() {
        let tmp   = TempDir::new().unwrap();
        let state = state(&tmp);

        for body in [
            extract::<UploadRequest>("application/json", "{not json").await,
            extract::<UploadRequest>("application/json", "\"just text\"").await,
            extract::<UploadRequest>("text/plain", "label=A").await,
        ] {
            assert!(body.is_err());
            let resp = upload_handler(State(state.clone()), body).await.into_response();
            assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
            assert_eq!(body_json(resp).await, json!({"error": "label and landmarks required"}));
        }
        assert_eq!(counts(&state).await, json!({}));
    }

    #[tokio::test]
    async fn test_malformed_predict_body() {
        let tmp   = TempDir::new().unwrap();
        let state = state(&tmp);

        for body in [
            extract::<PredictRequest>("application/json", "").await,
            extract::<PredictRequest>("text/plain", "[0.1, 0.2]").await,
        ] {
            assert!(body.is_err());
            let resp = predict_handler(State(state.clone()), body).await.into_response();
            assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
            assert_eq!(body_json(resp).await, json!({"error": "landmarks required"}));
        }
    }

    #[tokio::test]
    async fn test_upload_with_other_width_rejected() {
        let tmp   = TempDir::new().unwrap();
        let state = state(&tmp);
        upload(&state, json!("A"), json!([1.0, 2.0, 3.0])).await;

        let resp = upload(&state, json!("E"), json!([1.0, 2.0])).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(counts(&state).await, json!({"A": 1}));
    }

    #[tokio::test]
    async fn test_predict_before_training() {
        let tmp  = TempDir::new().unwrap();
        let req  = PredictRequest { landmarks: Some(json!([0.0, 1.0])) };
        let resp = predict_handler(State(state(&tmp)), Ok(Json(req))).await.into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(resp).await, json!({"error": "model not trained"}));
    }

    #[tokio::test]
    async fn test_predict_requires_landmarks() {
        let tmp  = TempDir::new().unwrap();
        let resp = predict_handler(State(state(&tmp)), Ok(Json(PredictRequest::default())))
            .await
            .into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(resp).await, json!({"error": "landmarks required"}));
    }

    #[tokio::test]
    async fn test_train_needs_two_labels() {
        let tmp   = TempDir::new().unwrap();
        let state = state(&tmp);
        upload(&state, json!("rock"), json!([1.0, 1.0, 1.0])).await;

        let resp = train_handler(State(state.clone())).await.into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(resp).await, json!({"error": "Need at least 2 labels with samples"}));
        assert!(!state.artifacts.is_trained());
    }

    #[tokio::test]
    async fn test_collect_train_predict_round_trip() {
        let tmp   = TempDir::new().unwrap();
        let state = state(&tmp);

        for i in 0..8 {
            let d = i as f64 * 0.02;
            upload(&state, json!("rock"), json!([[1.0 + d, 1.0, 1.0], [1.0, 1.0 - d, 1.0]])).await;
            upload(&state, json!("paper"), json!([[-1.0 - d, -1.0, -1.0], [-1.0, -1.0 + d, -1.0]])).await;
        }

        let resp = train_handler(State(state.clone())).await.into_response();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            body_json(resp).await,
            json!({"message": "trained", "classes": {"0": "paper", "1": "rock"}})
        );

        let req  = PredictRequest { landmarks: Some(json!([[1.0, 1.0, 1.0], [1.0, 1.0, 1.0]])) };
        let resp = predict_handler(State(state.clone()), Ok(Json(req))).await.into_response();
        assert_eq!(resp.status(), StatusCode::OK);
        let body = body_json(resp).await;
        assert_eq!(body["prediction"], "rock");
        let confidence = body["confidence"].as_f64().unwrap();
        assert!(confidence > 0.5 && confidence <= 1.0);

        let req  = PredictRequest { landmarks: Some(json!([1.0, 2.0])) };
        let resp = predict_handler(State(state), Ok(Json(req))).await.into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}
