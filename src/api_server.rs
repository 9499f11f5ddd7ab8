// Axum API Server Module
//
// Purpose: Upload a document, run it through the analysis model, return the
// reply as JSON or as a rendered four-section report.
// Every request is independent: no caches, no sessions, no stored uploads.

use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    http::{HeaderValue, Method, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use axum_htmx::HxRequest;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};

use crate::ai_client::{AnalysisModel, DocumentPayload, GeminiClient, ModelError};
use crate::analysis::{render_report, AnalysisDocument};
use crate::config::Config;
use crate::upload::{receive_upload, UploadError, MAX_REQUEST_BYTES};
use crate::web::handlers::pages;

// ============================================================================
// Application State
// ============================================================================

#[derive(Clone)]
pub struct AppState {
    /// `None` when no API key is configured; analysis requests get 503
    pub model: Option<Arc<dyn AnalysisModel>>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(config: Config) -> Result<Self, ModelError> {
        let model: Option<Arc<dyn AnalysisModel>> = match &config.gemini_api_key {
            Some(key) => {
                tracing::info!("Initializing Gemini client (model: {})...", config.gemini_model);
                let client = GeminiClient::new(
                    key.clone(),
                    config.gemini_model.clone(),
                    config.gemini_api_base.clone(),
                    config.model_timeout,
                )?;
                Some(Arc::new(client) as Arc<dyn AnalysisModel>)
            }
            None => {
                tracing::warn!("GEMINI_API_KEY not set; /analyze and /report will answer 503");
                None
            }
        };

        Ok(Self {
            model,
            config: Arc::new(config),
        })
    }

    /// State backed by an explicit model (alternate backends, tests).
    pub fn with_model(config: Config, model: Arc<dyn AnalysisModel>) -> Self {
        Self {
            model: Some(model),
            config: Arc::new(config),
        }
    }
}

// ============================================================================
// Router
// ============================================================================

pub fn create_router(state: AppState) -> Router {
    let static_files = ServeDir::new(&state.config.static_dir);
    let cors = cors_layer(state.config.allowed_origin.as_deref());

    Router::new()
        // Upload page
        .route("/", get(pages::home_page))

        // Health check
        .route("/health", get(health_check))

        // Analysis endpoints
        .route("/analyze", post(analyze_document))
        .route("/report", post(analysis_report))
        .route("/render", post(render_analysis))

        // Stylesheet and other assets
        .nest_service("/static", static_files)

        // Middleware (applied in reverse order)
        .layer(DefaultBodyLimit::max(MAX_REQUEST_BYTES))
        .layer(CompressionLayer::new())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(allowed_origin: Option<&str>) -> CorsLayer {
    match allowed_origin.and_then(|origin| HeaderValue::from_str(origin).ok()) {
        Some(origin) => CorsLayer::new()
            .allow_origin(origin)
            .allow_methods([Method::GET, Method::POST])
            .allow_headers(Any),
        None => CorsLayer::permissive(),
    }
}

// ============================================================================
// Endpoint Handlers
// ============================================================================

async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "timestamp": Utc::now().to_rfc3339(),
        "model": state.config.gemini_model,
        "apiKeyConfigured": state.model.is_some(),
        "extractionMode": state.config.extraction_mode,
        "stripHeaderColon": state.config.strip_header_colon,
    }))
}

/// POST /analyze - multipart upload in, raw model reply out as JSON
async fn analyze_document(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<AnalyzeResponse>, AppError> {
    let document = run_analysis(&state, multipart).await?;

    Ok(Json(AnalyzeResponse {
        success: true,
        analysis_text: document.analysis_text,
        file_name: document.file_name,
        completed_at: document.completed_at,
    }))
}

/// POST /report - multipart upload in, rendered report (or error view) out
///
/// htmx requests get the fragment with status 200 so it is swapped in;
/// plain form posts get a full page carrying the real status.
async fn analysis_report(
    State(state): State<AppState>,
    HxRequest(is_htmx): HxRequest,
    multipart: Multipart,
) -> Response {
    match run_analysis(&state, multipart).await {
        Ok(document) => {
            let report = render_report(&document, state.config.report_options());
            pages::report_response(report, is_htmx)
        }
        Err(err) => {
            let status = if is_htmx { StatusCode::OK } else { err.status() };
            pages::error_response(status, err.user_message(), is_htmx)
        }
    }
}

/// POST /render - render an existing model reply without calling the model
async fn render_analysis(
    State(state): State<AppState>,
    HxRequest(is_htmx): HxRequest,
    Json(payload): Json<RenderRequest>,
) -> Response {
    let document = AnalysisDocument::new(payload.analysis_text, payload.file_name);
    let report = render_report(&document, state.config.report_options());
    pages::report_response(report, is_htmx)
}

/// Stage the upload, call the model, release the staged file.
async fn run_analysis(state: &AppState, mut multipart: Multipart) -> Result<AnalysisDocument, AppError> {
    let started = Instant::now();

    let upload = receive_upload(&mut multipart, &state.config.upload_dir)
        .await
        .map_err(|e| {
            tracing::warn!("Rejected upload: {}", e);
            AppError::from(e)
        })?;

    let model = state.model.as_ref().ok_or(ModelError::NotConfigured)?;

    tracing::info!(
        "Analyzing {} ({}, {} bytes) with {}",
        upload.file_name,
        upload.kind.mime_type(),
        upload.size,
        model.name()
    );

    let bytes = upload.read_bytes().await?;
    let analysis_text = model
        .analyze(DocumentPayload {
            file_name: &upload.file_name,
            kind: upload.kind,
            bytes: &bytes,
        })
        .await
        .map_err(|e| {
            tracing::error!("Analysis of {} failed: {}", upload.file_name, e);
            AppError::from(e)
        })?;

    tracing::info!(
        "Analysis of {} complete ({} chars, {:.2?})",
        upload.file_name,
        analysis_text.len(),
        started.elapsed()
    );

    Ok(AnalysisDocument::new(analysis_text, upload.file_name.clone()))
}

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeResponse {
    pub success: bool,
    pub analysis_text: String,
    pub file_name: String,
    pub completed_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RenderRequest {
    analysis_text: String,
    #[serde(default = "default_file_name")]
    file_name: String,
}

fn default_file_name() -> String {
    "document".to_string()
}

// ============================================================================
// Error Handling
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Upload(#[from] UploadError),
    #[error(transparent)]
    Model(#[from] ModelError),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Upload(e) => e.status(),
            AppError::Model(ModelError::NotConfigured) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Model(_) => StatusCode::BAD_GATEWAY,
        }
    }

    /// The single flat message shown to the user.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Upload(e) => e.to_string(),
            AppError::Model(ModelError::NotConfigured) => {
                "Document analysis is not configured on this server.".to_string()
            }
            AppError::Model(e) => format!("Failed to analyze document: {}", e),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = Json(serde_json::json!({
            "success": false,
            "error": self.user_message(),
        }));

        (self.status(), body).into_response()
    }
}
