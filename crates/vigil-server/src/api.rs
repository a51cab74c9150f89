use crate::gateway::ScoreError;
use crate::state::AppState;
use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use utoipa::ToSchema;
use utoipa_axum::{router::OpenApiRouter, routes};
use vigil_common::types::{placeholder_keys, AlertRecord, Label, RollingStats};
use vigil_model::registry;
use vigil_store::error::StoreError;
use vigil_store::logfile::LogFileInfo;

/// Error body shape shared by every non-2xx endpoint response.
#[derive(Serialize, ToSchema)]
pub struct ApiError {
    pub error: String,
}

pub fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

// ---- Scoring ----

/// Scoring verdict for one submitted payload.
#[derive(Serialize, ToSchema)]
pub struct ScoreResponse {
    /// The model key the payload was scored against.
    pub model: String,
    /// Raw score in `[0, 1]`.
    pub prediction: f64,
    pub label: Label,
}

/// Scores a telemetry payload against the named model.
///
/// The body is lenient: a missing or empty body is treated as `{}` and
/// rejected only for the absent `input` field, after the key check.
#[utoipa::path(
    post,
    path = "/model/{key}",
    tag = "Scoring",
    params(("key" = String, Path, description = "Model key")),
    request_body(content = Value, description = "Payload with an `input` field and optional `src_ip`"),
    responses(
        (status = 200, description = "Scoring verdict", body = ScoreResponse),
        (status = 400, description = "Missing input field", body = ApiError),
        (status = 404, description = "Unknown model key", body = ApiError)
    )
)]
async fn score_model(
    State(state): State<AppState>,
    Path(key): Path<String>,
    body: Option<Json<Value>>,
) -> Response {
    let payload = body
        .map(|Json(v)| v)
        .unwrap_or_else(|| Value::Object(Default::default()));
    match state.gateway.score(&key, &payload).await {
        Ok((score, label)) => Json(ScoreResponse {
            model: key,
            prediction: score,
            label,
        })
        .into_response(),
        Err(ScoreError::UnknownModel) => error_response(
            StatusCode::NOT_FOUND,
            &format!("model '{key}' not recognized"),
        ),
        Err(ScoreError::MissingInput) => error_response(
            StatusCode::BAD_REQUEST,
            "JSON body must contain 'input' field",
        ),
    }
}

/// Readiness flag for one model key.
#[derive(Serialize, ToSchema)]
pub struct ModelStatusResponse {
    pub model: String,
    pub status: String,
}

/// Reports whether the named model is servable.
#[utoipa::path(
    get,
    path = "/model/{key}",
    tag = "Scoring",
    params(("key" = String, Path, description = "Model key")),
    responses(
        (status = 200, description = "Model is servable", body = ModelStatusResponse),
        (status = 404, description = "Unknown model key", body = ApiError)
    )
)]
async fn model_status(State(state): State<AppState>, Path(key): Path<String>) -> Response {
    if state.gateway.knows(&key) {
        Json(ModelStatusResponse {
            model: key,
            status: "ready".to_string(),
        })
        .into_response()
    } else {
        error_response(StatusCode::NOT_FOUND, &format!("model '{key}' not found"))
    }
}

/// Lists servable model keys as a bare array.
///
/// Loaded registry keys when any model loaded; otherwise the stems of
/// artifacts found on disk; otherwise the fixed placeholder keys.
#[utoipa::path(
    get,
    path = "/models",
    tag = "Scoring",
    responses(
        (status = 200, description = "Model keys", body = Vec<String>)
    )
)]
async fn list_models(State(state): State<AppState>) -> Json<Vec<String>> {
    if !state.registry.is_empty() {
        return Json(state.registry.keys());
    }
    let stems = registry::discovered_stems(std::path::Path::new(&state.config.models_dir));
    if !stems.is_empty() {
        return Json(stems);
    }
    Json(placeholder_keys())
}

// ---- Alerts ----

#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
struct AttacksParams {
    /// Maximum number of records to return (default 100).
    #[param(required = false)]
    limit: Option<usize>,
}

/// Returns the most recent alerts, newest first, merging the in-memory
/// buffer with the durable log tail when the buffer alone cannot satisfy
/// the limit.
#[utoipa::path(
    get,
    path = "/attacks",
    tag = "Alerts",
    params(AttacksParams),
    responses(
        (status = 200, description = "Recent alerts, newest first", body = Vec<AlertRecord>)
    )
)]
async fn recent_attacks(
    State(state): State<AppState>,
    Query(params): Query<AttacksParams>,
) -> Json<Vec<AlertRecord>> {
    let limit = params.limit.unwrap_or(100);
    Json(state.reader.recent(limit))
}

// ---- Log files ----

/// Lists the daily attack log files with their sizes.
#[utoipa::path(
    get,
    path = "/log-files",
    tag = "Logs",
    responses(
        (status = 200, description = "Daily log files, oldest first", body = Vec<LogFileInfo>)
    )
)]
async fn list_log_files(State(state): State<AppState>) -> Json<Vec<LogFileInfo>> {
    Json(state.log.list_daily_files())
}

#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
struct DownloadParams {
    /// Bare filename of a log file in the data directory.
    #[param(required = false)]
    file: Option<String>,
}

/// Downloads one log file as an attachment.
///
/// The name must be a bare filename; anything that looks like a path is
/// rejected before touching the filesystem.
#[utoipa::path(
    get,
    path = "/download-log",
    tag = "Logs",
    params(DownloadParams),
    responses(
        (status = 200, description = "File contents", content_type = "application/octet-stream"),
        (status = 400, description = "Missing or invalid file parameter", body = ApiError),
        (status = 404, description = "No such log file", body = ApiError)
    )
)]
async fn download_log(
    State(state): State<AppState>,
    Query(params): Query<DownloadParams>,
) -> Response {
    let Some(name) = params.file else {
        return error_response(StatusCode::BAD_REQUEST, "file param required");
    };
    match state.log.read_file(&name) {
        Ok(bytes) => (
            StatusCode::OK,
            [
                (
                    header::CONTENT_TYPE,
                    "application/octet-stream".to_string(),
                ),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{name}\""),
                ),
            ],
            bytes,
        )
            .into_response(),
        Err(StoreError::InvalidFilename { .. }) => {
            error_response(StatusCode::BAD_REQUEST, "invalid file name")
        }
        Err(StoreError::NotFound { .. }) => error_response(StatusCode::NOT_FOUND, "not found"),
        Err(e) => {
            tracing::error!(file = %name, error = %e, "Failed to read log file");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "read failed")
        }
    }
}

// ---- Dashboard ----

/// Everything the dashboard renders in one round trip.
#[derive(Serialize, ToSchema)]
pub struct DashboardResponse {
    /// Full contents of the in-memory buffer, newest first.
    pub alerts: Vec<AlertRecord>,
    pub stats: RollingStats,
}

/// Returns the dashboard snapshot, seeding placeholder alerts first if
/// the store has never held anything.
#[utoipa::path(
    get,
    path = "/dashboard",
    tag = "Alerts",
    responses(
        (status = 200, description = "Dashboard snapshot", body = DashboardResponse)
    )
)]
async fn dashboard(State(state): State<AppState>) -> Json<DashboardResponse> {
    state.store.seed_if_empty();
    Json(DashboardResponse {
        alerts: state.store.recent(state.config.store_capacity),
        stats: state.store.stats(),
    })
}

pub fn routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(model_status, score_model))
        .routes(routes!(list_models))
        .routes(routes!(recent_attacks))
        .routes(routes!(list_log_files))
        .routes(routes!(download_log))
        .routes(routes!(dashboard))
}
