//! REST API handlers for agent management and task distribution

use axum::{
    extract::{
        multipart::MultipartRejection,
        rejection::JsonRejection,
        DefaultBodyLimit, Multipart, Path, State,
    },
    http::StatusCode,
    response::Json,
    routing::{delete, get, post, put},
    Router,
};
use bytes::Bytes;
use serde_json::Value;
use std::sync::Arc;

use agentdesk_core::agents::AgentProfile;
use agentdesk_core::api::{ApiError, DeskCore, DistributionOutcome};

/// Multipart field carrying the contact list
const UPLOAD_FIELD: &str = "file";

/// Shared application state for API handlers
pub struct ApiState {
    pub core: Arc<DeskCore>,
}

type JsonResult = Result<Json<Value>, (StatusCode, Json<Value>)>;

/// Helper to create JSON error responses
fn json_error(status: StatusCode, message: &str) -> (StatusCode, Json<Value>) {
    (status, Json(serde_json::json!({ "error": message })))
}

/// Map a facade error to an HTTP status and `{error}` body
fn api_error(err: ApiError) -> (StatusCode, Json<Value>) {
    match &err {
        ApiError::AgentNotFound { id } => {
            tracing::warn!("API: agent not found agent_id={}", id);
            json_error(StatusCode::NOT_FOUND, &err.to_string())
        }
        ApiError::DuplicateEmail { email } => {
            tracing::warn!("API: duplicate agent email={}", email);
            json_error(StatusCode::BAD_REQUEST, &err.to_string())
        }
        ApiError::PersistenceFailure { message } => {
            tracing::error!("API: storage failure: {}", message);
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "Server error")
        }
        _ => {
            tracing::warn!("API: request rejected: {}", err);
            json_error(StatusCode::BAD_REQUEST, &err.to_string())
        }
    }
}

/// Unwrap a JSON body, answering malformed input with a JSON error
fn json_body<T>(body: Result<Json<T>, JsonRejection>) -> Result<T, (StatusCode, Json<Value>)> {
    body.map(|Json(value)| value).map_err(|rejection| {
        tracing::warn!("API: malformed JSON body: {}", rejection.body_text());
        json_error(StatusCode::BAD_REQUEST, "Invalid JSON body")
    })
}

fn distribution_json(outcome: &DistributionOutcome) -> Json<Value> {
    Json(serde_json::json!({
        "success": true,
        "agents": outcome.agents,
        "message": outcome.message(),
    }))
}

/// Agent routes, relative to the `/api` prefix
pub(super) fn routes(state: Arc<ApiState>, max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/agents/add-agent", post(add_agent))
        .route("/agents/list-agents", get(list_agents))
        .route("/agents/update-agent/{id}", put(update_agent))
        .route("/agents/delete-agent/{id}", delete(delete_agent))
        .route("/agents/upload-list", post(upload_list))
        .route("/agents/reassign-tasks", post(reassign_tasks))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .with_state(state)
}

/// List all agents with their assigned tasks
pub async fn list_agents(State(state): State<Arc<ApiState>>) -> JsonResult {
    let agents = state.core.list_agents().map_err(api_error)?;
    Ok(Json(serde_json::json!({ "agents": agents })))
}

/// Register a new agent
pub async fn add_agent(
    State(state): State<Arc<ApiState>>,
    body: Result<Json<AgentProfile>, JsonRejection>,
) -> JsonResult {
    let profile = json_body(body)?;
    tracing::info!("API: add agent name={}", profile.name);
    let agent = state.core.add_agent(profile).map_err(api_error)?;
    Ok(Json(serde_json::json!({ "success": true, "agent": agent })))
}

/// Update an agent's name, email and mobile
pub async fn update_agent(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<String>,
    body: Result<Json<AgentProfile>, JsonRejection>,
) -> JsonResult {
    let profile = json_body(body)?;
    tracing::info!("API: update agent agent_id={}", id);
    let agent = state.core.update_agent(&id, profile).map_err(api_error)?;
    Ok(Json(serde_json::json!({ "success": true, "agent": agent })))
}

/// Remove an agent
pub async fn delete_agent(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<String>,
) -> JsonResult {
    tracing::info!("API: delete agent agent_id={}", id);
    state.core.delete_agent(&id).map_err(api_error)?;
    Ok(Json(serde_json::json!({
        "success": true,
        "message": "Agent deleted successfully",
    })))
}

/// Upload a contact CSV (multipart field `file`) and distribute it
pub async fn upload_list(
    State(state): State<Arc<ApiState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> JsonResult {
    let mut multipart = multipart.map_err(|rejection| {
        tracing::warn!("API: upload failed - not a multipart request: {}", rejection.body_text());
        json_error(StatusCode::BAD_REQUEST, "No file uploaded")
    })?;
    let mut upload: Option<Bytes> = None;

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                tracing::warn!("API: upload failed - malformed multipart: {}", e.body_text());
                return Err(json_error(e.status(), &e.body_text()));
            }
        };
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }

        let file_name = field.file_name().unwrap_or("<unnamed>").to_string();
        let data = field.bytes().await.map_err(|e| {
            tracing::warn!("API: upload failed - could not read file: {}", e.body_text());
            json_error(e.status(), &e.body_text())
        })?;
        tracing::info!("API: upload file={} size={}", file_name, data.len());
        upload = Some(data);
        break;
    }

    let Some(data) = upload else {
        tracing::warn!("API: upload failed - no file field");
        return Err(json_error(StatusCode::BAD_REQUEST, "No file uploaded"));
    };

    let outcome = state.core.upload_contacts(&data).map_err(api_error)?;
    Ok(distribution_json(&outcome))
}

/// Pool all assigned tasks and distribute them again
pub async fn reassign_tasks(State(state): State<Arc<ApiState>>) -> JsonResult {
    tracing::info!("API: reassign tasks");
    let outcome = state.core.reassign_tasks().map_err(api_error)?;
    Ok(distribution_json(&outcome))
}
