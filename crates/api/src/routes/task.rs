use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use reelforge_models::{GenerationTask, TaskUpdate};
use reelforge_services::workflow::{self, WorkflowStage};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{error::ApiError, state::AppState};

#[derive(Debug, Serialize)]
pub struct TaskResponse {
    #[serde(flatten)]
    pub task: GenerationTask,
    pub label: &'static str,
}

impl From<GenerationTask> for TaskResponse {
    fn from(task: GenerationTask) -> Self {
        let label = workflow::stage(task.status).label;
        Self { task, label }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskRequest {
    pub asset_id: String,
}

#[derive(Debug, Deserialize)]
pub struct CancelQuery {
    pub reason: Option<String>,
}

fn parse_task_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::BadRequest("Invalid task_id".to_string()))
}

pub async fn create(
    State(state): State<AppState>,
    Json(body): Json<CreateTaskRequest>,
) -> Result<(StatusCode, Json<TaskResponse>), ApiError> {
    if body.asset_id.trim().is_empty() {
        return Err(ApiError::Validation("assetId must not be empty".to_string()));
    }

    let task = state.tasks.try_create(&body.asset_id)?;
    Ok((StatusCode::CREATED, Json(task.into())))
}

pub async fn list(State(state): State<AppState>) -> Json<Vec<TaskResponse>> {
    Json(
        state
            .tasks
            .get_all()
            .into_iter()
            .map(TaskResponse::from)
            .collect(),
    )
}

pub async fn get(
    State(state): State<AppState>,
    Path(task_id): Path<String>,
) -> Result<Json<TaskResponse>, ApiError> {
    let id = parse_task_id(&task_id)?;
    let task = state
        .tasks
        .get(id)
        .ok_or_else(|| ApiError::NotFound(format!("Task not found: {id}")))?;
    Ok(Json(task.into()))
}

pub async fn update(
    State(state): State<AppState>,
    Path(task_id): Path<String>,
    Json(body): Json<TaskUpdate>,
) -> Result<Json<TaskResponse>, ApiError> {
    let id = parse_task_id(&task_id)?;
    if body.is_empty() {
        return Err(ApiError::BadRequest("Empty update".to_string()));
    }
    let task = state.tasks.update(id, body)?;
    Ok(Json(task.into()))
}

pub async fn by_asset(
    State(state): State<AppState>,
    Path(asset_id): Path<String>,
) -> Result<Json<TaskResponse>, ApiError> {
    let task = state
        .tasks
        .get_by_asset_id(&asset_id)
        .ok_or_else(|| ApiError::NotFound(format!("No task in flight for asset {asset_id}")))?;
    Ok(Json(task.into()))
}

pub async fn cancel(
    State(state): State<AppState>,
    Path(task_id): Path<String>,
    Query(query): Query<CancelQuery>,
) -> Result<Json<TaskResponse>, ApiError> {
    let id = parse_task_id(&task_id)?;
    let reason = query.reason.as_deref().unwrap_or("requested by client");
    let task = state.tasks.cancel(id, reason)?;
    Ok(Json(task.into()))
}

pub async fn stages() -> Json<&'static [WorkflowStage]> {
    Json(&workflow::STAGES[..])
}
