use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;

use duely_storage::{Database, NewTask, TaskId, TaskUpdate, TaskView};

use crate::{ApiError, AppState};

pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<TaskView>>, ApiError> {
    let tasks = state.store.run(Database::list_tasks).await?;
    Ok(Json(tasks))
}

pub async fn get(
    State(state): State<AppState>,
    path: Result<Path<TaskId>, PathRejection>,
) -> Result<Json<TaskView>, ApiError> {
    let Path(id) = path?;
    let task = state.store.run(move |db| db.get_task(id)).await?;
    Ok(Json(task))
}

pub async fn create(
    State(state): State<AppState>,
    body: Result<Json<NewTask>, JsonRejection>,
) -> Result<(StatusCode, Json<TaskView>), ApiError> {
    let Json(new) = body?;
    let now = Utc::now();
    let task = state.store.run(move |db| db.create_task(&new, now)).await?;
    Ok((StatusCode::CREATED, Json(task)))
}

pub async fn update(
    State(state): State<AppState>,
    path: Result<Path<TaskId>, PathRejection>,
    body: Result<Json<TaskUpdate>, JsonRejection>,
) -> Result<Json<TaskView>, ApiError> {
    let Path(id) = path?;
    let Json(update) = body?;
    let task = state
        .store
        .run(move |db| db.update_task(id, &update))
        .await?;
    Ok(Json(task))
}

pub async fn delete(
    State(state): State<AppState>,
    path: Result<Path<TaskId>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let Path(id) = path?;
    state.store.run(move |db| db.delete_task(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}
