use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use duely_storage::{Database, NewPriority, Priority, PriorityId, PriorityUpdate};

use crate::{ApiError, AppState};

pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Priority>>, ApiError> {
    let priorities = state.store.run(Database::list_priorities).await?;
    Ok(Json(priorities))
}

pub async fn get(
    State(state): State<AppState>,
    path: Result<Path<PriorityId>, PathRejection>,
) -> Result<Json<Priority>, ApiError> {
    let Path(id) = path?;
    let priority = state.store.run(move |db| db.get_priority(id)).await?;
    Ok(Json(priority))
}

pub async fn create(
    State(state): State<AppState>,
    body: Result<Json<NewPriority>, JsonRejection>,
) -> Result<(StatusCode, Json<Priority>), ApiError> {
    let Json(new) = body?;
    let priority = state.store.run(move |db| db.create_priority(&new)).await?;
    Ok((StatusCode::CREATED, Json(priority)))
}

pub async fn update(
    State(state): State<AppState>,
    path: Result<Path<PriorityId>, PathRejection>,
    body: Result<Json<PriorityUpdate>, JsonRejection>,
) -> Result<Json<Priority>, ApiError> {
    let Path(id) = path?;
    let Json(update) = body?;
    let priority = state
        .store
        .run(move |db| db.update_priority(id, &update))
        .await?;
    Ok(Json(priority))
}

pub async fn delete(
    State(state): State<AppState>,
    path: Result<Path<PriorityId>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let Path(id) = path?;
    state.store.run(move |db| db.delete_priority(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}
