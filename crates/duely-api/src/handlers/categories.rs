use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use duely_storage::{Category, CategoryId, CategoryUpdate, Database, NewCategory};

use crate::{ApiError, AppState};

pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Category>>, ApiError> {
    let categories = state.store.run(Database::list_categories).await?;
    Ok(Json(categories))
}

pub async fn get(
    State(state): State<AppState>,
    path: Result<Path<CategoryId>, PathRejection>,
) -> Result<Json<Category>, ApiError> {
    let Path(id) = path?;
    let category = state.store.run(move |db| db.get_category(id)).await?;
    Ok(Json(category))
}

pub async fn create(
    State(state): State<AppState>,
    body: Result<Json<NewCategory>, JsonRejection>,
) -> Result<(StatusCode, Json<Category>), ApiError> {
    let Json(new) = body?;
    let category = state.store.run(move |db| db.create_category(&new)).await?;
    Ok((StatusCode::CREATED, Json(category)))
}

pub async fn update(
    State(state): State<AppState>,
    path: Result<Path<CategoryId>, PathRejection>,
    body: Result<Json<CategoryUpdate>, JsonRejection>,
) -> Result<Json<Category>, ApiError> {
    let Path(id) = path?;
    let Json(update) = body?;
    let category = state
        .store
        .run(move |db| db.update_category(id, &update))
        .await?;
    Ok(Json(category))
}

pub async fn delete(
    State(state): State<AppState>,
    path: Result<Path<CategoryId>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let Path(id) = path?;
    state.store.run(move |db| db.delete_category(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}
