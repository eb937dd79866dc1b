use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use validator::Validate;

use crate::api::errors::{validation_error, ApiError};
use crate::api::guards::{CurrentTeacher, CurrentUser};
use crate::core::state::AppState;
use crate::repositories::categories;
use crate::schemas::category::{CategoryPayload, CategoryResponse};

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/:category_id", get(get_one).put(update).delete(delete))
}

async fn list(
    State(state): State<AppState>,
    _user: CurrentUser,
) -> Result<Json<Vec<CategoryResponse>>, ApiError> {
    let rows = categories::list(state.db())
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list categories"))?;

    Ok(Json(rows.into_iter().map(CategoryResponse::from_db).collect()))
}

async fn create(
    State(state): State<AppState>,
    CurrentTeacher(teacher): CurrentTeacher,
    Json(payload): Json<CategoryPayload>,
) -> Result<(StatusCode, Json<CategoryResponse>), ApiError> {
    payload.validate().map_err(validation_error)?;

    let category = categories::create(
        state.db(),
        categories::CreateCategory {
            name: &payload.name,
            description: payload.description.as_deref(),
            created_by: &teacher.id,
        },
    )
    .await
    .map_err(|e| match e {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            ApiError::Conflict("Category with this name already exists".to_string())
        }
        other => ApiError::internal(other, "Failed to create category"),
    })?;

    Ok((StatusCode::CREATED, Json(CategoryResponse::from_db(category))))
}

async fn get_one(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(category_id): Path<String>,
) -> Result<Json<CategoryResponse>, ApiError> {
    let category = categories::find_by_id(state.db(), &category_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load category"))?
        .ok_or_else(|| ApiError::NotFound("Category not found".to_string()))?;

    Ok(Json(CategoryResponse::from_db(category)))
}

async fn update(
    State(state): State<AppState>,
    _teacher: CurrentTeacher,
    Path(category_id): Path<String>,
    Json(payload): Json<CategoryPayload>,
) -> Result<Json<CategoryResponse>, ApiError> {
    payload.validate().map_err(validation_error)?;

    let category =
        categories::update(state.db(), &category_id, &payload.name, payload.description.as_deref())
            .await
            .map_err(|e| ApiError::internal(e, "Failed to update category"))?
            .ok_or_else(|| ApiError::NotFound("Category not found".to_string()))?;

    Ok(Json(CategoryResponse::from_db(category)))
}

async fn delete(
    State(state): State<AppState>,
    _teacher: CurrentTeacher,
    Path(category_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let deleted = categories::delete(state.db(), &category_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to delete category"))?;

    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound("Category not found".to_string()))
    }
}
