use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use validator::Validate;

use crate::api::errors::{validation_error, ApiError};
use crate::api::guards::{CurrentTeacher, CurrentUser};
use crate::core::state::AppState;
use crate::db::models::{Material, User};
use crate::repositories::{categories, materials};
use crate::schemas::material::{MaterialPayload, MaterialResponse};

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/:material_id", get(get_one).put(update).delete(delete))
}

#[derive(Debug, Deserialize)]
struct ListQuery {
    category_id: Option<String>,
}

async fn list(
    State(state): State<AppState>,
    _user: CurrentUser,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<MaterialResponse>>, ApiError> {
    let rows = materials::list(state.db(), query.category_id.as_deref())
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list materials"))?;

    Ok(Json(rows.into_iter().map(MaterialResponse::from_db).collect()))
}

async fn create(
    State(state): State<AppState>,
    CurrentTeacher(teacher): CurrentTeacher,
    Json(payload): Json<MaterialPayload>,
) -> Result<(StatusCode, Json<MaterialResponse>), ApiError> {
    payload.validate().map_err(validation_error)?;
    check_category(&state, payload.category_id.as_deref()).await?;

    let material = materials::create(
        state.db(),
        materials::CreateMaterial {
            title: &payload.title,
            content: payload.content.as_deref(),
            video_url: payload.video_url.as_deref(),
            image_url: payload.image_url.as_deref(),
            category_id: payload.category_id.as_deref(),
            created_by: &teacher.id,
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to create material"))?;

    Ok((StatusCode::CREATED, Json(MaterialResponse::from_db(material))))
}

async fn get_one(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(material_id): Path<String>,
) -> Result<Json<MaterialResponse>, ApiError> {
    let material = materials::find_by_id(state.db(), &material_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load material"))?
        .ok_or_else(|| ApiError::NotFound("Material not found".to_string()))?;

    Ok(Json(MaterialResponse::from_db(material)))
}

async fn update(
    State(state): State<AppState>,
    CurrentTeacher(teacher): CurrentTeacher,
    Path(material_id): Path<String>,
    Json(payload): Json<MaterialPayload>,
) -> Result<Json<MaterialResponse>, ApiError> {
    payload.validate().map_err(validation_error)?;
    owned_material(&state, &teacher, &material_id).await?;
    check_category(&state, payload.category_id.as_deref()).await?;

    let material = materials::update(
        state.db(),
        &material_id,
        materials::UpdateMaterial {
            title: &payload.title,
            content: payload.content.as_deref(),
            video_url: payload.video_url.as_deref(),
            image_url: payload.image_url.as_deref(),
            category_id: payload.category_id.as_deref(),
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to update material"))?
    .ok_or_else(|| ApiError::NotFound("Material not found".to_string()))?;

    Ok(Json(MaterialResponse::from_db(material)))
}

async fn delete(
    State(state): State<AppState>,
    CurrentTeacher(teacher): CurrentTeacher,
    Path(material_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    owned_material(&state, &teacher, &material_id).await?;

    let deleted = materials::delete(state.db(), &material_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to delete material"))?;

    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound("Material not found".to_string()))
    }
}

async fn owned_material(
    state: &AppState,
    teacher: &User,
    material_id: &str,
) -> Result<Material, ApiError> {
    let material = materials::find_by_id(state.db(), material_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load material"))?
        .ok_or_else(|| ApiError::NotFound("Material not found".to_string()))?;

    ensure_author(&material, teacher)?;
    Ok(material)
}

fn ensure_author(material: &Material, teacher: &User) -> Result<(), ApiError> {
    if material.created_by != teacher.id {
        return Err(ApiError::Forbidden("Material belongs to another teacher"));
    }
    Ok(())
}

async fn check_category(state: &AppState, category_id: Option<&str>) -> Result<(), ApiError> {
    let Some(category_id) = category_id else {
        return Ok(());
    };

    categories::find_by_id(state.db(), category_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load category"))?
        .ok_or_else(|| ApiError::BadRequest("Unknown category".to_string()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::time::primitive_now_utc;
    use crate::db::types::UserRole;

    fn teacher(id: &str) -> User {
        let now = primitive_now_utc();
        User {
            id: id.to_string(),
            username: format!("teacher-{id}"),
            email: None,
            hashed_password: "hash".to_string(),
            role: UserRole::Teacher,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    fn material(created_by: &str) -> Material {
        let now = primitive_now_utc();
        Material {
            id: "material-1".to_string(),
            title: "Pecahan".to_string(),
            content: None,
            video_url: None,
            image_url: None,
            category_id: None,
            created_by: created_by.to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn author_may_edit_own_material() {
        assert!(ensure_author(&material("teacher-1"), &teacher("teacher-1")).is_ok());
    }

    #[test]
    fn other_teachers_are_forbidden() {
        let result = ensure_author(&material("teacher-1"), &teacher("teacher-2"));
        assert!(matches!(result, Err(ApiError::Forbidden(_))));
    }
}
