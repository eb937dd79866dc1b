use sqlx::PgPool;
use uuid::Uuid;

use crate::core::time::primitive_now_utc;
use crate::db::models::Material;

const COLUMNS: &str =
    "id, title, content, video_url, image_url, category_id, created_by, created_at, updated_at";

pub(crate) struct CreateMaterial<'a> {
    pub(crate) title: &'a str,
    pub(crate) content: Option<&'a str>,
    pub(crate) video_url: Option<&'a str>,
    pub(crate) image_url: Option<&'a str>,
    pub(crate) category_id: Option<&'a str>,
    pub(crate) created_by: &'a str,
}

pub(crate) struct UpdateMaterial<'a> {
    pub(crate) title: &'a str,
    pub(crate) content: Option<&'a str>,
    pub(crate) video_url: Option<&'a str>,
    pub(crate) image_url: Option<&'a str>,
    pub(crate) category_id: Option<&'a str>,
}

pub(crate) async fn create(pool: &PgPool, params: CreateMaterial<'_>) -> sqlx::Result<Material> {
    let now = primitive_now_utc();
    sqlx::query_as::<_, Material>(&format!(
        "INSERT INTO materials (id, title, content, video_url, image_url, category_id, created_by, created_at, updated_at)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $8)
         RETURNING {COLUMNS}"
    ))
    .bind(Uuid::new_v4().to_string())
    .bind(params.title)
    .bind(params.content)
    .bind(params.video_url)
    .bind(params.image_url)
    .bind(params.category_id)
    .bind(params.created_by)
    .bind(now)
    .fetch_one(pool)
    .await
}

pub(crate) async fn list(pool: &PgPool, category_id: Option<&str>) -> sqlx::Result<Vec<Material>> {
    match category_id {
        Some(category_id) => {
            sqlx::query_as::<_, Material>(&format!(
                "SELECT {COLUMNS} FROM materials WHERE category_id = $1 ORDER BY created_at DESC"
            ))
            .bind(category_id)
            .fetch_all(pool)
            .await
        }
        None => {
            sqlx::query_as::<_, Material>(&format!(
                "SELECT {COLUMNS} FROM materials ORDER BY created_at DESC"
            ))
            .fetch_all(pool)
            .await
        }
    }
}

pub(crate) async fn find_by_id(pool: &PgPool, id: &str) -> sqlx::Result<Option<Material>> {
    sqlx::query_as::<_, Material>(&format!("SELECT {COLUMNS} FROM materials WHERE id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub(crate) async fn update(
    pool: &PgPool,
    id: &str,
    params: UpdateMaterial<'_>,
) -> sqlx::Result<Option<Material>> {
    sqlx::query_as::<_, Material>(&format!(
        "UPDATE materials
         SET title = $2, content = $3, video_url = $4, image_url = $5, category_id = $6, updated_at = $7
         WHERE id = $1
         RETURNING {COLUMNS}"
    ))
    .bind(id)
    .bind(params.title)
    .bind(params.content)
    .bind(params.video_url)
    .bind(params.image_url)
    .bind(params.category_id)
    .bind(primitive_now_utc())
    .fetch_optional(pool)
    .await
}

pub(crate) async fn delete(pool: &PgPool, id: &str) -> sqlx::Result<bool> {
    let result = sqlx::query("DELETE FROM materials WHERE id = $1").bind(id).execute(pool).await?;
    Ok(result.rows_affected() > 0)
}
