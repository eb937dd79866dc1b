use sqlx::PgPool;
use uuid::Uuid;

use crate::core::time::primitive_now_utc;
use crate::db::models::Category;

const COLUMNS: &str = "id, name, description, created_by, created_at, updated_at";

pub(crate) struct CreateCategory<'a> {
    pub(crate) name: &'a str,
    pub(crate) description: Option<&'a str>,
    pub(crate) created_by: &'a str,
}

pub(crate) async fn create(pool: &PgPool, params: CreateCategory<'_>) -> sqlx::Result<Category> {
    let now = primitive_now_utc();
    sqlx::query_as::<_, Category>(&format!(
        "INSERT INTO categories (id, name, description, created_by, created_at, updated_at)
         VALUES ($1, $2, $3, $4, $5, $5)
         RETURNING {COLUMNS}"
    ))
    .bind(Uuid::new_v4().to_string())
    .bind(params.name)
    .bind(params.description)
    .bind(params.created_by)
    .bind(now)
    .fetch_one(pool)
    .await
}

pub(crate) async fn list(pool: &PgPool) -> sqlx::Result<Vec<Category>> {
    sqlx::query_as::<_, Category>(&format!("SELECT {COLUMNS} FROM categories ORDER BY name"))
        .fetch_all(pool)
        .await
}

pub(crate) async fn find_by_id(pool: &PgPool, id: &str) -> sqlx::Result<Option<Category>> {
    sqlx::query_as::<_, Category>(&format!("SELECT {COLUMNS} FROM categories WHERE id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub(crate) async fn update(
    pool: &PgPool,
    id: &str,
    name: &str,
    description: Option<&str>,
) -> sqlx::Result<Option<Category>> {
    sqlx::query_as::<_, Category>(&format!(
        "UPDATE categories SET name = $2, description = $3, updated_at = $4
         WHERE id = $1
         RETURNING {COLUMNS}"
    ))
    .bind(id)
    .bind(name)
    .bind(description)
    .bind(primitive_now_utc())
    .fetch_optional(pool)
    .await
}

pub(crate) async fn delete(pool: &PgPool, id: &str) -> sqlx::Result<bool> {
    let result = sqlx::query("DELETE FROM categories WHERE id = $1").bind(id).execute(pool).await?;
    Ok(result.rows_affected() > 0)
}
