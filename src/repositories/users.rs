use sqlx::PgPool;
use uuid::Uuid;

use crate::core::time::primitive_now_utc;
use crate::db::models::User;
use crate::db::types::UserRole;

const COLUMNS: &str =
    "id, username, email, hashed_password, role, is_active, created_at, updated_at";

pub(crate) struct CreateUser<'a> {
    pub(crate) username: &'a str,
    pub(crate) email: Option<&'a str>,
    pub(crate) hashed_password: &'a str,
    pub(crate) role: UserRole,
}

pub(crate) async fn create(pool: &PgPool, params: CreateUser<'_>) -> sqlx::Result<User> {
    let now = primitive_now_utc();
    sqlx::query_as::<_, User>(&format!(
        "INSERT INTO users (id, username, email, hashed_password, role, is_active, created_at, updated_at)
         VALUES ($1, $2, $3, $4, $5, TRUE, $6, $6)
         RETURNING {COLUMNS}"
    ))
    .bind(Uuid::new_v4().to_string())
    .bind(params.username)
    .bind(params.email)
    .bind(params.hashed_password)
    .bind(params.role)
    .bind(now)
    .fetch_one(pool)
    .await
}

pub(crate) async fn find_by_id(pool: &PgPool, id: &str) -> sqlx::Result<Option<User>> {
    sqlx::query_as::<_, User>(&format!("SELECT {COLUMNS} FROM users WHERE id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub(crate) async fn find_by_username(pool: &PgPool, username: &str) -> sqlx::Result<Option<User>> {
    sqlx::query_as::<_, User>(&format!("SELECT {COLUMNS} FROM users WHERE username = $1"))
        .bind(username)
        .fetch_optional(pool)
        .await
}

pub(crate) async fn find_by_email(pool: &PgPool, email: &str) -> sqlx::Result<Option<User>> {
    sqlx::query_as::<_, User>(&format!("SELECT {COLUMNS} FROM users WHERE email = $1"))
        .bind(email)
        .fetch_optional(pool)
        .await
}

pub(crate) async fn list_students(pool: &PgPool) -> sqlx::Result<Vec<User>> {
    sqlx::query_as::<_, User>(&format!(
        "SELECT {COLUMNS} FROM users WHERE role = 'student' ORDER BY username"
    ))
    .fetch_all(pool)
    .await
}
