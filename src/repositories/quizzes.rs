use sqlx::PgPool;
use uuid::Uuid;

use crate::core::time::primitive_now_utc;
use crate::db::models::Quiz;

const COLUMNS: &str = "id, title, description, code, duration_seconds, published, published_at, \
                       subject, category_id, created_by, created_at, updated_at";

pub(crate) struct CreateQuiz<'a> {
    pub(crate) title: &'a str,
    pub(crate) description: Option<&'a str>,
    pub(crate) code: &'a str,
    pub(crate) duration_seconds: i32,
    pub(crate) subject: Option<&'a str>,
    pub(crate) category_id: Option<&'a str>,
    pub(crate) created_by: &'a str,
}

pub(crate) struct UpdateQuiz<'a> {
    pub(crate) title: &'a str,
    pub(crate) description: Option<&'a str>,
    pub(crate) code: &'a str,
    pub(crate) duration_seconds: i32,
    pub(crate) subject: Option<&'a str>,
    pub(crate) category_id: Option<&'a str>,
}

pub(crate) async fn create(pool: &PgPool, params: CreateQuiz<'_>) -> sqlx::Result<Quiz> {
    let now = primitive_now_utc();
    sqlx::query_as::<_, Quiz>(&format!(
        "INSERT INTO quizzes (id, title, description, code, duration_seconds, subject, category_id, created_by, created_at, updated_at)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $9)
         RETURNING {COLUMNS}"
    ))
    .bind(Uuid::new_v4().to_string())
    .bind(params.title)
    .bind(params.description)
    .bind(params.code)
    .bind(params.duration_seconds)
    .bind(params.subject)
    .bind(params.category_id)
    .bind(params.created_by)
    .bind(now)
    .fetch_one(pool)
    .await
}

pub(crate) async fn find_by_id(pool: &PgPool, id: &str) -> sqlx::Result<Option<Quiz>> {
    sqlx::query_as::<_, Quiz>(&format!("SELECT {COLUMNS} FROM quizzes WHERE id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub(crate) async fn find_by_code(pool: &PgPool, code: &str) -> sqlx::Result<Option<Quiz>> {
    sqlx::query_as::<_, Quiz>(&format!("SELECT {COLUMNS} FROM quizzes WHERE code = $1"))
        .bind(code)
        .fetch_optional(pool)
        .await
}

pub(crate) async fn code_exists(pool: &PgPool, code: &str) -> sqlx::Result<bool> {
    let exists: (bool,) =
        sqlx::query_as("SELECT EXISTS (SELECT 1 FROM quizzes WHERE code = $1)")
            .bind(code)
            .fetch_one(pool)
            .await?;
    Ok(exists.0)
}

pub(crate) async fn list_by_teacher(pool: &PgPool, teacher_id: &str) -> sqlx::Result<Vec<Quiz>> {
    sqlx::query_as::<_, Quiz>(&format!(
        "SELECT {COLUMNS} FROM quizzes WHERE created_by = $1 ORDER BY created_at DESC"
    ))
    .bind(teacher_id)
    .fetch_all(pool)
    .await
}

pub(crate) async fn update(
    pool: &PgPool,
    id: &str,
    params: UpdateQuiz<'_>,
) -> sqlx::Result<Option<Quiz>> {
    sqlx::query_as::<_, Quiz>(&format!(
        "UPDATE quizzes
         SET title = $2, description = $3, code = $4, duration_seconds = $5, subject = $6, category_id = $7, updated_at = $8
         WHERE id = $1
         RETURNING {COLUMNS}"
    ))
    .bind(id)
    .bind(params.title)
    .bind(params.description)
    .bind(params.code)
    .bind(params.duration_seconds)
    .bind(params.subject)
    .bind(params.category_id)
    .bind(primitive_now_utc())
    .fetch_optional(pool)
    .await
}

pub(crate) async fn set_published(
    pool: &PgPool,
    id: &str,
    published: bool,
) -> sqlx::Result<Option<Quiz>> {
    let now = primitive_now_utc();
    sqlx::query_as::<_, Quiz>(&format!(
        "UPDATE quizzes
         SET published = $2,
             published_at = CASE WHEN $2 THEN $3 ELSE NULL END,
             updated_at = $3
         WHERE id = $1
         RETURNING {COLUMNS}"
    ))
    .bind(id)
    .bind(published)
    .bind(now)
    .fetch_optional(pool)
    .await
}

pub(crate) async fn delete(pool: &PgPool, id: &str) -> sqlx::Result<bool> {
    let result = sqlx::query("DELETE FROM quizzes WHERE id = $1").bind(id).execute(pool).await?;
    Ok(result.rows_affected() > 0)
}
