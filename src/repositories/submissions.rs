use sqlx::types::Json;
use sqlx::PgPool;
use time::PrimitiveDateTime;
use uuid::Uuid;

use crate::core::time::primitive_now_utc;
use crate::db::models::Submission;

const COLUMNS: &str = "id, quiz_id, student_id, question_order, current_index, started_at, \
                       expires_at, finished_at, score, created_at, updated_at";

pub(crate) struct CreateSubmission<'a> {
    pub(crate) quiz_id: &'a str,
    pub(crate) student_id: &'a str,
    pub(crate) question_order: Vec<String>,
    pub(crate) started_at: PrimitiveDateTime,
    pub(crate) expires_at: PrimitiveDateTime,
}

pub(crate) async fn create(pool: &PgPool, params: CreateSubmission<'_>) -> sqlx::Result<Submission> {
    sqlx::query_as::<_, Submission>(&format!(
        "INSERT INTO submissions (id, quiz_id, student_id, question_order, current_index, started_at, expires_at, created_at, updated_at)
         VALUES ($1, $2, $3, $4, 0, $5, $6, $5, $5)
         RETURNING {COLUMNS}"
    ))
    .bind(Uuid::new_v4().to_string())
    .bind(params.quiz_id)
    .bind(params.student_id)
    .bind(Json(params.question_order))
    .bind(params.started_at)
    .bind(params.expires_at)
    .fetch_one(pool)
    .await
}

pub(crate) async fn find_by_id(pool: &PgPool, id: &str) -> sqlx::Result<Option<Submission>> {
    sqlx::query_as::<_, Submission>(&format!("SELECT {COLUMNS} FROM submissions WHERE id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub(crate) async fn find_open(
    pool: &PgPool,
    quiz_id: &str,
    student_id: &str,
) -> sqlx::Result<Option<Submission>> {
    sqlx::query_as::<_, Submission>(&format!(
        "SELECT {COLUMNS} FROM submissions
         WHERE quiz_id = $1 AND student_id = $2 AND finished_at IS NULL"
    ))
    .bind(quiz_id)
    .bind(student_id)
    .fetch_optional(pool)
    .await
}

pub(crate) async fn find_finished(
    pool: &PgPool,
    quiz_id: &str,
    student_id: &str,
) -> sqlx::Result<Option<Submission>> {
    sqlx::query_as::<_, Submission>(&format!(
        "SELECT {COLUMNS} FROM submissions
         WHERE quiz_id = $1 AND student_id = $2 AND finished_at IS NOT NULL
         ORDER BY finished_at DESC
         LIMIT 1"
    ))
    .bind(quiz_id)
    .bind(student_id)
    .fetch_optional(pool)
    .await
}

pub(crate) async fn advance_index(
    pool: &PgPool,
    id: &str,
    current_index: i32,
) -> sqlx::Result<Option<Submission>> {
    sqlx::query_as::<_, Submission>(&format!(
        "UPDATE submissions SET current_index = $2, updated_at = $3
         WHERE id = $1
         RETURNING {COLUMNS}"
    ))
    .bind(id)
    .bind(current_index)
    .bind(primitive_now_utc())
    .fetch_optional(pool)
    .await
}

pub(crate) async fn finalize(
    pool: &PgPool,
    id: &str,
    score: f64,
    finished_at: PrimitiveDateTime,
) -> sqlx::Result<Option<Submission>> {
    sqlx::query_as::<_, Submission>(&format!(
        "UPDATE submissions SET score = $2, finished_at = $3, updated_at = $3
         WHERE id = $1 AND finished_at IS NULL
         RETURNING {COLUMNS}"
    ))
    .bind(id)
    .bind(score)
    .bind(finished_at)
    .fetch_optional(pool)
    .await
}

pub(crate) async fn record_answer(
    pool: &PgPool,
    submission_id: &str,
    question_id: &str,
    choice_id: &str,
    is_correct: bool,
) -> sqlx::Result<()> {
    sqlx::query(
        "INSERT INTO answers (id, submission_id, question_id, choice_id, is_correct, created_at)
         VALUES ($1, $2, $3, $4, $5, $6)
         ON CONFLICT (submission_id, question_id) DO NOTHING",
    )
    .bind(Uuid::new_v4().to_string())
    .bind(submission_id)
    .bind(question_id)
    .bind(choice_id)
    .bind(is_correct)
    .bind(primitive_now_utc())
    .execute(pool)
    .await?;
    Ok(())
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub(crate) struct AnswerDetailRow {
    pub(crate) question_id: String,
    pub(crate) question_text: String,
    pub(crate) choice_id: String,
    pub(crate) choice_label: String,
    pub(crate) choice_text: String,
    pub(crate) is_correct: bool,
}

pub(crate) async fn answer_details(
    pool: &PgPool,
    submission_id: &str,
) -> sqlx::Result<Vec<AnswerDetailRow>> {
    sqlx::query_as::<_, AnswerDetailRow>(
        "SELECT a.question_id, q.text AS question_text, a.choice_id,
                c.label AS choice_label, c.text AS choice_text, a.is_correct
         FROM answers a
         JOIN questions q ON q.id = a.question_id
         JOIN choices c ON c.id = a.choice_id
         WHERE a.submission_id = $1
         ORDER BY a.created_at",
    )
    .bind(submission_id)
    .fetch_all(pool)
    .await
}

pub(crate) async fn count_correct(pool: &PgPool, submission_id: &str) -> sqlx::Result<i64> {
    let count: (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM answers WHERE submission_id = $1 AND is_correct")
            .bind(submission_id)
            .fetch_one(pool)
            .await?;
    Ok(count.0)
}
