use sqlx::PgPool;
use uuid::Uuid;

use crate::core::time::primitive_now_utc;
use crate::db::models::{Choice, Question};

const QUESTION_COLUMNS: &str = "id, quiz_id, text, image_url, position, created_at";
const CHOICE_COLUMNS: &str = "id, question_id, label, text, image_url, is_correct";

pub(crate) struct NewChoice<'a> {
    pub(crate) label: &'a str,
    pub(crate) text: &'a str,
    pub(crate) image_url: Option<&'a str>,
    pub(crate) is_correct: bool,
}

pub(crate) struct CreateQuestion<'a> {
    pub(crate) quiz_id: &'a str,
    pub(crate) text: &'a str,
    pub(crate) image_url: Option<&'a str>,
    pub(crate) choices: Vec<NewChoice<'a>>,
}

/// Inserts the question and its choices in one transaction.
pub(crate) async fn create(pool: &PgPool, params: CreateQuestion<'_>) -> sqlx::Result<Question> {
    let mut tx = pool.begin().await?;

    let position: (i32,) = sqlx::query_as(
        "SELECT COALESCE(MAX(position), -1) + 1 FROM questions WHERE quiz_id = $1",
    )
    .bind(params.quiz_id)
    .fetch_one(&mut *tx)
    .await?;

    let question = sqlx::query_as::<_, Question>(&format!(
        "INSERT INTO questions (id, quiz_id, text, image_url, position, created_at)
         VALUES ($1, $2, $3, $4, $5, $6)
         RETURNING {QUESTION_COLUMNS}"
    ))
    .bind(Uuid::new_v4().to_string())
    .bind(params.quiz_id)
    .bind(params.text)
    .bind(params.image_url)
    .bind(position.0)
    .bind(primitive_now_utc())
    .fetch_one(&mut *tx)
    .await?;

    for choice in &params.choices {
        sqlx::query(
            "INSERT INTO choices (id, question_id, label, text, image_url, is_correct)
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(Uuid::new_v4().to_string())
        .bind(&question.id)
        .bind(choice.label)
        .bind(choice.text)
        .bind(choice.image_url)
        .bind(choice.is_correct)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    Ok(question)
}

pub(crate) async fn find_by_id(pool: &PgPool, id: &str) -> sqlx::Result<Option<Question>> {
    sqlx::query_as::<_, Question>(&format!(
        "SELECT {QUESTION_COLUMNS} FROM questions WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub(crate) async fn list_by_quiz(pool: &PgPool, quiz_id: &str) -> sqlx::Result<Vec<Question>> {
    sqlx::query_as::<_, Question>(&format!(
        "SELECT {QUESTION_COLUMNS} FROM questions WHERE quiz_id = $1 ORDER BY position"
    ))
    .bind(quiz_id)
    .fetch_all(pool)
    .await
}

pub(crate) async fn count_by_quiz(pool: &PgPool, quiz_id: &str) -> sqlx::Result<i64> {
    let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM questions WHERE quiz_id = $1")
        .bind(quiz_id)
        .fetch_one(pool)
        .await?;
    Ok(count.0)
}

pub(crate) async fn choices_for_question(
    pool: &PgPool,
    question_id: &str,
) -> sqlx::Result<Vec<Choice>> {
    sqlx::query_as::<_, Choice>(&format!(
        "SELECT {CHOICE_COLUMNS} FROM choices WHERE question_id = $1 ORDER BY label"
    ))
    .bind(question_id)
    .fetch_all(pool)
    .await
}

pub(crate) async fn find_choice(
    pool: &PgPool,
    question_id: &str,
    choice_id: &str,
) -> sqlx::Result<Option<Choice>> {
    sqlx::query_as::<_, Choice>(&format!(
        "SELECT {CHOICE_COLUMNS} FROM choices WHERE id = $1 AND question_id = $2"
    ))
    .bind(choice_id)
    .bind(question_id)
    .fetch_optional(pool)
    .await
}

/// Replaces the question text and choice set in one transaction.
pub(crate) async fn update(
    pool: &PgPool,
    id: &str,
    text: &str,
    image_url: Option<&str>,
    choices: Vec<NewChoice<'_>>,
) -> sqlx::Result<Option<Question>> {
    let mut tx = pool.begin().await?;

    let question = sqlx::query_as::<_, Question>(&format!(
        "UPDATE questions SET text = $2, image_url = $3 WHERE id = $1
         RETURNING {QUESTION_COLUMNS}"
    ))
    .bind(id)
    .bind(text)
    .bind(image_url)
    .fetch_optional(&mut *tx)
    .await?;

    let Some(question) = question else {
        tx.rollback().await?;
        return Ok(None);
    };

    sqlx::query("DELETE FROM choices WHERE question_id = $1")
        .bind(&question.id)
        .execute(&mut *tx)
        .await?;

    for choice in &choices {
        sqlx::query(
            "INSERT INTO choices (id, question_id, label, text, image_url, is_correct)
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(Uuid::new_v4().to_string())
        .bind(&question.id)
        .bind(choice.label)
        .bind(choice.text)
        .bind(choice.image_url)
        .bind(choice.is_correct)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    Ok(Some(question))
}

pub(crate) async fn delete(pool: &PgPool, id: &str) -> sqlx::Result<bool> {
    let result = sqlx::query("DELETE FROM questions WHERE id = $1").bind(id).execute(pool).await?;
    Ok(result.rows_affected() > 0)
}
