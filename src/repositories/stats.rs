use sqlx::PgPool;
use time::PrimitiveDateTime;

/// A finished attempt on one quiz, ranked for the results table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub(crate) struct QuizResultRow {
    pub(crate) submission_id: String,
    pub(crate) student_id: String,
    pub(crate) username: String,
    pub(crate) score: f64,
    pub(crate) started_at: PrimitiveDateTime,
    pub(crate) finished_at: PrimitiveDateTime,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub(crate) struct RekapRow {
    pub(crate) iso_year: i32,
    pub(crate) iso_week: i32,
    pub(crate) quiz_id: String,
    pub(crate) quiz_title: String,
    pub(crate) avg_correct: f64,
    pub(crate) submission_count: i64,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub(crate) struct QuizLeaderboardRow {
    pub(crate) student_id: String,
    pub(crate) username: String,
    pub(crate) avg_score: f64,
    pub(crate) attempts: i64,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub(crate) struct GlobalLeaderboardRow {
    pub(crate) student_id: String,
    pub(crate) username: String,
    pub(crate) quiz_id: String,
    pub(crate) quiz_title: String,
    pub(crate) score: f64,
    pub(crate) finished_at: PrimitiveDateTime,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub(crate) struct QuizProgressRow {
    pub(crate) student_id: String,
    pub(crate) username: String,
    pub(crate) answered: i64,
    pub(crate) score: Option<f64>,
    pub(crate) started_at: PrimitiveDateTime,
    pub(crate) finished_at: Option<PrimitiveDateTime>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub(crate) struct StudentAttemptRow {
    pub(crate) submission_id: String,
    pub(crate) quiz_id: String,
    pub(crate) quiz_title: String,
    pub(crate) quiz_code: String,
    pub(crate) score: Option<f64>,
    pub(crate) started_at: PrimitiveDateTime,
    pub(crate) finished_at: Option<PrimitiveDateTime>,
}

pub(crate) async fn quiz_results(pool: &PgPool, quiz_id: &str) -> sqlx::Result<Vec<QuizResultRow>> {
    sqlx::query_as::<_, QuizResultRow>(
        "SELECT s.id AS submission_id, s.student_id, u.username,
                s.score::float8 AS score, s.started_at, s.finished_at
         FROM submissions s
         JOIN users u ON u.id = s.student_id
         WHERE s.quiz_id = $1 AND s.finished_at IS NOT NULL
         ORDER BY s.finished_at DESC",
    )
    .bind(quiz_id)
    .fetch_all(pool)
    .await
}

/// Weekly recap over finished attempts, grouped by ISO year and week.
/// `avg_correct` is the mean per-answer correctness in [0, 1].
pub(crate) async fn weekly_rekap(pool: &PgPool, teacher_id: &str) -> sqlx::Result<Vec<RekapRow>> {
    sqlx::query_as::<_, RekapRow>(
        "SELECT EXTRACT(ISOYEAR FROM s.finished_at)::int AS iso_year,
                EXTRACT(WEEK FROM s.finished_at)::int AS iso_week,
                q.id AS quiz_id,
                q.title AS quiz_title,
                AVG(CASE WHEN a.is_correct THEN 1.0 ELSE 0.0 END)::float8 AS avg_correct,
                COUNT(DISTINCT s.id) AS submission_count
         FROM answers a
         JOIN submissions s ON s.id = a.submission_id
         JOIN quizzes q ON q.id = s.quiz_id
         WHERE q.created_by = $1 AND s.finished_at IS NOT NULL
         GROUP BY iso_year, iso_week, q.id, q.title
         ORDER BY iso_year DESC, iso_week DESC, q.title",
    )
    .bind(teacher_id)
    .fetch_all(pool)
    .await
}

pub(crate) async fn weekly_rekap_for_quiz(
    pool: &PgPool,
    quiz_id: &str,
) -> sqlx::Result<Vec<RekapRow>> {
    sqlx::query_as::<_, RekapRow>(
        "SELECT EXTRACT(ISOYEAR FROM s.finished_at)::int AS iso_year,
                EXTRACT(WEEK FROM s.finished_at)::int AS iso_week,
                q.id AS quiz_id,
                q.title AS quiz_title,
                AVG(CASE WHEN a.is_correct THEN 1.0 ELSE 0.0 END)::float8 AS avg_correct,
                COUNT(DISTINCT s.id) AS submission_count
         FROM answers a
         JOIN submissions s ON s.id = a.submission_id
         JOIN quizzes q ON q.id = s.quiz_id
         WHERE q.id = $1 AND s.finished_at IS NOT NULL
         GROUP BY iso_year, iso_week, q.id, q.title
         ORDER BY iso_year DESC, iso_week DESC",
    )
    .bind(quiz_id)
    .fetch_all(pool)
    .await
}

pub(crate) async fn quiz_leaderboard(
    pool: &PgPool,
    quiz_id: &str,
) -> sqlx::Result<Vec<QuizLeaderboardRow>> {
    sqlx::query_as::<_, QuizLeaderboardRow>(
        "SELECT s.student_id, u.username,
                AVG(s.score)::float8 AS avg_score,
                COUNT(*) AS attempts
         FROM submissions s
         JOIN users u ON u.id = s.student_id
         WHERE s.quiz_id = $1 AND s.finished_at IS NOT NULL
         GROUP BY s.student_id, u.username
         ORDER BY avg_score DESC, u.username",
    )
    .bind(quiz_id)
    .fetch_all(pool)
    .await
}

pub(crate) async fn global_leaderboard(
    pool: &PgPool,
    limit: i64,
) -> sqlx::Result<Vec<GlobalLeaderboardRow>> {
    sqlx::query_as::<_, GlobalLeaderboardRow>(
        "SELECT s.student_id, u.username, q.id AS quiz_id, q.title AS quiz_title,
                s.score::float8 AS score, s.finished_at
         FROM submissions s
         JOIN users u ON u.id = s.student_id
         JOIN quizzes q ON q.id = s.quiz_id
         WHERE s.finished_at IS NOT NULL
         ORDER BY s.score DESC, s.finished_at ASC
         LIMIT $1",
    )
    .bind(limit)
    .fetch_all(pool)
    .await
}

pub(crate) async fn quiz_progress(
    pool: &PgPool,
    quiz_id: &str,
) -> sqlx::Result<Vec<QuizProgressRow>> {
    sqlx::query_as::<_, QuizProgressRow>(
        "SELECT s.student_id, u.username,
                (SELECT COUNT(*) FROM answers a WHERE a.submission_id = s.id) AS answered,
                s.score::float8 AS score, s.started_at, s.finished_at
         FROM submissions s
         JOIN users u ON u.id = s.student_id
         WHERE s.quiz_id = $1
         ORDER BY s.started_at DESC",
    )
    .bind(quiz_id)
    .fetch_all(pool)
    .await
}

pub(crate) async fn student_attempts(
    pool: &PgPool,
    student_id: &str,
    quiz_id: Option<&str>,
) -> sqlx::Result<Vec<StudentAttemptRow>> {
    match quiz_id {
        Some(quiz_id) => {
            sqlx::query_as::<_, StudentAttemptRow>(
                "SELECT s.id AS submission_id, q.id AS quiz_id, q.title AS quiz_title,
                        q.code AS quiz_code, s.score::float8 AS score, s.started_at, s.finished_at
                 FROM submissions s
                 JOIN quizzes q ON q.id = s.quiz_id
                 WHERE s.student_id = $1 AND s.quiz_id = $2
                 ORDER BY s.started_at DESC",
            )
            .bind(student_id)
            .bind(quiz_id)
            .fetch_all(pool)
            .await
        }
        None => {
            sqlx::query_as::<_, StudentAttemptRow>(
                "SELECT s.id AS submission_id, q.id AS quiz_id, q.title AS quiz_title,
                        q.code AS quiz_code, s.score::float8 AS score, s.started_at, s.finished_at
                 FROM submissions s
                 JOIN quizzes q ON q.id = s.quiz_id
                 WHERE s.student_id = $1
                 ORDER BY s.started_at DESC",
            )
            .bind(student_id)
            .fetch_all(pool)
            .await
        }
    }
}

/// Latest attempt per published quiz for one student. Quizzes never started
/// come back with NULL submission fields.
#[derive(Debug, Clone, sqlx::FromRow)]
pub(crate) struct StudentProgressRow {
    pub(crate) quiz_id: String,
    pub(crate) quiz_title: String,
    pub(crate) quiz_code: String,
    pub(crate) total_questions: i64,
    pub(crate) submission_id: Option<String>,
    pub(crate) answered: Option<i64>,
    pub(crate) score: Option<f64>,
    pub(crate) started_at: Option<PrimitiveDateTime>,
    pub(crate) finished_at: Option<PrimitiveDateTime>,
}

pub(crate) async fn student_progress(
    pool: &PgPool,
    student_id: &str,
) -> sqlx::Result<Vec<StudentProgressRow>> {
    sqlx::query_as::<_, StudentProgressRow>(
        "SELECT q.id AS quiz_id, q.title AS quiz_title, q.code AS quiz_code,
                (SELECT COUNT(*) FROM questions qq WHERE qq.quiz_id = q.id) AS total_questions,
                s.id AS submission_id,
                (SELECT COUNT(*) FROM answers a WHERE a.submission_id = s.id) AS answered,
                s.score::float8 AS score, s.started_at, s.finished_at
         FROM quizzes q
         LEFT JOIN LATERAL (
             SELECT * FROM submissions s2
             WHERE s2.quiz_id = q.id AND s2.student_id = $1
             ORDER BY s2.started_at DESC
             LIMIT 1
         ) s ON TRUE
         WHERE q.published
         ORDER BY q.title",
    )
    .bind(student_id)
    .fetch_all(pool)
    .await
}
