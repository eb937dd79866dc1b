use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};

use crate::api::errors::ApiError;
use crate::api::guards::{CurrentTeacher, CurrentUser};
use crate::api::quizzes::owned_quiz;
use crate::core::state::AppState;
use crate::repositories::{stats, users};
use crate::schemas::stats::{
    GlobalLeaderboardEntry, QuizLeaderboardEntry, QuizProgressEntry, QuizResultEntry, RekapEntry,
    StudentProgressEntry,
};
use crate::schemas::user::UserResponse;

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/rekap", get(rekap))
        .route("/leaderboard", get(global_leaderboard))
        .route("/quizzes/:quiz_id/results", get(quiz_results))
        .route("/quizzes/:quiz_id/rekap", get(quiz_rekap))
        .route("/quizzes/:quiz_id/leaderboard", get(quiz_leaderboard))
        .route("/quizzes/:quiz_id/progress", get(quiz_progress))
        .route("/students", get(students))
        .route("/students/:student_id/progress", get(student_progress))
}

/// Weekly recap of quiz performance for the requesting teacher.
async fn rekap(
    State(state): State<AppState>,
    CurrentTeacher(teacher): CurrentTeacher,
) -> Result<Json<Vec<RekapEntry>>, ApiError> {
    let rows = stats::weekly_rekap(state.db(), &teacher.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to compute weekly recap"))?;

    Ok(Json(rows.into_iter().map(RekapEntry::from_row).collect()))
}

async fn global_leaderboard(
    State(state): State<AppState>,
    _user: CurrentUser,
) -> Result<Json<Vec<GlobalLeaderboardEntry>>, ApiError> {
    let limit = state.settings().quiz().leaderboard_size as i64;
    let rows = stats::global_leaderboard(state.db(), limit)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load leaderboard"))?;

    let entries = rows
        .into_iter()
        .enumerate()
        .map(|(index, row)| GlobalLeaderboardEntry::from_row(index + 1, row))
        .collect();

    Ok(Json(entries))
}

async fn quiz_results(
    State(state): State<AppState>,
    CurrentTeacher(teacher): CurrentTeacher,
    Path(quiz_id): Path<String>,
) -> Result<Json<Vec<QuizResultEntry>>, ApiError> {
    owned_quiz(&state, &teacher, &quiz_id).await?;

    let rows = stats::quiz_results(state.db(), &quiz_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load quiz results"))?;

    Ok(Json(rows.into_iter().map(QuizResultEntry::from_row).collect()))
}

/// Weekly recap restricted to one quiz.
async fn quiz_rekap(
    State(state): State<AppState>,
    CurrentTeacher(teacher): CurrentTeacher,
    Path(quiz_id): Path<String>,
) -> Result<Json<Vec<RekapEntry>>, ApiError> {
    owned_quiz(&state, &teacher, &quiz_id).await?;

    let rows = stats::weekly_rekap_for_quiz(state.db(), &quiz_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to compute weekly recap"))?;

    Ok(Json(rows.into_iter().map(RekapEntry::from_row).collect()))
}

async fn quiz_leaderboard(
    State(state): State<AppState>,
    CurrentTeacher(teacher): CurrentTeacher,
    Path(quiz_id): Path<String>,
) -> Result<Json<Vec<QuizLeaderboardEntry>>, ApiError> {
    owned_quiz(&state, &teacher, &quiz_id).await?;

    let rows = stats::quiz_leaderboard(state.db(), &quiz_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load quiz leaderboard"))?;

    let entries = rows
        .into_iter()
        .enumerate()
        .map(|(index, row)| QuizLeaderboardEntry::from_row(index + 1, row))
        .collect();

    Ok(Json(entries))
}

async fn quiz_progress(
    State(state): State<AppState>,
    CurrentTeacher(teacher): CurrentTeacher,
    Path(quiz_id): Path<String>,
) -> Result<Json<Vec<QuizProgressEntry>>, ApiError> {
    owned_quiz(&state, &teacher, &quiz_id).await?;

    let rows = stats::quiz_progress(state.db(), &quiz_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load quiz progress"))?;

    Ok(Json(rows.into_iter().map(QuizProgressEntry::from_row).collect()))
}

async fn students(
    State(state): State<AppState>,
    _teacher: CurrentTeacher,
) -> Result<Json<Vec<UserResponse>>, ApiError> {
    let rows = users::list_students(state.db())
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list students"))?;

    Ok(Json(rows.into_iter().map(UserResponse::from_db).collect()))
}

/// Per published quiz, the student's latest attempt and its status.
async fn student_progress(
    State(state): State<AppState>,
    _teacher: CurrentTeacher,
    Path(student_id): Path<String>,
) -> Result<Json<Vec<StudentProgressEntry>>, ApiError> {
    let student = users::find_by_id(state.db(), &student_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load student"))?
        .ok_or_else(|| ApiError::NotFound("Student not found".to_string()))?;

    let rows = stats::student_progress(state.db(), &student.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load student progress"))?;

    Ok(Json(rows.into_iter().map(StudentProgressEntry::from_row).collect()))
}
