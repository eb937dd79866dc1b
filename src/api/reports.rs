use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, HeaderValue},
    routing::get,
    Router,
};

use crate::api::errors::ApiError;
use crate::api::guards::CurrentTeacher;
use crate::api::quizzes::owned_quiz;
use crate::core::state::AppState;
use crate::repositories::{stats, users};
use crate::services::reports;

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/quizzes/:quiz_id/results/pdf", get(quiz_results_pdf))
        .route("/students/:student_id/progress/pdf", get(student_progress_pdf))
}

async fn quiz_results_pdf(
    State(state): State<AppState>,
    CurrentTeacher(teacher): CurrentTeacher,
    Path(quiz_id): Path<String>,
) -> Result<(HeaderMap, Vec<u8>), ApiError> {
    let quiz = owned_quiz(&state, &teacher, &quiz_id).await?;

    let rows = stats::quiz_results(state.db(), &quiz.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load quiz results"))?;

    let bytes = reports::quiz_results_report(&quiz.title, &rows)
        .map_err(|e| ApiError::internal(e, "Failed to render results report"))?;

    let filename = format!("rekap-nilai-{}.pdf", quiz.code.to_lowercase());
    Ok((pdf_headers(&filename), bytes))
}

async fn student_progress_pdf(
    State(state): State<AppState>,
    _teacher: CurrentTeacher,
    Path(student_id): Path<String>,
) -> Result<(HeaderMap, Vec<u8>), ApiError> {
    let student = users::find_by_id(state.db(), &student_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load student"))?
        .ok_or_else(|| ApiError::NotFound("Student not found".to_string()))?;

    let rows = stats::student_progress(state.db(), &student.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load student progress"))?;

    let bytes = reports::student_progress_report(&student.username, &rows)
        .map_err(|e| ApiError::internal(e, "Failed to render progress report"))?;

    let filename = format!("progress-{}.pdf", student.username);
    Ok((pdf_headers(&filename), bytes))
}

fn pdf_headers(filename: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/pdf"));
    if let Ok(value) = HeaderValue::from_str(&format!("attachment; filename=\"{filename}\"")) {
        headers.insert(header::CONTENT_DISPOSITION, value);
    }
    headers
}
