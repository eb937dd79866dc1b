use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use validator::Validate;

use crate::api::errors::{validation_error, ApiError};
use crate::api::guards::{CurrentStudent, CurrentUser};
use crate::core::state::AppState;
use crate::core::time::{format_primitive, primitive_now_utc};
use crate::db::models::{Submission, User};
use crate::db::types::UserRole;
use crate::repositories::{questions, quizzes, stats, submissions};
use crate::schemas::question::StudentQuestion;
use crate::schemas::quiz::JoinedQuizResponse;
use crate::schemas::submission::{
    AnswerDetail, AnswerOutcome, AnswerRequest, CurrentQuestionResponse, HistoryItem,
    JoinQuizRequest, ResultResponse, SubmissionResponse,
};
use crate::services::sequencing::{self, DeadlineState};
use crate::services::{quiz_codes, scoring};

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/join", post(join))
        .route("/quizzes/:quiz_id/start", post(start))
        .route("/history", get(history))
        .route("/:submission_id", get(result))
        .route("/:submission_id/question", get(current_question))
        .route("/:submission_id/answer", post(answer))
}

/// Looks up a published quiz by its join code.
async fn join(
    State(state): State<AppState>,
    _student: CurrentStudent,
    Json(payload): Json<JoinQuizRequest>,
) -> Result<Json<JoinedQuizResponse>, ApiError> {
    payload.validate().map_err(validation_error)?;

    let code = quiz_codes::normalize_code(&payload.code);
    let quiz = quizzes::find_by_code(state.db(), &code)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to look up quiz code"))?
        .filter(|quiz| quiz.published)
        .ok_or_else(|| ApiError::NotFound("No published quiz with this code".to_string()))?;

    let question_count = questions::count_by_quiz(state.db(), &quiz.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to count questions"))?;

    Ok(Json(JoinedQuizResponse::from_db(quiz, question_count)))
}

/// Starts an attempt, or resumes the open one. A finished attempt blocks retakes.
async fn start(
    State(state): State<AppState>,
    CurrentStudent(student): CurrentStudent,
    Path(quiz_id): Path<String>,
) -> Result<(StatusCode, Json<SubmissionResponse>), ApiError> {
    let quiz = quizzes::find_by_id(state.db(), &quiz_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load quiz"))?
        .filter(|quiz| quiz.published)
        .ok_or_else(|| ApiError::NotFound("Quiz not found".to_string()))?;

    if let Some(finished) = submissions::find_finished(state.db(), &quiz.id, &student.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to check previous attempts"))?
    {
        return Err(completed_conflict(&finished.id));
    }

    if let Some(open) = submissions::find_open(state.db(), &quiz.id, &student.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to check open attempt"))?
    {
        let open_id = open.id.clone();
        return match enforce_deadline(&state, open).await? {
            Some(open) => Ok((StatusCode::OK, Json(SubmissionResponse::from_db(open)))),
            None => Err(completed_conflict(&open_id)),
        };
    }

    let question_rows = questions::list_by_quiz(state.db(), &quiz.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load questions"))?;
    if question_rows.is_empty() {
        return Err(ApiError::BadRequest("Quiz has no questions".to_string()));
    }

    let order = sequencing::shuffled_order(
        question_rows.into_iter().map(|question| question.id).collect(),
    );

    let started_at = primitive_now_utc();
    let expires_at = started_at
        .checked_add(time::Duration::seconds(quiz.duration_seconds as i64))
        .ok_or_else(|| ApiError::Internal("Invalid quiz duration".to_string()))?;

    let submission = submissions::create(
        state.db(),
        submissions::CreateSubmission {
            quiz_id: &quiz.id,
            student_id: &student.id,
            question_order: order,
            started_at,
            expires_at,
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to create submission"))?;

    Ok((StatusCode::CREATED, Json(SubmissionResponse::from_db(submission))))
}

async fn current_question(
    State(state): State<AppState>,
    CurrentStudent(student): CurrentStudent,
    Path(submission_id): Path<String>,
) -> Result<Json<CurrentQuestionResponse>, ApiError> {
    let submission = load_own_submission(&state, &student, &submission_id).await?;
    if submission.is_finished() {
        return Err(ApiError::Conflict("Submission is already finished".to_string()));
    }

    let submission = enforce_deadline(&state, submission)
        .await?
        .ok_or_else(|| ApiError::Gone("Time is up, submission was finalized".to_string()))?;

    let order = &submission.question_order.0;
    let index = submission.current_index;
    let question_id = order
        .get(index as usize)
        .ok_or_else(|| ApiError::Internal("Submission index out of range".to_string()))?;

    let question = questions::find_by_id(state.db(), question_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load question"))?
        .ok_or_else(|| ApiError::NotFound("Question not found".to_string()))?;
    let choices = questions::choices_for_question(state.db(), &question.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load choices"))?;

    let remaining = scoring::remaining_seconds(primitive_now_utc(), submission.expires_at);

    Ok(Json(CurrentQuestionResponse {
        submission_id: submission.id,
        number: index as usize + 1,
        total: order.len(),
        remaining_seconds: remaining,
        question: StudentQuestion::from_db(question, choices),
    }))
}

async fn answer(
    State(state): State<AppState>,
    CurrentStudent(student): CurrentStudent,
    Path(submission_id): Path<String>,
    Json(payload): Json<AnswerRequest>,
) -> Result<Json<AnswerOutcome>, ApiError> {
    payload.validate().map_err(validation_error)?;

    let submission = load_own_submission(&state, &student, &submission_id).await?;
    if submission.is_finished() {
        return Err(ApiError::Conflict("Submission is already finished".to_string()));
    }

    let submission = enforce_deadline(&state, submission)
        .await?
        .ok_or_else(|| ApiError::Gone("Time is up, submission was finalized".to_string()))?;

    let order = submission.question_order.0.clone();
    let index = submission.current_index as usize;
    let question_id = order
        .get(index)
        .ok_or_else(|| ApiError::Internal("Submission index out of range".to_string()))?;

    let choice = questions::find_choice(state.db(), question_id, &payload.choice_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load choice"))?
        .ok_or_else(|| {
            ApiError::BadRequest("Choice does not belong to the current question".to_string())
        })?;

    submissions::record_answer(state.db(), &submission.id, question_id, &choice.id, choice.is_correct)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to record answer"))?;

    let next_index = index + 1;
    if next_index >= order.len() {
        let finished = finalize(&state, &submission, order.len() as i64).await?;
        return Ok(Json(AnswerOutcome {
            submission_id: finished.id,
            finished: true,
            next_index: None,
            score: finished.score,
        }));
    }

    let submission = submissions::advance_index(state.db(), &submission.id, next_index as i32)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to advance submission"))?
        .ok_or_else(|| ApiError::NotFound("Submission not found".to_string()))?;

    Ok(Json(AnswerOutcome {
        submission_id: submission.id,
        finished: false,
        next_index: Some(submission.current_index),
        score: None,
    }))
}

/// Result view for a finished submission. Visible to its owner and to any
/// teacher.
async fn result(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(submission_id): Path<String>,
) -> Result<Json<ResultResponse>, ApiError> {
    let submission = submissions::find_by_id(state.db(), &submission_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load submission"))?
        .ok_or_else(|| ApiError::NotFound("Submission not found".to_string()))?;

    if submission.student_id != user.id && user.role != UserRole::Teacher {
        return Err(ApiError::NotFound("Submission not found".to_string()));
    }

    let submission = match enforce_deadline(&state, submission).await? {
        Some(open) if !open.is_finished() => {
            return Err(ApiError::Conflict("Submission is not finished yet".to_string()));
        }
        Some(finished) => finished,
        None => submissions::find_by_id(state.db(), &submission_id)
            .await
            .map_err(|e| ApiError::internal(e, "Failed to load submission"))?
            .ok_or_else(|| ApiError::NotFound("Submission not found".to_string()))?,
    };

    let quiz = quizzes::find_by_id(state.db(), &submission.quiz_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load quiz"))?
        .ok_or_else(|| ApiError::NotFound("Quiz not found".to_string()))?;

    let correct = submissions::count_correct(state.db(), &submission.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to count correct answers"))?;
    let total = submission.question_order.0.len() as i64;

    let answers = submissions::answer_details(state.db(), &submission.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load answers"))?
        .into_iter()
        .map(AnswerDetail::from_row)
        .collect();

    let finished_at = submission
        .finished_at
        .ok_or_else(|| ApiError::Internal("Finished submission without timestamp".to_string()))?;

    Ok(Json(ResultResponse {
        submission_id: submission.id,
        quiz_id: quiz.id,
        quiz_title: quiz.title,
        score: submission.score.unwrap_or_default(),
        correct,
        total,
        started_at: format_primitive(submission.started_at),
        finished_at: format_primitive(finished_at),
        answers,
    }))
}

#[derive(Debug, Deserialize)]
struct HistoryQuery {
    quiz_id: Option<String>,
}

async fn history(
    State(state): State<AppState>,
    CurrentStudent(student): CurrentStudent,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<Vec<HistoryItem>>, ApiError> {
    let rows = stats::student_attempts(state.db(), &student.id, query.quiz_id.as_deref())
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load attempt history"))?;

    let items = rows
        .into_iter()
        .map(|row| HistoryItem {
            submission_id: row.submission_id,
            quiz_id: row.quiz_id,
            quiz_title: row.quiz_title,
            quiz_code: row.quiz_code,
            score: row.score,
            started_at: format_primitive(row.started_at),
            finished_at: row.finished_at.map(format_primitive),
        })
        .collect();

    Ok(Json(items))
}

async fn load_own_submission(
    state: &AppState,
    student: &User,
    submission_id: &str,
) -> Result<Submission, ApiError> {
    let submission = submissions::find_by_id(state.db(), submission_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load submission"))?
        .ok_or_else(|| ApiError::NotFound("Submission not found".to_string()))?;

    if submission.student_id != student.id {
        return Err(ApiError::NotFound("Submission not found".to_string()));
    }

    Ok(submission)
}

fn completed_conflict(submission_id: &str) -> ApiError {
    ApiError::Conflict(format!("Quiz already completed (submission {submission_id})"))
}

/// Finalizes an open submission whose deadline passed. Returns `None` when it
/// was just finalized, the still-open submission otherwise.
async fn enforce_deadline(
    state: &AppState,
    submission: Submission,
) -> Result<Option<Submission>, ApiError> {
    let state_now = sequencing::deadline_state(
        primitive_now_utc(),
        submission.expires_at,
        submission.is_finished(),
    );

    match state_now {
        DeadlineState::Finished | DeadlineState::Open => Ok(Some(submission)),
        DeadlineState::Expired => {
            finalize(state, &submission, submission.question_order.0.len() as i64).await?;
            Ok(None)
        }
    }
}

async fn finalize(
    state: &AppState,
    submission: &Submission,
    total: i64,
) -> Result<Submission, ApiError> {
    let correct = submissions::count_correct(state.db(), &submission.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to count correct answers"))?;
    let score = scoring::percentage(correct, total);

    submissions::finalize(state.db(), &submission.id, score, primitive_now_utc())
        .await
        .map_err(|e| ApiError::internal(e, "Failed to finalize submission"))?
        .ok_or_else(|| ApiError::Conflict("Submission is already finished".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retake_conflict_names_the_finished_submission() {
        match completed_conflict("sub-42") {
            ApiError::Conflict(detail) => assert!(detail.contains("sub-42")),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
