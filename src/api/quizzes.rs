use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use validator::Validate;

use crate::api::errors::{validation_error, ApiError};
use crate::api::guards::CurrentTeacher;
use crate::core::state::AppState;
use crate::db::models::{Quiz, User};
use crate::repositories::{categories, questions, quizzes};
use crate::schemas::question::{QuestionPayload, QuestionResponse};
use crate::schemas::quiz::{QuizCreateRequest, QuizResponse, QuizUpdateRequest};
use crate::services::quiz_codes;

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/:quiz_id", get(get_one).put(update).delete(delete))
        .route("/:quiz_id/publish", post(publish))
        .route("/:quiz_id/unpublish", post(unpublish))
        .route("/:quiz_id/questions", get(list_questions).post(create_question))
        .route("/:quiz_id/questions/:question_id", axum::routing::put(update_question).delete(delete_question))
}

async fn list(
    State(state): State<AppState>,
    CurrentTeacher(teacher): CurrentTeacher,
) -> Result<Json<Vec<QuizResponse>>, ApiError> {
    let rows = quizzes::list_by_teacher(state.db(), &teacher.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list quizzes"))?;

    Ok(Json(rows.into_iter().map(QuizResponse::from_db).collect()))
}

async fn create(
    State(state): State<AppState>,
    CurrentTeacher(teacher): CurrentTeacher,
    Json(payload): Json<QuizCreateRequest>,
) -> Result<(StatusCode, Json<QuizResponse>), ApiError> {
    payload.validate().map_err(validation_error)?;
    check_category(&state, payload.category_id.as_deref()).await?;

    let code = match payload.code.as_deref() {
        Some(raw) => {
            let code = quiz_codes::normalize_code(raw);
            let taken = quizzes::code_exists(state.db(), &code)
                .await
                .map_err(|e| ApiError::internal(e, "Failed to check quiz code"))?;
            if taken {
                return Err(ApiError::Conflict("Quiz code already in use".to_string()));
            }
            code
        }
        None => quiz_codes::generate_unique_code(
            state.db(),
            state.settings().quiz().join_code_length,
        )
        .await
        .map_err(|e| ApiError::internal(e, "Failed to generate quiz code"))?,
    };

    let duration = duration_seconds(&state, payload.duration_minutes);

    let quiz = quizzes::create(
        state.db(),
        quizzes::CreateQuiz {
            title: &payload.title,
            description: payload.description.as_deref(),
            code: &code,
            duration_seconds: duration,
            subject: payload.subject.as_deref(),
            category_id: payload.category_id.as_deref(),
            created_by: &teacher.id,
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to create quiz"))?;

    Ok((StatusCode::CREATED, Json(QuizResponse::from_db(quiz))))
}

async fn get_one(
    State(state): State<AppState>,
    CurrentTeacher(teacher): CurrentTeacher,
    Path(quiz_id): Path<String>,
) -> Result<Json<QuizResponse>, ApiError> {
    let quiz = owned_quiz(&state, &teacher, &quiz_id).await?;
    let question_count = questions::count_by_quiz(state.db(), &quiz.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to count questions"))?;

    Ok(Json(QuizResponse::with_question_count(quiz, question_count)))
}

async fn update(
    State(state): State<AppState>,
    CurrentTeacher(teacher): CurrentTeacher,
    Path(quiz_id): Path<String>,
    Json(payload): Json<QuizUpdateRequest>,
) -> Result<Json<QuizResponse>, ApiError> {
    payload.validate().map_err(validation_error)?;
    check_category(&state, payload.category_id.as_deref()).await?;
    let quiz = owned_quiz(&state, &teacher, &quiz_id).await?;

    let code = match requested_code_change(payload.code.as_deref(), &quiz.code) {
        Some(code) => {
            let taken = quizzes::code_exists(state.db(), &code)
                .await
                .map_err(|e| ApiError::internal(e, "Failed to check quiz code"))?;
            if taken {
                return Err(ApiError::Conflict("Quiz code already in use".to_string()));
            }
            code
        }
        None => quiz.code.clone(),
    };

    let quiz = quizzes::update(
        state.db(),
        &quiz_id,
        quizzes::UpdateQuiz {
            title: &payload.title,
            description: payload.description.as_deref(),
            code: &code,
            duration_seconds: duration_seconds(&state, payload.duration_minutes),
            subject: payload.subject.as_deref(),
            category_id: payload.category_id.as_deref(),
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to update quiz"))?
    .ok_or_else(|| ApiError::NotFound("Quiz not found".to_string()))?;

    Ok(Json(QuizResponse::from_db(quiz)))
}

async fn delete(
    State(state): State<AppState>,
    CurrentTeacher(teacher): CurrentTeacher,
    Path(quiz_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    owned_quiz(&state, &teacher, &quiz_id).await?;

    let deleted = quizzes::delete(state.db(), &quiz_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to delete quiz"))?;

    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound("Quiz not found".to_string()))
    }
}

async fn publish(
    State(state): State<AppState>,
    CurrentTeacher(teacher): CurrentTeacher,
    Path(quiz_id): Path<String>,
) -> Result<Json<QuizResponse>, ApiError> {
    let quiz = owned_quiz(&state, &teacher, &quiz_id).await?;

    let question_count = questions::count_by_quiz(state.db(), &quiz.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to count questions"))?;
    if question_count == 0 {
        return Err(ApiError::BadRequest(
            "Quiz needs at least one question before publishing".to_string(),
        ));
    }

    let quiz = quizzes::set_published(state.db(), &quiz_id, true)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to publish quiz"))?
        .ok_or_else(|| ApiError::NotFound("Quiz not found".to_string()))?;

    Ok(Json(QuizResponse::with_question_count(quiz, question_count)))
}

async fn unpublish(
    State(state): State<AppState>,
    CurrentTeacher(teacher): CurrentTeacher,
    Path(quiz_id): Path<String>,
) -> Result<Json<QuizResponse>, ApiError> {
    owned_quiz(&state, &teacher, &quiz_id).await?;

    let quiz = quizzes::set_published(state.db(), &quiz_id, false)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to unpublish quiz"))?
        .ok_or_else(|| ApiError::NotFound("Quiz not found".to_string()))?;

    Ok(Json(QuizResponse::from_db(quiz)))
}

async fn list_questions(
    State(state): State<AppState>,
    CurrentTeacher(teacher): CurrentTeacher,
    Path(quiz_id): Path<String>,
) -> Result<Json<Vec<QuestionResponse>>, ApiError> {
    owned_quiz(&state, &teacher, &quiz_id).await?;

    let rows = questions::list_by_quiz(state.db(), &quiz_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list questions"))?;

    let mut responses = Vec::with_capacity(rows.len());
    for question in rows {
        let choices = questions::choices_for_question(state.db(), &question.id)
            .await
            .map_err(|e| ApiError::internal(e, "Failed to load choices"))?;
        responses.push(QuestionResponse::from_db(question, choices));
    }

    Ok(Json(responses))
}

async fn create_question(
    State(state): State<AppState>,
    CurrentTeacher(teacher): CurrentTeacher,
    Path(quiz_id): Path<String>,
    Json(payload): Json<QuestionPayload>,
) -> Result<(StatusCode, Json<QuestionResponse>), ApiError> {
    payload.validate().map_err(validation_error)?;
    payload.check_choices().map_err(|msg| ApiError::BadRequest(msg.to_string()))?;
    owned_quiz(&state, &teacher, &quiz_id).await?;

    let question = questions::create(
        state.db(),
        questions::CreateQuestion {
            quiz_id: &quiz_id,
            text: &payload.text,
            image_url: payload.image_url.as_deref(),
            choices: new_choices(&payload),
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to create question"))?;

    let choices = questions::choices_for_question(state.db(), &question.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load choices"))?;

    Ok((StatusCode::CREATED, Json(QuestionResponse::from_db(question, choices))))
}

async fn update_question(
    State(state): State<AppState>,
    CurrentTeacher(teacher): CurrentTeacher,
    Path((quiz_id, question_id)): Path<(String, String)>,
    Json(payload): Json<QuestionPayload>,
) -> Result<Json<QuestionResponse>, ApiError> {
    payload.validate().map_err(validation_error)?;
    payload.check_choices().map_err(|msg| ApiError::BadRequest(msg.to_string()))?;
    owned_quiz(&state, &teacher, &quiz_id).await?;
    quiz_question(&state, &quiz_id, &question_id).await?;

    let question = questions::update(
        state.db(),
        &question_id,
        &payload.text,
        payload.image_url.as_deref(),
        new_choices(&payload),
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to update question"))?
    .ok_or_else(|| ApiError::NotFound("Question not found".to_string()))?;

    let choices = questions::choices_for_question(state.db(), &question.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load choices"))?;

    Ok(Json(QuestionResponse::from_db(question, choices)))
}

async fn delete_question(
    State(state): State<AppState>,
    CurrentTeacher(teacher): CurrentTeacher,
    Path((quiz_id, question_id)): Path<(String, String)>,
) -> Result<StatusCode, ApiError> {
    owned_quiz(&state, &teacher, &quiz_id).await?;
    quiz_question(&state, &quiz_id, &question_id).await?;

    let deleted = questions::delete(state.db(), &question_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to delete question"))?;

    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound("Question not found".to_string()))
    }
}

/// Client durations come in minutes; anything non-positive falls back to the
/// configured default.
fn duration_seconds(state: &AppState, minutes: Option<i32>) -> i32 {
    match minutes {
        Some(minutes) if minutes > 0 => minutes.saturating_mul(60),
        _ => state.settings().quiz().default_duration_seconds as i32,
    }
}

/// Normalized replacement code when the request actually changes it.
fn requested_code_change(requested: Option<&str>, current: &str) -> Option<String> {
    let code = quiz_codes::normalize_code(requested?);
    (code != current).then_some(code)
}

fn new_choices(payload: &QuestionPayload) -> Vec<questions::NewChoice<'_>> {
    payload
        .choices
        .iter()
        .map(|choice| questions::NewChoice {
            label: &choice.label,
            text: &choice.text,
            image_url: choice.image_url.as_deref(),
            is_correct: choice.is_correct,
        })
        .collect()
}

pub(crate) async fn owned_quiz(
    state: &AppState,
    teacher: &User,
    quiz_id: &str,
) -> Result<Quiz, ApiError> {
    let quiz = quizzes::find_by_id(state.db(), quiz_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load quiz"))?
        .ok_or_else(|| ApiError::NotFound("Quiz not found".to_string()))?;

    if quiz.created_by != teacher.id {
        return Err(ApiError::Forbidden("Quiz belongs to another teacher"));
    }

    Ok(quiz)
}

async fn quiz_question(
    state: &AppState,
    quiz_id: &str,
    question_id: &str,
) -> Result<(), ApiError> {
    let question = questions::find_by_id(state.db(), question_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load question"))?
        .ok_or_else(|| ApiError::NotFound("Question not found".to_string()))?;

    if question.quiz_id != quiz_id {
        return Err(ApiError::NotFound("Question not found".to_string()));
    }

    Ok(())
}

async fn check_category(state: &AppState, category_id: Option<&str>) -> Result<(), ApiError> {
    let Some(category_id) = category_id else {
        return Ok(());
    };

    categories::find_by_id(state.db(), category_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load category"))?
        .ok_or_else(|| ApiError::BadRequest("Unknown category".to_string()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::requested_code_change;

    #[test]
    fn update_keeps_the_code_unless_it_changes() {
        assert_eq!(requested_code_change(None, "AB2C3D"), None);
        assert_eq!(requested_code_change(Some("ab2c3d"), "AB2C3D"), None);
        assert_eq!(
            requested_code_change(Some("new2code"), "AB2C3D"),
            Some("NEW2CODE".to_string())
        );
    }
}
