use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::core::time::format_primitive;
use crate::db::models::Quiz;

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct QuizCreateRequest {
    #[validate(length(min = 1, max = 200))]
    pub(crate) title: String,
    #[validate(length(max = 5000))]
    pub(crate) description: Option<String>,
    /// Optional client-chosen join code; generated server-side when omitted.
    #[validate(length(min = 4, max = 20))]
    pub(crate) code: Option<String>,
    /// Duration in minutes; non-positive or missing values fall back to the
    /// configured default.
    pub(crate) duration_minutes: Option<i32>,
    #[validate(length(max = 120))]
    pub(crate) subject: Option<String>,
    pub(crate) category_id: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct QuizUpdateRequest {
    #[validate(length(min = 1, max = 200))]
    pub(crate) title: String,
    #[validate(length(max = 5000))]
    pub(crate) description: Option<String>,
    /// New join code; the current one is kept when omitted.
    #[validate(length(min = 4, max = 20))]
    pub(crate) code: Option<String>,
    pub(crate) duration_minutes: Option<i32>,
    #[validate(length(max = 120))]
    pub(crate) subject: Option<String>,
    pub(crate) category_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct QuizResponse {
    pub(crate) id: String,
    pub(crate) title: String,
    pub(crate) description: Option<String>,
    pub(crate) code: String,
    pub(crate) duration_seconds: i32,
    pub(crate) published: bool,
    pub(crate) published_at: Option<String>,
    pub(crate) subject: Option<String>,
    pub(crate) category_id: Option<String>,
    pub(crate) created_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) question_count: Option<i64>,
}

impl QuizResponse {
    pub(crate) fn from_db(quiz: Quiz) -> Self {
        Self {
            id: quiz.id,
            title: quiz.title,
            description: quiz.description,
            code: quiz.code,
            duration_seconds: quiz.duration_seconds,
            published: quiz.published,
            published_at: quiz.published_at.map(format_primitive),
            subject: quiz.subject,
            category_id: quiz.category_id,
            created_at: format_primitive(quiz.created_at),
            question_count: None,
        }
    }

    pub(crate) fn with_question_count(quiz: Quiz, question_count: i64) -> Self {
        let mut response = Self::from_db(quiz);
        response.question_count = Some(question_count);
        response
    }
}

/// Quiz shape shown to students after joining by code. No answer data.
#[derive(Debug, Serialize)]
pub(crate) struct JoinedQuizResponse {
    pub(crate) id: String,
    pub(crate) title: String,
    pub(crate) description: Option<String>,
    pub(crate) subject: Option<String>,
    pub(crate) duration_seconds: i32,
    pub(crate) question_count: i64,
}

impl JoinedQuizResponse {
    pub(crate) fn from_db(quiz: Quiz, question_count: i64) -> Self {
        Self {
            id: quiz.id,
            title: quiz.title,
            description: quiz.description,
            subject: quiz.subject,
            duration_seconds: quiz.duration_seconds,
            question_count,
        }
    }
}
