use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::core::time::format_primitive;
use crate::db::models::Submission;
use crate::schemas::question::StudentQuestion;

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct JoinQuizRequest {
    #[validate(length(min = 4, max = 20))]
    pub(crate) code: String,
}

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct AnswerRequest {
    #[validate(length(min = 1, max = 64))]
    pub(crate) choice_id: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct SubmissionResponse {
    pub(crate) id: String,
    pub(crate) quiz_id: String,
    pub(crate) current_index: i32,
    pub(crate) total_questions: usize,
    pub(crate) started_at: String,
    pub(crate) expires_at: String,
    pub(crate) finished_at: Option<String>,
    pub(crate) score: Option<f64>,
}

impl SubmissionResponse {
    pub(crate) fn from_db(submission: Submission) -> Self {
        Self {
            id: submission.id,
            quiz_id: submission.quiz_id,
            current_index: submission.current_index,
            total_questions: submission.question_order.0.len(),
            started_at: format_primitive(submission.started_at),
            expires_at: format_primitive(submission.expires_at),
            finished_at: submission.finished_at.map(format_primitive),
            score: submission.score,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct CurrentQuestionResponse {
    pub(crate) submission_id: String,
    /// 1-based question number within the attempt.
    pub(crate) number: usize,
    pub(crate) total: usize,
    pub(crate) remaining_seconds: i64,
    pub(crate) question: StudentQuestion,
}

#[derive(Debug, Serialize)]
pub(crate) struct AnswerOutcome {
    pub(crate) submission_id: String,
    pub(crate) finished: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) next_index: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) score: Option<f64>,
}

#[derive(Debug, Serialize)]
pub(crate) struct AnswerDetail {
    pub(crate) question_id: String,
    pub(crate) question_text: String,
    pub(crate) choice_id: String,
    pub(crate) choice_label: String,
    pub(crate) choice_text: String,
    pub(crate) is_correct: bool,
}

impl AnswerDetail {
    pub(crate) fn from_row(row: crate::repositories::submissions::AnswerDetailRow) -> Self {
        Self {
            question_id: row.question_id,
            question_text: row.question_text,
            choice_id: row.choice_id,
            choice_label: row.choice_label,
            choice_text: row.choice_text,
            is_correct: row.is_correct,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct ResultResponse {
    pub(crate) submission_id: String,
    pub(crate) quiz_id: String,
    pub(crate) quiz_title: String,
    pub(crate) score: f64,
    pub(crate) correct: i64,
    pub(crate) total: i64,
    pub(crate) started_at: String,
    pub(crate) finished_at: String,
    pub(crate) answers: Vec<AnswerDetail>,
}

#[derive(Debug, Serialize)]
pub(crate) struct HistoryItem {
    pub(crate) submission_id: String,
    pub(crate) quiz_id: String,
    pub(crate) quiz_title: String,
    pub(crate) quiz_code: String,
    pub(crate) score: Option<f64>,
    pub(crate) started_at: String,
    pub(crate) finished_at: Option<String>,
}
