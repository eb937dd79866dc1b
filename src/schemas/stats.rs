use serde::Serialize;

use crate::core::time::format_primitive;
use crate::repositories::stats::{
    GlobalLeaderboardRow, QuizLeaderboardRow, QuizProgressRow, QuizResultRow, RekapRow,
    StudentProgressRow,
};

#[derive(Debug, Serialize)]
pub(crate) struct QuizResultEntry {
    pub(crate) submission_id: String,
    pub(crate) student_id: String,
    pub(crate) username: String,
    pub(crate) score: f64,
    pub(crate) started_at: String,
    pub(crate) finished_at: String,
}

impl QuizResultEntry {
    pub(crate) fn from_row(row: QuizResultRow) -> Self {
        Self {
            submission_id: row.submission_id,
            student_id: row.student_id,
            username: row.username,
            score: row.score,
            started_at: format_primitive(row.started_at),
            finished_at: format_primitive(row.finished_at),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct RekapEntry {
    pub(crate) iso_year: i32,
    pub(crate) iso_week: i32,
    pub(crate) quiz_id: String,
    pub(crate) quiz_title: String,
    pub(crate) avg_correct: f64,
    pub(crate) submission_count: i64,
}

impl RekapEntry {
    pub(crate) fn from_row(row: RekapRow) -> Self {
        Self {
            iso_year: row.iso_year,
            iso_week: row.iso_week,
            quiz_id: row.quiz_id,
            quiz_title: row.quiz_title,
            avg_correct: row.avg_correct,
            submission_count: row.submission_count,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct QuizLeaderboardEntry {
    pub(crate) rank: usize,
    pub(crate) student_id: String,
    pub(crate) username: String,
    pub(crate) avg_score: f64,
    pub(crate) attempts: i64,
}

impl QuizLeaderboardEntry {
    pub(crate) fn from_row(rank: usize, row: QuizLeaderboardRow) -> Self {
        Self {
            rank,
            student_id: row.student_id,
            username: row.username,
            avg_score: row.avg_score,
            attempts: row.attempts,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct GlobalLeaderboardEntry {
    pub(crate) rank: usize,
    pub(crate) student_id: String,
    pub(crate) username: String,
    pub(crate) quiz_id: String,
    pub(crate) quiz_title: String,
    pub(crate) score: f64,
    pub(crate) finished_at: String,
}

impl GlobalLeaderboardEntry {
    pub(crate) fn from_row(rank: usize, row: GlobalLeaderboardRow) -> Self {
        Self {
            rank,
            student_id: row.student_id,
            username: row.username,
            quiz_id: row.quiz_id,
            quiz_title: row.quiz_title,
            score: row.score,
            finished_at: format_primitive(row.finished_at),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct QuizProgressEntry {
    pub(crate) student_id: String,
    pub(crate) username: String,
    pub(crate) answered: i64,
    pub(crate) score: Option<f64>,
    pub(crate) started_at: String,
    pub(crate) finished_at: Option<String>,
}

impl QuizProgressEntry {
    pub(crate) fn from_row(row: QuizProgressRow) -> Self {
        Self {
            student_id: row.student_id,
            username: row.username,
            answered: row.answered,
            score: row.score,
            started_at: format_primitive(row.started_at),
            finished_at: row.finished_at.map(format_primitive),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct StudentProgressEntry {
    pub(crate) quiz_id: String,
    pub(crate) quiz_title: String,
    pub(crate) quiz_code: String,
    pub(crate) status: &'static str,
    pub(crate) answered: i64,
    pub(crate) total_questions: i64,
    pub(crate) score: Option<f64>,
    pub(crate) started_at: Option<String>,
    pub(crate) finished_at: Option<String>,
}

impl StudentProgressEntry {
    pub(crate) fn from_row(row: StudentProgressRow) -> Self {
        let status = match (&row.submission_id, &row.finished_at) {
            (None, _) => "not_started",
            (Some(_), None) => "in_progress",
            (Some(_), Some(_)) => "finished",
        };

        Self {
            quiz_id: row.quiz_id,
            quiz_title: row.quiz_title,
            quiz_code: row.quiz_code,
            status,
            answered: row.answered.unwrap_or(0),
            total_questions: row.total_questions,
            score: row.score,
            started_at: row.started_at.map(format_primitive),
            finished_at: row.finished_at.map(format_primitive),
        }
    }
}
