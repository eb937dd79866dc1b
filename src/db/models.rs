use sqlx::types::Json;
use time::PrimitiveDateTime;

use crate::db::types::UserRole;

#[derive(Debug, Clone, sqlx::FromRow)]
pub(crate) struct User {
    pub(crate) id: String,
    pub(crate) username: String,
    pub(crate) email: Option<String>,
    pub(crate) hashed_password: String,
    pub(crate) role: UserRole,
    pub(crate) is_active: bool,
    pub(crate) created_at: PrimitiveDateTime,
    pub(crate) updated_at: PrimitiveDateTime,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub(crate) struct Category {
    pub(crate) id: String,
    pub(crate) name: String,
    pub(crate) description: Option<String>,
    pub(crate) created_by: String,
    pub(crate) created_at: PrimitiveDateTime,
    pub(crate) updated_at: PrimitiveDateTime,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub(crate) struct Material {
    pub(crate) id: String,
    pub(crate) title: String,
    pub(crate) content: Option<String>,
    pub(crate) video_url: Option<String>,
    pub(crate) image_url: Option<String>,
    pub(crate) category_id: Option<String>,
    pub(crate) created_by: String,
    pub(crate) created_at: PrimitiveDateTime,
    pub(crate) updated_at: PrimitiveDateTime,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub(crate) struct Quiz {
    pub(crate) id: String,
    pub(crate) title: String,
    pub(crate) description: Option<String>,
    pub(crate) code: String,
    pub(crate) duration_seconds: i32,
    pub(crate) published: bool,
    pub(crate) published_at: Option<PrimitiveDateTime>,
    pub(crate) subject: Option<String>,
    pub(crate) category_id: Option<String>,
    pub(crate) created_by: String,
    pub(crate) created_at: PrimitiveDateTime,
    pub(crate) updated_at: PrimitiveDateTime,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub(crate) struct Question {
    pub(crate) id: String,
    pub(crate) quiz_id: String,
    pub(crate) text: String,
    pub(crate) image_url: Option<String>,
    pub(crate) position: i32,
    pub(crate) created_at: PrimitiveDateTime,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub(crate) struct Choice {
    pub(crate) id: String,
    pub(crate) question_id: String,
    pub(crate) label: String,
    pub(crate) text: String,
    pub(crate) image_url: Option<String>,
    pub(crate) is_correct: bool,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub(crate) struct Submission {
    pub(crate) id: String,
    pub(crate) quiz_id: String,
    pub(crate) student_id: String,
    pub(crate) question_order: Json<Vec<String>>,
    pub(crate) current_index: i32,
    pub(crate) started_at: PrimitiveDateTime,
    pub(crate) expires_at: PrimitiveDateTime,
    pub(crate) finished_at: Option<PrimitiveDateTime>,
    pub(crate) score: Option<f64>,
    pub(crate) created_at: PrimitiveDateTime,
    pub(crate) updated_at: PrimitiveDateTime,
}

impl Submission {
    pub(crate) fn is_finished(&self) -> bool {
        self.finished_at.is_some()
    }
}
