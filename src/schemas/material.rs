use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::core::time::format_primitive;
use crate::db::models::Material;

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct MaterialPayload {
    #[validate(length(min = 1, max = 200))]
    pub(crate) title: String,
    #[validate(length(max = 100_000))]
    pub(crate) content: Option<String>,
    #[validate(url)]
    pub(crate) video_url: Option<String>,
    #[validate(url)]
    pub(crate) image_url: Option<String>,
    pub(crate) category_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct MaterialResponse {
    pub(crate) id: String,
    pub(crate) title: String,
    pub(crate) content: Option<String>,
    pub(crate) video_url: Option<String>,
    pub(crate) image_url: Option<String>,
    pub(crate) category_id: Option<String>,
    pub(crate) created_at: String,
    pub(crate) updated_at: String,
}

impl MaterialResponse {
    pub(crate) fn from_db(material: Material) -> Self {
        Self {
            id: material.id,
            title: material.title,
            content: material.content,
            video_url: material.video_url,
            image_url: material.image_url,
            category_id: material.category_id,
            created_at: format_primitive(material.created_at),
            updated_at: format_primitive(material.updated_at),
        }
    }
}
