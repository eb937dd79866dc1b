use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::core::time::format_primitive;
use crate::db::models::Category;

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct CategoryPayload {
    #[validate(length(min = 1, max = 120))]
    pub(crate) name: String,
    #[validate(length(max = 2000))]
    pub(crate) description: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct CategoryResponse {
    pub(crate) id: String,
    pub(crate) name: String,
    pub(crate) description: Option<String>,
    pub(crate) created_at: String,
}

impl CategoryResponse {
    pub(crate) fn from_db(category: Category) -> Self {
        Self {
            id: category.id,
            name: category.name,
            description: category.description,
            created_at: format_primitive(category.created_at),
        }
    }
}
