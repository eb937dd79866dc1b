use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::db::types::UserRole;
use crate::schemas::user::UserResponse;

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct SignupRequest {
    #[validate(length(min = 3, max = 64))]
    pub(crate) username: String,
    #[validate(email)]
    pub(crate) email: Option<String>,
    #[validate(length(min = 8, max = 128))]
    pub(crate) password: String,
    pub(crate) role: Option<UserRole>,
}

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct LoginRequest {
    #[validate(length(min = 1, max = 64))]
    pub(crate) username: String,
    #[validate(length(min = 1, max = 128))]
    pub(crate) password: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct TokenResponse {
    pub(crate) access_token: String,
    pub(crate) token_type: &'static str,
    pub(crate) user: UserResponse,
}

impl TokenResponse {
    pub(crate) fn bearer(access_token: String, user: UserResponse) -> Self {
        Self { access_token, token_type: "bearer", user }
    }
}
