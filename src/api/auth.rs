use axum::{
    extract::{Form, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use validator::Validate;

use crate::api::errors::{validation_error, ApiError};
use crate::api::guards::CurrentUser;
use crate::core::security;
use crate::core::state::AppState;
use crate::db::models::User;
use crate::db::types::UserRole;
use crate::repositories;
use crate::schemas::auth::{LoginRequest, SignupRequest, TokenResponse};
use crate::schemas::user::UserResponse;

/// Max attempts per window for auth endpoints (login/signup/token).
const AUTH_RATE_LIMIT: u64 = 10;
/// Rate limit window in seconds.
const AUTH_RATE_WINDOW_SECONDS: u64 = 60;

#[derive(Debug, Deserialize)]
struct OAuth2PasswordForm {
    username: String,
    password: String,
}

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/signup", post(signup))
        .route("/login", post(login))
        .route("/token", post(token))
        .route("/me", get(me))
}

async fn signup(
    State(state): State<AppState>,
    Json(payload): Json<SignupRequest>,
) -> Result<(StatusCode, Json<TokenResponse>), ApiError> {
    payload.validate().map_err(validation_error)?;

    let rate_key = format!("rl:signup:{}", payload.username);
    check_rate_limit(&state, &rate_key, "Too many signup attempts, try again later").await?;

    let existing = repositories::users::find_by_username(state.db(), &payload.username)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to check existing user"))?;
    if existing.is_some() {
        return Err(ApiError::Conflict("Username already taken".to_string()));
    }

    if let Some(email) = payload.email.as_deref() {
        let taken = repositories::users::find_by_email(state.db(), email)
            .await
            .map_err(|e| ApiError::internal(e, "Failed to check existing email"))?;
        if taken.is_some() {
            return Err(ApiError::Conflict("Email already registered".to_string()));
        }
    }

    let hashed_password = security::hash_password(&payload.password)
        .map_err(|e| ApiError::internal(e, "Failed to hash password"))?;

    let user = repositories::users::create(
        state.db(),
        repositories::users::CreateUser {
            username: &payload.username,
            email: payload.email.as_deref(),
            hashed_password: &hashed_password,
            role: payload.role.unwrap_or(UserRole::Student),
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to create user"))?;

    let token = security::create_access_token(&user.id, state.settings(), None)
        .map_err(|e| ApiError::internal(e, "Failed to create access token"))?;

    Ok((StatusCode::CREATED, Json(TokenResponse::bearer(token, UserResponse::from_db(user)))))
}

async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    payload.validate().map_err(validation_error)?;

    let rate_key = format!("rl:login:{}", payload.username);
    check_rate_limit(&state, &rate_key, "Too many login attempts, try again later").await?;

    let user = authenticate(&state, &payload.username, &payload.password).await?;

    let token = security::create_access_token(&user.id, state.settings(), None)
        .map_err(|e| ApiError::internal(e, "Failed to create access token"))?;

    Ok(Json(TokenResponse::bearer(token, UserResponse::from_db(user))))
}

async fn token(
    State(state): State<AppState>,
    Form(payload): Form<OAuth2PasswordForm>,
) -> Result<Json<TokenResponse>, ApiError> {
    let rate_key = format!("rl:token:{}", payload.username);
    check_rate_limit(&state, &rate_key, "Too many token attempts, try again later").await?;

    let user = authenticate(&state, &payload.username, &payload.password).await?;

    let token = security::create_access_token(&user.id, state.settings(), None)
        .map_err(|e| ApiError::internal(e, "Failed to create access token"))?;

    Ok(Json(TokenResponse::bearer(token, UserResponse::from_db(user))))
}

async fn me(CurrentUser(user): CurrentUser) -> Json<UserResponse> {
    Json(UserResponse::from_db(user))
}

async fn authenticate(state: &AppState, username: &str, password: &str) -> Result<User, ApiError> {
    let user = repositories::users::find_by_username(state.db(), username)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load user"))?
        .ok_or(ApiError::Unauthorized("Incorrect username or password"))?;

    let verified = security::verify_password(password, &user.hashed_password)
        .map_err(|_| ApiError::Unauthorized("Incorrect username or password"))?;
    if !verified {
        return Err(ApiError::Unauthorized("Incorrect username or password"));
    }

    if !user.is_active {
        return Err(ApiError::BadRequest("Inactive user".to_string()));
    }

    Ok(user)
}

async fn check_rate_limit(
    state: &AppState,
    key: &str,
    message: &'static str,
) -> Result<(), ApiError> {
    let allowed = state
        .redis()
        .rate_limit(key, AUTH_RATE_LIMIT, AUTH_RATE_WINDOW_SECONDS)
        .await
        .unwrap_or(true);

    if allowed {
        Ok(())
    } else {
        Err(ApiError::TooManyRequests(message))
    }
}
