use anyhow::Context;

use crate::core::{security, state::AppState};
use crate::db::types::UserRole;
use crate::repositories::users::{self, CreateUser};

/// Seeds the first teacher account so a fresh deployment is usable.
pub(crate) async fn ensure_default_teacher(state: &AppState) -> anyhow::Result<()> {
    let admin = state.settings().admin();
    if admin.first_teacher_password.is_empty() {
        tracing::warn!("FIRST_TEACHER_PASSWORD is not set, skipping default teacher bootstrap");
        return Ok(());
    }

    if users::find_by_username(state.db(), &admin.first_teacher_username)
        .await
        .context("Failed to look up default teacher")?
        .is_some()
    {
        return Ok(());
    }

    let hashed = security::hash_password(&admin.first_teacher_password)
        .context("Failed to hash default teacher password")?;

    users::create(
        state.db(),
        CreateUser {
            username: &admin.first_teacher_username,
            email: None,
            hashed_password: &hashed,
            role: UserRole::Teacher,
        },
    )
    .await
    .context("Failed to create default teacher")?;

    tracing::info!(username = %admin.first_teacher_username, "Default teacher account created");
    Ok(())
}
