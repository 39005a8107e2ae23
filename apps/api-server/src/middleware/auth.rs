//! Token authentication for handlers.

use quill_core::domain::User;
use quill_core::services::authenticate;

use crate::middleware::error::{AppError, AppResult};
use crate::middleware::input::RequestInput;
use crate::state::AppState;

/// Caller identity, or `None` for an anonymous request.
///
/// An unknown token is treated like no token at all.
pub async fn current_user(state: &AppState, input: &RequestInput) -> AppResult<Option<User>> {
    let token = input.token();
    let user = authenticate(state.users.as_ref(), token).await?;

    if user.is_none() && token.is_some() {
        tracing::debug!("API token did not match any user");
    }

    Ok(user)
}

/// Caller identity for endpoints that refuse anonymous requests.
pub async fn require_user(state: &AppState, input: &RequestInput) -> AppResult<User> {
    current_user(state, input)
        .await?
        .ok_or(AppError::Unauthenticated)
}
