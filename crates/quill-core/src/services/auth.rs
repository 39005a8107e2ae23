//! Token authentication.

use crate::domain::User;
use crate::error::RepoError;
use crate::ports::UserRepository;

/// Resolve a request-supplied token to its user.
///
/// A missing, empty, or unknown token is the anonymous state and yields
/// `Ok(None)`. Tokens are static bearer strings compared by equality; there is
/// no expiry or signature to verify.
pub async fn authenticate<U>(users: &U, token: Option<&str>) -> Result<Option<User>, RepoError>
where
    U: UserRepository + ?Sized,
{
    let Some(token) = token.filter(|t| !t.is_empty()) else {
        return Ok(None);
    };

    users.find_by_token(token).await
}
