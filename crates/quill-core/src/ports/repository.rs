use async_trait::async_trait;

use crate::domain::{NewUser, User};
use crate::error::RepoError;
use crate::query::{Filter, FindOptions, Record};

/// Generic paged repository shared by every soft-deletable resource.
///
/// Filters are exact-match conjunctions; nothing here filters on lifecycle
/// implicitly, so callers add an explicit lifecycle term where they mean it.
#[async_trait]
pub trait PagedRepository<R: Record>: Send + Sync {
    /// Ordered, paginated rows matching `filter`.
    async fn find_where(
        &self,
        filter: &Filter<R::Field>,
        options: &FindOptions<R::Field>,
    ) -> Result<Vec<R>, RepoError>;

    /// Number of rows matching `filter`, ignoring pagination.
    async fn count(&self, filter: &Filter<R::Field>) -> Result<u64, RepoError>;

    /// Insert a new row and return it as stored.
    async fn create(&self, draft: R::Draft) -> Result<R, RepoError>;

    /// Update at most one row by primary key.
    ///
    /// Returns `true` once the statement ran, including when no row had that id.
    async fn update(&self, id: i64, changes: R::Changes) -> Result<bool, RepoError>;

    /// First row in default order matching `filter`.
    async fn first_where(&self, filter: &Filter<R::Field>) -> Result<Option<R>, RepoError> {
        let options = FindOptions::default().limit(1);
        let mut rows = self.find_where(filter, &options).await?;
        Ok(rows.pop())
    }

    /// Logical delete: an update that moves the row to `Lifecycle::Deleted`.
    async fn soft_delete(&self, id: i64) -> Result<bool, RepoError> {
        self.update(id, R::retirement()).await
    }
}

/// User lookups for token authentication.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find the user whose token matches exactly.
    async fn find_by_token(&self, token: &str) -> Result<Option<User>, RepoError>;

    /// Insert a user. Only used for seeding.
    async fn create(&self, user: NewUser) -> Result<User, RepoError>;
}
