//! Application state - shared across all handlers.

use std::sync::Arc;

use quill_core::domain::{Comment, NewUser, Post};
use quill_core::error::RepoError;
use quill_core::ports::{PagedRepository, UserRepository};
use quill_infra::database::{DatabaseConfig, DatabaseConnections};
use quill_infra::{InMemoryRepository, InMemoryUserRepository};

#[cfg(feature = "postgres")]
use quill_infra::{PostgresCommentRepository, PostgresPostRepository, PostgresUserRepository};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepository>,
    pub posts: Arc<dyn PagedRepository<Post>>,
    pub comments: Arc<dyn PagedRepository<Comment>>,
    pub db: Option<Arc<DatabaseConnections>>,
}

impl AppState {
    /// Build the application state with appropriate implementations.
    pub async fn new(db_config: Option<&DatabaseConfig>) -> Self {
        #[cfg(feature = "postgres")]
        {
            if let Some(config) = db_config {
                match DatabaseConnections::init(config).await {
                    Ok(connections) => {
                        let conn = Arc::new(connections);
                        tracing::info!("Application state initialized (postgres)");
                        return Self {
                            users: Arc::new(PostgresUserRepository::new(conn.main.clone())),
                            posts: Arc::new(PostgresPostRepository::new(conn.main.clone())),
                            comments: Arc::new(PostgresCommentRepository::new(conn.main.clone())),
                            db: Some(conn),
                        };
                    }
                    Err(e) => {
                        tracing::error!(
                            "Failed to connect to database: {}. Using in-memory fallback.",
                            e
                        );
                    }
                }
            } else {
                tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
            }
        }

        #[cfg(not(feature = "postgres"))]
        {
            if db_config.is_some() {
                tracing::warn!("DATABASE_URL ignored: built without the postgres feature");
            }
            tracing::info!("Running without postgres feature - using in-memory repositories");
        }

        let state = Self::in_memory();
        tracing::info!("Application state initialized (in-memory)");
        state
    }

    /// State backed entirely by in-memory repositories.
    pub fn in_memory() -> Self {
        Self {
            users: Arc::new(InMemoryUserRepository::new()),
            posts: Arc::new(InMemoryRepository::<Post>::new()),
            comments: Arc::new(InMemoryRepository::<Comment>::new()),
            db: None,
        }
    }

    /// Make sure an `admin` user holding `token` exists.
    pub async fn seed_admin(&self, token: &str) -> Result<(), RepoError> {
        if self.users.find_by_token(token).await?.is_some() {
            tracing::debug!("Admin user already present");
            return Ok(());
        }

        let admin = self
            .users
            .create(NewUser {
                name: "admin".to_string(),
                username: "admin@admin.com".to_string(),
                token: token.to_string(),
            })
            .await?;

        tracing::info!(user_id = admin.id, "Seeded admin user");
        Ok(())
    }
}
