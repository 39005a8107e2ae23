use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// User entity - an author identified by a static bearer token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub username: String,
    #[serde(skip_serializing)]
    pub token: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Attributes for seeding a user.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub username: String,
    pub token: String,
}

impl User {
    pub fn from_new(id: i64, new: NewUser, now: DateTime<Utc>) -> Self {
        Self {
            id,
            name: new.name,
            username: new.username,
            token: new.token,
            created_at: now,
            updated_at: now,
        }
    }
}
