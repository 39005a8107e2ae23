use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Lifecycle, Slug};
use crate::query::{FieldValue, Record};
use crate::services::ownership::{Owned, Stampable};

/// Post entity - a blog article, optionally owned by one user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: i64,
    pub user_id: Option<i64>,
    pub title: String,
    pub slug: String,
    pub content: String,
    pub lifecycle: Lifecycle,
    pub published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Columns a post can be filtered or ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PostField {
    Id,
    UserId,
    Title,
    Slug,
    Content,
    Lifecycle,
    Published,
    CreatedAt,
    UpdatedAt,
}

/// Attributes of a post about to be created.
#[derive(Debug, Clone)]
pub struct NewPost {
    pub user_id: Option<i64>,
    pub title: String,
    pub slug: Slug,
    pub content: String,
    pub published: bool,
}

/// Partial update of a post. `None` leaves the column untouched.
#[derive(Debug, Clone, Default)]
pub struct PostChanges {
    pub title: Option<String>,
    pub slug: Option<Slug>,
    pub content: Option<String>,
    pub published: Option<bool>,
    pub lifecycle: Option<Lifecycle>,
}

impl Record for Post {
    type Field = PostField;
    type Draft = NewPost;
    type Changes = PostChanges;

    const ID: PostField = PostField::Id;
    const UNIQUE: &'static [PostField] = &[PostField::Slug];

    fn id(&self) -> i64 {
        self.id
    }

    fn value(&self, field: PostField) -> FieldValue {
        match field {
            PostField::Id => self.id.into(),
            PostField::UserId => self.user_id.into(),
            PostField::Title => self.title.as_str().into(),
            PostField::Slug => self.slug.as_str().into(),
            PostField::Content => self.content.as_str().into(),
            PostField::Lifecycle => self.lifecycle.into(),
            PostField::Published => self.published.into(),
            PostField::CreatedAt => self.created_at.into(),
            PostField::UpdatedAt => self.updated_at.into(),
        }
    }

    fn from_draft(id: i64, draft: NewPost, now: DateTime<Utc>) -> Self {
        Self {
            id,
            user_id: draft.user_id,
            title: draft.title,
            slug: draft.slug.into_inner(),
            content: draft.content,
            lifecycle: Lifecycle::Active,
            published: draft.published,
            created_at: now,
            updated_at: now,
        }
    }

    fn apply(&mut self, changes: PostChanges, now: DateTime<Utc>) {
        if let Some(title) = changes.title {
            self.title = title;
        }
        if let Some(slug) = changes.slug {
            self.slug = slug.into_inner();
        }
        if let Some(content) = changes.content {
            self.content = content;
        }
        if let Some(published) = changes.published {
            self.published = published;
        }
        if let Some(lifecycle) = changes.lifecycle {
            self.lifecycle = lifecycle;
        }
        self.updated_at = now;
    }

    fn retirement() -> PostChanges {
        PostChanges {
            lifecycle: Some(Lifecycle::Deleted),
            ..Default::default()
        }
    }
}

impl Owned for Post {
    fn owner_id(&self) -> Option<i64> {
        self.user_id
    }
}

impl Stampable for NewPost {
    fn set_owner(&mut self, user_id: i64) {
        self.user_id = Some(user_id);
    }
}
