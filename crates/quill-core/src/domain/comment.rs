use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Lifecycle;
use crate::query::{FieldValue, Record};
use crate::services::ownership::{Owned, Stampable};

/// Comment entity - a reply attached to a post.
///
/// `post_id` is not enforced as a foreign key; comments outlive their post's
/// lifecycle changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: i64,
    pub user_id: Option<i64>,
    pub post_id: i64,
    pub content: String,
    pub lifecycle: Lifecycle,
    pub published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommentField {
    Id,
    UserId,
    PostId,
    Content,
    Lifecycle,
    Published,
    CreatedAt,
    UpdatedAt,
}

#[derive(Debug, Clone)]
pub struct NewComment {
    pub user_id: Option<i64>,
    pub post_id: i64,
    pub content: String,
    pub published: bool,
}

#[derive(Debug, Clone, Default)]
pub struct CommentChanges {
    pub content: Option<String>,
    pub published: Option<bool>,
    pub lifecycle: Option<Lifecycle>,
}

impl Record for Comment {
    type Field = CommentField;
    type Draft = NewComment;
    type Changes = CommentChanges;

    const ID: CommentField = CommentField::Id;

    fn id(&self) -> i64 {
        self.id
    }

    fn value(&self, field: CommentField) -> FieldValue {
        match field {
            CommentField::Id => self.id.into(),
            CommentField::UserId => self.user_id.into(),
            CommentField::PostId => self.post_id.into(),
            CommentField::Content => self.content.as_str().into(),
            CommentField::Lifecycle => self.lifecycle.into(),
            CommentField::Published => self.published.into(),
            CommentField::CreatedAt => self.created_at.into(),
            CommentField::UpdatedAt => self.updated_at.into(),
        }
    }

    fn from_draft(id: i64, draft: NewComment, now: DateTime<Utc>) -> Self {
        Self {
            id,
            user_id: draft.user_id,
            post_id: draft.post_id,
            content: draft.content,
            lifecycle: Lifecycle::Active,
            published: draft.published,
            created_at: now,
            updated_at: now,
        }
    }

    fn apply(&mut self, changes: CommentChanges, now: DateTime<Utc>) {
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

    fn retirement() -> CommentChanges {
        CommentChanges {
            lifecycle: Some(Lifecycle::Deleted),
            ..Default::default()
        }
    }
}

impl Owned for Comment {
    fn owner_id(&self) -> Option<i64> {
        self.user_id
    }
}

impl Stampable for NewComment {
    fn set_owner(&mut self, user_id: i64) {
        self.user_id = Some(user_id);
    }
}
