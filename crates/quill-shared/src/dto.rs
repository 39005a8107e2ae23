//! Data Transfer Objects - resource representations returned by the API.

use serde::{Deserialize, Serialize};

/// Public representation of a post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostView {
    pub id: i64,
    pub user_id: Option<i64>,
    pub title: String,
    pub slug: String,
    pub content: String,
    pub is_active: bool,
    pub is_published: bool,
    pub created_at: String,
    pub updated_at: String,
    /// Most recent visible comments, newest first.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comments: Option<Vec<CommentView>>,
    #[serde(
        rename = "totalCommentCount",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub total_comment_count: Option<u64>,
}

impl PostView {
    pub fn with_comments(mut self, comments: Vec<CommentView>, total: u64) -> Self {
        self.comments = Some(comments);
        self.total_comment_count = Some(total);
        self
    }
}

/// Public representation of a comment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentView {
    pub id: i64,
    pub user_id: Option<i64>,
    pub post_id: i64,
    pub content: String,
    pub is_active: bool,
    pub is_published: bool,
    pub created_at: String,
    pub updated_at: String,
}
