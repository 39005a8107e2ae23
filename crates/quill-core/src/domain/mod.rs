//! Domain entities - the core business objects.

mod comment;
mod lifecycle;
mod post;
mod slug;
mod user;

pub use comment::{Comment, CommentChanges, CommentField, NewComment};
pub use lifecycle::Lifecycle;
pub use post::{NewPost, Post, PostChanges, PostField};
pub use slug::Slug;
pub use user::{NewUser, User};
