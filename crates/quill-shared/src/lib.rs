//! # Quill Shared
//!
//! Wire types shared between the server and API clients: resource views and
//! the `{status, mesg, errors, ...}` response envelope.

pub mod dto;
pub mod response;

pub use dto::{CommentView, PostView};
pub use response::{Envelope, FieldErrors, Payload};
