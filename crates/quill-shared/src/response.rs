//! Standardized response envelope.
//!
//! Every response, success or failure, is a JSON object carrying the HTTP
//! status in a `status` field, an optional `mesg` code, an optional
//! field-level `errors` map, and at most one resource payload key.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::dto::{CommentView, PostView};

/// Field name -> human-readable messages.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

/// Resource payload, serialized under its own key (`post`, `posts`, ...).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Payload {
    Post(PostView),
    Posts(Vec<PostView>),
    Comment(CommentView),
    Comments(Vec<CommentView>),
    Updated(bool),
}

#[derive(Debug, Clone, Serialize)]
pub struct Envelope {
    pub status: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mesg: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<FieldErrors>,
    #[serde(flatten)]
    pub payload: Option<Payload>,
}

impl Envelope {
    pub fn new(status: u16) -> Self {
        Self {
            status,
            mesg: None,
            errors: None,
            payload: None,
        }
    }

    pub fn with_mesg(mut self, mesg: impl Into<String>) -> Self {
        self.mesg = Some(mesg.into());
        self
    }

    pub fn with_errors(mut self, errors: FieldErrors) -> Self {
        self.errors = Some(errors);
        self
    }

    pub fn with_payload(mut self, payload: Payload) -> Self {
        self.payload = Some(payload);
        self
    }
}
