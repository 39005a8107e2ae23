//! Input validation.
//!
//! Every rule failure is collected per field before the request is rejected,
//! so a client sees all problems at once. Messages follow the wording the
//! API has always used (`The title field is required.`).

use quill_core::domain::Slug;
use quill_shared::FieldErrors;
use serde_json::Value;

use crate::middleware::error::{AppError, AppResult};
use crate::middleware::input::RequestInput;

/// Longest accepted title, slug or content.
pub const MAX_TEXT: usize = 255;

/// Rule checker over one request's input.
struct Rules<'a> {
    input: &'a RequestInput,
    errors: FieldErrors,
}

impl<'a> Rules<'a> {
    fn new(input: &'a RequestInput) -> Self {
        Self {
            input,
            errors: FieldErrors::new(),
        }
    }

    fn fail(&mut self, field: &str, message: String) {
        self.errors
            .entry(field.to_string())
            .or_default()
            .push(message);
    }

    fn required_text(&mut self, field: &str) -> Option<String> {
        match self.input.get(field) {
            None => {
                self.fail(field, format!("The {} field is required.", attribute(field)));
                None
            }
            Some(Value::String(text)) if text.chars().count() > MAX_TEXT => {
                self.fail(
                    field,
                    format!(
                        "The {} may not be greater than {} characters.",
                        attribute(field),
                        MAX_TEXT
                    ),
                );
                None
            }
            Some(Value::String(text)) => Some(text.clone()),
            Some(_) => {
                self.fail(field, format!("The {} must be a string.", attribute(field)));
                None
            }
        }
    }

    fn required_slug(&mut self) -> Option<Slug> {
        let raw = self.required_text("slug")?;
        match Slug::parse(&raw) {
            Ok(slug) => Some(slug),
            Err(_) => {
                self.fail(
                    "slug",
                    "The slug must contain at least one letter or digit.".to_string(),
                );
                None
            }
        }
    }

    fn optional_bool(&mut self, field: &str) -> Option<bool> {
        let value = self.input.get(field)?;
        let parsed = match value {
            Value::Bool(b) => Some(*b),
            Value::Number(n) => match n.as_i64() {
                Some(1) => Some(true),
                Some(0) => Some(false),
                _ => None,
            },
            Value::String(s) => match s.as_str() {
                "1" => Some(true),
                "0" => Some(false),
                _ => None,
            },
            _ => None,
        };

        if parsed.is_none() {
            self.fail(
                field,
                format!("The {} field must be true or false.", attribute(field)),
            );
        }
        parsed
    }

    fn required_bool(&mut self, field: &str) -> Option<bool> {
        if self.input.get(field).is_none() {
            self.fail(field, format!("The {} field is required.", attribute(field)));
            return None;
        }
        self.optional_bool(field)
    }

    /// Positive integer, accepted as a JSON number or a decimal string.
    fn optional_id(&mut self, field: &str) -> Option<i64> {
        let value = self.input.get(field)?;
        let parsed = match value {
            Value::Number(n) => n.as_i64(),
            Value::String(s) => s.parse::<i64>().ok(),
            _ => None,
        };

        match parsed {
            None => {
                self.fail(field, format!("The {} must be an integer.", attribute(field)));
                None
            }
            Some(n) if n < 1 => {
                self.fail(field, format!("The {} must be at least 1.", attribute(field)));
                None
            }
            Some(n) => Some(n),
        }
    }

    fn required_id(&mut self, field: &str) -> Option<i64> {
        if self.input.get(field).is_none() {
            self.fail(field, format!("The {} field is required.", attribute(field)));
            return None;
        }
        self.optional_id(field)
    }

    /// `Err` with every collected message, or `value` when all rules passed.
    fn finish<T>(self, value: Option<T>) -> AppResult<T> {
        match value {
            Some(value) if self.errors.is_empty() => Ok(value),
            _ => Err(AppError::Validation(self.errors)),
        }
    }
}

/// Field name as it appears in messages.
fn attribute(field: &str) -> String {
    field.replace('_', " ")
}

/// Validated post body for create and update.
#[derive(Debug, Clone)]
pub struct PostForm {
    pub title: String,
    pub slug: Slug,
    pub content: String,
    pub published: bool,
}

fn post_fields(rules: &mut Rules<'_>) -> Option<PostForm> {
    let title = rules.required_text("title");
    let slug = rules.required_slug();
    let content = rules.required_text("content");
    let published = rules.required_bool("is_published");

    Some(PostForm {
        title: title?,
        slug: slug?,
        content: content?,
        published: published?,
    })
}

pub fn post_create(input: &RequestInput) -> AppResult<PostForm> {
    let mut rules = Rules::new(input);
    let form = post_fields(&mut rules);
    rules.finish(form)
}

/// `is_active` is not accepted on post updates; deletion has its own endpoint.
pub fn post_update(input: &RequestInput) -> AppResult<(i64, PostForm)> {
    let mut rules = Rules::new(input);
    let id = rules.required_id("id");
    let form = post_fields(&mut rules);
    rules.finish(id.zip(form))
}

/// Validated comment body for create.
#[derive(Debug, Clone)]
pub struct NewCommentForm {
    pub post_id: i64,
    pub content: String,
    pub published: bool,
}

pub fn comment_create(input: &RequestInput) -> AppResult<NewCommentForm> {
    let mut rules = Rules::new(input);
    let post_id = rules.required_id("post_id");
    let content = rules.required_text("content");
    let published = rules.required_bool("is_published");

    let form = match (post_id, content, published) {
        (Some(post_id), Some(content), Some(published)) => Some(NewCommentForm {
            post_id,
            content,
            published,
        }),
        _ => None,
    };
    rules.finish(form)
}

/// Validated comment body for update.
#[derive(Debug, Clone)]
pub struct CommentUpdateForm {
    pub id: i64,
    pub content: String,
    pub published: bool,
    /// `Some(false)` retires the comment.
    pub active: Option<bool>,
}

pub fn comment_update(input: &RequestInput) -> AppResult<CommentUpdateForm> {
    let mut rules = Rules::new(input);
    let id = rules.required_id("id");
    let content = rules.required_text("content");
    let published = rules.required_bool("is_published");
    let active = rules.optional_bool("is_active");

    let form = match (id, content, published) {
        (Some(id), Some(content), Some(published)) => Some(CommentUpdateForm {
            id,
            content,
            published,
            active,
        }),
        _ => None,
    };
    rules.finish(form)
}

/// Row addressed by `id`, for single fetch and delete.
pub fn target_id(input: &RequestInput) -> AppResult<i64> {
    let mut rules = Rules::new(input);
    let id = rules.required_id("id");
    rules.finish(id)
}

/// List parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Listing {
    /// 1-based page, `p` in the query.
    pub page: u64,
    /// Restricts comment listings to one post.
    pub post_id: Option<i64>,
}

pub fn listing(input: &RequestInput) -> AppResult<Listing> {
    let mut rules = Rules::new(input);
    let page = rules.optional_id("p");
    let post_id = rules.optional_id("post_id");

    let listing = Listing {
        page: page.and_then(|p| u64::try_from(p).ok()).unwrap_or(1),
        post_id,
    };
    rules.finish(Some(listing))
}
