//! Error handling - every failure renders the standard response envelope.

use std::fmt;

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use quill_core::error::RepoError;
use quill_shared::{Envelope, FieldErrors};

/// Kind of resource a lookup was for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Post,
    Comment,
}

impl Resource {
    fn not_found_mesg(self) -> &'static str {
        match self {
            Resource::Post => "post-not-found",
            Resource::Comment => "comment-not-found",
        }
    }
}

/// Application-level error type that converts to envelope responses.
#[derive(Debug)]
pub enum AppError {
    Validation(FieldErrors),
    Unauthenticated,
    /// Missing, soft-deleted, invisible, or owned by someone else.
    NotFound(Resource),
    DuplicateSlug,
    Internal(String),
}

impl AppError {
    /// Validation failure on a single field.
    pub fn field(field: &str, message: impl Into<String>) -> Self {
        let mut errors = FieldErrors::new();
        errors.insert(field.to_string(), vec![message.into()]);
        AppError::Validation(errors)
    }

    fn mesg(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "bad-request",
            AppError::Unauthenticated => "Unauthorised",
            AppError::NotFound(resource) => resource.not_found_mesg(),
            AppError::DuplicateSlug => "duplicate-slug",
            AppError::Internal(_) => "internal-error",
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Validation(errors) => {
                write!(f, "Validation failed: {:?}", errors.keys().collect::<Vec<_>>())
            }
            AppError::Unauthenticated => write!(f, "Unauthenticated"),
            AppError::NotFound(resource) => write!(f, "Not found: {:?}", resource),
            AppError::DuplicateSlug => write!(f, "Duplicate slug"),
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::DuplicateSlug => StatusCode::BAD_REQUEST,
            AppError::Unauthenticated => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let mut envelope = Envelope::new(status.as_u16()).with_mesg(self.mesg());
        if let AppError::Validation(errors) = self {
            envelope = envelope.with_errors(errors.clone());
        }

        HttpResponse::build(status).json(envelope)
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match &err {
            RepoError::Connection(msg) => tracing::error!("Database connection error: {}", msg),
            RepoError::Query(msg) => tracing::error!("Database query error: {}", msg),
            RepoError::Constraint(msg) => tracing::error!("Database constraint error: {}", msg),
        }
        AppError::Internal(err.to_string())
    }
}

/// Result type alias for handlers.
pub type AppResult<T> = Result<T, AppError>;
