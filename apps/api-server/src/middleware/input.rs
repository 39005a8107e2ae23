//! Request input extractor.
//!
//! Handlers read their parameters from one merged view of the query string
//! and a JSON object body. Body keys win over query keys.

use std::collections::HashMap;

use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use futures::future::LocalBoxFuture;
use serde_json::{Map, Value};

use crate::middleware::error::AppError;

/// Header carrying the API token when it is not sent as a `token` field.
pub const TOKEN_HEADER: &str = "X-Auth-Token";

/// Merged request parameters.
#[derive(Debug, Clone, Default)]
pub struct RequestInput {
    fields: Map<String, Value>,
    header_token: Option<String>,
}

impl RequestInput {
    /// Value of `key`. Null and blank strings count as absent.
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self.fields.get(key) {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) if s.is_empty() => None,
            Some(value) => Some(value),
        }
    }

    /// API token from the `token` field, falling back to the header.
    pub fn token(&self) -> Option<&str> {
        match self.get("token") {
            Some(Value::String(token)) => Some(token.as_str()),
            _ => self.header_token.as_deref().filter(|t| !t.is_empty()),
        }
    }

    #[cfg(test)]
    pub fn from_json(value: Value) -> Self {
        let fields = match value {
            Value::Object(fields) => fields,
            _ => Map::new(),
        };
        Self {
            fields: trim_strings(fields),
            header_token: None,
        }
    }
}

/// Strip surrounding whitespace from top-level string values.
fn trim_strings(fields: Map<String, Value>) -> Map<String, Value> {
    fields
        .into_iter()
        .map(|(key, value)| match value {
            Value::String(s) if s.trim().len() != s.len() => {
                (key, Value::String(s.trim().to_owned()))
            }
            other => (key, other),
        })
        .collect()
}

impl FromRequest for RequestInput {
    type Error = AppError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let query = web::Query::<HashMap<String, String>>::from_query(req.query_string())
            .map(web::Query::into_inner);
        let header_token = req
            .headers()
            .get(TOKEN_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.trim().to_owned());
        let body = web::Bytes::from_request(req, payload);

        Box::pin(async move {
            let mut fields = Map::new();

            let query =
                query.map_err(|_| AppError::field("query", "The query string is malformed."))?;
            for (key, value) in query {
                fields.insert(key, Value::String(value));
            }

            let bytes = body
                .await
                .map_err(|_| AppError::field("body", "The request body could not be read."))?;
            if !bytes.iter().all(u8::is_ascii_whitespace) {
                match serde_json::from_slice::<Value>(&bytes) {
                    Ok(Value::Object(object)) => fields.extend(object),
                    _ => {
                        return Err(AppError::field(
                            "body",
                            "The request body must be a JSON object.",
                        ));
                    }
                }
            }

            Ok(Self {
                fields: trim_strings(fields),
                header_token,
            })
        })
    }
}
