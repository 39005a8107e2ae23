//! Observability module - request IDs.

mod request_id;

pub use request_id::{REQUEST_ID_HEADER, echo_request_id};
