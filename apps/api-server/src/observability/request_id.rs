//! Request ID propagation.
//!
//! `TracingLogger` assigns every request an id and records it on the root
//! span. This middleware copies that id into the `X-Request-ID` response
//! header so clients can quote it when reporting a problem.

use actix_web::{
    Error, HttpMessage,
    body::MessageBody,
    dev::{ServiceRequest, ServiceResponse},
    http::header::{HeaderName, HeaderValue},
    middleware::Next,
};
use tracing_actix_web::RequestId;

/// Header name for request ID.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Echo the request id assigned by `TracingLogger`.
///
/// Must be registered inside `TracingLogger` (wrapped before it).
pub async fn echo_request_id(
    req: ServiceRequest,
    next: Next<impl MessageBody>,
) -> Result<ServiceResponse<impl MessageBody>, Error> {
    let request_id = req.extensions().get::<RequestId>().map(|id| id.to_string());

    let mut res = next.call(req).await?;

    if let Some(value) = request_id.and_then(|id| HeaderValue::from_str(&id).ok()) {
        res.headers_mut()
            .insert(HeaderName::from_static(REQUEST_ID_HEADER), value);
    }

    Ok(res)
}
