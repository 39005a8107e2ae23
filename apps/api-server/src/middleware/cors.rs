//! Cross-origin access for browser clients.

use actix_cors::Cors;
use actix_web::http::header::{self, HeaderName};

use crate::observability::REQUEST_ID_HEADER;

/// Any origin may call the API and send the token header.
pub fn cors() -> Cors {
    Cors::default()
        .allow_any_origin()
        .send_wildcard()
        .allowed_methods(["GET", "POST", "PUT", "DELETE", "OPTIONS"])
        .allowed_headers([
            header::CONTENT_TYPE,
            header::ORIGIN,
            header::AUTHORIZATION,
            HeaderName::from_static("x-auth-token"),
        ])
        .expose_headers([HeaderName::from_static(REQUEST_ID_HEADER)])
        .max_age(3600)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::middleware::input::TOKEN_HEADER;
    use actix_web::{App, HttpResponse, http::StatusCode, test, web};

    #[actix_web::test]
    async fn test_preflight_allows_token_header_from_any_origin() {
        let app = test::init_service(
            App::new()
                .wrap(cors())
                .route("/api/post/put", web::put().to(HttpResponse::Ok)),
        )
        .await;

        let req = test::TestRequest::default()
            .method(actix_web::http::Method::OPTIONS)
            .uri("/api/post/put")
            .insert_header((header::ORIGIN, "https://blog.example.org"))
            .insert_header((header::ACCESS_CONTROL_REQUEST_METHOD, "PUT"))
            .insert_header((header::ACCESS_CONTROL_REQUEST_HEADERS, TOKEN_HEADER))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            resp.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            "*"
        );
        let allowed = resp
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_HEADERS)
            .unwrap()
            .to_str()
            .unwrap()
            .to_ascii_lowercase();
        assert!(allowed.contains("x-auth-token"), "{allowed}");
    }
}
