//! HTTP response building module
//!
//! Converts handler results into hyper responses and builds the few responses
//! the host produces on its own (404, 405).

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};

use crate::echo::HttpResult;

/// Convert a handler result into a hyper response
pub fn build_result_response(result: HttpResult, server_name: &str) -> Response<Full<Bytes>> {
    let status = result.status;
    let mut builder = Response::builder()
        .status(status)
        .header("Server", server_name);
    for (name, value) in &result.headers {
        builder = builder.header(name.as_str(), value.as_str());
    }

    builder
        .body(Full::new(Bytes::from(result.body)))
        .unwrap_or_else(|e| {
            log_build_error(&status.to_string(), &e);
            fallback_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
        })
}

/// Build 404 Not Found response
pub fn build_404_response(server_name: &str) -> Response<Full<Bytes>> {
    Response::builder()
        .status(404)
        .header("Content-Type", "text/plain")
        .header("Server", server_name)
        .body(Full::new(Bytes::from("404 Not Found")))
        .unwrap_or_else(|e| {
            log_build_error("404", &e);
            fallback_response(StatusCode::NOT_FOUND, "404 Not Found")
        })
}

/// Build 405 Method Not Allowed response; only GET is served
pub fn build_405_response(server_name: &str) -> Response<Full<Bytes>> {
    Response::builder()
        .status(405)
        .header("Content-Type", "text/plain")
        .header("Allow", "GET")
        .header("Server", server_name)
        .body(Full::new(Bytes::from("405 Method Not Allowed")))
        .unwrap_or_else(|e| {
            log_build_error("405", &e);
            fallback_response(StatusCode::METHOD_NOT_ALLOWED, "405 Method Not Allowed")
        })
}

fn fallback_response(status: StatusCode, body: &'static str) -> Response<Full<Bytes>> {
    let mut response = Response::new(Full::new(Bytes::from(body)));
    *response.status_mut() = status;
    response
}

/// Log response build error
fn log_build_error(status: &str, error: &hyper::http::Error) {
    crate::logger::log_error(&format!("Failed to build {status} response: {error}"));
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn body_text(response: Response<Full<Bytes>>) -> String {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_result_response_copies_status_headers_body() {
        let result = HttpResult::internal_error("boom");
        let response = build_result_response(result, "echo-trigger/test");

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(response.headers()["content-type"], "application/json");
        assert_eq!(response.headers()["server"], "echo-trigger/test");
        assert_eq!(
            body_text(response).await,
            r#"{"error":"Internal server error","details":"boom"}"#
        );
    }

    #[tokio::test]
    async fn test_invalid_header_falls_back_to_500() {
        let result = HttpResult {
            status: 200,
            headers: vec![("X-Bad".to_string(), "line\nbreak".to_string())],
            body: "{}".to_string(),
        };
        let response = build_result_response(result, "s");
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_text(response).await, "Internal server error");
    }

    #[test]
    fn test_405_allows_get_only() {
        let response = build_405_response("s");
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(response.headers()["allow"], "GET");
    }

    #[test]
    fn test_404() {
        let response = build_404_response("s");
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(response.headers()["server"], "s");
    }
}
