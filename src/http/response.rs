//! HTTP response building module
//!
//! Builders for the fixed-status responses and the conversion from an
//! assembled LDP response into a hyper response.

use super::body::{self, FileBody, ResponseBody};
use crate::ldp::{LdpBody, LdpResponse};
use hyper::Response;

pub const ALLOW_METHODS: &str = "OPTIONS, GET, HEAD";

/// Build 404 Not Found response
pub fn build_404_response() -> Response<ResponseBody> {
    Response::builder()
        .status(404)
        .header("Content-Type", "text/plain")
        .header("Content-Length", 9)
        .body(body::full("Not Found"))
        .unwrap_or_else(|e| {
            log_build_error("404", &e);
            Response::new(body::full("Not Found"))
        })
}

/// Build 405 Method Not Allowed response
pub fn build_405_response() -> Response<ResponseBody> {
    Response::builder()
        .status(405)
        .header("Content-Type", "text/plain")
        .header("Allow", ALLOW_METHODS)
        .body(body::full("Method Not Allowed"))
        .unwrap_or_else(|e| {
            log_build_error("405", &e);
            Response::new(body::full("Method Not Allowed"))
        })
}

/// Build 500 Internal Server Error response
pub fn build_500_response() -> Response<ResponseBody> {
    Response::builder()
        .status(500)
        .header("Content-Type", "text/plain")
        .body(body::full("Internal Server Error"))
        .unwrap_or_else(|e| {
            log_build_error("500", &e);
            Response::new(body::full("Internal Server Error"))
        })
}

/// Build OPTIONS response
pub fn build_options_response(enable_cors: bool) -> Response<ResponseBody> {
    let mut builder = Response::builder().status(200).header("Allow", ALLOW_METHODS);

    if enable_cors {
        builder = builder
            .header("Access-Control-Allow-Origin", "*")
            .header("Access-Control-Allow-Methods", ALLOW_METHODS)
            .header("Access-Control-Allow-Headers", "Accept")
            .header("Access-Control-Max-Age", "86400");
    }

    builder.body(body::empty()).unwrap_or_else(|e| {
        log_build_error("OPTIONS", &e);
        Response::new(body::empty())
    })
}

/// Turn an assembled LDP response into a hyper response.
///
/// The header map is moved over as-is so multi-valued headers such as
/// `Link` keep their order.
pub fn from_ldp(ldp: LdpResponse, enable_cors: bool) -> Response<ResponseBody> {
    let body = match ldp.body {
        LdpBody::Empty => body::empty(),
        LdpBody::Bytes(bytes) => body::full(bytes),
        LdpBody::File { file, len } => FileBody::new(file, len).boxed(),
    };

    let mut builder = Response::builder().status(ldp.status);
    if let Some(headers) = builder.headers_mut() {
        *headers = ldp.headers;
        if enable_cors {
            headers.insert(
                "Access-Control-Allow-Origin",
                hyper::header::HeaderValue::from_static("*"),
            );
            headers.insert(
                "Access-Control-Expose-Headers",
                hyper::header::HeaderValue::from_static("Link, Vary"),
            );
        }
    }

    builder.body(body).unwrap_or_else(|e| {
        log_build_error("LDP", &e);
        build_500_response()
    })
}

/// Log response build error
fn log_build_error(status: &str, error: &hyper::http::Error) {
    crate::logger::log_error(&format!("Failed to build {status} response: {error}"));
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    #[tokio::test]
    async fn test_404_body() {
        let resp = build_404_response();
        assert_eq!(resp.status(), 404);
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(bytes.as_ref(), b"Not Found");
    }

    #[tokio::test]
    async fn test_options_response() {
        let resp = build_options_response(false);
        assert_eq!(resp.status(), 200);
        assert_eq!(resp.headers()["Allow"], "OPTIONS, GET, HEAD");
        assert!(resp.headers().get("Access-Control-Allow-Origin").is_none());
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        assert!(bytes.is_empty());

        let cors = build_options_response(true);
        assert_eq!(cors.headers()["Access-Control-Allow-Origin"], "*");
    }

    #[test]
    fn test_405_allow_header() {
        let resp = build_405_response();
        assert_eq!(resp.status(), 405);
        assert_eq!(resp.headers()["Allow"], ALLOW_METHODS);
    }
}
