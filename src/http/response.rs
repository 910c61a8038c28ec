use bytes::Bytes;
use hyper::{header, StatusCode};

use super::{Body, Response};


pub(crate) fn json(status: StatusCode, body: Vec<u8>) -> Response {
    Response::builder()
        .status(status)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::new(Bytes::from(body)))
        .unwrap()
}

pub(crate) fn html(body: String) -> Response {
    Response::builder()
        .header(header::CONTENT_TYPE, "text/html; charset=UTF-8")
        .body(Body::new(Bytes::from(body)))
        .unwrap()
}

/// A `400` whose body looks like a GraphQL response, so that clients can
/// treat it like every other API error.
pub(crate) fn bad_request(msg: &str) -> Response {
    let body = serde_json::json!({ "errors": [{ "message": msg }] });
    json(StatusCode::BAD_REQUEST, body.to_string().into_bytes())
}

pub(crate) fn not_found() -> Response {
    plain(StatusCode::NOT_FOUND, "404 Not found")
}

pub(crate) fn method_not_allowed() -> Response {
    plain(StatusCode::METHOD_NOT_ALLOWED, "405 Method not allowed")
}

pub(crate) fn internal_server_error() -> Response {
    plain(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
}

fn plain(status: StatusCode, msg: &'static str) -> Response {
    Response::builder()
        .status(status)
        .header(header::CONTENT_TYPE, "text/plain; charset=UTF-8")
        .body(Body::new(Bytes::from_static(msg.as_bytes())))
        .unwrap()
}
