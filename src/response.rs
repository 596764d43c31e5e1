//! HTTP response builders
//!
//! Builders for every status the server can answer with, decoupled from the
//! routing logic. Builder failures fall back to a bare response rather than
//! panicking on the request path.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use serde_json::json;

use crate::auth::AuthError;

fn log_build_error(status: &str, error: &hyper::http::Error) {
    crate::logger::log_error(&format!("Failed to build {status} response: {error}"));
}

/// JSON body for a successful secret retrieval.
pub fn secret_body(message: &str) -> String {
    json!({
        "message": message,
        "authenticated": true,
    })
    .to_string()
}

/// JSON body for an authentication failure.
pub fn error_body(error: AuthError) -> String {
    json!({ "error": error.message() }).to_string()
}

/// Build 200 OK with a plain text body
pub fn build_text_response(body: &'static str, server_name: &str, is_head: bool) -> Response<Full<Bytes>> {
    let bytes = if is_head {
        Bytes::new()
    } else {
        Bytes::from(body)
    };
    Response::builder()
        .status(200)
        .header("Content-Type", "text/plain; charset=utf-8")
        .header("Server", server_name)
        .body(Full::new(bytes))
        .unwrap_or_else(|e| {
            log_build_error("200", &e);
            Response::new(Full::new(Bytes::from(body)))
        })
}

/// Build 200 OK with the secret JSON payload
pub fn build_secret_response(message: &str, server_name: &str, is_head: bool) -> Response<Full<Bytes>> {
    let body = secret_body(message);
    let bytes = if is_head {
        Bytes::new()
    } else {
        Bytes::from(body)
    };
    Response::builder()
        .status(200)
        .header("Content-Type", "application/json")
        .header("Server", server_name)
        .body(Full::new(bytes))
        .unwrap_or_else(|e| {
            log_build_error("200", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build 401 Unauthorized with a `WWW-Authenticate` challenge
pub fn build_401_response(error: AuthError, realm: &str, server_name: &str) -> Response<Full<Bytes>> {
    let challenge = format!("Basic realm=\"{realm}\"");
    let body = error_body(error);
    Response::builder()
        .status(401)
        .header("Content-Type", "application/json")
        .header("WWW-Authenticate", challenge)
        .header("Server", server_name)
        .body(Full::new(Bytes::from(body)))
        .unwrap_or_else(|e| {
            log_build_error("401", &e);
            let mut resp = Response::new(Full::new(Bytes::new()));
            *resp.status_mut() = hyper::StatusCode::UNAUTHORIZED;
            resp
        })
}

/// Build 404 Not Found response
pub fn build_404_response() -> Response<Full<Bytes>> {
    Response::builder()
        .status(404)
        .header("Content-Type", "text/plain")
        .body(Full::new(Bytes::from("404 Not Found")))
        .unwrap_or_else(|e| {
            log_build_error("404", &e);
            Response::new(Full::new(Bytes::from("404 Not Found")))
        })
}

/// Build 405 Method Not Allowed response
pub fn build_405_response() -> Response<Full<Bytes>> {
    Response::builder()
        .status(405)
        .header("Content-Type", "text/plain")
        .header("Allow", "GET, HEAD")
        .body(Full::new(Bytes::from("405 Method Not Allowed")))
        .unwrap_or_else(|e| {
            log_build_error("405", &e);
            Response::new(Full::new(Bytes::from("405 Method Not Allowed")))
        })
}

/// Build 413 Content Too Large response
pub fn build_413_response() -> Response<Full<Bytes>> {
    Response::builder()
        .status(413)
        .header("Content-Type", "text/plain")
        .body(Full::new(Bytes::from("413 Content Too Large")))
        .unwrap_or_else(|e| {
            log_build_error("413", &e);
            Response::new(Full::new(Bytes::from("413 Content Too Large")))
        })
}
