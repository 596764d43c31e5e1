use crate::auth;
use crate::config::AppState;
use crate::logger;
use crate::response;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{HeaderMap, Method, Request, Response};
use std::convert::Infallible;
use std::sync::Arc;

const GREETING: &str = "Hello, world!";

/// Check HTTP method and return early response if not GET/HEAD
fn check_http_method(method: &Method) -> Option<Response<Full<Bytes>>> {
    match *method {
        Method::GET | Method::HEAD => None,
        _ => {
            logger::log_warning(&format!("Method not allowed: {method}"));
            Some(response::build_405_response())
        }
    }
}

/// Validate Content-Length header against max body size
/// Returns Some(413 response) if too large, None otherwise
fn check_body_size(headers: &HeaderMap, max_body_size: u64) -> Option<Response<Full<Bytes>>> {
    let content_length = headers.get("content-length")?;
    content_length.to_str().map_or_else(
        |_| {
            logger::log_warning("Content-Length header contains non-ASCII characters");
            None
        },
        |size_str| match size_str.parse::<u64>() {
            Ok(size) if size > max_body_size => {
                logger::log_error(&format!(
                    "Request body too large: {size} bytes (max: {max_body_size})"
                ));
                Some(response::build_413_response())
            }
            Err(_) => {
                logger::log_warning(&format!(
                    "Invalid Content-Length value: '{size_str}', skipping size check"
                ));
                None
            }
            _ => None,
        },
    )
}

/// Route the request based on path
fn route_request(
    path: &str,
    auth_header: Option<&str>,
    state: &AppState,
    is_head: bool,
) -> Response<Full<Bytes>> {
    match path {
        "/" => handle_greeting(state, is_head),
        "/secret" => handle_secret(auth_header, state, is_head),
        _ => response::build_404_response(),
    }
}

/// Fixed greeting, no auth and no failure modes
fn handle_greeting(state: &AppState, is_head: bool) -> Response<Full<Bytes>> {
    response::build_text_response(GREETING, &state.config.http.server_name, is_head)
}

/// Basic-Auth gated secret retrieval
fn handle_secret(auth_header: Option<&str>, state: &AppState, is_head: bool) -> Response<Full<Bytes>> {
    let auth_config = &state.config.auth;
    match auth::authorize(auth_header, auth_config) {
        Ok(()) => response::build_secret_response(
            &auth_config.secret_message,
            &state.config.http.server_name,
            is_head,
        ),
        Err(err) => {
            logger::log_auth_failure("/secret", err.message());
            response::build_401_response(err, &auth_config.realm, &state.config.http.server_name)
        }
    }
}

pub async fn handle_request(
    req: Request<hyper::body::Incoming>,
    state: Arc<AppState>,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let method = req.method();
    let uri = req.uri();
    let path = uri.path().to_string();
    let is_head = *method == Method::HEAD;

    let access_log = state.config.logging.access_log;
    if access_log {
        logger::log_request(method, uri, req.version());
    }

    // Check HTTP method
    if let Some(resp) = check_http_method(method) {
        return Ok(resp);
    }

    // Check body size
    if let Some(resp) = check_body_size(req.headers(), state.config.http.max_body_size) {
        return Ok(resp);
    }

    logger::log_headers_count(req.headers().len(), state.config.logging.show_headers);

    let auth_header = req
        .headers()
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string);

    let response = route_request(&path, auth_header.as_deref(), &state, is_head);

    if access_log {
        use hyper::body::Body as _;
        let size = response.body().size_hint().exact().unwrap_or(0);
        logger::log_response(response.status().as_u16(), size);
    }

    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::tests::test_config;
    use http_body_util::BodyExt;
    use serde_json::Value;

    async fn body_string(resp: Response<Full<Bytes>>) -> String {
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[test]
    fn test_method_gate() {
        assert!(check_http_method(&Method::GET).is_none());
        assert!(check_http_method(&Method::HEAD).is_none());

        let resp = check_http_method(&Method::POST).unwrap();
        assert_eq!(resp.status(), 405);
        let resp = check_http_method(&Method::DELETE).unwrap();
        assert_eq!(resp.status(), 405);
    }

    #[test]
    fn test_body_size_gate() {
        let mut headers = HeaderMap::new();
        assert!(check_body_size(&headers, 1024).is_none());

        headers.insert("content-length", "512".parse().unwrap());
        assert!(check_body_size(&headers, 1024).is_none());

        headers.insert("content-length", "2048".parse().unwrap());
        let resp = check_body_size(&headers, 1024).unwrap();
        assert_eq!(resp.status(), 413);

        // Unparseable values skip the check rather than reject
        headers.insert("content-length", "banana".parse().unwrap());
        assert!(check_body_size(&headers, 1024).is_none());
    }

    #[tokio::test]
    async fn test_greeting_route() {
        let state = AppState::new(test_config());
        let resp = route_request("/", None, &state, false);
        assert_eq!(resp.status(), 200);
        assert_eq!(body_string(resp).await, "Hello, world!");
    }

    #[tokio::test]
    async fn test_unknown_route_is_404() {
        let state = AppState::new(test_config());
        let resp = route_request("/nope", None, &state, false);
        assert_eq!(resp.status(), 404);
    }

    #[tokio::test]
    async fn test_secret_without_header() {
        let state = AppState::new(test_config());
        let resp = route_request("/secret", None, &state, false);
        assert_eq!(resp.status(), 401);
        assert_eq!(
            resp.headers().get("WWW-Authenticate").unwrap(),
            "Basic realm=\"Secret Area\""
        );

        let body: Value = serde_json::from_str(&body_string(resp).await).unwrap();
        assert_eq!(body["error"], "Authentication required");
    }

    #[tokio::test]
    async fn test_secret_wrong_scheme() {
        let state = AppState::new(test_config());
        let resp = route_request("/secret", Some("Bearer abc"), &state, false);
        assert_eq!(resp.status(), 401);
        let body: Value = serde_json::from_str(&body_string(resp).await).unwrap();
        assert_eq!(body["error"], "Authentication required");
    }

    #[tokio::test]
    async fn test_secret_with_valid_credentials() {
        let state = AppState::new(test_config());
        // base64("admin:hunter2")
        let resp = route_request(
            "/secret",
            Some("Basic YWRtaW46aHVudGVyMg=="),
            &state,
            false,
        );
        assert_eq!(resp.status(), 200);

        let body: Value = serde_json::from_str(&body_string(resp).await).unwrap();
        assert_eq!(body["message"], "42");
        assert_eq!(body["authenticated"], true);
    }

    #[tokio::test]
    async fn test_secret_with_wrong_password() {
        let state = AppState::new(test_config());
        // base64("admin:wrong")
        let resp = route_request("/secret", Some("Basic YWRtaW46d3Jvbmc="), &state, false);
        assert_eq!(resp.status(), 401);
        assert_eq!(
            resp.headers().get("WWW-Authenticate").unwrap(),
            "Basic realm=\"Secret Area\""
        );

        let body: Value = serde_json::from_str(&body_string(resp).await).unwrap();
        assert_eq!(body["error"], "Invalid credentials");
    }

    #[tokio::test]
    async fn test_secret_with_malformed_base64() {
        let state = AppState::new(test_config());
        let resp = route_request("/secret", Some("Basic not-base64!"), &state, false);
        assert_eq!(resp.status(), 401);
        let body: Value = serde_json::from_str(&body_string(resp).await).unwrap();
        assert_eq!(body["error"], "Invalid credentials");
    }

    #[tokio::test]
    async fn test_head_on_greeting_has_empty_body() {
        let state = AppState::new(test_config());
        let resp = route_request("/", None, &state, true);
        assert_eq!(resp.status(), 200);
        assert_eq!(body_string(resp).await, "");
    }
}
