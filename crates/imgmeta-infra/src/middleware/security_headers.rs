use axum::extract::State;
use axum::http::{header, HeaderValue};
use axum::{extract::Request, middleware::Next, response::Response};

/// Content-Security-Policy for JSON API responses
const API_CSP: &str = "default-src 'none'; frame-ancestors 'none'";

#[derive(Clone, Copy, Debug, Default)]
pub struct SecurityHeadersConfig {
    /// Send Strict-Transport-Security (production deployments behind HTTPS)
    pub hsts: bool,
}

impl SecurityHeadersConfig {
    pub fn for_environment(is_production: bool) -> Self {
        Self { hsts: is_production }
    }
}

/// Adds security headers to all HTTP responses.
///
/// HTML responses (the API docs page) keep their own script sources, so the
/// restrictive CSP is only applied to everything else.
pub async fn security_headers_middleware(
    State(config): State<SecurityHeadersConfig>,
    request: Request,
    next: Next,
) -> Response {
    let mut response = next.run(request).await;

    let is_html = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with("text/html"));

    let headers = response.headers_mut();

    headers.insert(
        header::X_CONTENT_TYPE_OPTIONS,
        HeaderValue::from_static("nosniff"),
    );
    headers.insert(header::X_FRAME_OPTIONS, HeaderValue::from_static("DENY"));
    headers.insert(
        header::REFERRER_POLICY,
        HeaderValue::from_static("no-referrer"),
    );

    if config.hsts {
        headers.insert(
            header::STRICT_TRANSPORT_SECURITY,
            HeaderValue::from_static("max-age=31536000; includeSubDomains"),
        );
    }

    if !is_html {
        headers.insert(
            header::CONTENT_SECURITY_POLICY,
            HeaderValue::from_static(API_CSP),
        );
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{middleware, response::Html, routing::get, Json, Router};
    use axum_test::TestServer;

    fn app(config: SecurityHeadersConfig) -> Router {
        Router::new()
            .route("/", get(|| async { Json("ok") }))
            .route("/docs", get(|| async { Html("<html></html>") }))
            .layer(middleware::from_fn_with_state(
                config,
                security_headers_middleware,
            ))
    }

    #[tokio::test]
    async fn test_sets_headers_on_json_responses() {
        let server = TestServer::new(app(SecurityHeadersConfig::default())).unwrap();
        let response = server.get("/").await;

        assert_eq!(response.header("x-content-type-options"), "nosniff");
        assert_eq!(response.header("x-frame-options"), "DENY");
        assert_eq!(response.header("content-security-policy"), API_CSP);
        assert!(response.headers().get("strict-transport-security").is_none());
    }

    #[tokio::test]
    async fn test_hsts_only_when_enabled() {
        let server = TestServer::new(app(SecurityHeadersConfig::for_environment(true))).unwrap();
        let response = server.get("/").await;

        assert!(response.headers().get("strict-transport-security").is_some());
    }

    #[tokio::test]
    async fn test_html_keeps_its_own_csp() {
        let server = TestServer::new(app(SecurityHeadersConfig::default())).unwrap();
        let response = server.get("/docs").await;

        assert_eq!(response.header("x-frame-options"), "DENY");
        assert!(response.headers().get("content-security-policy").is_none());
    }
}
