//! Response hardening and cross-origin policy.

use axum::{
    extract::Request,
    http::{header, HeaderValue, Method},
    middleware::Next,
    response::Response,
};
use tower_http::cors::{AllowOrigin, CorsLayer};

/// Middleware that adds security headers to every API response.
///
/// - **Cache-Control: no-store**: responses carry per-user data and must not
///   land in shared caches.
/// - **X-Content-Type-Options: nosniff**: JSON stays JSON.
/// - **X-Frame-Options: DENY** and `frame-ancestors 'none'`: nothing here is
///   meant to be framed.
/// - **Referrer-Policy: no-referrer**: query strings name user emails.
/// - **Strict-Transport-Security**: the session cookie is `Secure`, so the
///   API is only usable over HTTPS anyway.
/// - **Content-Security-Policy: default-src 'none'**: the API serves no
///   active content.
///
/// # Usage
///
/// ```rust,no_run
/// use axum::Router;
/// use axum::middleware;
/// use shelfbud::middleware::security_headers;
///
/// let app: Router = Router::new()
///     .layer(middleware::from_fn(security_headers));
/// ```
pub async fn security_headers(request: Request, next: Next) -> Response {
    let mut response = next.run(request).await;
    let headers = response.headers_mut();

    headers.insert("cache-control", HeaderValue::from_static("no-store"));
    headers.insert(
        "x-content-type-options",
        HeaderValue::from_static("nosniff"),
    );
    headers.insert("x-frame-options", HeaderValue::from_static("DENY"));
    headers.insert("referrer-policy", HeaderValue::from_static("no-referrer"));
    headers.insert(
        "strict-transport-security",
        HeaderValue::from_static("max-age=63072000; includeSubDomains"),
    );
    headers.insert(
        "content-security-policy",
        HeaderValue::from_static("default-src 'none'; frame-ancestors 'none'"),
    );

    response
}

/// CORS policy for the web client.
///
/// Only the configured origins may call the API, and they may send
/// credentials so the session cookie travels cross-site. Origins that are not
/// valid header values are skipped; `Config::from_env` already rejects them.
pub fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|o| HeaderValue::from_str(o).ok())
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ])
        .allow_headers([header::CONTENT_TYPE])
}
