//! Session cookie construction and parsing.
//!
//! The credential rides in a cookie named [`SESSION_COOKIE`] with
//! `HttpOnly; Secure; SameSite=None` so the browser attaches it to
//! cross-site API calls but scripts cannot read it.

use axum::http::{header::COOKIE, HeaderMap, HeaderValue};

/// Name of the cookie carrying the session credential.
pub const SESSION_COOKIE: &str = "token";

const COOKIE_ATTRIBUTES: &str = "Path=/; HttpOnly; Secure; SameSite=None";

/// Build the `Set-Cookie` value that stores a freshly issued credential.
///
/// No `Max-Age` is set; the credential's own `exp` bounds its lifetime.
pub fn session_cookie(token: &str) -> Result<HeaderValue, axum::http::header::InvalidHeaderValue> {
    HeaderValue::from_str(&format!(
        "{}={}; {}",
        SESSION_COOKIE, token, COOKIE_ATTRIBUTES
    ))
}

/// Build the `Set-Cookie` value that tells the client to drop the credential.
pub fn clear_session_cookie() -> HeaderValue {
    HeaderValue::from_static(
        "token=; Path=/; Max-Age=0; Expires=Thu, 01 Jan 1970 00:00:00 GMT; HttpOnly; Secure; SameSite=None",
    )
}

/// Find a cookie by name across all `Cookie` headers.
///
/// An empty value counts as absent, which is what a client holding a
/// just-cleared cookie sends.
pub fn read_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| key.trim() == name)
        .map(|(_, value)| value.trim().trim_matches('"').to_string())
        .filter(|value| !value.is_empty())
}
