//! Session credential verification.

use crate::auth::cookie::{read_cookie, SESSION_COOKIE};
use crate::auth::ownership::Identity;
use crate::auth::session::Claims;
use crate::error::AuthError;
use axum::http::HeaderMap;
use chrono::Utc;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};

/// Validates session credentials and yields the identity they carry.
///
/// Holds only the decoding key; verification is pure and never touches
/// the store.
pub struct AccessGuard {
    key: DecodingKey,
    validation: Validation,
}

impl AccessGuard {
    pub fn new(secret: &[u8]) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is checked by hand so that `now == exp` counts as expired
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);

        Self {
            key: DecodingKey::from_secret(secret),
            validation,
        }
    }

    /// Verify a raw credential against the current time.
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        self.verify_at(token, Utc::now().timestamp())
    }

    /// Verify a raw credential as if the current time were `now`.
    ///
    /// # Returns
    /// * `Err(InvalidCredential)` if the signature or payload is bad
    /// * `Err(ExpiredCredential)` if the signature is good but `now >= exp`
    pub fn verify_at(&self, token: &str, now: i64) -> Result<Claims, AuthError> {
        let claims = decode::<Claims>(token, &self.key, &self.validation)
            .map_err(|e| {
                tracing::debug!(error = %e, "Credential failed verification");
                AuthError::InvalidCredential
            })?
            .claims;

        if now >= claims.exp {
            return Err(AuthError::ExpiredCredential);
        }

        Ok(claims)
    }

    /// Authenticate a request from its headers.
    ///
    /// Reads the session cookie, verifies it, and returns the embedded identity.
    pub fn authenticate(&self, headers: &HeaderMap) -> Result<Identity, AuthError> {
        let token = read_cookie(headers, SESSION_COOKIE).ok_or(AuthError::MissingCredential)?;
        let claims = self.verify(&token)?;
        Ok(Identity::new(claims.email))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::session::SessionIssuer;
    use axum::http::{header::COOKIE, HeaderValue};

    const SECRET: &[u8] = b"unit-test-secret";
    const NOW: i64 = 1_700_000_000;

    fn cookie_headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_round_trip() {
        let issuer = SessionIssuer::new(SECRET, 3600);
        let guard = AccessGuard::new(SECRET);

        for identity in ["a@x.com", "seller@x.com", "", "odd value; with=stuff"] {
            let token = issuer.issue_at(identity, NOW).unwrap();
            let claims = guard.verify_at(&token, NOW).unwrap();
            assert_eq!(claims.email, identity);
            assert_eq!(claims.iat, NOW);
            assert_eq!(claims.exp, NOW + 3600);
        }
    }

    #[test]
    fn test_expiry_boundary() {
        let issuer = SessionIssuer::new(SECRET, 3600);
        let guard = AccessGuard::new(SECRET);
        let token = issuer.issue_at("a@x.com", NOW).unwrap();

        assert!(guard.verify_at(&token, NOW + 3599).is_ok());
        assert_eq!(
            guard.verify_at(&token, NOW + 3600),
            Err(AuthError::ExpiredCredential)
        );
        assert_eq!(
            guard.verify_at(&token, NOW + 86_400),
            Err(AuthError::ExpiredCredential)
        );
    }

    #[test]
    fn test_expired_against_wall_clock() {
        let issuer = SessionIssuer::new(SECRET, 3600);
        let guard = AccessGuard::new(SECRET);
        let token = issuer
            .issue_at("a@x.com", Utc::now().timestamp() - 7200)
            .unwrap();
        assert_eq!(guard.verify(&token), Err(AuthError::ExpiredCredential));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let issuer = SessionIssuer::new(b"some-other-secret", 3600);
        let guard = AccessGuard::new(SECRET);
        let token = issuer.issue_at("a@x.com", NOW).unwrap();
        assert_eq!(
            guard.verify_at(&token, NOW),
            Err(AuthError::InvalidCredential)
        );
    }

    #[test]
    fn test_tampered_payload_rejected() {
        let issuer = SessionIssuer::new(SECRET, 3600);
        let guard = AccessGuard::new(SECRET);
        let token = issuer.issue_at("a@x.com", NOW).unwrap();
        let other = issuer.issue_at("b@x.com", NOW).unwrap();

        // Splice b's payload onto a's signature
        let parts: Vec<&str> = token.split('.').collect();
        let other_parts: Vec<&str> = other.split('.').collect();
        let forged = format!("{}.{}.{}", parts[0], other_parts[1], parts[2]);

        assert_eq!(
            guard.verify_at(&forged, NOW),
            Err(AuthError::InvalidCredential)
        );
    }

    #[test]
    fn test_garbage_rejected() {
        let guard = AccessGuard::new(SECRET);
        for token in ["", "not-a-jwt", "a.b.c"] {
            assert_eq!(
                guard.verify_at(token, NOW),
                Err(AuthError::InvalidCredential)
            );
        }
    }

    #[test]
    fn test_authenticate_missing_cookie() {
        let guard = AccessGuard::new(SECRET);
        assert_eq!(
            guard.authenticate(&HeaderMap::new()),
            Err(AuthError::MissingCredential)
        );
        assert_eq!(
            guard.authenticate(&cookie_headers("theme=dark")),
            Err(AuthError::MissingCredential)
        );
    }

    #[test]
    fn test_authenticate_cleared_cookie_same_as_missing() {
        let guard = AccessGuard::new(SECRET);
        assert_eq!(
            guard.authenticate(&cookie_headers("token=")),
            Err(AuthError::MissingCredential)
        );
    }

    #[test]
    fn test_authenticate_valid_cookie() {
        let issuer = SessionIssuer::new(SECRET, 3600);
        let guard = AccessGuard::new(SECRET);
        let token = issuer.issue("a@x.com").unwrap();

        let headers = cookie_headers(&format!("theme=dark; token={}", token));
        let identity = guard.authenticate(&headers).unwrap();
        assert_eq!(identity.as_str(), "a@x.com");

        // Same credential, same answer
        assert_eq!(guard.authenticate(&headers).unwrap(), identity);
    }
}
