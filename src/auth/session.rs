//! Session credential issuance.

use chrono::Utc;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};

/// Claims embedded in every session credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Identity asserted at login
    pub email: String,
    /// Issued-at, seconds since the epoch
    pub iat: i64,
    /// Expiry, seconds since the epoch
    pub exp: i64,
}

/// Signs HS256 session credentials with the server secret.
pub struct SessionIssuer {
    key: EncodingKey,
    ttl_secs: i64,
}

impl SessionIssuer {
    pub fn new(secret: &[u8], ttl_secs: u64) -> Self {
        Self {
            key: EncodingKey::from_secret(secret),
            ttl_secs: i64::try_from(ttl_secs).unwrap_or(i64::MAX),
        }
    }

    pub fn ttl_secs(&self) -> i64 {
        self.ttl_secs
    }

    /// Issue a credential for `identity`, valid for the configured TTL from now.
    ///
    /// The identity is taken as given; whoever calls this has already
    /// decided to trust it.
    pub fn issue(&self, identity: &str) -> Result<String, jsonwebtoken::errors::Error> {
        self.issue_at(identity, Utc::now().timestamp())
    }

    /// Issue a credential as if the current time were `now`.
    pub fn issue_at(
        &self,
        identity: &str,
        now: i64,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let claims = Claims {
            email: identity.to_string(),
            iat: now,
            exp: now.saturating_add(self.ttl_secs),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::{engine::general_purpose, Engine as _};

    fn decode_payload(token: &str) -> serde_json::Value {
        let payload = token.split('.').nth(1).unwrap();
        let bytes = general_purpose::URL_SAFE_NO_PAD.decode(payload).unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_issue_embeds_identity_and_window() {
        let issuer = SessionIssuer::new(b"secret", 3600);
        let token = issuer.issue_at("a@x.com", 1_700_000_000).unwrap();

        let payload = decode_payload(&token);
        assert_eq!(payload["email"], "a@x.com");
        assert_eq!(payload["iat"], 1_700_000_000i64);
        assert_eq!(payload["exp"], 1_700_003_600i64);
    }

    #[test]
    fn test_issue_is_a_three_part_jwt() {
        let issuer = SessionIssuer::new(b"secret", 60);
        let token = issuer.issue("seller@x.com").unwrap();
        assert_eq!(token.split('.').count(), 3);
    }

    #[test]
    fn test_issue_accepts_any_identity() {
        let issuer = SessionIssuer::new(b"secret", 60);
        for identity in ["", "not-an-email", "ünïcødé@x.com"] {
            let token = issuer.issue(identity).unwrap();
            assert_eq!(decode_payload(&token)["email"], identity);
        }
    }

    #[test]
    fn test_ttl_is_clamped() {
        let issuer = SessionIssuer::new(b"secret", u64::MAX);
        assert_eq!(issuer.ttl_secs(), i64::MAX);
        // Saturates rather than overflowing
        let token = issuer.issue_at("a@x.com", 10).unwrap();
        assert_eq!(decode_payload(&token)["exp"], i64::MAX);
    }
}
