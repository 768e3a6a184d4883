//! Axum extractor that runs the access guard in front of protected handlers.

use crate::auth::ownership::Identity;
use crate::auth::session::SessionIssuer;
use crate::auth::verify::AccessGuard;
use crate::config::Config;
use crate::error::AppError;
use axum::{extract::FromRequestParts, http::request::Parts};
use std::sync::Arc;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub redis: redis::Client,
    pub config: Arc<Config>,
    pub issuer: Arc<SessionIssuer>,
    pub guard: Arc<AccessGuard>,
}

impl AppState {
    /// Build state from config, deriving signing and verification keys
    /// from the configured secret.
    pub fn new(redis: redis::Client, config: Config) -> Self {
        let secret = config.access_token_secret.as_bytes();
        let issuer = SessionIssuer::new(secret, config.session_ttl_secs);
        let guard = AccessGuard::new(secret);
        Self {
            redis,
            config: Arc::new(config),
            issuer: Arc::new(issuer),
            guard: Arc::new(guard),
        }
    }

    /// Open a multiplexed connection to the document store.
    ///
    /// Each call opens its own connection, so a handler may hold a WATCH on
    /// it without affecting other requests.
    pub async fn store(&self) -> Result<redis::aio::MultiplexedConnection, AppError> {
        self.redis
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| AppError::Internal(format!("Redis connection error: {}", e)))
    }
}

/// Authenticated session extractor.
///
/// Reads the session cookie and verifies it. Returns 401 Unauthorized if the
/// cookie is missing, forged, or expired; the handler never runs in that case.
/// On success the identity is also stored in the request extensions.
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub identity: Identity,
}

impl FromRequestParts<AppState> for AuthSession {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(identity) = parts.extensions.get::<Identity>() {
            return Ok(AuthSession {
                identity: identity.clone(),
            });
        }

        match state.guard.authenticate(&parts.headers) {
            Ok(identity) => {
                parts.extensions.insert(identity.clone());
                Ok(AuthSession { identity })
            }
            Err(err) => {
                tracing::warn!(
                    action = "auth_rejected",
                    reason = %err,
                    method = %parts.method,
                    path = %parts.uri.path(),
                    "Session credential rejected"
                );
                Err(err.into())
            }
        }
    }
}
