use axum::http::HeaderValue;
use std::env;
use std::net::SocketAddr;
use zeroize::Zeroizing;

pub const DEFAULT_ALLOWED_ORIGINS: &str = "http://localhost:5173,https://shelfbud-air.web.app";

#[derive(Clone)]
pub struct Config {
    // Session signing
    pub access_token_secret: Zeroizing<String>,
    pub session_ttl_secs: u64,

    // Document store
    pub redis_url: String,

    // Server
    pub bind_addr: SocketAddr,
    pub allowed_origins: Vec<String>,

    // Limits
    pub max_body_bytes: usize,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("access_token_secret", &"[REDACTED]")
            .field("session_ttl_secs", &self.session_ttl_secs)
            .field("redis_url", &"[REDACTED]")
            .field("bind_addr", &self.bind_addr)
            .field("allowed_origins", &self.allowed_origins)
            .field("max_body_bytes", &self.max_body_bytes)
            .finish()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(String),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),

    #[error("Failed to parse {0}: {1}")]
    ParseError(String, String),
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        // A missing .env is fine; production sets real env vars
        let _ = dotenvy::dotenv();

        let access_token_secret = env::var("ACCESS_TOKEN_SECRET")
            .map(Zeroizing::new)
            .map_err(|_| ConfigError::MissingVar("ACCESS_TOKEN_SECRET".to_string()))?;

        if access_token_secret.is_empty() {
            return Err(ConfigError::InvalidValue(
                "ACCESS_TOKEN_SECRET".to_string(),
                "cannot be empty".to_string(),
            ));
        }

        let session_ttl_secs = parse_env_or_default("SESSION_TTL_SECS", 3_600u64)?;
        if session_ttl_secs == 0 {
            return Err(ConfigError::InvalidValue(
                "SESSION_TTL_SECS".to_string(),
                "must be greater than zero".to_string(),
            ));
        }

        let redis_url =
            env::var("REDIS_URL").map_err(|_| ConfigError::MissingVar("REDIS_URL".to_string()))?;

        // BIND_ADDR wins; otherwise fall back to PORT on all interfaces
        let bind_addr_str = match (env::var("BIND_ADDR"), env::var("PORT")) {
            (Ok(addr), _) => addr,
            (Err(_), Ok(port)) => format!("0.0.0.0:{}", port),
            (Err(_), Err(_)) => "0.0.0.0:5000".to_string(),
        };
        let bind_addr = bind_addr_str
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::ParseError("BIND_ADDR".to_string(), e.to_string()))?;

        let allowed_origins_str = env::var("ALLOWED_ORIGINS")
            .unwrap_or_else(|_| DEFAULT_ALLOWED_ORIGINS.to_string());
        let allowed_origins: Vec<String> = allowed_origins_str
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        if let Some(bad) = allowed_origins
            .iter()
            .find(|o| HeaderValue::from_str(o).is_err())
        {
            return Err(ConfigError::InvalidValue(
                "ALLOWED_ORIGINS".to_string(),
                format!("not a valid origin: {}", bad),
            ));
        }

        let max_body_bytes = parse_env_or_default("MAX_BODY_BYTES", 1_048_576)?;

        Ok(Config {
            access_token_secret,
            session_ttl_secs,
            redis_url,
            bind_addr,
            allowed_origins,
            max_body_bytes,
        })
    }
}

/// Helper function to parse environment variable with a default value
fn parse_env_or_default<T>(key: &str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(val) => val
            .parse::<T>()
            .map_err(|e| ConfigError::ParseError(key.to_string(), format!("{}: {}", e, val))),
        Err(_) => Ok(default),
    }
}
