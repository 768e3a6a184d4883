//! ShelfBud application entry point.
//!
//! Bootstraps the server:
//! 1. Load configuration from environment
//! 2. Connect to Redis and confirm it answers
//! 3. Build the router with CORS and security headers
//! 4. Serve until Ctrl-C / SIGTERM, then drain and drop the store client
//!
//! Also supports a `secret` subcommand that prints a fresh signing secret.

use shelfbud::{auth::AppState, config::Config, routes, storage};

/// Generate a random 64-byte secret, base64url-encoded, for ACCESS_TOKEN_SECRET.
fn generate_secret() -> String {
    let mut bytes = [0u8; 64];
    rand::fill(&mut bytes);
    let encoded = base64::Engine::encode(&base64::engine::general_purpose::URL_SAFE_NO_PAD, bytes);
    bytes.fill(0);
    encoded
}

fn print_secret_usage() {
    eprintln!("Usage: shelfbud secret");
    eprintln!();
    eprintln!("Print a random value suitable for ACCESS_TOKEN_SECRET.");
    eprintln!();
    eprintln!("Then set in .env:");
    eprintln!("  ACCESS_TOKEN_SECRET=<output>");
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, draining connections");
}

#[tokio::main]
async fn main() {
    let args: Vec<String> = std::env::args().collect();
    if args.len() >= 2 && args[1] == "secret" {
        if args.len() != 2 {
            print_secret_usage();
            std::process::exit(1);
        }
        println!("{}", generate_secret());
        return;
    }

    // Initialize tracing with env filter support (RUST_LOG)
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = Config::from_env().expect("Failed to load config");
    if config.access_token_secret.len() < 32 {
        tracing::warn!("ACCESS_TOKEN_SECRET is shorter than 32 bytes; run `shelfbud secret` for a stronger one");
    }
    tracing::info!("Starting shelfbud on {}", config.bind_addr);

    let redis_client = redis::Client::open(config.redis_url.as_str()).expect("Invalid Redis URL");

    let mut con = redis_client
        .get_multiplexed_async_connection()
        .await
        .expect("Failed to connect to Redis");
    storage::ping(&mut con).await.expect("Redis did not answer PING");
    drop(con);
    tracing::info!("Connected to document store");

    let bind_addr = config.bind_addr;
    let state = AppState::new(redis_client, config);
    let app = routes::app(state);

    let listener = tokio::net::TcpListener::bind(bind_addr)
        .await
        .expect("Failed to bind");
    tracing::info!("shelfbud server is running on: {}", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    tracing::info!("Server stopped");
}
