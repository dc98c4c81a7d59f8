use std::sync::Arc;

use anyhow::{Context, Result};
use kedubak_common::models::user::User;
use kedubak_server::auth::hash_password;
use kedubak_server::config::load_config;
use kedubak_server::state::AppState;
use kedubak_server::web::build_router;
use kedubak_store::{MemoryPostStore, MemoryUserStore, StoreError, UserStore};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    tracing::info!("Starting kedubak server");

    // Load configuration
    let config_path =
        std::env::var("KEDUBAK_CONFIG").unwrap_or_else(|_| "server-config.yaml".to_string());

    tracing::info!("Loading config from: {}", config_path);
    let config = load_config(&config_path)?;

    // The stores are created once here and injected everywhere else.
    let users: Arc<MemoryUserStore> = Arc::new(MemoryUserStore::new());
    let posts = Arc::new(MemoryPostStore::new());

    // Seed initial user if configured
    if let Some(seed) = &config.initial_user {
        let password_hash =
            hash_password(&seed.password).context("Failed to hash initial user password")?;
        let user = User::new(
            seed.email.clone(),
            seed.first_name.clone(),
            seed.last_name.clone(),
            password_hash,
        );
        match users.insert(user).await {
            Ok(created) => tracing::info!("Seeded initial user: {}", created.email),
            Err(StoreError::Duplicate(_)) => {
                tracing::info!("Initial user '{}' already exists, skipping seed", seed.email);
            }
            Err(e) => tracing::warn!("Failed to seed initial user: {}", e),
        }
    }

    // Build application state and router
    let listen = config.listen.clone();
    let state = AppState::new(users, posts, config);
    let app = build_router(state);

    // Start server with graceful shutdown
    let listener = tokio::net::TcpListener::bind(&listen)
        .await
        .with_context(|| format!("Failed to bind to {}", listen))?;

    tracing::info!("Server listening on {}", listen);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, stopping...");
}
