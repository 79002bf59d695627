//! Serve command - Starts the HTTP server.

use std::sync::Arc;

use crate::api::{create_router, AppState};
use crate::cli::args::ServeArgs;
use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::infra::Database;

/// Execute the serve command
pub async fn execute(args: ServeArgs, mut config: Config) -> AppResult<()> {
    if let Some(host) = args.host {
        config.server_host = host;
    }
    if let Some(port) = args.port {
        config.server_port = port;
    }

    tracing::info!(
        env = %config.app_env,
        sandbox_mail = config.mail_sandbox(),
        "Starting server..."
    );

    let db = Arc::new(Database::connect(&config).await?);

    let app_state = AppState::from_config(db, &config);
    let app = create_router(app_state);

    let addr = config.server_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind to {}: {}", addr, e)))?;

    tracing::info!("Server running on http://{}", addr);

    axum::serve(listener, app)
        .await
        .map_err(|e| AppError::internal(format!("Server error: {}", e)))?;

    Ok(())
}
