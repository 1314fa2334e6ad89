//! HTTP server assembly

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::api;
use crate::core::AppState;
use crate::core::tasks::BackgroundTasks;

/// Build a router with all routes registered (no middleware, no state)
pub fn build_router() -> Router<AppState> {
    Router::new()
        .merge(api::health::router())
        .merge(api::orders::router())
        .merge(api::settings::router())
        .merge(api::availability::router())
}

/// Build a fully configured application
pub fn build_app(state: AppState) -> Router {
    build_router()
        // CORS - the ordering apps are served from other origins
        .layer(CorsLayer::permissive())
        // Request logging
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Run the HTTP server until shutdown
///
/// Starts the background tasks, serves until SIGINT/SIGTERM, then stops
/// the tasks gracefully.
pub async fn run(state: AppState) -> anyhow::Result<()> {
    let mut tasks = BackgroundTasks::new();
    state.start_background_tasks(&mut tasks);

    let app = build_app(state.clone());
    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], state.config.http_port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("HTTP server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tasks.shutdown().await;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("Shutdown signal received");
}
