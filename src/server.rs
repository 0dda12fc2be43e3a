//! HTTP server republishing the valid provider list

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::broadcast;

#[derive(Clone)]
struct AppState {
    output_path: Arc<PathBuf>,
}

/// Build the router serving `GET /providers` and `GET /health`
pub fn router(output_path: impl Into<PathBuf>) -> Router {
    let state = AppState {
        output_path: Arc::new(output_path.into()),
    };

    Router::new()
        .route("/providers", get(handle_providers))
        .route("/health", get(handle_health))
        .with_state(state)
}

/// Serve on an already bound listener until shutdown is broadcast
pub async fn serve(
    listener: TcpListener,
    output_path: impl Into<PathBuf>,
    mut shutdown_rx: broadcast::Receiver<()>,
) -> std::io::Result<()> {
    let app = router(output_path);

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = shutdown_rx.recv().await;
            tracing::info!("Server shutting down");
        })
        .await
}

/// Bind `addr` and serve until shutdown is broadcast
pub async fn bind_and_serve(
    addr: SocketAddr,
    output_path: impl Into<PathBuf>,
    shutdown_rx: broadcast::Receiver<()>,
) -> std::io::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    tracing::info!("Serving providers on http://{}", listener.local_addr()?);
    serve(listener, output_path, shutdown_rx).await
}

/// The output file as written by the last pass
async fn handle_providers(State(state): State<AppState>) -> Response {
    match tokio::fs::read(state.output_path.as_ref()).await {
        Ok(body) => ([(header::CONTENT_TYPE, "application/json")], body).into_response(),
        Err(e) => {
            tracing::warn!(
                path = %state.output_path.display(),
                error = %e,
                "Failed to read providers file"
            );
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to read providers").into_response()
        }
    }
}

async fn handle_health() -> &'static str {
    "ok"
}
