use anyhow::Result;
use axum::Router;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::provision::Provisioner;

pub mod handlers;
pub mod router;
pub mod validators;

pub struct AppState {
    pub portal: Provisioner,
}

pub async fn serve(bind: &str, port: u16, portal: Provisioner) -> Result<()> {
    let bind_addr = format!("{}:{}", bind, port);
    let state = Arc::new(AppState { portal });
    let app = build_app(state);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!("API listening on http://{}", bind_addr);

    axum::serve(listener, app).await?;
    Ok(())
}

pub fn build_app(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(router::routes(state))
        .layer(TraceLayer::new_for_http())
        // Frontend may live on another origin; credentials travel in the
        // Authorization header, not cookies.
        .layer(CorsLayer::permissive())
}
