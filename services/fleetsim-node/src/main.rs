use axum::{
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use chrono::Utc;
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tracing::{error, info};

use fleetsim_feed::FeedServer;

mod config;
mod handlers;
mod state;

use config::Config;
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    fleetsim_core::logging::init();

    let config = Config::from_env();
    let state = Arc::new(AppState::new(&config)?);

    let feed_addr = SocketAddr::from(([0, 0, 0, 0], config.feed_port));
    let feed = Arc::new(FeedServer::new(feed_addr, state.events.clone()));
    tokio::spawn(async move {
        if let Err(e) = feed.run().await {
            error!("feed server failed: {}", e);
        }
    });

    state.scheduler.start()?;

    let app = Router::new()
        .route("/health", get(health_check))
        .route("/api/robots", get(handlers::list_robots))
        .route("/api/robots/:id", get(handlers::get_robot))
        .route("/api/robots/:id/cancel", post(handlers::cancel_robot_mission))
        .route("/api/missions", get(handlers::list_missions))
        .route("/api/missions/active", get(handlers::list_active_missions))
        .route("/api/missions/:id", get(handlers::get_mission))
        .route("/api/dashboard", get(handlers::dashboard))
        .route("/api/statistics", get(handlers::statistics))
        .route("/api/simulation/start", post(handlers::start_simulation))
        .route("/api/simulation/stop", post(handlers::stop_simulation))
        .with_state(state)
        .layer(ServiceBuilder::new().into_inner());

    let bind_addr = format!("0.0.0.0:{}", config.http_port);
    let listener = TcpListener::bind(&bind_addr).await?;
    info!("fleetsim node listening on {}", bind_addr);

    axum::serve(listener, app).await?;
    Ok(())
}

async fn health_check() -> Result<Json<Value>, StatusCode> {
    Ok(Json(json!({
        "status": "healthy",
        "service": "fleetsim-node",
        "timestamp": Utc::now().to_rfc3339()
    })))
}
