//! Storefront server with the authorization gate in front of every route.
//!
//! # Running
//!
//! ```bash
//! export STOREFRONT_GATE_SECRET="at-least-thirty-two-bytes-of-secret"
//! # optional
//! export STOREFRONT_GATE_CONFIG="gate.json"
//! export STOREFRONT_GATE_PUBLIC_ORIGIN="http://localhost:3000"
//! export STOREFRONT_ADDR="127.0.0.1:3000"
//!
//! RUST_LOG=storefront_gate=debug cargo run -p storefront-gate-demos --bin storefront_server
//! ```
//!
//! Then try:
//! ```bash
//! curl -i http://localhost:3000/auth/sign-in     # 200, public
//! curl -i http://localhost:3000/dashboard         # 307 to /auth/sign-in
//! curl -i -H "Authorization: Bearer $TOKEN" http://localhost:3000/admin/users
//! ```

use std::net::SocketAddr;

use axum::{
    Json, Router,
    extract::State,
    middleware,
    routing::{get, post},
};
use storefront_gate::{
    GateConfig, MetricsSnapshot,
    auth::JwtResolver,
    middleware::{GateState, gate},
};
use tracing_subscriber::EnvFilter;

const ADDR_ENV: &str = "STOREFRONT_ADDR";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let config = GateConfig::from_env()?;
    let resolver = JwtResolver::from_env()?;
    let state = GateState::from_config(&config, resolver)?;

    let app = Router::new()
        .route("/", get(map))
        .route("/auth/sign-in", get(|| async { "sign in" }))
        .route("/auth/sign-up", get(|| async { "sign up" }))
        .route("/auth/forgot-password", get(|| async { "forgot password" }))
        .route("/purchase", post(|| async { "purchase received" }))
        .route("/dashboard", get(|| async { "dashboard" }))
        .route("/admin/users", get(|| async { "user administration" }))
        .route("/api/admin/metrics", get(metrics))
        .with_state(state.clone())
        .layer(middleware::from_fn_with_state(state, gate));

    let addr: SocketAddr = std::env::var(ADDR_ENV)
        .unwrap_or_else(|_| "127.0.0.1:3000".to_string())
        .parse()?;
    tracing::info!(%addr, "storefront listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Landing page with the region map.
async fn map() -> &'static str {
    "pick a region on the map"
}

/// Gate counters; sits in the admin tier.
async fn metrics(State(state): State<GateState>) -> Json<MetricsSnapshot> {
    Json(state.gate().metrics().snapshot())
}
