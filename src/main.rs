//! # Updown — Binary Options Trading Simulator Backend
//!
//! ## Architecture Overview
//!
//! ```text
//!  ┌──────────────┐   POST /api/market/session    ┌──────────────────────┐
//!  │   Browser    │ ─────────────────────────────▶│   AppState           │
//!  │  (Frontend)  │   POST /api/trades            │   sessions:          │
//!  └──────────────┘                               │    (user, asset) →   │
//!                                                 │    PriceSeries +     │
//!  ┌──────────────┐   every FEED_TICK_MS          │    open positions    │
//!  │  Feed Loop   │ ─────────────────────────────▶│                      │
//!  │  Sweep Loop  │   every SETTLE_SWEEP_MS       │   store: accounts,   │──▶ settle → balance
//!  └──────────────┘                               │   history, wallet    │
//!                                                 └──────────┬───────────┘
//!                                                            │
//!  ┌──────────────┐   WebSocket /ws/monitor                  │
//!  │  Dashboard   │ ◀──────────────────────────────────────────
//!  │  / Monitor   │   GET /api/monitor/stats
//!  └──────────────┘
//! ```
//!
//! ## Environment Variables
//!
//! | Variable    | Default        | Description                            |
//! |-------------|----------------|----------------------------------------|
//! | `BIND_ADDR` | `0.0.0.0:3000` | Address Axum listens on                |
//! | `API_KEY`   | *(empty)*      | X-API-Key guard — empty = dev mode     |
//! | `RUST_LOG`  | `updown=debug` | Tracing filter                         |
//!
//! ค่าฝั่ง simulator (tick interval, window size, ขั้นต่ำฝาก/ถอน ฯลฯ)
//! ดูทั้งหมดได้ที่ [`config::SimConfig`]

use std::net::SocketAddr;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod auth;
mod config;
mod engine;
mod error;
mod events;
mod feed;
mod ledger;
mod models;
mod routes;
mod scheduler;
mod session;
mod state;
mod storage;

use auth::require_api_key;
use config::SimConfig;
use routes::{
    account::{
        create_deposit, create_withdrawal, get_user, list_deposits, list_withdrawals, register,
    },
    market::{list_assets, open_session, session_patterns, session_snapshot},
    monitor::{get_stats, health_check, ws_monitor},
    trades::{close_trade, double_trade, list_trades, place_trade},
};
use scheduler::{spawn_price_feed, spawn_settlement_sweep};
use state::build_state;

// ─── Entry Point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ── 1. Load .env (optional — CI/prod can use real env vars) ──────────────
    dotenvy::dotenv().ok();

    // ── 2. Initialise structured logging ─────────────────────────────────────
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env()
            .add_directive("updown=debug".parse()?)
            .add_directive("tower_http=info".parse()?))
        .init();

    info!(
        r#"

  ╔═══════════════════════════════════════════════╗
  ║        UPDOWN — Binary Options Simulator      ║
  ║        Rust + Axum  ·  Feed & Sweep           ║
  ╚═══════════════════════════════════════════════╝"#
    );

    // ── 3. Build shared state + background loops ─────────────────────────────
    let state = build_state(SimConfig::from_env());
    spawn_price_feed(state.clone());
    spawn_settlement_sweep(state.clone());

    // ── 4. Build CORS layer (allow the browser frontend dev server) ──────────
    let cors = CorsLayer::new()
        .allow_origin(Any)   // Tighten in production!
        .allow_methods(Any)
        .allow_headers(Any);

    // ── 5. Build the Axum router ─────────────────────────────────────────────
    let app = Router::new()
        // ── Auth & Profile ───────────────────────────────────────────────────
        .route("/api/auth/register",                       post(register))
        .route("/api/user/:id",                            get(get_user))
        // ── Market ───────────────────────────────────────────────────────────
        .route("/api/market/assets",                       get(list_assets))
        .route("/api/market/session",                      post(open_session))
        .route("/api/market/session/:id/:asset",           get(session_snapshot))
        .route("/api/market/session/:id/:asset/patterns",  get(session_patterns))
        // ── Trades ───────────────────────────────────────────────────────────
        .route("/api/trades",                              post(place_trade))
        .route("/api/trades/:id",                          get(list_trades))
        .route("/api/trades/:id/close",                    post(close_trade))
        .route("/api/trades/:id/double",                   post(double_trade))
        // ── Wallet ───────────────────────────────────────────────────────────
        .route("/api/deposits",                            post(create_deposit))
        .route("/api/deposits/:id",                        get(list_deposits))
        .route("/api/withdrawals",                         post(create_withdrawal))
        .route("/api/withdrawals/:id",                     get(list_withdrawals))
        // ── Monitor ──────────────────────────────────────────────────────────
        .route("/ws/monitor",                              get(ws_monitor))
        .route("/api/monitor/stats",                       get(get_stats))
        .route("/api/health",                              get(health_check))
        .route("/health",                                  get(health_check))
        // ── Middleware ───────────────────────────────────────────────────────
        .layer(middleware::from_fn(require_api_key))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state);

    // ── 6. Resolve bind address ──────────────────────────────────────────────
    let addr: SocketAddr = std::env::var("BIND_ADDR")
        .unwrap_or_else(|_| "0.0.0.0:3000".to_string())
        .parse()?;

    info!(?addr, "🚀 Updown server starting");

    // ── 7. Start the server ──────────────────────────────────────────────────
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
