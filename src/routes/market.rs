//! # routes::market
//!
//! ตลาดฝั่งอ่าน: asset catalog + trading session + pattern scan
//!
//! ## Endpoints
//!
//! | Method | Path                                      | Description                      |
//! |--------|-------------------------------------------|----------------------------------|
//! | GET    | `/api/market/assets`                      | Asset catalog ทั้งหมด             |
//! | POST   | `/api/market/session`                     | เปิด/รีเซ็ต session               |
//! | GET    | `/api/market/session/:id/:asset`          | Snapshot ของ window ปัจจุบัน      |
//! | GET    | `/api/market/session/:id/:asset/patterns` | สแกน pattern จากสามแท่งล่าสุด     |

use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use crate::error::AppError;
use crate::events::WsEvent;
use crate::feed::patterns::detect_patterns;
use crate::models::{find_asset, ASSETS};
use crate::session::{SessionKey, TradingSession};
use crate::state::SharedState;

// ─── Request Payloads ─────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct OpenSessionRequest {
    pub user_id: Uuid,
    pub asset:   String,
}

// ─── Handlers ─────────────────────────────────────────────────────────────────

/// GET /api/market/assets — catalog คงที่ พร้อม payout rate ต่อ asset
pub async fn list_assets() -> impl IntoResponse {
    Json(json!({
        "ok":     true,
        "count":  ASSETS.len(),
        "assets": ASSETS,
    }))
}

/// POST /api/market/session — เปิด session ใหม่ (หรือรีเซ็ต series ของคู่เดิม)
///
/// เปิดซ้ำคู่ (user, asset) เดิม: series เริ่มใหม่ แต่ open positions
/// ของเก่าถูกพกข้ามมา — stake ที่หักไปแล้วต้องไม่หายไปไหน
pub async fn open_session(
    State(state): State<SharedState>,
    Json(req): Json<OpenSessionRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    // ── 1. Asset ต้องอยู่ใน catalog ───────────────────────────────────────────
    let asset = find_asset(&req.asset)
        .ok_or_else(|| AppError::BadRequest(format!("Unknown asset: {}", req.asset)))?;

    // ── 2. User ต้องมีตัวตน (ลำดับ lock: sessions → store) ────────────────────
    let mut sessions = state.sessions.write().await;
    {
        let store = state.store.read().await;
        if store.user(req.user_id).is_none() {
            return Err(AppError::NotFound(format!("User {} not found", req.user_id)));
        }
    }

    // ── 3. Series ใหม่ + ย้าย open positions จาก session เก่า ─────────────────
    let key: SessionKey = (req.user_id, asset.symbol.to_string());
    let mut session =
        TradingSession::open(req.user_id, asset.symbol, asset.payout_rate, state.new_series());
    if let Some(old) = sessions.remove(&key) {
        session.open_positions = old.open_positions;
    }

    let last_price = session.series.last_price();
    let change_pct = session.series.change_pct();
    let candles = session.series.snapshot();
    let open_positions = session.open_positions.clone();
    sessions.insert(key, session);

    info!(
        user  = %req.user_id,
        asset = %asset.symbol,
        last_price,
        "🎬 Session started"
    );
    state.broadcast(&WsEvent::SessionStarted {
        user_id:    req.user_id,
        asset:      asset.symbol.to_string(),
        last_price,
    });

    Ok(Json(json!({
        "ok":             true,
        "asset":          asset,
        "last_price":     last_price,
        "change_pct":     change_pct,
        "candles":        candles,
        "open_positions": open_positions,
    })))
}

/// GET /api/market/session/:id/:asset — สถานะปัจจุบันของ session
pub async fn session_snapshot(
    State(state): State<SharedState>,
    Path((user_id, asset)): Path<(Uuid, String)>,
) -> Result<Json<serde_json::Value>, AppError> {
    let sessions = state.sessions.read().await;
    let session = sessions
        .get(&(user_id, asset.clone()))
        .ok_or_else(|| AppError::NotFound(format!("No session for {asset}")))?;

    Ok(Json(json!({
        "ok":             true,
        "asset":          session.asset,
        "opened_at":      session.opened_at,
        "payout_rate":    session.payout_rate,
        "last_price":     session.series.last_price(),
        "change_pct":     session.series.change_pct(),
        "trend_bias":     session.series.trend_bias(),
        "candles":        session.series.snapshot(),
        "open_positions": session.open_positions,
    })))
}

/// GET /api/market/session/:id/:asset/patterns — pattern บนแท่งล่าสุด
pub async fn session_patterns(
    State(state): State<SharedState>,
    Path((user_id, asset)): Path<(Uuid, String)>,
) -> Result<Json<serde_json::Value>, AppError> {
    let sessions = state.sessions.read().await;
    let session = sessions
        .get(&(user_id, asset.clone()))
        .ok_or_else(|| AppError::NotFound(format!("No session for {asset}")))?;

    let candles = session.series.snapshot();
    let patterns = detect_patterns(&candles);

    Ok(Json(json!({
        "ok":       true,
        "asset":    session.asset,
        "count":    patterns.len(),
        "patterns": patterns,
    })))
}
