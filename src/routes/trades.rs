//! # routes::trades
//!
//! วงจรชีวิตของ position: เปิด → (double) → ปิดเอง / รอ sweep settle
//!
//! ## Endpoints
//!
//! | Method | Path                     | Description                             |
//! |--------|--------------------------|-----------------------------------------|
//! | POST   | `/api/trades`            | เปิด position บน session ที่ active อยู่ |
//! | GET    | `/api/trades/:id`        | Position ทั้งหมดของ user                |
//! | POST   | `/api/trades/:id/close`  | ปิดก่อนหมดเวลา (settle ราคาปัจจุบัน)     |
//! | POST   | `/api/trades/:id/double` | เพิ่ม stake เท่าตัวในหน้าต่างแรก          |

use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;
use std::sync::atomic::Ordering;
use uuid::Uuid;

use crate::engine::settlement::{double_stake, place_position, settle, SettleReason};
use crate::error::AppError;
use crate::events::WsEvent;
use crate::models::{Direction, Position};
use crate::session::SessionKey;
use crate::state::SharedState;

// ─── Request Payloads ─────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct PlaceTradeRequest {
    pub user_id:       Uuid,
    pub asset:         String,
    pub direction:     Direction,
    pub stake:         f64,
    pub duration_secs: u64,
}

// ─── Handlers ─────────────────────────────────────────────────────────────────

/// POST /api/trades — หัก stake แล้วเปิด position ที่ราคาล่าสุดของ session
pub async fn place_trade(
    State(state): State<SharedState>,
    Json(req): Json<PlaceTradeRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    // ── 1. Validate นอก lock ──────────────────────────────────────────────────
    if req.duration_secs == 0 {
        return Err(AppError::BadRequest("duration_secs must be at least 1".into()));
    }

    // ── 2. Session ต้อง active อยู่ (ลำดับ lock: sessions → store) ────────────
    let mut sessions = state.sessions.write().await;
    let key: SessionKey = (req.user_id, req.asset.clone());
    let session = sessions.get_mut(&key).ok_or_else(|| {
        AppError::NotFound(format!(
            "No active session for {} — open one via /api/market/session",
            req.asset
        ))
    })?;

    let entry_price = session.series.last_price();
    let payout_rate = session.payout_rate;

    // ── 3. หัก stake จากบัญชีแล้วเปิด position ────────────────────────────────
    let mut store = state.store.write().await;
    let account = store
        .user_mut(req.user_id)
        .ok_or_else(|| AppError::NotFound(format!("User {} not found", req.user_id)))?;

    let position = place_position(
        account,
        req.user_id,
        &req.asset,
        req.direction,
        req.stake,
        entry_price,
        req.duration_secs,
        payout_rate,
    )?;
    let balance = account.balance;

    session.open_positions.push(position.clone());
    state.trade_count.fetch_add(1, Ordering::Relaxed);
    state.broadcast(&WsEvent::PositionOpened { position: Box::new(position.clone()) });

    Ok(Json(json!({
        "ok":       true,
        "position": position,
        "balance":  balance,
    })))
}

/// GET /api/trades/:id — position ของ user ทั้งที่เปิดอยู่และที่เคลียร์แล้ว
pub async fn list_trades(
    State(state): State<SharedState>,
    Path(user_id): Path<Uuid>,
) -> impl IntoResponse {
    let sessions = state.sessions.read().await;
    let open: Vec<Position> = sessions
        .values()
        .filter(|s| s.user_id == user_id)
        .flat_map(|s| s.open_positions.iter().cloned())
        .collect();
    drop(sessions);

    let store = state.store.read().await;
    let settled = store.settled_for(user_id);

    Json(json!({
        "ok":      true,
        "open":    open,
        "settled": settled,
    }))
}

/// POST /api/trades/:id/close — settle ทันทีที่ราคาปัจจุบัน ไม่รอหมดเวลา
pub async fn close_trade(
    State(state): State<SharedState>,
    Path(position_id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    // ── 1. ดึง position ออกจาก session เจ้าของ (ลำดับ lock: sessions → store) ─
    let mut sessions = state.sessions.write().await;
    let mut found: Option<(Position, f64)> = None;
    for session in sessions.values_mut() {
        if let Some(position) = session.take_position(position_id) {
            found = Some((position, session.series.last_price()));
            break;
        }
    }
    let (mut position, exit_price) = found
        .ok_or_else(|| AppError::NotFound(format!("Open position {position_id} not found")))?;

    // ── 2. Settle ด้วยราคาล่าสุดของ series ────────────────────────────────────
    let mut store = state.store.write().await;
    let Some(account) = store.user_mut(position.user_id) else {
        // ไม่เจอบัญชี — คืน position กลับ session ให้ sweep เก็บภายหลัง
        let key: SessionKey = (position.user_id, position.asset.clone());
        if let Some(session) = sessions.get_mut(&key) {
            session.open_positions.push(position);
        }
        return Err(AppError::NotFound("Account not found for position".into()));
    };

    match settle(&mut position, account, exit_price, Utc::now(), SettleReason::EarlyClose) {
        Ok(outcome) => {
            let balance = account.balance;
            store.record_settled(position.clone());
            state.broadcast(&WsEvent::PositionSettled {
                position: Box::new(position.clone()),
                credited: outcome.credited,
                reason:   SettleReason::EarlyClose,
            });

            Ok(Json(json!({
                "ok":       true,
                "position": position,
                "profit":   outcome.profit,
                "credited": outcome.credited,
                "balance":  balance,
            })))
        }
        Err(e) => {
            let key: SessionKey = (position.user_id, position.asset.clone());
            if let Some(session) = sessions.get_mut(&key) {
                session.open_positions.push(position);
            }
            Err(e.into())
        }
    }
}

/// POST /api/trades/:id/double — หัก stake ปัจจุบันเพิ่มอีกรอบแล้วคูณสอง
pub async fn double_trade(
    State(state): State<SharedState>,
    Path(position_id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    // ลำดับ lock: sessions → store
    let mut sessions = state.sessions.write().await;
    let position = sessions
        .values_mut()
        .find_map(|s| s.find_position_mut(position_id))
        .ok_or_else(|| AppError::NotFound(format!("Open position {position_id} not found")))?;

    let mut store = state.store.write().await;
    let account = store
        .user_mut(position.user_id)
        .ok_or_else(|| AppError::NotFound("Account not found for position".into()))?;

    let new_stake = double_stake(position, account, Utc::now(), state.config.double_window_secs)?;
    let balance = account.balance;

    state.broadcast(&WsEvent::StakeDoubled {
        position_id,
        asset: position.asset.clone(),
        stake: new_stake,
    });

    Ok(Json(json!({
        "ok":          true,
        "position_id": position_id,
        "stake":       new_stake,
        "balance":     balance,
    })))
}
