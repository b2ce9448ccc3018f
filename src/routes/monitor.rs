//! # routes::monitor
//!
//! **Monitor Loop** — Endpoints สำหรับ Dashboard
//!
//! ## Endpoints
//!
//! | Method    | Path                 | Description                          |
//! |-----------|----------------------|--------------------------------------|
//! | GET (WS)  | `/ws/monitor`        | WebSocket real-time event stream     |
//! | GET       | `/api/monitor/stats` | tick_count, trade_count, sessions    |
//! | GET       | `/api/health`        | Liveness probe                       |

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::IntoResponse,
    Json,
};
use futures_util::{SinkExt, StreamExt};
use serde_json::json;
use std::sync::atomic::Ordering;
use tracing::{debug, info};

use crate::{events::WsEvent, state::SharedState};

// ─── WebSocket Handler ────────────────────────────────────────────────────────

/// Upgrade HTTP → WebSocket แล้ว subscribe broadcast channel
///
/// หน้าเทรดต่อที่ `ws://localhost:3000/ws/monitor`
/// ทุก WsEvent จะถูกส่งมาเป็น JSON text frame
pub async fn ws_monitor(
    ws: WebSocketUpgrade,
    State(state): State<SharedState>,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: SharedState) {
    let mut rx = state.broadcast_tx.subscribe();
    let (mut sender, mut receiver) = socket.split();

    info!("🔌 WebSocket client connected");

    // ── ส่ง Snapshot ปัจจุบันทันทีที่ต่อ ─────────────────────────────────────
    let snapshot = {
        let sessions = state.sessions.read().await;
        let open_positions: usize = sessions.values().map(|s| s.open_positions.len()).sum();

        json!({
            "event":          "SNAPSHOT",
            "tick_count":     state.tick_count.load(Ordering::Relaxed),
            "trade_count":    state.trade_count.load(Ordering::Relaxed),
            "sessions":       sessions.len(),
            "open_positions": open_positions,
        })
        .to_string()
    };

    if sender.send(Message::Text(snapshot.into())).await.is_err() {
        return; // Client ปิดก่อน snapshot ส่งได้
    }

    // ── Event Loop ────────────────────────────────────────────────────────────
    loop {
        tokio::select! {
            // รับ Event จาก broadcast channel → ส่งต่อไป WebSocket client
            result = rx.recv() => {
                match result {
                    Ok(json_str) => {
                        if sender.send(Message::Text(json_str.into())).await.is_err() {
                            break; // Client disconnect
                        }
                    }
                    Err(tokio::sync::broadcast::error::RecvError::Lagged(n)) => {
                        // Client read ช้าเกินไป — บาง Event ถูก skip
                        debug!("WS client lagged, skipped {n} events");
                    }
                    Err(_) => break, // Channel closed
                }
            }

            // รับ Message จาก Client (Ping / Close)
            result = receiver.next() => {
                match result {
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Ok(Message::Ping(data))) => {
                        let _ = sender.send(Message::Pong(data)).await;
                    }
                    _ => {} // Text/Binary from client — ignored for now
                }
            }
        }
    }

    info!("🔌 WebSocket client disconnected");
}

// ─── REST Monitoring Endpoints ────────────────────────────────────────────────

/// GET /api/monitor/stats — สถิติ Server
pub async fn get_stats(State(state): State<SharedState>) -> impl IntoResponse {
    let tick_count = state.tick_count.load(Ordering::Relaxed);
    let trade_count = state.trade_count.load(Ordering::Relaxed);
    let sessions = state.session_count().await;
    let open_positions = state.open_position_total().await;

    // Broadcast stats event ไปด้วยทุกครั้งที่มีคน poll
    state.broadcast(&WsEvent::ServerStats {
        tick_count,
        trade_count,
        sessions,
        open_positions,
    });

    Json(json!({
        "ok":             true,
        "tick_count":     tick_count,
        "trade_count":    trade_count,
        "sessions":       sessions,
        "open_positions": open_positions,
    }))
}

/// GET /api/health — liveness probe (ไม่ติด API key)
pub async fn health_check(State(state): State<SharedState>) -> impl IntoResponse {
    Json(json!({
        "ok":         true,
        "service":    "updown",
        "sessions":   state.session_count().await,
        "tick_count": state.tick_count.load(Ordering::Relaxed),
    }))
}
