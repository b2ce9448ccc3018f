//! # scheduler — Background Loops
//!
//! สอง loop อิสระที่หมุนตลอดอายุ process:
//!
//! ```text
//! Feed Loop   (ทุก FEED_TICK_MS)    → tick ทุก session → broadcast PRICE_TICK
//! Sweep Loop  (ทุก SETTLE_SWEEP_MS) → เก็บ position หมดอายุ → settle ที่ราคาล่าสุด
//! ```
//!
//! ตัว loop เป็นแค่เปลือก interval — เนื้องานจริงอยู่ใน `feed_once` / `sweep_once`
//! ซึ่งเป็น async fn เดี่ยวๆ เรียกตรงๆ จาก test ได้

use std::sync::atomic::Ordering;
use std::time::Duration;

use chrono::Utc;
use tracing::{info, warn};

use crate::engine::settlement::{settle, SettleReason};
use crate::events::WsEvent;
use crate::state::SharedState;

/// สตาร์ท feed loop — ผลิตแท่งใหม่ให้ทุก session ทุก `feed_tick_ms`
pub fn spawn_price_feed(state: SharedState) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_millis(state.config.feed_tick_ms));
        info!(tick_ms = state.config.feed_tick_ms, "📊 Price feed loop started");
        loop {
            interval.tick().await;
            feed_once(&state).await;
        }
    });
}

/// สตาร์ท settlement sweep — กวาด position หมดอายุทุก `settle_sweep_ms`
pub fn spawn_settlement_sweep(state: SharedState) {
    tokio::spawn(async move {
        let mut interval =
            tokio::time::interval(Duration::from_millis(state.config.settle_sweep_ms));
        info!(sweep_ms = state.config.settle_sweep_ms, "⏱️ Settlement sweep loop started");
        loop {
            interval.tick().await;
            sweep_once(&state).await;
        }
    });
}

/// หนึ่งรอบ feed: เดินทุก series ไปหนึ่งแท่ง แล้ว broadcast แท่งใหม่ต่อ session
pub async fn feed_once(state: &SharedState) {
    let mut sessions = state.sessions.write().await;
    for session in sessions.values_mut() {
        let candle = session.series.tick();
        state.tick_count.fetch_add(1, Ordering::Relaxed);
        state.broadcast(&WsEvent::PriceTick {
            user_id:    session.user_id,
            asset:      session.asset.clone(),
            candle:     Box::new(candle),
            change_pct: session.series.change_pct(),
        });
    }
}

/// หนึ่งรอบ sweep: ดึง position ที่ครบเวลาออกจากทุก session แล้ว settle
/// ที่ราคาล่าสุดของ series นั้น
///
/// ตัดสินด้วย `now` ก้อนเดียวทั้งรอบ — position ที่หมดอายุระหว่างรอบนี้
/// จะไปเข้ารอบหน้าแทน (ช้าสุดหนึ่งคาบ sweep)
pub async fn sweep_once(state: &SharedState) {
    let now = Utc::now();

    // ลำดับ lock: sessions ก่อน store เสมอ
    let mut sessions = state.sessions.write().await;
    let mut store = state.store.write().await;

    for session in sessions.values_mut() {
        let expired = session.take_expired(now);
        if expired.is_empty() {
            continue;
        }
        let exit_price = session.series.last_price();

        for mut position in expired {
            let Some(account) = store.user_mut(position.user_id) else {
                warn!(
                    position_id = %position.position_id,
                    user        = %position.user_id,
                    "⚠️ [SWEEP] Account missing — position cannot be settled"
                );
                continue;
            };

            match settle(&mut position, account, exit_price, now, SettleReason::Expired) {
                Ok(outcome) => {
                    state.broadcast(&WsEvent::PositionSettled {
                        position: Box::new(position.clone()),
                        credited: outcome.credited,
                        reason:   SettleReason::Expired,
                    });
                    store.record_settled(position);
                }
                Err(err) => {
                    // take_expired คัดเฉพาะตัวครบเวลาแล้ว — โดนตรงนี้แปลว่า
                    // นาฬิกาเพี้ยนชั่วขณะ คืนกลับไปรอรอบหน้า
                    warn!(
                        position_id = %position.position_id,
                        error       = %err,
                        "⚠️ [SWEEP] Settle failed — returning position to session"
                    );
                    session.open_positions.push(position);
                }
            }
        }
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────
