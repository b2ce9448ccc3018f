//! # state
//!
//! AppState กลางของ simulator — sessions, store, broadcast channel, metrics
//!
//! ## ลำดับการจับ Lock
//! path ที่ต้องถือสอง lock พร้อมกันให้จับ `sessions` ก่อน `store` เสมอ
//! (feed/sweep loop, place/close/double handlers) — สลับลำดับ = เสี่ยง deadlock

use std::collections::HashMap;
use std::sync::Arc;

use rand::{rngs::StdRng, SeedableRng};
use tokio::sync::{broadcast, RwLock};

use crate::config::SimConfig;
use crate::feed::generator::PriceSeries;
use crate::session::{SessionKey, TradingSession};
use crate::storage::MemStore;

// ─── AppState ─────────────────────────────────────────────────────────────────

/// Top-level shared state injected into every Axum handler.
#[derive(Clone)]
pub struct AppState {
    /// Config อ่านครั้งเดียวตอน boot
    pub config: SimConfig,

    // ── Market Sessions ───────────────────────────────────────────────────────
    /// Session ต่อคู่ (user, asset) — price series + open positions
    pub sessions: Arc<RwLock<HashMap<SessionKey, TradingSession>>>,

    // ── Accounts / History ────────────────────────────────────────────────────
    /// users, ประวัติ trade, รายการฝาก/ถอน
    pub store: Arc<RwLock<MemStore>>,

    // ── Monitor / WebSocket ───────────────────────────────────────────────────
    /// Broadcast channel สำหรับส่ง Event ไปยัง WebSocket clients
    /// ใช้ String (pre-serialized JSON) เพื่อหลีกเลี่ยง Clone constraints
    pub broadcast_tx: broadcast::Sender<String>,

    // ── Metrics ───────────────────────────────────────────────────────────────
    pub tick_count:  Arc<std::sync::atomic::AtomicU64>,
    pub trade_count: Arc<std::sync::atomic::AtomicU64>,
}

impl AppState {
    pub fn new(config: SimConfig) -> Self {
        let (broadcast_tx, _) = broadcast::channel(256);

        Self {
            config,
            sessions:    Arc::new(RwLock::new(HashMap::new())),
            store:       Arc::new(RwLock::new(MemStore::new())),
            broadcast_tx,
            tick_count:  Arc::new(std::sync::atomic::AtomicU64::new(0)),
            trade_count: Arc::new(std::sync::atomic::AtomicU64::new(0)),
        }
    }

    // ── Helper Methods ────────────────────────────────────────────────────────

    /// Broadcast WsEvent ไปยัง WebSocket clients ทั้งหมด
    /// ไม่ panic ถ้าไม่มี listener (ปลอดภัยสำหรับ headless mode)
    pub fn broadcast(&self, event: &crate::events::WsEvent) {
        // Err เกิดขึ้นเมื่อไม่มี receiver — ไม่ใช่ error จริงๆ
        let _ = self.broadcast_tx.send(event.to_json());
    }

    /// สร้าง price series ใหม่ตาม config
    /// มี FEED_SEED → ทุก series เกิดจาก seed เดิม (ทำซ้ำได้), ไม่มี → สุ่มจริง
    pub fn new_series(&self) -> PriceSeries {
        let rng = match self.config.feed_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        PriceSeries::initialize(
            self.config.feed_window_size,
            self.config.feed_start_price,
            rng,
        )
    }

    /// จำนวน session ที่เปิดอยู่
    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// จำนวน position ที่ยังเปิดอยู่รวมทุก session
    pub async fn open_position_total(&self) -> usize {
        let sessions = self.sessions.read().await;
        sessions.values().map(|s| s.open_positions.len()).sum()
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(SimConfig::from_env())
    }
}

/// Convenience type alias
pub type SharedState = Arc<AppState>;

pub fn build_state(config: SimConfig) -> SharedState {
    Arc::new(AppState::new(config))
}
