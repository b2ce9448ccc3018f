//! # config
//!
//! ค่าตั้งต้นทั้งหมดของ simulator อ่านจาก Environment Variables ครั้งเดียวตอน boot
//! แล้วแช่ไว้ใน `AppState` — ไม่มีการ re-read ระหว่างรัน
//!
//! ทุกค่ามี default ที่ใช้งานได้ทันที รันเปล่าๆ โดยไม่ตั้ง env เลยก็ได้

/// ค่า Config รวมของ simulator
/// อ่านจาก Environment Variables ผ่าน `SimConfig::from_env()`
#[derive(Debug, Clone)]
pub struct SimConfig {
    // ── Price Feed ──────────────────────────────────────────────────────────
    /// คาบของ feed loop (ms) — ทุก tick สร้างแท่งใหม่ให้ทุก session
    pub feed_tick_ms: u64,

    /// จำนวนแท่งใน rolling window ต่อ session
    /// แท่งใหม่เข้า แท่งเก่าสุดหลุด — ความยาวคงที่เสมอ
    pub feed_window_size: usize,

    /// ราคาเริ่มต้นของ series ใหม่
    pub feed_start_price: f64,

    /// Seed ของ RNG — ตั้งเมื่อต้องการ feed ที่ทำซ้ำได้ (เช่นตอน demo/test)
    /// ไม่ตั้ง = สุ่มจาก entropy ของเครื่อง
    pub feed_seed: Option<u64>,

    // ── Settlement ──────────────────────────────────────────────────────────
    /// คาบของ settlement sweep (ms) — กวาด position หมดอายุ
    /// ต้องถี่กว่า duration ที่สั้นที่สุดมากพอ ไม่งั้น settle ช้า
    pub settle_sweep_ms: u64,

    /// หน้าต่าง double-stake: อนุญาตเมื่อเหลือเวลา ≤ ค่านี้ (วินาที)
    pub double_window_secs: u64,

    // ── Account / Wallet ────────────────────────────────────────────────────
    /// Balance เริ่มต้นของบัญชี demo ใหม่
    pub starting_balance: f64,

    /// ยอดฝากขั้นต่ำต่อครั้ง
    pub min_deposit: f64,

    /// ยอดถอนขั้นต่ำต่อครั้ง
    pub min_withdrawal: f64,
}

impl SimConfig {
    pub fn from_env() -> Self {
        Self {
            feed_tick_ms:       std::env::var("FEED_TICK_MS")
                .ok().and_then(|v| v.parse().ok()).unwrap_or(800),
            feed_window_size:   std::env::var("FEED_WINDOW_SIZE")
                .ok().and_then(|v| v.parse().ok()).unwrap_or(50_usize).max(1),
            feed_start_price:   std::env::var("FEED_START_PRICE")
                .ok().and_then(|v| v.parse().ok()).unwrap_or(150.0),
            feed_seed:          std::env::var("FEED_SEED")
                .ok().and_then(|v| v.parse().ok()),
            settle_sweep_ms:    std::env::var("SETTLE_SWEEP_MS")
                .ok().and_then(|v| v.parse().ok()).unwrap_or(200),
            double_window_secs: std::env::var("SETTLE_DOUBLE_WINDOW_SECS")
                .ok().and_then(|v| v.parse().ok()).unwrap_or(15),
            starting_balance:   std::env::var("ACCOUNT_STARTING_BALANCE")
                .ok().and_then(|v| v.parse().ok()).unwrap_or(1000.0),
            min_deposit:        std::env::var("ACCOUNT_MIN_DEPOSIT")
                .ok().and_then(|v| v.parse().ok()).unwrap_or(50.0),
            min_withdrawal:     std::env::var("ACCOUNT_MIN_WITHDRAWAL")
                .ok().and_then(|v| v.parse().ok()).unwrap_or(100.0),
        }
    }
}

impl Default for SimConfig {
    fn default() -> Self {
        Self::from_env()
    }
}
