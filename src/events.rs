//! # events
//!
//! Defines [`WsEvent`] — ทุก Event ที่ระบบ Broadcast ออกไปผ่าน WebSocket
//! ไปยัง Monitor Loop ของหน้าเทรด
//!
//! ใช้ `tokio::sync::broadcast::Sender<String>` โดยแปลง WsEvent เป็น JSON
//! String ก่อนส่ง เพื่อหลีกเลี่ยง Clone constraints ที่ซับซ้อน

use serde::Serialize;

use crate::engine::settlement::SettleReason;
use crate::models::{Candle, Position};

/// Event ทุกรูปแบบที่ Dashboard จะได้รับแบบ Real-time
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WsEvent {
    /// Session ใหม่ถูกเปิด (หรือ reset) — series เริ่มเดินแล้ว
    SessionStarted {
        user_id:    uuid::Uuid,
        asset:      String,
        last_price: f64,
    },

    /// Feed loop ผลิตแท่งใหม่ให้ session หนึ่ง
    PriceTick {
        user_id:    uuid::Uuid,
        asset:      String,
        candle:     Box<Candle>,
        change_pct: f64,
    },

    /// Position ใหม่เปิดแล้ว — stake ถูกหักเรียบร้อย
    PositionOpened {
        position: Box<Position>,
    },

    /// User เบิ้ล stake ในช่วงท้ายก่อนหมดอายุ
    StakeDoubled {
        position_id: uuid::Uuid,
        asset:       String,
        stake:       f64,
    },

    /// Position ถูกตัดสินแล้ว (expiry sweep หรือ early close)
    PositionSettled {
        position: Box<Position>,
        credited: f64,
        reason:   SettleReason,
    },

    /// สถิติ Server (ส่งเมื่อ Dashboard poll เพื่อให้ connection ยัง alive)
    ServerStats {
        tick_count:     u64,
        trade_count:    u64,
        sessions:       usize,
        open_positions: usize,
    },
}

impl WsEvent {
    /// แปลงเป็น JSON String สำหรับส่งผ่าน WebSocket
    #[inline]
    pub fn to_json(&self) -> String {
        serde_json::to_string(self)
            .unwrap_or_else(|_| r#"{"event":"SERIALIZATION_ERROR"}"#.to_string())
    }
}
