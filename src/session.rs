//! # session — Trading Session
//!
//! หนึ่ง session = หนึ่งคู่ (user, asset): price series ของตัวเอง + position
//! ที่ยังเปิดอยู่บน series นั้น
//!
//! เปิด session ซ้ำคู่เดิม → series ถูกรีเซ็ตใหม่ แต่ open position เดิม
//! ต้องถูกพกข้ามมาเสมอ — stake ที่หักไปแล้วห้ามหายไปกับ series เก่า

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::feed::generator::PriceSeries;
use crate::models::Position;

/// คีย์ประจำ session
pub type SessionKey = (Uuid, String);

/// Session การเทรดของ user หนึ่งคนบน asset หนึ่งตัว
pub struct TradingSession {
    pub user_id:        Uuid,
    pub asset:          String,
    /// payout rate ของ asset นี้ — ตรึงไว้ตอนเปิด session
    pub payout_rate:    f64,
    pub series:         PriceSeries,
    pub open_positions: Vec<Position>,
    pub opened_at:      DateTime<Utc>,
}

impl TradingSession {
    pub fn open(user_id: Uuid, asset: &str, payout_rate: f64, series: PriceSeries) -> Self {
        Self {
            user_id,
            asset: asset.to_string(),
            payout_rate,
            series,
            open_positions: Vec::new(),
            opened_at: Utc::now(),
        }
    }

    #[inline]
    pub fn key(&self) -> SessionKey {
        (self.user_id, self.asset.clone())
    }

    /// หา position ที่ยังเปิดอยู่ใน session นี้
    pub fn find_position_mut(&mut self, position_id: Uuid) -> Option<&mut Position> {
        self.open_positions
            .iter_mut()
            .find(|p| p.position_id == position_id)
    }

    /// ดึง position ออกจาก session (เช่น ก่อน settle) — ไม่เจอคืน None
    pub fn take_position(&mut self, position_id: Uuid) -> Option<Position> {
        let ix = self
            .open_positions
            .iter()
            .position(|p| p.position_id == position_id)?;
        Some(self.open_positions.swap_remove(ix))
    }

    /// ดึง position ที่หมดอายุแล้วออกทั้งหมด — ตัวที่ยังไม่ครบเวลาอยู่ที่เดิม
    pub fn take_expired(&mut self, now: DateTime<Utc>) -> Vec<Position> {
        let mut expired = Vec::new();
        let mut i = 0;
        while i < self.open_positions.len() {
            if self.open_positions[i].is_expired(now) {
                expired.push(self.open_positions.swap_remove(i));
            } else {
                i += 1;
            }
        }
        expired
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Direction;
    use rand::{rngs::StdRng, SeedableRng};

    fn make_session() -> TradingSession {
        let series = PriceSeries::initialize(10, 150.0, StdRng::seed_from_u64(1));
        TradingSession::open(Uuid::new_v4(), "EURUSD", 85.0, series)
    }

    fn make_position(user_id: Uuid, duration_secs: u64) -> Position {
        Position::open(user_id, "EURUSD", Direction::Call, 100.0, 150.0, duration_secs, 85.0)
    }

    #[test]
    fn test_take_position_removes_it() {
        let mut session = make_session();
        let position = make_position(session.user_id, 60);
        let id = position.position_id;
        session.open_positions.push(position);

        let taken = session.take_position(id).unwrap();
        assert_eq!(taken.position_id, id);
        assert!(session.open_positions.is_empty());
        assert!(session.take_position(id).is_none());
    }

    #[test]
    fn test_take_expired_leaves_live_positions() {
        let mut session = make_session();
        let user = session.user_id;

        let mut old = make_position(user, 60);
        old.opened_at -= chrono::Duration::seconds(120);
        let fresh = make_position(user, 60);
        let fresh_id = fresh.position_id;

        session.open_positions.push(old);
        session.open_positions.push(fresh);

        let expired = session.take_expired(Utc::now());
        assert_eq!(expired.len(), 1);
        assert_eq!(session.open_positions.len(), 1);
        assert_eq!(session.open_positions[0].position_id, fresh_id);
    }

    #[test]
    fn test_find_position_mut() {
        let mut session = make_session();
        let position = make_position(session.user_id, 60);
        let id = position.position_id;
        session.open_positions.push(position);

        assert!(session.find_position_mut(id).is_some());
        assert!(session.find_position_mut(Uuid::new_v4()).is_none());
    }
}
