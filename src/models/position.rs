//! # models::position — Binary Option Position
//!
//! Position หนึ่งรายการของ user: ทายทิศทางราคา (CALL/PUT) ด้วยเงินเดิมพันคงที่
//! ภายในเวลาที่กำหนด — ตัดสินแพ้ชนะครั้งเดียวตอน settle แล้วห้ามแก้ไขอีก

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// ทิศทางที่ user ทาย: CALL = ราคาขึ้น, PUT = ราคาลง
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Direction {
    Call,
    Put,
}

/// สถานะของ position — OPEN จนกว่าจะ settle แล้วจบที่ WON หรือ LOST เท่านั้น
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PositionStatus {
    Open,
    Won,
    Lost,
}

/// Binary option position หนึ่งรายการ
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Position {
    pub position_id:   Uuid,
    pub user_id:       Uuid,
    pub asset:         String,
    pub direction:     Direction,
    /// เงินเดิมพัน — ถูกหักจาก balance ตั้งแต่ตอนเปิด
    pub stake:         f64,
    pub entry_price:   f64,
    pub duration_secs: u64,
    /// อัตราจ่ายเป็นเปอร์เซ็นต์ของ stake เมื่อชนะ (เช่น 85.0)
    pub payout_rate:   f64,
    pub status:        PositionStatus,
    pub opened_at:     DateTime<Utc>,

    // เติมค่าตอน settle เท่านั้น
    pub exit_price:    Option<f64>,
    /// กำไรสุทธิ: +stake × rate / 100 เมื่อชนะ, -stake เมื่อแพ้
    pub profit:        Option<f64>,
    pub settled_at:    Option<DateTime<Utc>>,
}

impl Position {
    /// สร้าง position ใหม่สถานะ OPEN — ฝั่ง engine เป็นคนหัก stake ก่อนเรียก
    pub fn open(
        user_id: Uuid,
        asset: &str,
        direction: Direction,
        stake: f64,
        entry_price: f64,
        duration_secs: u64,
        payout_rate: f64,
    ) -> Self {
        Self {
            position_id:   Uuid::new_v4(),
            user_id,
            asset:         asset.to_string(),
            direction,
            stake,
            entry_price,
            duration_secs,
            payout_rate,
            status:        PositionStatus::Open,
            opened_at:     Utc::now(),
            exit_price:    None,
            profit:        None,
            settled_at:    None,
        }
    }

    /// เวลาหมดอายุของ position
    #[inline]
    pub fn expires_at(&self) -> DateTime<Utc> {
        self.opened_at + chrono::Duration::seconds(self.duration_secs as i64)
    }

    /// หมดเวลาแล้วหรือยัง (ครบ duration พอดีนับว่าหมด)
    #[inline]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at()
    }

    /// วินาทีที่เหลือก่อนหมดอายุ — ติดลบได้ถ้าเลยเวลามาแล้ว
    #[inline]
    pub fn remaining_secs(&self, now: DateTime<Utc>) -> i64 {
        (self.expires_at() - now).num_seconds()
    }

    #[inline]
    pub fn is_open(&self) -> bool {
        self.status == PositionStatus::Open
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn make_position(duration_secs: u64) -> Position {
        Position::open(
            Uuid::new_v4(),
            "EURUSD",
            Direction::Call,
            100.0,
            150.0,
            duration_secs,
            85.0,
        )
    }

    #[test]
    fn test_new_position_starts_open() {
        let p = make_position(60);
        assert_eq!(p.status, PositionStatus::Open);
        assert!(p.is_open());
        assert!(p.exit_price.is_none());
        assert!(p.profit.is_none());
        assert!(p.settled_at.is_none());
    }

    #[test]
    fn test_expiry_boundary_is_inclusive() {
        let p = make_position(60);
        let just_before = p.opened_at + chrono::Duration::seconds(59);
        let exactly     = p.opened_at + chrono::Duration::seconds(60);
        let after       = p.opened_at + chrono::Duration::seconds(61);

        assert!(!p.is_expired(just_before));
        assert!(p.is_expired(exactly));
        assert!(p.is_expired(after));
    }

    #[test]
    fn test_remaining_secs_counts_down() {
        let p = make_position(60);
        let mid = p.opened_at + chrono::Duration::seconds(45);
        assert_eq!(p.remaining_secs(mid), 15);

        let late = p.opened_at + chrono::Duration::seconds(70);
        assert!(p.remaining_secs(late) < 0);
    }

    #[test]
    fn test_direction_serializes_screaming_snake() {
        let call = serde_json::to_string(&Direction::Call).unwrap();
        let put  = serde_json::to_string(&Direction::Put).unwrap();
        assert_eq!(call, "\"CALL\"");
        assert_eq!(put, "\"PUT\"");
    }
}
