//! # models::candle — OHLCV Candle
//!
//! แท่งเทียนหนึ่งแท่งใน price series พร้อม indicator ที่คำนวณ ณ จุดปิดแท่ง
//! feed generator เติม indicator ให้ครบทุกแท่งเสมอ — ฝั่ง Option มีไว้รองรับ
//! แท่งดิบ (เช่น payload จาก client หรือ fixture ใน test) ที่ยังไม่ผ่าน generator

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// แท่งเทียน OHLCV หนึ่งแท่ง + ค่า indicator ณ เวลาปิดแท่ง
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Candle {
    pub time:   DateTime<Utc>,
    pub open:   f64,
    pub high:   f64,
    pub low:    f64,
    pub close:  f64,
    pub volume: u32,

    // Indicators (generator เติมให้เสมอ / แท่งดิบอาจว่าง)
    #[serde(default)]
    pub rsi:      Option<f64>,
    #[serde(default)]
    pub ma20:     Option<f64>,
    #[serde(default)]
    pub ma50:     Option<f64>,
    #[serde(default)]
    pub bb_upper: Option<f64>,
    #[serde(default)]
    pub bb_lower: Option<f64>,
}

impl Candle {
    /// ตรวจโครงสร้างแท่ง: low ≤ min(open, close), high ≥ max(open, close)
    /// และราคาทุกตัวเป็นจำนวนบวก finite
    #[inline]
    pub fn is_well_formed(&self) -> bool {
        let prices = [self.open, self.high, self.low, self.close];
        prices.iter().all(|p| p.is_finite() && *p > 0.0)
            && self.low <= self.open.min(self.close)
            && self.high >= self.open.max(self.close)
    }

    /// ขนาด body (ไม่รวมไส้เทียน)
    #[inline]
    pub fn body(&self) -> f64 {
        (self.close - self.open).abs()
    }

    /// ช่วงราคาทั้งแท่ง high - low
    #[inline]
    pub fn range(&self) -> f64 {
        self.high - self.low
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn make_candle(open: f64, high: f64, low: f64, close: f64) -> Candle {
        Candle {
            time: Utc::now(),
            open,
            high,
            low,
            close,
            volume: 1_000,
            rsi: None,
            ma20: None,
            ma50: None,
            bb_upper: None,
            bb_lower: None,
        }
    }

    #[test]
    fn test_well_formed_accepts_valid_candle() {
        let c = make_candle(100.0, 102.5, 99.0, 101.0);
        assert!(c.is_well_formed());
    }

    #[test]
    fn test_well_formed_rejects_high_below_body() {
        let c = make_candle(100.0, 100.5, 99.0, 101.0);
        assert!(!c.is_well_formed());
    }

    #[test]
    fn test_well_formed_rejects_low_above_body() {
        let c = make_candle(100.0, 102.0, 100.5, 101.0);
        assert!(!c.is_well_formed());
    }

    #[test]
    fn test_well_formed_rejects_non_positive_price() {
        let c = make_candle(0.0, 1.0, 0.0, 0.5);
        assert!(!c.is_well_formed());
        let nan = make_candle(f64::NAN, 1.0, 0.1, 0.5);
        assert!(!nan.is_well_formed());
    }

    #[test]
    fn test_body_and_range() {
        let c = make_candle(100.0, 103.0, 98.0, 101.5);
        assert_eq!(c.body(), 1.5);
        assert_eq!(c.range(), 5.0);
    }
}
