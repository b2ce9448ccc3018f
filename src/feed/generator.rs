//! # feed::generator — Synthetic Price Series
//!
//! **Random-walk generator** ผลิตแท่งเทียน OHLCV ต่อเนื่องแบบ rolling window
//!
//! ## กลไกต่อ tick
//!
//! ```text
//! trend_bias ──┐ เดินสุ่มทีละนิด + กลับทิศ ~8%
//!              ▼
//! change = trend×vol + noise×vol (+ spike ±2 ~8%)
//!              ▼
//! close  = max(0.1, open + change)     ← ราคาไม่มีวันติดลบ
//!              ▼
//! high/low = body ± ไส้เทียนสุ่ม        ← invariant OHLC ครบโดยโครงสร้าง
//! ```
//!
//! ทุกแท่งออกจากที่นี่พร้อม indicator (RSI / MA20 / MA50 / Bollinger) ครบเสมอ
//! ใส่ seed เดิมได้ลำดับแท่งเดิมเป๊ะ — ใช้ทั้งใน test และโหมด demo

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use rand::{rngs::StdRng, Rng};

use crate::feed::indicators::{
    self, BOLLINGER_PERIOD, MA_FAST_PERIOD, MA_SLOW_PERIOD, RSI_PERIOD,
};
use crate::models::Candle;

// ─── Tuning ───────────────────────────────────────────────────────────────────

/// ระยะเดินสุ่มของ trend bias ต่อ tick (± ครึ่งหนึ่งของค่านี้)
const TREND_DRIFT_STEP: f64 = 0.2;
/// rand > ค่านี้ → trend กลับทิศ (~8% ต่อ tick)
const REVERSAL_THRESHOLD: f64 = 0.92;
/// rand > ค่านี้ → เกิด news spike (~8% ต่อ tick)
const SPIKE_THRESHOLD: f64 = 0.92;
/// ขนาด spike คงที่ ทิศทางสุ่ม 50/50
const SPIKE_MAGNITUDE: f64 = 2.0;
/// เพดานล่างของราคา close
const PRICE_FLOOR: f64 = 0.1;
/// เพดานล่างของไส้เทียนฝั่ง low — ต่ำกว่า PRICE_FLOOR เสมอ
const LOW_FLOOR: f64 = 0.05;
/// ช่วง volume ต่อแท่ง
const VOLUME_MAX: u32 = 10_000;

// ─── Series ───────────────────────────────────────────────────────────────────

/// Price series หนึ่งชุด: rolling window + สถานะ random walk
///
/// ความยาว window คงที่เท่า capacity ตั้งแต่เกิด — แท่งใหม่เข้า แท่งเก่าสุดออก
pub struct PriceSeries {
    window:     VecDeque<Candle>,
    capacity:   usize,
    last_price: f64,
    change_pct: f64,
    trend_bias: f64,
    rng:        StdRng,
}

impl PriceSeries {
    /// สร้าง series ใหม่พร้อมแท่ง backfill ครบ `capacity` แท่ง
    /// เวลาแท่ง backfill ห่างกันแท่งละ 1 นาที ไล่มาจบก่อนตอนนี้
    pub fn initialize(capacity: usize, start_price: f64, rng: StdRng) -> Self {
        let capacity = capacity.max(1);
        let mut series = Self {
            window:     VecDeque::with_capacity(capacity + 1),
            capacity,
            last_price: start_price.max(PRICE_FLOOR),
            change_pct: 0.0,
            trend_bias: 0.0,
            rng,
        };
        series.trend_bias = if series.rng.gen::<f64>() > 0.5 { 1.0 } else { -1.0 };

        let now = Utc::now();
        for offset in 0..capacity {
            let time = now - chrono::Duration::minutes((capacity - offset) as i64);
            let candle = series.next_candle(time);
            series.push(candle);
        }
        series
    }

    /// เดินไปหนึ่งแท่ง: สร้างแท่งใหม่ ดันเข้า window แล้วคืนสำเนาให้ caller
    pub fn tick(&mut self) -> Candle {
        let candle = self.next_candle(Utc::now());
        self.push(candle.clone());
        candle
    }

    /// สร้างแท่งถัดไปและเลื่อนสถานะ random walk ทั้งหมด
    fn next_candle(&mut self, time: DateTime<Utc>) -> Candle {
        // ── 1. Trend bias: เดินสุ่มเล็กๆ ในกรอบ [-1, 1] + โอกาสกลับทิศ ─────────
        self.trend_bias += (self.rng.gen::<f64>() - 0.5) * TREND_DRIFT_STEP;
        self.trend_bias = self.trend_bias.clamp(-1.0, 1.0);
        if self.rng.gen::<f64>() > REVERSAL_THRESHOLD {
            self.trend_bias = -self.trend_bias;
        }

        // ── 2. ระยะขยับ: momentum ตาม trend + noise รอบตัว ──────────────────────
        let volatility = 0.5 + self.rng.gen::<f64>() * 1.5;
        let mut change = self.trend_bias * volatility
            + (self.rng.gen::<f64>() - 0.5) * volatility;

        // ── 3. News spike นานๆ ครั้ง ขนาดคงที่ ───────────────────────────────────
        if self.rng.gen::<f64>() > SPIKE_THRESHOLD {
            change += if self.rng.gen::<f64>() > 0.5 {
                SPIKE_MAGNITUDE
            } else {
                -SPIKE_MAGNITUDE
            };
        }

        // ── 4. ประกอบแท่ง — open ต่อจาก close เดิม, ราคาห้ามหลุด floor ──────────
        let open = self.last_price;
        let close = (open + change).max(PRICE_FLOOR);
        let high = open.max(close) + self.rng.gen::<f64>() * volatility;
        let low = (open.min(close) - self.rng.gen::<f64>() * volatility).max(LOW_FLOOR);
        let volume = self.rng.gen_range(0..VOLUME_MAX);

        self.change_pct = (close - open) / open * 100.0;
        self.last_price = close;

        // ── 5. Indicators จาก closes ใน window + close ของแท่งนี้ ────────────────
        let mut closes: Vec<f64> = self.window.iter().map(|c| c.close).collect();
        closes.push(close);

        let rsi = indicators::rsi(&closes, RSI_PERIOD);
        let ma20 = indicators::moving_average(&closes, MA_FAST_PERIOD);
        let ma50 = indicators::moving_average(&closes, MA_SLOW_PERIOD);
        let bands = indicators::bollinger(&closes, BOLLINGER_PERIOD);
        debug_assert!(bands.lower <= bands.middle && bands.middle <= bands.upper);

        Candle {
            time,
            open,
            high,
            low,
            close,
            volume,
            rsi:      Some(rsi),
            ma20:     Some(ma20),
            ma50:     Some(ma50),
            bb_upper: Some(bands.upper),
            bb_lower: Some(bands.lower),
        }
    }

    fn push(&mut self, candle: Candle) {
        debug_assert!(candle.is_well_formed());
        if self.window.len() >= self.capacity {
            self.window.pop_front();
        }
        self.window.push_back(candle);
    }

    // ─── Read side ──────────────────────────────────────────────────────────

    /// สำเนาแท่งทั้ง window เรียงเก่าไปใหม่
    pub fn snapshot(&self) -> Vec<Candle> {
        self.window.iter().cloned().collect()
    }

    /// close ของแท่งล่าสุด
    #[inline]
    pub fn last_price(&self) -> f64 {
        self.last_price
    }

    /// เปอร์เซ็นต์การขยับของแท่งล่าสุดเทียบกับ close ก่อนหน้า
    #[inline]
    pub fn change_pct(&self) -> f64 {
        self.change_pct
    }

    /// trend bias ปัจจุบัน ช่วง [-1, 1]
    #[inline]
    pub fn trend_bias(&self) -> f64 {
        self.trend_bias
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.window.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.window.is_empty()
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn make_series(capacity: usize, seed: u64) -> PriceSeries {
        PriceSeries::initialize(capacity, 150.0, StdRng::seed_from_u64(seed))
    }

    #[test]
    fn test_window_is_full_from_birth() {
        let series = make_series(50, 42);
        assert_eq!(series.len(), 50);
    }

    #[test]
    fn test_window_never_grows_past_capacity() {
        let mut series = make_series(50, 42);
        for _ in 0..500 {
            series.tick();
        }
        assert_eq!(series.len(), 50);
    }

    #[test]
    fn test_capacity_one_still_works() {
        let mut series = make_series(1, 7);
        assert_eq!(series.len(), 1);
        series.tick();
        assert_eq!(series.len(), 1);
    }

    #[test]
    fn test_every_candle_is_well_formed() {
        let mut series = make_series(50, 7);
        for candle in series.snapshot() {
            assert!(candle.is_well_formed(), "bad seed candle: {candle:?}");
        }
        for _ in 0..500 {
            let candle = series.tick();
            assert!(candle.is_well_formed(), "bad live candle: {candle:?}");
            assert!(candle.close >= PRICE_FLOOR);
            assert!(candle.rsi.is_some() && candle.ma20.is_some());
            assert!(candle.bb_upper.is_some() && candle.bb_lower.is_some());
        }
    }

    #[test]
    fn test_candles_chain_open_to_previous_close() {
        let mut series = make_series(10, 3);
        let mut prev_close = series.snapshot().last().unwrap().close;
        for _ in 0..50 {
            let candle = series.tick();
            assert_eq!(candle.open, prev_close);
            prev_close = candle.close;
        }
    }

    #[test]
    fn test_last_price_tracks_newest_close() {
        let mut series = make_series(50, 11);
        let candle = series.tick();
        assert_eq!(series.last_price(), candle.close);
        assert_eq!(series.snapshot().last().unwrap().close, candle.close);
    }

    #[test]
    fn test_change_pct_matches_last_move() {
        let mut series = make_series(50, 11);
        let before = series.last_price();
        let candle = series.tick();
        let expected = (candle.close - before) / before * 100.0;
        assert_eq!(series.change_pct(), expected);
    }

    #[test]
    fn test_trend_bias_stays_bounded() {
        let mut series = make_series(20, 99);
        for _ in 0..1_000 {
            series.tick();
            let bias = series.trend_bias();
            assert!((-1.0..=1.0).contains(&bias), "bias escaped: {bias}");
        }
    }

    #[test]
    fn test_same_seed_reproduces_identical_series() {
        let mut a = make_series(50, 1234);
        let mut b = make_series(50, 1234);
        for _ in 0..100 {
            assert_eq!(a.tick().close, b.tick().close);
        }
    }

    #[test]
    fn test_different_seeds_diverge() {
        let mut a = make_series(50, 1);
        let mut b = make_series(50, 2);
        let closes_a: Vec<f64> = (0..20).map(|_| a.tick().close).collect();
        let closes_b: Vec<f64> = (0..20).map(|_| b.tick().close).collect();
        assert_ne!(closes_a, closes_b);
    }

    #[test]
    fn test_zero_capacity_clamps_to_one() {
        let series = PriceSeries::initialize(0, 150.0, StdRng::seed_from_u64(5));
        assert_eq!(series.len(), 1);
    }

    #[test]
    fn test_garbage_start_price_clamps_to_floor() {
        let mut series = PriceSeries::initialize(5, -10.0, StdRng::seed_from_u64(5));
        assert!(series.last_price() >= PRICE_FLOOR);
        let candle = series.tick();
        assert!(candle.is_well_formed());
    }
}
