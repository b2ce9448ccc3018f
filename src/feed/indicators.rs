//! # feed::indicators — Technical Indicators
//!
//! RSI / Moving Average / Bollinger Bands คำนวณจากราคาปิดล้วนๆ
//! ทุกฟังก์ชันเป็น pure function กิน slice ของ closes — ไม่แตะ state อื่น
//!
//! กติกาช่วงข้อมูลสั้น (แท่งยังไม่พอ):
//! - RSI       → คืนค่ากลาง 50
//! - MA        → คืน close ล่าสุด (series ว่าง → 0)
//! - Bollinger → คืนศูนย์ทั้งสามเส้น

/// จำนวนแท่งสำหรับ RSI
pub const RSI_PERIOD: usize = 14;
/// จำนวนแท่งสำหรับ MA เส้นเร็ว
pub const MA_FAST_PERIOD: usize = 20;
/// จำนวนแท่งสำหรับ MA เส้นช้า
pub const MA_SLOW_PERIOD: usize = 50;
/// จำนวนแท่งสำหรับ Bollinger Bands
pub const BOLLINGER_PERIOD: usize = 20;

/// Relative Strength Index ช่วง [0, 100]
///
/// ใช้ delta ล่าสุด `period` ตัว (ต้องมี closes อย่างน้อย period + 1)
/// - ข้อมูลไม่พอ → 50 (กลาง)
/// - ไม่มีฝั่งขาดทุนเลย → 100
pub fn rsi(closes: &[f64], period: usize) -> f64 {
    if closes.len() < period + 1 {
        return 50.0;
    }

    let window = &closes[closes.len() - (period + 1)..];
    let mut gains  = 0.0;
    let mut losses = 0.0;
    for pair in window.windows(2) {
        let diff = pair[1] - pair[0];
        if diff >= 0.0 {
            gains += diff;
        } else {
            losses -= diff;
        }
    }

    let avg_gain = gains / period as f64;
    let avg_loss = losses / period as f64;

    if avg_loss == 0.0 {
        return 100.0;
    }
    let rs = avg_gain / avg_loss;
    100.0 - 100.0 / (1.0 + rs)
}

/// Simple Moving Average ของ closes ล่าสุด `period` ตัว
///
/// closes สั้นกว่า period → คืน close ล่าสุดแทน (ว่าง → 0)
pub fn moving_average(closes: &[f64], period: usize) -> f64 {
    if closes.is_empty() {
        return 0.0;
    }
    if closes.len() < period {
        return closes[closes.len() - 1];
    }
    let window = &closes[closes.len() - period..];
    window.iter().sum::<f64>() / period as f64
}

/// Bollinger Bands: SMA ± 2 × population std-dev
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BollingerBands {
    pub upper:  f64,
    pub middle: f64,
    pub lower:  f64,
}

/// คำนวณ Bollinger Bands จาก closes ล่าสุด `period` ตัว
///
/// closes ไม่พอ → ศูนย์ทั้งสามเส้น (ฝั่ง UI ซ่อน band ที่เป็นศูนย์เอง)
pub fn bollinger(closes: &[f64], period: usize) -> BollingerBands {
    if closes.len() < period {
        return BollingerBands { upper: 0.0, middle: 0.0, lower: 0.0 };
    }

    let window = &closes[closes.len() - period..];
    let middle = window.iter().sum::<f64>() / period as f64;
    let variance =
        window.iter().map(|c| (c - middle).powi(2)).sum::<f64>() / period as f64;
    let std_dev = variance.sqrt();

    BollingerBands {
        upper:  middle + 2.0 * std_dev,
        middle,
        lower:  middle - 2.0 * std_dev,
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rsi_neutral_when_data_short() {
        let closes: Vec<f64> = (0..13).map(|i| 100.0 + i as f64).collect();
        assert_eq!(rsi(&closes, 14), 50.0);

        // พอดี period เป๊ะก็ยังไม่พอ — ต้องมี period + 1 closes ถึงจะได้ delta ครบ
        let closes: Vec<f64> = (0..14).map(|i| 100.0 + i as f64).collect();
        assert_eq!(rsi(&closes, 14), 50.0);
    }

    #[test]
    fn test_rsi_pure_rally_hits_100() {
        let closes: Vec<f64> = (0..15).map(|i| 100.0 + i as f64).collect();
        assert_eq!(rsi(&closes, 14), 100.0);
    }

    #[test]
    fn test_rsi_pure_selloff_hits_0() {
        let closes: Vec<f64> = (0..15).map(|i| 200.0 - i as f64).collect();
        assert_eq!(rsi(&closes, 14), 0.0);
    }

    #[test]
    fn test_rsi_balanced_swings_sit_at_50() {
        // สลับ +1/-1 จำนวน delta เท่ากันพอดี → gains == losses → RSI = 50
        let mut closes = vec![100.0];
        for i in 0..14 {
            let last = *closes.last().unwrap();
            closes.push(if i % 2 == 0 { last + 1.0 } else { last - 1.0 });
        }
        assert_eq!(rsi(&closes, 14), 50.0);
    }

    #[test]
    fn test_rsi_stays_in_bounds() {
        let closes = vec![
            100.0, 101.5, 100.8, 102.2, 103.0, 102.1, 104.4, 103.9, 105.0, 104.2,
            106.1, 105.5, 107.0, 106.3, 108.2,
        ];
        let value = rsi(&closes, 14);
        assert!(value > 0.0 && value < 100.0, "rsi out of bounds: {value}");
    }

    #[test]
    fn test_ma_empty_series_is_zero() {
        assert_eq!(moving_average(&[], 20), 0.0);
    }

    #[test]
    fn test_ma_short_series_returns_last_close() {
        assert_eq!(moving_average(&[5.0, 7.25], 20), 7.25);
    }

    #[test]
    fn test_ma_exact_window_mean() {
        let closes = [1.0, 2.0, 3.0, 4.0, 5.0];
        assert_eq!(moving_average(&closes, 5), 3.0);
    }

    #[test]
    fn test_ma_uses_only_recent_window() {
        // ตัวแรก (100) ต้องไม่ถูกนับ
        let closes = [100.0, 2.0, 4.0, 6.0];
        assert_eq!(moving_average(&closes, 3), 4.0);
    }

    #[test]
    fn test_bollinger_short_series_is_zeroed() {
        let bands = bollinger(&[1.0, 2.0, 3.0], 20);
        assert_eq!(bands, BollingerBands { upper: 0.0, middle: 0.0, lower: 0.0 });
    }

    #[test]
    fn test_bollinger_flat_series_collapses_to_sma() {
        let closes = [5.0; 20];
        let bands = bollinger(&closes, 20);
        assert_eq!(bands.middle, 5.0);
        assert_eq!(bands.upper, 5.0);
        assert_eq!(bands.lower, 5.0);
    }

    #[test]
    fn test_bollinger_bands_are_symmetric() {
        let closes = [2.0, 4.0, 6.0, 8.0];
        let bands = bollinger(&closes, 4);
        assert_eq!(bands.middle, 5.0);
        assert!(bands.upper > bands.middle && bands.middle > bands.lower);
        let spread_up   = bands.upper - bands.middle;
        let spread_down = bands.middle - bands.lower;
        assert!((spread_up - spread_down).abs() < 1e-9);
    }

    #[test]
    fn test_bollinger_ignores_old_closes() {
        let with_prefix = bollinger(&[999.0, 2.0, 4.0, 6.0, 8.0], 4);
        let bare        = bollinger(&[2.0, 4.0, 6.0, 8.0], 4);
        assert_eq!(with_prefix, bare);
    }
}
