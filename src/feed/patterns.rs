//! # feed::patterns — Candlestick Pattern Scanner
//!
//! สแกนรูปแบบแท่งเทียน 7 แบบจากสามแท่งท้ายสุดของ window
//! เป็น rule-based ล้วนๆ: เงื่อนไขเรขาคณิตของแท่ง + confidence คงที่ต่อ pattern
//! แท่งเดียวกันติดได้หลาย pattern พร้อมกัน — คืนครบทุกตัวที่เข้าเงื่อนไข
//!
//! | Pattern            | ทิศ      | Confidence |
//! |--------------------|----------|------------|
//! | Bullish Engulfing  | BULLISH  | 85         |
//! | Bearish Engulfing  | BEARISH  | 85         |
//! | Hammer             | BULLISH  | 72         |
//! | Shooting Star      | BEARISH  | 72         |
//! | Doji               | BULLISH  | 65         |
//! | Double Bottom      | BULLISH  | 78         |
//! | Double Top         | BEARISH  | 78         |

use serde::Serialize;

use crate::models::Candle;

/// ทิศทางที่ pattern ชี้
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PatternDirection {
    Bullish,
    Bearish,
}

/// Pattern หนึ่งรายการที่ตรวจพบ
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PatternMatch {
    pub name:       &'static str,
    pub direction:  PatternDirection,
    /// ความมั่นใจคงที่ต่อ pattern (0-100) — ไม่ได้มาจากสถิติจริง
    pub confidence: u8,
    pub icon:       &'static str,
}

/// สแกน pattern จากสามแท่งท้ายของ `candles` (เรียงเก่าไปใหม่)
///
/// น้อยกว่าสามแท่ง → ไม่ตรวจเลย คืน vec ว่าง
pub fn detect_patterns(candles: &[Candle]) -> Vec<PatternMatch> {
    let mut found = Vec::new();
    if candles.len() < 3 {
        return found;
    }

    let latest = &candles[candles.len() - 1];
    let prev1  = &candles[candles.len() - 2];
    let prev2  = &candles[candles.len() - 3];

    // ── Bullish Engulfing — แท่งเขียวกลืน body แท่งก่อนหน้าทั้งแท่ง ────────────
    if prev1.close > prev1.open
        && latest.open < latest.close
        && latest.open < prev1.open
        && latest.close > prev1.close
    {
        found.push(PatternMatch {
            name:       "Bullish Engulfing",
            direction:  PatternDirection::Bullish,
            confidence: 85,
            icon:       "📈",
        });
    }

    // ── Bearish Engulfing — ภาพสะท้อนฝั่งแดง ─────────────────────────────────
    if prev1.close < prev1.open
        && latest.open > latest.close
        && latest.open > prev1.open
        && latest.close < prev1.close
    {
        found.push(PatternMatch {
            name:       "Bearish Engulfing",
            direction:  PatternDirection::Bearish,
            confidence: 85,
            icon:       "📉",
        });
    }

    // ── Hammer — แท่งเขียวไส้ล่างยาวเกินสองเท่าของ body ──────────────────────
    if latest.close > latest.open
        && latest.low < latest.open - (latest.close - latest.open) * 2.0
    {
        found.push(PatternMatch {
            name:       "Hammer",
            direction:  PatternDirection::Bullish,
            confidence: 72,
            icon:       "🔨",
        });
    }

    // ── Shooting Star — แท่งแดงไส้บนยาวเกินสองเท่าของ body ───────────────────
    if latest.close < latest.open
        && latest.high > latest.close + (latest.open - latest.close) * 2.0
    {
        found.push(PatternMatch {
            name:       "Shooting Star",
            direction:  PatternDirection::Bearish,
            confidence: 72,
            icon:       "⭐",
        });
    }

    // ── Doji — body เล็กกว่า 10% ของช่วงราคาทั้งแท่ง ─────────────────────────
    if latest.body() < latest.range() * 0.1 {
        found.push(PatternMatch {
            name:       "Doji",
            direction:  PatternDirection::Bullish,
            confidence: 65,
            icon:       "十",
        });
    }

    // ── Double Bottom — low ของแท่งนี้กลับมาแตะ low เมื่อสองแท่งก่อน ───────────
    if (prev2.low - latest.low).abs() < latest.range() * 0.05 {
        found.push(PatternMatch {
            name:       "Double Bottom",
            direction:  PatternDirection::Bullish,
            confidence: 78,
            icon:       "⛰️",
        });
    }

    // ── Double Top — high ของแท่งนี้กลับมาแตะ high เมื่อสองแท่งก่อน ────────────
    if (prev2.high - latest.high).abs() < latest.range() * 0.05 {
        found.push(PatternMatch {
            name:       "Double Top",
            direction:  PatternDirection::Bearish,
            confidence: 78,
            icon:       "🏔️",
        });
    }

    found
}

// ─── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn candle(open: f64, high: f64, low: f64, close: f64) -> Candle {
        Candle {
            time: Utc::now(),
            open,
            high,
            low,
            close,
            volume: 500,
            rsi: None,
            ma20: None,
            ma50: None,
            bb_upper: None,
            bb_lower: None,
        }
    }

    fn names(found: &[PatternMatch]) -> Vec<&'static str> {
        found.iter().map(|p| p.name).collect()
    }

    #[test]
    fn test_needs_three_candles() {
        assert!(detect_patterns(&[]).is_empty());
        assert!(detect_patterns(&[candle(10.0, 10.1, 9.9, 10.0)]).is_empty());
        assert!(detect_patterns(&[
            candle(10.0, 10.1, 9.9, 10.0),
            candle(10.0, 10.1, 9.9, 10.0),
        ])
        .is_empty());
    }

    #[test]
    fn test_quiet_market_yields_nothing() {
        let candles = [
            candle(10.0, 10.5, 9.8, 10.2),
            candle(10.2, 10.45, 10.0, 10.3),
            candle(10.3, 10.55, 10.22, 10.42),
        ];
        assert!(detect_patterns(&candles).is_empty());
    }

    #[test]
    fn test_bullish_engulfing() {
        let candles = [
            candle(10.0, 10.1, 9.9, 10.0),
            candle(10.0, 11.1, 9.9, 11.0),  // แท่งเขียว
            candle(9.5, 11.6, 9.4, 11.5),   // เปิดต่ำกว่า ปิดสูงกว่า — กลืนทั้ง body
        ];
        let found = detect_patterns(&candles);
        assert_eq!(names(&found), vec!["Bullish Engulfing"]);
        assert_eq!(found[0].direction, PatternDirection::Bullish);
        assert_eq!(found[0].confidence, 85);
    }

    #[test]
    fn test_bearish_engulfing() {
        let candles = [
            candle(10.0, 10.1, 9.9, 10.0),
            candle(11.0, 11.1, 9.9, 10.0),  // แท่งแดง
            candle(11.5, 11.6, 9.4, 9.5),   // เปิดสูงกว่า ปิดต่ำกว่า
        ];
        let found = detect_patterns(&candles);
        assert_eq!(names(&found), vec!["Bearish Engulfing"]);
        assert_eq!(found[0].direction, PatternDirection::Bearish);
        assert_eq!(found[0].confidence, 85);
    }

    #[test]
    fn test_hammer() {
        let candles = [
            candle(10.0, 10.2, 9.8, 10.1),
            candle(10.1, 10.2, 9.9, 10.0),
            candle(10.0, 10.6, 8.8, 10.5),  // ไส้ล่าง 1.2 > 2 × body 0.5
        ];
        let found = detect_patterns(&candles);
        assert_eq!(names(&found), vec!["Hammer"]);
        assert_eq!(found[0].confidence, 72);
    }

    #[test]
    fn test_shooting_star() {
        let candles = [
            candle(10.0, 10.2, 9.8, 10.1),
            candle(10.0, 10.2, 9.9, 10.1),
            candle(10.5, 11.2, 9.9, 10.0),  // ไส้บนพุ่งเกินสองเท่าของ body
        ];
        let found = detect_patterns(&candles);
        assert_eq!(names(&found), vec!["Shooting Star"]);
        assert_eq!(found[0].direction, PatternDirection::Bearish);
    }

    #[test]
    fn test_doji() {
        let candles = [
            candle(10.0, 10.6, 9.5, 10.2),
            candle(10.2, 10.3, 10.0, 10.05),
            candle(10.0, 10.27, 9.97, 10.02), // body 0.02 < 10% ของ range 0.3
        ];
        let found = detect_patterns(&candles);
        assert_eq!(names(&found), vec!["Doji"]);
        assert_eq!(found[0].confidence, 65);
    }

    #[test]
    fn test_double_bottom() {
        let candles = [
            candle(10.0, 10.3, 9.62, 10.1),  // low แรก 9.62
            candle(10.2, 10.25, 9.9, 10.0),
            candle(10.0, 10.5, 9.6, 10.4),   // low กลับมาที่ 9.6 (ห่าง 0.02 < tol 0.045)
        ];
        let found = detect_patterns(&candles);
        assert_eq!(names(&found), vec!["Double Bottom"]);
        assert_eq!(found[0].direction, PatternDirection::Bullish);
        assert_eq!(found[0].confidence, 78);
    }

    #[test]
    fn test_double_top() {
        let candles = [
            candle(10.5, 10.77, 10.1, 10.3), // high แรก 10.77
            candle(10.1, 10.35, 10.0, 10.3),
            candle(10.4, 10.75, 9.9, 10.0),  // high กลับมาที่ 10.75
        ];
        let found = detect_patterns(&candles);
        assert_eq!(names(&found), vec!["Double Top"]);
        assert_eq!(found[0].direction, PatternDirection::Bearish);
    }

    #[test]
    fn test_patterns_can_stack_on_one_candle() {
        // Doji body จิ๋ว + low เด้งกลับมาเท่า prev2 → ติดสอง pattern พร้อมกัน
        let candles = [
            candle(10.05, 10.3, 9.99, 10.1),
            candle(10.1, 10.15, 10.0, 10.02),
            candle(10.0, 10.2, 9.985, 10.01),
        ];
        let found = detect_patterns(&candles);
        assert_eq!(names(&found), vec!["Doji", "Double Bottom"]);
    }
}
