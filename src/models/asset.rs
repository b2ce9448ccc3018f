//! # models::asset — Tradable Asset Catalog
//!
//! รายการ asset ทั้งหมดที่เปิดให้เทรด พร้อม payout rate ต่อ asset
//! catalog คงที่ฝังในไบนารี — ไม่มี API เพิ่ม/ลด asset ตอนรัน

use serde::Serialize;

/// กลุ่มของ asset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AssetClass {
    Forex,
    Crypto,
    Commodity,
    Index,
    Stock,
}

/// Asset หนึ่งตัวใน catalog
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Asset {
    pub symbol:      &'static str,
    pub name:        &'static str,
    pub class:       AssetClass,
    /// เปอร์เซ็นต์จ่ายของ stake เมื่อชนะ
    pub payout_rate: f64,
}

const fn asset(
    symbol: &'static str,
    name: &'static str,
    class: AssetClass,
    payout_rate: f64,
) -> Asset {
    Asset { symbol, name, class, payout_rate }
}

/// Catalog ทั้งหมด — เรียงตามกลุ่ม
pub const ASSETS: &[Asset] = &[
    // ── Forex ────────────────────────────────────────────────────────────
    asset("EURUSD", "EUR/USD",            AssetClass::Forex,     85.0),
    asset("GBPUSD", "GBP/USD",            AssetClass::Forex,     82.0),
    asset("USDJPY", "USD/JPY",            AssetClass::Forex,     78.0),
    asset("USDCHF", "USD/CHF",            AssetClass::Forex,     80.0),
    asset("AUDUSD", "AUD/USD",            AssetClass::Forex,     72.0),
    asset("USDCAD", "USD/CAD",            AssetClass::Forex,     75.0),
    asset("NZDUSD", "NZD/USD",            AssetClass::Forex,     68.0),
    asset("EURGBP", "EUR/GBP",            AssetClass::Forex,     70.0),
    asset("EURJPY", "EUR/JPY",            AssetClass::Forex,     76.0),
    asset("GBPJPY", "GBP/JPY",            AssetClass::Forex,     74.0),
    // ── Crypto ───────────────────────────────────────────────────────────
    asset("BTCUSD", "Bitcoin",            AssetClass::Crypto,    75.0),
    asset("ETHUSD", "Ethereum",           AssetClass::Crypto,    70.0),
    asset("XRPUSD", "Ripple",             AssetClass::Crypto,    65.0),
    asset("LTCUSD", "Litecoin",           AssetClass::Crypto,    62.0),
    asset("BCHUSD", "Bitcoin Cash",       AssetClass::Crypto,    68.0),
    asset("ADAUSD", "Cardano",            AssetClass::Crypto,    60.0),
    asset("SOLUSD", "Solana",             AssetClass::Crypto,    72.0),
    asset("DOGUSD", "Dogecoin",           AssetClass::Crypto,    58.0),
    // ── Commodities ──────────────────────────────────────────────────────
    asset("XAUUSD", "Gold",               AssetClass::Commodity, 80.0),
    asset("XAGUSD", "Silver",             AssetClass::Commodity, 68.0),
    asset("USOIL",  "Crude Oil (WTI)",    AssetClass::Commodity, 76.0),
    asset("UKOIL",  "Brent Oil",          AssetClass::Commodity, 74.0),
    asset("NATGAS", "Natural Gas",        AssetClass::Commodity, 65.0),
    asset("COPPER", "Copper",             AssetClass::Commodity, 70.0),
    asset("XPTUSD", "Platinum",           AssetClass::Commodity, 72.0),
    asset("XPDUSD", "Palladium",          AssetClass::Commodity, 75.0),
    // ── Indices ──────────────────────────────────────────────────────────
    asset("US500",  "S&P 500",            AssetClass::Index,     88.0),
    asset("NAS100", "NASDAQ 100",         AssetClass::Index,     85.0),
    asset("GER40",  "DAX 40",             AssetClass::Index,     82.0),
    asset("UK100",  "FTSE 100",           AssetClass::Index,     80.0),
    asset("FRA40",  "CAC 40",             AssetClass::Index,     78.0),
    asset("JPN225", "Nikkei 225",         AssetClass::Index,     76.0),
    asset("AUS200", "ASX 200",            AssetClass::Index,     74.0),
    asset("KOR200", "KOSPI 200",          AssetClass::Index,     72.0),
    // ── Stocks ───────────────────────────────────────────────────────────
    asset("AAPL",   "Apple",              AssetClass::Stock,     85.0),
    asset("GOOGL",  "Alphabet",           AssetClass::Stock,     88.0),
    asset("TSLA",   "Tesla",              AssetClass::Stock,     92.0),
    asset("MSFT",   "Microsoft",          AssetClass::Stock,     87.0),
    asset("AMZN",   "Amazon",             AssetClass::Stock,     86.0),
    asset("META",   "Meta Platforms",     AssetClass::Stock,     80.0),
    asset("NVDA",   "NVIDIA",             AssetClass::Stock,     90.0),
    asset("AMD",    "Advanced Micro Devices", AssetClass::Stock, 82.0),
];

/// หา asset จาก symbol (exact match)
pub fn find_asset(symbol: &str) -> Option<&'static Asset> {
    ASSETS.iter().find(|a| a.symbol == symbol)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_find_known_asset() {
        let gold = find_asset("XAUUSD").unwrap();
        assert_eq!(gold.name, "Gold");
        assert_eq!(gold.class, AssetClass::Commodity);
        assert_eq!(gold.payout_rate, 80.0);
    }

    #[test]
    fn test_find_unknown_asset_is_none() {
        assert!(find_asset("XXXYYY").is_none());
        assert!(find_asset("eurusd").is_none()); // ต้อง exact match ตัวพิมพ์ใหญ่
    }

    #[test]
    fn test_symbols_are_unique() {
        let mut seen = HashSet::new();
        for a in ASSETS {
            assert!(seen.insert(a.symbol), "duplicate symbol: {}", a.symbol);
        }
    }

    #[test]
    fn test_payout_rates_are_sane() {
        for a in ASSETS {
            assert!(
                a.payout_rate > 0.0 && a.payout_rate < 100.0,
                "{} payout out of range: {}",
                a.symbol,
                a.payout_rate
            );
        }
    }
}
