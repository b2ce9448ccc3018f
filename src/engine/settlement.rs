//! # engine::settlement
//!
//! **Settlement Engine** — วงจรชีวิตเงินของ binary option position
//!
//! ## กติกาเงิน (ลำดับสำคัญ)
//!
//! ```text
//! เปิด     → หัก stake ออกจาก balance ทันที
//! ชนะ      → คืน stake + กำไร (stake × payout_rate / 100)
//! แพ้      → ไม่คืนอะไรเลย (stake หักไปแล้วตอนเปิด)
//! เสมอ     → ถือว่าแพ้ ทั้ง CALL และ PUT
//! ```
//!
//! settle เกิดได้ครั้งเดียวต่อ position — เรียกซ้ำได้ `PositionAlreadySettled`
//! และผลลัพธ์เดิมไม่ถูกแตะ ไม่ว่าจะมาจาก sweep หรือ early close

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info};

use crate::error::TradeError;
use crate::ledger::Ledger;
use crate::models::{Direction, Position, PositionStatus};
use uuid::Uuid;

// ─── Types ────────────────────────────────────────────────────────────────────

/// ที่มาของการ settle — expiry ปกติ หรือ user ขอปิดก่อนเวลา
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SettleReason {
    Expired,
    EarlyClose,
}

/// ผลการ settle หนึ่งครั้ง
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SettleOutcome {
    pub won:      bool,
    /// กำไรสุทธิ: ชนะ = +stake × rate / 100, แพ้ = -stake
    pub profit:   f64,
    /// จำนวนที่คืนเข้า balance (ชนะ = stake + profit, แพ้ = 0)
    pub credited: f64,
}

// ─── Place ────────────────────────────────────────────────────────────────────

/// เปิด position ใหม่: หัก stake ก่อน แล้วค่อยสร้าง position
///
/// `debit` เป็นด่านตรวจจำนวนเงิน — stake ผิดรูปหรือเงินไม่พอจะไม่มี position
/// เกิดขึ้นเลย และ balance ไม่ขยับ
#[allow(clippy::too_many_arguments)]
pub fn place_position(
    ledger: &mut impl Ledger,
    user_id: Uuid,
    asset: &str,
    direction: Direction,
    stake: f64,
    entry_price: f64,
    duration_secs: u64,
    payout_rate: f64,
) -> Result<Position, TradeError> {
    ledger.debit(stake)?;

    let position = Position::open(
        user_id,
        asset,
        direction,
        stake,
        entry_price,
        duration_secs,
        payout_rate,
    );

    info!(
        position_id = %position.position_id,
        user        = %user_id,
        asset       = %asset,
        direction   = ?direction,
        stake,
        entry_price,
        duration_secs,
        "🚀 [ENGINE] Position opened"
    );

    Ok(position)
}

// ─── Settle ───────────────────────────────────────────────────────────────────

/// ตัดสิน position ที่ `exit_price` แล้วคืนเงินตามผล
///
/// - `reason = Expired`    → ต้องครบ duration จริง ไม่งั้น `PositionNotExpired`
/// - `reason = EarlyClose` → ข้ามเช็ค expiry (user ยอมรับราคาปัจจุบัน)
///
/// position ที่ตัดสินแล้วเรียกซ้ำได้ `PositionAlreadySettled` เสมอ
pub fn settle(
    position: &mut Position,
    ledger: &mut impl Ledger,
    exit_price: f64,
    now: DateTime<Utc>,
    reason: SettleReason,
) -> Result<SettleOutcome, TradeError> {
    // ── 1. Guards ─────────────────────────────────────────────────────────────
    if !position.is_open() {
        debug!(position_id = %position.position_id, "settle skipped: already settled");
        return Err(TradeError::PositionAlreadySettled(position.position_id));
    }
    if reason == SettleReason::Expired && !position.is_expired(now) {
        debug!(
            position_id = %position.position_id,
            remaining_s = position.remaining_secs(now),
            "settle skipped: not expired yet"
        );
        return Err(TradeError::PositionNotExpired(position.position_id));
    }

    // ── 2. ตัดสิน — เปรียบเทียบแบบ strict ทั้งสองฝั่ง: ราคานิ่ง = แพ้ทั้งคู่ ────
    let won = match position.direction {
        Direction::Call => exit_price > position.entry_price,
        Direction::Put  => exit_price < position.entry_price,
    };

    // ── 3. เงินออก: ชนะคืน stake + กำไร, แพ้ไม่มีอะไรคืน ─────────────────────
    let (profit, credited) = if won {
        let profit = position.stake * position.payout_rate / 100.0;
        (profit, position.stake + profit)
    } else {
        (-position.stake, 0.0)
    };
    if credited > 0.0 {
        ledger.credit(credited);
    }

    // ── 4. ปิดสถานะถาวร ───────────────────────────────────────────────────────
    position.status     = if won { PositionStatus::Won } else { PositionStatus::Lost };
    position.exit_price = Some(exit_price);
    position.profit     = Some(profit);
    position.settled_at = Some(now);

    info!(
        position_id = %position.position_id,
        asset       = %position.asset,
        direction   = ?position.direction,
        entry       = position.entry_price,
        exit        = exit_price,
        profit,
        credited,
        reason      = ?reason,
        "{} [ENGINE] Position settled",
        if won { "✅" } else { "⛔" }
    );

    Ok(SettleOutcome { won, profit, credited })
}

// ─── Double Stake ─────────────────────────────────────────────────────────────

/// เพิ่ม stake เป็นสองเท่า — อนุญาตเฉพาะช่วงท้ายก่อนหมดอายุเท่านั้น
///
/// เงื่อนไข: position ยัง OPEN และเหลือเวลา `0 < remaining ≤ window_secs`
/// หักเงินเพิ่มเท่า stake ปัจจุบันก่อน แล้วค่อยคูณสอง — debit ล้มเหลว
/// (เงินไม่พอ) stake เดิมอยู่ครบไม่เปลี่ยน
///
/// คืนค่า stake ใหม่หลังคูณแล้ว
pub fn double_stake(
    position: &mut Position,
    ledger: &mut impl Ledger,
    now: DateTime<Utc>,
    window_secs: u64,
) -> Result<f64, TradeError> {
    if !position.is_open() {
        return Err(TradeError::PositionAlreadySettled(position.position_id));
    }

    let remaining = position.remaining_secs(now);
    if remaining <= 0 || remaining > window_secs as i64 {
        debug!(
            position_id = %position.position_id,
            remaining_s = remaining,
            window_s    = window_secs,
            "double-stake rejected: outside window"
        );
        return Err(TradeError::DoubleWindowClosed(window_secs));
    }

    ledger.debit(position.stake)?;
    position.stake *= 2.0;

    info!(
        position_id = %position.position_id,
        asset       = %position.asset,
        new_stake   = position.stake,
        remaining_s = remaining,
        "🎲 [ENGINE] Stake doubled"
    );

    Ok(position.stake)
}

// ─── Tests ────────────────────────────────────────────────────────────────────
