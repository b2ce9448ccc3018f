//! # ledger — Balance Seam
//!
//! จุดตัดระหว่าง settlement engine กับแหล่งเก็บเงินจริง: engine รู้จักแค่
//! `available / debit / credit` — จะเป็นบัญชี in-memory วันนี้หรือ DB วันหน้า
//! engine ไม่ต้องเปลี่ยน
//!
//! กติกาเงิน:
//! - debit ตรวจจำนวนก่อนเสมอ (finite + บวก) แล้วค่อยตรวจยอดคงเหลือ
//! - credit ไม่มีทาง fail — จำนวนที่เข้ามาคำนวณจาก stake ที่ debit ผ่านแล้ว

use crate::error::TradeError;
use crate::models::Account;

/// แหล่งเงินที่ settlement engine หัก/คืนเงินได้
pub trait Ledger {
    /// ยอดใช้ได้ปัจจุบัน
    fn available(&self) -> f64;

    /// หักเงินออก — `InvalidAmount` ถ้าจำนวนผิดรูป, `InsufficientBalance` ถ้าเงินไม่พอ
    fn debit(&mut self, amount: f64) -> Result<(), TradeError>;

    /// คืนเงินเข้า
    fn credit(&mut self, amount: f64);
}

impl Ledger for Account {
    #[inline]
    fn available(&self) -> f64 {
        self.balance
    }

    fn debit(&mut self, amount: f64) -> Result<(), TradeError> {
        // NaN เทียบอะไรก็ false — ต้องเช็ค is_finite ตรงๆ ก่อน
        if !amount.is_finite() || amount <= 0.0 {
            return Err(TradeError::InvalidAmount(amount));
        }
        if amount > self.balance {
            return Err(TradeError::InsufficientBalance {
                requested: amount,
                available: self.balance,
            });
        }
        self.balance -= amount;
        Ok(())
    }

    fn credit(&mut self, amount: f64) {
        debug_assert!(amount.is_finite() && amount >= 0.0);
        self.balance += amount;
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
