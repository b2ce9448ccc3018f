//! # models::account — User Account & Wallet Entries
//!
//! บัญชี demo ของ user หนึ่งคน พร้อมรายการฝาก/ถอนแบบ in-memory
//! balance เป็น f64 ธรรมดา — simulator ไม่ใช่ระบบบัญชีจริง

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// สถานะของรายการฝาก/ถอน
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransferStatus {
    /// รอดำเนินการ (ฝั่งถอน — เงินถูกกันออกจาก balance แล้ว)
    Pending,
    /// เสร็จสมบูรณ์ (ฝั่งฝาก — เงินเข้า balance ทันที)
    Completed,
}

/// บัญชี demo หนึ่งบัญชี
#[derive(Debug, Clone, Serialize)]
pub struct Account {
    pub user_id:    Uuid,
    pub username:   String,
    pub email:      String,
    /// เก็บ plaintext เพราะเป็น demo — ห้าม serialize ออก API
    #[serde(skip_serializing)]
    pub password:   String,
    pub balance:    f64,
    pub created_at: DateTime<Utc>,
}

impl Account {
    pub fn new(username: &str, email: &str, password: &str, starting_balance: f64) -> Self {
        Self {
            user_id:    Uuid::new_v4(),
            username:   username.to_string(),
            email:      email.to_string(),
            password:   password.to_string(),
            balance:    starting_balance,
            created_at: Utc::now(),
        }
    }
}

/// รายการฝากเงิน demo — เครดิตเข้า balance ทันทีที่รับคำขอ
#[derive(Debug, Clone, Serialize)]
pub struct Deposit {
    pub deposit_id: Uuid,
    pub user_id:    Uuid,
    pub amount:     f64,
    pub reference:  Option<String>,
    pub status:     TransferStatus,
    pub created_at: DateTime<Utc>,
}

impl Deposit {
    pub fn new(user_id: Uuid, amount: f64, reference: Option<String>) -> Self {
        Self {
            deposit_id: Uuid::new_v4(),
            user_id,
            amount,
            reference,
            status:     TransferStatus::Completed,
            created_at: Utc::now(),
        }
    }
}

/// รายการถอนเงิน demo — หักออกจาก balance ทันที แล้วค้างสถานะ PENDING
#[derive(Debug, Clone, Serialize)]
pub struct Withdrawal {
    pub withdrawal_id: Uuid,
    pub user_id:       Uuid,
    pub amount:        f64,
    pub method:        String,
    pub status:        TransferStatus,
    pub created_at:    DateTime<Utc>,
}

impl Withdrawal {
    pub fn new(user_id: Uuid, amount: f64, method: &str) -> Self {
        Self {
            withdrawal_id: Uuid::new_v4(),
            user_id,
            amount,
            method:        method.to_string(),
            status:        TransferStatus::Pending,
            created_at:    Utc::now(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
