//! # routes::account
//!
//! บัญชี demo + wallet — สมัคร, ดูข้อมูล, ฝาก, ถอน
//!
//! ## Endpoints
//!
//! | Method | Path                   | Description                             |
//! |--------|------------------------|-----------------------------------------|
//! | POST   | `/api/auth/register`   | เปิดบัญชี demo ใหม่                       |
//! | GET    | `/api/user/:id`        | ข้อมูลบัญชี (ไม่มี password)              |
//! | POST   | `/api/deposits`        | ฝากเงิน — เครดิตทันที                     |
//! | GET    | `/api/deposits/:id`    | รายการฝากของ user                        |
//! | POST   | `/api/withdrawals`     | ถอนเงิน — หักทันที ค้างสถานะ PENDING      |
//! | GET    | `/api/withdrawals/:id` | รายการถอนของ user                        |

use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use crate::error::AppError;
use crate::ledger::Ledger;
use crate::models::{Deposit, Withdrawal};
use crate::state::SharedState;

// ─── Request Payloads ─────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email:    String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct DepositRequest {
    pub user_id:   Uuid,
    pub amount:    f64,
    #[serde(default)]
    pub reference: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct WithdrawalRequest {
    pub user_id: Uuid,
    pub amount:  f64,
    pub method:  String,
}

// ─── Auth / Profile ───────────────────────────────────────────────────────────

/// POST /api/auth/register — เปิดบัญชี demo พร้อม balance เริ่มต้น
pub async fn register(
    State(state): State<SharedState>,
    Json(req): Json<RegisterRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    // ── 1. Validate ──────────────────────────────────────────────────────────
    let username = req.username.trim();
    if username.is_empty() {
        return Err(AppError::BadRequest("Username must not be empty".into()));
    }

    // ── 2. สร้างบัญชี — store กัน username ซ้ำให้ ──────────────────────────────
    let mut store = state.store.write().await;
    let account = store
        .create_user(username, &req.email, &req.password, state.config.starting_balance)
        .ok_or_else(|| AppError::Conflict(format!("Username '{username}' is already taken")))?;

    info!(
        user     = %account.user_id,
        username = %account.username,
        balance  = account.balance,
        "🙋 Account registered"
    );

    Ok(Json(json!({
        "ok":   true,
        "user": account,
    })))
}

/// GET /api/user/:id — ข้อมูลบัญชี (password ไม่ serialize ออกไป)
pub async fn get_user(
    State(state): State<SharedState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    let store = state.store.read().await;
    let account = store
        .user(user_id)
        .ok_or_else(|| AppError::NotFound(format!("User {user_id} not found")))?;

    Ok(Json(json!({
        "ok":   true,
        "user": account,
    })))
}

// ─── Wallet ───────────────────────────────────────────────────────────────────

/// POST /api/deposits — ฝากเงิน demo เครดิตเข้า balance ทันที
pub async fn create_deposit(
    State(state): State<SharedState>,
    Json(req): Json<DepositRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    // ── 1. Validate จำนวน — NaN หลุดเครื่องหมาย < ได้ ต้องเช็ค finite เอง ──────
    let floor = state.config.min_deposit;
    if !req.amount.is_finite() || req.amount < floor {
        return Err(AppError::BadRequest(format!("Minimum deposit is ${floor:.2}")));
    }

    // ── 2. เครดิต + บันทึกรายการ ──────────────────────────────────────────────
    let mut store = state.store.write().await;
    let account = store
        .user_mut(req.user_id)
        .ok_or_else(|| AppError::NotFound(format!("User {} not found", req.user_id)))?;

    account.credit(req.amount);
    let balance = account.balance;

    let deposit = Deposit::new(req.user_id, req.amount, req.reference);
    info!(
        user    = %deposit.user_id,
        amount  = deposit.amount,
        balance,
        "💰 Deposit credited"
    );
    store.record_deposit(deposit.clone());

    Ok(Json(json!({
        "ok":      true,
        "deposit": deposit,
        "balance": balance,
    })))
}

/// GET /api/deposits/:id — รายการฝากทั้งหมดของ user
pub async fn list_deposits(
    State(state): State<SharedState>,
    Path(user_id): Path<Uuid>,
) -> impl IntoResponse {
    let store = state.store.read().await;
    let deposits = store.deposits_for(user_id);

    Json(json!({
        "ok":       true,
        "count":    deposits.len(),
        "deposits": deposits,
    }))
}

/// POST /api/withdrawals — ถอนเงิน demo หักจาก balance ทันที
pub async fn create_withdrawal(
    State(state): State<SharedState>,
    Json(req): Json<WithdrawalRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    // ── 1. Validate จำนวน ─────────────────────────────────────────────────────
    let floor = state.config.min_withdrawal;
    if !req.amount.is_finite() || req.amount < floor {
        return Err(AppError::BadRequest(format!("Minimum withdrawal is ${floor:.2}")));
    }

    // ── 2. หักเงิน — debit เป็นคนตรวจยอดคงเหลือ ────────────────────────────────
    let mut store = state.store.write().await;
    let account = store
        .user_mut(req.user_id)
        .ok_or_else(|| AppError::NotFound(format!("User {} not found", req.user_id)))?;

    account.debit(req.amount)?;
    let balance = account.balance;

    let withdrawal = Withdrawal::new(req.user_id, req.amount, &req.method);
    info!(
        user    = %withdrawal.user_id,
        amount  = withdrawal.amount,
        balance,
        "🏧 Withdrawal queued"
    );
    store.record_withdrawal(withdrawal.clone());

    Ok(Json(json!({
        "ok":         true,
        "withdrawal": withdrawal,
        "balance":    balance,
    })))
}

/// GET /api/withdrawals/:id — รายการถอนทั้งหมดของ user
pub async fn list_withdrawals(
    State(state): State<SharedState>,
    Path(user_id): Path<Uuid>,
) -> impl IntoResponse {
    let store = state.store.read().await;
    let withdrawals = store.withdrawals_for(user_id);

    Json(json!({
        "ok":          true,
        "count":       withdrawals.len(),
        "withdrawals": withdrawals,
    }))
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
