//! # storage — In-Memory Store
//!
//! ที่เก็บข้อมูลฝั่ง "บัญชี" ทั้งหมด: users, ประวัติ trade ที่ settle แล้ว,
//! รายการฝาก/ถอน — ทุกอย่างอยู่ในหน่วยความจำ หายหมดเมื่อ restart
//!
//! method เป็น sync ล้วน — caller ถือ `RwLock` จาก `AppState` อยู่แล้ว

use std::collections::HashMap;

use uuid::Uuid;

use crate::models::{Account, Deposit, Position, Withdrawal};

/// Store กลางแบบ in-memory
#[derive(Default)]
pub struct MemStore {
    users:          HashMap<Uuid, Account>,
    /// index จาก username → user_id กัน username ซ้ำแบบ O(1)
    usernames:      HashMap<String, Uuid>,
    settled_trades: Vec<Position>,
    deposits:       Vec<Deposit>,
    withdrawals:    Vec<Withdrawal>,
}

impl MemStore {
    pub fn new() -> Self {
        Self::default()
    }

    // ─── Users ──────────────────────────────────────────────────────────────

    /// สมัคร user ใหม่ — คืน `None` ถ้า username ถูกใช้แล้ว
    pub fn create_user(
        &mut self,
        username: &str,
        email: &str,
        password: &str,
        starting_balance: f64,
    ) -> Option<Account> {
        if self.usernames.contains_key(username) {
            return None;
        }
        let account = Account::new(username, email, password, starting_balance);
        self.usernames.insert(username.to_string(), account.user_id);
        self.users.insert(account.user_id, account.clone());
        Some(account)
    }

    pub fn user(&self, user_id: Uuid) -> Option<&Account> {
        self.users.get(&user_id)
    }

    pub fn user_mut(&mut self, user_id: Uuid) -> Option<&mut Account> {
        self.users.get_mut(&user_id)
    }

    pub fn user_by_name(&self, username: &str) -> Option<&Account> {
        self.usernames.get(username).and_then(|id| self.users.get(id))
    }

    pub fn user_count(&self) -> usize {
        self.users.len()
    }

    // ─── Trade History ──────────────────────────────────────────────────────

    /// เก็บ position ที่ settle แล้วเข้าไปในประวัติ
    pub fn record_settled(&mut self, position: Position) {
        self.settled_trades.push(position);
    }

    /// ประวัติ trade ของ user (เรียงตามลำดับที่ settle)
    pub fn settled_for(&self, user_id: Uuid) -> Vec<Position> {
        self.settled_trades
            .iter()
            .filter(|p| p.user_id == user_id)
            .cloned()
            .collect()
    }

    // ─── Wallet ─────────────────────────────────────────────────────────────

    pub fn record_deposit(&mut self, deposit: Deposit) {
        self.deposits.push(deposit);
    }

    pub fn deposits_for(&self, user_id: Uuid) -> Vec<Deposit> {
        self.deposits
            .iter()
            .filter(|d| d.user_id == user_id)
            .cloned()
            .collect()
    }

    pub fn record_withdrawal(&mut self, withdrawal: Withdrawal) {
        self.withdrawals.push(withdrawal);
    }

    pub fn withdrawals_for(&self, user_id: Uuid) -> Vec<Withdrawal> {
        self.withdrawals
            .iter()
            .filter(|w| w.user_id == user_id)
            .cloned()
            .collect()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Direction, Position};

    #[test]
    fn test_duplicate_username_is_rejected() {
        let mut store = MemStore::new();
        let first = store.create_user("trader1", "a@example.com", "pw", 1000.0);
        assert!(first.is_some());

        let second = store.create_user("trader1", "b@example.com", "pw2", 1000.0);
        assert!(second.is_none());
        assert_eq!(store.user_count(), 1);
    }

    #[test]
    fn test_lookup_by_id_and_name() {
        let mut store = MemStore::new();
        let account = store.create_user("trader1", "a@example.com", "pw", 1000.0).unwrap();

        assert!(store.user(account.user_id).is_some());
        assert_eq!(store.user_by_name("trader1").unwrap().user_id, account.user_id);
        assert!(store.user_by_name("nobody").is_none());
        assert!(store.user(Uuid::new_v4()).is_none());
    }

    #[test]
    fn test_settled_history_is_per_user() {
        let mut store = MemStore::new();
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();

        store.record_settled(Position::open(alice, "EURUSD", Direction::Call, 10.0, 1.0, 60, 85.0));
        store.record_settled(Position::open(bob, "XAUUSD", Direction::Put, 20.0, 1.0, 60, 80.0));
        store.record_settled(Position::open(alice, "EURUSD", Direction::Put, 30.0, 1.0, 60, 85.0));

        assert_eq!(store.settled_for(alice).len(), 2);
        assert_eq!(store.settled_for(bob).len(), 1);
        assert!(store.settled_for(Uuid::new_v4()).is_empty());
    }

    #[test]
    fn test_wallet_entries_are_per_user() {
        let mut store = MemStore::new();
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();

        store.record_deposit(Deposit::new(alice, 100.0, None));
        store.record_deposit(Deposit::new(bob, 200.0, None));
        store.record_withdrawal(Withdrawal::new(alice, 150.0, "bank_transfer"));

        assert_eq!(store.deposits_for(alice).len(), 1);
        assert_eq!(store.deposits_for(bob).len(), 1);
        assert_eq!(store.withdrawals_for(alice).len(), 1);
        assert!(store.withdrawals_for(bob).is_empty());
    }
}
