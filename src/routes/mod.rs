//! HTTP + WebSocket route handlers ของ Updown API

pub mod account;
pub mod market;
pub mod monitor;
pub mod trades;
