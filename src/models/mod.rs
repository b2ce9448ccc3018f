//! Domain models shared across the entire Updown system.

pub mod account;
pub mod asset;
pub mod candle;
pub mod position;

#[allow(unused_imports)]
pub use account::{Account, Deposit, TransferStatus, Withdrawal};
pub use asset::{find_asset, Asset, AssetClass, ASSETS};
pub use candle::Candle;
pub use position::{Direction, Position, PositionStatus};
