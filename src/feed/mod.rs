//! Synthetic market feed — price generator, indicators, pattern scanner

pub mod generator;
pub mod indicators;
pub mod patterns;
