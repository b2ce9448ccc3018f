//! Position lifecycle engine — place, settle, double-stake

pub mod settlement;
