//! Core domain types and logic.

pub mod ohlcv;
pub mod indicator;
pub mod indicator_set;
pub mod snapshot;
pub mod screening;
pub mod gain;
pub mod params;
pub mod charts;
pub mod session;
pub mod dashboard;
pub mod error;
