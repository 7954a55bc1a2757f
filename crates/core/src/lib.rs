//! Core business logic for Captain Ledger.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! Storage and network access enter through traits implemented by outer crates.
//!
//! # Modules
//!
//! - `budget` - Period windows, status evaluation and rollover planning
//! - `currency` - Exchange-rate resolution and conversion
//! - `investment` - ROI and portfolio analytics
//! - `transaction` - Spend and income aggregation

pub mod budget;
pub mod currency;
pub mod investment;
pub mod transaction;
