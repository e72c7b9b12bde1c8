//! Core business logic for Nestegg.
//!
//! This crate contains pure business logic with ZERO storage or I/O dependencies.
//! Every function takes already-loaded records and returns values; nothing here
//! mutates its inputs, blocks, or logs.
//!
//! # Modules
//!
//! - `ledger` - Transactions and the account balance fold
//! - `aggregation` - Monthly time series and chart data
//! - `budget` - Budget matching, cap validation and status reporting
//! - `goals` - Income allocation across savings goals and goal progress
//! - `validation` - Input checks shared by all of the above

pub mod aggregation;
pub mod budget;
pub mod goals;
pub mod ledger;
pub mod validation;

pub use validation::InvalidInput;
