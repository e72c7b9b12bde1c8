//! Transactions and the account balance.
//!
//! This module implements:
//! - Income and expense transaction records
//! - The balance fold over transaction history

pub mod balance;
pub mod transaction;

pub use balance::{BalanceLedger, LedgerSummary};
pub use transaction::{Transaction, TransactionKind};
