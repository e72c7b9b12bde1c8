//! Category budgets: matching, cap validation and status reporting.

pub mod service;
pub mod types;


pub use service::BudgetValidator;
pub use types::{Budget, BudgetStatus, CapStatus, ValidationOutcome};
