//! Input validation for records handed to the engine.
//!
//! Malformed records are rejected before any computation runs. Expected,
//! recoverable outcomes such as a budget overrun are not errors and live in
//! `budget::ValidationOutcome` instead.

use chrono::NaiveDate;
use nestegg_shared::AppError;
use nestegg_shared::types::Money;
use rust_decimal::Decimal;
use thiserror::Error;

use crate::budget::Budget;
use crate::goals::Goal;
use crate::ledger::{Transaction, TransactionKind};

/// Malformed input rejected before computation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidInput {
    /// A field that must be strictly positive is zero or negative.
    #[error("{field} must be greater than zero, got {value}")]
    NonPositiveAmount {
        /// Name of the offending field.
        field: &'static str,
        /// The rejected value.
        value: Money,
    },

    /// A field that must not be negative is negative.
    #[error("{field} cannot be negative, got {value}")]
    NegativeAmount {
        /// Name of the offending field.
        field: &'static str,
        /// The rejected value.
        value: Money,
    },

    /// Window start is after its end.
    #[error("Invalid date range: start {start} is after end {end}")]
    InvalidDateRange {
        /// Start date.
        start: NaiveDate,
        /// End date.
        end: NaiveDate,
    },

    /// Contribution percentage outside [0, 100].
    #[error("Contribution percentage must be between 0 and 100, got {0}")]
    PercentageOutOfRange(Decimal),

    /// Income stored amount exceeds its pre-allocation amount.
    #[error("Original amount {original} is below stored amount {amount}")]
    OriginalBelowAmount {
        /// Pre-allocation amount.
        original: Money,
        /// Stored amount.
        amount: Money,
    },

    /// Only income records carry an original amount.
    #[error("Expense records cannot carry an original amount")]
    OriginalAmountOnExpense,

    /// Category label is empty or whitespace.
    #[error("Category cannot be blank")]
    BlankCategory,

    /// Operation requires a different transaction kind.
    #[error("Expected a {expected} transaction, got {got}")]
    WrongKind {
        /// Kind the operation accepts.
        expected: TransactionKind,
        /// Kind that was supplied.
        got: TransactionKind,
    },
}

impl From<InvalidInput> for AppError {
    fn from(err: InvalidInput) -> Self {
        Self::Validation(err.to_string())
    }
}

fn require_positive(field: &'static str, value: Money) -> Result<(), InvalidInput> {
    if value.is_positive() {
        Ok(())
    } else {
        Err(InvalidInput::NonPositiveAmount { field, value })
    }
}

fn require_non_negative(field: &'static str, value: Money) -> Result<(), InvalidInput> {
    if value.is_negative() {
        Err(InvalidInput::NegativeAmount { field, value })
    } else {
        Ok(())
    }
}

fn require_category(category: &str) -> Result<(), InvalidInput> {
    if category.trim().is_empty() {
        Err(InvalidInput::BlankCategory)
    } else {
        Ok(())
    }
}

/// Validates a transaction.
///
/// Expenses need a positive amount. Incomes need a positive gross amount; once
/// allocation has run, the stored amount may drop to zero but never below, and
/// never above `original_amount`.
///
/// # Errors
///
/// Returns the first problem found.
pub fn validate_transaction(tx: &Transaction) -> Result<(), InvalidInput> {
    require_category(&tx.category)?;

    match (tx.kind, tx.original_amount) {
        (TransactionKind::Expense, Some(_)) => Err(InvalidInput::OriginalAmountOnExpense),
        (TransactionKind::Expense, None) | (TransactionKind::Income, None) => {
            require_positive("amount", tx.amount)
        }
        (TransactionKind::Income, Some(original)) => {
            require_positive("originalAmount", original)?;
            require_non_negative("amount", tx.amount)?;
            if original < tx.amount {
                return Err(InvalidInput::OriginalBelowAmount {
                    original,
                    amount: tx.amount,
                });
            }
            Ok(())
        }
    }
}

/// Validates a budget: positive cap, ordered window, non-blank category.
///
/// # Errors
///
/// Returns the first problem found.
pub fn validate_budget(budget: &Budget) -> Result<(), InvalidInput> {
    require_category(&budget.category)?;
    require_positive("cap", budget.cap)?;
    if budget.start_date > budget.end_date {
        return Err(InvalidInput::InvalidDateRange {
            start: budget.start_date,
            end: budget.end_date,
        });
    }
    Ok(())
}

/// Validates a goal: positive target, non-negative saved, percentage in [0, 100].
///
/// # Errors
///
/// Returns the first problem found.
pub fn validate_goal(goal: &Goal) -> Result<(), InvalidInput> {
    require_positive("targetAmount", goal.target_amount)?;
    require_non_negative("savedAmount", goal.saved_amount)?;
    if goal.contribution_percentage < Decimal::ZERO
        || goal.contribution_percentage > Decimal::ONE_HUNDRED
    {
        return Err(InvalidInput::PercentageOutOfRange(
            goal.contribution_percentage,
        ));
    }
    Ok(())
}
