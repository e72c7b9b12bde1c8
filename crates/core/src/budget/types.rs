//! Budget data types.

use chrono::NaiveDate;
use nestegg_shared::types::{BudgetId, Money, OwnerId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::ledger::{Transaction, TransactionKind};

/// A spending or income ceiling for one category within an inclusive date window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Budget {
    /// Budget ID.
    pub id: BudgetId,
    /// Owner of the budget.
    pub owner_id: OwnerId,
    /// Kind of transaction the budget applies to.
    pub kind: TransactionKind,
    /// Category the budget applies to.
    pub category: String,
    /// First day of the window (inclusive).
    pub start_date: NaiveDate,
    /// Last day of the window (inclusive).
    pub end_date: NaiveDate,
    /// Ceiling for the window.
    pub cap: Money,
}

impl Budget {
    /// Returns true if `date` is within `[start_date, end_date]`.
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }

    /// Returns true if the transaction counts against this budget.
    #[must_use]
    pub fn applies_to(&self, tx: &Transaction) -> bool {
        tx.matches(self.kind, &self.category) && self.contains(tx.date)
    }
}

/// Result of checking a candidate transaction against the budgets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum ValidationOutcome {
    /// No budget matches the candidate's kind, category and date.
    NoBudgetApplies,
    /// The candidate fits; `remaining_capacity` is what is left after it.
    WithinBudget {
        /// Budget that matched.
        budget_id: BudgetId,
        /// `cap - attempted_total`.
        remaining_capacity: Money,
    },
    /// Committing the candidate would push the total past the cap.
    ExceedsBudget {
        /// Budget that matched.
        budget_id: BudgetId,
        /// Total of the other matching transactions.
        current_total: Money,
        /// `current_total + candidate.amount`.
        attempted_total: Money,
        /// The budget's cap.
        cap: Money,
    },
}

impl ValidationOutcome {
    /// Returns true unless the outcome is `ExceedsBudget`.
    #[must_use]
    pub fn is_allowed(&self) -> bool {
        !matches!(self, Self::ExceedsBudget { .. })
    }
}

/// Where a budget's current total sits relative to its cap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CapStatus {
    /// Total is below the cap.
    UnderCap,
    /// Total equals the cap.
    AtCap,
    /// Total is above the cap.
    OverCap,
}

/// Current standing of one budget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetStatus {
    /// Budget ID.
    pub budget_id: BudgetId,
    /// Budget category.
    pub category: String,
    /// Budget kind.
    pub kind: TransactionKind,
    /// Budget cap.
    pub cap: Money,
    /// Sum of matching transactions within the window.
    pub current_total: Money,
    /// `cap - current_total`; negative once over the cap.
    pub headroom: Money,
    /// `current_total / cap * 100`, 2 decimals.
    pub utilization_percent: Decimal,
    /// Position relative to the cap.
    pub status: CapStatus,
}
