//! Changes committed together.

use nestegg_core::budget::Budget;
use nestegg_core::goals::{Goal, IncomeApplication};
use nestegg_core::ledger::Transaction;
use nestegg_shared::types::{BudgetId, GoalId, TransactionId};

/// A set of upserts and deletes applied atomically.
///
/// Upserts replace a record with the same ID in place, or append it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteBatch {
    /// Transactions to insert or replace.
    pub transactions: Vec<Transaction>,
    /// Budgets to insert or replace.
    pub budgets: Vec<Budget>,
    /// Goals to insert or replace.
    pub goals: Vec<Goal>,
    /// Transactions to remove.
    pub deleted_transactions: Vec<TransactionId>,
    /// Budgets to remove.
    pub deleted_budgets: Vec<BudgetId>,
    /// Goals to remove.
    pub deleted_goals: Vec<GoalId>,
}

impl WriteBatch {
    /// Creates an empty batch.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a transaction upsert.
    #[must_use]
    pub fn upsert_transaction(mut self, tx: Transaction) -> Self {
        self.transactions.push(tx);
        self
    }

    /// Adds a budget upsert.
    #[must_use]
    pub fn upsert_budget(mut self, budget: Budget) -> Self {
        self.budgets.push(budget);
        self
    }

    /// Adds a goal upsert.
    #[must_use]
    pub fn upsert_goal(mut self, goal: Goal) -> Self {
        self.goals.push(goal);
        self
    }

    /// Adds a transaction delete.
    #[must_use]
    pub fn delete_transaction(mut self, id: TransactionId) -> Self {
        self.deleted_transactions.push(id);
        self
    }

    /// Adds a budget delete.
    #[must_use]
    pub fn delete_budget(mut self, id: BudgetId) -> Self {
        self.deleted_budgets.push(id);
        self
    }

    /// Adds a goal delete.
    #[must_use]
    pub fn delete_goal(mut self, id: GoalId) -> Self {
        self.deleted_goals.push(id);
        self
    }

    /// Number of changes in the batch.
    #[must_use]
    pub fn len(&self) -> usize {
        self.transactions.len()
            + self.budgets.len()
            + self.goals.len()
            + self.deleted_transactions.len()
            + self.deleted_budgets.len()
            + self.deleted_goals.len()
    }

    /// Returns true if the batch changes nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl From<&IncomeApplication> for WriteBatch {
    /// The reduced income and every goal it funded.
    fn from(application: &IncomeApplication) -> Self {
        Self {
            transactions: vec![application.income.clone()],
            goals: application.updated_goals.clone(),
            ..Self::default()
        }
    }
}
