//! Budget validation and status reporting.

use std::cmp::Ordering;

use nestegg_shared::types::Money;

use super::types::{Budget, BudgetStatus, CapStatus, ValidationOutcome};
use crate::ledger::Transaction;
use crate::validation::{InvalidInput, validate_budget, validate_transaction};

/// Budget service for business logic.
pub struct BudgetValidator;

impl BudgetValidator {
    /// Finds the budget a transaction counts against.
    ///
    /// Kind and category must match and the date must fall inside the window.
    /// Budgets for one category are expected to have disjoint windows; if they
    /// overlap, the first match in caller order wins.
    #[must_use]
    pub fn find_budget<'a>(tx: &Transaction, budgets: &'a [Budget]) -> Option<&'a Budget> {
        budgets.iter().find(|budget| budget.applies_to(tx))
    }

    /// Sums the amounts of transactions counting against `budget`.
    ///
    /// A transaction with id `exclude` is skipped so an edit is not counted
    /// twice (once as its stored value, once as the candidate).
    #[must_use]
    pub fn current_total(
        budget: &Budget,
        transactions: &[Transaction],
        exclude: Option<&Transaction>,
    ) -> Money {
        transactions
            .iter()
            .filter(|tx| exclude.is_none_or(|excluded| excluded.id != tx.id))
            .filter(|tx| budget.applies_to(tx))
            .map(|tx| tx.amount)
            .sum()
    }

    /// Checks whether committing `candidate` would exceed its budget.
    ///
    /// Pure: nothing is mutated, the caller decides whether to persist.
    /// Reaching the cap exactly is within budget.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if the candidate or any budget is malformed.
    pub fn validate(
        candidate: &Transaction,
        existing: &[Transaction],
        budgets: &[Budget],
    ) -> Result<ValidationOutcome, InvalidInput> {
        validate_transaction(candidate)?;
        budgets.iter().try_for_each(validate_budget)?;

        let Some(budget) = Self::find_budget(candidate, budgets) else {
            return Ok(ValidationOutcome::NoBudgetApplies);
        };

        let current_total = Self::current_total(budget, existing, Some(candidate));
        let attempted_total = current_total + candidate.amount;

        if attempted_total > budget.cap {
            Ok(ValidationOutcome::ExceedsBudget {
                budget_id: budget.id,
                current_total,
                attempted_total,
                cap: budget.cap,
            })
        } else {
            Ok(ValidationOutcome::WithinBudget {
                budget_id: budget.id,
                remaining_capacity: budget.cap - attempted_total,
            })
        }
    }

    /// Reports the current standing of every budget, in input order.
    #[must_use]
    pub fn status_report(budgets: &[Budget], transactions: &[Transaction]) -> Vec<BudgetStatus> {
        budgets
            .iter()
            .map(|budget| Self::status(budget, transactions))
            .collect()
    }

    /// Computes the standing of a single budget.
    #[must_use]
    pub fn status(budget: &Budget, transactions: &[Transaction]) -> BudgetStatus {
        let current_total = Self::current_total(budget, transactions, None);

        let status = match current_total.cmp(&budget.cap) {
            Ordering::Less => CapStatus::UnderCap,
            Ordering::Equal => CapStatus::AtCap,
            Ordering::Greater => CapStatus::OverCap,
        };

        BudgetStatus {
            budget_id: budget.id,
            category: budget.category.clone(),
            kind: budget.kind,
            cap: budget.cap,
            current_total,
            headroom: budget.cap - current_total,
            utilization_percent: current_total.percentage_of(budget.cap),
            status,
        }
    }
}
