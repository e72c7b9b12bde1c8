//! Allocation of incoming money across savings goals.
//!
//! Goals are visited in the order given. Each goal's share is a fixed
//! percentage of the original incoming amount, capped by what the goal can
//! still absorb and by what is left of the pool. Once the pool is empty the
//! remaining goals are skipped. The order is part of the input: with tight
//! capacities or percentages summing past 100, reordering changes the result.

use nestegg_shared::types::Money;

use super::types::{Allocation, AllocationResult, Goal, GoalContribution, IncomeApplication};
use crate::ledger::{Transaction, TransactionKind};
use crate::validation::{InvalidInput, validate_goal, validate_transaction};

/// Goal allocation engine.
pub struct AllocationEngine;

impl AllocationEngine {
    /// Distributes `incoming` across `goals` in order.
    ///
    /// For each goal, while money remains:
    /// `contribution = min(percentage% of incoming, capacity, remaining)`.
    /// Shares are rounded toward zero to cents, so the sum of contributions
    /// plus the remainder always equals `incoming` exactly.
    ///
    /// An empty goal list or a non-positive `incoming` allocates nothing.
    /// Inputs are not mutated; updated goals are returned for the caller to
    /// persist atomically.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if any goal is malformed.
    pub fn allocate(incoming: Money, goals: &[Goal]) -> Result<Allocation, InvalidInput> {
        goals.iter().try_for_each(validate_goal)?;

        if goals.is_empty() || !incoming.is_positive() {
            return Ok(Allocation {
                result: AllocationResult::unallocated(incoming),
                updated_goals: Vec::new(),
            });
        }

        let mut remaining = incoming;
        let mut per_goal = Vec::new();
        let mut updated_goals = Vec::new();

        for goal in goals {
            if !remaining.is_positive() {
                break;
            }

            let desired = incoming.percent(goal.contribution_percentage);
            let contribution = desired.min(goal.capacity()).min(remaining);

            if contribution.is_positive() {
                remaining -= contribution;
                per_goal.push(GoalContribution {
                    goal_id: goal.id,
                    contribution,
                });
                updated_goals.push(Goal {
                    saved_amount: goal.saved_amount + contribution,
                    ..goal.clone()
                });
            }
        }

        Ok(Allocation {
            result: AllocationResult {
                per_goal,
                remainder: remaining,
            },
            updated_goals,
        })
    }

    /// Routes a new income through the goals.
    ///
    /// Allocates the income's gross amount and returns the record to store:
    /// `amount` becomes the remainder and `original_amount` keeps the gross.
    /// Must run exactly once per income event; running it again on the
    /// updated goals would allocate twice.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if the transaction is not an income, or if it
    /// or any goal is malformed.
    pub fn apply_income(
        income: &Transaction,
        goals: &[Goal],
    ) -> Result<IncomeApplication, InvalidInput> {
        if income.kind != TransactionKind::Income {
            return Err(InvalidInput::WrongKind {
                expected: TransactionKind::Income,
                got: income.kind,
            });
        }
        validate_transaction(income)?;

        let gross = income.gross_amount();
        let Allocation {
            result,
            updated_goals,
        } = Self::allocate(gross, goals)?;

        let stored = Transaction {
            amount: result.remainder,
            original_amount: Some(gross),
            ..income.clone()
        };

        Ok(IncomeApplication {
            income: stored,
            updated_goals,
            allocation: result,
        })
    }
}
