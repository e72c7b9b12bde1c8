//! Savings goal data types.

use chrono::NaiveDate;
use nestegg_shared::types::{GoalId, Money, OwnerId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::ledger::Transaction;

/// A savings goal receiving a fixed percentage of every new income.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    /// Goal ID.
    pub id: GoalId,
    /// Owner of the goal.
    pub owner_id: OwnerId,
    /// Display label.
    pub category: String,
    /// Amount the goal aims to reach.
    pub target_amount: Money,
    /// Amount saved so far.
    pub saved_amount: Money,
    /// Share of each income routed here, in [0, 100].
    pub contribution_percentage: Decimal,
    /// Deadline.
    pub end_date: NaiveDate,
}

impl Goal {
    /// What the goal can still absorb: `target - saved`, never negative.
    #[must_use]
    pub fn capacity(&self) -> Money {
        self.target_amount.saturating_sub(self.saved_amount)
    }

    /// Returns true once the saved amount reaches the target.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.saved_amount >= self.target_amount
    }
}

/// One goal's share of an allocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalContribution {
    /// Goal that received the contribution.
    pub goal_id: GoalId,
    /// Amount routed to the goal.
    pub contribution: Money,
}

/// Distribution of an incoming amount.
///
/// `sum(per_goal.contribution) + remainder == incoming` exactly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllocationResult {
    /// Contributions in goal order; goals that received nothing are omitted.
    pub per_goal: Vec<GoalContribution>,
    /// Amount left unallocated.
    pub remainder: Money,
}

impl AllocationResult {
    /// A result that allocates nothing.
    #[must_use]
    pub fn unallocated(incoming: Money) -> Self {
        Self {
            per_goal: Vec::new(),
            remainder: incoming,
        }
    }

    /// Sum of all contributions.
    #[must_use]
    pub fn total_allocated(&self) -> Money {
        self.per_goal.iter().map(|c| c.contribution).sum()
    }

    /// Human-readable distribution summary, one line per contributing goal.
    ///
    /// Goals are labelled by category; a contribution to a goal missing from
    /// `goals` is labelled by its ID.
    #[must_use]
    pub fn summary(&self, goals: &[Goal]) -> String {
        let lines = self.per_goal.iter().map(|entry| {
            let label = goals
                .iter()
                .find(|goal| goal.id == entry.goal_id)
                .map_or_else(|| entry.goal_id.to_string(), |goal| goal.category.clone());
            format!("{label}: ${}", entry.contribution)
        });

        std::iter::once("Savings distributed:".to_string())
            .chain(lines)
            .chain(std::iter::once(format!("Remaining: ${}", self.remainder)))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Allocation result together with the goals whose saved amount changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Allocation {
    /// The distribution.
    pub result: AllocationResult,
    /// Goals that received a contribution, with updated `saved_amount`, in goal order.
    pub updated_goals: Vec<Goal>,
}

/// Everything the caller persists, as one atomic batch, for a new income.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncomeApplication {
    /// Income to store: `amount` is the remainder, `original_amount` the gross.
    pub income: Transaction,
    /// Goals with updated saved amounts.
    pub updated_goals: Vec<Goal>,
    /// The distribution.
    pub allocation: AllocationResult,
}

/// Outcome of a user adding money to a goal by hand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManualContribution {
    /// Goal after the contribution.
    pub goal: Goal,
    /// Amount actually added.
    pub applied: Money,
    /// Amount that did not fit under the target.
    pub excess: Money,
    /// Whether the goal has reached its target.
    pub completed: bool,
}

/// Notable point in a goal's progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "milestone", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum Milestone {
    /// Target reached.
    Reached,
    /// At least 90% saved.
    AlmostThere {
        /// Amount still missing.
        remaining: Money,
    },
    /// At least 50% saved.
    Halfway,
    /// Under 50% saved with the deadline close.
    DeadlineApproaching {
        /// Days until the end date.
        days_remaining: i64,
    },
}

/// Progress snapshot of one goal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalProgress {
    /// Goal ID.
    pub goal_id: GoalId,
    /// Goal label.
    pub category: String,
    /// `saved / target * 100`, 2 decimals.
    pub progress_percent: Decimal,
    /// Capacity left.
    pub remaining: Money,
    /// Days until the end date, 0 once past it.
    pub days_remaining: i64,
    /// Milestone to surface, if any.
    pub milestone: Option<Milestone>,
}
