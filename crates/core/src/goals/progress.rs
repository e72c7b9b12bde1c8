//! Goal progress, milestones and manual contributions.

use chrono::NaiveDate;
use nestegg_shared::types::Money;
use rust_decimal::Decimal;

use super::types::{Goal, GoalProgress, ManualContribution, Milestone};
use crate::validation::{InvalidInput, validate_goal};

const HALFWAY_PERCENT: Decimal = Decimal::from_parts(50, 0, 0, false, 0);
const ALMOST_THERE_PERCENT: Decimal = Decimal::from_parts(90, 0, 0, false, 0);

/// Returns true if `saved / target >= percent / 100`, compared exactly.
fn has_reached(goal: &Goal, percent: Decimal) -> bool {
    goal.saved_amount.amount() * Decimal::ONE_HUNDRED >= goal.target_amount.amount() * percent
}

/// Computes a goal's progress as of `today`.
///
/// Milestones use the exact saved/target ratio; `progress_percent` is only
/// the rounded figure for display. A lagging goal (under 50%) is flagged once its deadline is at most
/// `warning_days` away, including goals already past their end date.
///
/// # Errors
///
/// Returns `InvalidInput` if the goal is malformed.
pub fn progress(
    goal: &Goal,
    today: NaiveDate,
    warning_days: i64,
) -> Result<GoalProgress, InvalidInput> {
    validate_goal(goal)?;

    let progress_percent = goal.saved_amount.percentage_of(goal.target_amount);
    let days_remaining = (goal.end_date - today).num_days().max(0);

    let milestone = if goal.is_complete() {
        Some(Milestone::Reached)
    } else if has_reached(goal, ALMOST_THERE_PERCENT) {
        Some(Milestone::AlmostThere {
            remaining: goal.capacity(),
        })
    } else if has_reached(goal, HALFWAY_PERCENT) {
        Some(Milestone::Halfway)
    } else if days_remaining <= warning_days {
        Some(Milestone::DeadlineApproaching { days_remaining })
    } else {
        None
    };

    Ok(GoalProgress {
        goal_id: goal.id,
        category: goal.category.clone(),
        progress_percent,
        remaining: goal.capacity(),
        days_remaining,
        milestone,
    })
}

/// Adds a user-entered amount to a goal, capped at its capacity.
///
/// Whatever does not fit is reported as `excess`.
///
/// # Errors
///
/// Returns `InvalidInput` if `amount` is not positive or the goal is malformed.
pub fn contribute(goal: &Goal, amount: Money) -> Result<ManualContribution, InvalidInput> {
    validate_goal(goal)?;
    if !amount.is_positive() {
        return Err(InvalidInput::NonPositiveAmount {
            field: "contribution",
            value: amount,
        });
    }

    let applied = amount.min(goal.capacity());
    let updated = Goal {
        saved_amount: goal.saved_amount + applied,
        ..goal.clone()
    };
    let completed = updated.is_complete();

    Ok(ManualContribution {
        goal: updated,
        applied,
        excess: amount - applied,
        completed,
    })
}
