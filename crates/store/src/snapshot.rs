//! The stored record set.

use nestegg_core::budget::Budget;
use nestegg_core::goals::Goal;
use nestegg_core::ledger::Transaction;
use nestegg_shared::types::{BudgetId, GoalId, OwnerId, TransactionId};
use serde::{Deserialize, Serialize};

use crate::batch::WriteBatch;

/// Every stored record at one revision.
///
/// Record order is preserved across commits; goal order is allocation priority.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    /// Incremented by every successful commit. An empty store is at 0.
    pub revision: u64,
    /// Transactions.
    #[serde(default)]
    pub transactions: Vec<Transaction>,
    /// Budgets.
    #[serde(default)]
    pub budgets: Vec<Budget>,
    /// Savings goals, in priority order.
    #[serde(default)]
    pub goals: Vec<Goal>,
}

impl Snapshot {
    /// The records belonging to `owner`, at the same revision.
    #[must_use]
    pub fn for_owner(&self, owner: OwnerId) -> Self {
        Self {
            revision: self.revision,
            transactions: self
                .transactions
                .iter()
                .filter(|tx| tx.owner_id == owner)
                .cloned()
                .collect(),
            budgets: self
                .budgets
                .iter()
                .filter(|budget| budget.owner_id == owner)
                .cloned()
                .collect(),
            goals: self
                .goals
                .iter()
                .filter(|goal| goal.owner_id == owner)
                .cloned()
                .collect(),
        }
    }

    /// Looks up a transaction by ID.
    #[must_use]
    pub fn transaction(&self, id: TransactionId) -> Option<&Transaction> {
        self.transactions.iter().find(|tx| tx.id == id)
    }

    /// Looks up a budget by ID.
    #[must_use]
    pub fn budget(&self, id: BudgetId) -> Option<&Budget> {
        self.budgets.iter().find(|budget| budget.id == id)
    }

    /// Looks up a goal by ID.
    #[must_use]
    pub fn goal(&self, id: GoalId) -> Option<&Goal> {
        self.goals.iter().find(|goal| goal.id == id)
    }

    /// Applies a batch and bumps the revision.
    pub(crate) fn apply(&mut self, batch: WriteBatch) {
        upsert(&mut self.transactions, batch.transactions, |tx| tx.id);
        upsert(&mut self.budgets, batch.budgets, |budget| budget.id);
        upsert(&mut self.goals, batch.goals, |goal| goal.id);

        self.transactions
            .retain(|tx| !batch.deleted_transactions.contains(&tx.id));
        self.budgets
            .retain(|budget| !batch.deleted_budgets.contains(&budget.id));
        self.goals
            .retain(|goal| !batch.deleted_goals.contains(&goal.id));

        self.revision += 1;
    }
}

fn upsert<T, K, F>(records: &mut Vec<T>, incoming: Vec<T>, key: F)
where
    K: PartialEq,
    F: Fn(&T) -> K,
{
    for record in incoming {
        let id = key(&record);
        match records.iter_mut().find(|existing| key(existing) == id) {
            Some(slot) => *slot = record,
            None => records.push(record),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use nestegg_shared::types::Money;
    use rust_decimal_macros::dec;

    fn expense(owner: OwnerId, amount: Money) -> Transaction {
        Transaction::expense(
            owner,
            "Lunch",
            amount,
            NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
            "Food",
        )
    }

    #[test]
    fn test_apply_replaces_in_place_and_appends() {
        let owner = OwnerId::new();
        let first = expense(owner, Money::new(dec!(10)));
        let second = expense(owner, Money::new(dec!(20)));
        let mut snapshot = Snapshot {
            transactions: vec![first.clone(), second.clone()],
            ..Snapshot::default()
        };

        let edited = Transaction {
            amount: Money::new(dec!(15)),
            ..first.clone()
        };
        let added = expense(owner, Money::new(dec!(5)));
        snapshot.apply(
            WriteBatch::new()
                .upsert_transaction(edited.clone())
                .upsert_transaction(added.clone()),
        );

        assert_eq!(snapshot.revision, 1);
        assert_eq!(snapshot.transactions, vec![edited, second, added]);
    }

    #[test]
    fn test_apply_deletes() {
        let owner = OwnerId::new();
        let keep = expense(owner, Money::new(dec!(10)));
        let drop = expense(owner, Money::new(dec!(20)));
        let mut snapshot = Snapshot {
            revision: 4,
            transactions: vec![keep.clone(), drop.clone()],
            ..Snapshot::default()
        };

        snapshot.apply(WriteBatch::new().delete_transaction(drop.id));

        assert_eq!(snapshot.revision, 5);
        assert_eq!(snapshot.transactions, vec![keep]);
        assert!(snapshot.transaction(drop.id).is_none());
    }

    #[test]
    fn test_for_owner_scopes_records() {
        let me = OwnerId::new();
        let other = OwnerId::new();
        let mine = expense(me, Money::new(dec!(1)));
        let snapshot = Snapshot {
            revision: 2,
            transactions: vec![expense(other, Money::new(dec!(2))), mine.clone()],
            ..Snapshot::default()
        };

        let scoped = snapshot.for_owner(me);

        assert_eq!(scoped.revision, 2);
        assert_eq!(scoped.transactions, vec![mine]);
    }
}
