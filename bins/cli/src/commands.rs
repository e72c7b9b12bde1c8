//! Subcommand handlers.
//!
//! Each handler loads the owner's records, runs the pure engine and, for
//! writes, commits the result in a single batch against the loaded revision.

use chrono::NaiveDate;
use nestegg_core::aggregation::TimeSeriesAggregator;
use nestegg_core::budget::{Budget, BudgetValidator, ValidationOutcome};
use nestegg_core::goals::{self, AllocationEngine, Goal};
use nestegg_core::ledger::{BalanceLedger, Transaction, TransactionKind};
use nestegg_core::validation::{validate_budget, validate_goal};
use nestegg_shared::types::{BudgetId, GoalId, Money, MonthKey, OwnerId, TransactionId};
use nestegg_shared::{AppConfig, AppError, AppResult};
use nestegg_store::{JsonFileStore, Snapshot, SnapshotStore, WriteBatch};
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::{Value, json};
use tracing::info;

use crate::EntryArgs;

/// One owner's view of the store.
pub struct Session {
    store: JsonFileStore,
    owner: OwnerId,
    warning_days: i64,
}

fn to_json<T: Serialize>(value: &T) -> AppResult<Value> {
    serde_json::to_value(value).map_err(|err| AppError::Internal(err.to_string()))
}

fn refuse_overrun(outcome: ValidationOutcome, force: bool) -> AppResult<()> {
    match outcome {
        ValidationOutcome::ExceedsBudget {
            budget_id,
            attempted_total,
            cap,
            ..
        } if !force => Err(AppError::BusinessRule(format!(
            "budget {budget_id} would reach {attempted_total} against a cap of {cap} (use --force to store anyway)"
        ))),
        _ => Ok(()),
    }
}

impl Session {
    pub fn new(config: &AppConfig, owner: OwnerId) -> Self {
        Self {
            store: JsonFileStore::new(&config.store.path),
            owner,
            warning_days: config.goals.deadline_warning_days,
        }
    }

    fn snapshot(&self) -> AppResult<Snapshot> {
        Ok(self.store.load()?.for_owner(self.owner))
    }

    fn commit(&self, revision: u64, batch: WriteBatch) -> AppResult<Snapshot> {
        Ok(self.store.commit(revision, batch)?)
    }

    pub fn report(&self, month: Option<MonthKey>) -> AppResult<Value> {
        let snapshot = self.snapshot()?;
        let buckets = TimeSeriesAggregator::aggregate(&snapshot.transactions);
        let chart = TimeSeriesAggregator::chart_series(&buckets);

        let breakdown = match month {
            Some(key) => {
                let selected: Vec<Transaction> =
                    TimeSeriesAggregator::in_month(&snapshot.transactions, key)
                        .into_iter()
                        .cloned()
                        .collect();
                json!({
                    "month": key.to_string(),
                    "transactions": selected,
                    "incomeByCategory":
                        TimeSeriesAggregator::category_totals(&selected, TransactionKind::Income),
                    "expensesByCategory":
                        TimeSeriesAggregator::category_totals(&selected, TransactionKind::Expense),
                })
            }
            None => Value::Null,
        };

        Ok(json!({
            "buckets": buckets,
            "chart": chart,
            "breakdown": breakdown,
        }))
    }

    pub fn balance(&self) -> AppResult<Value> {
        let snapshot = self.snapshot()?;
        to_json(&BalanceLedger::summary(&snapshot.transactions))
    }

    pub fn budgets(&self) -> AppResult<Value> {
        let snapshot = self.snapshot()?;
        to_json(&BudgetValidator::status_report(
            &snapshot.budgets,
            &snapshot.transactions,
        ))
    }

    pub fn goals(&self, today: NaiveDate) -> AppResult<Value> {
        let snapshot = self.snapshot()?;
        let progress = snapshot
            .goals
            .iter()
            .map(|goal| goals::progress(goal, today, self.warning_days))
            .collect::<Result<Vec<_>, _>>()?;
        to_json(&progress)
    }

    pub fn add_expense(&self, entry: EntryArgs, id: Option<TransactionId>) -> AppResult<Value> {
        let snapshot = self.snapshot()?;
        let date = entry.date.unwrap_or_else(crate::today);

        let candidate = match id {
            Some(id) => {
                let existing = snapshot
                    .transaction(id)
                    .filter(|tx| tx.kind == TransactionKind::Expense)
                    .ok_or_else(|| AppError::NotFound(format!("expense {id}")))?;
                Transaction {
                    name: entry.name,
                    amount: entry.amount,
                    date,
                    category: entry.category,
                    ..existing.clone()
                }
            }
            None => Transaction::expense(self.owner, entry.name, entry.amount, date, entry.category),
        };

        let outcome =
            BudgetValidator::validate(&candidate, &snapshot.transactions, &snapshot.budgets)?;
        refuse_overrun(outcome, entry.force)?;

        let committed = self.commit(
            snapshot.revision,
            WriteBatch::new().upsert_transaction(candidate.clone()),
        )?;
        info!(
            transaction_id = %candidate.id,
            amount = %candidate.amount,
            revision = committed.revision,
            "Recorded expense"
        );

        Ok(json!({ "transaction": candidate, "budget": outcome }))
    }

    pub fn add_income(&self, entry: EntryArgs) -> AppResult<Value> {
        let snapshot = self.snapshot()?;
        let date = entry.date.unwrap_or_else(crate::today);
        let candidate =
            Transaction::income(self.owner, entry.name, entry.amount, date, entry.category);

        let outcome =
            BudgetValidator::validate(&candidate, &snapshot.transactions, &snapshot.budgets)?;
        refuse_overrun(outcome, entry.force)?;

        let application = AllocationEngine::apply_income(&candidate, &snapshot.goals)?;
        let committed = self.commit(snapshot.revision, WriteBatch::from(&application))?;
        info!(
            transaction_id = %application.income.id,
            gross = %candidate.amount,
            allocated = %application.allocation.total_allocated(),
            revision = committed.revision,
            "Recorded income"
        );

        Ok(json!({
            "transaction": application.income,
            "budget": outcome,
            "allocation": application.allocation,
            "summary": application.allocation.summary(&snapshot.goals),
        }))
    }

    pub fn add_budget(
        &self,
        kind: TransactionKind,
        category: String,
        start_date: NaiveDate,
        end_date: NaiveDate,
        cap: Money,
    ) -> AppResult<Value> {
        let snapshot = self.snapshot()?;
        let budget = Budget {
            id: BudgetId::new(),
            owner_id: self.owner,
            kind,
            category,
            start_date,
            end_date,
            cap,
        };
        validate_budget(&budget)?;

        let committed = self.commit(
            snapshot.revision,
            WriteBatch::new().upsert_budget(budget.clone()),
        )?;
        info!(budget_id = %budget.id, revision = committed.revision, "Created budget");
        to_json(&budget)
    }

    pub fn add_goal(
        &self,
        category: String,
        target: Money,
        percentage: Decimal,
        end_date: NaiveDate,
    ) -> AppResult<Value> {
        let snapshot = self.snapshot()?;
        let goal = Goal {
            id: GoalId::new(),
            owner_id: self.owner,
            category,
            target_amount: target,
            saved_amount: Money::ZERO,
            contribution_percentage: percentage,
            end_date,
        };
        validate_goal(&goal)?;

        let committed = self.commit(snapshot.revision, WriteBatch::new().upsert_goal(goal.clone()))?;
        info!(goal_id = %goal.id, revision = committed.revision, "Created goal");
        to_json(&goal)
    }

    pub fn contribute(&self, goal_id: GoalId, amount: Money) -> AppResult<Value> {
        let snapshot = self.snapshot()?;
        let goal = snapshot
            .goal(goal_id)
            .ok_or_else(|| AppError::NotFound(format!("goal {goal_id}")))?;

        let result = goals::contribute(goal, amount)?;
        let committed = self.commit(
            snapshot.revision,
            WriteBatch::new().upsert_goal(result.goal.clone()),
        )?;
        info!(
            goal_id = %goal_id,
            applied = %result.applied,
            excess = %result.excess,
            revision = committed.revision,
            "Recorded contribution"
        );
        to_json(&result)
    }

    pub fn delete_transaction(&self, id: TransactionId) -> AppResult<Value> {
        let snapshot = self.snapshot()?;
        if snapshot.transaction(id).is_none() {
            return Err(AppError::NotFound(format!("transaction {id}")));
        }

        let committed =
            self.commit(snapshot.revision, WriteBatch::new().delete_transaction(id))?;
        info!(transaction_id = %id, revision = committed.revision, "Deleted transaction");
        Ok(json!({ "deleted": id, "revision": committed.revision }))
    }

    pub fn delete_budget(&self, id: BudgetId) -> AppResult<Value> {
        let snapshot = self.snapshot()?;
        if snapshot.budget(id).is_none() {
            return Err(AppError::NotFound(format!("budget {id}")));
        }

        let committed = self.commit(snapshot.revision, WriteBatch::new().delete_budget(id))?;
        info!(budget_id = %id, revision = committed.revision, "Deleted budget");
        Ok(json!({ "deleted": id, "revision": committed.revision }))
    }

    /// Removes a goal. Money already saved toward it stays earmarked on past incomes.
    pub fn delete_goal(&self, id: GoalId) -> AppResult<Value> {
        let snapshot = self.snapshot()?;
        if snapshot.goal(id).is_none() {
            return Err(AppError::NotFound(format!("goal {id}")));
        }

        let committed = self.commit(snapshot.revision, WriteBatch::new().delete_goal(id))?;
        info!(goal_id = %id, revision = committed.revision, "Deleted goal");
        Ok(json!({ "deleted": id, "revision": committed.revision }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use tempfile::tempdir;

    fn session(dir: &tempfile::TempDir) -> Session {
        let mut config = AppConfig::default();
        config.store.path = dir.path().join("nestegg.json");
        Session::new(&config, OwnerId::new())
    }

    fn entry(amount: Decimal, category: &str, force: bool) -> EntryArgs {
        EntryArgs {
            name: "Entry".to_string(),
            amount: Money::new(amount),
            category: category.to_string(),
            date: NaiveDate::from_ymd_opt(2024, 1, 10),
            force,
        }
    }

    fn money(value: &Value) -> Money {
        value.as_str().unwrap().parse().unwrap()
    }

    fn jan(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
    }

    #[test]
    fn test_expense_over_budget_is_refused_unless_forced() {
        let dir = tempdir().unwrap();
        let session = session(&dir);
        session
            .add_budget(
                TransactionKind::Expense,
                "Food".to_string(),
                jan(1),
                jan(31),
                Money::new(dec!(100)),
            )
            .unwrap();
        session.add_expense(entry(dec!(90), "Food", false), None).unwrap();

        let refused = session.add_expense(entry(dec!(20), "Food", false), None);
        assert!(matches!(refused, Err(AppError::BusinessRule(_))));

        session.add_expense(entry(dec!(20), "Food", true), None).unwrap();
        let status = session.budgets().unwrap();
        assert_eq!(money(&status[0]["currentTotal"]), Money::new(dec!(110)));
        assert_eq!(status[0]["status"], "over_cap");
    }

    #[test]
    fn test_income_funds_goals_in_one_commit() {
        let dir = tempdir().unwrap();
        let session = session(&dir);
        session
            .add_goal("House".to_string(), Money::new(dec!(1000)), dec!(50), jan(31))
            .unwrap();

        let output = session.add_income(entry(dec!(1000), "Job", false)).unwrap();

        assert_eq!(money(&output["transaction"]["amount"]), Money::new(dec!(500)));
        assert_eq!(
            money(&output["transaction"]["originalAmount"]),
            Money::new(dec!(1000))
        );
        assert_eq!(money(&output["allocation"]["remainder"]), Money::new(dec!(500)));

        let balance = session.balance().unwrap();
        assert_eq!(money(&balance["balance"]), Money::new(dec!(1000)));
        assert_eq!(money(&balance["earmarked"]), Money::new(dec!(500)));
    }

    #[test]
    fn test_contribute_unknown_goal_is_not_found() {
        let dir = tempdir().unwrap();
        let session = session(&dir);

        let result = session.contribute(GoalId::new(), Money::new(dec!(10)));

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[test]
    fn test_other_owners_records_are_hidden() {
        let dir = tempdir().unwrap();
        let alice = session(&dir);
        let bob = session(&dir);
        alice.add_expense(entry(dec!(40), "Food", false), None).unwrap();

        assert_eq!(money(&bob.balance().unwrap()["totalExpenses"]), Money::ZERO);
        assert_eq!(
            money(&alice.balance().unwrap()["totalExpenses"]),
            Money::new(dec!(40))
        );
    }

    fn id_of<T: std::str::FromStr>(value: &Value) -> T
    where
        T::Err: std::fmt::Debug,
    {
        value.as_str().unwrap().parse().unwrap()
    }

    #[test]
    fn test_delete_budget_lifts_the_cap() {
        let dir = tempdir().unwrap();
        let session = session(&dir);
        let budget = session
            .add_budget(
                TransactionKind::Expense,
                "Food".to_string(),
                jan(1),
                jan(31),
                Money::new(dec!(50)),
            )
            .unwrap();
        let budget_id: BudgetId = id_of(&budget["id"]);

        assert!(session.add_expense(entry(dec!(60), "Food", false), None).is_err());
        session.delete_budget(budget_id).unwrap();

        session.add_expense(entry(dec!(60), "Food", false), None).unwrap();
        assert!(session.budgets().unwrap().as_array().unwrap().is_empty());
        assert!(matches!(
            session.delete_budget(budget_id),
            Err(AppError::NotFound(_))
        ));
    }

    #[test]
    fn test_delete_transaction_updates_balance() {
        let dir = tempdir().unwrap();
        let session = session(&dir);
        session.add_expense(entry(dec!(25), "Food", false), None).unwrap();
        let added = session.add_expense(entry(dec!(15), "Fuel", false), None).unwrap();
        let tx_id: TransactionId = id_of(&added["transaction"]["id"]);

        session.delete_transaction(tx_id).unwrap();

        assert_eq!(
            money(&session.balance().unwrap()["totalExpenses"]),
            Money::new(dec!(25))
        );
    }

    #[test]
    fn test_delete_goal_removes_it_from_allocation() {
        let dir = tempdir().unwrap();
        let session = session(&dir);
        let goal = session
            .add_goal("House".to_string(), Money::new(dec!(1000)), dec!(50), jan(31))
            .unwrap();
        let goal_id: GoalId = id_of(&goal["id"]);

        session.delete_goal(goal_id).unwrap();
        let output = session.add_income(entry(dec!(200), "Job", false)).unwrap();

        assert_eq!(money(&output["allocation"]["remainder"]), Money::new(dec!(200)));
        assert!(session.goals(jan(1)).unwrap().as_array().unwrap().is_empty());
    }

    #[test]
    fn test_cannot_delete_another_owners_records() {
        let dir = tempdir().unwrap();
        let alice = session(&dir);
        let bob = session(&dir);
        let added = alice.add_expense(entry(dec!(10), "Food", false), None).unwrap();
        let tx_id: TransactionId = id_of(&added["transaction"]["id"]);

        assert!(matches!(
            bob.delete_transaction(tx_id),
            Err(AppError::NotFound(_))
        ));
        assert_eq!(
            money(&alice.balance().unwrap()["totalExpenses"]),
            Money::new(dec!(10))
        );
    }
}
