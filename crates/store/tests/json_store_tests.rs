//! Integration tests for the JSON snapshot store.

use chrono::NaiveDate;
use nestegg_core::budget::Budget;
use nestegg_core::goals::{AllocationEngine, Goal};
use nestegg_core::ledger::{Transaction, TransactionKind};
use nestegg_shared::types::{BudgetId, GoalId, Money, OwnerId};
use nestegg_store::{JsonFileStore, Snapshot, SnapshotStore, StoreError, WriteBatch};
use rust_decimal_macros::dec;
use tempfile::tempdir;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn goal(owner: OwnerId, label: &str, percentage: rust_decimal::Decimal) -> Goal {
    Goal {
        id: GoalId::new(),
        owner_id: owner,
        category: label.to_string(),
        target_amount: Money::new(dec!(1000)),
        saved_amount: Money::ZERO,
        contribution_percentage: percentage,
        end_date: date(2025, 12, 31),
    }
}

#[test]
fn missing_file_loads_empty_snapshot() {
    let dir = tempdir().expect("tempdir");
    let store = JsonFileStore::new(dir.path().join("nestegg.json"));

    let snapshot = store.load().expect("load");

    assert_eq!(snapshot, Snapshot::default());
    assert!(!store.path().exists());
}

#[test]
fn commit_then_load_round_trips() {
    let dir = tempdir().expect("tempdir");
    let store = JsonFileStore::new(dir.path().join("data").join("nestegg.json"));
    let owner = OwnerId::new();
    let budget = Budget {
        id: BudgetId::new(),
        owner_id: owner,
        kind: TransactionKind::Expense,
        category: "Food".to_string(),
        start_date: date(2024, 1, 1),
        end_date: date(2024, 1, 31),
        cap: Money::new(dec!(500)),
    };
    let lunch = Transaction::expense(owner, "Lunch", Money::new(dec!(12.50)), date(2024, 1, 3), "Food");

    let committed = store
        .commit(
            0,
            WriteBatch::new()
                .upsert_budget(budget.clone())
                .upsert_transaction(lunch.clone()),
        )
        .expect("commit");
    let loaded = store.load().expect("load");

    assert_eq!(committed.revision, 1);
    assert_eq!(loaded, committed);
    assert_eq!(loaded.budgets, vec![budget]);
    assert_eq!(loaded.transactions, vec![lunch]);
}

#[test]
fn stale_revision_is_rejected_without_writing() {
    let dir = tempdir().expect("tempdir");
    let store = JsonFileStore::new(dir.path().join("nestegg.json"));
    let owner = OwnerId::new();
    let first = Transaction::expense(owner, "Bus", Money::new(dec!(2)), date(2024, 2, 1), "Transport");
    let second = Transaction::expense(owner, "Taxi", Money::new(dec!(20)), date(2024, 2, 2), "Transport");

    store
        .commit(0, WriteBatch::new().upsert_transaction(first.clone()))
        .expect("first commit");
    let err = store
        .commit(0, WriteBatch::new().upsert_transaction(second))
        .expect_err("stale commit");

    assert!(matches!(err, StoreError::Conflict { expected: 0, found: 1 }));
    let loaded = store.load().expect("load");
    assert_eq!(loaded.revision, 1);
    assert_eq!(loaded.transactions, vec![first]);
}

#[test]
fn income_application_commits_income_and_goals_together() {
    let dir = tempdir().expect("tempdir");
    let store = JsonFileStore::new(dir.path().join("nestegg.json"));
    let owner = OwnerId::new();
    let house = goal(owner, "House", dec!(50));
    let bike = goal(owner, "Bike", dec!(10));
    let setup = store
        .commit(
            0,
            WriteBatch::new()
                .upsert_goal(house.clone())
                .upsert_goal(bike.clone()),
        )
        .expect("setup");

    let salary = Transaction::income(owner, "Salary", Money::new(dec!(1000)), date(2024, 3, 1), "Job");
    let application = AllocationEngine::apply_income(&salary, &setup.goals).expect("allocate");
    let stored = store
        .commit(setup.revision, WriteBatch::from(&application))
        .expect("commit income");

    assert_eq!(stored.revision, 2);
    assert_eq!(stored.transactions.len(), 1);
    assert_eq!(stored.transactions[0].amount, Money::new(dec!(400)));
    assert_eq!(stored.transactions[0].original_amount, Some(Money::new(dec!(1000))));
    // Goal priority order survives the in-place update.
    let saved: Vec<(GoalId, Money)> = stored.goals.iter().map(|g| (g.id, g.saved_amount)).collect();
    assert_eq!(
        saved,
        vec![(house.id, Money::new(dec!(500))), (bike.id, Money::new(dec!(100)))]
    );
}

#[test]
fn delete_removes_records() {
    let dir = tempdir().expect("tempdir");
    let store = JsonFileStore::new(dir.path().join("nestegg.json"));
    let owner = OwnerId::new();
    let holiday = goal(owner, "Holiday", dec!(20));

    store
        .commit(0, WriteBatch::new().upsert_goal(holiday.clone()))
        .expect("insert");
    let after = store
        .commit(1, WriteBatch::new().delete_goal(holiday.id))
        .expect("delete");

    assert!(after.goals.is_empty());
    assert!(store.load().expect("load").goal(holiday.id).is_none());
}

#[test]
fn corrupt_file_reports_serde_error() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("nestegg.json");
    std::fs::write(&path, "{ not json").expect("write");
    let store = JsonFileStore::new(path);

    assert!(matches!(store.load(), Err(StoreError::Serde(_))));
}

#[test]
fn amounts_are_stored_as_strings() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("nestegg.json");
    let store = JsonFileStore::new(&path);
    let owner = OwnerId::new();
    let tx = Transaction::expense(owner, "Coffee", Money::new(dec!(3.10)), date(2024, 1, 1), "Food");

    store
        .commit(0, WriteBatch::new().upsert_transaction(tx))
        .expect("commit");

    let raw = std::fs::read_to_string(&path).expect("read");
    assert!(raw.contains("\"amount\": \"3.10\""));
    assert!(raw.contains("\"revision\": 1"));
}

#[test]
fn delete_budget_keeps_other_budgets_in_order() {
    let dir = tempdir().expect("tempdir");
    let store = JsonFileStore::new(dir.path().join("nestegg.json"));
    let owner = OwnerId::new();
    let budget = |category: &str| Budget {
        id: BudgetId::new(),
        owner_id: owner,
        kind: TransactionKind::Expense,
        category: category.to_string(),
        start_date: date(2024, 1, 1),
        end_date: date(2024, 1, 31),
        cap: Money::new(dec!(100)),
    };
    let (food, fuel, rent) = (budget("Food"), budget("Fuel"), budget("Rent"));

    store
        .commit(
            0,
            WriteBatch::new()
                .upsert_budget(food.clone())
                .upsert_budget(fuel.clone())
                .upsert_budget(rent.clone()),
        )
        .expect("insert");
    let after = store
        .commit(1, WriteBatch::new().delete_budget(fuel.id))
        .expect("delete");

    assert_eq!(after.budgets, vec![food, rent]);
    assert!(store.load().expect("load").budget(fuel.id).is_none());
}
