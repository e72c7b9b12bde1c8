//! Income and expense transactions.

use chrono::NaiveDate;
use nestegg_shared::types::{Money, MonthKey, OwnerId, TransactionId};
use serde::{Deserialize, Serialize};

/// Whether money came in or went out. Budgets carry the same kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    /// Money received.
    Income,
    /// Money spent.
    Expense,
}

impl std::fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Income => write!(f, "income"),
            Self::Expense => write!(f, "expense"),
        }
    }
}

/// A dated income or expense record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// Unique identifier.
    pub id: TransactionId,
    /// Owner of the record.
    pub owner_id: OwnerId,
    /// Income or expense.
    pub kind: TransactionKind,
    /// Free-form label.
    pub name: String,
    /// Stored amount. For income this is what remains after goal allocation.
    pub amount: Money,
    /// Income only: the amount before goal allocation reduced `amount`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_amount: Option<Money>,
    /// UTC calendar date the transaction happened on.
    pub date: NaiveDate,
    /// Category label, matched exactly against budgets.
    pub category: String,
}

impl Transaction {
    /// Creates an income record that has not been through goal allocation.
    #[must_use]
    pub fn income(
        owner_id: OwnerId,
        name: impl Into<String>,
        amount: Money,
        date: NaiveDate,
        category: impl Into<String>,
    ) -> Self {
        Self::new(owner_id, TransactionKind::Income, name, amount, date, category)
    }

    /// Creates an expense record.
    #[must_use]
    pub fn expense(
        owner_id: OwnerId,
        name: impl Into<String>,
        amount: Money,
        date: NaiveDate,
        category: impl Into<String>,
    ) -> Self {
        Self::new(owner_id, TransactionKind::Expense, name, amount, date, category)
    }

    fn new(
        owner_id: OwnerId,
        kind: TransactionKind,
        name: impl Into<String>,
        amount: Money,
        date: NaiveDate,
        category: impl Into<String>,
    ) -> Self {
        Self {
            id: TransactionId::new(),
            owner_id,
            kind,
            name: name.into(),
            amount,
            original_amount: None,
            date,
            category: category.into(),
        }
    }

    /// Returns true for income records.
    #[must_use]
    pub fn is_income(&self) -> bool {
        self.kind == TransactionKind::Income
    }

    /// The amount as earned or spent, before any goal earmarking.
    ///
    /// For income this is `original_amount` when present, otherwise `amount`.
    #[must_use]
    pub fn gross_amount(&self) -> Money {
        match self.kind {
            TransactionKind::Income => self.original_amount.unwrap_or(self.amount),
            TransactionKind::Expense => self.amount,
        }
    }

    /// The portion of an income routed to savings goals.
    #[must_use]
    pub fn earmarked_amount(&self) -> Money {
        self.gross_amount().saturating_sub(self.amount)
    }

    /// The month this transaction is bucketed in.
    #[must_use]
    pub fn month(&self) -> MonthKey {
        MonthKey::of(self.date)
    }

    /// Returns true if this transaction has the given kind and category.
    #[must_use]
    pub fn matches(&self, kind: TransactionKind, category: &str) -> bool {
        self.kind == kind && self.category == category
    }
}
