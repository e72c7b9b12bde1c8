//! Aggregation output types.

use nestegg_shared::types::{Money, MonthKey};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Income and expense totals of one calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregatedBucket {
    /// Calendar year.
    pub year: i32,
    /// Month, 1 through 12.
    pub month: u32,
    /// Sum of income amounts.
    pub income_total: Money,
    /// Sum of expense amounts.
    pub expense_total: Money,
    /// `income_total - expense_total`.
    pub net: Money,
}

impl AggregatedBucket {
    pub(crate) fn empty(key: MonthKey) -> Self {
        Self {
            year: key.year,
            month: key.month,
            income_total: Money::ZERO,
            expense_total: Money::ZERO,
            net: Money::ZERO,
        }
    }

    /// The bucket's month.
    #[must_use]
    pub fn key(&self) -> MonthKey {
        MonthKey {
            year: self.year,
            month: self.month,
        }
    }
}

/// Parallel vectors for a line or bar chart, one entry per bucket.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartSeries {
    /// Axis labels such as "January 2024".
    pub labels: Vec<String>,
    /// Income per bucket.
    pub income_totals: Vec<Money>,
    /// Expenses per bucket.
    pub expense_totals: Vec<Money>,
    /// Net per bucket.
    pub net_totals: Vec<Money>,
}

/// Sum of one category's transactions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryTotal {
    /// Category label.
    pub category: String,
    /// Summed amount.
    pub total: Money,
    /// Share of the kind's overall total, 2 decimals.
    pub share_percent: Decimal,
}
