//! Time-series aggregation.
//!
//! Buckets are keyed by the UTC calendar month of each transaction's date and
//! summed over the stored `amount`. For incomes that went through goal
//! allocation this is the post-allocation amount.

use std::collections::BTreeMap;

use nestegg_shared::types::{Money, MonthKey};

use super::types::{AggregatedBucket, CategoryTotal, ChartSeries};
use crate::ledger::{Transaction, TransactionKind};

/// Service rolling transactions into monthly buckets.
pub struct TimeSeriesAggregator;

impl TimeSeriesAggregator {
    /// Groups transactions into chronological `(year, month)` buckets.
    ///
    /// Every month with at least one transaction yields exactly one bucket;
    /// a month with only one kind reports zero for the other. Input order
    /// has no effect on the output. Empty input gives an empty series.
    #[must_use]
    pub fn aggregate(transactions: &[Transaction]) -> Vec<AggregatedBucket> {
        let mut buckets: BTreeMap<MonthKey, AggregatedBucket> = BTreeMap::new();

        for tx in transactions {
            let bucket = buckets
                .entry(tx.month())
                .or_insert_with_key(|key| AggregatedBucket::empty(*key));
            match tx.kind {
                TransactionKind::Income => bucket.income_total += tx.amount,
                TransactionKind::Expense => bucket.expense_total += tx.amount,
            }
        }

        buckets
            .into_values()
            .map(|bucket| AggregatedBucket {
                net: bucket.income_total - bucket.expense_total,
                ..bucket
            })
            .collect()
    }

    /// Reshapes buckets into parallel chart vectors.
    #[must_use]
    pub fn chart_series(buckets: &[AggregatedBucket]) -> ChartSeries {
        let mut series = ChartSeries::default();
        for bucket in buckets {
            series.labels.push(bucket.key().to_string());
            series.income_totals.push(bucket.income_total);
            series.expense_totals.push(bucket.expense_total);
            series.net_totals.push(bucket.net);
        }
        series
    }

    /// Transactions dated within `month`, in input order.
    #[must_use]
    pub fn in_month(transactions: &[Transaction], month: MonthKey) -> Vec<&Transaction> {
        transactions
            .iter()
            .filter(|tx| month.contains(tx.date))
            .collect()
    }

    /// Per-category totals for one kind, largest first.
    ///
    /// Ties are broken by category name so the order is stable.
    #[must_use]
    pub fn category_totals(
        transactions: &[Transaction],
        kind: TransactionKind,
    ) -> Vec<CategoryTotal> {
        let mut by_category: BTreeMap<&str, Money> = BTreeMap::new();
        for tx in transactions.iter().filter(|tx| tx.kind == kind) {
            *by_category.entry(tx.category.as_str()).or_default() += tx.amount;
        }

        let overall: Money = by_category.values().sum();
        let mut totals: Vec<CategoryTotal> = by_category
            .into_iter()
            .map(|(category, total)| CategoryTotal {
                category: category.to_string(),
                total,
                share_percent: total.percentage_of(overall),
            })
            .collect();

        totals.sort_by(|a, b| {
            b.total
                .cmp(&a.total)
                .then_with(|| a.category.cmp(&b.category))
        });
        totals
    }
}
