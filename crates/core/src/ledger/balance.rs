//! Account balance calculations.
//!
//! The balance is a fold over the full transaction history. Goal allocation
//! earmarks part of an income for savings but does not move it out of the
//! account, so incomes always count at their gross (pre-allocation) amount.

use nestegg_shared::types::Money;
use serde::{Deserialize, Serialize};

use super::transaction::{Transaction, TransactionKind};

/// Totals behind the account balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerSummary {
    /// Sum of income at gross amount.
    pub total_income: Money,
    /// Sum of expenses.
    pub total_expenses: Money,
    /// Portion of income routed to savings goals.
    pub earmarked: Money,
    /// `total_income - total_expenses`.
    pub balance: Money,
}

/// Balance ledger over an in-memory transaction set.
pub struct BalanceLedger;

impl BalanceLedger {
    /// Computes the account balance.
    ///
    /// `sum(gross income) - sum(expenses)`. Order independent; recomputed
    /// fully on every call.
    #[must_use]
    pub fn balance(transactions: &[Transaction]) -> Money {
        transactions
            .iter()
            .map(|tx| match tx.kind {
                TransactionKind::Income => tx.gross_amount(),
                TransactionKind::Expense => -tx.amount,
            })
            .sum()
    }

    /// Computes the balance together with its income, expense and earmark totals.
    #[must_use]
    pub fn summary(transactions: &[Transaction]) -> LedgerSummary {
        let mut total_income = Money::ZERO;
        let mut total_expenses = Money::ZERO;
        let mut earmarked = Money::ZERO;

        for tx in transactions {
            match tx.kind {
                TransactionKind::Income => {
                    total_income += tx.gross_amount();
                    earmarked += tx.earmarked_amount();
                }
                TransactionKind::Expense => total_expenses += tx.amount,
            }
        }

        LedgerSummary {
            total_income,
            total_expenses,
            earmarked,
            balance: total_income - total_expenses,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use nestegg_shared::types::OwnerId;
    use proptest::prelude::*;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 10).unwrap()
    }

    fn income(amount: Decimal, original: Option<Decimal>) -> Transaction {
        let mut tx = Transaction::income(OwnerId::new(), "Pay", Money::new(amount), date(), "Job");
        tx.original_amount = original.map(Money::new);
        tx
    }

    fn expense(amount: Decimal) -> Transaction {
        Transaction::expense(OwnerId::new(), "Spend", Money::new(amount), date(), "Misc")
    }

    #[test]
    fn test_balance_empty_is_zero() {
        assert_eq!(BalanceLedger::balance(&[]), Money::ZERO);
    }

    #[test]
    fn test_balance_uses_original_income_amounts() {
        let transactions = vec![
            income(dec!(1000), Some(dec!(1000))),
            income(dec!(700), Some(dec!(1000))),
            expense(dec!(200)),
        ];

        assert_eq!(BalanceLedger::balance(&transactions), Money::new(dec!(1800)));
    }

    #[test]
    fn test_balance_can_go_negative() {
        let transactions = vec![income(dec!(100), None), expense(dec!(250))];
        assert_eq!(BalanceLedger::balance(&transactions), Money::new(dec!(-150)));
    }

    #[test]
    fn test_summary_reports_earmarked_income() {
        let transactions = vec![
            income(dec!(1000), None),
            income(dec!(700), Some(dec!(1000))),
            income(dec!(0), Some(dec!(50))),
            expense(dec!(200)),
        ];

        let summary = BalanceLedger::summary(&transactions);

        assert_eq!(summary.total_income, Money::new(dec!(2050)));
        assert_eq!(summary.total_expenses, Money::new(dec!(200)));
        assert_eq!(summary.earmarked, Money::new(dec!(350)));
        assert_eq!(summary.balance, Money::new(dec!(1850)));
        assert_eq!(summary.balance, BalanceLedger::balance(&transactions));
    }

    /// Strategy for a transaction: (is_income, stored cents, earmarked cents).
    fn transaction_strategy() -> impl Strategy<Value = Transaction> {
        (any::<bool>(), 1i64..10_000_000, 0i64..10_000_000).prop_map(
            |(is_income, cents, earmarked)| {
                if is_income {
                    let stored = Decimal::new(cents, 2);
                    let original = (earmarked > 0).then(|| stored + Decimal::new(earmarked, 2));
                    income(stored, original)
                } else {
                    expense(Decimal::new(cents, 2))
                }
            },
        )
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// The balance does not depend on transaction order.
        #[test]
        fn prop_balance_is_order_independent(
            transactions in prop::collection::vec(transaction_strategy(), 0..40),
        ) {
            let mut reversed = transactions.clone();
            reversed.reverse();
            let mut rotated = transactions.clone();
            if !rotated.is_empty() {
                rotated.rotate_left(transactions.len() / 2);
            }

            let balance = BalanceLedger::balance(&transactions);
            prop_assert_eq!(balance, BalanceLedger::balance(&reversed));
            prop_assert_eq!(balance, BalanceLedger::balance(&rotated));
        }

        /// The summary balance always agrees with the plain fold.
        #[test]
        fn prop_summary_matches_balance(
            transactions in prop::collection::vec(transaction_strategy(), 0..40),
        ) {
            let summary = BalanceLedger::summary(&transactions);
            prop_assert_eq!(summary.balance, BalanceLedger::balance(&transactions));
            prop_assert_eq!(summary.balance, summary.total_income - summary.total_expenses);
        }
    }
}
