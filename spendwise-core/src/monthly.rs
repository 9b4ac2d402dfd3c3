//! Month-bucketed income/expense totals for the yearly chart.

use chrono::Datelike;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::finance::{Transaction, TransactionType};
use crate::period::MONTH_SHORT;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MonthlyBucket {
    /// 1..=12
    pub month: u32,
    pub label: &'static str,
    pub income: Decimal,
    pub expense: Decimal,
}

impl MonthlyBucket {
    pub fn net(&self) -> Decimal {
        self.income.saturating_sub(self.expense)
    }
}

/// Twelve buckets (Jan..Dec) for `year`. Records from other years are ignored.
pub fn monthly_totals(transactions: &[Transaction], year: i32) -> Vec<MonthlyBucket> {
    let mut buckets: Vec<MonthlyBucket> = MONTH_SHORT
        .iter()
        .enumerate()
        .map(|(i, &label)| MonthlyBucket {
            month: i as u32 + 1,
            label,
            income: Decimal::ZERO,
            expense: Decimal::ZERO,
        })
        .collect();

    for t in transactions.iter().filter(|t| t.date.year() == year) {
        let bucket = &mut buckets[t.date.month0() as usize];
        match t.kind {
            TransactionType::Income => bucket.income = bucket.income.saturating_add(t.amount),
            TransactionType::Expense => bucket.expense = bucket.expense.saturating_add(t.amount),
        }
    }

    buckets
}

/// Years that have at least one record, newest first.
pub fn years_with_activity(transactions: &[Transaction]) -> Vec<i32> {
    let mut years: Vec<i32> = transactions.iter().map(|t| t.date.year()).collect();
    years.sort_unstable_by(|a, b| b.cmp(a));
    years.dedup();
    years
}

/// Years offered by the dashboard chart: the current year, the two before it,
/// and any year with records. Newest first, no duplicates.
pub fn year_choices(transactions: &[Transaction], current_year: i32) -> Vec<i32> {
    let mut years = years_with_activity(transactions);
    years.extend((current_year - 2)..=current_year);
    years.sort_unstable_by(|a, b| b.cmp(a));
    years.dedup();
    years
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::finance::Category;
    use chrono::NaiveDate;

    fn tx(y: i32, m: u32, amount: i64, kind: TransactionType) -> Transaction {
        Transaction::new(
            format!("{y}-{m}-{amount}"),
            "t",
            Decimal::from(amount),
            NaiveDate::from_ymd_opt(y, m, 10).unwrap(),
            kind,
            Category::Other,
        )
    }

    #[test]
    fn test_empty_input_yields_zero_buckets() {
        let buckets = monthly_totals(&[], 2024);
        assert_eq!(buckets.len(), 12);
        assert_eq!(buckets[0].label, "Jan");
        assert_eq!(buckets[11].label, "Dec");
        assert!(buckets.iter().all(|b| b.income.is_zero() && b.expense.is_zero()));
    }

    #[test]
    fn test_other_years_excluded() {
        let txns = vec![
            tx(2024, 4, 100, TransactionType::Expense),
            tx(2023, 4, 500, TransactionType::Expense),
            tx(2024, 4, 7000, TransactionType::Income),
            tx(2025, 1, 9, TransactionType::Income),
        ];
        let buckets = monthly_totals(&txns, 2024);
        assert_eq!(buckets[3].expense, Decimal::from(100));
        assert_eq!(buckets[3].income, Decimal::from(7000));
        assert_eq!(buckets[3].net(), Decimal::from(6900));
        assert!(buckets[0].income.is_zero());
    }

    #[test]
    fn test_bucket_sums_match_year_totals() {
        let txns: Vec<Transaction> = (1..=12)
            .flat_map(|m| {
                vec![
                    tx(2024, m, (m * 10) as i64, TransactionType::Income),
                    tx(2024, m, m as i64, TransactionType::Expense),
                    tx(2024, m, 3, TransactionType::Expense),
                ]
            })
            .collect();
        let buckets = monthly_totals(&txns, 2024);

        let income: Decimal = buckets.iter().map(|b| b.income).sum();
        let expense: Decimal = buckets.iter().map(|b| b.expense).sum();
        let want_income: Decimal = txns.iter().filter(|t| t.is_income()).map(|t| t.amount).sum();
        let want_expense: Decimal = txns.iter().filter(|t| t.is_expense()).map(|t| t.amount).sum();
        assert_eq!(income, want_income);
        assert_eq!(expense, want_expense);
    }

    #[test]
    fn test_years_with_activity() {
        let txns = vec![
            tx(2023, 1, 1, TransactionType::Income),
            tx(2024, 1, 1, TransactionType::Income),
            tx(2023, 5, 1, TransactionType::Expense),
        ];
        assert_eq!(years_with_activity(&txns), vec![2024, 2023]);
    }

    #[test]
    fn test_year_choices_merge_recent_and_active_years() {
        assert_eq!(year_choices(&[], 2024), vec![2024, 2023, 2022]);

        let txns = vec![
            tx(2019, 6, 1, TransactionType::Expense),
            tx(2023, 1, 1, TransactionType::Income),
            tx(2025, 2, 1, TransactionType::Income),
        ];
        assert_eq!(year_choices(&txns, 2024), vec![2025, 2024, 2023, 2022, 2019]);
    }

    #[test]
    fn test_bucket_totals_saturate() {
        let mut big = tx(2024, 3, 0, TransactionType::Income);
        big.amount = Decimal::MAX;
        let txns = vec![big.clone(), big, tx(2024, 3, 5, TransactionType::Expense)];
        let buckets = monthly_totals(&txns, 2024);
        assert_eq!(buckets[2].income, Decimal::MAX);
        assert_eq!(buckets[2].net(), Decimal::MAX - Decimal::from(5));

        let mut spent = tx(2024, 7, 0, TransactionType::Expense);
        spent.amount = Decimal::MAX;
        let mut drained = monthly_totals(&[spent], 2024);
        drained[6].income = Decimal::MIN;
        assert_eq!(drained[6].net(), Decimal::MIN);
    }
}
