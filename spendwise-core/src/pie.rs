//! Category shares of a period's expenses.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::finance::{Category, Transaction};
use crate::period::Period;
use crate::spending::spend_by_category;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PieSlice {
    pub category: Category,
    pub amount: Decimal,
    /// Percentage of the period's total expense
    pub share: Decimal,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CategoryReport {
    pub period: Period,
    pub total_expense: Decimal,
    pub slices: Vec<PieSlice>,
}

/// Slices in category declaration order; zero-spend categories are left out.
pub fn pie_shares(transactions: &[Transaction], period: Period) -> CategoryReport {
    let spent = spend_by_category(transactions, period);
    let total_expense = spent.values().fold(Decimal::ZERO, |acc, v| acc.saturating_add(*v));

    let slices = Category::ALL
        .into_iter()
        .filter_map(|category| {
            let amount = spent.get(&category).copied()?;
            if amount <= Decimal::ZERO {
                return None;
            }
            Some(PieSlice {
                category,
                amount,
                share: amount
                    .checked_div(total_expense)
                    .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
                    .unwrap_or(Decimal::ONE_HUNDRED),
            })
        })
        .collect();

    CategoryReport {
        period,
        total_expense,
        slices,
    }
}
