//! Per-category spend and budget utilization for one period.

use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::HashMap;

use crate::budget::BudgetTable;
use crate::finance::{Category, Transaction, TransactionType};
use crate::period::Period;

const HUNDRED: Decimal = Decimal::ONE_HUNDRED;
const RECENT_EXPENSES: usize = 3;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CategoryBudgetLine {
    pub category: Category,
    pub spent: Decimal,
    pub budget: Decimal,
    /// spent / budget * 100, uncapped
    pub utilization: Decimal,
    pub over_budget: bool,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SpendingSummary {
    pub period: Period,
    pub total_income: Decimal,
    pub total_expense: Decimal,
    /// Sorted by spend descending; zero-spend/zero-budget categories omitted
    pub lines: Vec<CategoryBudgetLine>,
    /// First few expenses of the period, in ledger order
    pub recent: Vec<Transaction>,
}

/// Utilization percentage: 0 when both are zero, 100 when there is spend but no ceiling.
/// Saturates at `Decimal::MAX` when the ratio does not fit.
pub fn utilization(spent: Decimal, budget: Decimal) -> Decimal {
    if budget > Decimal::ZERO {
        spent
            .checked_div(budget)
            .and_then(|ratio| ratio.checked_mul(HUNDRED))
            .unwrap_or(Decimal::MAX)
    } else if spent > Decimal::ZERO {
        HUNDRED
    } else {
        Decimal::ZERO
    }
}

/// EXPENSE totals per category within `period`.
pub fn spend_by_category(transactions: &[Transaction], period: Period) -> HashMap<Category, Decimal> {
    let mut totals: HashMap<Category, Decimal> = HashMap::new();
    for t in transactions
        .iter()
        .filter(|t| t.kind == TransactionType::Expense && period.contains(t.date))
    {
        let total = totals.entry(t.category).or_insert(Decimal::ZERO);
        *total = total.saturating_add(t.amount);
    }
    totals
}

pub fn summarize_spending(transactions: &[Transaction], period: Period, budgets: &BudgetTable) -> SpendingSummary {
    let mut total_income = Decimal::ZERO;
    let mut total_expense = Decimal::ZERO;
    for t in transactions.iter().filter(|t| period.contains(t.date)) {
        match t.kind {
            TransactionType::Income => total_income = total_income.saturating_add(t.amount),
            TransactionType::Expense => total_expense = total_expense.saturating_add(t.amount),
        }
    }

    let spent = spend_by_category(transactions, period);
    let recent = transactions
        .iter()
        .filter(|t| t.kind == TransactionType::Expense && period.contains(t.date))
        .take(RECENT_EXPENSES)
        .cloned()
        .collect();

    let mut lines: Vec<CategoryBudgetLine> = Category::budgeted()
        .map(|category| {
            let spent = spent.get(&category).copied().unwrap_or(Decimal::ZERO);
            let budget = budgets.get(category);
            CategoryBudgetLine {
                category,
                spent,
                budget,
                utilization: utilization(spent, budget),
                over_budget: spent > budget && budget > Decimal::ZERO,
            }
        })
        .filter(|line| !(line.spent.is_zero() && line.budget.is_zero()))
        .collect();

    // stable: ties keep declaration order
    lines.sort_by(|a, b| b.spent.cmp(&a.spent));

    SpendingSummary {
        period,
        total_income,
        total_expense,
        lines,
        recent,
    }
}
