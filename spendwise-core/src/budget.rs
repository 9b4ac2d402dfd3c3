//! Per-category spending ceilings.

use anyhow::{bail, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::finance::{Category, MAX_AMOUNT};

/// Budget table keyed by category. Missing entries read as zero.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct BudgetTable {
    ceilings: BTreeMap<Category, Decimal>,
}

impl BudgetTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ceilings the app starts with.
    pub fn defaults() -> Self {
        let mut table = Self::new();
        for category in Category::ALL {
            let amount = match category {
                Category::Food => 500,
                Category::Shopping => 1000,
                Category::Transport => 200,
                Category::Bills => 500,
                Category::Health => 300,
                Category::Salary => 0,
                Category::Entertainment => 150,
                Category::Other => 200,
            };
            table.ceilings.insert(category, Decimal::from(amount));
        }
        table
    }

    /// Ceiling for a category; Salary always reads as zero.
    pub fn get(&self, category: Category) -> Decimal {
        if !category.is_budgeted() {
            return Decimal::ZERO;
        }
        self.ceilings.get(&category).copied().unwrap_or(Decimal::ZERO)
    }

    /// Ceilings are kept to cents, so a sub-cent value reads as zero.
    pub fn set(&mut self, category: Category, amount: Decimal) -> Result<()> {
        if amount < Decimal::ZERO {
            bail!("Budget cannot be negative");
        }
        if amount > MAX_AMOUNT {
            bail!("Budget cannot exceed {}", MAX_AMOUNT);
        }
        self.ceilings.insert(category, amount.round_dp(2));
        Ok(())
    }

    pub fn with(mut self, category: Category, amount: Decimal) -> Result<Self> {
        self.set(category, amount)?;
        Ok(self)
    }

    /// Sum of all enforced ceilings.
    pub fn total(&self) -> Decimal {
        Category::budgeted().map(|c| self.get(c)).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Category, Decimal)> + '_ {
        Category::budgeted().map(|c| (c, self.get(c)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let table = BudgetTable::defaults();
        assert_eq!(table.get(Category::Food), Decimal::from(500));
        assert_eq!(table.get(Category::Shopping), Decimal::from(1000));
        assert_eq!(table.get(Category::Salary), Decimal::ZERO);
        assert_eq!(table.total(), Decimal::from(2850));
    }

    #[test]
    fn test_negative_rejected() {
        let mut table = BudgetTable::new();
        let err = table.set(Category::Food, Decimal::from(-1)).unwrap_err();
        assert_eq!(err.to_string(), "Budget cannot be negative");
        assert_eq!(table.get(Category::Food), Decimal::ZERO);
    }

    #[test]
    fn test_salary_ceiling_ignored() {
        let table = BudgetTable::new().with(Category::Salary, Decimal::from(900)).unwrap();
        assert_eq!(table.get(Category::Salary), Decimal::ZERO);
        assert!(table.iter().all(|(c, _)| c != Category::Salary));
    }

    #[test]
    fn test_ceiling_rounds_to_cents() {
        let mut table = BudgetTable::new();
        table.set(Category::Food, Decimal::new(1, 28)).unwrap();
        assert_eq!(table.get(Category::Food), Decimal::ZERO);
        table.set(Category::Health, Decimal::new(12_345, 3)).unwrap();
        assert_eq!(table.get(Category::Health), Decimal::new(1235, 2));
    }

    #[test]
    fn test_ceiling_above_max_rejected() {
        let mut table = BudgetTable::defaults();
        let err = table.set(Category::Food, MAX_AMOUNT + Decimal::ONE).unwrap_err();
        assert_eq!(err.to_string(), "Budget cannot exceed 1000000000000");
        assert_eq!(table.get(Category::Food), Decimal::from(500));
        table.set(Category::Food, MAX_AMOUNT).unwrap();
        assert_eq!(table.get(Category::Food), MAX_AMOUNT);
    }
}
