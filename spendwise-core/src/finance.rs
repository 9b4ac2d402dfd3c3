//! Finance record types: transactions, bills, and their closed classifications.

use anyhow::{bail, Result};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Largest amount accepted for an entry or a budget ceiling (one trillion).
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(0xD4A5_1000, 0xE8, 0, false, 0);

/// A single dated income or expense record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Transaction {
    /// Unique identifier for this record
    pub id: String,
    pub title: String,
    /// Always non-negative; the direction comes from `kind`
    pub amount: Decimal,
    pub date: NaiveDate,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub category: Category,
}

impl Transaction {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        amount: Decimal,
        date: NaiveDate,
        kind: TransactionType,
        category: Category,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            amount,
            date,
            kind,
            category,
        }
    }

    pub fn is_expense(&self) -> bool {
        self.kind == TransactionType::Expense
    }

    pub fn is_income(&self) -> bool {
        self.kind == TransactionType::Income
    }

    /// Effect of this record on the running balance.
    pub fn signed_amount(&self) -> Decimal {
        match self.kind {
            TransactionType::Income => self.amount,
            TransactionType::Expense => -self.amount,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum TransactionType {
    #[serde(rename = "INCOME")]
    Income,
    #[serde(rename = "EXPENSE")]
    Expense,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Income => "INCOME",
            TransactionType::Expense => "EXPENSE",
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "income" => Ok(TransactionType::Income),
            "expense" => Ok(TransactionType::Expense),
            other => bail!("invalid transaction type '{other}' (use income or expense)"),
        }
    }
}

/// Closed set of spending/income categories.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    Food,
    Shopping,
    Transport,
    Bills,
    Health,
    Salary,
    Entertainment,
    Other,
}

impl Category {
    /// Declaration order; views use it to break ties and to order slices.
    pub const ALL: [Category; 8] = [
        Category::Food,
        Category::Shopping,
        Category::Transport,
        Category::Bills,
        Category::Health,
        Category::Salary,
        Category::Entertainment,
        Category::Other,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Category::Food => "Food",
            Category::Shopping => "Shopping",
            Category::Transport => "Transport",
            Category::Bills => "Bills",
            Category::Health => "Health",
            Category::Salary => "Salary",
            Category::Entertainment => "Entertainment",
            Category::Other => "Other",
        }
    }

    /// Salary is income-only and never carries a spending ceiling.
    pub fn is_budgeted(&self) -> bool {
        match self {
            Category::Salary => false,
            Category::Food
            | Category::Shopping
            | Category::Transport
            | Category::Bills
            | Category::Health
            | Category::Entertainment
            | Category::Other => true,
        }
    }

    /// Categories that appear in budget views and the budget editor.
    pub fn budgeted() -> impl Iterator<Item = Category> {
        Self::ALL.into_iter().filter(|c| c.is_budgeted())
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

impl FromStr for Category {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let needle = s.trim();
        Category::ALL
            .into_iter()
            .find(|c| c.name().eq_ignore_ascii_case(needle))
            .ok_or_else(|| anyhow::anyhow!("unknown category '{needle}'"))
    }
}

/// A payable obligation with a due date.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Bill {
    pub id: String,
    pub title: String,
    pub amount: Decimal,
    pub due_date: NaiveDate,
    pub is_paid: bool,
}

impl Bill {
    pub fn new(id: impl Into<String>, title: impl Into<String>, amount: Decimal, due_date: NaiveDate) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            amount,
            due_date,
            is_paid: false,
        }
    }

    /// One-way transition; paying twice is a no-op.
    pub fn mark_paid(&mut self) {
        self.is_paid = true;
    }
}
