//! Session state: the single owner of profile, ledger, bills and budgets.
//!
//! Every mutation goes through `AppState`; views borrow its collections.

use anyhow::{bail, Result};
use chrono::{DateTime, NaiveDate, Utc};
use log::{debug, info};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::bills::{bills_overview, BillsOverview};
use crate::budget::BudgetTable;
use crate::demo;
use crate::finance::{Bill, Category, Transaction, TransactionType, MAX_AMOUNT};
use crate::monthly::{monthly_totals, MonthlyBucket};
use crate::period::Period;
use crate::pie::{pie_shares, CategoryReport};
use crate::profile::{Currency, NotificationPreferences, UserProfile};
use crate::spending::{summarize_spending, SpendingSummary};

/// Number of entries the dashboard lists.
pub const RECENT_LIMIT: usize = 5;

/// User-submitted income or expense.
#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub title: String,
    pub amount: Decimal,
    pub date: NaiveDate,
    pub kind: TransactionType,
    pub category: Category,
}

/// User-submitted bill; always starts unpaid.
#[derive(Debug, Clone)]
pub struct NewBill {
    pub title: String,
    pub amount: Decimal,
    pub due_date: NaiveDate,
}

/// Fields a user may edit on the profile screen. `None` leaves a field as is.
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub avatar_url: Option<String>,
    pub notification_preferences: Option<NotificationPreferences>,
    pub currency: Option<Currency>,
}

#[derive(Debug, Clone)]
pub struct Dashboard {
    pub year: i32,
    pub balance: Decimal,
    pub currency: Currency,
    pub months: Vec<MonthlyBucket>,
    pub recent: Vec<Transaction>,
}

#[derive(Debug, Clone)]
pub struct AppState {
    profile: UserProfile,
    transactions: Vec<Transaction>,
    bills: Vec<Bill>,
    budgets: BudgetTable,
}

impl AppState {
    pub fn new(profile: UserProfile, transactions: Vec<Transaction>, bills: Vec<Bill>, budgets: BudgetTable) -> Self {
        let mut transactions = transactions;
        transactions.sort_by(|a, b| b.date.cmp(&a.date));
        Self {
            profile,
            transactions,
            bills,
            budgets,
        }
    }

    /// Empty ledger and zero balance.
    pub fn new_user(name: impl Into<String>) -> Self {
        let profile = UserProfile::new_user(name);
        info!("starting new-user session for {}", profile.name);
        Self::new(profile, Vec::new(), Vec::new(), BudgetTable::defaults())
    }

    /// Returning user: demo ledger under the given name.
    pub fn demo(name: impl Into<String>) -> Self {
        let profile = demo::demo_profile(name);
        info!("starting demo session for {}", profile.name);
        Self::new(profile, demo::demo_transactions(), demo::demo_bills(), BudgetTable::defaults())
    }

    pub fn profile(&self) -> &UserProfile {
        &self.profile
    }

    /// Newest first.
    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn recent_transactions(&self) -> &[Transaction] {
        let n = self.transactions.len().min(RECENT_LIMIT);
        &self.transactions[..n]
    }

    pub fn bills(&self) -> &[Bill] {
        &self.bills
    }

    pub fn budgets(&self) -> &BudgetTable {
        &self.budgets
    }

    pub fn add_transaction(&mut self, entry: NewTransaction) -> Result<&Transaction> {
        validate_entry(&entry.title, entry.amount)?;

        let txn = Transaction::new(
            Uuid::new_v4().to_string(),
            entry.title.trim(),
            entry.amount,
            entry.date,
            entry.kind,
            entry.category,
        );

        // Newest first; a new entry goes ahead of older ones sharing its date.
        let idx = self
            .transactions
            .iter()
            .position(|t| t.date <= txn.date)
            .unwrap_or(self.transactions.len());

        let Some(balance) = self.profile.total_balance.checked_add(txn.signed_amount()) else {
            bail!("Balance would overflow");
        };
        self.profile.total_balance = balance;
        info!(
            "added {} '{}' {} ({}), balance now {}",
            txn.kind, txn.title, txn.amount, txn.category, self.profile.total_balance
        );

        self.transactions.insert(idx, txn);
        Ok(&self.transactions[idx])
    }

    /// Bills never touch the balance.
    pub fn add_bill(&mut self, entry: NewBill) -> Result<&Bill> {
        validate_entry(&entry.title, entry.amount)?;

        let bill = Bill::new(Uuid::new_v4().to_string(), entry.title.trim(), entry.amount, entry.due_date);
        info!("added bill '{}' {} due {}", bill.title, bill.amount, bill.due_date);
        self.bills.push(bill);
        let last = self.bills.len() - 1;
        Ok(&self.bills[last])
    }

    /// Paying a bill is not modeled as a transaction.
    pub fn mark_bill_paid(&mut self, id: &str) -> Result<&Bill> {
        let Some(idx) = self.bills.iter().position(|b| b.id == id) else {
            bail!("Bill '{}' not found", id);
        };
        let bill = &mut self.bills[idx];
        if bill.is_paid {
            debug!("bill {} already paid", bill.id);
        } else {
            bill.mark_paid();
            info!("marked bill '{}' as paid", bill.title);
        }
        Ok(&self.bills[idx])
    }

    /// Full replacement; categories missing from `budgets` read as zero afterwards.
    pub fn replace_budgets(&mut self, budgets: BudgetTable) {
        info!("budgets replaced, total ceiling {}", budgets.total());
        self.budgets = budgets;
    }

    pub fn update_profile(&mut self, update: ProfileUpdate) -> Result<&UserProfile> {
        if let Some(name) = update.name.as_deref() {
            if name.trim().is_empty() {
                bail!("Name cannot be empty");
            }
        }

        if let Some(name) = update.name {
            self.profile.name = name.trim().to_string();
        }
        if let Some(avatar) = update.avatar_url {
            self.profile.avatar_url = avatar;
        }
        if let Some(prefs) = update.notification_preferences {
            self.profile.notification_preferences = prefs;
        }
        if let Some(currency) = update.currency {
            self.profile.currency = currency;
        }
        info!("profile updated for {}", self.profile.name);
        Ok(&self.profile)
    }

    pub fn dashboard(&self, year: i32) -> Dashboard {
        Dashboard {
            year,
            balance: self.profile.total_balance,
            currency: self.profile.currency,
            months: monthly_totals(&self.transactions, year),
            recent: self.recent_transactions().to_vec(),
        }
    }

    pub fn expenses(&self, period: Period) -> SpendingSummary {
        summarize_spending(&self.transactions, period, &self.budgets)
    }

    pub fn bills_overview(&self, now: DateTime<Utc>) -> BillsOverview {
        bills_overview(&self.bills, now)
    }

    pub fn report(&self, period: Period) -> CategoryReport {
        pie_shares(&self.transactions, period)
    }

    /// Period the expenses/reports screens open on.
    pub fn initial_period(&self, today: NaiveDate) -> Period {
        Period::initial_for(&self.transactions, today)
    }
}

fn validate_entry(title: &str, amount: Decimal) -> Result<()> {
    if title.trim().is_empty() {
        bail!("Title cannot be empty");
    }
    if amount < Decimal::ZERO {
        bail!("Amount cannot be negative");
    }
    if amount > MAX_AMOUNT {
        bail!("Amount cannot exceed {}", MAX_AMOUNT);
    }
    Ok(())
}
