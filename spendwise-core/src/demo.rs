//! Seed data for returning users.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::finance::{Bill, Category, Transaction, TransactionType};
use crate::profile::{Currency, NotificationPreferences, UserProfile};

const DEMO_YEAR: i32 = 2024;

fn april(day: u32) -> NaiveDate {
    // April always has these days
    NaiveDate::from_ymd_opt(DEMO_YEAR, 4, day).unwrap_or(NaiveDate::MIN)
}

pub fn demo_profile(name: impl Into<String>) -> UserProfile {
    UserProfile {
        name: name.into(),
        avatar_url: "https://picsum.photos/100/100".to_string(),
        total_balance: Decimal::new(5_976_500, 2),
        notification_preferences: NotificationPreferences::default(),
        currency: Currency::Usd,
    }
}

/// Newest first.
pub fn demo_transactions() -> Vec<Transaction> {
    use Category::*;
    use TransactionType::*;

    let mut txns = vec![
        Transaction::new("1", "Puma Store", Decimal::from(952), april(5), Expense, Shopping),
        Transaction::new("2", "Nike Super Store", Decimal::from(475), april(5), Expense, Shopping),
        Transaction::new("3", "Uber Ride", Decimal::new(2450, 2), april(4), Expense, Transport),
        Transaction::new("4", "Monthly Salary", Decimal::from(7000), april(1), Income, Salary),
        Transaction::new("5", "Whole Foods", Decimal::new(12430, 2), april(6), Expense, Food),
        Transaction::new("6", "Netflix Subscription", Decimal::new(1599, 2), april(7), Expense, Entertainment),
    ];
    txns.sort_by(|a, b| b.date.cmp(&a.date));
    txns
}

pub fn demo_bills() -> Vec<Bill> {
    let mut rent = Bill::new("103", "House Rent", Decimal::new(250_000, 2), april(1));
    rent.mark_paid();
    vec![
        Bill::new("101", "Electricity Bill", Decimal::new(14520, 2), april(15)),
        Bill::new("102", "Internet - Fiber", Decimal::new(6000, 2), april(20)),
        rent,
    ]
}
