//! spendwise-core: finance model, derived views and session state for SpendWise

pub mod advice;
pub mod bills;
pub mod budget;
pub mod demo;
pub mod finance;
pub mod monthly;
pub mod period;
pub mod pie;
pub mod profile;
pub mod session;
pub mod spending;
pub mod time;

pub use advice::{generate_avatar, spending_advice, InsightService};
pub use bills::{bills_overview, days_until_due, due_status, nearest_unpaid, BillsOverview, DueStatus, NextBill};
pub use budget::BudgetTable;
pub use finance::{Bill, Category, Transaction, TransactionType, MAX_AMOUNT};
pub use monthly::{monthly_totals, year_choices, years_with_activity, MonthlyBucket};
pub use period::Period;
pub use pie::{pie_shares, CategoryReport, PieSlice};
pub use profile::{format_currency, Currency, NotificationKind, NotificationPreferences, UserProfile};
pub use session::{AppState, Dashboard, NewBill, NewTransaction, ProfileUpdate};
pub use spending::{summarize_spending, utilization, CategoryBudgetLine, SpendingSummary};
