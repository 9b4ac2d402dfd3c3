//! Nearest unpaid bill and due-date status.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use std::fmt;

use crate::finance::Bill;
use crate::time::{ceil_days_between, start_of_day_utc};

/// Whole days until a bill is due, relative to a moment.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub enum DueStatus {
    Overdue(i64),
    DueToday,
    DueIn(i64),
}

impl DueStatus {
    pub fn from_days(days: i64) -> Self {
        match days {
            d if d < 0 => DueStatus::Overdue(-d),
            0 => DueStatus::DueToday,
            d => DueStatus::DueIn(d),
        }
    }
}

impl fmt::Display for DueStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DueStatus::Overdue(days) => write!(f, "Overdue by {days} days"),
            DueStatus::DueToday => f.write_str("Due today"),
            DueStatus::DueIn(days) => write!(f, "Due in {days} days"),
        }
    }
}

/// ceil((due - now) / 1 day); due dates start at midnight UTC.
pub fn days_until_due(bill: &Bill, now: DateTime<Utc>) -> i64 {
    ceil_days_between(now, start_of_day_utc(bill.due_date))
}

pub fn due_status(bill: &Bill, now: DateTime<Utc>) -> DueStatus {
    DueStatus::from_days(days_until_due(bill, now))
}

/// Unpaid bill with the earliest due date; the first one wins on ties.
pub fn nearest_unpaid(bills: &[Bill]) -> Option<&Bill> {
    bills.iter().filter(|b| !b.is_paid).min_by_key(|b| b.due_date)
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct BillsOverview {
    pub next: Option<NextBill>,
    pub unpaid_total: Decimal,
    pub unpaid_count: usize,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct NextBill {
    pub bill: Bill,
    pub days_until_due: i64,
    pub status: DueStatus,
}

pub fn bills_overview(bills: &[Bill], now: DateTime<Utc>) -> BillsOverview {
    let next = nearest_unpaid(bills).map(|bill| {
        let days = days_until_due(bill, now);
        NextBill {
            bill: bill.clone(),
            days_until_due: days,
            status: DueStatus::from_days(days),
        }
    });
    let unpaid: Vec<&Bill> = bills.iter().filter(|b| !b.is_paid).collect();
    BillsOverview {
        next,
        unpaid_total: unpaid.iter().fold(Decimal::ZERO, |acc, b| acc.saturating_add(b.amount)),
        unpaid_count: unpaid.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone};

    fn bill(id: &str, day: u32, paid: bool) -> Bill {
        let mut b = Bill::new(id, id, Decimal::from(10), NaiveDate::from_ymd_opt(2024, 4, day).unwrap());
        b.is_paid = paid;
        b
    }

    #[test]
    fn test_paid_earlier_bill_is_ignored() {
        let bills = vec![bill("day5", 5, false), bill("day2", 2, true)];
        assert_eq!(nearest_unpaid(&bills).unwrap().id, "day5");
    }

    #[test]
    fn test_all_paid_yields_none() {
        let bills = vec![bill("a", 5, true), bill("b", 2, true)];
        assert!(nearest_unpaid(&bills).is_none());
        assert!(nearest_unpaid(&[]).is_none());
    }

    #[test]
    fn test_tie_first_encountered_wins() {
        let bills = vec![bill("late", 20, false), bill("first", 15, false), bill("second", 15, false)];
        assert_eq!(nearest_unpaid(&bills).unwrap().id, "first");
    }

    #[test]
    fn test_due_status_wording() {
        let b = bill("x", 15, false);
        let midday_before = Utc.with_ymd_and_hms(2024, 4, 12, 12, 0, 0).unwrap();
        assert_eq!(days_until_due(&b, midday_before), 3);
        assert_eq!(due_status(&b, midday_before).to_string(), "Due in 3 days");

        let same_day = Utc.with_ymd_and_hms(2024, 4, 15, 9, 0, 0).unwrap();
        assert_eq!(due_status(&b, same_day), DueStatus::DueToday);
        assert_eq!(DueStatus::DueToday.to_string(), "Due today");

        let later = Utc.with_ymd_and_hms(2024, 4, 18, 9, 0, 0).unwrap();
        assert_eq!(days_until_due(&b, later), -2);
        assert_eq!(due_status(&b, later).to_string(), "Overdue by 2 days");
    }

    #[test]
    fn test_overview_totals() {
        let bills = vec![bill("a", 15, false), bill("b", 1, true), bill("c", 20, false)];
        let now = Utc.with_ymd_and_hms(2024, 4, 10, 0, 0, 0).unwrap();
        let overview = bills_overview(&bills, now);
        assert_eq!(overview.unpaid_count, 2);
        assert_eq!(overview.unpaid_total, Decimal::from(20));
        let next = overview.next.unwrap();
        assert_eq!(next.bill.id, "a");
        assert_eq!(next.days_until_due, 5);
    }

    #[test]
    fn test_unpaid_total_saturates() {
        let mut a = bill("a", 15, false);
        a.amount = Decimal::MAX;
        let mut b = bill("b", 16, false);
        b.amount = Decimal::MAX;
        let now = Utc.with_ymd_and_hms(2024, 4, 10, 0, 0, 0).unwrap();
        let overview = bills_overview(&[a, b], now);
        assert_eq!(overview.unpaid_total, Decimal::MAX);
        assert_eq!(overview.unpaid_count, 2);
    }
}
