//! Plain-text screens for the session shell.

use chrono::{DateTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use spendwise_core::bills::due_status;
use spendwise_core::{
    format_currency, Bill, BillsOverview, BudgetTable, CategoryReport, Currency, Dashboard, Period, SpendingSummary,
    Transaction, TransactionType, UserProfile,
};
use std::fmt::Write;

const BAR_WIDTH: u32 = 24;

fn bar(value: Decimal, max: Decimal, width: u32) -> String {
    if max <= Decimal::ZERO || value <= Decimal::ZERO {
        return String::new();
    }
    let cells = value
        .checked_mul(Decimal::from(width))
        .and_then(|scaled| scaled.checked_div(max))
        .and_then(|cells| cells.round().to_usize())
        .unwrap_or(width as usize)
        .max(1);
    "#".repeat(cells.min(width as usize))
}

fn percent(p: Decimal) -> String {
    format!("{}%", p.round_dp(1).normalize())
}

fn signed_line(out: &mut String, t: &Transaction, currency: Currency) {
    let sign = match t.kind {
        TransactionType::Income => "+",
        TransactionType::Expense => "-",
    };
    let _ = writeln!(
        out,
        "  {}  {:<28} {:<13} {}{}",
        t.date.format("%b %d, %Y"),
        t.title,
        t.category,
        sign,
        format_currency(t.amount, currency)
    );
}

pub fn render_dashboard(d: &Dashboard, name: &str, years: &[i32], highlight: Option<u32>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Welcome back, {name}");
    let _ = writeln!(out, "Total balance: {}", format_currency(d.balance, d.currency));
    let _ = writeln!(out);
    let choices: Vec<String> = years
        .iter()
        .map(|&y| if y == d.year { format!("[{y}]") } else { y.to_string() })
        .collect();
    let _ = writeln!(out, "Years: {}", choices.join(" "));
    let _ = writeln!(out, "Income vs expense, {}", d.year);

    let max = d
        .months
        .iter()
        .flat_map(|m| [m.income, m.expense])
        .max()
        .unwrap_or(Decimal::ZERO);
    for m in &d.months {
        let marker = if highlight == Some(m.month) { '*' } else { ' ' };
        let _ = writeln!(
            out,
            "{marker}{:<4} in  {:<w$} {}",
            m.label,
            bar(m.income, max, BAR_WIDTH),
            format_currency(m.income, d.currency),
            w = BAR_WIDTH as usize
        );
        let _ = writeln!(
            out,
            "      out {:<w$} {}   net {}",
            bar(m.expense, max, BAR_WIDTH),
            format_currency(m.expense, d.currency),
            format_currency(m.net(), d.currency),
            w = BAR_WIDTH as usize
        );
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "Recent transactions");
    if d.recent.is_empty() {
        let _ = writeln!(out, "  No transactions yet.");
    }
    for t in &d.recent {
        signed_line(&mut out, t, d.currency);
    }
    out
}

pub fn render_expenses(s: &SpendingSummary, currency: Currency) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Expenses for {}", s.period.label());
    let _ = writeln!(
        out,
        "Income {}   Spent {}",
        format_currency(s.total_income, currency),
        format_currency(s.total_expense, currency)
    );
    let _ = writeln!(out);
    if s.lines.is_empty() {
        let _ = writeln!(out, "  No spending or budgets this month.");
    }

    let full = Decimal::from(100);
    for line in &s.lines {
        let _ = writeln!(
            out,
            "  {:<13} {} / {:<12} {:<20} {}{}",
            line.category,
            format_currency(line.spent, currency),
            format_currency(line.budget, currency),
            bar(line.utilization.min(full), full, 20),
            percent(line.utilization),
            if line.over_budget { "  OVER BUDGET" } else { "" }
        );
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "Recent Transactions ({})", s.period.month_name());
    if s.recent.is_empty() {
        let _ = writeln!(out, "  No expenses this month.");
    }
    for t in &s.recent {
        signed_line(&mut out, t, currency);
    }
    out
}

pub fn render_bills(overview: &BillsOverview, bills: &[Bill], currency: Currency, now: DateTime<Utc>) -> String {
    let mut out = String::new();
    match &overview.next {
        Some(next) => {
            let _ = writeln!(
                out,
                "Next bill: {} {} ({})",
                next.bill.title,
                format_currency(next.bill.amount, currency),
                next.status
            );
        }
        None => {
            let _ = writeln!(out, "All bills are paid.");
        }
    }
    let _ = writeln!(
        out,
        "Unpaid: {} bill(s), {}",
        overview.unpaid_count,
        format_currency(overview.unpaid_total, currency)
    );
    let _ = writeln!(out);

    for b in bills {
        let state = if b.is_paid {
            "Paid".to_string()
        } else {
            due_status(b, now).to_string()
        };
        let _ = writeln!(
            out,
            "  [{}] {:<20} {:<12} due {}  {}",
            b.id,
            b.title,
            format_currency(b.amount, currency),
            b.due_date.format("%Y-%m-%d"),
            state
        );
    }
    out
}

pub fn render_report(r: &CategoryReport, currency: Currency) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Report for {}", r.period.label());
    if r.slices.is_empty() {
        let _ = writeln!(out, "  No expenses this month.");
        return out;
    }
    let _ = writeln!(out, "Total spent: {}", format_currency(r.total_expense, currency));
    let full = Decimal::from(100);
    for s in &r.slices {
        let _ = writeln!(
            out,
            "  {:<13} {:<20} {:>6}  {}",
            s.category,
            bar(s.share, full, 20),
            percent(s.share),
            format_currency(s.amount, currency)
        );
    }
    out
}

pub fn render_budgets(budgets: &BudgetTable, currency: Currency) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Monthly budgets");
    for (c, amount) in budgets.iter() {
        let _ = writeln!(out, "  {:<13} {}", c, format_currency(amount, currency));
    }
    let _ = writeln!(out, "  {:<13} {}", "Total", format_currency(budgets.total(), currency));
    out
}

pub fn render_profile(p: &UserProfile) -> String {
    let on_off = |b: bool| if b { "on" } else { "off" };
    let mut out = String::new();
    let _ = writeln!(out, "Name:     {}", p.name);
    let _ = writeln!(out, "Currency: {} ({})", p.currency.code(), p.currency.symbol());
    let _ = writeln!(out, "Balance:  {}", format_currency(p.total_balance, p.currency));
    let avatar = if p.avatar_url.starts_with("data:") {
        "generated image"
    } else {
        p.avatar_url.as_str()
    };
    let _ = writeln!(out, "Avatar:   {avatar}");
    let n = &p.notification_preferences;
    let _ = writeln!(out, "Notifications:");
    let _ = writeln!(out, "  bill-reminders  {}", on_off(n.bill_reminders));
    let _ = writeln!(out, "  budget-alerts   {}", on_off(n.budget_alerts));
    let _ = writeln!(out, "  weekly-reports  {}", on_off(n.weekly_reports));
    out
}

pub fn period_hint(p: Period) -> String {
    format!("({} · use prev/next to change month)", p)
}
