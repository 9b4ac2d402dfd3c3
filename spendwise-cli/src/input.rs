//! Parsing of the one-line entry forms typed into the shell.
//!
//! `date, title, amount[, category]` with CSV quoting, so a title may
//! contain commas when quoted. A blank date means today.

use anyhow::{anyhow, bail, Context, Result};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use spendwise_core::{Category, NewBill, NewTransaction, TransactionType};
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq)]
pub struct EntryFields {
    pub date: NaiveDate,
    pub title: String,
    pub amount: Decimal,
    pub category: Option<Category>,
}

/// Drop whitespace right after an unquoted comma so `a, "b, c"` still
/// sees the quote at the start of the field.
fn tighten(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    let mut in_quotes = false;
    let mut field_start = true;
    for c in line.chars() {
        if !in_quotes && field_start && c.is_whitespace() {
            continue;
        }
        if c == '"' {
            in_quotes = !in_quotes;
        }
        field_start = !in_quotes && c == ',';
        out.push(c);
    }
    out
}

fn split_fields(line: &str) -> Result<Vec<String>> {
    let line = tighten(line);
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(line.as_bytes());

    let record = rdr
        .records()
        .next()
        .ok_or_else(|| anyhow!("empty entry"))?
        .context("malformed entry line")?;
    Ok(record.iter().map(|f| f.to_string()).collect())
}

pub fn parse_date(s: &str, today: NaiveDate) -> Result<NaiveDate> {
    let s = s.trim();
    if s.is_empty() {
        return Ok(today);
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d").with_context(|| format!("Invalid date '{s}' (expected YYYY-MM-DD)"))
}

pub fn parse_amount(s: &str) -> Result<Decimal> {
    let cleaned: String = s.trim().chars().filter(|c| !matches!(c, '$' | ',' | ' ')).collect();
    if cleaned.is_empty() {
        bail!("Amount is required");
    }
    Decimal::from_str(&cleaned).map_err(|_| anyhow!("Invalid amount '{}'", s.trim()))
}

pub fn parse_entry_line(line: &str, today: NaiveDate) -> Result<EntryFields> {
    let fields = split_fields(line)?;
    if fields.len() < 3 {
        bail!("Expected: date, title, amount[, category]");
    }
    if fields.len() > 4 {
        bail!("Too many fields ({}); quote titles that contain commas", fields.len());
    }

    let category = match fields.get(3).map(|s| s.as_str()) {
        None | Some("") => None,
        Some(c) => Some(Category::from_str(c)?),
    };

    Ok(EntryFields {
        date: parse_date(&fields[0], today)?,
        title: fields[1].clone(),
        amount: parse_amount(&fields[2])?,
        category,
    })
}

fn default_category(kind: TransactionType) -> Category {
    match kind {
        TransactionType::Expense => Category::Food,
        TransactionType::Income => Category::Salary,
    }
}

pub fn transaction_from_line(line: &str, kind: TransactionType, today: NaiveDate) -> Result<NewTransaction> {
    let f = parse_entry_line(line, today)?;
    Ok(NewTransaction {
        title: f.title,
        amount: f.amount,
        date: f.date,
        kind,
        category: f.category.unwrap_or_else(|| default_category(kind)),
    })
}

pub fn bill_from_line(line: &str, today: NaiveDate) -> Result<NewBill> {
    let f = parse_entry_line(line, today)?;
    if f.category.is_some() {
        bail!("Bills have no category: date, title, amount");
    }
    Ok(NewBill {
        title: f.title,
        amount: f.amount,
        due_date: f.date,
    })
}
