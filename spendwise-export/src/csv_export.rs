//! Serialize the ledger and bills to CSV for download.
//!
//! Transactions: ID,Date,Title,Amount,Type,Category
//! Bills:        ID,Title,Amount,DueDate,IsPaid
//!
//! Fields are quoted only when they contain a delimiter or quote.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use log::info;
use spendwise_core::{Bill, Transaction};
use std::fs;
use std::path::{Path, PathBuf};

pub const TRANSACTION_HEADERS: [&str; 6] = ["ID", "Date", "Title", "Amount", "Type", "Category"];
pub const BILL_HEADERS: [&str; 5] = ["ID", "Title", "Amount", "DueDate", "IsPaid"];

pub const EXPORTED_MESSAGE: &str = "Data Exported Successfully";
pub const NOTHING_MESSAGE: &str = "No data to export";

fn write_csv<const N: usize>(headers: [&str; N], rows: impl Iterator<Item = [String; N]>) -> Result<String> {
    let mut wtr = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Necessary)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    wtr.write_record(headers).context("write csv header")?;
    for row in rows {
        wtr.write_record(&row).context("write csv row")?;
    }
    let bytes = wtr.into_inner().context("flush csv")?;
    String::from_utf8(bytes).context("csv output is not utf-8")
}

/// Empty string when there is nothing to export.
pub fn transactions_csv(transactions: &[Transaction]) -> Result<String> {
    if transactions.is_empty() {
        return Ok(String::new());
    }
    write_csv(
        TRANSACTION_HEADERS,
        transactions.iter().map(|t| {
            [
                t.id.clone(),
                t.date.format("%Y-%m-%d").to_string(),
                t.title.clone(),
                t.amount.normalize().to_string(),
                t.kind.to_string(),
                t.category.to_string(),
            ]
        }),
    )
}

/// Empty string when there is nothing to export.
pub fn bills_csv(bills: &[Bill]) -> Result<String> {
    if bills.is_empty() {
        return Ok(String::new());
    }
    write_csv(
        BILL_HEADERS,
        bills.iter().map(|b| {
            [
                b.id.clone(),
                b.title.clone(),
                b.amount.normalize().to_string(),
                b.due_date.format("%Y-%m-%d").to_string(),
                b.is_paid.to_string(),
            ]
        }),
    )
}

pub fn transactions_file_name(today: NaiveDate) -> String {
    format!("spendwise_transactions_{}.csv", today.format("%Y-%m-%d"))
}

pub fn bills_file_name(today: NaiveDate) -> String {
    format!("spendwise_bills_{}.csv", today.format("%Y-%m-%d"))
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExportSummary {
    pub written: Vec<PathBuf>,
}

impl ExportSummary {
    pub fn message(&self) -> &'static str {
        if self.written.is_empty() {
            NOTHING_MESSAGE
        } else {
            EXPORTED_MESSAGE
        }
    }
}

/// Write one file per non-empty collection into `dir`.
pub fn export_all(dir: &Path, today: NaiveDate, transactions: &[Transaction], bills: &[Bill]) -> Result<ExportSummary> {
    let mut summary = ExportSummary::default();

    let outputs = [
        (transactions_file_name(today), transactions_csv(transactions)?),
        (bills_file_name(today), bills_csv(bills)?),
    ];

    for (name, content) in outputs {
        if content.is_empty() {
            continue;
        }
        fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;
        let path = dir.join(name);
        fs::write(&path, content).with_context(|| format!("write {}", path.display()))?;
        info!("exported {}", path.display());
        summary.written.push(path);
    }

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use spendwise_core::demo::{demo_bills, demo_transactions};
    use spendwise_core::{Category, TransactionType};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    #[test]
    fn test_transactions_csv_rows() {
        let csv = transactions_csv(&demo_transactions()).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "ID,Date,Title,Amount,Type,Category");
        assert_eq!(lines[1], "6,2024-04-07,Netflix Subscription,15.99,EXPENSE,Entertainment");
        assert_eq!(lines.len(), 7);
    }

    #[test]
    fn test_quotes_fields_with_comma_or_quote() {
        let txns = vec![
            Transaction::new(
                "a1",
                "Dinner, drinks",
                Decimal::new(4250, 2),
                NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
                TransactionType::Expense,
                Category::Food,
            ),
            Transaction::new(
                "a2",
                "The \"Big\" Shop",
                Decimal::from(10),
                NaiveDate::from_ymd_opt(2024, 5, 2).unwrap(),
                TransactionType::Expense,
                Category::Shopping,
            ),
        ];
        let csv = transactions_csv(&txns).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[1], "a1,2024-05-01,\"Dinner, drinks\",42.5,EXPENSE,Food");
        assert_eq!(lines[2], "a2,2024-05-02,\"The \"\"Big\"\" Shop\",10,EXPENSE,Shopping");
    }

    #[test]
    fn test_bills_csv() {
        let csv = bills_csv(&demo_bills()).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "ID,Title,Amount,DueDate,IsPaid");
        assert_eq!(lines[1], "101,Electricity Bill,145.2,2024-04-15,false");
        assert_eq!(lines[3], "103,House Rent,2500,2024-04-01,true");
    }

    #[test]
    fn test_export_all_writes_dated_files() {
        let dir = tempfile::tempdir().unwrap();
        let summary = export_all(dir.path(), today(), &demo_transactions(), &demo_bills()).unwrap();
        assert_eq!(summary.message(), EXPORTED_MESSAGE);
        assert_eq!(summary.written.len(), 2);
        assert!(dir.path().join("spendwise_transactions_2026-10-19.csv").exists());
        assert!(dir.path().join("spendwise_bills_2026-10-19.csv").exists());
    }

    #[test]
    fn test_export_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let summary = export_all(dir.path(), today(), &[], &[]).unwrap();
        assert!(summary.written.is_empty());
        assert_eq!(summary.message(), NOTHING_MESSAGE);
        assert_eq!(transactions_csv(&[]).unwrap(), "");
    }

    #[test]
    fn test_only_bills() {
        let dir = tempfile::tempdir().unwrap();
        let summary = export_all(dir.path(), today(), &[], &demo_bills()).unwrap();
        assert_eq!(summary.written, vec![dir.path().join(bills_file_name(today()))]);
    }
}
