//! spendwise-export: CSV export of transactions and bills

pub mod csv_export;

pub use csv_export::{bills_csv, export_all, transactions_csv, ExportSummary};
