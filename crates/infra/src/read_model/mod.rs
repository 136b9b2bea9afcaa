//! Reference implementations of the sales-side seams the forecaster consumes.

pub mod sales_ledger;

pub use sales_ledger::InMemorySalesLedger;
