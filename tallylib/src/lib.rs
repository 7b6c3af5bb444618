//! Small-business bookkeeping ledger. Payments, debits,
//! receivables and stock per ledger, with running totals, combined
//! statements, a net-worth dashboard and CSV export.

pub mod aggregate;
pub mod catalog;
pub mod coerce;
pub mod dashboard;
pub mod error;
pub mod export;
pub mod model;
pub mod money;
pub mod query;
pub mod session;
pub mod storage;
pub mod store;
pub mod traits;
pub mod views;
