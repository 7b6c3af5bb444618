//! Seams shared across modules: ledger scoping for the filter layer and
//! tabular rows for the exporter.

use crate::model::{Debit, InventoryItem, Payment, Receivable};

/// A record that belongs to exactly one ledger (by name).
pub trait Scoped {
    fn ledger(&self) -> &str;
}

impl Scoped for Payment {
    fn ledger(&self) -> &str {
        &self.ledger
    }
}

impl Scoped for Debit {
    fn ledger(&self) -> &str {
        &self.ledger
    }
}

impl Scoped for Receivable {
    fn ledger(&self) -> &str {
        &self.ledger
    }
}

impl Scoped for InventoryItem {
    fn ledger(&self) -> &str {
        &self.ledger
    }
}

/// A record with a fixed column layout for export.
pub trait TableRow {
    fn header() -> &'static [&'static str];
    fn fields(&self) -> Vec<String>;
}
