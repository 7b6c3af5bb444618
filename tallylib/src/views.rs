//! Read-only tables the front end renders after every mutation.

use crate::aggregate::{self, saturating_sum, Books, LedgerBoard};
use crate::model::{InventoryItem, Payment, Receivable};
use crate::query::{by_customer, by_ledger, payments_by_date, receivables_newest_first};
use rust_decimal::Decimal;

#[derive(Debug, Clone, PartialEq)]
pub struct PaymentsView<'a> {
    /// Earliest first.
    pub rows: Vec<&'a Payment>,
    pub total: Decimal,
}

pub fn payments(all: &[Payment]) -> PaymentsView<'_> {
    let rows = payments_by_date(all);
    let total = saturating_sum(rows.iter().map(|p| p.amount));
    PaymentsView { rows, total }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReceivablesView<'a> {
    /// Set for a per-customer board.
    pub customer: Option<String>,
    /// Newest first.
    pub rows: Vec<&'a Receivable>,
    pub total: Decimal,
}

pub fn receivables(all: &[Receivable]) -> ReceivablesView<'_> {
    let rows = receivables_newest_first(all);
    let total = saturating_sum(rows.iter().map(|r| r.amount));
    ReceivablesView {
        customer: None,
        rows,
        total,
    }
}

/// One board per favorite customer, in favorites order.
pub fn customer_boards<'a>(all: &'a [Receivable], favorites: &[String]) -> Vec<ReceivablesView<'a>> {
    favorites
        .iter()
        .map(|name| {
            let rows = receivables_newest_first(by_customer(all, name));
            let total = saturating_sum(rows.iter().map(|r| r.amount));
            ReceivablesView {
                customer: Some(name.clone()),
                rows,
                total,
            }
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct InventoryView<'a> {
    pub rows: Vec<&'a InventoryItem>,
    pub total: Decimal,
}

/// Stock lines in stored order, optionally limited to one ledger.
pub fn inventory<'a>(all: &'a [InventoryItem], ledger: Option<&str>) -> InventoryView<'a> {
    let rows = match ledger {
        Some(name) => by_ledger(all, name),
        None => all.iter().collect(),
    };
    let total = saturating_sum(rows.iter().map(|i| i.line_value()));
    InventoryView { rows, total }
}

/// A board for every registered ledger, in registry order.
pub fn ledger_boards(books: Books<'_>, ledgers: &[String]) -> Vec<LedgerBoard> {
    ledgers
        .iter()
        .map(|name| aggregate::board(books, name))
        .collect()
}
