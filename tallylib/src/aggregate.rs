//! Per-ledger totals and the combined credit/debit statement.

use crate::model::{Debit, EntryKind, InventoryItem, Payment, RecordDate, RecordId, Receivable};
use crate::query::by_ledger;
use rust_decimal::Decimal;
use serde::Serialize;

/// Borrowed view over the four record collections.
#[derive(Debug, Clone, Copy)]
pub struct Books<'a> {
    pub payments: &'a [Payment],
    pub debits: &'a [Debit],
    pub receivables: &'a [Receivable],
    pub inventory: &'a [InventoryItem],
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LedgerTotals {
    pub credit_total: Decimal,
    pub debit_total: Decimal,
    /// `debit_total - credit_total`: net outflow of the till.
    pub balance: Decimal,
    pub receivable_total: Decimal,
    pub stock_value: Decimal,
    /// `debit_total - (credit_total + receivable_total + stock_value)`.
    pub net_worth: Decimal,
}

/// Sum that clamps at `Decimal::MAX`/`MIN` instead of overflowing.
pub fn saturating_sum(amounts: impl IntoIterator<Item = Decimal>) -> Decimal {
    amounts
        .into_iter()
        .fold(Decimal::ZERO, Decimal::saturating_add)
}

pub fn credit_total(payments: &[Payment], ledger: &str) -> Decimal {
    saturating_sum(by_ledger(payments, ledger).iter().map(|p| p.amount))
}

pub fn debit_total(debits: &[Debit], ledger: &str) -> Decimal {
    saturating_sum(by_ledger(debits, ledger).iter().map(|d| d.amount))
}

pub fn receivable_total(receivables: &[Receivable], ledger: &str) -> Decimal {
    saturating_sum(by_ledger(receivables, ledger).iter().map(|r| r.amount))
}

pub fn stock_value(inventory: &[InventoryItem], ledger: &str) -> Decimal {
    saturating_sum(by_ledger(inventory, ledger).iter().map(|i| i.line_value()))
}

/// Totals for one ledger. A ledger with no records yields all zeros.
pub fn totals(books: Books<'_>, ledger: &str) -> LedgerTotals {
    let credit_total = credit_total(books.payments, ledger);
    let debit_total = debit_total(books.debits, ledger);
    let receivable_total = receivable_total(books.receivables, ledger);
    let stock_value = stock_value(books.inventory, ledger);

    LedgerTotals {
        credit_total,
        debit_total,
        balance: debit_total.saturating_sub(credit_total),
        receivable_total,
        stock_value,
        net_worth: debit_total
            .saturating_sub(saturating_sum([credit_total, receivable_total, stock_value])),
    }
}

/// One line of a combined statement. `desc_a`/`desc_b` are name and type
/// for a credit, invoice type and invoice number for a debit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatementLine {
    pub id: RecordId,
    pub kind: EntryKind,
    pub date: RecordDate,
    pub desc_a: String,
    pub desc_b: String,
    pub amount: Decimal,
}

impl StatementLine {
    pub fn details(&self) -> String {
        format!("{} • {}", self.desc_a, self.desc_b)
    }
}

/// The ledger's credits followed by its debits, then stably sorted by date
/// ascending. Equal dates keep that insertion order; unparseable dates go
/// last.
pub fn statement(payments: &[Payment], debits: &[Debit], ledger: &str) -> Vec<StatementLine> {
    let credits = by_ledger(payments, ledger).into_iter().map(|p| StatementLine {
        id: p.id,
        kind: EntryKind::Credit,
        date: p.date.clone(),
        desc_a: p.name.clone(),
        desc_b: p.kind.clone(),
        amount: p.amount,
    });
    let debs = by_ledger(debits, ledger).into_iter().map(|d| StatementLine {
        id: d.id,
        kind: EntryKind::Debit,
        date: d.date.clone(),
        desc_a: d.invoice_type.clone(),
        desc_b: d.invoice_number.clone(),
        amount: d.amount,
    });

    let mut lines: Vec<StatementLine> = credits.chain(debs).collect();
    lines.sort_by_key(|l| l.date.sort_key());
    lines
}

/// Everything a ledger board shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LedgerBoard {
    pub name: String,
    pub lines: Vec<StatementLine>,
    pub totals: LedgerTotals,
}

pub fn board(books: Books<'_>, ledger: &str) -> LedgerBoard {
    LedgerBoard {
        name: ledger.to_string(),
        lines: statement(books.payments, books.debits, ledger),
        totals: totals(books, ledger),
    }
}
