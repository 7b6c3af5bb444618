//! CSV export.
//!
//! Rows are written in the order given; sorting is the caller's job.
//! Fields are quoted only when they contain a comma, a quote or a line
//! break, with inner quotes doubled.

use crate::{
    aggregate::StatementLine,
    error::Result,
    model::{InventoryItem, Payment, Receivable},
    traits::TableRow,
};
use csv::{QuoteStyle, Terminator, WriterBuilder};
use std::io::Write;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportKind {
    Payments,
    Statement(String),
    Receivables,
    Inventory,
}

impl ExportKind {
    pub fn file_name(&self) -> String {
        match self {
            ExportKind::Payments => "payments_all.csv".into(),
            ExportKind::Statement(ledger) => {
                format!("ledger_{}_statement.csv", file_safe(ledger))
            }
            ExportKind::Receivables => "receivables.csv".into(),
            ExportKind::Inventory => "inventory.csv".into(),
        }
    }
}

/// Path separators and control characters become `_`, so the name stays a
/// single path component.
fn file_safe(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '/' | '\\' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect()
}

pub fn write_table<'a, W, T, I>(w: W, rows: I) -> Result<usize>
where
    W: Write,
    T: TableRow + 'a,
    I: IntoIterator<Item = &'a T>,
{
    let mut wrt = WriterBuilder::new()
        .quote_style(QuoteStyle::Necessary)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(w);

    wrt.write_record(T::header())?;
    let mut n = 0;
    for row in rows {
        wrt.write_record(row.fields())?;
        n += 1;
    }
    wrt.flush()?;
    Ok(n)
}

/// Convenience for small exports held in memory.
pub fn table_to_string<'a, T, I>(rows: I) -> Result<String>
where
    T: TableRow + 'a,
    I: IntoIterator<Item = &'a T>,
{
    let mut buf = Vec::new();
    write_table(&mut buf, rows)?;
    String::from_utf8(buf).map_err(|e| crate::error::TallyError::Parse(e.to_string()))
}

impl TableRow for Payment {
    fn header() -> &'static [&'static str] {
        &["Date", "Name", "Type", "Ledger", "Amount"]
    }

    fn fields(&self) -> Vec<String> {
        vec![
            self.date.to_string(),
            self.name.clone(),
            self.kind.clone(),
            self.ledger.clone(),
            self.amount.to_string(),
        ]
    }
}

impl TableRow for StatementLine {
    fn header() -> &'static [&'static str] {
        &["Date", "Kind", "Desc A", "Desc B", "Amount"]
    }

    fn fields(&self) -> Vec<String> {
        vec![
            self.date.to_string(),
            self.kind.label().to_string(),
            self.desc_a.clone(),
            self.desc_b.clone(),
            self.amount.to_string(),
        ]
    }
}

impl TableRow for Receivable {
    fn header() -> &'static [&'static str] {
        &[
            "Entered",
            "Invoice Date",
            "Customer Name",
            "Invoice Number",
            "Amount",
            "Comment",
            "Ledger",
        ]
    }

    fn fields(&self) -> Vec<String> {
        vec![
            self.created_at.to_string(),
            self.invoice_date.to_string(),
            self.customer_name.clone(),
            self.invoice_number.clone(),
            self.amount.to_string(),
            self.comment.clone().unwrap_or_default(),
            self.ledger.clone(),
        ]
    }
}

impl TableRow for InventoryItem {
    fn header() -> &'static [&'static str] {
        &["Product Name", "Price", "Quantity", "Total Value", "Ledger"]
    }

    fn fields(&self) -> Vec<String> {
        vec![
            self.product_name.clone(),
            self.price.to_string(),
            self.quantity.to_string(),
            self.line_value().to_string(),
            self.ledger.clone(),
        ]
    }
}
