//! Filter layer: pure predicates over the record collections.
//!
//! Nothing here mutates its input. Results keep the relative order of the
//! source collection; ordering helpers are separate and always stable.

use crate::model::{Payment, Receivable};
use crate::traits::Scoped;

pub fn by_ledger<'a, T: Scoped>(records: &'a [T], name: &str) -> Vec<&'a T> {
    records.iter().filter(|r| r.ledger() == name).collect()
}

pub fn by_customer<'a>(records: &'a [Receivable], name: &str) -> Vec<&'a Receivable> {
    records.iter().filter(|r| r.customer_name == name).collect()
}

/// All payments, earliest first.
pub fn payments_by_date(payments: &[Payment]) -> Vec<&Payment> {
    let mut rows: Vec<&Payment> = payments.iter().collect();
    rows.sort_by_key(|p| p.date.sort_key());
    rows
}

/// Newest first by entry time. Ties come out in reverse insertion order.
pub fn receivables_newest_first<'a, I>(rows: I) -> Vec<&'a Receivable>
where
    I: IntoIterator<Item = &'a Receivable>,
{
    let mut rows: Vec<&Receivable> = rows.into_iter().collect();
    rows.sort_by_key(|r| r.entered().sort_key());
    rows.reverse();
    rows
}
