//! Headline figures for the selected ledger, and the selection itself.

use crate::aggregate::LedgerTotals;
use rust_decimal::Decimal;
use serde::Serialize;
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Tone {
    Positive,
    Negative,
    Neutral,
}

impl Tone {
    pub fn of(value: Decimal) -> Self {
        match value.cmp(&Decimal::ZERO) {
            Ordering::Greater => Tone::Positive,
            Ordering::Less => Tone::Negative,
            Ordering::Equal => Tone::Neutral,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Dashboard {
    pub ledger: Option<String>,
    pub debits: Decimal,
    pub credits: Decimal,
    pub receivables: Decimal,
    pub stock: Decimal,
    pub net_worth: Decimal,
    pub tone: Tone,
}

impl Dashboard {
    pub fn empty() -> Self {
        Self {
            ledger: None,
            debits: Decimal::ZERO,
            credits: Decimal::ZERO,
            receivables: Decimal::ZERO,
            stock: Decimal::ZERO,
            net_worth: Decimal::ZERO,
            tone: Tone::Neutral,
        }
    }
}

/// Project one ledger's totals. `None` (no ledger selected) gives zeros.
pub fn project(selected: Option<(&str, &LedgerTotals)>) -> Dashboard {
    match selected {
        None => Dashboard::empty(),
        Some((name, t)) => Dashboard {
            ledger: Some(name.to_string()),
            debits: t.debit_total,
            credits: t.credit_total,
            receivables: t.receivable_total,
            stock: t.stock_value,
            net_worth: t.net_worth,
            tone: Tone::of(t.net_worth),
        },
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LedgerSelection {
    #[default]
    None,
    Selected(String),
}

impl LedgerSelection {
    pub fn name(&self) -> Option<&str> {
        match self {
            LedgerSelection::None => None,
            LedgerSelection::Selected(n) => Some(n),
        }
    }

    /// Pick `name` if it is registered; otherwise leave the selection alone.
    pub fn select(&mut self, name: &str, registry: &[String]) -> bool {
        if registry.iter().any(|l| l == name) {
            *self = LedgerSelection::Selected(name.to_string());
            true
        } else {
            false
        }
    }

    /// Bring the selection back in line with the registry: keep a selection
    /// that still exists, else fall back to the first ledger, else none.
    pub fn reconcile(&mut self, registry: &[String]) {
        let still_there = self
            .name()
            .map_or(false, |n| registry.iter().any(|l| l == n));
        if still_there {
            return;
        }
        *self = match registry.first() {
            Some(first) => LedgerSelection::Selected(first.clone()),
            None => LedgerSelection::None,
        };
    }
}
