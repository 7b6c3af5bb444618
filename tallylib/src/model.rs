//! Record model shared by the store, the aggregator and the exporter.
//!
//! Persisted field names follow the camelCase layout of existing snapshots
//! (`createdAt`, `invoiceType`, ...) so older data loads unchanged. Every
//! field is defaulted on read; amounts and quantities are coerced.

use crate::coerce;
use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use uuid::Uuid;

/// Surrogate key assigned when a record is created (or first loaded).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct RecordId(Uuid);

/// Ids that are not UUIDs (hand-edited or legacy keys) are replaced with a
/// fresh one rather than rejecting the row.
impl<'de> Deserialize<'de> for RecordId {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let raw = coerce::lenient_text(d)?;
        Ok(Self::parse(&raw).unwrap_or_default())
    }
}

impl RecordId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn parse(s: &str) -> Option<Self> {
        Uuid::parse_str(s.trim()).ok().map(Self)
    }
}

impl Default for RecordId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0.to_string())
    }
}

/// A date exactly as entered. Parsed lazily for ordering; the raw text is
/// what gets stored and exported.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RecordDate(String);

impl<'de> Deserialize<'de> for RecordDate {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        coerce::lenient_text(d).map(Self)
    }
}

/// Ordering key for a [`RecordDate`]. Unparseable dates sort after every
/// real instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum DateKey {
    At(NaiveDateTime),
    Unparseable,
}

impl RecordDate {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn now() -> Self {
        Self::from_utc(Utc::now())
    }

    pub fn from_utc(at: DateTime<Utc>) -> Self {
        Self(at.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }

    /// UTC instant, if the text reads as an RFC 3339 timestamp, a local
    /// date-time, or a bare `YYYY-MM-DD` date (taken as midnight).
    pub fn timestamp(&self) -> Option<NaiveDateTime> {
        let s = self.0.trim();
        if s.is_empty() {
            return None;
        }
        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Some(dt.naive_utc());
        }
        for f in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"] {
            if let Ok(dt) = NaiveDateTime::parse_from_str(s, f) {
                return Some(dt);
            }
        }
        NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
    }

    pub fn sort_key(&self) -> DateKey {
        self.timestamp().map_or(DateKey::Unparseable, DateKey::At)
    }
}

impl fmt::Display for RecordDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntryKind {
    Credit,
    Debit,
}

impl EntryKind {
    pub fn label(self) -> &'static str {
        match self {
            EntryKind::Credit => "Credit",
            EntryKind::Debit => "Debit",
        }
    }
}

/// Money received into a ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    #[serde(default = "RecordId::new")]
    pub id: RecordId,
    #[serde(default)]
    pub date: RecordDate,
    #[serde(default, deserialize_with = "coerce::lenient_text")]
    pub name: String,
    #[serde(default, rename = "type", deserialize_with = "coerce::lenient_text")]
    pub kind: String,
    #[serde(
        default,
        deserialize_with = "coerce::lenient_amount",
        serialize_with = "rust_decimal::serde::str::serialize"
    )]
    pub amount: Decimal,
    #[serde(default, deserialize_with = "coerce::lenient_text")]
    pub ledger: String,
    #[serde(default)]
    pub created_at: RecordDate,
}

/// Money paid out of a ledger against an invoice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Debit {
    #[serde(default = "RecordId::new")]
    pub id: RecordId,
    #[serde(default)]
    pub date: RecordDate,
    #[serde(default, deserialize_with = "coerce::lenient_text")]
    pub invoice_type: String,
    #[serde(default, deserialize_with = "coerce::lenient_text")]
    pub invoice_number: String,
    #[serde(
        default,
        deserialize_with = "coerce::lenient_amount",
        serialize_with = "rust_decimal::serde::str::serialize"
    )]
    pub amount: Decimal,
    #[serde(default, deserialize_with = "coerce::lenient_text")]
    pub ledger: String,
    #[serde(default)]
    pub created_at: RecordDate,
}

/// Money owed by a customer, not yet collected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Receivable {
    #[serde(default = "RecordId::new")]
    pub id: RecordId,
    #[serde(default)]
    pub created_at: RecordDate,
    #[serde(default)]
    pub invoice_date: RecordDate,
    #[serde(default, deserialize_with = "coerce::lenient_text")]
    pub customer_name: String,
    #[serde(default, deserialize_with = "coerce::lenient_text")]
    pub invoice_number: String,
    #[serde(
        default,
        deserialize_with = "coerce::lenient_amount",
        serialize_with = "rust_decimal::serde::str::serialize"
    )]
    pub amount: Decimal,
    #[serde(default, deserialize_with = "coerce::lenient_text")]
    pub ledger: String,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "coerce::lenient_note"
    )]
    pub comment: Option<String>,
}

impl Receivable {
    /// `createdAt`, or the invoice date for rows that predate it.
    pub fn entered(&self) -> &RecordDate {
        if self.created_at.is_blank() {
            &self.invoice_date
        } else {
            &self.created_at
        }
    }
}

/// One stock line, keyed by (product name, ledger).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItem {
    #[serde(default = "RecordId::new")]
    pub id: RecordId,
    #[serde(default, deserialize_with = "coerce::lenient_text")]
    pub product_name: String,
    #[serde(
        default,
        deserialize_with = "coerce::lenient_amount",
        serialize_with = "rust_decimal::serde::str::serialize"
    )]
    pub price: Decimal,
    #[serde(default, deserialize_with = "coerce::lenient_quantity")]
    pub quantity: u32,
    #[serde(default, deserialize_with = "coerce::lenient_text")]
    pub ledger: String,
}

impl InventoryItem {
    pub fn line_value(&self) -> Decimal {
        self.price.saturating_mul(Decimal::from(self.quantity))
    }
}

#[derive(Debug, Clone, Default)]
pub struct NewPayment {
    /// Defaults to the creation instant when absent.
    pub date: Option<String>,
    pub name: String,
    pub kind: String,
    pub amount: Decimal,
    pub ledger: String,
}

#[derive(Debug, Clone, Default)]
pub struct NewDebit {
    pub date: Option<String>,
    pub invoice_type: String,
    pub invoice_number: String,
    pub amount: Decimal,
    pub ledger: String,
}

#[derive(Debug, Clone, Default)]
pub struct NewReceivable {
    pub invoice_date: Option<String>,
    pub customer_name: String,
    pub invoice_number: String,
    pub amount: Decimal,
    pub ledger: String,
    pub comment: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct NewStock {
    pub product_name: String,
    /// Falls back to the catalog price when absent.
    pub price: Option<Decimal>,
    pub quantity: u32,
    pub ledger: String,
}

/// Which collection a record id refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Payment,
    Debit,
    Receivable,
    Stock,
}
