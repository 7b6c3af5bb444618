//! The record store: sole owner of the four record collections and the two
//! registries.
//!
//! Every successful mutation writes the touched collection back as a whole
//! snapshot. A failed write keeps the in-memory change, marks the
//! collection dirty and reports it in [`Change::unsaved`]; dirty
//! collections are retried before the next write and by [`Store::flush`].

use crate::{
    aggregate::Books,
    catalog::Catalog,
    error::{Result, TallyError},
    model::{
        Debit, InventoryItem, NewDebit, NewPayment, NewReceivable, NewStock, Payment,
        RecordDate, RecordId, RecordKind, Receivable,
    },
    storage::{Collection, Storage},
};
use rust_decimal::Decimal;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, info, warn};

pub const DEFAULT_MAX_FAVORITES: usize = 5;

#[derive(Debug, Clone)]
pub struct StoreOptions {
    pub catalog: Catalog,
    /// Seed one zero-quantity row per catalog product when no inventory
    /// snapshot can be read.
    pub seed_inventory: bool,
    pub max_favorites: usize,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            catalog: Catalog::builtin(),
            seed_inventory: true,
            max_favorites: DEFAULT_MAX_FAVORITES,
        }
    }
}

/// Result of an applied mutation.
#[derive(Debug, Clone, PartialEq)]
pub struct Change<T> {
    pub value: T,
    /// Collections whose latest state is not on disk.
    pub unsaved: Vec<Collection>,
}

impl<T> Change<T> {
    pub fn is_durable(&self) -> bool {
        self.unsaved.is_empty()
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Change<U> {
        Change {
            value: f(self.value),
            unsaved: self.unsaved,
        }
    }
}

pub struct Store<S: Storage> {
    storage: S,
    options: StoreOptions,
    payments: Vec<Payment>,
    debits: Vec<Debit>,
    receivables: Vec<Receivable>,
    inventory: Vec<InventoryItem>,
    ledgers: Vec<String>,
    favorites: Vec<String>,
    kept: BTreeMap<Collection, Vec<Value>>,
    dirty: BTreeSet<Collection>,
}

struct Loaded<T> {
    items: Vec<T>,
    /// Rows that did not read as `T`. Written back untouched with every
    /// snapshot of the collection.
    kept: Vec<Value>,
    /// Ids were assigned on load; the snapshot must be rewritten.
    repaired: bool,
}

fn needs_id(row: &Value) -> bool {
    match row.get("id") {
        Some(Value::String(s)) => RecordId::parse(s).is_none(),
        _ => true,
    }
}

fn load_list<S, T>(storage: &S, col: Collection, has_ids: bool) -> Option<Loaded<T>>
where
    S: Storage,
    T: DeserializeOwned,
{
    let key = col.key();
    let raw = match storage.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => {
            debug!(key, "no snapshot, using default");
            return None;
        }
        Err(e) => {
            warn!(key, error = %e, "snapshot unreadable, using default");
            return None;
        }
    };
    let rows = match serde_json::from_str::<Value>(&raw) {
        Ok(Value::Array(rows)) => rows,
        Ok(_) => {
            warn!(key, "snapshot is not a list, using default");
            return None;
        }
        Err(e) => {
            warn!(key, error = %e, "corrupt snapshot, using default");
            return None;
        }
    };

    let mut repaired = false;
    let mut items = Vec::with_capacity(rows.len());
    let mut kept = Vec::new();
    for (i, row) in rows.into_iter().enumerate() {
        match serde_json::from_value::<T>(row.clone()) {
            Ok(item) => {
                repaired |= has_ids && needs_id(&row);
                items.push(item);
            }
            Err(e) => {
                warn!(key, index = i, error = %e, "unreadable row kept as is");
                kept.push(row);
            }
        }
    }
    Some(Loaded {
        items,
        kept,
        repaired,
    })
}

/// Serialize `items` followed by the rows that could not be read.
fn rows_json<T: Serialize>(items: &[T], kept: Option<&Vec<Value>>) -> Result<String> {
    let kept = match kept {
        Some(k) if !k.is_empty() => k,
        _ => return Ok(serde_json::to_string(items)?),
    };
    let mut all = match serde_json::to_value(items)? {
        Value::Array(rows) => rows,
        _ => Vec::new(),
    };
    all.extend(kept.iter().cloned());
    Ok(serde_json::to_string(&all)?)
}

fn required_ledger(raw: &str, registry: &[String]) -> Result<String> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(TallyError::MissingLedger);
    }
    if !registry.iter().any(|l| l == name) {
        return Err(TallyError::UnknownLedger(name.to_string()));
    }
    Ok(name.to_string())
}

fn non_empty(raw: &str) -> Result<String> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(TallyError::EmptyName);
    }
    Ok(name.to_string())
}

fn entry_date(raw: Option<&str>, created_at: &RecordDate) -> RecordDate {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        Some(s) => RecordDate::new(s),
        None => created_at.clone(),
    }
}

fn take_by_id<T>(rows: &mut Vec<T>, id: RecordId, id_of: impl Fn(&T) -> RecordId) -> Result<T> {
    let pos = rows
        .iter()
        .position(|r| id_of(r) == id)
        .ok_or(TallyError::NotFound(id))?;
    Ok(rows.remove(pos))
}

impl<S: Storage> Store<S> {
    /// Load every collection. Missing or unreadable snapshots fall back to
    /// their defaults; inventory is seeded from the catalog at most here.
    pub fn open(storage: S, options: StoreOptions) -> Self {
        let mut dirty = BTreeSet::new();
        let mut kept = BTreeMap::new();

        fn take<T>(
            loaded: Option<Loaded<T>>,
            col: Collection,
            dirty: &mut BTreeSet<Collection>,
            kept: &mut BTreeMap<Collection, Vec<Value>>,
        ) -> Vec<T> {
            match loaded {
                Some(l) => {
                    if l.repaired {
                        dirty.insert(col);
                    }
                    if !l.kept.is_empty() {
                        kept.insert(col, l.kept);
                    }
                    l.items
                }
                None => Vec::new(),
            }
        }

        let payments: Vec<Payment> = take(
            load_list(&storage, Collection::Payments, true),
            Collection::Payments,
            &mut dirty,
            &mut kept,
        );
        let debits: Vec<Debit> = take(
            load_list(&storage, Collection::Debits, true),
            Collection::Debits,
            &mut dirty,
            &mut kept,
        );
        let receivables: Vec<Receivable> = take(
            load_list(&storage, Collection::Receivables, true),
            Collection::Receivables,
            &mut dirty,
            &mut kept,
        );

        let inventory = match load_list::<S, InventoryItem>(&storage, Collection::Inventory, true) {
            l @ Some(_) => take(l, Collection::Inventory, &mut dirty, &mut kept),
            None if options.seed_inventory => {
                dirty.insert(Collection::Inventory);
                let rows: Vec<InventoryItem> = options
                    .catalog
                    .products()
                    .map(|(name, price)| InventoryItem {
                        id: RecordId::new(),
                        product_name: name.to_string(),
                        price,
                        quantity: 0,
                        ledger: String::new(),
                    })
                    .collect();
                info!(rows = rows.len(), "seeded inventory from catalog");
                rows
            }
            None => Vec::new(),
        };

        let mut ledgers: Vec<String> = take(
            load_list(&storage, Collection::Ledgers, false),
            Collection::Ledgers,
            &mut dirty,
            &mut kept,
        );
        let mut favorites: Vec<String> = take(
            load_list(&storage, Collection::Favorites, false),
            Collection::Favorites,
            &mut dirty,
            &mut kept,
        );
        if dedup(&mut ledgers) {
            dirty.insert(Collection::Ledgers);
        }
        if dedup(&mut favorites) {
            dirty.insert(Collection::Favorites);
        }

        let mut store = Self {
            storage,
            options,
            payments,
            debits,
            receivables,
            inventory,
            ledgers,
            favorites,
            kept,
            dirty,
        };
        info!(
            payments = store.payments.len(),
            debits = store.debits.len(),
            receivables = store.receivables.len(),
            inventory = store.inventory.len(),
            ledgers = store.ledgers.len(),
            "store opened"
        );
        if !store.dirty.is_empty() {
            store.retry_dirty();
        }
        store
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn options(&self) -> &StoreOptions {
        &self.options
    }

    pub fn catalog(&self) -> &Catalog {
        &self.options.catalog
    }

    pub fn payments(&self) -> &[Payment] {
        &self.payments
    }

    pub fn debits(&self) -> &[Debit] {
        &self.debits
    }

    pub fn receivables(&self) -> &[Receivable] {
        &self.receivables
    }

    pub fn inventory(&self) -> &[InventoryItem] {
        &self.inventory
    }

    pub fn ledgers(&self) -> &[String] {
        &self.ledgers
    }

    pub fn favorites(&self) -> &[String] {
        &self.favorites
    }

    pub fn books(&self) -> Books<'_> {
        Books {
            payments: &self.payments,
            debits: &self.debits,
            receivables: &self.receivables,
            inventory: &self.inventory,
        }
    }

    /// Collections still waiting for a successful save.
    pub fn unsaved(&self) -> Vec<Collection> {
        self.dirty.iter().copied().collect()
    }

    /* ------------------------------ persistence ----------------------------- */

    fn snapshot(&self, col: Collection) -> Result<String> {
        let kept = self.kept.get(&col);
        match col {
            Collection::Payments => rows_json(&self.payments, kept),
            Collection::Debits => rows_json(&self.debits, kept),
            Collection::Receivables => rows_json(&self.receivables, kept),
            Collection::Inventory => rows_json(&self.inventory, kept),
            Collection::Ledgers => rows_json(&self.ledgers, kept),
            Collection::Favorites => rows_json(&self.favorites, kept),
        }
    }

    fn save(&mut self, col: Collection) -> Result<()> {
        let json = self.snapshot(col)?;
        self.storage.set(col.key(), &json)
    }

    /// Try to persist `col`; on failure remember it for the next attempt.
    fn persist(&mut self, col: Collection) -> bool {
        match self.save(col) {
            Ok(()) => {
                self.dirty.remove(&col);
                true
            }
            Err(e) => {
                warn!(key = col.key(), error = %e, "save failed, change kept in memory");
                self.dirty.insert(col);
                false
            }
        }
    }

    fn retry_dirty(&mut self) {
        let pending: Vec<Collection> = self.dirty.iter().copied().collect();
        for col in pending {
            self.persist(col);
        }
    }

    fn commit<T>(&mut self, col: Collection, value: T) -> Change<T> {
        self.retry_dirty();
        self.persist(col);
        Change {
            value,
            unsaved: self.unsaved(),
        }
    }

    /// Re-save every dirty collection. Errors with the first collection
    /// that still cannot be written.
    pub fn flush(&mut self) -> Result<()> {
        self.retry_dirty();
        match self.dirty.iter().next() {
            None => {
                info!("all collections saved");
                Ok(())
            }
            Some(col) => Err(TallyError::Persist {
                key: col.key(),
                reason: "still unsaved after retry".into(),
            }),
        }
    }

    /* -------------------------------- ledgers ------------------------------- */

    pub fn add_ledger(&mut self, name: &str) -> Result<Change<String>> {
        let name = non_empty(name)?;
        if self.ledgers.contains(&name) {
            return Err(TallyError::DuplicateLedger(name));
        }
        self.ledgers.push(name.clone());
        debug!(ledger = %name, "ledger added");
        Ok(self.commit(Collection::Ledgers, name))
    }

    /// Records that reference the ledger keep the stale name.
    pub fn remove_ledger(&mut self, name: &str) -> Result<Change<()>> {
        let pos = self
            .ledgers
            .iter()
            .position(|l| l == name)
            .ok_or_else(|| TallyError::UnknownLedger(name.to_string()))?;
        self.ledgers.remove(pos);
        debug!(ledger = %name, "ledger removed");
        Ok(self.commit(Collection::Ledgers, ()))
    }

    /* ------------------------------- favorites ------------------------------ */

    pub fn add_favorite(&mut self, name: &str) -> Result<Change<String>> {
        let name = non_empty(name)?;
        if self.favorites.contains(&name) {
            return Err(TallyError::DuplicateFavorite(name));
        }
        if self.favorites.len() >= self.options.max_favorites {
            return Err(TallyError::FavoritesFull(self.options.max_favorites));
        }
        self.favorites.push(name.clone());
        debug!(customer = %name, "favorite added");
        Ok(self.commit(Collection::Favorites, name))
    }

    pub fn remove_favorite(&mut self, name: &str) -> Result<Change<()>> {
        let pos = self
            .favorites
            .iter()
            .position(|f| f == name)
            .ok_or_else(|| TallyError::UnknownFavorite(name.to_string()))?;
        self.favorites.remove(pos);
        debug!(customer = %name, "favorite removed");
        Ok(self.commit(Collection::Favorites, ()))
    }

    /* ------------------------------- records -------------------------------- */

    pub fn add_payment(&mut self, new: NewPayment) -> Result<Change<RecordId>> {
        let ledger = required_ledger(&new.ledger, &self.ledgers)?;
        let created_at = RecordDate::now();
        let p = Payment {
            id: RecordId::new(),
            date: entry_date(new.date.as_deref(), &created_at),
            name: new.name.trim().to_string(),
            kind: new.kind.trim().to_string(),
            amount: new.amount,
            ledger,
            created_at,
        };
        let id = p.id;
        debug!(%id, ledger = %p.ledger, amount = %p.amount, "payment added");
        self.payments.push(p);
        Ok(self.commit(Collection::Payments, id))
    }

    pub fn add_debit(&mut self, new: NewDebit) -> Result<Change<RecordId>> {
        let ledger = required_ledger(&new.ledger, &self.ledgers)?;
        let created_at = RecordDate::now();
        let d = Debit {
            id: RecordId::new(),
            date: entry_date(new.date.as_deref(), &created_at),
            invoice_type: new.invoice_type.trim().to_string(),
            invoice_number: new.invoice_number.trim().to_string(),
            amount: new.amount,
            ledger,
            created_at,
        };
        let id = d.id;
        debug!(%id, ledger = %d.ledger, amount = %d.amount, "debit added");
        self.debits.push(d);
        Ok(self.commit(Collection::Debits, id))
    }

    pub fn add_receivable(&mut self, new: NewReceivable) -> Result<Change<RecordId>> {
        let ledger = required_ledger(&new.ledger, &self.ledgers)?;
        let created_at = RecordDate::now();
        let r = Receivable {
            id: RecordId::new(),
            invoice_date: entry_date(new.invoice_date.as_deref(), &created_at),
            created_at,
            customer_name: new.customer_name.trim().to_string(),
            invoice_number: new.invoice_number.trim().to_string(),
            amount: new.amount,
            ledger,
            comment: new
                .comment
                .map(|c| c.trim().to_string())
                .filter(|c| !c.is_empty()),
        };
        let id = r.id;
        debug!(%id, ledger = %r.ledger, customer = %r.customer_name, "receivable added");
        self.receivables.push(r);
        Ok(self.commit(Collection::Receivables, id))
    }

    /// Only the `ledger` field changes.
    pub fn move_receivable(&mut self, id: RecordId, ledger: &str) -> Result<Change<()>> {
        let ledger = required_ledger(ledger, &self.ledgers)?;
        let r = self
            .receivables
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or(TallyError::NotFound(id))?;
        debug!(%id, from = %r.ledger, to = %ledger, "receivable moved");
        r.ledger = ledger;
        Ok(self.commit(Collection::Receivables, ()))
    }

    /// Insert or update the (product, ledger) stock line.
    pub fn upsert_stock(&mut self, new: NewStock) -> Result<Change<RecordId>> {
        let product = non_empty(&new.product_name)?;
        let ledger = required_ledger(&new.ledger, &self.ledgers)?;
        let price = new
            .price
            .or_else(|| self.options.catalog.price(&product))
            .unwrap_or(Decimal::ZERO);

        let existing = self
            .inventory
            .iter_mut()
            .find(|i| i.product_name == product && i.ledger == ledger);
        let id = match existing {
            Some(item) => {
                item.price = price;
                item.quantity = new.quantity;
                debug!(id = %item.id, product = %product, ledger = %ledger, "stock updated");
                item.id
            }
            None => {
                let item = InventoryItem {
                    id: RecordId::new(),
                    product_name: product,
                    price,
                    quantity: new.quantity,
                    ledger,
                };
                debug!(id = %item.id, product = %item.product_name, ledger = %item.ledger, "stock added");
                let id = item.id;
                self.inventory.push(item);
                id
            }
        };
        Ok(self.commit(Collection::Inventory, id))
    }

    pub fn set_stock_quantity(&mut self, id: RecordId, quantity: u32) -> Result<Change<()>> {
        let item = self
            .inventory
            .iter_mut()
            .find(|i| i.id == id)
            .ok_or(TallyError::NotFound(id))?;
        item.quantity = quantity;
        debug!(%id, quantity, "stock quantity set");
        Ok(self.commit(Collection::Inventory, ()))
    }

    pub fn delete_payment(&mut self, id: RecordId) -> Result<Change<Payment>> {
        let p = take_by_id(&mut self.payments, id, |p| p.id)?;
        debug!(%id, "payment deleted");
        Ok(self.commit(Collection::Payments, p))
    }

    pub fn delete_debit(&mut self, id: RecordId) -> Result<Change<Debit>> {
        let d = take_by_id(&mut self.debits, id, |d| d.id)?;
        debug!(%id, "debit deleted");
        Ok(self.commit(Collection::Debits, d))
    }

    pub fn delete_receivable(&mut self, id: RecordId) -> Result<Change<Receivable>> {
        let r = take_by_id(&mut self.receivables, id, |r| r.id)?;
        debug!(%id, "receivable deleted");
        Ok(self.commit(Collection::Receivables, r))
    }

    pub fn delete_stock(&mut self, id: RecordId) -> Result<Change<InventoryItem>> {
        let i = take_by_id(&mut self.inventory, id, |i| i.id)?;
        debug!(%id, "stock line deleted");
        Ok(self.commit(Collection::Inventory, i))
    }

    pub fn delete(&mut self, kind: RecordKind, id: RecordId) -> Result<Change<()>> {
        Ok(match kind {
            RecordKind::Payment => self.delete_payment(id)?.map(drop),
            RecordKind::Debit => self.delete_debit(id)?.map(drop),
            RecordKind::Receivable => self.delete_receivable(id)?.map(drop),
            RecordKind::Stock => self.delete_stock(id)?.map(drop),
        })
    }
}

/// Keep the first occurrence of each name. True if anything was removed.
fn dedup(names: &mut Vec<String>) -> bool {
    let before = names.len();
    let mut seen = BTreeSet::new();
    names.retain(|n| seen.insert(n.clone()));
    names.len() != before
}
