//! Application state: the store plus the dashboard's ledger selection.
//!
//! Every mutation goes through [`Session::apply`], which reconciles the
//! selection and hands back the recomputed dashboard together with the
//! mutation's own result.

use crate::{
    aggregate::{self, LedgerBoard, LedgerTotals},
    dashboard::{self, Dashboard, LedgerSelection},
    error::{Result, TallyError},
    storage::{Collection, Storage},
    store::{Change, Store},
    views,
};
use tracing::debug;

#[derive(Debug, Clone, PartialEq)]
pub struct Update<T> {
    pub value: T,
    pub unsaved: Vec<Collection>,
    pub dashboard: Dashboard,
}

impl<T> Update<T> {
    pub fn is_durable(&self) -> bool {
        self.unsaved.is_empty()
    }
}

pub struct Session<S: Storage> {
    store: Store<S>,
    selection: LedgerSelection,
}

impl<S: Storage> Session<S> {
    pub fn new(store: Store<S>) -> Self {
        let mut selection = LedgerSelection::None;
        selection.reconcile(store.ledgers());
        Self { store, selection }
    }

    pub fn store(&self) -> &Store<S> {
        &self.store
    }

    pub fn selection(&self) -> &LedgerSelection {
        &self.selection
    }

    pub fn select(&mut self, ledger: &str) -> Result<Dashboard> {
        if !self.selection.select(ledger, self.store.ledgers()) {
            return Err(TallyError::UnknownLedger(ledger.to_string()));
        }
        debug!(ledger, "ledger selected");
        Ok(self.dashboard())
    }

    pub fn apply<T, F>(&mut self, f: F) -> Result<Update<T>>
    where
        F: FnOnce(&mut Store<S>) -> Result<Change<T>>,
    {
        let change = f(&mut self.store)?;
        self.selection.reconcile(self.store.ledgers());
        Ok(Update {
            value: change.value,
            unsaved: change.unsaved,
            dashboard: self.dashboard(),
        })
    }

    pub fn flush(&mut self) -> Result<()> {
        self.store.flush()
    }

    pub fn totals(&self, ledger: &str) -> LedgerTotals {
        aggregate::totals(self.store.books(), ledger)
    }

    pub fn dashboard(&self) -> Dashboard {
        match self.selection.name() {
            Some(name) => {
                let totals = self.totals(name);
                dashboard::project(Some((name, &totals)))
            }
            None => dashboard::project(None),
        }
    }

    pub fn boards(&self) -> Vec<LedgerBoard> {
        views::ledger_boards(self.store.books(), self.store.ledgers())
    }
}
