use std::sync::Arc;

use parking_lot::RwLock;

use crate::{
    core::{error::Result, id::Id},
    table::{Route, Table},
};

#[cfg_attr(doc_cfg, doc(cfg(feature = "sync")))]
#[derive(Debug, Default, Clone)]
/// A table implementation that can be shared between threads.
///
/// It wraps [`Table`] in a lock: an insertion holds the write lock for the whole structural update
/// and finger repair, so searches never observe a half-repaired ring. Searches share the read
/// lock and run concurrently with each other.
pub struct SyncTable {
    table: Arc<RwLock<Table>>,
}

impl SyncTable {
    pub fn new(width: u32) -> Self {
        Self {
            table: Arc::new(RwLock::new(Table::new(width))),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.table.read().is_empty()
    }

    pub fn len(&self) -> usize {
        self.table.read().len()
    }

    pub fn insert(&self, id: Id) -> Result<()> {
        self.table.write().insert(id)
    }

    pub fn search(&self, target: Id) -> Result<Id> {
        self.table.read().search(target)
    }

    pub fn linear_search(&self, target: Id) -> Result<Id> {
        self.table.read().linear_search(target)
    }

    pub fn route(&self, target: Id) -> Result<Route> {
        self.table.read().route(target)
    }

    /// Returns the member identifiers, walking successors from the entry point.
    pub fn member_ids(&self) -> Vec<Id> {
        self.table.read().entries().map(|entry| entry.id).collect()
    }

    /// Returns a snapshot of every member's finger table, walking successors from `start`.
    pub fn entries(&self, start: Id) -> Result<Vec<(Id, Vec<Id>)>> {
        let table = self.table.read();
        let entries = table
            .entries_from(start)?
            .map(|entry| (entry.id, entry.fingers.to_vec()))
            .collect();

        Ok(entries)
    }

    #[doc(hidden)]
    pub fn assert_invariants(&self) {
        self.table.read().assert_invariants()
    }
}
