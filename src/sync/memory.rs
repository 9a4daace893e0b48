//! In-memory persistence for tests and offline runs

use crate::attributes::Record;
use crate::error::{SyncError, SyncResult};
use crate::sync::Persistence;
use async_trait::async_trait;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;

/// Record of a call made against the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncCall {
    Fetch(u64),
    Save(Option<u64>),
}

pub struct MemoryPersistence<T: Record> {
    records: RefCell<HashMap<u64, T>>,
    calls: RefCell<Vec<SyncCall>>,
    failing: Cell<bool>,
    next_id: Cell<u64>,
}

impl<T: Record> MemoryPersistence<T> {
    pub fn new() -> Self {
        Self {
            records: RefCell::new(HashMap::new()),
            calls: RefCell::new(Vec::new()),
            failing: Cell::new(false),
            next_id: Cell::new(1),
        }
    }

    pub fn insert(&self, id: u64, record: T) {
        self.records.borrow_mut().insert(id, record);
        if id >= self.next_id.get() {
            self.next_id.set(id + 1);
        }
    }

    pub fn record(&self, id: u64) -> Option<T> {
        self.records.borrow().get(&id).cloned()
    }

    /// Make every subsequent call fail with a network error
    pub fn set_failing(&self, failing: bool) {
        self.failing.set(failing);
    }

    pub fn calls(&self) -> Vec<SyncCall> {
        self.calls.borrow().clone()
    }

    fn check_available(&self) -> SyncResult<()> {
        if self.failing.get() {
            Err(SyncError::network("simulated outage"))
        } else {
            Ok(())
        }
    }
}

impl<T: Record> Default for MemoryPersistence<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait(?Send)]
impl<T: Record> Persistence<T> for MemoryPersistence<T> {
    fn name(&self) -> &str {
        "memory"
    }

    async fn fetch_record(&self, id: u64) -> SyncResult<T> {
        self.calls.borrow_mut().push(SyncCall::Fetch(id));
        self.check_available()?;
        self.record(id).ok_or(SyncError::NotFound { id })
    }

    async fn save_record(&self, record: &T) -> SyncResult<u64> {
        self.calls.borrow_mut().push(SyncCall::Save(record.id()));
        self.check_available()?;

        let id = record.id().unwrap_or_else(|| self.next_id.get());
        let mut stored = record.clone();
        stored.set_id(id);
        self.insert(id, stored);
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::user::UserProps;

    #[test]
    fn test_save_without_id_assigns_next_slot() {
        let store = MemoryPersistence::new();
        store.insert(4, UserProps::default().with_name("four"));

        let id = tokio_test::block_on(store.save_record(&UserProps::default().with_name("new"))).unwrap();
        assert_eq!(id, 5);
        assert_eq!(
            store.record(5),
            Some(UserProps::default().with_id(5).with_name("new"))
        );
        assert_eq!(store.calls(), vec![SyncCall::Save(None)]);
    }

    #[test]
    fn test_failing_store_records_the_attempt() {
        let store: MemoryPersistence<UserProps> = MemoryPersistence::new();
        store.set_failing(true);

        let result = tokio_test::block_on(store.fetch_record(1));
        assert!(matches!(result, Err(SyncError::Network { .. })));
        assert_eq!(store.calls(), vec![SyncCall::Fetch(1)]);
    }
}
