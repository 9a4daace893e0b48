//! Observable models: attributes plus events plus persistence
//!
//! A [`Model`] composes an [`EventEmitter`] and an [`Attributes`] store.
//! Every `set` fires [`EventKind::Change`] once the merge is visible, and
//! the `fetch`/`save` round trips report completion through
//! [`EventKind::Fetch`], [`EventKind::Save`] and [`EventKind::Error`].

use crate::attributes::{Attributes, Record};
use crate::error::{SyncError, SyncResult};
use crate::events::{EventEmitter, EventKind, SubscriptionId};
use crate::sync::Persistence;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

pub struct Model<T: Record> {
    events: EventEmitter,
    attributes: RefCell<Attributes<T>>,
    persistence: Rc<dyn Persistence<T>>,
}

impl<T: Record> Model<T> {
    /// Create a model from a possibly partial record
    pub fn new(attrs: T, persistence: Rc<dyn Persistence<T>>) -> Self {
        Self {
            events: EventEmitter::new(),
            attributes: RefCell::new(Attributes::new(attrs)),
            persistence,
        }
    }

    pub fn get(&self, field: T::Field) -> Option<T::Value> {
        self.attributes.borrow().get(field)
    }

    /// Snapshot of the full record
    pub fn get_all(&self) -> T {
        self.attributes.borrow().get_all().clone()
    }

    /// Merge `update` into the attributes, then fire `change`
    pub fn set(&self, update: T) {
        self.attributes.borrow_mut().set(update);
        self.events.trigger(EventKind::Change);
    }

    pub fn on<F>(&self, event: impl Into<EventKind>, callback: F) -> SubscriptionId
    where
        F: Fn() + 'static,
    {
        self.events.on(event, callback)
    }

    pub fn off(&self, id: SubscriptionId) -> bool {
        self.events.off(id)
    }

    pub fn trigger(&self, event: impl Into<EventKind>) {
        self.events.trigger(event)
    }

    pub fn events(&self) -> &EventEmitter {
        &self.events
    }

    /// Load the record addressed by this model's id and merge it in
    ///
    /// On failure nothing is merged and no `change` fires; `error` fires
    /// instead and the failure is returned.
    pub async fn fetch(&self) -> SyncResult<()> {
        let id = self.attributes.borrow().get_all().id().ok_or(SyncError::MissingId)?;

        tracing::debug!("Fetching record {} via {}", id, self.persistence.name());
        match self.persistence.fetch_record(id).await {
            Ok(record) => {
                tracing::info!("Fetched record {}", id);
                self.set(record);
                self.events.trigger(EventKind::Fetch);
                Ok(())
            }
            Err(e) => {
                tracing::warn!("Failed to fetch record {}: {}", id, e);
                self.events.trigger(EventKind::Error);
                Err(e)
            }
        }
    }

    /// Persist the current record, firing `save` on success
    ///
    /// A record without an id is created, and the id persistence assigns is
    /// merged back through `set` (firing `change`) before `save` fires, so a
    /// second `save` updates the same record.
    pub async fn save(&self) -> SyncResult<()> {
        let record = self.get_all();

        tracing::debug!("Saving record {:?} via {}", record.id(), self.persistence.name());
        match self.persistence.save_record(&record).await {
            Ok(id) => {
                tracing::info!("Saved record {}", id);
                if record.id().is_none() {
                    let mut assigned = T::default();
                    assigned.set_id(id);
                    self.set(assigned);
                }
                self.events.trigger(EventKind::Save);
                Ok(())
            }
            Err(e) => {
                tracing::warn!("Failed to save record {:?}: {}", record.id(), e);
                self.events.trigger(EventKind::Error);
                Err(e)
            }
        }
    }
}

impl<T: Record> fmt::Debug for Model<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Model")
            .field("attributes", self.attributes.borrow().get_all())
            .field("events", &self.events)
            .field("persistence", &self.persistence.name())
            .finish()
    }
}
