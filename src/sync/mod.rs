//! Persistence collaborators that load and save model records

pub mod http;
pub mod memory;

pub use http::HttpPersistence;
pub use memory::{MemoryPersistence, SyncCall};

use crate::attributes::Record;
use crate::error::SyncResult;
use async_trait::async_trait;

/// Loads and stores records on behalf of a model
///
/// Only success or failure and the payload shape matter to the model;
/// transport details stay inside the implementation.
#[async_trait(?Send)]
pub trait Persistence<T: Record> {
    /// Short name used in logs
    fn name(&self) -> &str;

    /// Load the record addressed by `id`
    async fn fetch_record(&self, id: u64) -> SyncResult<T>;

    /// Store `record`, creating it when it has no id yet
    ///
    /// Returns the id the record is stored under.
    async fn save_record(&self, record: &T) -> SyncResult<u64>;
}
