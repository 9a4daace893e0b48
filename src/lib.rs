pub mod attributes;
pub mod cli;
pub mod config;
pub mod dom;
pub mod error;
pub mod events;
pub mod model;
pub mod sync;
pub mod user;
pub mod view;
pub mod views;

pub use attributes::{Attributes, Record};
pub use error::{ConfigError, SyncError, SyncResult};
pub use events::{EventEmitter, EventKind, SubscriptionId};
pub use model::Model;
pub use view::{View, ViewTemplate};

/// Route library logs through the test harness's captured output
#[cfg(test)]
pub(crate) fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}
