//! Storage layer
//!
//! Persists the journal document in a flat key-value medium.
//!
//! ## Architecture
//!
//! - **Backend**: string slots (`MemoryStore` for tests, `FileStore` on disk)
//! - **Persistence**: primary slot, one-save-behind backup, staging slot
//! - **Schema**: shallow validation and version-stepped migration
//! - **Debounce**: coalesces bursts of saves into one write

pub mod backend;
pub mod debounce;
pub mod error;
pub mod persistence;
pub mod schema;

pub use backend::{FileStore, KeyValueStore, MemoryStore};
pub use debounce::{
    DebouncedSaver, ImmediateSaver, SaveDocument, SaveResult, SaveTicket, SharedStore,
};
pub use error::{StorageError, StorageResult};
pub use persistence::{DocumentStore, LoadOutcome, LoadStatus, StorageStats};
pub use schema::SCHEMA_VERSION;
