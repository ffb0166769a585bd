//! # Document Store
//!
//! Every record the core reads or writes goes through two narrow traits:
//!
//! - [`DocumentStore`]: collections of JSON documents addressed by id, with
//!   single-document atomic `set`/`add` and equality-filtered queries. Holds the
//!   cursor, linking and command collections.
//! - [`MappingStore`]: the durable voice identity to account identity cache.
//!
//! Both are passed explicitly into each operation. The SQLite-backed
//! implementations live in `gateway` and `mappings`; tests substitute doubles.

mod gateway;
mod mappings;

pub use gateway::StoreConnection;
pub use mappings::{MappingStore, SqliteMappingStore};

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

pub const CURSOR_COLLECTION: &str = "cursor";
pub const SYNC_COLLECTION: &str = "sync";
pub const SCAN_COLLECTION: &str = "scan";
pub const DELIVERY_COLLECTION: &str = "delivery";

#[derive(Debug, thiserror::Error)]
pub enum StoreFailure {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("malformed document: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// A document as returned by a query.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredDocument {
    pub id: String,
    pub data: Value,
}

/// Top-level field equality, the only predicate the core needs.
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    pub field: &'static str,
    pub value: Value,
}

impl Filter {
    pub fn eq(field: &'static str, value: impl Into<Value>) -> Self {
        Self {
            field,
            value: value.into(),
        }
    }

    pub fn matches(&self, data: &Value) -> bool {
        data.get(self.field) == Some(&self.value)
    }
}

pub trait DocumentStore {
    fn get(&self, collection: &str, id: &str) -> Result<Option<Value>, StoreFailure>;

    /// Creates or fully replaces the document in one atomic write.
    fn set(&self, collection: &str, id: &str, data: &Value) -> Result<(), StoreFailure>;

    /// Appends a document under a generated id and returns that id.
    fn add(&self, collection: &str, data: &Value) -> Result<String, StoreFailure>;

    /// Documents matching every filter, in insertion order.
    fn query(&self, collection: &str, filters: &[Filter]) -> Result<Vec<StoredDocument>, StoreFailure>;
}

pub fn get_record<T: DeserializeOwned>(
    store: &dyn DocumentStore,
    collection: &str,
    id: &str,
) -> Result<Option<T>, StoreFailure> {
    store
        .get(collection, id)?
        .map(serde_json::from_value)
        .transpose()
        .map_err(StoreFailure::from)
}

pub fn set_record<T: Serialize>(
    store: &dyn DocumentStore,
    collection: &str,
    id: &str,
    record: &T,
) -> Result<(), StoreFailure> {
    store.set(collection, id, &serde_json::to_value(record)?)
}

pub fn add_record<T: Serialize>(
    store: &dyn DocumentStore,
    collection: &str,
    record: &T,
) -> Result<String, StoreFailure> {
    store.add(collection, &serde_json::to_value(record)?)
}

/// Runs the query and decodes every match.
pub fn query_records<T: DeserializeOwned>(
    store: &dyn DocumentStore,
    collection: &str,
    filters: &[Filter],
) -> Result<Vec<(String, T)>, StoreFailure> {
    store
        .query(collection, filters)?
        .into_iter()
        .map(|doc| Ok((doc.id, serde_json::from_value(doc.data)?)))
        .collect()
}

#[cfg(test)]
pub(crate) mod doubles {
    //! Store doubles shared by the unit tests of the core components.

    use super::*;
    use common::model::mapping::AccountMapping;
    use std::cell::{Cell, RefCell};

    pub(crate) use super::gateway::tests::{credentials, memory_store};

    /// Fails the test on any access.
    pub struct UntouchableStore;

    impl DocumentStore for UntouchableStore {
        fn get(&self, collection: &str, _: &str) -> Result<Option<Value>, StoreFailure> {
            panic!("unexpected get on {collection}")
        }
        fn set(&self, collection: &str, _: &str, _: &Value) -> Result<(), StoreFailure> {
            panic!("unexpected set on {collection}")
        }
        fn add(&self, collection: &str, _: &Value) -> Result<String, StoreFailure> {
            panic!("unexpected add on {collection}")
        }
        fn query(&self, collection: &str, _: &[Filter]) -> Result<Vec<StoredDocument>, StoreFailure> {
            panic!("unexpected query on {collection}")
        }
    }

    impl MappingStore for UntouchableStore {
        fn get(&self, voice_identity: &str) -> Result<Option<AccountMapping>, StoreFailure> {
            panic!("unexpected mapping lookup for {voice_identity}")
        }
        fn put(&self, mapping: &AccountMapping) -> Result<(), StoreFailure> {
            panic!("unexpected mapping write for {}", mapping.voice_identity)
        }
    }

    /// Wraps a real store and makes writes fail, optionally reads as well.
    pub struct FailingWrites<'a> {
        pub inner: &'a dyn DocumentStore,
        pub fail_reads: bool,
    }

    impl DocumentStore for FailingWrites<'_> {
        fn get(&self, collection: &str, id: &str) -> Result<Option<Value>, StoreFailure> {
            if self.fail_reads {
                return Err(StoreFailure::Unavailable("reads disabled".to_string()));
            }
            self.inner.get(collection, id)
        }
        fn set(&self, _: &str, _: &str, _: &Value) -> Result<(), StoreFailure> {
            Err(StoreFailure::Unavailable("writes disabled".to_string()))
        }
        fn add(&self, _: &str, _: &Value) -> Result<String, StoreFailure> {
            Err(StoreFailure::Unavailable("writes disabled".to_string()))
        }
        fn query(&self, collection: &str, filters: &[Filter]) -> Result<Vec<StoredDocument>, StoreFailure> {
            if self.fail_reads {
                return Err(StoreFailure::Unavailable("reads disabled".to_string()));
            }
            self.inner.query(collection, filters)
        }
    }

    /// In-memory mapping store that counts calls and can refuse writes.
    #[derive(Default)]
    pub struct RecordingMappings {
        pub entries: RefCell<Vec<AccountMapping>>,
        pub reject_puts: bool,
        pub fail_gets: bool,
        pub gets: Cell<usize>,
    }

    impl MappingStore for RecordingMappings {
        fn get(&self, voice_identity: &str) -> Result<Option<AccountMapping>, StoreFailure> {
            self.gets.set(self.gets.get() + 1);
            if self.fail_gets {
                return Err(StoreFailure::Unavailable("mapping table offline".to_string()));
            }
            Ok(self
                .entries
                .borrow()
                .iter()
                .find(|m| m.voice_identity == voice_identity)
                .cloned())
        }

        fn put(&self, mapping: &AccountMapping) -> Result<(), StoreFailure> {
            if self.reject_puts {
                return Err(StoreFailure::Unavailable("mapping table read-only".to_string()));
            }
            let mut entries = self.entries.borrow_mut();
            entries.retain(|m| m.voice_identity != mapping.voice_identity);
            entries.push(mapping.clone());
            Ok(())
        }
    }
}
