//! Document store boundary.
//!
//! The store is a tree of JSON values addressed by slash-separated key
//! paths. Two write operations exist: a partial merge that replaces only
//! the listed children of a path, and a full replacement of the value at a
//! path.

mod error;
mod memory;
mod rest;

use std::future::Future;

use serde_json::{Map, Value};

pub use error::StoreError;
pub use memory::MemoryStore;
pub use rest::{RestStore, RestStoreConfig};

/// Children to write under one path, keyed by child name or by a
/// slash-separated path relative to it.
pub type Fields = Map<String, Value>;

/// A key-path addressable JSON document store.
pub trait DocumentStore {
    /// Replace the listed children of `path`, leaving its other children
    /// untouched.
    ///
    /// A key like `stops/70011` replaces that one nested child. Either
    /// every listed key is written or none is.
    fn update(
        &self,
        path: &str,
        fields: Fields,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Replace the whole value at `path`.
    fn set(&self, path: &str, value: Value) -> impl Future<Output = Result<(), StoreError>> + Send;
}

/// Split a key path into its non-empty segments.
pub(crate) fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}
