//! fauxdb core - catalog, in-memory record store, and query engine.
//!
//! fauxdb is an in-memory substitute for a networked business-entity
//! service. Records live in a [`RecordStore`] grouped by entity kind; the
//! [`Catalog`] answers which kinds exist; the [`QueryExecutor`] runs a
//! `fauxdb_ir::Query` descriptor through a fixed pipeline:
//!
//! 1. validate the root entity kind
//! 2. fetch the root record stream
//! 3. apply every link (join) in declaration order
//! 4. build one predicate from link criteria and the root filter
//! 5. filter
//! 6. project
//! 7. sort
//!
//! The pipeline is synchronous, single-threaded, and read-only over both
//! the store and the query descriptor.

pub mod catalog;
pub mod error;
pub mod query;
pub mod store;

pub use catalog::{Catalog, RecordConstructor};
pub use error::Error;
pub use query::QueryExecutor;
pub use store::RecordStore;

/// Re-export descriptor types.
pub use fauxdb_ir as ir;
