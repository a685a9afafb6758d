//! Query engine for fauxdb.
//!
//! Translates a `fauxdb_ir::Query` descriptor into a result sequence over
//! the in-memory store: joins, a predicate built from the filter tree,
//! projection, and a stable multi-key sort.

mod coerce;
mod condition;
mod executor;
mod filter;
mod join;

pub use executor::QueryExecutor;

use fauxdb_ir::Record;

use crate::catalog::Catalog;
use crate::error::Error;
use crate::store::RecordStore;

/// Fetch all records of a kind, validating the kind against the catalog
/// and routing each record through the kind's typed-record constructor
/// when one is registered.
pub(crate) fn fetch_records(
    store: &RecordStore,
    catalog: &Catalog,
    kind: &str,
) -> Result<Vec<Record>, Error> {
    catalog.ensure_exists(kind)?;
    let records = store.records_of(kind);
    Ok(match catalog.constructor(kind) {
        Some(ctor) => records.iter().map(|r| ctor(r)).collect(),
        None => records.to_vec(),
    })
}
