//! Link resolution: equi-joins merging target attributes into combined
//! records.
//!
//! Each link joins the current record stream against the records of its
//! target kind. Matched target attributes enter the combined record under
//! `alias.attribute`, wrapped in an aliased value, so that filters and
//! projection can tell joined attributes from root ones.

use tracing::debug;

use fauxdb_ir::{ColumnSet, JoinKind, Link, Record, Value};

use crate::catalog::Catalog;
use crate::error::Error;
use crate::store::RecordStore;

use super::fetch_records;

/// Resolves links against the store, one join at a time.
pub(crate) struct JoinPlanner<'a> {
    store: &'a RecordStore,
    catalog: &'a Catalog,
}

impl<'a> JoinPlanner<'a> {
    pub fn new(store: &'a RecordStore, catalog: &'a Catalog) -> Self {
        Self { store, catalog }
    }

    /// Apply one link (and, recursively, its nested links) to a record
    /// stream.
    ///
    /// `previous_columns` is the column set of the stage that produced
    /// `rows`; the source side of each merged record is projected to it.
    /// `source_alias` is set when `rows` came out of a parent link, in
    /// which case the join key is looked up under the parent's alias
    /// first.
    pub fn apply(
        &self,
        rows: Vec<Record>,
        link: &Link,
        previous_columns: &ColumnSet,
        source_kind: &str,
        source_alias: Option<&str>,
    ) -> Result<Vec<Record>, Error> {
        self.catalog.ensure_exists(source_kind)?;
        let targets = fetch_records(self.store, self.catalog, &link.to_kind)?;

        let alias = link.alias_or_kind();
        // An empty explicit projection is widened to all columns for the
        // duration of the join: filters may reference any joined
        // attribute, and projection narrows again at the end. The
        // descriptor itself is left untouched.
        let effective_columns = link.columns.or_all();

        let mut joined = Vec::new();
        for source in &rows {
            let key = source_key(source, &link.from_attribute, source_alias);
            let mut matched = false;

            if let Some(key) = &key {
                for target in &targets {
                    if target_key(target, &link.to_attribute).as_ref() == Some(key) {
                        joined.push(merge(
                            source,
                            target,
                            previous_columns,
                            &effective_columns,
                            alias,
                        ));
                        matched = true;
                    }
                }
            }

            // A left-outer join retains unmatched source records with no
            // contributed attributes; inner and natural joins drop them.
            if !matched && link.join == JoinKind::LeftOuter {
                joined.push(project_source(source, previous_columns));
            }
        }

        // Nested links consume the stream this join produced, with this
        // link's target columns as the previous stage.
        for nested in &link.links {
            joined = self.apply(joined, nested, &effective_columns, &link.to_kind, Some(alias))?;
        }

        Ok(joined)
    }
}

/// Join key on the source side. Under a parent link the attribute lives at
/// `parentAlias.attribute`; the bare name is the fallback.
fn source_key(record: &Record, attribute: &str, parent_alias: Option<&str>) -> Option<Value> {
    let value = match parent_alias {
        Some(alias) => record
            .attribute(&format!("{alias}.{attribute}"))
            .or_else(|| record.attribute(attribute)),
        None => record.attribute(attribute),
    }?;
    join_key(value)
}

/// Join key on the target side.
fn target_key(record: &Record, attribute: &str) -> Option<Value> {
    join_key(record.attribute(attribute)?)
}

/// Normalize a value for equi-join comparison: alias wrappers are
/// stripped, references join by their identifier, option codes by their
/// integer code, money by its amount, and integer widths are unified.
/// Null and absent attributes produce no key and never match.
fn join_key(value: &Value) -> Option<Value> {
    match value.unaliased() {
        Value::Null => None,
        Value::Reference(r) => Some(Value::Uuid(r.id)),
        Value::OptionCode(code) => Some(Value::Int64(*code as i64)),
        Value::Int32(i) => Some(Value::Int64(*i as i64)),
        Value::Money(m) => Some(Value::Decimal(m.amount)),
        Value::ManagedBool(m) => Some(Value::Bool(m.value)),
        other => Some(other.clone()),
    }
}

/// Project a source record to the previous stage's column set, always
/// retaining join-contributed (dot-qualified) attributes so conditions on
/// earlier links keep working after later joins.
fn project_source(record: &Record, columns: &ColumnSet) -> Record {
    if columns.is_all() {
        return record.clone();
    }
    let mut projected = Record::new(record.kind.clone(), record.id);
    for (name, value) in record.attributes() {
        if name.contains('.') || columns.contains(name) {
            projected.set_attribute(name, value.clone());
        }
    }
    projected
}

/// Merge a matched target record into a projected copy of the source.
fn merge(
    source: &Record,
    target: &Record,
    previous_columns: &ColumnSet,
    target_columns: &ColumnSet,
    alias: &str,
) -> Record {
    let mut merged = project_source(source, previous_columns);
    for (name, value) in target.attributes() {
        if !target_columns.contains(name) {
            continue;
        }
        let key = format!("{alias}.{name}");
        if merged
            .set_attribute(key.clone(), Value::aliased(alias, value.clone()))
            .is_some()
        {
            // Alias collisions resolve last-write-wins.
            debug!(attribute = %key, "joined attribute overwrote an existing entry");
        }
    }
    merged
}
