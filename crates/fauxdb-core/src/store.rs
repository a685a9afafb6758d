//! In-memory record store.
//!
//! Records are grouped by entity kind and kept in insertion order, so that
//! the pre-sort order of query results is deterministic. The store is
//! read-only during query execution; population happens through
//! [`RecordStore::insert`] / [`RecordStore::initialize`] before a query
//! runs (no concurrent mutation — caller's responsibility).

use std::collections::HashMap;

use fauxdb_ir::Record;

/// In-memory storage of records grouped by entity kind.
#[derive(Debug, Default, Clone)]
pub struct RecordStore {
    data: HashMap<String, Vec<Record>>,
}

impl RecordStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a record, keyed by (kind, id).
    ///
    /// Replacing an existing record keeps its original position, so
    /// re-initializing a record does not move it in pre-sort order.
    /// Returns the replaced record, if any.
    pub fn insert(&mut self, record: Record) -> Option<Record> {
        let records = self.data.entry(record.kind.clone()).or_default();
        match records.iter_mut().find(|r| r.id == record.id) {
            Some(slot) => Some(std::mem::replace(slot, record)),
            None => {
                records.push(record);
                None
            }
        }
    }

    /// Bulk-load records.
    pub fn initialize(&mut self, records: impl IntoIterator<Item = Record>) {
        for record in records {
            self.insert(record);
        }
    }

    /// All records of a kind, in insertion order.
    ///
    /// A kind with no data yields an empty slice, not an error; kind
    /// existence is the catalog's concern, checked before lookup.
    pub fn records_of(&self, kind: &str) -> &[Record] {
        self.data.get(kind).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of records stored under a kind.
    pub fn len_of(&self, kind: &str) -> usize {
        self.records_of(kind).len()
    }

    /// Check whether the store holds no records at all.
    pub fn is_empty(&self) -> bool {
        self.data.values().all(Vec::is_empty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fauxdb_ir::Value;
    use uuid::Uuid;

    #[test]
    fn test_insert_and_lookup() {
        let mut store = RecordStore::new();
        assert!(store.is_empty());

        store.insert(Record::new("contact", Uuid::new_v4()).with_attribute("name", "Alice"));
        store.insert(Record::new("contact", Uuid::new_v4()).with_attribute("name", "Bob"));
        store.insert(Record::new("account", Uuid::new_v4()));

        assert_eq!(store.len_of("contact"), 2);
        assert_eq!(store.len_of("account"), 1);
        assert_eq!(store.records_of("invoice"), &[]);
        assert!(!store.is_empty());
    }

    #[test]
    fn test_insertion_order_preserved() {
        let mut store = RecordStore::new();
        let first = Uuid::new_v4();
        let second = Uuid::new_v4();
        store.insert(Record::new("contact", first));
        store.insert(Record::new("contact", second));

        let ids: Vec<Uuid> = store.records_of("contact").iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![first, second]);
    }

    #[test]
    fn test_upsert_keeps_position() {
        let mut store = RecordStore::new();
        let first = Uuid::new_v4();
        let second = Uuid::new_v4();
        store.insert(Record::new("contact", first).with_attribute("name", "Alice"));
        store.insert(Record::new("contact", second));

        let replaced = store.insert(Record::new("contact", first).with_attribute("name", "Alicia"));
        assert!(replaced.is_some());

        let records = store.records_of("contact");
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id, first);
        assert_eq!(
            records[0].attribute("name"),
            Some(&Value::String("Alicia".into()))
        );
    }
}
