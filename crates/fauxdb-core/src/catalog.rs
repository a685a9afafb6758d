//! Catalog of registered entity kinds.
//!
//! The catalog is the metadata collaborator of the query engine: it answers
//! whether an entity kind exists, and optionally holds a typed-record
//! constructor per kind. Kinds are registered explicitly by the caller; the
//! engine never infers them from data.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

use fauxdb_ir::Record;

use crate::error::Error;

/// A constructor producing a strongly-typed view of a generic record.
///
/// This is the explicit-registry replacement for runtime type discovery:
/// callers that maintain typed record shapes register one constructor per
/// entity kind, and the engine routes every fetched record of that kind
/// through it. The engine behaves identically when no constructor is
/// registered.
pub type RecordConstructor = Arc<dyn Fn(&Record) -> Record + Send + Sync>;

/// Registry of entity kinds and their optional typed-record constructors.
#[derive(Default, Clone)]
pub struct Catalog {
    kinds: HashSet<String>,
    constructors: HashMap<String, RecordConstructor>,
}

impl Catalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an entity kind.
    pub fn register(&mut self, kind: impl Into<String>) {
        self.kinds.insert(kind.into());
    }

    /// Register an entity kind, builder style.
    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.register(kind);
        self
    }

    /// Register a typed-record constructor for a kind.
    ///
    /// Also registers the kind itself.
    pub fn register_constructor(&mut self, kind: impl Into<String>, ctor: RecordConstructor) {
        let kind = kind.into();
        self.kinds.insert(kind.clone());
        self.constructors.insert(kind, ctor);
    }

    /// Remove a typed-record constructor, keeping the kind registered.
    pub fn unregister_constructor(&mut self, kind: &str) -> Option<RecordConstructor> {
        self.constructors.remove(kind)
    }

    /// Check whether an entity kind is registered.
    pub fn entity_exists(&self, kind: &str) -> bool {
        self.kinds.contains(kind)
    }

    /// Fail with a configuration error unless the kind is registered.
    pub fn ensure_exists(&self, kind: &str) -> Result<(), Error> {
        if self.entity_exists(kind) {
            Ok(())
        } else {
            Err(Error::UnknownEntityKind(kind.to_string()))
        }
    }

    /// Look up the typed-record constructor for a kind, if any.
    pub fn constructor(&self, kind: &str) -> Option<&RecordConstructor> {
        self.constructors.get(kind)
    }
}

impl fmt::Debug for Catalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Catalog")
            .field("kinds", &self.kinds)
            .field("constructors", &self.constructors.keys())
            .finish()
    }
}
