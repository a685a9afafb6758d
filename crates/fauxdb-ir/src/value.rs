//! Runtime value types for record attributes and query literals.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A runtime value held in a record's attribute bag or passed as a
/// condition literal.
///
/// This enum is the closed union of every attribute type the engine
/// understands. Values produced by joins are wrapped in
/// [`Value::Aliased`]; comparisons unwrap the alias transparently.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// Null value.
    Null,
    /// Boolean value.
    Bool(bool),
    /// Boolean wrapped with a managed-property flag.
    ManagedBool(ManagedBool),
    /// 32-bit signed integer.
    Int32(i32),
    /// 64-bit signed integer.
    Int64(i64),
    /// Exact decimal number.
    Decimal(Decimal),
    /// Decimal amount with currency semantics.
    Money(Money),
    /// UTF-8 string.
    String(String),
    /// Point in time, always UTC.
    DateTime(DateTime<Utc>),
    /// Record identifier.
    Uuid(Uuid),
    /// Typed pointer to a record of another entity kind.
    Reference(EntityRef),
    /// Tagged integer from an enumerated option set.
    OptionCode(i32),
    /// A value contributed by a join, tagged with the source alias.
    Aliased(Box<AliasedValue>),
}

/// A boolean wrapped with an "is managed" flag.
///
/// Compared by its underlying boolean; the flag is carried along untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManagedBool {
    /// The wrapped boolean.
    pub value: bool,
    /// Whether the property is managed.
    pub is_managed: bool,
}

impl ManagedBool {
    /// Create a managed boolean.
    pub fn new(value: bool) -> Self {
        Self {
            value,
            is_managed: true,
        }
    }
}

/// A decimal amount with currency semantics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    /// The amount.
    pub amount: Decimal,
}

impl Money {
    /// Create a money value from a decimal amount.
    pub fn new(amount: Decimal) -> Self {
        Self { amount }
    }
}

/// A typed pointer consisting of a target entity kind and identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityRef {
    /// Target entity kind.
    pub kind: String,
    /// Target record identifier.
    pub id: Uuid,
}

impl EntityRef {
    /// Create a reference to a record of the given kind.
    pub fn new(kind: impl Into<String>, id: Uuid) -> Self {
        Self {
            kind: kind.into(),
            id,
        }
    }
}

/// A value together with the alias of the joined entity it came from.
///
/// Produced only by the join planner when it merges target attributes into
/// a combined record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AliasedValue {
    /// Alias of the entity the value was sourced from.
    pub alias: String,
    /// The wrapped value.
    pub value: Value,
}

impl Value {
    /// Wrap a value with a source alias.
    pub fn aliased(alias: impl Into<String>, value: Value) -> Self {
        Value::Aliased(Box::new(AliasedValue {
            alias: alias.into(),
            value,
        }))
    }

    /// Check if this value is null.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Strip any alias wrappers and return the inner value.
    pub fn unaliased(&self) -> &Value {
        let mut v = self;
        while let Value::Aliased(a) = v {
            v = &a.value;
        }
        v
    }

    /// A short name for the value kind, used in error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::ManagedBool(_) => "managed-boolean",
            Value::Int32(_) => "int32",
            Value::Int64(_) => "int64",
            Value::Decimal(_) => "decimal",
            Value::Money(_) => "money",
            Value::String(_) => "string",
            Value::DateTime(_) => "date-time",
            Value::Uuid(_) => "identifier",
            Value::Reference(_) => "entity-reference",
            Value::OptionCode(_) => "option-code",
            Value::Aliased(a) => a.value.kind_name(),
        }
    }

    /// Try to get as bool.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Try to get as i64, widening from i32.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int32(i) => Some(*i as i64),
            Value::Int64(i) => Some(*i),
            _ => None,
        }
    }

    /// Try to get as string reference.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Try to get as decimal.
    pub fn as_decimal(&self) -> Option<Decimal> {
        match self {
            Value::Decimal(d) => Some(*d),
            _ => None,
        }
    }

    /// Try to get as UUID.
    pub fn as_uuid(&self) -> Option<Uuid> {
        match self {
            Value::Uuid(u) => Some(*u),
            _ => None,
        }
    }

    /// Try to get as date-time.
    pub fn as_date_time(&self) -> Option<DateTime<Utc>> {
        match self {
            Value::DateTime(d) => Some(*d),
            _ => None,
        }
    }

    /// Parse a string as a date-time, normalizing to UTC.
    ///
    /// Accepts RFC 3339 and the invariant `YYYY-MM-DD[ HH:MM:SS]` forms.
    /// Returns `None` when the string is not a date-time.
    pub fn parse_date_time(s: &str) -> Option<DateTime<Utc>> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Some(dt.with_timezone(&Utc));
        }
        for fmt in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"] {
            if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
                return Some(naive.and_utc());
            }
        }
        if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
            return Some(date.and_hms_opt(0, 0, 0)?.and_utc());
        }
        None
    }

    /// Ingest a date-time from string form, falling back to a plain string.
    pub fn from_date_string(s: &str) -> Self {
        match Self::parse_date_time(s) {
            Some(dt) => Value::DateTime(dt),
            None => Value::String(s.to_string()),
        }
    }
}

// Conversion implementations
impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<ManagedBool> for Value {
    fn from(v: ManagedBool) -> Self {
        Value::ManagedBool(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int32(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int64(v)
    }
}

impl From<Decimal> for Value {
    fn from(v: Decimal) -> Self {
        Value::Decimal(v)
    }
}

impl From<Money> for Value {
    fn from(v: Money) -> Self {
        Value::Money(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(v: DateTime<Utc>) -> Self {
        Value::DateTime(v)
    }
}

impl From<Uuid> for Value {
    fn from(v: Uuid) -> Self {
        Value::Uuid(v)
    }
}

impl From<EntityRef> for Value {
    fn from(v: EntityRef) -> Self {
        Value::Reference(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(val) => val.into(),
            None => Value::Null,
        }
    }
}
