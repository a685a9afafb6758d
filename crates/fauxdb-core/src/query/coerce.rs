//! Value coercion shared by every comparison.
//!
//! A condition compares a stored attribute value against a literal from
//! the query descriptor. The two sides rarely share a runtime kind: money
//! is compared against plain decimals, option codes against integers,
//! managed booleans against booleans, entity references against bare
//! identifiers, and string-encoded dates against date-times. This module
//! reduces each (stored, literal) pair to one common comparable type.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use fauxdb_ir::{EntityRef, Value};

use crate::error::Error;

/// A (stored, literal) pair reduced to a common comparable type.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum CoercedPair {
    Bool(bool, bool),
    Int(i64, i64),
    Decimal(Decimal, Decimal),
    Str(String, String),
    DateTime(DateTime<Utc>, DateTime<Utc>),
    Id(Uuid, Uuid),
    Reference(EntityRef, EntityRef),
}

impl CoercedPair {
    /// Equality of the two sides.
    pub fn is_equal(&self) -> bool {
        match self {
            CoercedPair::Bool(s, l) => s == l,
            CoercedPair::Int(s, l) => s == l,
            CoercedPair::Decimal(s, l) => s == l,
            CoercedPair::Str(s, l) => s == l,
            CoercedPair::DateTime(s, l) => s == l,
            CoercedPair::Id(s, l) => s == l,
            CoercedPair::Reference(s, l) => s == l,
        }
    }

    /// Ordering of stored relative to literal, where the common type is
    /// ordered. References support equality only.
    pub fn ordering(&self) -> Option<Ordering> {
        match self {
            CoercedPair::Bool(s, l) => Some(s.cmp(l)),
            CoercedPair::Int(s, l) => Some(s.cmp(l)),
            CoercedPair::Decimal(s, l) => Some(s.cmp(l)),
            CoercedPair::Str(s, l) => Some(s.cmp(l)),
            CoercedPair::DateTime(s, l) => Some(s.cmp(l)),
            CoercedPair::Id(s, l) => Some(s.cmp(l)),
            CoercedPair::Reference(_, _) => None,
        }
    }
}

/// Reduce a stored value and a condition literal to a common comparable
/// type.
///
/// `Ok(None)` means the comparison is false without being an error (the
/// declared-mismatch cases); `Err` means the two kinds are fundamentally
/// incompatible. The declared unwrap combinations never error:
/// alias wrappers, reference vs. identifier, option-code vs. integer,
/// money vs. decimal, managed-boolean vs. boolean, and date-typed strings.
pub(crate) fn coerce_pair(
    attribute: &str,
    stored: &Value,
    literal: &Value,
) -> Result<Option<CoercedPair>, Error> {
    let stored = stored.unaliased();
    let literal = literal.unaliased();

    // A null on either side never produces a comparable pair; the
    // operators handle null/absence explicitly before comparing.
    if stored.is_null() || literal.is_null() {
        return Ok(None);
    }

    let incompatible = || Error::IncompatibleComparison {
        attribute: attribute.to_string(),
        stored: stored.kind_name(),
        literal: literal.kind_name(),
    };

    let pair = match literal {
        // Stripped above; a literal cannot still be null or aliased here.
        Value::Null | Value::Aliased(_) => None,

        // Identifier literal: match a reference's id, or a stored id.
        // Any other stored kind compares false, not as an error.
        Value::Uuid(id) => match stored {
            Value::Reference(r) => Some(CoercedPair::Id(r.id, *id)),
            Value::Uuid(s) => Some(CoercedPair::Id(*s, *id)),
            _ => None,
        },

        // Integer or option-code literal: unwrap stored option codes,
        // widen both integer widths.
        Value::Int32(i) => Some(int_pair(stored, *i as i64).ok_or_else(incompatible)?),
        Value::Int64(i) => Some(int_pair(stored, *i).ok_or_else(incompatible)?),
        Value::OptionCode(code) => Some(int_pair(stored, *code as i64).ok_or_else(incompatible)?),

        // Decimal or money literal: compare as plain decimals.
        Value::Decimal(d) => Some(decimal_pair(stored, *d).ok_or_else(incompatible)?),
        Value::Money(m) => Some(decimal_pair(stored, m.amount).ok_or_else(incompatible)?),

        // Boolean literal (managed or plain): unwrap managed wrappers.
        Value::Bool(b) => Some(bool_pair(stored, *b).ok_or_else(incompatible)?),
        Value::ManagedBool(m) => Some(bool_pair(stored, m.value).ok_or_else(incompatible)?),

        // String literal: a date-typed string compares as a date-time,
        // anything else as a plain string.
        Value::String(text) => match Value::parse_date_time(text) {
            Some(lit_dt) => match stored {
                Value::DateTime(s) => Some(CoercedPair::DateTime(*s, lit_dt)),
                Value::String(s) => match Value::parse_date_time(s) {
                    Some(s_dt) => Some(CoercedPair::DateTime(s_dt, lit_dt)),
                    None => Some(CoercedPair::Str(s.clone(), text.clone())),
                },
                _ => return Err(incompatible()),
            },
            None => match stored {
                Value::String(s) => Some(CoercedPair::Str(s.clone(), text.clone())),
                _ => return Err(incompatible()),
            },
        },

        // Date-time literal: stored date-times directly, stored
        // date-typed strings after parsing.
        Value::DateTime(lit_dt) => match stored {
            Value::DateTime(s) => Some(CoercedPair::DateTime(*s, *lit_dt)),
            Value::String(s) => match Value::parse_date_time(s) {
                Some(s_dt) => Some(CoercedPair::DateTime(s_dt, *lit_dt)),
                None => return Err(incompatible()),
            },
            _ => return Err(incompatible()),
        },

        // Reference literal: (kind, id) against a stored reference, or
        // id-only against a stored identifier.
        Value::Reference(r) => match stored {
            Value::Reference(s) => Some(CoercedPair::Reference(s.clone(), r.clone())),
            Value::Uuid(id) => Some(CoercedPair::Id(*id, r.id)),
            _ => return Err(incompatible()),
        },
    };

    Ok(pair)
}

/// Coerce a stored value to an integer pair, unwrapping option codes.
fn int_pair(stored: &Value, literal: i64) -> Option<CoercedPair> {
    match stored {
        Value::OptionCode(code) => Some(CoercedPair::Int(*code as i64, literal)),
        Value::Int32(s) => Some(CoercedPair::Int(*s as i64, literal)),
        Value::Int64(s) => Some(CoercedPair::Int(*s, literal)),
        _ => None,
    }
}

/// Coerce a stored value to a decimal pair, unwrapping money amounts.
fn decimal_pair(stored: &Value, literal: Decimal) -> Option<CoercedPair> {
    match stored {
        Value::Money(m) => Some(CoercedPair::Decimal(m.amount, literal)),
        Value::Decimal(d) => Some(CoercedPair::Decimal(*d, literal)),
        Value::Int32(i) => Some(CoercedPair::Decimal(Decimal::from(*i), literal)),
        Value::Int64(i) => Some(CoercedPair::Decimal(Decimal::from(*i), literal)),
        _ => None,
    }
}

/// Coerce a stored value to a boolean pair, unwrapping managed wrappers.
fn bool_pair(stored: &Value, literal: bool) -> Option<CoercedPair> {
    match stored {
        Value::ManagedBool(m) => Some(CoercedPair::Bool(m.value, literal)),
        Value::Bool(b) => Some(CoercedPair::Bool(*b, literal)),
        _ => None,
    }
}
