//! Condition translation: one (attribute, operator, values) test against
//! one record.
//!
//! Presence rules: only Null/NotNull treat an absent attribute as null.
//! Every other operator requires the attribute to be present with a
//! non-null value, so absence makes the condition false rather than
//! defaulting.

use std::borrow::Cow;
use std::cmp::Ordering;

use fauxdb_ir::{Condition, ConditionOperator, Record, Value};

use crate::error::Error;

use super::coerce::coerce_pair;

/// Evaluate a condition against a record.
pub(crate) fn evaluate(condition: &Condition, record: &Record) -> Result<bool, Error> {
    let attribute = qualified_attribute(condition);
    let stored = record.attribute(&attribute);

    match condition.operator {
        ConditionOperator::Equal => equal_match(&attribute, condition, stored),
        ConditionOperator::NotEqual => Ok(!equal_match(&attribute, condition, stored)?),

        ConditionOperator::GreaterThan => {
            order_match(&attribute, condition, stored, Ordering::Greater)
        }
        ConditionOperator::LessThan => order_match(&attribute, condition, stored, Ordering::Less),
        ConditionOperator::GreaterEqual => Ok(equal_match(&attribute, condition, stored)?
            || order_match(&attribute, condition, stored, Ordering::Greater)?),
        ConditionOperator::LessEqual => Ok(equal_match(&attribute, condition, stored)?
            || order_match(&attribute, condition, stored, Ordering::Less)?),

        ConditionOperator::Null => Ok(null_match(stored)),
        ConditionOperator::NotNull => Ok(!null_match(stored)),

        ConditionOperator::Like | ConditionOperator::BeginsWith => {
            like_match(&attribute, &condition.values, stored)
        }
        ConditionOperator::EndsWith => {
            let values = rewrite_values(&condition.values, |s| format!("%{s}"));
            like_match(&attribute, &values, stored)
        }
        ConditionOperator::Contains => {
            let values = rewrite_values(&condition.values, |s| format!("%{s}%"));
            like_match(&attribute, &values, stored)
        }

        ConditionOperator::NotLike | ConditionOperator::DoesNotBeginWith => {
            Ok(!like_match(&attribute, &condition.values, stored)?)
        }
        ConditionOperator::DoesNotEndWith => {
            let values = rewrite_values(&condition.values, |s| format!("%{s}"));
            Ok(!like_match(&attribute, &values, stored)?)
        }
        ConditionOperator::DoesNotContain => {
            let values = rewrite_values(&condition.values, |s| format!("%{s}%"));
            Ok(!like_match(&attribute, &values, stored)?)
        }

        op @ (ConditionOperator::In
        | ConditionOperator::NotIn
        | ConditionOperator::Between
        | ConditionOperator::NotBetween) => Err(Error::UnsupportedOperator(op.to_string())),
    }
}

/// The lookup key for a condition's attribute: joined attributes are
/// namespaced `alias.attribute` in combined records.
fn qualified_attribute(condition: &Condition) -> Cow<'_, str> {
    match &condition.alias {
        Some(alias) => Cow::Owned(format!("{alias}.{}", condition.attribute)),
        None => Cow::Borrowed(&condition.attribute),
    }
}

/// Absent counts as null for the Null/NotNull pair only.
fn null_match(stored: Option<&Value>) -> bool {
    match stored {
        None => true,
        Some(v) => v.unaliased().is_null(),
    }
}

/// Present, non-null, and coerced-equal to at least one literal.
fn equal_match(
    attribute: &str,
    condition: &Condition,
    stored: Option<&Value>,
) -> Result<bool, Error> {
    let Some(stored) = stored else {
        return Ok(false);
    };
    if stored.unaliased().is_null() {
        return Ok(false);
    }
    for literal in &condition.values {
        if let Some(pair) = coerce_pair(attribute, stored, literal)? {
            if pair.is_equal() {
                return Ok(true);
            }
        }
    }
    Ok(false)
}

/// Present, non-null, and strictly ordered against at least one literal.
fn order_match(
    attribute: &str,
    condition: &Condition,
    stored: Option<&Value>,
    wanted: Ordering,
) -> Result<bool, Error> {
    let Some(stored) = stored else {
        return Ok(false);
    };
    if stored.unaliased().is_null() {
        return Ok(false);
    }
    for literal in &condition.values {
        if let Some(pair) = coerce_pair(attribute, stored, literal)? {
            if pair.ordering() == Some(wanted) {
                return Ok(true);
            }
        }
    }
    Ok(false)
}

/// Rewrite the literal list of a Like-family condition into a fresh vector.
///
/// The caller's descriptor holds the original values; the rewrite never
/// touches them.
fn rewrite_values(values: &[Value], rewrite: impl Fn(&str) -> String) -> Vec<Value> {
    values
        .iter()
        .map(|v| match v.unaliased() {
            Value::String(s) => Value::String(rewrite(s)),
            other => other.clone(),
        })
        .collect()
}

/// Present and wildcard-matching at least one literal pattern.
///
/// Pattern interpretation: `%` markers at both ends mean a substring test,
/// a leading marker alone a suffix test, and a trailing marker (or no
/// marker at all) a prefix test. Matching is case-insensitive and markers
/// are stripped before testing.
fn like_match(
    attribute: &str,
    patterns: &[Value],
    stored: Option<&Value>,
) -> Result<bool, Error> {
    let Some(stored) = stored else {
        return Ok(false);
    };
    let stored = stored.unaliased();
    if stored.is_null() {
        return Ok(false);
    }
    let text = match stored {
        Value::String(s) => s.to_lowercase(),
        other => {
            return Err(Error::IncompatibleComparison {
                attribute: attribute.to_string(),
                stored: other.kind_name(),
                literal: "string",
            })
        }
    };

    for pattern in patterns {
        let raw = match pattern.unaliased() {
            Value::String(s) => s,
            other => {
                return Err(Error::IncompatibleComparison {
                    attribute: attribute.to_string(),
                    stored: "string",
                    literal: other.kind_name(),
                })
            }
        };

        let leading = raw.starts_with('%');
        let trailing = raw.ends_with('%');
        let needle = raw.replace('%', "").to_lowercase();

        let matched = if leading && trailing {
            text.contains(&needle)
        } else if leading {
            text.ends_with(&needle)
        } else {
            // Trailing marker, or a bare pattern, is a prefix test.
            text.starts_with(&needle)
        };
        if matched {
            return Ok(true);
        }
    }
    Ok(false)
}
