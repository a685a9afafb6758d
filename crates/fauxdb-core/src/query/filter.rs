//! Filter translation: AND/OR folds over conditions and nested filters.

use fauxdb_ir::{Filter, FilterOperator, Record};

use crate::error::Error;

use super::condition;

/// Evaluate a filter tree against a record.
///
/// AND is vacuously true over an empty part list, OR vacuously false; a
/// filter with neither conditions nor nested filters is satisfied
/// unconditionally, whatever its operator. Coercion and
/// unsupported-operator errors propagate immediately.
pub(crate) fn evaluate(filter: &Filter, record: &Record) -> Result<bool, Error> {
    if filter.is_empty() {
        return Ok(true);
    }

    match filter.operator {
        FilterOperator::And => {
            for cond in &filter.conditions {
                if !condition::evaluate(cond, record)? {
                    return Ok(false);
                }
            }
            for nested in &filter.filters {
                if !evaluate(nested, record)? {
                    return Ok(false);
                }
            }
            Ok(true)
        }
        FilterOperator::Or => {
            for cond in &filter.conditions {
                if condition::evaluate(cond, record)? {
                    return Ok(true);
                }
            }
            for nested in &filter.filters {
                if evaluate(nested, record)? {
                    return Ok(true);
                }
            }
            Ok(false)
        }
    }
}
