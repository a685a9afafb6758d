//! Core error types.

use thiserror::Error;

/// Fatal query-engine errors.
///
/// Every variant aborts the query immediately with no partial result;
/// there are no transient failures in this synchronous, in-memory engine.
#[derive(Debug, Error)]
pub enum Error {
    /// Referenced entity kind not registered in the catalog.
    #[error("entity kind '{0}' is not registered in the catalog")]
    UnknownEntityKind(String),

    /// Condition operator not implemented by the engine.
    #[error("condition operator {0} is not implemented")]
    UnsupportedOperator(String),

    /// Literal and stored value are fundamentally incompatible.
    #[error(
        "cannot compare attribute '{attribute}': stored {stored} value is incompatible with {literal} literal"
    )]
    IncompatibleComparison {
        /// Attribute the condition was testing.
        attribute: String,
        /// Kind of the stored value.
        stored: &'static str,
        /// Kind of the condition literal.
        literal: &'static str,
    },
}
