//! fauxdb query descriptor IR and value model.
//!
//! This crate defines the data that flows into the fauxdb query engine:
//! the closed [`Value`] union stored in record attribute bags, the
//! [`Record`] type itself, and the tree-shaped query descriptor
//! ([`Query`], [`Filter`], [`Condition`], [`Link`], [`OrderSpec`]).
//!
//! Descriptors are plain data with builder helpers; all engine logic lives
//! in `fauxdb-core`. Every type derives `serde::Serialize` /
//! `serde::Deserialize` so queries and fixtures can be snapshotted.

pub mod query;
pub mod record;
pub mod value;

pub use query::{
    ColumnSet, Condition, ConditionOperator, Filter, FilterOperator, JoinKind, Link,
    OrderDirection, OrderSpec, Query,
};
pub use record::Record;
pub use value::{AliasedValue, EntityRef, ManagedBool, Money, Value};
