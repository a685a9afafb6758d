//! Query executor: the fixed pipeline over the in-memory store.
//!
//! Stages run in a fixed order: validate the root kind, fetch, join,
//! filter, project, sort. Filtering sees the pre-projection record, so a
//! filter may reference attributes the projection later drops.

use std::cmp::Ordering;

use tracing::debug;

use fauxdb_ir::{Condition, Filter, Link, OrderDirection, OrderSpec, Query, Record, Value};

use crate::catalog::Catalog;
use crate::error::Error;
use crate::store::RecordStore;

use super::join::JoinPlanner;
use super::{fetch_records, filter};

/// Executes query descriptors against a store and catalog.
pub struct QueryExecutor<'a> {
    store: &'a RecordStore,
    catalog: &'a Catalog,
}

impl<'a> QueryExecutor<'a> {
    /// Create an executor over a store and catalog.
    pub fn new(store: &'a RecordStore, catalog: &'a Catalog) -> Self {
        Self { store, catalog }
    }

    /// Execute a query descriptor, returning the matching records in
    /// their final projected, sorted form.
    pub fn execute(&self, query: &Query) -> Result<Vec<Record>, Error> {
        debug!(kind = %query.kind, links = query.links.len(), "executing query");

        // Fetch validates the root kind against the catalog.
        let mut rows = fetch_records(self.store, self.catalog, &query.kind)?;

        // Joins run strictly in declaration order, before any filter.
        let planner = JoinPlanner::new(self.store, self.catalog);
        for link in &query.links {
            rows = planner.apply(rows, link, &query.columns, &query.kind, None)?;
        }

        // Legacy per-link criteria AND the root criteria form one
        // predicate. Qualification clones the filters; the descriptor is
        // never written to.
        let link_criteria = collect_link_criteria(&query.links);

        let mut results = Vec::new();
        'rows: for row in rows {
            for criteria in &link_criteria {
                if !filter::evaluate(criteria, &row)? {
                    continue 'rows;
                }
            }
            if !filter::evaluate(&query.criteria, &row)? {
                continue;
            }
            // Projection strictly after filtering.
            results.push(project(&row, query));
        }

        sort_records(&mut results, &query.orders);
        Ok(results)
    }
}

/// Gather every per-link filter in the link forest, each qualified with
/// its link's alias.
fn collect_link_criteria(links: &[Link]) -> Vec<Filter> {
    let mut criteria = Vec::new();
    for link in links {
        if let Some(filter) = &link.criteria {
            criteria.push(qualify_filter(filter, link.alias_or_kind()));
        }
        criteria.extend(collect_link_criteria(&link.links));
    }
    criteria
}

/// Clone a filter, giving every unqualified condition the link's alias so
/// lookups hit the `alias.attribute` keys the join wrote.
fn qualify_filter(filter: &Filter, alias: &str) -> Filter {
    Filter {
        operator: filter.operator,
        conditions: filter
            .conditions
            .iter()
            .map(|c| qualify_condition(c, alias))
            .collect(),
        filters: filter
            .filters
            .iter()
            .map(|f| qualify_filter(f, alias))
            .collect(),
    }
}

fn qualify_condition(condition: &Condition, alias: &str) -> Condition {
    let mut condition = condition.clone();
    if condition.alias.is_none() {
        condition.alias = Some(alias.to_string());
    }
    condition
}

/// Final projection: root attributes per the query's column set, plus each
/// link's aliased attributes per that link's declared target columns.
fn project(record: &Record, query: &Query) -> Record {
    let mut projected = Record::new(record.kind.clone(), record.id);
    for (name, value) in record.attributes() {
        // Joined attributes are selected per link below.
        if !name.contains('.') && query.columns.contains(name) {
            projected.set_attribute(name, value.clone());
        }
    }
    for link in &query.links {
        project_link(record, link, &mut projected);
    }
    projected
}

fn project_link(record: &Record, link: &Link, projected: &mut Record) {
    let prefix = format!("{}.", link.alias_or_kind());
    let columns = link.columns.or_all();
    for (name, value) in record.attributes() {
        if let Some(bare) = name.strip_prefix(&prefix) {
            if columns.contains(bare) {
                projected.set_attribute(name, value.clone());
            }
        }
    }
    for nested in &link.links {
        project_link(record, nested, projected);
    }
}

/// Stable multi-key sort: the first spec is primary, later specs only
/// refine ties, and remaining ties keep pre-sort order.
fn sort_records(records: &mut [Record], orders: &[OrderSpec]) {
    if orders.is_empty() {
        return;
    }

    records.sort_by(|a, b| {
        for spec in orders {
            let a_val = a.attribute(&spec.attribute);
            let b_val = b.attribute(&spec.attribute);

            let cmp = compare_for_sort(a_val, b_val);
            let cmp = match spec.direction {
                OrderDirection::Asc => cmp,
                OrderDirection::Desc => cmp.reverse(),
            };

            if cmp != Ordering::Equal {
                return cmp;
            }
        }
        Ordering::Equal
    });
}

/// Compare two optional attribute values for sorting. Absent orders
/// before present, like null.
fn compare_for_sort(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a.map(Value::unaliased), b.map(Value::unaliased)) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(av), Some(bv)) => compare_values(av, bv),
    }
}

/// Compare two values for sorting. Nulls order first; incomparable kinds
/// tie.
fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Null, Value::Null) => Ordering::Equal,
        (Value::Null, _) => Ordering::Less,
        (_, Value::Null) => Ordering::Greater,
        (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
        (Value::ManagedBool(a), Value::ManagedBool(b)) => a.value.cmp(&b.value),
        (Value::ManagedBool(a), Value::Bool(b)) => a.value.cmp(b),
        (Value::Bool(a), Value::ManagedBool(b)) => a.cmp(&b.value),
        (Value::Int32(a), Value::Int32(b)) => a.cmp(b),
        (Value::Int64(a), Value::Int64(b)) => a.cmp(b),
        (Value::Int32(a), Value::Int64(b)) => (*a as i64).cmp(b),
        (Value::Int64(a), Value::Int32(b)) => a.cmp(&(*b as i64)),
        (Value::Decimal(a), Value::Decimal(b)) => a.cmp(b),
        (Value::Money(a), Value::Money(b)) => a.amount.cmp(&b.amount),
        (Value::Money(a), Value::Decimal(b)) => a.amount.cmp(b),
        (Value::Decimal(a), Value::Money(b)) => a.cmp(&b.amount),
        (Value::String(a), Value::String(b)) => a.cmp(b),
        (Value::DateTime(a), Value::DateTime(b)) => a.cmp(b),
        (Value::Uuid(a), Value::Uuid(b)) => a.cmp(b),
        (Value::OptionCode(a), Value::OptionCode(b)) => a.cmp(b),
        (Value::OptionCode(a), Value::Int32(b)) => a.cmp(b),
        (Value::Int32(a), Value::OptionCode(b)) => a.cmp(b),
        _ => Ordering::Equal,
    }
}
