//! Query descriptor types.
//!
//! A [`Query`] names a root entity kind, a column projection, a filter
//! tree, a list of links (joins) and sort directives. Descriptors are
//! immutable inputs to the engine: evaluation never writes back into them.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::value::Value;

/// Column projection: an explicit attribute set, or everything.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnSet {
    /// Project every attribute.
    All,
    /// Project the listed attributes only. An empty list projects nothing
    /// at the root; on a link it is widened to `All` during the join.
    Columns(Vec<String>),
}

impl ColumnSet {
    /// Project every attribute.
    pub fn all() -> Self {
        ColumnSet::All
    }

    /// Project no attributes.
    pub fn none() -> Self {
        ColumnSet::Columns(Vec::new())
    }

    /// Project the given attributes.
    pub fn columns<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ColumnSet::Columns(names.into_iter().map(Into::into).collect())
    }

    /// Check if this set projects everything.
    pub fn is_all(&self) -> bool {
        matches!(self, ColumnSet::All)
    }

    /// Check if a named attribute is selected.
    pub fn contains(&self, name: &str) -> bool {
        match self {
            ColumnSet::All => true,
            ColumnSet::Columns(cols) => cols.iter().any(|c| c == name),
        }
    }

    /// Widen an empty explicit set to `All`, leaving everything else as is.
    pub fn or_all(&self) -> ColumnSet {
        match self {
            ColumnSet::Columns(cols) if cols.is_empty() => ColumnSet::All,
            other => other.clone(),
        }
    }
}

impl Default for ColumnSet {
    fn default() -> Self {
        ColumnSet::none()
    }
}

/// The closed set of condition operators.
///
/// `In`, `NotIn`, `Between` and `NotBetween` belong to the descriptor
/// vocabulary but are not implemented by the engine; selecting one of them
/// fails the query with an unsupported-operator error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConditionOperator {
    Equal,
    NotEqual,
    GreaterThan,
    GreaterEqual,
    LessThan,
    LessEqual,
    Null,
    NotNull,
    Like,
    NotLike,
    BeginsWith,
    DoesNotBeginWith,
    EndsWith,
    DoesNotEndWith,
    Contains,
    DoesNotContain,
    In,
    NotIn,
    Between,
    NotBetween,
}

impl fmt::Display for ConditionOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ConditionOperator::Equal => "Equal",
            ConditionOperator::NotEqual => "NotEqual",
            ConditionOperator::GreaterThan => "GreaterThan",
            ConditionOperator::GreaterEqual => "GreaterEqual",
            ConditionOperator::LessThan => "LessThan",
            ConditionOperator::LessEqual => "LessEqual",
            ConditionOperator::Null => "Null",
            ConditionOperator::NotNull => "NotNull",
            ConditionOperator::Like => "Like",
            ConditionOperator::NotLike => "NotLike",
            ConditionOperator::BeginsWith => "BeginsWith",
            ConditionOperator::DoesNotBeginWith => "DoesNotBeginWith",
            ConditionOperator::EndsWith => "EndsWith",
            ConditionOperator::DoesNotEndWith => "DoesNotEndWith",
            ConditionOperator::Contains => "Contains",
            ConditionOperator::DoesNotContain => "DoesNotContain",
            ConditionOperator::In => "In",
            ConditionOperator::NotIn => "NotIn",
            ConditionOperator::Between => "Between",
            ConditionOperator::NotBetween => "NotBetween",
        };
        f.write_str(name)
    }
}

/// A single comparison test against one attribute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    /// Attribute name to test.
    pub attribute: String,
    /// Source alias when the attribute belongs to a joined entity.
    pub alias: Option<String>,
    /// Comparison operator.
    pub operator: ConditionOperator,
    /// Literal values to compare against, in order.
    pub values: Vec<Value>,
}

impl Condition {
    /// Create a condition with explicit values.
    pub fn new(
        attribute: impl Into<String>,
        operator: ConditionOperator,
        values: Vec<Value>,
    ) -> Self {
        Self {
            attribute: attribute.into(),
            alias: None,
            operator,
            values,
        }
    }

    /// Create a value-less condition (Null / NotNull).
    pub fn unary(attribute: impl Into<String>, operator: ConditionOperator) -> Self {
        Self::new(attribute, operator, Vec::new())
    }

    /// Create an equality condition.
    pub fn equal(attribute: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(attribute, ConditionOperator::Equal, vec![value.into()])
    }

    /// Create a not-equal condition.
    pub fn not_equal(attribute: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(attribute, ConditionOperator::NotEqual, vec![value.into()])
    }

    /// Create a greater-than condition.
    pub fn greater_than(attribute: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(attribute, ConditionOperator::GreaterThan, vec![value.into()])
    }

    /// Create a less-than condition.
    pub fn less_than(attribute: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(attribute, ConditionOperator::LessThan, vec![value.into()])
    }

    /// Create a null check.
    pub fn null(attribute: impl Into<String>) -> Self {
        Self::unary(attribute, ConditionOperator::Null)
    }

    /// Create a not-null check.
    pub fn not_null(attribute: impl Into<String>) -> Self {
        Self::unary(attribute, ConditionOperator::NotNull)
    }

    /// Create a wildcard match condition.
    pub fn like(attribute: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self::new(
            attribute,
            ConditionOperator::Like,
            vec![Value::String(pattern.into())],
        )
    }

    /// Set the source alias for a joined attribute.
    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }
}

/// Logical combinator for a filter node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FilterOperator {
    /// All parts must hold.
    And,
    /// At least one part must hold.
    Or,
}

/// A logical tree of conditions and nested filters.
///
/// A filter with neither conditions nor nested filters is satisfied
/// unconditionally, whatever its operator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Filter {
    /// How conditions and nested filters combine.
    pub operator: FilterOperator,
    /// Leaf conditions.
    pub conditions: Vec<Condition>,
    /// Nested filter subtrees.
    pub filters: Vec<Filter>,
}

impl Filter {
    /// Create an empty filter with the given operator.
    pub fn new(operator: FilterOperator) -> Self {
        Self {
            operator,
            conditions: Vec::new(),
            filters: Vec::new(),
        }
    }

    /// Create an empty AND filter.
    pub fn and() -> Self {
        Self::new(FilterOperator::And)
    }

    /// Create an empty OR filter.
    pub fn or() -> Self {
        Self::new(FilterOperator::Or)
    }

    /// Add a condition.
    pub fn with_condition(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }

    /// Add a nested filter.
    pub fn with_filter(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    /// Check whether the filter has no conditions and no nested filters.
    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty() && self.filters.is_empty()
    }
}

impl Default for Filter {
    fn default() -> Self {
        Filter::and()
    }
}

/// How a link joins its source and target streams.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JoinKind {
    /// Equi-join dropping unmatched source records.
    Inner,
    /// Alias for `Inner` kept for descriptor compatibility.
    Natural,
    /// Every source record retained; unmatched records contribute nothing.
    LeftOuter,
}

/// A join specification from one entity kind to another.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Link {
    /// Attribute on the source side of the equi-join.
    pub from_attribute: String,
    /// Target entity kind.
    pub to_kind: String,
    /// Attribute on the target side of the equi-join.
    pub to_attribute: String,
    /// Join kind.
    pub join: JoinKind,
    /// Alias under which target attributes are namespaced. Defaults to the
    /// target kind when absent.
    pub alias: Option<String>,
    /// Column projection for the target side.
    pub columns: ColumnSet,
    /// Legacy per-link filter, evaluated against the combined record with
    /// this link's alias prepended to unqualified condition attributes.
    pub criteria: Option<Filter>,
    /// Nested links applied against this link's target.
    pub links: Vec<Link>,
}

impl Link {
    /// Create an inner join link.
    pub fn new(
        from_attribute: impl Into<String>,
        to_kind: impl Into<String>,
        to_attribute: impl Into<String>,
    ) -> Self {
        Self {
            from_attribute: from_attribute.into(),
            to_kind: to_kind.into(),
            to_attribute: to_attribute.into(),
            join: JoinKind::Inner,
            alias: None,
            columns: ColumnSet::none(),
            criteria: None,
            links: Vec::new(),
        }
    }

    /// Set the join kind.
    pub fn with_join(mut self, join: JoinKind) -> Self {
        self.join = join;
        self
    }

    /// Make this a left-outer join.
    pub fn left_outer(self) -> Self {
        self.with_join(JoinKind::LeftOuter)
    }

    /// Set the alias for joined attributes.
    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    /// Set the target-side column projection.
    pub fn with_columns(mut self, columns: ColumnSet) -> Self {
        self.columns = columns;
        self
    }

    /// Attach a legacy per-link filter.
    pub fn with_criteria(mut self, criteria: Filter) -> Self {
        self.criteria = Some(criteria);
        self
    }

    /// Add a nested link against this link's target.
    pub fn with_link(mut self, link: Link) -> Self {
        self.links.push(link);
        self
    }

    /// The alias joined attributes are namespaced under.
    pub fn alias_or_kind(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.to_kind)
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderDirection {
    /// Ascending order.
    Asc,
    /// Descending order.
    Desc,
}

/// One sort directive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderSpec {
    /// Attribute to order by.
    pub attribute: String,
    /// Sort direction.
    pub direction: OrderDirection,
}

impl OrderSpec {
    /// Create an ascending order spec.
    pub fn asc(attribute: impl Into<String>) -> Self {
        Self {
            attribute: attribute.into(),
            direction: OrderDirection::Asc,
        }
    }

    /// Create a descending order spec.
    pub fn desc(attribute: impl Into<String>) -> Self {
        Self {
            attribute: attribute.into(),
            direction: OrderDirection::Desc,
        }
    }
}

/// A complete query descriptor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Query {
    /// Root entity kind.
    pub kind: String,
    /// Column projection for the root entity.
    pub columns: ColumnSet,
    /// Root filter tree.
    pub criteria: Filter,
    /// Root-level links, applied in declaration order.
    pub links: Vec<Link>,
    /// Sort directives; the first is primary.
    pub orders: Vec<OrderSpec>,
}

impl Query {
    /// Create a query for an entity kind, projecting all columns.
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            columns: ColumnSet::All,
            criteria: Filter::and(),
            links: Vec::new(),
            orders: Vec::new(),
        }
    }

    /// Set the column projection.
    pub fn with_columns(mut self, columns: ColumnSet) -> Self {
        self.columns = columns;
        self
    }

    /// Set the root filter.
    pub fn with_criteria(mut self, criteria: Filter) -> Self {
        self.criteria = criteria;
        self
    }

    /// Add a root-level link.
    pub fn with_link(mut self, link: Link) -> Self {
        self.links.push(link);
        self
    }

    /// Add a sort directive.
    pub fn with_order(mut self, order: OrderSpec) -> Self {
        self.orders.push(order);
        self
    }
}
