//! End-to-end pipeline tests: store → joins → filter → projection → sort.

use std::sync::Arc;

use rust_decimal::Decimal;
use uuid::Uuid;

use fauxdb_core::{Catalog, Error, QueryExecutor, RecordStore};
use fauxdb_ir::{
    ColumnSet, Condition, ConditionOperator, EntityRef, Filter, Link, Money, OrderSpec, Query,
    Record, Value,
};

fn contact(attrs: Vec<(&str, Value)>) -> Record {
    let mut record = Record::new("contact", Uuid::new_v4());
    for (name, value) in attrs {
        record.set_attribute(name, value);
    }
    record
}

#[test]
fn not_null_and_greater_than_combine() {
    let mut store = RecordStore::new();
    let catalog = Catalog::new().with_kind("contact");

    store.insert(contact(vec![]));
    store.insert(contact(vec![("age", Value::Int32(10))]));
    let expected = contact(vec![("age", Value::Int32(20))]);
    let expected_id = expected.id;
    store.insert(expected);

    // The absent-age record fails NotNull; the rest depend on the bound.
    let query = Query::new("contact").with_criteria(
        Filter::and()
            .with_condition(Condition::not_null("age"))
            .with_condition(Condition::greater_than("age", 5i32)),
    );
    let results = QueryExecutor::new(&store, &catalog).execute(&query).unwrap();
    assert_eq!(results.len(), 2);

    let query = Query::new("contact").with_criteria(
        Filter::and()
            .with_condition(Condition::not_null("age"))
            .with_condition(Condition::greater_than("age", 15i32)),
    );
    let results = QueryExecutor::new(&store, &catalog).execute(&query).unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].id, expected_id);
}

#[test]
fn money_equality_matches_single_order() {
    let mut store = RecordStore::new();
    let catalog = Catalog::new().with_kind("order");

    let priced = Record::new("order", Uuid::new_v4())
        .with_attribute("amount", Value::Money(Money::new(Decimal::new(110, 2))));
    let priced_id = priced.id;
    store.insert(priced);
    store.insert(Record::new("order", Uuid::new_v4()));

    let query = Query::new("order").with_criteria(Filter::and().with_condition(
        Condition::equal("amount", Value::Money(Money::new(Decimal::new(110, 2)))),
    ));

    let results = QueryExecutor::new(&store, &catalog).execute(&query).unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].id, priced_id);
}

#[test]
fn filter_may_reference_attributes_outside_projection() {
    let mut store = RecordStore::new();
    let catalog = Catalog::new().with_kind("contact");
    store.insert(contact(vec![
        ("name", Value::String("Alice".into())),
        ("age", Value::Int32(30)),
    ]));
    store.insert(contact(vec![
        ("name", Value::String("Bob".into())),
        ("age", Value::Int32(12)),
    ]));

    let query = Query::new("contact")
        .with_columns(ColumnSet::columns(["name"]))
        .with_criteria(Filter::and().with_condition(Condition::greater_than("age", 18i32)));

    let results = QueryExecutor::new(&store, &catalog).execute(&query).unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(
        results[0].attribute("name"),
        Some(&Value::String("Alice".into()))
    );
    // The filtered attribute is absent from the projected result.
    assert!(!results[0].has_attribute("age"));
}

#[test]
fn multi_key_sort_end_to_end() {
    let mut store = RecordStore::new();
    let catalog = Catalog::new().with_kind("case");

    for (status, created) in [("open", 2i32), ("closed", 1), ("open", 1)] {
        store.insert(
            Record::new("case", Uuid::new_v4())
                .with_attribute("status", status)
                .with_attribute("createdon", created),
        );
    }

    let query = Query::new("case")
        .with_order(OrderSpec::asc("status"))
        .with_order(OrderSpec::desc("createdon"));

    let results = QueryExecutor::new(&store, &catalog).execute(&query).unwrap();
    let keys: Vec<(String, i64)> = results
        .iter()
        .map(|r| {
            (
                r.attribute("status").and_then(Value::as_str).unwrap().to_string(),
                r.attribute("createdon").and_then(Value::as_i64).unwrap(),
            )
        })
        .collect();
    assert_eq!(
        keys,
        vec![
            ("closed".to_string(), 1),
            ("open".to_string(), 2),
            ("open".to_string(), 1)
        ]
    );
}

#[test]
fn left_outer_and_inner_join_cardinality() {
    let mut store = RecordStore::new();
    let catalog = Catalog::new().with_kind("account").with_kind("contact");

    let with_contact = Uuid::new_v4();
    let without_contact = Uuid::new_v4();
    store.insert(
        Record::new("account", with_contact).with_attribute("accountid", with_contact),
    );
    store.insert(
        Record::new("account", without_contact).with_attribute("accountid", without_contact),
    );
    store.insert(
        Record::new("contact", Uuid::new_v4())
            .with_attribute("parentaccountid", EntityRef::new("account", with_contact)),
    );

    let inner = Query::new("account")
        .with_link(Link::new("accountid", "contact", "parentaccountid"));
    let results = QueryExecutor::new(&store, &catalog).execute(&inner).unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].id, with_contact);

    let outer = Query::new("account")
        .with_link(Link::new("accountid", "contact", "parentaccountid").left_outer());
    let results = QueryExecutor::new(&store, &catalog).execute(&outer).unwrap();
    assert_eq!(results.len(), 2);
}

#[test]
fn link_criteria_filter_joined_attributes() {
    let mut store = RecordStore::new();
    let catalog = Catalog::new().with_kind("account").with_kind("contact");

    let acme = Uuid::new_v4();
    let globex = Uuid::new_v4();
    store.insert(
        Record::new("account", acme)
            .with_attribute("accountid", acme)
            .with_attribute("name", "Acme"),
    );
    store.insert(
        Record::new("account", globex)
            .with_attribute("accountid", globex)
            .with_attribute("name", "Globex"),
    );
    for (account, contact_name) in [(acme, "Alice"), (globex, "Bob")] {
        store.insert(
            Record::new("contact", Uuid::new_v4())
                .with_attribute("fullname", contact_name)
                .with_attribute("parentaccountid", EntityRef::new("account", account)),
        );
    }

    // Legacy per-link criteria: unqualified conditions pick up the alias.
    let original_criteria =
        Filter::and().with_condition(Condition::equal("fullname", "Alice"));
    let query = Query::new("account").with_link(
        Link::new("accountid", "contact", "parentaccountid")
            .with_criteria(original_criteria.clone()),
    );

    let results = QueryExecutor::new(&store, &catalog).execute(&query).unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].id, acme);

    // The descriptor's filter was not rewritten in place.
    assert_eq!(query.links[0].criteria.as_ref(), Some(&original_criteria));
}

#[test]
fn nested_links_join_three_kinds() {
    let mut store = RecordStore::new();
    let catalog = Catalog::new()
        .with_kind("account")
        .with_kind("contact")
        .with_kind("task");

    let account = Uuid::new_v4();
    let alice = Uuid::new_v4();
    store.insert(Record::new("account", account).with_attribute("accountid", account));
    store.insert(
        Record::new("contact", alice)
            .with_attribute("contactid", alice)
            .with_attribute("parentaccountid", EntityRef::new("account", account)),
    );
    store.insert(
        Record::new("task", Uuid::new_v4())
            .with_attribute("subject", "Follow up")
            .with_attribute("regardingid", EntityRef::new("contact", alice)),
    );

    let query = Query::new("account").with_link(
        Link::new("accountid", "contact", "parentaccountid")
            .with_link(Link::new("contactid", "task", "regardingid")),
    );

    let results = QueryExecutor::new(&store, &catalog).execute(&query).unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(
        results[0].attribute("task.subject"),
        Some(&Value::aliased("task", Value::String("Follow up".into())))
    );

    // A condition with an explicit alias reaches the nested join.
    let query = query.with_criteria(
        Filter::and()
            .with_condition(Condition::equal("subject", "Follow up").with_alias("task")),
    );
    let results = QueryExecutor::new(&store, &catalog).execute(&query).unwrap();
    assert_eq!(results.len(), 1);
}

#[test]
fn unknown_kinds_are_configuration_errors() {
    let store = RecordStore::new();
    let catalog = Catalog::new().with_kind("account");
    let executor = QueryExecutor::new(&store, &catalog);

    let err = executor.execute(&Query::new("invoice")).unwrap_err();
    assert!(matches!(err, Error::UnknownEntityKind(k) if k == "invoice"));

    // A known-but-empty kind is an empty result, not an error.
    let results = executor.execute(&Query::new("account")).unwrap();
    assert!(results.is_empty());

    // Link targets are validated too.
    let query =
        Query::new("account").with_link(Link::new("accountid", "invoice", "accountid"));
    let err = executor.execute(&query).unwrap_err();
    assert!(matches!(err, Error::UnknownEntityKind(k) if k == "invoice"));
}

#[test]
fn unsupported_operator_fails_fast() {
    let mut store = RecordStore::new();
    let catalog = Catalog::new().with_kind("contact");
    store.insert(contact(vec![("age", Value::Int32(20))]));

    let query = Query::new("contact").with_criteria(Filter::and().with_condition(
        Condition::new("age", ConditionOperator::In, vec![Value::Int32(20)]),
    ));

    let err = QueryExecutor::new(&store, &catalog).execute(&query).unwrap_err();
    match err {
        Error::UnsupportedOperator(name) => assert_eq!(name, "In"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn typed_record_constructor_shapes_results() {
    let mut store = RecordStore::new();
    let mut catalog = Catalog::new();
    catalog.register_constructor(
        "contact",
        Arc::new(|r: &Record| {
            let mut typed = r.clone();
            let full = match (
                r.attribute("firstname").and_then(Value::as_str),
                r.attribute("lastname").and_then(Value::as_str),
            ) {
                (Some(first), Some(last)) => format!("{first} {last}"),
                _ => String::new(),
            };
            typed.set_attribute("fullname", full);
            typed
        }),
    );

    store.insert(contact(vec![
        ("firstname", Value::String("Jordi".into())),
        ("lastname", Value::String("Garcia".into())),
    ]));

    let query = Query::new("contact").with_criteria(
        Filter::and().with_condition(Condition::equal("fullname", "Jordi Garcia")),
    );
    let results = QueryExecutor::new(&store, &catalog).execute(&query).unwrap();
    assert_eq!(results.len(), 1);

    // Without the constructor the synthesized attribute never exists.
    catalog.unregister_constructor("contact");
    let results = QueryExecutor::new(&store, &catalog).execute(&query).unwrap();
    assert!(results.is_empty());
}

#[test]
fn query_descriptor_roundtrips_through_json() {
    let query = Query::new("account")
        .with_columns(ColumnSet::columns(["name"]))
        .with_criteria(
            Filter::or()
                .with_condition(Condition::like("name", "acme%"))
                .with_condition(Condition::null("parentaccountid")),
        )
        .with_link(
            Link::new("accountid", "contact", "parentaccountid")
                .left_outer()
                .with_alias("primary"),
        )
        .with_order(OrderSpec::asc("name"));

    let json = serde_json::to_string_pretty(&query).unwrap();
    let back: Query = serde_json::from_str(&json).unwrap();
    assert_eq!(query, back);
}
