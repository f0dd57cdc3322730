use geocat_model::property::compare_values;
use geocat_model::{Predicate, Query, SortBy, SortOrder};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use serde_json::{json, Value};
use std::cmp::Ordering;

fn sorted(query: &Query, mut docs: Vec<Value>) -> Vec<Value> {
    docs.sort_by(|a, b| query.compare(a, b));
    docs
}

fn names(docs: &[Value]) -> Vec<&str> {
    docs.iter().map(|d| d["name"].as_str().unwrap()).collect()
}

// ── Builder ──────────────────────────────────────────────────────

#[test]
fn builder_sets_fields() {
    let q = Query::filter(Predicate::equal("name", "x"))
        .offset(2)
        .limit(5)
        .sort(SortBy::desc("name"));
    assert_eq!(q.offset, Some(2));
    assert_eq!(q.limit, Some(5));
    assert_eq!(q.sort_by, vec![SortBy::desc("name")]);
    assert_eq!(q.sort_by[0].order, SortOrder::Descending);
}

#[test]
fn default_query_accepts_all() {
    let q = Query::all();
    assert!(q.filter.is_accept_all());
    assert_eq!(q.offset, None);
    assert_eq!(q.limit, None);
}

// ── Ordering ─────────────────────────────────────────────────────

#[test]
fn ascending_is_default() {
    assert_eq!(SortOrder::default(), SortOrder::Ascending);
    let q = Query::all().sort(SortBy::asc("name"));
    let docs = sorted(&q, vec![json!({"name": "c"}), json!({"name": "a"}), json!({"name": "b"})]);
    assert_eq!(names(&docs), vec!["a", "b", "c"]);
}

#[test]
fn descending_reverses() {
    let q = Query::all().sort(SortBy::desc("name"));
    let docs = sorted(&q, vec![json!({"name": "a"}), json!({"name": "c"}), json!({"name": "b"})]);
    assert_eq!(names(&docs), vec!["c", "b", "a"]);
}

#[test]
fn keys_apply_in_priority_order() {
    let q = Query::all().sort(SortBy::asc("ws")).sort(SortBy::desc("name"));
    let docs = sorted(
        &q,
        vec![
            json!({"ws": "b", "name": "x"}),
            json!({"ws": "a", "name": "x"}),
            json!({"ws": "a", "name": "y"}),
        ],
    );
    assert_eq!(names(&docs), vec!["y", "x", "x"]);
    assert_eq!(docs[2]["ws"], "b");
}

#[test]
fn ties_keep_input_order() {
    let q = Query::all().sort(SortBy::asc("ws"));
    let docs = sorted(
        &q,
        vec![
            json!({"ws": "a", "name": "first"}),
            json!({"ws": "a", "name": "second"}),
            json!({"ws": "a", "name": "third"}),
        ],
    );
    assert_eq!(names(&docs), vec!["first", "second", "third"]);
}

#[test]
fn missing_sort_key_orders_first() {
    let q = Query::all().sort(SortBy::asc("title"));
    let docs = sorted(&q, vec![json!({"name": "b", "title": "t"}), json!({"name": "a"})]);
    assert_eq!(names(&docs), vec!["a", "b"]);
}

#[test]
fn sorts_on_dotted_paths() {
    let q = Query::all().sort(SortBy::asc("workspace.id"));
    let docs = sorted(
        &q,
        vec![
            json!({"name": "s1", "workspace": {"id": "z"}}),
            json!({"name": "s2", "workspace": {"id": "m"}}),
        ],
    );
    assert_eq!(names(&docs), vec!["s2", "s1"]);
}

#[test]
fn mixed_kinds_have_fixed_rank() {
    assert_eq!(compare_values(&Value::Null, &json!(false)), Ordering::Less);
    assert_eq!(compare_values(&json!(true), &json!(1)), Ordering::Less);
    assert_eq!(compare_values(&json!(10), &json!("1")), Ordering::Less);
    assert_eq!(compare_values(&json!(2), &json!(10)), Ordering::Less);
    assert_eq!(compare_values(&json!(1.5), &json!(1)), Ordering::Greater);
}

// ── Properties ───────────────────────────────────────────────────

proptest! {
    #[test]
    fn ascending_sort_is_ordered(values in proptest::collection::vec("[a-z]{0,4}", 0..20)) {
        let q = Query::all().sort(SortBy::asc("name"));
        let docs: Vec<Value> = values.iter().map(|v| json!({"name": v})).collect();
        let docs = sorted(&q, docs);
        for pair in docs.windows(2) {
            prop_assert!(pair[0]["name"].as_str() <= pair[1]["name"].as_str());
        }
    }

    #[test]
    fn descending_is_reverse_of_ascending(values in proptest::collection::btree_set("[a-z]{1,4}", 0..20)) {
        let docs: Vec<Value> = values.iter().map(|v| json!({"name": v})).collect();
        let asc = sorted(&Query::all().sort(SortBy::asc("name")), docs.clone());
        let mut desc = sorted(&Query::all().sort(SortBy::desc("name")), docs);
        desc.reverse();
        prop_assert_eq!(asc, desc);
    }
}
