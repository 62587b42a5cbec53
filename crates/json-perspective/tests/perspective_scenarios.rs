mod common;

use json_perspective::{
    create_store, Data, Kind, NodeId, PolymorphicOps, SequenceOps, Store, TextOps, ViewError,
};
use serde_json::{json, Value};

fn int(store: &Store, id: NodeId) -> i64 {
    store.view(id).as_i64().unwrap_or_default()
}

fn state() -> (Store, NodeId) {
    common::init_logging();
    create_store(json!({"a": {"b": 1}, "c": 2, "d": [3, 4, 5, 6]}))
}

fn seq(value: Value) -> (Store, NodeId) {
    common::init_logging();
    create_store(value)
}

// ── get / set / unwrap / stringify ─────────────────────────────────────────

#[test]
fn get_child_views() {
    let (mut store, root) = state();
    let c = store.get(root, "c").unwrap();
    assert_eq!(store.unwrap(c), Some(json!(2)));
    let a = store.get(root, "a").unwrap();
    assert_eq!(store.unwrap(a), Some(json!({"b": 1})));
    let d = store.get(root, "d").unwrap();
    assert_eq!(store.unwrap(d), Some(json!([3, 4, 5, 6])));
}

#[test]
fn nested_get_chains() {
    let (mut store, root) = state();
    let a = store.get(root, "a").unwrap();
    let b = store.get(a, "b").unwrap();
    assert_eq!(store.unwrap(b), Some(json!(1)));
    let d = store.get(root, "d").unwrap();
    let second = store.get(d, 1usize).unwrap();
    assert_eq!(store.unwrap(second), Some(json!(4)));
}

#[test]
fn set_replaces_value() {
    let (mut store, root) = state();
    let c = store.get(root, "c").unwrap();
    store.set(c, "test");
    let again = store.get(root, "c").unwrap();
    assert_eq!(store.unwrap(again), Some(json!("test")));
}

#[test]
fn set_propagates_to_earlier_selections() {
    let (mut store, root) = state();
    let selection = store.get(root, "c").unwrap();
    let c = store.get(root, "c").unwrap();
    store.set(c, "test");
    assert_eq!(store.unwrap(selection), Some(json!("test")));
}

#[test]
fn set_propagates_across_derived_views() {
    let (mut store, root) = state();
    let d = store.get(root, "d").unwrap();
    let filtered = store.filter(d, |s, n, _| int(s, n) % 2 == 1).unwrap();
    let sorted = store.sort_by(d, |s, a, b| int(s, b).cmp(&int(s, a))).unwrap();
    let three = store.get(sorted, 3usize).unwrap();
    store.set(three, "test");
    let first = store.get(filtered, 0usize).unwrap();
    assert_eq!(store.unwrap(first), Some(json!("test")));
}

#[test]
fn unwrap_of_undefined_and_null() {
    let (store, root) = create_store(Data::Undefined);
    assert_eq!(store.unwrap(root), None);
    let (store, root) = create_store(Value::Null);
    assert_eq!(store.unwrap(root), Some(Value::Null));
}

#[test]
fn stringify_cases() {
    let (mut store, root) = state();
    let c = store.get(root, "c").unwrap();
    assert_eq!(store.stringify(c), "2");
    let a = store.get(root, "a").unwrap();
    assert_eq!(store.stringify(a), "[object Object]");
    let d = store.get(root, "d").unwrap();
    assert_eq!(store.stringify(d), "3,4,5,6");
    let (store, root) = create_store(Data::Undefined);
    assert_eq!(store.stringify(root), "undefined");
    let (store, root) = create_store(Value::Null);
    assert_eq!(store.stringify(root), "null");
}

#[test]
fn wrap_is_idempotent() {
    let (mut store, root) = state();
    assert_eq!(store.wrap(root), root);
    let again = store.wrap(root);
    assert_eq!(store.wrap(again), root);
}

// ── category errors ────────────────────────────────────────────────────────

#[test]
fn sequence_op_on_scalar_fails() {
    let (mut store, n) = seq(json!(2));
    let err = store.push(n, [1]).unwrap_err();
    assert!(matches!(
        err,
        ViewError::CategoryMismatch { op: "push", actual: "number", .. }
    ));
    assert_eq!(store.view(n), json!(2));
}

#[test]
fn text_op_on_sequence_fails() {
    let (store, list) = seq(json!([1, 2]));
    let err = store.trim(list).unwrap_err();
    assert!(err.to_string().contains("`trim`"));
    assert!(err.to_string().contains("sequence"));
}

#[test]
fn set_can_move_a_node_between_categories() {
    let (mut store, list) = seq(json!([1, 2]));
    store.set(list, "  padded  ");
    assert_eq!(store.kind(list), Kind::Scalar);
    assert_eq!(store.trim(list).unwrap(), "padded");
    assert!(store.push(list, [3]).is_err());
}

// ── sequence behaviour ─────────────────────────────────────────────────────

#[test]
fn concat_leaves_source_alone() {
    let (mut store, list) = seq(json!([1, 2, 3]));
    let joined = store.concat(list, [json!([4, 5, 6])]).unwrap();
    assert_eq!(store.view(joined), json!([1, 2, 3, 4, 5, 6]));
    assert_eq!(store.view(list), json!([1, 2, 3]));
}

#[test]
fn copy_within_negative_positions() {
    let (mut store, list) = seq(json!([1, 2, 3, 4, 5]));
    store.copy_within(list, -2, -3, Some(-1)).unwrap();
    assert_eq!(store.view(list), json!([1, 2, 3, 3, 4]));
}

#[test]
fn entries_view() {
    let (mut store, list) = seq(json!([1, 2, 3]));
    let entries = store.entries(list).unwrap();
    assert_eq!(store.view(entries), json!([[0, 1], [1, 2], [2, 3]]));
    assert_eq!(store.view(list), json!([1, 2, 3]));
}

#[test]
fn every_predicate() {
    let (store, list) = seq(json!([1, 2, 3]));
    assert!(store.every(list, |s, n, _| int(s, n) > 0).unwrap());
    assert!(!store.every(list, |s, n, _| int(s, n) > 1).unwrap());
    assert_eq!(store.view(list), json!([1, 2, 3]));
}

#[test]
fn fill_whole_and_partial() {
    let (mut store, list) = seq(json!([1, 2, 3]));
    store.fill(list, "test", 0, None).unwrap();
    assert_eq!(store.view(list), json!(["test", "test", "test"]));
    store.fill(list, 1, 1, Some(2)).unwrap();
    assert_eq!(store.view(list), json!(["test", 1, "test"]));
}

#[test]
fn filter_selects() {
    let (mut store, list) = seq(json!([1, 2, 3, 4]));
    let odd = store.filter(list, |s, n, _| int(s, n) % 2 == 1).unwrap();
    assert_eq!(store.view(odd), json!([1, 3]));
    assert_eq!(store.view(list), json!([1, 2, 3, 4]));
}

#[test]
fn find_returns_shared_node() {
    let (mut store, list) = seq(json!([1, 2, 3, 4]));
    let found = store.find(list, |s, n, _| int(s, n) > 2).unwrap();
    assert_eq!(store.view(found), json!(3));
    assert_eq!(Some(found), store.child(list, 2usize).unwrap());
    assert_eq!(store.view(list), json!([1, 2, 3, 4]));
}

#[test]
fn find_index_returns_position() {
    let (store, list) = seq(json!([1, 2, 3, 4]));
    assert_eq!(store.find_index(list, |s, n, _| int(s, n) > 2).unwrap(), Some(2));
}

#[test]
fn for_each_visits_in_order() {
    let (store, list) = seq(json!([1, 2, 3]));
    let mut total = 0;
    store.for_each(list, |s, n, _| total += int(s, n)).unwrap();
    assert_eq!(total, 6);
}

#[test]
fn includes_identity_and_value_modes() {
    common::init_logging();
    let mut store = Store::new();
    let p = store.wrap("test");
    let with_p = store.wrap(Data::Seq(vec![1.into(), 2.into(), p.into(), 3.into()]));
    assert!(store.includes(with_p, p).unwrap());
    assert_eq!(store.view(with_p), json!([1, 2, "test", 3]));

    let plain = store.wrap(json!([1, 2, "test", 3]));
    assert!(!store.includes(plain, p).unwrap());
    assert!(store.includes(plain, "test").unwrap());
}

#[test]
fn includes_raw_values() {
    let (store, list) = seq(json!([1, 2, 3]));
    assert!(store.includes(list, 2).unwrap());
    assert!(!store.includes(list, 4).unwrap());
}

#[test]
fn index_of_modes() {
    common::init_logging();
    let mut store = Store::new();
    let p = store.wrap("test");
    let list = store.wrap(Data::Seq(vec![1.into(), 2.into(), p.into(), 3.into()]));
    assert_eq!(store.index_of(list, p).unwrap(), Some(2));
    let other = store.wrap("test");
    assert_eq!(store.index_of(list, other).unwrap(), None);
    assert_eq!(store.index_of(list, 2).unwrap(), Some(1));
}

#[test]
fn last_index_of_modes() {
    common::init_logging();
    let mut store = Store::new();
    let p = store.wrap("test");
    let list = store.wrap(Data::Seq(vec![
        1.into(),
        2.into(),
        p.into(),
        p.into(),
        3.into(),
    ]));
    assert_eq!(store.last_index_of(list, p).unwrap(), Some(3));
    assert_eq!(store.view(list), json!([1, 2, "test", "test", 3]));
    let other = store.wrap("test");
    assert_eq!(store.last_index_of(list, other).unwrap(), None);

    let dup = store.wrap(json!([1, 2, 2, 3]));
    assert_eq!(store.last_index_of(dup, 2).unwrap(), Some(2));
}

#[test]
fn join_with_separator() {
    let (store, list) = seq(json!([1, 2, 3]));
    assert_eq!(store.join(list, "-").unwrap(), "1-2-3");
}

#[test]
fn keys_iterate_positions() {
    let (store, list) = seq(json!([1, 2, 3]));
    let keys: Vec<usize> = store.keys(list).unwrap().collect();
    assert_eq!(keys, vec![0, 1, 2]);
}

#[test]
fn map_returns_plain_values() {
    let (store, list) = seq(json!([1, 2, 3]));
    let doubled = store.map(list, |s, n, _| int(s, n) * 2).unwrap();
    assert_eq!(doubled, vec![2, 4, 6]);
    assert_eq!(store.view(list), json!([1, 2, 3]));
}

#[test]
fn pop_and_push() {
    let (mut store, list) = seq(json!([1, 2, 3]));
    let last = store.pop(list).unwrap().unwrap();
    assert_eq!(store.view(last), json!(3));
    assert_eq!(store.view(list), json!([1, 2]));
    assert_eq!(store.push(list, ["test"]).unwrap(), 3);
    assert_eq!(store.view(list), json!([1, 2, "test"]));
}

#[test]
fn reduce_both_directions() {
    let (store, list) = seq(json!([1, 2, 3]));
    assert_eq!(store.reduce(list, 0, |acc, s, n, _| acc + int(s, n)).unwrap(), 6);
    let (store, list) = seq(json!([1, 2, 4]));
    let quotient = store
        .reduce_right(list, 32.0, |acc, s, n, _| acc / int(s, n) as f64)
        .unwrap();
    assert_eq!(quotient, 4.0);
}

#[test]
fn reverse_in_place() {
    let (mut store, list) = seq(json!([1, 2, 3]));
    let same = store.reverse(list).unwrap();
    assert_eq!(same, list);
    assert_eq!(store.view(list), json!([3, 2, 1]));
}

#[test]
fn shift_removes_first() {
    let (mut store, list) = seq(json!([1, 2, 3]));
    let first = store.shift(list).unwrap().unwrap();
    assert_eq!(store.view(first), json!(1));
    assert_eq!(store.view(list), json!([2, 3]));
}

#[test]
fn slice_range() {
    let (mut store, list) = seq(json!([1, 2, 3, 4]));
    let part = store.slice(list, 1, Some(3)).unwrap();
    assert_eq!(store.view(part), json!([2, 3]));
    assert_eq!(store.view(list), json!([1, 2, 3, 4]));
}

#[test]
fn some_predicate() {
    let (store, list) = seq(json!([1, 2, 3, 4]));
    assert!(store.some(list, |s, n, _| store_eq(s, n, 2)).unwrap());
    assert!(!store.some(list, |s, n, _| int(s, n) > 4).unwrap());
}

fn store_eq(store: &Store, id: NodeId, value: i64) -> bool {
    store.equals(id, &Data::from(value))
}

#[test]
fn sort_default_and_custom() {
    let (mut store, list) = seq(json!(["one", "two", "three"]));
    let sorted = store.sort(list).unwrap();
    assert_eq!(store.view(sorted), json!(["one", "three", "two"]));
    assert_eq!(store.view(list), json!(["one", "three", "two"]));

    let (mut store, list) = seq(json!(["one", "two", "three"]));
    let by_len = |s: &Store, n: NodeId| s.length(n).unwrap_or_default();
    let sorted = store
        .sort_by(list, |s, a, b| by_len(s, b).cmp(&by_len(s, a)))
        .unwrap();
    assert_eq!(store.view(sorted), json!(["three", "one", "two"]));
    assert_eq!(store.view(list), json!(["three", "one", "two"]));
}

#[test]
fn splice_months() {
    let (mut store, list) = seq(json!(["Jan", "March", "April", "June"]));
    let removed = store.splice(list, 1, Some(0), ["Feb"]).unwrap();
    assert_eq!(store.view(removed), json!([]));
    assert_eq!(store.view(list), json!(["Jan", "Feb", "March", "April", "June"]));
    let removed = store.splice(list, 4, Some(1), ["May"]).unwrap();
    assert_eq!(store.view(removed), json!(["June"]));
    assert_eq!(store.view(list), json!(["Jan", "Feb", "March", "April", "May"]));
}

#[test]
fn unshift_prepends() {
    let (mut store, list) = seq(json!([1, 2, 3]));
    assert_eq!(store.unshift(list, [0]).unwrap(), 4);
    assert_eq!(store.view(list), json!([0, 1, 2, 3]));
}

#[test]
fn values_and_iteration() {
    let (store, list) = seq(json!([1, 2, 3]));
    let values: Vec<Value> = store.values(list).unwrap().map(|n| store.view(n)).collect();
    assert_eq!(values, vec![json!(1), json!(2), json!(3)]);
    let iterated: Vec<Value> = store.iter(list).unwrap().map(|n| store.view(n)).collect();
    assert_eq!(iterated, values);
}

#[test]
fn iterating_a_scalar_fails() {
    let (store, n) = seq(json!("text"));
    assert!(store.iter(n).is_err());
}
