//! Importing JSON documents into an arena and exporting them back.

use chipy::{Arena, Dictionary, FloatVal, IntVal, List, MAX_DATA_RECURSION_DEPTH, NoLimitTracker, Type, ValueError};
use pretty_assertions::assert_eq;
use serde_json::json;

// =============================================================================
// 1. Import
// =============================================================================

#[test]
fn object_becomes_ordered_dictionary() {
    let mut arena = Arena::new(NoLimitTracker);
    let doc = json!({"zeta": 1, "alpha": true, "mid": "text"});
    let value = arena.create_from_document(&doc).unwrap();

    let keys: Vec<&str> = arena.cast::<Dictionary>(&value).unwrap().keys().collect();
    assert_eq!(keys, vec!["zeta", "alpha", "mid"]);

    let alpha = arena.dict_get(&value, "alpha").unwrap().unwrap();
    assert_eq!(arena.type_of(&alpha), Type::Bool);
    let mid = arena.dict_get(&value, "mid").unwrap().unwrap();
    assert_eq!(arena.type_of(&mid), Type::String);
}

#[test]
fn numbers_pick_integer_or_float() {
    let mut arena = Arena::new(NoLimitTracker);
    let value = arena
        .create_from_document(&json!([7, -7, 2_147_483_648_i64, 0.5]))
        .unwrap();
    assert_eq!(arena.cast::<List>(&value).unwrap().len(), 4);

    let small = arena.get_item(&value, 1).unwrap().unwrap();
    assert_eq!(*arena.cast::<IntVal>(&small).unwrap().get(), -7);

    let big = arena.get_item(&value, 2).unwrap().unwrap();
    assert_eq!(arena.type_of(&big), Type::Float, "out of i32 range");

    let half = arena.get_item(&value, 3).unwrap().unwrap();
    assert!((*arena.cast::<FloatVal>(&half).unwrap().get() - 0.5).abs() < f64::EPSILON);
}

/// `null` has no variant; everything built before it is released.
#[test]
fn null_is_rejected() {
    let mut arena = Arena::new(NoLimitTracker);
    let err = arena.create_from_document(&json!({"a": [1, 2], "b": null})).unwrap_err();
    assert_eq!(err, ValueError::UnsupportedDocument("null"));
    assert_eq!(arena.stats().unreferenced_objects, 1, "only the dictionary is unreferenced");

    arena.collect_unreferenced();
    assert!(arena.is_empty());
}

#[test]
fn deep_nesting_hits_the_recursion_limit() {
    let mut doc = json!(0);
    for _ in 0..=MAX_DATA_RECURSION_DEPTH {
        doc = json!([doc]);
    }
    let mut arena = Arena::new(NoLimitTracker);
    assert_eq!(arena.create_from_document(&doc).unwrap_err(), ValueError::RecursionLimit);

    arena.collect_unreferenced();
    assert!(arena.is_empty());
}

// =============================================================================
// 2. Export
// =============================================================================

#[test]
fn export_matches_imported_document() {
    let doc = json!({
        "name": "sensor",
        "enabled": false,
        "threshold": 1.25,
        "samples": [3, 1, 2],
        "nested": {"empty": []}
    });
    let mut arena = Arena::new(NoLimitTracker);
    let value = arena.create_from_document(&doc).unwrap();
    assert_eq!(arena.to_document(&value).unwrap(), doc);
}

#[test]
fn tuples_export_as_arrays() {
    let mut arena = Arena::new(NoLimitTracker);
    let a = arena.create_integer(1).unwrap();
    let b = arena.create_string("two").unwrap();
    let tuple = arena.create_tuple(vec![a, b]).unwrap();
    assert_eq!(arena.to_document(&tuple).unwrap(), json!([1, "two"]));
}

#[test]
fn variants_without_json_form_are_rejected() {
    let mut arena = Arena::new(NoLimitTracker);
    let function = arena.create_function("f", vec![], false).unwrap();
    let list = arena.create_list(vec![function]).unwrap();
    assert_eq!(arena.to_document(&list).unwrap_err(), ValueError::UnsupportedDocument("Function"));

    let nan = arena.create_float(f64::NAN).unwrap();
    assert_eq!(
        arena.to_document(&nan).unwrap_err(),
        ValueError::UnsupportedDocument("non-finite float")
    );
}

/// A self-referencing list has no finite JSON form.
#[test]
fn cycles_hit_the_recursion_limit() {
    let mut arena = Arena::new(NoLimitTracker);
    let list = arena.create_list(vec![]).unwrap();
    let inner = arena.clone_handle(&list);
    arena.list_append(&list, inner).unwrap();
    assert_eq!(arena.to_document(&list).unwrap_err(), ValueError::RecursionLimit);
}
