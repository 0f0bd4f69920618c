//! Construction and capability queries for every value variant.

use chipy::{
    Alias, Arena, BoolVal, CppObject, Dictionary, FloatVal, Function, HostHandle, IntVal, List, Module,
    NoLimitTracker, RangeIter, StrVal, Tuple, Type, ValueError,
};
use pretty_assertions::assert_eq;

// =============================================================================
// 1. Discriminants
// =============================================================================

/// Each factory produces a value whose `type_of` names the variant it built.
#[test]
fn factories_report_their_discriminant() {
    let mut arena = Arena::new(NoLimitTracker);
    let dict = arena.create_dictionary().unwrap();
    let owner = arena.create_module("os").unwrap();

    let built = vec![
        (arena.create_boolean(true).unwrap(), Type::Bool),
        (arena.create_string("s").unwrap(), Type::String),
        (arena.create_integer(1).unwrap(), Type::Integer),
        (arena.create_float(1.5).unwrap(), Type::Float),
        (arena.create_dict_items(&dict).unwrap(), Type::DictItems),
        (arena.create_cpp_object("Socket", HostHandle::new(9)).unwrap(), Type::CppObject),
        (arena.create_attribute(&owner, "getcwd").unwrap(), Type::Attribute),
        (arena.create_builtin("len").unwrap(), Type::Builtin),
        (arena.create_list(vec![]).unwrap(), Type::List),
        (arena.create_dictionary().unwrap(), Type::Dictionary),
        (arena.create_range(0, 3, 1).unwrap(), Type::Iterator),
        (arena.create_tuple(vec![]).unwrap(), Type::Tuple),
        (arena.create_alias("numpy", "np").unwrap(), Type::Alias),
        (arena.create_module("sys").unwrap(), Type::Module),
        (arena.create_function("f", vec![], false).unwrap(), Type::Function),
    ];

    let types: Vec<Type> = built.iter().map(|(_, expected)| *expected).collect();
    assert_eq!(types, Type::ALL.to_vec(), "every variant should be covered once");
    for (value, expected) in &built {
        assert_eq!(arena.type_of(value), *expected);
    }
}

/// Every value records the arena that built it.
#[test]
fn values_record_their_owning_arena() {
    let mut first = Arena::new(NoLimitTracker);
    let mut second = Arena::new(NoLimitTracker);
    let a = first.create_integer(1).unwrap();
    let b = second.create_integer(1).unwrap();
    assert_eq!(a.owning_arena(), first.id());
    assert_eq!(b.owning_arena(), second.id());
    assert_ne!(first.id(), second.id());
}

// =============================================================================
// 2. Capabilities
// =============================================================================

#[test]
fn iterable_variants() {
    let mut arena = Arena::new(NoLimitTracker);
    let dict = arena.create_dictionary().unwrap();
    let iterable = [
        arena.create_list(vec![]).unwrap(),
        arena.create_tuple(vec![]).unwrap(),
        arena.create_dict_items(&dict).unwrap(),
        arena.create_range(0, 1, 1).unwrap(),
    ];
    assert!(arena.can_iterate(&dict));
    for value in &iterable {
        assert!(arena.can_iterate(value), "{} should be iterable", arena.type_of(value));
    }

    let not_iterable = [
        arena.create_string("abc").unwrap(),
        arena.create_integer(3).unwrap(),
        arena.create_module("m").unwrap(),
    ];
    for value in &not_iterable {
        assert!(!arena.can_iterate(value), "{} should not be iterable", arena.type_of(value));
    }
}

#[test]
fn callable_variants() {
    let mut arena = Arena::new(NoLimitTracker);
    let module = arena.create_module("math").unwrap();
    let function = arena.create_function("f", vec!["x".to_owned()], false).unwrap();
    let builtin = arena.create_builtin("print").unwrap();
    let attribute = arena.create_attribute(&module, "sqrt").unwrap();

    assert!(arena.is_callable(&function));
    assert!(arena.is_callable(&builtin));
    assert!(arena.is_callable(&attribute));
    assert!(!arena.is_callable(&module));
}

/// Range iterators are always generators; functions only when flagged.
#[test]
fn generator_variants() {
    let mut arena = Arena::new(NoLimitTracker);
    let range = arena.create_range(0, 10, 2).unwrap();
    let plain = arena.create_function("f", vec![], false).unwrap();
    let generator = arena.create_function("g", vec![], true).unwrap();

    assert!(arena.is_generator(&range));
    assert!(!arena.is_generator(&plain));
    assert!(arena.is_generator(&generator));
    assert!(arena.cast::<Function>(&generator).unwrap().is_generator());
}

// =============================================================================
// 3. Truthiness
// =============================================================================

#[test]
fn bool_test_follows_payload_for_bool_and_integer() {
    let mut arena = Arena::new(NoLimitTracker);
    let f = arena.create_boolean(false).unwrap();
    let t = arena.create_boolean(true).unwrap();
    let zero = arena.create_integer(0).unwrap();
    let negative = arena.create_integer(-1).unwrap();

    assert!(!arena.bool_test(&f));
    assert!(arena.bool_test(&t));
    assert!(!arena.bool_test(&zero));
    assert!(arena.bool_test(&negative));
}

/// Empty strings, empty containers and zero floats are all true.
#[test]
fn bool_test_defaults_to_true() {
    let mut arena = Arena::new(NoLimitTracker);
    let values = [
        arena.create_string("").unwrap(),
        arena.create_float(0.0).unwrap(),
        arena.create_list(vec![]).unwrap(),
        arena.create_dictionary().unwrap(),
        arena.create_range(0, 0, 1).unwrap(),
    ];
    for value in &values {
        assert!(arena.bool_test(value), "{} should be truthy", arena.type_of(value));
    }
}

// =============================================================================
// 4. Scalar Payloads
// =============================================================================

/// `set` replaces the payload but never the discriminant.
#[test]
fn scalar_set_keeps_discriminant() {
    let mut arena = Arena::new(NoLimitTracker);
    let value = arena.create_integer(1).unwrap();
    arena.cast_mut::<IntVal>(&value).unwrap().set(99);
    assert_eq!(*arena.cast::<IntVal>(&value).unwrap().get(), 99);
    assert_eq!(arena.type_of(&value), Type::Integer);

    let text = arena.create_string("before").unwrap();
    arena.cast_mut::<StrVal>(&text).unwrap().set("after".to_owned());
    assert_eq!(arena.cast::<StrVal>(&text).unwrap().get(), "after");

    let flag = arena.create_boolean(false).unwrap();
    arena.cast_mut::<BoolVal>(&flag).unwrap().set(true);
    assert!(arena.bool_test(&flag));

    let float = arena.create_float(0.25).unwrap();
    arena.cast_mut::<FloatVal>(&float).unwrap().set(-3.5);
    assert!((*arena.cast::<FloatVal>(&float).unwrap().get() + 3.5).abs() < f64::EPSILON);
}

#[test]
fn alias_exposes_both_names() {
    let mut arena = Arena::new(NoLimitTracker);
    let alias = arena.create_alias("numpy", "np").unwrap();
    let payload: &Alias = arena.cast(&alias).unwrap();
    assert_eq!(payload.name(), "numpy");
    assert_eq!(payload.as_name(), "np");
}

#[test]
fn cpp_object_keeps_host_handle() {
    let mut arena = Arena::new(NoLimitTracker);
    let object = arena.create_cpp_object("Timer", HostHandle::new(0xDEAD)).unwrap();
    let payload: &CppObject = arena.cast(&object).unwrap();
    assert_eq!(payload.type_name(), "Timer");
    assert_eq!(payload.handle().raw(), 0xDEAD);
}

// =============================================================================
// 5. Containers
// =============================================================================

#[test]
fn list_append_and_get_item() {
    let mut arena = Arena::new(NoLimitTracker);
    let list = arena.create_list(vec![]).unwrap();
    for n in 0..3 {
        let item = arena.create_integer(n * 10).unwrap();
        arena.list_append(&list, item).unwrap();
    }
    assert_eq!(arena.cast::<List>(&list).unwrap().len(), 3);

    let second = arena.get_item(&list, 1).unwrap().expect("index 1 exists");
    assert_eq!(*arena.cast::<IntVal>(&second).unwrap().get(), 10);
    assert!(arena.get_item(&list, 3).unwrap().is_none());
}

#[test]
fn tuple_items_are_indexable() {
    let mut arena = Arena::new(NoLimitTracker);
    let a = arena.create_string("a").unwrap();
    let b = arena.create_string("b").unwrap();
    let tuple = arena.create_tuple(vec![a, b]).unwrap();
    assert_eq!(arena.cast::<Tuple>(&tuple).unwrap().len(), 2);

    let first = arena.get_item(&tuple, 0).unwrap().unwrap();
    assert_eq!(arena.cast::<StrVal>(&first).unwrap().get(), "a");
}

#[test]
fn get_item_rejects_non_sequences() {
    let mut arena = Arena::new(NoLimitTracker);
    let dict = arena.create_dictionary().unwrap();
    assert_eq!(
        arena.get_item(&dict, 0).unwrap_err(),
        ValueError::InvalidCast {
            expected: Type::List,
            found: Type::Dictionary
        }
    );
}

/// Appending to something that is not a list gives the item's reference back.
#[test]
fn list_append_to_non_list_releases_item() {
    let mut arena = Arena::new(NoLimitTracker);
    let not_a_list = arena.create_integer(0).unwrap();
    let item = arena.create_integer(1).unwrap();
    let probe = arena.clone_handle(&item);

    let err = arena.list_append(&not_a_list, item).unwrap_err();
    assert_eq!(
        err,
        ValueError::InvalidCast {
            expected: Type::List,
            found: Type::Integer
        }
    );
    assert_eq!(arena.refcount(&probe).unwrap(), 1);
}

#[test]
fn dictionary_keeps_insertion_order_and_replaces() {
    let mut arena = Arena::new(NoLimitTracker);
    let dict = arena.create_dictionary().unwrap();
    for (key, n) in [("b", 1), ("a", 2), ("c", 3)] {
        let value = arena.create_integer(n).unwrap();
        arena.dict_insert(&dict, key, value).unwrap();
    }
    let keys: Vec<&str> = arena.cast::<Dictionary>(&dict).unwrap().keys().collect();
    assert_eq!(keys, vec!["b", "a", "c"]);

    let old = arena.dict_get(&dict, "a").unwrap().unwrap();
    let replacement = arena.create_integer(20).unwrap();
    arena.dict_insert(&dict, "a", replacement).unwrap();

    // only our probe handle is left on the replaced value
    assert_eq!(arena.refcount(&old).unwrap(), 1);
    let current = arena.dict_get(&dict, "a").unwrap().unwrap();
    assert_eq!(*arena.cast::<IntVal>(&current).unwrap().get(), 20);
    assert!(arena.dict_get(&dict, "missing").unwrap().is_none());
    assert_eq!(arena.cast::<Dictionary>(&dict).unwrap().len(), 3);
}

#[test]
fn dict_items_view_follows_the_dictionary() {
    let mut arena = Arena::new(NoLimitTracker);
    let dict = arena.create_dictionary().unwrap();
    let items = arena.create_dict_items(&dict).unwrap();

    let one = arena.create_integer(1).unwrap();
    arena.dict_insert(&dict, "one", one).unwrap();

    let pairs = arena.items_of(&items).unwrap();
    assert_eq!(pairs.len(), 1);
    assert_eq!(pairs[0].0, "one");
    assert_eq!(*arena.cast::<IntVal>(&pairs[0].1).unwrap().get(), 1);
}

#[test]
fn dict_items_requires_a_dictionary() {
    let mut arena = Arena::new(NoLimitTracker);
    let list = arena.create_list(vec![]).unwrap();
    assert_eq!(
        arena.create_dict_items(&list).unwrap_err(),
        ValueError::InvalidCast {
            expected: Type::Dictionary,
            found: Type::List
        }
    );
}

#[test]
fn module_members() {
    let mut arena = Arena::new(NoLimitTracker);
    let module = arena.create_module("config").unwrap();
    let debug = arena.create_boolean(true).unwrap();
    arena.module_set(&module, "DEBUG", debug).unwrap();

    let payload: &Module = arena.cast(&module).unwrap();
    assert_eq!(payload.name(), "config");
    assert!(payload.has_member("DEBUG"));

    let found = arena.module_get(&module, "DEBUG").unwrap().unwrap();
    assert!(arena.bool_test(&found));
    assert!(arena.module_get(&module, "VERBOSE").unwrap().is_none());
}

#[test]
fn attribute_is_bound_to_its_owner() {
    let mut arena = Arena::new(NoLimitTracker);
    let module = arena.create_module("math").unwrap();
    let attribute = arena.create_attribute(&module, "pi").unwrap();
    let owner = arena.attribute_owner(&attribute).unwrap();
    assert_eq!(owner, module);
    assert_eq!(arena.refcount(&module).unwrap(), 3, "module handle, attribute, returned owner");
}

// =============================================================================
// 6. Range Iterators
// =============================================================================

#[test]
fn range_yields_integers_until_end() {
    let mut arena = Arena::new(NoLimitTracker);
    let range = arena.create_range(1, 8, 3).unwrap();
    let mut seen = Vec::new();
    while let Some(value) = arena.iter_next(&range).unwrap() {
        seen.push(*arena.cast::<IntVal>(&value).unwrap().get());
    }
    assert_eq!(seen, vec![1, 4, 7]);
    assert!(arena.iter_next(&range).unwrap().is_none(), "exhausted stays exhausted");

    let payload: &RangeIter = arena.cast(&range).unwrap();
    assert_eq!((payload.start(), payload.end(), payload.step()), (1, 8, 3));
}

#[test]
fn range_rejects_non_positive_step() {
    let mut arena = Arena::new(NoLimitTracker);
    assert_eq!(arena.create_range(0, 5, 0).unwrap_err(), ValueError::InvalidRange { step: 0 });
    assert_eq!(arena.create_range(5, 0, -1).unwrap_err(), ValueError::InvalidRange { step: -1 });
    assert!(arena.is_empty(), "nothing is allocated for a rejected range");
}
