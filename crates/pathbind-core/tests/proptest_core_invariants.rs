//! Property-based invariant tests for the core data model.
//!
//! **Signal:**
//! 1. An emission reaches exactly the subscriptions still held, in
//!    registration order.
//! 2. Dead entries never count as live.
//!
//! **Indexing:**
//! 3. `list_index` accepts exactly `0..len` and reports the bad index.
//!
//! **Types:**
//! 4. `Unknown` accepts everything, `Null` fits everywhere, acceptance is
//!    reflexive.
//!
//! **Source objects:**
//! 5. `NotifyChangeList` raises exactly one `Item[]` per effective element
//!    write and tracks `Count`.

use std::cell::RefCell;
use std::rc::Rc;

use pathbind_core::object::list_index;
use pathbind_core::{
    BindableObject, COUNT_PROPERTY, INDEXER_PROPERTY, NotifyChangeList, PropertyAccessError,
    PropertyChange, PropertyToken, Signal, Value, ValueType, display_path,
};
use proptest::prelude::*;

// ── Strategies ────────────────────────────────────────────────────────────

fn value_type_strategy() -> impl Strategy<Value = ValueType> {
    prop_oneof![
        Just(ValueType::Unknown),
        Just(ValueType::Null),
        Just(ValueType::Bool),
        Just(ValueType::Int),
        Just(ValueType::Float),
        Just(ValueType::Str),
        Just(ValueType::List),
        Just(ValueType::Object("Person")),
        Just(ValueType::Object("Address")),
    ]
}

fn name_strategy() -> impl Strategy<Value = String> {
    "[A-Z][a-z]{0,5}"
}

// ── Signal ────────────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn emit_reaches_exactly_held_subscriptions(keep in proptest::collection::vec(any::<bool>(), 0..16)) {
        let signal: Signal<u32> = Signal::new();
        let seen = Rc::new(RefCell::new(Vec::new()));

        let mut held = Vec::new();
        for (i, keep_it) in keep.iter().enumerate() {
            let log = Rc::clone(&seen);
            let sub = signal.subscribe(move |_| log.borrow_mut().push(i));
            if *keep_it {
                held.push(sub);
            }
        }

        signal.emit(&0);
        let expected: Vec<usize> = keep
            .iter()
            .enumerate()
            .filter_map(|(i, k)| k.then_some(i))
            .collect();
        prop_assert_eq!(&*seen.borrow(), &expected);
        prop_assert_eq!(signal.live_subscriber_count(), held.len());
        prop_assert_eq!(signal.subscriber_count(), held.len(), "emit prunes dead entries");
    }
}

// ── Indexing ──────────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn list_index_accepts_exactly_in_range(index in -5i64..40, len in 0usize..32) {
        let result = list_index("list", &[Value::Int(index)], len);
        let in_range = usize::try_from(index).is_ok_and(|i| i < len);
        if in_range {
            prop_assert_eq!(result, Ok(usize::try_from(index).unwrap_or_default()));
        } else {
            prop_assert_eq!(
                result,
                Err(PropertyAccessError::IndexOutOfRange { type_name: "list", index, len })
            );
        }
    }

    #[test]
    fn list_index_rejects_non_integer_arguments(key in "[a-z]{1,4}", len in 0usize..8) {
        let result = list_index("list", &[Value::from(key.as_str())], len);
        let is_invalid = matches!(result, Err(PropertyAccessError::InvalidIndex { .. }));
        prop_assert!(is_invalid);
    }
}

// ── Types ─────────────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn acceptance_rules(declared in value_type_strategy(), actual in value_type_strategy()) {
        prop_assert!(ValueType::Unknown.accepts(actual));
        prop_assert!(declared.accepts(ValueType::Null));
        prop_assert!(declared.accepts(declared));
        if declared != ValueType::Unknown && actual != ValueType::Null && declared != actual {
            let widening = declared == ValueType::Float && actual == ValueType::Int;
            prop_assert_eq!(declared.accepts(actual), widening);
        }
    }
}

// ── Paths ─────────────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn display_path_joins_names_with_dots(names in proptest::collection::vec(name_strategy(), 1..6)) {
        let tokens: Vec<PropertyToken> = names.iter().map(PropertyToken::name).collect();
        prop_assert_eq!(display_path(&tokens), names.join("."));
    }
}

// ── Source objects ────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn list_writes_raise_one_indexer_change(
        initial in proptest::collection::vec(0i64..5, 1..8),
        writes in proptest::collection::vec((0usize..8, 0i64..5), 0..16),
    ) {
        let list = NotifyChangeList::from_values(initial.iter().copied().map(Value::Int).collect());
        let log = Rc::new(RefCell::new(Vec::new()));
        let l = Rc::clone(&log);
        let _sub = list
            .property_changed()
            .map(|event| event.subscribe(move |change: &PropertyChange| l.borrow_mut().push(change.clone())));

        let mut model = initial.clone();
        let mut expected = 0usize;
        for (index, value) in writes {
            let result = list.set(index, value);
            if index < model.len() {
                prop_assert!(result.is_ok());
                if model[index] != value {
                    expected += 1;
                }
                model[index] = value;
            } else {
                prop_assert!(result.is_err());
            }
        }

        let item_changes = log
            .borrow()
            .iter()
            .filter(|c| **c == PropertyChange::named(INDEXER_PROPERTY))
            .count();
        prop_assert_eq!(item_changes, expected);
        prop_assert_eq!(list.to_vec(), model.iter().copied().map(Value::Int).collect::<Vec<_>>());
        prop_assert_eq!(
            list.get_property(COUNT_PROPERTY),
            Ok(Value::Int(i64::try_from(model.len()).unwrap_or(i64::MAX)))
        );
    }
}
