//! Combined bindings over chained paths, and the per-thread factory locator.

use std::cell::Cell;
use std::rc::Rc;

use pathbind_core::{BindingError, PropertyBag, PropertyToken, Value, ValueType};
use pathbind_harness::SpyFactory;
use pathbind_harness::fixtures::{inner, names, path_factory, root_with_inner};
use pathbind_runtime::{
    BindingKind, SourceBinding, ValueCombinerRegistry, create_combined_binding, locator,
};

fn person() -> Rc<PropertyBag> {
    let address = Rc::new(PropertyBag::new("Address").with("City", "Oslo"));
    Rc::new(
        PropertyBag::new("Person")
            .with("First", "Ada")
            .with("Age", 36)
            .with("Active", true)
            .with("Address", address),
    )
}

#[test]
fn concatenation_over_chained_paths_follows_intermediate_swaps() {
    let person = person();
    let registry = ValueCombinerRegistry::with_builtins();
    let strings = Rc::new(PropertyBag::new("Strings").with("From", " from "));
    let root = Rc::new(
        PropertyBag::new("Root")
            .with("Person", Rc::clone(&person))
            .with("Strings", strings),
    );

    let binding = create_combined_binding(
        path_factory().as_ref(),
        &registry,
        "Add",
        &Value::from(Rc::clone(&root)),
        &[
            names(&["Person", "First"]),
            names(&["Strings", "From"]),
            names(&["Person", "Address", "City"]),
        ],
    )
    .unwrap();
    let fired = Rc::new(Cell::new(0));
    let f = Rc::clone(&fired);
    let _sub = binding.changed().subscribe(move |_| f.set(f.get() + 1));

    assert_eq!(binding.kind(), BindingKind::Combined);
    assert_eq!(binding.get_value(), Ok(Value::from("Ada from Oslo")));
    assert_eq!(binding.source_value_type(), ValueType::Str);

    person
        .set("Address", Rc::new(PropertyBag::new("Address").with("City", "Bergen")))
        .unwrap();
    assert_eq!(fired.get(), 1);
    assert_eq!(binding.get_value(), Ok(Value::from("Ada from Bergen")));

    person.set("Address", Value::Null).unwrap();
    assert_eq!(binding.get_value(), Ok(Value::Unset));
}

#[test]
fn two_way_combiner_writes_through_chain() {
    let (root, b) = root_with_inner(false);
    let registry = ValueCombinerRegistry::with_builtins();
    let binding = create_combined_binding(
        path_factory().as_ref(),
        &registry,
        "Not",
        &Value::from(Rc::clone(&root)),
        &[names(&["B", "C"])],
    )
    .unwrap();

    assert_eq!(binding.get_value(), Ok(Value::Bool(true)));
    binding.set_value(Value::Bool(true)).unwrap();
    assert_eq!(b.get("C"), Some(Value::Bool(false)));
    binding.set_value(Value::Bool(false)).unwrap();
    assert_eq!(b.get("C"), Some(Value::Bool(true)));
    assert_eq!(binding.get_value(), Ok(Value::Bool(false)));
}

#[test]
fn arithmetic_and_conditional_combiners() {
    let person = person();
    let registry = ValueCombinerRegistry::with_builtins();
    let source = Value::from(Rc::clone(&person));
    let factory = path_factory();

    let age_plus_person = create_combined_binding(
        factory.as_ref(),
        &registry,
        "Add",
        &source,
        &[names(&["Age"]), vec![]],
    )
    .unwrap();
    assert!(matches!(
        age_plus_person.get_value(),
        Err(BindingError::CombinerRejected { combiner: "Add", .. })
    ));

    let label = create_combined_binding(
        factory.as_ref(),
        &registry,
        "If",
        &source,
        &[names(&["Active"]), names(&["First"]), names(&["Age"])],
    )
    .unwrap();
    assert_eq!(label.get_value(), Ok(Value::from("Ada")));
    person.set("Active", false).unwrap();
    assert_eq!(label.get_value(), Ok(Value::Int(36)));
    assert_eq!(
        label.set_value(Value::from("x")),
        Err(BindingError::CombinerRejected {
            combiner: "If",
            reason: "combiner is one-way".into(),
        })
    );
}

#[test]
fn unknown_combiner_is_reported() {
    let registry = ValueCombinerRegistry::new();
    let result = create_combined_binding(
        path_factory().as_ref(),
        &registry,
        "Missing",
        &Value::Null,
        &[],
    );
    assert_eq!(
        result.err(),
        Some(BindingError::CombinerNotFound("Missing".into()))
    );
}

#[test]
fn dropping_combined_binding_disposes_children() {
    let (root, b) = root_with_inner(2);
    let spy = SpyFactory::new(path_factory());
    let registry = ValueCombinerRegistry::with_builtins();
    let binding = create_combined_binding(
        spy.as_ref(),
        &registry,
        "Multiply",
        &Value::from(Rc::clone(&root)),
        &[names(&["B", "C"]), names(&["B", "C"])],
    )
    .unwrap();
    assert_eq!(binding.get_value(), Ok(Value::Int(4)));

    drop(binding);
    let created = spy.created();
    assert_eq!(created.len(), 2);
    assert!(created.iter().all(|p| p.dispose_calls() == 1 && p.is_dropped()));
    b.set("C", 3).unwrap();
}

// ---------------------------------------------------------------------------
// Locator
// ---------------------------------------------------------------------------

#[test]
fn locator_defaults_to_path_factory() {
    locator::reset();
    let (root, _) = root_with_inner(7);
    let binding = locator::create_binding(&Value::from(Rc::clone(&root)), &names(&["B", "C"]));
    assert_eq!(binding.kind(), BindingKind::Chained);
    assert_eq!(binding.get_value(), Ok(Value::Int(7)));
    locator::reset();
}

#[test]
fn scoped_factory_sees_every_binding() {
    locator::reset();
    let spy = SpyFactory::new(path_factory());
    let (root, _) = root_with_inner(1);

    let binding = locator::with_factory(spy.clone(), || {
        locator::create_binding(
            &Value::from(Rc::clone(&root)),
            &[PropertyToken::name("B"), PropertyToken::name("C")],
        )
    });
    assert_eq!(spy.created_count(), 1);
    assert_eq!(spy.created()[0].path(), "B.C");
    assert!(!locator::is_installed());

    root.set("B", inner(2)).unwrap();
    assert_eq!(binding.get_value(), Ok(Value::Int(2)));
}
