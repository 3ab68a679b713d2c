#![forbid(unsafe_code)]

//! Reactive property-path bindings.
//!
//! Bind to `A.B[2].C` on a root object and get a live two-way binding to the
//! terminal value. When `A.B` is replaced at runtime, the part of the path
//! below it is rebuilt against the new object and the binding reports a
//! change.
//!
//! ```
//! use std::rc::Rc;
//! use pathbind::prelude::*;
//!
//! let inner = Rc::new(PropertyBag::new("Inner").with("C", 1));
//! let root = Rc::new(PropertyBag::new("Root").with("B", inner));
//!
//! let factory = PathSourceBindingFactory::new(BindingConfig::new());
//! let binding = factory.create_binding(
//!     &Value::from(Rc::clone(&root)),
//!     &[PropertyToken::name("B"), PropertyToken::name("C")],
//! );
//! assert_eq!(binding.get_value(), Ok(Value::Int(1)));
//!
//! root.set("B", Rc::new(PropertyBag::new("Inner").with("C", 2))).unwrap();
//! assert_eq!(binding.get_value(), Ok(Value::Int(2)));
//!
//! root.set("B", Value::Null).unwrap();
//! assert_eq!(binding.get_value(), Ok(Value::Unset));
//! ```
//!
//! The data model lives in [`model`], the binding engine in [`runtime`].

pub use pathbind_core as model;
pub use pathbind_runtime as runtime;

pub use pathbind_core::{
    BindableObject, BindingConfig, BindingError, MapKey, NotifyChange, NotifyChangeList,
    NotifyChangeMap, ObjectRef, PropertyAccessError, PropertyBag, PropertyChange, PropertyToken,
    Signal, Subscription, Value, ValueType,
};
pub use pathbind_runtime::{
    BindingKind, BuiltinCombiners, ChainState, ChainedBinding, ChangeNotifier, CombinedBinding,
    DirectBinding, IndexerBinding, PathSourceBindingFactory, PropertyBinding, SourceBinding,
    SourceBindingFactory, ValueCombiner, ValueCombinerRegistry, ValueCombinerRegistryFiller,
    create_combined_binding, locator,
};

pub mod prelude {
    pub use pathbind_core::{
        BindableObject, BindingConfig, BindingError, NotifyChange, NotifyChangeList,
        NotifyChangeMap, PropertyBag, PropertyToken, Value, ValueType,
    };
    pub use pathbind_runtime::{
        PathSourceBindingFactory, SourceBinding, SourceBindingFactory, ValueCombinerRegistry,
    };
}
