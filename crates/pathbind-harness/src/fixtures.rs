#![forbid(unsafe_code)]

//! Small object graphs and token helpers shared by integration tests.

use std::rc::Rc;

use pathbind_core::{BindingConfig, PropertyBag, PropertyToken, Value};
use pathbind_runtime::{PathSourceBindingFactory, SourceBindingFactory};

/// Name tokens for each segment, e.g. `names(&["A", "B"])` for `A.B`.
#[must_use]
pub fn names(segments: &[&str]) -> Vec<PropertyToken> {
    segments.iter().map(|s| PropertyToken::name(*s)).collect()
}

/// Default path factory with the indexed-value warning enabled.
#[must_use]
pub fn path_factory() -> Rc<dyn SourceBindingFactory> {
    PathSourceBindingFactory::new(BindingConfig::new())
}

/// `Root { B: Inner { C: c } }`, returning `(root, inner)`.
#[must_use]
pub fn root_with_inner(c: impl Into<Value>) -> (Rc<PropertyBag>, Rc<PropertyBag>) {
    let inner = Rc::new(PropertyBag::new("Inner").with("C", c));
    let root = Rc::new(PropertyBag::new("Root").with("B", Rc::clone(&inner)));
    (root, inner)
}

/// `Root { B: null }`.
#[must_use]
pub fn root_with_null() -> Rc<PropertyBag> {
    Rc::new(PropertyBag::new("Root").with("B", Value::Null))
}

/// Fresh `Inner { C: c }` for swapping into a root.
#[must_use]
pub fn inner(c: impl Into<Value>) -> Rc<PropertyBag> {
    Rc::new(PropertyBag::new("Inner").with("C", c))
}
