#![forbid(unsafe_code)]

//! The source-binding capability interface.
//!
//! Every binding variant exposes the same five operations: read, write,
//! current type, a `changed` signal, and disposal. Consumers treat a
//! `changed` emission as "re-read the value", not as proof that the value
//! differs from the last read.
//!
//! # Invariants
//!
//! 1. `dispose()` is idempotent and never fails.
//! 2. After `dispose()` the binding holds no subscriptions, so it never fires
//!    `changed` again.
//! 3. A binding never holds a strong reference to the source it was created
//!    for. Chained bindings do hold the head values their children resolve
//!    against.

use std::cell::Cell;
use std::rc::{Rc, Weak};

use pathbind_core::{
    BindableObject, BindingError, ObjectRef, PropertyAccessError, Signal, Value, ValueType,
};

/// Signal fired when a binding's value should be re-read.
pub type ChangedSignal = Signal<()>;

/// Which variant a [`SourceBinding`] is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BindingKind {
    /// The source itself (empty path).
    Direct,
    /// Terminal named property.
    Property,
    /// Terminal indexer.
    Indexer,
    /// Head segment plus a dynamically rewired child.
    Chained,
    /// Several bindings merged by a value combiner.
    Combined,
}

/// A live, two-way binding to one resolved value.
pub trait SourceBinding {
    fn kind(&self) -> BindingKind;

    /// Type currently yielded; [`ValueType::Unknown`] when the target is
    /// absent.
    fn source_value_type(&self) -> ValueType;

    /// Read the bound value. Yields [`Value::Unset`] when part of the path
    /// is currently missing.
    fn get_value(&self) -> Result<Value, BindingError>;

    /// Write the bound value.
    fn set_value(&self, value: Value) -> Result<(), BindingError>;

    /// Fired after anything along the path changed.
    fn changed(&self) -> &ChangedSignal;

    /// Release all subscriptions and owned children.
    fn dispose(&self);

    fn is_disposed(&self) -> bool;
}

impl std::fmt::Debug for dyn SourceBinding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SourceBinding")
            .field("kind", &self.kind())
            .field("source_value_type", &self.source_value_type())
            .field("disposed", &self.is_disposed())
            .finish()
    }
}

/// Non-owning handle to the object a binding resolves against.
///
/// Plain values (strings, lists, ...) cannot be observed and are not shared,
/// so they are kept by value.
#[derive(Clone)]
pub(crate) enum SourceHandle {
    Object {
        object: Weak<dyn BindableObject>,
        type_name: &'static str,
    },
    Detached(Value),
}

impl SourceHandle {
    pub(crate) fn new(source: &Value) -> Self {
        match source {
            Value::Object(object) => Self::Object {
                object: Rc::downgrade(object),
                type_name: object.type_name(),
            },
            other => Self::Detached(other.clone()),
        }
    }

    /// The live object, if this handle points at one that still exists.
    pub(crate) fn object(&self) -> Option<ObjectRef> {
        match self {
            Self::Object { object, .. } => object.upgrade(),
            Self::Detached(_) => None,
        }
    }

    pub(crate) fn type_name(&self) -> &'static str {
        match self {
            Self::Object { type_name, .. } => type_name,
            Self::Detached(_) => "value",
        }
    }

    /// The source as a value. A dropped object resolves to `Unset`.
    pub(crate) fn resolve(&self) -> Value {
        match self {
            Self::Object { object, .. } => object.upgrade().map_or(Value::Unset, Value::Object),
            Self::Detached(value) => value.clone(),
        }
    }
}

impl std::fmt::Debug for SourceHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Object { object, type_name } => f
                .debug_struct("Object")
                .field("type_name", type_name)
                .field("alive", &(object.strong_count() > 0))
                .finish(),
            Self::Detached(value) => f.debug_tuple("Detached").field(value).finish(),
        }
    }
}

// ---------------------------------------------------------------------------
// DirectBinding: empty path
// ---------------------------------------------------------------------------

/// Binding to the source itself, built for an empty token sequence.
///
/// Read-only; never fires `changed`.
#[derive(Debug)]
pub struct DirectBinding {
    source: SourceHandle,
    changed: ChangedSignal,
    disposed: Cell<bool>,
}

impl DirectBinding {
    #[must_use]
    pub fn new(source: &Value) -> Self {
        Self {
            source: SourceHandle::new(source),
            changed: ChangedSignal::new(),
            disposed: Cell::new(false),
        }
    }
}

impl SourceBinding for DirectBinding {
    fn kind(&self) -> BindingKind {
        BindingKind::Direct
    }

    fn source_value_type(&self) -> ValueType {
        self.source.resolve().value_type()
    }

    fn get_value(&self) -> Result<Value, BindingError> {
        Ok(self.source.resolve())
    }

    fn set_value(&self, _value: Value) -> Result<(), BindingError> {
        Err(PropertyAccessError::ReadOnly {
            type_name: self.source.type_name(),
            property: String::new(),
        }
        .into())
    }

    fn changed(&self) -> &ChangedSignal {
        &self.changed
    }

    fn dispose(&self) {
        self.disposed.set(true);
    }

    fn is_disposed(&self) -> bool {
        self.disposed.get()
    }
}
