#![forbid(unsafe_code)]

//! Terminal bindings: the last segment of a path.
//!
//! Both variants are thin layers over a [`ChangeNotifier`]: reads and writes
//! go straight to the source object and errors surface unchanged.

use std::cell::Cell;

use pathbind_core::{BindingError, PropertyToken, Value, ValueType};

use crate::binding::{BindingKind, ChangedSignal, SourceBinding};
use crate::notifier::ChangeNotifier;

/// Terminal named-property binding.
#[derive(Debug)]
pub struct PropertyBinding {
    notifier: ChangeNotifier,
    disposed: Cell<bool>,
}

impl PropertyBinding {
    #[must_use]
    pub fn new(source: &Value, property: impl Into<String>) -> Self {
        Self {
            notifier: ChangeNotifier::new(source, PropertyToken::Name(property.into())),
            disposed: Cell::new(false),
        }
    }

    #[must_use]
    pub fn property(&self) -> &str {
        self.notifier.segment().as_name().unwrap_or_default()
    }
}

impl SourceBinding for PropertyBinding {
    fn kind(&self) -> BindingKind {
        BindingKind::Property
    }

    fn source_value_type(&self) -> ValueType {
        self.notifier.value_type()
    }

    fn get_value(&self) -> Result<Value, BindingError> {
        Ok(self.notifier.value()?)
    }

    fn set_value(&self, value: Value) -> Result<(), BindingError> {
        Ok(self.notifier.set_value(value)?)
    }

    fn changed(&self) -> &ChangedSignal {
        self.notifier.changed()
    }

    fn dispose(&self) {
        self.disposed.set(true);
        self.notifier.dispose();
    }

    fn is_disposed(&self) -> bool {
        self.disposed.get()
    }
}

/// Terminal indexer binding, e.g. the `[2]` in `Items[2]`.
#[derive(Debug)]
pub struct IndexerBinding {
    notifier: ChangeNotifier,
    disposed: Cell<bool>,
}

impl IndexerBinding {
    #[must_use]
    pub fn new(source: &Value, arguments: Vec<Value>) -> Self {
        Self {
            notifier: ChangeNotifier::new(source, PropertyToken::Indexer(arguments)),
            disposed: Cell::new(false),
        }
    }

    #[must_use]
    pub fn arguments(&self) -> &[Value] {
        match self.notifier.segment() {
            PropertyToken::Indexer(args) => args,
            PropertyToken::Name(_) => &[],
        }
    }
}

impl SourceBinding for IndexerBinding {
    fn kind(&self) -> BindingKind {
        BindingKind::Indexer
    }

    fn source_value_type(&self) -> ValueType {
        self.notifier.value_type()
    }

    fn get_value(&self) -> Result<Value, BindingError> {
        Ok(self.notifier.value()?)
    }

    fn set_value(&self, value: Value) -> Result<(), BindingError> {
        Ok(self.notifier.set_value(value)?)
    }

    fn changed(&self) -> &ChangedSignal {
        self.notifier.changed()
    }

    fn dispose(&self) {
        self.disposed.set(true);
        self.notifier.dispose();
    }

    fn is_disposed(&self) -> bool {
        self.disposed.get()
    }
}
