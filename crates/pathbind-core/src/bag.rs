#![forbid(unsafe_code)]

//! A dynamic named-property object.
//!
//! [`PropertyBag`] stands in for a view model: a fixed set of declared
//! properties, optionally typed or read-only, with an optional
//! property-changed event.
//!
//! # Invariants
//!
//! 1. Only declared properties can be read or written.
//! 2. Writing a value equal to the current one is a no-op (no event).
//! 3. Events are raised after the value is stored and the internal borrow
//!    is released, so handlers may read the bag.
//! 4. A bag built with [`PropertyBag::plain`] never raises events.

use std::cell::RefCell;
use std::collections::BTreeMap;

use crate::error::PropertyAccessError;
use crate::object::{BindableObject, PropertyChange, PropertyChangedEvent};
use crate::value::{Value, ValueType};

#[derive(Debug)]
struct Slot {
    value: Value,
    declared: Option<ValueType>,
    read_only: bool,
}

/// A named-property object with optional change notification.
pub struct PropertyBag {
    type_name: &'static str,
    slots: RefCell<BTreeMap<String, Slot>>,
    changed: Option<PropertyChangedEvent>,
}

impl std::fmt::Debug for PropertyBag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PropertyBag")
            .field("type_name", &self.type_name)
            .field("slots", &self.slots.borrow())
            .field("notifies", &self.changed.is_some())
            .finish()
    }
}

impl PropertyBag {
    /// An empty bag that raises property-changed events.
    #[must_use]
    pub fn new(type_name: &'static str) -> Self {
        Self {
            type_name,
            slots: RefCell::new(BTreeMap::new()),
            changed: Some(PropertyChangedEvent::new()),
        }
    }

    /// An empty bag without a change-notification protocol.
    #[must_use]
    pub fn plain(type_name: &'static str) -> Self {
        Self {
            changed: None,
            ..Self::new(type_name)
        }
    }

    /// Declare an untyped property with an initial value.
    #[must_use]
    pub fn with(self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.declare(name.into(), value.into(), None, false)
    }

    /// Declare a typed property. Writes of another type are rejected and
    /// [`BindableObject::property_type`] reports `ty`.
    #[must_use]
    pub fn with_typed(self, name: impl Into<String>, ty: ValueType, value: impl Into<Value>) -> Self {
        self.declare(name.into(), value.into(), Some(ty), false)
    }

    /// Declare a read-only property.
    #[must_use]
    pub fn with_read_only(self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.declare(name.into(), value.into(), None, true)
    }

    fn declare(self, name: String, value: Value, declared: Option<ValueType>, read_only: bool) -> Self {
        self.slots.borrow_mut().insert(
            name,
            Slot {
                value,
                declared,
                read_only,
            },
        );
        self
    }

    /// Current value of a declared property.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Value> {
        self.slots.borrow().get(name).map(|slot| slot.value.clone())
    }

    /// Store `value` and raise a change for `name` if it differs.
    ///
    /// Read-only properties can be changed through this method; the
    /// restriction only applies to bindings writing through
    /// [`BindableObject::set_property`].
    pub fn set(&self, name: &str, value: impl Into<Value>) -> Result<(), PropertyAccessError> {
        self.store(name, value.into(), false)
    }

    /// Raise the wildcard "all properties changed" event.
    pub fn notify_all(&self) {
        if let Some(changed) = &self.changed {
            changed.emit(&PropertyChange::All);
        }
    }

    /// Declared property names, in sorted order.
    #[must_use]
    pub fn property_names(&self) -> Vec<String> {
        self.slots.borrow().keys().cloned().collect()
    }

    fn store(&self, name: &str, value: Value, enforce_read_only: bool) -> Result<(), PropertyAccessError> {
        {
            let mut slots = self.slots.borrow_mut();
            let slot = slots
                .get_mut(name)
                .ok_or_else(|| PropertyAccessError::MissingProperty {
                    type_name: self.type_name,
                    property: name.to_owned(),
                })?;
            if enforce_read_only && slot.read_only {
                return Err(PropertyAccessError::ReadOnly {
                    type_name: self.type_name,
                    property: name.to_owned(),
                });
            }
            if let Some(declared) = slot.declared {
                if !declared.accepts(value.value_type()) {
                    return Err(PropertyAccessError::TypeMismatch {
                        type_name: self.type_name,
                        property: name.to_owned(),
                        expected: declared,
                        actual: value.value_type(),
                    });
                }
            }
            if slot.value == value {
                return Ok(());
            }
            slot.value = value;
        }

        #[cfg(feature = "tracing")]
        tracing::trace!(type_name = self.type_name, property = name, "property changed");

        if let Some(changed) = &self.changed {
            changed.emit(&PropertyChange::named(name));
        }
        Ok(())
    }
}

impl BindableObject for PropertyBag {
    fn type_name(&self) -> &'static str {
        self.type_name
    }

    fn get_property(&self, name: &str) -> Result<Value, PropertyAccessError> {
        self.get(name)
            .ok_or_else(|| PropertyAccessError::MissingProperty {
                type_name: self.type_name,
                property: name.to_owned(),
            })
    }

    fn set_property(&self, name: &str, value: Value) -> Result<(), PropertyAccessError> {
        self.store(name, value, true)
    }

    fn property_type(&self, name: &str) -> Option<ValueType> {
        let slots = self.slots.borrow();
        let slot = slots.get(name)?;
        Some(slot.declared.unwrap_or_else(|| slot.value.value_type()))
    }

    fn property_changed(&self) -> Option<&PropertyChangedEvent> {
        self.changed.as_ref()
    }
}
