#![forbid(unsafe_code)]

//! The source-object protocol.
//!
//! Any domain object that bindings should walk through implements
//! [`BindableObject`]. The protocol has three parts:
//!
//! - named-property read (required) and write (optional),
//! - indexer read and write (optional),
//! - a property-changed event (optional).
//!
//! Objects without a property-changed event still resolve; bindings over
//! them read once and never report a change.
//!
//! # Change reports
//!
//! A [`PropertyChange`] names one property or is the [`PropertyChange::All`]
//! wildcard. Indexer content changes are reported under [`INDEXER_PROPERTY`].
//! Methods take `&self`: implementors use interior mutability and live on a
//! single thread.

use crate::error::PropertyAccessError;
use crate::signal::Signal;
use crate::value::{Value, ValueType};

/// Reserved property name reported when indexer content changes.
pub const INDEXER_PROPERTY: &str = "Item[]";

/// Conventional read-only element-count property on collections.
pub const COUNT_PROPERTY: &str = "Count";

/// What an object reports as modified.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PropertyChange {
    /// A single named property changed.
    Named(String),
    /// Several or unknown properties changed.
    All,
}

impl PropertyChange {
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named(name.into())
    }

    /// Whether a watcher of `property` must treat this report as a change.
    #[must_use]
    pub fn affects(&self, property: &str) -> bool {
        match self {
            Self::Named(name) => name == property,
            Self::All => true,
        }
    }
}

/// Event raised by an object after one of its properties changed.
pub type PropertyChangedEvent = Signal<PropertyChange>;

/// Property and indexer access on a domain object.
pub trait BindableObject {
    /// Stable type name, used for diagnostics and [`ValueType::Object`].
    fn type_name(&self) -> &'static str;

    /// Read a named property.
    fn get_property(&self, name: &str) -> Result<Value, PropertyAccessError>;

    /// Write a named property. Read-only unless overridden.
    fn set_property(&self, name: &str, value: Value) -> Result<(), PropertyAccessError> {
        let _ = value;
        Err(PropertyAccessError::ReadOnly {
            type_name: self.type_name(),
            property: name.to_owned(),
        })
    }

    /// Declared type of a named property, if known.
    fn property_type(&self, name: &str) -> Option<ValueType> {
        let _ = name;
        None
    }

    /// Read through the indexer.
    fn get_index(&self, args: &[Value]) -> Result<Value, PropertyAccessError> {
        let _ = args;
        Err(PropertyAccessError::NotIndexable {
            type_name: self.type_name(),
        })
    }

    /// Write through the indexer.
    fn set_index(&self, args: &[Value], value: Value) -> Result<(), PropertyAccessError> {
        let _ = (args, value);
        Err(PropertyAccessError::NotIndexable {
            type_name: self.type_name(),
        })
    }

    /// Declared element type of the indexer, if known.
    fn index_type(&self) -> Option<ValueType> {
        None
    }

    /// The object's change-notification event, if it has one.
    fn property_changed(&self) -> Option<&PropertyChangedEvent> {
        None
    }
}

/// Validate a single integer indexer argument against a length.
pub fn list_index(
    type_name: &'static str,
    args: &[Value],
    len: usize,
) -> Result<usize, PropertyAccessError> {
    let [Value::Int(index)] = args else {
        return Err(PropertyAccessError::InvalidIndex {
            type_name,
            arguments: format!("{args:?}"),
        });
    };
    usize::try_from(*index)
        .ok()
        .filter(|i| *i < len)
        .ok_or(PropertyAccessError::IndexOutOfRange {
            type_name,
            index: *index,
            len,
        })
}
