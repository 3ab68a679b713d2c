#![forbid(unsafe_code)]

//! Error taxonomy for property access and bindings.
//!
//! # Failure Modes
//!
//! | Failure | Cause | Behavior |
//! |---------|-------|----------|
//! | Bad property name | Leaf or head names a property the object lacks | `MissingProperty`, surfaced to the caller |
//! | Write to read-only | Object rejects the setter | `ReadOnly`, surfaced |
//! | Null intermediate | Head resolves to null | Not an error: unset sentinel / dropped write |
//! | Unknown combiner | Name not registered | `CombinerNotFound` |
//! | Double dispose | Lifecycle misuse | Not an error: no-op |

use crate::value::ValueType;

/// A resolved, non-null source rejected a property or indexer access.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyAccessError {
    /// The object has no property with this name.
    MissingProperty {
        type_name: &'static str,
        property: String,
    },
    /// The property exists but cannot be written.
    ReadOnly {
        type_name: &'static str,
        property: String,
    },
    /// The object has no indexer.
    NotIndexable { type_name: &'static str },
    /// Integer index outside `0..len`.
    IndexOutOfRange {
        type_name: &'static str,
        index: i64,
        len: usize,
    },
    /// Indexer arguments of the wrong number or kind.
    InvalidIndex {
        type_name: &'static str,
        arguments: String,
    },
    /// Dictionary lookup for a key that is not present.
    KeyNotFound {
        type_name: &'static str,
        key: String,
    },
    /// The written value does not fit the declared property type.
    TypeMismatch {
        type_name: &'static str,
        property: String,
        expected: ValueType,
        actual: ValueType,
    },
    /// A path segment was applied to a plain value instead of an object.
    NotAnObject {
        value_type: ValueType,
        segment: String,
    },
}

impl std::fmt::Display for PropertyAccessError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingProperty {
                type_name,
                property,
            } => write!(f, "property '{property}' not found on {type_name}"),
            Self::ReadOnly {
                type_name,
                property,
            } => write!(f, "property '{property}' on {type_name} is read-only"),
            Self::NotIndexable { type_name } => write!(f, "{type_name} has no indexer"),
            Self::IndexOutOfRange {
                type_name,
                index,
                len,
            } => write!(f, "index {index} out of range for {type_name} of length {len}"),
            Self::InvalidIndex {
                type_name,
                arguments,
            } => write!(f, "invalid indexer arguments {arguments} for {type_name}"),
            Self::KeyNotFound { type_name, key } => {
                write!(f, "key {key} not found in {type_name}")
            }
            Self::TypeMismatch {
                type_name,
                property,
                expected,
                actual,
            } => write!(
                f,
                "cannot store {actual} in '{property}' on {type_name} (declared {expected})"
            ),
            Self::NotAnObject {
                value_type,
                segment,
            } => write!(f, "cannot resolve '{segment}' on a {value_type} value"),
        }
    }
}

impl std::error::Error for PropertyAccessError {}

/// Errors surfaced by source bindings.
#[derive(Debug, Clone, PartialEq)]
pub enum BindingError {
    /// Leaf access failed. Propagated unchanged through every chain level.
    PropertyAccess(PropertyAccessError),
    /// No combiner registered under this name.
    CombinerNotFound(String),
    /// A combiner refused its inputs or a write-back.
    CombinerRejected {
        combiner: &'static str,
        reason: String,
    },
}

impl std::fmt::Display for BindingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PropertyAccess(err) => write!(f, "property access failed: {err}"),
            Self::CombinerNotFound(name) => write!(f, "value combiner '{name}' not registered"),
            Self::CombinerRejected { combiner, reason } => {
                write!(f, "value combiner '{combiner}' rejected: {reason}")
            }
        }
    }
}

impl std::error::Error for BindingError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::PropertyAccess(err) => Some(err),
            _ => None,
        }
    }
}

impl From<PropertyAccessError> for BindingError {
    fn from(err: PropertyAccessError) -> Self {
        Self::PropertyAccess(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn display_messages() {
        let err = PropertyAccessError::MissingProperty {
            type_name: "Person",
            property: "Nmae".into(),
        };
        assert_eq!(err.to_string(), "property 'Nmae' not found on Person");

        let err = PropertyAccessError::TypeMismatch {
            type_name: "Person",
            property: "Age".into(),
            expected: ValueType::Int,
            actual: ValueType::Str,
        };
        assert_eq!(
            err.to_string(),
            "cannot store string in 'Age' on Person (declared int)"
        );
    }

    #[test]
    fn binding_error_wraps_access_error() {
        let inner = PropertyAccessError::NotIndexable { type_name: "Bag" };
        let err = BindingError::from(inner.clone());
        assert_eq!(err, BindingError::PropertyAccess(inner));
        assert!(err.source().is_some());
        assert!(err.to_string().contains("Bag has no indexer"));
    }

    #[test]
    fn combiner_errors_have_no_source() {
        let err = BindingError::CombinerNotFound("Nope".into());
        assert!(err.source().is_none());
        assert_eq!(err.to_string(), "value combiner 'Nope' not registered");
    }
}
