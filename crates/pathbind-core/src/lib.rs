#![forbid(unsafe_code)]

//! Core: values, property tokens, and the source-object protocol.
//!
//! # Role in pathbind
//! `pathbind-core` is the data layer. It owns the dynamic [`Value`] model,
//! the [`PropertyToken`] path segments produced by a path parser, the
//! [`BindableObject`] protocol that domain objects implement, and the
//! [`Signal`]/[`Subscription`] observer primitive that carries change
//! notifications.
//!
//! # Primary responsibilities
//! - **Value**: dynamic values flowing through bindings, including the
//!   [`Value::Unset`] sentinel.
//! - **PropertyToken**: one named-property or indexer path segment.
//! - **BindableObject**: named-property and indexer access plus an optional
//!   property-changed event.
//! - **Source objects**: [`PropertyBag`], [`NotifyChange`],
//!   [`NotifyChangeList`], [`NotifyChangeMap`].
//! - **BindingConfig**: the configuration surface read by the engine.
//!
//! # How it fits in the system
//! The binding engine (`pathbind-runtime`) consumes tokens and objects from
//! this crate and builds live source bindings over them. Nothing here knows
//! about bindings; objects only report their own property changes.

pub mod bag;
pub mod config;
pub mod error;
pub mod notify;
pub mod object;
pub mod signal;
pub mod token;
pub mod value;

pub use bag::PropertyBag;
pub use config::BindingConfig;
pub use error::{BindingError, PropertyAccessError};
pub use notify::{MapKey, NotifyChange, NotifyChangeList, NotifyChangeMap, VALUE_PROPERTY};
pub use object::{
    BindableObject, COUNT_PROPERTY, INDEXER_PROPERTY, PropertyChange, PropertyChangedEvent,
};
pub use signal::{Signal, Subscription};
pub use token::{PropertyToken, display_path};
pub use value::{ObjectRef, Value, ValueType};
