#![forbid(unsafe_code)]

//! Notify-change wrappers.
//!
//! These objects wrap a value (or a collection of values) and raise
//! property-changed events when it changes, so they can sit anywhere in a
//! bound path:
//!
//! - [`NotifyChange`]: a scalar wrapper exposing one `Value` property.
//! - [`NotifyChangeList`]: an integer-indexed list.
//! - [`NotifyChangeMap`]: a dictionary keyed by string, integer or bool.
//!
//! # Binding into collections
//!
//! Binding `Items.Value[0]` where `Items` is a [`NotifyChange`] holding a
//! list reads the element once, but element writes inside the list are
//! invisible: the scalar wrapper only reports replacement of the whole
//! value. Wrap the collection in a [`NotifyChangeList`] or
//! [`NotifyChangeMap`] and bind `Items[0]` instead. The binding engine logs
//! a warning when it sees the `Value[..]` shape.

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;

use crate::error::PropertyAccessError;
use crate::object::{
    BindableObject, COUNT_PROPERTY, INDEXER_PROPERTY, PropertyChange, PropertyChangedEvent,
    list_index,
};
use crate::value::{Value, ValueType};

/// The single property exposed by [`NotifyChange`].
pub const VALUE_PROPERTY: &str = "Value";

// ---------------------------------------------------------------------------
// NotifyChange: scalar wrapper
// ---------------------------------------------------------------------------

/// A version-tracked scalar with change notification.
///
/// # Invariants
///
/// 1. `version` increments by exactly 1 on each value-changing `set`.
/// 2. `set(v)` where `v == current` is a no-op.
/// 3. Every change raises `Named("Value")`.
pub struct NotifyChange {
    value: RefCell<Value>,
    declared: Option<ValueType>,
    version: Cell<u64>,
    changed: PropertyChangedEvent,
}

impl std::fmt::Debug for NotifyChange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotifyChange")
            .field("value", &self.value.borrow())
            .field("version", &self.version.get())
            .field("subscriber_count", &self.changed.subscriber_count())
            .finish()
    }
}

impl NotifyChange {
    #[must_use]
    pub fn new(value: impl Into<Value>) -> Self {
        Self {
            value: RefCell::new(value.into()),
            declared: None,
            version: Cell::new(0),
            changed: PropertyChangedEvent::new(),
        }
    }

    /// A wrapper whose `Value` property has a declared type.
    #[must_use]
    pub fn typed(ty: ValueType, value: impl Into<Value>) -> Self {
        Self {
            declared: Some(ty),
            ..Self::new(value)
        }
    }

    #[must_use]
    pub fn get(&self) -> Value {
        self.value.borrow().clone()
    }

    /// Replace the value, notifying if it changed.
    pub fn set(&self, value: impl Into<Value>) {
        let value = value.into();
        {
            let mut current = self.value.borrow_mut();
            if *current == value {
                return;
            }
            *current = value;
        }
        self.version.set(self.version.get() + 1);

        #[cfg(feature = "tracing")]
        tracing::trace!(version = self.version.get(), "notify-change value replaced");

        self.changed.emit(&PropertyChange::named(VALUE_PROPERTY));
    }

    #[must_use]
    pub fn version(&self) -> u64 {
        self.version.get()
    }
}

impl BindableObject for NotifyChange {
    fn type_name(&self) -> &'static str {
        "NotifyChange"
    }

    fn get_property(&self, name: &str) -> Result<Value, PropertyAccessError> {
        if name == VALUE_PROPERTY {
            Ok(self.get())
        } else {
            Err(PropertyAccessError::MissingProperty {
                type_name: self.type_name(),
                property: name.to_owned(),
            })
        }
    }

    fn set_property(&self, name: &str, value: Value) -> Result<(), PropertyAccessError> {
        if name != VALUE_PROPERTY {
            return Err(PropertyAccessError::MissingProperty {
                type_name: self.type_name(),
                property: name.to_owned(),
            });
        }
        if let Some(declared) = self.declared {
            if !declared.accepts(value.value_type()) {
                return Err(PropertyAccessError::TypeMismatch {
                    type_name: self.type_name(),
                    property: name.to_owned(),
                    expected: declared,
                    actual: value.value_type(),
                });
            }
        }
        self.set(value);
        Ok(())
    }

    fn property_type(&self, name: &str) -> Option<ValueType> {
        (name == VALUE_PROPERTY).then(|| self.declared.unwrap_or_else(|| self.value.borrow().value_type()))
    }

    fn property_changed(&self) -> Option<&PropertyChangedEvent> {
        Some(&self.changed)
    }
}

// ---------------------------------------------------------------------------
// NotifyChangeList: integer-indexed collection
// ---------------------------------------------------------------------------

/// A list that reports element and structural changes.
///
/// Element replacement raises `Item[]`; insertions and removals raise
/// `Count` followed by `Item[]`.
pub struct NotifyChangeList {
    items: RefCell<Vec<Value>>,
    changed: PropertyChangedEvent,
}

impl std::fmt::Debug for NotifyChangeList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotifyChangeList")
            .field("items", &self.items.borrow())
            .finish()
    }
}

impl Default for NotifyChangeList {
    fn default() -> Self {
        Self::new()
    }
}

impl NotifyChangeList {
    #[must_use]
    pub fn new() -> Self {
        Self::from_values(Vec::new())
    }

    #[must_use]
    pub fn from_values(items: Vec<Value>) -> Self {
        Self {
            items: RefCell::new(items),
            changed: PropertyChangedEvent::new(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.borrow().is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<Value> {
        self.items.borrow().get(index).cloned()
    }

    pub fn push(&self, value: impl Into<Value>) {
        self.items.borrow_mut().push(value.into());
        self.structure_changed();
    }

    /// Insert at `index`, shifting later elements. Out-of-range inserts
    /// append.
    pub fn insert(&self, index: usize, value: impl Into<Value>) {
        {
            let mut items = self.items.borrow_mut();
            let index = index.min(items.len());
            items.insert(index, value.into());
        }
        self.structure_changed();
    }

    pub fn remove(&self, index: usize) -> Option<Value> {
        let removed = {
            let mut items = self.items.borrow_mut();
            (index < items.len()).then(|| items.remove(index))
        };
        if removed.is_some() {
            self.structure_changed();
        }
        removed
    }

    pub fn clear(&self) {
        let had_items = {
            let mut items = self.items.borrow_mut();
            let had = !items.is_empty();
            items.clear();
            had
        };
        if had_items {
            self.structure_changed();
        }
    }

    /// Replace the element at `index`.
    pub fn set(&self, index: usize, value: impl Into<Value>) -> Result<(), PropertyAccessError> {
        let value = value.into();
        {
            let mut items = self.items.borrow_mut();
            let len = items.len();
            let slot = items
                .get_mut(index)
                .ok_or(PropertyAccessError::IndexOutOfRange {
                    type_name: "NotifyChangeList",
                    index: i64::try_from(index).unwrap_or(i64::MAX),
                    len,
                })?;
            if *slot == value {
                return Ok(());
            }
            *slot = value;
        }
        self.changed.emit(&PropertyChange::named(INDEXER_PROPERTY));
        Ok(())
    }

    /// Snapshot of the current elements.
    #[must_use]
    pub fn to_vec(&self) -> Vec<Value> {
        self.items.borrow().clone()
    }

    fn structure_changed(&self) {
        self.changed.emit(&PropertyChange::named(COUNT_PROPERTY));
        self.changed.emit(&PropertyChange::named(INDEXER_PROPERTY));
    }
}

impl BindableObject for NotifyChangeList {
    fn type_name(&self) -> &'static str {
        "NotifyChangeList"
    }

    fn get_property(&self, name: &str) -> Result<Value, PropertyAccessError> {
        if name == COUNT_PROPERTY {
            Ok(Value::Int(i64::try_from(self.len()).unwrap_or(i64::MAX)))
        } else {
            Err(PropertyAccessError::MissingProperty {
                type_name: self.type_name(),
                property: name.to_owned(),
            })
        }
    }

    fn property_type(&self, name: &str) -> Option<ValueType> {
        (name == COUNT_PROPERTY).then_some(ValueType::Int)
    }

    fn get_index(&self, args: &[Value]) -> Result<Value, PropertyAccessError> {
        let items = self.items.borrow();
        let index = list_index(self.type_name(), args, items.len())?;
        Ok(items[index].clone())
    }

    fn set_index(&self, args: &[Value], value: Value) -> Result<(), PropertyAccessError> {
        let index = list_index(self.type_name(), args, self.len())?;
        self.set(index, value)
    }

    fn property_changed(&self) -> Option<&PropertyChangedEvent> {
        Some(&self.changed)
    }
}

// ---------------------------------------------------------------------------
// NotifyChangeMap: keyed collection
// ---------------------------------------------------------------------------

/// Dictionary key accepted by [`NotifyChangeMap`].
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MapKey {
    Bool(bool),
    Int(i64),
    Str(String),
}

impl MapKey {
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Bool(b) => Some(Self::Bool(*b)),
            Value::Int(i) => Some(Self::Int(*i)),
            Value::Str(s) => Some(Self::Str(s.clone())),
            _ => None,
        }
    }

    fn from_args(args: &[Value]) -> Result<Self, PropertyAccessError> {
        match args {
            [single] => Self::from_value(single),
            _ => None,
        }
        .ok_or_else(|| PropertyAccessError::InvalidIndex {
            type_name: "NotifyChangeMap",
            arguments: format!("{args:?}"),
        })
    }
}

impl std::fmt::Display for MapKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Str(s) => write!(f, "{s:?}"),
        }
    }
}

impl From<&str> for MapKey {
    fn from(v: &str) -> Self {
        Self::Str(v.to_owned())
    }
}

impl From<String> for MapKey {
    fn from(v: String) -> Self {
        Self::Str(v)
    }
}

impl From<i64> for MapKey {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<i32> for MapKey {
    fn from(v: i32) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<bool> for MapKey {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

/// A dictionary that reports entry changes.
///
/// Writing an existing key raises `Item[]`; adding or removing a key raises
/// `Count` followed by `Item[]`. Reading a missing key through the indexer
/// is a [`PropertyAccessError::KeyNotFound`].
pub struct NotifyChangeMap {
    entries: RefCell<BTreeMap<MapKey, Value>>,
    changed: PropertyChangedEvent,
}

impl std::fmt::Debug for NotifyChangeMap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotifyChangeMap")
            .field("entries", &self.entries.borrow())
            .finish()
    }
}

impl Default for NotifyChangeMap {
    fn default() -> Self {
        Self::new()
    }
}

impl NotifyChangeMap {
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: RefCell::new(BTreeMap::new()),
            changed: PropertyChangedEvent::new(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    #[must_use]
    pub fn get(&self, key: impl Into<MapKey>) -> Option<Value> {
        self.entries.borrow().get(&key.into()).cloned()
    }

    /// Insert or replace an entry.
    pub fn insert(&self, key: impl Into<MapKey>, value: impl Into<Value>) {
        self.store(key.into(), value.into());
    }

    pub fn remove(&self, key: impl Into<MapKey>) -> Option<Value> {
        let removed = self.entries.borrow_mut().remove(&key.into());
        if removed.is_some() {
            self.changed.emit(&PropertyChange::named(COUNT_PROPERTY));
            self.changed.emit(&PropertyChange::named(INDEXER_PROPERTY));
        }
        removed
    }

    fn store(&self, key: MapKey, value: Value) {
        let added = {
            let mut entries = self.entries.borrow_mut();
            match entries.get_mut(&key) {
                Some(existing) if *existing == value => return,
                Some(existing) => {
                    *existing = value;
                    false
                }
                None => {
                    entries.insert(key, value);
                    true
                }
            }
        };
        if added {
            self.changed.emit(&PropertyChange::named(COUNT_PROPERTY));
        }
        self.changed.emit(&PropertyChange::named(INDEXER_PROPERTY));
    }
}

impl BindableObject for NotifyChangeMap {
    fn type_name(&self) -> &'static str {
        "NotifyChangeMap"
    }

    fn get_property(&self, name: &str) -> Result<Value, PropertyAccessError> {
        if name == COUNT_PROPERTY {
            Ok(Value::Int(i64::try_from(self.len()).unwrap_or(i64::MAX)))
        } else {
            Err(PropertyAccessError::MissingProperty {
                type_name: self.type_name(),
                property: name.to_owned(),
            })
        }
    }

    fn property_type(&self, name: &str) -> Option<ValueType> {
        (name == COUNT_PROPERTY).then_some(ValueType::Int)
    }

    fn get_index(&self, args: &[Value]) -> Result<Value, PropertyAccessError> {
        let key = MapKey::from_args(args)?;
        self.entries
            .borrow()
            .get(&key)
            .cloned()
            .ok_or_else(|| PropertyAccessError::KeyNotFound {
                type_name: self.type_name(),
                key: key.to_string(),
            })
    }

    fn set_index(&self, args: &[Value], value: Value) -> Result<(), PropertyAccessError> {
        let key = MapKey::from_args(args)?;
        self.store(key, value);
        Ok(())
    }

    fn property_changed(&self) -> Option<&PropertyChangedEvent> {
        Some(&self.changed)
    }
}
