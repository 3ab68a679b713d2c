#![forbid(unsafe_code)]

//! Change notifier for one path segment on one source object.
//!
//! A [`ChangeNotifier`] couples `(source, segment)` with a `changed` signal.
//! The value is read on demand through the source's property protocol, never
//! cached. The signal fires when the source reports the segment's property
//! (or, for indexer segments, [`INDEXER_PROPERTY`]) as modified, and on every
//! wildcard report, since those cannot be disambiguated.
//!
//! # Invariants
//!
//! 1. The notifier holds the source weakly; it never keeps it alive.
//! 2. At most one subscription to the source exists, taken at construction.
//! 3. `dispose()` drops that subscription; it is idempotent and runs on drop.
//!
//! # Failure Modes
//!
//! | Failure | Behavior |
//! |---------|----------|
//! | Source object dropped | `value()` yields `Unset`, type is `Unknown` |
//! | Segment applied to a plain value | `NotAnObject` error |
//! | Source has no change protocol | Reads work, `changed` never fires |

use std::cell::RefCell;
use std::rc::Rc;

use pathbind_core::object::list_index;
use pathbind_core::{
    INDEXER_PROPERTY, PropertyAccessError, PropertyToken, Subscription, Value, ValueType,
};

use crate::binding::{ChangedSignal, SourceHandle};

/// Watches `segment` on `source` and reports changes.
#[derive(Debug)]
pub struct ChangeNotifier {
    source: SourceHandle,
    segment: PropertyToken,
    changed: Rc<ChangedSignal>,
    subscription: RefCell<Option<Subscription>>,
}

impl ChangeNotifier {
    /// Start watching `segment` on `source`.
    ///
    /// Sources without a change-notification protocol (and plain values)
    /// yield a notifier that never fires.
    #[must_use]
    pub fn new(source: &Value, segment: PropertyToken) -> Self {
        let handle = SourceHandle::new(source);
        let changed = Rc::new(ChangedSignal::new());

        let subscription = handle.object().and_then(|object| {
            let event = object.property_changed()?;
            let watched = match &segment {
                PropertyToken::Name(name) => name.clone(),
                PropertyToken::Indexer(_) => INDEXER_PROPERTY.to_owned(),
            };
            let signal = Rc::downgrade(&changed);
            Some(event.subscribe(move |change| {
                if !change.affects(&watched) {
                    return;
                }
                if let Some(signal) = signal.upgrade() {
                    tracing::trace!(property = %watched, "source segment changed");
                    signal.emit(&());
                }
            }))
        });

        Self {
            source: handle,
            segment,
            changed,
            subscription: RefCell::new(subscription),
        }
    }

    #[must_use]
    pub fn segment(&self) -> &PropertyToken {
        &self.segment
    }

    /// Current value of the segment on the source.
    pub fn value(&self) -> Result<Value, PropertyAccessError> {
        match &self.source {
            SourceHandle::Object { .. } => {
                let Some(object) = self.source.object() else {
                    tracing::debug!(segment = %self.segment, "source object dropped, segment unresolvable");
                    return Ok(Value::Unset);
                };
                match &self.segment {
                    PropertyToken::Name(name) => object.get_property(name),
                    PropertyToken::Indexer(args) => object.get_index(args),
                }
            }
            SourceHandle::Detached(value) => match (value, &self.segment) {
                (Value::List(items), PropertyToken::Indexer(args)) => {
                    let index = list_index("list", args, items.len())?;
                    Ok(items[index].clone())
                }
                _ => Err(self.not_an_object(value)),
            },
        }
    }

    /// Write the segment on the source.
    pub fn set_value(&self, value: Value) -> Result<(), PropertyAccessError> {
        match &self.source {
            SourceHandle::Object { .. } => {
                let Some(object) = self.source.object() else {
                    tracing::debug!(segment = %self.segment, "source object dropped, write ignored");
                    return Ok(());
                };
                match &self.segment {
                    PropertyToken::Name(name) => object.set_property(name, value),
                    PropertyToken::Indexer(args) => object.set_index(args, value),
                }
            }
            SourceHandle::Detached(Value::List(_)) if self.segment.is_indexer() => {
                Err(PropertyAccessError::ReadOnly {
                    type_name: "list",
                    property: self.segment.to_string(),
                })
            }
            SourceHandle::Detached(detached) => Err(self.not_an_object(detached)),
        }
    }

    /// Declared type of the segment, or [`ValueType::Unknown`].
    #[must_use]
    pub fn value_type(&self) -> ValueType {
        match &self.source {
            SourceHandle::Object { .. } => self
                .source
                .object()
                .and_then(|object| match &self.segment {
                    PropertyToken::Name(name) => object.property_type(name),
                    PropertyToken::Indexer(_) => object.index_type(),
                })
                .unwrap_or(ValueType::Unknown),
            SourceHandle::Detached(_) => self
                .value()
                .map_or(ValueType::Unknown, |value| value.value_type()),
        }
    }

    #[must_use]
    pub fn changed(&self) -> &ChangedSignal {
        &self.changed
    }

    /// Whether the notifier still listens to its source.
    #[must_use]
    pub fn is_observing(&self) -> bool {
        self.subscription.borrow().is_some()
    }

    /// Stop listening to the source. Idempotent.
    pub fn dispose(&self) {
        self.subscription.borrow_mut().take();
    }

    fn not_an_object(&self, value: &Value) -> PropertyAccessError {
        PropertyAccessError::NotAnObject {
            value_type: value.value_type(),
            segment: self.segment.to_string(),
        }
    }
}

impl Drop for ChangeNotifier {
    fn drop(&mut self) {
        self.dispose();
    }
}
