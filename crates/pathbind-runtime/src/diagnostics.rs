#![forbid(unsafe_code)]

//! Construction-time misuse warning for `Value[..]` tails.
//!
//! When a chained binding's tail starts with `Value` followed by an indexer,
//! the caller almost always bound through a scalar [`NotifyChange`] holding
//! a collection, where a [`NotifyChangeList`] or [`NotifyChangeMap`] was
//! intended. The binding still works for reads, but element changes inside
//! the collection are never reported.
//!
//! The check looks at the first two tail tokens only. It is advisory: it
//! logs one warning and never alters the binding.
//!
//! [`NotifyChange`]: pathbind_core::NotifyChange
//! [`NotifyChangeList`]: pathbind_core::NotifyChangeList
//! [`NotifyChangeMap`]: pathbind_core::NotifyChangeMap

use pathbind_core::{BindingConfig, PropertyToken, VALUE_PROPERTY};

/// Warning text emitted for a suspicious tail.
pub const INDEXED_VALUE_WARNING: &str = "Suspicious indexed binding seen to Value[] within a notify-change binding - this may be OK, \
but is often the result of binding through NotifyChange holding a collection - consider using \
NotifyChangeList or NotifyChangeMap instead (see the pathbind_core::notify module docs). \
This message can be disabled with BindingConfig::disable_indexed_value_warning";

/// True when `tail` is `["Value", <indexer>, ...]`.
#[must_use]
pub fn is_suspicious_indexed_value_tail(tail: &[PropertyToken]) -> bool {
    matches!(
        tail,
        [PropertyToken::Name(first), PropertyToken::Indexer(_), ..] if first == VALUE_PROPERTY
    )
}

/// Log the warning if enabled and `tail` matches. Returns whether it fired.
pub fn warn_if_suspicious_indexed_value_tail(tail: &[PropertyToken], config: &BindingConfig) -> bool {
    if config.disable_indexed_value_warning || !is_suspicious_indexed_value_tail(tail) {
        return false;
    }
    tracing::warn!(
        path = %pathbind_core::display_path(tail),
        "{INDEXED_VALUE_WARNING}"
    );
    true
}
