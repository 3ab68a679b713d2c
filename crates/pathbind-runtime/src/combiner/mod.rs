#![forbid(unsafe_code)]

//! Value combiners: named transforms over several resolved values.
//!
//! A [`CombinedBinding`](crate::CombinedBinding) resolves one child binding
//! per input path and hands their current values to a [`ValueCombiner`].
//! Combiners are looked up by name in a [`ValueCombinerRegistry`], which is
//! populated by [`ValueCombinerRegistryFiller`]s such as
//! [`BuiltinCombiners`].
//!
//! Combined bindings short-circuit on [`Value::Unset`] before the combiner
//! runs, so `combine` only ever sees resolved inputs.

mod builtin;
mod registry;

use std::rc::Rc;

use pathbind_core::{BindingError, Value, ValueType};

use crate::binding::SourceBinding;

pub use builtin::BuiltinCombiners;
pub use registry::{ValueCombinerRegistry, ValueCombinerRegistryFiller};

/// A named many-to-one value transform.
pub trait ValueCombiner {
    /// Registry name, also used in error reports.
    fn name(&self) -> &'static str;

    /// Merge the current child values.
    fn combine(&self, values: &[Value]) -> Result<Value, BindingError>;

    /// Push `value` back into the children. One-way combiners reject.
    fn combine_back(&self, value: Value, sources: &[Rc<dyn SourceBinding>]) -> Result<(), BindingError> {
        let _ = (value, sources);
        Err(BindingError::CombinerRejected {
            combiner: self.name(),
            reason: "combiner is one-way".into(),
        })
    }

    /// Result type given the children's current types.
    fn source_type(&self, source_types: &[ValueType]) -> ValueType {
        let _ = source_types;
        ValueType::Unknown
    }
}

impl std::fmt::Debug for dyn ValueCombiner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("ValueCombiner").field(&self.name()).finish()
    }
}
