#![forbid(unsafe_code)]

//! Source-binding engine for property paths.
//!
//! Given a root object and a token sequence such as `A.B[2].C`, this crate
//! builds a live [`SourceBinding`] to the terminal value. The binding reads
//! and writes the value, reports its current type, and fires `changed`
//! whenever any object along the path reports a relevant change. When an
//! intermediate object is replaced, the part of the chain below it is torn
//! down and rebuilt against the new object.
//!
//! # Architecture
//!
//! - [`ChangeNotifier`]: watches one segment on one source object.
//! - [`SourceBinding`]: the shared capability interface, implemented by
//!   [`DirectBinding`], [`PropertyBinding`], [`IndexerBinding`],
//!   [`ChainedBinding`] and [`CombinedBinding`].
//! - [`SourceBindingFactory`]: picks the variant for a token sequence.
//!   [`PathSourceBindingFactory`] is the default implementation;
//!   [`locator`] holds the per-thread shared instance.
//! - [`combiner`]: named value combiners for multi-source bindings.
//! - [`diagnostics`]: the construction-time misuse warning.
//!
//! # Invariants
//!
//! 1. A chained binding owns at most one child binding and holds exactly one
//!    subscription to it while it exists.
//! 2. Rewiring unsubscribes from the old child before disposing it, and
//!    completes before the chained binding fires `changed`.
//! 3. A null intermediate never raises an error: reads yield
//!    [`Value::Unset`](pathbind_core::Value::Unset), writes are dropped with
//!    a warning.
//! 4. Bindings never keep their source objects alive.
//! 5. `dispose()` is idempotent everywhere and also runs on drop.
//!
//! # Threading
//!
//! Everything here is single-threaded (`Rc`, `RefCell`). Change
//! notifications for one object graph must be delivered on one thread.

pub mod binding;
pub mod chained;
pub mod combined;
pub mod combiner;
pub mod diagnostics;
pub mod factory;
pub mod leaf;
pub mod locator;
pub mod notifier;

pub use binding::{BindingKind, ChangedSignal, DirectBinding, SourceBinding};
pub use chained::{ChainState, ChainedBinding};
pub use combined::CombinedBinding;
pub use combiner::{BuiltinCombiners, ValueCombiner, ValueCombinerRegistry, ValueCombinerRegistryFiller};
pub use factory::{PathSourceBindingFactory, SourceBindingFactory, create_combined_binding};
pub use leaf::{IndexerBinding, PropertyBinding};
pub use notifier::ChangeNotifier;
