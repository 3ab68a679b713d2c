#![forbid(unsafe_code)]

//! Binding factory: picks the binding variant for a token sequence.
//!
//! | Tokens | Result |
//! |--------|--------|
//! | none | [`DirectBinding`] |
//! | one name | [`PropertyBinding`] |
//! | one indexer | [`IndexerBinding`] |
//! | two or more | [`ChainedBinding`] over the head, tail resolved by this factory |
//!
//! Chained bindings recurse through the factory that built them, so every
//! level of a path is produced by the same policy.

use std::rc::{Rc, Weak};

use pathbind_core::{BindingConfig, BindingError, PropertyToken, Value, display_path};

use crate::binding::{DirectBinding, SourceBinding};
use crate::chained::ChainedBinding;
use crate::combined::CombinedBinding;
use crate::combiner::ValueCombinerRegistry;
use crate::leaf::{IndexerBinding, PropertyBinding};
use crate::notifier::ChangeNotifier;

/// Creates source bindings for `(source, tokens)` pairs.
pub trait SourceBindingFactory {
    /// Build the binding for `tokens` resolved against `source`.
    fn create_binding(&self, source: &Value, tokens: &[PropertyToken]) -> Box<dyn SourceBinding>;
}

/// Default factory for dotted/indexed property paths.
#[derive(Debug)]
pub struct PathSourceBindingFactory {
    config: BindingConfig,
    this: Weak<Self>,
}

impl PathSourceBindingFactory {
    #[must_use]
    pub fn new(config: BindingConfig) -> Rc<Self> {
        Rc::new_cyclic(|this| Self {
            config,
            this: this.clone(),
        })
    }

    /// Factory using [`BindingConfig::process_default`].
    #[must_use]
    pub fn with_defaults() -> Rc<Self> {
        Self::new(BindingConfig::process_default())
    }

    #[must_use]
    pub fn config(&self) -> BindingConfig {
        self.config
    }

    /// Handle passed down to chained bindings for their tails.
    fn shared(&self) -> Rc<dyn SourceBindingFactory> {
        match self.this.upgrade() {
            Some(this) => this as Rc<dyn SourceBindingFactory>,
            None => Self::new(self.config),
        }
    }
}

impl SourceBindingFactory for PathSourceBindingFactory {
    fn create_binding(&self, source: &Value, tokens: &[PropertyToken]) -> Box<dyn SourceBinding> {
        tracing::trace!(path = %display_path(tokens), "creating source binding");
        match tokens {
            [] => Box::new(DirectBinding::new(source)),
            [PropertyToken::Name(name)] => Box::new(PropertyBinding::new(source, name.clone())),
            [PropertyToken::Indexer(args)] => Box::new(IndexerBinding::new(source, args.clone())),
            [head, tail @ ..] => {
                let notifier = ChangeNotifier::new(source, head.clone());
                Box::new(ChainedBinding::new(notifier, tail, self.shared(), &self.config))
            }
        }
    }
}

/// Build a [`CombinedBinding`] that merges one binding per path through the
/// combiner registered as `combiner`.
pub fn create_combined_binding(
    factory: &dyn SourceBindingFactory,
    registry: &ValueCombinerRegistry,
    combiner: &str,
    source: &Value,
    paths: &[Vec<PropertyToken>],
) -> Result<CombinedBinding, BindingError> {
    let combiner = registry.resolve(combiner)?;
    let children = paths
        .iter()
        .map(|path| -> Rc<dyn SourceBinding> { Rc::from(factory.create_binding(source, path)) })
        .collect();
    Ok(CombinedBinding::new(combiner, children))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binding::BindingKind;
    use pathbind_core::PropertyBag;

    fn root() -> (Rc<PropertyBag>, Value) {
        let inner = Rc::new(PropertyBag::new("Inner").with("C", 3));
        let root = Rc::new(PropertyBag::new("Root").with("B", inner).with("N", 1));
        let value = Value::from(Rc::clone(&root));
        (root, value)
    }

    #[test]
    fn dispatch_by_token_shape() {
        let factory = PathSourceBindingFactory::new(BindingConfig::new());
        let (_root, source) = root();

        let cases = [
            (vec![], BindingKind::Direct),
            (vec![PropertyToken::name("N")], BindingKind::Property),
            (vec![PropertyToken::index(0)], BindingKind::Indexer),
            (
                vec![PropertyToken::name("B"), PropertyToken::name("C")],
                BindingKind::Chained,
            ),
        ];
        for (tokens, kind) in cases {
            let binding = factory.create_binding(&source, &tokens);
            assert_eq!(binding.kind(), kind, "{}", display_path(&tokens));
        }
    }

    #[test]
    fn chained_reads_through() {
        let factory = PathSourceBindingFactory::new(BindingConfig::new());
        let (_root, source) = root();
        let binding = factory.create_binding(
            &source,
            &[PropertyToken::name("B"), PropertyToken::name("C")],
        );
        assert_eq!(binding.get_value(), Ok(Value::Int(3)));
    }

    #[test]
    fn shared_handle_is_self() {
        let factory = PathSourceBindingFactory::new(BindingConfig::new());
        let shared = factory.shared();
        assert!(std::ptr::addr_eq(Rc::as_ptr(&shared), Rc::as_ptr(&factory)));
    }

    #[test]
    fn combined_requires_registered_combiner() {
        let factory = PathSourceBindingFactory::new(BindingConfig::new());
        let registry = ValueCombinerRegistry::new();
        let (_root, source) = root();
        let result = create_combined_binding(
            factory.as_ref(),
            &registry,
            "Nope",
            &source,
            &[vec![PropertyToken::name("N")]],
        );
        assert!(matches!(result, Err(BindingError::CombinerNotFound(name)) if name == "Nope"));
    }
}
