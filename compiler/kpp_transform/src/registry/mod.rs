//! Transform trait and registry.
//!
//! The registry is an explicit value built at startup: each transform
//! module contributes a `register` function, and [`TransformRegistry::with_builtin`]
//! calls them in a fixed order. The processor instantiates transforms from
//! it the first time it applies them, so adding a rewrite never touches the
//! processor.

use rustc_hash::FxHashMap;

use crate::{Processor, ProcessorConfig, TransformError};

/// One rewrite pass over a loaded file.
pub trait Transform {
    /// Stable name, used in logs and diagnostics.
    fn name(&self) -> &'static str;

    /// Rewrite the processor's token list in place.
    ///
    /// An error aborts the pipeline. Splices made before the error are kept.
    fn apply(&mut self, processor: &mut Processor) -> Result<(), TransformError>;
}

/// Builds a transform for one file.
pub type TransformFactory = fn(&ProcessorConfig) -> Box<dyn Transform>;

#[derive(Clone, Copy)]
struct Entry {
    name: &'static str,
    factory: TransformFactory,
}

/// Ordered set of transform factories.
///
/// Transforms run in registration order. A transform must not rely on
/// running before or after one registered by another module.
pub struct TransformRegistry {
    entries: Vec<Entry>,
    /// Name -> index into `entries`.
    by_name: FxHashMap<&'static str, usize>,
}

impl Default for TransformRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl TransformRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        TransformRegistry {
            entries: Vec::new(),
            by_name: FxHashMap::default(),
        }
    }

    /// The prologue and texture transforms.
    pub fn with_builtin() -> Self {
        let mut registry = TransformRegistry::new();
        crate::prologue::register(&mut registry);
        crate::texture::register(&mut registry);
        registry
    }

    /// Add a factory under `name`.
    ///
    /// Returns `false` and keeps the existing entry if `name` is taken.
    pub fn register(&mut self, name: &'static str, factory: TransformFactory) -> bool {
        if self.by_name.contains_key(name) {
            tracing::warn!(name, "transform registered twice; keeping the first");
            return false;
        }
        self.by_name.insert(name, self.entries.len());
        self.entries.push(Entry { name, factory });
        true
    }

    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// Registered names, in run order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|e| e.name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Build one instance of `name`.
    pub fn create(&self, name: &str, config: &ProcessorConfig) -> Option<Box<dyn Transform>> {
        let &index = self.by_name.get(name)?;
        self.entries.get(index).map(|e| (e.factory)(config))
    }

    /// Build one instance of every registered transform, in run order.
    pub fn instantiate(&self, config: &ProcessorConfig) -> Vec<Box<dyn Transform>> {
        self.entries.iter().map(|e| (e.factory)(config)).collect()
    }
}

impl std::fmt::Debug for TransformRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransformRegistry")
            .field("names", &self.names().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}
