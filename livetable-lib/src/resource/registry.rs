//! Registry resolving resource kinds to their accessor and renderer.

use std::sync::Arc;

use dashmap::DashMap;

use super::Accessor;
use super::Renderer;
use super::ResourceKind;
use crate::error::Error;

/// The accessor/renderer pair serving one resource kind.
#[derive(Clone)]
pub struct ResourceMeta {
    /// Fetches objects from the store.
    pub accessor: Arc<dyn Accessor>,
    /// Converts objects into rows.
    pub renderer: Arc<dyn Renderer>,
}

impl ResourceMeta {
    /// Creates a new accessor/renderer pair.
    pub fn new(accessor: impl Accessor + 'static, renderer: impl Renderer + 'static) -> Self {
        Self {
            accessor: Arc::new(accessor),
            renderer: Arc::new(renderer),
        }
    }
}

impl std::fmt::Debug for ResourceMeta {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceMeta").finish_non_exhaustive()
    }
}

/// Maps resource kinds to the collaborators that serve them.
///
/// Cheap to clone; clones share the same entries, so a registry can be built
/// once and handed to every table model.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    metas: Arc<DashMap<ResourceKind, ResourceMeta>>,
}

impl Registry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the collaborators for a resource kind, replacing any previous
    /// entry.
    pub fn register(&self, kind: ResourceKind, meta: ResourceMeta) {
        self.metas.insert(kind, meta);
    }

    /// Resolves the collaborators for a resource kind.
    pub fn lookup(&self, kind: &ResourceKind) -> Result<ResourceMeta, Error> {
        self.metas
            .get(kind)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| Error::configuration(format!("no accessor registered for {kind}")))
    }

    /// Returns `true` if the kind has registered collaborators.
    pub fn contains(&self, kind: &ResourceKind) -> bool {
        self.metas.contains_key(kind)
    }

    /// Returns the number of registered kinds.
    pub fn len(&self) -> usize {
        self.metas.len()
    }

    /// Returns `true` if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.metas.is_empty()
    }
}
