//! Accessor traits for fetching resources from the live store.

use std::sync::Arc;

use async_trait::async_trait;

use super::ResourceKind;
use crate::context::Context;
use crate::error::Error;
use crate::error::FetchError;

/// A raw resource payload as returned by the store.
pub type Object = serde_json::Value;

/// Provides connections to the resource store.
///
/// Accessors receive the factory through [`Accessor::init`] before every list
/// so a context switch on the factory side is picked up on the next tick.
pub trait Factory: Send + Sync {
    /// Returns the name of the cluster context this factory talks to.
    fn context_name(&self) -> &str;
}

/// Fetches resources of a single kind from the live store.
///
/// Implementations must honor the context's cancellation token promptly
/// during in-flight calls; the table model has no per-call timeout.
#[async_trait]
pub trait Accessor: Send + Sync {
    /// Binds the accessor to a factory and resource kind.
    fn init(&self, factory: Arc<dyn Factory>, kind: &ResourceKind);

    /// Asks the accessor to keep full object payloads on listed items.
    ///
    /// Renderers need the payload to extract custom columns.
    fn set_include_object(&self, include: bool);

    /// Lists every resource in `ns`. A blank namespace means all namespaces.
    async fn list(&self, ctx: &Context, ns: &str) -> Result<Vec<Object>, FetchError>;

    /// Fetches a single resource by its fully qualified path.
    async fn get(&self, ctx: &Context, path: &str) -> Result<Object, FetchError>;

    /// Returns the destructive capability, if this accessor has one.
    fn nuker(&self) -> Option<&dyn Nuker> {
        None
    }

    /// Returns the describe capability, if this accessor has one.
    fn describer(&self) -> Option<&dyn Describer> {
        None
    }
}

/// How dependents of a deleted resource are handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Propagation {
    /// Dependents are left behind.
    Orphan,
    /// Dependents are deleted after the owner is gone.
    Background,
    /// The owner lingers until its dependents are deleted.
    Foreground,
}

/// Grace period applied to a delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Grace {
    /// Use the resource's own grace period.
    #[default]
    Default,
    /// Delete immediately without waiting.
    Force,
    /// Wait the given number of seconds.
    Seconds(u32),
}

/// Destructive capability of an accessor.
#[async_trait]
pub trait Nuker: Send + Sync {
    /// Deletes the resource at `path`.
    async fn delete(
        &self,
        ctx: &Context,
        path: &str,
        propagation: Option<Propagation>,
        grace: Grace,
    ) -> Result<(), Error>;
}

/// Describe capability of an accessor.
#[async_trait]
pub trait Describer: Send + Sync {
    /// Returns a human readable description of the resource at `path`.
    async fn describe(&self, ctx: &Context, path: &str) -> Result<String, Error>;

    /// Returns the YAML manifest of the resource at `path`.
    async fn to_yaml(&self, ctx: &Context, path: &str) -> Result<String, Error>;
}
