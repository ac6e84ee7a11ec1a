//! Explicit call context passed to every model and accessor call.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::labels::LabelSelector;
use crate::resource::Factory;

/// Carries cancellation and request-scoped values through a reconciliation.
///
/// Cloning is cheap; clones share the same cancellation token.
///
/// # Example
///
/// ```
/// use livetable_lib::Context;
///
/// let ctx = Context::new();
/// let child = ctx.child();
/// ctx.cancel();
/// assert!(child.is_cancelled());
/// ```
#[derive(Clone, Default)]
pub struct Context {
    cancel: CancellationToken,
    factory: Option<Arc<dyn Factory>>,
    labels: Option<LabelSelector>,
}

impl Context {
    /// Creates a context with a fresh cancellation token and no values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy carrying the given factory.
    pub fn with_factory(mut self, factory: Arc<dyn Factory>) -> Self {
        self.factory = Some(factory);
        self
    }

    /// Returns a copy carrying the given label selector.
    pub fn with_labels(mut self, labels: Option<LabelSelector>) -> Self {
        self.labels = labels;
        self
    }

    /// Returns a context whose token is cancelled with this one but can also be
    /// cancelled on its own.
    pub fn child(&self) -> Self {
        Self {
            cancel: self.cancel.child_token(),
            factory: self.factory.clone(),
            labels: self.labels.clone(),
        }
    }

    /// Returns the connection factory, if any.
    pub fn factory(&self) -> Option<&Arc<dyn Factory>> {
        self.factory.as_ref()
    }

    /// Returns the label selector, if any.
    pub fn labels(&self) -> Option<&LabelSelector> {
        self.labels.as_ref()
    }

    /// Cancels this context and all its children.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Returns `true` once the context is cancelled.
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Completes when the context is cancelled.
    pub async fn cancelled(&self) {
        self.cancel.cancelled().await
    }
}

impl std::fmt::Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("cancelled", &self.is_cancelled())
            .field("factory", &self.factory.as_ref().map(|f| f.context_name().to_string()))
            .field("labels", &self.labels)
            .finish()
    }
}
