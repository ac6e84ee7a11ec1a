//! Resource kind identifiers.

use std::fmt;
use std::sync::Arc;

/// Identifies a category of monitored resource, e.g. `apps/v1/deployments`.
///
/// The identifier is opaque to the engine and only used as a lookup key, but
/// it follows the `group/version/resource` convention so callers can pick it
/// apart. Cloning is cheap.
///
/// # Example
///
/// ```
/// use livetable_lib::resource::ResourceKind;
///
/// let gvr = ResourceKind::new("apps/v1/deployments");
/// assert_eq!(gvr.group(), "apps");
/// assert_eq!(gvr.version(), "v1");
/// assert_eq!(gvr.resource(), "deployments");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResourceKind(Arc<str>);

impl ResourceKind {
    /// Creates a resource kind from its path form.
    pub fn new(path: impl AsRef<str>) -> Self {
        Self(Arc::from(path.as_ref().trim_matches('/')))
    }

    /// Returns the full identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the API group, empty for the core group.
    pub fn group(&self) -> &str {
        let parts: Vec<&str> = self.0.split('/').collect();
        match parts.len() {
            3 => parts[0],
            _ => "",
        }
    }

    /// Returns the API version, empty when the identifier carries none.
    pub fn version(&self) -> &str {
        let parts: Vec<&str> = self.0.split('/').collect();
        match parts.len() {
            3 => parts[1],
            2 => parts[0],
            _ => "",
        }
    }

    /// Returns the resource name.
    pub fn resource(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or_default()
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ResourceKind {
    fn from(path: &str) -> Self {
        Self::new(path)
    }
}
