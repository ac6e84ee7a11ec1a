//! Namespace scope helpers.

/// Namespace value meaning "no specific namespace", i.e. all of them.
pub const BLANK_NAMESPACE: &str = "";

/// Namespace value a user picks to see all namespaces.
pub const NAMESPACE_ALL: &str = "all";

/// Namespace value used by cluster-scoped resources.
pub const CLUSTER_SCOPE: &str = "-";

/// Returns `true` if `ns` is the all-namespaces sentinel.
pub fn is_all_namespace(ns: &str) -> bool {
    ns == NAMESPACE_ALL
}

/// Returns `true` if `ns` denotes a cluster-scoped resource.
pub fn is_cluster_scoped(ns: &str) -> bool {
    ns == CLUSTER_SCOPE
}

/// Returns `true` if `ns` spans the whole cluster.
pub fn is_cluster_wide(ns: &str) -> bool {
    ns == BLANK_NAMESPACE || is_all_namespace(ns) || is_cluster_scoped(ns)
}

/// Normalizes the all-namespaces sentinel to the blank namespace accessors
/// expect.
pub fn cleanse_namespace(ns: &str) -> &str {
    if is_all_namespace(ns) {
        BLANK_NAMESPACE
    } else {
        ns
    }
}
