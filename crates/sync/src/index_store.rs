use docdex_index::{merge, IndexNode};
use std::sync::RwLock;

#[derive(Debug, Default)]
struct IndexCache {
    remote: Option<IndexNode>,
    local: Option<IndexNode>,
    merged: Option<IndexNode>,
}

/// Owns the cached remote, local and merged indexes.
///
/// Readers always observe a fully merged snapshot: writers stage the
/// remote/local halves and publish the recomputed merge inside a single
/// lock acquisition, so a rebuild in progress never leaks a half-built
/// index to a concurrent `index()` call.
#[derive(Debug, Default)]
pub struct IndexStore {
    cache: RwLock<IndexCache>,
}

impl IndexStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stages the given halves (a `None` keeps the previous value) and
    /// atomically publishes the recomputed merged index, returning it.
    pub fn publish(&self, remote: Option<IndexNode>, local: Option<IndexNode>) -> IndexNode {
        let mut cache = self
            .cache
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        if let Some(remote) = remote {
            cache.remote = Some(remote);
        }
        if let Some(local) = local {
            cache.local = Some(local);
        }
        let empty = IndexNode::new();
        let merged = merge(
            cache.remote.as_ref().unwrap_or(&empty),
            cache.local.as_ref().unwrap_or(&empty),
        );
        cache.merged = Some(merged.clone());
        merged
    }

    /// The last published merged index, if any cycle has completed.
    #[must_use]
    pub fn merged(&self) -> Option<IndexNode> {
        self.cache
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .merged
            .clone()
    }
}
