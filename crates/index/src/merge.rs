use crate::node::{IndexNode, NodeClass};

/// Reconciles two indexes under the official-wins policy.
///
/// Every top-level entry of `official` lands in the result. An entry from
/// `local` is taken only where the key is absent, or where the official
/// side knows the library as nothing more than an `unbuilt-lib`
/// placeholder, in which case in-progress local content supersedes it.
/// Inputs are never mutated.
#[must_use]
pub fn merge(official: &IndexNode, local: &IndexNode) -> IndexNode {
    let mut result = official.clone();
    for (key, node) in &local.children {
        let replaceable = match result.children.get(key) {
            None => true,
            Some(existing) => existing.class == Some(NodeClass::UnbuiltLib),
        };
        if replaceable {
            result.children.insert(key.clone(), node.clone());
        }
    }
    result
}
