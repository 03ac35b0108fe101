use crate::error::Result;
use docdex_index::IndexNode;
use std::path::Path;

/// Serializes an index compactly and writes it atomically (tmp file plus
/// rename). Returns the serialized byte length, which is what the config
/// store records as `docIndexSize`.
pub fn write_index(path: &Path, index: &IndexNode) -> Result<u64> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let bytes = serde_json::to_vec(index)?;
    let len = bytes.len() as u64;
    let tmp = path.with_extension("json.tmp");
    std::fs::write(&tmp, bytes)?;
    std::fs::rename(&tmp, path)?;
    Ok(len)
}

/// Reads a persisted index, treating a missing or corrupt file as empty.
/// Consumers must always get some index back, even on a cold start.
pub fn read_index_safely(path: &Path) -> IndexNode {
    match std::fs::read(path) {
        Ok(bytes) => serde_json::from_slice(&bytes).unwrap_or_else(|err| {
            log::warn!("corrupt index at {}: {err}", path.display());
            IndexNode::new()
        }),
        Err(_) => IndexNode::new(),
    }
}
