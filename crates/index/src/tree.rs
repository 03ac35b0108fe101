use crate::error::{IndexError, Result};
use crate::node::{IndexNode, SourceType};
use std::path::Path;
use walkdir::WalkDir;

/// Builds an [`IndexNode`] tree from every regular file under `root`.
///
/// A missing root yields an empty tree, never an error. Files whose name
/// contains `.json` are skipped here; configuration files are picked up by
/// [`crate::read_configs`]. Walk failures below the root are the one fatal
/// class and propagate as [`IndexError::Walk`].
pub fn build_tree(root: &Path, source: SourceType) -> Result<IndexNode> {
    let mut index = IndexNode::new();
    if !root.exists() {
        log::debug!("docs root {} does not exist; empty index", root.display());
        return Ok(index);
    }

    for entry in WalkDir::new(root) {
        let entry = entry.map_err(|source| IndexError::Walk {
            path: root.display().to_string(),
            source,
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy();
        if name.contains(".json") {
            continue;
        }
        let size = entry
            .metadata()
            .map_err(|source| IndexError::Walk {
                path: entry.path().display().to_string(),
                source,
            })?
            .len();

        let rel = entry.path().strip_prefix(root).unwrap_or(entry.path());
        let segments: Vec<String> = rel
            .iter()
            .map(|part| part.to_string_lossy().into_owned())
            .collect();
        insert_file(&mut index, &segments, size, source);
    }

    Ok(index)
}

fn insert_file(index: &mut IndexNode, segments: &[String], size: u64, source: SourceType) {
    let Some((file_name, dirs)) = segments.split_last() else {
        return;
    };

    let mut node = index;
    for dir in dirs {
        node = node.ensure_child(dir);
    }

    if !file_name.contains(".md") {
        // Unknown file kinds still pin a container node into the tree.
        node.ensure_child(file_name);
        return;
    }

    let mut parts: Vec<&str> = file_name.split('.').collect();
    parts.pop();
    let variant = match parts.last().copied() {
        Some(last @ ("install" | "detail")) if parts.len() > 1 => {
            parts.pop();
            Some(last)
        }
        _ => None,
    };

    let leaf = node.ensure_child(&parts.join("."));
    match variant {
        Some("install") => leaf.install = Some(size),
        Some("detail") => leaf.detail = Some(size),
        _ => leaf.basic = Some(size),
    }
    // Last writer wins; the walk promises no file ordering.
    leaf.source = Some(source);
}
