use crate::config::{ConfigMap, LibraryConfig};
use crate::node::{IndexNode, NodeClass};

/// Separator used for config path entries, independent of the platform the
/// docs tree was walked on.
pub const PATH_SEPARATOR: char = '/';

/// Applies per-library classification rules to an index, in place.
///
/// Only libraries present in both the index and the config map are touched;
/// classifications on unrelated libraries are never removed. Within a
/// library, rule order is a strict priority: method, then property, then
/// doc, then the object fallback. The first matching rule wins.
pub fn apply_configs(index: &mut IndexNode, configs: &ConfigMap) {
    for (lib, config) in configs {
        if let Some(node) = index.child_mut(lib) {
            let mut trail = Vec::new();
            classify_subtree(node, config, &mut trail);
        }
    }
}

fn classify_subtree(node: &mut IndexNode, config: &LibraryConfig, trail: &mut Vec<String>) {
    let keys: Vec<String> = node.children.keys().cloned().collect();
    for key in keys {
        trail.push(key.clone());
        if let Some(child) = node.children.get_mut(&key) {
            let path = trail.join(&PATH_SEPARATOR.to_string());
            classify_node(child, &key, &path, config);
            classify_subtree(child, config, trail);
        }
        trail.pop();
    }
}

fn classify_node(node: &mut IndexNode, key: &str, path: &str, config: &LibraryConfig) {
    if config.methods.iter().any(|entry| entry == path) {
        node.class = Some(NodeClass::Method);
        return;
    }
    if config.properties.iter().any(|entry| entry == path) {
        node.class = Some(NodeClass::Property);
        return;
    }

    for entry in &config.docs {
        // Checked in both directions on purpose: an entry may cover this
        // whole subtree, or this key may name a doc the entry only spells
        // out a prefix of. Preserved literally from the original rules.
        if path.starts_with(entry.as_str()) || entry.starts_with(key) {
            if let Some(seq) = config.doc_sequence.get(path) {
                node.seq = Some(*seq);
            }
            node.class = Some(NodeClass::Doc);
            return;
        }
    }

    // A key sitting on the way to a method or property, like `server` in
    // `server/listen`, is an object.
    for entry in config.methods.iter().chain(&config.properties) {
        let parts: Vec<&str> = entry.split(PATH_SEPARATOR).collect();
        if let Some(pos) = parts.iter().position(|part| *part == key) {
            if pos != parts.len() - 1 {
                node.class = Some(NodeClass::Object);
            }
        }
    }
}

/// Marks every top-level entry of the index as a library. Root-level nodes
/// are always libraries, so this overwrites any earlier classification at
/// that level only.
pub fn apply_libs(index: &mut IndexNode) {
    for child in index.children.values_mut() {
        child.class = Some(NodeClass::Lib);
    }
}

/// Inserts an `unbuilt-lib` placeholder for every registered autodoc
/// library the index does not know about yet. Existing entries are left
/// untouched.
pub fn apply_autodocs(index: &mut IndexNode, registered: &[String]) {
    for name in registered {
        if !index.children.contains_key(name) {
            index
                .children
                .insert(name.clone(), IndexNode::with_class(NodeClass::UnbuiltLib));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LibraryConfig;
    use pretty_assertions::assert_eq;

    fn index_with(paths: &[&str]) -> IndexNode {
        let mut index = IndexNode::new();
        for path in paths {
            let mut node = &mut index;
            for segment in path.split(PATH_SEPARATOR) {
                node = node.ensure_child(segment);
            }
            node.basic = Some(1);
        }
        index
    }

    fn config_for(lib: &str, config: LibraryConfig) -> ConfigMap {
        let mut configs = ConfigMap::new();
        configs.insert(lib.to_string(), config);
        configs
    }

    fn class_at<'a>(index: &'a IndexNode, path: &str) -> Option<NodeClass> {
        let mut node = index;
        for segment in path.split(PATH_SEPARATOR) {
            node = node.child(segment)?;
        }
        node.class
    }

    #[test]
    fn methods_and_properties_match_exact_paths() {
        let mut index = index_with(&["mylib/foo", "mylib/version", "mylib/server/listen"]);
        let configs = config_for(
            "mylib",
            LibraryConfig {
                methods: vec!["foo".into(), "server/listen".into()],
                properties: vec!["version".into()],
                ..LibraryConfig::default()
            },
        );

        apply_configs(&mut index, &configs);
        assert_eq!(class_at(&index, "mylib/foo"), Some(NodeClass::Method));
        assert_eq!(class_at(&index, "mylib/version"), Some(NodeClass::Property));
        assert_eq!(
            class_at(&index, "mylib/server/listen"),
            Some(NodeClass::Method)
        );
        // `server` is an intermediate segment of `server/listen`.
        assert_eq!(class_at(&index, "mylib/server"), Some(NodeClass::Object));
    }

    #[test]
    fn method_beats_doc_on_overlap() {
        let mut index = index_with(&["mylib/a/b"]);
        let configs = config_for(
            "mylib",
            LibraryConfig {
                methods: vec!["a/b".into()],
                docs: vec!["a".into()],
                ..LibraryConfig::default()
            },
        );

        apply_configs(&mut index, &configs);
        assert_eq!(class_at(&index, "mylib/a/b"), Some(NodeClass::Method));
    }

    #[test]
    fn doc_prefix_covers_a_subtree() {
        let mut index = index_with(&["mylib/guide/advanced"]);
        let configs = config_for(
            "mylib",
            LibraryConfig {
                docs: vec!["guide".into()],
                ..LibraryConfig::default()
            },
        );

        apply_configs(&mut index, &configs);
        assert_eq!(class_at(&index, "mylib/guide"), Some(NodeClass::Doc));
        assert_eq!(
            class_at(&index, "mylib/guide/advanced"),
            Some(NodeClass::Doc)
        );
    }

    #[test]
    fn doc_entry_starting_with_key_also_matches() {
        // The reverse prefix direction: entry `faq/general` starts with the
        // key `faq`, so the node named `faq` is a doc.
        let mut index = index_with(&["mylib/faq"]);
        let configs = config_for(
            "mylib",
            LibraryConfig {
                docs: vec!["faq/general".into()],
                ..LibraryConfig::default()
            },
        );

        apply_configs(&mut index, &configs);
        assert_eq!(class_at(&index, "mylib/faq"), Some(NodeClass::Doc));
    }

    #[test]
    fn doc_sequence_sets_ordering_hint() {
        let mut index = index_with(&["mylib/guide"]);
        let mut config = LibraryConfig {
            docs: vec!["guide".into()],
            ..LibraryConfig::default()
        };
        config.doc_sequence.insert("guide".into(), 3);
        let configs = config_for("mylib", config);

        apply_configs(&mut index, &configs);
        let guide = index.child("mylib").unwrap().child("guide").unwrap();
        assert_eq!(guide.class, Some(NodeClass::Doc));
        assert_eq!(guide.seq, Some(3));
    }

    #[test]
    fn unmatched_nodes_keep_no_class() {
        let mut index = index_with(&["mylib/mystery"]);
        let configs = config_for(
            "mylib",
            LibraryConfig {
                methods: vec!["foo".into()],
                ..LibraryConfig::default()
            },
        );

        apply_configs(&mut index, &configs);
        assert_eq!(class_at(&index, "mylib/mystery"), None);
    }

    #[test]
    fn unrelated_libraries_are_untouched() {
        let mut index = index_with(&["mylib/foo", "otherlib/foo"]);
        index.child_mut("otherlib").unwrap().child_mut("foo").unwrap().class =
            Some(NodeClass::Doc);
        let configs = config_for(
            "mylib",
            LibraryConfig {
                methods: vec!["foo".into()],
                ..LibraryConfig::default()
            },
        );

        apply_configs(&mut index, &configs);
        assert_eq!(class_at(&index, "otherlib/foo"), Some(NodeClass::Doc));
    }

    #[test]
    fn apply_libs_overwrites_top_level_only() {
        let mut index = index_with(&["mylib/foo"]);
        index.child_mut("mylib").unwrap().class = Some(NodeClass::Doc);
        index
            .child_mut("mylib")
            .unwrap()
            .child_mut("foo")
            .unwrap()
            .class = Some(NodeClass::Method);

        apply_libs(&mut index);
        assert_eq!(class_at(&index, "mylib"), Some(NodeClass::Lib));
        assert_eq!(class_at(&index, "mylib/foo"), Some(NodeClass::Method));
    }

    #[test]
    fn apply_autodocs_inserts_placeholders_for_missing_libs() {
        let mut index = index_with(&["mylib/foo"]);
        apply_autodocs(
            &mut index,
            &["mylib".to_string(), "remote-only".to_string()],
        );

        assert!(index.child("mylib").unwrap().child("foo").is_some());
        let placeholder = index.child("remote-only").unwrap();
        assert_eq!(placeholder.class, Some(NodeClass::UnbuiltLib));
        assert!(placeholder.children.is_empty());
    }
}
