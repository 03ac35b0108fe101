use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

/// Which documentation tree a content node was built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    Manual,
    Auto,
}

/// Semantic class assigned to a node during classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NodeClass {
    Lib,
    UnbuiltLib,
    Method,
    Property,
    Doc,
    Object,
}

/// One entry in the documentation index.
///
/// A node is a container (children only), addressable content (at least one
/// size field set), or both, as with a directory that also carries an
/// `index.md`. The wire format keeps the original reserved-key layout: children
/// serialize as plain JSON keys, metadata under `__basic`, `__install`,
/// `__detail`, `__type`, `__class` and `__seq`, so persisted indexes stay
/// readable by older consumers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndexNode {
    pub children: BTreeMap<String, IndexNode>,
    /// Byte size of the main content variant.
    pub basic: Option<u64>,
    /// Byte size of the install-instructions variant.
    pub install: Option<u64>,
    /// Byte size of the detailed-reference variant.
    pub detail: Option<u64>,
    pub source: Option<SourceType>,
    pub class: Option<NodeClass>,
    /// Ordering hint for `doc`-class nodes.
    pub seq: Option<i64>,
}

impl IndexNode {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A bare node carrying only a classification, e.g. the `unbuilt-lib`
    /// placeholder.
    #[must_use]
    pub fn with_class(class: NodeClass) -> Self {
        Self {
            class: Some(class),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn child(&self, key: &str) -> Option<&IndexNode> {
        self.children.get(key)
    }

    pub fn child_mut(&mut self, key: &str) -> Option<&mut IndexNode> {
        self.children.get_mut(key)
    }

    /// Descends to the child named `key`, creating it if absent.
    pub fn ensure_child(&mut self, key: &str) -> &mut IndexNode {
        self.children.entry(key.to_string()).or_default()
    }

    /// True when the node carries at least one content variant.
    #[must_use]
    pub fn has_content(&self) -> bool {
        self.basic.is_some() || self.install.is_some() || self.detail.is_some()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.children.is_empty() && !self.has_content() && self.class.is_none()
    }
}

const KEY_BASIC: &str = "__basic";
const KEY_INSTALL: &str = "__install";
const KEY_DETAIL: &str = "__detail";
const KEY_TYPE: &str = "__type";
const KEY_CLASS: &str = "__class";
const KEY_SEQ: &str = "__seq";

impl Serialize for IndexNode {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(None)?;
        if let Some(size) = self.basic {
            map.serialize_entry(KEY_BASIC, &size)?;
        }
        if let Some(size) = self.install {
            map.serialize_entry(KEY_INSTALL, &size)?;
        }
        if let Some(size) = self.detail {
            map.serialize_entry(KEY_DETAIL, &size)?;
        }
        if let Some(source) = &self.source {
            map.serialize_entry(KEY_TYPE, source)?;
        }
        if let Some(class) = &self.class {
            map.serialize_entry(KEY_CLASS, class)?;
        }
        if let Some(seq) = self.seq {
            map.serialize_entry(KEY_SEQ, &seq)?;
        }
        for (key, child) in &self.children {
            map.serialize_entry(key, child)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for IndexNode {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct NodeVisitor;

        impl<'de> Visitor<'de> for NodeVisitor {
            type Value = IndexNode;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a documentation index node")
            }

            fn visit_map<A>(self, mut access: A) -> std::result::Result<IndexNode, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut node = IndexNode::new();
                while let Some(key) = access.next_key::<String>()? {
                    match key.as_str() {
                        KEY_BASIC => node.basic = Some(access.next_value()?),
                        KEY_INSTALL => node.install = Some(access.next_value()?),
                        KEY_DETAIL => node.detail = Some(access.next_value()?),
                        KEY_TYPE => node.source = Some(access.next_value()?),
                        KEY_CLASS => node.class = Some(access.next_value()?),
                        KEY_SEQ => node.seq = Some(access.next_value()?),
                        _ => {
                            node.children.insert(key, access.next_value()?);
                        }
                    }
                }
                Ok(node)
            }
        }

        deserializer.deserialize_map(NodeVisitor)
    }
}
