//! A namespace tree of packages and type definitions.
//!
//! Nodes are shared through `Arc` so a resolved reference can outlive the
//! borrow of the tree it came from. Definitions are added with
//! [`Namespace::define`], which copies on write any node that is already shared.
//! References resolved before a later `define` keep pointing at the older
//! snapshot, so resolve only once the tree is complete.

use std::sync::Arc;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::error::NamespaceError;
use crate::lazy::{Lookup, resolve_path};

/// What a namespace node defines.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum NodeKind {
    /// A package, or a placeholder for a name seen only as a path prefix.
    Package,
    Message,
    Enum,
    Service,
}

impl NodeKind {
    /// Whether this node can be the target of a field type reference.
    pub fn is_type(&self) -> bool {
        matches!(self, NodeKind::Message | NodeKind::Enum)
    }
}

/// One node of the namespace tree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Namespace {
    name: String,
    full_name: String,
    kind: NodeKind,
    children: IndexMap<String, Arc<Namespace>>,
}

impl Namespace {
    /// An empty, unnamed root.
    pub fn root() -> Self {
        Self::node(String::new(), String::new(), NodeKind::Package)
    }

    fn node(name: String, full_name: String, kind: NodeKind) -> Self {
        Self {
            name,
            full_name,
            kind,
            children: IndexMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Dotted path from the root, without a leading dot. Empty for the root.
    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn get(&self, name: &str) -> Option<&Arc<Namespace>> {
        self.children.get(name)
    }

    /// Direct children, in definition order.
    pub fn children(&self) -> impl Iterator<Item = &Arc<Namespace>> {
        self.children.values()
    }

    /// Define `path` (relative to this node) as `kind`.
    ///
    /// Missing intermediate names become packages. An existing package node
    /// may be promoted to another kind; redefining a non-package as a
    /// different kind is an error. A single leading `.` is ignored.
    pub fn define(&mut self, path: &str, kind: NodeKind) -> Result<(), NamespaceError> {
        let path = path.strip_prefix('.').unwrap_or(path);
        if path.split('.').any(str::is_empty) {
            return Err(NamespaceError::EmptySegment(path.to_string()));
        }

        let mut node: &mut Namespace = self;
        let mut segments = path.split('.').peekable();
        while let Some(segment) = segments.next() {
            let full_name = if node.full_name.is_empty() {
                segment.to_string()
            } else {
                format!("{}.{}", node.full_name, segment)
            };
            let child = node
                .children
                .entry(segment.to_string())
                .or_insert_with(|| {
                    Arc::new(Self::node(segment.to_string(), full_name, NodeKind::Package))
                });
            node = Arc::make_mut(child);

            if segments.peek().is_none() {
                if node.kind != kind && node.kind != NodeKind::Package {
                    return Err(NamespaceError::KindConflict {
                        path: node.full_name.clone(),
                        existing: node.kind,
                        requested: kind,
                    });
                }
                node.kind = kind;
            }
        }
        Ok(())
    }

    /// Follow a dotted path from this node.
    pub fn lookup_path(&self, path: &str) -> Option<Arc<Namespace>> {
        resolve_path(self, path)
    }
}

impl Lookup for Namespace {
    fn child(&self, name: &str) -> Option<Arc<Self>> {
        self.children.get(name).cloned()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn sample() -> Namespace {
        let mut root = Namespace::root();
        root.define("pkg.Foo", NodeKind::Message).unwrap();
        root.define("pkg.Foo.Inner", NodeKind::Enum).unwrap();
        root.define("pkg.Svc", NodeKind::Service).unwrap();
        root
    }

    #[test]
    fn test_define_creates_intermediate_packages() {
        let root = sample();
        let pkg = root.get("pkg").unwrap();
        assert_eq!(pkg.kind(), NodeKind::Package);
        assert_eq!(pkg.full_name(), "pkg");
        let foo = pkg.get("Foo").unwrap();
        assert_eq!(foo.kind(), NodeKind::Message);
        assert_eq!(foo.full_name(), "pkg.Foo");
        assert_eq!(foo.name(), "Foo");
    }

    #[test]
    fn test_define_promotes_placeholder() {
        let mut root = Namespace::root();
        root.define("a.B.C", NodeKind::Message).unwrap();
        assert_eq!(root.lookup_path("a.B").unwrap().kind(), NodeKind::Package);
        root.define("a.B", NodeKind::Message).unwrap();
        let b = root.lookup_path("a.B").unwrap();
        assert_eq!(b.kind(), NodeKind::Message);
        // Children survive the promotion
        assert!(b.get("C").is_some());
    }

    #[test]
    fn test_define_conflict() {
        let mut root = sample();
        let err = root.define("pkg.Foo", NodeKind::Service).unwrap_err();
        assert_eq!(
            err,
            NamespaceError::KindConflict {
                path: "pkg.Foo".into(),
                existing: NodeKind::Message,
                requested: NodeKind::Service,
            }
        );
        // Same kind again is fine
        root.define("pkg.Foo", NodeKind::Message).unwrap();
    }

    #[test]
    fn test_define_rejects_empty_segments() {
        let mut root = Namespace::root();
        for bad in ["", ".", "a..b", "a."] {
            assert!(
                matches!(root.define(bad, NodeKind::Message), Err(NamespaceError::EmptySegment(_))),
                "path {bad:?}"
            );
        }
        assert!(root.children().next().is_none());
    }

    #[test]
    fn test_define_ignores_leading_dot() {
        let mut root = Namespace::root();
        root.define(".pkg.Foo", NodeKind::Message).unwrap();
        assert!(root.lookup_path("pkg.Foo").is_some());
    }

    #[test]
    fn test_define_after_sharing_copies_on_write() {
        let mut root = sample();
        let before = root.lookup_path("pkg").unwrap();
        root.define("pkg.Bar", NodeKind::Message).unwrap();
        assert!(before.get("Bar").is_none());
        assert!(root.lookup_path("pkg.Bar").is_some());
    }

    #[test]
    fn test_children_in_definition_order() {
        let root = sample();
        let pkg = root.get("pkg").unwrap();
        let names: Vec<&str> = pkg.children().map(|c| c.name()).collect();
        assert_eq!(names, ["Foo", "Svc"]);
    }

    #[test]
    fn test_node_kind_strings() {
        assert_eq!(NodeKind::Message.to_string(), "message");
        assert_eq!(NodeKind::from_str("ENUM").unwrap(), NodeKind::Enum);
        assert!(NodeKind::from_str("oneof").is_err());
        assert!(NodeKind::Enum.is_type());
        assert!(!NodeKind::Service.is_type());
    }

    #[test]
    fn test_node_kind_serde() {
        let json = serde_json::to_string(&NodeKind::Service).unwrap();
        assert_eq!(json, "\"service\"");
        let parsed: NodeKind = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, NodeKind::Service);
    }
}
