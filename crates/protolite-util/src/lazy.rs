//! Deferred resolution of dotted type references.
//!
//! Schema construction records a field's type as a dotted path before the
//! type it names may exist. Once the namespace tree is complete, one
//! resolution pass swaps each path for the node it reaches, or for an explicit
//! [`LazyRef::Absent`] when the path leads nowhere. Failure to resolve is an
//! expected outcome, not an error.

use std::hash::Hash;
use std::sync::Arc;

use indexmap::IndexMap;

/// Name-keyed child lookup, the only capability resolution needs from a tree.
pub trait Lookup {
    /// The child named `name`, if any.
    fn child(&self, name: &str) -> Option<Arc<Self>>;
}

/// A type reference that may not be resolved yet.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LazyRef<N> {
    /// A dotted path waiting for the tree to be complete.
    Unresolved(String),
    /// The node the path named.
    Resolved(Arc<N>),
    /// The path named nothing.
    Absent,
}

impl<N> LazyRef<N> {
    pub fn unresolved(path: impl Into<String>) -> Self {
        LazyRef::Unresolved(path.into())
    }

    pub fn is_unresolved(&self) -> bool {
        matches!(self, LazyRef::Unresolved(_))
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, LazyRef::Absent)
    }

    /// The pending path, before resolution.
    pub fn path(&self) -> Option<&str> {
        match self {
            LazyRef::Unresolved(path) => Some(path),
            _ => None,
        }
    }

    /// The resolved node, after resolution.
    pub fn node(&self) -> Option<&Arc<N>> {
        match self {
            LazyRef::Resolved(node) => Some(node),
            _ => None,
        }
    }
}

/// Outcome counts of one resolution pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ResolveStats {
    pub resolved: usize,
    pub absent: usize,
}

impl ResolveStats {
    /// Entries that changed state during the pass.
    pub fn touched(&self) -> usize {
        self.resolved + self.absent
    }
}

/// Follow a dotted path down from `root`.
///
/// A single leading `.` marks a fully-qualified name and is skipped. Any
/// missing step, including an empty segment, yields `None`.
pub fn resolve_path<N: Lookup>(root: &N, path: &str) -> Option<Arc<N>> {
    let path = path.strip_prefix('.').unwrap_or(path);
    let mut node: Option<Arc<N>> = None;
    for segment in path.split('.') {
        if segment.is_empty() {
            return None;
        }
        node = Some(match &node {
            Some(parent) => parent.child(segment)?,
            None => root.child(segment)?,
        });
    }
    node
}

/// Resolve every pending entry in place.
///
/// Entries that are already `Resolved` or `Absent` are skipped, so running
/// the pass again over the same entries changes nothing.
pub fn resolve_lazy<'a, N>(
    root: &N,
    entries: impl IntoIterator<Item = &'a mut LazyRef<N>>,
) -> ResolveStats
where
    N: Lookup + 'a,
{
    let mut stats = ResolveStats::default();
    for entry in entries {
        let found = match entry {
            LazyRef::Unresolved(path) => {
                let found = resolve_path(root, path);
                if found.is_none() {
                    tracing::debug!("type reference {path:?} did not resolve");
                }
                found
            }
            LazyRef::Resolved(_) | LazyRef::Absent => continue,
        };
        *entry = match found {
            Some(node) => {
                stats.resolved += 1;
                LazyRef::Resolved(node)
            }
            None => {
                stats.absent += 1;
                LazyRef::Absent
            }
        };
    }
    tracing::trace!(
        "lazy resolution: {} resolved, {} absent",
        stats.resolved,
        stats.absent
    );
    stats
}

/// Pending type references keyed by whatever the schema layer uses to
/// identify a field, in insertion order.
#[derive(Clone, Debug)]
pub struct ReferenceTable<K, N> {
    entries: IndexMap<K, LazyRef<N>>,
}

impl<K, N> Default for ReferenceTable<K, N> {
    fn default() -> Self {
        Self {
            entries: IndexMap::new(),
        }
    }
}

impl<K: Hash + Eq, N> ReferenceTable<K, N> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a pending reference, replacing any previous entry for `key`.
    pub fn insert_path(&mut self, key: K, path: impl Into<String>) {
        self.entries.insert(key, LazyRef::unresolved(path));
    }

    pub fn get(&self, key: &K) -> Option<&LazyRef<N>> {
        self.entries.get(key)
    }

    /// The resolved node for `key`, if it has one.
    pub fn node(&self, key: &K) -> Option<&Arc<N>> {
        self.entries.get(key).and_then(LazyRef::node)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether no entry is still pending.
    pub fn is_resolved(&self) -> bool {
        !self.entries.values().any(LazyRef::is_unresolved)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &LazyRef<N>)> {
        self.entries.iter()
    }

    /// Resolve every pending entry against `root`.
    pub fn resolve(&mut self, root: &N) -> ResolveStats
    where
        N: Lookup,
    {
        resolve_lazy(root, self.entries.values_mut())
    }
}

// ============================================================================
// Tests
// ============================================================================
