//! Binding path index and rewrite/ignore rules.
//!
//! During ingest every binding path referenced by a controller's clips is resolved once
//! against the live hierarchy. The resulting `path -> node` entries stay fixed for the
//! session: when the hierarchy is edited later, the node keeps its identity and its
//! *current* path can be recomputed from it.

use hashbrown::HashMap;
use rigfix_animation::{AnyController, AssetStore, Binding};
use rigfix_hierarchy::{path, NodeId, SceneGraph};
use serde::{Deserialize, Serialize};

use crate::drift::TransformSnapshot;
use crate::error::ResolveError;

/// Prefix replacement applied to a binding path before lookup.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewriteRule {
    pub from: String,
    pub to: String,
}

impl RewriteRule {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }

    pub fn apply(&self, path: &str) -> Option<String> {
        path::replace_prefix(path, &self.from, &self.to)
    }
}

/// Bindings under this prefix are dropped before resolution.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IgnoreRule(pub String);

impl IgnoreRule {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self(prefix.into())
    }

    #[inline]
    pub fn matches(&self, path: &str) -> bool {
        path::has_prefix(path, &self.0)
    }
}

/// Apply every rule in order; each sees the output of the previous one.
pub fn rewrite_path(path: &str, rules: &[RewriteRule]) -> String {
    rules.iter().fold(path.to_string(), |current, rule| {
        rule.apply(&current).unwrap_or(current)
    })
}

/// Node a binding animates under `root`: the path must resolve and the node must carry the
/// binding's owner component.
pub fn resolve_animated_node<G: SceneGraph>(graph: &G, root: NodeId, binding: &Binding) -> Option<NodeId> {
    let node = graph.resolve_node_by_path(root, &binding.path)?;
    graph
        .has_component(node, binding.owner.type_name())
        .then_some(node)
}

/// Path of `node` as currently computed from `relative_root`.
pub fn resolve_current_path<G: SceneGraph>(graph: &G, node: NodeId, relative_root: NodeId) -> Option<String> {
    graph.current_path(node, relative_root)
}

/// Outcome of indexing a single binding.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum IndexOutcome {
    AlreadyIndexed,
    Ignored,
    Unresolved,
    Indexed(NodeId),
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct IndexStats {
    pub indexed: usize,
    pub ignored: usize,
    pub unresolved: usize,
}

/// Rules and roots used while indexing one controller.
#[derive(Clone, Copy, Debug)]
pub struct IndexScope<'r> {
    pub root: NodeId,
    pub alt_root: Option<NodeId>,
    pub rewrites: &'r [RewriteRule],
    pub ignores: &'r [IgnoreRule],
}

impl<'r> IndexScope<'r> {
    pub fn new(root: NodeId) -> Self {
        Self {
            root,
            alt_root: None,
            rewrites: &[],
            ignores: &[],
        }
    }
}

#[derive(Debug, Default, Clone)]
pub struct PathIndex {
    nodes: HashMap<String, NodeId>,
    snapshots: HashMap<NodeId, TransformSnapshot>,
    debug_logging: bool,
}

impl PathIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_debug_logging(&mut self, enabled: bool) {
        self.debug_logging = enabled;
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Node recorded for an original binding path.
    pub fn get(&self, path: &str) -> Option<NodeId> {
        self.nodes.get(path).copied()
    }

    pub fn snapshot(&self, node: NodeId) -> Option<&TransformSnapshot> {
        self.snapshots.get(&node)
    }

    /// Record `path -> node` without taking a snapshot. Existing entries win.
    pub fn remember(&mut self, path: &str, node: NodeId) -> NodeId {
        *self.nodes.entry_ref(path).or_insert(node)
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
        self.snapshots.clear();
    }

    /// Index every binding of every clip the controllers play.
    pub fn index<G: SceneGraph>(
        &mut self,
        graph: &G,
        store: &AssetStore,
        controllers: &[AnyController],
        scope: IndexScope<'_>,
    ) -> Result<IndexStats, ResolveError> {
        let mut stats = IndexStats::default();
        for &controller in controllers {
            for clip in store.controller_clips(controller)? {
                for binding in store.clip(clip)?.bindings() {
                    match self.index_binding(graph, binding, scope) {
                        IndexOutcome::Indexed(_) => stats.indexed += 1,
                        IndexOutcome::Ignored => stats.ignored += 1,
                        IndexOutcome::Unresolved => stats.unresolved += 1,
                        IndexOutcome::AlreadyIndexed => {}
                    }
                }
            }
        }
        Ok(stats)
    }

    /// Index one binding. The first occurrence of a path wins; later ones are skipped
    /// without re-resolution. Ignore rules test the original path, lookup uses the
    /// rewritten one.
    pub fn index_binding<G: SceneGraph>(
        &mut self,
        graph: &G,
        binding: &Binding,
        scope: IndexScope<'_>,
    ) -> IndexOutcome {
        if self.nodes.contains_key(binding.path.as_str()) {
            return IndexOutcome::AlreadyIndexed;
        }
        if scope.ignores.iter().any(|rule| rule.matches(&binding.path)) {
            return IndexOutcome::Ignored;
        }

        let lookup_path = rewrite_path(&binding.path, scope.rewrites);
        if self.debug_logging && lookup_path != binding.path {
            log::debug!("rewrite path '{}' > '{}'", binding.path, lookup_path);
        }
        let lookup = binding.with_path(lookup_path);

        let node = resolve_animated_node(graph, scope.root, &lookup).or_else(|| {
            scope
                .alt_root
                .and_then(|alt| resolve_animated_node(graph, alt, &lookup))
        });
        let Some(node) = node else {
            return IndexOutcome::Unresolved;
        };

        self.nodes.insert(binding.path.clone(), node);
        if !self.snapshots.contains_key(&node) {
            if let Some(t) = graph.local_transform(node) {
                self.snapshots.insert(node, TransformSnapshot::capture(&t));
            }
        }
        IndexOutcome::Indexed(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rules_apply_cumulatively() {
        let rules = vec![
            RewriteRule::new("Body/Eyes", "Face/Eyes"),
            RewriteRule::new("Face/", "Head/Face/"),
        ];
        assert_eq!(rewrite_path("Body/Eyes/Left", &rules), "Head/Face/Eyes/Left");
        assert_eq!(rewrite_path("Body/Arm", &rules), "Body/Arm");
    }

    #[test]
    fn ignore_rule_longer_than_path() {
        let rule = IgnoreRule::new("Hat/");
        assert!(rule.matches("Hat/Brim"));
        assert!(!rule.matches("Hat"));
        assert!(!rule.matches(""));
    }
}
