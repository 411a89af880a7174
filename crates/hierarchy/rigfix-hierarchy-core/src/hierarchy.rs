//! Arena-backed scene hierarchy.
//!
//! Nodes are addressed by [`NodeId`], which stays stable across renames and
//! reparenting. That stability is what lets the resolver find a node again after an
//! upstream pass moved it: the id survives, only its path changes.

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::path;
use crate::scene_graph::{SceneGraph, TRANSFORM_COMPONENT};
use crate::transform::LocalTransform;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct NodeId(pub u32);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum HierarchyError {
    #[error("unknown node {0:?}")]
    UnknownNode(NodeId),
    #[error("cannot parent {node:?} under its own descendant {parent:?}")]
    Cycle { node: NodeId, parent: NodeId },
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Node {
    pub name: String,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    pub transform: LocalTransform,
    /// Component type names attached to the node besides its transform.
    pub components: Vec<String>,
}

impl Node {
    fn new(name: impl Into<String>, parent: Option<NodeId>) -> Self {
        Self {
            name: name.into(),
            parent,
            children: Vec::new(),
            transform: LocalTransform::IDENTITY,
            components: Vec::new(),
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct Hierarchy {
    nodes: HashMap<NodeId, Node>,
    roots: Vec<NodeId>,
    next_id: u32,
}

impl Hierarchy {
    pub fn new() -> Self {
        Self::default()
    }

    fn alloc(&mut self) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        id
    }

    fn get_mut(&mut self, id: NodeId) -> Result<&mut Node, HierarchyError> {
        self.nodes.get_mut(&id).ok_or(HierarchyError::UnknownNode(id))
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn add_root(&mut self, name: impl Into<String>) -> NodeId {
        let id = self.alloc();
        self.nodes.insert(id, Node::new(name, None));
        self.roots.push(id);
        id
    }

    pub fn add_child(
        &mut self,
        parent: NodeId,
        name: impl Into<String>,
    ) -> Result<NodeId, HierarchyError> {
        if !self.nodes.contains_key(&parent) {
            return Err(HierarchyError::UnknownNode(parent));
        }
        let id = self.alloc();
        self.nodes.insert(id, Node::new(name, Some(parent)));
        self.get_mut(parent)?.children.push(id);
        Ok(id)
    }

    /// First direct child of `parent` named `name`.
    pub fn find_child(&self, parent: NodeId, name: &str) -> Option<NodeId> {
        self.nodes
            .get(&parent)?
            .children
            .iter()
            .copied()
            .find(|c| self.nodes.get(c).is_some_and(|n| n.name == name))
    }

    pub fn rename(&mut self, id: NodeId, name: impl Into<String>) -> Result<(), HierarchyError> {
        self.get_mut(id)?.name = name.into();
        Ok(())
    }

    pub fn set_local_transform(
        &mut self,
        id: NodeId,
        transform: LocalTransform,
    ) -> Result<(), HierarchyError> {
        self.get_mut(id)?.transform = transform;
        Ok(())
    }

    pub fn add_component(
        &mut self,
        id: NodeId,
        type_name: impl Into<String>,
    ) -> Result<(), HierarchyError> {
        self.get_mut(id)?.components.push(type_name.into());
        Ok(())
    }

    pub fn remove_component(&mut self, id: NodeId, type_name: &str) -> Result<bool, HierarchyError> {
        let node = self.get_mut(id)?;
        let before = node.components.len();
        node.components.retain(|c| c != type_name);
        Ok(node.components.len() != before)
    }

    /// Move `id` under `new_parent` (appended last). Local transform is kept as-is.
    pub fn reparent(&mut self, id: NodeId, new_parent: NodeId) -> Result<(), HierarchyError> {
        if !self.nodes.contains_key(&id) {
            return Err(HierarchyError::UnknownNode(id));
        }
        if !self.nodes.contains_key(&new_parent) {
            return Err(HierarchyError::UnknownNode(new_parent));
        }
        if self.is_child_of(new_parent, id) {
            return Err(HierarchyError::Cycle {
                node: id,
                parent: new_parent,
            });
        }
        self.detach(id);
        self.get_mut(new_parent)?.children.push(id);
        self.get_mut(id)?.parent = Some(new_parent);
        Ok(())
    }

    /// Insert a new node between `id` and its parent, taking `id`'s slot among its
    /// siblings. `id`'s local transform is recomputed so its pose relative to the old
    /// parent is unchanged.
    pub fn insert_parent(
        &mut self,
        id: NodeId,
        name: impl Into<String>,
        parent_local: LocalTransform,
    ) -> Result<NodeId, HierarchyError> {
        let old_parent = self.nodes.get(&id).ok_or(HierarchyError::UnknownNode(id))?.parent;
        let new_id = self.alloc();
        let mut inserted = Node::new(name, old_parent);
        inserted.transform = parent_local;
        inserted.children.push(id);

        let siblings = match old_parent {
            Some(p) => &mut self.get_mut(p)?.children,
            None => &mut self.roots,
        };
        if let Some(slot) = siblings.iter_mut().find(|c| **c == id) {
            *slot = new_id;
        }
        self.nodes.insert(new_id, inserted);

        let child = self.get_mut(id)?;
        let compensated = parent_local.to_affine().inverse() * child.transform.to_affine();
        child.transform = LocalTransform::from_affine(&compensated);
        child.parent = Some(new_id);
        Ok(new_id)
    }

    /// Remove `id` and its whole subtree.
    pub fn remove(&mut self, id: NodeId) -> Result<(), HierarchyError> {
        if !self.nodes.contains_key(&id) {
            return Err(HierarchyError::UnknownNode(id));
        }
        self.detach(id);
        let mut pending = vec![id];
        while let Some(next) = pending.pop() {
            if let Some(node) = self.nodes.remove(&next) {
                pending.extend(node.children);
            }
        }
        Ok(())
    }

    fn detach(&mut self, id: NodeId) {
        let parent = self.nodes.get(&id).and_then(|n| n.parent);
        let siblings = match parent {
            Some(p) => match self.nodes.get_mut(&p) {
                Some(node) => &mut node.children,
                None => return,
            },
            None => &mut self.roots,
        };
        siblings.retain(|c| *c != id);
        if let Some(node) = self.nodes.get_mut(&id) {
            node.parent = None;
        }
    }

    /// Ancestors of `id`, nearest first.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.nodes.get(&id).and_then(|n| n.parent), move |p| {
            self.nodes.get(p).and_then(|n| n.parent)
        })
    }

    /// Depth-first (pre-order) walk of the subtree rooted at `id`, including `id`.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(next) = stack.pop() {
            if let Some(node) = self.nodes.get(&next) {
                out.push(next);
                stack.extend(node.children.iter().rev().copied());
            }
        }
        out
    }
}

impl SceneGraph for Hierarchy {
    fn resolve_node_by_path(&self, root: NodeId, path: &str) -> Option<NodeId> {
        if !self.nodes.contains_key(&root) {
            return None;
        }
        path::segments(path).try_fold(root, |current, name| self.find_child(current, name))
    }

    fn current_path(&self, node: NodeId, relative_root: NodeId) -> Option<String> {
        if !self.nodes.contains_key(&relative_root) {
            return None;
        }
        let mut names: Vec<&str> = Vec::new();
        let mut current = node;
        while current != relative_root {
            let n = self.nodes.get(&current)?;
            names.push(&n.name);
            current = n.parent?;
        }
        names.reverse();
        Some(path::join(names))
    }

    fn is_child_of(&self, node: NodeId, ancestor: NodeId) -> bool {
        node == ancestor || self.ancestors(node).any(|a| a == ancestor)
    }

    fn local_transform(&self, node: NodeId) -> Option<LocalTransform> {
        self.nodes.get(&node).map(|n| n.transform)
    }

    fn has_component(&self, node: NodeId, type_name: &str) -> bool {
        self.nodes.get(&node).is_some_and(|n| {
            type_name == TRANSFORM_COMPONENT || n.components.iter().any(|c| c == type_name)
        })
    }

    fn node_name(&self, node: NodeId) -> Option<&str> {
        self.nodes.get(&node).map(|n| n.name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_monotonic() {
        let mut h = Hierarchy::new();
        let a = h.add_root("A");
        let b = h.add_child(a, "B").unwrap();
        assert_eq!(a, NodeId(0));
        assert_eq!(b, NodeId(1));
    }

    #[test]
    fn reparent_rejects_cycles() {
        let mut h = Hierarchy::new();
        let a = h.add_root("A");
        let b = h.add_child(a, "B").unwrap();
        assert_eq!(
            h.reparent(a, b),
            Err(HierarchyError::Cycle { node: a, parent: b })
        );
    }

    #[test]
    fn remove_drops_subtree() {
        let mut h = Hierarchy::new();
        let a = h.add_root("A");
        let b = h.add_child(a, "B").unwrap();
        h.add_child(b, "C").unwrap();
        h.remove(b).unwrap();
        assert_eq!(h.len(), 1);
        assert!(h.node(a).unwrap().children.is_empty());
    }
}
