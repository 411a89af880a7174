//! rigfix-hierarchy-core: scene hierarchy model and path resolution (engine-agnostic).
//!
//! Animation bindings address nodes by slash-separated name paths relative to a root.
//! This crate provides the [`SceneGraph`] seam the resolver consumes and an arena
//! [`Hierarchy`] implementing it, including the structural edits (rename, reparent,
//! insert intermediate parent) an upstream optimizer performs.

pub mod hierarchy;
pub mod node_spec;
pub mod path;
pub mod scene_graph;
pub mod transform;

pub use hierarchy::{Hierarchy, HierarchyError, Node, NodeId};
pub use node_spec::NodeSpec;
pub use scene_graph::SceneGraph;
pub use transform::LocalTransform;
