//! Resolver-facing view of a scene hierarchy.
//!
//! Hosts implement this over their own scene representation and pass it into the
//! resolver; [`crate::Hierarchy`] is the in-crate implementation.

use crate::hierarchy::NodeId;
use crate::transform::LocalTransform;

/// Component type name every node carries.
pub const TRANSFORM_COMPONENT: &str = "Transform";

pub trait SceneGraph {
    /// Resolve a slash-separated path relative to `root`. The empty path is `root` itself.
    fn resolve_node_by_path(&self, root: NodeId, path: &str) -> Option<NodeId>;

    /// Path of `node` as currently computed from `relative_root`. `None` when either node
    /// is gone or `relative_root` is not an ancestor of `node`.
    fn current_path(&self, node: NodeId, relative_root: NodeId) -> Option<String>;

    /// True when `ancestor` is `node` or one of its ancestors.
    fn is_child_of(&self, node: NodeId, ancestor: NodeId) -> bool;

    fn local_transform(&self, node: NodeId) -> Option<LocalTransform>;

    fn has_component(&self, node: NodeId, type_name: &str) -> bool;

    fn node_name(&self, node: NodeId) -> Option<&str>;
}
