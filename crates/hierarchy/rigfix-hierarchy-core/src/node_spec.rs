//! Nested JSON description of a hierarchy, used by fixtures and host tooling.
//!
//! ```json
//! { "name": "Avatar", "children": [
//!     { "name": "Armature", "position": [0, 1, 0], "children": [] },
//!     { "name": "Body", "components": ["SkinnedMeshRenderer"] }
//! ] }
//! ```

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::hierarchy::{Hierarchy, HierarchyError, NodeId};
use crate::transform::{quat_from_euler_degrees, LocalTransform};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct NodeSpec {
    pub name: String,
    #[serde(default)]
    pub position: Option<Vec3>,
    /// Quaternion `(x, y, z, w)`. Takes precedence over `euler`.
    #[serde(default)]
    pub rotation: Option<Quat>,
    /// Euler angles in degrees.
    #[serde(default)]
    pub euler: Option<Vec3>,
    #[serde(default)]
    pub scale: Option<Vec3>,
    #[serde(default)]
    pub components: Vec<String>,
    #[serde(default)]
    pub children: Vec<NodeSpec>,
}

impl NodeSpec {
    pub fn local_transform(&self) -> LocalTransform {
        let rotation = match (self.rotation, self.euler) {
            (Some(q), _) => q,
            (None, Some(e)) => quat_from_euler_degrees(e),
            (None, None) => Quat::IDENTITY,
        };
        LocalTransform {
            position: self.position.unwrap_or(Vec3::ZERO),
            rotation,
            scale: self.scale.unwrap_or(Vec3::ONE),
        }
    }
}

impl Hierarchy {
    /// Build a new hierarchy with `spec` as its single root.
    pub fn from_spec(spec: &NodeSpec) -> (Self, NodeId) {
        let mut h = Hierarchy::new();
        let root = h.add_root(spec.name.clone());
        // the root exists, so populating below it cannot fail
        let _ = h.populate(root, spec);
        (h, root)
    }

    /// Add `spec` (and its subtree) as a child of `parent`.
    pub fn add_spec(&mut self, parent: NodeId, spec: &NodeSpec) -> Result<NodeId, HierarchyError> {
        let id = self.add_child(parent, spec.name.clone())?;
        self.populate(id, spec)?;
        Ok(id)
    }

    fn populate(&mut self, id: NodeId, spec: &NodeSpec) -> Result<(), HierarchyError> {
        self.set_local_transform(id, spec.local_transform())?;
        for component in &spec.components {
            self.add_component(id, component.clone())?;
        }
        for child in &spec.children {
            self.add_spec(id, child)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SceneGraph;

    #[test]
    fn from_json_builds_paths() {
        let spec: NodeSpec = serde_json::from_str(
            r#"{ "name": "Avatar", "children": [
                { "name": "Armature", "position": [0.0, 1.0, 0.0], "children": [
                    { "name": "Hips" } ] },
                { "name": "Body", "components": ["SkinnedMeshRenderer"] } ] }"#,
        )
        .unwrap();
        let (h, root) = Hierarchy::from_spec(&spec);
        let hips = h.resolve_node_by_path(root, "Armature/Hips").unwrap();
        assert_eq!(h.current_path(hips, root).as_deref(), Some("Armature/Hips"));
        let armature = h.resolve_node_by_path(root, "Armature").unwrap();
        assert_eq!(
            h.local_transform(armature).unwrap().position,
            Vec3::new(0.0, 1.0, 0.0)
        );
        let body = h.resolve_node_by_path(root, "Body").unwrap();
        assert!(h.has_component(body, "SkinnedMeshRenderer"));
        assert!(!h.has_component(hips, "SkinnedMeshRenderer"));
    }
}
