//! The avatar being built, as seen by the pipeline passes.

use rigfix_animation::{AnyController, AssetContainer, AssetStore};
use rigfix_hierarchy::{Hierarchy, NodeId};
use rigfix_resolver::{IgnoreRule, RewriteRule};
use serde::{Deserialize, Serialize};

/// Component name of the node carrying [`ResolverMarker`] settings.
pub const MARKER_COMPONENT: &str = "RigfixResolver";

/// Per-avatar opt-in for the full-controller pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolverMarker {
    pub node: NodeId,
    #[serde(default = "enabled")]
    pub fix_animation_bindings: bool,
    /// Also correct transform channels whose rest pose moved. Only applies when
    /// `fix_animation_bindings` is set.
    #[serde(default = "enabled")]
    pub fix_transform_animations: bool,
}

fn enabled() -> bool {
    true
}

impl ResolverMarker {
    pub fn new(node: NodeId) -> Self {
        Self {
            node,
            fix_animation_bindings: true,
            fix_transform_animations: true,
        }
    }
}

/// Playable layer a controller is installed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayerType {
    Base,
    Additive,
    Gesture,
    Action,
    Fx,
    Sitting,
    TPose,
    IkPose,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControllerEntry {
    pub controller: AnyController,
    pub layer_type: LayerType,
}

/// Path rewrite declared on a full-controller component. `delete` entries drop every
/// binding under `from` instead of rewriting it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewriteEntry {
    pub from: String,
    #[serde(default)]
    pub to: String,
    #[serde(default)]
    pub delete: bool,
}

/// A component that merges whole controllers into the avatar at build time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FullController {
    pub node: NodeId,
    pub controllers: Vec<ControllerEntry>,
    #[serde(default)]
    pub rewrite_bindings: Vec<RewriteEntry>,
    /// Node the controllers' paths are relative to, when not `node` itself.
    #[serde(default)]
    pub root_override: Option<NodeId>,
}

impl FullController {
    pub fn new(node: NodeId) -> Self {
        Self {
            node,
            controllers: Vec::new(),
            rewrite_bindings: Vec::new(),
            root_override: None,
        }
    }

    pub fn resolve_root(&self) -> NodeId {
        self.root_override.unwrap_or(self.node)
    }

    /// Split the declared rewrites into resolver rewrite and ignore rules.
    pub fn rules(&self) -> (Vec<RewriteRule>, Vec<IgnoreRule>) {
        let mut rewrites = Vec::new();
        let mut ignores = Vec::new();
        for entry in &self.rewrite_bindings {
            if entry.delete {
                ignores.push(IgnoreRule::new(entry.from.clone()));
            } else {
                rewrites.push(RewriteRule::new(entry.from.clone(), entry.to.clone()));
            }
        }
        (rewrites, ignores)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnimationLayerSlot {
    pub layer_type: LayerType,
    pub controller: Option<AnyController>,
}

impl AnimationLayerSlot {
    pub fn new(layer_type: LayerType, controller: Option<AnyController>) -> Self {
        Self {
            layer_type,
            controller,
        }
    }
}

#[derive(Debug)]
pub struct BuildContext {
    pub hierarchy: Hierarchy,
    pub store: AssetStore,
    pub avatar_root: NodeId,
    pub container: AssetContainer,
    pub marker: Option<ResolverMarker>,
    pub full_controllers: Vec<FullController>,
    pub base_layers: Vec<AnimationLayerSlot>,
}

impl BuildContext {
    pub fn new(hierarchy: Hierarchy, store: AssetStore, avatar_root: NodeId, container: AssetContainer) -> Self {
        Self {
            hierarchy,
            store,
            avatar_root,
            container,
            marker: None,
            full_controllers: Vec::new(),
            base_layers: Vec::new(),
        }
    }

    /// Bindings-fix opt-in, if a marker is present and enabled.
    pub fn active_marker(&self) -> Option<&ResolverMarker> {
        self.marker.as_ref().filter(|m| m.fix_animation_bindings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delete_entries_become_ignore_rules() {
        let mut fc = FullController::new(NodeId(3));
        fc.rewrite_bindings = vec![
            RewriteEntry {
                from: "Body/Eyes".into(),
                to: "Face/Eyes".into(),
                delete: false,
            },
            RewriteEntry {
                from: "Hat/".into(),
                to: String::new(),
                delete: true,
            },
        ];
        let (rewrites, ignores) = fc.rules();
        assert_eq!(rewrites, vec![RewriteRule::new("Body/Eyes", "Face/Eyes")]);
        assert_eq!(ignores, vec![IgnoreRule::new("Hat/")]);
        assert_eq!(fc.resolve_root(), NodeId(3));
    }
}
