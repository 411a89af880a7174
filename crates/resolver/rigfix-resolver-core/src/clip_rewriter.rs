//! Rewrites one clip's bindings and transform channels against the current hierarchy.

use hashbrown::HashMap;
use indexmap::IndexMap;
use rigfix_animation::{AssetContainer, AssetStore, Binding, ClipId, Curve, ObjectCurve};
use rigfix_hierarchy::{NodeId, SceneGraph};

use crate::config::ResolverConfig;
use crate::drift;
use crate::error::ResolveError;
use crate::path_index::{resolve_animated_node, resolve_current_path, PathIndex};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RewriteOutcome {
    /// Nothing to change; keep referencing the original clip.
    Unchanged,
    /// The clip to reference from now on. Equals the input when it was edited in place.
    Rewritten(ClipId),
}

/// Per-`fix` view over the session state needed to rewrite clips.
pub struct ClipRewriter<'a, G: SceneGraph> {
    pub graph: &'a G,
    pub index: &'a mut PathIndex,
    pub config: &'a ResolverConfig,
    pub container: &'a AssetContainer,
    pub avatar_root: NodeId,
    pub root_override: Option<NodeId>,
}

impl<'a, G: SceneGraph> ClipRewriter<'a, G> {
    pub fn rewrite(&mut self, store: &mut AssetStore, clip_id: ClipId) -> Result<RewriteOutcome, ResolveError> {
        let clip = store.clip(clip_id)?;

        let mut remap: HashMap<Binding, Binding> = HashMap::new();
        for binding in clip.bindings() {
            if let Some(new_path) = self.corrected_path(binding) {
                remap.insert(binding.clone(), binding.with_path(new_path));
            }
        }

        let needs_rewrite =
            !remap.is_empty() || (self.config.fix_transform_curves && self.has_drift(clip.float_curves.keys()));
        if !needs_rewrite {
            return Ok(RewriteOutcome::Unchanged);
        }

        let mut float_curves: IndexMap<Binding, Curve> = IndexMap::with_capacity(clip.float_curves.len());
        for (binding, curve) in &clip.float_curves {
            let target = remap.get(binding).unwrap_or(binding).clone();
            let mut curve = curve.clone();
            if self.config.fix_transform_curves && target.is_transform() {
                let offset = self.channel_drift(binding, &target);
                if offset != 0.0 {
                    if self.config.debug_logging {
                        log::debug!(
                            "applying offset {offset} to '{}:{}:{}'",
                            clip.name,
                            target.path,
                            target.property
                        );
                    }
                    curve = curve.with_offset(offset);
                }
            }
            float_curves.insert(target, curve);
        }

        let object_curves: IndexMap<Binding, ObjectCurve> = clip
            .object_curves
            .iter()
            .map(|(binding, curve)| (remap.get(binding).unwrap_or(binding).clone(), curve.clone()))
            .collect();

        if self.container.is_temporary_asset(&clip.origin) {
            let clip = store.clip_mut(clip_id)?;
            clip.float_curves = float_curves;
            clip.object_curves = object_curves;
            return Ok(RewriteOutcome::Rewritten(clip_id));
        }

        let mut copy = clip.empty_like(format!("{}{}", clip.name, self.config.clip_suffix));
        copy.events = clip.events.clone();
        copy.float_curves = float_curves;
        copy.object_curves = object_curves;
        copy.origin = self.container.origin_for_new();
        Ok(RewriteOutcome::Rewritten(store.add_clip(copy)))
    }

    /// Current path for an indexed binding when it differs from the recorded one.
    fn corrected_path(&self, binding: &Binding) -> Option<String> {
        if binding.path.is_empty() {
            return None;
        }
        let node = self.index.get(&binding.path)?;
        let relative_root = match self.root_override {
            Some(root) if self.graph.is_child_of(node, root) => root,
            _ => self.avatar_root,
        };
        let new_path = resolve_current_path(self.graph, node, relative_root)?;
        if new_path == binding.path {
            return None;
        }
        if self.config.debug_logging {
            log::debug!("processing binding with path '{}' > '{}'", binding.path, new_path);
        }
        Some(new_path)
    }

    /// True on the first transform binding with non-zero drift.
    fn has_drift<'b>(&mut self, bindings: impl Iterator<Item = &'b Binding>) -> bool {
        for binding in bindings.filter(|b| b.is_transform()) {
            let Some(node) = self.live_node(binding, binding) else {
                continue;
            };
            let (Some(snapshot), Some(current)) = (self.index.snapshot(node), self.graph.local_transform(node)) else {
                continue;
            };
            let offset = drift::binding_offset(binding, &current, snapshot);
            if self.config.debug_logging {
                log::debug!("transform at '{} {}' has offset {offset}", binding.path, binding.property);
            }
            if !drift::is_zero(offset, self.config.drift_epsilon) {
                return true;
            }
        }
        false
    }

    fn channel_drift(&mut self, original: &Binding, target: &Binding) -> f32 {
        let Some(node) = self.live_node(original, target) else {
            return 0.0;
        };
        let (Some(snapshot), Some(current)) = (self.index.snapshot(node), self.graph.local_transform(node)) else {
            return 0.0;
        };
        let offset = drift::channel_offset(target, &current, snapshot);
        if offset.abs() <= self.config.drift_epsilon {
            0.0
        } else {
            offset
        }
    }

    /// Live node for a binding: the index entry of its original path, else the rewritten
    /// path resolved under the avatar root (remembered for later lookups).
    fn live_node(&mut self, original: &Binding, target: &Binding) -> Option<NodeId> {
        if let Some(node) = self.index.get(&original.path) {
            return Some(node);
        }
        if let Some(node) = self.index.get(&target.path) {
            return Some(node);
        }
        let node = resolve_animated_node(self.graph, self.avatar_root, target)?;
        Some(self.index.remember(&target.path, node))
    }
}
