//! Controller deep clone and layer merge.
//!
//! [`DeepClone`] copies a controller sub-graph through a [`CloneMap`]: an object reached
//! twice (shared sub-state-machines, transitions pointing back at their owner) is cloned
//! once and every referrer gets the same clone. The id of a clone is reserved and entered
//! into the map *before* its fields are visited, which is what terminates cycles.
//!
//! [`ControllerMerger`] builds one combined controller out of several sources, offsetting
//! layer indices embedded in synced layers and layer-control behaviors.

use hashbrown::{HashMap, HashSet};
use indexmap::IndexMap;
use rigfix_animation::{
    AnyController, AssetContainer, AssetError, AssetKind, AssetStore, Behavior, BehaviorId,
    Binding, BlendTree, BlendTreeId, BlendableLayer, Clip, ClipId, Controller, ControllerId,
    Destination, Layer, Motion, ObjectRef, OverrideControllerId, Parameter, PropertyOwner, State,
    StateId, StateMachine, StateMachineId, Transition, TransitionId, NO_SYNCED_LAYER,
};
use rigfix_hierarchy::path;

use crate::config::{MergeOptions, ResolverConfig};
use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::error::ResolveError;

/// Original object -> clone, scoped to one clone operation.
pub type CloneMap = HashMap<ObjectRef, ObjectRef>;

/// Suffix of controllers produced by [`deep_clone_controller`].
pub const CLONED_SUFFIX: &str = " (cloned)";

/// Name prefix of clips copied with rebased binding paths.
pub const REBASED_PREFIX: &str = "rebased ";

pub struct DeepClone {
    container: AssetContainer,
    proxy_markers: Vec<String>,
    proxy_prefixes: Vec<String>,
    /// While set, clips are substituted through this override controller before cloning.
    pub override_controller: Option<OverrideControllerId>,
}

impl DeepClone {
    pub fn new(container: &AssetContainer, config: &ResolverConfig) -> Self {
        Self {
            container: container.clone(),
            proxy_markers: config.proxy_markers.clone(),
            proxy_prefixes: config.proxy_prefixes.clone(),
            override_controller: None,
        }
    }

    pub fn is_proxy_clip(&self, clip: &Clip) -> bool {
        clip.origin.matches_path(&self.proxy_markers, &self.proxy_prefixes)
    }

    /// Clone `original` according to the leaf policy. With a `base_path`, clips are
    /// rebased under it (persisted clips at the top level and proxy clips pass through).
    pub fn clone_ref(
        &self,
        store: &mut AssetStore,
        original: ObjectRef,
        base_path: Option<&str>,
        map: &mut CloneMap,
    ) -> Result<ObjectRef, ResolveError> {
        let mut original = original;
        match original {
            ObjectRef::Asset(id) => {
                return match &store.asset(id)?.kind {
                    AssetKind::Texture
                    | AssetKind::Material
                    | AssetKind::Script
                    | AssetKind::ScriptableObject { .. } => Ok(original),
                    other => Err(ResolveError::UnsupportedReference {
                        type_name: other.type_name().to_string(),
                    }),
                };
            }
            ObjectRef::OverrideController(_) => {
                return Err(ResolveError::UnsupportedReference {
                    type_name: "OverrideController".to_string(),
                });
            }
            ObjectRef::Clip(clip) => {
                if let Some(oc) = self.override_controller {
                    if let Some(replacement) = store.override_controller(oc)?.override_for(clip) {
                        original = ObjectRef::Clip(replacement);
                    }
                }
            }
            _ => {}
        }

        if let Some(&clone) = map.get(&original) {
            return Ok(clone);
        }

        if let (ObjectRef::Clip(clip), Some(base)) = (original, base_path) {
            let mapped = self.clone_clip_with_path_mapping(store, clip, base)?;
            map.insert(original, ObjectRef::Clip(mapped));
            return Ok(ObjectRef::Clip(mapped));
        }

        match original {
            ObjectRef::Clip(id) => {
                let clone: ClipId = store.reserve();
                map.insert(original, clone.into());
                let mut copy = store.clip(id)?.clone();
                copy.origin = self.container.origin_for_new();
                store.insert_clip(clone, copy);
                Ok(clone.into())
            }
            ObjectRef::BlendTree(id) => Ok(self.clone_blend_tree(store, id, base_path, map)?.into()),
            ObjectRef::State(id) => Ok(self.clone_state(store, id, base_path, map)?.into()),
            ObjectRef::StateMachine(id) => Ok(self.clone_state_machine(store, id, base_path, map)?.into()),
            ObjectRef::Transition(id) => Ok(self.clone_transition(store, id, base_path, map)?.into()),
            ObjectRef::Behavior(id) => Ok(self.clone_behavior(store, id, base_path, map)?.into()),
            ObjectRef::Controller(id) => Ok(self.clone_controller(store, id, base_path, map)?.into()),
            ObjectRef::Asset(_) | ObjectRef::OverrideController(_) => Ok(original),
        }
    }

    pub fn clone_motion(
        &self,
        store: &mut AssetStore,
        motion: Motion,
        base_path: Option<&str>,
        map: &mut CloneMap,
    ) -> Result<Motion, ResolveError> {
        Ok(Motion::try_from(self.clone_ref(store, motion.into(), base_path, map)?)?)
    }

    pub fn clone_state_machine_ref(
        &self,
        store: &mut AssetStore,
        id: StateMachineId,
        base_path: Option<&str>,
        map: &mut CloneMap,
    ) -> Result<StateMachineId, ResolveError> {
        Ok(StateMachineId::try_from(self.clone_ref(store, id.into(), base_path, map)?)?)
    }

    pub fn clone_behavior_ref(
        &self,
        store: &mut AssetStore,
        id: BehaviorId,
        base_path: Option<&str>,
        map: &mut CloneMap,
    ) -> Result<BehaviorId, ResolveError> {
        Ok(BehaviorId::try_from(self.clone_ref(store, id.into(), base_path, map)?)?)
    }

    fn clone_state_ref(
        &self,
        store: &mut AssetStore,
        id: StateId,
        base_path: Option<&str>,
        map: &mut CloneMap,
    ) -> Result<StateId, ResolveError> {
        Ok(StateId::try_from(self.clone_ref(store, id.into(), base_path, map)?)?)
    }

    fn clone_all<I>(
        &self,
        store: &mut AssetStore,
        ids: &[I],
        base_path: Option<&str>,
        map: &mut CloneMap,
    ) -> Result<Vec<I>, ResolveError>
    where
        I: Copy + Into<ObjectRef> + TryFrom<ObjectRef, Error = AssetError>,
    {
        ids.iter()
            .map(|&id| -> Result<I, ResolveError> {
                Ok(I::try_from(self.clone_ref(store, id.into(), base_path, map)?)?)
            })
            .collect()
    }

    fn clone_clip_with_path_mapping(
        &self,
        store: &mut AssetStore,
        id: ClipId,
        base_path: &str,
    ) -> Result<ClipId, ResolveError> {
        let clip = store.clip(id)?;
        if clip.origin.is_persistent() && (base_path.is_empty() || self.is_proxy_clip(clip)) {
            return Ok(id);
        }

        let mut rebased = clip.empty_like(format!("{REBASED_PREFIX}{}", clip.name));
        rebased.origin = self.container.origin_for_new();
        for (binding, curve) in &clip.float_curves {
            rebased.set_float_curve(rebase_binding(binding, base_path), curve.clone());
        }
        for (binding, curve) in &clip.object_curves {
            rebased.set_object_curve(rebase_binding(binding, base_path), curve.clone());
        }
        Ok(store.add_clip(rebased))
    }

    fn clone_blend_tree(
        &self,
        store: &mut AssetStore,
        id: BlendTreeId,
        base_path: Option<&str>,
        map: &mut CloneMap,
    ) -> Result<BlendTreeId, ResolveError> {
        let clone: BlendTreeId = store.reserve();
        map.insert(id.into(), clone.into());
        let mut tree: BlendTree = store.blend_tree(id)?.clone();
        for child in &mut tree.children {
            child.motion = self.clone_motion(store, child.motion, base_path, map)?;
        }
        store.insert_blend_tree(clone, tree);
        Ok(clone)
    }

    fn clone_state(
        &self,
        store: &mut AssetStore,
        id: StateId,
        base_path: Option<&str>,
        map: &mut CloneMap,
    ) -> Result<StateId, ResolveError> {
        let clone: StateId = store.reserve();
        map.insert(id.into(), clone.into());
        let mut state: State = store.state(id)?.clone();
        if let Some(motion) = state.motion {
            state.motion = Some(self.clone_motion(store, motion, base_path, map)?);
        }
        state.behaviors = self.clone_all(store, &state.behaviors, base_path, map)?;
        state.transitions = self.clone_all(store, &state.transitions, base_path, map)?;
        store.insert_state(clone, state);
        Ok(clone)
    }

    fn clone_state_machine(
        &self,
        store: &mut AssetStore,
        id: StateMachineId,
        base_path: Option<&str>,
        map: &mut CloneMap,
    ) -> Result<StateMachineId, ResolveError> {
        let clone: StateMachineId = store.reserve();
        map.insert(id.into(), clone.into());
        let mut sm: StateMachine = store.state_machine(id)?.clone();
        sm.states = self.clone_all(store, &sm.states, base_path, map)?;
        sm.state_machines = self.clone_all(store, &sm.state_machines, base_path, map)?;
        sm.any_state_transitions = self.clone_all(store, &sm.any_state_transitions, base_path, map)?;
        sm.entry_transitions = self.clone_all(store, &sm.entry_transitions, base_path, map)?;
        sm.behaviors = self.clone_all(store, &sm.behaviors, base_path, map)?;
        if let Some(default_state) = sm.default_state {
            sm.default_state = Some(self.clone_state_ref(store, default_state, base_path, map)?);
        }
        store.insert_state_machine(clone, sm);
        Ok(clone)
    }

    fn clone_transition(
        &self,
        store: &mut AssetStore,
        id: TransitionId,
        base_path: Option<&str>,
        map: &mut CloneMap,
    ) -> Result<TransitionId, ResolveError> {
        let clone: TransitionId = store.reserve();
        map.insert(id.into(), clone.into());
        let mut transition: Transition = store.transition(id)?.clone();
        transition.destination = match transition.destination {
            Destination::State(s) => Destination::State(self.clone_state_ref(store, s, base_path, map)?),
            Destination::StateMachine(sm) => {
                Destination::StateMachine(self.clone_state_machine_ref(store, sm, base_path, map)?)
            }
            Destination::Exit => Destination::Exit,
        };
        store.insert_transition(clone, transition);
        Ok(clone)
    }

    fn clone_behavior(
        &self,
        store: &mut AssetStore,
        id: BehaviorId,
        base_path: Option<&str>,
        map: &mut CloneMap,
    ) -> Result<BehaviorId, ResolveError> {
        let clone: BehaviorId = store.reserve();
        map.insert(id.into(), clone.into());
        let mut behavior: Behavior = store.behavior(id)?.clone();
        if let Some(refs) = behavior.references_mut() {
            let originals = std::mem::take(refs);
            let mut cloned = Vec::with_capacity(originals.len());
            for obj in originals {
                cloned.push(self.clone_ref(store, obj, base_path, map)?);
            }
            *refs = cloned;
        }
        store.insert_behavior(clone, behavior);
        Ok(clone)
    }

    fn clone_controller(
        &self,
        store: &mut AssetStore,
        id: ControllerId,
        base_path: Option<&str>,
        map: &mut CloneMap,
    ) -> Result<ControllerId, ResolveError> {
        let clone: ControllerId = store.reserve();
        map.insert(id.into(), clone.into());
        let mut controller: Controller = store.controller(id)?.clone();
        controller.origin = self.container.origin_for_new();
        for layer in &mut controller.layers {
            if let Some(sm) = layer.state_machine {
                layer.state_machine = Some(self.clone_state_machine_ref(store, sm, base_path, map)?);
            }
            for o in &mut layer.motion_overrides {
                o.state = self.clone_state_ref(store, o.state, base_path, map)?;
                o.motion = self.clone_motion(store, o.motion, base_path, map)?;
            }
            for o in &mut layer.behavior_overrides {
                o.state = self.clone_state_ref(store, o.state, base_path, map)?;
                o.behaviors = self.clone_all(store, &o.behaviors, base_path, map)?;
            }
        }
        store.insert_controller(clone, controller);
        Ok(clone)
    }
}

/// Binding path under `base_path`. Animator-owned root bindings stay at the root.
fn rebase_binding(binding: &Binding, base_path: &str) -> Binding {
    if binding.owner == PropertyOwner::Animator && binding.path.is_empty() {
        return binding.clone();
    }
    binding.with_path(path::rebase(base_path, &binding.path))
}

/// Builds one combined controller from several sources.
pub struct ControllerMerger<'d> {
    name: String,
    container: AssetContainer,
    deep_clone: DeepClone,
    diagnostics: &'d mut Diagnostics,
    controller_base_layer: usize,
    clone_map: CloneMap,
    layers: Vec<Layer>,
    parameters: IndexMap<String, Parameter>,
    state_machines: HashMap<(String, StateMachineId), StateMachineId>,
    adjusted: HashSet<BehaviorId>,
    /// Playable whose layer-control behaviors are remapped when layers are pruned.
    pub blendable_layer: Option<BlendableLayer>,
}

impl<'d> ControllerMerger<'d> {
    pub fn new(
        container: &AssetContainer,
        name: impl Into<String>,
        config: &ResolverConfig,
        diagnostics: &'d mut Diagnostics,
    ) -> Self {
        Self {
            name: name.into(),
            container: container.clone(),
            deep_clone: DeepClone::new(container, config),
            diagnostics,
            controller_base_layer: 0,
            clone_map: CloneMap::new(),
            layers: Vec::new(),
            parameters: IndexMap::new(),
            state_machines: HashMap::new(),
            adjusted: HashSet::new(),
            blendable_layer: None,
        }
    }

    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    pub fn add_controller(
        &mut self,
        store: &mut AssetStore,
        base_path: &str,
        controller: ControllerId,
        options: &MergeOptions,
    ) -> Result<(), ResolveError> {
        self.controller_base_layer = self.layers.len();
        self.clone_map = CloneMap::new();
        if options.blendable_layer.is_some() {
            self.blendable_layer = options.blendable_layer;
        }

        let source = store.controller(controller)?.clone();
        for param in &source.parameters {
            match self.parameters.get(&param.name) {
                Some(existing) => {
                    if existing.kind != param.kind {
                        self.diagnostics.error(
                            DiagnosticKind::ParameterTypeMismatch,
                            format!(
                                "animator merge parameter type mismatch for '{}': {:?} vs {:?}",
                                param.name, existing.kind, param.kind
                            ),
                        );
                    }
                }
                None => {
                    self.parameters.insert(param.name.clone(), param.clone());
                }
            }
        }

        for (i, layer) in source.layers.iter().enumerate() {
            let first = i == 0;
            self.insert_layer(store, base_path, layer, first, options.write_defaults, &source.layers)?;
            if first && options.force_first_layer_weight {
                if let Some(last) = self.layers.last_mut() {
                    last.default_weight = 1.0;
                }
            }
        }
        Ok(())
    }

    pub fn add_override_controller(
        &mut self,
        store: &mut AssetStore,
        base_path: &str,
        override_controller: OverrideControllerId,
        options: &MergeOptions,
    ) -> Result<(), ResolveError> {
        let Some(base) = store.override_controller(override_controller)?.base else {
            self.diagnostics.warn(
                DiagnosticKind::MissingOverrideBase,
                format!(
                    "override controller '{}' has no base controller",
                    store.name(override_controller.into()).unwrap_or_default()
                ),
            );
            return Ok(());
        };

        self.deep_clone.override_controller = Some(override_controller);
        let result = self.add_controller(store, base_path, base, options);
        self.deep_clone.override_controller = None;
        result
    }

    /// Prune degenerate layers and store the combined controller.
    pub fn finish(mut self, store: &mut AssetStore) -> Result<ControllerId, ResolveError> {
        self.prune_empty_layers(store)?;
        let combined = Controller {
            name: self.name,
            parameters: self.parameters.into_values().collect(),
            layers: self.layers,
            origin: self.container.origin_for_new(),
        };
        Ok(store.add_controller(combined))
    }

    fn insert_layer(
        &mut self,
        store: &mut AssetStore,
        base_path: &str,
        layer: &Layer,
        first: bool,
        write_defaults: Option<bool>,
        source_layers: &[Layer],
    ) -> Result<(), ResolveError> {
        let state_machine = match layer.state_machine {
            Some(sm) => Some(self.map_state_machine(store, base_path, sm)?),
            None => None,
        };
        let mut new_layer = Layer {
            name: layer.name.clone(),
            state_machine,
            avatar_mask: layer.avatar_mask,
            blending_mode: layer.blending_mode,
            default_weight: if first { 1.0 } else { layer.default_weight },
            synced_layer_index: layer.synced_layer_index,
            synced_layer_affects_timing: layer.synced_layer_affects_timing,
            ik_pass: layer.ik_pass,
            motion_overrides: Vec::new(),
            behavior_overrides: Vec::new(),
        };

        if let (Some(sm), Some(value)) = (new_layer.state_machine, write_defaults) {
            for state in store.states_in(sm)? {
                store.state_mut(state)?.write_defaults = value;
            }
        }

        if let Some(base_layer) = layer.synced_layer().and_then(|i| source_layers.get(i)) {
            if let Some(base_sm) = base_layer.state_machine {
                for state in store.states_in(base_sm)? {
                    self.transfer_overrides(store, layer, &mut new_layer, state)?;
                }
            }
            new_layer.synced_layer_index += self.controller_base_layer as i32;
        }

        self.layers.push(new_layer);
        Ok(())
    }

    /// Move per-state overrides recorded against a base-layer state onto its clone.
    fn transfer_overrides(
        &mut self,
        store: &mut AssetStore,
        source: &Layer,
        target: &mut Layer,
        state: StateId,
    ) -> Result<(), ResolveError> {
        let motion = source.override_motion(state);
        let behaviors = source.override_behaviors(state);
        if motion.is_none() && behaviors.is_none() {
            return Ok(());
        }

        let Some(clone) = self
            .clone_map
            .get(&ObjectRef::State(state))
            .and_then(|c| StateId::try_from(*c).ok())
        else {
            self.diagnostics.warn(
                DiagnosticKind::UnresolvedSyncedOverride,
                format!(
                    "synced layer '{}' overrides state '{}' which was not cloned",
                    source.name,
                    store.name(state.into()).unwrap_or_default()
                ),
            );
            return Ok(());
        };

        if let Some(motion) = motion {
            target.set_override_motion(clone, motion);
        }
        if let Some(behaviors) = behaviors {
            let mut cloned = Vec::with_capacity(behaviors.len());
            for &b in behaviors {
                let mut fresh = CloneMap::new();
                let b = self.deep_clone.clone_behavior_ref(store, b, None, &mut fresh)?;
                self.adjust_behavior(store, b)?;
                cloned.push(b);
            }
            target.set_override_behaviors(clone, cloned);
        }
        Ok(())
    }

    fn map_state_machine(
        &mut self,
        store: &mut AssetStore,
        base_path: &str,
        sm: StateMachineId,
    ) -> Result<StateMachineId, ResolveError> {
        let key = (base_path.to_string(), sm);
        if let Some(&cached) = self.state_machines.get(&key) {
            return Ok(cached);
        }

        let clone = self
            .deep_clone
            .clone_state_machine_ref(store, sm, Some(base_path), &mut self.clone_map)?;
        for state in store.states_in(clone)? {
            let behaviors = store.state(state)?.behaviors.clone();
            for b in behaviors {
                self.adjust_behavior(store, b)?;
            }
        }
        self.state_machines.insert(key, clone);
        Ok(clone)
    }

    /// Offset intra-controller layer indices by where this source's layers start.
    fn adjust_behavior(&mut self, store: &mut AssetStore, id: BehaviorId) -> Result<(), ResolveError> {
        if !self.adjusted.insert(id) {
            return Ok(());
        }
        if let Behavior::LayerControl { layer, .. } = store.behavior_mut(id)? {
            *layer += self.controller_base_layer as i32;
        }
        Ok(())
    }

    fn is_empty_layer(store: &AssetStore, layer: &Layer) -> Result<bool, ResolveError> {
        if layer.synced_layer().is_some() || layer.avatar_mask.is_some() {
            return Ok(false);
        }
        Ok(match layer.state_machine {
            None => true,
            Some(sm) => store.state_machine(sm)?.is_empty(),
        })
    }

    fn prune_empty_layers(&mut self, store: &mut AssetStore) -> Result<(), ResolveError> {
        let mut mapping: Vec<Option<usize>> = Vec::with_capacity(self.layers.len());
        let mut kept = Vec::with_capacity(self.layers.len());
        for (i, layer) in std::mem::take(&mut self.layers).into_iter().enumerate() {
            if i > 0 && Self::is_empty_layer(store, &layer)? {
                mapping.push(None);
            } else {
                mapping.push(Some(kept.len()));
                kept.push(layer);
            }
        }

        let remap = |index: i32| -> Option<i32> {
            usize::try_from(index)
                .ok()
                .and_then(|i| mapping.get(i).copied().flatten())
                .map(|i| i as i32)
        };

        let mut decided = HashMap::new();
        for layer in &mut kept {
            if let Some(target) = layer.synced_layer() {
                layer.synced_layer_index = remap(target as i32).unwrap_or(NO_SYNCED_LAYER);
            }
            for o in &mut layer.behavior_overrides {
                o.behaviors = self.adjust_behavior_list(store, &o.behaviors, &remap, &mut decided)?;
            }
            let Some(root) = layer.state_machine else {
                continue;
            };
            for sm in store.walk_state_machines(root)? {
                let behaviors = store.state_machine(sm)?.behaviors.clone();
                let behaviors = self.adjust_behavior_list(store, &behaviors, &remap, &mut decided)?;
                store.state_machine_mut(sm)?.behaviors = behaviors;
                for state in store.state_machine(sm)?.states.clone() {
                    let behaviors = store.state(state)?.behaviors.clone();
                    let behaviors = self.adjust_behavior_list(store, &behaviors, &remap, &mut decided)?;
                    store.state_mut(state)?.behaviors = behaviors;
                }
            }
        }

        self.layers = kept;
        Ok(())
    }

    /// Remap layer-control targets; drop behaviors whose layer was pruned. `decided`
    /// records the keep/drop outcome per behavior so shared ones are remapped once.
    fn adjust_behavior_list(
        &self,
        store: &mut AssetStore,
        behaviors: &[BehaviorId],
        remap: &impl Fn(i32) -> Option<i32>,
        decided: &mut HashMap<BehaviorId, bool>,
    ) -> Result<Vec<BehaviorId>, ResolveError> {
        let mut out = Vec::with_capacity(behaviors.len());
        for &id in behaviors {
            let keep = match decided.get(&id) {
                Some(&keep) => keep,
                None => {
                    let keep = match store.behavior_mut(id)? {
                        Behavior::LayerControl { playable, layer, .. }
                            if self.blendable_layer.map_or(true, |p| p == *playable) =>
                        {
                            match remap(*layer) {
                                Some(new_layer) => {
                                    *layer = new_layer;
                                    true
                                }
                                None => false,
                            }
                        }
                        _ => true,
                    };
                    decided.insert(id, keep);
                    keep
                }
            };
            if keep {
                out.push(id);
            }
        }
        Ok(out)
    }
}

/// Clone a whole controller (plain or override) into a new one named `"<name> (cloned)"`.
pub fn deep_clone_controller(
    store: &mut AssetStore,
    container: &AssetContainer,
    controller: AnyController,
    config: &ResolverConfig,
    diagnostics: &mut Diagnostics,
) -> Result<ControllerId, ResolveError> {
    let name = format!(
        "{}{CLONED_SUFFIX}",
        store.controller_name(controller).unwrap_or_default()
    );
    let mut merger = ControllerMerger::new(container, name, config, diagnostics);
    let options = MergeOptions::default();
    match controller {
        AnyController::Animator(id) => merger.add_controller(store, "", id, &options)?,
        AnyController::Override(id) => merger.add_override_controller(store, "", id, &options)?,
    }
    merger.finish(store)
}

/// Replace every layer-slot controller that is temporary for `container` with a deep clone.
pub fn clone_layers<'s>(
    store: &mut AssetStore,
    container: &AssetContainer,
    slots: impl IntoIterator<Item = &'s mut Option<AnyController>>,
    config: &ResolverConfig,
    diagnostics: &mut Diagnostics,
) -> Result<(), ResolveError> {
    for slot in slots {
        let Some(controller) = *slot else {
            continue;
        };
        let temporary = store
            .controller_origin(controller)
            .map_or(false, |origin| container.is_temporary_asset(origin));
        if temporary {
            let clone = deep_clone_controller(store, container, controller, config, diagnostics)?;
            *slot = Some(AnyController::Animator(clone));
        }
    }
    Ok(())
}
