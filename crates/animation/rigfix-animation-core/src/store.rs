//! Arena holding every clip, controller and graph object of a build.

use hashbrown::{HashMap, HashSet};

use crate::asset::OpaqueAsset;
use crate::behavior::Behavior;
use crate::clip::Clip;
use crate::controller::{BlendTree, Controller, OverrideController, State, StateMachine, Transition};
use crate::error::AssetError;
use crate::ids::{
    AnyController, AssetId, BehaviorId, BlendTreeId, ClipId, ControllerId, IdAllocator, Motion,
    ObjectRef, OverrideControllerId, StateId, StateMachineId, TransitionId,
};
use crate::origin::AssetOrigin;

macro_rules! arena_accessors {
    ($( $field:ident: $id:ident => $ty:ty, $variant:ident {
        get: $get:ident, get_mut: $get_mut:ident, add: $add:ident, insert: $insert:ident
    } );* $(;)?) => {
        $(
            pub fn $get(&self, id: $id) -> Result<&$ty, AssetError> {
                self.$field
                    .get(&id)
                    .ok_or(AssetError::Missing(ObjectRef::$variant(id)))
            }

            pub fn $get_mut(&mut self, id: $id) -> Result<&mut $ty, AssetError> {
                self.$field
                    .get_mut(&id)
                    .ok_or(AssetError::Missing(ObjectRef::$variant(id)))
            }

            pub fn $add(&mut self, value: $ty) -> $id {
                let id: $id = self.alloc.alloc();
                self.$field.insert(id, value);
                id
            }

            /// Store `value` under an id obtained from [`AssetStore::reserve`].
            pub fn $insert(&mut self, id: $id, value: $ty) {
                self.$field.insert(id, value);
            }
        )*
    };
}

#[derive(Debug, Default, Clone)]
pub struct AssetStore {
    alloc: IdAllocator,
    clips: HashMap<ClipId, Clip>,
    blend_trees: HashMap<BlendTreeId, BlendTree>,
    states: HashMap<StateId, State>,
    state_machines: HashMap<StateMachineId, StateMachine>,
    transitions: HashMap<TransitionId, Transition>,
    behaviors: HashMap<BehaviorId, Behavior>,
    controllers: HashMap<ControllerId, Controller>,
    override_controllers: HashMap<OverrideControllerId, OverrideController>,
    assets: HashMap<AssetId, OpaqueAsset>,
}

impl AssetStore {
    pub fn new() -> Self {
        Self::default()
    }

    arena_accessors! {
        clips: ClipId => Clip, Clip {
            get: clip, get_mut: clip_mut, add: add_clip, insert: insert_clip
        };
        blend_trees: BlendTreeId => BlendTree, BlendTree {
            get: blend_tree, get_mut: blend_tree_mut, add: add_blend_tree, insert: insert_blend_tree
        };
        states: StateId => State, State {
            get: state, get_mut: state_mut, add: add_state, insert: insert_state
        };
        state_machines: StateMachineId => StateMachine, StateMachine {
            get: state_machine, get_mut: state_machine_mut, add: add_state_machine, insert: insert_state_machine
        };
        transitions: TransitionId => Transition, Transition {
            get: transition, get_mut: transition_mut, add: add_transition, insert: insert_transition
        };
        behaviors: BehaviorId => Behavior, Behavior {
            get: behavior, get_mut: behavior_mut, add: add_behavior, insert: insert_behavior
        };
        controllers: ControllerId => Controller, Controller {
            get: controller, get_mut: controller_mut, add: add_controller, insert: insert_controller
        };
        override_controllers: OverrideControllerId => OverrideController, OverrideController {
            get: override_controller, get_mut: override_controller_mut,
            add: add_override_controller, insert: insert_override_controller
        };
        assets: AssetId => OpaqueAsset, Asset {
            get: asset, get_mut: asset_mut, add: add_asset, insert: insert_asset
        };
    }

    /// Allocate an id without storing anything yet. Used by the cloner to register a
    /// clone before its fields (which may point back at it) are filled in.
    pub fn reserve<I: From<u32>>(&mut self) -> I {
        self.alloc.alloc()
    }

    pub fn contains(&self, obj: ObjectRef) -> bool {
        match obj {
            ObjectRef::Clip(id) => self.clips.contains_key(&id),
            ObjectRef::BlendTree(id) => self.blend_trees.contains_key(&id),
            ObjectRef::State(id) => self.states.contains_key(&id),
            ObjectRef::StateMachine(id) => self.state_machines.contains_key(&id),
            ObjectRef::Transition(id) => self.transitions.contains_key(&id),
            ObjectRef::Behavior(id) => self.behaviors.contains_key(&id),
            ObjectRef::Controller(id) => self.controllers.contains_key(&id),
            ObjectRef::OverrideController(id) => self.override_controllers.contains_key(&id),
            ObjectRef::Asset(id) => self.assets.contains_key(&id),
        }
    }

    pub fn clip_count(&self) -> usize {
        self.clips.len()
    }

    pub fn state_machine_count(&self) -> usize {
        self.state_machines.len()
    }

    /// Display name of an object, where the kind has one.
    pub fn name(&self, obj: ObjectRef) -> Option<&str> {
        match obj {
            ObjectRef::Clip(id) => self.clips.get(&id).map(|c| c.name.as_str()),
            ObjectRef::BlendTree(id) => self.blend_trees.get(&id).map(|b| b.name.as_str()),
            ObjectRef::State(id) => self.states.get(&id).map(|s| s.name.as_str()),
            ObjectRef::StateMachine(id) => self.state_machines.get(&id).map(|s| s.name.as_str()),
            ObjectRef::Controller(id) => self.controllers.get(&id).map(|c| c.name.as_str()),
            ObjectRef::OverrideController(id) => {
                self.override_controllers.get(&id).map(|c| c.name.as_str())
            }
            ObjectRef::Asset(id) => self.assets.get(&id).map(|a| a.name.as_str()),
            ObjectRef::Transition(_) | ObjectRef::Behavior(_) => None,
        }
    }

    /// Storage origin of a top-level asset. Graph-internal objects (states, transitions...)
    /// live inside their controller and report `None`.
    pub fn origin(&self, obj: ObjectRef) -> Option<&AssetOrigin> {
        match obj {
            ObjectRef::Clip(id) => self.clips.get(&id).map(|c| &c.origin),
            ObjectRef::Controller(id) => self.controllers.get(&id).map(|c| &c.origin),
            ObjectRef::OverrideController(id) => self.override_controllers.get(&id).map(|c| &c.origin),
            ObjectRef::Asset(id) => self.assets.get(&id).map(|a| &a.origin),
            _ => None,
        }
    }

    pub fn controller_name(&self, controller: AnyController) -> Option<&str> {
        self.name(controller.into())
    }

    pub fn controller_origin(&self, controller: AnyController) -> Option<&AssetOrigin> {
        self.origin(controller.into())
    }

    // ---------- traversal ----------

    /// Depth-first walk of `root` and every nested state machine. Each machine is
    /// yielded once even when reachable through several parents.
    pub fn walk_state_machines(&self, root: StateMachineId) -> Result<Vec<StateMachineId>, AssetError> {
        let mut visited = HashSet::new();
        let mut out = Vec::new();
        self.walk_state_machines_into(root, &mut visited, &mut out)?;
        Ok(out)
    }

    fn walk_state_machines_into(
        &self,
        id: StateMachineId,
        visited: &mut HashSet<StateMachineId>,
        out: &mut Vec<StateMachineId>,
    ) -> Result<(), AssetError> {
        if !visited.insert(id) {
            return Ok(());
        }
        out.push(id);
        for &child in &self.state_machine(id)?.state_machines {
            self.walk_state_machines_into(child, visited, out)?;
        }
        Ok(())
    }

    /// Every state under `root`, nested machines included.
    pub fn states_in(&self, root: StateMachineId) -> Result<Vec<StateId>, AssetError> {
        let mut out = Vec::new();
        for sm in self.walk_state_machines(root)? {
            out.extend(self.state_machine(sm)?.states.iter().copied());
        }
        Ok(out)
    }

    /// Root state machines of every layer, in layer order.
    pub fn controller_state_machines(&self, controller: ControllerId) -> Result<Vec<StateMachineId>, AssetError> {
        Ok(self
            .controller(controller)?
            .layers
            .iter()
            .filter_map(|l| l.state_machine)
            .collect())
    }

    /// Every state reachable from any layer, each once.
    pub fn controller_states(&self, controller: ControllerId) -> Result<Vec<StateId>, AssetError> {
        let mut visited = HashSet::new();
        let mut machines = Vec::new();
        for root in self.controller_state_machines(controller)? {
            self.walk_state_machines_into(root, &mut visited, &mut machines)?;
        }
        let mut out = Vec::new();
        for sm in machines {
            out.extend(self.state_machine(sm)?.states.iter().copied());
        }
        Ok(out)
    }

    /// Clips played by `motion`, descending through blend trees.
    pub fn motion_clips(&self, motion: Motion) -> Result<Vec<ClipId>, AssetError> {
        let mut out = Vec::new();
        let mut trees = HashSet::new();
        self.motion_clips_into(motion, &mut trees, &mut out)?;
        Ok(out)
    }

    fn motion_clips_into(
        &self,
        motion: Motion,
        trees: &mut HashSet<BlendTreeId>,
        out: &mut Vec<ClipId>,
    ) -> Result<(), AssetError> {
        match motion {
            Motion::Clip(clip) => out.push(clip),
            Motion::BlendTree(tree) => {
                if !trees.insert(tree) {
                    return Ok(());
                }
                for child in &self.blend_tree(tree)?.children {
                    self.motion_clips_into(child.motion, trees, out)?;
                }
            }
        }
        Ok(())
    }

    /// Distinct clips a controller can play, in first-seen order: state motions of every
    /// layer plus synced-layer motion overrides. For override controllers the base
    /// controller's clips are substituted through the override list.
    pub fn controller_clips(&self, controller: AnyController) -> Result<Vec<ClipId>, AssetError> {
        let (base, overrides) = match controller {
            AnyController::Animator(id) => (id, None),
            AnyController::Override(id) => {
                let oc = self.override_controller(id)?;
                match oc.base {
                    Some(base) => (base, Some(oc)),
                    None => return Ok(Vec::new()),
                }
            }
        };

        let mut motions = Vec::new();
        for state in self.controller_states(base)? {
            if let Some(motion) = self.state(state)?.motion {
                motions.push(motion);
            }
        }
        for layer in &self.controller(base)?.layers {
            motions.extend(layer.motion_overrides.iter().map(|o| o.motion));
        }

        let mut trees = HashSet::new();
        let mut raw = Vec::new();
        for motion in motions {
            self.motion_clips_into(motion, &mut trees, &mut raw)?;
        }

        let mut seen = HashSet::new();
        Ok(raw
            .into_iter()
            .map(|clip| overrides.and_then(|oc| oc.override_for(clip)).unwrap_or(clip))
            .filter(|clip| seen.insert(*clip))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::{ChildMotion, Layer};

    #[test]
    fn missing_ids_report_the_object() {
        let store = AssetStore::new();
        assert_eq!(
            store.clip(ClipId(9)).unwrap_err(),
            AssetError::Missing(ObjectRef::Clip(ClipId(9)))
        );
    }

    #[test]
    fn reserved_ids_are_filled_later() {
        let mut store = AssetStore::new();
        let id: StateId = store.reserve();
        assert!(!store.contains(ObjectRef::State(id)));
        store.insert_state(id, State::new("Idle", None));
        assert_eq!(store.state(id).unwrap().name, "Idle");
    }

    #[test]
    fn walk_tolerates_cycles_between_machines() {
        let mut store = AssetStore::new();
        let a = store.add_state_machine(StateMachine::new("A"));
        let b = store.add_state_machine(StateMachine::new("B"));
        store.state_machine_mut(a).unwrap().state_machines.push(b);
        store.state_machine_mut(b).unwrap().state_machines.push(a);
        assert_eq!(store.walk_state_machines(a).unwrap(), vec![a, b]);
    }

    #[test]
    fn controller_clips_descend_blend_trees_and_dedup() {
        let mut store = AssetStore::new();
        let walk = store.add_clip(Clip::new("walk"));
        let run = store.add_clip(Clip::new("run"));
        let tree = store.add_blend_tree(BlendTree {
            name: "Move".into(),
            children: vec![
                ChildMotion::new(Motion::Clip(walk), 0.0),
                ChildMotion::new(Motion::Clip(run), 1.0),
            ],
            ..BlendTree::default()
        });
        let s1 = store.add_state(State::with_clip("Walk", walk));
        let s2 = store.add_state(State::new("Move", Some(Motion::BlendTree(tree))));
        let mut sm = StateMachine::new("Base");
        sm.states = vec![s1, s2];
        let sm = store.add_state_machine(sm);
        let mut controller = Controller::new("Locomotion");
        controller.layers.push(Layer::new("Base", sm));
        let controller = store.add_controller(controller);

        let clips = store.controller_clips(AnyController::Animator(controller)).unwrap();
        assert_eq!(clips, vec![walk, run]);

        let sprint = store.add_clip(Clip::new("sprint"));
        let mut oc = OverrideController::new("Fast", controller);
        oc.set_override(run, sprint);
        let oc = store.add_override_controller(oc);
        let clips = store.controller_clips(AnyController::Override(oc)).unwrap();
        assert_eq!(clips, vec![walk, sprint]);
    }
}
