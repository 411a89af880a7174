//! Controller graph: layers, state machines, states, transitions and blend trees.
//!
//! Graph objects refer to each other by arena id only; the owning [`crate::AssetStore`]
//! resolves them. Sharing (two layers pointing at one state machine) and cycles are
//! therefore representable without reference counting.

use serde::{Deserialize, Serialize};

use crate::ids::{AssetId, BehaviorId, ClipId, ControllerId, Motion, StateId, StateMachineId, TransitionId};
use crate::origin::AssetOrigin;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParameterKind {
    Float,
    Int,
    Bool,
    Trigger,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    pub kind: ParameterKind,
    #[serde(default)]
    pub default_float: f32,
    #[serde(default)]
    pub default_int: i32,
    #[serde(default)]
    pub default_bool: bool,
}

impl Parameter {
    pub fn new(name: impl Into<String>, kind: ParameterKind) -> Self {
        Self {
            name: name.into(),
            kind,
            default_float: 0.0,
            default_int: 0,
            default_bool: false,
        }
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlendingMode {
    #[default]
    Override,
    Additive,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MotionOverride {
    pub state: StateId,
    pub motion: Motion,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BehaviorOverride {
    pub state: StateId,
    pub behaviors: Vec<BehaviorId>,
}

/// Sentinel for "not a synced layer".
pub const NO_SYNCED_LAYER: i32 = -1;

fn no_synced_layer() -> i32 {
    NO_SYNCED_LAYER
}

fn unit_weight() -> f32 {
    1.0
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    pub name: String,
    pub state_machine: Option<StateMachineId>,
    #[serde(default)]
    pub avatar_mask: Option<AssetId>,
    #[serde(default)]
    pub blending_mode: BlendingMode,
    #[serde(default = "unit_weight")]
    pub default_weight: f32,
    /// Index of the layer whose topology this one mirrors, or [`NO_SYNCED_LAYER`].
    #[serde(default = "no_synced_layer")]
    pub synced_layer_index: i32,
    #[serde(default)]
    pub synced_layer_affects_timing: bool,
    #[serde(default)]
    pub ik_pass: bool,
    /// Per-state motion replacements; only meaningful on synced layers.
    #[serde(default)]
    pub motion_overrides: Vec<MotionOverride>,
    #[serde(default)]
    pub behavior_overrides: Vec<BehaviorOverride>,
}

impl Layer {
    pub fn new(name: impl Into<String>, state_machine: StateMachineId) -> Self {
        Self {
            name: name.into(),
            state_machine: Some(state_machine),
            avatar_mask: None,
            blending_mode: BlendingMode::Override,
            default_weight: 1.0,
            synced_layer_index: NO_SYNCED_LAYER,
            synced_layer_affects_timing: false,
            ik_pass: false,
            motion_overrides: Vec::new(),
            behavior_overrides: Vec::new(),
        }
    }

    /// Synced-layer index as a usable position, if this layer mirrors another one.
    pub fn synced_layer(&self) -> Option<usize> {
        usize::try_from(self.synced_layer_index).ok()
    }

    pub fn override_motion(&self, state: StateId) -> Option<Motion> {
        self.motion_overrides
            .iter()
            .find(|o| o.state == state)
            .map(|o| o.motion)
    }

    pub fn set_override_motion(&mut self, state: StateId, motion: Motion) {
        match self.motion_overrides.iter_mut().find(|o| o.state == state) {
            Some(existing) => existing.motion = motion,
            None => self.motion_overrides.push(MotionOverride { state, motion }),
        }
    }

    pub fn override_behaviors(&self, state: StateId) -> Option<&[BehaviorId]> {
        self.behavior_overrides
            .iter()
            .find(|o| o.state == state)
            .map(|o| o.behaviors.as_slice())
    }

    pub fn set_override_behaviors(&mut self, state: StateId, behaviors: Vec<BehaviorId>) {
        match self.behavior_overrides.iter_mut().find(|o| o.state == state) {
            Some(existing) => existing.behaviors = behaviors,
            None => self.behavior_overrides.push(BehaviorOverride { state, behaviors }),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct StateMachine {
    pub name: String,
    #[serde(default)]
    pub states: Vec<StateId>,
    #[serde(default)]
    pub state_machines: Vec<StateMachineId>,
    #[serde(default)]
    pub any_state_transitions: Vec<TransitionId>,
    #[serde(default)]
    pub entry_transitions: Vec<TransitionId>,
    #[serde(default)]
    pub default_state: Option<StateId>,
    #[serde(default)]
    pub behaviors: Vec<BehaviorId>,
}

impl StateMachine {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// No states and no nested machines.
    pub fn is_empty(&self) -> bool {
        self.states.is_empty() && self.state_machines.is_empty()
    }
}

fn unit_speed() -> f32 {
    1.0
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct State {
    pub name: String,
    #[serde(default)]
    pub motion: Option<Motion>,
    #[serde(default = "unit_speed")]
    pub speed: f32,
    #[serde(default)]
    pub write_defaults: bool,
    #[serde(default)]
    pub tag: String,
    #[serde(default)]
    pub behaviors: Vec<BehaviorId>,
    #[serde(default)]
    pub transitions: Vec<TransitionId>,
}

impl State {
    pub fn new(name: impl Into<String>, motion: Option<Motion>) -> Self {
        Self {
            name: name.into(),
            motion,
            speed: 1.0,
            write_defaults: true,
            tag: String::new(),
            behaviors: Vec::new(),
            transitions: Vec::new(),
        }
    }

    pub fn with_clip(name: impl Into<String>, clip: ClipId) -> Self {
        Self::new(name, Some(Motion::Clip(clip)))
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum Destination {
    State(StateId),
    StateMachine(StateMachineId),
    Exit,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConditionMode {
    If,
    IfNot,
    Greater,
    Less,
    Equals,
    NotEqual,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub mode: ConditionMode,
    pub parameter: String,
    #[serde(default)]
    pub threshold: f32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transition {
    pub destination: Destination,
    #[serde(default)]
    pub conditions: Vec<Condition>,
    #[serde(default)]
    pub has_exit_time: bool,
    #[serde(default)]
    pub exit_time: f32,
    #[serde(default)]
    pub duration: f32,
    #[serde(default)]
    pub mute: bool,
    #[serde(default)]
    pub solo: bool,
}

impl Transition {
    pub fn to(destination: Destination) -> Self {
        Self {
            destination,
            conditions: Vec::new(),
            has_exit_time: false,
            exit_time: 0.0,
            duration: 0.0,
            mute: false,
            solo: false,
        }
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlendType {
    #[default]
    Simple1D,
    SimpleDirectional2D,
    FreeformDirectional2D,
    FreeformCartesian2D,
    Direct,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChildMotion {
    pub motion: Motion,
    #[serde(default)]
    pub threshold: f32,
    #[serde(default)]
    pub position: [f32; 2],
    #[serde(default = "unit_speed")]
    pub time_scale: f32,
    #[serde(default)]
    pub direct_blend_parameter: Option<String>,
}

impl ChildMotion {
    pub fn new(motion: Motion, threshold: f32) -> Self {
        Self {
            motion,
            threshold,
            position: [0.0, 0.0],
            time_scale: 1.0,
            direct_blend_parameter: None,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BlendTree {
    pub name: String,
    #[serde(default)]
    pub blend_type: BlendType,
    #[serde(default)]
    pub blend_parameter: String,
    #[serde(default)]
    pub blend_parameter_y: String,
    #[serde(default)]
    pub children: Vec<ChildMotion>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Controller {
    pub name: String,
    #[serde(default)]
    pub parameters: Vec<Parameter>,
    #[serde(default)]
    pub layers: Vec<Layer>,
    #[serde(default)]
    pub origin: AssetOrigin,
}

impl Controller {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn parameter(&self, name: &str) -> Option<&Parameter> {
        self.parameters.iter().find(|p| p.name == name)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ClipOverride {
    pub original: ClipId,
    pub replacement: Option<ClipId>,
}

/// A controller variant that swaps clips of a base controller.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OverrideController {
    pub name: String,
    pub base: Option<ControllerId>,
    #[serde(default)]
    pub overrides: Vec<ClipOverride>,
    #[serde(default)]
    pub origin: AssetOrigin,
}

impl OverrideController {
    pub fn new(name: impl Into<String>, base: ControllerId) -> Self {
        Self {
            name: name.into(),
            base: Some(base),
            overrides: Vec::new(),
            origin: AssetOrigin::Transient,
        }
    }

    /// Replacement for `clip`, if one is set.
    pub fn override_for(&self, clip: ClipId) -> Option<ClipId> {
        self.overrides
            .iter()
            .find(|o| o.original == clip)
            .and_then(|o| o.replacement)
    }

    pub fn set_override(&mut self, original: ClipId, replacement: ClipId) {
        match self.overrides.iter_mut().find(|o| o.original == original) {
            Some(existing) => existing.replacement = Some(replacement),
            None => self.overrides.push(ClipOverride {
                original,
                replacement: Some(replacement),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layer_overrides_replace_existing_entries() {
        let mut layer = Layer::new("Synced", StateMachineId(0));
        layer.synced_layer_index = 0;
        layer.set_override_motion(StateId(3), Motion::Clip(ClipId(7)));
        layer.set_override_motion(StateId(3), Motion::Clip(ClipId(8)));
        assert_eq!(layer.motion_overrides.len(), 1);
        assert_eq!(layer.override_motion(StateId(3)), Some(Motion::Clip(ClipId(8))));
        assert_eq!(layer.override_motion(StateId(4)), None);
        assert_eq!(layer.synced_layer(), Some(0));
    }

    #[test]
    fn layer_defaults_from_json() {
        let layer: Layer = serde_json::from_str(r#"{ "name": "Base", "state_machine": 4 }"#).unwrap();
        assert_eq!(layer.synced_layer_index, NO_SYNCED_LAYER);
        assert_eq!(layer.synced_layer(), None);
        assert_eq!(layer.default_weight, 1.0);
        assert_eq!(layer.state_machine, Some(StateMachineId(4)));
    }
}
