//! Small controller-graph builders for tests.

use rigfix_animation::{
    AssetOrigin, AssetStore, ClipId, Controller, ControllerId, Layer, Motion, Parameter,
    ParameterKind, State, StateId, StateMachine, StateMachineId,
};

/// Add a state machine holding one state per `(name, motion)`; the first state is the default.
pub fn state_machine(
    store: &mut AssetStore,
    name: &str,
    states: &[(&str, Option<Motion>)],
) -> (StateMachineId, Vec<StateId>) {
    let ids: Vec<StateId> = states
        .iter()
        .map(|(state_name, motion)| store.add_state(State::new(*state_name, *motion)))
        .collect();
    let mut sm = StateMachine::new(name);
    sm.default_state = ids.first().copied();
    sm.states = ids.clone();
    (store.add_state_machine(sm), ids)
}

/// Layer whose state machine plays `clip` from a single state.
pub fn clip_layer(store: &mut AssetStore, name: &str, clip: ClipId) -> Layer {
    let (sm, _) = state_machine(store, name, &[(name, Some(Motion::Clip(clip)))]);
    Layer::new(name, sm)
}

/// Layer with an empty state machine.
pub fn empty_layer(store: &mut AssetStore, name: &str) -> Layer {
    let sm = store.add_state_machine(StateMachine::new(name));
    Layer::new(name, sm)
}

pub struct ControllerBuilder {
    controller: Controller,
}

impl ControllerBuilder {
    pub fn new(name: &str) -> Self {
        Self {
            controller: Controller::new(name),
        }
    }

    pub fn persisted(mut self, asset_path: &str) -> Self {
        self.controller.origin = AssetOrigin::persisted(asset_path);
        self
    }

    pub fn parameter(mut self, name: &str, kind: ParameterKind) -> Self {
        self.controller.parameters.push(Parameter::new(name, kind));
        self
    }

    pub fn layer(mut self, layer: Layer) -> Self {
        self.controller.layers.push(layer);
        self
    }

    pub fn build(self, store: &mut AssetStore) -> ControllerId {
        store.add_controller(self.controller)
    }
}

/// Persisted controller with one layer per clip, named after the clip.
pub fn clip_controller(store: &mut AssetStore, name: &str, clips: &[ClipId]) -> ControllerId {
    let mut builder = ControllerBuilder::new(name).persisted(&format!("Assets/Controllers/{name}.controller"));
    for &clip in clips {
        let layer_name = store.clip(clip).map(|c| c.name.clone()).unwrap_or_default();
        builder = builder.layer(clip_layer(store, &layer_name, clip));
    }
    builder.build(store)
}
