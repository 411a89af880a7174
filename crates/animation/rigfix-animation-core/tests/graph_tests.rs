use rigfix_animation::{
    AnyController, AssetStore, Clip, Controller, Layer, Motion, OverrideController, State,
    StateMachine,
};

fn two_layers_sharing_a_sub_machine(store: &mut AssetStore) -> rigfix_animation::ControllerId {
    let wave = store.add_clip(Clip::new("wave"));
    let idle = store.add_clip(Clip::new("idle"));

    let wave_state = store.add_state(State::with_clip("Wave", wave));
    let mut shared = StateMachine::new("Gestures");
    shared.states.push(wave_state);
    let shared = store.add_state_machine(shared);

    let idle_state = store.add_state(State::with_clip("Idle", idle));
    let mut left = StateMachine::new("Left");
    left.states.push(idle_state);
    left.state_machines.push(shared);
    let left = store.add_state_machine(left);

    let mut right = StateMachine::new("Right");
    right.state_machines.push(shared);
    let right = store.add_state_machine(right);

    let mut controller = Controller::new("Gesture");
    controller.layers.push(Layer::new("Left", left));
    controller.layers.push(Layer::new("Right", right));
    store.add_controller(controller)
}

/// it should visit a state machine shared by two layers only once
#[test]
fn shared_sub_machine_states_are_listed_once() {
    let mut store = AssetStore::new();
    let controller = two_layers_sharing_a_sub_machine(&mut store);

    let states = store.controller_states(controller).unwrap();
    let names: Vec<_> = states
        .iter()
        .map(|s| store.state(*s).unwrap().name.clone())
        .collect();
    assert_eq!(names, vec!["Idle", "Wave"]);

    let clips = store.controller_clips(AnyController::Animator(controller)).unwrap();
    assert_eq!(clips.len(), 2);
}

/// it should report no clips for an override controller without a base
#[test]
fn override_without_base_has_no_clips() {
    let mut store = AssetStore::new();
    let base = two_layers_sharing_a_sub_machine(&mut store);
    let mut oc = OverrideController::new("Detached", base);
    oc.base = None;
    let oc = store.add_override_controller(oc);
    assert!(store.controller_clips(AnyController::Override(oc)).unwrap().is_empty());
}

/// it should include clips referenced only by synced-layer motion overrides
#[test]
fn synced_override_clips_are_listed() {
    let mut store = AssetStore::new();
    let controller = two_layers_sharing_a_sub_machine(&mut store);
    let alt = store.add_clip(Clip::new("wave_alt"));
    let first_state = store.controller_states(controller).unwrap()[0];

    let root = store.controller_state_machines(controller).unwrap()[0];
    let mut synced = Layer::new("Synced", root);
    synced.synced_layer_index = 0;
    synced.set_override_motion(first_state, Motion::Clip(alt));
    store.controller_mut(controller).unwrap().layers.push(synced);

    let clips = store.controller_clips(AnyController::Animator(controller)).unwrap();
    assert_eq!(clips.last(), Some(&alt));
}
