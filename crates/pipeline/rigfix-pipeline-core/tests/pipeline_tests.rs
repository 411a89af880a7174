use rigfix_animation::{AnyController, AssetContainer, AssetStore, Binding, Clip, ClipId, Curve, Motion};
use rigfix_hierarchy::{NodeId, SceneGraph};
use rigfix_pipeline::{
    fix_full_controllers, resolve_full_controllers, run_build, AnimationLayerSlot, BuildContext,
    ControllerEntry, FullController, LayerType, PipelineConfig, PipelineSession, ResolverMarker,
    RewriteEntry, MARKER_COMPONENT,
};
use rigfix_resolver::AnimationResolver;
use rigfix_test_fixtures::{builders, clips, rigs};

struct Avatar {
    ctx: BuildContext,
    walk: ClipId,
    brim: ClipId,
}

fn node(ctx: &BuildContext, path: &str) -> NodeId {
    ctx.hierarchy
        .resolve_node_by_path(ctx.avatar_root, path)
        .unwrap_or_else(|| panic!("no node at '{path}'"))
}

fn clip_of(store: &AssetStore, controller: AnyController) -> ClipId {
    let AnyController::Animator(id) = controller else {
        panic!("expected a plain controller");
    };
    let state = store.controller_states(id).unwrap()[0];
    match store.state(state).unwrap().motion {
        Some(Motion::Clip(clip)) => clip,
        other => panic!("expected a clip motion, got {other:?}"),
    }
}

/// Avatar with a marker on the root, a hat outfit full controller and an FX base layer.
fn avatar() -> Avatar {
    let (mut hierarchy, root) = rigs::load("avatar").unwrap();
    hierarchy.add_component(root, MARKER_COMPONENT).unwrap();
    let hat = hierarchy.resolve_node_by_path(root, "Hat").unwrap();

    let mut store = AssetStore::new();
    let walk = store.add_clip(clips::load("walk").unwrap());
    let brim = store.add_clip(Clip::new("tip hat").with_float_curve(
        Binding::transform("Brim", "localEulerAnglesRaw.x"),
        Curve::from_points(&[(0.0, 0.0), (0.5, 15.0)]),
    ));
    let locomotion = builders::clip_controller(&mut store, "Locomotion", &[walk]);
    let outfit = builders::clip_controller(&mut store, "Hat", &[brim]);

    let mut ctx = BuildContext::new(hierarchy, store, root, AssetContainer::transient());
    ctx.marker = Some(ResolverMarker::new(root));
    let mut fc = FullController::new(hat);
    fc.controllers.push(ControllerEntry {
        controller: AnyController::Animator(outfit),
        layer_type: LayerType::Fx,
    });
    fc.rewrite_bindings.push(RewriteEntry {
        from: "Feather".into(),
        to: String::new(),
        delete: true,
    });
    ctx.full_controllers.push(fc);
    ctx.base_layers = vec![
        AnimationLayerSlot::new(LayerType::Base, Some(AnyController::Animator(locomotion))),
        AnimationLayerSlot::new(LayerType::Action, None),
    ];
    Avatar { ctx, walk, brim }
}

fn rename_bones(ctx: &mut BuildContext) -> anyhow::Result<()> {
    let leg = node(ctx, "Root/Leg");
    ctx.hierarchy.rename(leg, "Leg_L")?;
    let brim = node(ctx, "Hat/Brim");
    ctx.hierarchy.rename(brim, "Rim")?;
    Ok(())
}

/// it should fix full controllers and base layers after the upstream step renamed bones
#[test]
fn build_fixes_everything_after_upstream() {
    let Avatar { mut ctx, walk, brim } = avatar();
    let report = run_build(&mut ctx, &PipelineConfig::default(), rename_bones).unwrap();
    assert!(report.diagnostics.is_empty());

    let fc = &ctx.full_controllers[0];
    assert!(fc.rewrite_bindings.is_empty());
    let fixed_brim = clip_of(&ctx.store, fc.controllers[0].controller);
    assert_ne!(fixed_brim, brim);
    let paths: Vec<&str> = ctx.store.clip(fixed_brim).unwrap().bindings().map(|b| b.path.as_str()).collect();
    assert_eq!(paths, vec!["Rim"]);

    let base = ctx.base_layers[0].controller.unwrap();
    let fixed_walk = clip_of(&ctx.store, base);
    assert_ne!(fixed_walk, walk);
    assert!(ctx.store.clip(fixed_walk).unwrap().bindings().all(|b| b.path == "Root/Leg_L"));
    assert_eq!(ctx.base_layers[1].controller, None);

    assert!(ctx.marker.is_none());
    assert!(!ctx.hierarchy.has_component(ctx.avatar_root, MARKER_COMPONENT));
}

/// it should leave full controllers alone when the marker disables binding fixes
#[test]
fn disabled_marker_skips_full_controllers() {
    let Avatar { mut ctx, brim, .. } = avatar();
    if let Some(marker) = ctx.marker.as_mut() {
        marker.fix_animation_bindings = false;
    }
    let before = ctx.full_controllers[0].controllers[0].controller;

    run_build(&mut ctx, &PipelineConfig::default(), rename_bones).unwrap();

    let fc = &ctx.full_controllers[0];
    assert_eq!(fc.controllers[0].controller, before);
    assert_eq!(fc.rewrite_bindings.len(), 1);
    assert_eq!(clip_of(&ctx.store, before), brim);
    assert!(ctx.marker.is_some());
}

/// it should skip passes turned off in the config
#[test]
fn disabled_base_layer_pass() {
    let Avatar { mut ctx, walk, .. } = avatar();
    let config = PipelineConfig {
        base_layers: false,
        ..PipelineConfig::default()
    };
    let before = ctx.base_layers[0].controller;
    run_build(&mut ctx, &config, rename_bones).unwrap();
    assert_eq!(ctx.base_layers[0].controller, before);
    assert_eq!(clip_of(&ctx.store, before.unwrap()), walk);
}

/// it should turn delete entries into ignore rules and rewrite the rest
#[test]
fn rewrite_entries_drive_the_resolver() {
    let (hierarchy, root) = rigs::load("avatar").unwrap();
    let mut store = AssetStore::new();
    let wave = store.add_clip(clips::load("wave").unwrap());
    let layer = builders::clip_layer(&mut store, "Gesture", wave);
    let gestures = builders::ControllerBuilder::new("Gestures").layer(layer).build(&mut store);

    let mut ctx = BuildContext::new(hierarchy, store, root, AssetContainer::transient());
    ctx.marker = Some(ResolverMarker::new(root));
    let mut fc = FullController::new(root);
    fc.controllers.push(ControllerEntry {
        controller: AnyController::Animator(gestures),
        layer_type: LayerType::Gesture,
    });
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
    ctx.full_controllers.push(fc);

    let mut session = PipelineSession::new();
    resolve_full_controllers(&mut session, &ctx).unwrap();
    assert!(session.is_resolved());
    let index = session.resolver().unwrap().index();
    assert!(index.get("Body/Eyes/Left").is_some());
    assert!(index.get("Hat/Brim").is_none());

    fix_full_controllers(&mut session, &mut ctx).unwrap();
    assert!(!session.is_resolved());
    assert!(session.resolver().is_none());

    // transient clip and controller are edited in place
    assert_eq!(
        ctx.full_controllers[0].controllers[0].controller,
        AnyController::Animator(gestures)
    );
    let first = ctx.store.clip(wave).unwrap().bindings().next().unwrap().path.clone();
    assert_eq!(first, "Face/Eyes/Left");
}

/// it should replace a leftover resolver and renew the session id when finished
#[test]
fn session_lifecycle() {
    let (_, root) = rigs::load("avatar").unwrap();
    let mut session = PipelineSession::new();
    let first_id = session.id();

    session.begin(AnimationResolver::new(root, AssetContainer::transient()));
    session.mark_resolved();
    session.begin(AnimationResolver::new(root, AssetContainer::transient()));
    assert!(!session.is_resolved());
    assert!(session.resolver().is_some());

    let diagnostics = session.finish();
    assert!(diagnostics.is_empty());
    assert!(session.resolver().is_none());
    assert_ne!(session.id(), first_id);
}

/// it should surface upstream failures with context
#[test]
fn upstream_error_is_reported() {
    let Avatar { mut ctx, .. } = avatar();
    let err = run_build(&mut ctx, &PipelineConfig::default(), |_| anyhow::bail!("optimizer crashed"))
        .unwrap_err();
    assert_eq!(err.to_string(), "upstream build step");
    assert!(format!("{err:#}").contains("optimizer crashed"));
}

/// it should read a partial pipeline config with defaults
#[test]
fn partial_config_json() {
    let config: PipelineConfig = serde_json::from_str(r#"{ "base_layers": false }"#).unwrap();
    assert!(config.full_controllers);
    assert!(!config.base_layers);
}
