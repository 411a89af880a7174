//! Ingest/fix orchestration over one resolution session.

use std::time::Instant;

use hashbrown::{HashMap, HashSet};
use indexmap::IndexMap;
use rigfix_animation::{AnyController, AssetContainer, AssetStore, BlendTreeId, ClipId, ControllerId, Motion};
use rigfix_hierarchy::{NodeId, SceneGraph};

use crate::clip_rewriter::{ClipRewriter, RewriteOutcome};
use crate::cloner::deep_clone_controller;
use crate::config::ResolverConfig;
use crate::diagnostics::{Diagnostic, DiagnosticKind, Diagnostics, DiagnosticsCfg};
use crate::error::ResolveError;
use crate::path_index::{IgnoreRule, IndexScope, IndexStats, PathIndex, RewriteRule};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Ingesting,
    Fixing,
}

/// Resolves stale binding paths of controllers against an edited hierarchy.
///
/// Call [`add`](Self::add) for every controller before the hierarchy is edited, then
/// [`fix`](Self::fix) for each afterwards, then [`reset`](Self::reset).
#[derive(Debug)]
pub struct AnimationResolver {
    pub config: ResolverConfig,
    avatar_root: NodeId,
    container: AssetContainer,
    index: PathIndex,
    state: SessionState,
    diagnostics: Diagnostics,
    /// Clips rewritten earlier in this session and the clip that replaced each.
    rewritten: HashMap<ClipId, ClipId>,
    /// Clips produced by those rewrites.
    produced: HashSet<ClipId>,
}

impl AnimationResolver {
    pub fn new(avatar_root: NodeId, container: AssetContainer) -> Self {
        Self::with_config(avatar_root, container, ResolverConfig::default())
    }

    pub fn with_config(avatar_root: NodeId, container: AssetContainer, config: ResolverConfig) -> Self {
        Self {
            config,
            avatar_root,
            container,
            index: PathIndex::new(),
            state: SessionState::Idle,
            diagnostics: Diagnostics::new(DiagnosticsCfg::default()),
            rewritten: HashMap::new(),
            produced: HashSet::new(),
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn avatar_root(&self) -> NodeId {
        self.avatar_root
    }

    pub fn index(&self) -> &PathIndex {
        &self.index
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        self.diagnostics.items()
    }

    pub fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        self.diagnostics.take()
    }

    /// Drop the path index, snapshots and remembered rewrites; the next `add` starts a new
    /// session.
    pub fn reset(&mut self) {
        self.index.clear();
        self.rewritten.clear();
        self.produced.clear();
        self.state = SessionState::Idle;
    }

    /// Index every binding referenced by `controller`'s clips.
    pub fn add<G: SceneGraph>(
        &mut self,
        graph: &G,
        store: &AssetStore,
        controller: AnyController,
        root_override: Option<NodeId>,
        rewrites: &[RewriteRule],
        ignores: &[IgnoreRule],
    ) -> Result<IndexStats, ResolveError> {
        if self.state == SessionState::Fixing {
            self.diagnostics.warn(
                DiagnosticKind::ReentrantSession,
                "add called while a fix pass is unfinished; continuing",
            );
        }
        self.state = SessionState::Ingesting;

        if graph.resolve_node_by_path(self.avatar_root, "").is_none() {
            self.diagnostics.error(
                DiagnosticKind::MissingRoot,
                format!("avatar root {:?} is not in the hierarchy", self.avatar_root),
            );
            return Ok(IndexStats::default());
        }

        self.index.set_debug_logging(self.config.debug_logging);
        let scope = IndexScope {
            root: self.avatar_root,
            alt_root: root_override,
            rewrites,
            ignores,
        };
        let stats = self.index.index(graph, store, &[controller], scope)?;
        log::debug!(
            "indexed '{}': {} new, {} ignored, {} unresolved",
            store.controller_name(controller).unwrap_or_default(),
            stats.indexed,
            stats.ignored,
            stats.unresolved
        );
        Ok(stats)
    }

    /// Rewrite the clips of `controller` and return the controller to use from now on.
    /// Returns `controller` itself when no clip needed changes.
    pub fn fix<G: SceneGraph>(
        &mut self,
        graph: &G,
        store: &mut AssetStore,
        controller: AnyController,
        root_override: Option<NodeId>,
    ) -> Result<AnyController, ResolveError> {
        if self.state == SessionState::Idle {
            self.diagnostics.warn(
                DiagnosticKind::ReentrantSession,
                "fix called without a prior add in this session; continuing",
            );
        }
        self.state = SessionState::Fixing;

        let name = store.controller_name(controller).unwrap_or_default().to_string();
        let clips = store.controller_clips(controller)?;
        if self.config.debug_logging {
            log::debug!("'{name}' has {} animation clips", clips.len());
        }

        let mut modified: IndexMap<ClipId, ClipId> = IndexMap::new();
        {
            let mut rewriter = ClipRewriter {
                graph,
                index: &mut self.index,
                config: &self.config,
                container: &self.container,
                avatar_root: self.avatar_root,
                root_override,
            };
            for clip in clips {
                if modified.contains_key(&clip) {
                    continue;
                }
                // rewritten clips already carry their drift offsets
                if let Some(&done) = self.rewritten.get(&clip) {
                    if done != clip {
                        modified.insert(clip, done);
                    }
                    continue;
                }
                if self.produced.contains(&clip) {
                    continue;
                }
                if let RewriteOutcome::Rewritten(new_clip) = rewriter.rewrite(store, clip)? {
                    self.rewritten.insert(clip, new_clip);
                    self.produced.insert(new_clip);
                    modified.insert(clip, new_clip);
                }
            }
        }

        if modified.is_empty() {
            return Ok(controller);
        }

        let target = match controller {
            AnyController::Animator(id)
                if store
                    .controller_origin(controller)
                    .map_or(false, |origin| self.container.is_temporary_asset(origin)) =>
            {
                log::info!("modified controller '{name}'");
                id
            }
            _ => {
                let started = Instant::now();
                let clone =
                    deep_clone_controller(store, &self.container, controller, &self.config, &mut self.diagnostics)?;
                log::info!("cloned controller '{name}' in {}ms", started.elapsed().as_millis());
                clone
            }
        };

        repoint_motions(store, target, &modified)?;
        Ok(AnyController::Animator(target))
    }
}

/// Point every state, blend-tree child and synced-layer override that plays a rewritten
/// clip at its replacement.
fn repoint_motions(
    store: &mut AssetStore,
    controller: ControllerId,
    modified: &IndexMap<ClipId, ClipId>,
) -> Result<(), ResolveError> {
    let replace = |motion: Motion| match motion {
        Motion::Clip(clip) => modified.get(&clip).map(|&new_clip| Motion::Clip(new_clip)),
        Motion::BlendTree(_) => None,
    };

    let mut trees: Vec<BlendTreeId> = Vec::new();
    for state in store.controller_states(controller)? {
        let state = store.state_mut(state)?;
        match state.motion {
            Some(Motion::BlendTree(tree)) => trees.push(tree),
            Some(motion) => {
                if let Some(new_motion) = replace(motion) {
                    state.motion = Some(new_motion);
                }
            }
            None => {}
        }
    }

    for layer in &mut store.controller_mut(controller)?.layers {
        for o in &mut layer.motion_overrides {
            match o.motion {
                Motion::BlendTree(tree) => trees.push(tree),
                motion => {
                    if let Some(new_motion) = replace(motion) {
                        o.motion = new_motion;
                    }
                }
            }
        }
    }

    let mut visited = HashSet::new();
    while let Some(tree) = trees.pop() {
        if !visited.insert(tree) {
            continue;
        }
        for child in &mut store.blend_tree_mut(tree)?.children {
            match child.motion {
                Motion::BlendTree(nested) => trees.push(nested),
                motion => {
                    if let Some(new_motion) = replace(motion) {
                        child.motion = new_motion;
                    }
                }
            }
        }
    }
    Ok(())
}
