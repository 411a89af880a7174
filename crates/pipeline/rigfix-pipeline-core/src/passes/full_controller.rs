use anyhow::Result;
use rigfix_hierarchy::SceneGraph;
use rigfix_resolver::{AnimationResolver, Diagnostic, ResolverConfig};

use crate::config::resolver_config;
use crate::context::{BuildContext, MARKER_COMPONENT};
use crate::session::PipelineSession;

/// Ingest every controller of every full-controller component.
pub fn resolve_full_controllers(session: &mut PipelineSession, ctx: &BuildContext) -> Result<()> {
    let Some(marker) = ctx.active_marker() else {
        log::info!("resolve full controllers > not fixing animation bindings, skipping");
        return Ok(());
    };

    let config = ResolverConfig {
        fix_transform_curves: marker.fix_transform_animations,
        ..resolver_config()
    };
    let resolver = session.begin(AnimationResolver::with_config(
        ctx.avatar_root,
        ctx.container.clone(),
        config,
    ));

    if ctx.full_controllers.is_empty() {
        log::info!("resolve full controllers > no full controller components found");
    }
    for fc in &ctx.full_controllers {
        let (rewrites, ignores) = fc.rules();
        let root = fc.resolve_root();
        for entry in &fc.controllers {
            resolver.add(&ctx.hierarchy, &ctx.store, entry.controller, Some(root), &rewrites, &ignores)?;
        }
    }

    session.mark_resolved();
    Ok(())
}

/// Fix every ingested controller in place on its component, clear the component's
/// rewrite list, remove the marker and end the session. Does nothing unless
/// [`resolve_full_controllers`] completed in this session.
pub fn fix_full_controllers(session: &mut PipelineSession, ctx: &mut BuildContext) -> Result<Vec<Diagnostic>> {
    if !session.is_resolved() {
        return Ok(Vec::new());
    }
    let Some(resolver) = session.resolver_mut() else {
        return Ok(Vec::new());
    };

    if ctx.active_marker().is_some() {
        for fc in &mut ctx.full_controllers {
            let root = fc.resolve_root();
            for entry in &mut fc.controllers {
                entry.controller = resolver.fix(&ctx.hierarchy, &mut ctx.store, entry.controller, Some(root))?;
            }
            fc.rewrite_bindings.clear();
            log::info!(
                "fix full controllers > full controller at path '{}' fixed",
                ctx.hierarchy.current_path(fc.node, ctx.avatar_root).unwrap_or_default()
            );
        }
    } else {
        log::info!("fix full controllers > not fixing animation bindings, skipping");
    }

    if let Some(marker) = ctx.marker.take() {
        ctx.hierarchy.remove_component(marker.node, MARKER_COMPONENT)?;
    }
    Ok(session.finish())
}
