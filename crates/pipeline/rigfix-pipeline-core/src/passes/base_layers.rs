use anyhow::Result;
use rigfix_resolver::{AnimationResolver, Diagnostic};

use crate::config::resolver_config;
use crate::context::BuildContext;
use crate::session::PipelineSession;

/// Ingest the controllers of the base animation layers, with debug logging on.
pub fn resolve_base_layers(session: &mut PipelineSession, ctx: &BuildContext) -> Result<()> {
    let mut config = resolver_config();
    config.debug_logging = true;
    let resolver = AnimationResolver::with_config(ctx.avatar_root, ctx.container.clone(), config);
    let resolver = session.begin(resolver);

    for slot in &ctx.base_layers {
        if let Some(controller) = slot.controller {
            resolver.add(&ctx.hierarchy, &ctx.store, controller, None, &[], &[])?;
        }
    }
    session.mark_resolved();
    Ok(())
}

/// Replace each base layer's controller with its fixed version and end the session.
pub fn fix_base_layers(session: &mut PipelineSession, ctx: &mut BuildContext) -> Result<Vec<Diagnostic>> {
    let Some(resolver) = session.resolver_mut() else {
        return Ok(Vec::new());
    };

    for slot in &mut ctx.base_layers {
        let Some(controller) = slot.controller else {
            log::info!("{:?} is empty", slot.layer_type);
            continue;
        };
        log::info!("processing '{:?}' layer", slot.layer_type);
        slot.controller = Some(resolver.fix(&ctx.hierarchy, &mut ctx.store, controller, None)?);
    }
    Ok(session.finish())
}
