//! rigfix pipeline
//!
//! Host-side orchestration of the resolver. A build runs the resolving phase of each
//! enabled pass, then the caller's upstream step (whatever renames, reparents or
//! optimizes the hierarchy), then the fixing phase, so that every controller leaves the
//! build pointing at the hierarchy as it ended up.

pub mod config;
pub mod context;
pub mod passes;
pub mod session;

use anyhow::{Context as _, Result};
use rigfix_resolver::Diagnostic;

pub use crate::config::{resolver_config, PipelineConfig, PROXY_MARKERS, PROXY_PREFIXES};
pub use crate::context::{
    AnimationLayerSlot, BuildContext, ControllerEntry, FullController, LayerType, ResolverMarker,
    RewriteEntry, MARKER_COMPONENT,
};
pub use crate::passes::{fix_base_layers, fix_full_controllers, resolve_base_layers, resolve_full_controllers};
pub use crate::session::PipelineSession;

/// What a build reported.
#[derive(Debug, Default, Clone)]
pub struct BuildReport {
    pub diagnostics: Vec<Diagnostic>,
}

/// Run the enabled passes around `upstream`.
pub fn run_build<F>(ctx: &mut BuildContext, config: &PipelineConfig, upstream: F) -> Result<BuildReport>
where
    F: FnOnce(&mut BuildContext) -> Result<()>,
{
    let mut full_controllers = PipelineSession::new();
    let mut base_layers = PipelineSession::new();

    if config.full_controllers {
        resolve_full_controllers(&mut full_controllers, ctx).context("resolving full controllers")?;
    }
    if config.base_layers {
        resolve_base_layers(&mut base_layers, ctx).context("resolving base layers")?;
    }

    upstream(ctx).context("upstream build step")?;

    let mut report = BuildReport::default();
    if config.full_controllers {
        let diagnostics = fix_full_controllers(&mut full_controllers, ctx).context("fixing full controllers")?;
        report.diagnostics.extend(diagnostics);
    }
    if config.base_layers {
        let diagnostics = fix_base_layers(&mut base_layers, ctx).context("fixing base layers")?;
        report.diagnostics.extend(diagnostics);
    }
    Ok(report)
}
