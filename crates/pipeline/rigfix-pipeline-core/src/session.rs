//! Explicit per-pass session state.
//!
//! A pass ingests controllers in one phase and fixes them in a later one; the session
//! carries the resolver between the two and records whether ingest completed.

use rigfix_resolver::{AnimationResolver, Diagnostic};
use uuid::Uuid;

#[derive(Debug)]
pub struct PipelineSession {
    id: Uuid,
    resolver: Option<AnimationResolver>,
    resolved: bool,
}

impl Default for PipelineSession {
    fn default() -> Self {
        Self::new()
    }
}

impl PipelineSession {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            resolver: None,
            resolved: false,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Ingest finished and a fix is pending.
    pub fn is_resolved(&self) -> bool {
        self.resolved
    }

    pub fn resolver(&self) -> Option<&AnimationResolver> {
        self.resolver.as_ref()
    }

    pub fn resolver_mut(&mut self) -> Option<&mut AnimationResolver> {
        self.resolver.as_mut()
    }

    /// Install a fresh resolver. A resolver left over from an unfinished session is
    /// reported and replaced.
    pub fn begin(&mut self, resolver: AnimationResolver) -> &mut AnimationResolver {
        if self.resolver.is_some() {
            log::warn!(
                "[{}] previous resolver was not cleaned up; continuing with a new one",
                self.id
            );
        }
        self.resolved = false;
        self.resolver.insert(resolver)
    }

    pub fn mark_resolved(&mut self) {
        self.resolved = true;
    }

    /// Drop the resolver, clear the flags and start a new session id. Returns what the
    /// resolver reported during the session.
    pub fn finish(&mut self) -> Vec<Diagnostic> {
        let diagnostics = match self.resolver.take() {
            Some(mut resolver) => {
                resolver.reset();
                resolver.take_diagnostics()
            }
            None => Vec::new(),
        };
        log::debug!("[{}] session finished", self.id);
        self.resolved = false;
        self.id = Uuid::new_v4();
        diagnostics
    }
}
