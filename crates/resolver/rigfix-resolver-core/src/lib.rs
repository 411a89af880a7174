//! rigfix resolver core
//!
//! Keeps animation bindings pointed at the right nodes after an upstream pass restructures
//! a rig hierarchy:
//!
//! - [`PathIndex`] resolves every binding path once, before the hierarchy is edited, and
//!   snapshots each node's rest pose.
//! - [`ClipRewriter`] recomputes current paths for those nodes and corrects transform
//!   channels whose rest pose drifted, cloning persisted clips instead of editing them.
//! - [`cloner`] deep-clones and merges controller graphs with a memoized clone map.
//! - [`AnimationResolver`] ties the above into the ingest/fix session the host drives.

pub mod clip_rewriter;
pub mod cloner;
pub mod config;
pub mod diagnostics;
pub mod drift;
pub mod error;
pub mod path_index;
pub mod resolver;

pub use clip_rewriter::{ClipRewriter, RewriteOutcome};
pub use cloner::{clone_layers, deep_clone_controller, CloneMap, ControllerMerger, DeepClone};
pub use config::{MergeOptions, ResolverConfig};
pub use diagnostics::{Diagnostic, DiagnosticKind, Diagnostics, DiagnosticsCfg, Severity};
pub use drift::TransformSnapshot;
pub use error::ResolveError;
pub use path_index::{IgnoreRule, IndexScope, IndexStats, PathIndex, RewriteRule};
pub use resolver::{AnimationResolver, SessionState};
