//! Two-phase passes. Each `resolve_*` ingests controllers into the session before the
//! hierarchy is edited; the matching `fix_*` rewrites them afterwards and ends the session.

pub mod base_layers;
pub mod full_controller;

pub use base_layers::{fix_base_layers, resolve_base_layers};
pub use full_controller::{fix_full_controllers, resolve_full_controllers};
