//! Resolver and merge configuration.

use rigfix_animation::BlendableLayer;
use serde::{Deserialize, Serialize};

/// Session-wide resolver settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Correct keyframe values of transform channels whose rest pose moved.
    pub fix_transform_curves: bool,
    /// Emit per-binding trace messages (rewrites, drift, applied offsets).
    pub debug_logging: bool,
    /// Appended to the name of a clip copied because its source is persisted.
    pub clip_suffix: String,
    /// Component-wise tolerance under which a drift offset counts as zero.
    pub drift_epsilon: f32,
    /// Asset-path substrings marking protected proxy clips.
    pub proxy_markers: Vec<String>,
    /// Asset-path prefixes marking protected proxy clips.
    pub proxy_prefixes: Vec<String>,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            fix_transform_curves: true,
            debug_logging: false,
            clip_suffix: " (resolved)".to_string(),
            drift_epsilon: 1e-5,
            proxy_markers: Vec::new(),
            proxy_prefixes: Vec::new(),
        }
    }
}

/// Options applied while merging one source controller into a combined one.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MergeOptions {
    /// When set, every cloned state gets this write-defaults value.
    pub write_defaults: Option<bool>,
    /// Force weight 1 on the first layer contributed by the source.
    pub force_first_layer_weight: bool,
    /// Layer-control behaviors remapped during pruning. `None` matches every playable.
    pub blendable_layer: Option<BlendableLayer>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg: ResolverConfig = serde_json::from_str(r#"{ "debug_logging": true }"#).unwrap();
        assert!(cfg.debug_logging);
        assert!(cfg.fix_transform_curves);
        assert_eq!(cfg.clip_suffix, " (resolved)");
        assert!(cfg.proxy_markers.is_empty());
        assert!(cfg.proxy_prefixes.is_empty());
    }
}
