use rigfix_resolver::ResolverConfig;
use serde::{Deserialize, Serialize};

/// Asset-path substrings of the avatar SDK's protected proxy clips.
pub const PROXY_MARKERS: &[&str] = &[
    "/AV3 Demo Assets/Animation/ProxyAnim/proxy",
    "/VRCSDK/Examples3/Animation/ProxyAnim/proxy",
];

/// Asset-path prefixes of packages whose clips are never rewritten or rebased.
pub const PROXY_PREFIXES: &[&str] = &["Packages/com.vrchat."];

/// Which passes [`crate::run_build`] runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Ingest full-controller components before the upstream step and fix them after.
    pub full_controllers: bool,
    /// Patch the base animation layers around the upstream optimizer.
    pub base_layers: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            full_controllers: true,
            base_layers: true,
        }
    }
}

/// Resolver settings for build passes: defaults plus the avatar SDK's proxy clips.
pub fn resolver_config() -> ResolverConfig {
    ResolverConfig {
        proxy_markers: PROXY_MARKERS.iter().map(|m| m.to_string()).collect(),
        proxy_prefixes: PROXY_PREFIXES.iter().map(|p| p.to_string()).collect(),
        ..ResolverConfig::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rigfix_animation::AssetOrigin;

    #[test]
    fn sdk_proxy_clips_are_recognised() {
        let cfg = resolver_config();
        let proxy = AssetOrigin::persisted(
            "Packages/com.vrchat.avatars/Samples/AV3 Demo Assets/Animation/ProxyAnim/proxy_stand_still.anim",
        );
        assert!(proxy.matches_path(&cfg.proxy_markers, &cfg.proxy_prefixes));
        let own = AssetOrigin::persisted("Assets/Animations/walk.anim");
        assert!(!own.matches_path(&cfg.proxy_markers, &cfg.proxy_prefixes));
        assert!(cfg.fix_transform_curves);
    }
}
