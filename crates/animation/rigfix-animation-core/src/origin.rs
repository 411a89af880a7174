//! Persisted vs transient assets.
//!
//! Persisted assets have a stable on-disk identity and must never be mutated; a
//! change produces a new asset instead. Transient assets (created during the current
//! build, or stored inside the build's own container asset) are safe to edit in place.

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AssetOrigin {
    #[default]
    Transient,
    Persisted {
        asset_path: String,
    },
}

impl AssetOrigin {
    pub fn persisted(asset_path: impl Into<String>) -> Self {
        AssetOrigin::Persisted {
            asset_path: asset_path.into(),
        }
    }

    #[inline]
    pub fn is_persistent(&self) -> bool {
        matches!(self, AssetOrigin::Persisted { .. })
    }

    pub fn asset_path(&self) -> Option<&str> {
        match self {
            AssetOrigin::Transient => None,
            AssetOrigin::Persisted { asset_path } => Some(asset_path),
        }
    }

    /// True when persisted under a path containing any of `markers` or starting with
    /// any of `prefixes`.
    pub fn matches_path(&self, markers: &[String], prefixes: &[String]) -> bool {
        match self.asset_path() {
            Some(path) => {
                markers.iter().any(|m| path.contains(m.as_str()))
                    || prefixes.iter().any(|p| path.starts_with(p.as_str()))
            }
            None => false,
        }
    }
}

/// The asset that receives objects generated during a build session.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetContainer {
    pub origin: AssetOrigin,
}

impl AssetContainer {
    pub fn transient() -> Self {
        Self {
            origin: AssetOrigin::Transient,
        }
    }

    pub fn persisted(asset_path: impl Into<String>) -> Self {
        Self {
            origin: AssetOrigin::persisted(asset_path),
        }
    }

    #[inline]
    pub fn is_persistent(&self) -> bool {
        self.origin.is_persistent()
    }

    /// An object is temporary when it is not persisted, or persisted inside this container.
    pub fn is_temporary_asset(&self, origin: &AssetOrigin) -> bool {
        match origin {
            AssetOrigin::Transient => true,
            AssetOrigin::Persisted { asset_path } => {
                self.origin.asset_path() == Some(asset_path.as_str())
            }
        }
    }

    /// Origin given to objects created for this container.
    pub fn origin_for_new(&self) -> AssetOrigin {
        self.origin.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn temporary_asset_classification() {
        let container = AssetContainer::persisted("Assets/_Build/avatar.asset");
        assert!(container.is_temporary_asset(&AssetOrigin::Transient));
        assert!(container.is_temporary_asset(&AssetOrigin::persisted("Assets/_Build/avatar.asset")));
        assert!(!container.is_temporary_asset(&AssetOrigin::persisted("Assets/Anim/walk.anim")));

        let scratch = AssetContainer::transient();
        assert!(!scratch.is_temporary_asset(&AssetOrigin::persisted("Assets/Anim/walk.anim")));
        assert_eq!(scratch.origin_for_new(), AssetOrigin::Transient);
    }

    #[test]
    fn path_markers() {
        let proxy = AssetOrigin::persisted("Packages/sdk/Samples/ProxyAnim/proxy_stand.anim");
        let markers = vec!["/ProxyAnim/proxy".to_string()];
        assert!(proxy.matches_path(&markers, &[]));
        assert!(!AssetOrigin::Transient.matches_path(&markers, &[]));
        assert!(proxy.matches_path(&[], &["Packages/sdk".to_string()]));
    }
}
