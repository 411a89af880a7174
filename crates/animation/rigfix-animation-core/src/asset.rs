//! Leaf assets referenced from the animation graph but never part of it.

use serde::{Deserialize, Serialize};

use crate::origin::AssetOrigin;

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AssetKind {
    Texture,
    Material,
    Script,
    AvatarMask,
    /// Script-defined data object of an arbitrary user type.
    ScriptableObject { type_name: String },
    /// Anything else (meshes, audio...). Not expected inside a controller graph.
    Other { type_name: String },
}

impl AssetKind {
    pub fn type_name(&self) -> &str {
        match self {
            AssetKind::Texture => "Texture",
            AssetKind::Material => "Material",
            AssetKind::Script => "Script",
            AssetKind::AvatarMask => "AvatarMask",
            AssetKind::ScriptableObject { type_name } | AssetKind::Other { type_name } => type_name,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OpaqueAsset {
    pub name: String,
    pub kind: AssetKind,
    #[serde(default)]
    pub origin: AssetOrigin,
}

impl OpaqueAsset {
    pub fn new(name: impl Into<String>, kind: AssetKind) -> Self {
        Self {
            name: name.into(),
            kind,
            origin: AssetOrigin::Transient,
        }
    }
}
