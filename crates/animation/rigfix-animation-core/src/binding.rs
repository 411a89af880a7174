//! Curve bindings: which property of which node a curve animates.

use serde::{Deserialize, Serialize};

/// Well-known transform property names (curve property = `<name>.<axis>`).
pub mod property {
    pub const LOCAL_POSITION: &str = "m_LocalPosition";
    pub const LOCAL_ROTATION: &str = "m_LocalRotation";
    pub const LOCAL_EULER: &str = "localEulerAnglesRaw";
    pub const LOCAL_SCALE: &str = "m_LocalScale";
}

/// Component type that owns the animated property.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "name", rename_all = "snake_case")]
pub enum PropertyOwner {
    Transform,
    /// The animator on the animated root itself; root-level properties bind with an empty path.
    Animator,
    Other(String),
}

impl PropertyOwner {
    pub fn type_name(&self) -> &str {
        match self {
            PropertyOwner::Transform => "Transform",
            PropertyOwner::Animator => "Animator",
            PropertyOwner::Other(name) => name,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CurveKind {
    Float,
    ObjectReference,
    Discrete,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
    Z,
    W,
}

impl Axis {
    fn from_char(c: char) -> Option<Self> {
        match c {
            'x' => Some(Axis::X),
            'y' => Some(Axis::Y),
            'z' => Some(Axis::Z),
            'w' => Some(Axis::W),
            _ => None,
        }
    }

    #[inline]
    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
            Axis::W => 3,
        }
    }
}

/// Identity of a curve inside a clip: (path, owner, property, kind).
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Binding {
    pub path: String,
    pub owner: PropertyOwner,
    pub property: String,
    pub kind: CurveKind,
}

impl Binding {
    pub fn float(path: impl Into<String>, owner: PropertyOwner, property: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            owner,
            property: property.into(),
            kind: CurveKind::Float,
        }
    }

    pub fn object(path: impl Into<String>, owner: PropertyOwner, property: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            owner,
            property: property.into(),
            kind: CurveKind::ObjectReference,
        }
    }

    /// Transform channel binding, e.g. `transform("Root/Leg", "m_LocalPosition.y")`.
    pub fn transform(path: impl Into<String>, property: impl Into<String>) -> Self {
        Self::float(path, PropertyOwner::Transform, property)
    }

    pub fn with_path(&self, path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..self.clone()
        }
    }

    #[inline]
    pub fn is_transform(&self) -> bool {
        self.owner == PropertyOwner::Transform
    }

    /// Split `m_LocalPosition.y` into (`m_LocalPosition`, `Axis::Y`).
    /// Names without a `.<axis>` suffix yield `None`.
    pub fn property_axis(&self) -> Option<(&str, Axis)> {
        let (base, suffix) = self.property.rsplit_once('.')?;
        let mut chars = suffix.chars();
        let axis = Axis::from_char(chars.next()?)?;
        if chars.next().is_some() {
            return None;
        }
        Some((base, axis))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn axis_suffix_parsing() {
        let b = Binding::transform("Root", "m_LocalPosition.y");
        assert_eq!(b.property_axis(), Some((property::LOCAL_POSITION, Axis::Y)));
        assert_eq!(Binding::transform("Root", "m_LocalPosition.q").property_axis(), None);
        assert_eq!(Binding::transform("Root", "y").property_axis(), None);
        assert_eq!(Binding::transform("Root", "m_LocalPosition.xy").property_axis(), None);
    }

    #[test]
    fn with_path_keeps_identity_fields() {
        let b = Binding::float("Body", PropertyOwner::Other("SkinnedMeshRenderer".into()), "blendShape.Smile");
        let moved = b.with_path("Mesh/Body");
        assert_eq!(moved.path, "Mesh/Body");
        assert_eq!(moved.owner, b.owner);
        assert_eq!(moved.property, b.property);
        assert_ne!(moved, b);
    }
}
