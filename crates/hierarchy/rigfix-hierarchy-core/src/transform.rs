//! Local TRS transform of a hierarchy node.

use glam::{Affine3A, EulerRot, Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Rotation order matching the engine's Euler convention (Z, then X, then Y, extrinsic).
pub const ENGINE_EULER: EulerRot = EulerRot::YXZ;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LocalTransform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl LocalTransform {
    pub const IDENTITY: Self = Self {
        position: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
    };

    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Self::IDENTITY
        }
    }

    /// Build a rotation from Euler angles in degrees, `(x, y, z)`.
    pub fn from_euler_degrees(euler: Vec3) -> Self {
        Self {
            rotation: quat_from_euler_degrees(euler),
            ..Self::IDENTITY
        }
    }

    /// Local rotation as Euler angles in degrees, each wrapped to `[0, 360)`.
    pub fn euler_degrees(&self) -> Vec3 {
        let (y, x, z) = self.rotation.to_euler(ENGINE_EULER);
        Vec3::new(
            wrap_degrees(x.to_degrees()),
            wrap_degrees(y.to_degrees()),
            wrap_degrees(z.to_degrees()),
        )
    }

    pub fn to_affine(&self) -> Affine3A {
        Affine3A::from_scale_rotation_translation(self.scale, self.rotation, self.position)
    }

    /// Decompose an affine matrix. Shear is lost.
    pub fn from_affine(mat: &Affine3A) -> Self {
        let (scale, rotation, position) = mat.to_scale_rotation_translation();
        Self {
            position,
            rotation,
            scale,
        }
    }
}

impl Default for LocalTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

pub fn quat_from_euler_degrees(euler: Vec3) -> Quat {
    Quat::from_euler(
        ENGINE_EULER,
        euler.y.to_radians(),
        euler.x.to_radians(),
        euler.z.to_radians(),
    )
}

fn wrap_degrees(deg: f32) -> f32 {
    let w = deg.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if w >= 360.0 {
        0.0
    } else {
        w
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx3(a: Vec3, b: Vec3) {
        assert!((a - b).abs().max_element() < 1e-3, "left={a} right={b}");
    }

    #[test]
    fn euler_roundtrip_in_degrees() {
        let t = LocalTransform::from_euler_degrees(Vec3::new(30.0, 45.0, 60.0));
        approx3(t.euler_degrees(), Vec3::new(30.0, 45.0, 60.0));
    }

    #[test]
    fn negative_angles_wrap_positive() {
        let t = LocalTransform::from_euler_degrees(Vec3::new(0.0, -90.0, 0.0));
        approx3(t.euler_degrees(), Vec3::new(0.0, 270.0, 0.0));
    }

    #[test]
    fn affine_decompose_matches_components() {
        let t = LocalTransform {
            position: Vec3::new(1.0, 2.0, 3.0),
            rotation: Quat::from_rotation_y(0.5),
            scale: Vec3::splat(2.0),
        };
        let back = LocalTransform::from_affine(&t.to_affine());
        approx3(back.position, t.position);
        approx3(back.scale, t.scale);
        assert!(back.rotation.abs_diff_eq(t.rotation, 1e-5));
    }
}
