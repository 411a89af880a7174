//! Rest-pose drift of transform channels.
//!
//! A snapshot of each node's local transform is taken the first time the node is indexed.
//! When the hierarchy is edited afterwards, the difference between the node's current local
//! transform and that snapshot is added to the keyframes animating it.

use glam::{Quat, Vec3, Vec4};
use rigfix_animation::{property, Binding};
use rigfix_hierarchy::LocalTransform;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TransformSnapshot {
    pub position: Vec3,
    pub rotation: Quat,
    pub inverse_rotation: Quat,
    pub scale: Vec3,
    /// Local rotation as engine Euler angles in degrees.
    pub euler: Vec3,
}

impl TransformSnapshot {
    pub fn capture(t: &LocalTransform) -> Self {
        Self {
            position: t.position,
            rotation: t.rotation,
            inverse_rotation: t.rotation.inverse(),
            scale: t.scale,
            euler: t.euler_degrees(),
        }
    }
}

/// Offset for a property family (`m_LocalPosition`, `m_LocalRotation`, `localEulerAnglesRaw`).
/// Unknown families, scale included, get no correction.
pub fn offset(property_base: &str, current: &LocalTransform, snapshot: &TransformSnapshot) -> Vec4 {
    match property_base {
        property::LOCAL_POSITION => (current.position - snapshot.position).extend(0.0),
        property::LOCAL_ROTATION => {
            let mut delta = current.rotation * snapshot.inverse_rotation;
            if delta.w < 0.0 {
                delta = -delta;
            }
            Vec4::from(delta) - Vec4::from(Quat::IDENTITY)
        }
        property::LOCAL_EULER => (current.euler_degrees() - snapshot.euler).extend(0.0),
        _ => Vec4::ZERO,
    }
}

/// Offset for the whole vector the binding's property belongs to. Properties without a
/// recognised `.x|y|z|w` suffix yield zero.
pub fn binding_offset(binding: &Binding, current: &LocalTransform, snapshot: &TransformSnapshot) -> Vec4 {
    match binding.property_axis() {
        Some((base, _)) => offset(base, current, snapshot),
        None => Vec4::ZERO,
    }
}

/// Offset for the single channel the binding animates.
pub fn channel_offset(binding: &Binding, current: &LocalTransform, snapshot: &TransformSnapshot) -> f32 {
    match binding.property_axis() {
        Some((base, axis)) => offset(base, current, snapshot)[axis.index()],
        None => 0.0,
    }
}

#[inline]
pub fn is_zero(offset: Vec4, epsilon: f32) -> bool {
    offset.abs().max_element() <= epsilon
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn position_drift_on_one_axis() {
        let snap = TransformSnapshot::capture(&LocalTransform::IDENTITY);
        let now = LocalTransform::from_position(Vec3::new(0.0, 0.1, 0.0));
        let b = Binding::transform("Root/Leg", "m_LocalPosition.y");
        assert!((channel_offset(&b, &now, &snap) - 0.1).abs() < 1e-6);
        assert_eq!(channel_offset(&b, &LocalTransform::IDENTITY, &snap), 0.0);
        let x = Binding::transform("Root/Leg", "m_LocalPosition.x");
        assert_eq!(channel_offset(&x, &now, &snap), 0.0);
    }

    #[test]
    fn unchanged_rotation_reads_as_zero() {
        let t = LocalTransform::from_euler_degrees(Vec3::new(10.0, 20.0, 30.0));
        let snap = TransformSnapshot::capture(&t);
        assert!(is_zero(offset(property::LOCAL_ROTATION, &t, &snap), 1e-5));
        assert!(is_zero(offset(property::LOCAL_EULER, &t, &snap), 1e-3));
    }

    #[test]
    fn rotation_drift_about_y() {
        let snap = TransformSnapshot::capture(&LocalTransform::from_euler_degrees(Vec3::new(0.0, 20.0, 0.0)));
        let now = LocalTransform::from_euler_degrees(Vec3::new(0.0, 30.0, 0.0));
        let half = 5.0_f32.to_radians();

        let q = offset(property::LOCAL_ROTATION, &now, &snap);
        assert!(q.abs_diff_eq(Vec4::new(0.0, half.sin(), 0.0, half.cos() - 1.0), 1e-5), "{q}");
        let y = Binding::transform("Root/Leg", "m_LocalRotation.y");
        assert!((channel_offset(&y, &now, &snap) - half.sin()).abs() < 1e-5);
        let w = Binding::transform("Root/Leg", "m_LocalRotation.w");
        assert!((channel_offset(&w, &now, &snap) - (half.cos() - 1.0)).abs() < 1e-5);

        let e = offset(property::LOCAL_EULER, &now, &snap);
        assert!(e.abs_diff_eq(Vec4::new(0.0, 10.0, 0.0, 0.0), 1e-3), "{e}");
        let ey = Binding::transform("Root/Leg", "localEulerAnglesRaw.y");
        assert!((channel_offset(&ey, &now, &snap) - 10.0).abs() < 1e-3);
    }

    #[test]
    fn rotation_drift_uses_the_short_arc() {
        let snap = TransformSnapshot::capture(&LocalTransform::IDENTITY);
        let mut now = LocalTransform::IDENTITY;
        now.rotation = -Quat::from_rotation_y(10.0_f32.to_radians());
        let half = 5.0_f32.to_radians();
        let q = offset(property::LOCAL_ROTATION, &now, &snap);
        assert!(q.abs_diff_eq(Vec4::new(0.0, half.sin(), 0.0, half.cos() - 1.0), 1e-5), "{q}");
    }

    #[test]
    fn unknown_families_and_suffixes_get_nothing() {
        let snap = TransformSnapshot::capture(&LocalTransform::IDENTITY);
        let mut now = LocalTransform::from_position(Vec3::ONE);
        now.scale = Vec3::splat(2.0);
        assert_eq!(offset(property::LOCAL_SCALE, &now, &snap), Vec4::ZERO);
        let odd = Binding::transform("Root", "m_LocalPosition.q");
        assert_eq!(binding_offset(&odd, &now, &snap), Vec4::ZERO);
        assert_eq!(channel_offset(&odd, &now, &snap), 0.0);
    }
}
