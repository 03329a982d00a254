//! Turning a rolled value into a target rotation.

use bevy::math::{EulerRot, Quat, Vec3};

use super::registry::NormalRegistry;

/// The axis a settled face must point along: the view camera sits on +Z
/// looking at the origin.
pub const FACE_FORWARD: Vec3 = Vec3::Z;

/// Rotation that brings the face normal registered for `value` onto the
/// forward axis. A missing registration yields the identity rotation; a
/// cosmetic subsystem never fails its caller.
pub fn align_face_to_camera(registry: &NormalRegistry, value: u32) -> Quat {
    match registry.normal_for(value) {
        Some(normal) => Quat::from_rotation_arc(normal, FACE_FORWARD),
        None => Quat::IDENTITY,
    }
}

/// Decompose a rotation into the XYZ Euler triple the animation eases over.
pub fn rotation_to_euler(rotation: Quat) -> Vec3 {
    let (x, y, z) = rotation.to_euler(EulerRot::XYZ);
    Vec3::new(x, y, z)
}

/// Recompose the animation's Euler triple into a transform rotation.
pub fn euler_to_rotation(euler: Vec3) -> Quat {
    Quat::from_euler(EulerRot::XYZ, euler.x, euler.y, euler.z)
}
