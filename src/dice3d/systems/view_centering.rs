//! Applies the optical centering offset to each settled die's view image.

use bevy::camera::CameraProjection;
use bevy::prelude::*;

use crate::dice3d::animation::{RollAnimation, RollPhase};
use crate::dice3d::centering::{aabb_corners, compute_optical_offset, OpticalOffset};
use crate::dice3d::types::Die;

use super::rebuild::DieAssets;
use super::view::DieView;

/// Recompute and apply the screen offset for dice in a stable state.
///
/// Runs while decelerating into a settle and while settled-and-pinned;
/// never while spinning or idly drifting, where there is no meaningful
/// bounding box to center on.
pub fn apply_optical_centering(
    mut dies: Query<(
        &Die,
        &DieView,
        &DieAssets,
        &RollAnimation,
        &GlobalTransform,
        &mut OpticalOffset,
    )>,
    cameras: Query<(&Projection, &GlobalTransform), With<Camera3d>>,
    mut nodes: Query<&mut Node>,
) {
    for (die, view, assets, anim, die_transform, mut offset) in dies.iter_mut() {
        let stable = anim.phase == RollPhase::Decelerating
            || (anim.phase == RollPhase::Settled && (die.lock_motion || die.freeze));
        if !stable {
            continue;
        }

        let Ok((projection, camera_transform)) = cameras.get(view.camera) else {
            continue;
        };

        let (scale, rotation, translation) = camera_transform.to_scale_rotation_translation();
        let world_from_camera = Mat4::from_scale_rotation_translation(scale, rotation, translation);
        let clip_from_world = projection.get_clip_from_view() * world_from_camera.inverse();

        let corners = aabb_corners(assets.bounds_min, assets.bounds_max)
            .map(|corner| die_transform.transform_point(corner));

        let next = compute_optical_offset(&corners, clip_from_world, view.size, offset.as_vec2());
        offset.x = next.x;
        offset.y = next.y;

        if let Ok(mut node) = nodes.get_mut(view.ui_node) {
            node.left = Val::Px(offset.x);
            node.top = Val::Px(offset.y);
        }
    }
}
