//! Per-frame roll animation driving.

use bevy::ecs::message::MessageWriter;
use bevy::prelude::*;
use rand::Rng;

use crate::dice3d::animation::{RollAnimation, RollPhase, RollTick, ROLL_SPIN_MAX, ROLL_SPIN_MIN};
use crate::dice3d::orientation::{align_face_to_camera, euler_to_rotation, rotation_to_euler};
use crate::dice3d::registry::NormalRegistry;
use crate::dice3d::types::{Die, RollCompleted};

/// Advance every die's state machine and mirror the result onto its
/// transform. Emits [`RollCompleted`] on the tick a die settles.
pub fn drive_roll_animation(
    time: Res<Time>,
    mut completed: MessageWriter<RollCompleted>,
    mut query: Query<(
        Entity,
        &Die,
        &NormalRegistry,
        &mut RollAnimation,
        &mut Transform,
    )>,
) {
    let dt = time.delta_secs();
    let mut rng = rand::thread_rng();

    for (entity, die, registry, mut anim, mut transform) in query.iter_mut() {
        let new_spin = (die.is_rolling && anim.phase != RollPhase::Spinning)
            .then(|| random_spin(&mut rng));

        let new_target = if !die.is_rolling && anim.target_value != Some(die.value) {
            anim.target_value = Some(die.value);
            Some(rotation_to_euler(align_face_to_camera(registry, die.value)))
        } else {
            None
        };

        let inputs = RollTick {
            is_rolling: die.is_rolling,
            freeze: die.freeze,
            lock_motion: die.lock_motion,
            new_target,
            new_spin,
        };

        if anim.tick(dt, &inputs) {
            debug!("die {entity:?} settled on {}", die.value);
            completed.write(RollCompleted {
                die: entity,
                value: die.value,
            });
        }

        transform.rotation = euler_to_rotation(anim.rotation);
    }
}

/// Randomized per-axis angular velocity for a fresh roll, with random spin
/// direction per axis.
fn random_spin(rng: &mut impl Rng) -> Vec3 {
    let mut axis = || {
        let speed = rng.gen_range(ROLL_SPIN_MIN..ROLL_SPIN_MAX);
        if rng.gen_bool(0.5) {
            speed
        } else {
            -speed
        }
    };
    Vec3::new(axis(), axis(), axis())
}
