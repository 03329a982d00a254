//! Roll animation state machine.
//!
//! An explicit FSM with a pure `tick`, callable without any rendering
//! surface. All rates are integrated over the frame delta so the animation
//! is frame-rate independent.

use bevy::math::Vec3;
use bevy::prelude::Component;

/// Cosmetic drift applied while idle so the die never looks static (rad/s).
pub const IDLE_SPIN: Vec3 = Vec3::new(0.12, 0.3, 0.0);
/// Deceleration rate constant. Equivalent to easing 12% of the remaining
/// distance per frame at 60 fps, expressed time-continuously.
pub const SETTLE_RATE: f32 = 7.7;
/// Per-axis angular delta (rad) under which the die snaps to its target.
pub const SETTLE_THRESHOLD: f32 = 0.01;
/// Bounds for the randomized per-axis spin velocity of an active roll (rad/s).
pub const ROLL_SPIN_MIN: f32 = 6.0;
pub const ROLL_SPIN_MAX: f32 = 14.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RollPhase {
    Idle,
    Spinning,
    Decelerating,
    Settled,
}

/// Per-frame inputs to the state machine.
#[derive(Debug, Clone, Copy, Default)]
pub struct RollTick {
    pub is_rolling: bool,
    pub freeze: bool,
    pub lock_motion: bool,
    /// Set when the desired value changed (or the roll just stopped):
    /// enters Decelerating toward this Euler target.
    pub new_target: Option<Vec3>,
    /// Set when a roll just started: the randomized spin velocity.
    pub new_spin: Option<Vec3>,
}

/// Animation state for one die. Not shared across instances.
#[derive(Component, Debug, Clone)]
pub struct RollAnimation {
    pub phase: RollPhase,
    /// Current rotation, XYZ Euler radians.
    pub rotation: Vec3,
    /// Target rotation, XYZ Euler radians.
    pub target: Vec3,
    /// The rolled value the current target was solved for.
    pub target_value: Option<u32>,
    spin_velocity: Vec3,
    settle_fired: bool,
}

impl Default for RollAnimation {
    fn default() -> Self {
        Self {
            phase: RollPhase::Idle,
            rotation: Vec3::ZERO,
            target: Vec3::ZERO,
            target_value: None,
            spin_velocity: Vec3::ZERO,
            settle_fired: false,
        }
    }
}

impl RollAnimation {
    /// Advance one frame. Returns `true` exactly once per settle, on the
    /// tick the rotation snaps to its target.
    pub fn tick(&mut self, dt: f32, inputs: &RollTick) -> bool {
        if let Some(spin) = inputs.new_spin {
            self.spin_velocity = spin;
        }
        if let Some(target) = inputs.new_target {
            self.enter_decelerating(target);
        }
        if inputs.is_rolling {
            self.phase = RollPhase::Spinning;
        }

        match self.phase {
            RollPhase::Idle => {
                if !inputs.freeze {
                    self.rotation += IDLE_SPIN * dt;
                }
                false
            }
            RollPhase::Spinning => {
                self.rotation += self.spin_velocity * dt;
                if !inputs.is_rolling {
                    // Roll ended without a target this tick; wait in Idle
                    // until the caller supplies one.
                    self.phase = RollPhase::Idle;
                }
                false
            }
            RollPhase::Decelerating => {
                let alpha = 1.0 - (-SETTLE_RATE * dt).exp();
                let delta = wrap_vec(self.target - self.rotation);
                self.rotation += delta * alpha;

                let remaining = wrap_vec(self.target - self.rotation);
                if remaining.abs().max_element() < SETTLE_THRESHOLD {
                    self.rotation = self.target;
                    self.phase = RollPhase::Settled;
                    if !self.settle_fired {
                        self.settle_fired = true;
                        return true;
                    }
                }
                false
            }
            RollPhase::Settled => {
                if inputs.lock_motion {
                    self.rotation = self.target;
                } else if !inputs.freeze {
                    self.rotation += IDLE_SPIN * dt;
                }
                false
            }
        }
    }

    fn enter_decelerating(&mut self, target: Vec3) {
        self.target = target;
        // Approach along the shortest arc on every axis.
        self.rotation = target + wrap_vec(self.rotation - target);
        self.phase = RollPhase::Decelerating;
        self.settle_fired = false;
    }
}

/// Wrap an angle into `(-PI, PI]`.
fn wrap_angle(a: f32) -> f32 {
    let mut a = a % std::f32::consts::TAU;
    if a > std::f32::consts::PI {
        a -= std::f32::consts::TAU;
    } else if a < -std::f32::consts::PI {
        a += std::f32::consts::TAU;
    }
    a
}

fn wrap_vec(v: Vec3) -> Vec3 {
    Vec3::new(wrap_angle(v.x), wrap_angle(v.y), wrap_angle(v.z))
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    fn tick_until_settled(anim: &mut RollAnimation, inputs: &RollTick) -> usize {
        let mut fires = 0;
        for _ in 0..600 {
            if anim.tick(DT, inputs) {
                fires += 1;
            }
            if anim.phase == RollPhase::Settled {
                break;
            }
        }
        assert_eq!(anim.phase, RollPhase::Settled, "did not settle in 10s");
        fires
    }

    #[test]
    fn test_idle_drifts_unless_frozen() {
        let mut anim = RollAnimation::default();
        anim.tick(DT, &RollTick::default());
        assert!(anim.rotation.length() > 0.0);

        let before = anim.rotation;
        anim.tick(
            DT,
            &RollTick {
                freeze: true,
                ..Default::default()
            },
        );
        assert_eq!(anim.rotation, before);
    }

    #[test]
    fn test_spin_integrates_over_dt() {
        let mut anim = RollAnimation::default();
        let inputs = RollTick {
            is_rolling: true,
            new_spin: Some(Vec3::new(2.0, 4.0, 0.0)),
            ..Default::default()
        };
        anim.tick(0.5, &inputs);
        assert_eq!(anim.phase, RollPhase::Spinning);
        assert!((anim.rotation.x - 1.0).abs() < 1e-5);
        assert!((anim.rotation.y - 2.0).abs() < 1e-5);
    }

    #[test]
    fn test_settle_fires_exactly_once() {
        let mut anim = RollAnimation::default();
        anim.rotation = Vec3::new(1.0, -2.0, 0.5);
        let target = Vec3::new(0.2, 0.4, -0.1);

        let mut fires = 0;
        if anim.tick(
            DT,
            &RollTick {
                new_target: Some(target),
                lock_motion: true,
                ..Default::default()
            },
        ) {
            fires += 1;
        }
        let inputs = RollTick {
            lock_motion: true,
            ..Default::default()
        };
        for _ in 0..600 {
            if anim.tick(DT, &inputs) {
                fires += 1;
            }
        }
        assert_eq!(anim.phase, RollPhase::Settled);
        assert_eq!(fires, 1);
        assert_eq!(anim.rotation, target);
    }

    #[test]
    fn test_new_value_reenters_decelerating_and_fires_again() {
        let mut anim = RollAnimation::default();
        let first = Vec3::new(0.3, 0.0, 0.0);
        let mut fires = 0;
        if anim.tick(
            DT,
            &RollTick {
                new_target: Some(first),
                lock_motion: true,
                ..Default::default()
            },
        ) {
            fires += 1;
        }
        fires += tick_until_settled(
            &mut anim,
            &RollTick {
                lock_motion: true,
                ..Default::default()
            },
        );
        assert_eq!(fires, 1);

        // Value change while not rolling: new target, one more settle event.
        let second = Vec3::new(-0.9, 0.4, 0.0);
        let mut more = 0;
        if anim.tick(
            DT,
            &RollTick {
                new_target: Some(second),
                lock_motion: true,
                ..Default::default()
            },
        ) {
            more += 1;
        }
        assert_eq!(anim.phase, RollPhase::Decelerating);
        more += tick_until_settled(
            &mut anim,
            &RollTick {
                lock_motion: true,
                ..Default::default()
            },
        );
        assert_eq!(more, 1);
    }

    #[test]
    fn test_roll_then_settle_lifecycle() {
        let mut anim = RollAnimation::default();
        let rolling = RollTick {
            is_rolling: true,
            new_spin: Some(Vec3::splat(8.0)),
            ..Default::default()
        };
        for _ in 0..30 {
            anim.tick(DT, &rolling);
        }
        assert_eq!(anim.phase, RollPhase::Spinning);

        // Roll stops and the solver hands over a target the same frame.
        let target = Vec3::new(0.1, 0.2, 0.3);
        let mut fires = 0;
        if anim.tick(
            DT,
            &RollTick {
                new_target: Some(target),
                lock_motion: true,
                ..Default::default()
            },
        ) {
            fires += 1;
        }
        assert_eq!(anim.phase, RollPhase::Decelerating);
        fires += tick_until_settled(
            &mut anim,
            &RollTick {
                lock_motion: true,
                ..Default::default()
            },
        );
        assert_eq!(fires, 1);
        assert_eq!(anim.rotation, target);
    }

    #[test]
    fn test_lock_motion_pins_rotation_after_settle() {
        let mut anim = RollAnimation::default();
        let target = Vec3::new(0.5, 0.5, 0.5);
        anim.tick(
            DT,
            &RollTick {
                new_target: Some(target),
                ..Default::default()
            },
        );
        tick_until_settled(
            &mut anim,
            &RollTick {
                lock_motion: true,
                ..Default::default()
            },
        );
        for _ in 0..120 {
            anim.tick(
                DT,
                &RollTick {
                    lock_motion: true,
                    ..Default::default()
                },
            );
        }
        assert_eq!(anim.rotation, target);
    }

    #[test]
    fn test_settled_without_lock_drifts_like_idle() {
        let mut anim = RollAnimation::default();
        anim.tick(
            DT,
            &RollTick {
                new_target: Some(Vec3::ZERO),
                ..Default::default()
            },
        );
        tick_until_settled(&mut anim, &RollTick::default());
        let before = anim.rotation;
        anim.tick(DT, &RollTick::default());
        assert_ne!(anim.rotation, before);
    }

    #[test]
    fn test_deceleration_takes_the_short_way_around() {
        let mut anim = RollAnimation::default();
        // Many full turns of accumulated spin.
        anim.rotation = Vec3::new(0.0, 40.0, 0.0);
        anim.tick(
            DT,
            &RollTick {
                new_target: Some(Vec3::ZERO),
                lock_motion: true,
                ..Default::default()
            },
        );
        // After re-entry the remaining distance is under a half turn.
        assert!((anim.rotation.y).abs() <= std::f32::consts::PI + 1e-3);
    }
}
