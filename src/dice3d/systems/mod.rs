//! Bevy systems wiring the dice engine together:
//!
//! - `view`: render-to-texture setup per die and teardown
//! - `rebuild`: mesh/atlas/material ownership across prop changes
//! - `roll`: per-frame animation state machine driving
//! - `view_centering`: settled-state optical centering

mod rebuild;
mod roll;
mod view;
mod view_centering;

pub use rebuild::{rebuild_dice, DieAssets, DieBuildKey};
pub use roll::drive_roll_animation;
pub use view::{
    cleanup_die_views, despawn_die, prepare_die_views, DieView, DieViewAllocator, DieViewIndex,
    DIE_VIEW_SIZE,
};
pub use view_centering::apply_optical_centering;
