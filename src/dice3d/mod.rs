//! Procedural polyhedral dice engine.
//!
//! Synthesizes the six classic die solids as indexed triangle meshes with a
//! numbered texture atlas, solves which face carries a rolled value, and
//! drives the roll/settle animation with optical centering. Spawning a
//! [`Die`] entity creates the view; despawning it (see
//! [`systems::despawn_die`]) releases everything it owned.

pub mod animation;
pub mod atlas;
pub mod centering;
pub mod config;
pub mod meshes;
pub mod orientation;
pub mod registry;
pub mod systems;
pub mod types;

use bevy::prelude::*;

pub use animation::{RollAnimation, RollPhase, RollTick};
pub use atlas::{build_atlas, AtlasDescriptor, AtlasLayout};
pub use centering::{compute_optical_offset, OpticalOffset};
pub use config::{resolve_render_config, DiceRenderConfig, RenderConfigOverrides};
pub use meshes::{build_d10_faces, build_geometry, D10Faces, MeshData};
pub use orientation::align_face_to_camera;
pub use registry::NormalRegistry;
pub use systems::{despawn_die, DieAssets, DieView};
pub use types::{Die, DiceType, RollCompleted};

pub struct DicePlugin;

impl Plugin for DicePlugin {
    fn build(&self, app: &mut App) {
        app.add_message::<RollCompleted>()
            .init_resource::<systems::DieViewAllocator>()
            .init_resource::<systems::DieViewIndex>()
            .add_systems(
                Update,
                (
                    systems::prepare_die_views,
                    systems::rebuild_dice,
                    systems::drive_roll_animation,
                    systems::apply_optical_centering,
                    systems::cleanup_die_views,
                )
                    .chain(),
            );
    }
}
