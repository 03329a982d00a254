//! Mesh/atlas/material rebuild on die prop changes.
//!
//! Each die owns exactly one `{mesh, atlas, material}` triple. A change of
//! shape or color rebuilds the triple as acquire-new-then-release-old, so
//! there is no window where the buffers are double-owned or leaked across
//! repeated die-type switches.

use bevy::prelude::*;

use crate::dice3d::animation::RollAnimation;
use crate::dice3d::atlas::{atlas_to_image, build_atlas};
use crate::dice3d::config::resolve_render_config;
use crate::dice3d::meshes::build_geometry;
use crate::dice3d::registry::NormalRegistry;
use crate::dice3d::types::{Die, DiceType};

use super::view::{DieView, DieViewIndex};

/// What the current asset triple was built for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DieBuildKey {
    pub die_type: DiceType,
    pub color: String,
}

impl DieBuildKey {
    pub fn for_die(die: &Die) -> Self {
        Self {
            die_type: die.die_type,
            color: die.color.clone(),
        }
    }
}

/// The asset triple one die instance owns, plus the local bounds the
/// optical centering pass reads back.
#[derive(Component)]
pub struct DieAssets {
    pub mesh: Handle<Mesh>,
    pub atlas: Handle<Image>,
    pub material: Handle<StandardMaterial>,
    pub bounds_min: Vec3,
    pub bounds_max: Vec3,
    pub built_for: DieBuildKey,
}

pub fn rebuild_dice(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut images: ResMut<Assets<Image>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut index: ResMut<DieViewIndex>,
    mut query: Query<
        (Entity, &Die, Option<&DieAssets>, Option<&mut RollAnimation>),
        With<DieView>,
    >,
) {
    for (entity, die, old_assets, anim) in query.iter_mut() {
        let key = DieBuildKey::for_die(die);
        if old_assets.is_some_and(|assets| assets.built_for == key) {
            continue;
        }

        let sides = die.die_type.sides();
        let config = resolve_render_config(sides, die.overrides.as_ref());
        let background = (!die.color.is_empty()).then_some(die.color.as_str());

        let atlas = build_atlas(sides, &config, background);
        let mesh_data = build_geometry(sides, &atlas);
        let registry = NormalRegistry::from_mesh(&mesh_data, &atlas.layout, sides);
        let (bounds_min, bounds_max) = mesh_data.aabb();

        // Acquire the new triple before touching the old one.
        let mesh = meshes.add(mesh_data.to_mesh());
        let atlas_image = images.add(atlas_to_image(&atlas));
        let material = materials.add(StandardMaterial {
            // The atlas carries the body color; the texture supplies the
            // visible surface.
            base_color: Color::WHITE,
            base_color_texture: Some(atlas_image.clone()),
            perceptual_roughness: 0.35,
            reflectance: 0.25,
            ..default()
        });

        commands.entity(entity).insert((
            Mesh3d(mesh.clone()),
            MeshMaterial3d(material.clone()),
            registry,
            DieAssets {
                mesh: mesh.clone(),
                atlas: atlas_image.clone(),
                material: material.clone(),
                bounds_min,
                bounds_max,
                built_for: key,
            },
        ));

        // The registry changed; force the next frame to re-solve the
        // orientation target against it.
        if let Some(mut anim) = anim {
            anim.target_value = None;
        }

        // Release the previous triple exactly once.
        if let Some(old) = old_assets {
            let _ = meshes.remove(&old.mesh);
            let _ = images.remove(&old.atlas);
            let _ = materials.remove(&old.material);
        }
        if let Some(entry) = index.entries.get_mut(&entity) {
            entry.mesh = Some(mesh);
            entry.atlas = Some(atlas_image);
            entry.material = Some(material);
        }

        info!("built {} mesh for die {entity:?}", die.die_type.name());
    }
}
