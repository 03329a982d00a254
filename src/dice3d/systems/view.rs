//! Die view lifecycle: render-to-texture plumbing and teardown.
//!
//! Each die renders through its own offscreen camera on a private render
//! layer; a UI image node shows the target wherever the caller mounted it.

use std::collections::HashMap;

use bevy::camera::visibility::RenderLayers;
use bevy::camera::RenderTarget;
use bevy::prelude::*;
use bevy::render::render_resource::{
    Extent3d, TextureDescriptor, TextureDimension, TextureFormat, TextureUsages,
};

use crate::dice3d::animation::RollAnimation;
use crate::dice3d::centering::OpticalOffset;
use crate::dice3d::types::Die;

/// Edge length of the die viewport in pixels.
pub const DIE_VIEW_SIZE: f32 = 300.0;

/// First render layer handed out to die views; keeps them clear of the main
/// scene layers.
const DIE_VIEW_LAYER_BASE: usize = 30;

/// Engine-owned plumbing for one die.
#[derive(Component)]
pub struct DieView {
    pub camera: Entity,
    pub light: Entity,
    pub ui_node: Entity,
    pub render_target: Handle<Image>,
    pub size: Vec2,
    pub layer: usize,
}

/// Hands out a private render layer per die view.
#[derive(Resource)]
pub struct DieViewAllocator {
    next_layer: usize,
}

impl Default for DieViewAllocator {
    fn default() -> Self {
        Self {
            next_layer: DIE_VIEW_LAYER_BASE,
        }
    }
}

/// Everything a die instance owns, mirrored outside its entity so teardown
/// can release it after the entity is gone.
pub struct DieOwnedParts {
    pub camera: Entity,
    pub light: Entity,
    pub ui_node: Entity,
    pub render_target: Handle<Image>,
    pub mesh: Option<Handle<Mesh>>,
    pub atlas: Option<Handle<Image>>,
    pub material: Option<Handle<StandardMaterial>>,
}

#[derive(Resource, Default)]
pub struct DieViewIndex {
    pub entries: HashMap<Entity, DieOwnedParts>,
}

/// Idempotent destructor for a die spawned with [`Die`]; the cleanup system
/// releases everything the instance owned.
pub fn despawn_die(commands: &mut Commands, die: Entity) {
    if let Ok(mut entity) = commands.get_entity(die) {
        entity.despawn();
    }
}

/// Set up camera, light, render target, and UI image for dice that do not
/// have a view yet.
pub fn prepare_die_views(
    mut commands: Commands,
    mut images: ResMut<Assets<Image>>,
    mut allocator: ResMut<DieViewAllocator>,
    mut index: ResMut<DieViewIndex>,
    query: Query<(Entity, &Die), Without<DieView>>,
) {
    for (entity, die) in query.iter() {
        let layer = allocator.next_layer;
        allocator.next_layer += 1;
        let render_layer = RenderLayers::layer(layer);

        let size = Extent3d {
            width: DIE_VIEW_SIZE as u32,
            height: DIE_VIEW_SIZE as u32,
            depth_or_array_layers: 1,
        };
        let mut image = Image {
            texture_descriptor: TextureDescriptor {
                label: Some("die_view_render_target"),
                size,
                dimension: TextureDimension::D2,
                format: TextureFormat::Rgba8UnormSrgb,
                mip_level_count: 1,
                sample_count: 1,
                usage: TextureUsages::TEXTURE_BINDING
                    | TextureUsages::COPY_DST
                    | TextureUsages::RENDER_ATTACHMENT,
                view_formats: &[],
            },
            ..default()
        };
        image.resize(size);
        let render_target = images.add(image);

        // The camera sits on +Z looking at the origin; the orientation
        // solver aligns settled faces with +Z to face it.
        let camera = commands
            .spawn((
                Camera3d::default(),
                Camera {
                    target: RenderTarget::Image(render_target.clone().into()),
                    clear_color: ClearColorConfig::Custom(Color::srgba(0.0, 0.0, 0.0, 0.0)),
                    order: layer as isize,
                    ..default()
                },
                Transform::from_xyz(0.0, 0.0, 2.6).looking_at(Vec3::ZERO, Vec3::Y),
                render_layer.clone(),
                Name::new("DieViewCamera"),
            ))
            .id();

        let light = commands
            .spawn((
                PointLight {
                    intensity: 50000.0,
                    range: 50.0,
                    shadows_enabled: false,
                    ..default()
                },
                Transform::from_xyz(2.5, 3.0, 4.0),
                render_layer.clone(),
                Name::new("DieViewLight"),
            ))
            .id();

        let ui_node = commands
            .spawn((
                ImageNode {
                    image: render_target.clone(),
                    ..default()
                },
                Node {
                    width: Val::Px(DIE_VIEW_SIZE),
                    height: Val::Px(DIE_VIEW_SIZE),
                    ..default()
                },
                Name::new("DieViewImage"),
            ))
            .id();
        if let Some(container) = die.container {
            if let Ok(mut parent) = commands.get_entity(container) {
                parent.add_child(ui_node);
            }
        }

        commands.entity(entity).insert((
            Transform::default(),
            Visibility::Visible,
            render_layer,
            RollAnimation::default(),
            OpticalOffset::default(),
            DieView {
                camera,
                light,
                ui_node,
                render_target: render_target.clone(),
                size: Vec2::splat(DIE_VIEW_SIZE),
                layer,
            },
        ));

        index.entries.insert(
            entity,
            DieOwnedParts {
                camera,
                light,
                ui_node,
                render_target,
                mesh: None,
                atlas: None,
                material: None,
            },
        );

        debug!("prepared die view for {entity:?} on layer {layer}");
    }
}

/// Release everything a despawned die owned: scene entities, the render
/// target, and the current mesh/atlas/material triple. Missing pieces are a
/// no-op; release is best-effort and happens exactly once per instance.
pub fn cleanup_die_views(
    mut commands: Commands,
    mut removed: RemovedComponents<Die>,
    mut index: ResMut<DieViewIndex>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut images: ResMut<Assets<Image>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    for entity in removed.read() {
        let Some(parts) = index.entries.remove(&entity) else {
            continue;
        };
        for owned in [parts.camera, parts.light, parts.ui_node] {
            if let Ok(mut owned) = commands.get_entity(owned) {
                owned.despawn();
            }
        }
        if let Some(mesh) = parts.mesh {
            let _ = meshes.remove(&mesh);
        }
        if let Some(atlas) = parts.atlas {
            let _ = images.remove(&atlas);
        }
        if let Some(material) = parts.material {
            let _ = materials.remove(&material);
        }
        let _ = images.remove(&parts.render_target);
        debug!("released die view resources for {entity:?}");
    }
}
