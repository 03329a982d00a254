//! Face-normal registry: which outward normal carries which printed number.
//!
//! Derived from a built mesh by walking its triangles, classifying each one
//! by the atlas tile its UV centroid falls in, and averaging the flat
//! normals per tile.

use std::collections::HashMap;

use bevy::log::warn;
use bevy::math::Vec3;
use bevy::prelude::Component;

use super::atlas::AtlasLayout;
use super::meshes::{MeshData, DEGENERATE_NORMAL_EPS};

/// One unit-length outward normal per face number in `1..=sides`.
#[derive(Component, Debug, Clone, Default)]
pub struct NormalRegistry {
    normals: HashMap<u32, Vec3>,
}

impl NormalRegistry {
    /// Build the registry for a mesh laid out against `layout`.
    pub fn from_mesh(mesh: &MeshData, layout: &AtlasLayout, sides: u32) -> Self {
        let mut sums: HashMap<u32, Vec3> = HashMap::new();

        for tri in mesh.indices.chunks_exact(3) {
            let (a, b, c) = (tri[0] as usize, tri[1] as usize, tri[2] as usize);
            let cross = (mesh.positions[b] - mesh.positions[a])
                .cross(mesh.positions[c] - mesh.positions[a]);
            if cross.length_squared() < DEGENERATE_NORMAL_EPS {
                continue;
            }

            let centroid = (mesh.uvs[a] + mesh.uvs[b] + mesh.uvs[c]) / 3.0;
            let number = layout.number_at(centroid.x, centroid.y).clamp(1, sides);
            *sums.entry(number).or_insert(Vec3::ZERO) += cross.normalize();
        }

        let mut normals = HashMap::with_capacity(sides as usize);
        for number in 1..=sides {
            match sums.get(&number) {
                Some(sum) if sum.length_squared() > DEGENERATE_NORMAL_EPS => {
                    normals.insert(number, sum.normalize());
                }
                _ => {
                    // A consistent mesh registers every number; keep the
                    // registry total anyway so lookups cannot dangle.
                    warn!("no usable normal for face {number}, registering +Z");
                    normals.insert(number, Vec3::Z);
                }
            }
        }

        Self { normals }
    }

    pub fn normal_for(&self, value: u32) -> Option<Vec3> {
        self.normals.get(&value).copied()
    }

    pub fn len(&self) -> usize {
        self.normals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.normals.is_empty()
    }
}
