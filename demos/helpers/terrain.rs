//! Displaced ground for the demo scene.
//!
//! The visual mesh and the heightfield collider are generated from the same
//! height function, so what you see is what the ground probe hits.

use bevy::prelude::*;
use bevy::render::mesh::Indices;
use bevy::render::render_asset::RenderAssetUsages;
use bevy::render::render_resource::PrimitiveTopology;
use bevy_rapier3d::prelude::Collider;

/// A square patch of displaced ground centered on the origin.
#[derive(Debug, Clone, Copy)]
pub struct Terrain {
    /// Edge length along X and Z.
    pub size: f32,
    /// Samples per edge.
    pub resolution: usize,
    /// Height of a sample of 1.0.
    pub displacement_scale: f32,
    /// Added to every height; the entity is translated by this much.
    pub displacement_offset: f32,
}

impl Terrain {
    /// Normalized height in roughly `[0, 0.35]` at local `(x, z)`.
    pub fn sample(&self, x: f32, z: f32) -> f32 {
        0.15 + 0.05 * ((x * 0.15).sin() + (z * 0.12).cos()) + 0.03 * ((x + z) * 0.3).sin()
    }

    /// Local coordinate of grid line `i`.
    fn coord(&self, i: usize) -> f32 {
        let n = self.resolution.max(2) - 1;
        (i as f32 / n as f32 - 0.5) * self.size
    }

    /// Transform placing both mesh and collider.
    pub fn transform(&self) -> Transform {
        Transform::from_xyz(0.0, self.displacement_offset, 0.0)
    }

    /// Heightfield collider matching [`Terrain::mesh`].
    ///
    /// Rows run along Z, columns along X; the matrix is column-major.
    pub fn collider(&self) -> Collider {
        let n = self.resolution.max(2);
        let mut heights = Vec::with_capacity(n * n);
        for col in 0..n {
            for row in 0..n {
                heights.push(self.sample(self.coord(col), self.coord(row)));
            }
        }
        Collider::heightfield(
            heights,
            n,
            n,
            Vec3::new(self.size, self.displacement_scale, self.size),
        )
    }

    /// Grid mesh with smooth normals taken from the height function.
    pub fn mesh(&self) -> Mesh {
        let n = self.resolution.max(2);
        let mut positions: Vec<[f32; 3]> = Vec::with_capacity(n * n);
        let mut normals: Vec<[f32; 3]> = Vec::with_capacity(n * n);
        let mut uvs: Vec<[f32; 2]> = Vec::with_capacity(n * n);

        let step = self.size / (n - 1) as f32;
        let height = |x: f32, z: f32| self.sample(x, z) * self.displacement_scale;

        for row in 0..n {
            for col in 0..n {
                let (x, z) = (self.coord(col), self.coord(row));
                positions.push([x, height(x, z), z]);

                let dx = height(x + step, z) - height(x - step, z);
                let dz = height(x, z + step) - height(x, z - step);
                normals.push(Vec3::new(-dx, 2.0 * step, -dz).normalize().to_array());

                uvs.push([col as f32 / (n - 1) as f32, row as f32 / (n - 1) as f32]);
            }
        }

        // Two counter-clockwise (seen from above) triangles per cell.
        let mut indices: Vec<u32> = Vec::with_capacity((n - 1) * (n - 1) * 6);
        for row in 0..n - 1 {
            for col in 0..n - 1 {
                let a = (row * n + col) as u32;
                let b = a + 1;
                let c = a + n as u32;
                let d = c + 1;
                indices.extend_from_slice(&[a, c, b, b, c, d]);
            }
        }

        let mut mesh = Mesh::new(PrimitiveTopology::TriangleList, RenderAssetUsages::default());
        mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, positions);
        mesh.insert_attribute(Mesh::ATTRIBUTE_NORMAL, normals);
        mesh.insert_attribute(Mesh::ATTRIBUTE_UV_0, uvs);
        mesh.insert_indices(Indices::U32(indices));

        mesh
    }
}
