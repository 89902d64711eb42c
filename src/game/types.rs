//! Shared Types Module
//!
//! CPU-side meshes and the procedural shapes used by the race: a UV sphere
//! for marbles and a flat quad for the floor.

use glam::Vec3;

use crate::render::MeshVertex;

// ============================================================================
// MESH STRUCTURE
// ============================================================================

/// Indexed triangle list.
#[derive(Clone, Debug, Default)]
pub struct Mesh {
    pub vertices: Vec<MeshVertex>,
    pub indices: Vec<u32>,
}

impl Mesh {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn merge(&mut self, other: &Mesh) {
        let base_idx = self.vertices.len() as u32;
        self.vertices.extend_from_slice(&other.vertices);
        self.indices.extend(other.indices.iter().map(|i| i + base_idx));
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

// ============================================================================
// PROCEDURAL SHAPES
// ============================================================================

/// UV sphere centered on `center`.
///
/// `segments` is used for both latitude and longitude and is raised to 3.
pub fn generate_sphere(center: Vec3, radius: f32, color: [f32; 4], segments: u32) -> Mesh {
    let segments = segments.max(3);
    let ring = segments + 1;
    let mut mesh = Mesh {
        vertices: Vec::with_capacity((ring * ring) as usize),
        indices: Vec::with_capacity((segments * segments * 6) as usize),
    };

    for lat in 0..=segments {
        let theta = lat as f32 * std::f32::consts::PI / segments as f32;
        let (sin_theta, cos_theta) = theta.sin_cos();

        for lon in 0..=segments {
            let phi = lon as f32 * std::f32::consts::TAU / segments as f32;
            let (sin_phi, cos_phi) = phi.sin_cos();

            let normal = Vec3::new(sin_theta * cos_phi, cos_theta, sin_theta * sin_phi);
            let position = center + normal * radius;
            mesh.vertices.push(MeshVertex {
                position: position.to_array(),
                normal: normal.to_array(),
                color,
            });
        }
    }

    for lat in 0..segments {
        for lon in 0..segments {
            let first = lat * ring + lon;
            let second = first + ring;
            mesh.indices
                .extend_from_slice(&[first, second, first + 1, second, second + 1, first + 1]);
        }
    }

    mesh
}

/// Horizontal square at height `y`, facing up, spanning ±`half_extent` on X and Z.
pub fn generate_floor(half_extent: f32, y: f32, color: [f32; 4]) -> Mesh {
    let h = half_extent;
    let normal = [0.0, 1.0, 0.0];
    let vertices = [[-h, y, -h], [h, y, -h], [h, y, h], [-h, y, h]]
        .into_iter()
        .map(|position| MeshVertex {
            position,
            normal,
            color,
        })
        .collect();

    Mesh {
        vertices,
        // Counter-clockwise seen from above
        indices: vec![0, 3, 2, 0, 2, 1],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sphere_vertices_on_surface() {
        let center = Vec3::new(1.0, 2.0, 3.0);
        let mesh = generate_sphere(center, 2.0, [1.0; 4], 12);
        assert_eq!(mesh.vertices.len(), 13 * 13);
        assert_eq!(mesh.triangle_count(), 12 * 12 * 2);
        for v in &mesh.vertices {
            let p = Vec3::from_array(v.position);
            assert!(((p - center).length() - 2.0).abs() < 1e-4);
            assert!((Vec3::from_array(v.normal).length() - 1.0).abs() < 1e-4);
        }
    }

    #[test]
    fn test_sphere_indices_in_range() {
        let mesh = generate_sphere(Vec3::ZERO, 1.0, [1.0; 4], 8);
        let count = mesh.vertices.len() as u32;
        assert!(mesh.indices.iter().all(|&i| i < count));
    }

    #[test]
    fn test_sphere_segment_floor() {
        let mesh = generate_sphere(Vec3::ZERO, 1.0, [1.0; 4], 0);
        assert_eq!(mesh.vertices.len(), 16);
    }

    #[test]
    fn test_floor_quad() {
        let mesh = generate_floor(1000.0, 0.0, [0.5, 0.5, 0.5, 1.0]);
        assert_eq!(mesh.vertices.len(), 4);
        assert_eq!(mesh.triangle_count(), 2);
        assert!(mesh.vertices.iter().all(|v| v.normal == [0.0, 1.0, 0.0]));
        assert!(mesh.vertices.iter().all(|v| v.position[0].abs() == 1000.0));
    }

    #[test]
    fn test_floor_faces_up() {
        let mesh = generate_floor(1.0, 0.0, [1.0; 4]);
        let p = |i: u32| Vec3::from_array(mesh.vertices[i as usize].position);
        let (a, b, c) = (p(mesh.indices[0]), p(mesh.indices[1]), p(mesh.indices[2]));
        assert!((b - a).cross(c - a).y > 0.0);
    }

    #[test]
    fn test_merge_offsets_indices() {
        let mut a = generate_floor(1.0, 0.0, [1.0; 4]);
        let b = generate_floor(2.0, 1.0, [1.0; 4]);
        a.merge(&b);
        assert_eq!(a.vertices.len(), 8);
        assert_eq!(&a.indices[6..], &[4, 7, 6, 4, 6, 5]);
    }
}
