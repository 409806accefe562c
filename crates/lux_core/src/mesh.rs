//! Triangle mesh geometry.
//!
//! Meshes carry per-vertex positions, normals and UVs. Triangles are wound
//! counter-clockwise when viewed from the side their normal points to.

use lux_math::{Aabb, Vec2, Vec3};

use crate::scene::SceneError;

/// A mesh consisting of vertex positions, optional normals/UVs, and triangle indices.
#[derive(Clone, Debug)]
pub struct Mesh {
    /// Vertex positions (one Vec3 per vertex)
    pub positions: Vec<Vec3>,

    /// Vertex normals (optional - computed from faces when absent)
    pub normals: Option<Vec<Vec3>>,

    /// UV coordinates (optional - one per vertex)
    pub uvs: Option<Vec<Vec2>>,

    /// Triangle indices (every 3 indices form a triangle)
    pub indices: Vec<u32>,

    /// Axis-aligned bounding box
    pub bounds: Aabb,
}

impl Mesh {
    /// Create a new mesh from positions and indices, optionally with normals.
    pub fn new(positions: Vec<Vec3>, indices: Vec<u32>, normals: Option<Vec<Vec3>>) -> Self {
        Self::new_with_uvs(positions, indices, normals, None)
    }

    /// Create a new mesh with UV coordinates.
    pub fn new_with_uvs(
        positions: Vec<Vec3>,
        indices: Vec<u32>,
        normals: Option<Vec<Vec3>>,
        uvs: Option<Vec<Vec2>>,
    ) -> Self {
        let bounds = Self::compute_bounds(&positions);
        Self {
            positions,
            normals,
            uvs,
            indices,
            bounds,
        }
    }

    /// A single planar quad `p0 p1 p2 p3` (counter-clockwise) with flat normals.
    ///
    /// UVs run from (0, 0) at `p0` to (`uv_scale`, `uv_scale`) at `p2`.
    pub fn quad(p0: Vec3, p1: Vec3, p2: Vec3, p3: Vec3, uv_scale: f32) -> Self {
        let normal = (p1 - p0).cross(p3 - p0).normalize_or_zero();
        let uvs = vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(uv_scale, 0.0),
            Vec2::new(uv_scale, uv_scale),
            Vec2::new(0.0, uv_scale),
        ];
        Self::new_with_uvs(
            vec![p0, p1, p2, p3],
            vec![0, 1, 2, 0, 2, 3],
            Some(vec![normal; 4]),
            Some(uvs),
        )
    }

    /// An axis-aligned box with outward-facing flat normals.
    pub fn cuboid(min: Vec3, max: Vec3) -> Self {
        let center = (min + max) * 0.5;
        let corner = |x: bool, y: bool, z: bool| {
            Vec3::new(
                if x { max.x } else { min.x },
                if y { max.y } else { min.y },
                if z { max.z } else { min.z },
            )
        };

        let faces = [
            [corner(true, false, false), corner(true, true, false), corner(true, true, true), corner(true, false, true)],
            [corner(false, false, false), corner(false, false, true), corner(false, true, true), corner(false, true, false)],
            [corner(false, true, false), corner(false, true, true), corner(true, true, true), corner(true, true, false)],
            [corner(false, false, false), corner(true, false, false), corner(true, false, true), corner(false, false, true)],
            [corner(false, false, true), corner(true, false, true), corner(true, true, true), corner(false, true, true)],
            [corner(false, false, false), corner(false, true, false), corner(true, true, false), corner(true, false, false)],
        ];

        let mut mesh = Mesh::new(Vec::new(), Vec::new(), Some(Vec::new()));
        for [p0, p1, p2, p3] in faces {
            let mut face = Mesh::quad(p0, p1, p2, p3, 1.0);
            let outward = (p0 + p2) * 0.5 - center;
            if face.normals.as_ref().is_some_and(|n| n[0].dot(outward) < 0.0) {
                face = Mesh::quad(p3, p2, p1, p0, 1.0);
            }
            mesh.append(&face);
        }
        mesh
    }

    /// Append another mesh's vertices and triangles to this one.
    ///
    /// Attributes present on only one side are filled in (normals are
    /// recomputed, UVs default to zero).
    pub fn append(&mut self, other: &Mesh) {
        let base = self.positions.len() as u32;
        let self_vertices = self.positions.len();

        match (&mut self.normals, &other.normals) {
            (Some(ours), Some(theirs)) if ours.len() == self_vertices => {
                ours.extend_from_slice(theirs)
            }
            _ => self.normals = None,
        }
        match (&mut self.uvs, &other.uvs) {
            (Some(ours), Some(theirs)) => ours.extend_from_slice(theirs),
            (Some(ours), None) => ours.extend(std::iter::repeat(Vec2::ZERO).take(other.positions.len())),
            (None, Some(theirs)) if self_vertices == 0 => self.uvs = Some(theirs.clone()),
            (None, Some(theirs)) => {
                let mut uvs = vec![Vec2::ZERO; self_vertices];
                uvs.extend_from_slice(theirs);
                self.uvs = Some(uvs);
            }
            (None, None) => {}
        }

        self.positions.extend_from_slice(&other.positions);
        self.indices.extend(other.indices.iter().map(|i| i + base));
        self.bounds = Self::compute_bounds(&self.positions);
        self.ensure_normals();
    }

    /// Compute axis-aligned bounding box from positions.
    fn compute_bounds(positions: &[Vec3]) -> Aabb {
        if positions.is_empty() {
            return Aabb::EMPTY;
        }

        let (min, max) = positions.iter().fold(
            (Vec3::splat(f32::INFINITY), Vec3::splat(f32::NEG_INFINITY)),
            |(min, max), p| (min.min(*p), max.max(*p)),
        );
        Aabb::from_points(min, max)
    }

    /// Compute smooth vertex normals by averaging face normals.
    pub fn compute_normals(&mut self) {
        let vertex_count = self.positions.len();
        let mut normals = vec![Vec3::ZERO; vertex_count];

        for face in self.indices.chunks_exact(3) {
            let [i0, i1, i2] = [face[0] as usize, face[1] as usize, face[2] as usize];
            if i0 >= vertex_count || i1 >= vertex_count || i2 >= vertex_count {
                continue;
            }

            let p0 = self.positions[i0];
            let face_normal = (self.positions[i1] - p0).cross(self.positions[i2] - p0);

            normals[i0] += face_normal;
            normals[i1] += face_normal;
            normals[i2] += face_normal;
        }

        for normal in &mut normals {
            *normal = normal.try_normalize().unwrap_or(Vec3::Y);
        }

        self.normals = Some(normals);
    }

    /// Ensure the mesh has one normal per vertex, computing them if necessary.
    pub fn ensure_normals(&mut self) {
        let should_compute = match &self.normals {
            None => true,
            Some(normals) => normals.len() != self.positions.len(),
        };

        if should_compute {
            if let Some(normals) = &self.normals {
                log::debug!(
                    "Normals array length ({}) doesn't match vertex count ({}), computing smooth normals",
                    normals.len(),
                    self.positions.len()
                );
            }
            self.compute_normals();
        }
    }

    /// Get the number of triangles in the mesh.
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Get the number of vertices in the mesh.
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Vertex indices of triangle `i`.
    pub fn triangle(&self, i: usize) -> [usize; 3] {
        let face = &self.indices[i * 3..i * 3 + 3];
        [face[0] as usize, face[1] as usize, face[2] as usize]
    }

    /// Check index ranges and attribute counts. `model` is only used for error reporting.
    pub fn validate(&self, model: usize) -> Result<(), SceneError> {
        if self.indices.len() % 3 != 0 {
            return Err(SceneError::TriangleIndices {
                model,
                len: self.indices.len(),
            });
        }

        let vertex_count = self.positions.len();
        if let Some(&index) = self.indices.iter().find(|&&i| i as usize >= vertex_count) {
            return Err(SceneError::IndexOutOfRange {
                model,
                index,
                vertex_count,
            });
        }

        if let Some(normals) = &self.normals {
            if normals.len() != vertex_count {
                return Err(SceneError::AttributeCount {
                    model,
                    attribute: "normals",
                    expected: vertex_count,
                    found: normals.len(),
                });
            }
        }
        if let Some(uvs) = &self.uvs {
            if uvs.len() != vertex_count {
                return Err(SceneError::AttributeCount {
                    model,
                    attribute: "uvs",
                    expected: vertex_count,
                    found: uvs.len(),
                });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mesh_creation() {
        let positions = vec![Vec3::ZERO, Vec3::X, Vec3::Y];
        let mesh = Mesh::new(positions, vec![0, 1, 2], None);

        assert_eq!(mesh.vertex_count(), 3);
        assert_eq!(mesh.triangle_count(), 1);
        assert!(mesh.normals.is_none());
        assert_eq!(mesh.triangle(0), [0, 1, 2]);
    }

    #[test]
    fn test_compute_normals_ccw() {
        // Counter-clockwise viewed from +Z produces a +Z normal
        let mut mesh = Mesh::new(vec![Vec3::ZERO, Vec3::X, Vec3::Y], vec![0, 1, 2], None);
        mesh.compute_normals();

        for normal in mesh.normals.as_ref().unwrap() {
            assert!((normal.z - 1.0).abs() < 0.001);
        }
    }

    #[test]
    fn test_bounds_computation() {
        let positions = vec![
            Vec3::new(-1.0, -2.0, -3.0),
            Vec3::new(4.0, 5.0, 6.0),
            Vec3::ZERO,
        ];
        let mesh = Mesh::new(positions, vec![0, 1, 2], None);

        assert!((mesh.bounds.x.min + 1.0).abs() < 0.001);
        assert!((mesh.bounds.y.max - 5.0).abs() < 0.001);
        assert!((mesh.bounds.z.min + 3.0).abs() < 0.001);
    }

    #[test]
    fn test_cuboid_normals_point_outward() {
        let mesh = Mesh::cuboid(Vec3::splat(-1.0), Vec3::splat(1.0));
        assert_eq!(mesh.triangle_count(), 12);
        assert_eq!(mesh.vertex_count(), 24);

        let normals = mesh.normals.as_ref().unwrap();
        for (p, n) in mesh.positions.iter().zip(normals) {
            assert!(p.dot(*n) > 0.0, "normal {n} at {p} points inward");
            assert!((n.length() - 1.0).abs() < 1e-5);
        }
        assert!(mesh.validate(0).is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_indices() {
        let mesh = Mesh::new(vec![Vec3::ZERO, Vec3::X, Vec3::Y], vec![0, 1, 3], None);
        assert!(matches!(
            mesh.validate(2),
            Err(SceneError::IndexOutOfRange { model: 2, index: 3, vertex_count: 3 })
        ));

        let mesh = Mesh::new(vec![Vec3::ZERO, Vec3::X, Vec3::Y], vec![0, 1], None);
        assert!(matches!(mesh.validate(0), Err(SceneError::TriangleIndices { len: 2, .. })));

        let mesh = Mesh::new(vec![Vec3::ZERO, Vec3::X, Vec3::Y], vec![0, 1, 2], Some(vec![Vec3::Z]));
        assert!(matches!(
            mesh.validate(0),
            Err(SceneError::AttributeCount { attribute: "normals", expected: 3, found: 1, .. })
        ));
    }
}
