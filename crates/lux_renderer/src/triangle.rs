//! Triangle primitive for ray tracing.
//!
//! Uses the Möller-Trumbore algorithm for ray-triangle intersection.

use lux_math::{Aabb, Intersection, Interval, Ray, Vec2, Vec3};

/// Determinant tolerance, per unit of direction length, below which a ray
/// counts as parallel to a triangle.
const PARALLEL_EPSILON: f32 = 5e-5;

/// Möller-Trumbore ray-triangle intersection.
///
/// Returns the ray parameter `t` and barycentrics `(u, v)` of the hit, with
/// `p1 + u·(p2 − p1) + v·(p3 − p1) == ray.at(t)`. The direction is used as
/// given, so `t` is in units of `ray.direction()`. Hits behind the origin
/// are reported too; callers clip `t` to the interval they care about.
pub fn intersect_triangle(ray: &Ray, p1: Vec3, p2: Vec3, p3: Vec3) -> Option<Intersection> {
    let edge1 = p2 - p1;
    let edge2 = p3 - p1;

    let h = ray.direction().cross(edge2);
    let det = edge1.dot(h);

    // Ray is parallel to triangle. `det` scales with the direction's length,
    // so the tolerance does too.
    if det.abs() < PARALLEL_EPSILON * ray.direction().length() {
        return None;
    }

    let inv_det = 1.0 / det;
    let s = ray.origin() - p1;
    let u = inv_det * s.dot(h);
    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let q = s.cross(edge1);
    let v = inv_det * ray.direction().dot(q);
    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = inv_det * edge2.dot(q);
    Some(Intersection::new(t, u, v))
}

/// A world-space triangle flattened out of a scene model.
#[derive(Debug, Clone)]
pub struct Triangle {
    pub positions: [Vec3; 3],
    pub normals: [Vec3; 3],
    pub uvs: [Vec2; 3],
    /// Index into the scene's material list
    pub material: usize,
    bbox: Aabb,
}

impl Triangle {
    pub fn new(positions: [Vec3; 3], normals: [Vec3; 3], uvs: [Vec2; 3], material: usize) -> Self {
        let bbox = Aabb::from_triangle(positions[0], positions[1], positions[2]);
        Self {
            positions,
            normals,
            uvs,
            material,
            bbox,
        }
    }

    /// Intersect the ray, accepting only hits with `t` inside `ray_t`.
    #[inline]
    pub fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<Intersection> {
        let [p1, p2, p3] = self.positions;
        intersect_triangle(ray, p1, p2, p3).filter(|hit| ray_t.contains(hit.t))
    }

    pub fn bounding_box(&self) -> Aabb {
        self.bbox
    }

    pub fn centroid(&self) -> Vec3 {
        (self.positions[0] + self.positions[1] + self.positions[2]) / 3.0
    }

    /// Interpolated position at a hit.
    pub fn position_at(&self, hit: &Intersection) -> Vec3 {
        hit.interpolate(self.positions[0], self.positions[1], self.positions[2])
    }

    /// Interpolated, normalized shading normal at a hit.
    pub fn normal_at(&self, hit: &Intersection) -> Vec3 {
        let n = hit.interpolate(self.normals[0], self.normals[1], self.normals[2]);
        let n = n.normalize_or_zero();
        if n == Vec3::ZERO {
            self.face_normal()
        } else {
            n
        }
    }

    pub fn uv_at(&self, hit: &Intersection) -> Vec2 {
        hit.interpolate(self.uvs[0], self.uvs[1], self.uvs[2])
    }

    /// Geometric normal from the CCW winding.
    pub fn face_normal(&self) -> Vec3 {
        let [p1, p2, p3] = self.positions;
        (p2 - p1).cross(p3 - p1).normalize_or_zero()
    }
}
