use crate::{Interval, Ray, Vec3};

/// Axis-Aligned Bounding Box used by the BVH.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Aabb {
    pub x: Interval,
    pub y: Interval,
    pub z: Interval,
}

impl Aabb {
    /// Box containing nothing; the identity for [`Aabb::surrounding`].
    pub const EMPTY: Aabb = Aabb {
        x: Interval::EMPTY,
        y: Interval::EMPTY,
        z: Interval::EMPTY,
    };

    /// Create an AABB from two corner points.
    ///
    /// Thin dimensions are padded so flat triangles still have volume.
    pub fn from_points(a: Vec3, b: Vec3) -> Self {
        let mut aabb = Self {
            x: Interval::new(a.x.min(b.x), a.x.max(b.x)),
            y: Interval::new(a.y.min(b.y), a.y.max(b.y)),
            z: Interval::new(a.z.min(b.z), a.z.max(b.z)),
        };
        aabb.pad_to_minimums();
        aabb
    }

    /// Smallest box around a triangle.
    pub fn from_triangle(p0: Vec3, p1: Vec3, p2: Vec3) -> Self {
        Self::from_points(p0.min(p1).min(p2), p0.max(p1).max(p2))
    }

    /// Create an AABB that surrounds two other AABBs.
    pub fn surrounding(a: &Aabb, b: &Aabb) -> Self {
        Self {
            x: Interval::surrounding(&a.x, &b.x),
            y: Interval::surrounding(&a.y, &b.y),
            z: Interval::surrounding(&a.z, &b.z),
        }
    }

    /// Get the interval for a specific axis (0=X, 1=Y, 2=Z).
    pub fn axis_interval(&self, n: usize) -> Interval {
        match n {
            0 => self.x,
            1 => self.y,
            _ => self.z,
        }
    }

    /// Slab test against the ray within `ray_t`.
    pub fn hit(&self, ray: &Ray, mut ray_t: Interval) -> bool {
        let origin = ray.origin();
        let direction = ray.direction();

        for axis in 0..3 {
            let slab = self.axis_interval(axis);
            let inv_d = 1.0 / direction[axis];
            let mut t0 = (slab.min - origin[axis]) * inv_d;
            let mut t1 = (slab.max - origin[axis]) * inv_d;
            if inv_d < 0.0 {
                std::mem::swap(&mut t0, &mut t1);
            }
            ray_t.min = t0.max(ray_t.min);
            ray_t.max = t1.min(ray_t.max);
            if ray_t.max < ray_t.min {
                return false;
            }
        }

        true
    }

    /// Returns the index (0=X, 1=Y, 2=Z) of the axis with the longest extent.
    pub fn longest_axis(&self) -> usize {
        let x_size = self.x.size();
        let y_size = self.y.size();
        let z_size = self.z.size();

        if x_size > y_size && x_size > z_size {
            0
        } else if y_size > z_size {
            1
        } else {
            2
        }
    }

    /// Returns the center point of the bounding box.
    pub fn centroid(&self) -> Vec3 {
        Vec3::new(
            (self.x.min + self.x.max) * 0.5,
            (self.y.min + self.y.max) * 0.5,
            (self.z.min + self.z.max) * 0.5,
        )
    }

    fn pad_to_minimums(&mut self) {
        let delta = 0.0001;
        if self.x.size() < delta {
            self.x = self.x.expand(delta);
        }
        if self.y.size() < delta {
            self.y = self.y.expand(delta);
        }
        if self.z.size() < delta {
            self.z = self.z.expand(delta);
        }
    }
}
