use crate::Vec3;

/// A ray in 3D space with an origin and a direction.
///
/// Rays are immutable values: integrators build a fresh ray for every bounce
/// instead of mutating one in place. The direction is not required to be
/// normalized; intersection distances are expressed in units of `direction`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    origin: Vec3,
    direction: Vec3,
}

impl Ray {
    /// Create a new ray.
    #[inline]
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self { origin, direction }
    }

    /// Create a ray whose direction is normalized.
    #[inline]
    pub fn normalized(origin: Vec3, direction: Vec3) -> Self {
        Self::new(origin, direction.normalize())
    }

    /// Get the origin point of the ray.
    #[inline]
    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    /// Get the direction vector of the ray.
    #[inline]
    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    /// Get the point along the ray at parameter t.
    ///
    /// Returns: origin + t * direction
    #[inline]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

impl Default for Ray {
    fn default() -> Self {
        Self::new(Vec3::ZERO, Vec3::NEG_Z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ray_at() {
        let ray = Ray::new(Vec3::ZERO, Vec3::X);

        assert_eq!(ray.at(0.0), Vec3::ZERO);
        assert_eq!(ray.at(1.0), Vec3::X);
        assert_eq!(ray.at(2.0), Vec3::new(2.0, 0.0, 0.0));
        assert_eq!(ray.at(-1.0), Vec3::new(-1.0, 0.0, 0.0));
    }

    #[test]
    fn test_ray_unnormalized_direction_scales_t() {
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, 2.0));
        assert_eq!(ray.at(1.5), Vec3::new(0.0, 0.0, 3.0));
    }

    #[test]
    fn test_ray_normalized() {
        let ray = Ray::normalized(Vec3::ONE, Vec3::new(3.0, 0.0, 4.0));
        assert!((ray.direction().length() - 1.0).abs() < 1e-6);
        assert_eq!(ray.origin(), Vec3::ONE);
    }
}
