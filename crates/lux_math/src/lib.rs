// Re-export glam for convenience
pub use glam::*;

// Lux math types
mod aabb;
mod intersection;
mod interval;
mod ray;

pub use aabb::Aabb;
pub use intersection::Intersection;
pub use interval::Interval;
pub use ray::Ray;

/// Linear RGB color.
pub type Color = Vec3;

/// Largest of the three components of a color.
#[inline]
pub fn max_channel(c: Color) -> f32 {
    c.x.max(c.y).max(c.z)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_max_channel() {
        assert_eq!(max_channel(Color::new(0.1, 0.7, 0.3)), 0.7);
        assert_eq!(max_channel(Color::ZERO), 0.0);
    }

    #[test]
    fn test_vec3_operations() {
        let a = Vec3::new(1.0, 2.0, 3.0);
        let b = Vec3::new(4.0, 5.0, 6.0);
        assert_eq!(a + b, Vec3::new(5.0, 7.0, 9.0));
        assert_eq!(a * b, Vec3::new(4.0, 10.0, 18.0));
    }
}
