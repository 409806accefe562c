use lux_math::{Ray, Vec2, Vec3, Vec4};

/// Everything the integrators need to know about the nearest surface hit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceHit {
    /// Ray parameter of the hit
    pub t: f32,
    /// World-space hit position
    pub position: Vec3,
    /// Unit shading normal, flipped to face the incoming ray
    pub normal: Vec3,
    /// True when the ray hit the side the authored normal points to
    pub front_face: bool,
    pub uv: Vec2,
    /// Linear albedo (RGB) and opacity (A)
    pub albedo: Vec4,
    /// Specular tint (RGB) and shininess (A)
    pub meta_spec: Vec4,
}

impl SurfaceHit {
    /// Store `outward_normal` so that it opposes the ray direction.
    pub fn set_face_normal(&mut self, ray: &Ray, outward_normal: Vec3) {
        self.front_face = ray.direction().dot(outward_normal) < 0.0;
        self.normal = if self.front_face {
            outward_normal
        } else {
            -outward_normal
        };
    }

    pub fn opacity(&self) -> f32 {
        self.albedo.w
    }
}

impl Default for SurfaceHit {
    fn default() -> Self {
        Self {
            t: 0.0,
            position: Vec3::ZERO,
            normal: Vec3::Y,
            front_face: true,
            uv: Vec2::ZERO,
            albedo: Vec4::ONE,
            meta_spec: Vec4::ZERO,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_face_normal() {
        let mut hit = SurfaceHit::default();

        hit.set_face_normal(&Ray::new(Vec3::Y, Vec3::NEG_Y), Vec3::Y);
        assert!(hit.front_face);
        assert_eq!(hit.normal, Vec3::Y);

        hit.set_face_normal(&Ray::new(Vec3::NEG_Y, Vec3::Y), Vec3::Y);
        assert!(!hit.front_face);
        assert_eq!(hit.normal, Vec3::NEG_Y);
    }
}
