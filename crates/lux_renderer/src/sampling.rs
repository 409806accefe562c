//! Random sampling helpers shared by the BRDF and the integrators.

use std::f32::consts::PI;

use lux_math::Vec3;
use rand::{Rng, RngCore};

/// Uniform float in [0, 1).
#[inline]
pub fn gen_f32(rng: &mut dyn RngCore) -> f32 {
    rng.gen::<f32>()
}

/// Reflect `v` about the normal `n`.
#[inline]
pub fn reflect(v: Vec3, n: Vec3) -> Vec3 {
    v - 2.0 * v.dot(n) * n
}

/// Flip `normal` so it lies in the same hemisphere as `toward`.
#[inline]
pub fn face_forward(normal: Vec3, toward: Vec3) -> Vec3 {
    if normal.dot(toward) < 0.0 {
        -normal
    } else {
        normal
    }
}

/// Orthonormal tangent frame `(x, y)` around unit `z`.
///
/// The helper axis is the world axis least aligned with `z`.
fn tangent_frame(z: Vec3) -> (Vec3, Vec3) {
    let a = z.abs();
    let helper = if a.x <= a.y && a.x <= a.z {
        Vec3::X
    } else if a.y <= a.x && a.y <= a.z {
        Vec3::Y
    } else {
        Vec3::Z
    };
    let x = helper.cross(z).normalize();
    let y = z.cross(x).normalize();
    (x, y)
}

/// Map a local-frame direction (z up) into the frame around `normal`.
#[inline]
fn to_world(local: Vec3, normal: Vec3) -> Vec3 {
    let z = normal.normalize();
    let (x, y) = tangent_frame(z);
    local.x * x + local.y * y + local.z * z
}

/// Cosine-weighted direction on the hemisphere around `normal` (pdf cosθ/π).
pub fn sample_hemisphere_cosine(normal: Vec3, rng: &mut dyn RngCore) -> Vec3 {
    let u1 = gen_f32(rng);
    let u2 = gen_f32(rng);

    let r = u1.sqrt();
    let theta = 2.0 * PI * u2;
    let z = (1.0 - u1).max(0.0).sqrt();
    to_world(Vec3::new(r * theta.cos(), r * theta.sin(), z), normal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_reflect() {
        let r = reflect(Vec3::new(1.0, -1.0, 0.0), Vec3::Y);
        assert_eq!(r, Vec3::new(1.0, 1.0, 0.0));
    }

    #[test]
    fn test_face_forward() {
        assert_eq!(face_forward(Vec3::Y, Vec3::new(0.3, 1.0, 0.0)), Vec3::Y);
        assert_eq!(face_forward(Vec3::Y, Vec3::new(0.3, -1.0, 0.0)), Vec3::NEG_Y);
    }

    #[test]
    fn test_tangent_frame_is_orthonormal() {
        for z in [Vec3::X, Vec3::Y, Vec3::Z, Vec3::new(1.0, 2.0, -3.0).normalize()] {
            let (x, y) = tangent_frame(z);
            assert!(x.dot(y).abs() < 1e-5);
            assert!(x.dot(z).abs() < 1e-5);
            assert!(y.dot(z).abs() < 1e-5);
            assert!((x.length() - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_hemisphere_samples_stay_above_surface() {
        let mut rng = StdRng::seed_from_u64(7);
        let normal = Vec3::new(0.2, 0.9, -0.4).normalize();
        for _ in 0..1000 {
            let c = sample_hemisphere_cosine(normal, &mut rng);
            assert!(c.dot(normal) >= -1e-5);
            assert!((c.length() - 1.0).abs() < 1e-4);
        }
    }

    #[test]
    fn test_cosine_sampling_mean() {
        // E[cosθ] under cosine-weighted sampling is 2/3
        let mut rng = StdRng::seed_from_u64(11);
        let n = 20_000;
        let mean: f32 = (0..n)
            .map(|_| sample_hemisphere_cosine(Vec3::Z, &mut rng).z)
            .sum::<f32>()
            / n as f32;
        assert!((mean - 2.0 / 3.0).abs() < 0.01, "mean cos = {mean}");
    }
}
