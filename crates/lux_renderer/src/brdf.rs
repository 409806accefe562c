//! Cook-Torrance microfacet BRDF.
//!
//! GGX normal distribution, Smith-Schlick geometry term and Schlick
//! Fresnel over a Lambertian base, derived from a material's albedo and
//! meta-specular texels.

use std::f32::consts::PI;

use lux_math::{Color, Vec3, Vec4};
use rand::RngCore;

use crate::hit::SurfaceHit;
use crate::sampling::{gen_f32, reflect, sample_hemisphere_cosine};

/// Fresnel reflectance at normal incidence for dielectrics
const DIELECTRIC_F0: f32 = 0.04;

/// Added to the specular denominator so grazing angles stay finite
const SPECULAR_DENOM_EPSILON: f32 = 0.001;

/// Lobe weights below this fall back to uniform hemisphere pdf
const MIN_LOBE_WEIGHT: f32 = 1e-5;

/// Scale from normalized shininess to a Phong-style exponent
const SHININESS_SCALE: f32 = 256.0;

/// Reflectance model at a surface point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Brdf {
    /// Lambertian albedo (linear)
    pub diffuse: Color,
    /// Specular tint
    pub specular: Color,
    /// Perceptual roughness in [0.01, 1]
    pub roughness: f32,
    /// Metallic in [0, 1]
    pub metallic: f32,
    /// Index of refraction (reserved for transmission)
    pub ior: f32,
}

/// A sampled incident direction and its pdf.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BrdfSample {
    pub wi: Vec3,
    pub pdf: f32,
}

impl Brdf {
    /// Derive BRDF parameters from material texels.
    ///
    /// Roughness comes from the meta-spec shininess, metallic from the
    /// magnitude of the specular tint. Metals darken their diffuse lobe and
    /// tint their specular lobe toward it.
    pub fn from_material(albedo: Vec4, meta_spec: Vec4) -> Self {
        let mut diffuse = albedo.truncate();
        let mut specular = meta_spec.truncate();
        let shininess = meta_spec.w * SHININESS_SCALE;

        let roughness = (1.0 - shininess / SHININESS_SCALE).clamp(0.01, 1.0);
        let metallic = (specular.length() * 2.0 - 1.0).clamp(0.0, 1.0);

        if metallic > 0.5 {
            diffuse = diffuse.lerp(Color::ZERO, metallic);
            specular = Color::splat(DIELECTRIC_F0).lerp(diffuse, metallic);
        }

        Self {
            diffuse,
            specular,
            roughness,
            metallic,
            ior: 1.5,
        }
    }

    /// Evaluate the BRDF for incident `wi` and outgoing `wo` around unit `n`.
    pub fn evaluate(&self, wi: Vec3, wo: Vec3, n: Vec3) -> Color {
        let h = (wi + wo).normalize_or_zero();

        let n_dot_l = n.dot(wi).max(0.0);
        let n_dot_v = n.dot(wo).max(0.0);
        let n_dot_h = n.dot(h).max(0.0);
        let v_dot_h = wo.dot(h).max(0.0);

        let d = ggx_d(n_dot_h, self.roughness);
        let g = smith_g(n_dot_v, n_dot_l, self.roughness);
        let f = self.fresnel_schlick(v_dot_h);

        let specular = f * d * g / (4.0 * n_dot_l * n_dot_v + SPECULAR_DENOM_EPSILON);
        let kd = (Color::ONE - f) * (1.0 - self.metallic);

        kd * self.diffuse / PI + specular
    }

    /// Importance-sample an incident direction for outgoing `wo`.
    ///
    /// Mirror-like surfaces reflect perfectly (pdf 1). Otherwise a fair coin
    /// picks cosine-weighted diffuse sampling or GGX half-vector sampling;
    /// the reported pdf is that of the chosen lobe only.
    pub fn sample(&self, wo: Vec3, n: Vec3, rng: &mut dyn RngCore) -> BrdfSample {
        if self.is_specular() {
            return BrdfSample {
                wi: reflect(-wo, n),
                pdf: 1.0,
            };
        }

        if gen_f32(rng) < 0.5 {
            let wi = sample_hemisphere_cosine(n, rng);
            BrdfSample {
                wi,
                pdf: n.dot(wi).max(0.0) / PI,
            }
        } else {
            let h = sample_ggx_half_vector(n, self.roughness, rng);
            let wi = reflect(-wo, h);
            BrdfSample {
                wi,
                pdf: ggx_pdf(n.dot(h).max(0.0), wo.dot(h), self.roughness),
            }
        }
    }

    /// Mixture pdf of sampling `wi`, weighting the diffuse and specular
    /// lobes by their relative strength.
    pub fn pdf(&self, wi: Vec3, wo: Vec3, n: Vec3) -> f32 {
        let diffuse_weight = self.diffuse.length() * (1.0 - self.metallic);
        let specular_weight = self.specular.length();
        let total = diffuse_weight + specular_weight;

        if total < MIN_LOBE_WEIGHT {
            return 1.0 / (2.0 * PI);
        }

        let diffuse_prob = diffuse_weight / total;
        let cosine_pdf = n.dot(wi).max(0.0) / PI;

        let h = (wi + wo).normalize_or_zero();
        let specular_pdf = ggx_pdf(n.dot(h).max(0.0), wo.dot(h), self.roughness);

        diffuse_prob * cosine_pdf + (1.0 - diffuse_prob) * specular_pdf
    }

    /// Schlick's Fresnel approximation, with F0 blended from the dielectric
    /// constant toward the diffuse color by `metallic`.
    pub fn fresnel_schlick(&self, cos_theta: f32) -> Color {
        let f0 = Color::splat(DIELECTRIC_F0).lerp(self.diffuse, self.metallic);
        f0 + (Color::ONE - f0) * schlick_weight(cos_theta)
    }

    /// True for near-perfect mirrors.
    pub fn is_specular(&self) -> bool {
        self.metallic > 0.8 && self.roughness < 0.1
    }

    /// Transmission is not modelled by this BRDF.
    pub fn is_transparent(&self) -> bool {
        false
    }
}

impl From<&SurfaceHit> for Brdf {
    fn from(hit: &SurfaceHit) -> Self {
        Self::from_material(hit.albedo, hit.meta_spec)
    }
}

/// (1 - cosθ)^5
#[inline]
fn schlick_weight(cos_theta: f32) -> f32 {
    (1.0 - cos_theta).clamp(0.0, 1.0).powi(5)
}

/// GGX/Trowbridge-Reitz normal distribution with α = roughness².
#[inline]
fn ggx_d(n_dot_h: f32, roughness: f32) -> f32 {
    let alpha = roughness * roughness;
    let a2 = alpha * alpha;
    let denom = n_dot_h * n_dot_h * (a2 - 1.0) + 1.0;
    a2 / (PI * denom * denom)
}

/// Smith geometry term with the Schlick-GGX approximation, k = (r+1)²/8.
#[inline]
fn smith_g(n_dot_v: f32, n_dot_l: f32, roughness: f32) -> f32 {
    let r = roughness + 1.0;
    let k = r * r / 8.0;
    let g1 = |n_dot_x: f32| n_dot_x / (n_dot_x * (1.0 - k) + k);
    g1(n_dot_v) * g1(n_dot_l)
}

/// Solid-angle pdf of a GGX-sampled reflection direction.
#[inline]
fn ggx_pdf(n_dot_h: f32, v_dot_h: f32, roughness: f32) -> f32 {
    if v_dot_h <= 0.0 {
        return 0.0;
    }
    ggx_d(n_dot_h, roughness) * n_dot_h / (4.0 * v_dot_h)
}

/// Sample a GGX-distributed half vector around `n`.
fn sample_ggx_half_vector(n: Vec3, roughness: f32, rng: &mut dyn RngCore) -> Vec3 {
    let u1 = gen_f32(rng);
    let u2 = gen_f32(rng);

    let alpha = roughness * roughness;
    let phi = 2.0 * PI * u1;
    let cos_theta = ((1.0 - u2) / (1.0 + (alpha * alpha - 1.0) * u2)).sqrt();
    let sin_theta = (1.0 - cos_theta * cos_theta).max(0.0).sqrt();

    let up = if n.y.abs() > 0.999 { Vec3::X } else { Vec3::Y };
    let tangent_x = up.cross(n).normalize();
    let tangent_y = n.cross(tangent_x);

    (tangent_x * (sin_theta * phi.cos()) + tangent_y * (sin_theta * phi.sin()) + n * cos_theta).normalize()
}
