//! Render settings and per-pixel sampling.
//!
//! Implements:
//! - Integrator selection (path tracing or Whitted)
//! - Stratified, optionally jittered super-sampling
//! - Gamma correction for display

use lux_core::Camera;
use lux_math::{Color, Ray};
use rand::RngCore;
use serde::{Deserialize, Serialize};

use crate::camera::PrimaryRays;
use crate::error::RenderError;
use crate::framebuffer::Framebuffer;
use crate::intersector::RayIntersector;
use crate::path::path_trace;
use crate::sampling::gen_f32;
use crate::whitted::ray_trace;

/// Gamma applied when converting linear radiance for display.
pub const DISPLAY_GAMMA: f32 = 2.2;

/// Light transport algorithm used for final renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntegratorKind {
    /// Monte Carlo path tracing
    #[default]
    Path,
    /// Whitted ray tracing
    Whitted,
}

/// Render configuration.
///
/// Every field has a default, so a settings file only needs the values it
/// changes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    pub integrator: IntegratorKind,
    /// Samples per pixel per frame
    pub samples_per_pixel: u32,
    /// Maximum bounces for path tracing
    pub max_bounces: u32,
    /// Maximum surface interactions for Whitted tracing
    pub max_depth: u32,
    /// Hard shadows in Whitted tracing
    pub enable_shadow: bool,
    pub enable_direct_lighting: bool,
    pub enable_russian_roulette: bool,
    pub enable_next_event_estimation: bool,
    /// Scale of the constant sky radiance seen by escaping paths
    pub sky_intensity: f32,
    /// Color of the constant sky
    pub sky_color: Color,
    /// Sub-pixel grid resolution; each sample is split into rate² rays
    pub super_sample_rate: u32,
    /// Jitter sub-pixel positions within their grid cell
    pub jitter: bool,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            integrator: IntegratorKind::Path,
            samples_per_pixel: 16,
            max_bounces: 5,
            max_depth: 4,
            enable_shadow: true,
            enable_direct_lighting: true,
            enable_russian_roulette: true,
            enable_next_event_estimation: true,
            sky_intensity: 0.8,
            sky_color: Color::new(0.7, 0.8, 1.0),
            super_sample_rate: 1,
            jitter: true,
        }
    }
}

impl RenderSettings {
    /// Reject settings that cannot produce an image.
    pub fn validate(&self) -> Result<(), RenderError> {
        if self.samples_per_pixel == 0 {
            return Err(RenderError::InvalidSettings(
                "samples_per_pixel must be at least 1".into(),
            ));
        }
        if self.super_sample_rate == 0 {
            return Err(RenderError::InvalidSettings(
                "super_sample_rate must be at least 1".into(),
            ));
        }
        if !self.sky_intensity.is_finite() || self.sky_intensity < 0.0 {
            return Err(RenderError::InvalidSettings(format!(
                "sky_intensity must be a non-negative number, got {}",
                self.sky_intensity
            )));
        }
        Ok(())
    }

    /// Camera rays traced per pixel per frame.
    pub fn rays_per_pixel(&self) -> u32 {
        self.samples_per_pixel * self.super_sample_rate * self.super_sample_rate
    }
}

/// Radiance along `ray` using the configured integrator.
pub fn trace(intersector: &RayIntersector, ray: Ray, settings: &RenderSettings, rng: &mut dyn RngCore) -> Color {
    match settings.integrator {
        IntegratorKind::Path => path_trace(intersector, ray, settings, rng),
        IntegratorKind::Whitted => ray_trace(intersector, ray, settings.max_depth, settings.enable_shadow),
    }
}

/// Average `radiance` over the sub-pixel sample pattern of pixel `(x, y)`.
///
/// Each of `samples_per_pixel` passes covers the pixel with a
/// `super_sample_rate`² grid; with jitter on, each ray lands at a random
/// point inside its grid cell, otherwise at the cell center.
pub fn sample_pixel<F>(
    rays: &PrimaryRays,
    x: u32,
    y: u32,
    settings: &RenderSettings,
    rng: &mut dyn RngCore,
    mut radiance: F,
) -> Color
where
    F: FnMut(Ray, &mut dyn RngCore) -> Color,
{
    let rate = settings.super_sample_rate.max(1);
    let cell = 1.0 / rate as f32;
    let mut sum = Color::ZERO;

    for _ in 0..settings.samples_per_pixel {
        for sy in 0..rate {
            for sx in 0..rate {
                let (jx, jy) = if settings.jitter {
                    (gen_f32(rng), gen_f32(rng))
                } else {
                    (0.5, 0.5)
                };
                let px = x as f32 + (sx as f32 + jx) * cell;
                let py = y as f32 + (sy as f32 + jy) * cell;
                sum += radiance(rays.ray(px, py), &mut *rng);
            }
        }
    }

    sum / settings.rays_per_pixel().max(1) as f32
}

/// Render a single pixel with the configured integrator.
pub fn render_pixel(
    intersector: &RayIntersector,
    rays: &PrimaryRays,
    x: u32,
    y: u32,
    settings: &RenderSettings,
    rng: &mut dyn RngCore,
) -> Color {
    sample_pixel(rays, x, y, settings, rng, |ray, rng| trace(intersector, ray, settings, rng))
}

/// Render a full image on the calling thread.
pub fn render(
    intersector: &RayIntersector,
    camera: &Camera,
    width: u32,
    height: u32,
    settings: &RenderSettings,
    rng: &mut dyn RngCore,
) -> Result<Framebuffer, RenderError> {
    if width == 0 || height == 0 {
        return Err(RenderError::InvalidResolution { width, height });
    }
    settings.validate()?;

    let rays = PrimaryRays::new(camera, width, height);
    let mut image = Framebuffer::new(width, height);
    for y in 0..height {
        for x in 0..width {
            image.set(x, y, render_pixel(intersector, &rays, x, y, settings, rng));
        }
    }
    Ok(image)
}

/// Apply display gamma to one linear channel.
#[inline]
pub fn linear_to_gamma(linear: f32) -> f32 {
    if linear > 0.0 {
        linear.powf(1.0 / DISPLAY_GAMMA)
    } else {
        0.0
    }
}

/// Convert a display-referred (already gamma-encoded) color to 8-bit RGBA.
pub fn color_to_rgba(color: Color) -> [u8; 4] {
    let r = (255.0 * color.x.clamp(0.0, 1.0)) as u8;
    let g = (255.0 * color.y.clamp(0.0, 1.0)) as u8;
    let b = (255.0 * color.z.clamp(0.0, 1.0)) as u8;
    [r, g, b, 255]
}
