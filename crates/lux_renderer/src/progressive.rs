//! Progressive path tracing.

use std::time::Instant;

use lux_core::Camera;
use lux_math::Color;
use rand::RngCore;

use crate::camera::PrimaryRays;
use crate::framebuffer::Framebuffer;
use crate::intersector::RayIntersector;
use crate::path::path_trace;
use crate::renderer::{linear_to_gamma, sample_pixel, RenderSettings};

/// Accumulates path-traced frames into a running per-pixel mean.
///
/// Every frame traces `samples_per_pixel` paths per pixel (always with the
/// path tracer, whatever integrator the settings name) and folds their
/// average into the accumulator. The display buffer holds the
/// gamma-encoded mean.
#[derive(Debug, Clone)]
pub struct ProgressivePathTracer {
    accumulator: Framebuffer,
    display: Framebuffer,
    sample_count: u32,
}

impl ProgressivePathTracer {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            accumulator: Framebuffer::new(width, height),
            display: Framebuffer::new(width, height),
            sample_count: 0,
        }
    }

    /// Trace one more frame and fold it into the running mean.
    pub fn render_frame(
        &mut self,
        intersector: &RayIntersector,
        camera: &Camera,
        settings: &RenderSettings,
        rng: &mut dyn RngCore,
    ) {
        let start = Instant::now();
        let (width, height) = (self.width(), self.height());
        let rays = PrimaryRays::new(camera, width, height);

        self.sample_count += 1;
        let n = self.sample_count as f32;

        for y in 0..height {
            for x in 0..width {
                let frame = sample_pixel(&rays, x, y, settings, rng, |ray, rng| {
                    path_trace(intersector, ray, settings, rng)
                });
                let mean = (self.accumulator.get(x, y) * (n - 1.0) + frame) / n;
                self.accumulator.set(x, y, mean);
                self.display.set(
                    x,
                    y,
                    Color::new(linear_to_gamma(mean.x), linear_to_gamma(mean.y), linear_to_gamma(mean.z)),
                );
            }
        }

        log::debug!(
            "Progressive frame {} ({}x{}, {} spp) in {:.2?}",
            self.sample_count,
            width,
            height,
            settings.samples_per_pixel,
            start.elapsed()
        );
    }

    /// Restart accumulation.
    ///
    /// Only the frame counter is reset: the next frame has weight 1 and
    /// replaces the stale mean entirely.
    pub fn reset(&mut self) {
        self.sample_count = 0;
    }

    /// Frames accumulated since creation or the last reset.
    pub fn sample_count(&self) -> u32 {
        self.sample_count
    }

    /// Linear running mean.
    pub fn accumulator(&self) -> &Framebuffer {
        &self.accumulator
    }

    /// Gamma-encoded running mean for display.
    pub fn buffer(&self) -> &Framebuffer {
        &self.display
    }

    pub fn width(&self) -> u32 {
        self.accumulator.width()
    }

    pub fn height(&self) -> u32 {
        self.accumulator.height()
    }
}
