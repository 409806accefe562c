//! Primary ray generation.

use lux_core::Camera;
use lux_math::{Ray, Vec3};

/// Generates camera rays for an image of a fixed size.
///
/// Image coordinates are continuous: pixel `(x, y)` covers
/// `[x, x+1) × [y, y+1)` and `y = 0` is the bottom row.
#[derive(Debug, Clone, Copy)]
pub struct PrimaryRays {
    eye: Vec3,
    look: Vec3,
    right: Vec3,
    up: Vec3,
    /// tan(fovy / 2)
    half_height: f32,
    aspect: f32,
    width: f32,
    height: f32,
}

impl PrimaryRays {
    pub fn new(camera: &Camera, width: u32, height: u32) -> Self {
        let look = camera.look_direction();
        let right = look.cross(camera.up).normalize();
        let up = right.cross(look).normalize();
        let width = width.max(1) as f32;
        let height = height.max(1) as f32;

        Self {
            eye: camera.eye,
            look,
            right,
            up,
            half_height: (camera.fovy.to_radians() * 0.5).tan(),
            aspect: width / height,
            width,
            height,
        }
    }

    /// Ray through the image-plane point `(x, y)` in pixel units.
    pub fn ray(&self, x: f32, y: f32) -> Ray {
        let sx = 2.0 * x / self.width - 1.0;
        let sy = 2.0 * y / self.height - 1.0;
        let direction = self.look
            + self.up * (self.half_height * sy)
            + self.right * (self.half_height * self.aspect * sx);
        Ray::normalized(self.eye, direction)
    }

    /// Ray through the center of pixel `(x, y)`.
    pub fn pixel_center(&self, x: u32, y: u32) -> Ray {
        self.ray(x as f32 + 0.5, y as f32 + 0.5)
    }
}
