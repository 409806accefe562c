use lux_math::Vec3;
use serde::{Deserialize, Serialize};

/// Pinhole camera description.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    /// Vertical field of view in degrees
    pub fovy: f32,
}

impl Camera {
    /// Create a new camera looking from `eye` at `target` with +Y up.
    pub fn new(eye: Vec3, target: Vec3, fovy: f32) -> Self {
        Self {
            eye,
            target,
            up: Vec3::Y,
            fovy,
        }
    }

    /// Override the up vector.
    pub fn with_up(mut self, up: Vec3) -> Self {
        self.up = up;
        self
    }

    /// Unit view direction.
    pub fn look_direction(&self) -> Vec3 {
        (self.target - self.eye).normalize()
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO, 45.0)
    }
}
