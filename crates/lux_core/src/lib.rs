//! Lux Core - scene description for the Lux renderer.
//!
//! This crate provides:
//!
//! - **Scene types**: `Scene`, `Model`, `Mesh`, `Material`, `Texture`
//! - **Lights**: point, directional and spot lights with their falloff
//! - **Camera**: the pinhole camera description consumed by the renderer
//! - **Demo scenes**: the built-in floor and Cornell box scenes
//!
//! # Example
//!
//! ```ignore
//! use lux_core::demo;
//!
//! let demo = demo::cornell_box();
//! println!("{} triangles, {} lights",
//!     demo.scene.triangle_count(),
//!     demo.scene.lights.len());
//! ```

pub mod camera;
pub mod demo;
pub mod light;
pub mod mesh;
pub mod scene;
pub mod texture;

// Re-export commonly used types
pub use camera::Camera;
pub use light::{Light, LightKind, LightSample};
pub use mesh::Mesh;
pub use scene::{Material, Model, Scene, SceneError};
pub use texture::Texture;
