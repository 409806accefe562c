//! Lux Renderer - CPU ray tracing and path tracing.
//!
//! Two integrators share one intersection engine:
//!
//! - [`ray_trace`]: Whitted-style tracing with hard shadows, mirror
//!   reflection and a pass-through approximation for translucent surfaces
//! - [`path_trace`]: Monte Carlo path tracing with a microfacet BRDF,
//!   next-event estimation and Russian roulette
//!
//! [`ProgressivePathTracer`] accumulates path-traced frames into a running
//! mean, and [`RenderTask`] renders a whole image on the rayon pool in the
//! background with cooperative cancellation.
//!
//! All sampling takes an explicit `&mut dyn RngCore`, so renders are
//! reproducible from a seed.

mod brdf;
mod bucket;
mod bvh;
mod camera;
mod error;
mod framebuffer;
mod hit;
mod intersector;
mod lighting;
mod path;
mod progressive;
mod renderer;
mod sampling;
mod task;
mod triangle;
mod whitted;

pub use brdf::{Brdf, BrdfSample};
pub use bucket::{generate_buckets, render_bucket, Bucket, BucketResult, DEFAULT_BUCKET_SIZE};
pub use camera::PrimaryRays;
pub use error::RenderError;
pub use framebuffer::Framebuffer;
pub use hit::SurfaceHit;
pub use intersector::RayIntersector;
pub use lighting::sample_direct_lighting;
pub use path::{path_trace, sample_environment_light};
pub use progressive::ProgressivePathTracer;
pub use renderer::{
    color_to_rgba, linear_to_gamma, render, render_pixel, sample_pixel, trace, IntegratorKind,
    RenderSettings, DISPLAY_GAMMA,
};
pub use sampling::{gen_f32, reflect, sample_hemisphere_cosine};
pub use task::{render_image, CancelToken, RenderOutcome, RenderProgress, RenderTask};
pub use triangle::{intersect_triangle, Triangle};
pub use whitted::ray_trace;

/// Re-export math and scene types used throughout the public API
pub use lux_core::{Camera, Light, LightKind, Scene};
pub use lux_math::{Color, Intersection, Ray, Vec3, Vec4};

/// Offset applied along the normal (or ray) when spawning secondary rays,
/// so they do not re-hit the surface they leave.
pub const SURFACE_EPSILON: f32 = 1e-4;

/// Surfaces with albedo alpha below this do not block shadow rays.
pub const OCCLUDER_ALPHA: f32 = 0.2;

/// Surfaces with albedo alpha at or above this are treated as opaque.
pub const OPAQUE_ALPHA: f32 = 0.9;
