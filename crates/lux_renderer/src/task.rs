//! Parallel, cancellable whole-image rendering.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Instant;

use lux_core::Camera;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;

use crate::bucket::{generate_buckets, render_bucket, BucketResult, DEFAULT_BUCKET_SIZE};
use crate::camera::PrimaryRays;
use crate::error::RenderError;
use crate::framebuffer::Framebuffer;
use crate::intersector::RayIntersector;
use crate::renderer::RenderSettings;

/// Shared cancellation flag, polled by workers once per pixel.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Snapshot of a running render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderProgress {
    pub completed: usize,
    pub total: usize,
}

impl RenderProgress {
    /// Completed fraction in [0, 1].
    pub fn fraction(&self) -> f32 {
        if self.total == 0 {
            1.0
        } else {
            self.completed as f32 / self.total as f32
        }
    }
}

/// A finished (or cancelled) render.
#[derive(Debug, Clone)]
pub struct RenderOutcome {
    /// Linear radiance; pixels never reached are black
    pub image: Framebuffer,
    pub pixels_rendered: usize,
    pub cancelled: bool,
}

/// Per-bucket RNG seed, so results do not depend on scheduling.
fn bucket_seed(seed: u64, index: usize) -> u64 {
    seed ^ (index as u64 + 1).wrapping_mul(0x9E37_79B9_7F4A_7C15)
}

/// Render a whole image in parallel on the rayon pool.
///
/// Buckets run in spiral order, each with its own RNG seeded from `seed`
/// and the bucket index, so the same seed gives the same image whatever
/// the thread count. `progress` counts finished pixels.
pub fn render_image(
    intersector: &RayIntersector,
    camera: &Camera,
    width: u32,
    height: u32,
    settings: &RenderSettings,
    seed: u64,
    cancel: &CancelToken,
    progress: &AtomicUsize,
) -> Result<RenderOutcome, RenderError> {
    if width == 0 || height == 0 {
        return Err(RenderError::InvalidResolution { width, height });
    }
    settings.validate()?;

    let start = Instant::now();
    let rays = PrimaryRays::new(camera, width, height);
    let buckets = generate_buckets(width, height, DEFAULT_BUCKET_SIZE);

    log::info!(
        "Rendering {}x{} with {:?}: {} buckets, {} rays per pixel",
        width,
        height,
        settings.integrator,
        buckets.len(),
        settings.rays_per_pixel()
    );

    let results: Vec<BucketResult> = buckets
        .par_iter()
        .map(|bucket| {
            let mut rng = StdRng::seed_from_u64(bucket_seed(seed, bucket.index));
            render_bucket(bucket, intersector, &rays, settings, cancel, progress, &mut rng)
        })
        .collect();

    let mut image = Framebuffer::new(width, height);
    let mut pixels_rendered = 0;
    for result in &results {
        result.write_into(&mut image);
        pixels_rendered += result.pixels.len();
    }

    let total = width as usize * height as usize;
    let cancelled = pixels_rendered < total;
    if cancelled {
        log::warn!(
            "Render cancelled after {}/{} pixels ({:.2?})",
            pixels_rendered,
            total,
            start.elapsed()
        );
    } else {
        log::info!("Render finished in {:.2?}", start.elapsed());
    }

    Ok(RenderOutcome {
        image,
        pixels_rendered,
        cancelled,
    })
}

/// A render running on a background thread.
///
/// Dropping the task cancels it and waits for the workers to stop.
pub struct RenderTask {
    cancel: CancelToken,
    progress: Arc<AtomicUsize>,
    total: usize,
    handle: Option<JoinHandle<Result<RenderOutcome, RenderError>>>,
}

impl RenderTask {
    /// Validate the request and start rendering in the background.
    pub fn spawn(
        intersector: Arc<RayIntersector>,
        camera: Camera,
        width: u32,
        height: u32,
        settings: RenderSettings,
        seed: u64,
    ) -> Result<Self, RenderError> {
        if width == 0 || height == 0 {
            return Err(RenderError::InvalidResolution { width, height });
        }
        settings.validate()?;

        let cancel = CancelToken::new();
        let progress = Arc::new(AtomicUsize::new(0));

        let worker_cancel = cancel.clone();
        let worker_progress = Arc::clone(&progress);
        let handle = thread::Builder::new()
            .name("lux-render".into())
            .spawn(move || {
                render_image(
                    &intersector,
                    &camera,
                    width,
                    height,
                    &settings,
                    seed,
                    &worker_cancel,
                    &worker_progress,
                )
            })?;

        Ok(Self {
            cancel,
            progress,
            total: width as usize * height as usize,
            handle: Some(handle),
        })
    }

    pub fn progress(&self) -> RenderProgress {
        RenderProgress {
            completed: self.progress.load(Ordering::Relaxed),
            total: self.total,
        }
    }

    /// Ask the workers to stop; already finished pixels are kept.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().map_or(true, |handle| handle.is_finished())
    }

    /// Wait for the render to end and return its result.
    pub fn join(mut self) -> Result<RenderOutcome, RenderError> {
        match self.handle.take() {
            Some(handle) => handle.join().map_err(|_| RenderError::WorkerPanicked)?,
            None => Err(RenderError::WorkerPanicked),
        }
    }
}

impl Drop for RenderTask {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            self.cancel.cancel();
            if handle.join().is_err() {
                log::error!("Render worker panicked during shutdown");
            }
        }
    }
}
