//! Bucket-based tile rendering.
//!
//! Divides the image into tiles (buckets) that are rendered independently
//! and in parallel on the rayon pool.

use std::sync::atomic::{AtomicUsize, Ordering};

use lux_math::Color;
use rand::RngCore;

use crate::camera::PrimaryRays;
use crate::framebuffer::Framebuffer;
use crate::intersector::RayIntersector;
use crate::renderer::{render_pixel, RenderSettings};
use crate::task::CancelToken;

/// A rectangular region of the image to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bucket {
    /// X coordinate of the bucket's first column
    pub x: u32,
    /// Y coordinate of the bucket's first row
    pub y: u32,
    pub width: u32,
    pub height: u32,
    /// Index of this bucket in the render order
    pub index: usize,
}

impl Bucket {
    pub fn new(x: u32, y: u32, width: u32, height: u32, index: usize) -> Self {
        Self {
            x,
            y,
            width,
            height,
            index,
        }
    }

    /// Get the total number of pixels in this bucket.
    pub fn pixel_count(&self) -> u32 {
        self.width * self.height
    }
}

/// Default bucket size in pixels.
pub const DEFAULT_BUCKET_SIZE: u32 = 32;

/// Generate buckets for an image, sorted in spiral order from the center.
///
/// Buckets are rendered from the center outward so the middle of the frame
/// fills in first.
pub fn generate_buckets(width: u32, height: u32, bucket_size: u32) -> Vec<Bucket> {
    let bucket_size = bucket_size.max(1);
    let mut buckets = Vec::new();
    let mut index = 0;

    let mut y = 0;
    while y < height {
        let mut x = 0;
        while x < width {
            let bw = bucket_size.min(width - x);
            let bh = bucket_size.min(height - y);
            buckets.push(Bucket::new(x, y, bw, bh, index));
            index += 1;
            x += bucket_size;
        }
        y += bucket_size;
    }

    sort_spiral(&mut buckets, width, height);

    for (i, bucket) in buckets.iter_mut().enumerate() {
        bucket.index = i;
    }

    buckets
}

/// Sort buckets by distance from the image center.
fn sort_spiral(buckets: &mut [Bucket], width: u32, height: u32) {
    let center_x = width as f32 / 2.0;
    let center_y = height as f32 / 2.0;

    let distance = |b: &Bucket| {
        let bx = b.x as f32 + b.width as f32 / 2.0;
        let by = b.y as f32 + b.height as f32 / 2.0;
        (bx - center_x).powi(2) + (by - center_y).powi(2)
    };

    buckets.sort_by(|a, b| {
        distance(a)
            .partial_cmp(&distance(b))
            .unwrap_or(std::cmp::Ordering::Equal)
    });
}

/// Result of rendering a bucket.
#[derive(Debug, Clone)]
pub struct BucketResult {
    /// The bucket that was rendered
    pub bucket: Bucket,
    /// Pixel colors in row-major order; shorter than the bucket when the
    /// render was cancelled part-way
    pub pixels: Vec<Color>,
}

impl BucketResult {
    pub fn new(bucket: Bucket, pixels: Vec<Color>) -> Self {
        Self { bucket, pixels }
    }

    pub fn is_complete(&self) -> bool {
        self.pixels.len() == self.bucket.pixel_count() as usize
    }

    /// Copy the rendered pixels into their place in `image`.
    pub fn write_into(&self, image: &mut Framebuffer) {
        let width = self.bucket.width.max(1) as usize;
        for (i, &color) in self.pixels.iter().enumerate() {
            let x = self.bucket.x + (i % width) as u32;
            let y = self.bucket.y + (i / width) as u32;
            image.set(x, y, color);
        }
    }
}

/// Render a single bucket.
///
/// The cancel token is checked before every pixel; on cancellation the
/// pixels finished so far are returned. `progress` is bumped once per
/// finished pixel.
pub fn render_bucket(
    bucket: &Bucket,
    intersector: &RayIntersector,
    rays: &PrimaryRays,
    settings: &RenderSettings,
    cancel: &CancelToken,
    progress: &AtomicUsize,
    rng: &mut dyn RngCore,
) -> BucketResult {
    let mut pixels = Vec::with_capacity(bucket.pixel_count() as usize);

    'rows: for local_y in 0..bucket.height {
        for local_x in 0..bucket.width {
            if cancel.is_cancelled() {
                break 'rows;
            }
            let color = render_pixel(
                intersector,
                rays,
                bucket.x + local_x,
                bucket.y + local_y,
                settings,
                rng,
            );
            pixels.push(color);
            progress.fetch_add(1, Ordering::Relaxed);
        }
    }

    BucketResult::new(*bucket, pixels)
}
