use std::path::Path;

use lux_math::Color;

use crate::error::RenderError;
use crate::renderer::{color_to_rgba, linear_to_gamma};

/// A width × height grid of colors, row-major with row 0 at the bottom.
#[derive(Debug, Clone, PartialEq)]
pub struct Framebuffer {
    width: u32,
    height: u32,
    pixels: Vec<Color>,
}

impl Framebuffer {
    /// Create a framebuffer filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::ZERO; width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Get the pixel at (x, y).
    pub fn get(&self, x: u32, y: u32) -> Color {
        self.pixels[self.index(x, y)]
    }

    /// Set the pixel at (x, y).
    pub fn set(&mut self, x: u32, y: u32, color: Color) {
        let index = self.index(x, y);
        self.pixels[index] = color;
    }

    pub fn pixels(&self) -> &[Color] {
        &self.pixels
    }

    /// Gamma-encode linear pixels to RGBA bytes, top row first.
    pub fn to_rgba8(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.pixels.len() * 4);
        for row in self.pixels.chunks(self.width.max(1) as usize).rev() {
            for color in row {
                let display = Color::new(
                    linear_to_gamma(color.x),
                    linear_to_gamma(color.y),
                    linear_to_gamma(color.z),
                );
                bytes.extend_from_slice(&color_to_rgba(display));
            }
        }
        bytes
    }

    /// Write the (linear) framebuffer as an sRGB-ish PNG.
    pub fn save_png(&self, path: impl AsRef<Path>) -> Result<(), RenderError> {
        let image = image::RgbaImage::from_raw(self.width, self.height, self.to_rgba8()).ok_or(
            RenderError::InvalidResolution {
                width: self.width,
                height: self.height,
            },
        )?;
        image.save(path.as_ref())?;
        log::info!("Saved {}x{} image to {}", self.width, self.height, path.as_ref().display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_set() {
        let mut fb = Framebuffer::new(4, 3);
        assert_eq!(fb.pixels().len(), 12);
        assert_eq!(fb.get(3, 2), Color::ZERO);

        fb.set(3, 2, Color::ONE);
        assert_eq!(fb.get(3, 2), Color::ONE);
        assert_eq!(fb.pixels()[11], Color::ONE);
    }

    #[test]
    fn test_to_rgba8_flips_rows_and_encodes() {
        let mut fb = Framebuffer::new(2, 2);
        // Bottom-left white, top-right mid grey
        fb.set(0, 0, Color::ONE);
        fb.set(1, 1, Color::splat(0.5));

        let bytes = fb.to_rgba8();
        assert_eq!(bytes.len(), 16);

        // First output row is the top row: [black, grey]
        assert_eq!(&bytes[0..4], &[0, 0, 0, 255]);
        let grey = (255.0 * 0.5f32.powf(1.0 / 2.2)) as u8;
        assert_eq!(&bytes[4..8], &[grey, grey, grey, 255]);
        // Second output row is the bottom row: [white, black]
        assert_eq!(&bytes[8..12], &[255, 255, 255, 255]);
        assert_eq!(&bytes[12..16], &[0, 0, 0, 255]);
    }

    #[test]
    fn test_save_png() {
        let mut fb = Framebuffer::new(3, 2);
        fb.set(1, 0, Color::new(1.0, 0.0, 0.0));

        let path = std::env::temp_dir().join(format!("lux_fb_test_{}.png", std::process::id()));
        fb.save_png(&path).unwrap();

        let loaded = image::open(&path).unwrap().to_rgba8();
        assert_eq!(loaded.dimensions(), (3, 2));
        // Row 0 (bottom) lands on the last image row
        assert_eq!(loaded.get_pixel(1, 1).0, [255, 0, 0, 255]);
        std::fs::remove_file(&path).ok();
    }
}
