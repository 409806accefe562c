//! RGBA float textures with wrapped bilinear sampling.

use lux_math::{Vec2, Vec4};

use crate::scene::SceneError;

/// A texture stored as RGBA floats, row-major.
///
/// Values are stored exactly as authored; colour-space conversion happens in
/// [`crate::Material`] where it is known which channel means what.
#[derive(Clone, Debug, PartialEq)]
pub struct Texture {
    /// Texture width in pixels
    pub width: u32,

    /// Texture height in pixels
    pub height: u32,

    /// Pixel data, `width * height` entries
    pixels: Vec<Vec4>,
}

impl Texture {
    /// Create a texture from pixel data.
    pub fn new(width: u32, height: u32, pixels: Vec<Vec4>) -> Result<Self, SceneError> {
        if width == 0 || height == 0 {
            return Err(SceneError::EmptyTexture);
        }
        if pixels.len() != (width as usize) * (height as usize) {
            return Err(SceneError::TextureSize {
                width,
                height,
                pixels: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Create a texture from 8-bit RGBA bytes (4 bytes per pixel).
    pub fn from_rgba8(width: u32, height: u32, bytes: &[u8]) -> Result<Self, SceneError> {
        let pixels = bytes
            .chunks_exact(4)
            .map(|p| Vec4::new(p[0] as f32, p[1] as f32, p[2] as f32, p[3] as f32) / 255.0)
            .collect();
        Self::new(width, height, pixels)
    }

    /// Create a solid color texture (1x1).
    pub fn solid(color: Vec4) -> Self {
        Self {
            width: 1,
            height: 1,
            pixels: vec![color],
        }
    }

    /// A two-color checkerboard with `cells` squares per side.
    pub fn checker(cells: u32, a: Vec4, b: Vec4) -> Self {
        let cells = cells.max(1);
        let pixels = (0..cells * cells)
            .map(|i| if (i % cells + i / cells) % 2 == 0 { a } else { b })
            .collect();
        Self {
            width: cells,
            height: cells,
            pixels,
        }
    }

    /// Texel at integer coordinates.
    pub fn at(&self, x: u32, y: u32) -> Vec4 {
        self.pixels[(y * self.width + x) as usize]
    }

    /// Sample the texture at UV coordinates with bilinear filtering.
    ///
    /// Coordinates wrap in both directions and texel centres sit at
    /// half-integer positions. Single-row or single-column textures return
    /// their first texel.
    pub fn sample(&self, uv: Vec2) -> Vec4 {
        if self.width == 1 || self.height == 1 {
            return self.pixels[0];
        }

        let (w, h) = (self.width as f32, self.height as f32);
        let x = uv.x.rem_euclid(1.0) * w - 0.5;
        let y = uv.y.rem_euclid(1.0) * h - 0.5;

        let x0 = ((x.floor() + w) as u32) % self.width;
        let y0 = ((y.floor() + h) as u32) % self.height;
        let x1 = (x0 + 1) % self.width;
        let y1 = (y0 + 1) % self.height;
        let fx = x - x.floor();
        let fy = y - y.floor();

        let left = self.at(x0, y0).lerp(self.at(x0, y1), fy);
        let right = self.at(x1, y0).lerp(self.at(x1, y1), fy);
        left.lerp(right, fx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_solid_texture() {
        let tex = Texture::solid(Vec4::new(1.0, 0.5, 0.0, 1.0));
        assert_eq!(tex.sample(Vec2::new(0.3, 0.9)), Vec4::new(1.0, 0.5, 0.0, 1.0));
        assert_eq!(tex.sample(Vec2::new(-7.2, 3.1)), Vec4::new(1.0, 0.5, 0.0, 1.0));
    }

    #[test]
    fn test_sample_at_texel_centre_is_exact() {
        let tex = Texture::checker(2, Vec4::ONE, Vec4::ZERO);
        // Centre of texel (0, 0) and (1, 0)
        assert!((tex.sample(Vec2::new(0.25, 0.25)) - Vec4::ONE).length() < 1e-5);
        assert!(tex.sample(Vec2::new(0.75, 0.25)).length() < 1e-5);
    }

    #[test]
    fn test_sample_blends_and_wraps() {
        let tex = Texture::checker(2, Vec4::ONE, Vec4::ZERO);
        // Halfway between texel centres is an even blend
        let mid = tex.sample(Vec2::new(0.5, 0.25));
        assert!((mid.x - 0.5).abs() < 1e-5);
        // Wrapping across the left edge blends the first and last column
        let edge = tex.sample(Vec2::new(0.0, 0.25));
        assert!((edge.x - 0.5).abs() < 1e-5);
        assert_eq!(tex.sample(Vec2::new(1.25, 0.25)), tex.sample(Vec2::new(0.25, 0.25)));
    }

    #[test]
    fn test_from_rgba8() {
        let tex = Texture::from_rgba8(1, 1, &[255, 0, 51, 255]).unwrap();
        let texel = tex.at(0, 0);
        assert_eq!(texel.x, 1.0);
        assert!((texel.z - 0.2).abs() < 1e-6);
    }

    #[test]
    fn test_invalid_dimensions() {
        assert!(matches!(Texture::new(0, 4, vec![]), Err(SceneError::EmptyTexture)));
        assert!(matches!(
            Texture::new(2, 2, vec![Vec4::ONE; 3]),
            Err(SceneError::TextureSize { width: 2, height: 2, pixels: 3 })
        ));
    }
}
