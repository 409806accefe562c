//! Light sources and their falloff.

use lux_math::{Color, Vec3};
use serde::{Deserialize, Serialize};

/// Distance reported for directional lights, which sit infinitely far away.
pub const DIRECTIONAL_LIGHT_DISTANCE: f32 = 1e6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LightKind {
    Point,
    Directional,
    Spot,
}

/// A light source.
///
/// `direction` is the direction light travels (away from a directional or
/// spot emitter). Spot cone half-angles are in radians.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Light {
    pub kind: LightKind,
    pub position: Vec3,
    pub direction: Vec3,
    pub intensity: Color,
    pub cut_off: f32,
    pub outer_cut_off: f32,
}

/// A light evaluated at a shading point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightSample {
    /// Unit vector from the shading point toward the light
    pub direction: Vec3,
    /// Distance to the light
    pub distance: f32,
    /// Incident intensity after distance and cone falloff
    pub intensity: Color,
}

impl Light {
    pub fn point(position: Vec3, intensity: Color) -> Self {
        Self {
            kind: LightKind::Point,
            position,
            direction: Vec3::NEG_Y,
            intensity,
            cut_off: 0.0,
            outer_cut_off: 0.0,
        }
    }

    pub fn directional(direction: Vec3, intensity: Color) -> Self {
        Self {
            kind: LightKind::Directional,
            position: Vec3::ZERO,
            direction: direction.normalize(),
            intensity,
            cut_off: 0.0,
            outer_cut_off: 0.0,
        }
    }

    /// Spot light with inner/outer half-angles in radians.
    pub fn spot(position: Vec3, direction: Vec3, intensity: Color, cut_off: f32, outer_cut_off: f32) -> Self {
        Self {
            kind: LightKind::Spot,
            position,
            direction: direction.normalize(),
            intensity,
            cut_off,
            outer_cut_off: outer_cut_off.max(cut_off),
        }
    }

    /// Evaluate the light as seen from `point`.
    ///
    /// Point and spot lights fall off with the inverse square of the distance;
    /// spot lights are at full strength inside the inner cone, fade
    /// quadratically to zero at the outer cone and are dark beyond it.
    pub fn illuminate(&self, point: Vec3) -> LightSample {
        match self.kind {
            LightKind::Directional => LightSample {
                direction: -self.direction.normalize(),
                distance: DIRECTIONAL_LIGHT_DISTANCE,
                intensity: self.intensity,
            },
            LightKind::Point | LightKind::Spot => {
                let to_light = self.position - point;
                let distance = to_light.length();
                let direction = to_light / distance.max(f32::MIN_POSITIVE);
                let falloff = match self.kind {
                    LightKind::Spot => self.cone_falloff(direction),
                    _ => 1.0,
                };
                LightSample {
                    direction,
                    distance,
                    intensity: self.intensity * falloff / (distance * distance).max(f32::MIN_POSITIVE),
                }
            }
        }
    }

    fn cone_falloff(&self, to_light: Vec3) -> f32 {
        let cos_theta = to_light.dot(-self.direction);
        let cos_inner = self.cut_off.cos();
        let cos_outer = self.outer_cut_off.cos();

        if cos_theta > cos_inner {
            1.0
        } else if cos_theta > cos_outer {
            let t = (cos_theta - cos_outer) / (cos_inner - cos_outer);
            t * t
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_light_inverse_square() {
        let light = Light::point(Vec3::new(0.0, 2.0, 0.0), Color::splat(8.0));
        let sample = light.illuminate(Vec3::ZERO);

        assert!((sample.direction - Vec3::Y).length() < 1e-6);
        assert!((sample.distance - 2.0).abs() < 1e-6);
        assert!((sample.intensity - Color::splat(2.0)).length() < 1e-5);
    }

    #[test]
    fn test_directional_light_has_no_falloff() {
        let light = Light::directional(Vec3::new(0.0, -2.0, 0.0), Color::ONE);
        let near = light.illuminate(Vec3::ZERO);
        let far = light.illuminate(Vec3::new(100.0, -50.0, 3.0));

        assert_eq!(near.intensity, Color::ONE);
        assert_eq!(far.intensity, Color::ONE);
        assert!((near.direction - Vec3::Y).length() < 1e-6);
        assert_eq!(near.distance, DIRECTIONAL_LIGHT_DISTANCE);
    }

    #[test]
    fn test_spot_light_cone() {
        let light = Light::spot(
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::NEG_Y,
            Color::ONE,
            20f32.to_radians(),
            40f32.to_radians(),
        );

        // Straight below: full intensity, inverse square only
        let inside = light.illuminate(Vec3::ZERO);
        assert!((inside.intensity - Color::ONE).length() < 1e-5);

        // 30 degrees off-axis: between the cones
        let between = light.illuminate(Vec3::new(30f32.to_radians().tan(), 0.0, 0.0));
        let dist2 = between.distance * between.distance;
        let expected_falloff = {
            let (ci, co) = (20f32.to_radians().cos(), 40f32.to_radians().cos());
            let t = (30f32.to_radians().cos() - co) / (ci - co);
            t * t
        };
        assert!((between.intensity.x * dist2 - expected_falloff).abs() < 1e-4);
        assert!(between.intensity.x > 0.0 && between.intensity.x * dist2 < 1.0);

        // 60 degrees off-axis: dark
        let outside = light.illuminate(Vec3::new(60f32.to_radians().tan(), 0.0, 0.0));
        assert_eq!(outside.intensity, Color::ZERO);
    }
}
