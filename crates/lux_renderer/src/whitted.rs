//! Whitted-style recursive ray tracing, unrolled into a loop.

use lux_core::{Light, LightKind, LightSample};
use lux_math::{max_channel, Color, Ray, Vec3};

use crate::hit::SurfaceHit;
use crate::intersector::RayIntersector;
use crate::lighting::shadow_occluder;
use crate::sampling::reflect;
use crate::{OPAQUE_ALPHA, SURFACE_EPSILON};

/// Scale from normalized shininess to a Blinn-Phong exponent
const SHININESS_SCALE: f32 = 256.0;

/// Fraction of the specular tint that feeds the mirror reflection
const REFLECTION_SCALE: f32 = 0.5;

/// Once the carried weight drops below this, deeper hits cannot show
const MIN_WEIGHT: f32 = 1e-4;

/// Trace `ray` through up to `max_depth` surface interactions.
///
/// Each hit is shaded with Lambert plus Blinn-Phong terms for every light
/// and an ambient term. Translucent surfaces (alpha below the opaque
/// threshold) blend in their local color and let the ray continue straight
/// through; opaque surfaces continue as a mirror reflection weighted by half
/// their specular tint. Misses contribute nothing.
pub fn ray_trace(intersector: &RayIntersector, ray: Ray, max_depth: u32, enable_shadow: bool) -> Color {
    let mut color = Color::ZERO;
    let mut weight = Color::ONE;
    let mut ray = ray;

    for _ in 0..max_depth {
        let Some(hit) = intersector.intersect_ray(&ray) else {
            break;
        };
        let direction = ray.direction().normalize();
        let local = shade_local(intersector, &hit, direction, enable_shadow);
        let alpha = hit.opacity();

        if alpha < OPAQUE_ALPHA {
            color += weight * alpha * local;
            weight *= 1.0 - alpha;
            ray = Ray::new(hit.position + direction * SURFACE_EPSILON, direction);
        } else {
            let reflectance = hit.meta_spec.truncate() * REFLECTION_SCALE;
            color += weight * (Color::ONE - reflectance) * local;
            weight *= reflectance;
            ray = Ray::new(hit.position + hit.normal * SURFACE_EPSILON, reflect(direction, hit.normal));
        }

        if max_channel(weight) < MIN_WEIGHT {
            break;
        }
    }

    color
}

/// Local illumination at a hit seen along unit `view_dir`.
fn shade_local(intersector: &RayIntersector, hit: &SurfaceHit, view_dir: Vec3, enable_shadow: bool) -> Color {
    let kd = hit.albedo.truncate();
    let ks = hit.meta_spec.truncate();
    let shininess = hit.meta_spec.w * SHININESS_SCALE;
    let n = hit.normal;

    let mut color = kd * intersector.ambient_intensity();

    for light in intersector.lights() {
        let sample = light.illuminate(hit.position);
        if enable_shadow && in_shadow(intersector, hit, light, &sample) {
            continue;
        }

        let l = sample.direction;
        let diffuse = kd * n.dot(l).max(0.0);
        let h = (l - view_dir).normalize_or_zero();
        let specular = ks * n.dot(h).max(0.0).powf(shininess);

        color += (diffuse + specular) * sample.intensity;
    }

    color
}

/// Hard shadow test. Spot lights never cast shadows.
fn in_shadow(intersector: &RayIntersector, hit: &SurfaceHit, light: &Light, sample: &LightSample) -> bool {
    match light.kind {
        LightKind::Spot => false,
        LightKind::Directional => shadow_occluder(intersector, hit.position, hit.normal, sample.direction).is_some(),
        LightKind::Point => shadow_occluder(intersector, hit.position, hit.normal, sample.direction)
            .is_some_and(|occluder| (light.position - occluder.position).dot(sample.direction) > 0.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lux_core::{Material, Mesh, Scene};
    use lux_math::Vec4;
    use std::sync::Arc;

    fn quad_at(y: f32, half: f32) -> Mesh {
        Mesh::quad(
            Vec3::new(-half, y, half),
            Vec3::new(half, y, half),
            Vec3::new(half, y, -half),
            Vec3::new(-half, y, -half),
            1.0,
        )
    }

    fn down_ray() -> Ray {
        Ray::new(Vec3::new(0.0, 3.0, 0.0), Vec3::NEG_Y)
    }

    #[test]
    fn test_miss_is_black() {
        let intersector = RayIntersector::new();
        assert_eq!(ray_trace(&intersector, down_ray(), 4, true), Color::ZERO);
    }

    #[test]
    fn test_diffuse_floor_under_point_light() {
        let mut scene = Scene::new("floor").with_ambient(Color::splat(0.1));
        let white = scene.add_material(Material::diffuse("white", Color::ONE));
        scene.add_model("floor", quad_at(0.0, 2.0), white);
        scene.add_light(Light::point(Vec3::new(0.0, 2.0, 0.0), Color::splat(4.0)));
        let intersector = RayIntersector::with_scene(Arc::new(scene)).unwrap();

        // kd·cosθ·I/d² + kd·ambient = 1·1·4/4 + 0.1; the specular tint is
        // zero, so one bounce settles the result
        let c = ray_trace(&intersector, down_ray(), 4, true);
        assert!((c - Color::splat(1.1)).length() < 1e-3, "got {c}");
    }

    #[test]
    fn test_point_light_shadow() {
        let mut scene = Scene::new("shadowed");
        let white = scene.add_material(Material::diffuse("white", Color::ONE));
        scene.add_model("floor", quad_at(0.0, 4.0), white);
        scene.add_model("blocker", quad_at(1.0, 0.5), white);
        scene.add_light(Light::point(Vec3::new(0.0, 2.0, 0.0), Color::splat(4.0)));
        let intersector = RayIntersector::with_scene(Arc::new(scene)).unwrap();

        // Looking at the floor under the blocker from an angle
        let ray = Ray::normalized(Vec3::new(3.0, 0.5, 0.0), Vec3::new(-3.0, -0.5, 0.0));
        let shadowed = ray_trace(&intersector, ray, 4, true);
        let unshadowed = ray_trace(&intersector, ray, 4, false);

        assert_eq!(shadowed, Color::ZERO);
        assert!(unshadowed.x > 0.5);
    }

    #[test]
    fn test_translucent_surface_blends_with_background() {
        let mut scene = Scene::new("pane");
        let white = scene.add_material(Material::diffuse("white", Color::ONE));
        let pane = scene.add_material(Material::new("pane", Vec4::new(0.0, 0.0, 0.0, 0.5), Vec4::ZERO));
        scene.add_model("floor", quad_at(0.0, 2.0), white);
        scene.add_model("pane", quad_at(1.0, 2.0), pane);
        scene.add_light(Light::directional(Vec3::NEG_Y, Color::ONE));
        let intersector = RayIntersector::with_scene(Arc::new(scene)).unwrap();

        // Black pane at half opacity over a white floor lit at full strength.
        // Shadows off so the pane does not darken the floor.
        let c = ray_trace(&intersector, down_ray(), 4, false);
        assert!((c - Color::splat(0.5)).length() < 1e-3, "got {c}");
    }

    #[test]
    fn test_depth_limits_interactions() {
        let mut scene = Scene::new("pane");
        let white = scene.add_material(Material::diffuse("white", Color::ONE));
        let pane = scene.add_material(Material::new("pane", Vec4::new(0.0, 0.0, 0.0, 0.5), Vec4::ZERO));
        scene.add_model("floor", quad_at(0.0, 2.0), white);
        scene.add_model("pane", quad_at(1.0, 2.0), pane);
        scene.add_light(Light::directional(Vec3::NEG_Y, Color::ONE));
        let intersector = RayIntersector::with_scene(Arc::new(scene)).unwrap();

        // Depth 1 stops at the black pane
        assert_eq!(ray_trace(&intersector, down_ray(), 1, false), Color::ZERO);
        assert_eq!(ray_trace(&intersector, down_ray(), 0, false), Color::ZERO);
    }

    #[test]
    fn test_spot_light_casts_no_shadow() {
        let mut scene = Scene::new("spot");
        let white = scene.add_material(Material::diffuse("white", Color::ONE));
        scene.add_model("floor", quad_at(0.0, 4.0), white);
        scene.add_model("blocker", quad_at(1.0, 0.5), white);
        scene.add_light(Light::spot(
            Vec3::new(0.0, 2.0, 0.0),
            Vec3::NEG_Y,
            Color::splat(4.0),
            0.6,
            0.8,
        ));
        let intersector = RayIntersector::with_scene(Arc::new(scene)).unwrap();

        let ray = Ray::normalized(Vec3::new(3.0, 0.5, 0.0), Vec3::new(-3.0, -0.5, 0.0));
        assert!(ray_trace(&intersector, ray, 4, true).x > 0.5);
    }
}
