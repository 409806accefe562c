//! Direct lighting and shadow queries.

use lux_core::Light;
use lux_math::{Color, Ray, Vec3};
use rand::RngCore;

use crate::brdf::Brdf;
use crate::hit::SurfaceHit;
use crate::intersector::RayIntersector;
use crate::sampling::gen_f32;
use crate::{OCCLUDER_ALPHA, SURFACE_EPSILON};

/// First surface along a shadow ray leaving `position` that is opaque
/// enough to block light.
///
/// The ray starts `SURFACE_EPSILON` along `normal` to avoid re-hitting the
/// surface it leaves. Only the nearest hit is considered: a translucent
/// nearest surface lets the light through even if something opaque lies
/// behind it.
pub(crate) fn shadow_occluder(
    intersector: &RayIntersector,
    position: Vec3,
    normal: Vec3,
    direction: Vec3,
) -> Option<SurfaceHit> {
    let ray = Ray::new(position + normal * SURFACE_EPSILON, direction);
    intersector
        .intersect_ray(&ray)
        .filter(|hit| hit.opacity() >= OCCLUDER_ALPHA)
}

/// True if an occluder sits between `position` and a light `distance` away.
pub(crate) fn is_occluded(
    intersector: &RayIntersector,
    position: Vec3,
    normal: Vec3,
    direction: Vec3,
    distance: f32,
) -> bool {
    shadow_occluder(intersector, position, normal, direction)
        .is_some_and(|hit| (hit.position - position).length() < distance - SURFACE_EPSILON)
}

/// Next-event estimation: radiance arriving directly from one light.
///
/// One light is chosen uniformly, so its selection pdf is 1/N and the
/// result is scaled by N. The contribution is weighted against BRDF
/// sampling with the balance heuristic.
pub fn sample_direct_lighting(
    intersector: &RayIntersector,
    position: Vec3,
    normal: Vec3,
    brdf: &Brdf,
    wo: Vec3,
    rng: &mut dyn RngCore,
) -> Color {
    let lights = intersector.lights();
    if lights.is_empty() {
        return Color::ZERO;
    }

    let count = lights.len();
    let index = ((gen_f32(rng) * count as f32) as usize).min(count - 1);
    let light: &Light = &lights[index];

    let sample = light.illuminate(position);
    let n_dot_l = normal.dot(sample.direction);
    if n_dot_l <= 0.0 {
        return Color::ZERO;
    }

    if is_occluded(intersector, position, normal, sample.direction, sample.distance) {
        return Color::ZERO;
    }

    let light_pdf = 1.0 / count as f32;
    let brdf_pdf = brdf.pdf(sample.direction, wo, normal);
    let mis_weight = if brdf_pdf > 0.0 {
        light_pdf / (light_pdf + brdf_pdf)
    } else {
        1.0
    };

    brdf.evaluate(sample.direction, wo, normal) * sample.intensity * n_dot_l * mis_weight / light_pdf
}

#[cfg(test)]
mod tests {
    use super::*;
    use lux_core::{Material, Mesh, Scene};
    use lux_math::Vec4;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::sync::Arc;

    fn floor_quad(y: f32, half: f32) -> Mesh {
        Mesh::quad(
            Vec3::new(-half, y, half),
            Vec3::new(half, y, half),
            Vec3::new(half, y, -half),
            Vec3::new(-half, y, -half),
            1.0,
        )
    }

    /// A floor lit by a point light at (0, 2, 0), optionally with a blocker
    /// of the given opacity at y=1.
    fn lit_floor(blocker_alpha: Option<f32>) -> RayIntersector {
        let mut scene = Scene::new("lit_floor");
        let grey = scene.add_material(Material::diffuse("grey", Color::splat(0.5)));
        scene.add_model("floor", floor_quad(0.0, 4.0), grey);

        if let Some(alpha) = blocker_alpha {
            let blocker = scene.add_material(Material::new("blocker", Vec4::new(1.0, 1.0, 1.0, alpha), Vec4::ZERO));
            scene.add_model("blocker", floor_quad(1.0, 0.5), blocker);
        }

        scene.add_light(Light::point(Vec3::new(0.0, 2.0, 0.0), Color::splat(4.0)));
        RayIntersector::with_scene(Arc::new(scene)).unwrap()
    }

    fn direct_at_origin(intersector: &RayIntersector) -> Color {
        let brdf = Brdf::from_material(Vec4::new(0.5, 0.5, 0.5, 1.0), Vec4::ZERO);
        let mut rng = StdRng::seed_from_u64(5);
        sample_direct_lighting(intersector, Vec3::ZERO, Vec3::Y, &brdf, Vec3::Y, &mut rng)
    }

    #[test]
    fn test_no_lights_no_contribution() {
        let mut scene = Scene::new("dark");
        let grey = scene.add_material(Material::diffuse("grey", Color::splat(0.5)));
        scene.add_model("floor", floor_quad(0.0, 4.0), grey);
        let intersector = RayIntersector::with_scene(Arc::new(scene)).unwrap();

        assert_eq!(direct_at_origin(&intersector), Color::ZERO);
    }

    #[test]
    fn test_unoccluded_light_contributes() {
        let c = direct_at_origin(&lit_floor(None));
        assert!(c.x > 0.0 && c.y > 0.0 && c.z > 0.0);
        assert!(c.is_finite());
    }

    #[test]
    fn test_opaque_blocker_casts_shadow() {
        assert_eq!(direct_at_origin(&lit_floor(Some(1.0))), Color::ZERO);
    }

    #[test]
    fn test_translucent_blocker_lets_light_through() {
        let open = direct_at_origin(&lit_floor(None));
        let through = direct_at_origin(&lit_floor(Some(0.1)));
        assert_eq!(open, through);
    }

    #[test]
    fn test_light_below_surface_contributes_nothing() {
        let mut scene = Scene::new("below");
        let grey = scene.add_material(Material::diffuse("grey", Color::splat(0.5)));
        scene.add_model("floor", floor_quad(0.0, 4.0), grey);
        scene.add_light(Light::point(Vec3::new(0.0, -2.0, 0.0), Color::splat(4.0)));
        let intersector = RayIntersector::with_scene(Arc::new(scene)).unwrap();

        assert_eq!(direct_at_origin(&intersector), Color::ZERO);
    }

    #[test]
    fn test_occluder_beyond_light_does_not_block() {
        let mut scene = Scene::new("beyond");
        let grey = scene.add_material(Material::diffuse("grey", Color::splat(0.5)));
        scene.add_model("floor", floor_quad(0.0, 4.0), grey);
        scene.add_model("ceiling", floor_quad(3.0, 4.0), grey);
        scene.add_light(Light::point(Vec3::new(0.0, 2.0, 0.0), Color::splat(4.0)));
        let intersector = RayIntersector::with_scene(Arc::new(scene)).unwrap();

        assert!(!is_occluded(&intersector, Vec3::ZERO, Vec3::Y, Vec3::Y, 2.0));
        assert!(is_occluded(&intersector, Vec3::ZERO, Vec3::Y, Vec3::Y, 5.0));
        assert!(direct_at_origin(&intersector).x > 0.0);
    }
}
