//! Scene intersection engine.

use std::sync::Arc;
use std::time::Instant;

use lux_core::{Light, Scene, SceneError};
use lux_math::{Color, Interval, Ray, Vec2};

use crate::bvh::BvhNode;
use crate::hit::SurfaceHit;
use crate::triangle::Triangle;

/// Nearest-hit queries against an immutable scene.
///
/// `init_scene` flattens every model into world-space triangles and builds a
/// BVH over them. Afterwards the intersector is read-only and can be queried
/// from any number of threads at once.
#[derive(Debug)]
pub struct RayIntersector {
    scene: Option<Arc<Scene>>,
    triangles: Vec<Triangle>,
    bvh: BvhNode,
}

impl Default for RayIntersector {
    fn default() -> Self {
        Self::new()
    }
}

impl RayIntersector {
    /// An intersector with no scene; every ray misses.
    pub fn new() -> Self {
        Self {
            scene: None,
            triangles: Vec::new(),
            bvh: BvhNode::Empty,
        }
    }

    /// Convenience constructor for an already validated scene.
    pub fn with_scene(scene: Arc<Scene>) -> Result<Self, SceneError> {
        let mut intersector = Self::new();
        intersector.init_scene(scene)?;
        Ok(intersector)
    }

    /// Validate `scene` and build the acceleration structure for it.
    ///
    /// On error the previous scene stays loaded.
    pub fn init_scene(&mut self, scene: Arc<Scene>) -> Result<(), SceneError> {
        scene.validate()?;

        let start = Instant::now();
        let mut triangles = Vec::with_capacity(scene.triangle_count());

        for model in &scene.models {
            let mesh = &model.mesh;
            for i in 0..mesh.triangle_count() {
                let [a, b, c] = mesh.triangle(i);
                let positions = [mesh.positions[a], mesh.positions[b], mesh.positions[c]];
                let normals = match &mesh.normals {
                    Some(normals) => [normals[a], normals[b], normals[c]],
                    None => {
                        let n = (positions[1] - positions[0])
                            .cross(positions[2] - positions[0])
                            .normalize_or_zero();
                        [n; 3]
                    }
                };
                let uvs = match &mesh.uvs {
                    Some(uvs) => [uvs[a], uvs[b], uvs[c]],
                    None => [Vec2::ZERO; 3],
                };
                triangles.push(Triangle::new(positions, normals, uvs, model.material));
            }
        }

        let bvh = BvhNode::new(&triangles);

        log::info!(
            "Built BVH for '{}': {} models, {} triangles, depth {} in {:.2?}",
            scene.name,
            scene.models.len(),
            triangles.len(),
            bvh.depth(),
            start.elapsed()
        );
        let bounds = bvh.bounding_box();
        log::debug!(
            "Scene bounds: x {:?}, y {:?}, z {:?}",
            bounds.x,
            bounds.y,
            bounds.z
        );

        self.scene = Some(scene);
        self.triangles = triangles;
        self.bvh = bvh;
        Ok(())
    }

    /// Nearest surface hit with `t >= 0`, or `None` on a miss.
    pub fn intersect_ray(&self, ray: &Ray) -> Option<SurfaceHit> {
        let scene = self.scene.as_ref()?;

        let mut closest = None;
        if !self.bvh.hit(&self.triangles, ray, Interval::FORWARD, &mut closest) {
            return None;
        }
        let (index, intersection) = closest?;
        let triangle = &self.triangles[index as usize];
        let material = scene.material(triangle.material)?;
        let uv = triangle.uv_at(&intersection);

        let mut hit = SurfaceHit {
            t: intersection.t,
            position: triangle.position_at(&intersection),
            uv,
            albedo: material.albedo_at(uv),
            meta_spec: material.meta_spec_at(uv),
            ..SurfaceHit::default()
        };
        hit.set_face_normal(ray, triangle.normal_at(&intersection));
        Some(hit)
    }

    pub fn scene(&self) -> Option<&Arc<Scene>> {
        self.scene.as_ref()
    }

    /// Lights of the loaded scene (empty when no scene is loaded).
    pub fn lights(&self) -> &[Light] {
        match &self.scene {
            Some(scene) => &scene.lights,
            None => &[],
        }
    }

    pub fn ambient_intensity(&self) -> Color {
        self.scene.as_ref().map_or(Color::ZERO, |scene| scene.ambient_intensity)
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lux_core::{Material, Mesh};
    use lux_math::{Vec3, Vec4};
    use rayon::prelude::*;

    fn assert_send_sync<T: Send + Sync>() {}

    /// A 2x2 floor quad at y=0 plus a smaller red quad hovering at y=1.
    fn two_layer_scene() -> Arc<Scene> {
        let mut scene = Scene::new("layers");
        let grey = scene.add_material(Material::diffuse("grey", Color::splat(0.5)));
        let red = scene.add_material(Material::new(
            "red",
            Vec4::new(1.0, 0.0, 0.0, 0.5),
            Vec4::new(0.1, 0.1, 0.1, 0.5),
        ));
        scene.add_model(
            "floor",
            Mesh::quad(
                Vec3::new(-1.0, 0.0, 1.0),
                Vec3::new(1.0, 0.0, 1.0),
                Vec3::new(1.0, 0.0, -1.0),
                Vec3::new(-1.0, 0.0, -1.0),
                1.0,
            ),
            grey,
        );
        scene.add_model(
            "panel",
            Mesh::quad(
                Vec3::new(-0.5, 1.0, 0.5),
                Vec3::new(0.5, 1.0, 0.5),
                Vec3::new(0.5, 1.0, -0.5),
                Vec3::new(-0.5, 1.0, -0.5),
                1.0,
            ),
            red,
        );
        Arc::new(scene)
    }

    #[test]
    fn test_intersector_is_send_sync() {
        assert_send_sync::<RayIntersector>();
    }

    #[test]
    fn test_empty_intersector_misses() {
        let intersector = RayIntersector::new();
        assert!(intersector.intersect_ray(&Ray::new(Vec3::ZERO, Vec3::NEG_Z)).is_none());
        assert!(intersector.lights().is_empty());
        assert_eq!(intersector.ambient_intensity(), Color::ZERO);
    }

    #[test]
    fn test_nearest_hit_and_material() {
        let intersector = RayIntersector::with_scene(two_layer_scene()).unwrap();
        assert_eq!(intersector.triangle_count(), 4);

        // From above: the panel is nearer than the floor
        let hit = intersector
            .intersect_ray(&Ray::new(Vec3::new(0.0, 3.0, 0.0), Vec3::NEG_Y))
            .expect("should hit panel");
        assert!((hit.t - 2.0).abs() < 1e-4);
        assert!((hit.position - Vec3::new(0.0, 1.0, 0.0)).length() < 1e-4);
        assert!((hit.albedo.w - 0.5).abs() < 1e-6);
        assert!((hit.meta_spec - Vec4::new(0.1, 0.1, 0.1, 0.5)).length() < 1e-6);
        assert!(hit.front_face);
        assert!((hit.normal - Vec3::Y).length() < 1e-5);

        // Off to the side: only the floor
        let hit = intersector
            .intersect_ray(&Ray::new(Vec3::new(0.8, 3.0, 0.8), Vec3::NEG_Y))
            .expect("should hit floor");
        assert!((hit.t - 3.0).abs() < 1e-4);
        assert!((hit.albedo.x - 0.5f32.powf(2.2)).abs() < 1e-5);
    }

    #[test]
    fn test_hit_from_below_flips_normal() {
        let intersector = RayIntersector::with_scene(two_layer_scene()).unwrap();
        let hit = intersector
            .intersect_ray(&Ray::new(Vec3::new(0.8, -1.0, 0.8), Vec3::Y))
            .expect("should hit floor");
        assert!(!hit.front_face);
        assert!((hit.normal - Vec3::NEG_Y).length() < 1e-5);
    }

    #[test]
    fn test_misses_and_hits_behind_origin() {
        let intersector = RayIntersector::with_scene(two_layer_scene()).unwrap();
        assert!(intersector
            .intersect_ray(&Ray::new(Vec3::new(0.0, 3.0, 0.0), Vec3::Y))
            .is_none());
        assert!(intersector
            .intersect_ray(&Ray::new(Vec3::new(5.0, 3.0, 0.0), Vec3::NEG_Y))
            .is_none());
    }

    #[test]
    fn test_invalid_scene_is_rejected() {
        let mut scene = Scene::new("broken");
        scene.add_model("orphan", Mesh::cuboid(Vec3::ZERO, Vec3::ONE), 3);

        let mut intersector = RayIntersector::with_scene(two_layer_scene()).unwrap();
        let err = intersector.init_scene(Arc::new(scene)).unwrap_err();
        assert!(matches!(err, SceneError::MissingMaterial { .. }));

        // Previous scene is still usable
        assert_eq!(intersector.triangle_count(), 4);
    }

    #[test]
    fn test_concurrent_queries_match_sequential() {
        let intersector = RayIntersector::with_scene(two_layer_scene()).unwrap();
        let rays: Vec<Ray> = (0..256)
            .map(|i| {
                let x = (i % 16) as f32 / 8.0 - 1.0;
                let z = (i / 16) as f32 / 8.0 - 1.0;
                Ray::new(Vec3::new(x, 2.0, z), Vec3::new(0.1, -1.0, 0.05))
            })
            .collect();

        let sequential: Vec<Option<SurfaceHit>> = rays.iter().map(|r| intersector.intersect_ray(r)).collect();
        let parallel: Vec<Option<SurfaceHit>> = rays.par_iter().map(|r| intersector.intersect_ray(r)).collect();
        assert_eq!(sequential, parallel);
    }
}
