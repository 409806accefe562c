//! Scene description types.
//!
//! A scene is a flat list of models (mesh + material reference), the
//! materials they use, the lights that illuminate them and an ambient term.
//! Scenes are immutable while a render is in flight and shared as
//! `Arc<Scene>`; changing geometry means rebuilding the intersector.

use lux_math::{Color, Vec2, Vec4};
use thiserror::Error;

use crate::light::Light;
use crate::mesh::Mesh;
use crate::texture::Texture;

/// Errors found while validating a scene.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SceneError {
    #[error("model {model}: triangle index {index} out of range (vertex count {vertex_count})")]
    IndexOutOfRange {
        model: usize,
        index: u32,
        vertex_count: usize,
    },

    #[error("model {model}: index count {len} is not a multiple of 3")]
    TriangleIndices { model: usize, len: usize },

    #[error("model {model}: {found} {attribute} for {expected} vertices")]
    AttributeCount {
        model: usize,
        attribute: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("model {model}: material {material} does not exist")]
    MissingMaterial { model: usize, material: usize },

    #[error("texture has no pixels")]
    EmptyTexture,

    #[error("texture is {width}x{height} but has {pixels} pixels")]
    TextureSize { width: u32, height: u32, pixels: usize },
}

/// Gamma used to linearise authored albedo colors.
const ALBEDO_GAMMA: f32 = 2.2;

/// A surface material: an albedo map and a "meta-specular" map.
///
/// - albedo: RGB base color (display-referred) + alpha as opacity
///   (alpha >= 0.9 opaque, alpha < 0.2 ignored by shadow rays)
/// - meta-spec: RGB specular tint + shininess in [0, 1] (x256 for Phong exponents)
#[derive(Clone, Debug)]
pub struct Material {
    /// Material name
    pub name: String,

    /// Albedo/opacity map
    pub albedo: Texture,

    /// Specular tint and shininess map
    pub meta_spec: Texture,
}

impl Material {
    /// Create a material from constant albedo and meta-spec values.
    pub fn new(name: impl Into<String>, albedo: Vec4, meta_spec: Vec4) -> Self {
        Self {
            name: name.into(),
            albedo: Texture::solid(albedo),
            meta_spec: Texture::solid(meta_spec),
        }
    }

    /// Opaque, non-specular material.
    pub fn diffuse(name: impl Into<String>, color: Color) -> Self {
        Self::new(name, color.extend(1.0), Vec4::ZERO)
    }

    /// Opaque material with a specular tint and shininess in [0, 1].
    pub fn glossy(name: impl Into<String>, color: Color, specular: Color, shininess: f32) -> Self {
        Self::new(name, color.extend(1.0), specular.extend(shininess.clamp(0.0, 1.0)))
    }

    /// Replace the albedo map.
    pub fn with_albedo_texture(mut self, texture: Texture) -> Self {
        self.albedo = texture;
        self
    }

    /// Linear albedo (RGB) and opacity (A) at a texture coordinate.
    pub fn albedo_at(&self, uv: Vec2) -> Vec4 {
        let texel = self.albedo.sample(uv);
        texel.truncate().powf(ALBEDO_GAMMA).extend(texel.w)
    }

    /// Specular tint (RGB) and shininess (A) at a texture coordinate.
    pub fn meta_spec_at(&self, uv: Vec2) -> Vec4 {
        self.meta_spec.sample(uv)
    }
}

/// A mesh placed in the scene with one material.
#[derive(Clone, Debug)]
pub struct Model {
    pub name: String,
    pub mesh: Mesh,
    /// Index into [`Scene::materials`]
    pub material: usize,
}

/// A complete scene: geometry, materials, lights and ambient light.
#[derive(Clone, Debug, Default)]
pub struct Scene {
    /// Scene name
    pub name: String,

    /// Geometry with material references
    pub models: Vec<Model>,

    /// Materials used in the scene
    pub materials: Vec<Material>,

    /// Light sources
    pub lights: Vec<Light>,

    /// Ambient intensity used by the Whitted integrator
    pub ambient_intensity: Color,
}

impl Scene {
    /// Create an empty scene.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Add a material to the scene and return its ID.
    pub fn add_material(&mut self, material: Material) -> usize {
        self.materials.push(material);
        self.materials.len() - 1
    }

    /// Add a model and return its index. Missing normals are computed.
    pub fn add_model(&mut self, name: impl Into<String>, mut mesh: Mesh, material: usize) -> usize {
        mesh.ensure_normals();
        self.models.push(Model {
            name: name.into(),
            mesh,
            material,
        });
        self.models.len() - 1
    }

    /// Add a light source.
    pub fn add_light(&mut self, light: Light) {
        self.lights.push(light);
    }

    /// Set the ambient intensity.
    pub fn with_ambient(mut self, ambient: Color) -> Self {
        self.ambient_intensity = ambient;
        self
    }

    /// Get a material by ID.
    pub fn material(&self, id: usize) -> Option<&Material> {
        self.materials.get(id)
    }

    /// Get total triangle count across all models.
    pub fn triangle_count(&self) -> usize {
        self.models.iter().map(|m| m.mesh.triangle_count()).sum()
    }

    /// Check every model's mesh and material reference.
    pub fn validate(&self) -> Result<(), SceneError> {
        for (index, model) in self.models.iter().enumerate() {
            model.mesh.validate(index)?;
            if model.material >= self.materials.len() {
                return Err(SceneError::MissingMaterial {
                    model: index,
                    material: model.material,
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lux_math::Vec3;

    fn triangle() -> Mesh {
        Mesh::new(vec![Vec3::ZERO, Vec3::X, Vec3::Y], vec![0, 1, 2], None)
    }

    #[test]
    fn test_scene_creation() {
        let mut scene = Scene::new("test");
        let grey = scene.add_material(Material::diffuse("grey", Color::splat(0.5)));
        assert_eq!(grey, 0);

        scene.add_model("a", triangle(), grey);
        scene.add_model("b", triangle(), grey);

        assert_eq!(scene.models.len(), 2);
        assert_eq!(scene.triangle_count(), 2);
        assert!(scene.models[0].mesh.normals.is_some());
        assert!(scene.validate().is_ok());
    }

    #[test]
    fn test_missing_material() {
        let mut scene = Scene::new("test");
        scene.add_model("orphan", triangle(), 3);
        assert_eq!(
            scene.validate(),
            Err(SceneError::MissingMaterial { model: 0, material: 3 })
        );
    }

    #[test]
    fn test_albedo_is_linearised_but_alpha_is_not() {
        let material = Material::new("m", Vec4::new(0.5, 1.0, 0.0, 0.5), Vec4::new(0.2, 0.2, 0.2, 0.75));
        let albedo = material.albedo_at(Vec2::ZERO);
        assert!((albedo.x - 0.5f32.powf(2.2)).abs() < 1e-6);
        assert_eq!(albedo.y, 1.0);
        assert_eq!(albedo.w, 0.5);
        assert_eq!(material.meta_spec_at(Vec2::ZERO), Vec4::new(0.2, 0.2, 0.2, 0.75));
    }
}
