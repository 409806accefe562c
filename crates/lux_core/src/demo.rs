//! Built-in example scenes.
//!
//! These are constructed in code so the renderer can be exercised without
//! any asset loading.

use lux_math::{Color, Vec3, Vec4};

use crate::{Camera, Light, Material, Mesh, Scene, Texture};

/// A scene together with the camera it was framed for.
#[derive(Clone, Debug)]
pub struct DemoScene {
    pub scene: Scene,
    pub camera: Camera,
}

/// Look up a built-in scene by name (`"floor"` or `"cornell"`).
pub fn by_name(name: &str) -> Option<DemoScene> {
    match name {
        "floor" => Some(floor()),
        "cornell" | "cornell_box" | "cornell-box" => Some(cornell_box()),
        _ => None,
    }
}

/// Names accepted by [`by_name`].
pub const NAMES: [&str; 2] = ["floor", "cornell"];

/// A checkered ground plane with a few objects under a sun and a spot light.
pub fn floor() -> DemoScene {
    let mut scene = Scene::new("floor").with_ambient(Color::splat(0.05));

    let checker = scene.add_material(
        Material::glossy("checker", Color::ONE, Color::splat(0.1), 0.3).with_albedo_texture(
            Texture::checker(
                8,
                Vec4::new(0.85, 0.85, 0.85, 1.0),
                Vec4::new(0.25, 0.25, 0.3, 1.0),
            ),
        ),
    );
    let clay = scene.add_material(Material::diffuse("clay", Color::new(0.8, 0.45, 0.3)));
    let chrome = scene.add_material(Material::glossy("chrome", Color::splat(0.9), Color::splat(0.5), 0.98));
    let glass = scene.add_material(Material::new(
        "tinted_glass",
        Vec4::new(0.6, 0.8, 1.0, 0.35),
        Vec4::new(0.2, 0.2, 0.2, 0.9),
    ));

    scene.add_model(
        "ground",
        Mesh::quad(
            Vec3::new(-6.0, 0.0, 6.0),
            Vec3::new(6.0, 0.0, 6.0),
            Vec3::new(6.0, 0.0, -6.0),
            Vec3::new(-6.0, 0.0, -6.0),
            6.0,
        ),
        checker,
    );
    scene.add_model(
        "block",
        Mesh::cuboid(Vec3::new(-1.6, 0.0, -0.6), Vec3::new(-0.6, 1.0, 0.4)),
        clay,
    );
    scene.add_model(
        "pillar",
        Mesh::cuboid(Vec3::new(0.4, 0.0, -1.2), Vec3::new(1.2, 1.8, -0.4)),
        chrome,
    );
    scene.add_model(
        "pane",
        Mesh::quad(
            Vec3::new(-0.4, 0.0, 1.0),
            Vec3::new(0.8, 0.0, 1.0),
            Vec3::new(0.8, 1.2, 1.0),
            Vec3::new(-0.4, 1.2, 1.0),
            1.0,
        ),
        glass,
    );

    scene.add_light(Light::directional(Vec3::new(-0.4, -1.0, -0.3), Color::splat(1.2)));
    scene.add_light(Light::spot(
        Vec3::new(2.5, 4.0, 2.5),
        Vec3::new(-2.5, -4.0, -2.5),
        Color::new(18.0, 16.0, 12.0),
        12f32.to_radians(),
        22f32.to_radians(),
    ));

    DemoScene {
        scene,
        camera: Camera::new(Vec3::new(0.0, 2.2, 5.5), Vec3::new(0.0, 0.6, 0.0), 45.0),
    }
}

/// The classic Cornell box: red/green side walls, two blocks, a ceiling light.
pub fn cornell_box() -> DemoScene {
    let mut scene = Scene::new("cornell_box").with_ambient(Color::splat(0.02));

    let white = scene.add_material(Material::diffuse("white", Color::splat(0.75)));
    let red = scene.add_material(Material::diffuse("red", Color::new(0.75, 0.1, 0.1)));
    let green = scene.add_material(Material::diffuse("green", Color::new(0.1, 0.65, 0.15)));
    let metal = scene.add_material(Material::glossy(
        "brushed_metal",
        Color::splat(0.8),
        Color::splat(0.45),
        0.85,
    ));

    let (x0, x1, y0, y1, z0, z1) = (-1.0, 1.0, 0.0, 2.0, -1.0, 1.0);
    let corner = Vec3::new;
    let walls = [
        ("floor", corner(x0, y0, z1), corner(x1, y0, z1), corner(x1, y0, z0), corner(x0, y0, z0), white),
        ("ceiling", corner(x0, y1, z0), corner(x1, y1, z0), corner(x1, y1, z1), corner(x0, y1, z1), white),
        ("back", corner(x0, y0, z0), corner(x1, y0, z0), corner(x1, y1, z0), corner(x0, y1, z0), white),
        ("left", corner(x0, y0, z1), corner(x0, y0, z0), corner(x0, y1, z0), corner(x0, y1, z1), red),
        ("right", corner(x1, y0, z0), corner(x1, y0, z1), corner(x1, y1, z1), corner(x1, y1, z0), green),
    ];
    for (name, p0, p1, p2, p3, material) in walls {
        scene.add_model(name, Mesh::quad(p0, p1, p2, p3, 1.0), material);
    }

    scene.add_model(
        "short_block",
        Mesh::cuboid(Vec3::new(0.05, 0.0, -0.1), Vec3::new(0.65, 0.6, 0.5)),
        white,
    );
    scene.add_model(
        "tall_block",
        Mesh::cuboid(Vec3::new(-0.7, 0.0, -0.7), Vec3::new(-0.1, 1.2, -0.1)),
        metal,
    );

    scene.add_light(Light::point(Vec3::new(0.0, 1.9, 0.0), Color::splat(2.5)));

    DemoScene {
        scene,
        camera: Camera::new(Vec3::new(0.0, 1.0, 3.8), Vec3::new(0.0, 1.0, 0.0), 40.0),
    }
}
