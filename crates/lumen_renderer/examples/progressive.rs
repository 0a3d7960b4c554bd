//! Headless progressive render example.
//!
//! Renders a small sphere scene, accumulating samples over a number of
//! frames the way the interactive viewer would with a static camera,
//! then saves the converged image as PNG.

use anyhow::Context;
use lumen_renderer::{Camera, Material, Renderer, Scene, Sphere, Vec3};

const WIDTH: u32 = 800;
const HEIGHT: u32 = 450;
const FRAMES: u32 = 64;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    println!("Lumen progressive render");
    println!("========================");

    let scene = build_scene();
    println!(
        "Scene: {} spheres, {} materials",
        scene.sphere_count(),
        scene.material_count()
    );

    let mut camera = Camera::new(45.0, 0.1, 100.0);
    camera.resize(WIDTH, HEIGHT);

    let mut renderer = Renderer::new();
    renderer.on_resize(WIDTH, HEIGHT);

    println!("Rendering {WIDTH}x{HEIGHT} over {FRAMES} accumulated frames...");
    let start = std::time::Instant::now();
    for frame in 1..=FRAMES {
        renderer.render(&scene, &camera)?;
        if frame % 16 == 0 {
            println!(
                "  frame {frame:3}: {:.2?} per sweep",
                renderer.last_render_time()
            );
        }
    }
    println!("Accumulated {FRAMES} frames in {:.2?}", start.elapsed());

    let filename = "progressive.png";
    image::save_buffer(
        filename,
        renderer.image_bytes(),
        WIDTH,
        HEIGHT,
        image::ColorType::Rgba8,
    )
    .context("failed to save image")?;
    println!("Saved to {filename}");

    Ok(())
}

fn build_scene() -> Scene {
    let mut scene = Scene::new();

    let pink = scene.add_material(Material::new(Vec3::new(1.0, 0.0, 1.0), 0.05));
    let blue = scene.add_material(Material::new(Vec3::new(0.2, 0.3, 1.0), 0.1));
    let gold = scene.add_material(Material::new(Vec3::new(0.8, 0.5, 0.2), 0.4));

    scene.add_sphere(Sphere::new(Vec3::ZERO, 1.0, pink));
    scene.add_sphere(Sphere::new(Vec3::new(2.0, 0.0, -2.0), 1.0, gold));
    // Ground sphere
    scene.add_sphere(Sphere::new(Vec3::new(0.0, -101.0, 0.0), 100.0, blue));

    scene
}
