//! Renders a small demo scene and writes it to `spheres_demo.ppm`.

use std::io::Write;

pub fn main() {
    // Type aliases used everywhere in the engine
    use whitt_engine::core::types::*;

    // region CREATING THE CAMERA

    use whitt_engine::scene::camera::PerspectiveCamera;

    let camera = PerspectiveCamera::new(
        Point3::new(0., 2., 8.),          // up slightly, and back a bit
        Point3::new(0., 0.5, 0.),         // aimed between the spheres
        Vector3::new(0., 1., 0.),
        Angle::from_degrees(60.),
    )
    .expect("camera parameters are valid");

    // endregion CREATING THE CAMERA

    // region CREATING THE SCENE

    use whitt_engine::light::PointLight;
    use whitt_engine::material::{
        checker::CheckerMaterial, diffuse::DiffuseMaterial, phong::PhongMaterial,
    };
    use whitt_engine::object::Renderable;
    use whitt_engine::primitive::{plane::Plane, sphere::Sphere};
    use whitt_engine::scene::Scene;

    let mut scene = Scene::new();
    scene.set_background_colour(Colour::rgba(0.1, 0.1, 0.2, 1.));

    // checkered floor; the checker delegates to two diffuse sub-materials
    scene.add_renderable(Renderable::new(
        Plane::new(Vector3::new(0., 1., 0.)),
        CheckerMaterial::new(
            DiffuseMaterial::new(Colour::rgb(0.9, 0.9, 0.9)).into(),
            DiffuseMaterial::new(Colour::rgb(0.2, 0.2, 0.2)).into(),
            Vector2::new(0.5, 0.5),
        ),
    ));

    // matte red sphere on the left
    scene.add_renderable(
        Renderable::new(Sphere::new(), DiffuseMaterial::new(Colour::rgb(0.9, 0.2, 0.2)))
            .with_transform(Matrix4::from_translation(Vector3::new(-1.5, 1., 0.))),
    );

    // shiny, partially mirrored sphere on the right
    scene.add_renderable(
        Renderable::new(Sphere::new(), PhongMaterial::new(Colour::rgb(0.2, 0.4, 0.9), 0.4, 64.))
            .with_transform(Matrix4::from_translation(Vector3::new(1.5, 1., 0.))),
    );

    scene.add_light(PointLight::new(Point3::new(5., 10., 5.), Vector3::new(60., 60., 60.)));
    scene.add_light(PointLight::new(Point3::new(-8., 6., 2.), Vector3::new(20., 20., 25.)));
    scene.set_camera(camera);

    // endregion CREATING THE SCENE

    // region RENDERING

    use whitt_engine::core::image::ImageBuffer;
    use whitt_engine::render::Raytracer;

    let raytracer = Raytracer::new().expect("worker pool should build");
    let mut image = ImageBuffer::new(640, 480);

    print!("rendering...");
    std::io::stdout().flush().unwrap();
    raytracer.render_to_image(&mut scene, &mut image);
    println!(" done");

    // endregion RENDERING

    // region WRITING THE IMAGE

    // plain binary PPM, readable by most image viewers
    let mut out = Vec::with_capacity(image.width() * image.height() * 3 + 32);
    out.extend_from_slice(format!("P6\n{} {}\n255\n", image.width(), image.height()).as_bytes());
    for pixel in image.pixels() {
        let clamped = pixel.clamped();
        for channel in [clamped.r(), clamped.g(), clamped.b()] {
            out.push((channel * 255.) as u8);
        }
    }
    std::fs::write("spheres_demo.ppm", out).expect("could not write output image");
    println!("wrote spheres_demo.ppm");

    // endregion WRITING THE IMAGE
}
