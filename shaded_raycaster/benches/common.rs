pub use criterion::Criterion;

pub use nalgebra::{vector, Vector2};
use shaded_raycaster::test_helpers;
pub use shaded_raycaster::{PerspectiveCamera, RenderOptions, Renderer};

pub const WIDTH: u16 = 256;
pub const HEIGHT: u16 = 256;
pub const RESOLUTION: Vector2<u16> = vector![WIDTH, HEIGHT];

pub const SPHERE_SIDE: usize = 64;
pub const CAMERA_DISTANCE: f32 = 120.0;

/// Renderer over the synthetic sphere with its transfer function set
pub fn sphere_renderer() -> Renderer {
    let volume = test_helpers::sphere_scalar(SPHERE_SIDE);
    let mut renderer = Renderer::new(&volume).unwrap();
    renderer.set_transfer_function(test_helpers::sphere_tf());
    renderer
}

/// Run `setup`, then benchmark rendering one frame
pub fn bench_frame<F>(c: &mut Criterion, name: &str, render_options: RenderOptions, setup: F)
where
    F: FnOnce(&mut Renderer),
{
    let mut renderer = sphere_renderer();
    setup(&mut renderer);

    let camera = test_helpers::diagonal_camera(CAMERA_DISTANCE);
    let mut buffer = vec![0; render_options.buffer_len()];

    c.bench_function(name, |b| {
        b.iter(|| renderer.render(&camera, &render_options, &mut buffer).unwrap());
    });
}
