use nalgebra::{point, vector, Vector2};
use shaded_raycaster::{
    gradient::GradientKind,
    information::ViewpointInformation,
    render::{Interpolation, RayCastStrategy},
    shaders::ShaderKind,
    test_helpers, PerspectiveCamera, RenderError, RenderMode, RenderOptions, Renderer,
};

pub const WIDTH: u16 = 48;
pub const HEIGHT: u16 = 48;
pub const RESOLUTION: Vector2<u16> = vector![WIDTH, HEIGHT];

fn render_options() -> RenderOptions {
    RenderOptions::builder()
        .resolution(RESOLUTION)
        .early_ray_termination(true)
        .workers(4)
        .build()
        .unwrap()
}

fn sphere_renderer() -> Renderer {
    let _ = env_logger::builder().is_test(true).try_init();

    let volume = test_helpers::sphere_scalar(16);
    let mut renderer = Renderer::new(&volume).unwrap();
    renderer.set_transfer_function(test_helpers::sphere_tf());
    renderer
}

fn viewpoints(n: usize) -> Vec<PerspectiveCamera> {
    let golden = std::f32::consts::PI * (3.0 - f32::sqrt(5.0));
    (0..n)
        .map(|i| {
            let y = 1.0 - 2.0 * (i as f32 + 0.5) / n as f32;
            let theta = y.acos();
            let phi = golden * i as f32;
            PerspectiveCamera::on_sphere(point![0.0, 0.0, 0.0], 40.0, theta, phi)
        })
        .collect()
}

#[test]
fn plain_render_api() {
    let mut renderer = sphere_renderer();
    let camera = test_helpers::diagonal_camera(40.0);
    let options = render_options();
    let mut buffer = vec![0; options.buffer_len()];

    renderer.render(&camera, &options, &mut buffer).unwrap();

    assert_eq!(renderer.volume().mapper().strategy(), RayCastStrategy::Plain);
    // center of the image sees the ball, corner sees background
    let center = ((HEIGHT as usize / 2) * WIDTH as usize + WIDTH as usize / 2) * 3;
    assert!(buffer[center] > 0);
    assert_eq!(&buffer[0..3], &[0, 0, 0]);
}

#[test]
fn every_mode_renders() {
    let mut renderer = sphere_renderer();
    let camera = test_helpers::diagonal_camera(40.0);
    let options = render_options();
    let mut buffer = vec![0; options.buffer_len()];
    let n = renderer.size();

    renderer.set_interpolation(Interpolation::LinearInterpolateClassify);
    renderer.set_gradient_estimator(GradientKind::RegressionRadius1);
    renderer.set_lighting(true, true, 16.0);
    renderer.render(&camera, &options, &mut buffer).unwrap();
    let lit = buffer.clone();

    renderer.enable_contour(0.4);
    renderer.render(&camera, &options, &mut buffer).unwrap();
    assert_eq!(
        renderer.volume().mapper().strategy(),
        RayCastStrategy::ShaderComposited
    );
    // silhouettes only darken
    assert!(lit.iter().zip(&buffer).all(|(l, c)| c <= l));
    assert_ne!(lit, buffer);

    renderer.disable_contour();
    renderer.set_interpolation(Interpolation::LinearClassifyInterpolate);
    let saliency = (0..n).map(|i| (i % 5) as f32).collect();
    renderer
        .render_voxel_saliencies(saliency, 4.0, 1.0, false)
        .unwrap();
    renderer.render(&camera, &options, &mut buffer).unwrap();
    assert_eq!(renderer.chain().as_slice(), &[ShaderKind::Saliency]);
    assert!(buffer.iter().any(|&b| b > 0));
}

#[test]
fn viewpoint_information_flow() {
    let mut renderer = sphere_renderer();
    let options = render_options();
    let mut buffer = vec![0; options.buffer_len()];
    let mut information = ViewpointInformation::new();

    renderer.start_vmi_mode();
    for camera in viewpoints(6) {
        renderer.start_vmi_first_pass();
        renderer.render(&camera, &options, &mut buffer).unwrap();
        let projected = renderer.finish_vmi_first_pass().unwrap();

        renderer.start_vmi_second_pass();
        renderer.render(&camera, &options, &mut buffer).unwrap();
        let probabilities = renderer.finish_vmi_second_pass().unwrap();
        assert!(renderer.viewed_volume_in_vmi_second_pass().unwrap() > 0.0);

        information.add_viewpoint(projected, probabilities);
    }
    assert_eq!(renderer.mode(), RenderMode::VmiSecondPass);

    let report = information.compute();
    assert_eq!(report.vmi.len(), 6);
    assert!(report.vmi.iter().all(|&v| v >= -1e-4));
    let p_sum: f32 = report.viewpoint_probabilities.iter().sum();
    assert!((p_sum - 1.0).abs() < 1e-4);

    renderer
        .render_vomi(report.vomi.clone(), report.max_vomi, 1.0, false)
        .unwrap();
    assert_eq!(renderer.mode(), RenderMode::VisibilityMap);
    renderer
        .render(&viewpoints(1)[0], &options, &mut buffer)
        .unwrap();

    // results of a finished pass are no longer available
    assert!(matches!(
        renderer.finish_vmi_second_pass(),
        Err(RenderError::InvalidModeTransition { .. })
    ));
}

#[test]
fn gradient_instances_are_reused() {
    let mut renderer = sphere_renderer();

    renderer.set_gradient_estimator(GradientKind::FiniteDifference);
    renderer.set_gradient_estimator(GradientKind::RegressionRadius1);
    let first = renderer.gradients().regression().unwrap() as *const _;
    renderer.set_gradient_estimator(GradientKind::RegressionRadius2);
    let second = renderer.gradients().regression().unwrap() as *const _;

    assert_eq!(first, second);
    assert_eq!(renderer.gradients().regression().unwrap().radius(), 2);
    assert!(renderer
        .gradients()
        .normals(GradientKind::RegressionRadius1)
        .is_some());
}
