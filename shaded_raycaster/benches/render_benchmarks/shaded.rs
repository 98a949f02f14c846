use crate::common::*;

pub fn render_contour(c: &mut Criterion) {
    let render_options = RenderOptions::builder()
        .resolution(RESOLUTION)
        .early_ray_termination(true)
        .build_unchecked();

    bench_frame(c, "contour", render_options, |r| {
        r.set_lighting(true, false, 10.0);
        r.enable_contour(0.3);
    });
}

pub fn render_saliency(c: &mut Criterion) {
    let render_options = RenderOptions::builder()
        .resolution(RESOLUTION)
        .early_ray_termination(true)
        .build_unchecked();

    bench_frame(c, "saliency", render_options, |r| {
        let saliencies = (0..r.size()).map(|i| (i % 7) as f32).collect();
        r.render_voxel_saliencies(saliencies, 6.0, 1.0, true).unwrap();
    });
}
