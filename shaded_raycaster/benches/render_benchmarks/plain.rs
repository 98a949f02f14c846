use crate::common::*;

pub fn render_plain(c: &mut Criterion) {
    let render_options = RenderOptions::builder()
        .resolution(RESOLUTION)
        .early_ray_termination(false)
        .build_unchecked();

    bench_frame(c, "plain", render_options, |_| ());
}

pub fn render_plain_ert(c: &mut Criterion) {
    let render_options = RenderOptions::builder()
        .resolution(RESOLUTION)
        .early_ray_termination(true)
        .build_unchecked();

    bench_frame(c, "plain ert", render_options, |_| ());
}

pub fn render_plain_lit(c: &mut Criterion) {
    let render_options = RenderOptions::builder()
        .resolution(RESOLUTION)
        .early_ray_termination(true)
        .build_unchecked();

    bench_frame(c, "plain lit", render_options, |r| {
        r.set_lighting(true, true, 20.0)
    });
}

pub fn render_single_worker(c: &mut Criterion) {
    let render_options = RenderOptions::builder()
        .resolution(RESOLUTION)
        .early_ray_termination(true)
        .workers(1)
        .build_unchecked();

    bench_frame(c, "plain single worker", render_options, |_| ());
}
