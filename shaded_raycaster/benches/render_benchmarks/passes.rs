use crate::common::*;

pub fn render_vmi_first_pass(c: &mut Criterion) {
    let render_options = RenderOptions::builder()
        .resolution(RESOLUTION)
        .early_ray_termination(false)
        .build_unchecked();

    bench_frame(c, "vmi first pass", render_options, |r| {
        r.start_vmi_mode();
        r.start_vmi_first_pass();
    });
}

pub fn render_vmi_second_pass(c: &mut Criterion) {
    let render_options = RenderOptions::builder()
        .resolution(RESOLUTION)
        .early_ray_termination(false)
        .build_unchecked();

    bench_frame(c, "vmi second pass", render_options, |r| {
        r.start_vmi_mode();
        r.start_vmi_second_pass();
    });
}
