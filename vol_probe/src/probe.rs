//! `vmi` command: both passes over viewpoints on a sphere, then information measures

use std::error::Error;

use indicatif::{ProgressBar, ProgressStyle};
use log::info;
use shaded_raycaster::information::ViewpointInformation;

use crate::{
    config::VmiConfig,
    file::write_ppm,
    scene::{fibonacci_sphere, Scene},
};

pub fn probe(cfg: &VmiConfig) -> Result<(), Box<dyn Error>> {
    let mut scene = Scene::load(&cfg.view)?;
    let viewpoints = fibonacci_sphere(cfg.viewpoints);
    let mut buffer = scene.buffer();
    let mut information = ViewpointInformation::new();

    let bar = ProgressBar::new(viewpoints.len() as u64);
    bar.set_style(
        ProgressStyle::default_bar()
            .template("{msg} [{bar:40}] {pos}/{len} ({eta})")
            .progress_chars("=> "),
    );
    bar.set_message("Viewpoints");

    scene.renderer.start_vmi_mode();
    for &(theta, phi) in &viewpoints {
        let camera = scene.camera(theta, phi);
        let renderer = &mut scene.renderer;

        renderer.start_vmi_first_pass();
        renderer.render(&camera, &scene.options, &mut buffer)?;
        let projected = renderer.finish_vmi_first_pass()?;

        renderer.start_vmi_second_pass();
        renderer.render(&camera, &scene.options, &mut buffer)?;
        let probabilities = renderer.finish_vmi_second_pass()?;

        information.add_viewpoint(projected, probabilities);
        bar.inc(1);
    }
    bar.finish_with_message("Viewpoints done");

    let report = information.compute();
    println!("viewpoint\ttheta\tphi\tp(v)\tVMI");
    for (i, (&(theta, phi), (p, vmi))) in viewpoints
        .iter()
        .zip(report.viewpoint_probabilities.iter().zip(&report.vmi))
        .enumerate()
    {
        println!("{i}\t{theta:.3}\t{phi:.3}\t{p:.4}\t{vmi:.4}");
    }

    // lowest VMI is the most representative view
    let best = report
        .vmi
        .iter()
        .enumerate()
        .min_by(|a, b| a.1.total_cmp(b.1))
        .map(|(i, _)| i);

    if let (Some(path), Some(best)) = (&cfg.vomi_output, best) {
        let (theta, phi) = viewpoints[best];
        let camera = scene.camera(theta, phi);
        scene
            .renderer
            .render_vomi(report.vomi, report.max_vomi, 1.0, false)?;
        scene.renderer.render(&camera, &scene.options, &mut buffer)?;
        write_ppm(path, scene.options.resolution, &buffer)?;
        info!("VoMI from viewpoint {best} written to {path:?}");
    }

    Ok(())
}
