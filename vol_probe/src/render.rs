use std::error::Error;

use log::info;

use crate::{
    config::{RenderConfig, ShadingMode},
    file::write_ppm,
    scene::Scene,
};

/// Polar and azimuth angle of the `render` camera
const VIEW_ANGLES: (f32, f32) = (1.1, 0.7);

pub fn render(cfg: &RenderConfig) -> Result<(), Box<dyn Error>> {
    let mut scene = Scene::load(&cfg.view)?;
    setup_shading(&mut scene, cfg)?;

    let camera = scene.camera(VIEW_ANGLES.0, VIEW_ANGLES.1);
    let mut buffer = scene.buffer();
    scene.renderer.render(&camera, &scene.options, &mut buffer)?;

    write_ppm(&cfg.file_name, scene.options.resolution, &buffer)?;
    info!("Image written to {:?}", cfg.file_name);
    Ok(())
}

fn setup_shading(scene: &mut Scene, cfg: &RenderConfig) -> Result<(), Box<dyn Error>> {
    let renderer = &mut scene.renderer;
    let (specular, power) = match cfg.specular {
        Some(power) => (true, power),
        None => (false, 0.0),
    };

    match cfg.mode {
        ShadingMode::Plain => {}
        ShadingMode::Lit => {
            renderer.set_gradient_estimator(cfg.gradient);
            renderer.set_lighting(true, specular, power);
        }
        ShadingMode::Contour => {
            renderer.set_gradient_estimator(cfg.gradient);
            renderer.set_lighting(true, specular, power);
            renderer.enable_contour(cfg.contour_threshold);
        }
        ShadingMode::Saliency => {
            // gradient magnitude stands in for saliency
            renderer.set_gradient_estimator(cfg.gradient);
            let normals = renderer
                .gradients()
                .current_normals()
                .ok_or("gradient estimator has no normals")?;
            let saliencies = normals.magnitudes.clone();
            let max = normals.max_magnitude();
            renderer.render_voxel_saliencies(saliencies, max, 1.0, true)?;
        }
    }
    info!("Shading {:?}, kernels {:?}", cfg.mode, renderer.chain().as_slice());
    Ok(())
}
