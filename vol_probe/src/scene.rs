//! Setup shared by the commands that render

use log::info;
use nalgebra::{point, Vector2};
use shaded_raycaster::{
    premade::transfer_functions,
    render::Interpolation,
    volumetric::{self, ScalarVolume},
    PerspectiveCamera, RenderError, RenderOptions, Renderer,
};

use crate::config::{TfPreset, ViewConfig};

/// Loaded volume ready to be rendered
pub struct Scene {
    pub renderer: Renderer,
    pub options: RenderOptions,
    /// Distance of cameras from the volume center
    pub radius: f32,
}

impl Scene {
    pub fn load(cfg: &ViewConfig) -> Result<Scene, RenderError> {
        let volume = volumetric::from_file(&cfg.input)?;
        info!(
            "Loaded {:?}, {:?} samples, values {:?}",
            cfg.input,
            volume.size(),
            volume.range()
        );
        Scene::from_volume(&volume, cfg)
    }

    pub fn from_volume(volume: &ScalarVolume, cfg: &ViewConfig) -> Result<Scene, RenderError> {
        let mut renderer = Renderer::new(volume)?;
        renderer.set_transfer_function(transfer_function(cfg.tf, &renderer));
        if cfg.interpolate {
            renderer.set_interpolation(Interpolation::LinearInterpolateClassify);
        }

        let mut builder = RenderOptions::builder()
            .resolution(cfg.resolution)
            .early_ray_termination(true);
        if let Some(workers) = cfg.workers {
            builder = builder.workers(workers);
        }
        let options = builder.build()?;

        let diagonal = renderer.volume().bound_box().dims().magnitude();

        Ok(Scene {
            renderer,
            options,
            radius: diagonal * cfg.distance,
        })
    }

    /// Camera on the bounding sphere, angles in radians
    pub fn camera(&self, theta: f32, phi: f32) -> PerspectiveCamera {
        let mut camera = PerspectiveCamera::on_sphere(point![0.0, 0.0, 0.0], self.radius, theta, phi);
        let res: Vector2<u16> = self.options.resolution;
        camera.change_aspect_from_resolution(res.x as usize, res.y as usize);
        camera
    }

    pub fn buffer(&self) -> Vec<u8> {
        vec![0; self.options.buffer_len()]
    }
}

fn transfer_function(preset: TfPreset, renderer: &Renderer) -> shaded_raycaster::TransferFunction {
    let shift = renderer.image().shift();
    match preset {
        TfPreset::Gray => transfer_functions::gray_ramp(renderer.range_max()),
        TfPreset::Bone => transfer_functions::ct_bone(shift),
        TfPreset::Skin => transfer_functions::ct_skin_bone(shift),
        TfPreset::Generated => transfer_functions::generated(renderer.range_max()),
    }
}

/// Viewpoints spread evenly over a sphere, as `(theta, phi)`
pub fn fibonacci_sphere(n: usize) -> Vec<(f32, f32)> {
    let golden = std::f32::consts::PI * (3.0 - f32::sqrt(5.0));
    (0..n)
        .map(|i| {
            let y = 1.0 - 2.0 * (i as f32 + 0.5) / n as f32;
            (y.acos(), golden * i as f32)
        })
        .collect()
}

#[cfg(test)]
mod test {
    use nalgebra::vector;
    use shaded_raycaster::test_helpers;

    use super::*;

    fn view_config() -> ViewConfig {
        ViewConfig {
            input: "unused.vol".into(),
            resolution: vector![32, 16],
            tf: TfPreset::Gray,
            distance: 2.0,
            workers: Some(2),
            interpolate: false,
        }
    }

    #[test]
    fn cameras_look_at_center() {
        let scene = Scene::from_volume(&test_helpers::sphere_scalar(10), &view_config()).unwrap();

        for (theta, phi) in fibonacci_sphere(8) {
            let camera = scene.camera(theta, phi);
            let to_center = (point![0.0, 0.0, 0.0] - camera.get_pos()).normalize();
            assert!((camera.get_dir().normalize() - to_center).magnitude() < 1e-4);
            assert!((camera.get_pos().coords.magnitude() - scene.radius).abs() < 1e-3);
        }
        assert_eq!(scene.buffer().len(), 32 * 16 * 3);
    }

    #[test]
    fn sphere_points_are_distinct() {
        let points = fibonacci_sphere(6);

        assert_eq!(points.len(), 6);
        assert!(points.iter().all(|&(theta, _)| (0.0..=std::f32::consts::PI).contains(&theta)));
    }
}
