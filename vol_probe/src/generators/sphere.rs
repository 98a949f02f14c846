use nalgebra::{vector, Vector3};

use crate::config::{GenerateConfig, GeneratorConfig};

use super::SampleGenerator;

/// Ball in the middle of the volume, radius a third of the shortest side.
/// Value falls linearly from `sample` in the center to `background` at the surface.
pub struct SphereGenerator {
    center: Vector3<f32>,
    radius: f32,
    sample: i16,
    background: i16,
}

impl SphereGenerator {
    pub fn from_config(config: &GenerateConfig) -> SphereGenerator {
        let sample = match config.generator {
            GeneratorConfig::Sphere { sample } => sample,
            _ => config.background,
        };
        let dims = config.dims.cast::<f32>();

        SphereGenerator {
            center: (dims - vector![1.0, 1.0, 1.0]) / 2.0,
            radius: dims.min() / 3.0,
            sample,
            background: config.background,
        }
    }
}

impl SampleGenerator for SphereGenerator {
    fn sample_at(&self, coords: Vector3<u32>) -> i16 {
        let dist = (coords.cast::<f32>() - self.center).magnitude();
        if dist > self.radius {
            return self.background;
        }
        let t = 1.0 - dist / self.radius;
        let (bg, fg) = (self.background as f32, self.sample as f32);
        (bg + t * (fg - bg)) as i16
    }
}
