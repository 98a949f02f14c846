use nalgebra::{vector, Vector3};

use crate::config::{GenerateConfig, GeneratorConfig};

use super::SampleGenerator;

const PAD: u32 = 5;

/// Generate solid block
/// All samples inside the block are the same, border of `PAD` voxels is background
pub struct SolidGenerator {
    sample: i16,
    background: i16,
    pad: u32,
    dims: Vector3<u32>,
}

impl SolidGenerator {
    pub fn from_config(config: &GenerateConfig) -> SolidGenerator {
        let sample = match config.generator {
            GeneratorConfig::Solid { sample } => sample,
            _ => config.background,
        };

        // small volumes keep at least one solid voxel
        let pad = PAD.min(config.dims.min().saturating_sub(1) / 2);

        SolidGenerator {
            sample,
            background: config.background,
            pad,
            dims: config.dims,
        }
    }
}

impl SampleGenerator for SolidGenerator {
    fn sample_at(&self, coords: Vector3<u32>) -> i16 {
        let pad_end = self.dims - vector![self.pad, self.pad, self.pad];
        if coords.x < self.pad
            || coords.y < self.pad
            || coords.z < self.pad
            || coords.x >= pad_end.x
            || coords.y >= pad_end.y
            || coords.z >= pad_end.z
        {
            self.background
        } else {
            self.sample
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn border_is_background() {
        let cfg = GenerateConfig {
            dims: vector![20, 20, 20],
            spacing: vector![1.0, 1.0, 1.0],
            generator: GeneratorConfig::Solid { sample: 7 },
            background: -3,
            file_name: "unused.vol".into(),
            seed: None,
        };
        let gen = SolidGenerator::from_config(&cfg);

        assert_eq!(gen.sample_at(vector![0, 10, 10]), -3);
        assert_eq!(gen.sample_at(vector![4, 10, 10]), -3);
        assert_eq!(gen.sample_at(vector![5, 10, 10]), 7);
        assert_eq!(gen.sample_at(vector![14, 14, 14]), 7);
        assert_eq!(gen.sample_at(vector![15, 10, 10]), -3);
    }
}
