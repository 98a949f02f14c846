use nalgebra::Vector3;

use crate::common::ValueRange;

/// Raw scalar volume as delivered by the image loader.
///
/// Samples are stored linearly, `z` being the fastest changing coordinate:
/// `index = z + y * size.z + x * size.y * size.z`.
/// Nothing is validated here, see [`NormalizedVolume::from_scalar`](super::NormalizedVolume::from_scalar).
#[derive(Debug, Clone)]
pub struct ScalarVolume {
    size: Vector3<usize>,
    spacing: Vector3<f32>,
    samples: Vec<i16>,
    range: ValueRange,
}

impl ScalarVolume {
    pub fn new(size: Vector3<usize>, spacing: Vector3<f32>, samples: Vec<i16>) -> ScalarVolume {
        let range = ValueRange::from_samples(samples.iter().copied());
        ScalarVolume {
            size,
            spacing,
            samples,
            range,
        }
    }

    /// Build volume by evaluating `f` at every voxel coordinate
    pub fn from_fn<F>(size: Vector3<usize>, spacing: Vector3<f32>, f: F) -> ScalarVolume
    where
        F: Fn(usize, usize, usize) -> i16,
    {
        let mut samples = Vec::with_capacity(size.x * size.y * size.z);
        for x in 0..size.x {
            for y in 0..size.y {
                for z in 0..size.z {
                    samples.push(f(x, y, z));
                }
            }
        }
        ScalarVolume::new(size, spacing, samples)
    }

    pub fn size(&self) -> Vector3<usize> {
        self.size
    }

    pub fn spacing(&self) -> Vector3<f32> {
        self.spacing
    }

    pub fn samples(&self) -> &[i16] {
        &self.samples
    }

    /// Observed minimum and maximum
    pub fn range(&self) -> ValueRange {
        self.range
    }
}
