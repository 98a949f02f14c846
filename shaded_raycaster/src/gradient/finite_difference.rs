use log::debug;
use nalgebra::{vector, Vector3};

use crate::volumetric::NormalizedVolume;

use super::{encode_volume, EncodedNormals, NormalEncoder};

/// Central differences, one-sided at the volume border.
#[derive(Debug, Default)]
pub struct FiniteDifference {
    normals: Option<EncodedNormals>,
}

impl FiniteDifference {
    pub fn new() -> FiniteDifference {
        FiniteDifference::default()
    }

    /// Compute normals of `volume` unless already computed
    pub fn bind(&mut self, volume: &NormalizedVolume, encoder: &NormalEncoder) {
        if self.normals.is_some() {
            return;
        }
        debug!("Computing finite difference normals for {:?}", volume.size());
        self.normals = Some(encode_volume(volume, encoder, |x, y, z| {
            gradient_at(volume, x, y, z)
        }));
    }

    pub fn normals(&self) -> Option<&EncodedNormals> {
        self.normals.as_ref()
    }
}

/// Gradient in world units at voxel `(x, y, z)`
pub fn gradient_at(volume: &NormalizedVolume, x: usize, y: usize, z: usize) -> Vector3<f32> {
    let size = volume.size();
    let spacing = volume.spacing();
    let sample = |x, y, z| volume.data()[volume.index(x, y, z)] as f32;

    let diff = |pos: usize, size: usize, get: &dyn Fn(usize) -> f32, spacing: f32| {
        let low = pos.saturating_sub(1);
        let high = (pos + 1).min(size - 1);
        if high == low {
            return 0.0;
        }
        (get(high) - get(low)) / ((high - low) as f32 * spacing)
    };

    vector![
        diff(x, size.x, &|v| sample(v, y, z), spacing.x),
        diff(y, size.y, &|v| sample(x, v, z), spacing.y),
        diff(z, size.z, &|v| sample(x, y, v), spacing.z)
    ]
}

#[cfg(test)]
mod test {
    use nalgebra::vector;

    use super::*;
    use crate::test_helpers::ramp_volume;

    #[test]
    fn ramp_gradient() {
        let volume = ramp_volume(vector![5, 3, 3]);

        let inner = gradient_at(&volume, 2, 1, 1);
        assert_eq!(inner, vector![10.0, 0.0, 0.0]);

        // one-sided at the border
        let border = gradient_at(&volume, 4, 0, 2);
        assert_eq!(border, vector![10.0, 0.0, 0.0]);
    }

    #[test]
    fn normals_point_against_gradient() {
        let volume = ramp_volume(vector![5, 3, 3]);
        let encoder = NormalEncoder::new();
        let mut estimator = FiniteDifference::new();
        estimator.bind(&volume, &encoder);

        let normals = estimator.normals().unwrap();
        assert_eq!(normals.len(), volume.len());

        let index = volume.index(2, 1, 1);
        let normal = encoder.decode(normals.indices[index]);
        assert!((normal - vector![-1.0, 0.0, 0.0]).norm() < 1e-3);
        assert!((normals.magnitudes[index] - 10.0).abs() < 1e-4);
    }
}
