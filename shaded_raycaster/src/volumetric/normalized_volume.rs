use log::debug;
use nalgebra::{Point3, Vector3};

use crate::{common::ValueRange, RenderError};

use super::ScalarVolume;

/// Scalar volume shifted to an unsigned range starting at zero.
///
/// This is the sample buffer every voxel shader and gradient estimator reads.
/// It is immutable once built.
pub struct NormalizedVolume {
    size: Vector3<usize>,
    spacing: Vector3<f32>,
    data: Vec<u16>,
    range_max: u16,
    shift: f32,
}

impl std::fmt::Debug for NormalizedVolume {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NormalizedVolume")
            .field("size", &self.size)
            .field("spacing", &self.spacing)
            .field("range_max", &self.range_max)
            .field("shift", &self.shift)
            .field("data len", &self.data.len())
            .finish()
    }
}

/// Eight voxels around a sampling position with trilinear weights.
#[derive(Debug, Clone, Copy)]
pub struct Trilinear {
    pub offsets: [usize; 8],
    pub weights: [f32; 8],
}

impl NormalizedVolume {
    /// Shift `volume` so its minimum maps to zero.
    ///
    /// `shift = -min`, every sample becomes `sample + shift`,
    /// range becomes `<0; max + shift>`.
    pub fn from_scalar(volume: &ScalarVolume) -> Result<NormalizedVolume, RenderError> {
        let size = volume.size();
        let samples = volume.samples();

        if size.iter().any(|&d| d == 0) {
            return Err(RenderError::InvalidVolume("volume has zero extent"));
        }
        if samples.is_empty() {
            return Err(RenderError::InvalidVolume("volume has no samples"));
        }
        if samples.len() != size.x * size.y * size.z {
            return Err(RenderError::InvalidVolume(
                "number of samples does not match volume extent",
            ));
        }
        if volume.spacing().iter().any(|&s| s.is_nan() || s <= 0.0) {
            return Err(RenderError::InvalidVolume("voxel spacing must be positive"));
        }

        let range = volume.range();
        debug!("original range: min = {}, max = {}", range.low, range.high);

        let min = range.low as i32;
        let shift = -range.low;
        // i16 span always fits into u16
        let data: Vec<u16> = samples.iter().map(|&s| (s as i32 - min) as u16).collect();
        let range_max = (range.high + shift) as u16;

        debug!("normalized range: min = 0, max = {range_max}, shift = {shift}");

        Ok(NormalizedVolume {
            size,
            spacing: volume.spacing(),
            data,
            range_max,
            shift,
        })
    }

    pub fn range_min(&self) -> u16 {
        0
    }

    pub fn range_max(&self) -> u16 {
        self.range_max
    }

    /// Normalized range as floats
    pub fn range(&self) -> ValueRange {
        ValueRange {
            low: 0.0,
            high: self.range_max as f32,
        }
    }

    /// Value that was added to every original sample
    pub fn shift(&self) -> f32 {
        self.shift
    }

    /// Flat sample buffer
    pub fn data(&self) -> &[u16] {
        &self.data
    }

    /// Total number of samples
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn size(&self) -> Vector3<usize> {
        self.size
    }

    pub fn spacing(&self) -> Vector3<f32> {
        self.spacing
    }

    /// Size in world units, measured between the centers of border voxels
    pub fn dims(&self) -> Vector3<f32> {
        self.size
            .map(|v| v.saturating_sub(1) as f32)
            .component_mul(&self.spacing)
    }

    pub fn index(&self, x: usize, y: usize, z: usize) -> usize {
        z + y * self.size.z + x * self.size.y * self.size.z
    }

    pub fn get(&self, x: usize, y: usize, z: usize) -> Option<u16> {
        if x >= self.size.x || y >= self.size.y || z >= self.size.z {
            return None;
        }
        self.data.get(self.index(x, y, z)).copied()
    }

    /// Sample with coordinates clamped to the volume
    pub fn get_clamped(&self, x: isize, y: isize, z: isize) -> u16 {
        let clamp = |v: isize, size: usize| v.clamp(0, size as isize - 1) as usize;
        let index = self.index(
            clamp(x, self.size.x),
            clamp(y, self.size.y),
            clamp(z, self.size.z),
        );
        self.data[index]
    }

    /// Offset of the voxel nearest to `pos` (voxel coordinates)
    pub fn nearest_offset(&self, pos: Point3<f32>) -> usize {
        let coord = |v: f32, size: usize| (v.round().max(0.0) as usize).min(size - 1);
        self.index(
            coord(pos.x, self.size.x),
            coord(pos.y, self.size.y),
            coord(pos.z, self.size.z),
        )
    }

    /// Corner voxels and weights for trilinear interpolation at `pos`.
    /// Positions outside the volume are clamped to the border.
    pub fn trilinear(&self, pos: Point3<f32>) -> Trilinear {
        let axis = |v: f32, size: usize| -> (usize, usize, f32) {
            let max = (size - 1) as f32;
            let v = v.clamp(0.0, max);
            let low = (v.floor() as usize).min(size - 1);
            let high = (low + 1).min(size - 1);
            (low, high, v - low as f32)
        };

        let (x0, x1, tx) = axis(pos.x, self.size.x);
        let (y0, y1, ty) = axis(pos.y, self.size.y);
        let (z0, z1, tz) = axis(pos.z, self.size.z);

        let offsets = [
            self.index(x0, y0, z0),
            self.index(x0, y0, z1),
            self.index(x0, y1, z0),
            self.index(x0, y1, z1),
            self.index(x1, y0, z0),
            self.index(x1, y0, z1),
            self.index(x1, y1, z0),
            self.index(x1, y1, z1),
        ];

        let (ix, iy, iz) = (1.0 - tx, 1.0 - ty, 1.0 - tz);
        let weights = [
            ix * iy * iz,
            ix * iy * tz,
            ix * ty * iz,
            ix * ty * tz,
            tx * iy * iz,
            tx * iy * tz,
            tx * ty * iz,
            tx * ty * tz,
        ];

        Trilinear { offsets, weights }
    }

    /// Trilinear interpolation sample, `pos` in voxel coordinates
    pub fn sample_at(&self, pos: Point3<f32>) -> f32 {
        let tri = self.trilinear(pos);
        tri.offsets
            .iter()
            .zip(tri.weights.iter())
            .map(|(&o, &w)| self.data[o] as f32 * w)
            .sum()
    }
}

#[cfg(test)]
mod test {
    use nalgebra::{point, vector};

    use super::*;
    use crate::test_helpers::ramp_volume;

    #[test]
    fn range_is_shifted_to_zero() {
        let samples = vec![-100, 0, 250, 900, 17, -3, 400, 800];
        let volume = ScalarVolume::new(vector![2, 2, 2], vector![1.0, 1.0, 1.0], samples);

        let normalized = NormalizedVolume::from_scalar(&volume).unwrap();

        assert_eq!(normalized.range_min(), 0);
        assert_eq!(normalized.range_max(), 1000);
        assert_eq!(normalized.shift(), 100.0);
        assert_eq!(normalized.len(), 8);
        assert_eq!(normalized.data()[0], 0);
        assert_eq!(normalized.data()[3], 1000);
        assert_eq!(normalized.data()[5], 97);
    }

    #[test]
    fn constant_volume() {
        let volume = ScalarVolume::new(vector![1, 2, 1], vector![1.0, 1.0, 1.0], vec![-7, -7]);
        let normalized = NormalizedVolume::from_scalar(&volume).unwrap();

        assert_eq!(normalized.range_max(), 0);
        assert!(normalized.data().iter().all(|&s| s == 0));
    }

    #[test]
    fn invalid_volumes() {
        let zero_extent = ScalarVolume::new(vector![0, 2, 2], vector![1.0, 1.0, 1.0], vec![]);
        assert!(matches!(
            NormalizedVolume::from_scalar(&zero_extent),
            Err(RenderError::InvalidVolume(_))
        ));

        let empty = ScalarVolume::new(vector![2, 2, 2], vector![1.0, 1.0, 1.0], vec![]);
        assert!(matches!(
            NormalizedVolume::from_scalar(&empty),
            Err(RenderError::InvalidVolume(_))
        ));

        let short = ScalarVolume::new(vector![2, 2, 2], vector![1.0, 1.0, 1.0], vec![1, 2, 3]);
        assert!(matches!(
            NormalizedVolume::from_scalar(&short),
            Err(RenderError::InvalidVolume(_))
        ));
    }

    #[test]
    fn trilinear_sampling() {
        // value grows by 10 with every x step
        let volume = ramp_volume(vector![4, 3, 3]);

        let exact = volume.sample_at(point![2.0, 1.0, 1.0]);
        assert!((exact - 20.0).abs() < 1e-4);

        let between = volume.sample_at(point![1.25, 0.5, 1.7]);
        assert!((between - 12.5).abs() < 1e-4);

        // clamped outside
        let outside = volume.sample_at(point![10.0, 1.0, 1.0]);
        assert!((outside - 30.0).abs() < 1e-4);
    }

    #[test]
    fn nearest_voxel() {
        let volume = ramp_volume(vector![4, 3, 3]);
        let offset = volume.nearest_offset(point![1.6, 0.2, 2.4]);
        assert_eq!(offset, volume.index(2, 0, 2));
    }
}
