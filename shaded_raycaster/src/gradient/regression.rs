use std::collections::HashMap;

use log::debug;
use nalgebra::{vector, Vector3};

use crate::volumetric::NormalizedVolume;

use super::{encode_volume, EncodedNormals, NormalEncoder};

/// Neighbour of the regression stencil
#[derive(Debug, Clone, Copy)]
struct Tap {
    offset: Vector3<isize>,
    /// weight times world offset
    weighted: Vector3<f32>,
}

/// Weighted linear regression of the samples in a cubic neighbourhood.
///
/// The fitted hyperplane `f = a + g·d` gives the gradient `g`.
/// Neighbours are weighted by inverse distance.
/// One instance serves every radius, normals are cached per radius.
#[derive(Debug)]
pub struct LinearRegression {
    radius: u8,
    cache: HashMap<u8, EncodedNormals>,
}

impl LinearRegression {
    pub fn new(radius: u8) -> LinearRegression {
        LinearRegression {
            radius,
            cache: HashMap::new(),
        }
    }

    pub fn radius(&self) -> u8 {
        self.radius
    }

    /// Change neighbourhood radius, caches of other radii are kept
    pub fn set_radius(&mut self, radius: u8) {
        if radius != self.radius {
            debug!("Regression radius {} -> {}", self.radius, radius);
            self.radius = radius;
        }
    }

    /// Compute normals for the current radius unless cached
    pub fn bind(&mut self, volume: &NormalizedVolume, encoder: &NormalEncoder) {
        let radius = self.radius;
        if self.cache.contains_key(&radius) {
            return;
        }
        debug!("Computing regression normals, radius {radius}");

        let stencil = Stencil::new(radius, volume.spacing());
        let normals = encode_volume(volume, encoder, |x, y, z| stencil.gradient(volume, x, y, z));
        self.cache.insert(radius, normals);
    }

    /// Normals of the current radius
    pub fn normals(&self) -> Option<&EncodedNormals> {
        self.cache.get(&self.radius)
    }

    pub fn normals_for(&self, radius: u8) -> Option<&EncodedNormals> {
        self.cache.get(&radius)
    }

    /// Radii with computed normals
    pub fn cached_radii(&self) -> Vec<u8> {
        let mut radii: Vec<_> = self.cache.keys().copied().collect();
        radii.sort_unstable();
        radii
    }
}

struct Stencil {
    taps: Vec<Tap>,
    /// `sum(w * d_a^2)` per axis
    denominator: Vector3<f32>,
}

impl Stencil {
    fn new(radius: u8, spacing: Vector3<f32>) -> Stencil {
        let r = radius as isize;
        let mut taps = Vec::new();
        let mut denominator = Vector3::zeros();

        for dx in -r..=r {
            for dy in -r..=r {
                for dz in -r..=r {
                    if dx == 0 && dy == 0 && dz == 0 {
                        continue;
                    }
                    let offset = vector![dx, dy, dz];
                    let world = offset.map(|v| v as f32).component_mul(&spacing);
                    let weight = 1.0 / world.norm();

                    denominator += weight * world.component_mul(&world);
                    taps.push(Tap {
                        offset,
                        weighted: weight * world,
                    });
                }
            }
        }

        Stencil { taps, denominator }
    }

    fn gradient(&self, volume: &NormalizedVolume, x: usize, y: usize, z: usize) -> Vector3<f32> {
        let center = vector![x as isize, y as isize, z as isize];
        let numerator: Vector3<f32> = self
            .taps
            .iter()
            .map(|tap| {
                let p = center + tap.offset;
                volume.get_clamped(p.x, p.y, p.z) as f32 * tap.weighted
            })
            .sum();
        numerator.component_div(&self.denominator)
    }
}

#[cfg(test)]
mod test {
    use nalgebra::vector;

    use super::*;
    use crate::test_helpers::ramp_volume;

    #[test]
    fn linear_field_is_exact_inside() {
        let volume = ramp_volume(vector![7, 5, 5]);
        for radius in [1, 2] {
            let stencil = Stencil::new(radius, volume.spacing());
            let g = stencil.gradient(&volume, 3, 2, 2);
            assert!((g - vector![10.0, 0.0, 0.0]).norm() < 1e-3, "radius {radius}: {g:?}");
        }
    }

    #[test]
    fn radius_change_keeps_cache() {
        let volume = ramp_volume(vector![4, 4, 4]);
        let encoder = NormalEncoder::new();
        let mut estimator = LinearRegression::new(1);

        estimator.bind(&volume, &encoder);
        estimator.set_radius(2);
        assert!(estimator.normals().is_none());
        estimator.bind(&volume, &encoder);

        assert_eq!(estimator.radius(), 2);
        assert_eq!(estimator.cached_radii(), vec![1, 2]);
        assert!(estimator.normals_for(1).is_some());
    }
}
