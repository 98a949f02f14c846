//! Module with helper functions
//! Saves repetition in unit tests, integration tests and benchmarks

use nalgebra::{point, vector, Vector3};

use crate::{
    camera::PerspectiveCamera,
    transfer_function::TransferFunction,
    volumetric::{NormalizedVolume, ScalarVolume},
};

/// Value grows by 10 with every step in x, unit spacing
pub fn ramp_scalar(size: Vector3<usize>) -> ScalarVolume {
    ScalarVolume::from_fn(size, vector![1.0, 1.0, 1.0], |x, _, _| 10 * x as i16)
}

pub fn ramp_volume(size: Vector3<usize>) -> NormalizedVolume {
    NormalizedVolume::from_scalar(&ramp_scalar(size)).unwrap()
}

/// Dense ball in the middle of a `side`^3 cube.
/// Background is `-1000`, ball `1000` fading to `0` at its border.
pub fn sphere_scalar(side: usize) -> ScalarVolume {
    let center = (side - 1) as f32 / 2.0;
    let radius = side as f32 / 3.0;
    ScalarVolume::from_fn(vector![side, side, side], vector![1.0, 1.0, 1.0], |x, y, z| {
        let d = vector![x as f32, y as f32, z as f32] - vector![center, center, center];
        let dist = d.norm();
        if dist > radius {
            -1000
        } else {
            (1000.0 * (1.0 - dist / radius)) as i16
        }
    })
}

/// White everywhere, fully opaque everywhere
pub fn opaque_white_tf() -> TransferFunction {
    TransferFunction::new()
        .with_color(0.0, 1.0, 1.0, 1.0)
        .with_opacity(0.0, 1.0)
}

/// Transparent background of [`sphere_scalar`], semi transparent ball (normalized values)
pub fn sphere_tf() -> TransferFunction {
    TransferFunction::new()
        .with_color(0.0, 0.0, 0.0, 0.0)
        .with_color(1000.0, 1.0, 0.6, 0.3)
        .with_color(2000.0, 1.0, 1.0, 1.0)
        .with_opacity(999.0, 0.0)
        .with_opacity(1001.0, 0.05)
        .with_opacity(2000.0, 0.3)
}

/// Camera looking at the origin from `distance` along the diagonal
pub fn diagonal_camera(distance: f32) -> PerspectiveCamera {
    let d = distance / f32::sqrt(3.0);
    PerspectiveCamera::looking_at(point![d, d, d], point![0.0, 0.0, 0.0])
}
