//! Gradient estimation and normal encoding.
//!
//! [`GradientEstimators`] keeps at most one estimator per kind group,
//! the two regression radii share a single [`LinearRegression`] instance.

mod encoding;
mod finite_difference;
mod regression;
mod shading_tables;

use std::{fmt::Display, str::FromStr};

use log::debug;
use nalgebra::Vector3;
use rayon::prelude::*;

pub use encoding::{EncodedNormals, NormalEncoder, ENCODED_NORMAL_COUNT, ZERO_NORMAL};
pub use finite_difference::FiniteDifference;
pub use regression::LinearRegression;
pub use shading_tables::ShadingTables;

use crate::{volumetric::NormalizedVolume, RenderError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GradientKind {
    FiniteDifference,
    RegressionRadius1,
    RegressionRadius2,
}

impl GradientKind {
    /// Regression kind with neighbourhood `radius`
    pub fn regression(radius: u8) -> Result<GradientKind, RenderError> {
        match radius {
            1 => Ok(GradientKind::RegressionRadius1),
            2 => Ok(GradientKind::RegressionRadius2),
            r => Err(RenderError::UnsupportedGradientKind(format!(
                "regression radius {r}"
            ))),
        }
    }

    /// Neighbourhood radius, `None` for finite differences
    pub fn radius(&self) -> Option<u8> {
        match self {
            GradientKind::FiniteDifference => None,
            GradientKind::RegressionRadius1 => Some(1),
            GradientKind::RegressionRadius2 => Some(2),
        }
    }
}

impl Default for GradientKind {
    fn default() -> Self {
        GradientKind::FiniteDifference
    }
}

impl Display for GradientKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            GradientKind::FiniteDifference => "finite-difference",
            GradientKind::RegressionRadius1 => "regression-1",
            GradientKind::RegressionRadius2 => "regression-2",
        };
        write!(f, "{name}")
    }
}

impl FromStr for GradientKind {
    type Err = RenderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "finite-difference" | "fd" => Ok(GradientKind::FiniteDifference),
            "regression-1" => Ok(GradientKind::RegressionRadius1),
            "regression-2" => Ok(GradientKind::RegressionRadius2),
            other => Err(RenderError::UnsupportedGradientKind(other.to_string())),
        }
    }
}

/// One slot per estimator kind group, filled on first use.
#[derive(Debug, Default)]
pub struct GradientEstimators {
    finite_difference: Option<FiniteDifference>,
    regression: Option<LinearRegression>,
    current: GradientKind,
    encoder: NormalEncoder,
}

impl GradientEstimators {
    pub fn new() -> GradientEstimators {
        GradientEstimators::default()
    }

    /// Make `kind` the current estimator, bound to `volume`
    pub fn select(&mut self, kind: GradientKind, volume: &NormalizedVolume) {
        match kind.radius() {
            None => {
                let estimator = self.finite_difference.get_or_insert_with(|| {
                    debug!("Creating finite difference estimator");
                    FiniteDifference::new()
                });
                estimator.bind(volume, &self.encoder);
            }
            Some(radius) => {
                let estimator = self.regression.get_or_insert_with(|| {
                    debug!("Creating regression estimator, radius {radius}");
                    LinearRegression::new(radius)
                });
                estimator.set_radius(radius);
                estimator.bind(volume, &self.encoder);
            }
        }
        self.current = kind;
    }

    /// Kind of the current estimator
    pub fn current(&self) -> GradientKind {
        self.current
    }

    /// Normals of the current estimator
    pub fn current_normals(&self) -> Option<&EncodedNormals> {
        self.normals(self.current)
    }

    /// Normals of `kind`, if that kind was ever selected
    pub fn normals(&self, kind: GradientKind) -> Option<&EncodedNormals> {
        match kind.radius() {
            None => self.finite_difference.as_ref()?.normals(),
            Some(radius) => self.regression.as_ref()?.normals_for(radius),
        }
    }

    pub fn finite_difference(&self) -> Option<&FiniteDifference> {
        self.finite_difference.as_ref()
    }

    pub fn regression(&self) -> Option<&LinearRegression> {
        self.regression.as_ref()
    }

    pub fn encoder(&self) -> &NormalEncoder {
        &self.encoder
    }
}

/// Estimate gradient of every voxel, store encoded normal `-g/|g|` and `|g|`.
/// Runs in parallel over x slabs.
pub(crate) fn encode_volume<F>(volume: &NormalizedVolume, encoder: &NormalEncoder, gradient: F) -> EncodedNormals
where
    F: Fn(usize, usize, usize) -> Vector3<f32> + Sync,
{
    let size = volume.size();
    let slab = size.y * size.z;
    let mut indices = vec![0u16; volume.len()];
    let mut magnitudes = vec![0.0f32; volume.len()];

    indices
        .par_chunks_mut(slab)
        .zip(magnitudes.par_chunks_mut(slab))
        .enumerate()
        .for_each(|(x, (indices, magnitudes))| {
            for y in 0..size.y {
                for z in 0..size.z {
                    let g = gradient(x, y, z);
                    let i = z + y * size.z;
                    magnitudes[i] = g.norm();
                    indices[i] = encoder.encode(-g);
                }
            }
        });

    EncodedNormals {
        indices,
        magnitudes,
    }
}
