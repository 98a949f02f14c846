//! Kernels of the two viewpoint information passes.
//!
//! Both leave the color untouched, they only measure how much of the volume
//! is seen from the current viewpoint.

use log::warn;

use crate::{
    accumulator::{Accumulator, WorkerSlot},
    color::RGBA,
};

use super::{Sample, ShaderKind, ShadingContext, VoxelShader, WorkerScratch};

/// Visible contribution of a sample, its opacity weighted by what is left of the ray
fn visibility(sample: &Sample, color: &RGBA) -> f32 {
    sample.transparency * color.w
}

/// First pass, total projected volume seen from the viewpoint.
#[derive(Debug, Default)]
pub struct VmiFirstPassShader {
    accumulator: Accumulator<f32>,
}

impl VmiFirstPassShader {
    pub fn new() -> VmiFirstPassShader {
        VmiFirstPassShader::default()
    }

    /// Forget contributions of previous passes
    pub fn init_accumulator(&self) {
        self.accumulator.reset();
    }

    pub fn accumulator(&self) -> &Accumulator<f32> {
        &self.accumulator
    }
}

impl VoxelShader for VmiFirstPassShader {
    fn kind(&self) -> ShaderKind {
        ShaderKind::VmiFirstPass
    }

    /// Only the workers of the latest traversal count
    fn begin_traversal(&self) {
        self.accumulator.reset();
    }

    fn shade(&self, sample: &Sample, color: RGBA, _: &ShadingContext<'_>, scratch: &mut WorkerScratch) -> RGBA {
        scratch.viewed_volume += visibility(sample, &color);
        color
    }

    fn finish_worker(&self, slot: WorkerSlot, scratch: &mut WorkerScratch) {
        self.accumulator.contribute(slot, scratch.viewed_volume);
    }
}

/// Second pass, distribution of the seen volume over voxels.
#[derive(Debug)]
pub struct VmiSecondPassShader {
    data_size: usize,
    object_volumes: Accumulator<Vec<f32>>,
    viewed_volume: Accumulator<f32>,
}

impl VmiSecondPassShader {
    pub fn new(data_size: usize) -> VmiSecondPassShader {
        VmiSecondPassShader {
            data_size,
            object_volumes: Accumulator::new(),
            viewed_volume: Accumulator::new(),
        }
    }

    /// `p(o|v)` for every voxel of the last traversal
    pub fn object_probabilities(&self) -> Vec<f32> {
        let mut volumes = self.object_volumes.total();
        volumes.resize(self.data_size, 0.0);

        let viewed = self.viewed_volume();
        if viewed > 0.0 {
            volumes.iter_mut().for_each(|v| *v /= viewed);
        } else {
            warn!("Nothing was seen in second pass, probabilities are zero");
        }
        volumes
    }

    /// Total volume seen in the last traversal
    pub fn viewed_volume(&self) -> f32 {
        self.viewed_volume.total()
    }
}

impl VoxelShader for VmiSecondPassShader {
    fn kind(&self) -> ShaderKind {
        ShaderKind::VmiSecondPass
    }

    fn shade(&self, sample: &Sample, color: RGBA, _: &ShadingContext<'_>, scratch: &mut WorkerScratch) -> RGBA {
        if scratch.object_volumes.len() != self.data_size {
            scratch.object_volumes.resize(self.data_size, 0.0);
        }
        let seen = visibility(sample, &color);
        scratch.object_volumes[sample.offset] += seen;
        scratch.viewed_volume += seen;
        color
    }

    fn begin_traversal(&self) {
        self.object_volumes.reset();
        self.viewed_volume.reset();
    }

    fn finish_worker(&self, slot: WorkerSlot, scratch: &mut WorkerScratch) {
        self.object_volumes
            .contribute(slot, std::mem::take(&mut scratch.object_volumes));
        self.viewed_volume.contribute(slot, scratch.viewed_volume);
    }
}
