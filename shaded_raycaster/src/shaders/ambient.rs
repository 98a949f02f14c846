use crate::color::RGBA;

use super::{Sample, ShaderKind, ShadingContext, VoxelShader, WorkerScratch};

/// Unlit transfer function color.
#[derive(Debug, Default)]
pub struct AmbientShader;

impl AmbientShader {
    pub fn new() -> AmbientShader {
        AmbientShader
    }
}

impl VoxelShader for AmbientShader {
    fn kind(&self) -> ShaderKind {
        ShaderKind::Ambient
    }

    fn shade(&self, sample: &Sample, _: RGBA, _: &ShadingContext<'_>, _: &mut WorkerScratch) -> RGBA {
        sample.classified
    }
}
