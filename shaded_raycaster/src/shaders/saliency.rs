use nalgebra::vector;

use crate::{
    color::{self, RGBA},
    gradient::GradientKind,
};

use super::{Sample, ShaderKind, ShadingContext, VoxelShader, WorkerScratch};

/// Blends transfer function brightness towards red by voxel saliency.
#[derive(Debug)]
pub struct SaliencyShader {
    saliencies: Vec<f32>,
    max: f32,
    factor: f32,
    diffuse_lighting: bool,
    gradient: GradientKind,
}

impl Default for SaliencyShader {
    fn default() -> Self {
        SaliencyShader::new()
    }
}

impl SaliencyShader {
    pub fn new() -> SaliencyShader {
        SaliencyShader {
            saliencies: Vec::new(),
            max: 1.0,
            factor: 1.0,
            diffuse_lighting: false,
            gradient: GradientKind::default(),
        }
    }

    pub fn set_voxel_saliencies(&mut self, saliencies: Vec<f32>, max: f32, factor: f32) {
        self.saliencies = saliencies;
        self.max = max;
        self.factor = factor;
    }

    pub fn set_diffuse_lighting(&mut self, on: bool) {
        self.diffuse_lighting = on;
    }

    pub fn set_gradient_estimator(&mut self, kind: GradientKind) {
        self.gradient = kind;
    }

    /// Saliency of voxel at `offset` scaled into `<0;1>`
    pub fn saliency(&self, offset: usize) -> f32 {
        if self.max <= 0.0 {
            return 0.0;
        }
        let s = self.saliencies.get(offset).copied().unwrap_or(0.0);
        (self.factor * s / self.max).clamp(0.0, 1.0)
    }
}

impl VoxelShader for SaliencyShader {
    fn kind(&self) -> ShaderKind {
        ShaderKind::Saliency
    }

    fn shade(&self, sample: &Sample, color: RGBA, ctx: &ShadingContext<'_>, _: &mut WorkerScratch) -> RGBA {
        if color.w == 0.0 {
            return color;
        }
        let saliency = self.saliency(sample.offset);
        let gray = color::luminance(&color);

        let mut rgb = vector![gray, gray, gray].lerp(&vector![1.0, 0.0, 0.0], saliency);
        if self.diffuse_lighting {
            rgb *= ctx.headlight(self.gradient, sample.offset);
        }
        color::with_rgb(color, rgb)
    }
}
