use crate::{
    color::{self, RGBA},
    gradient::GradientKind,
};

use super::{Sample, ShaderKind, ShadingContext, VoxelShader, WorkerScratch};

/// Darkens silhouettes, samples whose normal is nearly perpendicular to the view direction.
#[derive(Debug)]
pub struct ContourShader {
    threshold: f32,
    gradient: GradientKind,
}

impl Default for ContourShader {
    fn default() -> Self {
        ContourShader::new()
    }
}

impl ContourShader {
    pub fn new() -> ContourShader {
        ContourShader {
            threshold: 0.0,
            gradient: GradientKind::default(),
        }
    }

    /// Samples with `|normal · view| < threshold` are painted black
    pub fn set_threshold(&mut self, threshold: f32) {
        self.threshold = threshold;
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    pub fn set_gradient_estimator(&mut self, kind: GradientKind) {
        self.gradient = kind;
    }

    pub fn gradient_estimator(&self) -> GradientKind {
        self.gradient
    }
}

impl VoxelShader for ContourShader {
    fn kind(&self) -> ShaderKind {
        ShaderKind::Contour
    }

    fn shade(&self, sample: &Sample, color: RGBA, ctx: &ShadingContext<'_>, _: &mut WorkerScratch) -> RGBA {
        let normal = match ctx.normal_at(self.gradient, sample.offset) {
            Some(n) => n,
            None => return color,
        };
        // flat region has no silhouette
        if normal.norm_squared() == 0.0 {
            return color;
        }

        if normal.dot(&ctx.view_dir).abs() < self.threshold {
            color::new(0.0, 0.0, 0.0, color.w)
        } else {
            color
        }
    }
}
