use crate::{
    color::{self, RGBA},
    gradient::GradientKind,
};

use super::{Sample, ShaderKind, ShadingContext, VoxelShader, WorkerScratch};

/// Paints voxels by their mutual information with the viewpoints (VoMI).
///
/// High VoMI is dark. Combined with other kernels it only darkens their output,
/// alone it produces gray headlight shading.
#[derive(Debug)]
pub struct VomiShader {
    vomi: Vec<f32>,
    max: f32,
    factor: f32,
    combine: bool,
    gradient: GradientKind,
}

impl Default for VomiShader {
    fn default() -> Self {
        VomiShader::new()
    }
}

impl VomiShader {
    pub fn new() -> VomiShader {
        VomiShader {
            vomi: Vec::new(),
            max: 1.0,
            factor: 1.0,
            combine: false,
            gradient: GradientKind::default(),
        }
    }

    pub fn set_vomi(&mut self, vomi: Vec<f32>, max: f32, factor: f32) {
        self.vomi = vomi;
        self.max = max;
        self.factor = factor;
    }

    pub fn set_combine(&mut self, combine: bool) {
        self.combine = combine;
    }

    pub fn combine(&self) -> bool {
        self.combine
    }

    pub fn set_gradient_estimator(&mut self, kind: GradientKind) {
        self.gradient = kind;
    }

    fn gray(&self, offset: usize) -> f32 {
        let vomi = self.vomi.get(offset).copied().unwrap_or(0.0);
        if self.max <= 0.0 {
            return 1.0;
        }
        1.0 - (self.factor * vomi / self.max).clamp(0.0, 1.0)
    }
}

impl VoxelShader for VomiShader {
    fn kind(&self) -> ShaderKind {
        ShaderKind::VisibilityMap
    }

    fn shade(&self, sample: &Sample, color: RGBA, ctx: &ShadingContext<'_>, _: &mut WorkerScratch) -> RGBA {
        if color.w == 0.0 {
            return color;
        }
        let gray = self.gray(sample.offset);

        if self.combine {
            color::with_rgb(color, color.xyz() * gray)
        } else {
            let v = gray * ctx.headlight(self.gradient, sample.offset);
            color::mono(v, color.w)
        }
    }
}

#[cfg(test)]
mod test {
    use nalgebra::{point, vector};

    use super::*;
    use crate::{gradient::GradientEstimators, test_helpers};

    #[test]
    fn high_vomi_is_dark() {
        let volume = test_helpers::ramp_volume(vector![2, 2, 1]);
        let table = test_helpers::opaque_white_tf().classification_table(volume.range_max());
        let gradients = GradientEstimators::new();
        let ctx = ShadingContext {
            volume: &volume,
            table: &table,
            gradients: &gradients,
            view_dir: vector![1.0, 0.0, 0.0],
        };
        let sample = |offset| Sample {
            position: point![0.0, 0.0, 0.0],
            value: 0.0,
            offset,
            classified: color::mono(1.0, 1.0),
            transparency: 1.0,
        };

        let mut shader = VomiShader::new();
        shader.set_vomi(vec![0.0, 1.0, 2.0, 4.0], 4.0, 2.0);

        let red = color::new(1.0, 0.0, 0.0, 0.5);
        let mut scratch = WorkerScratch::default();
        // no normals known, full headlight
        assert_eq!(shader.shade(&sample(0), red, &ctx, &mut scratch), color::mono(1.0, 0.5));
        assert_eq!(shader.shade(&sample(1), red, &ctx, &mut scratch), color::mono(0.5, 0.5));
        assert_eq!(shader.shade(&sample(3), red, &ctx, &mut scratch), color::mono(0.0, 0.5));

        shader.set_combine(true);
        let combined = shader.shade(&sample(1), red, &ctx, &mut scratch);
        assert_eq!(combined, color::new(0.5, 0.0, 0.0, 0.5));
    }
}
