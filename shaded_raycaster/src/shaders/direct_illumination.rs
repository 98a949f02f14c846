use nalgebra::vector;

use crate::{
    color::{self, RGBA},
    gradient::{GradientKind, ShadingTables},
};

use super::{Sample, ShaderKind, ShadingContext, VoxelShader, WorkerScratch};

/// Transfer function color lit by the precomputed shading tables.
///
/// `rgb * (ambient + diffuse[n]) + specular[n]`
#[derive(Debug)]
pub struct DirectIlluminationShader {
    tables: ShadingTables,
    ambient: f32,
    gradient: GradientKind,
}

impl DirectIlluminationShader {
    pub fn new(tables: ShadingTables) -> DirectIlluminationShader {
        DirectIlluminationShader {
            tables,
            ambient: 0.1,
            gradient: GradientKind::default(),
        }
    }

    pub fn set_shading_tables(&mut self, tables: ShadingTables) {
        self.tables = tables;
    }

    pub fn shading_tables(&self) -> &ShadingTables {
        &self.tables
    }

    pub fn set_ambient(&mut self, ambient: f32) {
        self.ambient = ambient;
    }

    /// Estimator whose normals index the tables
    pub fn set_gradient_estimator(&mut self, kind: GradientKind) {
        self.gradient = kind;
    }
}

impl VoxelShader for DirectIlluminationShader {
    fn kind(&self) -> ShaderKind {
        ShaderKind::DirectIllumination
    }

    fn shade(&self, sample: &Sample, _: RGBA, ctx: &ShadingContext<'_>, _: &mut WorkerScratch) -> RGBA {
        let base = sample.classified;
        if base.w == 0.0 {
            return base;
        }

        let normals = match ctx.normals(self.gradient) {
            Some(n) => n,
            None => return base,
        };
        let n = normals.indices[sample.offset];

        let diffuse = self.ambient + self.tables.diffuse(n);
        let specular = self.tables.specular(n);
        let rgb = base.xyz() * diffuse + vector![specular, specular, specular];

        color::with_rgb(base, rgb)
    }
}

#[cfg(test)]
mod test {
    use nalgebra::vector;

    use super::*;
    use crate::{
        gradient::{GradientEstimators, NormalEncoder},
        test_helpers,
    };

    #[test]
    fn lit_by_tables() {
        let volume = test_helpers::ramp_volume(vector![4, 3, 3]);
        let mut gradients = GradientEstimators::new();
        gradients.select(GradientKind::FiniteDifference, &volume);
        let table = test_helpers::opaque_white_tf().classification_table(volume.range_max());

        let encoder = NormalEncoder::new();
        let mut tables = ShadingTables::unlit(&encoder);
        tables.diffuse.iter_mut().for_each(|d| *d = 0.5);
        tables.specular.iter_mut().for_each(|s| *s = 0.25);
        let shader = DirectIlluminationShader::new(tables);

        let ctx = ShadingContext {
            volume: &volume,
            table: &table,
            gradients: &gradients,
            view_dir: vector![1.0, 0.0, 0.0],
        };
        let sample = Sample {
            position: nalgebra::point![1.0, 1.0, 1.0],
            value: 10.0,
            offset: volume.index(1, 1, 1),
            classified: color::mono(1.0, 1.0),
            transparency: 1.0,
        };
        let out = shader.shade(&sample, color::zero(), &ctx, &mut WorkerScratch::default());

        // white * (0.1 + 0.5) + 0.25
        assert!((out.x - 0.85).abs() < 1e-5);
        assert_eq!(out.w, 1.0);
    }
}
