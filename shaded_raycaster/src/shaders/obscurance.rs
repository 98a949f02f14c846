use std::sync::Arc;

use nalgebra::Vector3;

use crate::color::{self, RGBA};

use super::{Sample, ShaderKind, ShadingContext, VoxelShader, WorkerScratch};

/// Precomputed per-voxel obscurance, optionally with bled color.
#[derive(Debug, Clone, PartialEq)]
pub struct Obscurance {
    values: Vec<f32>,
    colors: Option<Vec<Vector3<f32>>>,
}

impl Obscurance {
    /// Plain obscurance, values in `<0;1>`
    pub fn new(values: Vec<f32>) -> Obscurance {
        Obscurance {
            values,
            colors: None,
        }
    }

    /// Color bleeding, one color per voxel
    pub fn with_colors(colors: Vec<Vector3<f32>>) -> Obscurance {
        let values = colors.iter().map(|c| c.max()).collect();
        Obscurance {
            values,
            colors: Some(colors),
        }
    }

    pub fn has_color(&self) -> bool {
        self.colors.is_some()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn value(&self, offset: usize) -> f32 {
        self.values[offset]
    }

    pub fn color(&self, offset: usize) -> Option<Vector3<f32>> {
        self.colors.as_ref().map(|c| c[offset])
    }
}

/// Scales color by filtered obscurance.
#[derive(Debug)]
pub struct ObscuranceShader {
    obscurance: Option<Arc<Obscurance>>,
    factor: f32,
    low: f32,
    high: f32,
}

impl Default for ObscuranceShader {
    fn default() -> Self {
        ObscuranceShader::new()
    }
}

impl ObscuranceShader {
    pub fn new() -> ObscuranceShader {
        ObscuranceShader {
            obscurance: None,
            factor: 1.0,
            low: 0.0,
            high: 1.0,
        }
    }

    pub fn set_obscurance(&mut self, obscurance: Arc<Obscurance>) {
        self.obscurance = Some(obscurance);
    }

    pub fn set_factor(&mut self, factor: f32) {
        self.factor = factor;
    }

    /// Values below `low` count as fully obscured, above `high` as fully lit
    pub fn set_filters(&mut self, low: f32, high: f32) {
        self.low = low;
        self.high = high;
    }

    fn filter(&self, value: f32) -> f32 {
        if value < self.low {
            0.0
        } else if value > self.high {
            1.0
        } else if self.high > self.low {
            (value - self.low) / (self.high - self.low)
        } else {
            1.0
        }
    }
}

impl VoxelShader for ObscuranceShader {
    fn kind(&self) -> ShaderKind {
        ShaderKind::Obscurance
    }

    fn shade(&self, sample: &Sample, color: RGBA, _: &ShadingContext<'_>, _: &mut WorkerScratch) -> RGBA {
        let obscurance = match &self.obscurance {
            Some(o) => o,
            None => return color,
        };
        let scale = self.factor * self.filter(obscurance.value(sample.offset));
        color::with_rgb(color, color.xyz() * scale)
    }
}

/// Tints color by the bled color of the obscurance source.
#[derive(Debug)]
pub struct ColorBleedingShader {
    source: Option<Arc<Obscurance>>,
    factor: f32,
}

impl Default for ColorBleedingShader {
    fn default() -> Self {
        ColorBleedingShader::new()
    }
}

impl ColorBleedingShader {
    pub fn new() -> ColorBleedingShader {
        ColorBleedingShader {
            source: None,
            factor: 1.0,
        }
    }

    pub fn set_color_bleeding(&mut self, source: Arc<Obscurance>) {
        self.source = Some(source);
    }

    pub fn set_factor(&mut self, factor: f32) {
        self.factor = factor;
    }
}

impl VoxelShader for ColorBleedingShader {
    fn kind(&self) -> ShaderKind {
        ShaderKind::ColorBleeding
    }

    fn shade(&self, sample: &Sample, color: RGBA, _: &ShadingContext<'_>, _: &mut WorkerScratch) -> RGBA {
        let bleed = match self.source.as_ref().and_then(|s| s.color(sample.offset)) {
            Some(c) => c,
            None => return color,
        };
        let rgb = color.xyz().component_mul(&(bleed * self.factor));
        color::with_rgb(color, rgb)
    }
}

#[cfg(test)]
mod test {
    use nalgebra::{point, vector};

    use super::*;
    use crate::{gradient::GradientEstimators, test_helpers};

    fn shade_at<S: VoxelShader>(shader: &S, offset: usize, color: RGBA) -> RGBA {
        let volume = test_helpers::ramp_volume(vector![2, 2, 1]);
        let table = test_helpers::opaque_white_tf().classification_table(volume.range_max());
        let gradients = GradientEstimators::new();
        let ctx = ShadingContext {
            volume: &volume,
            table: &table,
            gradients: &gradients,
            view_dir: vector![1.0, 0.0, 0.0],
        };
        let sample = Sample {
            position: point![0.0, 0.0, 0.0],
            value: 0.0,
            offset,
            classified: color::mono(1.0, 1.0),
            transparency: 1.0,
        };
        shader.shade(&sample, color, &ctx, &mut WorkerScratch::default())
    }

    #[test]
    fn obscurance_filters() {
        let mut shader = ObscuranceShader::new();
        shader.set_obscurance(Arc::new(Obscurance::new(vec![0.1, 0.5, 0.9, 0.3])));
        shader.set_filters(0.2, 0.8);
        shader.set_factor(2.0);

        let white = color::mono(1.0, 0.5);
        assert_eq!(shade_at(&shader, 0, white), color::new(0.0, 0.0, 0.0, 0.5));
        assert!((shade_at(&shader, 1, white).x - 1.0).abs() < 1e-5);
        assert_eq!(shade_at(&shader, 2, white), color::new(2.0, 2.0, 2.0, 0.5));
    }

    #[test]
    fn color_bleeding_tints() {
        let mut shader = ColorBleedingShader::new();
        let colors = vec![vector![1.0, 0.5, 0.0]; 4];
        let source = Obscurance::with_colors(colors);
        assert!(source.has_color());
        shader.set_color_bleeding(Arc::new(source));

        let out = shade_at(&shader, 3, color::mono(0.8, 1.0));
        assert!((out - color::new(0.8, 0.4, 0.0, 1.0)).norm() < 1e-6);
    }
}
