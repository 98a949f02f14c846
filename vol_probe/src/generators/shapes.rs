use std::ops::RangeBounds;

use nalgebra::{vector, Vector3};

use crate::config::{GenerateConfig, GeneratorConfig};

use super::SampleGenerator;

/// Generate volume with a number of randomly placed shapes
pub struct ShapesGenerator {
    shapes: Vec<ShapeInfo>,
    background: i16,
}

impl ShapesGenerator {
    pub fn from_config(config: &GenerateConfig) -> ShapesGenerator {
        let (n_of_shapes, sample, obj_size) = match config.generator {
            GeneratorConfig::Shapes {
                n_of_shapes,
                sample,
                obj_size,
            } => (n_of_shapes, sample, obj_size),
            _ => (0, config.background, 1),
        };

        // objects never outgrow the volume
        let side = obj_size.min(config.dims.min());
        let size = vector![side, side, side];
        let variance = size / 5;

        let random_shape_gen = ShapeInfoGenerator::new(
            config.dims,
            size,
            variance,
            sample,
            sample / 20,
            config.seed,
        );
        let shapes = random_shape_gen.get_shapes(n_of_shapes);
        ShapesGenerator {
            shapes,
            background: config.background,
        }
    }
}

impl SampleGenerator for ShapesGenerator {
    fn sample_at(&self, coords: Vector3<u32>) -> i16 {
        // first shape containing the voxel wins
        self.shapes
            .iter()
            .find_map(|shape| shape.sample_at(coords))
            .unwrap_or(self.background)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeType {
    Cuboid,
    Sphere,
}

/// One shape in volume, `position_high` exclusive
#[derive(Debug)]
pub struct ShapeInfo {
    pub position_low: Vector3<u32>,
    pub position_high: Vector3<u32>,
    pub shape_type: ShapeType,
    pub sample: i16,
}

impl ShapeInfo {
    fn contains(&self, coords: Vector3<u32>) -> bool {
        coords
            .iter()
            .zip(self.position_low.iter().zip(self.position_high.iter()))
            .all(|(c, (lo, hi))| lo <= c && c < hi)
    }

    fn sample_at(&self, coords: Vector3<u32>) -> Option<i16> {
        if !self.contains(coords) {
            return None;
        }
        match self.shape_type {
            ShapeType::Cuboid => Some(self.sample),
            ShapeType::Sphere => self.sphere_at(coords),
        }
    }

    fn sphere_at(&self, coords: Vector3<u32>) -> Option<i16> {
        let low = self.position_low.cast::<f32>();
        let high = self.position_high.cast::<f32>();
        let center = (low + high - vector![1.0, 1.0, 1.0]) / 2.0;
        let r = (high.x - low.x) / 2.0;

        if (coords.cast::<f32>() - center).magnitude() <= r {
            Some(self.sample)
        } else {
            None
        }
    }
}

/// Generate shapes
/// Helper type
pub struct ShapeInfoGenerator {
    rng: fastrand::Rng,
    vol_dims: Vector3<u32>,
    size: Vector3<u32>,
    size_variance: Vector3<u32>,
    sample: i16,
    sample_variance: i16,
}

impl ShapeInfoGenerator {
    pub fn new(
        vol_dims: Vector3<u32>,
        size: Vector3<u32>,
        size_variance: Vector3<u32>,
        sample: i16,
        sample_variance: i16,
        seed: Option<u64>,
    ) -> Self {
        let rng = match seed {
            Some(seed) => fastrand::Rng::with_seed(seed),
            None => fastrand::Rng::new(),
        };

        Self {
            rng,
            vol_dims,
            size,
            size_variance,
            sample,
            sample_variance: sample_variance.abs(),
        }
    }

    fn random_shape(&self) -> ShapeType {
        if self.rng.bool() {
            ShapeType::Cuboid
        } else {
            ShapeType::Sphere
        }
    }

    fn random_vector<R>(&self, ranges: Vector3<R>) -> Vector3<u32>
    where
        R: RangeBounds<u32> + Clone,
    {
        vector![
            self.rng.u32(ranges[0].clone()),
            self.rng.u32(ranges[1].clone()),
            self.rng.u32(ranges[2].clone())
        ]
    }

    pub fn get_shapes(&self, n: usize) -> Vec<ShapeInfo> {
        (0..n).map(|_| self.get_shape()).collect()
    }

    pub fn get_shape(&self) -> ShapeInfo {
        let shape_type = self.random_shape();

        let size_min = self.size.zip_map(&self.size_variance, |s, v| s.saturating_sub(v).max(1));
        let size_max = self.size + self.size_variance;
        let size_max = size_max.zip_map(&self.vol_dims, u32::min);

        let size_ranges = size_min.zip_map(&size_max, |lo, hi| lo.min(hi)..=hi);
        let mut size = self.random_vector(size_ranges);
        if shape_type == ShapeType::Sphere {
            let side = size.min();
            size = vector![side, side, side];
        }

        // Spawn shape in positions it fits
        let pos_ranges = self.vol_dims.zip_map(&size, |dim, s| 0..=(dim - s));
        let position_low = self.random_vector(pos_ranges);

        ShapeInfo {
            position_low,
            position_high: position_low + size,
            shape_type,
            sample: self.random_sample(),
        }
    }

    fn random_sample(&self) -> i16 {
        let low = self.sample.saturating_sub(self.sample_variance);
        let high = self.sample.saturating_add(self.sample_variance);
        self.rng.i16(low..=high)
    }
}
