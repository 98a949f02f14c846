use nalgebra::{vector, Vector2};

use crate::RenderError;

/// Default distance between samples, in world units
pub const DEFAULT_RAY_STEP: f32 = 0.5;

/// Parameters of a traversal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderOptions {
    pub resolution: Vector2<u16>,
    pub early_ray_termination: bool,
    pub ray_step: f32,
    pub workers: usize,
}

impl RenderOptions {
    pub fn builder() -> RenderOptionsBuilder {
        RenderOptionsBuilder::new()
    }

    /// Number of bytes of the RGB output buffer
    pub fn buffer_len(&self) -> usize {
        self.resolution.x as usize * self.resolution.y as usize * 3
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        RenderOptions {
            resolution: vector![512, 512],
            early_ray_termination: true,
            ray_step: DEFAULT_RAY_STEP,
            workers: default_workers(),
        }
    }
}

fn default_workers() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(4)
}

#[derive(Debug, Default)]
pub struct RenderOptionsBuilder {
    resolution: Option<Vector2<u16>>,
    early_ray_termination: Option<bool>,
    ray_step: Option<f32>,
    workers: Option<usize>,
}

impl RenderOptionsBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn resolution(mut self, resolution: Vector2<u16>) -> Self {
        self.resolution = Some(resolution);
        self
    }

    pub fn early_ray_termination(mut self, enable: bool) -> Self {
        self.early_ray_termination = Some(enable);
        self
    }

    pub fn ray_step(mut self, step: f32) -> Self {
        self.ray_step = Some(step);
        self
    }

    pub fn workers(mut self, workers: usize) -> Self {
        self.workers = Some(workers);
        self
    }

    /// Build options, missing fields get defaults.
    /// Fails on zero resolution, zero workers or non-positive step.
    pub fn build(self) -> Result<RenderOptions, RenderError> {
        let options = self.build_unchecked();
        if options.resolution.x == 0 || options.resolution.y == 0 {
            return Err(RenderError::InvalidOptions("resolution must not be zero"));
        }
        if options.workers == 0 {
            return Err(RenderError::InvalidOptions("at least one worker is needed"));
        }
        if options.ray_step.is_nan() || options.ray_step <= 0.0 {
            return Err(RenderError::InvalidOptions("ray step must be positive"));
        }
        Ok(options)
    }

    /// Build options without validation, missing fields get defaults
    pub fn build_unchecked(self) -> RenderOptions {
        let default = RenderOptions::default();
        RenderOptions {
            resolution: self.resolution.unwrap_or(default.resolution),
            early_ray_termination: self
                .early_ray_termination
                .unwrap_or(default.early_ray_termination),
            ray_step: self.ray_step.unwrap_or(default.ray_step),
            workers: self.workers.unwrap_or(default.workers),
        }
    }
}
