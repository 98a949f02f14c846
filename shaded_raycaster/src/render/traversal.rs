//! CPU ray casting over the normalized volume.
//!
//! The image is split into square tiles. Workers of a scoped pool take tiles from a channel,
//! march rays front to back and send finished tiles back to the calling thread,
//! which copies them into the output buffer.
//! The traversal returns only after every worker has finished.

use std::ops::Range;

use crossbeam::channel;
use log::{debug, trace};
use nalgebra::{Point3, Vector3};

use crate::{
    accumulator::WorkerSlot,
    camera::PerspectiveCamera,
    color::{self, RGBA},
    common::Ray,
    gradient::GradientEstimators,
    shaders::{Sample, ShadingContext, VoxelShader, VoxelShaderSet, WorkerScratch},
    transfer_function::ClassificationTable,
    volumetric::NormalizedVolume,
    RenderError,
};

use super::{CompositeMethod, InterpolationType, RayCastStrategy, RenderOptions, RenderVolume};

/// Side of a tile in pixels
const TILE_SIDE: usize = 16;

/// Ray stops once accumulated opacity exceeds this
const OPACITY_THRESHOLD: f32 = 0.99;

struct TileTask {
    x: Range<usize>,
    y: Range<usize>,
}

struct TileResult {
    x: Range<usize>,
    y: Range<usize>,
    data: Vec<u8>,
}

/// Everything one traversal reads. Borrowed immutably for the whole pass.
pub(crate) struct Traversal<'a> {
    pub volume: &'a NormalizedVolume,
    pub render_volume: &'a RenderVolume,
    pub shaders: &'a VoxelShaderSet,
    pub gradients: &'a GradientEstimators,
    pub table: &'a ClassificationTable,
    pub options: &'a RenderOptions,
}

impl<'a> Traversal<'a> {
    /// Render into RGB `buffer`, black background
    pub fn run(&self, camera: &PerspectiveCamera, buffer: &mut [u8]) -> Result<(), RenderError> {
        let expected = self.options.buffer_len();
        if buffer.len() != expected {
            return Err(RenderError::BufferSize {
                expected,
                actual: buffer.len(),
            });
        }
        if self.options.ray_step.is_nan() || self.options.ray_step <= 0.0 {
            return Err(RenderError::InvalidOptions("ray step must be positive"));
        }
        buffer.fill(0);

        let width = self.options.resolution.x as usize;
        let height = self.options.resolution.y as usize;

        let mapper = self.render_volume.mapper();
        let chain: Vec<&dyn VoxelShader> = match mapper.strategy() {
            RayCastStrategy::Plain => Vec::new(),
            RayCastStrategy::ShaderComposited => {
                mapper.chain().iter().map(|k| self.shaders.shader(k)).collect()
            }
        };
        for shader in &chain {
            shader.begin_traversal();
        }

        let tile = camera.project_box(self.render_volume.bound_box());
        let (range_x, range_y) = tile.get_pixel_range((width, height));
        let tasks = split_tiles(range_x, range_y);

        let workers = self.options.workers.max(1);
        debug!(
            "Traversal start: {:?}, {} tiles, {} workers",
            mapper.strategy(),
            tasks.len(),
            workers
        );

        let (task_sen, task_rec) = channel::unbounded();
        for task in tasks {
            // receiver is alive
            let _ = task_sen.send(task);
        }
        drop(task_sen);

        let chain = &chain;
        crossbeam::scope(|s| {
            let (result_sen, result_rec) = channel::unbounded::<TileResult>();

            for id in 0..workers {
                let task_rec = task_rec.clone();
                let result_sen = result_sen.clone();
                s.spawn(move |_| {
                    let slot = WorkerSlot(id);
                    let mut scratch = WorkerScratch::default();
                    let mut tiles = 0;

                    for task in task_rec.iter() {
                        let data = self.render_tile(camera, &task, chain, &mut scratch);
                        tiles += 1;
                        if result_sen
                            .send(TileResult {
                                x: task.x,
                                y: task.y,
                                data,
                            })
                            .is_err()
                        {
                            break;
                        }
                    }

                    for shader in chain.iter() {
                        shader.finish_worker(slot, &mut scratch);
                    }
                    trace!("Worker {id} done, {tiles} tiles");
                });
            }
            drop(result_sen);

            for result in result_rec.iter() {
                copy_tile(buffer, width, &result);
            }
        })
        .unwrap_or_else(|panic| std::panic::resume_unwind(panic));

        debug!("Traversal done");
        Ok(())
    }

    fn render_tile(
        &self,
        camera: &PerspectiveCamera,
        task: &TileTask,
        chain: &[&dyn VoxelShader],
        scratch: &mut WorkerScratch,
    ) -> Vec<u8> {
        let width = self.options.resolution.x as f32;
        let height = self.options.resolution.y as f32;
        let mut data = Vec::with_capacity(task.x.len() * task.y.len() * 3);

        for y in task.y.clone() {
            let y_norm = y as f32 / height;
            for x in task.x.clone() {
                let ray = camera.get_ray((x as f32 / width, y_norm));
                let color = self.collect_light(&ray, chain, scratch);

                // expects black background
                data.push(color::to_byte(color.x));
                data.push(color::to_byte(color.y));
                data.push(color::to_byte(color.z));
            }
        }
        data
    }

    /// Front to back compositing along `ray`, returns premultiplied color and opacity
    pub fn collect_light(&self, ray: &Ray, chain: &[&dyn VoxelShader], scratch: &mut WorkerScratch) -> RGBA {
        let mut accum = Vector3::zeros();
        let mut opacity = 0.0;

        let bound_box = self.render_volume.bound_box();
        let (obj_ray, length) = match ray.to_volume_space(bound_box, self.volume.spacing()) {
            Some(r) => r,
            None => return color::zero(),
        };

        let step_size = self.options.ray_step;
        let n_of_steps = (length / step_size) as usize + 1;
        let step = obj_ray.direction * step_size;
        // reference step is one world unit
        let step_ratio = step_size;

        let ctx = ShadingContext {
            volume: self.volume,
            table: self.table,
            gradients: self.gradients,
            view_dir: ray.direction,
        };
        let plain = self.render_volume.mapper().strategy() == RayCastStrategy::Plain;
        let shade = self.render_volume.property().shade;

        let mut pos = obj_ray.origin;
        for _ in 0..n_of_steps {
            if self.options.early_ray_termination && opacity > OPACITY_THRESHOLD {
                break;
            }

            let (value, offset, classified) = self.classify(pos);
            let sample = Sample {
                position: pos,
                value,
                offset,
                classified,
                transparency: 1.0 - opacity,
            };
            pos += step;

            if classified.w == 0.0 {
                continue;
            }

            let color = if plain {
                if shade {
                    self.shaders
                        .direct_illumination
                        .shade(&sample, classified, &ctx, scratch)
                } else {
                    classified
                }
            } else {
                chain
                    .iter()
                    .fold(classified, |color, shader| shader.shade(&sample, color, &ctx, scratch))
            };

            let opacity_corrected = 1.0 - (1.0 - color.w.clamp(0.0, 1.0)).powf(step_ratio);
            accum += (1.0 - opacity) * opacity_corrected * color.xyz();
            opacity += (1.0 - opacity) * opacity_corrected;
        }

        color::new(accum.x, accum.y, accum.z, opacity)
    }

    /// Value, nearest voxel and classification at `pos` (voxel coordinates)
    fn classify(&self, pos: Point3<f32>) -> (f32, usize, RGBA) {
        let offset = self.volume.nearest_offset(pos);
        let property = self.render_volume.property();

        match property.interpolation {
            InterpolationType::Nearest => {
                let value = self.volume.data()[offset];
                (value as f32, offset, self.table.at(value))
            }
            InterpolationType::Linear => match self.render_volume.mapper().composite_method() {
                CompositeMethod::InterpolateFirst => {
                    let value = self.volume.sample_at(pos);
                    (value, offset, self.table.classify(value))
                }
                CompositeMethod::ClassifyFirst => {
                    let tri = self.volume.trilinear(pos);
                    let data = self.volume.data();
                    let mut value = 0.0;
                    let mut color = color::zero();
                    for (&o, &w) in tri.offsets.iter().zip(tri.weights.iter()) {
                        value += data[o] as f32 * w;
                        color += self.table.at(data[o]) * w;
                    }
                    (value, offset, color)
                }
            },
        }
    }
}

fn split_tiles(range_x: Range<usize>, range_y: Range<usize>) -> Vec<TileTask> {
    let mut tasks = Vec::new();
    for y in range_y.clone().step_by(TILE_SIDE) {
        let y_end = (y + TILE_SIDE).min(range_y.end);
        for x in range_x.clone().step_by(TILE_SIDE) {
            let x_end = (x + TILE_SIDE).min(range_x.end);
            tasks.push(TileTask {
                x: x..x_end,
                y: y..y_end,
            });
        }
    }
    tasks
}

fn copy_tile(buffer: &mut [u8], width: usize, tile: &TileResult) {
    let row_len = tile.x.len() * 3;
    for (row, y) in tile.y.clone().enumerate() {
        let start = (y * width + tile.x.start) * 3;
        buffer[start..start + row_len].copy_from_slice(&tile.data[row * row_len..(row + 1) * row_len]);
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn tiles_cover_range() {
        let tiles = split_tiles(3..40, 0..17);
        let pixels: usize = tiles.iter().map(|t| t.x.len() * t.y.len()).sum();
        assert_eq!(pixels, 37 * 17);
        assert!(tiles.iter().all(|t| t.x.len() <= TILE_SIDE && t.y.len() <= TILE_SIDE));
    }

    #[test]
    fn tile_is_copied_into_place() {
        let mut buffer = vec![0; 4 * 3 * 3];
        let tile = TileResult {
            x: 1..3,
            y: 1..3,
            data: vec![7; 2 * 2 * 3],
        };
        copy_tile(&mut buffer, 4, &tile);

        assert_eq!(&buffer[0..12], &[0; 12]);
        assert_eq!(&buffer[12..15], &[0; 3]);
        assert_eq!(&buffer[15..21], &[7; 6]);
        assert_eq!(&buffer[21..24], &[0; 3]);
    }
}
