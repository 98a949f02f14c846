use std::{
    error::Error,
    io::{BufWriter, Write},
};

use byteorder::{LittleEndian, WriteBytesExt};
use log::info;
use nalgebra::{vector, Vector3};
use rayon::prelude::*;

use crate::{
    config::{GenerateConfig, GeneratorConfig},
    file::open_create_file,
    header::generate_header,
};

mod shapes;
mod solid;
mod sphere;

/// Generates one sample at a time, at any location
pub trait SampleGenerator: Sync {
    fn sample_at(&self, coords: Vector3<u32>) -> i16;
}

pub fn get_sample_generator(config: &GenerateConfig) -> Box<dyn SampleGenerator> {
    match config.generator {
        GeneratorConfig::Shapes { .. } => Box::new(shapes::ShapesGenerator::from_config(config)),
        GeneratorConfig::Solid { .. } => Box::new(solid::SolidGenerator::from_config(config)),
        GeneratorConfig::Sphere { .. } => Box::new(sphere::SphereGenerator::from_config(config)),
    }
}

/// Evaluate generator over the whole volume, `z` changing fastest.
/// Slabs of constant `x` are generated in parallel.
pub fn generate_samples(sg: &dyn SampleGenerator, dims: Vector3<u32>) -> Vec<i16> {
    let slab = (dims.y * dims.z) as usize;
    let mut samples = vec![0; slab * dims.x as usize];
    if slab == 0 {
        return samples;
    }

    samples
        .par_chunks_mut(slab)
        .enumerate()
        .for_each(|(x, chunk)| {
            let mut i = 0;
            for y in 0..dims.y {
                for z in 0..dims.z {
                    chunk[i] = sg.sample_at(vector![x as u32, y, z]);
                    i += 1;
                }
            }
        });

    samples
}

pub fn generate_vol(config: &GenerateConfig) -> Result<(), Box<dyn Error>> {
    let gen = get_sample_generator(config);
    let samples = generate_samples(gen.as_ref(), config.dims);

    let file = open_create_file(&config.file_name)?;
    let mut writer = BufWriter::new(file);

    writer.write_all(&generate_header(config))?;
    for &sample in &samples {
        writer.write_i16::<LittleEndian>(sample)?;
    }
    writer.flush()?;

    info!(
        "Generating finished, {} samples written to {:?}",
        samples.len(),
        config.file_name
    );
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;

    struct Diagonal;

    impl SampleGenerator for Diagonal {
        fn sample_at(&self, coords: Vector3<u32>) -> i16 {
            (coords.x * 100 + coords.y * 10 + coords.z) as i16
        }
    }

    #[test]
    fn samples_are_z_fastest() {
        let samples = generate_samples(&Diagonal, vector![2, 3, 4]);

        assert_eq!(samples.len(), 24);
        assert_eq!(samples[0], 0);
        assert_eq!(samples[1], 1);
        assert_eq!(samples[4], 10);
        assert_eq!(samples[12], 100);
        assert_eq!(samples[23], 123);
    }
}
