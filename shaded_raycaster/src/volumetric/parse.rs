//! Volume file format.
//!
//! Little-endian header, 27 bytes:
//! 1. extent -- 3x 32bit ints (x,y,z)
//! 2. 1 byte padding
//! 3. voxel spacing -- 3x 32bit floats
//! 4. sample type -- 1 byte, see [`SampleType`]
//! 5. 1 reserved byte
//!
//! Samples follow, `z` being the fastest changing coordinate.

use std::path::Path;

use log::debug;
use nalgebra::{vector, Vector3};
use nom::{
    bytes::complete::take,
    number::complete::{le_f32, le_u32, le_u8},
    sequence::tuple,
    IResult,
};

use crate::RenderError;

use super::{DataSource, ScalarVolume};

pub const HEADER_LEN: usize = 27;

/// Encoding of one sample in the file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleType {
    U8 = 1,
    I16 = 2,
}

impl SampleType {
    pub fn from_byte(byte: u8) -> Option<SampleType> {
        match byte {
            1 => Some(SampleType::U8),
            2 => Some(SampleType::I16),
            _ => None,
        }
    }

    pub fn byte_size(&self) -> usize {
        match self {
            SampleType::U8 => 1,
            SampleType::I16 => 2,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct VolumeHeader {
    pub size: Vector3<usize>,
    pub spacing: Vector3<f32>,
    pub sample_type: u8,
}

pub fn header(s: &[u8]) -> IResult<&[u8], VolumeHeader> {
    let mut header = tuple((
        tuple((le_u32, le_u32, le_u32)),
        take(1_u8),
        tuple((le_f32, le_f32, le_f32)),
        le_u8,
        take(1_u8),
    ));

    let (s, (size, _, spacing, sample_type, _)) = header(s)?;

    let size = vector![size.0 as usize, size.1 as usize, size.2 as usize];
    let spacing = vector![spacing.0, spacing.1, spacing.2];

    Ok((
        s,
        VolumeHeader {
            size,
            spacing,
            sample_type,
        },
    ))
}

/// Parse volume from bytes of a volume file
pub fn from_bytes(bytes: &[u8]) -> Result<ScalarVolume, RenderError> {
    let (data, header) = header(bytes).map_err(|_| RenderError::Parse("truncated header"))?;

    let sample_type =
        SampleType::from_byte(header.sample_type).ok_or(RenderError::Parse("unknown sample type"))?;

    let count = header.size.x * header.size.y * header.size.z;
    let expected_len = count * sample_type.byte_size();
    if data.len() < expected_len {
        return Err(RenderError::Parse("file has fewer samples than its extent"));
    }

    let data = &data[..expected_len];
    let samples: Vec<i16> = match sample_type {
        SampleType::U8 => data.iter().map(|&v| v as i16).collect(),
        SampleType::I16 => data
            .chunks_exact(2)
            .map(|c| i16::from_le_bytes([c[0], c[1]]))
            .collect(),
    };

    debug!(
        "parsed volume {:?}, spacing {:?}, {sample_type:?} samples",
        header.size, header.spacing
    );

    Ok(ScalarVolume::new(header.size, header.spacing, samples))
}

/// Memory map and parse volume file at `path`
pub fn from_file<P>(path: P) -> Result<ScalarVolume, RenderError>
where
    P: AsRef<Path>,
{
    let ds = DataSource::from_file(path)?;
    from_bytes(ds.get_slice())
}

#[cfg(test)]
mod test {
    use super::*;

    fn header_bytes(size: [u32; 3], spacing: [f32; 3], sample_type: u8) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(HEADER_LEN);
        for v in size {
            bytes.extend_from_slice(&v.to_le_bytes());
        }
        bytes.push(0);
        for v in spacing {
            bytes.extend_from_slice(&v.to_le_bytes());
        }
        bytes.push(sample_type);
        bytes.push(0);
        bytes
    }

    #[test]
    fn parses_signed_samples() {
        let mut bytes = header_bytes([1, 1, 2], [1.0, 0.5, 2.0], 2);
        assert_eq!(bytes.len(), HEADER_LEN);
        bytes.extend_from_slice(&(-1024i16).to_le_bytes());
        bytes.extend_from_slice(&(3000i16).to_le_bytes());

        let volume = from_bytes(&bytes).unwrap();

        assert_eq!(volume.size(), vector![1, 1, 2]);
        assert_eq!(volume.spacing(), vector![1.0, 0.5, 2.0]);
        assert_eq!(volume.samples(), &[-1024, 3000]);
        assert_eq!(volume.range().low, -1024.0);
    }

    #[test]
    fn rejects_short_files() {
        let mut bytes = header_bytes([2, 2, 2], [1.0, 1.0, 1.0], 1);
        bytes.extend_from_slice(&[1, 2, 3]);
        assert!(matches!(from_bytes(&bytes), Err(RenderError::Parse(_))));

        assert!(matches!(from_bytes(&bytes[..10]), Err(RenderError::Parse(_))));
    }

    #[test]
    fn rejects_unknown_sample_type() {
        let mut bytes = header_bytes([1, 1, 1], [1.0, 1.0, 1.0], 9);
        bytes.push(0);
        assert!(matches!(from_bytes(&bytes), Err(RenderError::Parse(_))));
    }
}
