use byteorder::{ByteOrder, LittleEndian};
use shaded_raycaster::volumetric::parse::{SampleType, HEADER_LEN};

use crate::config::GenerateConfig;

/// Volume file header
/// little-endian, total length 27B
/// 1. extent -- 3x 32bit ints (x,y,z)
/// 2. 1 byte padding
/// 3. voxel spacing -- 3x 32bit floats
/// 4. sample type -- 1 byte, generated volumes are always 16bit signed
/// 5. 1 reserved byte
/// 6. data -- x*y*z samples, z changing fastest
pub fn generate_header(cfg: &GenerateConfig) -> Vec<u8> {
    let mut vec = vec![0; HEADER_LEN];
    let slice = &mut vec[..];

    LittleEndian::write_u32(&mut slice[0..4], cfg.dims.x);
    LittleEndian::write_u32(&mut slice[4..8], cfg.dims.y);
    LittleEndian::write_u32(&mut slice[8..12], cfg.dims.z);
    // 1 byte gap
    LittleEndian::write_f32(&mut slice[13..17], cfg.spacing.x);
    LittleEndian::write_f32(&mut slice[17..21], cfg.spacing.y);
    LittleEndian::write_f32(&mut slice[21..25], cfg.spacing.z);

    slice[25] = SampleType::I16 as u8;

    vec
}
