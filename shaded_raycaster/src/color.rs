//! Colors used during compositing.
//!
//! Channels are kept in `<0;1>`, conversion to bytes happens only
//! when writing the final image.

use nalgebra::{vector, Vector3, Vector4};

pub type RGBA = Vector4<f32>;

pub fn new(r: f32, g: f32, b: f32, a: f32) -> RGBA {
    vector![r, g, b, a]
}

pub fn zero() -> RGBA {
    vector![0.0, 0.0, 0.0, 0.0]
}

pub fn mono(v: f32, opacity: f32) -> RGBA {
    vector![v, v, v, opacity]
}

/// Combine `rgb` with opacity of `color`
pub fn with_rgb(color: RGBA, rgb: Vector3<f32>) -> RGBA {
    vector![rgb.x, rgb.y, rgb.z, color.w]
}

/// Perceived brightness of the color channels
pub fn luminance(color: &RGBA) -> f32 {
    0.299 * color.x + 0.587 * color.y + 0.114 * color.z
}

/// Channel in `<0;1>` to byte
pub fn to_byte(channel: f32) -> u8 {
    (channel.clamp(0.0, 1.0) * 255.0).round() as u8
}
