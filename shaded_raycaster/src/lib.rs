//! Volume ray caster compositing samples through a chain of voxel shaders.
//!
//! [`Renderer`] owns a normalized copy of the input [`ScalarVolume`],
//! the gradient estimators and one instance of every shading kernel.
//! Besides plain rendering it drives the viewpoint information passes,
//! obscurance, contour, visibility map and saliency rendering.

pub mod accumulator;
pub mod camera;
pub mod color;
pub mod common;
mod error;
pub mod gradient;
pub mod information;
pub mod premade;
pub mod render;
pub mod shaders;
pub mod test_helpers;
pub mod transfer_function;
pub mod volumetric;

pub use camera::PerspectiveCamera;
pub use error::RenderError;
pub use render::{RenderMode, RenderOptions, Renderer};
pub use transfer_function::TransferFunction;
pub use volumetric::ScalarVolume;
