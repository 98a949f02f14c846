use nalgebra::{Point3, Translation3};

use crate::{common::BoundBox, volumetric::NormalizedVolume};

use super::RayCastMapper;

/// How samples between voxel centers are obtained and classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Interpolation {
    #[default]
    NearestNeighbour,
    /// Interpolate the scalar, then classify it
    LinearInterpolateClassify,
    /// Classify the 8 surrounding voxels, then interpolate their colors
    LinearClassifyInterpolate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InterpolationType {
    #[default]
    Nearest,
    Linear,
}

/// Appearance of the rendered volume.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VolumeProperty {
    pub interpolation: InterpolationType,
    pub shade: bool,
    pub ambient: f32,
    pub diffuse: f32,
    pub specular: f32,
    pub specular_power: f32,
}

impl Default for VolumeProperty {
    fn default() -> Self {
        VolumeProperty {
            interpolation: InterpolationType::Nearest,
            shade: false,
            ambient: 0.1,
            diffuse: 0.9,
            specular: 0.0,
            specular_power: 10.0,
        }
    }
}

/// Renderable object: mapper, appearance and placement in the scene.
///
/// The volume is centered at the origin.
#[derive(Debug)]
pub struct RenderVolume {
    mapper: RayCastMapper,
    property: VolumeProperty,
    placement: Translation3<f32>,
    bound_box: BoundBox,
}

impl RenderVolume {
    pub fn new(volume: &NormalizedVolume) -> RenderVolume {
        let dims = volume.dims();
        let lower = Point3::origin() - dims * 0.5;

        RenderVolume {
            mapper: RayCastMapper::new(),
            property: VolumeProperty::default(),
            placement: Translation3::from(lower.coords),
            bound_box: BoundBox::from_position_dims(lower, dims),
        }
    }

    pub fn mapper(&self) -> &RayCastMapper {
        &self.mapper
    }

    pub fn mapper_mut(&mut self) -> &mut RayCastMapper {
        &mut self.mapper
    }

    pub fn property(&self) -> &VolumeProperty {
        &self.property
    }

    pub fn property_mut(&mut self) -> &mut VolumeProperty {
        &mut self.property
    }

    /// Translation from voxel-grid world coordinates (origin at voxel 0) to the scene
    pub fn placement(&self) -> Translation3<f32> {
        self.placement
    }

    /// World space bounding box
    pub fn bound_box(&self) -> BoundBox {
        self.bound_box
    }
}
