//! Per-sample shading kernels.
//!
//! Every kernel exists exactly once inside [`VoxelShaderSet`] and is configured through setters.
//! Which kernels run during a traversal is decided by the [`ShaderChain`].

mod ambient;
mod chain;
mod contour;
mod direct_illumination;
mod obscurance;
mod saliency;
mod vmi;
mod vomi;

use nalgebra::{Point3, Vector3};

pub use ambient::AmbientShader;
pub use chain::ShaderChain;
pub use contour::ContourShader;
pub use direct_illumination::DirectIlluminationShader;
pub use obscurance::{ColorBleedingShader, Obscurance, ObscuranceShader};
pub use saliency::SaliencyShader;
pub use vmi::{VmiFirstPassShader, VmiSecondPassShader};
pub use vomi::VomiShader;

use crate::{
    accumulator::WorkerSlot,
    color::RGBA,
    gradient::{EncodedNormals, GradientEstimators, GradientKind, ShadingTables},
    transfer_function::{ClassificationTable, SharedTransferFunction, TransferFunction},
    volumetric::NormalizedVolume,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderKind {
    Ambient,
    DirectIllumination,
    Contour,
    Obscurance,
    ColorBleeding,
    VmiFirstPass,
    VmiSecondPass,
    VisibilityMap,
    Saliency,
}

impl ShaderKind {
    /// Kernels that may occupy position 0 of the chain
    pub fn is_base(&self) -> bool {
        matches!(self, ShaderKind::Ambient | ShaderKind::DirectIllumination)
    }
}

/// One sample along a ray.
#[derive(Debug, Clone, Copy)]
pub struct Sample {
    /// Voxel coordinates
    pub position: Point3<f32>,
    /// Normalized, possibly interpolated value
    pub value: f32,
    /// Flat index of the nearest voxel
    pub offset: usize,
    /// Transfer function color and opacity of the sample
    pub classified: RGBA,
    /// `1 - accumulated opacity` of the ray before this sample
    pub transparency: f32,
}

/// Read-only state shared by all kernels during one traversal.
pub struct ShadingContext<'a> {
    pub volume: &'a NormalizedVolume,
    /// Transfer function snapshot of this traversal
    pub table: &'a ClassificationTable,
    pub gradients: &'a GradientEstimators,
    /// Ray direction in volume space, unit vector
    pub view_dir: Vector3<f32>,
}

impl<'a> ShadingContext<'a> {
    /// Normals of `kind`, falling back to the current estimator
    pub fn normals(&self, kind: GradientKind) -> Option<&'a EncodedNormals> {
        self.gradients
            .normals(kind)
            .or_else(|| self.gradients.current_normals())
    }

    /// Decoded unit normal at `offset`, zero vector in flat regions
    pub fn normal_at(&self, kind: GradientKind, offset: usize) -> Option<Vector3<f32>> {
        let normals = self.normals(kind)?;
        Some(self.gradients.encoder().decode(normals.indices[offset]))
    }

    /// Diffuse term of a light placed at the camera, 1 where no normal is known
    pub fn headlight(&self, kind: GradientKind, offset: usize) -> f32 {
        match self.normal_at(kind, offset) {
            Some(n) if n.norm_squared() > 0.0 => n.dot(&self.view_dir).abs(),
            _ => 1.0,
        }
    }
}

/// Partial results of one worker, merged into the kernels' accumulators
/// when the worker finishes its share of the traversal.
#[derive(Debug, Default)]
pub struct WorkerScratch {
    pub viewed_volume: f32,
    pub object_volumes: Vec<f32>,
}

/// Kernel evaluated for every sample of a shader composited traversal.
pub trait VoxelShader: Send + Sync {
    fn kind(&self) -> ShaderKind;

    /// Shade `sample`, `color` is the output of the previous kernel in the chain
    fn shade(
        &self,
        sample: &Sample,
        color: RGBA,
        ctx: &ShadingContext<'_>,
        scratch: &mut WorkerScratch,
    ) -> RGBA;

    /// Called once before workers start
    fn begin_traversal(&self) {}

    /// Called once by every worker after its last sample
    fn finish_worker(&self, _slot: WorkerSlot, _scratch: &mut WorkerScratch) {}
}

/// One instance of every kernel, all sharing the transfer function.
pub struct VoxelShaderSet {
    pub ambient: AmbientShader,
    pub direct_illumination: DirectIlluminationShader,
    pub contour: ContourShader,
    pub obscurance: ObscuranceShader,
    pub color_bleeding: ColorBleedingShader,
    pub vmi_first_pass: VmiFirstPassShader,
    pub vmi_second_pass: VmiSecondPassShader,
    pub visibility_map: VomiShader,
    pub saliency: SaliencyShader,
    transfer_function: SharedTransferFunction,
}

impl VoxelShaderSet {
    /// Wire every kernel with the range and sample count of `volume`
    pub fn new(volume: &NormalizedVolume, tables: &ShadingTables) -> VoxelShaderSet {
        let transfer_function = SharedTransferFunction::new(TransferFunction::new(), volume.range_max());
        VoxelShaderSet {
            ambient: AmbientShader::new(),
            direct_illumination: DirectIlluminationShader::new(tables.clone()),
            contour: ContourShader::new(),
            obscurance: ObscuranceShader::new(),
            color_bleeding: ColorBleedingShader::new(),
            vmi_first_pass: VmiFirstPassShader::new(),
            vmi_second_pass: VmiSecondPassShader::new(volume.len()),
            visibility_map: VomiShader::new(),
            saliency: SaliencyShader::new(),
            transfer_function,
        }
    }

    pub fn shader(&self, kind: ShaderKind) -> &dyn VoxelShader {
        match kind {
            ShaderKind::Ambient => &self.ambient,
            ShaderKind::DirectIllumination => &self.direct_illumination,
            ShaderKind::Contour => &self.contour,
            ShaderKind::Obscurance => &self.obscurance,
            ShaderKind::ColorBleeding => &self.color_bleeding,
            ShaderKind::VmiFirstPass => &self.vmi_first_pass,
            ShaderKind::VmiSecondPass => &self.vmi_second_pass,
            ShaderKind::VisibilityMap => &self.visibility_map,
            ShaderKind::Saliency => &self.saliency,
        }
    }

    /// Replace the transfer function of every color producing kernel at once
    pub fn set_transfer_function(&self, function: TransferFunction) {
        self.transfer_function.store(function);
    }

    /// Handle to the shared transfer function
    pub fn transfer_function(&self) -> &SharedTransferFunction {
        &self.transfer_function
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn shader_lookup_matches_kind() {
        let volume = crate::test_helpers::ramp_volume(nalgebra::vector![3, 3, 3]);
        let encoder = crate::gradient::NormalEncoder::new();
        let set = VoxelShaderSet::new(&volume, &ShadingTables::unlit(&encoder));

        let kinds = [
            ShaderKind::Ambient,
            ShaderKind::DirectIllumination,
            ShaderKind::Contour,
            ShaderKind::Obscurance,
            ShaderKind::ColorBleeding,
            ShaderKind::VmiFirstPass,
            ShaderKind::VmiSecondPass,
            ShaderKind::VisibilityMap,
            ShaderKind::Saliency,
        ];
        for kind in kinds {
            assert_eq!(set.shader(kind).kind(), kind);
        }
    }
}
