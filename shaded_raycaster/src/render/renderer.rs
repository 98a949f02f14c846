/*
    Multi-pass controller.

    Owns the normalized volume and everything derived from it. Modes are
    switched by reconfiguring the shader chain between traversals, a traversal
    borrows the whole state immutably until every worker has joined.
*/

use std::sync::Arc;

use log::debug;
use nalgebra::{vector, Vector3};

use crate::{
    camera::PerspectiveCamera,
    gradient::{GradientEstimators, GradientKind, ShadingTables},
    shaders::{Obscurance, ShaderChain, ShaderKind, VoxelShaderSet},
    transfer_function::{SharedTransferFunction, TransferFunction},
    volumetric::{NormalizedVolume, ScalarVolume},
    RenderError,
};

use super::{
    traversal::Traversal, CompositeMethod, Interpolation, InterpolationType, RenderMode,
    RenderOptions, RenderVolume,
};

/// Light direction (normalized).
/// Single static light.
pub const LIGHT_DIR: Vector3<f32> = vector![-0.74278, -0.55708, -0.37139];

/// Parameters of obscurance or color bleeding rendering.
#[derive(Debug, Clone)]
pub struct ObscuranceParams {
    pub obscurance: Arc<Obscurance>,
    pub factor: f32,
    pub filter_low: f32,
    pub filter_high: f32,
}

pub struct Renderer {
    volume: NormalizedVolume,
    gradients: GradientEstimators,
    shaders: VoxelShaderSet,
    render_volume: RenderVolume,
    mode: RenderMode,
    /// view direction the shading tables were built for
    view_dir: Vector3<f32>,
}

impl Renderer {
    /// Normalize `volume` and set up a renderer with an empty chain and plain strategy.
    ///
    /// Fails with [`RenderError::InvalidVolume`] on zero extent or empty buffer.
    pub fn new(volume: &ScalarVolume) -> Result<Renderer, RenderError> {
        let volume = NormalizedVolume::from_scalar(volume)?;
        let gradients = GradientEstimators::new();
        let render_volume = RenderVolume::new(&volume);
        let view_dir = vector![0.0, 0.0, -1.0];
        let tables = ShadingTables::build(
            gradients.encoder(),
            render_volume.property(),
            LIGHT_DIR,
            view_dir,
        );
        let shaders = VoxelShaderSet::new(&volume, &tables);

        Ok(Renderer {
            volume,
            gradients,
            shaders,
            render_volume,
            mode: RenderMode::Normal,
            view_dir,
        })
    }

    // Accessors

    /// Normalized sample buffer
    pub fn image(&self) -> &NormalizedVolume {
        &self.volume
    }

    /// Renderable object
    pub fn volume(&self) -> &RenderVolume {
        &self.render_volume
    }

    pub fn range_min(&self) -> u16 {
        self.volume.range_min()
    }

    pub fn range_max(&self) -> u16 {
        self.volume.range_max()
    }

    /// Number of samples
    pub fn size(&self) -> usize {
        self.volume.len()
    }

    pub fn mode(&self) -> RenderMode {
        self.mode
    }

    pub fn chain(&self) -> &ShaderChain {
        self.render_volume.mapper().chain()
    }

    pub fn shaders(&self) -> &VoxelShaderSet {
        &self.shaders
    }

    pub fn gradients(&self) -> &GradientEstimators {
        &self.gradients
    }

    /// Handle to the transfer function shared by all color producing kernels
    pub fn transfer_function(&self) -> SharedTransferFunction {
        self.shaders.transfer_function().clone()
    }

    // Configuration

    pub fn set_interpolation(&mut self, interpolation: Interpolation) {
        let (property, method) = match interpolation {
            Interpolation::NearestNeighbour => (InterpolationType::Nearest, None),
            Interpolation::LinearInterpolateClassify => {
                (InterpolationType::Linear, Some(CompositeMethod::InterpolateFirst))
            }
            Interpolation::LinearClassifyInterpolate => {
                (InterpolationType::Linear, Some(CompositeMethod::ClassifyFirst))
            }
        };
        self.render_volume.property_mut().interpolation = property;
        if let Some(method) = method {
            self.render_volume.mapper_mut().set_composite_method(method);
        }
    }

    /// Select gradient estimator used for lighting and by kernels enabled afterwards
    pub fn set_gradient_estimator(&mut self, kind: GradientKind) {
        self.gradients.select(kind, &self.volume);
        self.shaders.direct_illumination.set_gradient_estimator(kind);
        self.refresh_shading_tables(self.view_dir);
    }

    pub fn set_transfer_function(&mut self, function: TransferFunction) {
        self.shaders.set_transfer_function(function);
    }

    /// Switch base kernel between ambient and direct illumination
    pub fn set_lighting(&mut self, diffuse: bool, specular: bool, specular_power: f32) {
        let base = if diffuse {
            ShaderKind::DirectIllumination
        } else {
            ShaderKind::Ambient
        };
        self.render_volume
            .mapper_mut()
            .chain_mut()
            .insert_at_base(base);

        if diffuse {
            let kind = self.bound_gradient();
            self.shaders.direct_illumination.set_gradient_estimator(kind);
        }

        let property = self.render_volume.property_mut();
        property.shade = diffuse;
        property.specular = if specular { 1.0 } else { 0.0 };
        property.specular_power = specular_power;
        let ambient = property.ambient;

        self.shaders.direct_illumination.set_ambient(ambient);
        self.refresh_shading_tables(self.view_dir);
        self.render_volume.mapper_mut().sync_strategy();

        debug!("Lighting: diffuse {diffuse}, specular {specular}, power {specular_power}");
    }

    /// Paint silhouettes, `threshold` on `|normal · view|`
    pub fn enable_contour(&mut self, threshold: f32) {
        let kind = self.bound_gradient();
        let contour = &mut self.shaders.contour;
        contour.set_gradient_estimator(kind);
        contour.set_threshold(threshold);

        self.render_volume.mapper_mut().add_shader(ShaderKind::Contour);
        self.set_mode(RenderMode::Contour);
    }

    pub fn disable_contour(&mut self) {
        self.remove_shader(ShaderKind::Contour);
    }

    /// Obscurance or color bleeding, depending on whether the source carries color.
    /// The two are mutually exclusive.
    pub fn enable_obscurance(&mut self, params: ObscuranceParams) -> Result<(), RenderError> {
        self.check_len("obscurance", params.obscurance.len())?;

        let mapper = self.render_volume.mapper_mut();
        if params.obscurance.has_color() {
            mapper.chain_mut().remove(ShaderKind::Obscurance);
            mapper.add_shader(ShaderKind::ColorBleeding);

            let shader = &mut self.shaders.color_bleeding;
            shader.set_color_bleeding(params.obscurance);
            shader.set_factor(params.factor);
            self.set_mode(RenderMode::ColorBleeding);
        } else {
            mapper.chain_mut().remove(ShaderKind::ColorBleeding);
            mapper.add_shader(ShaderKind::Obscurance);

            let shader = &mut self.shaders.obscurance;
            shader.set_obscurance(params.obscurance);
            shader.set_factor(params.factor);
            shader.set_filters(params.filter_low, params.filter_high);
            self.set_mode(RenderMode::Obscurance);
        }
        Ok(())
    }

    pub fn disable_obscurance(&mut self) {
        let chain = self.render_volume.mapper_mut().chain_mut();
        chain.remove(ShaderKind::Obscurance);
        chain.remove(ShaderKind::ColorBleeding);
        self.after_removal();
    }

    /// Remove every overlay kernel, keep the base kernel
    pub fn clear_shaders(&mut self) {
        let chain = self.render_volume.mapper_mut().chain_mut();
        let base = chain.base();
        chain.remove_all();
        if let Some(base) = base {
            chain.insert_at_base(base);
        }
        self.after_removal();
    }

    // Viewpoint information passes

    /// Bind the composited strategy for the passes
    pub fn start_vmi_mode(&mut self) {
        self.render_volume.mapper_mut().bind_shader_composite();
    }

    pub fn start_vmi_first_pass(&mut self) {
        let mapper = self.render_volume.mapper_mut();
        mapper.chain_mut().remove_all();
        mapper.add_shader(ShaderKind::VmiFirstPass);
        self.shaders.vmi_first_pass.init_accumulator();
        self.set_mode(RenderMode::VmiFirstPass);
    }

    /// Projected volume seen in the first pass, summed over all workers
    pub fn finish_vmi_first_pass(&self) -> Result<f32, RenderError> {
        self.expect_mode(RenderMode::VmiFirstPass)?;
        Ok(self.shaders.vmi_first_pass.accumulator().total())
    }

    pub fn start_vmi_second_pass(&mut self) {
        let mapper = self.render_volume.mapper_mut();
        mapper.chain_mut().remove_all();
        mapper.add_shader(ShaderKind::VmiSecondPass);
        self.set_mode(RenderMode::VmiSecondPass);
    }

    /// Probability of every voxel being seen from the viewpoint of the last traversal
    pub fn finish_vmi_second_pass(&self) -> Result<Vec<f32>, RenderError> {
        self.expect_mode(RenderMode::VmiSecondPass)?;
        Ok(self.shaders.vmi_second_pass.object_probabilities())
    }

    pub fn viewed_volume_in_vmi_second_pass(&self) -> Result<f32, RenderError> {
        self.expect_mode(RenderMode::VmiSecondPass)?;
        Ok(self.shaders.vmi_second_pass.viewed_volume())
    }

    /// Render voxel mutual information.
    /// With `combine` the active kernels are kept and darkened, otherwise VoMI is the only kernel.
    pub fn render_vomi(
        &mut self,
        vomi: Vec<f32>,
        max: f32,
        factor: f32,
        combine: bool,
    ) -> Result<(), RenderError> {
        self.check_len("vomi", vomi.len())?;
        let kind = self.bound_gradient();

        let mapper = self.render_volume.mapper_mut();
        if !combine {
            mapper.chain_mut().remove_all();
        }
        mapper.add_shader(ShaderKind::VisibilityMap);

        let shader = &mut self.shaders.visibility_map;
        shader.set_vomi(vomi, max, factor);
        shader.set_combine(combine);
        shader.set_gradient_estimator(kind);
        self.set_mode(RenderMode::VisibilityMap);
        Ok(())
    }

    pub fn render_voxel_saliencies(
        &mut self,
        saliencies: Vec<f32>,
        max: f32,
        factor: f32,
        diffuse_lighting: bool,
    ) -> Result<(), RenderError> {
        self.check_len("saliencies", saliencies.len())?;
        let kind = self.bound_gradient();

        let mapper = self.render_volume.mapper_mut();
        mapper.chain_mut().remove_all();
        mapper.add_shader(ShaderKind::Saliency);

        let shader = &mut self.shaders.saliency;
        shader.set_voxel_saliencies(saliencies, max, factor);
        shader.set_diffuse_lighting(diffuse_lighting);
        shader.set_gradient_estimator(kind);
        self.set_mode(RenderMode::Saliency);
        Ok(())
    }

    // Rendering

    /// Render one frame into RGB `buffer`.
    /// Blocks until all workers are done, pass results are readable afterwards.
    pub fn render(
        &mut self,
        camera: &PerspectiveCamera,
        options: &RenderOptions,
        buffer: &mut [u8],
    ) -> Result<(), RenderError> {
        let view_dir = camera.get_dir().normalize();
        if self.render_volume.property().shade && view_dir != self.view_dir {
            self.refresh_shading_tables(view_dir);
        }

        let table = self.shaders.transfer_function().table();
        let traversal = Traversal {
            volume: &self.volume,
            render_volume: &self.render_volume,
            shaders: &self.shaders,
            gradients: &self.gradients,
            table: &table,
            options,
        };
        traversal.run(camera, buffer)
    }

    // Helpers

    /// Current estimator, computing its normals if needed
    fn bound_gradient(&mut self) -> GradientKind {
        let kind = self.gradients.current();
        if self.gradients.normals(kind).is_none() {
            self.gradients.select(kind, &self.volume);
        }
        kind
    }

    fn refresh_shading_tables(&mut self, view_dir: Vector3<f32>) {
        self.view_dir = view_dir;
        let tables = ShadingTables::build(
            self.gradients.encoder(),
            self.render_volume.property(),
            LIGHT_DIR,
            view_dir,
        );
        self.shaders.direct_illumination.set_shading_tables(tables);
    }

    fn remove_shader(&mut self, kind: ShaderKind) {
        self.render_volume.mapper_mut().chain_mut().remove(kind);
        self.after_removal();
    }

    /// Strategy and mode follow what is left in the chain
    fn after_removal(&mut self) {
        let mapper = self.render_volume.mapper_mut();
        mapper.sync_strategy();
        let mode = mapper
            .chain()
            .last_overlay()
            .map_or(RenderMode::Normal, mode_of);
        self.set_mode(mode);
    }

    fn set_mode(&mut self, mode: RenderMode) {
        if self.mode != mode {
            debug!("Render mode {:?} -> {:?}", self.mode, mode);
            self.mode = mode;
        }
    }

    fn expect_mode(&self, expected: RenderMode) -> Result<(), RenderError> {
        if self.mode == expected {
            Ok(())
        } else {
            Err(RenderError::InvalidModeTransition {
                expected,
                actual: self.mode,
            })
        }
    }

    fn check_len(&self, what: &'static str, actual: usize) -> Result<(), RenderError> {
        let expected = self.volume.len();
        if actual == expected {
            Ok(())
        } else {
            Err(RenderError::InputLength {
                what,
                expected,
                actual,
            })
        }
    }
}

fn mode_of(kind: ShaderKind) -> RenderMode {
    match kind {
        ShaderKind::Ambient | ShaderKind::DirectIllumination => RenderMode::Normal,
        ShaderKind::Contour => RenderMode::Contour,
        ShaderKind::Obscurance => RenderMode::Obscurance,
        ShaderKind::ColorBleeding => RenderMode::ColorBleeding,
        ShaderKind::VmiFirstPass => RenderMode::VmiFirstPass,
        ShaderKind::VmiSecondPass => RenderMode::VmiSecondPass,
        ShaderKind::VisibilityMap => RenderMode::VisibilityMap,
        ShaderKind::Saliency => RenderMode::Saliency,
    }
}
