mod mapper;
mod mode;
mod options;
mod render_volume;
mod renderer;
mod traversal;

pub use mapper::{CompositeMethod, RayCastMapper, RayCastStrategy};
pub use mode::RenderMode;
pub use options::{RenderOptions, RenderOptionsBuilder, DEFAULT_RAY_STEP};
pub use render_volume::{Interpolation, InterpolationType, RenderVolume, VolumeProperty};
pub use renderer::{ObscuranceParams, Renderer, LIGHT_DIR};
