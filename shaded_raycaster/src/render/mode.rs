/// State of the multi-pass controller.
///
/// `Normal` is the initial state and the state reached after every feature is disabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderMode {
    #[default]
    Normal,
    Contour,
    Obscurance,
    ColorBleeding,
    VmiFirstPass,
    VmiSecondPass,
    VisibilityMap,
    Saliency,
}
