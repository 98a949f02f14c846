use log::debug;

use crate::shaders::{ShaderChain, ShaderKind};

/// Traversal algorithm bound to the mapper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RayCastStrategy {
    /// Classification only, optional shading by the volume property
    #[default]
    Plain,
    /// Every sample is passed through the shader chain
    ShaderComposited,
}

/// Order of classification and interpolation for linear interpolation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompositeMethod {
    #[default]
    InterpolateFirst,
    ClassifyFirst,
}

/// Ray cast mapper, holds the active strategy and the shader chain.
///
/// Switching the strategy never touches the chain.
#[derive(Debug, Default)]
pub struct RayCastMapper {
    strategy: RayCastStrategy,
    chain: ShaderChain,
    composite_method: CompositeMethod,
}

impl RayCastMapper {
    pub fn new() -> RayCastMapper {
        RayCastMapper::default()
    }

    pub fn strategy(&self) -> RayCastStrategy {
        self.strategy
    }

    pub fn bind_plain(&mut self) {
        self.bind(RayCastStrategy::Plain);
    }

    pub fn bind_shader_composite(&mut self) {
        self.bind(RayCastStrategy::ShaderComposited);
    }

    fn bind(&mut self, strategy: RayCastStrategy) {
        if self.strategy != strategy {
            debug!("Ray cast strategy {:?} -> {:?}", self.strategy, strategy);
            self.strategy = strategy;
        }
    }

    /// Plain strategy when no overlay shader is active, composited otherwise.
    /// A chain holding only the base shader renders the same in plain mode.
    pub fn sync_strategy(&mut self) {
        if self.chain.has_overlays() {
            self.bind_shader_composite();
        } else {
            self.bind_plain();
        }
    }

    pub fn chain(&self) -> &ShaderChain {
        &self.chain
    }

    pub fn chain_mut(&mut self) -> &mut ShaderChain {
        &mut self.chain
    }

    /// Append `kind` to the chain and bind the composited strategy
    pub fn add_shader(&mut self, kind: ShaderKind) {
        self.chain.add(kind);
        self.bind_shader_composite();
    }

    pub fn composite_method(&self) -> CompositeMethod {
        self.composite_method
    }

    pub fn set_composite_method(&mut self, method: CompositeMethod) {
        self.composite_method = method;
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn strategy_follows_chain() {
        let mut mapper = RayCastMapper::new();
        assert_eq!(mapper.strategy(), RayCastStrategy::Plain);

        mapper.add_shader(ShaderKind::Contour);
        assert_eq!(mapper.strategy(), RayCastStrategy::ShaderComposited);

        mapper.chain_mut().remove(ShaderKind::Contour);
        mapper.sync_strategy();
        assert_eq!(mapper.strategy(), RayCastStrategy::Plain);

        mapper.chain_mut().insert_at_base(ShaderKind::DirectIllumination);
        mapper.sync_strategy();
        assert_eq!(mapper.strategy(), RayCastStrategy::Plain);
    }
}
