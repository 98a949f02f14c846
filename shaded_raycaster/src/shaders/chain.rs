use super::ShaderKind;

/// Ordered, duplicate free list of active shaders.
///
/// Position 0 holds the base shader (ambient or direct illumination) when one is set,
/// overlay shaders follow in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShaderChain {
    shaders: Vec<ShaderKind>,
}

impl ShaderChain {
    pub fn new() -> ShaderChain {
        ShaderChain::default()
    }

    /// Append `kind`, no-op if already present
    pub fn add(&mut self, kind: ShaderKind) {
        if !self.contains(kind) {
            self.shaders.push(kind);
        }
    }

    /// Remove `kind`, no-op if absent
    pub fn remove(&mut self, kind: ShaderKind) {
        self.shaders.retain(|&k| k != kind);
    }

    /// Remove shader at `index`, no-op if out of range
    pub fn remove_at(&mut self, index: usize) -> Option<ShaderKind> {
        if index < self.shaders.len() {
            Some(self.shaders.remove(index))
        } else {
            None
        }
    }

    pub fn index_of(&self, kind: ShaderKind) -> Option<usize> {
        self.shaders.iter().position(|&k| k == kind)
    }

    pub fn contains(&self, kind: ShaderKind) -> bool {
        self.shaders.contains(&kind)
    }

    pub fn remove_all(&mut self) {
        self.shaders.clear();
    }

    /// Put base shader `kind` at position 0.
    ///
    /// A base shader already at position 0 is replaced,
    /// otherwise `kind` is inserted in front of the overlays.
    /// A copy of `kind` elsewhere in the chain is removed.
    pub fn insert_at_base(&mut self, kind: ShaderKind) {
        debug_assert!(kind.is_base());
        if self.shaders.first().map_or(false, |k| k.is_base()) {
            self.shaders.remove(0);
        }
        self.remove(kind);
        self.shaders.insert(0, kind);
    }

    /// Base shader at position 0, if any
    pub fn base(&self) -> Option<ShaderKind> {
        self.shaders.first().copied().filter(|k| k.is_base())
    }

    /// Chain contains anything besides a base shader
    pub fn has_overlays(&self) -> bool {
        self.shaders.iter().any(|k| !k.is_base())
    }

    /// Last added overlay shader
    pub fn last_overlay(&self) -> Option<ShaderKind> {
        self.shaders.iter().rev().copied().find(|k| !k.is_base())
    }

    pub fn len(&self) -> usize {
        self.shaders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shaders.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = ShaderKind> + '_ {
        self.shaders.iter().copied()
    }

    pub fn as_slice(&self) -> &[ShaderKind] {
        &self.shaders
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use ShaderKind::*;

    #[test]
    fn add_is_idempotent() {
        let mut chain = ShaderChain::new();
        chain.add(Contour);
        chain.add(Obscurance);
        chain.add(Contour);

        assert_eq!(chain.as_slice(), &[Contour, Obscurance]);
    }

    #[test]
    fn remove_absent_is_noop() {
        let mut chain = ShaderChain::new();
        chain.add(Contour);
        chain.remove(Saliency);
        assert_eq!(chain.remove_at(5), None);

        assert_eq!(chain.as_slice(), &[Contour]);
        assert_eq!(chain.index_of(Saliency), None);
        assert_eq!(chain.index_of(Contour), Some(0));
    }

    #[test]
    fn base_is_replaced() {
        let mut chain = ShaderChain::new();
        chain.add(Contour);
        chain.insert_at_base(Ambient);
        assert_eq!(chain.as_slice(), &[Ambient, Contour]);

        chain.insert_at_base(DirectIllumination);
        assert_eq!(chain.as_slice(), &[DirectIllumination, Contour]);

        chain.insert_at_base(DirectIllumination);
        assert_eq!(chain.as_slice(), &[DirectIllumination, Contour]);
        assert_eq!(chain.base(), Some(DirectIllumination));
    }

    #[test]
    fn overlays() {
        let mut chain = ShaderChain::new();
        chain.insert_at_base(Ambient);
        assert!(!chain.has_overlays());

        chain.add(Obscurance);
        chain.add(Contour);
        assert!(chain.has_overlays());
        assert_eq!(chain.last_overlay(), Some(Contour));

        chain.remove_all();
        assert!(chain.is_empty());
    }
}
