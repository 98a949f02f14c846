//! Mapping from sample value to color and opacity.

use std::sync::Arc;

use nalgebra::{vector, Vector3};
use parking_lot::RwLock;

use crate::color::{self, RGBA};

/// Piecewise linear color and opacity mapping.
///
/// Values outside of the defined points are clamped to the first/last point.
/// Without points the mapping is black and fully transparent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransferFunction {
    color: Vec<(f32, Vector3<f32>)>,
    opacity: Vec<(f32, f32)>,
}

impl TransferFunction {
    pub fn new() -> TransferFunction {
        TransferFunction::default()
    }

    /// Add color point, channels in `<0;1>`
    pub fn add_color_point(&mut self, value: f32, rgb: Vector3<f32>) {
        let pos = self.color.partition_point(|p| p.0 < value);
        self.color.insert(pos, (value, rgb));
    }

    /// Add opacity point, opacity in `<0;1>`
    pub fn add_opacity_point(&mut self, value: f32, opacity: f32) {
        let pos = self.opacity.partition_point(|p| p.0 < value);
        self.opacity.insert(pos, (value, opacity));
    }

    #[must_use]
    pub fn with_color(mut self, value: f32, r: f32, g: f32, b: f32) -> Self {
        self.add_color_point(value, vector![r, g, b]);
        self
    }

    #[must_use]
    pub fn with_opacity(mut self, value: f32, opacity: f32) -> Self {
        self.add_opacity_point(value, opacity);
        self
    }

    pub fn color(&self, value: f32) -> Vector3<f32> {
        interpolate(&self.color, value, Vector3::zeros(), |a, b, t| a.lerp(&b, t))
    }

    pub fn opacity(&self, value: f32) -> f32 {
        interpolate(&self.opacity, value, 0.0, |a, b, t| a + (b - a) * t)
    }

    pub fn rgba(&self, value: f32) -> RGBA {
        let rgb = self.color(value);
        color::new(rgb.x, rgb.y, rgb.z, self.opacity(value))
    }

    /// Precompute the mapping for every value in `<0;range_max>`
    pub fn classification_table(&self, range_max: u16) -> ClassificationTable {
        let entries = (0..=range_max as u32).map(|v| self.rgba(v as f32)).collect();
        ClassificationTable { entries }
    }
}

fn interpolate<T: Copy>(points: &[(f32, T)], value: f32, empty: T, lerp: impl Fn(T, T, f32) -> T) -> T {
    let (first, last) = match (points.first(), points.last()) {
        (Some(f), Some(l)) => (f, l),
        _ => return empty,
    };

    if value <= first.0 {
        return first.1;
    }
    if value >= last.0 {
        return last.1;
    }

    let upper = points.partition_point(|p| p.0 <= value);
    let (v0, c0) = points[upper - 1];
    let (v1, c1) = points[upper];
    let t = if v1 > v0 { (value - v0) / (v1 - v0) } else { 0.0 };
    lerp(c0, c1, t)
}

/// Transfer function evaluated for every normalized sample value.
#[derive(Debug, Clone)]
pub struct ClassificationTable {
    entries: Vec<RGBA>,
}

impl ClassificationTable {
    /// Classify integer sample, values above the range get the last entry
    pub fn at(&self, value: u16) -> RGBA {
        let index = (value as usize).min(self.entries.len() - 1);
        self.entries[index]
    }

    /// Classify interpolated sample
    pub fn classify(&self, value: f32) -> RGBA {
        let max = (self.entries.len() - 1) as f32;
        let v = value.clamp(0.0, max);
        let low = v.floor();
        let t = v - low;
        let low = low as usize;
        let high = (low + 1).min(self.entries.len() - 1);
        self.entries[low].lerp(&self.entries[high], t)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

struct Snapshot {
    function: Arc<TransferFunction>,
    table: Arc<ClassificationTable>,
}

/// Transfer function shared by the volume property and every color-producing shader.
///
/// Updating replaces function and table in a single write,
/// readers take a consistent snapshot for the duration of a traversal.
#[derive(Clone)]
pub struct SharedTransferFunction {
    inner: Arc<RwLock<Snapshot>>,
    range_max: u16,
}

impl SharedTransferFunction {
    pub fn new(function: TransferFunction, range_max: u16) -> SharedTransferFunction {
        let table = Arc::new(function.classification_table(range_max));
        let snapshot = Snapshot {
            function: Arc::new(function),
            table,
        };
        SharedTransferFunction {
            inner: Arc::new(RwLock::new(snapshot)),
            range_max,
        }
    }

    /// Replace the mapping for all holders at once
    pub fn store(&self, function: TransferFunction) {
        // table is built outside of the lock
        let table = Arc::new(function.classification_table(self.range_max));
        let function = Arc::new(function);
        let mut guard = self.inner.write();
        *guard = Snapshot { function, table };
    }

    pub fn function(&self) -> Arc<TransferFunction> {
        self.inner.read().function.clone()
    }

    pub fn table(&self) -> Arc<ClassificationTable> {
        self.inner.read().table.clone()
    }
}

impl std::fmt::Debug for SharedTransferFunction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedTransferFunction")
            .field("range_max", &self.range_max)
            .finish()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn gray_ramp() -> TransferFunction {
        TransferFunction::new()
            .with_color(0.0, 0.0, 0.0, 0.0)
            .with_color(100.0, 1.0, 1.0, 1.0)
            .with_opacity(50.0, 0.0)
            .with_opacity(100.0, 1.0)
    }

    #[test]
    fn piecewise_linear() {
        let tf = gray_ramp();

        assert!((tf.color(25.0).x - 0.25).abs() < 1e-6);
        assert_eq!(tf.opacity(10.0), 0.0);
        assert!((tf.opacity(75.0) - 0.5).abs() < 1e-6);
        // clamped
        assert_eq!(tf.opacity(500.0), 1.0);
        assert_eq!(tf.color(-3.0), Vector3::zeros());
    }

    #[test]
    fn points_are_sorted_on_insert() {
        let tf = TransferFunction::new()
            .with_opacity(100.0, 1.0)
            .with_opacity(0.0, 0.0);
        assert!((tf.opacity(50.0) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn empty_function_is_transparent() {
        let tf = TransferFunction::new();
        assert_eq!(tf.rgba(42.0), color::zero());
    }

    #[test]
    fn table_matches_function() {
        let tf = gray_ramp();
        let table = tf.classification_table(200);

        assert_eq!(table.len(), 201);
        assert_eq!(table.at(75), tf.rgba(75.0));
        assert_eq!(table.at(5000), tf.rgba(200.0));
        let between = table.classify(75.5);
        assert!((between.w - tf.opacity(75.5)).abs() < 1e-6);
    }

    #[test]
    fn store_replaces_for_all_clones() {
        let shared = SharedTransferFunction::new(TransferFunction::new(), 100);
        let other_holder = shared.clone();

        shared.store(gray_ramp());

        assert_eq!(*other_holder.function(), gray_ramp());
        assert_eq!(other_holder.table().at(100).w, 1.0);
    }
}
