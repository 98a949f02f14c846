use std::ops::Range;

/// Observed range of sample values.
#[derive(Debug, PartialEq, Clone, Copy)]
pub struct ValueRange {
    /// Lower bound
    pub low: f32,
    /// Upper bound
    pub high: f32,
}

impl ValueRange {
    /// Constructs new, empty range.
    pub fn empty() -> ValueRange {
        ValueRange {
            low: f32::NAN,
            high: f32::NAN,
        }
    }

    /// Constructs minimal range, where all samples from an iterator
    /// are inside the range.
    pub fn from_samples<T>(iter: impl IntoIterator<Item = T>) -> ValueRange
    where
        T: Into<f32>,
    {
        let mut range = ValueRange::empty();
        for val in iter {
            range.extend(val.into());
        }
        range
    }

    pub fn is_empty(&self) -> bool {
        self.low.is_nan() || self.high.is_nan()
    }

    /// Extend the range with new value.
    pub fn extend(&mut self, val: f32) {
        if self.is_empty() {
            self.low = val;
            self.high = val;
        }

        if val > self.high {
            self.high = val;
        }

        if val < self.low {
            self.low = val;
        }
    }

    /// Check if value is inside the range.
    pub fn contains(&self, val: f32) -> bool {
        self.low <= val && val <= self.high
    }

    /// Distance between bounds, zero for empty range
    pub fn span(&self) -> f32 {
        if self.is_empty() {
            0.0
        } else {
            self.high - self.low
        }
    }
}

impl Default for ValueRange {
    fn default() -> Self {
        Self::empty()
    }
}

/// ```
/// # use shaded_raycaster::common::ValueRange;
/// let range: ValueRange = (-100.0..900.0).into();
/// assert_eq!(range.span(), 1000.0);
/// ```
impl From<Range<f32>> for ValueRange {
    fn from(range: Range<f32>) -> Self {
        ValueRange {
            low: range.start,
            high: range.end,
        }
    }
}

#[cfg(test)]
mod test {

    use super::*;

    #[test]
    fn from_signed_samples() {
        let samples = [-100i16, 5, 900, 0, 12];

        let range = ValueRange::from_samples(samples);

        assert_eq!(range.low, -100.0);
        assert_eq!(range.high, 900.0);
        assert_eq!(range.span(), 1000.0);
        assert!(range.contains(0.0));
        assert!(!range.contains(901.0));
    }

    #[test]
    fn empty_value_range() {
        let mut range = ValueRange::empty();

        assert!(range.is_empty());
        assert!(!range.contains(0.0));
        assert_eq!(range.span(), 0.0);

        range.extend(2.0);

        assert!(range.contains(2.0));
        assert_eq!(range.low, 2.0);
        assert_eq!(range.high, 2.0);
    }
}
