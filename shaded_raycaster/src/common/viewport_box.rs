use std::{cmp::min, ops::Range};

use nalgebra::{point, Point2, Vector2};

/// Rectangle on the image plane, both axes in `<0;1>`.
/// Used to skip pixels whose rays cannot hit the volume.
pub struct ViewportBox {
    pub lower: Point2<f32>,
    pub upper: Point2<f32>,
}

impl ViewportBox {
    /// Flipped box, first added point initializes it
    pub fn new() -> Self {
        Self {
            lower: point![f32::INFINITY, f32::INFINITY],
            upper: point![f32::NEG_INFINITY, f32::NEG_INFINITY],
        }
    }

    pub fn add_point(&mut self, x: f32, y: f32) {
        self.upper.x = f32::max(self.upper.x, x);
        self.upper.y = f32::max(self.upper.y, y);
        self.lower.x = f32::min(self.lower.x, x);
        self.lower.y = f32::min(self.lower.y, y);
    }

    pub fn size(&self) -> Vector2<f32> {
        self.upper - self.lower
    }

    /// Pixel ranges covered by the box, clipped to the image
    pub fn get_pixel_range(&self, resolution: (usize, usize)) -> (Range<usize>, Range<usize>) {
        let (width, height) = resolution;

        let to_pixel = |v: f32, max: usize| -> usize {
            if v <= 0.0 {
                0
            } else {
                min(v as usize, max)
            }
        };

        let start_x = to_pixel((self.lower.x * width as f32).floor(), width);
        let start_y = to_pixel((self.lower.y * height as f32).floor(), height);
        let end_x = to_pixel((self.upper.x * width as f32).ceil(), width);
        let end_y = to_pixel((self.upper.y * height as f32).ceil(), height);

        (start_x..end_x.max(start_x), start_y..end_y.max(start_y))
    }
}

impl Default for ViewportBox {
    fn default() -> Self {
        Self::new()
    }
}
