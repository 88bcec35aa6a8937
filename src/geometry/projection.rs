use crate::foundation::core::{Canvas, Point, Vec2};

/// Linear map from the normalized `0..=100` model space onto canvas pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Projection {
    canvas: Canvas,
}

impl Projection {
    /// Project onto `canvas`.
    pub fn new(canvas: Canvas) -> Self {
        Self { canvas }
    }

    /// Target canvas.
    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    /// Convert a normalized position into absolute canvas units.
    pub fn to_absolute(&self, x: f64, y: f64) -> Point {
        Point::new(
            x / 100.0 * self.canvas.width_f64(),
            y / 100.0 * self.canvas.height_f64(),
        )
    }

    /// Convert a normalized displacement into absolute canvas units.
    pub fn delta_to_absolute(&self, dx: f64, dy: f64) -> Vec2 {
        Vec2::new(
            dx / 100.0 * self.canvas.width_f64(),
            dy / 100.0 * self.canvas.height_f64(),
        )
    }
}

impl Default for Projection {
    fn default() -> Self {
        Self::new(Canvas::default())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/projection.rs"]
mod tests;
