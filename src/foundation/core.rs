use crate::foundation::error::{ConstellationError, ConstellationResult};

pub use kurbo::{BezPath, Point, Rect, Vec2};

/// Timeline offsets and durations, in seconds from timeline start.
pub type Seconds = f64;

/// Pixel dimensions of the drawing surface the normalized model is projected onto.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Canvas {
    /// Create a validated canvas with non-zero dimensions.
    pub fn new(width: u32, height: u32) -> ConstellationResult<Self> {
        if width == 0 || height == 0 {
            return Err(ConstellationError::validation(
                "canvas width/height must be > 0",
            ));
        }
        Ok(Self { width, height })
    }

    /// Width as `f64`.
    pub fn width_f64(self) -> f64 {
        f64::from(self.width)
    }

    /// Height as `f64`.
    pub fn height_f64(self) -> f64 {
        f64::from(self.height)
    }
}

impl Default for Canvas {
    fn default() -> Self {
        Self {
            width: 1920,
            height: 1080,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
