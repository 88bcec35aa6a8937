use crate::{
    foundation::core::{Point, Rect, Vec2},
    model::snapshot::Placement,
};

/// Fixed card box used for annotations.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct CardLayout {
    /// Card width in canvas units.
    pub width: f64,
    /// Card height in canvas units.
    pub height: f64,
    /// Distance between anchor point and the nearest card edge.
    pub gap: f64,
}

impl Default for CardLayout {
    fn default() -> Self {
        Self {
            width: 180.0,
            height: 80.0,
            gap: 20.0,
        }
    }
}

impl CardLayout {
    /// Card rectangle for an anchor at `anchor` on the given side.
    pub fn card_rect(&self, anchor: Point, placement: Placement) -> Rect {
        let offset = match placement {
            Placement::Left => Vec2::new(-self.width - self.gap, -self.height / 2.0),
            Placement::Right => Vec2::new(self.gap, -self.height / 2.0),
            Placement::Top => Vec2::new(-self.width / 2.0, -self.height - self.gap),
            Placement::Bottom => Vec2::new(-self.width / 2.0, self.gap),
        };
        Rect::from_origin_size(anchor + offset, (self.width, self.height))
    }
}

/// Caption box placed beside its point.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct CaptionLayout {
    /// Offset of the caption box origin from the point center.
    pub offset: Vec2,
    /// Caption box width.
    pub width: f64,
    /// Caption box height.
    pub height: f64,
}

impl Default for CaptionLayout {
    fn default() -> Self {
        Self {
            offset: Vec2::new(20.0, -10.0),
            width: 200.0,
            height: 20.0,
        }
    }
}

impl CaptionLayout {
    /// Caption box for a point centered at `anchor`.
    pub fn caption_rect(&self, anchor: Point) -> Rect {
        Rect::from_origin_size(anchor + self.offset, (self.width, self.height))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/placement.rs"]
mod tests;
