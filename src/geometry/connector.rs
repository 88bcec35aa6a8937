use kurbo::{Line, ParamCurveArclen, QuadBez};

use crate::foundation::core::{BezPath, Point, Vec2};

const ARCLEN_ACCURACY: f64 = 1e-3;

/// Rendered shape of a connection: a straight segment or a single quadratic curve.
///
/// Curves follow the transit-map idiom: a fork to the right leaves its source horizontally
/// and bends down onto the target, a merge to the left drops vertically and then folds in.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ConnectorPath {
    /// Start point (source endpoint).
    pub from: Point,
    /// Quadratic control point; `None` for a straight segment.
    pub ctrl: Option<Point>,
    /// End point (target endpoint).
    pub to: Point,
}

impl ConnectorPath {
    /// Straight segment between two absolute points.
    pub fn straight(from: Point, to: Point) -> Self {
        Self {
            from,
            ctrl: None,
            to,
        }
    }

    /// Metro-style connector between two absolute points.
    ///
    /// Endpoints whose horizontal distance is below `epsilon` are joined by a straight segment.
    pub fn metro(from: Point, to: Point, epsilon: f64) -> Self {
        let dx = to.x - from.x;
        if dx.abs() < epsilon {
            return Self::straight(from, to);
        }
        let ctrl = if dx > 0.0 {
            Point::new(to.x, from.y)
        } else {
            Point::new(from.x, to.y)
        };
        Self {
            from,
            ctrl: Some(ctrl),
            to,
        }
    }

    /// `true` for straight segments.
    pub fn is_straight(&self) -> bool {
        self.ctrl.is_none()
    }

    /// Control point, lifting straight segments to a degenerate quadratic.
    pub fn control(&self) -> Point {
        self.ctrl.unwrap_or_else(|| self.from.midpoint(self.to))
    }

    /// Rendered path length in canvas units.
    pub fn length(&self) -> f64 {
        match self.ctrl {
            None => Line::new(self.from, self.to).arclen(ARCLEN_ACCURACY),
            Some(ctrl) => QuadBez::new(self.from, ctrl, self.to).arclen(ARCLEN_ACCURACY),
        }
    }

    /// Shape translated by `offset`.
    pub fn translated(self, offset: Vec2) -> Self {
        Self {
            from: self.from + offset,
            ctrl: self.ctrl.map(|c| c + offset),
            to: self.to + offset,
        }
    }

    /// Interpolate between two shapes; `t >= 1` yields `b` exactly.
    pub fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        if t >= 1.0 {
            return *b;
        }
        if t <= 0.0 {
            return *a;
        }
        let ctrl = match (a.ctrl, b.ctrl) {
            (None, None) => None,
            _ => Some(a.control().lerp(b.control(), t)),
        };
        Self {
            from: a.from.lerp(b.from, t),
            ctrl,
            to: a.to.lerp(b.to, t),
        }
    }

    /// Path geometry as a kurbo [`BezPath`].
    pub fn to_bez_path(&self) -> BezPath {
        let mut path = BezPath::new();
        path.move_to(self.from);
        match self.ctrl {
            None => path.line_to(self.to),
            Some(ctrl) => path.quad_to(ctrl, self.to),
        }
        path
    }

    /// SVG path data (`d` attribute).
    pub fn to_svg(&self) -> String {
        self.to_bez_path().to_svg()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/connector.rs"]
mod tests;
