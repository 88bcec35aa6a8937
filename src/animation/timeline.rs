use crate::{
    animation::ease::Ease,
    foundation::core::Seconds,
    geometry::connector::ConnectorPath,
    render::scene::ElementId,
};

/// Animatable element attribute.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Prop {
    /// Circle center x.
    Cx,
    /// Circle center y.
    Cy,
    /// Circle radius.
    R,
    /// Box origin x.
    X,
    /// Box origin y.
    Y,
    /// Element opacity.
    Opacity,
    /// Group translation x.
    TranslateX,
    /// Group translation y.
    TranslateY,
    /// Stroke dash offset (growth effect).
    DashOffset,
    /// Connector shape.
    Path,
}

/// Value of an animatable attribute.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Value {
    /// Scalar attribute.
    Num(f64),
    /// Connector shape attribute.
    Path(ConnectorPath),
}

impl Value {
    /// Interpolate between two values; mismatched variants snap to `b`.
    pub fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        match (a, b) {
            (Self::Num(a), Self::Num(b)) => Self::Num(a + (b - a) * t),
            (Self::Path(a), Self::Path(b)) => Self::Path(ConnectorPath::lerp(a, b, t)),
            _ => *b,
        }
    }

    /// Scalar payload, if any.
    pub fn as_num(&self) -> Option<f64> {
        match self {
            Self::Num(v) => Some(*v),
            Self::Path(_) => None,
        }
    }
}

/// A tween of one element's attributes toward target values.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Tween {
    /// Tweened element.
    pub target: ElementId,
    /// Target values; start values are captured when the tween first plays.
    pub props: Vec<(Prop, Value)>,
    /// Duration in seconds.
    pub duration: Seconds,
    /// Easing curve.
    pub ease: Ease,
}

impl Tween {
    /// `true` when `prop` is among the tweened attributes.
    pub fn animates(&self, prop: Prop) -> bool {
        self.props.iter().any(|(p, _)| *p == prop)
    }
}

/// Discrete callback fired once at its offset.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// Remove an element (and its subtree) from the scene.
    Detach(ElementId),
    /// Append one character to an element's text.
    AppendText {
        /// Text element.
        target: ElementId,
        /// Character to append.
        ch: char,
    },
}

/// Timeline operation.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Op {
    /// Tweened attribute change.
    Tween(Tween),
    /// Discrete callback.
    Call(Action),
}

/// An operation placed at an offset.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Entry {
    /// Offset from timeline start.
    pub at: Seconds,
    /// Scheduled operation.
    pub op: Op,
}

/// Ordered collection of scheduled operations sharing one clock.
///
/// Operations at the same offset are unordered relative to each other; offsets are
/// honoured monotonically by [`crate::TimelinePlayer`].
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Timeline {
    entries: Vec<Entry>,
}

impl Timeline {
    /// Empty timeline.
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule a tween of `target` toward `props`.
    pub fn to(
        &mut self,
        target: ElementId,
        props: Vec<(Prop, Value)>,
        at: Seconds,
        duration: Seconds,
        ease: Ease,
    ) {
        self.entries.push(Entry {
            at: at.max(0.0),
            op: Op::Tween(Tween {
                target,
                props,
                duration: duration.max(0.0),
                ease,
            }),
        });
    }

    /// Schedule a callback.
    pub fn call(&mut self, action: Action, at: Seconds) {
        self.entries.push(Entry {
            at: at.max(0.0),
            op: Op::Call(action),
        });
    }

    /// All entries in insertion order.
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Tweens with their start offsets.
    pub fn tweens(&self) -> impl Iterator<Item = (Seconds, &Tween)> {
        self.entries.iter().filter_map(|e| match &e.op {
            Op::Tween(t) => Some((e.at, t)),
            Op::Call(_) => None,
        })
    }

    /// Tweens targeting one element.
    pub fn tweens_for(&self, target: ElementId) -> impl Iterator<Item = (Seconds, &Tween)> {
        self.tweens().filter(move |(_, t)| t.target == target)
    }

    /// Callbacks with their offsets.
    pub fn calls(&self) -> impl Iterator<Item = (Seconds, &Action)> {
        self.entries.iter().filter_map(|e| match &e.op {
            Op::Call(a) => Some((e.at, a)),
            Op::Tween(_) => None,
        })
    }

    /// Number of scheduled tweens.
    pub fn tween_count(&self) -> usize {
        self.tweens().count()
    }

    /// `true` when nothing is scheduled.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Offset at which the last operation completes.
    pub fn duration(&self) -> Seconds {
        self.entries
            .iter()
            .map(|e| match &e.op {
                Op::Tween(t) => e.at + t.duration,
                Op::Call(_) => e.at,
            })
            .fold(0.0, f64::max)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/timeline.rs"]
mod tests;
