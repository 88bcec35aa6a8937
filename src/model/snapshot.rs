use std::collections::{BTreeSet, HashSet};

use crate::foundation::error::{ConstellationError, ConstellationResult};

/// Id prefix used by mirrored points that do not name their counterpart explicitly.
pub const MIRROR_ID_PREFIX: &str = "r-";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
/// Visual category of a [`Point`].
pub enum PointKind {
    /// Commit on the primary line.
    Primary,
    /// Commit on a side line (feature branch).
    Side,
    /// Union (merge) commit.
    Union,
    /// Commit in conflict.
    Conflict,
    /// Highlighted origin; carries ripple effects while displayed.
    Origin,
    /// Member of the remote mirrored copy.
    Mirrored,
}

impl PointKind {
    /// Stable lowercase name, used for element classes.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Primary => "primary",
            Self::Side => "side",
            Self::Union => "union",
            Self::Conflict => "conflict",
            Self::Origin => "origin",
            Self::Mirrored => "mirrored",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
/// Visual category of a [`Connection`].
pub enum ConnectionKind {
    /// Ancestry along the primary line.
    Primary,
    /// Ancestry along a side line.
    Side,
    /// Edge folding a side line back in.
    Union,
    /// Edge inside the remote mirrored copy.
    Mirrored,
}

impl ConnectionKind {
    /// Stable lowercase name, used for element classes.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Primary => "primary",
            Self::Side => "side",
            Self::Union => "union",
            Self::Mirrored => "mirrored",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
/// Side of the anchor point an [`Annotation`] card is placed on.
pub enum Placement {
    /// Card sits to the left of the anchor.
    Left,
    /// Card sits to the right of the anchor.
    Right,
    /// Card sits above the anchor.
    Top,
    /// Card sits below the anchor.
    Bottom,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
/// Category of an [`Annotation`]; selects its icon and accent.
pub enum AnnotationCategory {
    /// An open issue.
    OpenIssue,
    /// A change waiting for review.
    PendingChange,
    /// A change that has been merged.
    MergedChange,
}

impl AnnotationCategory {
    /// Stable lowercase name, used for element classes.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::OpenIssue => "open_issue",
            Self::PendingChange => "pending_change",
            Self::MergedChange => "merged_change",
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// A node of the diagram in normalized `0..=100` coordinates.
pub struct Point {
    /// Identity, stable across chapters.
    pub id: String,
    /// Horizontal position, percent of canvas width.
    pub x: f64,
    /// Vertical position, percent of canvas height.
    pub y: f64,
    /// Visual category.
    pub kind: PointKind,
    /// Radius override; the kind's default applies when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radius: Option<f64>,
    /// Short text typed out next to the point when it appears.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    /// Local counterpart of a mirrored point; defaults to the id without [`MIRROR_ID_PREFIX`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mirror_of: Option<String>,
}

impl Point {
    /// Create a point without caption or radius override.
    pub fn new(id: impl Into<String>, x: f64, y: f64, kind: PointKind) -> Self {
        Self {
            id: id.into(),
            x,
            y,
            kind,
            radius: None,
            caption: None,
            mirror_of: None,
        }
    }

    /// Attach a caption.
    pub fn with_caption(mut self, caption: impl Into<String>) -> Self {
        self.caption = Some(caption.into());
        self
    }

    /// Override the kind's default radius.
    pub fn with_radius(mut self, radius: f64) -> Self {
        self.radius = Some(radius);
        self
    }

    /// Name the local counterpart of a mirrored point.
    pub fn with_mirror_of(mut self, local: impl Into<String>) -> Self {
        self.mirror_of = Some(local.into());
        self
    }

    /// `true` for members of the remote mirrored copy.
    pub fn is_mirrored(&self) -> bool {
        self.kind == PointKind::Mirrored
    }

    /// Id of the local point this mirrored point copies, if any.
    pub fn counterpart_id(&self) -> Option<&str> {
        if !self.is_mirrored() {
            return None;
        }
        match &self.mirror_of {
            Some(local) => Some(local.as_str()),
            None => self.id.strip_prefix(MIRROR_ID_PREFIX),
        }
    }

    /// `true` when both normalized coordinates are identical.
    pub fn same_position(&self, other: &Point) -> bool {
        self.x == other.x && self.y == other.y
    }
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
/// A directed edge between two points.
pub struct Connection {
    /// Identity, stable across chapters.
    pub id: String,
    /// Source point id.
    pub from: String,
    /// Target point id.
    pub to: String,
    /// Visual category.
    pub kind: ConnectionKind,
}

impl Connection {
    /// Create a connection.
    pub fn new(
        id: impl Into<String>,
        from: impl Into<String>,
        to: impl Into<String>,
        kind: ConnectionKind,
    ) -> Self {
        Self {
            id: id.into(),
            from: from.into(),
            to: to.into(),
            kind,
        }
    }

    /// `true` for edges of the remote mirrored copy.
    pub fn is_mirrored(&self) -> bool {
        self.kind == ConnectionKind::Mirrored
    }

    /// `true` when either endpoint is `point_id`.
    pub fn touches(&self, point_id: &str) -> bool {
        self.from == point_id || self.to == point_id
    }

    /// `true` when both versions join the same pair of points in the same direction.
    pub fn same_endpoints(&self, other: &Connection) -> bool {
        self.from == other.from && self.to == other.to
    }
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
/// A callout card anchored to a point.
pub struct Annotation {
    /// Identity, stable across chapters.
    pub id: String,
    /// Point the card is positioned against.
    pub anchor_point: String,
    /// Offset direction from the anchor.
    pub placement: Placement,
    /// Icon/accent category.
    pub category: AnnotationCategory,
    /// Card heading.
    pub title: String,
    /// Card body text.
    pub body: String,
}

impl Annotation {
    /// Create an annotation.
    pub fn new(
        id: impl Into<String>,
        anchor_point: impl Into<String>,
        placement: Placement,
        category: AnnotationCategory,
        title: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            anchor_point: anchor_point.into(),
            placement,
            category,
            title: title.into(),
            body: body.into(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
/// Immutable named bundle describing one chapter of the diagram.
pub struct Snapshot {
    /// Points, in authoring order.
    #[serde(default)]
    pub points: Vec<Point>,
    /// Connections, in authoring order.
    #[serde(default)]
    pub connections: Vec<Connection>,
    /// Annotation cards, in authoring order.
    #[serde(default)]
    pub annotations: Vec<Annotation>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// A reference from a connection or annotation to a point absent from the same snapshot.
pub struct DanglingReference {
    /// Id of the referring connection or annotation.
    pub owner: String,
    /// Referring field name.
    pub field: &'static str,
    /// The point id that does not resolve.
    pub missing: String,
}

impl Snapshot {
    /// Create a snapshot from its three collections.
    pub fn new(
        points: Vec<Point>,
        connections: Vec<Connection>,
        annotations: Vec<Annotation>,
    ) -> Self {
        Self {
            points,
            connections,
            annotations,
        }
    }

    /// The empty snapshot.
    pub fn empty() -> Self {
        Self::default()
    }

    /// `true` when no entity of any type is present.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty() && self.connections.is_empty() && self.annotations.is_empty()
    }

    /// Look up a point by id.
    pub fn point(&self, id: &str) -> Option<&Point> {
        self.points.iter().find(|p| p.id == id)
    }

    /// Look up an annotation by id.
    pub fn annotation(&self, id: &str) -> Option<&Annotation> {
        self.annotations.iter().find(|a| a.id == id)
    }

    /// `true` when any point belongs to the remote mirrored copy.
    pub fn has_mirrored(&self) -> bool {
        self.points.iter().any(Point::is_mirrored)
    }

    /// Check identity uniqueness and coordinate sanity.
    ///
    /// Dangling references are not errors; see [`Snapshot::dangling_references`].
    pub fn validate(&self) -> ConstellationResult<()> {
        unique_ids("point", self.points.iter().map(|p| p.id.as_str()))?;
        unique_ids("connection", self.connections.iter().map(|c| c.id.as_str()))?;
        unique_ids("annotation", self.annotations.iter().map(|a| a.id.as_str()))?;

        for p in &self.points {
            if !p.x.is_finite() || !p.y.is_finite() {
                return Err(ConstellationError::validation(format!(
                    "point '{}' has non-finite coordinates",
                    p.id
                )));
            }
            if let Some(r) = p.radius
                && (!r.is_finite() || r < 0.0)
            {
                return Err(ConstellationError::validation(format!(
                    "point '{}' radius must be finite and >= 0",
                    p.id
                )));
            }
        }
        Ok(())
    }

    /// Connections and annotations whose point references do not resolve in this snapshot.
    pub fn dangling_references(&self) -> Vec<DanglingReference> {
        let ids: HashSet<&str> = self.points.iter().map(|p| p.id.as_str()).collect();
        let mut out = Vec::new();
        for c in &self.connections {
            for (field, end) in [("from", &c.from), ("to", &c.to)] {
                if !ids.contains(end.as_str()) {
                    out.push(DanglingReference {
                        owner: c.id.clone(),
                        field,
                        missing: end.clone(),
                    });
                }
            }
        }
        for a in &self.annotations {
            if !ids.contains(a.anchor_point.as_str()) {
                out.push(DanglingReference {
                    owner: a.id.clone(),
                    field: "anchor_point",
                    missing: a.anchor_point.clone(),
                });
            }
        }
        out
    }
}

fn unique_ids<'a>(what: &str, ids: impl Iterator<Item = &'a str>) -> ConstellationResult<()> {
    let mut seen = BTreeSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(ConstellationError::validation(format!(
                "duplicate {what} id '{id}'"
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/model/snapshot.rs"]
mod tests;
