use crate::model::snapshot::{AnnotationCategory, ConnectionKind, Point, PointKind};

/// Fill, glow filter and default radius for a point kind.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointStyle {
    /// Fill color.
    pub fill: &'static str,
    /// Glow filter reference.
    pub glow: &'static str,
    /// Default radius in canvas pixels.
    pub radius: f64,
}

/// Stroke color and settled opacity for a connection kind.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ConnectionStyle {
    /// Stroke color.
    pub stroke: &'static str,
    /// Opacity once fully drawn.
    pub opacity: f64,
}

/// Style table lookup for a point kind.
pub fn point_style(kind: PointKind) -> PointStyle {
    match kind {
        PointKind::Primary => PointStyle {
            fill: "#5eead4",
            glow: "url(#glow-cyan)",
            radius: 8.0,
        },
        PointKind::Side => PointStyle {
            fill: "#c4b5fd",
            glow: "url(#glow-purple)",
            radius: 7.0,
        },
        PointKind::Union => PointStyle {
            fill: "#fcd34d",
            glow: "url(#glow-gold)",
            radius: 12.0,
        },
        PointKind::Conflict => PointStyle {
            fill: "#fb7185",
            glow: "url(#glow-rose)",
            radius: 8.0,
        },
        PointKind::Origin => PointStyle {
            fill: "#5eead4",
            glow: "url(#glow-cyan)",
            radius: 10.0,
        },
        PointKind::Mirrored => PointStyle {
            fill: "#94a3b8",
            glow: "url(#glow-slate)",
            radius: 6.0,
        },
    }
}

/// Style table lookup for a connection kind.
pub fn connection_style(kind: ConnectionKind) -> ConnectionStyle {
    match kind {
        ConnectionKind::Primary => ConnectionStyle {
            stroke: "#5eead4",
            opacity: 0.5,
        },
        ConnectionKind::Side => ConnectionStyle {
            stroke: "#c4b5fd",
            opacity: 0.4,
        },
        ConnectionKind::Union => ConnectionStyle {
            stroke: "#fcd34d",
            opacity: 0.6,
        },
        ConnectionKind::Mirrored => ConnectionStyle {
            stroke: "#94a3b8",
            opacity: 0.25,
        },
    }
}

/// Icon class for an annotation category.
pub fn annotation_icon(category: AnnotationCategory) -> &'static str {
    match category {
        AnnotationCategory::OpenIssue => "ph-fill ph-circle",
        AnnotationCategory::PendingChange => "ph ph-git-pull-request",
        AnnotationCategory::MergedChange => "ph ph-git-merge",
    }
}

/// Radius a point renders at: its override, else its kind's default.
pub fn resolved_radius(point: &Point) -> f64 {
    point.radius.unwrap_or_else(|| point_style(point.kind).radius)
}
