use crate::{
    engine::config::LayoutConfig,
    foundation::core::{Point as CanvasPoint, Seconds},
    geometry::{connector::ConnectorPath, projection::Projection},
    model::{
        snapshot::{Annotation, Connection, Point, PointKind, Snapshot},
        style::{annotation_icon, connection_style, point_style, resolved_radius},
    },
    render::scene::{Card, ElementId, ElementKind, Scene},
};

/// Builds and restyles scene elements for model entities.
///
/// Creation functions attach the element at its final visual state; entrance effects are
/// layered on by the scheduler.
#[derive(Clone, Debug)]
pub struct ElementFactory {
    projection: Projection,
    layout: LayoutConfig,
}

impl ElementFactory {
    /// Factory projecting through `projection` with `layout` metrics.
    pub fn new(projection: Projection, layout: LayoutConfig) -> Self {
        Self { projection, layout }
    }

    /// Active projection.
    pub fn projection(&self) -> Projection {
        self.projection
    }

    /// Replace the projection (resize).
    pub fn set_projection(&mut self, projection: Projection) {
        self.projection = projection;
    }

    /// Layout metrics.
    pub fn layout(&self) -> &LayoutConfig {
        &self.layout
    }

    /// Absolute center of a point.
    pub fn center(&self, point: &Point) -> CanvasPoint {
        self.projection.to_absolute(point.x, point.y)
    }

    /// Metro connector between two model points.
    pub fn connector(&self, from: &Point, to: &Point) -> ConnectorPath {
        ConnectorPath::metro(
            self.center(from),
            self.center(to),
            self.layout.straight_epsilon,
        )
    }

    /// Connector for `connection` within `snapshot`, `None` when an endpoint is missing.
    pub fn connector_for(
        &self,
        snapshot: &Snapshot,
        connection: &Connection,
    ) -> Option<ConnectorPath> {
        let from = snapshot.point(&connection.from)?;
        let to = snapshot.point(&connection.to)?;
        Some(self.connector(from, to))
    }

    /// Create a point element under `parent`.
    pub fn star(&self, scene: &mut Scene, parent: ElementId, point: &Point) -> ElementId {
        let id = scene.create(ElementKind::Star, &point.id);
        let center = self.center(point);
        if let Some(a) = scene.attrs_mut(id) {
            a.cx = center.x;
            a.cy = center.y;
            a.r = resolved_radius(point);
        }
        restyle_star(scene, id, point.kind);
        scene.append(parent, id);
        id
    }

    /// Create a connection element under `parent`.
    ///
    /// Connections whose endpoints are missing from `snapshot` are skipped with a warning.
    pub fn line(
        &self,
        scene: &mut Scene,
        parent: ElementId,
        snapshot: &Snapshot,
        connection: &Connection,
    ) -> Option<ElementId> {
        let Some(path) = self.connector_for(snapshot, connection) else {
            tracing::warn!(
                connection = %connection.id,
                from = %connection.from,
                to = %connection.to,
                "skipping connection with missing endpoint"
            );
            return None;
        };
        let id = scene.create(ElementKind::Line, &connection.id);
        if let Some(a) = scene.attrs_mut(id) {
            a.path = Some(path);
            a.stroke_width = self.layout.stroke_width;
        }
        restyle_line(scene, id, connection);
        scene.append(parent, id);
        Some(id)
    }

    /// Create the ripple decorations of an origin point, painted beneath `star`.
    pub fn ripples(
        &self,
        scene: &mut Scene,
        parent: ElementId,
        star: ElementId,
        point: &Point,
        count: u32,
        stagger: Seconds,
    ) -> Vec<ElementId> {
        let center = self.center(point);
        let style = point_style(PointKind::Origin);
        (0..count)
            .map(|i| {
                let id = scene.create(ElementKind::Ripple, &point.id);
                if let Some(a) = scene.attrs_mut(id) {
                    a.cx = center.x;
                    a.cy = center.y;
                    a.r = resolved_radius(point);
                    a.stroke = Some(style.fill.to_owned());
                    a.stroke_width = 1.0;
                    a.class = Some("ripple".to_owned());
                    a.animation_delay = Some(f64::from(i) * stagger);
                }
                scene.insert_before(parent, id, star);
                id
            })
            .collect()
    }

    /// Create an empty caption box beside `point`.
    pub fn caption(&self, scene: &mut Scene, parent: ElementId, point: &Point) -> ElementId {
        let id = scene.create(ElementKind::Message, &point.id);
        self.place_caption(scene, id, point);
        if let Some(a) = scene.attrs_mut(id) {
            a.class = Some("constellation-message".to_owned());
        }
        scene.append(parent, id);
        id
    }

    /// Move a caption box next to `point`.
    pub fn place_caption(&self, scene: &mut Scene, id: ElementId, point: &Point) {
        let rect = self.layout.caption.caption_rect(self.center(point));
        if let Some(a) = scene.attrs_mut(id) {
            a.x = rect.x0;
            a.y = rect.y0;
            a.width = rect.width();
            a.height = rect.height();
        }
    }

    /// Create an annotation card anchored in `snapshot`.
    ///
    /// Annotations whose anchor point is missing are skipped with a warning.
    pub fn card(
        &self,
        scene: &mut Scene,
        parent: ElementId,
        snapshot: &Snapshot,
        annotation: &Annotation,
    ) -> Option<ElementId> {
        let Some(anchor) = snapshot.point(&annotation.anchor_point) else {
            tracing::warn!(
                annotation = %annotation.id,
                anchor = %annotation.anchor_point,
                "skipping annotation with missing anchor point"
            );
            return None;
        };
        let id = scene.create(ElementKind::Label, &annotation.id);
        self.place_card(scene, id, anchor, annotation);
        fill_card(scene, id, annotation);
        scene.append(parent, id);
        Some(id)
    }

    /// Card box origin for `annotation` anchored at `anchor`.
    pub fn card_origin(&self, anchor: &Point, annotation: &Annotation) -> CanvasPoint {
        self.layout
            .card
            .card_rect(self.center(anchor), annotation.placement)
            .origin()
    }

    /// Move a card next to `anchor`.
    pub fn place_card(
        &self,
        scene: &mut Scene,
        id: ElementId,
        anchor: &Point,
        annotation: &Annotation,
    ) {
        let rect = self
            .layout
            .card
            .card_rect(self.center(anchor), annotation.placement);
        if let Some(a) = scene.attrs_mut(id) {
            a.x = rect.x0;
            a.y = rect.y0;
            a.width = rect.width();
            a.height = rect.height();
        }
    }
}

/// Apply the per-kind paint of a point.
pub fn restyle_star(scene: &mut Scene, id: ElementId, kind: PointKind) {
    let style = point_style(kind);
    if let Some(a) = scene.attrs_mut(id) {
        a.fill = Some(style.fill.to_owned());
        a.glow = Some(style.glow.to_owned());
        a.class = Some(format!("star star--{}", kind.as_str()));
    }
}

/// Apply the per-kind stroke and resting opacity of a connection.
pub fn restyle_line(scene: &mut Scene, id: ElementId, connection: &Connection) {
    let style = connection_style(connection.kind);
    if let Some(a) = scene.attrs_mut(id) {
        a.stroke = Some(style.stroke.to_owned());
        a.opacity = style.opacity;
        a.class = Some(format!(
            "constellation-line constellation-line--{}",
            connection.kind.as_str()
        ));
    }
}

/// Write the text content of an annotation card.
pub fn fill_card(scene: &mut Scene, id: ElementId, annotation: &Annotation) {
    if let Some(a) = scene.attrs_mut(id) {
        a.class = Some(format!(
            "constellation-label inline-card inline-card--{}",
            annotation.category.as_str()
        ));
        a.card = Some(Card {
            category: annotation.category.as_str().to_owned(),
            icon: annotation_icon(annotation.category).to_owned(),
            title: annotation.title.clone(),
            body: annotation.body.clone(),
        });
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/elements.rs"]
mod tests;
