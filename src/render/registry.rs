use std::collections::HashMap;

use crate::{
    model::snapshot::Snapshot,
    render::scene::{ElementId, Scene},
};

/// Layer names the engine binds to or creates.
pub const STARS_LAYER: &str = "constellation-stars";
/// Connections layer.
pub const LINES_LAYER: &str = "constellation-lines";
/// Annotation cards layer, created on demand.
pub const LABELS_LAYER: &str = "constellation-labels";
/// Point captions layer, created on demand.
pub const MESSAGES_LAYER: &str = "constellation-messages";

/// Container surfaces resolved at init.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Surfaces {
    /// Scene root; the mirrored-copy group is attached here.
    pub root: ElementId,
    /// Points.
    pub stars: ElementId,
    /// Connections.
    pub lines: ElementId,
    /// Annotation cards.
    pub labels: ElementId,
    /// Point captions.
    pub messages: ElementId,
}

impl Surfaces {
    /// Bind to the stars and lines layers, creating the label and caption layers when absent.
    ///
    /// Returns `None` when a required layer is missing.
    pub fn bind(scene: &mut Scene) -> Option<Self> {
        let stars = scene.layer(STARS_LAYER)?;
        let lines = scene.layer(LINES_LAYER)?;
        let labels = scene
            .layer(LABELS_LAYER)
            .unwrap_or_else(|| scene.add_layer(LABELS_LAYER));
        let messages = scene
            .layer(MESSAGES_LAYER)
            .unwrap_or_else(|| scene.add_layer(MESSAGES_LAYER));
        Some(Self {
            root: scene.root(),
            stars,
            lines,
            labels,
            messages,
        })
    }
}

/// Live id→element mappings and the snapshot they currently render.
///
/// Owned by the engine; only the scheduler mutates it, after the timeline for a transition
/// has been built.
#[derive(Clone, Debug, Default)]
pub struct LiveRender {
    /// Snapshot the scene converges to once the running timeline settles.
    pub snapshot: Snapshot,
    /// Point id → star element.
    pub points: HashMap<String, ElementId>,
    /// Connection id → line element.
    pub connections: HashMap<String, ElementId>,
    /// Annotation id → card element.
    pub annotations: HashMap<String, ElementId>,
    /// Point id → caption element.
    pub captions: HashMap<String, ElementId>,
    /// Point id → ripple decorations.
    pub ripples: HashMap<String, Vec<ElementId>>,
    /// Mirrored-copy group container, when one is shown.
    pub remote_group: Option<ElementId>,
}

/// Handles owned by one point.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PointHandles {
    /// Star element.
    pub star: Option<ElementId>,
    /// Caption element.
    pub caption: Option<ElementId>,
    /// Ripple decorations.
    pub ripples: Vec<ElementId>,
}

impl LiveRender {
    /// Drop every mapping of a point and hand back its elements.
    pub fn forget_point(&mut self, id: &str) -> PointHandles {
        PointHandles {
            star: self.points.remove(id),
            caption: self.captions.remove(id),
            ripples: self.ripples.remove(id).unwrap_or_default(),
        }
    }

    /// Drop the mappings of every mirrored member of `shown` and the group handle.
    pub fn forget_remote(&mut self, shown: &Snapshot) -> Option<ElementId> {
        for p in shown.points.iter().filter(|p| p.is_mirrored()) {
            self.points.remove(&p.id);
        }
        for c in shown.connections.iter().filter(|c| c.is_mirrored()) {
            self.connections.remove(&c.id);
        }
        self.remote_group.take()
    }

    /// Every element handle held, group included.
    pub fn handles(&self) -> Vec<ElementId> {
        let mut out: Vec<ElementId> = self
            .points
            .values()
            .chain(self.connections.values())
            .chain(self.annotations.values())
            .chain(self.captions.values())
            .chain(self.ripples.values().flatten())
            .copied()
            .collect();
        out.extend(self.remote_group);
        out
    }

    /// Reset to an empty render of the empty snapshot.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/registry.rs"]
mod tests;
