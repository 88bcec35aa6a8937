use std::collections::{HashMap, HashSet};

use crate::model::snapshot::{Annotation, Connection, Point, Snapshot};

/// Entities compared by a stable string key.
pub trait Keyed {
    /// Identity key.
    fn key(&self) -> &str;
}

impl Keyed for Point {
    fn key(&self) -> &str {
        &self.id
    }
}

impl Keyed for Connection {
    fn key(&self) -> &str {
        &self.id
    }
}

impl Keyed for Annotation {
    fn key(&self) -> &str {
        &self.id
    }
}

/// Classification of two entity lists by key.
#[derive(Clone, Debug, PartialEq)]
pub struct Diff<'a, T> {
    /// Target items absent from current, in target order.
    pub to_add: Vec<&'a T>,
    /// Current items absent from target, in current order.
    pub to_remove: Vec<&'a T>,
    /// Target items present in both, in target order.
    pub to_keep: Vec<&'a T>,
}

impl<T> Diff<'_, T> {
    /// `true` when nothing is added or removed.
    pub fn is_structurally_unchanged(&self) -> bool {
        self.to_add.is_empty() && self.to_remove.is_empty()
    }
}

/// Total keyed diff of `current` against `target`.
pub fn diff_items<'a, T: Keyed>(current: &'a [T], target: &'a [T]) -> Diff<'a, T> {
    let current_keys: HashSet<&str> = current.iter().map(|item| item.key()).collect();
    let target_keys: HashSet<&str> = target.iter().map(|item| item.key()).collect();

    Diff {
        to_add: target
            .iter()
            .filter(|item| !current_keys.contains(item.key()))
            .collect(),
        to_remove: current
            .iter()
            .filter(|item| !target_keys.contains(item.key()))
            .collect(),
        to_keep: target
            .iter()
            .filter(|item| current_keys.contains(item.key()))
            .collect(),
    }
}

/// A connection kept across the transition, with both of its versions.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct KeptConnection<'a> {
    /// Version currently rendered.
    pub current: &'a Connection,
    /// Version in the target snapshot.
    pub target: &'a Connection,
}

/// Connection diff where kept ids with changed endpoints become remove + add.
#[derive(Clone, Debug, PartialEq)]
pub struct ConnectionDiff<'a> {
    /// Connections to create (including re-created ones).
    pub to_add: Vec<&'a Connection>,
    /// Connections to destroy (including old versions of re-created ones).
    pub to_remove: Vec<&'a Connection>,
    /// Connections kept with the same endpoints.
    pub to_keep: Vec<KeptConnection<'a>>,
    /// Ids that were kept by key but had their endpoints changed.
    pub rewired: Vec<&'a str>,
}

/// Diff connections, reclassifying endpoint changes as destruction plus creation.
pub fn diff_connections<'a>(
    current: &'a [Connection],
    target: &'a [Connection],
) -> ConnectionDiff<'a> {
    let base = diff_items(current, target);
    let by_id: HashMap<&str, &Connection> = current.iter().map(|c| (c.id.as_str(), c)).collect();

    let mut out = ConnectionDiff {
        to_add: base.to_add,
        to_remove: base.to_remove,
        to_keep: Vec::with_capacity(base.to_keep.len()),
        rewired: Vec::new(),
    };

    for target_conn in base.to_keep {
        let Some(current_conn) = by_id.get(target_conn.id.as_str()).copied() else {
            continue;
        };
        if current_conn.same_endpoints(target_conn) {
            out.to_keep.push(KeptConnection {
                current: current_conn,
                target: target_conn,
            });
        } else {
            out.to_remove.push(current_conn);
            out.to_add.push(target_conn);
            out.rewired.push(target_conn.id.as_str());
        }
    }
    out
}

/// A point kept across the transition, with both of its versions.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct KeptPoint<'a> {
    /// Version currently rendered.
    pub current: &'a Point,
    /// Version in the target snapshot.
    pub target: &'a Point,
}

impl KeptPoint<'_> {
    /// Normalized coordinates changed.
    pub fn moved(&self) -> bool {
        !self.current.same_position(self.target)
    }

    /// Visual kind changed.
    pub fn kind_changed(&self) -> bool {
        self.current.kind != self.target.kind
    }
}

/// A kept annotation with both of its versions.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct KeptAnnotation<'a> {
    /// Version currently rendered.
    pub current: &'a Annotation,
    /// Version in the target snapshot.
    pub target: &'a Annotation,
}

/// Full structural difference between two snapshots.
#[derive(Clone, Debug, PartialEq)]
pub struct SnapshotDiff<'a> {
    /// Points to create.
    pub points_to_add: Vec<&'a Point>,
    /// Points to destroy.
    pub points_to_remove: Vec<&'a Point>,
    /// Points present on both sides.
    pub points_to_keep: Vec<KeptPoint<'a>>,
    /// Connection classification.
    pub connections: ConnectionDiff<'a>,
    /// Annotations to create.
    pub annotations_to_add: Vec<&'a Annotation>,
    /// Annotations to destroy.
    pub annotations_to_remove: Vec<&'a Annotation>,
    /// Annotations present on both sides.
    pub annotations_to_keep: Vec<KeptAnnotation<'a>>,
}

impl<'a> SnapshotDiff<'a> {
    /// Diff every entity type of `current` against `target`.
    pub fn between(current: &'a Snapshot, target: &'a Snapshot) -> Self {
        let points = diff_items(&current.points, &target.points);
        let annotations = diff_items(&current.annotations, &target.annotations);

        let points_to_keep = points
            .to_keep
            .iter()
            .filter_map(|t| {
                current.point(&t.id).map(|c| KeptPoint {
                    current: c,
                    target: t,
                })
            })
            .collect();
        let annotations_to_keep = annotations
            .to_keep
            .iter()
            .filter_map(|t| {
                current.annotation(&t.id).map(|c| KeptAnnotation {
                    current: c,
                    target: t,
                })
            })
            .collect();

        Self {
            points_to_add: points.to_add,
            points_to_remove: points.to_remove,
            points_to_keep,
            connections: diff_connections(&current.connections, &target.connections),
            annotations_to_add: annotations.to_add,
            annotations_to_remove: annotations.to_remove,
            annotations_to_keep,
        }
    }

    /// `true` when no entity is added or removed.
    pub fn is_structurally_unchanged(&self) -> bool {
        self.points_to_add.is_empty()
            && self.points_to_remove.is_empty()
            && self.connections.to_add.is_empty()
            && self.connections.to_remove.is_empty()
            && self.annotations_to_add.is_empty()
            && self.annotations_to_remove.is_empty()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/diff/items.rs"]
mod tests;
