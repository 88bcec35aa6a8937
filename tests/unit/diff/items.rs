use super::*;
use crate::model::snapshot::{ConnectionKind, PointKind};

fn p(id: &str, x: f64, y: f64) -> Point {
    Point::new(id, x, y, PointKind::Primary)
}

fn c(id: &str, from: &str, to: &str) -> Connection {
    Connection::new(id, from, to, ConnectionKind::Primary)
}

fn ids<T: Keyed>(items: &[&T]) -> Vec<String> {
    items.iter().map(|i| i.key().to_string()).collect()
}

#[test]
fn classifies_added_removed_and_kept() {
    let current = vec![p("a", 0.0, 0.0), p("b", 0.0, 1.0)];
    let target = vec![p("b", 0.0, 1.0), p("c", 0.0, 2.0)];
    let d = diff_items(&current, &target);
    assert_eq!(ids(&d.to_add), vec!["c"]);
    assert_eq!(ids(&d.to_remove), vec!["a"]);
    assert_eq!(ids(&d.to_keep), vec!["b"]);
}

#[test]
fn diff_against_itself_keeps_everything() {
    let snapshot = Snapshot::new(
        vec![p("a", 0.0, 0.0), p("b", 0.0, 1.0)],
        vec![c("l1", "a", "b")],
        vec![],
    );
    let d = SnapshotDiff::between(&snapshot, &snapshot);
    assert!(d.is_structurally_unchanged());
    assert_eq!(d.points_to_keep.len(), 2);
    assert_eq!(d.connections.to_keep.len(), 1);
    assert!(d.points_to_keep.iter().all(|k| !k.moved() && !k.kind_changed()));
}

#[test]
fn unchanged_connections_are_never_add_and_remove() {
    let current = vec![c("l1", "a", "b"), c("l2", "b", "c")];
    let target = vec![c("l1", "a", "b"), c("l2", "b", "c"), c("l3", "c", "d")];
    let d = diff_connections(&current, &target);
    assert_eq!(ids(&d.to_add), vec!["l3"]);
    assert!(d.to_remove.is_empty());
    assert_eq!(d.to_keep.len(), 2);
    assert!(d.rewired.is_empty());
}

#[test]
fn endpoint_change_becomes_remove_plus_add() {
    let current = vec![c("l1", "a", "b")];
    let target = vec![c("l1", "a", "c")];
    let d = diff_connections(&current, &target);
    assert!(d.to_keep.is_empty());
    assert_eq!(d.to_remove.len(), 1);
    assert_eq!(d.to_remove[0].to, "b");
    assert_eq!(d.to_add.len(), 1);
    assert_eq!(d.to_add[0].to, "c");
    assert_eq!(d.rewired, vec!["l1"]);
}

#[test]
fn reversed_direction_is_an_endpoint_change() {
    let current = [c("l1", "a", "b")];
    let target = [c("l1", "b", "a")];
    let d = diff_connections(&current, &target);
    assert_eq!(d.rewired, vec!["l1"]);
}

#[test]
fn kept_points_report_moves_and_kind_changes() {
    let current = Snapshot::new(
        vec![Point::new("o", 70.0, 76.0, PointKind::Origin)],
        vec![],
        vec![],
    );
    let target = Snapshot::new(vec![p("o", 70.0, 60.0)], vec![], vec![]);
    let d = SnapshotDiff::between(&current, &target);
    let kept = d.points_to_keep[0];
    assert!(kept.moved());
    assert!(kept.kind_changed());
}
