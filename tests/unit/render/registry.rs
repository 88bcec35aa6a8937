use super::*;
use crate::model::snapshot::{Connection, ConnectionKind, Point, PointKind};

#[test]
fn bind_requires_stars_and_lines() {
    let mut scene = Scene::with_layers(&[STARS_LAYER]);
    assert!(Surfaces::bind(&mut scene).is_none());

    let mut scene = Scene::with_layers(&[STARS_LAYER, LINES_LAYER]);
    let surfaces = Surfaces::bind(&mut scene).unwrap();
    assert_eq!(scene.layer(LABELS_LAYER), Some(surfaces.labels));
    assert_eq!(scene.layer(MESSAGES_LAYER), Some(surfaces.messages));

    let again = Surfaces::bind(&mut scene).unwrap();
    assert_eq!(again, surfaces);
}

#[test]
fn forget_remote_clears_mirrored_members_only() {
    let shown = Snapshot::new(
        vec![
            Point::new("c1", 70.0, 60.0, PointKind::Primary),
            Point::new("r-c1", 82.0, 60.0, PointKind::Mirrored),
        ],
        vec![Connection::new("r-l1", "r-c1", "r-c1", ConnectionKind::Mirrored)],
        vec![],
    );
    let mut live = LiveRender::default();
    live.points.insert("c1".into(), ElementId(1));
    live.points.insert("r-c1".into(), ElementId(2));
    live.connections.insert("r-l1".into(), ElementId(3));
    live.remote_group = Some(ElementId(4));

    assert_eq!(live.forget_remote(&shown), Some(ElementId(4)));
    assert_eq!(live.points.len(), 1);
    assert!(live.connections.is_empty());
    assert!(live.remote_group.is_none());
}

#[test]
fn forget_point_returns_all_handles() {
    let mut live = LiveRender::default();
    live.points.insert("h".into(), ElementId(1));
    live.captions.insert("h".into(), ElementId(2));
    live.ripples.insert("h".into(), vec![ElementId(3), ElementId(4)]);
    let handles = live.forget_point("h");
    assert_eq!(handles.star, Some(ElementId(1)));
    assert_eq!(handles.caption, Some(ElementId(2)));
    assert_eq!(handles.ripples.len(), 2);
    assert!(live.handles().is_empty());
}
