use super::*;
use crate::{
    foundation::core::Canvas,
    model::snapshot::{AnnotationCategory, ConnectionKind, Placement},
};

fn factory() -> ElementFactory {
    ElementFactory::new(
        Projection::new(Canvas::new(1000, 1000).unwrap()),
        LayoutConfig::default(),
    )
}

fn snapshot() -> Snapshot {
    Snapshot::new(
        vec![
            Point::new("a", 50.0, 80.0, PointKind::Primary),
            Point::new("b", 60.0, 70.0, PointKind::Origin).with_caption("init"),
        ],
        vec![Connection::new("l1", "a", "b", ConnectionKind::Side)],
        vec![Annotation::new(
            "n1",
            "b",
            Placement::Right,
            AnnotationCategory::OpenIssue,
            "Issue",
            "Body",
        )],
    )
}

#[test]
fn star_is_projected_and_styled() {
    let mut scene = Scene::with_layers(&["stars"]);
    let layer = scene.layer("stars").unwrap();
    let snap = snapshot();
    let id = factory().star(&mut scene, layer, &snap.points[1]);
    let a = scene.attrs(id).unwrap();
    assert_eq!((a.cx, a.cy, a.r), (600.0, 700.0, 10.0));
    assert_eq!(a.class.as_deref(), Some("star star--origin"));
    assert_eq!(scene.get(id).unwrap().data_id, "b");
}

#[test]
fn line_uses_metro_connector_and_kind_opacity() {
    let mut scene = Scene::with_layers(&["lines"]);
    let layer = scene.layer("lines").unwrap();
    let snap = snapshot();
    let id = factory()
        .line(&mut scene, layer, &snap, &snap.connections[0])
        .unwrap();
    let a = scene.attrs(id).unwrap();
    let path = a.path.unwrap();
    assert_eq!(path.ctrl, Some(CanvasPoint::new(600.0, 800.0)));
    assert_eq!(a.opacity, 0.4);
    assert_eq!(a.stroke_width, 2.5);
}

#[test]
fn dangling_line_and_card_are_skipped() {
    let mut scene = Scene::with_layers(&["lines"]);
    let layer = scene.layer("lines").unwrap();
    let snap = snapshot();
    let f = factory();
    let dangling = Connection::new("lx", "a", "zz", ConnectionKind::Primary);
    assert!(f.line(&mut scene, layer, &snap, &dangling).is_none());
    let orphan = Annotation::new(
        "nx",
        "zz",
        Placement::Top,
        AnnotationCategory::MergedChange,
        "t",
        "b",
    );
    assert!(f.card(&mut scene, layer, &snap, &orphan).is_none());
    assert!(scene.children(layer).is_empty());
}

#[test]
fn ripples_sit_beneath_their_star_with_staggered_delay() {
    let mut scene = Scene::with_layers(&["stars"]);
    let layer = scene.layer("stars").unwrap();
    let snap = snapshot();
    let f = factory();
    let star = f.star(&mut scene, layer, &snap.points[1]);
    let ripples = f.ripples(&mut scene, layer, star, &snap.points[1], 2, 1.0);
    assert_eq!(scene.children(layer), &[ripples[0], ripples[1], star]);
    assert_eq!(scene.attrs(ripples[1]).unwrap().animation_delay, Some(1.0));
}

#[test]
fn caption_and_card_boxes_follow_layout() {
    let mut scene = Scene::with_layers(&["labels"]);
    let layer = scene.layer("labels").unwrap();
    let snap = snapshot();
    let f = factory();
    let caption = f.caption(&mut scene, layer, &snap.points[1]);
    let a = scene.attrs(caption).unwrap();
    assert_eq!((a.x, a.y, a.width, a.height), (620.0, 690.0, 200.0, 20.0));
    assert!(a.text.is_empty());

    let card = f
        .card(&mut scene, layer, &snap, &snap.annotations[0])
        .unwrap();
    let a = scene.attrs(card).unwrap();
    assert_eq!((a.x, a.y), (620.0, 660.0));
    assert_eq!(a.card.as_ref().unwrap().icon, "ph-fill ph-circle");
}
