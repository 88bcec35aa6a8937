use super::*;
use crate::{
    model::snapshot::{Connection, ConnectionKind, Point, PointKind},
    render::scene::ElementKind,
};

fn chapters() -> ChapterSet {
    let one = Snapshot::new(
        vec![
            Point::new("a", 50.0, 80.0, PointKind::Primary),
            Point::new("b", 50.0, 70.0, PointKind::Primary).with_caption("second"),
        ],
        vec![Connection::new("ab", "a", "b", ConnectionKind::Primary)],
        vec![],
    );
    let mut two = one.clone();
    two.points.push(Point::new("c", 60.0, 60.0, PointKind::Side));
    two.connections
        .push(Connection::new("bc", "b", "c", ConnectionKind::Side));
    ChapterSet::new([("one".to_owned(), one), ("two".to_owned(), two)]).unwrap()
}

fn engine(preference: MotionPreference) -> Constellation {
    let scene = Scene::with_layers(&[LINES_LAYER, STARS_LAYER]);
    let mut engine =
        Constellation::new(EngineConfig::default(), chapters(), scene, preference).unwrap();
    assert_eq!(engine.init(), InitOutcome::Ready);
    engine
}

#[test]
fn init_fails_soft_without_containers() {
    let mut engine = Constellation::new(
        EngineConfig::default(),
        chapters(),
        Scene::with_layers(&[STARS_LAYER]),
        MotionPreference::Full,
    )
    .unwrap();
    assert_eq!(engine.init(), InitOutcome::MissingSurface(LINES_LAYER));
    assert!(!engine.is_initialized());
    assert_eq!(engine.transition_to("one"), TransitionOutcome::NotInitialized);
}

#[test]
fn unknown_chapter_is_a_noop() {
    let mut engine = engine(MotionPreference::Full);
    assert_eq!(engine.transition_to("missing"), TransitionOutcome::UnknownChapter);
    assert!(engine.snapshot().is_empty());
    assert_eq!(engine.state(), &EngineState::Idle);
}

#[test]
fn tick_plays_until_idle() {
    let mut engine = engine(MotionPreference::Full);
    let outcome = engine.transition_to("one");
    let duration = outcome.report().unwrap().duration;
    assert!(duration > 0.0);
    assert!(matches!(engine.state(), EngineState::Transitioning { chapter } if chapter == "one"));

    let mut elapsed = 0.0;
    while engine.state() != &EngineState::Idle {
        engine.tick(1.0 / 60.0);
        elapsed += 1.0 / 60.0;
        assert!(elapsed < duration + 1.0);
    }
    let caption = engine.scene().find_by_data_id(ElementKind::Message, "b").unwrap();
    assert_eq!(engine.scene().attrs(caption).unwrap().text, "second");
    assert!(engine.timeline().is_none());
}

#[test]
fn new_transition_finishes_the_one_in_flight() {
    let mut engine = engine(MotionPreference::Full);
    engine.transition_to("one");
    engine.tick(0.1);
    engine.transition_to("two");
    let a = engine.scene().find_by_data_id(ElementKind::Star, "a").unwrap();
    assert_eq!(engine.scene().attrs(a).unwrap().r, 8.0);
    assert_eq!(engine.scene().attrs(a).unwrap().opacity, 1.0);
    let caption = engine.scene().find_by_data_id(ElementKind::Message, "b").unwrap();
    assert_eq!(engine.scene().attrs(caption).unwrap().text, "second");
}

#[test]
fn reduced_motion_never_schedules() {
    let mut engine = engine(MotionPreference::Reduced);
    engine.transition_to("one");
    assert_eq!(engine.state(), &EngineState::Idle);
    engine.transition_to("two");
    assert!(engine.timeline().is_none());
    assert_eq!(engine.scene().count_kind(ElementKind::Star), 3);
}

#[test]
fn clear_detaches_everything() {
    let mut engine = engine(MotionPreference::Full);
    engine.transition_to("two");
    engine.clear();
    assert!(engine.snapshot().is_empty());
    for kind in [ElementKind::Star, ElementKind::Line, ElementKind::Message] {
        assert_eq!(engine.scene().count_kind(kind), 0);
    }
    assert_eq!(engine.scene().count_kind(ElementKind::Layer), 4);
}

#[test]
fn resize_reprojects_without_touching_the_snapshot() {
    let mut engine = engine(MotionPreference::Full);
    engine.transition_to("two");
    let before = engine.snapshot().clone();
    engine.resize(1000, 500).unwrap();
    assert_eq!(engine.snapshot(), &before);
    assert_eq!(engine.canvas(), Canvas::new(1000, 500).unwrap());

    let c = engine.scene().find_by_data_id(ElementKind::Star, "c").unwrap();
    let attrs = engine.scene().attrs(c).unwrap();
    assert_eq!((attrs.cx, attrs.cy), (600.0, 300.0));
    let line = engine.scene().find_by_data_id(ElementKind::Line, "bc").unwrap();
    let path = engine.scene().attrs(line).unwrap().path.unwrap();
    assert_eq!(path.to.x, 600.0);
    assert!(engine.resize(0, 10).is_err());
}

#[test]
fn hover_highlights_touching_connections() {
    let mut engine = engine(MotionPreference::Full);
    engine.transition_to("two");
    engine.finish();
    assert_eq!(engine.hover_point("b"), 2);
    let ab = engine.scene().find_by_data_id(ElementKind::Line, "ab").unwrap();
    assert_eq!(engine.scene().effective_opacity(ab), Some(0.8));
    assert_eq!(engine.unhover_point("b"), 2);
    assert_eq!(engine.scene().effective_opacity(ab), Some(0.5));
    assert_eq!(engine.hover_point("c"), 1);
    assert_eq!(engine.hover_point("nobody"), 0);
}
