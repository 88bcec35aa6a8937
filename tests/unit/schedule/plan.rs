use super::*;
use crate::{
    animation::{
        motion::{Animated, Instant},
        player::TimelinePlayer,
        timeline::Prop,
    },
    geometry::projection::Projection,
    model::snapshot::{Connection, ConnectionKind, Point, PointKind},
    render::{
        registry::{LINES_LAYER, STARS_LAYER},
        scene::ElementKind,
    },
};

struct Rig {
    scene: Scene,
    live: LiveRender,
    surfaces: Surfaces,
    factory: ElementFactory,
    config: EngineConfig,
}

impl Rig {
    fn new(config: EngineConfig) -> Self {
        let mut scene = Scene::with_layers(&[LINES_LAYER, STARS_LAYER]);
        let surfaces = Surfaces::bind(&mut scene).unwrap();
        let factory = ElementFactory::new(Projection::new(config.view_box), config.layout.clone());
        Self {
            scene,
            live: LiveRender::default(),
            surfaces,
            factory,
            config,
        }
    }

    fn plan(&mut self, motion: &dyn Motion, target: &Snapshot) -> (Timeline, TransitionReport) {
        let planner = TransitionPlanner {
            motion,
            factory: &self.factory,
            config: &self.config,
            surfaces: self.surfaces,
        };
        planner.plan("test", target, &mut self.live, &mut self.scene)
    }

    fn settle(&mut self, motion: &dyn Motion, target: &Snapshot) -> TransitionReport {
        let (timeline, report) = self.plan(motion, target);
        TimelinePlayer::new(timeline).finish(&mut self.scene);
        report
    }
}

fn chain() -> Snapshot {
    Snapshot::new(
        vec![
            Point::new("p1", 70.0, 80.0, PointKind::Primary),
            Point::new("p2", 70.0, 70.0, PointKind::Primary),
            Point::new("p3", 70.0, 60.0, PointKind::Primary),
            Point::new("p4", 70.0, 50.0, PointKind::Primary).with_caption("tip"),
        ],
        vec![
            Connection::new("c1", "p1", "p2", ConnectionKind::Primary),
            Connection::new("c2", "p2", "p3", ConnectionKind::Primary),
            Connection::new("c3", "p3", "p4", ConnectionKind::Primary),
        ],
        vec![],
    )
}

#[test]
fn linear_growth_orders_point_tweens() {
    let mut rig = Rig::new(EngineConfig::default());
    let (timeline, report) = rig.plan(&Animated, &chain());

    assert_eq!(report.added_points.len(), 4);
    assert!(report.cycle.is_none());
    let appear = |id: &str| {
        let el = rig.live.points[id];
        timeline
            .tweens_for(el)
            .find(|(_, t)| t.animates(Prop::R))
            .map(|(at, _)| at)
            .unwrap()
    };
    assert!((appear("p1") - 0.3).abs() < 1e-9);
    assert!(appear("p2") < appear("p3"));
    assert!(appear("p3") < appear("p4"));

    for id in ["c1", "c2", "c3"] {
        let line = rig.live.connections[id];
        let (at, _) = timeline
            .tweens_for(line)
            .find(|(_, t)| t.animates(Prop::DashOffset))
            .unwrap();
        assert_eq!(at, report.appearance.connections[id].start);
    }
    assert_eq!(timeline.calls().count(), "tip".len());
}

#[test]
fn replanning_the_same_snapshot_is_a_noop() {
    let mut rig = Rig::new(EngineConfig::default());
    rig.settle(&Animated, &chain());
    let (timeline, report) = rig.plan(&Animated, &chain());
    assert!(report.is_structurally_unchanged());
    assert!(timeline.is_empty());
    assert_eq!(rig.scene.count_kind(ElementKind::Star), 4);
}

#[test]
fn rewired_connection_is_replaced() {
    let mut rig = Rig::new(EngineConfig::default());
    rig.settle(&Animated, &chain());
    let old = rig.live.connections["c3"];

    let mut next = chain();
    next.connections[2] = Connection::new("c3", "p2", "p4", ConnectionKind::Side);
    let report = rig.settle(&Animated, &next);

    assert_eq!(report.rewired_connections, vec!["c3".to_owned()]);
    assert!(report.removed_connections.contains(&"c3".to_owned()));
    assert!(report.added_connections.contains(&"c3".to_owned()));
    assert!(!rig.scene.contains(old));
    assert!(rig.scene.contains(rig.live.connections["c3"]));
}

#[test]
fn reduced_motion_applies_final_state_without_tweens() {
    let mut rig = Rig::new(EngineConfig::default());
    rig.settle(&Instant, &chain());

    let mut next = chain();
    next.points.remove(0);
    next.connections.remove(0);
    next.points[0].x = 75.0;
    next.points.push(Point::new("p5", 75.0, 40.0, PointKind::Origin));
    next.connections
        .push(Connection::new("c4", "p4", "p5", ConnectionKind::Side));

    let (timeline, _) = rig.plan(&Instant, &next);
    assert_eq!(timeline.tween_count(), 0);
    assert!(timeline.is_empty());
    assert_eq!(rig.scene.count_kind(ElementKind::Star), 4);
    assert_eq!(rig.scene.count_kind(ElementKind::Line), 3);
    assert_eq!(rig.scene.count_kind(ElementKind::Ripple), 0);
    let moved = rig.live.points["p2"];
    assert_eq!(rig.scene.attrs(moved).unwrap().cx, 0.75 * 1920.0);
    let caption = rig.live.captions["p4"];
    assert_eq!(rig.scene.attrs(caption).unwrap().text, "tip");
    let p5 = rig.live.points["p5"];
    assert_eq!(rig.scene.attrs(p5).unwrap().r, 10.0);
}

#[test]
fn cycle_policy_controls_unordered_connections() {
    let looped = Snapshot::new(
        vec![
            Point::new("x", 70.0, 80.0, PointKind::Primary),
            Point::new("y", 75.0, 70.0, PointKind::Side),
        ],
        vec![
            Connection::new("xy", "x", "y", ConnectionKind::Side),
            Connection::new("yx", "y", "x", ConnectionKind::Union),
        ],
        vec![],
    );

    let mut rig = Rig::new(EngineConfig::default());
    let report = rig.settle(&Animated, &looped);
    assert_eq!(
        report.cycle.map(|c| c.connections),
        Some(vec!["xy".to_owned(), "yx".to_owned()])
    );
    assert_eq!(rig.scene.count_kind(ElementKind::Line), 2);
    assert!(report.skipped.is_empty());

    let mut rig = Rig::new(EngineConfig {
        cycle_policy: CyclePolicy::Skip,
        ..EngineConfig::default()
    });
    let report = rig.settle(&Animated, &looped);
    assert_eq!(rig.scene.count_kind(ElementKind::Line), 0);
    assert_eq!(report.skipped, vec!["xy".to_owned(), "yx".to_owned()]);
    assert_eq!(rig.scene.count_kind(ElementKind::Star), 2);
}

#[test]
fn dangling_connection_is_skipped_not_fatal() {
    let mut rig = Rig::new(EngineConfig::default());
    let mut snap = chain();
    snap.connections
        .push(Connection::new("ghost", "p4", "nowhere", ConnectionKind::Primary));
    let report = rig.settle(&Animated, &snap);
    assert_eq!(report.skipped, vec!["ghost".to_owned()]);
    assert_eq!(rig.scene.count_kind(ElementKind::Line), 3);
}

#[test]
fn kind_change_to_origin_spawns_ripples_and_back_retracts() {
    let mut rig = Rig::new(EngineConfig::default());
    rig.settle(&Animated, &chain());

    let mut hero = chain();
    hero.points[3].kind = PointKind::Origin;
    let (timeline, _) = rig.plan(&Animated, &hero);
    assert_eq!(rig.scene.count_kind(ElementKind::Ripple), 2);
    let star = rig.live.points["p4"];
    assert!(timeline.tweens_for(star).any(|(_, t)| t.animates(Prop::R)));
    TimelinePlayer::new(timeline).finish(&mut rig.scene);
    assert_eq!(rig.scene.attrs(star).unwrap().r, 10.0);

    rig.settle(&Animated, &chain());
    assert_eq!(rig.scene.count_kind(ElementKind::Ripple), 0);
    assert!(rig.live.ripples.is_empty());
}
