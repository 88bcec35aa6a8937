use crate::{
    animation::{
        motion::{Animated, Instant, Motion},
        player::TimelinePlayer,
        timeline::{Action, Prop, Timeline, Value},
    },
    engine::config::EngineConfig,
    geometry::projection::Projection,
    model::snapshot::{Connection, ConnectionKind, Point, PointKind, Snapshot},
    render::{
        elements::ElementFactory,
        registry::{LINES_LAYER, LiveRender, STARS_LAYER, Surfaces},
        scene::{ElementKind, Scene},
    },
    schedule::plan::{RemoteChange, TransitionPlanner, TransitionReport},
};

struct Rig {
    scene: Scene,
    live: LiveRender,
    surfaces: Surfaces,
    factory: ElementFactory,
    config: EngineConfig,
}

impl Rig {
    fn new() -> Self {
        let config = EngineConfig::default();
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
        TransitionPlanner {
            motion,
            factory: &self.factory,
            config: &self.config,
            surfaces: self.surfaces,
        }
        .plan("test", target, &mut self.live, &mut self.scene)
    }
}

fn local() -> Snapshot {
    Snapshot::new(
        vec![
            Point::new("root", 70.0, 76.0, PointKind::Primary),
            Point::new("c1", 70.0, 69.0, PointKind::Primary),
            Point::new("c2", 70.0, 62.0, PointKind::Primary),
        ],
        vec![
            Connection::new("l1", "root", "c1", ConnectionKind::Primary),
            Connection::new("l2", "c1", "c2", ConnectionKind::Primary),
        ],
        vec![],
    )
}

fn with_remote() -> Snapshot {
    let mut snap = local();
    for (id, y) in [("r-root", 76.0), ("r-c1", 69.0), ("r-c2", 62.0)] {
        snap.points.push(Point::new(id, 82.0, y, PointKind::Mirrored));
    }
    snap.connections.push(Connection::new("r-l1", "r-root", "r-c1", ConnectionKind::Mirrored));
    snap.connections.push(Connection::new("r-l2", "r-c1", "r-c2", ConnectionKind::Mirrored));
    snap
}

#[test]
fn group_enters_as_one_rigid_tween_after_local_additions() {
    let mut rig = Rig::new();
    let (timeline, report) = rig.plan(&Animated, &with_remote());

    let group = rig.live.remote_group.unwrap();
    let RemoteChange::Entered { start, members } = report.remote else {
        panic!("expected the group to enter, got {:?}", report.remote);
    };
    assert_eq!(members, 5);
    let settled = report.appearance.latest_end(0.3);
    assert!((start - (settled.max(0.5) + 0.2)).abs() < 1e-9);

    let group_tweens: Vec<_> = timeline.tweens_for(group).collect();
    assert_eq!(group_tweens.len(), 1);
    let (at, tween) = group_tweens[0];
    assert_eq!(at, start);
    assert!(tween.animates(Prop::TranslateX) && tween.animates(Prop::Opacity));

    for id in ["r-root", "r-c1", "r-c2", "r-l1", "r-l2"] {
        let el = rig
            .live
            .points
            .get(id)
            .or_else(|| rig.live.connections.get(id))
            .copied()
            .unwrap();
        assert_eq!(rig.scene.get(el).unwrap().parent, Some(group));
        assert_eq!(timeline.tweens_for(el).count(), 0);
    }

    let offset = 12.0 / 100.0 * 1920.0;
    let tx = rig.scene.read(group, Prop::TranslateX).and_then(|v| v.as_num()).unwrap();
    assert!((tx + offset).abs() < 1e-9);
    TimelinePlayer::new(timeline).finish(&mut rig.scene);
    assert_eq!(rig.scene.read(group, Prop::TranslateX), Some(Value::Num(0.0)));
    assert_eq!(rig.scene.read(group, Prop::Opacity), Some(Value::Num(1.0)));
}

#[test]
fn group_withdraws_and_mappings_clear() {
    let mut rig = Rig::new();
    let (timeline, _) = rig.plan(&Animated, &with_remote());
    TimelinePlayer::new(timeline).finish(&mut rig.scene);
    let group = rig.live.remote_group.unwrap();

    let (timeline, report) = rig.plan(&Animated, &local());
    assert_eq!(report.remote, RemoteChange::Withdrawn);
    assert!(rig.live.remote_group.is_none());
    assert!(rig.live.points.keys().all(|id| !id.starts_with("r-")));
    assert!(rig.live.connections.keys().all(|id| !id.starts_with("r-")));

    let (at, tween) = timeline.tweens_for(group).next().unwrap();
    assert_eq!(at, 0.0);
    assert_eq!(tween.duration, 0.5);
    assert!(timeline.calls().any(|(at, a)| at == 0.5 && *a == Action::Detach(group)));

    TimelinePlayer::new(timeline).finish(&mut rig.scene);
    assert!(!rig.scene.contains(group));
    assert_eq!(rig.scene.count_kind(ElementKind::Star), 3);
}

#[test]
fn new_members_join_existing_group() {
    let mut rig = Rig::new();
    let (timeline, _) = rig.plan(&Animated, &with_remote());
    TimelinePlayer::new(timeline).finish(&mut rig.scene);
    let group = rig.live.remote_group.unwrap();

    let mut grown = with_remote();
    grown.points.push(Point::new("r-c3", 82.0, 55.0, PointKind::Mirrored));
    grown.connections.push(Connection::new("r-l3", "r-c2", "r-c3", ConnectionKind::Mirrored));
    let (timeline, report) = rig.plan(&Animated, &grown);

    assert_eq!(report.remote, RemoteChange::Extended { members: 2 });
    assert_eq!(rig.live.remote_group, Some(group));
    let star = rig.live.points["r-c3"];
    assert_eq!(rig.scene.get(star).unwrap().parent, Some(group));
    let (at, tween) = timeline.tweens_for(star).next().unwrap();
    assert_eq!((at, tween.duration), (0.3, 0.3));
    assert_eq!(timeline.tweens_for(group).count(), 0);
}

#[test]
fn reduced_motion_shows_group_in_place() {
    let mut rig = Rig::new();
    let (timeline, report) = rig.plan(&Instant, &with_remote());
    assert!(timeline.is_empty());
    assert!(matches!(report.remote, RemoteChange::Entered { .. }));
    let group = rig.live.remote_group.unwrap();
    assert_eq!(rig.scene.read(group, Prop::TranslateX), Some(Value::Num(0.0)));

    let (timeline, _) = rig.plan(&Instant, &local());
    assert!(timeline.is_empty());
    assert!(!rig.scene.contains(group));
}
