//! Mirrored-copy group: a rigid container for every mirrored point and connection.

use crate::{
    animation::{
        ease::Ease,
        timeline::{Prop, Value},
    },
    diff::items::SnapshotDiff,
    foundation::core::{Seconds, Vec2},
    model::snapshot::{Connection, Point, Snapshot},
    render::scene::ElementKind,
    schedule::plan::{Choreo, RemoteChange, TransitionReport},
};

/// Slide the whole group off-canvas when the target shows no mirrored copy.
pub(crate) fn withdraw(
    cx: &mut Choreo<'_>,
    current: &Snapshot,
    target: &Snapshot,
    report: &mut TransitionReport,
) {
    if cx.live.remote_group.is_none() || target.has_mirrored() {
        return;
    }
    let Some(group) = cx.live.forget_remote(current) else {
        return;
    };
    cx.motion.exit(
        &mut cx.stage,
        group,
        vec![
            (Prop::TranslateX, Value::Num(cx.timing.remote_exit_distance)),
            (Prop::Opacity, Value::Num(0.0)),
        ],
        0.0,
        cx.timing.remote_exit_duration,
        Ease::InCubic,
    );
    report.remote = RemoteChange::Withdrawn;
}

/// Introduce the group after local additions settle, or grow the group already shown.
pub(crate) fn enter_or_extend(
    cx: &mut Choreo<'_>,
    diff: &SnapshotDiff<'_>,
    target: &Snapshot,
    settled: Seconds,
    report: &mut TransitionReport,
) {
    if !target.has_mirrored() {
        return;
    }
    let points: Vec<&Point> = diff
        .points_to_add
        .iter()
        .copied()
        .filter(|p| p.is_mirrored())
        .collect();
    let connections: Vec<&Connection> = diff
        .connections
        .to_add
        .iter()
        .copied()
        .filter(|c| c.is_mirrored())
        .collect();
    if points.is_empty() && connections.is_empty() {
        return;
    }

    match cx.live.remote_group {
        None => enter(cx, target, &points, &connections, settled, report),
        Some(group) => {
            let timing = cx.timing;
            let mut members = 0;
            for conn in &connections {
                let Some(el) = cx.factory.line(cx.stage.scene, group, target, conn) else {
                    report.skipped.push(conn.id.clone());
                    continue;
                };
                cx.live.connections.insert(conn.id.clone(), el);
                cx.motion.from(
                    &mut cx.stage,
                    el,
                    vec![(Prop::Opacity, Value::Num(0.0))],
                    timing.remote_member_at,
                    timing.remote_member_duration,
                    Ease::OutQuad,
                );
                members += 1;
            }
            for p in &points {
                let el = cx.factory.star(cx.stage.scene, group, p);
                cx.live.points.insert(p.id.clone(), el);
                cx.motion.from(
                    &mut cx.stage,
                    el,
                    vec![(Prop::R, Value::Num(0.0)), (Prop::Opacity, Value::Num(0.0))],
                    timing.remote_member_at,
                    timing.remote_member_duration,
                    Ease::OutBack,
                );
                members += 1;
            }
            report.remote = RemoteChange::Extended { members };
        }
    }
}

/// Offset between the mirrored copy and the local points it mirrors, in canvas units.
///
/// Derived from the first mirrored point and its counterpart; zero when the counterpart is
/// not part of `target`.
pub(crate) fn mirror_offset(cx: &Choreo<'_>, first: &Point, target: &Snapshot) -> Vec2 {
    let local = first
        .counterpart_id()
        .and_then(|id| target.point(id));
    match local {
        Some(local) => cx
            .factory
            .projection()
            .delta_to_absolute(first.x - local.x, first.y - local.y),
        None => {
            tracing::warn!(point = %first.id, "mirrored point has no local counterpart");
            Vec2::ZERO
        }
    }
}

fn enter(
    cx: &mut Choreo<'_>,
    target: &Snapshot,
    points: &[&Point],
    connections: &[&Connection],
    settled: Seconds,
    report: &mut TransitionReport,
) {
    let timing = cx.timing;
    let offset = points
        .first()
        .map_or(Vec2::ZERO, |first| mirror_offset(cx, first, target));

    let group = cx.stage.scene.create(ElementKind::Group, "remote");
    let mut members = 0;
    for conn in connections {
        match cx.factory.line(cx.stage.scene, group, target, conn) {
            Some(el) => {
                cx.live.connections.insert(conn.id.clone(), el);
                members += 1;
            }
            None => report.skipped.push(conn.id.clone()),
        }
    }
    for p in points {
        let el = cx.factory.star(cx.stage.scene, group, p);
        cx.live.points.insert(p.id.clone(), el);
        members += 1;
    }
    cx.stage.scene.append(cx.surfaces.root, group);
    cx.live.remote_group = Some(group);

    let start = settled.max(timing.remote_enter_floor) + timing.remote_enter_gap;
    cx.motion.from(
        &mut cx.stage,
        group,
        vec![
            (Prop::TranslateX, Value::Num(-offset.x)),
            (Prop::TranslateY, Value::Num(-offset.y)),
            (Prop::Opacity, Value::Num(0.0)),
        ],
        start,
        timing.remote_enter_duration,
        Ease::OutCubic,
    );
    report.remote = RemoteChange::Entered { start, members };
}

#[cfg(test)]
#[path = "../../tests/unit/schedule/remote.rs"]
mod tests;
