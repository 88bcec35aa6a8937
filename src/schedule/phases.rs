//! Phase builders for local (non-mirrored) changes: removal, reposition, reshape, additions
//! and annotations.

use crate::{
    animation::{
        ease::Ease,
        timeline::{Prop, Value},
    },
    diff::items::SnapshotDiff,
    engine::config::CyclePolicy,
    foundation::core::Seconds,
    model::{
        snapshot::{Connection, Point, PointKind, Snapshot},
        style::resolved_radius,
    },
    render::{
        elements::{fill_card, restyle_line, restyle_star},
        scene::ElementId,
    },
    schedule::{appearance::resolve_appearance, plan::{Choreo, TransitionReport}},
};

fn fade_out() -> Vec<(Prop, Value)> {
    vec![(Prop::Opacity, Value::Num(0.0))]
}

/// Fade out removed connections and shrink removed points, all at offset 0.
pub(crate) fn remove(cx: &mut Choreo<'_>, diff: &SnapshotDiff<'_>) {
    let duration = cx.timing.removal_duration;

    for c in &diff.connections.to_remove {
        if let Some(el) = cx.live.connections.remove(&c.id) {
            cx.motion
                .exit(&mut cx.stage, el, fade_out(), 0.0, duration, Ease::OutQuad);
        }
    }

    for p in &diff.points_to_remove {
        let handles = cx.live.forget_point(&p.id);
        if let Some(star) = handles.star {
            cx.motion.exit(
                &mut cx.stage,
                star,
                vec![(Prop::R, Value::Num(0.0)), (Prop::Opacity, Value::Num(0.0))],
                0.0,
                duration,
                Ease::OutQuad,
            );
        }
        for ripple in handles.ripples {
            cx.stage.scene.detach(ripple);
        }
        if let Some(caption) = handles.caption {
            cx.motion
                .exit(&mut cx.stage, caption, fade_out(), 0.0, duration, Ease::OutQuad);
        }
    }
}

/// Move kept points, restyle kind changes and keep captions and ripples in sync.
pub(crate) fn reposition(cx: &mut Choreo<'_>, diff: &SnapshotDiff<'_>) {
    let at = cx.timing.reposition_at;
    let duration = cx.timing.reposition_duration;

    for kept in &diff.points_to_keep {
        let (current, target) = (kept.current, kept.target);
        let Some(star) = cx.live.points.get(&target.id).copied() else {
            continue;
        };
        let center = cx.factory.center(target);

        if kept.moved() {
            cx.motion.to(
                &mut cx.stage,
                star,
                vec![(Prop::Cx, Value::Num(center.x)), (Prop::Cy, Value::Num(center.y))],
                at,
                duration,
                Ease::InOutCubic,
            );
            let ripples = cx.live.ripples.get(&target.id).cloned().unwrap_or_default();
            for ripple in ripples {
                cx.motion.to(
                    &mut cx.stage,
                    ripple,
                    vec![(Prop::Cx, Value::Num(center.x)), (Prop::Cy, Value::Num(center.y))],
                    at,
                    duration,
                    Ease::InOutCubic,
                );
            }
            if let Some(caption) = cx.live.captions.get(&target.id).copied() {
                let rect = cx.factory.layout().caption.caption_rect(center);
                cx.motion.to(
                    &mut cx.stage,
                    caption,
                    vec![(Prop::X, Value::Num(rect.x0)), (Prop::Y, Value::Num(rect.y0))],
                    at,
                    duration,
                    Ease::InOutCubic,
                );
            }
        }

        if kept.kind_changed() {
            restyle_star(cx.stage.scene, star, target.kind);
            if current.kind == PointKind::Origin {
                for ripple in cx.live.ripples.remove(&target.id).unwrap_or_default() {
                    cx.motion.exit(
                        &mut cx.stage,
                        ripple,
                        fade_out(),
                        0.0,
                        cx.timing.ripple_retract_duration,
                        Ease::OutQuad,
                    );
                }
            }
            if target.kind == PointKind::Origin && cx.motion.decorations_enabled() {
                let ripples = cx.factory.ripples(
                    cx.stage.scene,
                    cx.surfaces.stars,
                    star,
                    target,
                    cx.timing.ripple_count,
                    cx.timing.ripple_stagger,
                );
                cx.live.ripples.insert(target.id.clone(), ripples);
            }
        }

        let radius = resolved_radius(target);
        if radius != resolved_radius(current) {
            cx.motion.to(
                &mut cx.stage,
                star,
                vec![(Prop::R, Value::Num(radius))],
                at,
                duration,
                Ease::InOutCubic,
            );
        }

        if current.caption != target.caption && !target.is_mirrored() {
            recaption(cx, target, at);
        }
    }
}

fn recaption(cx: &mut Choreo<'_>, target: &Point, at: Seconds) {
    let existing = cx.live.captions.get(&target.id).copied();
    match (&target.caption, existing) {
        (Some(text), Some(caption)) => {
            cx.motion
                .type_text(&mut cx.stage, caption, text, at, cx.timing.char_delay);
        }
        (Some(text), None) => {
            let caption = cx
                .factory
                .caption(cx.stage.scene, cx.surfaces.messages, target);
            cx.live.captions.insert(target.id.clone(), caption);
            cx.motion
                .type_text(&mut cx.stage, caption, text, at, cx.timing.char_delay);
        }
        (None, Some(caption)) => {
            cx.live.captions.remove(&target.id);
            cx.motion.exit(
                &mut cx.stage,
                caption,
                fade_out(),
                0.0,
                cx.timing.removal_duration,
                Ease::OutQuad,
            );
        }
        (None, None) => {}
    }
}

/// Deform kept connections onto their new shape and restyle kind changes.
pub(crate) fn reshape(
    cx: &mut Choreo<'_>,
    diff: &SnapshotDiff<'_>,
    target: &Snapshot,
    report: &mut TransitionReport,
) {
    for kept in &diff.connections.to_keep {
        let conn = kept.target;
        let Some(el) = cx.live.connections.get(&conn.id).copied() else {
            let parent = line_parent(cx, conn);
            match cx.factory.line(cx.stage.scene, parent, target, conn) {
                Some(el) => {
                    cx.live.connections.insert(conn.id.clone(), el);
                }
                None => report.skipped.push(conn.id.clone()),
            }
            continue;
        };

        if kept.current.kind != conn.kind {
            restyle_line(cx.stage.scene, el, conn);
        }

        let Some(path) = cx.factory.connector_for(target, conn) else {
            tracing::warn!(connection = %conn.id, "kept connection lost an endpoint");
            continue;
        };
        let shown = cx.stage.scene.attrs(el).and_then(|a| a.path);
        if shown == Some(path) {
            continue;
        }
        if let Some(a) = cx.stage.scene.attrs_mut(el) {
            a.dash_array = None;
            a.dash_offset = 0.0;
        }
        cx.motion.to(
            &mut cx.stage,
            el,
            vec![(Prop::Path, Value::Path(path))],
            cx.timing.reposition_at,
            cx.timing.reposition_duration,
            Ease::InOutCubic,
        );
        report.reshaped_connections.push(conn.id.clone());
    }
}

fn line_parent(cx: &Choreo<'_>, conn: &Connection) -> ElementId {
    match cx.live.remote_group {
        Some(group) if conn.is_mirrored() => group,
        _ => cx.surfaces.lines,
    }
}

/// Render local additions in dependency order. Returns the offset at which they all settle.
pub(crate) fn add(
    cx: &mut Choreo<'_>,
    diff: &SnapshotDiff<'_>,
    target: &Snapshot,
    report: &mut TransitionReport,
) -> Seconds {
    let timing = cx.timing;
    let new_points: Vec<&Point> = diff
        .points_to_add
        .iter()
        .copied()
        .filter(|p| !p.is_mirrored())
        .collect();

    let mut pending = Vec::new();
    for conn in diff.connections.to_add.iter().filter(|c| !c.is_mirrored()) {
        match cx.factory.connector_for(target, conn) {
            Some(path) => pending.push((*conn, path.length())),
            None => {
                tracing::warn!(
                    connection = %conn.id,
                    from = %conn.from,
                    to = %conn.to,
                    "skipping connection with missing endpoint"
                );
                report.skipped.push(conn.id.clone());
            }
        }
    }

    let existing = diff.points_to_keep.iter().map(|k| k.target.id.as_str());
    let resolution = resolve_appearance(existing, &new_points, &pending, timing);

    if let Some(cycle) = &resolution.cycle {
        tracing::warn!(
            connections = ?cycle.connections,
            policy = ?cx.cycle_policy,
            "new connections form a dependency cycle"
        );
    }

    for (conn, length) in &pending {
        let Some(el) = cx
            .factory
            .line(cx.stage.scene, cx.surfaces.lines, target, conn)
        else {
            continue;
        };
        match resolution.plan.connections.get(&conn.id) {
            Some(t) => {
                if let Some(a) = cx.stage.scene.attrs_mut(el) {
                    a.dash_array = Some(*length);
                }
                cx.motion.from(
                    &mut cx.stage,
                    el,
                    vec![(Prop::DashOffset, Value::Num(*length))],
                    t.start,
                    t.duration,
                    Ease::OutQuad,
                );
            }
            None if cx.cycle_policy == CyclePolicy::Skip => {
                cx.stage.scene.detach(el);
                report.skipped.push(conn.id.clone());
                continue;
            }
            None => {}
        }
        cx.live.connections.insert(conn.id.clone(), el);
    }

    for p in &new_points {
        let star = cx.factory.star(cx.stage.scene, cx.surfaces.stars, p);
        cx.live.points.insert(p.id.clone(), star);
        let appear = resolution
            .plan
            .points
            .get(&p.id)
            .copied()
            .unwrap_or(timing.root_base_delay);
        cx.motion.from(
            &mut cx.stage,
            star,
            vec![(Prop::R, Value::Num(0.0)), (Prop::Opacity, Value::Num(0.0))],
            appear,
            timing.point_appear_duration,
            Ease::OutBack,
        );

        if p.kind == PointKind::Origin && cx.motion.decorations_enabled() {
            let ripples = cx.factory.ripples(
                cx.stage.scene,
                cx.surfaces.stars,
                star,
                p,
                timing.ripple_count,
                timing.ripple_stagger,
            );
            cx.live.ripples.insert(p.id.clone(), ripples);
        }

        if let Some(text) = &p.caption {
            let caption = cx.factory.caption(cx.stage.scene, cx.surfaces.messages, p);
            cx.live.captions.insert(p.id.clone(), caption);
            cx.motion.type_text(
                &mut cx.stage,
                caption,
                text,
                appear + timing.point_appear_duration,
                timing.char_delay,
            );
        }
    }

    let settled = resolution.plan.latest_end(timing.point_appear_duration);
    report.appearance = resolution.plan;
    report.cycle = resolution.cycle;
    settled
}

/// Fade annotations out and in, and move kept cards onto their new anchors.
pub(crate) fn annotations(
    cx: &mut Choreo<'_>,
    diff: &SnapshotDiff<'_>,
    target: &Snapshot,
    report: &mut TransitionReport,
) {
    let timing = cx.timing;

    for a in &diff.annotations_to_remove {
        if let Some(el) = cx.live.annotations.remove(&a.id) {
            cx.motion.exit(
                &mut cx.stage,
                el,
                fade_out(),
                0.0,
                timing.removal_duration,
                Ease::OutQuad,
            );
        }
    }

    for a in &diff.annotations_to_add {
        let Some(el) = cx
            .factory
            .card(cx.stage.scene, cx.surfaces.labels, target, a)
        else {
            report.skipped.push(a.id.clone());
            continue;
        };
        cx.live.annotations.insert(a.id.clone(), el);
        cx.motion.from(
            &mut cx.stage,
            el,
            fade_out(),
            timing.annotation_at,
            timing.annotation_duration,
            Ease::OutCubic,
        );
    }

    for kept in &diff.annotations_to_keep {
        let a = kept.target;
        let Some(el) = cx.live.annotations.get(&a.id).copied() else {
            if let Some(el) = cx
                .factory
                .card(cx.stage.scene, cx.surfaces.labels, target, a)
            {
                cx.live.annotations.insert(a.id.clone(), el);
            }
            continue;
        };
        if kept.current != a {
            fill_card(cx.stage.scene, el, a);
        }
        let Some(anchor) = target.point(&a.anchor_point) else {
            tracing::warn!(
                annotation = %a.id,
                anchor = %a.anchor_point,
                "kept annotation lost its anchor"
            );
            continue;
        };
        let origin = cx.factory.card_origin(anchor, a);
        let shown = cx.stage.scene.attrs(el).map(|s| (s.x, s.y));
        if shown != Some((origin.x, origin.y)) {
            cx.motion.to(
                &mut cx.stage,
                el,
                vec![(Prop::X, Value::Num(origin.x)), (Prop::Y, Value::Num(origin.y))],
                timing.reposition_at,
                timing.reposition_duration,
                Ease::InOutCubic,
            );
        }
    }
}
