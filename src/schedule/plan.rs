use crate::{
    animation::{
        motion::{Motion, Stage},
        timeline::Timeline,
    },
    diff::items::SnapshotDiff,
    engine::config::{CyclePolicy, EngineConfig, TimingConfig},
    foundation::core::Seconds,
    model::snapshot::Snapshot,
    render::{
        elements::ElementFactory,
        registry::{LiveRender, Surfaces},
        scene::Scene,
    },
    schedule::{
        appearance::{AppearancePlan, DependencyCycle},
        phases, remote,
    },
};

/// What happened to the mirrored-copy group during a transition.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize)]
#[serde(tag = "change", rename_all = "snake_case")]
pub enum RemoteChange {
    /// No group change.
    #[default]
    None,
    /// The group was introduced and slides in at `start`.
    Entered {
        /// Slide-in start offset.
        start: Seconds,
        /// Members rendered inside the group.
        members: usize,
    },
    /// New members were added to the group already on screen.
    Extended {
        /// Members added.
        members: usize,
    },
    /// The group slides out and is removed.
    Withdrawn,
}

/// Summary of one planned transition.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize)]
pub struct TransitionReport {
    /// Target chapter id.
    pub chapter: String,
    /// New point ids.
    pub added_points: Vec<String>,
    /// Removed point ids.
    pub removed_points: Vec<String>,
    /// Kept point ids whose position changed.
    pub moved_points: Vec<String>,
    /// New connection ids (rewired ones included).
    pub added_connections: Vec<String>,
    /// Removed connection ids (rewired ones included).
    pub removed_connections: Vec<String>,
    /// Kept connection ids whose shape changed.
    pub reshaped_connections: Vec<String>,
    /// Connection ids whose endpoints changed.
    pub rewired_connections: Vec<String>,
    /// New annotation ids.
    pub added_annotations: Vec<String>,
    /// Removed annotation ids.
    pub removed_annotations: Vec<String>,
    /// Resolved appearance timings of local additions.
    pub appearance: AppearancePlan,
    /// Connections that could not be ordered.
    pub cycle: Option<DependencyCycle>,
    /// Ids left unrendered (dangling references, skipped cycles).
    pub skipped: Vec<String>,
    /// Mirrored-copy group change.
    pub remote: RemoteChange,
    /// Offset at which the last scheduled operation completes.
    pub duration: Seconds,
}

fn ids<'a>(items: impl IntoIterator<Item = &'a String>) -> Vec<String> {
    items.into_iter().cloned().collect()
}

impl TransitionReport {
    fn new(chapter: &str, diff: &SnapshotDiff<'_>) -> Self {
        Self {
            chapter: chapter.to_owned(),
            added_points: ids(diff.points_to_add.iter().map(|p| &p.id)),
            removed_points: ids(diff.points_to_remove.iter().map(|p| &p.id)),
            moved_points: ids(
                diff.points_to_keep
                    .iter()
                    .filter(|k| k.moved())
                    .map(|k| &k.target.id),
            ),
            added_connections: ids(diff.connections.to_add.iter().map(|c| &c.id)),
            removed_connections: ids(diff.connections.to_remove.iter().map(|c| &c.id)),
            rewired_connections: diff
                .connections
                .rewired
                .iter()
                .map(|id| (*id).to_owned())
                .collect(),
            added_annotations: ids(diff.annotations_to_add.iter().map(|a| &a.id)),
            removed_annotations: ids(diff.annotations_to_remove.iter().map(|a| &a.id)),
            ..Self::default()
        }
    }

    /// `true` when the transition changes nothing structurally.
    pub fn is_structurally_unchanged(&self) -> bool {
        self.added_points.is_empty()
            && self.removed_points.is_empty()
            && self.added_connections.is_empty()
            && self.removed_connections.is_empty()
            && self.added_annotations.is_empty()
            && self.removed_annotations.is_empty()
    }
}

/// Shared state threaded through the phase builders.
pub(crate) struct Choreo<'s> {
    pub(crate) stage: Stage<'s>,
    pub(crate) motion: &'s dyn Motion,
    pub(crate) factory: &'s ElementFactory,
    pub(crate) timing: &'s TimingConfig,
    pub(crate) cycle_policy: CyclePolicy,
    pub(crate) surfaces: Surfaces,
    pub(crate) live: &'s mut LiveRender,
}

/// Builds the timeline of one transition from the live render to a target snapshot.
pub(crate) struct TransitionPlanner<'a> {
    pub(crate) motion: &'a dyn Motion,
    pub(crate) factory: &'a ElementFactory,
    pub(crate) config: &'a EngineConfig,
    pub(crate) surfaces: Surfaces,
}

impl TransitionPlanner<'_> {
    /// Diff, schedule every phase and commit `target` as the held snapshot.
    ///
    /// Immediate mutations land on `scene` while building; the returned timeline carries the
    /// animated remainder.
    pub(crate) fn plan(
        &self,
        chapter: &str,
        target: &Snapshot,
        live: &mut LiveRender,
        scene: &mut Scene,
    ) -> (Timeline, TransitionReport) {
        let current = std::mem::take(&mut live.snapshot);
        let diff = SnapshotDiff::between(&current, target);
        let mut report = TransitionReport::new(chapter, &diff);
        tracing::debug!(
            chapter,
            add_points = diff.points_to_add.len(),
            remove_points = diff.points_to_remove.len(),
            keep_points = diff.points_to_keep.len(),
            add_connections = diff.connections.to_add.len(),
            remove_connections = diff.connections.to_remove.len(),
            rewired = diff.connections.rewired.len(),
            "snapshot diff"
        );

        let mut timeline = Timeline::new();
        {
            let mut cx = Choreo {
                stage: Stage::new(scene, &mut timeline),
                motion: self.motion,
                factory: self.factory,
                timing: &self.config.timing,
                cycle_policy: self.config.cycle_policy,
                surfaces: self.surfaces,
                live: &mut *live,
            };
            remote::withdraw(&mut cx, &current, target, &mut report);
            phases::remove(&mut cx, &diff);
            phases::reposition(&mut cx, &diff);
            phases::reshape(&mut cx, &diff, target, &mut report);
            let settled = phases::add(&mut cx, &diff, target, &mut report);
            remote::enter_or_extend(&mut cx, &diff, target, settled, &mut report);
            phases::annotations(&mut cx, &diff, target, &mut report);
        }
        live.snapshot = target.clone();
        report.duration = timeline.duration();

        tracing::debug!(
            chapter,
            tweens = timeline.tween_count(),
            duration = report.duration,
            "transition planned"
        );
        (timeline, report)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/schedule/plan.rs"]
mod tests;
