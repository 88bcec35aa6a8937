use crate::{
    animation::timeline::{Action, Op, Prop, Timeline, Value},
    foundation::core::Seconds,
    render::scene::Scene,
};

#[derive(Clone, Debug)]
enum Progress {
    Pending,
    Running(Vec<(Prop, Value)>),
    Done,
}

/// Plays a [`Timeline`] against a [`Scene`].
///
/// Entries run in offset order (stable for equal offsets). A tween captures its start values
/// the first time the playhead reaches it, so tweens chained on the same attribute pick up
/// where the previous one left off. Calls fire exactly once.
#[derive(Clone, Debug)]
pub struct TimelinePlayer {
    timeline: Timeline,
    order: Vec<usize>,
    progress: Vec<Progress>,
    time: Seconds,
}

impl TimelinePlayer {
    /// Player positioned at the start of `timeline`.
    pub fn new(timeline: Timeline) -> Self {
        let mut order: Vec<usize> = (0..timeline.entries().len()).collect();
        order.sort_by(|a, b| {
            timeline.entries()[*a]
                .at
                .total_cmp(&timeline.entries()[*b].at)
        });
        let progress = vec![Progress::Pending; order.len()];
        Self {
            timeline,
            order,
            progress,
            time: 0.0,
        }
    }

    /// Played timeline.
    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    /// Playhead position.
    pub fn time(&self) -> Seconds {
        self.time
    }

    /// `true` once every entry has completed.
    pub fn is_finished(&self) -> bool {
        self.progress.iter().all(|p| matches!(p, Progress::Done))
    }

    /// Move the playhead forward by `dt` seconds and apply the result to `scene`.
    pub fn advance(&mut self, dt: Seconds, scene: &mut Scene) {
        self.seek(self.time + dt.max(0.0), scene);
    }

    /// Move the playhead forward to `time`. Seeking backwards is ignored.
    pub fn seek(&mut self, time: Seconds, scene: &mut Scene) {
        if time < self.time {
            return;
        }
        self.time = time;
        for &index in &self.order {
            let entry = &self.timeline.entries()[index];
            if entry.at > time {
                break;
            }
            let state = &mut self.progress[index];
            match &entry.op {
                Op::Call(action) => {
                    if matches!(state, Progress::Pending) {
                        fire(action, scene);
                        *state = Progress::Done;
                    }
                }
                Op::Tween(tween) => {
                    if matches!(state, Progress::Done) {
                        continue;
                    }
                    if matches!(state, Progress::Pending) {
                        let from = tween
                            .props
                            .iter()
                            .map(|(prop, target)| {
                                (*prop, scene.read(tween.target, *prop).unwrap_or(*target))
                            })
                            .collect();
                        *state = Progress::Running(from);
                    }
                    let Progress::Running(from) = state else {
                        continue;
                    };
                    let t = if tween.duration <= 0.0 {
                        1.0
                    } else {
                        ((time - entry.at) / tween.duration).clamp(0.0, 1.0)
                    };
                    let eased = tween.ease.apply(t);
                    for ((prop, start), (_, end)) in from.iter().zip(&tween.props) {
                        let value = if t >= 1.0 {
                            *end
                        } else {
                            Value::lerp(start, end, eased)
                        };
                        scene.write(tween.target, *prop, &value);
                    }
                    if t >= 1.0 {
                        *state = Progress::Done;
                    }
                }
            }
        }
    }

    /// Jump to the end of the timeline, leaving the scene in its final state.
    pub fn finish(&mut self, scene: &mut Scene) {
        let end = self.timeline.duration().max(self.time);
        self.seek(end, scene);
    }
}

fn fire(action: &Action, scene: &mut Scene) {
    match action {
        Action::Detach(id) => {
            scene.detach(*id);
        }
        Action::AppendText { target, ch } => {
            if let Some(attrs) = scene.attrs_mut(*target) {
                attrs.text.push(*ch);
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/player.rs"]
mod tests;
