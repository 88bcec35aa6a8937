use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};

use crate::{
    engine::config::TimingConfig,
    foundation::core::Seconds,
    foundation::error::ConstellationError,
    model::snapshot::{Connection, Point},
};

/// Resolved growth window of a new connection.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct ConnectionTiming {
    /// Growth start offset.
    pub start: Seconds,
    /// Growth duration, derived from the rendered length.
    pub duration: Seconds,
    /// `start + duration`.
    pub end: Seconds,
}

/// When each new point and connection of a transition appears.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize)]
pub struct AppearancePlan {
    /// New point id → appear-tween start offset.
    pub points: BTreeMap<String, Seconds>,
    /// New connection id → growth window.
    pub connections: BTreeMap<String, ConnectionTiming>,
}

impl AppearancePlan {
    /// Latest offset at which a planned addition settles, given the point appear duration.
    pub fn latest_end(&self, point_duration: Seconds) -> Seconds {
        let points = self.points.values().map(|t| t + point_duration);
        let connections = self.connections.values().map(|c| c.end);
        points.chain(connections).fold(0.0, f64::max)
    }
}

/// New connections whose growth order could not be resolved because they feed each other.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct DependencyCycle {
    /// Connection ids, in snapshot order.
    pub connections: Vec<String>,
}

impl DependencyCycle {
    /// Error form, for callers that treat an unordered batch as fatal.
    pub fn to_error(&self) -> ConstellationError {
        ConstellationError::schedule(format!(
            "dependency cycle among new connections: {}",
            self.connections.join(", ")
        ))
    }
}

/// Outcome of appearance resolution.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize)]
pub struct Resolution {
    /// Resolved timings.
    pub plan: AppearancePlan,
    /// Connections left unordered, if any.
    pub cycle: Option<DependencyCycle>,
}

/// Order the growth of new connections and the appearance of new points.
///
/// `existing` are points already on screen (appearance time `0`). New points that no new
/// connection targets are roots and appear at the base delay, staggered in snapshot order.
/// A connection grows once its source has appeared and every new connection feeding that
/// source has finished growing, plus the connection gap; its target appears as soon as the
/// first incoming connection arrives. Connections are relaxed in topological order over the
/// "feeds the source of" relation.
///
/// When relaxation stalls, the connections lying on a cycle are reported and left without a
/// growth window. Their targets are seeded like further roots, and relaxation resumes, so
/// connections hanging off a cycle are still ordered.
pub fn resolve_appearance<'a>(
    existing: impl IntoIterator<Item = &'a str>,
    new_points: &[&Point],
    new_connections: &[(&Connection, f64)],
    timing: &TimingConfig,
) -> Resolution {
    let mut times: HashMap<&str, Seconds> = existing.into_iter().map(|id| (id, 0.0)).collect();
    let mut plan = AppearancePlan::default();
    let is_new = |id: &str| new_points.iter().any(|p| p.id == id);

    let targeted: HashSet<&str> = new_connections
        .iter()
        .map(|(c, _)| c.to.as_str())
        .collect();
    let mut seeded = 0usize;
    for p in new_points
        .iter()
        .filter(|p| !targeted.contains(p.id.as_str()))
    {
        let t = timing.root_base_delay + seeded as f64 * timing.root_stagger;
        seeded += 1;
        times.insert(p.id.as_str(), t);
        plan.points.insert(p.id.clone(), t);
    }

    // feeders[i]: connections whose target is the source of connection i
    let mut feeders: Vec<Vec<usize>> = vec![Vec::new(); new_connections.len()];
    let mut dependents: Vec<Vec<usize>> = vec![Vec::new(); new_connections.len()];
    for (i, (c, _)) in new_connections.iter().enumerate() {
        for (j, (d, _)) in new_connections.iter().enumerate() {
            if d.to == c.from {
                feeders[i].push(j);
                dependents[j].push(i);
            }
        }
    }

    let mut pending: Vec<usize> = feeders.iter().map(Vec::len).collect();
    let mut ready: VecDeque<usize> = (0..new_connections.len())
        .filter(|i| pending[*i] == 0)
        .collect();
    let mut ends: Vec<Option<Seconds>> = vec![None; new_connections.len()];
    let mut on_cycle = vec![false; new_connections.len()];

    loop {
        while let Some(i) = ready.pop_front() {
            let (c, length) = new_connections[i];
            let source = times
                .get(c.from.as_str())
                .copied()
                .unwrap_or(timing.root_base_delay);
            let prereq = feeders[i]
                .iter()
                .filter_map(|j| ends[*j])
                .fold(source, f64::max);
            let start = prereq + timing.connection_gap;
            let duration = timing.line_duration(length);
            let end = start + duration;
            ends[i] = Some(end);
            plan.connections.insert(
                c.id.clone(),
                ConnectionTiming {
                    start,
                    duration,
                    end,
                },
            );

            let to = c.to.as_str();
            let earliest = times.get(to).map_or(end, |t| t.min(end));
            times.insert(to, earliest);
            if is_new(to) {
                plan.points.insert(to.to_owned(), earliest);
            }
            release(i, &dependents, &on_cycle, &mut pending, &mut ready);
        }

        let stalled: Vec<usize> = (0..new_connections.len())
            .filter(|i| ends[*i].is_none() && !on_cycle[*i])
            .collect();
        if stalled.is_empty() {
            break;
        }
        let members: Vec<usize> = stalled
            .iter()
            .copied()
            .filter(|i| reaches_itself(*i, &dependents, &ends, &on_cycle))
            .collect();
        for i in &members {
            on_cycle[*i] = true;
        }
        for i in &members {
            let to = new_connections[*i].0.to.as_str();
            if !times.contains_key(to) {
                let t = timing.root_base_delay + seeded as f64 * timing.root_stagger;
                seeded += 1;
                times.insert(to, t);
                if is_new(to) {
                    plan.points.insert(to.to_owned(), t);
                }
            }
        }
        for i in &members {
            release(*i, &dependents, &on_cycle, &mut pending, &mut ready);
        }
    }

    let cycle: Vec<String> = new_connections
        .iter()
        .enumerate()
        .filter(|(i, _)| on_cycle[*i])
        .map(|(_, (c, _))| c.id.clone())
        .collect();
    for p in new_points {
        plan.points
            .entry(p.id.clone())
            .or_insert(timing.root_base_delay);
    }

    Resolution {
        plan,
        cycle: (!cycle.is_empty()).then_some(DependencyCycle {
            connections: cycle,
        }),
    }
}

fn release(
    i: usize,
    dependents: &[Vec<usize>],
    on_cycle: &[bool],
    pending: &mut [usize],
    ready: &mut VecDeque<usize>,
) {
    for k in &dependents[i] {
        if on_cycle[*k] || pending[*k] == 0 {
            continue;
        }
        pending[*k] -= 1;
        if pending[*k] == 0 {
            ready.push_back(*k);
        }
    }
}

/// `true` when connection `i` feeds back into itself through unresolved connections.
fn reaches_itself(
    i: usize,
    dependents: &[Vec<usize>],
    ends: &[Option<Seconds>],
    on_cycle: &[bool],
) -> bool {
    let mut seen = vec![false; dependents.len()];
    let mut stack: Vec<usize> = dependents[i].clone();
    while let Some(k) = stack.pop() {
        if k == i {
            return true;
        }
        if seen[k] || ends[k].is_some() || on_cycle[k] {
            continue;
        }
        seen[k] = true;
        stack.extend(&dependents[k]);
    }
    false
}

#[cfg(test)]
#[path = "../../tests/unit/schedule/appearance.rs"]
mod tests;
