//! Station conflict detection
//!
//! Two calls at the same station conflict when their occupancy windows
//! `[actual, actual + tolerance]` overlap. Intervals are closed, so calls
//! exactly `tolerance` apart still conflict. This is a declarative overlap
//! check for display, not a signalling safety model.

use crate::models::timeline::TimelineEvent;
use serde::Serialize;
use std::collections::BTreeMap;

/// A chain of mutually overlapping calls at one station
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConflictGroup {
    pub station: String,
    /// Event ids ordered by actual time
    pub event_ids: Vec<String>,
}

/// Input indices per station, each list sorted by actual time then index
fn by_station(events: &[TimelineEvent]) -> BTreeMap<&str, Vec<usize>> {
    let mut groups: BTreeMap<&str, Vec<usize>> = BTreeMap::new();
    for (idx, event) in events.iter().enumerate() {
        groups.entry(event.station.as_str()).or_default().push(idx);
    }
    for indices in groups.values_mut() {
        indices.sort_by_key(|&i| (events[i].actual_time, i));
    }
    groups
}

fn overlaps(a: &TimelineEvent, b: &TimelineEvent, tolerance_ms: i64) -> bool {
    b.actual_time.millis_since(a.actual_time).saturating_abs() <= tolerance_ms
}

/// Flag every event that overlaps at least one other event at its station
///
/// Returns one flag per input event, in input order. Within a time-sorted
/// station list an event's nearest neighbour is adjacent to it, so checking
/// neighbours is enough to find every pairwise overlap.
pub fn mark_conflicts(events: &[TimelineEvent], tolerance_ms: i64) -> Vec<bool> {
    let mut flags = vec![false; events.len()];

    for indices in by_station(events).values() {
        for pair in indices.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            if overlaps(&events[a], &events[b], tolerance_ms) {
                flags[a] = true;
                flags[b] = true;
            }
        }
    }

    flags
}

/// Group overlapping calls into clusters, chaining through shared members
///
/// Groups are ordered by station name, then by the time of their first call.
/// Isolated calls do not form a group.
///
/// # Example
/// ```
/// use railops_sim_core::timeline::conflict_groups;
/// use railops_sim_core::{SimTime, TimelineEvent};
///
/// let at = |m| SimTime::from_hms(14, m, 0);
/// let events = vec![
///     TimelineEvent::new("E1", "Fast 003", "THN", at(28), at(28)),
///     TimelineEvent::new("E2", "Local 006", "THN", at(28), at(29)),
///     TimelineEvent::new("E3", "Express 005", "THN", at(40), at(40)),
/// ];
///
/// let groups = conflict_groups(&events, 60_000);
/// assert_eq!(groups.len(), 1);
/// assert_eq!(groups[0].event_ids, vec!["E1", "E2"]);
/// ```
pub fn conflict_groups(events: &[TimelineEvent], tolerance_ms: i64) -> Vec<ConflictGroup> {
    let mut groups = Vec::new();

    for (station, indices) in by_station(events) {
        let mut current: Vec<usize> = Vec::new();
        for &idx in &indices {
            let extends = current
                .last()
                .is_some_and(|&prev| overlaps(&events[prev], &events[idx], tolerance_ms));
            if extends {
                current.push(idx);
            } else {
                if current.len() > 1 {
                    groups.push(make_group(station, &current, events));
                }
                current = vec![idx];
            }
        }
        if current.len() > 1 {
            groups.push(make_group(station, &current, events));
        }
    }

    groups
}

fn make_group(station: &str, indices: &[usize], events: &[TimelineEvent]) -> ConflictGroup {
    ConflictGroup {
        station: station.to_string(),
        event_ids: indices.iter().map(|&i| events[i].id.clone()).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::time::SimTime;

    fn call(id: &str, station: &str, minute: i64) -> TimelineEvent {
        let t = SimTime::from_hms(14, minute, 0);
        TimelineEvent::new(id, id, station, t, t)
    }

    #[test]
    fn test_different_stations_never_conflict() {
        let events = vec![call("A", "THN", 28), call("B", "KRL", 28)];
        assert_eq!(mark_conflicts(&events, 60_000), vec![false, false]);
    }

    #[test]
    fn test_boundary_is_inclusive() {
        let events = vec![call("A", "THN", 28), call("B", "THN", 29)];
        assert_eq!(mark_conflicts(&events, 60_000), vec![true, true]);
        assert_eq!(mark_conflicts(&events, 59_999), vec![false, false]);
    }

    #[test]
    fn test_unsorted_input_keeps_input_order() {
        let events = vec![call("late", "THN", 40), call("B", "THN", 29), call("A", "THN", 28)];
        assert_eq!(mark_conflicts(&events, 60_000), vec![false, true, true]);
    }

    #[test]
    fn test_chained_group() {
        let events = vec![
            call("A", "DAD", 10),
            call("B", "DAD", 11),
            call("C", "DAD", 12),
            call("D", "DAD", 20),
            call("E", "DAD", 21),
        ];
        let groups = conflict_groups(&events, 60_000);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].event_ids, vec!["A", "B", "C"]);
        assert_eq!(groups[1].event_ids, vec!["D", "E"]);
    }
}
