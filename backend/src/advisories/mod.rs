//! Advisory lifecycle management
//!
//! Owns the active advisory set. Applying an advisory is immediate; removing
//! it from the visible list is a separate, deferred step. [`AdvisoryBook::apply`]
//! schedules a removal at `now + dwell`, and [`AdvisoryBook::sweep`] evicts
//! every entry whose due time has passed. The transition therefore stays
//! visible for the dwell period.
//!
//! Dwell deadlines are expressed on whatever monotone millisecond counter the
//! caller passes in; the orchestrator uses the clock's real-elapsed counter.

use crate::core::time::SimTime;
use crate::models::advisory::{Advisory, AdvisoryError};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Visible time after apply: 2 s display plus a 300 ms fade-out
pub const DEFAULT_DWELL_MS: u64 = 2_300;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdvisoryConfig {
    pub dwell_ms: u64,
}

impl Default for AdvisoryConfig {
    fn default() -> Self {
        Self {
            dwell_ms: DEFAULT_DWELL_MS,
        }
    }
}

/// User-visible confirmation emitted by a successful apply
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdvisoryApplied {
    pub notification_id: Uuid,
    pub advisory_id: String,
    pub title: String,
    pub applied_at: SimTime,
}

impl AdvisoryApplied {
    pub fn message(&self) -> String {
        if self.title.is_empty() {
            format!("Advisory {} applied", self.advisory_id)
        } else {
            format!("Applied: {}", self.title)
        }
    }
}

/// Deferred removal keyed by advisory id
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct RemovalDue(u64);

#[derive(Debug, Clone)]
struct Entry {
    advisory: Advisory,
    removal: Option<RemovalDue>,
}

/// The active advisory set, in fixture order
///
/// # Example
/// ```
/// use railops_sim_core::advisories::AdvisoryBook;
/// use railops_sim_core::{Advisory, AdvisoryCategory, AdvisoryPriority, SimTime};
///
/// let now = SimTime::from_hms(14, 30, 0);
/// let mut book = AdvisoryBook::new(2_000);
/// book.insert(Advisory::new("A001", AdvisoryCategory::Conflict, AdvisoryPriority::High, now))
///     .unwrap();
///
/// book.apply("A001", now, 0).unwrap();
/// assert!(book.sweep(1_999).is_empty());
/// assert_eq!(book.sweep(2_000), vec!["A001".to_string()]);
/// assert!(book.is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct AdvisoryBook {
    entries: Vec<Entry>,
    dwell_ms: u64,
}

impl AdvisoryBook {
    pub fn new(dwell_ms: u64) -> Self {
        Self {
            entries: Vec::new(),
            dwell_ms,
        }
    }

    /// Build a set from fixture advisories, handing back the first duplicate id
    pub fn from_advisories(
        dwell_ms: u64,
        advisories: impl IntoIterator<Item = Advisory>,
    ) -> Result<Self, Advisory> {
        let mut book = Self::new(dwell_ms);
        for advisory in advisories {
            book.insert(advisory)?;
        }
        Ok(book)
    }

    /// Add an advisory to the active set
    ///
    /// Ids are unique within the set: a duplicate is handed back unchanged.
    pub fn insert(&mut self, advisory: Advisory) -> Result<(), Advisory> {
        if self.get(advisory.id()).is_some() {
            return Err(advisory);
        }
        self.entries.push(Entry {
            advisory,
            removal: None,
        });
        Ok(())
    }

    /// Pending → Applied, scheduling removal at `clock_ms + dwell`
    ///
    /// Fails with `NotFound` or `AlreadyApplied` without touching any state.
    pub fn apply(
        &mut self,
        id: &str,
        now: SimTime,
        clock_ms: u64,
    ) -> Result<AdvisoryApplied, AdvisoryError> {
        let entry = self
            .entries
            .iter_mut()
            .find(|e| e.advisory.id() == id)
            .ok_or_else(|| AdvisoryError::NotFound(id.to_string()))?;

        entry.advisory.mark_applied(now)?;
        entry.removal = Some(RemovalDue(clock_ms.saturating_add(self.dwell_ms)));

        Ok(AdvisoryApplied {
            notification_id: Uuid::new_v4(),
            advisory_id: id.to_string(),
            title: entry.advisory.title().to_string(),
            applied_at: now,
        })
    }

    /// Evict every advisory whose removal is due at or before `clock_ms`
    ///
    /// Returns evicted ids ordered by due time (ties keep set order).
    pub fn sweep(&mut self, clock_ms: u64) -> Vec<String> {
        let mut due: Vec<(u64, String)> = self
            .entries
            .iter()
            .filter_map(|e| match e.removal {
                Some(RemovalDue(at)) if at <= clock_ms => Some((at, e.advisory.id().to_string())),
                _ => None,
            })
            .collect();
        if due.is_empty() {
            return Vec::new();
        }

        self.entries
            .retain(|e| !matches!(e.removal, Some(RemovalDue(at)) if at <= clock_ms));
        due.sort_by_key(|(at, _)| *at);
        due.into_iter().map(|(_, id)| id).collect()
    }

    pub fn get(&self, id: &str) -> Option<&Advisory> {
        self.iter().find(|a| a.id() == id)
    }

    /// Millisecond deadline at which `id` will be evicted, if scheduled
    pub fn removal_due(&self, id: &str) -> Option<u64> {
        self.entries
            .iter()
            .find(|e| e.advisory.id() == id)
            .and_then(|e| e.removal.map(|RemovalDue(at)| at))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Advisory> {
        self.entries.iter().map(|e| &e.advisory)
    }

    pub fn pending(&self) -> impl Iterator<Item = &Advisory> {
        self.iter().filter(|a| a.is_pending())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn dwell_ms(&self) -> u64 {
        self.dwell_ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::advisory::{AdvisoryCategory, AdvisoryPriority};

    fn advisory(id: &str) -> Advisory {
        Advisory::new(id, AdvisoryCategory::Delay, AdvisoryPriority::Medium, SimTime::default())
    }

    #[test]
    fn test_insert_rejects_duplicate_id() {
        let mut book = AdvisoryBook::new(100);
        book.insert(advisory("A1")).unwrap();
        let rejected = book.insert(advisory("A1")).unwrap_err();
        assert_eq!(rejected.id(), "A1");
        assert_eq!(book.len(), 1);
    }

    #[test]
    fn test_from_advisories_rejects_duplicate() {
        let book = AdvisoryBook::from_advisories(100, vec![advisory("A1"), advisory("A2")]).unwrap();
        assert_eq!(book.len(), 2);

        let dup = AdvisoryBook::from_advisories(100, vec![advisory("A1"), advisory("A1")]).unwrap_err();
        assert_eq!(dup.id(), "A1");
    }

    #[test]
    fn test_preapplied_is_never_scheduled() {
        let mut book = AdvisoryBook::new(0);
        book.insert(advisory("A3").already_applied()).unwrap();
        assert_eq!(book.removal_due("A3"), None);
        assert!(book.sweep(u64::MAX).is_empty());
        assert_eq!(book.len(), 1);
    }

    #[test]
    fn test_sweep_orders_by_due_time() {
        let mut book = AdvisoryBook::new(1_000);
        book.insert(advisory("A1")).unwrap();
        book.insert(advisory("A2")).unwrap();
        book.apply("A2", SimTime::default(), 0).unwrap();
        book.apply("A1", SimTime::default(), 500).unwrap();

        assert_eq!(book.sweep(5_000), vec!["A2".to_string(), "A1".to_string()]);
    }

    #[test]
    fn test_message_falls_back_to_id() {
        let mut book = AdvisoryBook::new(1_000);
        book.insert(advisory("A9")).unwrap();
        let note = book.apply("A9", SimTime::default(), 0).unwrap();
        assert_eq!(note.message(), "Advisory A9 applied");
    }
}
