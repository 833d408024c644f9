use crate::models::{DashboardStats, Filters, Selector, WinnerLock};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// First unit to reach its target, one lock per session key.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct WinnerBoard {
    locks: BTreeMap<String, WinnerLock>,
}

impl WinnerBoard {
    pub fn get(&self, session_key: &str) -> Option<&WinnerLock> {
        self.locks.get(session_key)
    }

    pub fn locks(&self) -> &BTreeMap<String, WinnerLock> {
        &self.locks
    }

    /// Locks `session_key` to the current top unit once it reaches 100%.
    /// Returns the lock only when it was taken by this call; an existing
    /// lock is never replaced.
    pub fn observe(
        &mut self,
        session_key: &str,
        stats: &DashboardStats,
        now: DateTime<Utc>,
    ) -> Option<&WinnerLock> {
        if self.locks.contains_key(session_key) {
            return None;
        }
        let top = stats.top_unit.as_ref().filter(|unit| unit.percentage >= 100)?;
        let lock: &WinnerLock = self
            .locks
            .entry(session_key.to_string())
            .or_insert(WinnerLock {
                unit: top.unit.clone(),
                percentage: top.percentage,
                locked_at: now,
            });
        Some(lock)
    }

    pub fn clear(&mut self) {
        self.locks.clear();
    }
}

/// The slice a lock is judged on: the selected session and date across
/// every unit.
pub fn lock_filters(filters: &Filters) -> Filters {
    Filters {
        date: filters.date.clone(),
        session: filters.session.clone(),
        unit: Selector::All,
    }
}
