//! The grade ledger: years, their semesters, and cumulative GPA.
//!
//! Semesters are addressed by a [`SemesterId`] handed out when they enter the
//! ledger. Display order within a year is kept as a separate list of ids, so
//! an id stays valid across unrelated inserts and deletes. Positional
//! `(year, index)` helpers resolve to an id at call time for callers that only
//! know what they displayed.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::semester::{Semester, SemesterStats};
use crate::core::snapshot::{LedgerSnapshot, SemesterRecord};
use crate::error::{LedgerError, Result};

/// Stable, process-local identifier of a semester in a [`GradeLedger`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SemesterId(u64);

impl SemesterId {
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for SemesterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Year-grouped collection of semesters.
///
/// Invariant: a year key is present in `by_year` if and only if its id list
/// is non-empty, and every id in `by_year` is a key of `semesters`.
#[derive(Debug, Clone, Default)]
pub struct GradeLedger {
    semesters: HashMap<SemesterId, Semester>,
    /// Display order per year. `BTreeMap` keeps years in lexicographic order.
    by_year: BTreeMap<String, Vec<SemesterId>>,
    next_id: u64,
}

impl GradeLedger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a ledger from a snapshot.
    ///
    /// Stats are always recomputed from courses; cached numbers in the
    /// snapshot are ignored. Years with no semesters are dropped.
    pub fn from_snapshot(snapshot: &LedgerSnapshot) -> Self {
        let mut ledger = Self::new();
        for (year, records) in &snapshot.years {
            for record in records {
                if !record.cache_is_consistent() {
                    tracing::debug!(
                        year = %year,
                        semester = %record.name,
                        "stored totals disagree with courses, recomputing"
                    );
                }
                ledger.add(record.to_semester(year));
            }
        }
        ledger
    }

    /// Produce the serializable snapshot of the whole ledger.
    pub fn snapshot(&self) -> LedgerSnapshot {
        let years = self
            .by_year
            .iter()
            .map(|(year, ids)| {
                let records = ids
                    .iter()
                    .filter_map(|id| self.semesters.get(id))
                    .map(SemesterRecord::from_semester)
                    .collect();
                (year.clone(), records)
            })
            .collect();
        LedgerSnapshot { years }
    }

    /// Number of semesters across all years.
    pub fn len(&self) -> usize {
        self.semesters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.semesters.is_empty()
    }

    /// Year labels, lexicographically ordered.
    ///
    /// Note that "Year 10" sorts before "Year 2".
    pub fn years(&self) -> impl Iterator<Item = &str> {
        self.by_year.keys().map(String::as_str)
    }

    /// Whether the ledger has semesters in `year`.
    pub fn contains_year(&self, year: &str) -> bool {
        self.by_year.contains_key(year)
    }

    /// Semesters of one year in display order.
    pub fn semesters_in<'a>(
        &'a self,
        year: &str,
    ) -> impl Iterator<Item = (SemesterId, &'a Semester)> + 'a {
        self.by_year
            .get(year)
            .into_iter()
            .flatten()
            .filter_map(move |id| self.semesters.get(id).map(|s| (*id, s)))
    }

    /// Every semester, by year then display order.
    pub fn iter(&self) -> impl Iterator<Item = (SemesterId, &Semester)> {
        self.by_year
            .values()
            .flatten()
            .filter_map(move |id| self.semesters.get(id).map(|s| (*id, s)))
    }

    pub fn get(&self, id: SemesterId) -> Option<&Semester> {
        self.semesters.get(&id)
    }

    /// Resolve a display position to an id.
    pub fn id_at(&self, year: &str, index: usize) -> Option<SemesterId> {
        self.by_year.get(year)?.get(index).copied()
    }

    /// Current display position of an id.
    pub fn position_of(&self, id: SemesterId) -> Option<(&str, usize)> {
        let semester = self.semesters.get(&id)?;
        let (year, ids) = self.by_year.get_key_value(&semester.year)?;
        let index = ids.iter().position(|candidate| *candidate == id)?;
        Some((year.as_str(), index))
    }

    /// Append a semester to its year, creating the year if needed.
    pub fn add(&mut self, semester: Semester) -> SemesterId {
        let id = SemesterId(self.next_id);
        self.next_id += 1;

        self.by_year
            .entry(semester.year.clone())
            .or_default()
            .push(id);
        tracing::debug!(id = %id, year = %semester.year, semester = %semester.name, "added semester");
        self.semesters.insert(id, semester);
        id
    }

    /// Replace the semester stored under `id`.
    ///
    /// If the year is unchanged the semester keeps its position. Otherwise it
    /// leaves its old year (pruning the year if it empties) and is appended to
    /// the new one. The id is kept either way.
    pub fn replace(&mut self, id: SemesterId, semester: Semester) -> Result<()> {
        let old_year = match self.semesters.get(&id) {
            Some(existing) => existing.year.clone(),
            None => return Err(LedgerError::UnknownSemester { id: id.get() }),
        };

        if old_year != semester.year {
            self.detach(id, &old_year);
            self.by_year
                .entry(semester.year.clone())
                .or_default()
                .push(id);
            tracing::debug!(id = %id, from = %old_year, to = %semester.year, "moved semester");
        }

        self.semesters.insert(id, semester);
        Ok(())
    }

    /// Remove the semester stored under `id`, pruning its year if it empties.
    pub fn remove(&mut self, id: SemesterId) -> Result<Semester> {
        let semester = self
            .semesters
            .remove(&id)
            .ok_or(LedgerError::UnknownSemester { id: id.get() })?;
        self.detach(id, &semester.year);
        tracing::debug!(id = %id, year = %semester.year, "removed semester");
        Ok(semester)
    }

    /// Positional update.
    ///
    /// Same year: replaces the semester at `old_index` in place, or does
    /// nothing if the position is stale. Different year: removes whatever is
    /// at `(old_year, old_index)` and appends `semester` to its new year.
    ///
    /// Returns the id the semester is stored under, or `None` if nothing was
    /// written.
    pub fn update(
        &mut self,
        semester: Semester,
        old_year: &str,
        old_index: usize,
    ) -> Option<SemesterId> {
        match self.id_at(old_year, old_index) {
            Some(id) => {
                // id_at only yields ids present in the map
                self.replace(id, semester).ok()?;
                Some(id)
            }
            None if semester.year == old_year => {
                tracing::warn!(year = %old_year, index = old_index, "stale position, update ignored");
                None
            }
            None => Some(self.add(semester)),
        }
    }

    /// Positional delete. Out-of-range positions are ignored.
    pub fn delete(&mut self, year: &str, index: usize) -> Option<Semester> {
        let id = self.id_at(year, index)?;
        self.remove(id).ok()
    }

    /// Remove every semester.
    pub fn clear(&mut self) {
        self.semesters.clear();
        self.by_year.clear();
    }

    /// Pooled totals over one year.
    pub fn year_stats(&self, year: &str) -> SemesterStats {
        self.semesters_in(year)
            .map(|(_, semester)| semester.calculate_stats())
            .fold(SemesterStats::default(), SemesterStats::pool)
    }

    /// Pooled totals over the whole ledger.
    pub fn cumulative_stats(&self) -> SemesterStats {
        self.iter()
            .map(|(_, semester)| semester.calculate_stats())
            .fold(SemesterStats::default(), SemesterStats::pool)
    }

    /// Cumulative GPA: total points over total credits, `0.0` when no credits.
    pub fn cumulative_gpa(&self) -> f64 {
        self.cumulative_stats().gpa
    }

    fn detach(&mut self, id: SemesterId, year: &str) {
        if let Some(ids) = self.by_year.get_mut(year) {
            ids.retain(|candidate| *candidate != id);
            if ids.is_empty() {
                self.by_year.remove(year);
            }
        }
    }
}
