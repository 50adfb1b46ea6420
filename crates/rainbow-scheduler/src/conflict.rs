//! Time conflicts between meetings and sections.
//!
//! Two meetings conflict when they share at least one day and their
//! half-open intervals `[start, end)` overlap. Adjacent meetings (where one
//! ends exactly when another starts) are NOT conflicts.

use serde::Serialize;

use crate::section::{Meeting, Section};
use crate::time::Day;

impl Meeting {
    /// Whether two meetings occupy the same time on some shared day.
    ///
    /// Symmetric. `a.end == b.start` does not conflict.
    pub fn conflicts_with(&self, other: &Meeting) -> bool {
        self.days().intersects(other.days())
            && self.start() < other.end()
            && other.start() < self.end()
    }
}

impl Section {
    /// Whether any meeting of `self` conflicts with any meeting of `other`.
    ///
    /// A section without meetings never conflicts.
    pub fn conflicts_with(&self, other: &Section) -> bool {
        self.meetings()
            .iter()
            .any(|a| other.meetings().iter().any(|b| a.conflicts_with(b)))
    }
}

/// A detected overlap between two sections on one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Conflict {
    pub crn_a: String,
    pub crn_b: String,
    pub day: Day,
    pub overlap_minutes: i64,
}

/// Find every pairwise conflict among `sections`, one entry per shared day.
///
/// Pairs are reported in input order (`crn_a` precedes `crn_b`). Entries with
/// the same CRN are the same physical section and are never compared.
pub fn find_conflicts(sections: &[Section]) -> Vec<Conflict> {
    let mut conflicts = Vec::new();

    for (i, a) in sections.iter().enumerate() {
        for b in &sections[i + 1..] {
            if a.crn() == b.crn() {
                continue;
            }
            for ma in a.meetings() {
                for mb in b.meetings() {
                    if !ma.conflicts_with(mb) {
                        continue;
                    }
                    let overlap_start = ma.start().max(mb.start());
                    let overlap_end = ma.end().min(mb.end());
                    let overlap_minutes = (overlap_end - overlap_start).num_minutes();

                    for day in ma.days().intersection(mb.days()).iter() {
                        conflicts.push(Conflict {
                            crn_a: a.crn().to_string(),
                            crn_b: b.crn().to_string(),
                            day,
                            overlap_minutes,
                        });
                    }
                }
            }
        }
    }

    conflicts
}
