//! Applying a [`CourseFilter`] to a catalog listing.
//!
//! Identity constraints select by union: a section is a candidate if its
//! CRN was requested OR its course id was requested (or if neither was
//! specified). Every other active constraint must also pass.

use std::collections::{BTreeSet, HashSet};

use serde::Serialize;
use tracing::debug;

use crate::filter::CourseFilter;
use crate::section::{normalize_course_id, Section};

impl CourseFilter {
    /// Whether `section` was asked for by CRN or course id.
    pub fn matches_identity(&self, section: &Section) -> bool {
        !self.has_identity()
            || self.crns().contains(section.crn())
            || self.course_ids().contains(section.course_key())
    }

    /// Whether `section` satisfies the time, modality, and day constraints.
    ///
    /// A section without meetings satisfies the time and day constraints.
    pub fn matches_constraints(&self, section: &Section) -> bool {
        if self.online().is_some_and(|online| online != section.is_online()) {
            return false;
        }
        if self
            .synchronous()
            .is_some_and(|sync| sync != section.is_synchronous())
        {
            return false;
        }

        let days = self.days();
        section.meetings().iter().all(|m| {
            self.start_after().is_none_or(|after| m.start() >= after)
                && self.end_before().is_none_or(|before| m.end() <= before)
                && days.admits(m.days())
        })
    }

    pub fn matches(&self, section: &Section) -> bool {
        self.matches_identity(section) && self.matches_constraints(section)
    }
}

/// Keep the sections that pass `filter`, in input order.
pub fn apply_filter(filter: &CourseFilter, sections: &[Section]) -> Vec<Section> {
    let kept: Vec<Section> = sections
        .iter()
        .filter(|s| filter.matches(s))
        .cloned()
        .collect();
    debug!(
        total = sections.len(),
        kept = kept.len(),
        "applied course filter"
    );
    kept
}

/// Requested items that matched no section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MissingRequested {
    pub crns: BTreeSet<String>,
    /// Course ids in the caller's spelling (e.g. `"ICS 301"`).
    pub course_ids: BTreeSet<String>,
}

impl MissingRequested {
    pub fn is_empty(&self) -> bool {
        self.crns.is_empty() && self.course_ids.is_empty()
    }

    pub fn len(&self) -> usize {
        self.crns.len() + self.course_ids.len()
    }
}

/// How completely a listing covers what was requested.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchStatus {
    /// Every requested CRN and course id matched at least one section.
    Complete,
    /// Nothing matched at all.
    NothingFound(MissingRequested),
    /// Some sections matched but some requested items did not.
    Incomplete(MissingRequested),
}

/// Report which requested CRNs and course ids matched none of `matched`.
///
/// Course ids compare whitespace- and case-insensitively but are reported
/// as the caller wrote them (trimmed).
pub fn missing_requested<C, D>(
    requested_crns: impl IntoIterator<Item = C>,
    requested_cids: impl IntoIterator<Item = D>,
    matched: &[Section],
) -> MissingRequested
where
    C: AsRef<str>,
    D: AsRef<str>,
{
    let found_crns: HashSet<&str> = matched.iter().map(Section::crn).collect();
    let found_courses: HashSet<&str> = matched.iter().map(Section::course_key).collect();

    let crns = requested_crns
        .into_iter()
        .map(|c| c.as_ref().trim().to_string())
        .filter(|c| !c.is_empty() && !found_crns.contains(c.as_str()))
        .collect();

    let course_ids = requested_cids
        .into_iter()
        .map(|c| c.as_ref().trim().to_string())
        .filter(|c| {
            let key = normalize_course_id(c);
            !key.is_empty() && !found_courses.contains(key.as_str())
        })
        .collect();

    MissingRequested { crns, course_ids }
}

/// Classify a selection result against the caller's request.
pub fn match_status(matched: &[Section], missing: MissingRequested) -> MatchStatus {
    if matched.is_empty() {
        MatchStatus::NothingFound(missing)
    } else if !missing.is_empty() {
        MatchStatus::Incomplete(missing)
    } else {
        MatchStatus::Complete
    }
}
