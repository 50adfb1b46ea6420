//! Conflict-free schedule enumeration.
//!
//! Sections are grouped into [`Slot`]s; a schedule picks exactly one section
//! per slot. The search builds schedules slot by slot and abandons a branch
//! as soon as the newly placed section conflicts with one already placed, so
//! the work done tracks the number of conflict-free partial schedules rather
//! than the full cartesian product.
//!
//! A schedule is a set: when two slots pick the same physical section (a
//! cross-listed CRN, or a CRN requested alongside its own course) it is
//! placed once, and identical member sets reached through different branches
//! are emitted once.

use std::collections::{HashMap, HashSet};

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::filter::CourseFilter;
use crate::section::Section;
use crate::time::DaySet;

/// What a slot stands for.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum SlotKind {
    /// Any section of a course (normalized course id).
    Course(String),
    /// One specific section.
    Crn(String),
}

/// Interchangeable alternatives, exactly one of which goes in a schedule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slot<'a> {
    pub kind: SlotKind,
    pub sections: Vec<&'a Section>,
}

impl<'a> Slot<'a> {
    fn new(kind: SlotKind) -> Self {
        Self {
            kind,
            sections: Vec::new(),
        }
    }

    /// Add `section` unless a section with the same CRN is already present.
    fn push(&mut self, section: &'a Section) {
        if !self.sections.iter().any(|s| s.crn() == section.crn()) {
            self.sections.push(section);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }
}

/// One slot per distinct course, in order of first appearance.
pub fn group_by_course(sections: &[Section]) -> Vec<Slot<'_>> {
    let mut slots: Vec<Slot<'_>> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for section in sections {
        let i = *index.entry(section.course_key()).or_insert_with(|| {
            slots.push(Slot::new(SlotKind::Course(section.course_key().to_string())));
            slots.len() - 1
        });
        slots[i].push(section);
    }

    slots
}

/// One slot per requested CRN, then one per requested course id.
///
/// Each kind follows the filter's sorted order. A slot for a request that
/// matched nothing is kept (and empty), which makes the whole search yield
/// no schedules. A filter naming no CRNs or course ids falls back to
/// [`group_by_course`].
pub fn slots_for_request<'a>(filter: &CourseFilter, sections: &'a [Section]) -> Vec<Slot<'a>> {
    if !filter.has_identity() {
        return group_by_course(sections);
    }

    let crn_slots = filter.crns().iter().map(|crn| {
        let mut slot = Slot::new(SlotKind::Crn(crn.clone()));
        for section in sections.iter().filter(|s| s.crn() == crn.as_str()) {
            slot.push(section);
        }
        slot
    });

    let course_slots = filter.course_ids().iter().map(|course| {
        let mut slot = Slot::new(SlotKind::Course(course.clone()));
        for section in sections.iter().filter(|s| s.course_key() == course.as_str()) {
            slot.push(section);
        }
        slot
    });

    crn_slots.chain(course_slots).collect()
}

/// Bounds on the search, guarding against pathological slot sizes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchLimits {
    /// Stop after this many schedules have been found.
    pub max_schedules: Option<usize>,
    /// Stop after this many section placements have been attempted.
    pub max_nodes: Option<usize>,
}

impl SearchLimits {
    pub fn unbounded() -> Self {
        Self::default()
    }
}

/// A conflict-free set of sections, one per slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PotentialSchedule {
    sections: Vec<Section>,
}

impl PotentialSchedule {
    /// Members in placement order.
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn crns(&self) -> Vec<&str> {
        self.sections.iter().map(Section::crn).collect()
    }

    pub fn contains_crn(&self, crn: &str) -> bool {
        self.sections.iter().any(|s| s.crn() == crn)
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Every day on which some member meets.
    pub fn days(&self) -> DaySet {
        self.sections
            .iter()
            .fold(DaySet::empty(), |acc, s| acc.union(s.days()))
    }

    pub fn earliest_start(&self) -> Option<NaiveTime> {
        self.meeting_times().map(|(start, _)| start).min()
    }

    pub fn latest_end(&self) -> Option<NaiveTime> {
        self.meeting_times().map(|(_, end)| end).max()
    }

    fn meeting_times(&self) -> impl Iterator<Item = (NaiveTime, NaiveTime)> + '_ {
        self.sections
            .iter()
            .flat_map(|s| s.meetings())
            .map(|m| (m.start(), m.end()))
    }
}

/// Result of one search.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Generation {
    pub schedules: Vec<PotentialSchedule>,
    /// Section placements attempted.
    pub nodes_visited: usize,
    /// Whether a limit stopped the search with branches left unexplored.
    pub truncated: bool,
}

/// Enumerates conflict-free schedules over a list of slots.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScheduleGenerator {
    limits: SearchLimits,
}

impl ScheduleGenerator {
    pub fn new(limits: SearchLimits) -> Self {
        Self { limits }
    }

    pub fn limits(&self) -> SearchLimits {
        self.limits
    }

    /// Enumerate every conflict-free choice of one section per slot.
    ///
    /// Results follow slot order, then section order within each slot. No
    /// slots, or any empty slot, yields no schedules.
    pub fn generate<'a>(&self, slots: &[Slot<'a>]) -> Generation {
        let mut generation = Generation::default();

        if slots.is_empty() || slots.iter().any(Slot::is_empty) {
            debug!(slots = slots.len(), "no schedule possible: empty slot");
            return generation;
        }

        let depth_count = slots.len();
        // Per depth: index of the next candidate to try, and whether the
        // current candidate added a new member (false when deduplicated).
        let mut cursor = vec![0usize; depth_count];
        let mut added = vec![false; depth_count];
        let mut placed: Vec<&'a Section> = Vec::with_capacity(depth_count);
        let mut emitted: HashSet<Vec<&'a str>> = HashSet::new();
        let mut depth = 0;

        loop {
            let slot = &slots[depth];

            if cursor[depth] == slot.len() {
                cursor[depth] = 0;
                if depth == 0 {
                    break;
                }
                depth -= 1;
                if added[depth] {
                    placed.pop();
                    added[depth] = false;
                }
                continue;
            }

            if self.limit_reached(&generation) {
                generation.truncated = true;
                break;
            }

            let candidate = slot.sections[cursor[depth]];
            cursor[depth] += 1;
            generation.nodes_visited += 1;

            let duplicate = placed.iter().any(|p| p.crn() == candidate.crn());
            if !duplicate && placed.iter().any(|p| p.conflicts_with(candidate)) {
                continue;
            }
            if !duplicate {
                placed.push(candidate);
            }
            added[depth] = !duplicate;

            if depth + 1 < depth_count {
                depth += 1;
                continue;
            }

            let mut key: Vec<&'a str> = placed.iter().copied().map(Section::crn).collect();
            key.sort_unstable();
            if emitted.insert(key) {
                generation.schedules.push(PotentialSchedule {
                    sections: placed.iter().map(|s| (*s).clone()).collect(),
                });
            }

            if added[depth] {
                placed.pop();
                added[depth] = false;
            }
        }

        if generation.truncated {
            warn!(
                found = generation.schedules.len(),
                nodes = generation.nodes_visited,
                max_schedules = ?self.limits.max_schedules,
                max_nodes = ?self.limits.max_nodes,
                "schedule search stopped at limit"
            );
        } else {
            debug!(
                slots = depth_count,
                found = generation.schedules.len(),
                nodes = generation.nodes_visited,
                "schedule search complete"
            );
        }

        generation
    }

    fn limit_reached(&self, generation: &Generation) -> bool {
        self.limits
            .max_schedules
            .is_some_and(|max| generation.schedules.len() >= max)
            || self
                .limits
                .max_nodes
                .is_some_and(|max| generation.nodes_visited >= max)
    }
}

/// Group `sections` by course and enumerate every conflict-free schedule.
///
/// Never fails: empty input or an all-conflicting input yields no schedules.
pub fn generate_schedules(sections: &[Section]) -> Vec<PotentialSchedule> {
    ScheduleGenerator::default()
        .generate(&group_by_course(sections))
        .schedules
}
