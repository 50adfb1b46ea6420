//! Sections and their weekly meeting blocks.
//!
//! Both types validate their invariants when built, including when
//! deserialized, so the conflict predicate and the search never see a
//! meeting that ends before it starts.

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SectionError};
use crate::time::{format_time, hhmm, DaySet};

/// Normalize a course id for comparison: whitespace removed, uppercased.
///
/// `"ICS 101"`, `"ics101"` and `" I C S 1 0 1 "` all become `"ICS101"`.
pub fn normalize_course_id(raw: &str) -> String {
    raw.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_uppercase)
        .collect()
}

/// One recurring time block: a set of days sharing a start and end time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "MeetingRecord")]
pub struct Meeting {
    days: DaySet,
    #[serde(with = "hhmm")]
    start: NaiveTime,
    #[serde(with = "hhmm")]
    end: NaiveTime,
}

impl Meeting {
    /// Build a meeting. Fails if `days` is empty or `start >= end`.
    pub fn new(days: DaySet, start: NaiveTime, end: NaiveTime) -> Result<Self> {
        if days.is_empty() {
            return Err(SectionError::NoDays);
        }
        if start >= end {
            return Err(SectionError::InvertedMeeting {
                start: format_time(start),
                end: format_time(end),
            });
        }
        Ok(Self { days, start, end })
    }

    /// Build a meeting from catalog text, e.g. `("MWF", "09:00", "09:50")`.
    pub fn parse(days: &str, start: &str, end: &str) -> Result<Self> {
        Meeting::new(
            DaySet::parse(days)?,
            crate::time::parse_time(start)?,
            crate::time::parse_time(end)?,
        )
    }

    pub fn days(&self) -> DaySet {
        self.days
    }

    pub fn start(&self) -> NaiveTime {
        self.start
    }

    pub fn end(&self) -> NaiveTime {
        self.end
    }

    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }
}

#[derive(Deserialize)]
struct MeetingRecord {
    days: DaySet,
    #[serde(with = "hhmm")]
    start: NaiveTime,
    #[serde(with = "hhmm")]
    end: NaiveTime,
}

impl TryFrom<MeetingRecord> for Meeting {
    type Error = SectionError;

    fn try_from(record: MeetingRecord) -> Result<Self> {
        Meeting::new(record.days, record.start, record.end)
    }
}

/// One offering of a course within a term.
///
/// A section with no meetings is asynchronous/arranged and never occupies
/// time in a schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "SectionRecord")]
pub struct Section {
    crn: String,
    course_id: String,
    #[serde(skip)]
    course_key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    instructor: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    location: Option<String>,
    is_online: bool,
    is_synchronous: bool,
    meetings: Vec<Meeting>,
}

impl Section {
    /// Build an in-person, synchronous section.
    ///
    /// Fails if the CRN or course id is blank.
    pub fn new(
        crn: impl Into<String>,
        course_id: impl Into<String>,
        meetings: Vec<Meeting>,
    ) -> Result<Self> {
        let crn = crn.into().trim().to_string();
        let course_id = course_id.into().trim().to_string();
        if crn.is_empty() {
            return Err(SectionError::MissingIdentifier("CRN"));
        }
        let course_key = normalize_course_id(&course_id);
        if course_key.is_empty() {
            return Err(SectionError::MissingIdentifier("course id"));
        }
        Ok(Self {
            crn,
            course_id,
            course_key,
            title: None,
            instructor: None,
            location: None,
            is_online: false,
            is_synchronous: true,
            meetings,
        })
    }

    pub fn with_modality(mut self, is_online: bool, is_synchronous: bool) -> Self {
        self.is_online = is_online;
        self.is_synchronous = is_synchronous;
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_instructor(mut self, instructor: impl Into<String>) -> Self {
        self.instructor = Some(instructor.into());
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn crn(&self) -> &str {
        &self.crn
    }

    /// The course id as printed in the catalog, e.g. `"ICS 101"`.
    pub fn course_id(&self) -> &str {
        &self.course_id
    }

    /// The normalized course id used for grouping and matching.
    pub fn course_key(&self) -> &str {
        &self.course_key
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn instructor(&self) -> Option<&str> {
        self.instructor.as_deref()
    }

    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    pub fn is_online(&self) -> bool {
        self.is_online
    }

    pub fn is_synchronous(&self) -> bool {
        self.is_synchronous
    }

    pub fn meetings(&self) -> &[Meeting] {
        &self.meetings
    }

    /// Union of the days of every meeting.
    pub fn days(&self) -> DaySet {
        self.meetings
            .iter()
            .fold(DaySet::empty(), |acc, m| acc.union(m.days()))
    }
}

#[derive(Deserialize)]
struct SectionRecord {
    crn: String,
    course_id: String,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    instructor: Option<String>,
    #[serde(default)]
    location: Option<String>,
    #[serde(default)]
    is_online: bool,
    #[serde(default = "default_synchronous")]
    is_synchronous: bool,
    #[serde(default)]
    meetings: Vec<Meeting>,
}

fn default_synchronous() -> bool {
    true
}

impl TryFrom<SectionRecord> for Section {
    type Error = SectionError;

    fn try_from(record: SectionRecord) -> Result<Self> {
        let mut section = Section::new(record.crn, record.course_id, record.meetings)?
            .with_modality(record.is_online, record.is_synchronous);
        section.title = record.title;
        section.instructor = record.instructor;
        section.location = record.location;
        Ok(section)
    }
}
