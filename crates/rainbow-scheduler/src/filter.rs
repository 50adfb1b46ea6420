//! Scheduling constraints, validated and normalized from request parameters.
//!
//! Raw parameters arrive the way a query string delivers them: every field
//! optional, list fields possibly repeated and possibly comma-separated.
//! [`build_filter`] turns them into an immutable [`CourseFilter`] or fails
//! with a [`ValidationError`] naming the first offending field.
//!
//! # Day tokens
//!
//! - `"M"`: allow Monday. When any day is allowed, every meeting of a
//!   section must fall on allowed days.
//! - `"!M"`: exclude Monday. A section with any meeting on Monday fails.
//! - Both kinds can be mixed; both checks apply.

use std::collections::BTreeSet;

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use crate::error::{FilterField, ValidationError};
use crate::section::normalize_course_id;
use crate::time::{format_time, hhmm_opt, parse_time, Day, DaySet};

/// Raw, unvalidated filter parameters as received from a request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterParams {
    /// Course reference numbers of specific sections.
    pub crn: Vec<String>,
    /// Full course ids such as `"ICS 101"`; any section of each qualifies.
    pub cid: Vec<String>,
    /// Earliest allowed start, `HH:MM`.
    pub start_after: Option<String>,
    /// Latest allowed end, `HH:MM`.
    pub end_before: Option<String>,
    pub online: Option<String>,
    pub sync: Option<String>,
    /// Day codes, optionally prefixed with `!`.
    pub day: Vec<String>,
}

impl FilterParams {
    /// Requested course ids as the caller spelled them, split and trimmed.
    pub fn requested_course_ids(&self) -> impl Iterator<Item = &str> {
        list_entries(&self.cid)
    }
}

/// Allowed and excluded meeting days.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub struct DayConstraint {
    pub allowed: DaySet,
    pub denied: DaySet,
}

impl DayConstraint {
    pub fn is_empty(&self) -> bool {
        self.allowed.is_empty() && self.denied.is_empty()
    }

    /// Whether a meeting on `days` satisfies both the allow and deny sets.
    pub fn admits(&self, days: DaySet) -> bool {
        if days.intersects(self.denied) {
            return false;
        }
        self.allowed.is_empty() || days.is_subset(self.allowed)
    }
}

/// A validated, normalized set of scheduling constraints.
///
/// Every field is optional. Identity fields (`crns`, `course_ids`) select by
/// union; all other active fields narrow by intersection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CourseFilter {
    crns: BTreeSet<String>,
    course_ids: BTreeSet<String>,
    #[serde(with = "hhmm_opt")]
    start_after: Option<NaiveTime>,
    #[serde(with = "hhmm_opt")]
    end_before: Option<NaiveTime>,
    online: Option<bool>,
    synchronous: Option<bool>,
    days: DayConstraint,
}

impl CourseFilter {
    pub fn builder() -> CourseFilterBuilder {
        CourseFilterBuilder::default()
    }

    pub fn crns(&self) -> &BTreeSet<String> {
        &self.crns
    }

    /// Requested course ids in normalized form (`"ICS101"`).
    pub fn course_ids(&self) -> &BTreeSet<String> {
        &self.course_ids
    }

    pub fn start_after(&self) -> Option<NaiveTime> {
        self.start_after
    }

    pub fn end_before(&self) -> Option<NaiveTime> {
        self.end_before
    }

    pub fn online(&self) -> Option<bool> {
        self.online
    }

    pub fn synchronous(&self) -> Option<bool> {
        self.synchronous
    }

    pub fn days(&self) -> DayConstraint {
        self.days
    }

    /// Whether the filter names specific CRNs or course ids.
    pub fn has_identity(&self) -> bool {
        !self.crns.is_empty() || !self.course_ids.is_empty()
    }
}

/// Fluent construction of a [`CourseFilter`], one setter per request
/// parameter. Validation is deferred to [`CourseFilterBuilder::build`].
#[derive(Debug, Clone, Default)]
pub struct CourseFilterBuilder {
    params: FilterParams,
}

impl CourseFilterBuilder {
    pub fn crns<I, S>(mut self, crns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.params.crn.extend(crns.into_iter().map(Into::into));
        self
    }

    pub fn course_ids<I, S>(mut self, course_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.params.cid.extend(course_ids.into_iter().map(Into::into));
        self
    }

    pub fn start_after(mut self, raw: impl Into<String>) -> Self {
        self.params.start_after = Some(raw.into());
        self
    }

    pub fn end_before(mut self, raw: impl Into<String>) -> Self {
        self.params.end_before = Some(raw.into());
        self
    }

    pub fn online(mut self, raw: impl Into<String>) -> Self {
        self.params.online = Some(raw.into());
        self
    }

    pub fn synchronous(mut self, raw: impl Into<String>) -> Self {
        self.params.sync = Some(raw.into());
        self
    }

    pub fn days<I, S>(mut self, days: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.params.day.extend(days.into_iter().map(Into::into));
        self
    }

    pub fn build(&self) -> Result<CourseFilter, ValidationError> {
        build_filter(&self.params)
    }
}

/// Validate and normalize raw request parameters.
///
/// # Errors
///
/// Returns a [`ValidationError`] for the first field that fails:
/// a malformed CRN or course id, a time not in `HH:MM`, `start_after` not
/// before `end_before`, an unrecognized boolean token, or an unknown or
/// contradictory day code.
pub fn build_filter(params: &FilterParams) -> Result<CourseFilter, ValidationError> {
    let crns = list_entries(&params.crn)
        .map(|crn| parse_crn(crn).map(str::to_string))
        .collect::<Result<BTreeSet<_>, _>>()?;

    let course_ids = list_entries(&params.cid)
        .map(parse_course_id)
        .collect::<Result<BTreeSet<_>, _>>()?;

    let start_after = parse_bound(params.start_after.as_deref(), FilterField::StartAfter)?;
    let end_before = parse_bound(params.end_before.as_deref(), FilterField::EndBefore)?;
    if let (Some(start), Some(end)) = (start_after, end_before) {
        if start >= end {
            return Err(ValidationError::new(
                FilterField::EndBefore,
                format!(
                    "must be later than start_after ({} >= {})",
                    format_time(start),
                    format_time(end)
                ),
            ));
        }
    }

    let online = parse_flag(params.online.as_deref(), FilterField::Online)?;
    let synchronous = parse_flag(params.sync.as_deref(), FilterField::Synchronous)?;
    let days = parse_days(&params.day)?;

    Ok(CourseFilter {
        crns,
        course_ids,
        start_after,
        end_before,
        online,
        synchronous,
        days,
    })
}

/// Split repeated and comma-separated list parameters, dropping blanks.
pub(crate) fn list_entries(raw: &[String]) -> impl Iterator<Item = &str> {
    raw.iter()
        .flat_map(|entry| entry.split(','))
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
}

fn parse_crn(raw: &str) -> Result<&str, ValidationError> {
    if raw.chars().all(|c| c.is_ascii_alphanumeric()) {
        Ok(raw)
    } else {
        Err(ValidationError::new(
            FilterField::Crn,
            format!("'{raw}' is not a course reference number"),
        ))
    }
}

fn parse_course_id(raw: &str) -> Result<String, ValidationError> {
    let normalized = normalize_course_id(raw);
    let well_formed = normalized.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
        && normalized.chars().any(|c| c.is_ascii_alphabetic())
        && normalized.chars().any(|c| c.is_ascii_digit());
    if well_formed {
        Ok(normalized)
    } else {
        Err(ValidationError::new(
            FilterField::CourseId,
            format!("'{raw}' is not a course id (expected subject and number, e.g. 'ICS 101')"),
        ))
    }
}

fn parse_bound(raw: Option<&str>, field: FilterField) -> Result<Option<NaiveTime>, ValidationError> {
    match raw.map(str::trim).filter(|r| !r.is_empty()) {
        None => Ok(None),
        Some(r) => parse_time(r)
            .map(Some)
            .map_err(|_| ValidationError::new(field, format!("'{r}' is not a 24-hour HH:MM time"))),
    }
}

fn parse_flag(raw: Option<&str>, field: FilterField) -> Result<Option<bool>, ValidationError> {
    let Some(token) = raw.map(str::trim).filter(|r| !r.is_empty()) else {
        return Ok(None);
    };
    match token.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(Some(true)),
        "false" | "0" | "no" => Ok(Some(false)),
        _ => Err(ValidationError::new(
            field,
            format!("'{token}' is not one of true/false, 1/0, yes/no"),
        )),
    }
}

fn parse_days(raw: &[String]) -> Result<DayConstraint, ValidationError> {
    let mut days = DayConstraint::default();

    for token in list_entries(raw) {
        let (negated, code) = match token.strip_prefix('!') {
            Some(rest) => (true, rest.trim()),
            None => (false, token),
        };
        let mut chars = code.chars();
        let day = match (chars.next(), chars.next()) {
            (Some(c), None) => Day::from_code(c).ok(),
            _ => None,
        };
        let Some(day) = day else {
            return Err(ValidationError::new(
                FilterField::Day,
                format!("'{token}' is not a day code (M T W R F S U, optionally prefixed with '!')"),
            ));
        };
        if negated {
            days.denied.insert(day);
        } else {
            days.allowed.insert(day);
        }
    }

    if let Some(day) = days.allowed.intersection(days.denied).iter().next() {
        return Err(ValidationError::new(
            FilterField::Day,
            format!("'{day}' is both required and excluded"),
        ));
    }

    Ok(days)
}
