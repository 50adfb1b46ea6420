//! Error types for rainbow-scheduler operations.

use std::fmt;

use thiserror::Error;

/// The request parameter a [`ValidationError`] refers to.
///
/// Names match the query parameters the transport layer accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterField {
    Crn,
    CourseId,
    StartAfter,
    EndBefore,
    Online,
    Synchronous,
    Day,
}

impl FilterField {
    pub fn as_str(self) -> &'static str {
        match self {
            FilterField::Crn => "crn",
            FilterField::CourseId => "cid",
            FilterField::StartAfter => "start_after",
            FilterField::EndBefore => "end_before",
            FilterField::Online => "online",
            FilterField::Synchronous => "sync",
            FilterField::Day => "day",
        }
    }
}

impl fmt::Display for FilterField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Malformed filter input. Always recoverable at the request boundary.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid '{field}': {reason}")]
pub struct ValidationError {
    pub field: FilterField,
    pub reason: String,
}

impl ValidationError {
    pub fn new(field: FilterField, reason: impl Into<String>) -> Self {
        Self {
            field,
            reason: reason.into(),
        }
    }
}

/// Section or meeting data that violates a construction invariant.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SectionError {
    #[error("Meeting must start before it ends ({start} >= {end})")]
    InvertedMeeting { start: String, end: String },

    #[error("Meeting has no days")]
    NoDays,

    #[error("Invalid time of day '{0}': expected HH:MM")]
    InvalidTime(String),

    #[error("Invalid day code '{0}'")]
    InvalidDay(char),

    #[error("Section is missing a {0}")]
    MissingIdentifier(&'static str),
}

/// Failures reported by a catalog collaborator.
#[derive(Error, Debug)]
pub enum SourceError {
    /// Upstream unreachable, missing, or answering with a non-success status.
    #[error("Catalog access error: {0}")]
    Access(String),

    /// Upstream content does not match the expected structure.
    #[error("Catalog parse error: {0}")]
    Parse(String),
}

pub type Result<T> = std::result::Result<T, SectionError>;
