//! End-to-end scheduling request: parameters in, schedules or a
//! missing-items report out.
//!
//! 1. Validate the parameters into a [`CourseFilter`].
//! 2. Fetch matching sections from a [`SectionSource`].
//! 3. Stop with [`PlanOutcome::NothingFound`] if nothing matched, or with
//!    [`PlanOutcome::Incomplete`] if some requested CRN or course id matched
//!    nothing. Both carry the missing items; formatting a message from them
//!    is the caller's job.
//! 4. Otherwise build one slot per requested item and enumerate schedules.

use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::error::{SourceError, ValidationError};
use crate::filter::{build_filter, FilterParams};
use crate::generator::{slots_for_request, Generation, ScheduleGenerator, SearchLimits};
use crate::selection::{match_status, missing_requested, MatchStatus, MissingRequested};
use crate::source::SectionSource;

/// Why a request could not be planned at all.
#[derive(Error, Debug)]
pub enum PlanError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Source(#[from] SourceError),
}

/// What a well-formed request produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PlanOutcome {
    /// No section matched the request.
    NothingFound { missing: MissingRequested },
    /// Some sections matched, but these requested items did not.
    Incomplete { missing: MissingRequested },
    /// Every requested item matched; the search ran.
    Scheduled(Generation),
}

/// Run one scheduling request against `source`.
///
/// # Errors
///
/// [`PlanError::Validation`] for malformed parameters and
/// [`PlanError::Source`] when the catalog cannot be read. Finding nothing,
/// or finding no conflict-free combination, is an outcome, not an error.
pub fn plan<S>(
    source: &S,
    institution_id: &str,
    term_id: &str,
    params: &FilterParams,
    limits: SearchLimits,
) -> Result<PlanOutcome, PlanError>
where
    S: SectionSource + ?Sized,
{
    let filter = build_filter(params)?;
    let sections = source.fetch_sections(institution_id, term_id, &filter)?;

    let missing = missing_requested(filter.crns(), params.requested_course_ids(), &sections);

    match match_status(&sections, missing) {
        MatchStatus::NothingFound(missing) => {
            warn!(
                institution = institution_id,
                term = term_id,
                missing = missing.len(),
                "no sections matched request"
            );
            Ok(PlanOutcome::NothingFound { missing })
        }
        MatchStatus::Incomplete(missing) => {
            warn!(
                institution = institution_id,
                term = term_id,
                crns = ?missing.crns,
                course_ids = ?missing.course_ids,
                "some requested items matched no section"
            );
            Ok(PlanOutcome::Incomplete { missing })
        }
        MatchStatus::Complete => {
            let slots = slots_for_request(&filter, &sections);
            let generation = ScheduleGenerator::new(limits).generate(&slots);
            info!(
                institution = institution_id,
                term = term_id,
                sections = sections.len(),
                slots = slots.len(),
                schedules = generation.schedules.len(),
                "planned schedules"
            );
            Ok(PlanOutcome::Scheduled(generation))
        }
    }
}
