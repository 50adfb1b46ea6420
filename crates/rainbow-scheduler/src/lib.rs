//! # rainbow-scheduler
//!
//! Conflict-free weekly course schedules from catalog sections.
//!
//! Given the sections a student wants (specific CRNs, or any section of a
//! course) and optional constraints (time window, modality, days), the
//! engine selects candidate sections and enumerates every combination of one
//! section per request in which no two sections meet at the same time.
//!
//! ## Modules
//!
//! - [`time`]: Day codes, day sets, `HH:MM` parsing
//! - [`section`]: `Meeting` and `Section` records with validated invariants
//! - [`conflict`]: Meeting/section overlap predicate and conflict reports
//! - [`filter`]: Request parameters → validated `CourseFilter`
//! - [`selection`]: Apply a filter to a listing; report missing requests
//! - [`generator`]: Slot grouping and the pruned schedule search
//! - [`source`]: Catalog collaborator boundary and a JSON-directory catalog
//! - [`planner`]: One full scheduling request, end to end
//! - [`error`]: Error types

pub mod conflict;
pub mod error;
pub mod filter;
pub mod generator;
pub mod planner;
pub mod section;
pub mod selection;
pub mod source;
pub mod time;

pub use conflict::{find_conflicts, Conflict};
pub use error::{FilterField, SectionError, SourceError, ValidationError};
pub use filter::{build_filter, CourseFilter, CourseFilterBuilder, FilterParams};
pub use generator::{
    generate_schedules, group_by_course, slots_for_request, Generation, PotentialSchedule,
    ScheduleGenerator, SearchLimits, Slot, SlotKind,
};
pub use planner::{plan, PlanError, PlanOutcome};
pub use section::{normalize_course_id, Meeting, Section};
pub use selection::{apply_filter, match_status, missing_requested, MatchStatus, MissingRequested};
pub use source::{parse_listing, JsonCatalog, SectionSource};
pub use time::{Day, DaySet};
