//! The catalog collaborator boundary.
//!
//! A [`SectionSource`] turns an institution's term listing into [`Section`]
//! records, pre-filtered by a [`CourseFilter`]. [`JsonCatalog`] serves
//! listings from a directory of JSON files laid out as
//! `<root>/<institution>/<term>.json`, each holding `{"sections": [...]}`.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::error::SourceError;
use crate::filter::CourseFilter;
use crate::section::Section;
use crate::selection::apply_filter;

/// Something that can list the sections of a term.
pub trait SectionSource {
    /// Fetch the sections of `term_id` at `institution_id` that pass `filter`.
    ///
    /// # Errors
    ///
    /// [`SourceError::Access`] when the listing cannot be reached,
    /// [`SourceError::Parse`] when it does not have the expected shape.
    fn fetch_sections(
        &self,
        institution_id: &str,
        term_id: &str,
        filter: &CourseFilter,
    ) -> Result<Vec<Section>, SourceError>;
}

/// An in-memory listing that ignores institution and term.
impl SectionSource for [Section] {
    fn fetch_sections(
        &self,
        _institution_id: &str,
        _term_id: &str,
        filter: &CourseFilter,
    ) -> Result<Vec<Section>, SourceError> {
        Ok(apply_filter(filter, self))
    }
}

impl SectionSource for Vec<Section> {
    fn fetch_sections(
        &self,
        institution_id: &str,
        term_id: &str,
        filter: &CourseFilter,
    ) -> Result<Vec<Section>, SourceError> {
        self.as_slice()
            .fetch_sections(institution_id, term_id, filter)
    }
}

#[derive(Deserialize)]
struct TermListing {
    sections: Vec<Section>,
}

/// Parse a term listing document, `{"sections": [...]}`.
///
/// Every section and meeting is validated on the way in; the first invalid
/// record fails the whole listing with [`SourceError::Parse`].
pub fn parse_listing(json: &str) -> Result<Vec<Section>, SourceError> {
    serde_json::from_str::<TermListing>(json)
        .map(|listing| listing.sections)
        .map_err(|e| SourceError::Parse(e.to_string()))
}

/// Term listings stored as JSON files under a root directory.
#[derive(Debug, Clone)]
pub struct JsonCatalog {
    root: PathBuf,
}

impl JsonCatalog {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the listing for one term.
    ///
    /// # Errors
    ///
    /// [`SourceError::Access`] if either id is blank or could escape the
    /// catalog root.
    pub fn listing_path(&self, institution_id: &str, term_id: &str) -> Result<PathBuf, SourceError> {
        let institution = checked_id(institution_id, "institution")?;
        let term = checked_id(term_id, "term")?;
        Ok(self.root.join(institution).join(format!("{term}.json")))
    }

    /// Read every section of a term, unfiltered.
    pub fn load_term(&self, institution_id: &str, term_id: &str) -> Result<Vec<Section>, SourceError> {
        let path = self.listing_path(institution_id, term_id)?;
        let raw = fs::read_to_string(&path)
            .map_err(|e| SourceError::Access(format!("{}: {}", path.display(), e)))?;
        let sections = parse_listing(&raw).map_err(|e| match e {
            SourceError::Parse(reason) => SourceError::Parse(format!("{}: {}", path.display(), reason)),
            other => other,
        })?;
        debug!(
            path = %path.display(),
            sections = sections.len(),
            "loaded term listing"
        );
        Ok(sections)
    }
}

impl SectionSource for JsonCatalog {
    fn fetch_sections(
        &self,
        institution_id: &str,
        term_id: &str,
        filter: &CourseFilter,
    ) -> Result<Vec<Section>, SourceError> {
        let sections = self.load_term(institution_id, term_id)?;
        Ok(apply_filter(filter, &sections))
    }
}

fn checked_id<'a>(raw: &'a str, what: &str) -> Result<&'a str, SourceError> {
    let id = raw.trim();
    let safe = !id.is_empty()
        && id != "."
        && id != ".."
        && !id.contains(['/', '\\'])
        && !id.contains("..");
    if safe {
        Ok(id)
    } else {
        Err(SourceError::Access(format!("unknown {what} '{raw}'")))
    }
}
