//! Query engine
//!
//! Applies the free-text, category and date predicates to a dataset. Results
//! are indices into the dataset so the filtered view never copies records and
//! always keeps dataset order.

mod facets;

pub use facets::Facets;

use crate::dataset::{Dataset, Record};
use serde::{Deserialize, Serialize};

/// Active search, category and date predicates
///
/// Empty values mean "any" and always match.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterCriteria {
    /// Lower-cased, trimmed search term
    search: String,
    problem_type: Option<String>,
    date_prefix: Option<String>,
}

impl FilterCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the free-text term (trimmed, matched case-insensitively)
    pub fn with_search(mut self, term: impl AsRef<str>) -> Self {
        self.search = term.as_ref().trim().to_lowercase();
        self
    }

    /// Restrict to an exact category; empty means any.
    ///
    /// `unknown` selects records without a `problem_type`, matching the
    /// category the facets and cards show for them.
    pub fn with_problem_type(mut self, problem_type: Option<&str>) -> Self {
        self.problem_type = problem_type.filter(|t| !t.is_empty()).map(str::to_string);
        self
    }

    /// Restrict to timestamps starting with `prefix`; empty means any
    pub fn with_date_prefix(mut self, prefix: Option<&str>) -> Self {
        self.date_prefix = prefix.filter(|p| !p.is_empty()).map(str::to_string);
        self
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn problem_type(&self) -> Option<&str> {
        self.problem_type.as_deref()
    }

    pub fn date_prefix(&self) -> Option<&str> {
        self.date_prefix.as_deref()
    }

    /// True when no predicate is active
    pub fn is_empty(&self) -> bool {
        self.search.is_empty() && self.problem_type.is_none() && self.date_prefix.is_none()
    }

    /// Test a single record against every active predicate
    pub fn matches(&self, record: &Record) -> bool {
        self.matches_search(record) && self.matches_problem_type(record) && self.matches_date(record)
    }

    fn matches_search(&self, record: &Record) -> bool {
        if self.search.is_empty() {
            return true;
        }
        [&record.name, &record.description, &record.problem_type]
            .iter()
            .any(|field| field.to_lowercase().contains(&self.search))
    }

    fn matches_problem_type(&self, record: &Record) -> bool {
        match &self.problem_type {
            Some(problem_type) => record.category() == problem_type.as_str(),
            None => true,
        }
    }

    fn matches_date(&self, record: &Record) -> bool {
        match &self.date_prefix {
            Some(prefix) => record.datetime.starts_with(prefix.as_str()),
            None => true,
        }
    }
}

/// Indices of the records matching `criteria`, in dataset order
pub fn filter(dataset: &Dataset, criteria: &FilterCriteria) -> Vec<usize> {
    dataset
        .records()
        .iter()
        .enumerate()
        .filter(|(_, record)| criteria.matches(record))
        .map(|(index, _)| index)
        .collect()
}
