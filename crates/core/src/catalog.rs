//! Catalog filtering.
//!
//! The products page narrows the loaded drug list with three predicates
//! joined by logical AND:
//!
//! - form: exact, case-insensitive match against [`Drug::form`]
//! - symptom: case-insensitive membership in [`Drug::symptom_tags`]
//! - search: case-insensitive substring of [`Drug::name`], after trimming
//!
//! Filtering never reorders: the result is always a subsequence of the
//! input.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::types::Drug;

/// Label that selects every value.
pub const ALL: &str = "All";

/// A drop-down selection: everything, or one value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Selector {
    #[default]
    All,
    Only(String),
}

impl Selector {
    /// Parse a drop-down value. `"All"` and blank input select everything.
    #[must_use]
    pub fn parse(value: &str) -> Self {
        let value = value.trim();
        if value.is_empty() || value == ALL {
            Self::All
        } else {
            Self::Only(value.to_string())
        }
    }
}

impl From<Option<&str>> for Selector {
    fn from(value: Option<&str>) -> Self {
        value.map_or(Self::All, Self::parse)
    }
}

impl std::fmt::Display for Selector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::All => f.write_str(ALL),
            Self::Only(value) => f.write_str(value),
        }
    }
}

/// The three catalog predicates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogFilter {
    pub form: Selector,
    pub symptom: Selector,
    pub search: String,
}

impl CatalogFilter {
    /// A filter that keeps every drug.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Build a filter from raw UI values.
    #[must_use]
    pub fn new(form: &str, symptom: &str, search: &str) -> Self {
        Self {
            form: Selector::parse(form),
            symptom: Selector::parse(symptom),
            search: search.to_string(),
        }
    }

    /// Whether `drug` passes all three predicates.
    #[must_use]
    pub fn matches(&self, drug: &Drug) -> bool {
        self.matches_form(drug) && self.matches_symptom(drug) && self.matches_search(drug)
    }

    fn matches_form(&self, drug: &Drug) -> bool {
        match &self.form {
            Selector::All => true,
            Selector::Only(form) => drug.form.to_lowercase() == form.to_lowercase(),
        }
    }

    fn matches_symptom(&self, drug: &Drug) -> bool {
        match &self.symptom {
            Selector::All => true,
            Selector::Only(symptom) => drug.treats(symptom),
        }
    }

    fn matches_search(&self, drug: &Drug) -> bool {
        let needle = self.search.trim().to_lowercase();
        needle.is_empty() || drug.name.to_lowercase().contains(&needle)
    }

    /// The visible subset of `drugs`, in input order.
    #[must_use]
    pub fn apply<'a>(&self, drugs: &'a [Drug]) -> Vec<&'a Drug> {
        drugs.iter().filter(|drug| self.matches(drug)).collect()
    }
}

/// Drop-down values derived from the loaded drug list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterOptions {
    /// Distinct `form` values, in first-seen order.
    pub forms: Vec<String>,
    /// Distinct trimmed symptom tags, in first-seen order.
    pub symptoms: Vec<String>,
}

impl FilterOptions {
    /// Recompute the options for a freshly loaded list.
    #[must_use]
    pub fn from_drugs(drugs: &[Drug]) -> Self {
        let mut options = Self::default();
        let mut seen_forms = HashSet::new();
        let mut seen_symptoms = HashSet::new();

        for drug in drugs {
            if seen_forms.insert(drug.form.as_str()) {
                options.forms.push(drug.form.clone());
            }
            for tag in drug.symptom_tags() {
                if seen_symptoms.insert(tag) {
                    options.symptoms.push(tag.to_string());
                }
            }
        }

        options
    }
}
