//! Catalog drug record and form classification.

use serde::{Deserialize, Serialize};

use super::{DrugId, Price};

/// A medication as served by `GET /api/drugs`.
///
/// The backend owns these records; the client holds read-only copies for
/// the lifetime of a single page load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Drug {
    pub id: DrugId,
    pub code: String,
    pub name: String,
    pub manufacturer: String,
    pub available_units: i32,
    pub dose: String,
    /// Physical form label, e.g. "Tablet". See [`Drug::form_kind`].
    pub form: String,
    pub price: Price,
    /// Comma-separated symptom tags, e.g. `"Fever, Headache"`.
    pub symptom: String,
}

impl Drug {
    /// Iterate the drug's symptom tags, trimmed, skipping empty entries.
    pub fn symptom_tags(&self) -> impl Iterator<Item = &str> {
        self.symptom
            .split(',')
            .map(str::trim)
            .filter(|tag| !tag.is_empty())
    }

    /// Case-insensitive test for a symptom tag.
    #[must_use]
    pub fn treats(&self, symptom: &str) -> bool {
        let wanted = symptom.trim().to_lowercase();
        self.symptom_tags().any(|tag| tag.to_lowercase() == wanted)
    }

    /// Classify the free-form `form` label.
    #[must_use]
    pub fn form_kind(&self) -> DrugForm {
        DrugForm::from_label(&self.form)
    }
}

/// Known physical forms, used by renderers to choose an icon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DrugForm {
    Tablet,
    Syrup,
    Injection,
    /// Any label the storefront has no icon for.
    Other,
}

impl DrugForm {
    /// Classify a form label, ignoring case and surrounding whitespace.
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "tablet" => Self::Tablet,
            "syrup" => Self::Syrup,
            "injection" => Self::Injection,
            _ => Self::Other,
        }
    }

    /// Short glyph for text renderers.
    #[must_use]
    pub const fn icon(self) -> &'static str {
        match self {
            Self::Tablet => "💊",
            Self::Syrup => "🧴",
            Self::Injection => "💉",
            Self::Other => "•",
        }
    }
}

impl std::fmt::Display for DrugForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Tablet => write!(f, "tablet"),
            Self::Syrup => write!(f, "syrup"),
            Self::Injection => write!(f, "injection"),
            Self::Other => write!(f, "other"),
        }
    }
}
