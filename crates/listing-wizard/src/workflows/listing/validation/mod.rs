mod config;
mod steps;

pub use config::{
    ValidationConfig, DEFAULT_MAX_IMAGES, DEFAULT_REVIEW_DESCRIPTION_MIN_CHARS,
    DEFAULT_TITLE_MIN_CHARS,
};

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use super::blueprint::ListingBlueprint;
use super::draft::DraftListing;
use super::messages::{keys, ConfigurationNotice, FieldError, Translator};
use super::taxonomy::MainCategory;

/// The four wizard steps, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    Category = 1,
    BasicDetails = 2,
    AdvancedDetails = 3,
    Review = 4,
}

impl WizardStep {
    pub const ALL: [WizardStep; 4] = [
        WizardStep::Category,
        WizardStep::BasicDetails,
        WizardStep::AdvancedDetails,
        WizardStep::Review,
    ];

    pub const fn number(self) -> u8 {
        self as u8
    }

    pub fn from_number(number: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|step| step.number() == number)
    }

    pub fn next(self) -> Option<Self> {
        Self::from_number(self.number() + 1)
    }

    pub fn previous(self) -> Option<Self> {
        self.number().checked_sub(1).and_then(Self::from_number)
    }

    pub const fn label(self) -> &'static str {
        match self {
            WizardStep::Category => "category",
            WizardStep::BasicDetails => "basic_details",
            WizardStep::AdvancedDetails => "advanced_details",
            WizardStep::Review => "review",
        }
    }
}

impl fmt::Display for WizardStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "step {} ({})", self.number(), self.label())
    }
}

/// Field path → first error recorded for it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ErrorMap {
    entries: BTreeMap<String, FieldError>,
}

impl ErrorMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `error` unless the field already has one. Returns whether it was kept.
    pub fn record(&mut self, field: impl Into<String>, error: FieldError) -> bool {
        let field = field.into();
        if self.entries.contains_key(&field) {
            return false;
        }
        self.entries.insert(field, error);
        true
    }

    /// Union with `other`; existing entries win.
    pub fn merge(&mut self, other: ErrorMap) {
        for (field, error) in other.entries {
            self.record(field, error);
        }
    }

    pub fn get(&self, field: &str) -> Option<&FieldError> {
        self.entries.get(field)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.entries.contains_key(field)
    }

    /// Drops the error for `path` and for every field nested under it.
    pub fn clear_path(&mut self, path: &str) {
        let nested = format!("{path}.");
        self.entries
            .retain(|field, _| field != path && !field.starts_with(&nested));
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldError)> {
        self.entries
            .iter()
            .map(|(field, error)| (field.as_str(), error))
    }

    /// Field path → translated message.
    pub fn render(&self, translator: &dyn Translator) -> BTreeMap<String, String> {
        self.entries
            .iter()
            .map(|(field, error)| (field.clone(), error.render(translator)))
            .collect()
    }
}

/// Pure validator for wizard steps, bound to an immutable blueprint.
#[derive(Debug, Clone)]
pub struct ValidationEngine {
    blueprint: Arc<ListingBlueprint>,
    config: ValidationConfig,
}

impl ValidationEngine {
    pub fn new(blueprint: Arc<ListingBlueprint>, config: ValidationConfig) -> Self {
        Self { blueprint, config }
    }

    pub fn blueprint(&self) -> &ListingBlueprint {
        &self.blueprint
    }

    pub fn config(&self) -> &ValidationConfig {
        &self.config
    }

    pub fn validate_step(&self, step: WizardStep, draft: &DraftListing) -> ErrorMap {
        let errors = match step {
            WizardStep::Category => steps::category(draft),
            WizardStep::BasicDetails => steps::basic_details(draft, &self.config),
            WizardStep::AdvancedDetails => steps::advanced_details(draft, &self.blueprint),
            WizardStep::Review => steps::review(draft, &self.config),
        };
        debug!(step = step.number(), errors = errors.len(), "validated listing step");
        errors
    }

    /// Every step in order; the earliest step's message wins for a shared field.
    pub fn validate_form(&self, draft: &DraftListing) -> ErrorMap {
        WizardStep::ALL
            .into_iter()
            .fold(ErrorMap::new(), |mut errors, step| {
                errors.merge(self.validate_step(step, draft));
                errors
            })
    }

    /// First step whose own validation fails.
    pub fn first_invalid_step(&self, draft: &DraftListing) -> Option<WizardStep> {
        WizardStep::ALL
            .into_iter()
            .find(|step| !self.validate_step(*step, draft).is_empty())
    }

    /// Non-blocking diagnostics about categories outside the modeled catalog.
    pub fn notices(&self, draft: &DraftListing) -> Vec<ConfigurationNotice> {
        let Some(raw) = draft.main_category().filter(|raw| !raw.is_empty()) else {
            return Vec::new();
        };

        let Some(main) = MainCategory::from_key(raw) else {
            return vec![ConfigurationNotice::new(keys::UNSUPPORTED_CATEGORY).with_param("category", raw)];
        };

        match (draft.subcategory(), self.blueprint.schema_for(draft)) {
            (Some(subcategory), Some(schema)) if schema.is_fallback() => {
                vec![ConfigurationNotice::new(keys::SCHEMA_FALLBACK)
                    .with_param("category", main.key())
                    .with_param("subcategory", subcategory)]
            }
            _ => Vec::new(),
        }
    }
}
