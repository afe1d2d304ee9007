//! Classified-listing creation: category taxonomy, per-subcategory field schemas, category
//! rule tables, the step validation engine and the wizard controller that drives a draft
//! through four steps into submission.
//!
//! The blueprint (taxonomy, schemas, rules) is built once and shared behind an `Arc`.
//! Everything the engine reports is a message key plus parameters; rendering goes through
//! a [`Translator`].

pub mod blueprint;
pub mod collaborators;
pub mod draft;
pub mod messages;
pub mod payload;
pub mod rules;
pub mod schema;
pub mod taxonomy;
pub mod validation;
pub mod wizard;

#[cfg(test)]
mod tests;

pub use blueprint::ListingBlueprint;
pub use collaborators::{
    ImageRef, ImageUpload, ImageUploader, ListingId, ListingSubmitter, StaticVehicleCatalog,
    SubmissionError, UploadError, VehicleCatalog,
};
pub use draft::{fields, DraftListing, FieldPathError};
pub use messages::{
    keys, ConfigurationNotice, EnglishCatalog, ErrorKind, FieldError, MessageParams, Translator,
};
pub use payload::{ListingDetails, ListingPayload, PayloadError, RealEstateDetails, VehicleDetails};
pub use rules::{CategoryRuleSet, RuleTable, StructuralRule};
pub use schema::{
    FieldDescriptor, FieldOption, FieldType, ResolvedSchema, SchemaError, SchemaRegistry,
    SchemaSource, Section,
};
pub use taxonomy::{Category, CategoryTaxonomy, MainCategory, Subcategory};
pub use validation::{ErrorMap, ValidationConfig, ValidationEngine, WizardStep};
pub use wizard::{ListingWizard, PendingSubmission, WizardError, WizardState};
