use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use super::collaborators::{
    ImageRef, ImageUpload, ImageUploader, ListingId, ListingSubmitter, SubmissionError,
    UploadError, VehicleCatalog,
};
use super::draft::{fields, DraftListing, FieldPathError};
use super::messages::ConfigurationNotice;
use super::payload::{ListingPayload, PayloadError};
use super::validation::{ErrorMap, ValidationEngine, WizardStep};

/// Where the wizard currently is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "state")]
pub enum WizardState {
    Editing { step: WizardStep },
    Submitting { ticket: u64 },
    Submitted { listing_id: ListingId },
}

/// A validated snapshot awaiting the submitter's answer.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingSubmission {
    ticket: u64,
    payload: ListingPayload,
    captured_at: DateTime<Utc>,
}

impl PendingSubmission {
    pub fn ticket(&self) -> u64 {
        self.ticket
    }

    pub fn payload(&self) -> &ListingPayload {
        &self.payload
    }

    pub fn captured_at(&self) -> DateTime<Utc> {
        self.captured_at
    }
}

#[derive(Debug, thiserror::Error)]
pub enum WizardError {
    #[error("{step} has {count} invalid field(s)")]
    StepInvalid { step: WizardStep, count: usize },
    #[error("listing has {count} invalid field(s)")]
    FormInvalid {
        count: usize,
        first_invalid: Option<WizardStep>,
    },
    #[error("listings can only be submitted from the review step")]
    NotOnReviewStep,
    #[error("a submission is already in flight")]
    SubmissionInFlight,
    #[error("listing has already been submitted")]
    AlreadySubmitted,
    #[error("submission ticket {0} is not the pending one")]
    StaleSubmission(u64),
    #[error("cannot jump forward from {from} to {to}")]
    InvalidJump { from: WizardStep, to: WizardStep },
    #[error("no image at position {index} (listing has {len})")]
    ImageIndex { index: usize, len: usize },
    #[error(transparent)]
    Path(#[from] FieldPathError),
    #[error(transparent)]
    Payload(#[from] PayloadError),
    #[error(transparent)]
    Submission(#[from] SubmissionError),
    #[error(transparent)]
    Upload(#[from] UploadError),
}

/// Drives one listing draft through the four steps and into submission.
#[derive(Debug)]
pub struct ListingWizard {
    engine: ValidationEngine,
    draft: DraftListing,
    state: WizardState,
    errors: ErrorMap,
    submission_error: Option<SubmissionError>,
    next_ticket: u64,
}

impl ListingWizard {
    pub fn new(engine: ValidationEngine) -> Self {
        Self::with_draft(engine, DraftListing::new())
    }

    /// Resume from an existing draft; starts at the category step.
    pub fn with_draft(engine: ValidationEngine, draft: DraftListing) -> Self {
        Self {
            engine,
            draft,
            state: WizardState::Editing {
                step: WizardStep::Category,
            },
            errors: ErrorMap::new(),
            submission_error: None,
            next_ticket: 1,
        }
    }

    pub fn state(&self) -> &WizardState {
        &self.state
    }

    /// Step being edited; `None` once the wizard has left editing.
    pub fn current_step(&self) -> Option<WizardStep> {
        match self.state {
            WizardState::Editing { step } => Some(step),
            _ => None,
        }
    }

    pub fn draft(&self) -> &DraftListing {
        &self.draft
    }

    pub fn errors(&self) -> &ErrorMap {
        &self.errors
    }

    pub fn submission_error(&self) -> Option<&SubmissionError> {
        self.submission_error.as_ref()
    }

    pub fn notices(&self) -> Vec<ConfigurationNotice> {
        self.engine.notices(&self.draft)
    }

    /// Assign a draft value. Allowed while a submission is pending; the snapshot is unaffected.
    pub fn set_field(&mut self, path: &str, value: impl Into<Value>) -> Result<(), WizardError> {
        if matches!(self.state, WizardState::Submitted { .. }) {
            return Err(WizardError::AlreadySubmitted);
        }
        self.draft.set_field(path, value)?;
        self.errors.clear_path(path);
        debug!(path, "draft field updated");
        Ok(())
    }

    /// Validate the current step and move forward when it passes.
    pub fn advance(&mut self) -> Result<WizardStep, WizardError> {
        let step = self.editing_step()?;
        let errors = self.engine.validate_step(step, &self.draft);
        if !errors.is_empty() {
            let count = errors.len();
            self.errors = errors;
            debug!(step = step.number(), count, "step blocked by validation");
            return Err(WizardError::StepInvalid { step, count });
        }

        self.errors.clear();
        let next = step.next().unwrap_or(step);
        self.move_to(step, next);
        Ok(next)
    }

    /// Move one step back without validating. No-op on the first step.
    pub fn back(&mut self) -> Result<WizardStep, WizardError> {
        let step = self.editing_step()?;
        let previous = step.previous().unwrap_or(step);
        self.errors.clear();
        self.move_to(step, previous);
        Ok(previous)
    }

    /// Return to `target`, which must not be ahead of the current step.
    pub fn jump_to(&mut self, target: WizardStep) -> Result<WizardStep, WizardError> {
        let step = self.editing_step()?;
        if target > step {
            return Err(WizardError::InvalidJump {
                from: step,
                to: target,
            });
        }
        self.move_to(step, target);
        Ok(target)
    }

    /// Validate the whole form and freeze a payload for submission.
    pub fn begin_submit(&mut self) -> Result<PendingSubmission, WizardError> {
        match self.state {
            WizardState::Editing {
                step: WizardStep::Review,
            } => {}
            WizardState::Editing { .. } => return Err(WizardError::NotOnReviewStep),
            WizardState::Submitting { .. } => {
                warn!("submission requested while another is in flight");
                return Err(WizardError::SubmissionInFlight);
            }
            WizardState::Submitted { .. } => return Err(WizardError::AlreadySubmitted),
        }

        let errors = self.engine.validate_form(&self.draft);
        if !errors.is_empty() {
            let count = errors.len();
            let first_invalid = self.engine.first_invalid_step(&self.draft);
            self.errors = errors;
            debug!(count, "submission blocked by validation");
            return Err(WizardError::FormInvalid {
                count,
                first_invalid,
            });
        }

        let payload = ListingPayload::from_draft(&self.draft)?;
        let ticket = self.next_ticket;
        self.next_ticket += 1;
        self.errors.clear();
        self.submission_error = None;
        self.state = WizardState::Submitting { ticket };
        debug!(ticket, "submission started");

        Ok(PendingSubmission {
            ticket,
            payload,
            captured_at: Utc::now(),
        })
    }

    /// Apply the submitter's answer for `ticket`.
    pub fn complete_submit(
        &mut self,
        ticket: u64,
        outcome: Result<ListingId, SubmissionError>,
    ) -> Result<ListingId, WizardError> {
        match self.state {
            WizardState::Submitting { ticket: pending } if pending == ticket => {}
            _ => return Err(WizardError::StaleSubmission(ticket)),
        }

        match outcome {
            Ok(listing_id) => {
                info!(ticket, listing_id = %listing_id, "listing submitted");
                self.state = WizardState::Submitted {
                    listing_id: listing_id.clone(),
                };
                Ok(listing_id)
            }
            Err(error) => {
                warn!(ticket, error = %error, "listing submission failed");
                self.state = WizardState::Editing {
                    step: WizardStep::Review,
                };
                self.submission_error = Some(error.clone());
                Err(WizardError::Submission(error))
            }
        }
    }

    pub async fn submit<S>(&mut self, submitter: &S) -> Result<ListingId, WizardError>
    where
        S: ListingSubmitter,
    {
        let pending = self.begin_submit()?;
        let outcome = submitter.create_listing(pending.payload()).await;
        self.complete_submit(pending.ticket(), outcome)
    }

    /// Upload an image and append its reference to `images`.
    pub async fn attach_image<U>(
        &mut self,
        uploader: &U,
        upload: ImageUpload,
    ) -> Result<ImageRef, WizardError>
    where
        U: ImageUploader,
    {
        if matches!(self.state, WizardState::Submitted { .. }) {
            return Err(WizardError::AlreadySubmitted);
        }
        let max = self.engine.config().max_images;
        if self.draft.images().len() >= max {
            return Err(UploadError::LimitReached { max }.into());
        }

        let image = uploader.upload(upload).await?;
        let mut images = self.draft.images().to_vec();
        images.push(Value::String(image.0.clone()));
        self.set_field(fields::IMAGES, Value::Array(images))?;
        debug!(image = image.as_str(), "image attached");
        Ok(image)
    }

    pub fn remove_image(&mut self, index: usize) -> Result<Value, WizardError> {
        let mut images = self.draft.images().to_vec();
        if index >= images.len() {
            return Err(WizardError::ImageIndex {
                index,
                len: images.len(),
            });
        }
        let removed = images.remove(index);
        self.set_field(fields::IMAGES, Value::Array(images))?;
        Ok(removed)
    }

    /// Makes for the draft's vehicle type; empty outside vehicle listings.
    pub fn make_choices(&self, catalog: &dyn VehicleCatalog) -> Vec<String> {
        self.engine
            .blueprint()
            .vehicle_type_for(&self.draft)
            .map(|vehicle_type| catalog.list_makes(vehicle_type))
            .unwrap_or_default()
    }

    /// Models for the chosen `details.make`.
    pub fn model_choices(&self, catalog: &dyn VehicleCatalog) -> Vec<String> {
        let Some(vehicle_type) = self.engine.blueprint().vehicle_type_for(&self.draft) else {
            return Vec::new();
        };
        match self.draft.text("details.make") {
            Some(make) if !make.is_empty() => catalog.list_models(make, vehicle_type),
            _ => Vec::new(),
        }
    }

    fn editing_step(&self) -> Result<WizardStep, WizardError> {
        match self.state {
            WizardState::Editing { step } => Ok(step),
            WizardState::Submitting { .. } => Err(WizardError::SubmissionInFlight),
            WizardState::Submitted { .. } => Err(WizardError::AlreadySubmitted),
        }
    }

    fn move_to(&mut self, from: WizardStep, to: WizardStep) {
        if from != to {
            debug!(from = from.number(), to = to.number(), "wizard step changed");
        }
        self.state = WizardState::Editing { step: to };
    }
}
