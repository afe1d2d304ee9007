use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use serde_json::json;

use crate::workflows::listing::collaborators::{
    ImageRef, ImageUpload, ImageUploader, ListingId, ListingSubmitter, SubmissionError,
    UploadError,
};
use crate::workflows::listing::payload::ListingPayload;
use crate::workflows::listing::{
    DraftListing, ListingBlueprint, ListingWizard, ValidationConfig, ValidationEngine,
};

pub(super) const TEST_YEAR: i32 = 2026;

pub(super) fn blueprint() -> Arc<ListingBlueprint> {
    Arc::new(ListingBlueprint::standard_for_year(TEST_YEAR).expect("standard blueprint builds"))
}

pub(super) fn engine() -> ValidationEngine {
    ValidationEngine::new(blueprint(), ValidationConfig::default())
}

pub(super) fn engine_with(config: ValidationConfig) -> ValidationEngine {
    ValidationEngine::new(blueprint(), config)
}

pub(super) fn draft(value: serde_json::Value) -> DraftListing {
    DraftListing::from_value(value).expect("fixture is a JSON object")
}

/// Car listing that passes every step.
pub(super) fn complete_car() -> DraftListing {
    draft(json!({
        "mainCategory": "vehicles",
        "subcategory": "Cars",
        "title": "2018 Toyota Corolla, one owner",
        "description": "Full service history, new tyres last spring, no accidents and garage kept.",
        "price": 12500,
        "location": "Lisbon",
        "images": ["img-front", "img-rear"],
        "details": {
            "transactionType": "sale",
            "make": "Toyota",
            "model": "Corolla",
            "year": 2018,
            "condition": "used",
            "mileage": 64000,
            "fuelType": "hybrid",
            "color": "#C0C0C0",
            "features": ["navigation", "bluetooth"]
        }
    }))
}

/// Light truck listing that passes every step.
pub(super) fn complete_light_truck() -> DraftListing {
    let mut listing = complete_car();
    listing
        .set_field("subcategory", "Light Trucks")
        .expect("valid path");
    listing
        .set_field("title", "Isuzu N-Series box truck")
        .expect("valid path");
    listing
        .set_field("details.make", "Isuzu")
        .expect("valid path");
    listing
        .set_field("details.model", "N-Series")
        .expect("valid path");
    listing
        .set_field("details.maxLoadCapacity", 3500)
        .expect("valid path");
    listing.clear_field("details.features").expect("valid path");
    listing.clear_field("details.color").expect("valid path");
    listing.clear_field("details.fuelType").expect("valid path");
    listing
}

/// Apartment listing that passes every step.
pub(super) fn complete_apartment() -> DraftListing {
    draft(json!({
        "mainCategory": "realEstate",
        "subcategory": "Apartments",
        "title": "Bright two-bedroom flat near the river",
        "description": "South-facing apartment with a renovated kitchen, storage room and a balcony.",
        "price": "1450",
        "location": "  Porto  ",
        "images": ["img-living-room"],
        "details": {
            "transactionType": "rent",
            "propertyType": "apartment",
            "condition": "renovated",
            "area": 86,
            "bedrooms": 2,
            "bathrooms": 1,
            "floor": 3,
            "amenities": ["balcony", "storage"]
        }
    }))
}

/// Wizard positioned on the review step with a valid draft.
pub(super) fn wizard_on_review(listing: DraftListing) -> ListingWizard {
    let mut wizard = ListingWizard::with_draft(engine(), listing);
    for _ in 0..3 {
        wizard.advance().expect("fixture steps are valid");
    }
    wizard
}

#[derive(Default, Clone)]
pub(super) struct RecordingSubmitter {
    payloads: Arc<Mutex<Vec<ListingPayload>>>,
    calls: Arc<AtomicUsize>,
    fail_first: bool,
}

impl RecordingSubmitter {
    pub(super) fn failing_first() -> Self {
        Self {
            fail_first: true,
            ..Self::default()
        }
    }

    pub(super) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub(super) fn payloads(&self) -> Vec<ListingPayload> {
        self.payloads
            .lock()
            .expect("submitter mutex poisoned")
            .clone()
    }
}

impl ListingSubmitter for RecordingSubmitter {
    async fn create_listing(&self, payload: &ListingPayload) -> Result<ListingId, SubmissionError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if self.fail_first && call == 1 {
            return Err(SubmissionError::Transport("gateway timeout".to_string()));
        }
        self.payloads
            .lock()
            .expect("submitter mutex poisoned")
            .push(payload.clone());
        Ok(ListingId(format!("listing-{call}")))
    }
}

#[derive(Default, Clone)]
pub(super) struct CountingUploader {
    uploads: Arc<AtomicUsize>,
}

impl CountingUploader {
    pub(super) fn uploads(&self) -> usize {
        self.uploads.load(Ordering::SeqCst)
    }
}

impl ImageUploader for CountingUploader {
    async fn upload(&self, upload: ImageUpload) -> Result<ImageRef, UploadError> {
        if upload.bytes.is_empty() {
            return Err(UploadError::Rejected(format!("{} is empty", upload.file_name)));
        }
        let count = self.uploads.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(ImageRef(format!("uploaded-{count}-{}", upload.file_name)))
    }
}

pub(super) fn photo(name: &str) -> ImageUpload {
    ImageUpload::new(name, "image/jpeg", vec![0xFF, 0xD8, 0xFF])
}
