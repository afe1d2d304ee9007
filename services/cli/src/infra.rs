use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use listing_wizard::config::AppConfig;
use listing_wizard::error::AppError;
use listing_wizard::workflows::listing::{
    DraftListing, ImageRef, ImageUpload, ImageUploader, ListingBlueprint, ListingId,
    ListingPayload, ListingSubmitter, SubmissionError, UploadError, ValidationEngine,
};
use tracing::debug;

pub(crate) fn build_engine(config: &AppConfig) -> Result<ValidationEngine, AppError> {
    let blueprint = ListingBlueprint::standard()?;
    Ok(ValidationEngine::new(
        Arc::new(blueprint),
        config.validation.clone(),
    ))
}

pub(crate) fn load_draft(path: &Path) -> Result<DraftListing, AppError> {
    let raw = std::fs::read_to_string(path)?;
    let value: serde_json::Value = serde_json::from_str(&raw)?;
    Ok(DraftListing::from_value(value)?)
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryListingSubmitter {
    listings: Arc<Mutex<Vec<(ListingId, ListingPayload)>>>,
    attempts: Arc<AtomicUsize>,
    fail_first: bool,
}

impl InMemoryListingSubmitter {
    pub(crate) fn failing_first() -> Self {
        Self {
            fail_first: true,
            ..Self::default()
        }
    }

    pub(crate) fn listings(&self) -> Vec<(ListingId, ListingPayload)> {
        self.listings
            .lock()
            .expect("listing store mutex poisoned")
            .clone()
    }
}

impl ListingSubmitter for InMemoryListingSubmitter {
    async fn create_listing(&self, payload: &ListingPayload) -> Result<ListingId, SubmissionError> {
        let attempt = self.attempts.fetch_add(1, Ordering::SeqCst) + 1;
        if self.fail_first && attempt == 1 {
            return Err(SubmissionError::Transport(
                "listing service timed out".to_string(),
            ));
        }

        let mut guard = self.listings.lock().expect("listing store mutex poisoned");
        let id = ListingId(format!("LST-{:05}", guard.len() + 1));
        guard.push((id.clone(), payload.clone()));
        debug!(listing_id = %id, "stored listing in memory");
        Ok(id)
    }
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryImageUploader {
    stored: Arc<Mutex<Vec<ImageUpload>>>,
}

impl ImageUploader for InMemoryImageUploader {
    async fn upload(&self, upload: ImageUpload) -> Result<ImageRef, UploadError> {
        if !upload.content_type.starts_with("image/") {
            return Err(UploadError::Rejected(format!(
                "{} is not an image",
                upload.file_name
            )));
        }
        let mut guard = self.stored.lock().expect("image store mutex poisoned");
        let reference = ImageRef(format!("memory://images/{}/{}", guard.len() + 1, upload.file_name));
        guard.push(upload);
        Ok(reference)
    }
}
