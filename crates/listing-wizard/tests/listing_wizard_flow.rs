//! End-to-end listing creation through the public wizard facade: a user walks the four steps,
//! fixes what each step reports, uploads photos and submits against stub collaborators.

mod common {
    use std::sync::{Arc, Mutex};

    use listing_wizard::workflows::listing::{
        ImageRef, ImageUpload, ImageUploader, ListingBlueprint, ListingId, ListingPayload,
        ListingSubmitter, SubmissionError, UploadError, ValidationConfig, ValidationEngine,
    };

    pub(super) fn engine() -> ValidationEngine {
        let blueprint = ListingBlueprint::standard_for_year(2026).expect("blueprint builds");
        ValidationEngine::new(Arc::new(blueprint), ValidationConfig::default())
    }

    #[derive(Default, Clone)]
    pub(super) struct MemorySubmitter {
        pub(super) received: Arc<Mutex<Vec<ListingPayload>>>,
    }

    impl ListingSubmitter for MemorySubmitter {
        async fn create_listing(
            &self,
            payload: &ListingPayload,
        ) -> Result<ListingId, SubmissionError> {
            let mut guard = self.received.lock().expect("submitter mutex poisoned");
            guard.push(payload.clone());
            Ok(ListingId(format!("L-{:04}", guard.len())))
        }
    }

    pub(super) struct RejectingSubmitter;

    impl ListingSubmitter for RejectingSubmitter {
        async fn create_listing(
            &self,
            _payload: &ListingPayload,
        ) -> Result<ListingId, SubmissionError> {
            Err(SubmissionError::Rejected("duplicate listing".to_string()))
        }
    }

    pub(super) struct PassthroughUploader;

    impl ImageUploader for PassthroughUploader {
        async fn upload(&self, upload: ImageUpload) -> Result<ImageRef, UploadError> {
            Ok(ImageRef(format!("cdn://{}", upload.file_name)))
        }
    }

    pub(super) fn photo(name: &str) -> ImageUpload {
        ImageUpload::new(name, "image/jpeg", vec![1, 2, 3])
    }
}

use common::*;
use listing_wizard::workflows::listing::{
    keys, EnglishCatalog, ListingDetails, ListingWizard, MainCategory, SubmissionError,
    WizardError, WizardState, WizardStep,
};

#[tokio::test]
async fn apartment_listing_walks_all_steps_and_submits() {
    let submitter = MemorySubmitter::default();
    let mut wizard = ListingWizard::new(engine());

    wizard.set_field("mainCategory", "realEstate").expect("editable");
    wizard.set_field("details.transactionType", "rent").expect("editable");
    match wizard.advance() {
        Err(WizardError::StepInvalid { step: WizardStep::Category, .. }) => {}
        other => panic!("expected missing subcategory, got {other:?}"),
    }
    assert_eq!(
        wizard.errors().render(&EnglishCatalog).get("subcategory").map(String::as_str),
        Some("subcategory is required")
    );

    wizard.set_field("subcategory", "Apartments").expect("editable");
    assert_eq!(wizard.advance().expect("step 1 valid"), WizardStep::BasicDetails);

    wizard.set_field("title", "Sunny loft").expect("editable");
    wizard.set_field("price", "980").expect("editable");
    wizard.set_field("location", "Braga").expect("editable");
    wizard
        .set_field("description", "Top-floor loft with skylights.")
        .expect("editable");
    wizard
        .attach_image(&PassthroughUploader, photo("loft.jpg"))
        .await
        .expect("upload succeeds");
    assert_eq!(wizard.advance().expect("step 2 valid"), WizardStep::AdvancedDetails);

    wizard.set_field("details.propertyType", "apartment").expect("editable");
    wizard.set_field("details.condition", "good").expect("editable");
    wizard.set_field("details.area", 54).expect("editable");
    match wizard.advance() {
        Err(WizardError::StepInvalid { step: WizardStep::AdvancedDetails, count: 3 }) => {}
        other => panic!("expected room details to be required, got {other:?}"),
    }
    wizard.set_field("details.bedrooms", 1).expect("editable");
    wizard.set_field("details.bathrooms", 1).expect("editable");
    wizard.set_field("details.floor", 0).expect("editable");
    assert_eq!(wizard.advance().expect("step 3 valid"), WizardStep::Review);

    match wizard.advance() {
        Err(WizardError::StepInvalid { step: WizardStep::Review, .. }) => {}
        other => panic!("expected short description to block review, got {other:?}"),
    }
    assert_eq!(
        wizard.errors().get("description").map(|error| error.key),
        Some(keys::DESCRIPTION_MIN_LENGTH)
    );
    wizard
        .set_field(
            "description",
            "Top-floor loft with skylights, exposed beams and a quiet street view.",
        )
        .expect("editable");

    let listing_id = wizard.submit(&submitter).await.expect("submission succeeds");
    assert_eq!(listing_id.to_string(), "L-0001");
    assert_eq!(wizard.state(), &WizardState::Submitted { listing_id });

    let received = submitter.received.lock().expect("submitter mutex poisoned");
    assert_eq!(received.len(), 1);
    let payload = &received[0];
    assert_eq!(payload.main_category, MainCategory::RealEstate);
    assert_eq!(payload.price, 980.0);
    assert_eq!(payload.images[0].as_str(), "cdn://loft.jpg");
    match &payload.details {
        ListingDetails::RealEstate(details) => {
            assert_eq!(details.floor, Some(0));
            assert_eq!(details.area, Some(54.0));
            assert_eq!(details.transaction_type, "rent");
        }
        other => panic!("expected real estate details, got {other:?}"),
    }
}

#[tokio::test]
async fn rejected_submission_keeps_the_draft_on_review() {
    let mut wizard = ListingWizard::new(engine());
    for (path, value) in [
        ("mainCategory", serde_json::json!("vehicles")),
        ("subcategory", serde_json::json!("Boats")),
        ("title", serde_json::json!("Bayliner VR5 bowrider")),
        ("price", serde_json::json!(31000)),
        ("location", serde_json::json!("Faro marina")),
        (
            "description",
            serde_json::json!("Trailer included, engine serviced in March, stored indoors over winter."),
        ),
        ("images", serde_json::json!(["cdn://boat.jpg"])),
        ("details.transactionType", serde_json::json!("sale")),
        ("details.make", serde_json::json!("Bayliner")),
        ("details.model", serde_json::json!("VR5")),
        ("details.year", serde_json::json!(2021)),
        ("details.condition", serde_json::json!("used")),
    ] {
        wizard.set_field(path, value).expect("editable");
    }

    wizard.advance().expect("step 1 valid");
    wizard.advance().expect("step 2 valid");
    match wizard.advance() {
        Err(WizardError::StepInvalid { step: WizardStep::AdvancedDetails, count: 1 }) => {}
        other => panic!("expected boat length to be required, got {other:?}"),
    }
    assert!(wizard.errors().contains("details.length"));
    wizard.set_field("details.length", 5.3).expect("editable");
    wizard.advance().expect("step 3 valid");

    match wizard.submit(&RejectingSubmitter).await {
        Err(WizardError::Submission(SubmissionError::Rejected(reason))) => {
            assert_eq!(reason, "duplicate listing")
        }
        other => panic!("expected rejection, got {other:?}"),
    }
    assert_eq!(wizard.current_step(), Some(WizardStep::Review));
    assert_eq!(wizard.draft().text("details.make"), Some("Bayliner"));
    assert!(wizard.submission_error().is_some());
}
