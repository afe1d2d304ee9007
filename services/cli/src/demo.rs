use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::infra::{load_draft, InMemoryImageUploader, InMemoryListingSubmitter};
use clap::Args;
use listing_wizard::error::AppError;
use listing_wizard::workflows::listing::{
    EnglishCatalog, FieldDescriptor, ImageUpload, ListingSubmitter, ListingWizard, MainCategory,
    SchemaSource, StaticVehicleCatalog, ValidationEngine, WizardError, WizardStep,
};
use serde::Serialize;
use serde_json::{json, Value};

#[derive(Args, Debug)]
pub(crate) struct SchemaArgs {
    /// Main category key (vehicles or realEstate)
    #[arg(long, value_parser = parse_category)]
    pub(crate) category: MainCategory,
    /// Subcategory display name or schema key; omit for the base fields
    #[arg(long)]
    pub(crate) subcategory: Option<String>,
}

#[derive(Args, Debug)]
pub(crate) struct ValidateArgs {
    /// Path to a draft listing JSON object
    #[arg(long)]
    pub(crate) draft: PathBuf,
    /// Validate a single step (1-4) instead of the whole form
    #[arg(long, value_parser = parse_step)]
    pub(crate) step: Option<WizardStep>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Make the listing service fail the first submission attempt
    #[arg(long)]
    pub(crate) fail_first_submit: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SchemaReport<'a> {
    category: MainCategory,
    #[serde(skip_serializing_if = "Option::is_none")]
    subcategory: Option<&'a str>,
    source: SchemaSource,
    fields: &'a [FieldDescriptor],
}

#[derive(Debug, Serialize)]
struct ValidationReport {
    scope: String,
    valid: bool,
    errors: BTreeMap<String, String>,
    notices: Vec<String>,
}

fn parse_category(raw: &str) -> Result<MainCategory, String> {
    MainCategory::from_key(raw).ok_or_else(|| {
        let known: Vec<_> = MainCategory::ALL.iter().map(|main| main.key()).collect();
        format!("unknown category '{raw}' (expected one of {})", known.join(", "))
    })
}

fn parse_step(raw: &str) -> Result<WizardStep, String> {
    raw.trim()
        .parse::<u8>()
        .ok()
        .and_then(WizardStep::from_number)
        .ok_or_else(|| format!("step must be 1, 2, 3 or 4, got '{raw}'"))
}

pub(crate) fn run_schema(engine: &ValidationEngine, args: SchemaArgs) -> Result<(), AppError> {
    let SchemaArgs {
        category,
        subcategory,
    } = args;

    let resolved = engine
        .blueprint()
        .schema_for_subcategory(category, subcategory.as_deref());
    let report = SchemaReport {
        category,
        subcategory: subcategory.as_deref(),
        source: resolved.source,
        fields: resolved.fields,
    };

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

pub(crate) fn run_validate(engine: &ValidationEngine, args: ValidateArgs) -> Result<(), AppError> {
    let draft = load_draft(&args.draft)?;
    let (scope, errors) = match args.step {
        Some(step) => (step.to_string(), engine.validate_step(step, &draft)),
        None => ("form".to_string(), engine.validate_form(&draft)),
    };

    let report = ValidationReport {
        scope,
        valid: errors.is_empty(),
        errors: errors.render(&EnglishCatalog),
        notices: engine
            .notices(&draft)
            .iter()
            .map(|notice| notice.render(&EnglishCatalog))
            .collect(),
    };

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

pub(crate) async fn run_demo(engine: ValidationEngine, args: DemoArgs) -> Result<(), AppError> {
    let submitter = if args.fail_first_submit {
        InMemoryListingSubmitter::failing_first()
    } else {
        InMemoryListingSubmitter::default()
    };
    let uploader = InMemoryImageUploader::default();
    let catalog = StaticVehicleCatalog::standard();
    let mut wizard = ListingWizard::new(engine);

    println!("Listing wizard demo");

    println!("\n{}", WizardStep::Category);
    wizard.set_field("mainCategory", "vehicles")?;
    wizard.set_field("details.transactionType", "sale")?;
    attempt_advance(&mut wizard)?;
    wizard.set_field("subcategory", "Light Trucks")?;
    attempt_advance(&mut wizard)?;

    println!("\n{}", WizardStep::BasicDetails);
    wizard.set_field("title", "Box truck")?;
    wizard.set_field("price", "18900")?;
    wizard.set_field("location", "Coimbra")?;
    wizard.set_field("description", "Isuzu N-Series with tail lift.")?;
    attempt_advance(&mut wizard)?;
    wizard.set_field("title", "Isuzu N-Series box truck with tail lift")?;
    for name in ["front.jpg", "cargo-bay.jpg"] {
        let image = wizard
            .attach_image(&uploader, ImageUpload::new(name, "image/jpeg", vec![0xFF, 0xD8]))
            .await?;
        println!("  uploaded {}", image.as_str());
    }
    attempt_advance(&mut wizard)?;

    println!("\n{}", WizardStep::AdvancedDetails);
    println!("  makes offered: {}", wizard.make_choices(&catalog).join(", "));
    wizard.set_field("details.make", "Isuzu")?;
    println!("  models offered: {}", wizard.model_choices(&catalog).join(", "));
    for (path, value) in [
        ("details.model", json!("N-Series")),
        ("details.year", json!(2019)),
        ("details.condition", json!("used")),
        ("details.mileage", json!(142000)),
        ("details.fuelType", json!("diesel")),
    ] {
        wizard.set_field(path, value)?;
    }
    attempt_advance(&mut wizard)?;
    wizard.set_field("details.maxLoadCapacity", 3500)?;
    attempt_advance(&mut wizard)?;

    println!("\n{}", WizardStep::Review);
    attempt_advance(&mut wizard)?;
    wizard.set_field(
        "description",
        "Isuzu N-Series box truck with hydraulic tail lift, full service history and new brakes.",
    )?;
    for notice in wizard.notices() {
        println!("  notice: {}", notice.render(&EnglishCatalog));
    }

    loop {
        let pending = wizard.begin_submit()?;
        println!(
            "  submitting snapshot #{} captured at {}",
            pending.ticket(),
            pending.captured_at().format("%Y-%m-%d %H:%M:%S UTC")
        );
        let outcome = submitter.create_listing(pending.payload()).await;

        match wizard.complete_submit(pending.ticket(), outcome) {
            Ok(listing_id) => {
                println!("  listing created: {listing_id}");
                break;
            }
            Err(WizardError::Submission(error)) => {
                println!("  submission failed: {error}; draft kept on review, retrying");
            }
            Err(other) => return Err(other.into()),
        }
    }

    let stored = submitter.listings();
    let summary: Value = json!({
        "stored": stored.len(),
        "payload": stored.last().map(|(_, payload)| payload),
    });
    println!("\n{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

fn attempt_advance(wizard: &mut ListingWizard) -> Result<(), AppError> {
    match wizard.advance() {
        Ok(step) => {
            println!("  -> moved to {step}");
            Ok(())
        }
        Err(WizardError::StepInvalid { step, count }) => {
            println!("  {step} blocked by {count} error(s):");
            for (field, message) in wizard.errors().render(&EnglishCatalog) {
                println!("    {field}: {message}");
            }
            Ok(())
        }
        Err(other) => Err(other.into()),
    }
}
