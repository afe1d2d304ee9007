use std::collections::BTreeMap;
use std::fmt;
use std::future::Future;

use serde::{Deserialize, Serialize};

use super::payload::ListingPayload;

/// Identifier assigned by the listing backend.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ListingId(pub String);

impl fmt::Display for ListingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Reference to an uploaded image, stored as a string in `images`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageRef(pub String);

impl ImageRef {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Raw image handed to the uploader.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    pub fn new(file_name: impl Into<String>, content_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }
}

/// Make/model lookup keyed by vehicle type (the subcategory's schema key).
pub trait VehicleCatalog: Send + Sync {
    fn list_makes(&self, vehicle_type: &str) -> Vec<String>;
    fn list_models(&self, make: &str, vehicle_type: &str) -> Vec<String>;
}

/// Stores an image and returns a reference the listing can carry.
pub trait ImageUploader: Send + Sync {
    fn upload(
        &self,
        upload: ImageUpload,
    ) -> impl Future<Output = Result<ImageRef, UploadError>> + Send;
}

/// Creates the listing from a validated snapshot.
pub trait ListingSubmitter: Send + Sync {
    fn create_listing(
        &self,
        payload: &ListingPayload,
    ) -> impl Future<Output = Result<ListingId, SubmissionError>> + Send;
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UploadError {
    #[error("image rejected: {0}")]
    Rejected(String),
    #[error("upload transport unavailable: {0}")]
    Transport(String),
    #[error("listing already carries the maximum of {max} images")]
    LimitReached { max: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmissionError {
    #[error("listing rejected: {0}")]
    Rejected(String),
    #[error("submission transport unavailable: {0}")]
    Transport(String),
}

/// Built-in make/model table.
#[derive(Debug, Clone, Default)]
pub struct StaticVehicleCatalog {
    // vehicle type -> make -> models
    entries: BTreeMap<String, BTreeMap<String, Vec<String>>>,
}

impl StaticVehicleCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_models(mut self, vehicle_type: &str, make: &str, models: &[&str]) -> Self {
        self.entries
            .entry(vehicle_type.to_lowercase())
            .or_default()
            .insert(
                make.to_string(),
                models.iter().map(|model| model.to_string()).collect(),
            );
        self
    }

    pub fn standard() -> Self {
        Self::new()
            .with_models("cars", "Toyota", &["Corolla", "Camry", "RAV4", "Land Cruiser"])
            .with_models("cars", "Volkswagen", &["Golf", "Passat", "Tiguan"])
            .with_models("cars", "BMW", &["3 Series", "5 Series", "X5"])
            .with_models("motorcycles", "Honda", &["CB500F", "Africa Twin", "CBR600RR"])
            .with_models("motorcycles", "Yamaha", &["MT-07", "Ténéré 700", "R1"])
            .with_models("trucks", "Volvo", &["FH16", "FM", "FE"])
            .with_models("trucks", "Isuzu", &["N-Series", "F-Series"])
            .with_models("vans", "Ford", &["Transit", "Transit Custom"])
            .with_models("vans", "Mercedes-Benz", &["Sprinter", "Vito"])
            .with_models("buses", "Setra", &["S 515 HD", "S 531 DT"])
            .with_models("boats", "Bayliner", &["VR5", "Element E18"])
    }
}

impl VehicleCatalog for StaticVehicleCatalog {
    fn list_makes(&self, vehicle_type: &str) -> Vec<String> {
        self.entries
            .get(&vehicle_type.to_lowercase())
            .map(|makes| makes.keys().cloned().collect())
            .unwrap_or_default()
    }

    fn list_models(&self, make: &str, vehicle_type: &str) -> Vec<String> {
        self.entries
            .get(&vehicle_type.to_lowercase())
            .and_then(|makes| {
                makes
                    .iter()
                    .find(|(name, _)| name.eq_ignore_ascii_case(make))
                    .map(|(_, models)| models.clone())
            })
            .unwrap_or_default()
    }
}
