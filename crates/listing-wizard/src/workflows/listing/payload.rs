use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::collaborators::ImageRef;
use super::draft::{as_number, fields, is_present, DraftListing};
use super::taxonomy::MainCategory;

/// Frozen, typed snapshot handed to the submission collaborator.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingPayload {
    pub main_category: MainCategory,
    pub subcategory: String,
    pub title: String,
    pub description: String,
    pub price: f64,
    pub location: String,
    pub images: Vec<ImageRef>,
    pub details: ListingDetails,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ListingDetails {
    Vehicle(VehicleDetails),
    RealEstate(RealEstateDetails),
}

impl ListingDetails {
    pub fn transaction_type(&self) -> &str {
        match self {
            ListingDetails::Vehicle(details) => &details.transaction_type,
            ListingDetails::RealEstate(details) => &details.transaction_type,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleDetails {
    pub transaction_type: String,
    #[serde(default, deserialize_with = "optional_text")]
    pub make: Option<String>,
    #[serde(default, deserialize_with = "optional_text")]
    pub model: Option<String>,
    #[serde(default, deserialize_with = "optional_whole")]
    pub year: Option<i64>,
    #[serde(default, deserialize_with = "optional_text")]
    pub condition: Option<String>,
    #[serde(default, deserialize_with = "optional_number")]
    pub mileage: Option<f64>,
    #[serde(default, deserialize_with = "optional_text")]
    pub vin: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RealEstateDetails {
    pub transaction_type: String,
    #[serde(default, deserialize_with = "optional_text")]
    pub property_type: Option<String>,
    #[serde(default, deserialize_with = "optional_number")]
    pub area: Option<f64>,
    #[serde(default, deserialize_with = "optional_whole")]
    pub bedrooms: Option<i64>,
    #[serde(default, deserialize_with = "optional_whole")]
    pub bathrooms: Option<i64>,
    #[serde(default, deserialize_with = "optional_whole")]
    pub floor: Option<i64>,
    #[serde(default, deserialize_with = "optional_whole")]
    pub year_built: Option<i64>,
    #[serde(default, deserialize_with = "optional_text")]
    pub condition: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, thiserror::Error)]
pub enum PayloadError {
    #[error("field '{0}' is missing")]
    MissingField(&'static str),
    #[error("category '{0}' is not supported")]
    UnsupportedCategory(String),
    #[error("price must be a positive number")]
    InvalidPrice,
    #[error("image at position {index} is not a reference")]
    InvalidImage { index: usize },
    #[error("details do not fit the {category} shape: {source}")]
    Details {
        category: MainCategory,
        #[source]
        source: serde_json::Error,
    },
}

impl ListingPayload {
    /// Narrow a validated draft into the submission shape.
    pub fn from_draft(draft: &DraftListing) -> Result<Self, PayloadError> {
        let raw_category = required_text(draft, fields::MAIN_CATEGORY)?;
        let main_category = MainCategory::from_key(&raw_category)
            .ok_or(PayloadError::UnsupportedCategory(raw_category))?;

        let price = draft
            .price()
            .filter(|price| *price > 0.0)
            .ok_or(PayloadError::InvalidPrice)?;

        let images = draft
            .images()
            .iter()
            .enumerate()
            .map(|(index, image)| {
                image
                    .as_str()
                    .map(|reference| ImageRef(reference.to_string()))
                    .ok_or(PayloadError::InvalidImage { index })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let details = Value::Object(draft.details().cloned().unwrap_or_default());
        let details = match main_category {
            MainCategory::Vehicles => serde_json::from_value(details).map(ListingDetails::Vehicle),
            MainCategory::RealEstate => {
                serde_json::from_value(details).map(ListingDetails::RealEstate)
            }
        }
        .map_err(|source| PayloadError::Details {
            category: main_category,
            source,
        })?;

        Ok(Self {
            main_category,
            subcategory: required_text(draft, fields::SUBCATEGORY)?,
            title: required_text(draft, fields::TITLE)?.trim().to_string(),
            description: required_text(draft, fields::DESCRIPTION)?,
            price,
            location: required_text(draft, fields::LOCATION)?.trim().to_string(),
            images,
            details,
        })
    }
}

fn required_text(draft: &DraftListing, path: &'static str) -> Result<String, PayloadError> {
    draft
        .text(path)
        .filter(|text| !text.trim().is_empty())
        .map(str::to_string)
        .ok_or(PayloadError::MissingField(path))
}

fn optional_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        Some(value) if !is_present(Some(&value)) => Ok(None),
        None => Ok(None),
        Some(Value::String(text)) => Ok(Some(text)),
        Some(Value::Number(number)) => Ok(Some(number.to_string())),
        Some(other) => Err(de::Error::custom(format!("expected text, got {other}"))),
    }
}

fn optional_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        Some(value) if !is_present(Some(&value)) => Ok(None),
        None => Ok(None),
        Some(Value::String(text)) if text.trim().is_empty() => Ok(None),
        Some(value) => as_number(&value)
            .map(Some)
            .ok_or_else(|| de::Error::custom(format!("expected a number, got {value}"))),
    }
}

fn optional_whole<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    match optional_number(deserializer)? {
        None => Ok(None),
        Some(number) if number.fract() == 0.0 => Ok(Some(number as i64)),
        Some(number) => Err(de::Error::custom(format!(
            "expected a whole number, got {number}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn vehicle_draft() -> DraftListing {
        DraftListing::from_value(json!({
            "mainCategory": "vehicles",
            "subcategory": "Cars",
            "title": "  Reliable family hatchback  ",
            "description": "Serviced yearly.",
            "price": "8500",
            "location": " Porto ",
            "images": ["img-1", "img-2"],
            "details": {
                "transactionType": "sale",
                "make": "Toyota",
                "model": "Corolla",
                "year": "2016",
                "condition": "used",
                "mileage": 120000,
                "vin": "",
                "color": "#1A2B3C"
            }
        }))
        .expect("object draft")
    }

    #[test]
    fn vehicle_payload_narrows_numeric_strings() {
        let payload = ListingPayload::from_draft(&vehicle_draft()).expect("payload builds");

        assert_eq!(payload.main_category, MainCategory::Vehicles);
        assert_eq!(payload.title, "Reliable family hatchback");
        assert_eq!(payload.location, "Porto");
        assert_eq!(payload.price, 8500.0);
        assert_eq!(payload.images, vec![ImageRef("img-1".into()), ImageRef("img-2".into())]);

        match &payload.details {
            ListingDetails::Vehicle(details) => {
                assert_eq!(details.year, Some(2016));
                assert_eq!(details.vin, None);
                assert_eq!(details.extra.get("color"), Some(&json!("#1A2B3C")));
            }
            other => panic!("expected vehicle details, got {other:?}"),
        }
        assert_eq!(payload.details.transaction_type(), "sale");
    }

    #[test]
    fn details_without_transaction_type_are_rejected() {
        let mut draft = vehicle_draft();
        draft
            .clear_field(fields::TRANSACTION_TYPE)
            .expect("valid path");

        match ListingPayload::from_draft(&draft) {
            Err(PayloadError::Details { category, .. }) => {
                assert_eq!(category, MainCategory::Vehicles)
            }
            other => panic!("expected details error, got {other:?}"),
        }
    }

    #[test]
    fn non_string_images_are_rejected() {
        let mut draft = vehicle_draft();
        draft
            .set_field(fields::IMAGES, json!(["img-1", {"url": "img-2"}]))
            .expect("valid path");

        match ListingPayload::from_draft(&draft) {
            Err(PayloadError::InvalidImage { index: 1 }) => {}
            other => panic!("expected invalid image error, got {other:?}"),
        }
    }

    #[test]
    fn unknown_category_is_rejected() {
        let mut draft = vehicle_draft();
        draft
            .set_field(fields::MAIN_CATEGORY, "jobs")
            .expect("valid path");

        match ListingPayload::from_draft(&draft) {
            Err(PayloadError::UnsupportedCategory(category)) => assert_eq!(category, "jobs"),
            other => panic!("expected unsupported category, got {other:?}"),
        }
    }
}
