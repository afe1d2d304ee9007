//! Message keys emitted by the listing engine and the translator seam that renders them.
//!
//! The engine never produces final user-facing text. Every error and notice carries a
//! message key plus named parameters; a [`Translator`] turns those into display strings.

use std::collections::BTreeMap;

use serde::Serialize;

/// Named parameters interpolated into a translated message.
pub type MessageParams = BTreeMap<&'static str, String>;

/// Message keys understood by the bundled catalog.
pub mod keys {
    pub const REQUIRED: &str = "validation.required";
    pub const TITLE_MIN_LENGTH: &str = "validation.titleMinLength";
    pub const DESCRIPTION_MIN_LENGTH: &str = "validation.descriptionMinLength";
    pub const PRICE_POSITIVE: &str = "validation.pricePositive";
    pub const IMAGES_REQUIRED: &str = "validation.imagesRequired";
    pub const UNSUPPORTED_CATEGORY: &str = "validation.unsupportedCategory";
    pub const INVALID_OPTION: &str = "validation.invalidOption";
    pub const TEXT_EXPECTED: &str = "validation.textExpected";
    pub const NUMBER_EXPECTED: &str = "validation.numberExpected";
    pub const IMAGE_REFERENCE: &str = "validation.imageReference";
    pub const YEAR_RANGE: &str = "validation.yearRange";
    pub const MILEAGE_RANGE: &str = "validation.mileageRange";
    pub const ENGINE_SIZE_RANGE: &str = "validation.engineSizeRange";
    pub const LOAD_CAPACITY_RANGE: &str = "validation.loadCapacityRange";
    pub const SEATS_RANGE: &str = "validation.seatsRange";
    pub const BOAT_LENGTH_RANGE: &str = "validation.boatLengthRange";
    pub const VIN_FORMAT: &str = "validation.vinFormat";
    pub const AREA_RANGE: &str = "validation.areaRange";
    pub const ROOM_COUNT_RANGE: &str = "validation.roomCountRange";
    pub const FLOOR_RANGE: &str = "validation.floorRange";
    pub const YEAR_BUILT_RANGE: &str = "validation.yearBuiltRange";
    pub const PLOT_REFERENCE_LENGTH: &str = "validation.plotReferenceLength";
    pub const COLOR_FORMAT: &str = "validation.colorFormat";
    pub const WHOLE_NUMBER: &str = "validation.wholeNumber";
    pub const SCHEMA_FALLBACK: &str = "notice.schemaFallback";
}

/// Classifies a field error so callers can style or route it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Required value missing at the current step.
    Presence,
    /// Value present but fails a structural rule.
    Format,
    /// The chosen category has no registered rules.
    Configuration,
}

/// A single field-scoped validation failure expressed as a message key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub kind: ErrorKind,
    pub key: &'static str,
    pub params: MessageParams,
}

impl FieldError {
    pub fn new(kind: ErrorKind, key: &'static str) -> Self {
        Self {
            kind,
            key,
            params: MessageParams::new(),
        }
    }

    /// Presence failure for `field` using the generic required message.
    pub fn required(field: &str) -> Self {
        Self::new(ErrorKind::Presence, keys::REQUIRED).with_param("field", field)
    }

    pub fn format(key: &'static str) -> Self {
        Self::new(ErrorKind::Format, key)
    }

    pub fn with_param(mut self, name: &'static str, value: impl ToString) -> Self {
        self.params.insert(name, value.to_string());
        self
    }

    /// Adds `name` only when the producer did not already set it.
    pub fn with_default_param(mut self, name: &'static str, value: impl ToString) -> Self {
        self.params
            .entry(name)
            .or_insert_with(|| value.to_string());
        self
    }

    pub fn render(&self, translator: &dyn Translator) -> String {
        translator.translate(self.key, &self.params)
    }
}

/// Non-blocking diagnostic raised when the listing falls outside the modeled catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfigurationNotice {
    pub key: &'static str,
    pub params: MessageParams,
}

impl ConfigurationNotice {
    pub fn new(key: &'static str) -> Self {
        Self {
            key,
            params: MessageParams::new(),
        }
    }

    pub fn with_param(mut self, name: &'static str, value: impl ToString) -> Self {
        self.params.insert(name, value.to_string());
        self
    }

    pub fn render(&self, translator: &dyn Translator) -> String {
        translator.translate(self.key, &self.params)
    }
}

/// Localization collaborator. Unknown keys should come back unchanged.
pub trait Translator {
    fn translate(&self, key: &str, params: &MessageParams) -> String;
}

/// English strings bundled for the CLI and tests.
#[derive(Debug, Default, Clone, Copy)]
pub struct EnglishCatalog;

impl EnglishCatalog {
    fn template(key: &str) -> Option<&'static str> {
        let template = match key {
            keys::REQUIRED => "{field} is required",
            keys::TITLE_MIN_LENGTH => "Title must be at least {min} characters",
            keys::DESCRIPTION_MIN_LENGTH => "Description must be at least {min} characters",
            keys::PRICE_POSITIVE => "Price must be a number greater than 0",
            keys::IMAGES_REQUIRED => "Add at least one image",
            keys::UNSUPPORTED_CATEGORY => "Category '{category}' is not supported",
            keys::INVALID_OPTION => "'{value}' is not a valid choice for {field}",
            keys::TEXT_EXPECTED => "{field} must be text",
            keys::NUMBER_EXPECTED => "{field} must be a number",
            keys::IMAGE_REFERENCE => "Image {index} is not an uploaded image reference",
            keys::YEAR_RANGE => "Year must be between {min} and {max}",
            keys::MILEAGE_RANGE => "Mileage must be a non-negative number",
            keys::ENGINE_SIZE_RANGE => "Engine size must be between {min} and {max} cc",
            keys::LOAD_CAPACITY_RANGE => "Load capacity must be between {min} and {max} kg",
            keys::SEATS_RANGE => "Seats must be between {min} and {max}",
            keys::BOAT_LENGTH_RANGE => "Length must be between {min} and {max} m",
            keys::VIN_FORMAT => "VIN must be 17 characters and cannot contain I, O or Q",
            keys::AREA_RANGE => "Area must be at least {min} m²",
            keys::ROOM_COUNT_RANGE => "{field} must be between {min} and {max}",
            keys::FLOOR_RANGE => "Floor must be between {min} and {max}",
            keys::YEAR_BUILT_RANGE => "Year built must be between {min} and {max}",
            keys::PLOT_REFERENCE_LENGTH => {
                "Plot reference must be between {min} and {max} characters"
            }
            keys::COLOR_FORMAT => "{field} must be a hex colour such as #1A2B3C",
            keys::WHOLE_NUMBER => "{field} must be a whole number",
            keys::SCHEMA_FALLBACK => {
                "No dedicated form for '{subcategory}'; showing the generic {category} fields"
            }
            _ => return None,
        };
        Some(template)
    }
}

impl Translator for EnglishCatalog {
    fn translate(&self, key: &str, params: &MessageParams) -> String {
        let Some(template) = Self::template(key) else {
            return key.to_string();
        };

        params
            .iter()
            .fold(template.to_string(), |text, (name, value)| {
                text.replace(&format!("{{{name}}}"), value)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn english_catalog_interpolates_params() {
        let error = FieldError::required("details.make");
        assert_eq!(error.render(&EnglishCatalog), "details.make is required");

        let range = FieldError::format(keys::YEAR_RANGE)
            .with_param("min", 1900)
            .with_param("max", 2027);
        assert_eq!(range.render(&EnglishCatalog), "Year must be between 1900 and 2027");
    }

    #[test]
    fn unknown_keys_are_returned_verbatim() {
        let text = EnglishCatalog.translate("validation.somethingNew", &MessageParams::new());
        assert_eq!(text, "validation.somethingNew");
    }

    #[test]
    fn default_params_do_not_override_explicit_ones() {
        let error = FieldError::format(keys::WHOLE_NUMBER)
            .with_param("field", "Bedrooms")
            .with_default_param("field", "details.bedrooms");
        assert_eq!(error.params.get("field").map(String::as_str), Some("Bedrooms"));
    }
}
