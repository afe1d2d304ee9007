use serde_json::Value;

use super::{ErrorMap, ValidationConfig};
use crate::workflows::listing::blueprint::ListingBlueprint;
use crate::workflows::listing::draft::{as_number, fields, is_present, DraftListing};
use crate::workflows::listing::messages::{keys, ErrorKind, FieldError};
use crate::workflows::listing::schema::{FieldDescriptor, FieldType};

pub(crate) fn category(draft: &DraftListing) -> ErrorMap {
    let mut errors = ErrorMap::new();

    if draft.is_present(fields::MAIN_CATEGORY) {
        check_text(&mut errors, draft, fields::MAIN_CATEGORY);
        check_text(&mut errors, draft, fields::SUBCATEGORY);
    } else {
        errors.record(fields::MAIN_CATEGORY, FieldError::required(fields::MAIN_CATEGORY));
    }

    check_text(&mut errors, draft, fields::TRANSACTION_TYPE);
    errors
}

pub(crate) fn basic_details(draft: &DraftListing, config: &ValidationConfig) -> ErrorMap {
    let mut errors = ErrorMap::new();

    if !meets_min_chars(draft.title(), config.title_min_chars) {
        errors.record(
            fields::TITLE,
            FieldError::new(ErrorKind::Presence, keys::TITLE_MIN_LENGTH)
                .with_param("min", config.title_min_chars),
        );
    }

    if !draft.is_present(fields::PRICE) {
        errors.record(fields::PRICE, FieldError::required(fields::PRICE));
    } else if !draft.price().is_some_and(|price| price > 0.0) {
        errors.record(fields::PRICE, FieldError::format(keys::PRICE_POSITIVE));
    }

    if draft.location().map_or(true, |location| location.trim().is_empty()) {
        errors.record(fields::LOCATION, FieldError::required(fields::LOCATION));
    }

    check_text(&mut errors, draft, fields::DESCRIPTION);
    check_images(&mut errors, draft);
    errors
}

pub(crate) fn advanced_details(draft: &DraftListing, blueprint: &ListingBlueprint) -> ErrorMap {
    let mut errors = ErrorMap::new();

    let Some(rules) = blueprint.rules_for(draft) else {
        let category = draft.main_category().unwrap_or_default();
        errors.record(
            fields::MAIN_CATEGORY,
            FieldError::new(ErrorKind::Configuration, keys::UNSUPPORTED_CATEGORY)
                .with_param("category", category),
        );
        return errors;
    };

    for field in &rules.required_fields {
        let path = detail_path(field);
        if !draft.is_present(&path) {
            errors.record(&path, FieldError::required(&path));
        }
    }

    if let Some(subcategory) = draft.subcategory() {
        for field in rules.conditional_requirements(subcategory) {
            let path = detail_path(field);
            if !draft.is_present(&path) {
                errors.record(&path, FieldError::required(&path));
            }
        }
    }

    for (field, rule) in &rules.validations {
        let path = detail_path(field);
        let Some(value) = present_value(draft, &path) else {
            continue;
        };
        if let Some(error) = rule.check(value) {
            errors.record(&path, error.with_default_param("field", &path));
        }
    }

    if let Some(schema) = blueprint.schema_for(draft) {
        for descriptor in schema.fields {
            check_descriptor(&mut errors, draft, descriptor);
        }
    }

    errors
}

pub(crate) fn review(draft: &DraftListing, config: &ValidationConfig) -> ErrorMap {
    let mut errors = ErrorMap::new();

    if !meets_min_chars(draft.description(), config.review_description_min_chars) {
        errors.record(
            fields::DESCRIPTION,
            FieldError::new(ErrorKind::Presence, keys::DESCRIPTION_MIN_LENGTH)
                .with_param("min", config.review_description_min_chars),
        );
    }

    check_images(&mut errors, draft);
    errors
}

/// Required string field: blank is missing, anything other than a string is a format error.
fn check_text(errors: &mut ErrorMap, draft: &DraftListing, path: &str) {
    match draft.get(path) {
        Some(Value::String(text)) if !text.trim().is_empty() => {}
        Some(value) if is_present(Some(value)) && !value.is_string() => {
            errors.record(
                path,
                FieldError::format(keys::TEXT_EXPECTED).with_param("field", path),
            );
        }
        _ => {
            errors.record(path, FieldError::required(path));
        }
    }
}

fn check_descriptor(errors: &mut ErrorMap, draft: &DraftListing, descriptor: &FieldDescriptor) {
    let path = descriptor.path();
    let Some(value) = present_value(draft, &path) else {
        if descriptor.required {
            errors.record(&path, FieldError::required(&path));
        }
        return;
    };

    if let Some(key) = type_mismatch(descriptor.field_type, value) {
        errors.record(&path, FieldError::format(key).with_param("field", &path));
        return;
    }

    if descriptor.field_type.has_options() && !descriptor.accepts_option(value) {
        errors.record(
            &path,
            FieldError::format(keys::INVALID_OPTION)
                .with_param("field", &path)
                .with_param("value", display_value(value)),
        );
        return;
    }

    if let Some(error) = descriptor.validate.and_then(|validator| validator.check(value)) {
        errors.record(&path, error.with_default_param("field", &path));
    }
}

/// Message key for a value whose JSON type cannot fill a field of `field_type`.
fn type_mismatch(field_type: FieldType, value: &Value) -> Option<&'static str> {
    match field_type {
        FieldType::Text | FieldType::Textarea if !(value.is_string() || value.is_number()) => {
            Some(keys::TEXT_EXPECTED)
        }
        FieldType::Number if as_number(value).is_none() => Some(keys::NUMBER_EXPECTED),
        _ => None,
    }
}

fn check_images(errors: &mut ErrorMap, draft: &DraftListing) {
    let images = draft.images();
    if images.is_empty() {
        errors.record(
            fields::IMAGES,
            FieldError::new(ErrorKind::Presence, keys::IMAGES_REQUIRED),
        );
    } else if let Some(index) = images.iter().position(|image| !image.is_string()) {
        errors.record(
            fields::IMAGES,
            FieldError::format(keys::IMAGE_REFERENCE).with_param("index", index),
        );
    }
}

/// Counts every character, padding included; whitespace-only text never qualifies.
fn meets_min_chars(text: Option<&str>, min: usize) -> bool {
    text.is_some_and(|text| !text.trim().is_empty() && text.chars().count() >= min)
}

fn present_value<'a>(draft: &'a DraftListing, path: &str) -> Option<&'a Value> {
    draft.get(path).filter(|value| is_present(Some(value)))
}

fn detail_path(field: &str) -> String {
    format!("{}.{field}", fields::DETAILS)
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}
