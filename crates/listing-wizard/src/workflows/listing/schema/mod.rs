//! Field schema registry: per-subcategory ordered field descriptors with base fallbacks.

mod catalog;

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::Serialize;
use serde_json::Value;
use tracing::warn;

use super::messages::FieldError;
use super::taxonomy::MainCategory;

/// Input widget/type of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Text,
    Number,
    Select,
    Multiselect,
    Checkbox,
    Textarea,
    Colorpicker,
}

impl FieldType {
    pub const fn has_options(self) -> bool {
        matches!(self, FieldType::Select | FieldType::Multiselect)
    }
}

/// Rendering group. Has no effect on validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    Essential,
    Advanced,
    Appearance,
    Details,
    Features,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldOption {
    pub value: &'static str,
    pub label: &'static str,
}

/// Per-field check run on present values.
#[derive(Clone, Copy)]
pub struct FieldValidator(pub fn(&Value) -> Option<FieldError>);

impl FieldValidator {
    pub fn check(&self, value: &Value) -> Option<FieldError> {
        (self.0)(value)
    }
}

impl fmt::Debug for FieldValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FieldValidator")
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FieldDescriptor {
    /// Path relative to `details`; may itself contain dots.
    pub name: &'static str,
    pub label: &'static str,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<FieldOption>,
    pub section: Section,
    pub required: bool,
    #[serde(skip)]
    pub validate: Option<FieldValidator>,
}

impl FieldDescriptor {
    pub fn new(
        name: &'static str,
        label: &'static str,
        field_type: FieldType,
        section: Section,
    ) -> Self {
        Self {
            name,
            label,
            field_type,
            options: Vec::new(),
            section,
            required: false,
            validate: None,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Options given as `(value, label)` pairs.
    pub fn with_options(mut self, options: &[(&'static str, &'static str)]) -> Self {
        self.options = options
            .iter()
            .map(|&(value, label)| FieldOption { value, label })
            .collect();
        self
    }

    pub fn with_validator(mut self, validator: fn(&Value) -> Option<FieldError>) -> Self {
        self.validate = Some(FieldValidator(validator));
        self
    }

    /// Absolute draft path, e.g. `details.make`.
    pub fn path(&self) -> String {
        format!("details.{}", self.name)
    }

    /// Whether `value` is one of (or, for multiselect, made only of) the declared options.
    pub fn accepts_option(&self, value: &Value) -> bool {
        match (self.field_type, value) {
            (FieldType::Multiselect, Value::Array(items)) => {
                items.iter().all(|item| self.matches_option(item))
            }
            (FieldType::Multiselect, _) => false,
            (FieldType::Select, item) => self.matches_option(item),
            _ => true,
        }
    }

    fn matches_option(&self, value: &Value) -> bool {
        let candidate = match value {
            Value::String(text) => text.clone(),
            Value::Number(number) => number.to_string(),
            _ => return false,
        };
        self.options.iter().any(|option| option.value == candidate)
    }
}

/// Registry construction failures; all are fatal at startup.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    #[error("schema '{schema}' declares field '{field}' more than once")]
    DuplicateField {
        schema: String,
        field: &'static str,
    },
    #[error("schema '{schema}' field '{field}' is a choice field without options")]
    MissingOptions {
        schema: String,
        field: &'static str,
    },
    #[error("schema '{0}' has no fields")]
    EmptySchema(String),
    #[error("rule table has no entry for category '{0}'")]
    MissingRuleSet(MainCategory),
    #[error("invalid pattern for field '{field}': {source}")]
    InvalidPattern {
        field: &'static str,
        #[source]
        source: regex::Error,
    },
}

/// Where a resolved field list came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SchemaSource {
    Registered,
    BaseFallback,
}

#[derive(Debug, Clone, Copy)]
pub struct ResolvedSchema<'a> {
    pub main: MainCategory,
    pub fields: &'a [FieldDescriptor],
    pub source: SchemaSource,
}

impl ResolvedSchema<'_> {
    pub fn is_fallback(&self) -> bool {
        self.source == SchemaSource::BaseFallback
    }
}

/// Subcategory schema key → ordered field list, plus one base schema per main category.
#[derive(Debug, Clone)]
pub struct SchemaRegistry {
    schemas: BTreeMap<&'static str, Vec<FieldDescriptor>>,
    vehicle_base: Vec<FieldDescriptor>,
    real_estate_base: Vec<FieldDescriptor>,
}

impl SchemaRegistry {
    pub fn new(
        schemas: BTreeMap<&'static str, Vec<FieldDescriptor>>,
        vehicle_base: Vec<FieldDescriptor>,
        real_estate_base: Vec<FieldDescriptor>,
    ) -> Result<Self, SchemaError> {
        check_schema("vehicles.base", &vehicle_base)?;
        check_schema("realEstate.base", &real_estate_base)?;
        for (key, fields) in &schemas {
            check_schema(key, fields)?;
        }

        Ok(Self {
            schemas,
            vehicle_base,
            real_estate_base,
        })
    }

    pub fn standard() -> Result<Self, SchemaError> {
        Self::new(
            catalog::subcategory_schemas(),
            catalog::vehicle_base(),
            catalog::real_estate_base(),
        )
    }

    /// Direct lookup; `None` when the key has no dedicated schema.
    pub fn get(&self, key: &str) -> Option<&[FieldDescriptor]> {
        self.schemas.get(key).map(Vec::as_slice)
    }

    pub fn base(&self, main: MainCategory) -> &[FieldDescriptor] {
        match main {
            MainCategory::Vehicles => &self.vehicle_base,
            MainCategory::RealEstate => &self.real_estate_base,
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.schemas.keys().copied()
    }

    /// Lookup with fallback to the main category's base schema.
    pub fn resolve(&self, main: MainCategory, key: Option<&str>) -> ResolvedSchema<'_> {
        if let Some(fields) = key.and_then(|key| self.get(key)) {
            return ResolvedSchema {
                main,
                fields,
                source: SchemaSource::Registered,
            };
        }

        warn!(
            category = main.key(),
            schema_key = key.unwrap_or("<none>"),
            "no dedicated schema, using base fields"
        );
        ResolvedSchema {
            main,
            fields: self.base(main),
            source: SchemaSource::BaseFallback,
        }
    }
}

fn check_schema(name: &str, fields: &[FieldDescriptor]) -> Result<(), SchemaError> {
    if fields.is_empty() {
        return Err(SchemaError::EmptySchema(name.to_string()));
    }

    let mut seen = BTreeSet::new();
    for field in fields {
        if !seen.insert(field.name) {
            return Err(SchemaError::DuplicateField {
                schema: name.to_string(),
                field: field.name,
            });
        }
        if field.field_type.has_options() && field.options.is_empty() {
            return Err(SchemaError::MissingOptions {
                schema: name.to_string(),
                field: field.name,
            });
        }
    }
    Ok(())
}
