use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::warn;

/// Paths of the top-level draft fields.
pub mod fields {
    pub const MAIN_CATEGORY: &str = "mainCategory";
    pub const SUBCATEGORY: &str = "subcategory";
    pub const TITLE: &str = "title";
    pub const DESCRIPTION: &str = "description";
    pub const PRICE: &str = "price";
    pub const LOCATION: &str = "location";
    pub const IMAGES: &str = "images";
    pub const DETAILS: &str = "details";
    pub const TRANSACTION_TYPE: &str = "details.transactionType";
}

/// Rejected field paths.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FieldPathError {
    #[error("field path must not be empty")]
    Empty,
    #[error("field path '{0}' contains an empty segment")]
    EmptySegment(String),
    #[error("a draft listing must be a JSON object")]
    NotAnObject,
}

/// Listing under construction: one owned JSON tree addressed by dot paths.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DraftListing {
    tree: Map<String, Value>,
}

impl DraftListing {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a draft from an existing listing, e.g. for an edit session.
    pub fn from_value(value: Value) -> Result<Self, FieldPathError> {
        match value {
            Value::Object(tree) => Ok(Self { tree }),
            _ => Err(FieldPathError::NotAnObject),
        }
    }

    /// Assign `value` at `path`, creating intermediate objects on demand.
    ///
    /// Sibling keys along the path are left untouched. A non-object value sitting where an
    /// intermediate level is needed is replaced by an empty object.
    pub fn set_field(&mut self, path: &str, value: impl Into<Value>) -> Result<(), FieldPathError> {
        let segments = split_path(path)?;
        let Some((leaf, parents)) = segments.split_last() else {
            return Err(FieldPathError::Empty);
        };

        let mut node = &mut self.tree;
        for segment in parents {
            let slot = node
                .entry((*segment).to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if !slot.is_object() {
                warn!(path, segment, "replacing scalar with nested object");
                *slot = Value::Object(Map::new());
            }
            node = slot.as_object_mut().ok_or(FieldPathError::NotAnObject)?;
        }

        node.insert((*leaf).to_string(), value.into());
        Ok(())
    }

    pub fn get(&self, path: &str) -> Option<&Value> {
        let mut segments = path.split('.');
        let first = segments.next()?;
        segments.try_fold(self.tree.get(first)?, |node, segment| node.get(segment))
    }

    /// Remove the value at `path`, returning it when one existed.
    pub fn clear_field(&mut self, path: &str) -> Result<Option<Value>, FieldPathError> {
        let segments = split_path(path)?;
        let Some((leaf, parents)) = segments.split_last() else {
            return Err(FieldPathError::Empty);
        };

        let mut node = &mut self.tree;
        for segment in parents {
            match node.get_mut(*segment).and_then(Value::as_object_mut) {
                Some(next) => node = next,
                None => return Ok(None),
            }
        }
        Ok(node.remove(*leaf))
    }

    pub fn is_present(&self, path: &str) -> bool {
        is_present(self.get(path))
    }

    pub fn text(&self, path: &str) -> Option<&str> {
        self.get(path).and_then(Value::as_str)
    }

    pub fn number(&self, path: &str) -> Option<f64> {
        self.get(path).and_then(as_number)
    }

    pub fn main_category(&self) -> Option<&str> {
        self.text(fields::MAIN_CATEGORY)
    }

    pub fn subcategory(&self) -> Option<&str> {
        self.text(fields::SUBCATEGORY)
    }

    pub fn title(&self) -> Option<&str> {
        self.text(fields::TITLE)
    }

    pub fn description(&self) -> Option<&str> {
        self.text(fields::DESCRIPTION)
    }

    pub fn location(&self) -> Option<&str> {
        self.text(fields::LOCATION)
    }

    pub fn price(&self) -> Option<f64> {
        self.number(fields::PRICE)
    }

    pub fn images(&self) -> &[Value] {
        self.get(fields::IMAGES)
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn details(&self) -> Option<&Map<String, Value>> {
        self.get(fields::DETAILS).and_then(Value::as_object)
    }

    pub fn to_value(&self) -> Value {
        Value::Object(self.tree.clone())
    }
}

fn split_path(path: &str) -> Result<Vec<&str>, FieldPathError> {
    if path.trim().is_empty() {
        return Err(FieldPathError::Empty);
    }
    let segments: Vec<&str> = path.split('.').collect();
    if segments.iter().any(|segment| segment.is_empty()) {
        return Err(FieldPathError::EmptySegment(path.to_string()));
    }
    Ok(segments)
}

/// A value is present unless missing, null, an empty string or an empty list.
pub fn is_present(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::String(text)) => !text.is_empty(),
        Some(Value::Array(items)) => !items.is_empty(),
        Some(_) => true,
    }
}

/// Numeric view of a form value; numeric strings are accepted.
pub fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|parsed| parsed.is_finite()),
        _ => None,
    }
}

/// Textual view of a form value; numbers are accepted, flags and containers are not.
pub fn as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}
