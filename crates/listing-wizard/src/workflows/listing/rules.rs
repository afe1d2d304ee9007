use std::collections::BTreeMap;

use chrono::{Datelike, Utc};
use regex::Regex;
use serde_json::Value;

use super::draft::{as_number, as_text};
use super::messages::{keys, FieldError};
use super::schema::SchemaError;
use super::taxonomy::MainCategory;

const VIN_PATTERN: &str = r"^[A-HJ-NPR-Z0-9]{17}$";

/// Structural check applied to a present detail value.
#[derive(Debug, Clone)]
pub enum StructuralRule {
    Number {
        min: Option<f64>,
        max: Option<f64>,
        whole: bool,
        message: &'static str,
    },
    Text {
        min_len: Option<usize>,
        max_len: Option<usize>,
        message: &'static str,
    },
    Pattern {
        regex: Regex,
        message: &'static str,
    },
}

impl StructuralRule {
    pub fn number(min: Option<f64>, max: Option<f64>, message: &'static str) -> Self {
        Self::Number {
            min,
            max,
            whole: false,
            message,
        }
    }

    /// Like [`StructuralRule::number`] but fractional values fail with `validation.wholeNumber`.
    pub fn whole(min: Option<f64>, max: Option<f64>, message: &'static str) -> Self {
        Self::Number {
            min,
            max,
            whole: true,
            message,
        }
    }

    /// Any string or number; rejects flags, lists and objects.
    pub fn text_value() -> Self {
        Self::text(None, None, keys::TEXT_EXPECTED)
    }

    pub fn text(min_len: Option<usize>, max_len: Option<usize>, message: &'static str) -> Self {
        Self::Text {
            min_len,
            max_len,
            message,
        }
    }

    pub fn pattern(
        field: &'static str,
        pattern: &str,
        message: &'static str,
    ) -> Result<Self, SchemaError> {
        let regex =
            Regex::new(pattern).map_err(|source| SchemaError::InvalidPattern { field, source })?;
        Ok(Self::Pattern { regex, message })
    }

    /// Returns a format error when `value` breaks the rule. Bounds are inclusive.
    pub fn check(&self, value: &Value) -> Option<FieldError> {
        match self {
            StructuralRule::Number {
                min,
                max,
                whole,
                message,
            } => {
                let Some(number) = as_number(value) else {
                    return Some(with_bounds(FieldError::format(*message), *min, *max));
                };
                let within = min.map_or(true, |min| number >= min)
                    && max.map_or(true, |max| number <= max);
                if !within {
                    return Some(with_bounds(FieldError::format(*message), *min, *max));
                }
                (*whole && number.fract() != 0.0).then(|| FieldError::format(keys::WHOLE_NUMBER))
            }
            StructuralRule::Text {
                min_len,
                max_len,
                message,
            } => {
                let within = as_text(value).is_some_and(|text| {
                    let len = text.chars().count();
                    min_len.map_or(true, |min| len >= min) && max_len.map_or(true, |max| len <= max)
                });
                (!within).then(|| {
                    with_bounds(
                        FieldError::format(*message),
                        min_len.map(|len| len as f64),
                        max_len.map(|len| len as f64),
                    )
                })
            }
            StructuralRule::Pattern { regex, message } => {
                let matched = as_text(value).is_some_and(|text| regex.is_match(&text));
                (!matched).then(|| FieldError::format(*message))
            }
        }
    }
}

fn with_bounds(mut error: FieldError, min: Option<f64>, max: Option<f64>) -> FieldError {
    if let Some(min) = min {
        error = error.with_param("min", format_bound(min));
    }
    if let Some(max) = max {
        error = error.with_param("max", format_bound(max));
    }
    error
}

fn format_bound(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

/// Requirements for one main category.
#[derive(Debug, Clone, Default)]
pub struct CategoryRuleSet {
    /// Detail fields required for every subcategory.
    pub required_fields: Vec<&'static str>,
    /// Detail field → structural rule, checked only when the value is present.
    pub validations: Vec<(&'static str, StructuralRule)>,
    /// Lower-case subcategory token → extra required detail fields.
    pub conditional_fields: Vec<(&'static str, Vec<&'static str>)>,
}

impl CategoryRuleSet {
    /// Union of conditional fields whose token occurs in `subcategory`, in declaration order.
    pub fn conditional_requirements(&self, subcategory: &str) -> Vec<&'static str> {
        let subcategory = subcategory.to_lowercase();
        let mut fields: Vec<&'static str> = Vec::new();
        for (token, extra) in &self.conditional_fields {
            if !subcategory.contains(token) {
                continue;
            }
            for field in extra {
                if !fields.contains(field) {
                    fields.push(*field);
                }
            }
        }
        fields
    }

    pub fn rule_for(&self, field: &str) -> Option<&StructuralRule> {
        self.validations
            .iter()
            .find(|(name, _)| *name == field)
            .map(|(_, rule)| rule)
    }
}

/// Rule sets keyed by main category. Both categories must be registered.
#[derive(Debug, Clone)]
pub struct RuleTable {
    sets: BTreeMap<MainCategory, CategoryRuleSet>,
}

impl RuleTable {
    pub fn new(sets: BTreeMap<MainCategory, CategoryRuleSet>) -> Result<Self, SchemaError> {
        if let Some(missing) = MainCategory::ALL
            .into_iter()
            .find(|category| !sets.contains_key(category))
        {
            return Err(SchemaError::MissingRuleSet(missing));
        }
        Ok(Self { sets })
    }

    /// Standard rules with the model-year ceiling derived from the current date.
    pub fn standard() -> Result<Self, SchemaError> {
        Self::standard_for_year(Utc::now().year())
    }

    /// Standard rules with `current_year` pinned; vehicles may be listed one model year ahead.
    pub fn standard_for_year(current_year: i32) -> Result<Self, SchemaError> {
        let mut sets = BTreeMap::new();
        sets.insert(MainCategory::Vehicles, vehicle_rules(current_year)?);
        sets.insert(MainCategory::RealEstate, real_estate_rules(current_year));
        Self::new(sets)
    }

    pub fn get(&self, main: MainCategory) -> Option<&CategoryRuleSet> {
        self.sets.get(&main)
    }

    /// Lookup by the raw `mainCategory` string of a draft.
    pub fn for_key(&self, key: &str) -> Option<&CategoryRuleSet> {
        MainCategory::from_key(key).and_then(|main| self.get(main))
    }
}

fn vehicle_rules(current_year: i32) -> Result<CategoryRuleSet, SchemaError> {
    Ok(CategoryRuleSet {
        required_fields: vec!["make", "model", "year", "condition"],
        validations: vec![
            ("make", StructuralRule::text_value()),
            ("model", StructuralRule::text_value()),
            ("condition", StructuralRule::text_value()),
            (
                "year",
                StructuralRule::whole(
                    Some(1900.0),
                    Some(f64::from(current_year + 1)),
                    keys::YEAR_RANGE,
                ),
            ),
            (
                "mileage",
                StructuralRule::number(Some(0.0), None, keys::MILEAGE_RANGE),
            ),
            (
                "engineSize",
                StructuralRule::number(Some(0.0), Some(10_000.0), keys::ENGINE_SIZE_RANGE),
            ),
            (
                "maxLoadCapacity",
                StructuralRule::number(Some(1.0), Some(60_000.0), keys::LOAD_CAPACITY_RANGE),
            ),
            (
                "seats",
                StructuralRule::number(Some(1.0), Some(100.0), keys::SEATS_RANGE),
            ),
            (
                "length",
                StructuralRule::number(Some(1.0), Some(150.0), keys::BOAT_LENGTH_RANGE),
            ),
            (
                "vin",
                StructuralRule::pattern("vin", VIN_PATTERN, keys::VIN_FORMAT)?,
            ),
        ],
        conditional_fields: vec![
            ("trucks", vec!["maxLoadCapacity"]),
            ("motorcycle", vec!["engineSize"]),
            ("buses", vec!["seats"]),
            ("boat", vec!["length"]),
        ],
    })
}

fn real_estate_rules(current_year: i32) -> CategoryRuleSet {
    CategoryRuleSet {
        required_fields: vec!["propertyType", "area"],
        validations: vec![
            ("propertyType", StructuralRule::text_value()),
            ("condition", StructuralRule::text_value()),
            (
                "area",
                StructuralRule::number(Some(1.0), None, keys::AREA_RANGE),
            ),
            (
                "bedrooms",
                StructuralRule::whole(Some(0.0), Some(50.0), keys::ROOM_COUNT_RANGE),
            ),
            (
                "bathrooms",
                StructuralRule::whole(Some(0.0), Some(50.0), keys::ROOM_COUNT_RANGE),
            ),
            (
                "floor",
                StructuralRule::whole(Some(-5.0), Some(200.0), keys::FLOOR_RANGE),
            ),
            (
                "yearBuilt",
                StructuralRule::whole(
                    Some(1800.0),
                    Some(f64::from(current_year)),
                    keys::YEAR_BUILT_RANGE,
                ),
            ),
            (
                "plotReference",
                StructuralRule::text(Some(3), Some(32), keys::PLOT_REFERENCE_LENGTH),
            ),
        ],
        conditional_fields: vec![
            ("apartment", vec!["bedrooms", "bathrooms", "floor"]),
            ("house", vec!["bedrooms", "bathrooms"]),
            ("villa", vec!["bedrooms", "bathrooms"]),
            ("land", vec!["zoning"]),
            ("office", vec!["floor"]),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn table_without_both_categories_is_rejected() {
        let mut sets = BTreeMap::new();
        sets.insert(MainCategory::Vehicles, CategoryRuleSet::default());

        match RuleTable::new(sets) {
            Err(SchemaError::MissingRuleSet(MainCategory::RealEstate)) => {}
            other => panic!("expected missing real estate rules, got {other:?}"),
        }
    }

    #[test]
    fn conditional_tokens_match_by_case_insensitive_containment() {
        let table = RuleTable::standard_for_year(2026).expect("standard rules build");
        let vehicles = table.get(MainCategory::Vehicles).expect("vehicle rules");

        assert_eq!(
            vehicles.conditional_requirements("Light Trucks"),
            vec!["maxLoadCapacity"]
        );
        assert!(vehicles.conditional_requirements("Sedans").is_empty());
    }

    #[test]
    fn multiple_matching_tokens_are_unioned_without_duplicates() {
        let table = RuleTable::standard_for_year(2026).expect("standard rules build");
        let homes = table.get(MainCategory::RealEstate).expect("real estate rules");

        assert_eq!(
            homes.conditional_requirements("Apartment House Villa"),
            vec!["bedrooms", "bathrooms", "floor"]
        );
    }

    #[test]
    fn number_rule_accepts_zero_unless_min_excludes_it() {
        let non_negative = StructuralRule::number(Some(0.0), None, keys::MILEAGE_RANGE);
        assert!(non_negative.check(&json!(0)).is_none());
        assert!(non_negative.check(&json!("0")).is_none());
        assert!(non_negative.check(&json!(-1)).is_some());

        let positive = StructuralRule::number(Some(1.0), None, keys::AREA_RANGE);
        let error = positive.check(&json!(0)).expect("zero is below min");
        assert_eq!(error.params.get("min").map(String::as_str), Some("1"));
    }

    #[test]
    fn number_rule_rejects_non_numeric_values() {
        let rule = StructuralRule::number(Some(1900.0), Some(2027.0), keys::YEAR_RANGE);
        assert!(rule.check(&json!("nineteen ninety")).is_some());
        assert!(rule.check(&json!(true)).is_some());
        assert!(rule.check(&json!(2027)).is_none());
        assert!(rule.check(&json!(2028)).is_some());
    }

    #[test]
    fn whole_rule_checks_range_before_fraction() {
        let floor = StructuralRule::whole(Some(-5.0), Some(200.0), keys::FLOOR_RANGE);
        assert!(floor.check(&json!(-2)).is_none());
        assert!(floor.check(&json!("12")).is_none());
        assert_eq!(floor.check(&json!(2.5)).map(|error| error.key), Some(keys::WHOLE_NUMBER));
        assert_eq!(floor.check(&json!(300.5)).map(|error| error.key), Some(keys::FLOOR_RANGE));
    }

    #[test]
    fn text_value_rejects_flags_and_containers() {
        let rule = StructuralRule::text_value();
        assert!(rule.check(&json!("Corolla")).is_none());
        assert!(rule.check(&json!(308)).is_none());
        assert!(rule.check(&json!(true)).is_some());
        assert!(rule.check(&json!(["a"])).is_some());
    }

    #[test]
    fn pattern_rule_checks_vin_format() {
        let rule = StructuralRule::pattern("vin", VIN_PATTERN, keys::VIN_FORMAT).expect("valid regex");
        assert!(rule.check(&json!("1HGCM82633A004352")).is_none());
        assert!(rule.check(&json!("1HGCM82633A00435O")).is_some());
        assert!(rule.check(&json!("SHORT")).is_some());
    }

    #[test]
    fn year_ceiling_follows_current_year() {
        let table = RuleTable::standard_for_year(2030).expect("rules build");
        let year = table
            .get(MainCategory::Vehicles)
            .and_then(|rules| rules.rule_for("year"))
            .expect("year rule");
        assert!(year.check(&json!(2031)).is_none());
        assert!(year.check(&json!(2032)).is_some());
    }
}
