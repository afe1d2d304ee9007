use std::fmt;

use serde::{Deserialize, Serialize};

use super::schema::Section;

/// Top-level marketplace category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MainCategory {
    Vehicles,
    RealEstate,
}

impl MainCategory {
    pub const ALL: [MainCategory; 2] = [MainCategory::Vehicles, MainCategory::RealEstate];

    /// Identifier stored in `mainCategory` on a draft.
    pub const fn key(self) -> &'static str {
        match self {
            MainCategory::Vehicles => "vehicles",
            MainCategory::RealEstate => "realEstate",
        }
    }

    pub fn from_key(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        Self::ALL
            .into_iter()
            .find(|category| category.key().eq_ignore_ascii_case(raw))
    }
}

impl fmt::Display for MainCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Subcategory as offered to the user, plus the schema it renders with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Subcategory {
    /// Display name; this is the value written to `subcategory`.
    pub name: &'static str,
    pub schema_key: &'static str,
    pub field_groups: &'static [Section],
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Category {
    pub main: MainCategory,
    pub label: &'static str,
    pub subcategories: Vec<Subcategory>,
}

/// Static category → subcategory → field group mapping.
#[derive(Debug, Clone)]
pub struct CategoryTaxonomy {
    categories: Vec<Category>,
}

const VEHICLE_GROUPS: &[Section] = &[
    Section::Essential,
    Section::Advanced,
    Section::Appearance,
    Section::Features,
];
const COMPACT_VEHICLE_GROUPS: &[Section] = &[Section::Essential, Section::Advanced];
const PROPERTY_GROUPS: &[Section] = &[Section::Essential, Section::Details, Section::Features];
const LAND_GROUPS: &[Section] = &[Section::Essential, Section::Details];

impl CategoryTaxonomy {
    pub fn new(categories: Vec<Category>) -> Self {
        Self { categories }
    }

    pub fn standard() -> Self {
        Self::new(vec![
            Category {
                main: MainCategory::Vehicles,
                label: "categories.vehicles",
                subcategories: vec![
                    sub("Cars", "cars", VEHICLE_GROUPS),
                    sub("Motorcycles", "motorcycles", VEHICLE_GROUPS),
                    sub("Light Trucks", "trucks", COMPACT_VEHICLE_GROUPS),
                    sub("Heavy Trucks", "trucks", COMPACT_VEHICLE_GROUPS),
                    sub("Vans", "vans", COMPACT_VEHICLE_GROUPS),
                    sub("Buses", "buses", COMPACT_VEHICLE_GROUPS),
                    sub("Boats", "boats", COMPACT_VEHICLE_GROUPS),
                    sub("Caravans & RVs", "caravans", COMPACT_VEHICLE_GROUPS),
                ],
            },
            Category {
                main: MainCategory::RealEstate,
                label: "categories.realEstate",
                subcategories: vec![
                    sub("Apartments", "apartments", PROPERTY_GROUPS),
                    sub("Houses", "houses", PROPERTY_GROUPS),
                    sub("Villas", "houses", PROPERTY_GROUPS),
                    sub("Land", "land", LAND_GROUPS),
                    sub("Offices", "commercial", PROPERTY_GROUPS),
                    sub("Shops", "commercial", PROPERTY_GROUPS),
                    sub("Warehouses", "commercial", LAND_GROUPS),
                    sub("Rooms", "rooms", LAND_GROUPS),
                ],
            },
        ])
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn category(&self, main: MainCategory) -> Option<&Category> {
        self.categories.iter().find(|category| category.main == main)
    }

    pub fn subcategories(&self, main: MainCategory) -> &[Subcategory] {
        self.category(main)
            .map(|category| category.subcategories.as_slice())
            .unwrap_or(&[])
    }

    /// Accepts either the display name or the schema key, case-insensitively.
    pub fn subcategory(&self, main: MainCategory, name: &str) -> Option<&Subcategory> {
        let name = name.trim();
        let subcategories = self.subcategories(main);
        subcategories
            .iter()
            .find(|sub| sub.name.eq_ignore_ascii_case(name))
            .or_else(|| {
                subcategories
                    .iter()
                    .find(|sub| sub.schema_key.eq_ignore_ascii_case(name))
            })
    }

    pub fn schema_key_for(&self, main: MainCategory, subcategory: &str) -> Option<&'static str> {
        self.subcategory(main, subcategory).map(|sub| sub.schema_key)
    }
}

fn sub(name: &'static str, schema_key: &'static str, field_groups: &'static [Section]) -> Subcategory {
    Subcategory {
        name,
        schema_key,
        field_groups,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn main_category_keys_round_trip_case_insensitively() {
        assert_eq!(MainCategory::from_key("vehicles"), Some(MainCategory::Vehicles));
        assert_eq!(MainCategory::from_key(" RealEstate "), Some(MainCategory::RealEstate));
        assert_eq!(MainCategory::from_key("jobs"), None);
    }

    #[test]
    fn subcategory_lookup_accepts_display_names_and_schema_keys() {
        let taxonomy = CategoryTaxonomy::standard();
        assert_eq!(
            taxonomy.schema_key_for(MainCategory::Vehicles, "light trucks"),
            Some("trucks")
        );
        assert_eq!(
            taxonomy.schema_key_for(MainCategory::RealEstate, "apartments"),
            Some("apartments")
        );
        assert_eq!(taxonomy.schema_key_for(MainCategory::Vehicles, "Sedans"), None);
    }

    #[test]
    fn every_category_has_subcategories() {
        let taxonomy = CategoryTaxonomy::standard();
        for main in MainCategory::ALL {
            assert!(
                !taxonomy.subcategories(main).is_empty(),
                "{} should list subcategories",
                main.key()
            );
        }
    }
}
