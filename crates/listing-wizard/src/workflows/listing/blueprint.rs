use chrono::{Datelike, Utc};

use super::draft::DraftListing;
use super::rules::{CategoryRuleSet, RuleTable};
use super::schema::{ResolvedSchema, SchemaError, SchemaRegistry};
use super::taxonomy::{CategoryTaxonomy, MainCategory};

/// Immutable bundle of taxonomy, field schemas and rule table, built once at startup.
#[derive(Debug, Clone)]
pub struct ListingBlueprint {
    taxonomy: CategoryTaxonomy,
    schemas: SchemaRegistry,
    rules: RuleTable,
}

impl ListingBlueprint {
    pub fn new(taxonomy: CategoryTaxonomy, schemas: SchemaRegistry, rules: RuleTable) -> Self {
        Self {
            taxonomy,
            schemas,
            rules,
        }
    }

    pub fn standard() -> Result<Self, SchemaError> {
        Self::standard_for_year(Utc::now().year())
    }

    pub fn standard_for_year(current_year: i32) -> Result<Self, SchemaError> {
        Ok(Self::new(
            CategoryTaxonomy::standard(),
            SchemaRegistry::standard()?,
            RuleTable::standard_for_year(current_year)?,
        ))
    }

    pub fn taxonomy(&self) -> &CategoryTaxonomy {
        &self.taxonomy
    }

    pub fn schemas(&self) -> &SchemaRegistry {
        &self.schemas
    }

    pub fn rules(&self) -> &RuleTable {
        &self.rules
    }

    /// Rule set for the draft's `mainCategory`, if it names a registered category.
    pub fn rules_for(&self, draft: &DraftListing) -> Option<&CategoryRuleSet> {
        draft
            .main_category()
            .and_then(|key| self.rules.for_key(key))
    }

    /// Field list for a category/subcategory pair, falling back to the base schema.
    pub fn schema_for_subcategory(
        &self,
        main: MainCategory,
        subcategory: Option<&str>,
    ) -> ResolvedSchema<'_> {
        let key = subcategory.map(|name| {
            self.taxonomy
                .schema_key_for(main, name)
                .unwrap_or(name)
        });
        self.schemas.resolve(main, key)
    }

    /// Field list the draft should render with; `None` when the main category is unknown.
    pub fn schema_for(&self, draft: &DraftListing) -> Option<ResolvedSchema<'_>> {
        let main = draft.main_category().and_then(MainCategory::from_key)?;
        Some(self.schema_for_subcategory(main, draft.subcategory()))
    }

    /// Schema key used as the vehicle type for make/model lookups.
    pub fn vehicle_type_for(&self, draft: &DraftListing) -> Option<&'static str> {
        let main = draft.main_category().and_then(MainCategory::from_key)?;
        if main != MainCategory::Vehicles {
            return None;
        }
        self.taxonomy.schema_key_for(main, draft.subcategory()?)
    }
}
