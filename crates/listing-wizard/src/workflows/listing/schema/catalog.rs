use std::collections::BTreeMap;

use serde_json::Value;

use super::super::draft::as_number;
use super::super::messages::{keys, FieldError};
use super::{FieldDescriptor, FieldType, Section};

const VEHICLE_CONDITIONS: &[(&str, &str)] = &[
    ("new", "options.condition.new"),
    ("used", "options.condition.used"),
    ("damaged", "options.condition.damaged"),
];

const PROPERTY_CONDITIONS: &[(&str, &str)] = &[
    ("new", "options.condition.newBuild"),
    ("renovated", "options.condition.renovated"),
    ("good", "options.condition.good"),
    ("needsRenovation", "options.condition.needsRenovation"),
];

const PROPERTY_TYPES: &[(&str, &str)] = &[
    ("apartment", "options.propertyType.apartment"),
    ("house", "options.propertyType.house"),
    ("villa", "options.propertyType.villa"),
    ("land", "options.propertyType.land"),
    ("office", "options.propertyType.office"),
    ("shop", "options.propertyType.shop"),
    ("warehouse", "options.propertyType.warehouse"),
    ("room", "options.propertyType.room"),
];

const FUEL_TYPES: &[(&str, &str)] = &[
    ("petrol", "options.fuel.petrol"),
    ("diesel", "options.fuel.diesel"),
    ("hybrid", "options.fuel.hybrid"),
    ("electric", "options.fuel.electric"),
    ("lpg", "options.fuel.lpg"),
];

const TRANSMISSIONS: &[(&str, &str)] = &[
    ("manual", "options.transmission.manual"),
    ("automatic", "options.transmission.automatic"),
];

const HEATING: &[(&str, &str)] = &[
    ("central", "options.heating.central"),
    ("gas", "options.heating.gas"),
    ("electric", "options.heating.electric"),
    ("heatPump", "options.heating.heatPump"),
    ("none", "options.heating.none"),
];

const PROPERTY_AMENITIES: &[(&str, &str)] = &[
    ("balcony", "options.amenities.balcony"),
    ("storage", "options.amenities.storage"),
    ("pool", "options.amenities.pool"),
    ("gym", "options.amenities.gym"),
    ("security", "options.amenities.security"),
    ("airConditioning", "options.amenities.airConditioning"),
];

/// Accepts `#RGB` and `#RRGGBB`.
pub(super) fn hex_color(value: &Value) -> Option<FieldError> {
    let valid = value.as_str().is_some_and(|text| {
        let digits = text.strip_prefix('#').unwrap_or("");
        matches!(digits.len(), 3 | 6) && digits.chars().all(|c| c.is_ascii_hexdigit())
    });
    if valid {
        None
    } else {
        Some(FieldError::format(keys::COLOR_FORMAT))
    }
}

pub(super) fn whole_number(value: &Value) -> Option<FieldError> {
    match as_number(value) {
        Some(number) if number.fract() == 0.0 => None,
        _ => Some(FieldError::format(keys::WHOLE_NUMBER)),
    }
}

fn make() -> FieldDescriptor {
    FieldDescriptor::new("make", "fields.make", FieldType::Text, Section::Essential).required()
}

fn model() -> FieldDescriptor {
    FieldDescriptor::new("model", "fields.model", FieldType::Text, Section::Essential).required()
}

fn year() -> FieldDescriptor {
    FieldDescriptor::new("year", "fields.year", FieldType::Number, Section::Essential)
        .required()
        .with_validator(whole_number)
}

fn vehicle_condition() -> FieldDescriptor {
    FieldDescriptor::new("condition", "fields.condition", FieldType::Select, Section::Essential)
        .required()
        .with_options(VEHICLE_CONDITIONS)
}

fn mileage() -> FieldDescriptor {
    FieldDescriptor::new("mileage", "fields.mileage", FieldType::Number, Section::Essential)
}

fn fuel_type() -> FieldDescriptor {
    FieldDescriptor::new("fuelType", "fields.fuelType", FieldType::Select, Section::Advanced)
        .with_options(FUEL_TYPES)
}

fn transmission() -> FieldDescriptor {
    FieldDescriptor::new(
        "transmission",
        "fields.transmission",
        FieldType::Select,
        Section::Advanced,
    )
    .with_options(TRANSMISSIONS)
}

fn color(name: &'static str, label: &'static str) -> FieldDescriptor {
    FieldDescriptor::new(name, label, FieldType::Colorpicker, Section::Appearance).with_validator(hex_color)
}

fn seats() -> FieldDescriptor {
    FieldDescriptor::new("seats", "fields.seats", FieldType::Number, Section::Advanced)
        .with_validator(whole_number)
}

fn property_type() -> FieldDescriptor {
    FieldDescriptor::new("propertyType", "fields.propertyType", FieldType::Select, Section::Essential)
        .required()
        .with_options(PROPERTY_TYPES)
}

fn property_condition() -> FieldDescriptor {
    FieldDescriptor::new("condition", "fields.condition", FieldType::Select, Section::Essential)
        .required()
        .with_options(PROPERTY_CONDITIONS)
}

fn area() -> FieldDescriptor {
    FieldDescriptor::new("area", "fields.area", FieldType::Number, Section::Essential).required()
}

fn room_count(name: &'static str, label: &'static str) -> FieldDescriptor {
    FieldDescriptor::new(name, label, FieldType::Number, Section::Details).with_validator(whole_number)
}

fn flag(name: &'static str, label: &'static str, section: Section) -> FieldDescriptor {
    FieldDescriptor::new(name, label, FieldType::Checkbox, section)
}

fn year_built() -> FieldDescriptor {
    FieldDescriptor::new("yearBuilt", "fields.yearBuilt", FieldType::Number, Section::Details)
        .with_validator(whole_number)
}

fn heating() -> FieldDescriptor {
    FieldDescriptor::new("heating", "fields.heating", FieldType::Select, Section::Details)
        .with_options(HEATING)
}

fn amenities() -> FieldDescriptor {
    FieldDescriptor::new(
        "amenities",
        "fields.amenities",
        FieldType::Multiselect,
        Section::Features,
    )
    .with_options(PROPERTY_AMENITIES)
}

pub(super) fn vehicle_base() -> Vec<FieldDescriptor> {
    vec![make(), model(), year(), vehicle_condition()]
}

pub(super) fn real_estate_base() -> Vec<FieldDescriptor> {
    vec![property_type(), property_condition()]
}

pub(super) fn subcategory_schemas() -> BTreeMap<&'static str, Vec<FieldDescriptor>> {
    let mut schemas = BTreeMap::new();

    schemas.insert(
        "cars",
        vec![
            make(),
            model(),
            year(),
            vehicle_condition(),
            mileage(),
            fuel_type(),
            transmission(),
            FieldDescriptor::new("bodyType", "fields.bodyType", FieldType::Select, Section::Essential)
                .with_options(&[
                    ("sedan", "options.body.sedan"),
                    ("hatchback", "options.body.hatchback"),
                    ("suv", "options.body.suv"),
                    ("coupe", "options.body.coupe"),
                    ("convertible", "options.body.convertible"),
                    ("wagon", "options.body.wagon"),
                    ("pickup", "options.body.pickup"),
                ]),
            FieldDescriptor::new("engineSize", "fields.engineSize", FieldType::Number, Section::Advanced),
            FieldDescriptor::new("doors", "fields.doors", FieldType::Select, Section::Advanced).with_options(
                &[("2", "2"), ("3", "3"), ("4", "4"), ("5", "5")],
            ),
            FieldDescriptor::new("vin", "fields.vin", FieldType::Text, Section::Advanced),
            color("color", "fields.color"),
            color("interiorColor", "fields.interiorColor"),
            FieldDescriptor::new("features", "fields.features", FieldType::Multiselect, Section::Features)
                .with_options(&[
                    ("airConditioning", "options.features.airConditioning"),
                    ("navigation", "options.features.navigation"),
                    ("parkingSensors", "options.features.parkingSensors"),
                    ("sunroof", "options.features.sunroof"),
                    ("leatherSeats", "options.features.leatherSeats"),
                    ("bluetooth", "options.features.bluetooth"),
                ]),
        ],
    );

    schemas.insert(
        "motorcycles",
        vec![
            make(),
            model(),
            year(),
            vehicle_condition(),
            mileage(),
            FieldDescriptor::new("engineSize", "fields.engineSize", FieldType::Number, Section::Essential)
                .required(),
            FieldDescriptor::new(
                "motorcycleType",
                "fields.motorcycleType",
                FieldType::Select,
                Section::Advanced,
            )
            .with_options(&[
                ("sport", "options.motorcycle.sport"),
                ("cruiser", "options.motorcycle.cruiser"),
                ("touring", "options.motorcycle.touring"),
                ("offroad", "options.motorcycle.offroad"),
                ("scooter", "options.motorcycle.scooter"),
            ]),
            color("color", "fields.color"),
        ],
    );

    schemas.insert(
        "trucks",
        vec![
            make(),
            model(),
            year(),
            vehicle_condition(),
            mileage(),
            FieldDescriptor::new(
                "maxLoadCapacity",
                "fields.maxLoadCapacity",
                FieldType::Number,
                Section::Essential,
            ),
            FieldDescriptor::new("axles", "fields.axles", FieldType::Select, Section::Advanced)
                .with_options(&[("2", "2"), ("3", "3"), ("4", "4")]),
            FieldDescriptor::new("cabType", "fields.cabType", FieldType::Select, Section::Advanced)
                .with_options(&[
                    ("day", "options.cab.day"),
                    ("sleeper", "options.cab.sleeper"),
                    ("crew", "options.cab.crew"),
                ]),
            fuel_type(),
            transmission(),
        ],
    );

    schemas.insert(
        "vans",
        vec![
            make(),
            model(),
            year(),
            vehicle_condition(),
            mileage(),
            seats(),
            FieldDescriptor::new("cargoVolume", "fields.cargoVolume", FieldType::Number, Section::Advanced),
            fuel_type(),
            transmission(),
        ],
    );

    schemas.insert(
        "buses",
        vec![
            make(),
            model(),
            year(),
            vehicle_condition(),
            mileage(),
            seats().required(),
            fuel_type(),
        ],
    );

    schemas.insert(
        "boats",
        vec![
            make(),
            model(),
            year(),
            vehicle_condition(),
            FieldDescriptor::new("length", "fields.boatLength", FieldType::Number, Section::Essential)
                .required(),
            FieldDescriptor::new(
                "hullMaterial",
                "fields.hullMaterial",
                FieldType::Select,
                Section::Advanced,
            )
            .with_options(&[
                ("fiberglass", "options.hull.fiberglass"),
                ("aluminium", "options.hull.aluminium"),
                ("wood", "options.hull.wood"),
                ("steel", "options.hull.steel"),
            ]),
            FieldDescriptor::new("engineHours", "fields.engineHours", FieldType::Number, Section::Advanced),
        ],
    );

    schemas.insert(
        "apartments",
        vec![
            property_type(),
            property_condition(),
            area(),
            room_count("bedrooms", "fields.bedrooms"),
            room_count("bathrooms", "fields.bathrooms"),
            room_count("floor", "fields.floor"),
            room_count("totalFloors", "fields.totalFloors"),
            flag("furnished", "fields.furnished", Section::Details),
            flag("elevator", "fields.elevator", Section::Features),
            flag("parking", "fields.parking", Section::Features),
            heating(),
            year_built(),
            amenities(),
        ],
    );

    schemas.insert(
        "houses",
        vec![
            property_type(),
            property_condition(),
            area(),
            FieldDescriptor::new("plotArea", "fields.plotArea", FieldType::Number, Section::Details),
            room_count("bedrooms", "fields.bedrooms"),
            room_count("bathrooms", "fields.bathrooms"),
            room_count("floors", "fields.floors"),
            flag("garage", "fields.garage", Section::Features),
            flag("garden", "fields.garden", Section::Features),
            heating(),
            year_built(),
            amenities(),
        ],
    );

    schemas.insert(
        "land",
        vec![
            property_type(),
            area(),
            FieldDescriptor::new("zoning", "fields.zoning", FieldType::Select, Section::Details).with_options(
                &[
                    ("residential", "options.zoning.residential"),
                    ("commercial", "options.zoning.commercial"),
                    ("agricultural", "options.zoning.agricultural"),
                    ("industrial", "options.zoning.industrial"),
                ],
            ),
            FieldDescriptor::new(
                "plotReference",
                "fields.plotReference",
                FieldType::Text,
                Section::Details,
            ),
            FieldDescriptor::new("utilities", "fields.utilities", FieldType::Multiselect, Section::Details)
                .with_options(&[
                    ("water", "options.utilities.water"),
                    ("electricity", "options.utilities.electricity"),
                    ("sewage", "options.utilities.sewage"),
                    ("gas", "options.utilities.gas"),
                ]),
            flag("roadAccess", "fields.roadAccess", Section::Details),
        ],
    );

    schemas.insert(
        "commercial",
        vec![
            property_type(),
            property_condition(),
            area(),
            room_count("floor", "fields.floor"),
            FieldDescriptor::new(
                "parkingSpaces",
                "fields.parkingSpaces",
                FieldType::Number,
                Section::Details,
            )
            .with_validator(whole_number),
            flag("loadingDock", "fields.loadingDock", Section::Features),
            year_built(),
            FieldDescriptor::new(
                "lease.terms",
                "fields.leaseTerms",
                FieldType::Textarea,
                Section::Details,
            ),
        ],
    );

    schemas
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn hex_color_accepts_short_and_long_forms() {
        assert!(hex_color(&json!("#fff")).is_none());
        assert!(hex_color(&json!("#1A2B3C")).is_none());
        assert!(hex_color(&json!("red")).is_some());
        assert!(hex_color(&json!("#12345")).is_some());
        assert!(hex_color(&json!(123456)).is_some());
    }

    #[test]
    fn whole_number_accepts_numeric_strings() {
        assert!(whole_number(&json!(3)).is_none());
        assert!(whole_number(&json!("4")).is_none());
        assert!(whole_number(&json!(2.5)).is_some());
        assert!(whole_number(&json!("two")).is_some());
    }
}
