use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// Food number, stable across locales.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FoodId(pub u32);

impl fmt::Display for FoodId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for FoodId {
    type Err = std::num::ParseIntError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        value.trim().parse::<u32>().map(FoodId)
    }
}

/// A cataloged food item. Owned by the catalog; the suggestion engine only reads it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FoodRecord {
    pub id: FoodId,
    pub name: String,
    pub locale: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub alt_name: Option<String>,
    #[serde(default)]
    pub scientific_name: Option<String>,
    #[serde(default)]
    pub classifications: Classifications,
}

impl FoodRecord {
    pub fn new(id: u32, name: impl Into<String>, locale: impl Into<String>) -> Self {
        Self {
            id: FoodId(id),
            name: name.into(),
            locale: locale.into(),
            category: None,
            image_url: None,
            alt_name: None,
            scientific_name: None,
            classifications: Classifications::default(),
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_classification(mut self, kind: ClassificationKind, name: impl Into<String>) -> Self {
        self.classifications.insert(kind, Classification::named(name));
        self
    }

    /// Name of the food-source classification, if the record has one.
    pub fn food_source_name(&self) -> Option<&str> {
        self.classifications.get(ClassificationKind::FoodSource).map(|c| c.name.as_str())
    }
}

/// Classification facets carried by a food document.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassificationKind {
    ProductType,
    FoodSource,
    PartUsed,
    PhysicalState,
    HeatTreatment,
    Preservation,
    PackingMedium,
    ConsumerGroup,
    GeographicOrigin,
    ContactSurface,
    ContainerWrapping,
    CookingMethod,
    TreatmentApplied,
}

impl ClassificationKind {
    pub const ALL: [ClassificationKind; 13] = [
        Self::ProductType,
        Self::FoodSource,
        Self::PartUsed,
        Self::PhysicalState,
        Self::HeatTreatment,
        Self::Preservation,
        Self::PackingMedium,
        Self::ConsumerGroup,
        Self::GeographicOrigin,
        Self::ContactSurface,
        Self::ContainerWrapping,
        Self::CookingMethod,
        Self::TreatmentApplied,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ProductType => "product_type",
            Self::FoodSource => "food_source",
            Self::PartUsed => "part_used",
            Self::PhysicalState => "physical_state",
            Self::HeatTreatment => "heat_treatment",
            Self::Preservation => "preservation",
            Self::PackingMedium => "packing_medium",
            Self::ConsumerGroup => "consumer_group",
            Self::GeographicOrigin => "geographic_origin",
            Self::ContactSurface => "contact_surface",
            Self::ContainerWrapping => "container_wrapping",
            Self::CookingMethod => "cooking_method",
            Self::TreatmentApplied => "treatment_applied",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("unknown classification kind `{0}`")]
pub struct UnknownClassificationKind(pub String);

impl FromStr for ClassificationKind {
    type Err = UnknownClassificationKind;

    /// Accepts `food_source`, `foodSource`, `FOOD-SOURCE` and similar spellings.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let key: String = value
            .chars()
            .filter(|ch| !matches!(ch, '_' | '-' | ' '))
            .map(|ch| ch.to_ascii_lowercase())
            .collect();

        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().replace('_', "") == key)
            .ok_or_else(|| UnknownClassificationKind(value.to_string()))
    }
}

impl<'de> Deserialize<'de> for ClassificationKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// One classification with its embedded regulatory codes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    pub name: String,
    #[serde(default)]
    pub facet_codes: Option<String>,
    #[serde(default)]
    pub langual_id: Option<String>,
}

impl Classification {
    pub fn named(name: impl Into<String>) -> Self {
        Self { name: name.into(), facet_codes: None, langual_id: None }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Classifications(BTreeMap<ClassificationKind, Classification>);

impl Classifications {
    pub fn get(&self, kind: ClassificationKind) -> Option<&Classification> {
        self.0.get(&kind)
    }

    pub fn insert(&mut self, kind: ClassificationKind, classification: Classification) {
        self.0.insert(kind, classification);
    }
}

/// Where a food comes from, as far as suggestions are concerned.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FoodSource {
    Plant,
    Animal,
    Unclassified,
}
