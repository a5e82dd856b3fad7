use crate::config::MAX_LIQUIDS_LIMIT;
use crate::error::ValidationError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use strum::{Display, EnumIter, EnumString};

use super::hash::CompositionHash;

// Flavor: dominant taste category of a liquid
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Flavor {
    Fruit,
    Dessert,
    Menthol,
    Tobacco,
    Beverage,
    Cream,
    Spice,
    /// Fallback for catalog records that could not be classified.
    Mixed,
}

impl Flavor {
    /// The seven categories a catalog record can be assigned to.
    pub const PRIMARY: [Flavor; 7] = [
        Flavor::Fruit,
        Flavor::Dessert,
        Flavor::Menthol,
        Flavor::Tobacco,
        Flavor::Beverage,
        Flavor::Cream,
        Flavor::Spice,
    ];

    pub fn is_primary(self) -> bool {
        self != Self::Mixed
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Fruit => "Fruit",
            Self::Dessert => "Dessert",
            Self::Menthol => "Menthol",
            Self::Tobacco => "Tobacco",
            Self::Beverage => "Beverage",
            Self::Cream => "Cream",
            Self::Spice => "Spice",
            Self::Mixed => "Mixed",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            Self::Fruit => "🍓",
            Self::Dessert => "🍰",
            Self::Menthol => "❄️",
            Self::Tobacco => "🍂",
            Self::Beverage => "☕",
            Self::Cream => "🥛",
            Self::Spice => "🌶️",
            Self::Mixed => "🌀",
        }
    }
}

// Liquid: normalized catalog record, consumed read-only
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Liquid {
    pub id: String,
    pub name: String,
    pub primary_flavor: Flavor,
    #[serde(default)]
    pub secondary_flavors: BTreeSet<String>,
    pub menthol_level: u8,
    pub sweetness: u8,
    pub intensity: u8,
    pub complexity: u8,
    /// VG share of the base, 0..=100
    pub vg_ratio: u8,
    pub stock: u32,
    pub price: f64,
}

impl Liquid {
    pub const DEFAULT_MENTHOL: u8 = 0;
    pub const DEFAULT_SWEETNESS: u8 = 5;
    pub const DEFAULT_INTENSITY: u8 = 5;
    pub const DEFAULT_COMPLEXITY: u8 = 5;
    pub const DEFAULT_VG_RATIO: u8 = 50;

    /// A record with default attributes and one unit in stock.
    pub fn new(id: impl Into<String>, name: impl Into<String>, primary_flavor: Flavor) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            primary_flavor,
            secondary_flavors: BTreeSet::new(),
            menthol_level: Self::DEFAULT_MENTHOL,
            sweetness: Self::DEFAULT_SWEETNESS,
            intensity: Self::DEFAULT_INTENSITY,
            complexity: Self::DEFAULT_COMPLEXITY,
            vg_ratio: Self::DEFAULT_VG_RATIO,
            stock: 1,
            price: 0.0,
        }
    }

    pub fn with_profile(mut self, menthol: u8, sweetness: u8, intensity: u8, complexity: u8) -> Self {
        self.menthol_level = menthol.min(10);
        self.sweetness = sweetness.min(10);
        self.intensity = intensity.min(10);
        self.complexity = complexity.min(10);
        self
    }

    pub fn with_stock(mut self, stock: u32) -> Self {
        self.stock = stock;
        self
    }

    pub fn with_price(mut self, price: f64) -> Self {
        self.price = price.max(0.0);
        self
    }

    pub fn with_vg_ratio(mut self, vg_ratio: u8) -> Self {
        self.vg_ratio = vg_ratio.min(100);
        self
    }

    pub fn in_stock(&self) -> bool {
        self.stock > 0
    }
}

fn default_target_complexity() -> u16 {
    u16::from(Liquid::DEFAULT_COMPLEXITY)
}

// TasteTarget: what the customer asked for.
// Fields are wider than their valid range so `validate` reports overflow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TasteTarget {
    pub desired_flavor: Flavor,
    pub menthol_level: u16,
    pub sweetness: u16,
    #[serde(default = "default_target_complexity")]
    pub complexity: u16,
    pub max_liquids: u16,
}

impl TasteTarget {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.desired_flavor.is_primary() {
            return Err(ValidationError::UnsupportedFlavor(self.desired_flavor));
        }
        if !(1..=u16::from(MAX_LIQUIDS_LIMIT)).contains(&self.max_liquids) {
            return Err(ValidationError::MaxLiquidsOutOfRange(self.max_liquids));
        }
        for (field, value) in [
            ("menthol_level", self.menthol_level),
            ("sweetness", self.sweetness),
            ("complexity", self.complexity),
        ] {
            if value > 10 {
                return Err(ValidationError::AttributeOutOfRange { field, value });
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Component {
    pub liquid_id: String,
    pub percentage: f64,
}

impl Component {
    pub fn new(liquid_id: impl Into<String>, percentage: f64) -> Self {
        Self {
            liquid_id: liquid_id.into(),
            percentage,
        }
    }
}

// Composition: unordered set of (liquid, share) pairs
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Composition {
    pub components: Vec<Component>,
}

impl Composition {
    pub fn new(components: Vec<Component>) -> Self {
        Self { components }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Component> {
        self.components.iter()
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    pub fn total(&self) -> f64 {
        self.components.iter().map(|c| c.percentage).sum()
    }

    pub fn hash(&self) -> CompositionHash {
        CompositionHash::of(self)
    }

    /// Structural checks that need no catalog: non-empty, each share within
    /// 0..=100, unique liquids, total within `tolerance` of 100.
    pub fn validate(&self, tolerance: f64) -> Result<(), ValidationError> {
        if self.components.is_empty() {
            return Err(ValidationError::EmptyComposition);
        }

        let mut seen = BTreeSet::new();
        for component in &self.components {
            if !component.percentage.is_finite() || !(0.0..=100.0).contains(&component.percentage)
            {
                return Err(ValidationError::PercentageOutOfRange {
                    liquid_id: component.liquid_id.clone(),
                    value: component.percentage,
                });
            }
            if !seen.insert(component.liquid_id.as_str()) {
                return Err(ValidationError::DuplicateLiquid(component.liquid_id.clone()));
            }
        }

        let total = self.total();
        if (total - 100.0).abs() > tolerance {
            return Err(ValidationError::PercentageSum { total, tolerance });
        }
        Ok(())
    }
}

impl FromIterator<Component> for Composition {
    fn from_iter<I: IntoIterator<Item = Component>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

// FlavorProfile: percentage-weighted blend attributes
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FlavorProfile {
    pub menthol_level: f64,
    pub sweetness: f64,
    pub complexity: f64,
    pub intensity: f64,
}

impl FlavorProfile {
    /// Weighted average over `(liquid, weight)` pairs; weights need not sum to 1.
    pub fn blend<'a, I>(parts: I) -> Self
    where
        I: IntoIterator<Item = (&'a Liquid, f64)>,
    {
        let mut acc = Self::default();
        let mut total_weight = 0.0;
        for (liquid, weight) in parts {
            acc.menthol_level += f64::from(liquid.menthol_level) * weight;
            acc.sweetness += f64::from(liquid.sweetness) * weight;
            acc.complexity += f64::from(liquid.complexity) * weight;
            acc.intensity += f64::from(liquid.intensity) * weight;
            total_weight += weight;
        }
        if total_weight <= 0.0 {
            return Self::default();
        }
        Self {
            menthol_level: acc.menthol_level / total_weight,
            sweetness: acc.sweetness / total_weight,
            complexity: acc.complexity / total_weight,
            intensity: acc.intensity / total_weight,
        }
    }

    /// Euclidean distance to a target over menthol, sweetness and complexity.
    pub fn distance_to(&self, target: &TasteTarget) -> f64 {
        let dm = self.menthol_level - f64::from(target.menthol_level);
        let ds = self.sweetness - f64::from(target.sweetness);
        let dc = self.complexity - f64::from(target.complexity);
        (dm * dm + ds * ds + dc * dc).sqrt()
    }

    pub fn rounded(&self) -> Self {
        Self {
            menthol_level: round1(self.menthol_level),
            sweetness: round1(self.sweetness),
            complexity: round1(self.complexity),
            intensity: round1(self.intensity),
        }
    }
}

pub(crate) fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum CompatibilityTier {
    Excellent,
    Good,
    Fair,
    Poor,
}

// MixSuggestion: composer output, regenerated per request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MixSuggestion {
    pub name: String,
    pub composition: Composition,
    pub estimated_profile: FlavorProfile,
    pub difficulty: Difficulty,
    pub distance: f64,
    pub match_score: f64,
    pub estimated_price: f64,
    pub hash: CompositionHash,
}

// MixAnalysis: evaluator output for a user-built composition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MixAnalysis {
    pub total_percentage: f64,
    pub estimated_profile: FlavorProfile,
    pub compatibility: CompatibilityTier,
    pub score: u32,
    pub warnings: Vec<String>,
    pub recommendations: Vec<String>,
    pub incompatible_pairs: Vec<(String, String)>,
    pub hash: CompositionHash,
}
