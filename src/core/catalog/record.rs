use super::classifier::classify;
use crate::core::mixing::{Flavor, Liquid};
use crate::error::CatalogError;
use serde::Deserialize;
use std::collections::HashSet;
use tracing::warn;

/// Catalog ids arrive as strings or bare numbers.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Number(serde_json::Number),
}

impl RawId {
    fn into_string(self) -> String {
        match self {
            Self::Text(text) => text.trim().to_string(),
            Self::Number(number) => number.to_string(),
        }
    }
}

/// One record as the storefront exports it, before normalization.
#[derive(Debug, Clone, Deserialize)]
struct RawLiquid {
    id: RawId,
    #[serde(default)]
    name: String,
    #[serde(default, alias = "primaryFlavor", alias = "category", alias = "flavor")]
    primary_flavor: Option<String>,
    #[serde(default, alias = "secondaryFlavors", alias = "tags")]
    secondary_flavors: Vec<String>,
    #[serde(default, alias = "mentholLevel")]
    menthol_level: Option<f64>,
    #[serde(default)]
    sweetness: Option<f64>,
    #[serde(default)]
    intensity: Option<f64>,
    #[serde(default)]
    complexity: Option<f64>,
    #[serde(default, alias = "vgRatio", alias = "vg")]
    vg_ratio: Option<f64>,
    #[serde(default)]
    stock: Option<f64>,
    #[serde(default)]
    price: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CatalogPayload {
    List(Vec<RawLiquid>),
    Wrapped { liquids: Vec<RawLiquid> },
}

/// Parses a catalog export (a bare array or `{"liquids": [...]}`) into
/// normalized records. Later duplicates of an id are dropped.
pub fn parse_catalog(bytes: &[u8]) -> Result<Vec<Liquid>, CatalogError> {
    let payload: CatalogPayload =
        serde_json::from_slice(bytes).map_err(|e| CatalogError::Parse(e.to_string()))?;
    let raw = match payload {
        CatalogPayload::List(list) | CatalogPayload::Wrapped { liquids: list } => list,
    };

    let mut seen = HashSet::new();
    let mut out = Vec::with_capacity(raw.len());
    for record in raw {
        let liquid = normalize(record);
        if liquid.id.is_empty() {
            warn!(name = %liquid.name, "skipping catalog record without id");
            continue;
        }
        if !seen.insert(liquid.id.clone()) {
            warn!(id = %liquid.id, "skipping duplicate catalog id");
            continue;
        }
        out.push(liquid);
    }
    Ok(out)
}

fn normalize(raw: RawLiquid) -> Liquid {
    let id = raw.id.into_string();
    let classification = classify(&raw.name);

    let primary_flavor = match raw.primary_flavor.as_deref().map(str::trim) {
        Some(text) if !text.is_empty() => text.parse::<Flavor>().unwrap_or_else(|_| {
            warn!(%id, category = text, fallback = %classification.flavor, "unknown flavor category");
            classification.flavor
        }),
        _ => classification.flavor,
    };

    let mut secondary_flavors = classification.tags;
    secondary_flavors.extend(
        raw.secondary_flavors
            .iter()
            .map(|tag| tag.trim().to_lowercase())
            .filter(|tag| !tag.is_empty()),
    );

    let price = match raw.price {
        Some(p) if p.is_finite() && p >= 0.0 => p,
        Some(p) => {
            warn!(%id, price = p, "clamping invalid price to 0");
            0.0
        }
        None => 0.0,
    };

    Liquid {
        menthol_level: bounded(&id, "menthol_level", raw.menthol_level, Liquid::DEFAULT_MENTHOL, 10),
        sweetness: bounded(&id, "sweetness", raw.sweetness, Liquid::DEFAULT_SWEETNESS, 10),
        intensity: bounded(&id, "intensity", raw.intensity, Liquid::DEFAULT_INTENSITY, 10),
        complexity: bounded(&id, "complexity", raw.complexity, Liquid::DEFAULT_COMPLEXITY, 10),
        vg_ratio: bounded(&id, "vg_ratio", raw.vg_ratio, Liquid::DEFAULT_VG_RATIO, 100),
        stock: stock_count(&id, raw.stock),
        price,
        secondary_flavors,
        primary_flavor,
        name: raw.name.trim().to_string(),
        id,
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn bounded(id: &str, field: &str, value: Option<f64>, default: u8, max: u8) -> u8 {
    let Some(value) = value else {
        return default;
    };
    if !value.is_finite() {
        warn!(%id, field, "non-numeric attribute, using default {default}");
        return default;
    }
    let clamped = value.round().clamp(0.0, f64::from(max));
    if (clamped - value).abs() >= 0.5 {
        warn!(%id, field, value, clamped, "attribute out of range, clamped");
    }
    clamped as u8
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn stock_count(id: &str, value: Option<f64>) -> u32 {
    match value {
        Some(v) if v.is_finite() && v >= 0.0 => v.floor().min(f64::from(u32::MAX)) as u32,
        Some(v) => {
            warn!(%id, stock = v, "invalid stock, treating as 0");
            0
        }
        None => 0,
    }
}
