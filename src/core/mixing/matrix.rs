use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use strum::Display;

use super::types::Flavor;
use super::types::Flavor::{Beverage, Cream, Dessert, Fruit, Menthol, Mixed, Spice, Tobacco};

/// How two primary flavors combine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum PairRelation {
    Same,
    Compatible,
    Neutral,
    Incompatible,
}

impl PairRelation {
    pub fn is_harmonious(self) -> bool {
        matches!(self, Self::Same | Self::Compatible)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlavorAffinities {
    pub compatible: BTreeSet<Flavor>,
    pub neutral: BTreeSet<Flavor>,
    pub incompatible: BTreeSet<Flavor>,
}

impl FlavorAffinities {
    fn from_lists(compatible: &[Flavor], neutral: &[Flavor], incompatible: &[Flavor]) -> Self {
        Self {
            compatible: compatible.iter().copied().collect(),
            neutral: neutral.iter().copied().collect(),
            incompatible: incompatible.iter().copied().collect(),
        }
    }
}

type TableRow = (Flavor, &'static [Flavor], &'static [Flavor], &'static [Flavor]);

// (flavor, compatible, neutral, incompatible)
const DEFAULT_TABLE: &[TableRow] = &[
    (Fruit, &[Dessert, Cream, Beverage], &[Menthol, Spice], &[Tobacco]),
    (Dessert, &[Fruit, Cream, Beverage, Tobacco], &[Spice], &[Menthol]),
    (Menthol, &[Beverage], &[Fruit, Spice], &[Dessert, Cream, Tobacco]),
    (Tobacco, &[Dessert, Spice], &[Beverage], &[Fruit, Menthol, Cream]),
    (Beverage, &[Fruit, Dessert, Menthol, Cream], &[Tobacco, Spice], &[]),
    (Cream, &[Fruit, Dessert, Beverage], &[Spice], &[Menthol, Tobacco]),
    (Spice, &[Tobacco], &[Fruit, Dessert, Cream, Beverage, Menthol], &[]),
    (
        Mixed,
        &[],
        &[Fruit, Dessert, Menthol, Tobacco, Beverage, Cream, Spice],
        &[],
    ),
];

/// Table-driven lookup of which flavors blend well, poorly or neutrally.
#[derive(Debug, Clone)]
pub struct CompatibilityMatrix {
    entries: HashMap<Flavor, FlavorAffinities>,
    fallback: FlavorAffinities,
}

impl Default for CompatibilityMatrix {
    fn default() -> Self {
        let entries = DEFAULT_TABLE
            .iter()
            .map(|(flavor, compatible, neutral, incompatible)| {
                (
                    *flavor,
                    FlavorAffinities::from_lists(compatible, neutral, incompatible),
                )
            })
            .collect();
        Self::from_entries(entries)
    }
}

impl CompatibilityMatrix {
    /// Flavors without an entry resolve to an all-neutral fallback.
    pub fn from_entries(entries: HashMap<Flavor, FlavorAffinities>) -> Self {
        let fallback = FlavorAffinities {
            neutral: Flavor::PRIMARY.into_iter().collect(),
            ..FlavorAffinities::default()
        };
        Self { entries, fallback }
    }

    pub fn entry(&self, flavor: Flavor) -> &FlavorAffinities {
        self.entries.get(&flavor).unwrap_or(&self.fallback)
    }

    /// Symmetric relation: incompatibility listed on either side wins, then
    /// compatibility listed on either side, otherwise neutral.
    pub fn relation(&self, a: Flavor, b: Flavor) -> PairRelation {
        if a == b {
            return PairRelation::Same;
        }
        let (ea, eb) = (self.entry(a), self.entry(b));
        if ea.incompatible.contains(&b) || eb.incompatible.contains(&a) {
            PairRelation::Incompatible
        } else if ea.compatible.contains(&b) || eb.compatible.contains(&a) {
            PairRelation::Compatible
        } else {
            PairRelation::Neutral
        }
    }

    pub fn is_incompatible(&self, a: Flavor, b: Flavor) -> bool {
        self.relation(a, b) == PairRelation::Incompatible
    }

    /// Flavors eligible for a blend built around `desired`: the flavor itself
    /// plus everything it lists as compatible or neutral.
    pub fn candidate_flavors(&self, desired: Flavor) -> BTreeSet<Flavor> {
        let entry = self.entry(desired);
        let mut out: BTreeSet<Flavor> = entry
            .compatible
            .union(&entry.neutral)
            .copied()
            .filter(|f| !self.is_incompatible(desired, *f))
            .collect();
        out.insert(desired);
        out
    }
}
