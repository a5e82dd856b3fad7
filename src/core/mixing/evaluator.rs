use crate::config::MixingConfig;
use crate::error::ValidationError;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

use super::hash::CompositionHash;
use super::matrix::{CompatibilityMatrix, PairRelation};
use super::types::{CompatibilityTier, Composition, Flavor, FlavorProfile, Liquid, MixAnalysis};

const INTENSITY_WARN: f64 = 8.0;
const MENTHOL_WARN: f64 = 8.0;
const SWEETNESS_WARN: f64 = 8.0;
const VG_SPREAD_WARN: u8 = 20;
const PENALTY_PER_INCOMPATIBLE_PAIR: u32 = 25;

/// Resolves catalog ids for analysis.
pub trait LiquidLookup {
    fn liquid(&self, id: &str) -> Option<&Liquid>;
}

impl LiquidLookup for [Liquid] {
    fn liquid(&self, id: &str) -> Option<&Liquid> {
        self.iter().find(|l| l.id == id)
    }
}

impl LiquidLookup for Vec<Liquid> {
    fn liquid(&self, id: &str) -> Option<&Liquid> {
        self.as_slice().liquid(id)
    }
}

impl LiquidLookup for HashMap<String, Liquid> {
    fn liquid(&self, id: &str) -> Option<&Liquid> {
        self.get(id)
    }
}

#[derive(Debug, Default)]
struct PairReport {
    total: usize,
    neutral: usize,
    incompatible: Vec<(usize, usize)>,
}

/// Scores a user-assembled composition against the catalog.
#[derive(Debug, Clone)]
pub struct MixEvaluator {
    matrix: Arc<CompatibilityMatrix>,
    tolerance: f64,
    max_components: usize,
}

impl MixEvaluator {
    pub fn new(matrix: Arc<CompatibilityMatrix>, config: &MixingConfig) -> Self {
        Self {
            matrix,
            tolerance: config.percentage_tolerance,
            max_components: config.max_components,
        }
    }

    pub fn analyze<L>(
        &self,
        composition: &Composition,
        catalog: &L,
    ) -> Result<MixAnalysis, ValidationError>
    where
        L: LiquidLookup + ?Sized,
    {
        composition.validate(self.tolerance)?;

        let resolved = composition
            .iter()
            .map(|c| {
                catalog
                    .liquid(&c.liquid_id)
                    .map(|liquid| (liquid, c.percentage))
                    .ok_or_else(|| ValidationError::UnknownLiquid(c.liquid_id.clone()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let profile = FlavorProfile::blend(resolved.iter().copied());
        let pairs = self.pair_report(&resolved);
        let compatibility = tier(&pairs);
        let incompatible_count = u32::try_from(pairs.incompatible.len()).unwrap_or(u32::MAX);
        let score =
            100u32.saturating_sub(incompatible_count.saturating_mul(PENALTY_PER_INCOMPATIBLE_PAIR));

        let warnings = self.warnings(&resolved, &profile, &pairs);
        let recommendations = self.recommendations(&resolved, &profile, compatibility, &pairs);

        debug!(
            components = resolved.len(),
            %compatibility,
            score,
            warnings = warnings.len(),
            "analyzed composition"
        );

        Ok(MixAnalysis {
            total_percentage: (composition.total() * 100.0).round() / 100.0,
            estimated_profile: profile.rounded(),
            compatibility,
            score,
            warnings,
            recommendations,
            incompatible_pairs: pairs
                .incompatible
                .iter()
                .map(|&(a, b)| (resolved[a].0.id.clone(), resolved[b].0.id.clone()))
                .collect(),
            hash: CompositionHash::of(composition),
        })
    }

    fn pair_report(&self, resolved: &[(&Liquid, f64)]) -> PairReport {
        let mut report = PairReport::default();
        for i in 0..resolved.len() {
            for j in i + 1..resolved.len() {
                report.total += 1;
                match self
                    .matrix
                    .relation(resolved[i].0.primary_flavor, resolved[j].0.primary_flavor)
                {
                    PairRelation::Incompatible => report.incompatible.push((i, j)),
                    PairRelation::Neutral => report.neutral += 1,
                    PairRelation::Same | PairRelation::Compatible => {}
                }
            }
        }
        report
    }

    fn warnings(
        &self,
        resolved: &[(&Liquid, f64)],
        profile: &FlavorProfile,
        pairs: &PairReport,
    ) -> Vec<String> {
        let mut out = Vec::new();

        if profile.intensity > INTENSITY_WARN {
            out.push(format!(
                "Intensity {:.1}/10: mix may be overpowering",
                profile.intensity
            ));
        }
        for &(a, b) in &pairs.incompatible {
            let (la, lb) = (resolved[a].0, resolved[b].0);
            out.push(format!(
                "Incompatible pair: {} [{}] ({}) + {} [{}] ({})",
                la.name, la.id, la.primary_flavor, lb.name, lb.id, lb.primary_flavor
            ));
        }
        if resolved.len() > self.max_components {
            out.push(format!(
                "{} components exceed the recommended maximum of {}",
                resolved.len(),
                self.max_components
            ));
        }
        if profile.menthol_level > MENTHOL_WARN {
            out.push(format!(
                "Menthol {:.1}/10: very strong cooling effect",
                profile.menthol_level
            ));
        }
        if profile.sweetness > SWEETNESS_WARN {
            out.push(format!(
                "Sweetness {:.1}/10: very sweet, may mute other notes",
                profile.sweetness
            ));
        }

        let vg = resolved.iter().map(|(l, _)| l.vg_ratio);
        if let (Some(min), Some(max)) = (vg.clone().min(), vg.max())
            && max - min > VG_SPREAD_WARN
        {
            out.push(format!(
                "Base ratios differ by {} VG points; components may not blend evenly",
                max - min
            ));
        }

        for (liquid, _) in resolved {
            if !liquid.in_stock() {
                out.push(format!("{} [{}] is currently out of stock", liquid.name, liquid.id));
            }
        }
        out
    }

    fn recommendations(
        &self,
        resolved: &[(&Liquid, f64)],
        profile: &FlavorProfile,
        tier: CompatibilityTier,
        pairs: &PairReport,
    ) -> Vec<String> {
        let mut out = Vec::new();

        if profile.sweetness < 3.0
            && let Some((dessert, _)) = first_max_by_key(
                resolved
                    .iter()
                    .filter(|(l, _)| l.primary_flavor == Flavor::Dessert),
                |(l, _)| l.sweetness,
            )
        {
            out.push(format!(
                "Increase the share of {} to lift sweetness ({:.1}/10)",
                dessert.name, profile.sweetness
            ));
        }

        if profile.menthol_level > 7.0
            && let Some((cooling, _)) = first_max_by_key(resolved.iter(), |(l, _)| l.menthol_level)
        {
            out.push(format!(
                "Reduce the share of {} to soften the cooling ({:.1}/10)",
                cooling.name, profile.menthol_level
            ));
        }

        if profile.intensity < 3.0 {
            out.push("Add a bolder liquid; the blend may taste muted".to_string());
        }

        if let [(only, _)] = resolved
            && profile.complexity < 4.0
        {
            let companions: Vec<&str> = self
                .matrix
                .entry(only.primary_flavor)
                .compatible
                .iter()
                .map(|f| f.label())
                .collect();
            if companions.is_empty() {
                out.push("Add a second liquid to build more depth".to_string());
            } else {
                out.push(format!(
                    "Add a {} liquid to build more depth",
                    companions.join(" or ")
                ));
            }
        }

        if matches!(tier, CompatibilityTier::Fair | CompatibilityTier::Poor) {
            let mut clashes = vec![0usize; resolved.len()];
            for &(a, b) in &pairs.incompatible {
                clashes[a] += 1;
                clashes[b] += 1;
            }
            if let Some((idx, count)) =
                first_max_by_key(clashes.iter().copied().enumerate(), |(_, c)| *c)
                && count > 0
            {
                out.push(format!(
                    "Replace {}; it clashes with {count} other component(s)",
                    resolved[idx].0.name
                ));
            }
        }

        if out.is_empty() {
            out.push("Mix is well balanced; no changes needed".to_string());
        }
        out
    }
}

fn tier(pairs: &PairReport) -> CompatibilityTier {
    if pairs.incompatible.is_empty() {
        if pairs.neutral == 0 {
            CompatibilityTier::Excellent
        } else {
            CompatibilityTier::Good
        }
    } else if pairs.incompatible.len() * 2 < pairs.total {
        CompatibilityTier::Fair
    } else {
        CompatibilityTier::Poor
    }
}

// `Iterator::max_by_key` keeps the last maximum; ties here go to the first.
fn first_max_by_key<T, K: Ord>(iter: impl Iterator<Item = T>, key: impl Fn(&T) -> K) -> Option<T> {
    let mut best: Option<(K, T)> = None;
    for item in iter {
        let k = key(&item);
        if best.as_ref().is_none_or(|(bk, _)| k > *bk) {
            best = Some((k, item));
        }
    }
    best.map(|(_, item)| item)
}
