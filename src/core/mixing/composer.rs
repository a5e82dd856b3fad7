use crate::config::MixingConfig;
use crate::error::ValidationError;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::debug;

use super::hash::CompositionHash;
use super::matrix::CompatibilityMatrix;
use super::types::{
    Component, Composition, Difficulty, Flavor, FlavorProfile, Liquid, MixSuggestion, TasteTarget,
};

/// Share of each percentage that comes from the plain equal split; the rest
/// follows closeness to the target.
const EQUAL_SPLIT_WEIGHT: f64 = 0.5;

/// Bounded combination search over the in-stock catalog.
#[derive(Debug, Clone)]
pub struct MixComposer {
    matrix: Arc<CompatibilityMatrix>,
    max_suggestions: usize,
    candidate_pool: usize,
}

struct Scored<'a> {
    members: Vec<&'a Liquid>,
    percentages: Vec<u32>,
    profile: FlavorProfile,
    distance: f64,
}

impl MixComposer {
    pub fn new(matrix: Arc<CompatibilityMatrix>, config: &MixingConfig) -> Self {
        Self {
            matrix,
            max_suggestions: config.max_suggestions.max(1),
            candidate_pool: config.candidate_pool.max(1),
        }
    }

    /// Ranked suggestions approximating `target`. An empty list means nothing
    /// in stock fits; it is not an error.
    pub fn suggest(
        &self,
        target: &TasteTarget,
        catalog: &[Liquid],
    ) -> Result<Vec<MixSuggestion>, ValidationError> {
        target.validate()?;

        let pool = self.candidate_pool(target, catalog);
        if pool.is_empty() {
            debug!(
                flavor = %target.desired_flavor,
                "no in-stock candidates for target"
            );
            return Ok(Vec::new());
        }

        let max_size = usize::from(target.max_liquids).min(pool.len());
        let mut scored = Vec::new();
        let mut examined = 0usize;
        for size in 1..=max_size {
            for_each_combination(pool.len(), size, |indices| {
                examined += 1;
                let members: Vec<&Liquid> = indices.iter().map(|&i| pool[i]).collect();
                if let Some(candidate) = self.score_members(target, members) {
                    scored.push(candidate);
                }
            });
        }

        // Pool is sorted by id, so member lists are already in id order.
        scored.sort_by(|a, b| {
            a.distance.total_cmp(&b.distance).then_with(|| {
                a.members
                    .iter()
                    .map(|l| l.id.as_str())
                    .cmp(b.members.iter().map(|l| l.id.as_str()))
            })
        });
        scored.truncate(self.max_suggestions);

        debug!(
            flavor = %target.desired_flavor,
            pool = pool.len(),
            examined,
            returned = scored.len(),
            "composed mix suggestions"
        );

        Ok(scored
            .into_iter()
            .map(|s| self.build_suggestion(target.desired_flavor, s))
            .collect())
    }

    /// In-stock liquids the search may combine, at most `candidate_pool` of
    /// them unless the reserved complements need more room.
    ///
    /// Selection order:
    /// 1. The closest desired-flavor liquid.
    /// 2. On each axis, the closest liquid above the target and the closest below it.
    /// 3. Desired-flavor liquids by closeness, up to half the pool.
    /// 4. Anything else by closeness.
    fn candidate_pool<'a>(&self, target: &TasteTarget, catalog: &'a [Liquid]) -> Vec<&'a Liquid> {
        let allowed = self.matrix.candidate_flavors(target.desired_flavor);
        let mut seen = HashSet::new();
        let mut eligible: Vec<&Liquid> = catalog
            .iter()
            .filter(|l| l.in_stock() && allowed.contains(&l.primary_flavor))
            .filter(|&l| seen.insert(l.id.as_str()))
            .collect();
        eligible.sort_by(|a, b| {
            individual_distance(a, target)
                .total_cmp(&individual_distance(b, target))
                .then_with(|| a.id.cmp(&b.id))
        });

        let is_lead = |l: &Liquid| l.primary_flavor == target.desired_flavor;
        let Some(closest_lead) = eligible.iter().copied().find(|l| is_lead(l)) else {
            return Vec::new();
        };

        let mut picked: Vec<&Liquid> = vec![closest_lead];
        for axis in Axis::ALL {
            let wanted = axis.of_target(target);
            let above = eligible.iter().copied().find(|l| axis.of_liquid(l) > wanted);
            let below = eligible.iter().copied().find(|l| axis.of_liquid(l) < wanted);
            for liquid in above.into_iter().chain(below) {
                push_unique(&mut picked, liquid);
            }
        }

        let limit = self.candidate_pool.max(picked.len());
        let lead_slots = limit.div_ceil(2);
        for liquid in eligible.iter().copied().filter(|l| is_lead(l)) {
            let leads = picked.iter().filter(|l| is_lead(l)).count();
            if picked.len() >= limit || leads >= lead_slots {
                break;
            }
            push_unique(&mut picked, liquid);
        }
        for liquid in eligible.iter().copied() {
            if picked.len() >= limit {
                break;
            }
            push_unique(&mut picked, liquid);
        }

        picked.sort_by(|a, b| a.id.cmp(&b.id));
        picked
    }

    fn score_members<'a>(&self, target: &TasteTarget, members: Vec<&'a Liquid>) -> Option<Scored<'a>> {
        if !members
            .iter()
            .any(|l| l.primary_flavor == target.desired_flavor)
        {
            return None;
        }
        for (i, a) in members.iter().enumerate() {
            for b in &members[i + 1..] {
                if self.matrix.is_incompatible(a.primary_flavor, b.primary_flavor) {
                    return None;
                }
            }
        }

        let percentages = assign_percentages(target, &members);
        let profile = FlavorProfile::blend(
            members
                .iter()
                .copied()
                .zip(percentages.iter().map(|p| f64::from(*p))),
        );
        let distance = profile.distance_to(target);
        Some(Scored {
            members,
            percentages,
            profile,
            distance,
        })
    }

    fn build_suggestion(&self, desired: Flavor, scored: Scored<'_>) -> MixSuggestion {
        let composition: Composition = scored
            .members
            .iter()
            .zip(&scored.percentages)
            .map(|(liquid, pct)| Component::new(liquid.id.clone(), f64::from(*pct)))
            .collect();
        let estimated_price = scored
            .members
            .iter()
            .zip(&scored.percentages)
            .map(|(liquid, pct)| liquid.price * f64::from(*pct) / 100.0)
            .sum::<f64>();

        MixSuggestion {
            name: suggestion_name(desired, &scored.members, &scored.percentages),
            hash: CompositionHash::of(&composition),
            composition,
            estimated_profile: scored.profile.rounded(),
            difficulty: self.difficulty(&scored.members),
            distance: scored.distance,
            match_score: 1.0 / (1.0 + scored.distance),
            estimated_price: (estimated_price * 100.0).round() / 100.0,
        }
    }

    fn difficulty(&self, members: &[&Liquid]) -> Difficulty {
        let Some(first) = members.first() else {
            return Difficulty::Easy;
        };
        if members
            .iter()
            .all(|l| l.primary_flavor == first.primary_flavor)
        {
            return Difficulty::Easy;
        }
        let all_compatible = members.iter().enumerate().all(|(i, a)| {
            members[i + 1..].iter().all(|b| {
                self.matrix.relation(a.primary_flavor, b.primary_flavor).is_harmonious()
            })
        });
        if all_compatible {
            Difficulty::Medium
        } else {
            Difficulty::Hard
        }
    }
}

fn push_unique<'a>(picked: &mut Vec<&'a Liquid>, liquid: &'a Liquid) {
    if !picked.iter().any(|p| p.id == liquid.id) {
        picked.push(liquid);
    }
}

/// Target dimensions the search tries to straddle.
#[derive(Debug, Clone, Copy)]
enum Axis {
    Menthol,
    Sweetness,
    Complexity,
}

impl Axis {
    const ALL: [Axis; 3] = [Axis::Menthol, Axis::Sweetness, Axis::Complexity];

    fn of_liquid(self, liquid: &Liquid) -> u16 {
        u16::from(match self {
            Self::Menthol => liquid.menthol_level,
            Self::Sweetness => liquid.sweetness,
            Self::Complexity => liquid.complexity,
        })
    }

    fn of_target(self, target: &TasteTarget) -> u16 {
        match self {
            Self::Menthol => target.menthol_level,
            Self::Sweetness => target.sweetness,
            Self::Complexity => target.complexity,
        }
    }
}

fn individual_distance(liquid: &Liquid, target: &TasteTarget) -> f64 {
    FlavorProfile::blend([(liquid, 1.0)]).distance_to(target)
}

fn closeness_gap(liquid: &Liquid, target: &TasteTarget) -> f64 {
    f64::from(u16::from(liquid.menthol_level).abs_diff(target.menthol_level))
        + f64::from(u16::from(liquid.sweetness).abs_diff(target.sweetness))
}

/// Whole-number shares summing to exactly 100, members in the given order.
/// Each share blends an equal split with a bias toward liquids whose menthol
/// and sweetness sit closer to the target; the last member absorbs rounding.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
pub(crate) fn assign_percentages(target: &TasteTarget, members: &[&Liquid]) -> Vec<u32> {
    let k = members.len();
    if k == 0 {
        return Vec::new();
    }

    let weights: Vec<f64> = members
        .iter()
        .map(|l| 1.0 / (1.0 + closeness_gap(l, target)))
        .collect();
    let total_weight: f64 = weights.iter().sum();
    let equal = 1.0 / k as f64;

    let mut out = Vec::with_capacity(k);
    let mut assigned = 0u32;
    for (i, weight) in weights.iter().enumerate() {
        if i + 1 == k {
            out.push(100u32.saturating_sub(assigned));
        } else {
            let share = EQUAL_SPLIT_WEIGHT * equal + (1.0 - EQUAL_SPLIT_WEIGHT) * (weight / total_weight);
            let pct = (share * 100.0).floor() as u32;
            assigned += pct;
            out.push(pct);
        }
    }
    out
}

fn suggestion_name(desired: Flavor, members: &[&Liquid], percentages: &[u32]) -> String {
    let ensemble = match members.len() {
        1 => "Solo",
        2 => "Duo",
        3 => "Trio",
        4 => "Quartet",
        _ => "Quintet",
    };
    let lead = members
        .iter()
        .zip(percentages)
        .max_by(|(a, pa), (b, pb)| pa.cmp(pb).then_with(|| b.id.cmp(&a.id)))
        .map(|(l, _)| l.name.as_str())
        .unwrap_or_default();
    format!("{} {} {ensemble} ({lead})", desired.icon(), desired.label())
}

/// Calls `visit` with every k-subset of `0..n` in lexicographic order.
fn for_each_combination(n: usize, k: usize, mut visit: impl FnMut(&[usize])) {
    if k == 0 || k > n {
        return;
    }
    let mut idx: Vec<usize> = (0..k).collect();
    loop {
        visit(&idx);
        let Some(i) = (0..k).rev().find(|&i| idx[i] != i + n - k) else {
            return;
        };
        idx[i] += 1;
        for j in i + 1..k {
            idx[j] = idx[j - 1] + 1;
        }
    }
}
