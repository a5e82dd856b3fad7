//! Name-based flavor heuristic for catalog records without a category.

use crate::core::mixing::Flavor;
use std::collections::BTreeSet;

// Multi-word names, matched before single words. Their tokens are consumed
// so "Ice Cream" never counts as "ice".
const PHRASES: &[(Flavor, &[&str])] = &[
    (Flavor::Beverage, &["iced tea", "ice tea", "iced coffee", "iced latte", "energy drink"]),
    (Flavor::Cream, &["ice cream", "whipped cream"]),
    (Flavor::Dessert, &["cotton candy", "bubble gum"]),
];

// Table order breaks ties between equally matched flavors.
const KEYWORDS: &[(Flavor, &[&str])] = &[
    (
        Flavor::Menthol,
        &[
            "menthol", "mint", "peppermint", "spearmint", "wintergreen", "ice", "iced", "icy",
            "cool", "cooling", "frost", "frosty", "frozen", "arctic", "polar", "glacier",
        ],
    ),
    (
        Flavor::Tobacco,
        &["tobacco", "cigar", "virginia", "burley", "havana", "cavendish", "leaf", "rye"],
    ),
    (
        Flavor::Dessert,
        &[
            "custard", "cake", "cupcake", "cookie", "pie", "pastry", "donut", "doughnut",
            "caramel", "vanilla", "cheesecake", "brownie", "pudding", "waffle", "biscuit",
            "candy",
        ],
    ),
    (
        Flavor::Cream,
        &["cream", "creamy", "milk", "yogurt", "yoghurt", "butter", "buttery", "latte"],
    ),
    (
        Flavor::Beverage,
        &["coffee", "espresso", "tea", "cola", "soda", "lemonade", "mojito", "energy", "chai"],
    ),
    (
        Flavor::Spice,
        &[
            "cinnamon", "clove", "ginger", "nutmeg", "pepper", "anise", "cardamom", "spice",
            "spiced", "spicy",
        ],
    ),
    (
        Flavor::Fruit,
        &[
            "fruit", "fruity", "berry", "strawberry", "blueberry", "raspberry", "blackberry",
            "apple", "mango", "peach", "grape", "lemon", "lime", "orange", "cherry", "melon",
            "watermelon", "pineapple", "banana", "kiwi", "passion", "citrus", "guava", "lychee",
        ],
    ),
];

/// Outcome of classifying one product name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub flavor: Flavor,
    /// Every keyword that matched, used as secondary tags.
    pub tags: BTreeSet<String>,
}

/// Picks the flavor with the most keyword hits; `Mixed` when nothing matches.
pub fn classify(name: &str) -> Classification {
    let lowered = name.to_lowercase();
    let tokens: Vec<&str> = lowered
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .collect();
    let mut consumed = vec![false; tokens.len()];

    let mut tags = BTreeSet::new();
    let mut hits: Vec<(Flavor, usize)> = Vec::new();
    let mut record = |flavor: Flavor, keyword: &str, hits: &mut Vec<(Flavor, usize)>| {
        if tags.insert(keyword.to_string()) {
            match hits.iter_mut().find(|(f, _)| *f == flavor) {
                Some((_, n)) => *n += 1,
                None => hits.push((flavor, 1)),
            }
        }
    };

    for (flavor, phrases) in PHRASES {
        for phrase in *phrases {
            let words: Vec<&str> = phrase.split(' ').collect();
            if words.len() > tokens.len() {
                continue;
            }
            for start in 0..=tokens.len() - words.len() {
                let window = start..start + words.len();
                if consumed[window.clone()].iter().any(|c| *c) {
                    continue;
                }
                if tokens[window.clone()]
                    .iter()
                    .zip(&words)
                    .all(|(token, word)| matches_word(token, word))
                {
                    consumed[window].iter_mut().for_each(|c| *c = true);
                    record(*flavor, phrase, &mut hits);
                }
            }
        }
    }

    for (flavor, keywords) in KEYWORDS {
        for keyword in *keywords {
            let found = tokens
                .iter()
                .zip(&consumed)
                .any(|(token, used)| !used && matches_word(token, keyword));
            if found {
                record(*flavor, keyword, &mut hits);
            }
        }
    }

    // Ties resolve to the flavor listed first in KEYWORDS.
    let rank = |flavor: Flavor| KEYWORDS.iter().position(|(f, _)| *f == flavor);
    let best = hits
        .iter()
        .max_by(|(fa, na), (fb, nb)| na.cmp(nb).then_with(|| rank(*fb).cmp(&rank(*fa))))
        .map(|(flavor, _)| *flavor);

    Classification {
        flavor: best.unwrap_or(Flavor::Mixed),
        tags,
    }
}

/// Whole-word match that also accepts the regular plural forms
/// (`grapes`, `peaches`, `berries`).
fn matches_word(token: &str, keyword: &str) -> bool {
    if token == keyword {
        return true;
    }
    let Some(suffix) = token.strip_prefix(keyword) else {
        return keyword
            .strip_suffix('y')
            .is_some_and(|stem| token.strip_prefix(stem) == Some("ies"));
    };
    matches!(suffix, "s" | "es")
}
