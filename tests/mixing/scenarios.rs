use liquidmix::config::MixingConfig;
use liquidmix::core::mixing::{
    CompatibilityMatrix, CompatibilityTier, Component, Composition, Difficulty, Flavor, Liquid,
    MixComposer, MixEvaluator, TasteTarget,
};
use liquidmix::error::ValidationError;
use std::sync::Arc;

fn composer() -> MixComposer {
    MixComposer::new(
        Arc::new(CompatibilityMatrix::default()),
        &MixingConfig::default(),
    )
}

fn evaluator() -> MixEvaluator {
    MixEvaluator::new(
        Arc::new(CompatibilityMatrix::default()),
        &MixingConfig::default(),
    )
}

fn shop() -> Vec<Liquid> {
    vec![
        Liquid::new("berry", "Berry Burst", Flavor::Fruit).with_profile(0, 8, 6, 5),
        Liquid::new("melon", "Melon Mist", Flavor::Fruit).with_profile(1, 6, 4, 3),
        Liquid::new("frost", "Polar Frost", Flavor::Menthol).with_profile(9, 3, 8, 4),
        Liquid::new("custard", "Vanilla Custard", Flavor::Dessert).with_profile(0, 9, 6, 7),
        Liquid::new("latte", "Caramel Latte", Flavor::Beverage).with_profile(0, 6, 5, 6),
        Liquid::new("milk", "Sweet Milk", Flavor::Cream).with_profile(0, 7, 3, 4),
        Liquid::new("leaf", "Dark Leaf", Flavor::Tobacco).with_profile(0, 2, 9, 8),
        Liquid::new("clove", "Clove Ember", Flavor::Spice).with_profile(0, 3, 7, 8),
        Liquid::new("gone", "Sold Out Cherry", Flavor::Fruit)
            .with_profile(0, 7, 5, 5)
            .with_stock(0),
    ]
}

#[test]
fn fruit_menthol_pair_favours_the_sweeter_fruit() {
    let catalog = vec![
        Liquid::new("A", "Sweet Apple", Flavor::Fruit).with_profile(0, 8, 5, 5),
        Liquid::new("B", "Cool Mint", Flavor::Menthol).with_profile(9, 3, 5, 5),
    ];
    let target = TasteTarget {
        desired_flavor: Flavor::Fruit,
        menthol_level: 4,
        sweetness: 6,
        complexity: 5,
        max_liquids: 2,
    };

    let suggestions = composer().suggest(&target, &catalog).unwrap();
    let pair = suggestions
        .iter()
        .find(|s| s.composition.len() == 2)
        .expect("a two-liquid suggestion");

    let share = |id: &str| {
        pair.composition
            .iter()
            .find(|c| c.liquid_id == id)
            .map(|c| c.percentage)
            .unwrap()
    };
    assert!(share("A") > share("B"));
    assert!((share("A") - 53.0).abs() < f64::EPSILON);
    assert!((share("B") - 47.0).abs() < f64::EPSILON);
    assert!(matches!(
        pair.difficulty,
        Difficulty::Hard | Difficulty::Medium
    ));
}

#[test]
fn suggestions_sum_to_exactly_one_hundred_and_avoid_clashes() {
    let matrix = CompatibilityMatrix::default();
    let catalog = shop();

    for flavor in Flavor::PRIMARY {
        for max_liquids in 1..=5 {
            let target = TasteTarget {
                desired_flavor: flavor,
                menthol_level: 3,
                sweetness: 6,
                complexity: 5,
                max_liquids,
            };
            let suggestions = composer().suggest(&target, &catalog).unwrap();
            assert!(suggestions.len() <= MixingConfig::default().max_suggestions);

            for s in &suggestions {
                let total: f64 = s.composition.iter().map(|c| c.percentage).sum();
                assert!((total - 100.0).abs() < f64::EPSILON, "{} sums to {total}", s.name);
                assert!(s.composition.len() <= usize::from(max_liquids));

                let flavors: Vec<Flavor> = s
                    .composition
                    .iter()
                    .map(|c| catalog.iter().find(|l| l.id == c.liquid_id).unwrap())
                    .map(|l| l.primary_flavor)
                    .collect();
                assert!(flavors.contains(&flavor));
                for (i, a) in flavors.iter().enumerate() {
                    for b in &flavors[i + 1..] {
                        assert!(!matrix.is_incompatible(*a, *b), "{a} with {b}");
                    }
                }
                assert!(s.composition.iter().all(|c| c.liquid_id != "gone"));
            }

            for pair in suggestions.windows(2) {
                assert!(pair[0].distance <= pair[1].distance);
            }
        }
    }
}

#[test]
fn nothing_in_stock_is_not_an_error() {
    let catalog = vec![Liquid::new("x", "Gone", Flavor::Spice).with_stock(0)];
    let target = TasteTarget {
        desired_flavor: Flavor::Spice,
        menthol_level: 0,
        sweetness: 4,
        complexity: 5,
        max_liquids: 3,
    };
    assert!(composer().suggest(&target, &catalog).unwrap().is_empty());
}

#[test]
fn three_way_clash_is_poor_with_a_warning_per_pair() {
    let catalog = vec![
        Liquid::new("m", "Polar Frost", Flavor::Menthol).with_profile(9, 3, 8, 4),
        Liquid::new("t", "Dark Leaf", Flavor::Tobacco).with_profile(0, 2, 9, 8),
        Liquid::new("c", "Sweet Milk", Flavor::Cream).with_profile(0, 7, 3, 4),
    ];
    let composition = Composition::new(vec![
        Component::new("m", 34.0),
        Component::new("t", 33.0),
        Component::new("c", 33.0),
    ]);

    let analysis = evaluator().analyze(&composition, &catalog).unwrap();
    assert_eq!(analysis.compatibility, CompatibilityTier::Poor);
    assert_eq!(analysis.incompatible_pairs.len(), 3);
    assert_eq!(analysis.score, 25);

    for (a, b) in [("Polar Frost", "Dark Leaf"), ("Polar Frost", "Sweet Milk"), ("Dark Leaf", "Sweet Milk")] {
        assert!(
            analysis
                .warnings
                .iter()
                .any(|w| w.contains(a) && w.contains(b)),
            "no warning for {a} + {b}: {:?}",
            analysis.warnings
        );
    }
}

#[test]
fn totals_outside_tolerance_are_rejected() {
    let catalog = shop();
    let build = |first: f64| {
        Composition::new(vec![
            Component::new("berry", first),
            Component::new("custard", 40.0),
        ])
    };

    for first in [57.0, 63.0] {
        let err = evaluator().analyze(&build(first), &catalog).unwrap_err();
        assert!(matches!(err, ValidationError::PercentageSum { .. }));
    }
    assert!(evaluator().analyze(&build(60.05), &catalog).is_ok());
}

#[test]
fn single_compatible_blend_is_excellent() {
    let composition = Composition::new(vec![
        Component::new("berry", 70.0),
        Component::new("custard", 30.0),
    ]);
    let analysis = evaluator().analyze(&composition, &shop()).unwrap();
    assert_eq!(analysis.compatibility, CompatibilityTier::Excellent);
    assert_eq!(analysis.score, 100);
    assert!(analysis.incompatible_pairs.is_empty());
}

#[test]
fn large_catalog_still_finds_the_cooling_complement() {
    let mut catalog: Vec<Liquid> = (0..20u8)
        .map(|i| {
            let flavor = if i % 2 == 0 { Flavor::Fruit } else { Flavor::Dessert };
            Liquid::new(format!("sweet{i:02}"), format!("Sweet {i}"), flavor)
                .with_profile(0, 6 + i % 4, 5, 5)
        })
        .collect();
    catalog.push(Liquid::new("chill", "Cool Mint", Flavor::Menthol).with_profile(9, 3, 5, 5));
    assert!(catalog.len() > MixingConfig::default().candidate_pool);

    let target = TasteTarget {
        desired_flavor: Flavor::Fruit,
        menthol_level: 4,
        sweetness: 6,
        complexity: 5,
        max_liquids: 2,
    };
    let suggestions = composer().suggest(&target, &catalog).unwrap();
    let best = &suggestions[0];
    assert!(best.composition.iter().any(|c| c.liquid_id == "chill"));
    assert!(best.distance < 1.0, "distance {}", best.distance);
}
