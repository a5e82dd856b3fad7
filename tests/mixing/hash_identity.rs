use liquidmix::config::MixingConfig;
use liquidmix::core::mixing::{
    CompatibilityMatrix, Component, Composition, CompositionHash, Flavor, Liquid, MixComposer,
    MixEvaluator, TasteTarget, canonical_form,
};
use std::sync::Arc;

#[test]
fn analyzing_a_suggestion_rederives_its_hash() {
    let matrix = Arc::new(CompatibilityMatrix::default());
    let config = MixingConfig::default();
    let composer = MixComposer::new(Arc::clone(&matrix), &config);
    let evaluator = MixEvaluator::new(matrix, &config);

    let catalog = vec![
        Liquid::new("mango", "Mango Sun", Flavor::Fruit).with_profile(0, 7, 5, 4),
        Liquid::new("kiwi", "Kiwi Snap", Flavor::Fruit).with_profile(1, 5, 6, 5),
        Liquid::new("tea", "Iced Tea", Flavor::Beverage).with_profile(3, 4, 4, 5),
    ];
    let target = TasteTarget {
        desired_flavor: Flavor::Fruit,
        menthol_level: 2,
        sweetness: 6,
        complexity: 5,
        max_liquids: 3,
    };

    for suggestion in composer.suggest(&target, &catalog).unwrap() {
        // Clients may send the components in any order.
        let mut reversed = suggestion.composition.components.clone();
        reversed.reverse();
        let analysis = evaluator
            .analyze(&Composition::new(reversed), &catalog)
            .unwrap();
        assert_eq!(analysis.hash, suggestion.hash);
    }
}

#[test]
fn independently_built_equal_blends_share_a_hash() {
    let a = Composition::new(vec![Component::new("x1", 33.4), Component::new("y2", 66.6)]);
    let b = Composition::new(vec![Component::new("y2", 67.0), Component::new("x1", 33.0)]);
    assert_eq!(canonical_form(&a), "x1:33;y2:67");
    assert_eq!(a.hash(), b.hash());
    assert_eq!(a.hash(), CompositionHash::parse(a.hash().as_str()).unwrap());
}
