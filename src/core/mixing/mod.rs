// Mixing engine: flavor compatibility, blend search, blend analysis and the
// composition hash that ties blends to their ratings.

pub mod composer;
pub mod engine;
pub mod evaluator;
pub mod hash;
pub mod matrix;
pub mod types;

pub use composer::MixComposer;
pub use engine::{DefaultMixEngine, MixEngine, RatedAnalysis, RatedSuggestion, create_mix_engine};
pub use evaluator::{LiquidLookup, MixEvaluator};
pub use hash::{CompositionHash, canonical_form};
pub use matrix::{CompatibilityMatrix, FlavorAffinities, PairRelation};
pub use types::*;
