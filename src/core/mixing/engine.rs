use crate::config::{Config, MixingConfig};
use crate::core::catalog::{CachedCatalog, CatalogSnapshot, create_catalog};
use crate::core::ledger::{RatedHash, RatingCounts, ReputationLedger, Vote, create_ledger};
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use tracing::info;

use super::composer::MixComposer;
use super::evaluator::MixEvaluator;
use super::hash::CompositionHash;
use super::matrix::CompatibilityMatrix;
use super::types::{Composition, MixAnalysis, MixSuggestion, TasteTarget};

/// A suggestion together with the current reputation of its blend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatedSuggestion {
    #[serde(flatten)]
    pub suggestion: MixSuggestion,
    pub rating: RatingCounts,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatedAnalysis {
    #[serde(flatten)]
    pub analysis: MixAnalysis,
    pub rating: RatingCounts,
}

/// Entry point for every caller: CLI, HTTP gateway and embedders.
pub trait MixEngine: Send + Sync {
    fn suggest<'a>(
        &'a self,
        target: &'a TasteTarget,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<RatedSuggestion>>> + Send + 'a>>;

    fn analyze<'a>(
        &'a self,
        composition: &'a Composition,
    ) -> Pin<Box<dyn Future<Output = Result<RatedAnalysis>> + Send + 'a>>;

    fn vote<'a>(
        &'a self,
        hash: &'a CompositionHash,
        vote: Vote,
    ) -> Pin<Box<dyn Future<Output = Result<RatingCounts>> + Send + 'a>>;

    fn ratings<'a>(
        &'a self,
        hash: &'a CompositionHash,
    ) -> Pin<Box<dyn Future<Output = Result<RatingCounts>> + Send + 'a>>;

    fn top_rated<'a>(
        &'a self,
        limit: usize,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<RatedHash>>> + Send + 'a>>;

    fn catalog<'a>(
        &'a self,
    ) -> Pin<Box<dyn Future<Output = Result<Arc<CatalogSnapshot>>> + Send + 'a>>;

    fn ledger_name(&self) -> &str;
}

pub struct DefaultMixEngine {
    pub(crate) catalog: CachedCatalog,
    pub(crate) composer: MixComposer,
    pub(crate) evaluator: MixEvaluator,
    pub(crate) ledger: Arc<dyn ReputationLedger>,
}

impl DefaultMixEngine {
    pub fn new(
        catalog: CachedCatalog,
        ledger: Arc<dyn ReputationLedger>,
        mixing: &MixingConfig,
    ) -> Self {
        Self::with_matrix(
            catalog,
            ledger,
            mixing,
            Arc::new(CompatibilityMatrix::default()),
        )
    }

    pub fn with_matrix(
        catalog: CachedCatalog,
        ledger: Arc<dyn ReputationLedger>,
        mixing: &MixingConfig,
        matrix: Arc<CompatibilityMatrix>,
    ) -> Self {
        Self {
            catalog,
            composer: MixComposer::new(Arc::clone(&matrix), mixing),
            evaluator: MixEvaluator::new(matrix, mixing),
            ledger,
        }
    }
}

impl MixEngine for DefaultMixEngine {
    fn suggest<'a>(
        &'a self,
        target: &'a TasteTarget,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<RatedSuggestion>>> + Send + 'a>> {
        Box::pin(async move {
            let snapshot = self.catalog.snapshot().await?;
            let suggestions = self.composer.suggest(target, snapshot.liquids())?;

            let hashes: Vec<CompositionHash> =
                suggestions.iter().map(|s| s.hash.clone()).collect();
            let counts = self.ledger.get_counts_many(&hashes).await?;

            Ok(suggestions
                .into_iter()
                .map(|suggestion| RatedSuggestion {
                    rating: counts.get(&suggestion.hash).copied().unwrap_or_default(),
                    suggestion,
                })
                .collect())
        })
    }

    fn analyze<'a>(
        &'a self,
        composition: &'a Composition,
    ) -> Pin<Box<dyn Future<Output = Result<RatedAnalysis>> + Send + 'a>> {
        Box::pin(async move {
            let snapshot = self.catalog.snapshot().await?;
            let analysis = self.evaluator.analyze(composition, snapshot.as_ref())?;
            let rating = self.ledger.get_counts(&analysis.hash).await?;
            Ok(RatedAnalysis { analysis, rating })
        })
    }

    fn vote<'a>(
        &'a self,
        hash: &'a CompositionHash,
        vote: Vote,
    ) -> Pin<Box<dyn Future<Output = Result<RatingCounts>> + Send + 'a>> {
        Box::pin(async move {
            let counts = self.ledger.record_vote(hash, vote).await?;
            info!(
                hash = hash.short(),
                %vote,
                likes = counts.likes,
                dislikes = counts.dislikes,
                "vote recorded"
            );
            Ok(counts)
        })
    }

    fn ratings<'a>(
        &'a self,
        hash: &'a CompositionHash,
    ) -> Pin<Box<dyn Future<Output = Result<RatingCounts>> + Send + 'a>> {
        Box::pin(async move { Ok(self.ledger.get_counts(hash).await?) })
    }

    fn top_rated<'a>(
        &'a self,
        limit: usize,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<RatedHash>>> + Send + 'a>> {
        Box::pin(async move { Ok(self.ledger.top_rated(limit).await?) })
    }

    fn catalog<'a>(
        &'a self,
    ) -> Pin<Box<dyn Future<Output = Result<Arc<CatalogSnapshot>>> + Send + 'a>> {
        Box::pin(async move { Ok(self.catalog.snapshot().await?) })
    }

    fn ledger_name(&self) -> &str {
        self.ledger.name()
    }
}

/// Creates a mix engine from configuration.
pub async fn create_mix_engine(config: &Config) -> anyhow::Result<Arc<dyn MixEngine>> {
    let catalog = create_catalog(&config.catalog)?;
    let ledger = create_ledger(&config.ledger, &config.workspace_dir).await?;
    info!(
        catalog = catalog.source_name(),
        ledger = ledger.name(),
        "mix engine ready"
    );
    Ok(Arc::new(DefaultMixEngine::new(
        catalog,
        ledger,
        &config.mixing,
    )))
}
