use chrono::{DateTime, Utc};
use datedine_catalog::{load_catalog, RestaurantRecord};
use datedine_common::{AppConfig, DateDineError, Result};
use datedine_encoder::{build_encoder, TextEncoder};
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

use crate::index::{FlatL2Index, SimilarityIndex};
use crate::ranker::rank_neighbors;
use crate::types::{Match, QueryResult};

/// Snapshot of what the engine was built from
#[derive(Debug, Clone, Serialize)]
pub struct EngineStats {
    /// Number of indexed restaurants
    pub restaurants: usize,

    /// Embedding dimension
    pub dimension: usize,

    /// Encoder model identifier
    pub encoder_model: String,

    /// SHA-256 of the catalog file, when loaded from one
    pub catalog_digest: Option<String>,

    pub built_at: DateTime<Utc>,

    /// Time spent encoding the catalog and building the index
    pub build_millis: u64,
}

/// Restaurant matching engine
///
/// Owns the catalog, the encoder handle and the built index. Construct it
/// once per process and share it (`Arc<MatchingEngine>`); queries only read.
pub struct MatchingEngine {
    catalog: Vec<RestaurantRecord>,
    index: Box<dyn SimilarityIndex>,
    encoder: Arc<dyn TextEncoder>,
    stats: EngineStats,
}

impl MatchingEngine {
    /// Load the configured catalog, build the configured encoder and index
    pub async fn from_config(config: &AppConfig) -> Result<Self> {
        let loaded = load_catalog(&config.catalog_path)?;
        let encoder = build_encoder(config)?;

        let mut engine = Self::build(loaded.records, encoder).await?;
        engine.stats.catalog_digest = Some(loaded.digest);
        Ok(engine)
    }

    /// Encode every description in one batch and build a flat L2 index
    pub async fn build(
        catalog: Vec<RestaurantRecord>,
        encoder: Arc<dyn TextEncoder>,
    ) -> Result<Self> {
        let started = Instant::now();
        info!(
            "Building matching engine - {} restaurants, encoder={}",
            catalog.len(),
            encoder.model_name()
        );

        let descriptions: Vec<String> = catalog.iter().map(|r| r.description.clone()).collect();
        let vectors = encoder.encode_batch(&descriptions).await?;

        if vectors.len() != catalog.len() {
            return Err(DateDineError::internal_consistency(format!(
                "encoder returned {} vectors for {} restaurants",
                vectors.len(),
                catalog.len()
            )));
        }

        let index = FlatL2Index::build(&vectors)?;
        Self::with_index(catalog, encoder, Box::new(index), started)
    }

    /// Assemble an engine around an index built elsewhere
    pub fn from_parts(
        catalog: Vec<RestaurantRecord>,
        encoder: Arc<dyn TextEncoder>,
        index: Box<dyn SimilarityIndex>,
    ) -> Result<Self> {
        Self::with_index(catalog, encoder, index, Instant::now())
    }

    fn with_index(
        catalog: Vec<RestaurantRecord>,
        encoder: Arc<dyn TextEncoder>,
        index: Box<dyn SimilarityIndex>,
        started: Instant,
    ) -> Result<Self> {
        if index.len() != catalog.len() {
            return Err(DateDineError::internal_consistency(format!(
                "index holds {} vectors but catalog has {} restaurants",
                index.len(),
                catalog.len()
            )));
        }

        let stats = EngineStats {
            restaurants: catalog.len(),
            dimension: index.dimension(),
            encoder_model: encoder.model_name().to_string(),
            catalog_digest: None,
            built_at: Utc::now(),
            build_millis: started.elapsed().as_millis() as u64,
        };

        info!(
            "Matching engine ready - {} restaurants, {} dims, {} ms",
            stats.restaurants, stats.dimension, stats.build_millis
        );

        Ok(Self {
            catalog,
            index,
            encoder,
            stats,
        })
    }

    /// Find the `k` restaurants whose descriptions are closest to the vibe text
    ///
    /// Empty text fails with `InvalidInput` before the encoder or index are
    /// touched. `k` above the catalog size returns the whole catalog.
    pub async fn find_matches(&self, query_text: &str, k: usize) -> Result<QueryResult<'_>> {
        let query_text = query_text.trim();
        if query_text.is_empty() {
            return Err(DateDineError::invalid_input("query text cannot be empty"));
        }
        if k == 0 {
            return Err(DateDineError::invalid_input("k must be at least 1"));
        }

        debug!("Finding matches for: {} (k={})", query_text, k);

        let embedding = self.encoder.encode(query_text).await?;
        let neighbors = rank_neighbors(self.index.search(&embedding, k)?, k);

        let matches = neighbors
            .into_iter()
            .map(|neighbor| {
                self.catalog
                    .get(neighbor.position)
                    .map(|record| Match {
                        record,
                        distance: neighbor.distance,
                    })
                    .ok_or_else(|| {
                        DateDineError::internal_consistency(format!(
                            "index position {} has no catalog record ({} loaded)",
                            neighbor.position,
                            self.catalog.len()
                        ))
                    })
            })
            .collect::<Result<Vec<_>>>()?;

        info!(
            "Match query completed - {} results (k={}, catalog={})",
            matches.len(),
            k,
            self.catalog.len()
        );

        Ok(QueryResult {
            query: query_text.to_string(),
            k,
            matches,
        })
    }

    /// Loaded catalog in id order
    pub fn catalog(&self) -> &[RestaurantRecord] {
        &self.catalog
    }

    pub fn stats(&self) -> &EngineStats {
        &self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Neighbor;
    use async_trait::async_trait;
    use datedine_catalog::{load_catalog_from_reader, Rating};
    use datedine_encoder::{EmbeddingVector, HashEncoder};
    use std::io::Write;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const CATALOG: &str = "\
Name,Address,Description,Rating
Cafe Roma,12 Hill Rd,romantic rooftop Italian dining,4.5
Dragon Wok,8 Market St,lively Chinese bistro with music,4.1
";

    fn two_restaurants() -> Vec<RestaurantRecord> {
        load_catalog_from_reader(CATALOG.as_bytes()).unwrap()
    }

    fn record(id: usize, description: &str) -> RestaurantRecord {
        RestaurantRecord {
            id,
            name: format!("R{}", id),
            description: description.to_string(),
            address: String::new(),
            rating: Rating::Unknown,
        }
    }

    fn hash_encoder() -> Arc<dyn TextEncoder> {
        Arc::new(HashEncoder::new(384).unwrap())
    }

    /// Maps "x,y" descriptions straight to vectors and counts calls
    #[derive(Default)]
    struct CoordinateEncoder {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl TextEncoder for CoordinateEncoder {
        fn model_name(&self) -> &str {
            "coordinates"
        }

        async fn encode(&self, text: &str) -> Result<EmbeddingVector> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let text = datedine_encoder::validate_text(text)?;
            text.split(',')
                .map(|part| {
                    part.trim()
                        .parse::<f32>()
                        .map_err(|_| DateDineError::invalid_input(part.to_string()))
                })
                .collect()
        }
    }

    /// Index that reports hits past the end of the catalog
    struct RunawayIndex;

    impl SimilarityIndex for RunawayIndex {
        fn len(&self) -> usize {
            1
        }

        fn dimension(&self) -> usize {
            2
        }

        fn search(&self, _query: &[f32], _k: usize) -> Result<Vec<Neighbor>> {
            Ok(vec![Neighbor::new(0, 0.0), Neighbor::new(7, 1.0)])
        }
    }

    #[tokio::test]
    async fn test_romantic_query_finds_cafe_roma() {
        let engine = MatchingEngine::build(two_restaurants(), hash_encoder())
            .await
            .unwrap();

        let result = engine
            .find_matches("romantic rooftop with Italian food", 1)
            .await
            .unwrap();

        assert_eq!(result.names(), vec!["Cafe Roma"]);
    }

    #[tokio::test]
    async fn test_k_larger_than_catalog_returns_everything() {
        let engine = MatchingEngine::build(two_restaurants(), hash_encoder())
            .await
            .unwrap();

        let result = engine.find_matches("lively music", 5).await.unwrap();
        assert_eq!(result.len(), 2);
        assert_eq!(result.names()[0], "Dragon Wok");
        assert!(result.matches[0].distance <= result.matches[1].distance);
    }

    #[tokio::test]
    async fn test_empty_query_never_reaches_encoder() {
        let encoder = Arc::new(CoordinateEncoder::default());
        let catalog = vec![record(0, "0,0"), record(1, "1,1")];
        let engine = MatchingEngine::build(catalog, encoder.clone()).await.unwrap();
        let calls_after_build = encoder.calls.load(Ordering::SeqCst);

        for query in ["", "   ", "\n\t"] {
            let err = engine.find_matches(query, 3).await.unwrap_err();
            assert!(matches!(err, DateDineError::InvalidInput(_)));
        }
        assert_eq!(encoder.calls.load(Ordering::SeqCst), calls_after_build);
    }

    #[tokio::test]
    async fn test_zero_k_rejected() {
        let engine = MatchingEngine::build(two_restaurants(), hash_encoder())
            .await
            .unwrap();
        assert!(matches!(
            engine.find_matches("rooftop", 0).await,
            Err(DateDineError::InvalidInput(_))
        ));
    }

    #[tokio::test]
    async fn test_results_bounded_and_ordered() {
        let catalog: Vec<_> = (0..20)
            .map(|i| record(i, &format!("{},{}", i % 7, i / 3)))
            .collect();
        let engine = MatchingEngine::build(catalog, Arc::new(CoordinateEncoder::default()))
            .await
            .unwrap();

        for k in [1, 3, 8, 20, 50] {
            let result = engine.find_matches("3,2", k).await.unwrap();
            assert_eq!(result.len(), k.min(20));
            assert!(result
                .matches
                .windows(2)
                .all(|w| w[0].distance <= w[1].distance));
        }
    }

    #[tokio::test]
    async fn test_equal_distances_keep_catalog_order() {
        let catalog = vec![record(0, "1,0"), record(1, "0,1"), record(2, "-1,0")];
        let engine = MatchingEngine::build(catalog, Arc::new(CoordinateEncoder::default()))
            .await
            .unwrap();

        let result = engine.find_matches("0,0", 3).await.unwrap();
        assert_eq!(result.ids(), vec![0, 1, 2]);
    }

    #[tokio::test]
    async fn test_rebuild_gives_same_results() {
        let first = MatchingEngine::build(two_restaurants(), hash_encoder())
            .await
            .unwrap();
        let second = MatchingEngine::build(two_restaurants(), hash_encoder())
            .await
            .unwrap();

        let a = first.find_matches("quiet Italian dinner", 2).await.unwrap();
        let b = second.find_matches("quiet Italian dinner", 2).await.unwrap();
        assert_eq!(a.ids(), b.ids());
    }

    #[tokio::test]
    async fn test_query_dimension_mismatch_surfaces() {
        let catalog = vec![record(0, "0,0"), record(1, "1,1")];
        let engine = MatchingEngine::build(catalog, Arc::new(CoordinateEncoder::default()))
            .await
            .unwrap();

        let err = engine.find_matches("1,2,3", 1).await.unwrap_err();
        assert!(matches!(err, DateDineError::DimensionMismatch { .. }));
    }

    #[tokio::test]
    async fn test_catalog_with_mixed_dimensions_fails_build() {
        let catalog = vec![record(0, "0,0"), record(1, "1,1,1")];
        let result = MatchingEngine::build(catalog, Arc::new(CoordinateEncoder::default())).await;
        assert!(matches!(result, Err(DateDineError::DimensionMismatch { .. })));
    }

    #[tokio::test]
    async fn test_unresolvable_position_is_internal_error() {
        let engine = MatchingEngine::from_parts(
            vec![record(0, "0,0")],
            Arc::new(CoordinateEncoder::default()),
            Box::new(RunawayIndex),
        )
        .unwrap();

        let err = engine.find_matches("0,0", 2).await.unwrap_err();
        assert!(matches!(err, DateDineError::InternalConsistency(_)));
    }

    #[test]
    fn test_index_catalog_size_mismatch_rejected() {
        let result = MatchingEngine::from_parts(
            vec![record(0, "0,0"), record(1, "1,1")],
            Arc::new(CoordinateEncoder::default()),
            Box::new(RunawayIndex),
        );
        assert!(matches!(result, Err(DateDineError::InternalConsistency(_))));
    }

    #[tokio::test]
    async fn test_from_config_records_digest() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(CATALOG.as_bytes()).unwrap();

        let mut config = AppConfig::default();
        config.catalog_path = file.path().to_path_buf();

        let engine = MatchingEngine::from_config(&config).await.unwrap();
        let stats = engine.stats();
        assert_eq!(stats.restaurants, 2);
        assert_eq!(stats.dimension, 384);
        assert_eq!(stats.encoder_model, "feature-hash-384");
        assert_eq!(stats.catalog_digest.as_ref().map(|d| d.len()), Some(64));
        assert_eq!(engine.catalog().len(), 2);
    }

    #[tokio::test]
    async fn test_from_config_missing_catalog() {
        let mut config = AppConfig::default();
        config.catalog_path = "/no/such/catalog.csv".into();

        let result = MatchingEngine::from_config(&config).await;
        assert!(matches!(result, Err(DateDineError::CatalogLoad(_))));
    }

    #[tokio::test]
    async fn test_query_without_words_rejected() {
        let engine = MatchingEngine::build(two_restaurants(), hash_encoder())
            .await
            .unwrap();

        for query in ["!!!", "?", "with the"] {
            let err = engine.find_matches(query, 3).await.unwrap_err();
            assert!(matches!(err, DateDineError::InvalidInput(_)), "{}", query);
        }
    }

    #[tokio::test]
    async fn test_description_without_words_fails_build() {
        let catalog = vec![
            record(0, "romantic rooftop Italian dining"),
            record(1, "The"),
        ];
        let result = MatchingEngine::build(catalog, hash_encoder()).await;
        assert!(matches!(result, Err(DateDineError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_non_finite_embeddings_rejected() {
        let catalog = vec![record(0, "0,0"), record(1, "NaN,1")];
        let result = MatchingEngine::build(catalog, Arc::new(CoordinateEncoder::default())).await;
        assert!(matches!(result, Err(DateDineError::InvalidInput(_))));

        let catalog = vec![record(0, "0,0"), record(1, "1,1")];
        let engine = MatchingEngine::build(catalog, Arc::new(CoordinateEncoder::default()))
            .await
            .unwrap();
        let err = engine.find_matches("inf,0", 2).await.unwrap_err();
        assert!(matches!(err, DateDineError::InvalidInput(_)));
    }
}
