use datedine_common::{DateDineError, Result};
use datedine_encoder::EmbeddingVector;
use ndarray::{Array2, ArrayView1};
use tracing::debug;

use crate::distance::squared_l2;
use crate::types::Neighbor;

/// Nearest-neighbor index over catalog embeddings
///
/// Built once from the full catalog; never updated in place.
pub trait SimilarityIndex: Send + Sync {
    /// Number of indexed vectors
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Vector dimensionality shared by every entry
    fn dimension(&self) -> usize;

    /// Up to `k` nearest entries, ascending by distance, ties by position.
    /// `k` larger than the index returns every entry.
    fn search(&self, query: &[f32], k: usize) -> Result<Vec<Neighbor>>;
}

/// Brute-force L2 index: one row per catalog entry, scanned on every query
#[derive(Debug, Clone)]
pub struct FlatL2Index {
    vectors: Array2<f32>,
}

impl FlatL2Index {
    /// Build from all catalog vectors at once
    pub fn build(vectors: &[EmbeddingVector]) -> Result<Self> {
        let first = vectors.first().ok_or_else(|| {
            DateDineError::invalid_input("cannot build an index from zero vectors")
        })?;

        let dimension = first.len();
        if dimension == 0 {
            return Err(DateDineError::invalid_input(
                "cannot build an index from zero-length vectors",
            ));
        }

        let mut flat = Vec::with_capacity(vectors.len() * dimension);
        for (position, vector) in vectors.iter().enumerate() {
            if vector.len() != dimension {
                return Err(DateDineError::dimension_mismatch(dimension, vector.len()));
            }
            ensure_finite(vector, &format!("vector {}", position))?;
            flat.extend_from_slice(vector);
        }

        let vectors = Array2::from_shape_vec((vectors.len(), dimension), flat)
            .map_err(|e| DateDineError::internal_consistency(format!("index shape: {}", e)))?;

        debug!(
            "Flat L2 index built - {} vectors x {} dims",
            vectors.nrows(),
            vectors.ncols()
        );
        Ok(Self { vectors })
    }
}

impl SimilarityIndex for FlatL2Index {
    fn len(&self) -> usize {
        self.vectors.nrows()
    }

    fn dimension(&self) -> usize {
        self.vectors.ncols()
    }

    fn search(&self, query: &[f32], k: usize) -> Result<Vec<Neighbor>> {
        if k == 0 {
            return Err(DateDineError::invalid_input("k must be at least 1"));
        }
        if query.len() != self.dimension() {
            return Err(DateDineError::dimension_mismatch(self.dimension(), query.len()));
        }
        ensure_finite(query, "query vector")?;

        let query = ArrayView1::from(query);
        let mut neighbors: Vec<Neighbor> = self
            .vectors
            .outer_iter()
            .enumerate()
            .map(|(position, row)| Neighbor::new(position, squared_l2(row, query)))
            .collect();

        if k < neighbors.len() {
            neighbors.select_nth_unstable_by(k - 1, |a, b| a.cmp_rank(b));
            neighbors.truncate(k);
        }
        neighbors.sort_by(|a, b| a.cmp_rank(b));

        Ok(neighbors)
    }
}

/// NaN would sort ahead of every real distance
fn ensure_finite(vector: &[f32], what: &str) -> Result<()> {
    match vector.iter().position(|v| !v.is_finite()) {
        Some(component) => Err(DateDineError::invalid_input(format!(
            "{} has a non-finite component at {}",
            what, component
        ))),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_index() -> FlatL2Index {
        FlatL2Index::build(&[
            vec![0.0, 0.0],
            vec![5.0, 5.0],
            vec![1.0, 0.0],
            vec![0.0, 1.0],
        ])
        .unwrap()
    }

    fn positions(neighbors: &[Neighbor]) -> Vec<usize> {
        neighbors.iter().map(|n| n.position).collect()
    }

    #[test]
    fn test_build_shape() {
        let index = sample_index();
        assert_eq!(index.len(), 4);
        assert_eq!(index.dimension(), 2);
        assert!(!index.is_empty());
    }

    #[test]
    fn test_build_rejects_mixed_dimensions() {
        let err = FlatL2Index::build(&[vec![0.0, 0.0], vec![1.0, 2.0, 3.0]]).unwrap_err();
        assert!(matches!(
            err,
            DateDineError::DimensionMismatch { expected: 2, actual: 3 }
        ));
    }

    #[test]
    fn test_build_rejects_empty() {
        assert!(matches!(
            FlatL2Index::build(&[]),
            Err(DateDineError::InvalidInput(_))
        ));
        assert!(matches!(
            FlatL2Index::build(&[vec![]]),
            Err(DateDineError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_search_nearest_first() {
        let results = sample_index().search(&[0.9, 0.0], 2).unwrap();
        assert_eq!(positions(&results), vec![2, 0]);
        assert!(results[0].distance <= results[1].distance);
    }

    #[test]
    fn test_search_ties_broken_by_position() {
        // [0,0], [1,0] and [0,1] are all 0.5 away from the query
        let results = sample_index().search(&[0.5, 0.5], 4).unwrap();
        assert_eq!(positions(&results), vec![0, 2, 3, 1]);
    }

    #[test]
    fn test_search_k_larger_than_index_returns_all() {
        let results = sample_index().search(&[5.0, 4.0], 10).unwrap();
        assert_eq!(results.len(), 4);
        assert_eq!(results[0].position, 1);
        assert!(results.windows(2).all(|w| w[0].distance <= w[1].distance));
    }

    #[test]
    fn test_search_rejects_zero_k() {
        assert!(matches!(
            sample_index().search(&[0.0, 0.0], 0),
            Err(DateDineError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_search_rejects_wrong_dimension() {
        assert!(matches!(
            sample_index().search(&[0.0, 0.0, 0.0], 1),
            Err(DateDineError::DimensionMismatch { expected: 2, actual: 3 })
        ));
    }

    #[test]
    fn test_search_distances_are_squared_l2() {
        let results = sample_index().search(&[0.0, 0.0], 2).unwrap();
        assert_eq!(results[0].distance, 0.0);
        assert_eq!(results[1].distance, 1.0);
    }

    #[test]
    fn test_build_rejects_non_finite() {
        for bad in [f32::NAN, -f32::NAN, f32::INFINITY, f32::NEG_INFINITY] {
            let result = FlatL2Index::build(&[vec![0.0, 0.0], vec![1.0, bad]]);
            assert!(matches!(result, Err(DateDineError::InvalidInput(_))));
        }
    }

    #[test]
    fn test_search_rejects_non_finite_query() {
        let index = sample_index();
        for bad in [f32::NAN, -f32::NAN, f32::INFINITY] {
            assert!(matches!(
                index.search(&[bad, 0.0], 1),
                Err(DateDineError::InvalidInput(_))
            ));
        }
    }
}
