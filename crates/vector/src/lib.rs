//! DateDine Vector Matching Engine
//!
//! Nearest-neighbor search over restaurant description embeddings and the
//! [`MatchingEngine`] that ties catalog, encoder and index together.

mod distance;
mod engine;
mod index;
mod ranker;
mod types;

pub use engine::{EngineStats, MatchingEngine};
pub use index::{FlatL2Index, SimilarityIndex};
pub use ranker::{rank_neighbors, to_recommendations};
pub use types::{Match, Neighbor, QueryResult};
