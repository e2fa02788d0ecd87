use datedine_catalog::{Recommendation, RestaurantRecord};
use serde::Serialize;
use std::cmp::Ordering;

/// One index hit: catalog position and its distance to the query
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Neighbor {
    /// Insertion position (equals the catalog row id)
    pub position: usize,

    /// Squared L2 distance, lower is more similar
    pub distance: f32,
}

impl Neighbor {
    pub fn new(position: usize, distance: f32) -> Self {
        Self { position, distance }
    }

    /// Ascending distance, lower position first on ties
    pub(crate) fn cmp_rank(&self, other: &Self) -> Ordering {
        self.distance
            .total_cmp(&other.distance)
            .then(self.position.cmp(&other.position))
    }
}

/// A catalog record matched to a query
#[derive(Debug, Clone, Serialize)]
pub struct Match<'a> {
    pub record: &'a RestaurantRecord,
    pub distance: f32,
}

/// Matches for one query, ascending by distance, at most k long
#[derive(Debug, Clone, Serialize)]
pub struct QueryResult<'a> {
    pub query: String,
    pub k: usize,
    pub matches: Vec<Match<'a>>,
}

impl<'a> QueryResult<'a> {
    pub fn len(&self) -> usize {
        self.matches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    /// Names in result order
    pub fn names(&self) -> Vec<&str> {
        self.matches.iter().map(|m| m.record.name.as_str()).collect()
    }

    /// Record ids in result order
    pub fn ids(&self) -> Vec<usize> {
        self.matches.iter().map(|m| m.record.id).collect()
    }

    pub fn to_recommendations(&self) -> Vec<Recommendation> {
        crate::ranker::to_recommendations(self)
    }
}
