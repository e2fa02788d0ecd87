use datedine_catalog::Recommendation;

use crate::types::{Neighbor, QueryResult};

/// Order hits by ascending distance (lower position first on ties) and keep
/// at most `k`.
pub fn rank_neighbors(mut neighbors: Vec<Neighbor>, k: usize) -> Vec<Neighbor> {
    neighbors.sort_by(|a, b| a.cmp_rank(b));
    neighbors.truncate(k);
    neighbors
}

/// Presentation records with 1-based ranks, in result order
pub fn to_recommendations(result: &QueryResult<'_>) -> Vec<Recommendation> {
    result
        .matches
        .iter()
        .enumerate()
        .map(|(i, m)| m.record.to_recommendation(i + 1, m.distance))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Match;
    use datedine_catalog::{Rating, RecommendationSource, RestaurantRecord};

    fn record(id: usize, name: &str) -> RestaurantRecord {
        RestaurantRecord {
            id,
            name: name.to_string(),
            description: format!("{} description", name),
            address: String::new(),
            rating: Rating::Unknown,
        }
    }

    #[test]
    fn test_rank_neighbors_sorts_and_truncates() {
        let ranked = rank_neighbors(
            vec![
                Neighbor::new(0, 3.0),
                Neighbor::new(2, 1.0),
                Neighbor::new(1, 1.0),
                Neighbor::new(3, 0.5),
            ],
            3,
        );

        let positions: Vec<usize> = ranked.iter().map(|n| n.position).collect();
        assert_eq!(positions, vec![3, 1, 2]);
    }

    #[test]
    fn test_rank_neighbors_short_input() {
        let ranked = rank_neighbors(vec![Neighbor::new(0, 1.0)], 5);
        assert_eq!(ranked.len(), 1);
    }

    #[test]
    fn test_to_recommendations_assigns_ranks() {
        let roma = record(0, "Cafe Roma");
        let wok = record(1, "Dragon Wok");
        let result = QueryResult {
            query: "romantic".to_string(),
            k: 2,
            matches: vec![
                Match { record: &wok, distance: 0.5 },
                Match { record: &roma, distance: 2.0 },
            ],
        };

        let recs = to_recommendations(&result);
        assert_eq!(recs.len(), 2);
        assert_eq!(recs[0].rank, 1);
        assert_eq!(recs[0].name, "Dragon Wok");
        assert_eq!(recs[1].rank, 2);
        assert_eq!(recs[1].distance, Some(2.0));
        assert!(recs.iter().all(|r| r.source == RecommendationSource::Catalog));
    }
}
