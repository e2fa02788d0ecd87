use datedine_catalog::{GeoPoint, Rating, Recommendation, RecommendationSource};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Text search response body (only the fields we read)
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct TextSearchResponse {
    pub status: String,

    #[serde(default)]
    pub error_message: Option<String>,

    #[serde(default)]
    pub results: Vec<PlaceResult>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct PlaceResult {
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub formatted_address: Option<String>,

    #[serde(default)]
    pub vicinity: Option<String>,

    #[serde(default)]
    pub rating: Option<f32>,

    #[serde(default)]
    pub geometry: Option<Geometry>,

    #[serde(default)]
    pub types: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct Geometry {
    pub location: LatLng,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

/// A restaurant suggested by the place lookup service
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlaceCandidate {
    pub name: String,
    pub address: String,
    pub rating: Rating,
    pub location: Option<GeoPoint>,

    /// Place types joined with ", " (e.g. "restaurant, bar")
    pub description: String,
}

impl PlaceCandidate {
    pub fn to_recommendation(&self, rank: usize) -> Recommendation {
        Recommendation {
            rank,
            name: self.name.clone(),
            description: self.description.clone(),
            address: self.address.clone(),
            rating: self.rating,
            source: RecommendationSource::PlaceLookup,
            distance: None,
            location: self.location,
        }
    }
}

impl From<PlaceResult> for PlaceCandidate {
    fn from(place: PlaceResult) -> Self {
        let address = place
            .formatted_address
            .filter(|a| !a.is_empty())
            .or(place.vicinity)
            .unwrap_or_default();

        Self {
            name: place
                .name
                .filter(|n| !n.is_empty())
                .unwrap_or_else(|| "Unknown".to_string()),
            address,
            rating: Rating::from(place.rating),
            location: place.geometry.map(|g| GeoPoint {
                lat: g.location.lat,
                lon: g.location.lng,
            }),
            description: place.types.join(", "),
        }
    }
}

/// Turn a text search response body into candidates
///
/// Any status other than `OK` / `ZERO_RESULTS`, or an unparseable body,
/// yields no candidates.
pub fn parse_places_response(body: &str) -> Vec<PlaceCandidate> {
    let response: TextSearchResponse = match serde_json::from_str(body) {
        Ok(response) => response,
        Err(e) => {
            warn!("Unparseable place lookup response: {}", e);
            return Vec::new();
        }
    };

    match response.status.as_str() {
        "OK" | "ZERO_RESULTS" => response.results.into_iter().map(PlaceCandidate::from).collect(),
        status => {
            warn!(
                "Place lookup returned status {}: {}",
                status,
                response.error_message.unwrap_or_default()
            );
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const OK_BODY: &str = r#"{
        "status": "OK",
        "results": [
            {
                "name": "Terrazza",
                "formatted_address": "1 Marine Dr, Mumbai",
                "rating": 4.6,
                "geometry": { "location": { "lat": 19.07, "lng": 72.87 } },
                "types": ["restaurant", "bar"]
            },
            {
                "vicinity": "Bandra West",
                "types": []
            }
        ]
    }"#;

    #[test]
    fn test_parse_ok_response() {
        let places = parse_places_response(OK_BODY);
        assert_eq!(places.len(), 2);

        assert_eq!(places[0].name, "Terrazza");
        assert_eq!(places[0].address, "1 Marine Dr, Mumbai");
        assert_eq!(places[0].rating, Rating::Known(4.6));
        assert_eq!(places[0].description, "restaurant, bar");
        assert_eq!(places[0].location, Some(GeoPoint { lat: 19.07, lon: 72.87 }));

        assert_eq!(places[1].name, "Unknown");
        assert_eq!(places[1].address, "Bandra West");
        assert_eq!(places[1].rating, Rating::Unknown);
        assert_eq!(places[1].location, None);
    }

    #[test]
    fn test_zero_results_is_empty() {
        assert!(parse_places_response(r#"{"status":"ZERO_RESULTS","results":[]}"#).is_empty());
    }

    #[test]
    fn test_error_status_is_empty() {
        let body = r#"{"status":"REQUEST_DENIED","error_message":"bad key","results":[]}"#;
        assert!(parse_places_response(body).is_empty());
    }

    #[test]
    fn test_garbage_is_empty() {
        assert!(parse_places_response("<html>").is_empty());
    }

    #[test]
    fn test_to_recommendation() {
        let rec = parse_places_response(OK_BODY)[0].to_recommendation(1);
        assert_eq!(rec.source, RecommendationSource::PlaceLookup);
        assert_eq!(rec.distance, None);
        assert!(rec.location.is_some());
    }
}
