use datedine_common::{DateDineError, Result};
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::types::{parse_places_response, PlaceCandidate};

const TEXT_SEARCH_URL: &str = "https://maps.googleapis.com/maps/api/place/textsearch/json";

/// Search radius used when the caller gives none
pub const DEFAULT_RADIUS_METERS: u32 = 5_000;

/// Google Places text search client
///
/// Lookup is best effort: a missing key or any failure gives an empty list.
#[derive(Debug, Clone)]
pub struct PlacesClient {
    api_key: Option<String>,
    endpoint: String,
    client: Client,
}

impl PlacesClient {
    pub fn new(api_key: Option<String>) -> Result<Self> {
        Self::with_endpoint(api_key, TEXT_SEARCH_URL)
    }

    /// Client against a non-default endpoint (proxies, tests)
    pub fn with_endpoint(api_key: Option<String>, endpoint: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(20))
            .build()
            .map_err(|e| DateDineError::network(format!("Failed to create HTTP client: {}", e)))?;

        let api_key = api_key.filter(|key| !key.trim().is_empty());
        if api_key.is_none() {
            info!("Place lookup disabled: no API key configured");
        }

        Ok(Self {
            api_key,
            endpoint: endpoint.into(),
            client,
        })
    }

    pub fn is_enabled(&self) -> bool {
        self.api_key.is_some()
    }

    /// Restaurants matching `query` around a point
    pub async fn search_nearby(
        &self,
        lat: f64,
        lon: f64,
        radius_m: u32,
        query: &str,
    ) -> Vec<PlaceCandidate> {
        let Some(api_key) = self.api_key.as_deref() else {
            return Vec::new();
        };

        debug!(
            "Place lookup: query={}, location=({:.4}, {:.4}), radius={}m",
            query, lat, lon, radius_m
        );

        let location = format!("{},{}", lat, lon);
        let radius = radius_m.to_string();
        let params = [
            ("query", query),
            ("location", location.as_str()),
            ("radius", radius.as_str()),
            ("key", api_key),
        ];

        let response = match self.client.get(&self.endpoint).query(&params).send().await {
            Ok(response) => response,
            Err(e) => {
                warn!("Place lookup request failed: {}", e);
                return Vec::new();
            }
        };

        let body = match response.error_for_status() {
            Ok(response) => match response.text().await {
                Ok(body) => body,
                Err(e) => {
                    warn!("Place lookup response unreadable: {}", e);
                    return Vec::new();
                }
            },
            Err(e) => {
                warn!("Place lookup HTTP error: {}", e);
                return Vec::new();
            }
        };

        let places = parse_places_response(&body);
        info!("Place lookup returned {} candidates", places.len());
        places
    }
}
