use datedine_common::AppConfig;
use datedine_places::PlacesClient;
use datedine_vector::MatchingEngine;
use std::sync::Arc;

/// Shared application state
///
/// The engine is built once before the server starts; handlers only read it.
pub struct AppState {
    /// Application configuration
    pub config: AppConfig,

    /// Catalog + encoder + index
    pub engine: Arc<MatchingEngine>,

    /// Place lookup collaborator
    pub places: PlacesClient,
}

impl AppState {
    pub fn new(config: AppConfig, engine: Arc<MatchingEngine>, places: PlacesClient) -> Self {
        Self {
            config,
            engine,
            places,
        }
    }
}
