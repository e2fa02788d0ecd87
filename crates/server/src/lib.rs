//! DateDine HTTP Server
//!
//! Actix-web REST API over a prebuilt [`MatchingEngine`].

mod routes;
mod state;
mod types;

use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use datedine_common::{AppConfig, Result};
use datedine_places::PlacesClient;
use datedine_vector::MatchingEngine;
use std::sync::Arc;
use tracing::info;
use tracing_actix_web::TracingLogger;

pub use routes::configure;
pub use state::AppState;
pub use types::{ApiError, ErrorBody, MatchQuery, MatchResponse, PlacesQuery, PlacesResponse};

/// Serve the engine until the process is stopped
pub async fn start_server(config: AppConfig, engine: Arc<MatchingEngine>) -> Result<()> {
    let bind_address = config.server_bind_address();
    let places = PlacesClient::new(config.google_api_key.clone())?;
    let state = web::Data::new(AppState::new(config, engine, places));

    info!("HTTP server listening on http://{}", bind_address);

    HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .wrap(Cors::permissive())
            .app_data(state.clone())
            .configure(configure)
    })
    .bind(&bind_address)?
    .run()
    .await?;

    info!("HTTP server stopped");
    Ok(())
}
