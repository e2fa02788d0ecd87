use actix_web::{get, web, HttpResponse};
use datedine_common::DateDineError;
use datedine_places::DEFAULT_RADIUS_METERS;

use crate::state::AppState;
use crate::types::{ApiError, PlacesQuery, PlacesResponse};

/// Candidates from the place lookup service around a point
#[get("/places")]
pub async fn nearby_places(
    query: web::Query<PlacesQuery>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    if query.q.trim().is_empty() {
        return Err(DateDineError::invalid_input("query text cannot be empty").into());
    }

    let radius = query.radius.unwrap_or(DEFAULT_RADIUS_METERS);
    let places = state
        .places
        .search_nearby(query.lat, query.lon, radius, query.q.trim())
        .await;

    let results: Vec<_> = places
        .iter()
        .enumerate()
        .map(|(i, place)| place.to_recommendation(i + 1))
        .collect();

    Ok(HttpResponse::Ok().json(PlacesResponse {
        enabled: state.places.is_enabled(),
        count: results.len(),
        results,
    }))
}
