use actix_web::{get, web, HttpResponse};

use crate::state::AppState;
use crate::types::{ApiError, MatchQuery, MatchResponse};

/// Restaurants whose descriptions best fit the vibe text
#[get("/matches")]
pub async fn find_matches(
    query: web::Query<MatchQuery>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    let k = query.k.unwrap_or(state.config.default_top_k);

    let result = state.engine.find_matches(&query.q, k).await?;
    let results = result.to_recommendations();

    Ok(HttpResponse::Ok().json(MatchResponse {
        query: result.query.clone(),
        count: results.len(),
        results,
    }))
}
