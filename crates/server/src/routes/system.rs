use actix_web::{get, web, HttpResponse};

use crate::state::AppState;

/// Liveness probe
#[get("/health")]
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
}

/// What the engine was built from
#[get("/stats")]
pub async fn stats(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "engine": state.engine.stats(),
        "default_top_k": state.config.default_top_k,
        "place_lookup_enabled": state.places.is_enabled(),
    }))
}
