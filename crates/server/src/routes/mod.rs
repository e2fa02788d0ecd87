mod matches;
mod places;
mod system;

use actix_web::{error::QueryPayloadError, web, HttpRequest};
use datedine_common::DateDineError;

use crate::types::ApiError;

/// Register every route
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::QueryConfig::default().error_handler(query_error))
        .service(system::health)
        .service(system::stats)
        .service(matches::find_matches)
        .service(places::nearby_places);
}

/// Malformed query strings get the same JSON error body as engine errors
fn query_error(err: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    ApiError(DateDineError::invalid_input(format!("invalid query string: {}", err))).into()
}
