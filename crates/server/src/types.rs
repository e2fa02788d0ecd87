use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use datedine_catalog::Recommendation;
use datedine_common::DateDineError;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{error, warn};

/// GET /matches query string
#[derive(Debug, Deserialize)]
pub struct MatchQuery {
    /// Vibe text
    #[serde(default)]
    pub q: String,

    /// Number of results (server default when absent)
    pub k: Option<usize>,
}

/// GET /places query string
#[derive(Debug, Deserialize)]
pub struct PlacesQuery {
    pub lat: f64,
    pub lon: f64,

    /// Search radius in meters
    pub radius: Option<u32>,

    #[serde(default)]
    pub q: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MatchResponse {
    pub query: String,
    pub count: usize,
    pub results: Vec<Recommendation>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PlacesResponse {
    /// False when no API key is configured
    pub enabled: bool,
    pub count: usize,
    pub results: Vec<Recommendation>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    pub kind: String,
}

/// Engine error rendered as a JSON HTTP response
#[derive(Debug)]
pub struct ApiError(pub DateDineError);

impl From<DateDineError> for ApiError {
    fn from(err: DateDineError) -> Self {
        Self(err)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.0.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    fn error_response(&self) -> HttpResponse {
        if self.0.is_user_error() {
            warn!("Rejected request: {}", self.0);
        } else {
            error!("Request failed: {}", self.0);
        }

        HttpResponse::build(self.status_code()).json(ErrorBody {
            error: self.0.to_string(),
            kind: self.0.kind().to_string(),
        })
    }
}
