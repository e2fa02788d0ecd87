use serde::{Deserialize, Serialize};
use std::fmt;

/// Restaurant rating, which many sources leave blank or mark "N/A"
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "Option<f32>", into = "Option<f32>")]
pub enum Rating {
    Known(f32),
    Unknown,
}

impl Rating {
    /// Parse a rating cell. Blank and the usual "not available" markers map to
    /// `Unknown`; anything else must be a finite number.
    pub fn parse(raw: &str) -> Result<Self, String> {
        let trimmed = raw.trim();
        match trimmed.to_lowercase().as_str() {
            "" | "n/a" | "na" | "-" | "unknown" => return Ok(Self::Unknown),
            _ => {}
        }

        match trimmed.parse::<f32>() {
            Ok(value) if value.is_finite() => Ok(Self::Known(value)),
            _ => Err(format!("invalid rating '{}'", trimmed)),
        }
    }

    pub fn value(&self) -> Option<f32> {
        match self {
            Self::Known(value) => Some(*value),
            Self::Unknown => None,
        }
    }

    pub fn is_known(&self) -> bool {
        matches!(self, Self::Known(_))
    }
}

impl Default for Rating {
    fn default() -> Self {
        Self::Unknown
    }
}

impl From<Option<f32>> for Rating {
    fn from(value: Option<f32>) -> Self {
        match value {
            Some(v) if v.is_finite() => Self::Known(v),
            _ => Self::Unknown,
        }
    }
}

impl From<Rating> for Option<f32> {
    fn from(rating: Rating) -> Self {
        rating.value()
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Known(value) => write!(f, "{:.1}", value),
            Self::Unknown => write!(f, "N/A"),
        }
    }
}

/// One row of the loaded restaurant catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RestaurantRecord {
    /// Row index in the source, stable for the lifetime of the loaded catalog
    pub id: usize,

    /// Restaurant name
    pub name: String,

    /// Free-text description used for embedding
    pub description: String,

    /// Street address (empty when the source has none)
    #[serde(default)]
    pub address: String,

    #[serde(default)]
    pub rating: Rating,
}

impl RestaurantRecord {
    /// Convert to the presentation shape for a catalog match
    pub fn to_recommendation(&self, rank: usize, distance: f32) -> Recommendation {
        Recommendation {
            rank,
            name: self.name.clone(),
            description: self.description.clone(),
            address: self.address.clone(),
            rating: self.rating,
            source: RecommendationSource::Catalog,
            distance: Some(distance),
            location: None,
        }
    }
}

/// Where a recommendation came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationSource {
    /// Local catalog + similarity index
    Catalog,
    /// External place lookup service
    PlaceLookup,
}

/// Latitude/longitude pair
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

/// Presentation record shared by catalog matches and place lookup results,
/// so display code can treat both the same way
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    /// 1-based position in the result list
    pub rank: usize,

    pub name: String,

    pub description: String,

    pub address: String,

    pub rating: Rating,

    pub source: RecommendationSource,

    /// Distance to the query embedding (catalog matches only, lower is closer)
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub distance: Option<f32>,

    /// Coordinates (place lookup results only)
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub location: Option<GeoPoint>,
}

impl Recommendation {
    /// Single-line rendering for terminals and logs
    pub fn display_line(&self) -> String {
        let mut line = format!("{}. {} — {}", self.rank, self.name, self.description);

        if self.rating.is_known() {
            line.push_str(&format!(" (rating {})", self.rating));
        }
        if !self.address.is_empty() {
            line.push_str(&format!(" @ {}", self.address));
        }

        line
    }
}
