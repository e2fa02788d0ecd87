//! DateDine Place Lookup
//!
//! Google Places text search as a supplementary source of candidate
//! restaurants. Results use the same [`Recommendation`] shape as catalog
//! matches so presentation code can mix them freely.
//!
//! [`Recommendation`]: datedine_catalog::Recommendation

mod client;
mod types;

pub use client::{PlacesClient, DEFAULT_RADIUS_METERS};
pub use types::{parse_places_response, PlaceCandidate};
