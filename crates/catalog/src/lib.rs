//! DateDine Restaurant Catalog
//!
//! Typed restaurant records, the CSV catalog loader and the presentation
//! shape shared by catalog matches and place lookup results.

mod loader;
mod types;

pub use loader::{load_catalog, load_catalog_from_reader, LoadedCatalog};
pub use types::{GeoPoint, Rating, Recommendation, RecommendationSource, RestaurantRecord};
