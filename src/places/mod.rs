pub mod geocoder;
pub mod normalizer;
pub mod search;
pub mod types;

pub use search::{PlacesApi, PlacesClient};
