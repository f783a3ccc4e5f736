//! EAGLE Geo - Location resolution
//!
//! Geocoding adapters (Nominatim, Google, offline fallback), bounding-box
//! normalization, and the [`GeoLocator`] that selects a backend from
//! configuration.

pub mod bbox;
pub mod fallback;
pub mod google;
pub mod locator;
pub mod nominatim;

pub use bbox::{ensure_non_degenerate, normalize_lat_lon_order};
pub use fallback::FallbackGeocoder;
pub use google::GoogleGeocoder;
pub use locator::GeoLocator;
pub use nominatim::NominatimGeocoder;
