use async_trait::async_trait;
use eagle_core::error::{EagleError, Result};
use eagle_core::models::{BBox, GeoLocation, DEFAULT_BBOX_PAD};
use eagle_core::ports::Geocoder;
use reqwest::header::USER_AGENT;
use serde::Deserialize;

use crate::bbox::normalize_lat_lon_order;

/// Nominatim's usage policy requires an identifying User-Agent
pub const NOMINATIM_USER_AGENT: &str = "EAGLE-Lens-1.0";

/// OpenStreetMap Nominatim geocoder
pub struct NominatimGeocoder {
    /// Base URL (e.g., "https://nominatim.openstreetmap.org")
    base_url: String,

    /// HTTP client
    client: reqwest::Client,
}

impl NominatimGeocoder {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    /// Public OpenStreetMap instance
    pub fn public() -> Self {
        Self::new("https://nominatim.openstreetmap.org")
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn search_url(&self, text: &str) -> Result<reqwest::Url> {
        reqwest::Url::parse_with_params(
            &format!("{}/search", self.base_url),
            &[("q", text), ("format", "json"), ("limit", "1")],
        )
        .map_err(|e| EagleError::GeocoderUnavailable {
            reason: format!("Invalid Nominatim URL {}: {}", self.base_url, e),
        })
    }
}

#[async_trait]
impl Geocoder for NominatimGeocoder {
    async fn geocode(&self, text: &str) -> Result<GeoLocation> {
        let url = self.search_url(text)?;

        let response = self
            .client
            .get(url)
            .header(USER_AGENT, NOMINATIM_USER_AGENT)
            .send()
            .await
            .map_err(|e| EagleError::GeocoderUnavailable {
                reason: format!("Failed to reach Nominatim at {}: {}", self.base_url, e),
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(EagleError::GeocoderUnavailable {
                reason: format!("Nominatim error ({}): {}", status, error_text),
            });
        }

        let places: Vec<NominatimPlace> =
            response.json().await.map_err(|e| EagleError::GeocoderUnavailable {
                reason: format!("Failed to parse Nominatim response: {}", e),
            })?;

        let place = places
            .into_iter()
            .next()
            .ok_or_else(|| EagleError::LocationNotFound { query: text.to_string() })?;

        place.into_location(text)
    }

    fn name(&self) -> &str {
        "nominatim"
    }
}

/// One entry of the Nominatim `/search?format=json` response.
///
/// Nominatim encodes every number as a string.
#[derive(Debug, Deserialize)]
struct NominatimPlace {
    lat: String,
    lon: String,
    display_name: String,
    #[serde(default)]
    boundingbox: Option<Vec<String>>,
}

impl NominatimPlace {
    fn into_location(self, query: &str) -> Result<GeoLocation> {
        let not_found = || EagleError::LocationNotFound { query: query.to_string() };
        let lat: f64 = self.lat.trim().parse().map_err(|_| not_found())?;
        let lon: f64 = self.lon.trim().parse().map_err(|_| not_found())?;

        let bbox = match self.boundingbox.as_deref().and_then(parse_bounding_box) {
            Some(values) => normalize_lat_lon_order(values)?,
            None => BBox::around_point(lat, lon, DEFAULT_BBOX_PAD),
        };

        Ok(GeoLocation::new(lat, lon, bbox, self.display_name))
    }
}

/// `["minlat", "maxlat", "minlon", "maxlon"]` as numbers, if well-formed
fn parse_bounding_box(raw: &[String]) -> Option<[f64; 4]> {
    if raw.len() != 4 {
        return None;
    }
    let mut values = [0.0; 4];
    for (slot, text) in values.iter_mut().zip(raw) {
        *slot = text.trim().parse().ok()?;
    }
    Some(values)
}
