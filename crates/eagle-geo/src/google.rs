use async_trait::async_trait;
use eagle_core::error::{EagleError, Result};
use eagle_core::models::{BBox, GeoLocation, DEFAULT_BBOX_PAD};
use eagle_core::ports::Geocoder;
use serde::Deserialize;

use crate::bbox::ensure_non_degenerate;

/// Google Geocoding API adapter
pub struct GoogleGeocoder {
    api_key: String,
    base_url: String,
    client: reqwest::Client,
}

impl GoogleGeocoder {
    /// Create a geocoder against the public Google endpoint
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_base_url(api_key, "https://maps.googleapis.com")
    }

    /// Create a geocoder with a custom base URL
    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(EagleError::ConfigMissing { key: "GOOGLE_GEOCODING_KEY".to_string() });
        }

        Ok(Self {
            api_key,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        })
    }

    fn geocode_url(&self, text: &str) -> Result<reqwest::Url> {
        reqwest::Url::parse_with_params(
            &format!("{}/maps/api/geocode/json", self.base_url),
            &[("address", text), ("key", self.api_key.as_str())],
        )
        .map_err(|e| EagleError::GeocoderUnavailable {
            reason: format!("Invalid Google geocoding URL {}: {}", self.base_url, e),
        })
    }
}

#[async_trait]
impl Geocoder for GoogleGeocoder {
    async fn geocode(&self, text: &str) -> Result<GeoLocation> {
        let url = self.geocode_url(text)?;

        let response = self.client.get(url).send().await.map_err(|e| {
            EagleError::GeocoderUnavailable {
                reason: format!("Failed to reach Google geocoding: {}", e),
            }
        })?;

        if !response.status().is_success() {
            return Err(EagleError::GeocoderUnavailable {
                reason: format!("Google geocoding HTTP error ({})", response.status()),
            });
        }

        let body: GoogleResponse =
            response.json().await.map_err(|e| EagleError::GeocoderUnavailable {
                reason: format!("Failed to parse Google geocoding response: {}", e),
            })?;

        match body.status.as_str() {
            "OK" => {}
            "ZERO_RESULTS" => {
                return Err(EagleError::LocationNotFound { query: text.to_string() })
            }
            other => {
                return Err(EagleError::GeocoderUnavailable {
                    reason: format!(
                        "Google geocoding returned {}: {}",
                        other,
                        body.error_message.unwrap_or_default()
                    ),
                })
            }
        }

        let result = body
            .results
            .into_iter()
            .next()
            .ok_or_else(|| EagleError::LocationNotFound { query: text.to_string() })?;

        Ok(result.into_location())
    }

    fn name(&self) -> &str {
        "google"
    }
}

#[derive(Debug, Deserialize)]
struct GoogleResponse {
    status: String,
    #[serde(default)]
    results: Vec<GoogleResult>,
    #[serde(default)]
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GoogleResult {
    formatted_address: String,
    geometry: GoogleGeometry,
}

#[derive(Debug, Deserialize)]
struct GoogleGeometry {
    location: LatLng,
    #[serde(default)]
    viewport: Option<Viewport>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
struct LatLng {
    lat: f64,
    lng: f64,
}

#[derive(Debug, Deserialize)]
struct Viewport {
    northeast: LatLng,
    southwest: LatLng,
}

impl GoogleResult {
    fn into_location(self) -> GeoLocation {
        let LatLng { lat, lng } = self.geometry.location;
        let bbox = self
            .geometry
            .viewport
            .and_then(|v| viewport_to_bbox(&v))
            .filter(|bbox| bbox.contains(lng, lat))
            .unwrap_or_else(|| BBox::around_point(lat, lng, DEFAULT_BBOX_PAD));
        GeoLocation::new(lat, lng, bbox, self.formatted_address)
    }
}

/// Viewports crossing the antimeridian (`sw.lng > ne.lng`) yield `None`
fn viewport_to_bbox(viewport: &Viewport) -> Option<BBox> {
    let (sw, ne) = (viewport.southwest, viewport.northeast);
    if sw.lng > ne.lng {
        return None;
    }
    BBox::new(sw.lng, sw.lat.min(ne.lat), ne.lng, sw.lat.max(ne.lat))
        .ok()
        .map(ensure_non_degenerate)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requires_key() {
        let err = GoogleGeocoder::new("  ").err().unwrap();
        assert!(matches!(err, EagleError::ConfigMissing { .. }));
    }

    #[test]
    fn test_result_prefers_viewport() {
        let result: GoogleResult = serde_json::from_value(serde_json::json!({
            "formatted_address": "Mangaluru, Karnataka, India",
            "geometry": {
                "location": { "lat": 12.91, "lng": 74.85 },
                "viewport": {
                    "northeast": { "lat": 12.95, "lng": 74.90 },
                    "southwest": { "lat": 12.85, "lng": 74.80 }
                }
            }
        }))
        .unwrap();

        let geo = result.into_location();
        assert_eq!(geo.bbox.to_array(), [74.80, 12.85, 74.90, 12.95]);
        assert_eq!(geo.display_name, "Mangaluru, Karnataka, India");
    }

    #[test]
    fn test_result_without_viewport_is_padded() {
        let result: GoogleResult = serde_json::from_value(serde_json::json!({
            "formatted_address": "Somewhere",
            "geometry": { "location": { "lat": 1.0, "lng": 2.0 } }
        }))
        .unwrap();

        let geo = result.into_location();
        assert_eq!(geo.bbox, BBox::around_point(1.0, 2.0, DEFAULT_BBOX_PAD));
    }

    #[test]
    fn test_antimeridian_viewport_is_padded_around_point() {
        let result: GoogleResult = serde_json::from_value(serde_json::json!({
            "formatted_address": "Fiji",
            "geometry": {
                "location": { "lat": -17.7, "lng": 178.0 },
                "viewport": {
                    "northeast": { "lat": -12.4, "lng": -178.2 },
                    "southwest": { "lat": -21.0, "lng": 176.9 }
                }
            }
        }))
        .unwrap();

        let geo = result.into_location();
        assert_eq!(geo.bbox, BBox::around_point(-17.7, 178.0, DEFAULT_BBOX_PAD));
        assert!(geo.bbox.contains_strictly(geo.lon, geo.lat));
    }

    #[test]
    fn test_viewport_missing_point_is_padded_around_point() {
        let result: GoogleResult = serde_json::from_value(serde_json::json!({
            "formatted_address": "Elsewhere",
            "geometry": {
                "location": { "lat": 50.0, "lng": 10.0 },
                "viewport": {
                    "northeast": { "lat": 2.0, "lng": 2.0 },
                    "southwest": { "lat": 1.0, "lng": 1.0 }
                }
            }
        }))
        .unwrap();

        let geo = result.into_location();
        assert!(geo.bbox.contains_strictly(10.0, 50.0));
    }

    #[test]
    fn test_geocode_url_contains_key() {
        let geocoder = GoogleGeocoder::with_base_url("abc123", "http://localhost:9000").unwrap();
        let url = geocoder.geocode_url("Mangalore").unwrap();
        assert_eq!(url.path(), "/maps/api/geocode/json");
        assert!(url.as_str().contains("address=Mangalore"));
        assert!(url.as_str().contains("key=abc123"));
    }
}
