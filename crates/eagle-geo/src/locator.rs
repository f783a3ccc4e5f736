use std::sync::Arc;

use async_trait::async_trait;
use eagle_core::config::{AppConfig, GeocodingService};
use eagle_core::error::{EagleError, Result};
use eagle_core::models::GeoLocation;
use eagle_core::ports::Geocoder;

use crate::bbox::ensure_non_degenerate;
use crate::google::GoogleGeocoder;
use crate::nominatim::NominatimGeocoder;

/// Resolves location phrases through the configured geocoding backend.
///
/// Results always carry a non-degenerate bounding box. An empty phrase or a
/// backend with no match yields `EagleError::LocationNotFound`.
#[derive(Clone)]
pub struct GeoLocator {
    backend: Arc<dyn Geocoder>,
}

impl GeoLocator {
    pub fn new(backend: Arc<dyn Geocoder>) -> Self {
        Self { backend }
    }

    /// Pick the backend named by `GEOCODING_SERVICE`
    pub fn from_config(config: &AppConfig) -> Self {
        let backend: Arc<dyn Geocoder> = match config.effective_geocoding_service() {
            GeocodingService::Google => {
                let key = config.google_geocoding_key.value.clone().unwrap_or_default();
                match GoogleGeocoder::new(key) {
                    Ok(google) => Arc::new(google),
                    Err(e) => {
                        tracing::warn!(error = %e, "Google geocoder unavailable; using nominatim");
                        Arc::new(NominatimGeocoder::new(config.nominatim_url.value.clone()))
                    }
                }
            }
            GeocodingService::Nominatim => {
                Arc::new(NominatimGeocoder::new(config.nominatim_url.value.clone()))
            }
        };

        tracing::info!(backend = backend.name(), "Geocoder selected");
        Self::new(backend)
    }

    pub fn backend_name(&self) -> &str {
        self.backend.name()
    }

    /// Resolve `text` to a location
    pub async fn locate(&self, text: &str) -> Result<GeoLocation> {
        let text = text.trim();
        if text.is_empty() {
            return Err(EagleError::LocationNotFound { query: String::new() });
        }

        let mut geo = self.backend.geocode(text).await?;
        geo.bbox = ensure_non_degenerate(geo.bbox);

        tracing::debug!(
            query = %text,
            place = %geo.display_name,
            bbox = ?geo.bbox.to_array(),
            backend = self.backend.name(),
            "Location resolved"
        );

        Ok(geo)
    }
}

#[async_trait]
impl Geocoder for GeoLocator {
    async fn geocode(&self, text: &str) -> Result<GeoLocation> {
        self.locate(text).await
    }

    fn name(&self) -> &str {
        self.backend.name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eagle_core::models::BBox;

    struct PointGeocoder;

    #[async_trait]
    impl Geocoder for PointGeocoder {
        async fn geocode(&self, text: &str) -> Result<GeoLocation> {
            // A zero-area box, as some backends return for exact addresses
            Ok(GeoLocation::new(5.0, 6.0, BBox::new(6.0, 5.0, 6.0, 5.0)?, text))
        }

        fn name(&self) -> &str {
            "point"
        }
    }

    #[tokio::test]
    async fn test_locate_pads_degenerate_bbox() {
        let locator = GeoLocator::new(Arc::new(PointGeocoder));
        let geo = locator.locate("  exact address  ").await.unwrap();

        assert!(geo.bbox.is_non_degenerate());
        assert!(geo.bbox.contains_strictly(6.0, 5.0));
        assert_eq!(geo.display_name, "exact address");
    }

    #[tokio::test]
    async fn test_locate_rejects_empty_text() {
        let locator = GeoLocator::new(Arc::new(PointGeocoder));
        let err = locator.locate("   ").await.unwrap_err();
        assert!(matches!(err, EagleError::LocationNotFound { .. }));
    }

    #[test]
    fn test_from_config_defaults_to_nominatim() {
        let locator = GeoLocator::from_config(&AppConfig::with_defaults());
        assert_eq!(locator.backend_name(), "nominatim");
    }

    #[test]
    fn test_from_config_google_with_key() {
        let config = AppConfig::with_defaults()
            .load_from_lookup(|key| match key {
                "GEOCODING_SERVICE" => Some("google".to_string()),
                "GOOGLE_GEOCODING_KEY" => Some("key".to_string()),
                _ => None,
            })
            .unwrap();
        assert_eq!(GeoLocator::from_config(&config).backend_name(), "google");
    }

    #[test]
    fn test_from_config_google_without_key() {
        let config = AppConfig::with_defaults()
            .load_from_lookup(|key| (key == "GEOCODING_SERVICE").then(|| "google".to_string()))
            .unwrap();
        assert_eq!(GeoLocator::from_config(&config).backend_name(), "nominatim");
    }
}
