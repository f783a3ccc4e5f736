use async_trait::async_trait;
use eagle_core::error::Result;
use eagle_core::models::GeoLocation;
use eagle_core::ports::Geocoder;

/// Offline geocoder that resolves any text to a small box around (0, 0)
#[derive(Debug, Clone, Copy, Default)]
pub struct FallbackGeocoder;

impl FallbackGeocoder {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Geocoder for FallbackGeocoder {
    async fn geocode(&self, text: &str) -> Result<GeoLocation> {
        Ok(GeoLocation::padded(0.0, 0.0, format!("fallback location for \"{}\"", text)))
    }

    fn name(&self) -> &str {
        "fallback"
    }
}
