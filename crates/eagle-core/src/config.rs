use crate::error::{EagleError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// File picked up from the working directory when `EAGLE_CONFIG` is unset
pub const DEFAULT_CONFIG_FILE: &str = "eagle.toml";

/// Configuration source for tracking where values come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigSource {
    /// Default value
    Default,
    /// Loaded from config file
    File,
    /// Loaded from environment variable
    Environment,
    /// Provided via CLI argument
    Cli,
}

impl ConfigSource {
    /// Returns the precedence level (higher = higher priority)
    pub fn precedence(&self) -> u8 {
        match self {
            ConfigSource::Default => 0,
            ConfigSource::File => 1,
            ConfigSource::Environment => 2,
            ConfigSource::Cli => 3,
        }
    }
}

/// A configuration value with its source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigValue<T> {
    pub value: T,
    pub source: ConfigSource,
}

impl<T> ConfigValue<T> {
    pub fn new(value: T, source: ConfigSource) -> Self {
        Self { value, source }
    }

    /// Update the value if the new source has higher precedence
    pub fn update(&mut self, value: T, source: ConfigSource) {
        if source.precedence() > self.source.precedence() {
            self.value = value;
            self.source = source;
        }
    }
}

/// Geocoding backend selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum GeocodingService {
    /// OpenStreetMap Nominatim (free, no key)
    #[default]
    Nominatim,
    /// Google Geocoding API (requires a key)
    Google,
}

impl GeocodingService {
    pub fn as_str(&self) -> &'static str {
        match self {
            GeocodingService::Nominatim => "nominatim",
            GeocodingService::Google => "google",
        }
    }
}

/// Process-wide configuration, built once at startup and injected downward
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub geocoding_service: ConfigValue<GeocodingService>,
    pub google_geocoding_key: ConfigValue<Option<String>>,
    pub nominatim_url: ConfigValue<String>,
    pub openai_api_key: ConfigValue<Option<String>>,
    pub openai_base_url: ConfigValue<String>,
    pub openai_model: ConfigValue<String>,
    pub model_dir: ConfigValue<PathBuf>,
    pub model_name: ConfigValue<String>,
    pub port: ConfigValue<u16>,
    pub cors_origin: ConfigValue<Option<String>>,
    pub static_dir: ConfigValue<PathBuf>,
}

impl AppConfig {
    /// Create a new configuration with default values
    pub fn with_defaults() -> Self {
        let d = ConfigSource::Default;
        Self {
            geocoding_service: ConfigValue::new(GeocodingService::Nominatim, d),
            google_geocoding_key: ConfigValue::new(None, d),
            nominatim_url: ConfigValue::new("https://nominatim.openstreetmap.org".to_string(), d),
            openai_api_key: ConfigValue::new(None, d),
            openai_base_url: ConfigValue::new("https://api.openai.com/v1".to_string(), d),
            openai_model: ConfigValue::new("gpt-4o-mini".to_string(), d),
            model_dir: ConfigValue::new(PathBuf::from("models"), d),
            model_name: ConfigValue::new("dynamicworld".to_string(), d),
            port: ConfigValue::new(3333, d),
            cors_origin: ConfigValue::new(None, d),
            static_dir: ConfigValue::new(PathBuf::from("public"), d),
        }
    }

    /// Defaults, then the config file, then the process environment
    pub fn load() -> Result<Self> {
        let mut config = Self::with_defaults();

        match env::var("EAGLE_CONFIG").ok().filter(|p| !p.trim().is_empty()) {
            Some(path) => config = config.load_from_file(path)?,
            None => {
                if Path::new(DEFAULT_CONFIG_FILE).exists() {
                    config = config.load_from_file(DEFAULT_CONFIG_FILE)?;
                }
            }
        }

        config.load_from_env()
    }

    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| EagleError::ConfigInvalid {
            key: "file".to_string(),
            reason: format!("Failed to read config file {}: {}", path.as_ref().display(), e),
        })?;

        let file_config: FileConfig =
            toml::from_str(&content).map_err(|e| EagleError::ConfigInvalid {
                key: "file".to_string(),
                reason: format!("Failed to parse TOML: {}", e),
            })?;

        let f = ConfigSource::File;
        if let Some(service) = file_config.geocoding_service {
            self.geocoding_service.update(parse_geocoding_service(&service)?, f);
        }
        if let Some(key) = non_empty(file_config.google_geocoding_key) {
            self.google_geocoding_key.update(Some(key), f);
        }
        if let Some(url) = non_empty(file_config.nominatim_url) {
            self.nominatim_url.update(url, f);
        }
        if let Some(key) = non_empty(file_config.openai_api_key) {
            self.openai_api_key.update(Some(key), f);
        }
        if let Some(url) = non_empty(file_config.openai_base_url) {
            self.openai_base_url.update(url, f);
        }
        if let Some(model) = non_empty(file_config.openai_model) {
            self.openai_model.update(model, f);
        }
        if let Some(dir) = file_config.model_dir {
            self.model_dir.update(dir, f);
        }
        if let Some(name) = non_empty(file_config.model_name) {
            self.model_name.update(name, f);
        }
        if let Some(port) = file_config.port {
            self.port.update(port, f);
        }
        if let Some(origin) = non_empty(file_config.cors_origin) {
            self.cors_origin.update(Some(origin), f);
        }
        if let Some(dir) = file_config.static_dir {
            self.static_dir.update(dir, f);
        }

        Ok(self)
    }

    /// Load configuration from environment variables
    pub fn load_from_env(self) -> Result<Self> {
        self.load_from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    ///
    /// Empty values are treated as unset.
    pub fn load_from_lookup<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| non_empty(lookup(key));
        let e = ConfigSource::Environment;

        if let Some(service) = get("GEOCODING_SERVICE") {
            self.geocoding_service.update(parse_geocoding_service(&service)?, e);
        }
        if let Some(key) = get("GOOGLE_GEOCODING_KEY") {
            self.google_geocoding_key.update(Some(key), e);
        }
        if let Some(url) = get("NOMINATIM_URL") {
            self.nominatim_url.update(url, e);
        }
        if let Some(key) = get("OPENAI_API_KEY") {
            self.openai_api_key.update(Some(key), e);
        }
        if let Some(url) = get("OPENAI_BASE_URL") {
            self.openai_base_url.update(url, e);
        }
        if let Some(model) = get("OPENAI_MODEL") {
            self.openai_model.update(model, e);
        }
        if let Some(dir) = get("EAGLE_MODEL_DIR") {
            self.model_dir.update(PathBuf::from(dir), e);
        }
        if let Some(name) = get("EAGLE_MODEL_NAME") {
            self.model_name.update(name, e);
        }
        if let Some(port) = get("PORT") {
            self.port.update(parse_port(&port)?, e);
        }
        if let Some(origin) = get("EAGLE_CORS_ORIGIN") {
            self.cors_origin.update(Some(origin), e);
        }
        if let Some(dir) = get("EAGLE_STATIC_DIR") {
            self.static_dir.update(PathBuf::from(dir), e);
        }

        Ok(self)
    }

    /// Update configuration from CLI arguments
    pub fn update_from_cli(&mut self, overrides: CliConfigOverrides) {
        let c = ConfigSource::Cli;
        if let Some(service) = overrides.geocoding_service {
            self.geocoding_service.update(service, c);
        }
        if let Some(dir) = overrides.model_dir {
            self.model_dir.update(dir, c);
        }
        if let Some(name) = overrides.model_name {
            self.model_name.update(name, c);
        }
        if let Some(port) = overrides.port {
            self.port.update(port, c);
        }
    }

    /// The geocoder that will actually be used.
    ///
    /// Google without a key falls back to Nominatim.
    pub fn effective_geocoding_service(&self) -> GeocodingService {
        match self.geocoding_service.value {
            GeocodingService::Google if self.google_geocoding_key.value.is_none() => {
                tracing::warn!(
                    "GEOCODING_SERVICE=google but GOOGLE_GEOCODING_KEY is not set; using nominatim"
                );
                GeocodingService::Nominatim
            }
            service => service,
        }
    }

    pub fn has_openai_credential(&self) -> bool {
        self.openai_api_key.value.is_some()
    }

    /// Conventional location of the model artifact: `<dir>/<name>/model.json`
    pub fn model_path(&self) -> PathBuf {
        self.model_dir.value.join(&self.model_name.value).join("model.json")
    }

    /// Get the server bind address
    pub fn bind_address(&self) -> String {
        format!("0.0.0.0:{}", self.port.value)
    }

    /// Get all configuration values as a map for inspection. Secrets are redacted.
    pub fn to_inspection_map(&self) -> HashMap<String, (String, ConfigSource)> {
        let redact = |v: &Option<String>| if v.is_some() { "<set>" } else { "<unset>" }.to_string();
        let mut map = HashMap::new();

        map.insert(
            "geocoding_service".to_string(),
            (self.geocoding_service.value.as_str().to_string(), self.geocoding_service.source),
        );
        map.insert(
            "google_geocoding_key".to_string(),
            (redact(&self.google_geocoding_key.value), self.google_geocoding_key.source),
        );
        map.insert(
            "nominatim_url".to_string(),
            (self.nominatim_url.value.clone(), self.nominatim_url.source),
        );
        map.insert(
            "openai_api_key".to_string(),
            (redact(&self.openai_api_key.value), self.openai_api_key.source),
        );
        map.insert(
            "openai_base_url".to_string(),
            (self.openai_base_url.value.clone(), self.openai_base_url.source),
        );
        map.insert(
            "openai_model".to_string(),
            (self.openai_model.value.clone(), self.openai_model.source),
        );
        map.insert(
            "model_dir".to_string(),
            (self.model_dir.value.display().to_string(), self.model_dir.source),
        );
        map.insert(
            "model_name".to_string(),
            (self.model_name.value.clone(), self.model_name.source),
        );
        map.insert("port".to_string(), (self.port.value.to_string(), self.port.source));
        map.insert(
            "cors_origin".to_string(),
            (
                self.cors_origin.value.clone().unwrap_or_else(|| "*".to_string()),
                self.cors_origin.source,
            ),
        );
        map.insert(
            "static_dir".to_string(),
            (self.static_dir.value.display().to_string(), self.static_dir.source),
        );

        map
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// Configuration loaded from TOML file
#[derive(Debug, Deserialize, Serialize)]
struct FileConfig {
    geocoding_service: Option<String>,
    google_geocoding_key: Option<String>,
    nominatim_url: Option<String>,
    openai_api_key: Option<String>,
    openai_base_url: Option<String>,
    openai_model: Option<String>,
    model_dir: Option<PathBuf>,
    model_name: Option<String>,
    port: Option<u16>,
    cors_origin: Option<String>,
    static_dir: Option<PathBuf>,
}

/// CLI configuration overrides
#[derive(Debug, Default)]
pub struct CliConfigOverrides {
    pub geocoding_service: Option<GeocodingService>,
    pub model_dir: Option<PathBuf>,
    pub model_name: Option<String>,
    pub port: Option<u16>,
}

/// Parse geocoding service from string
pub fn parse_geocoding_service(s: &str) -> Result<GeocodingService> {
    match s.trim().to_lowercase().as_str() {
        "nominatim" | "osm" => Ok(GeocodingService::Nominatim),
        "google" => Ok(GeocodingService::Google),
        _ => Err(EagleError::ConfigInvalid {
            key: "GEOCODING_SERVICE".to_string(),
            reason: format!("Unknown geocoding service: {}. Use nominatim or google", s),
        }),
    }
}

/// Parse an HTTP port
pub fn parse_port(s: &str) -> Result<u16> {
    s.trim().parse::<u16>().map_err(|_| EagleError::ConfigInvalid {
        key: "PORT".to_string(),
        reason: format!("Invalid port: {}", s),
    })
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}
