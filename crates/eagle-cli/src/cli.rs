use clap::{Parser, Subcommand, ValueEnum};
use eagle_core::config::{CliConfigOverrides, GeocodingService};
use std::path::PathBuf;

/// EAGLE Lens - natural-language geospatial change queries
#[derive(Parser, Debug)]
#[command(name = "eagle")]
#[command(about = "Natural-language geospatial change queries", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Output results in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Use the offline geocoder and templated analysis; no network calls
    #[arg(long, global = true)]
    pub offline: bool,

    /// Configuration file (defaults to EAGLE_CONFIG, then ./eagle.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Geocoding backend, overriding GEOCODING_SERVICE
    #[arg(long, global = true)]
    pub geocoder: Option<GeocoderArg>,

    /// Root directory of model artifacts
    #[arg(long, global = true)]
    pub model_dir: Option<PathBuf>,

    /// Model name; the artifact is read from <model-dir>/<model-name>/model.json
    #[arg(long, global = true)]
    pub model_name: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn overrides(&self) -> CliConfigOverrides {
        CliConfigOverrides {
            geocoding_service: self.geocoder.map(Into::into),
            model_dir: self.model_dir.clone(),
            model_name: self.model_name.clone(),
            port: None,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum GeocoderArg {
    Nominatim,
    Google,
}

impl From<GeocoderArg> for GeocodingService {
    fn from(arg: GeocoderArg) -> Self {
        match arg {
            GeocoderArg::Nominatim => GeocodingService::Nominatim,
            GeocoderArg::Google => GeocodingService::Google,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the full pipeline for a free-text query
    Query(QueryArgs),

    /// Compute change layers for a known bounding box
    Infer(InferArgs),

    /// Report active backends and model availability
    Doctor(DoctorArgs),
}

#[derive(Parser, Debug)]
pub struct QueryArgs {
    /// Query text, e.g. "deforestation in Mangalore since 2019"
    #[arg(required = true, num_args = 1.., trailing_var_arg = true)]
    pub text: Vec<String>,
}

impl QueryArgs {
    pub fn text(&self) -> String {
        self.text.join(" ")
    }
}

#[derive(Parser, Debug)]
pub struct InferArgs {
    /// Bounding box as minLon,minLat,maxLon,maxLat
    #[arg(long, required = true, value_delimiter = ',', allow_hyphen_values = true)]
    pub bbox: Vec<f64>,

    /// Change target (land-use, deforestation, vegetation, urban, water)
    #[arg(long)]
    pub target: Option<String>,

    /// Start of the time window (YYYY-MM-DD or YYYY)
    #[arg(long)]
    pub start_date: Option<String>,

    /// End of the time window (YYYY-MM-DD or YYYY)
    #[arg(long)]
    pub end_date: Option<String>,

    /// Seed intensities and the model input for reproducible output
    #[arg(long)]
    pub seed: Option<u64>,
}

#[derive(Parser, Debug)]
pub struct DoctorArgs {
    /// Show every configuration value and where it came from
    #[arg(short, long)]
    pub verbose: bool,
}
