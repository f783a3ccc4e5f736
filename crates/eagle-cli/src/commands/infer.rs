use std::sync::Arc;

use anyhow::{Context, Result};
use eagle_core::config::AppConfig;
use eagle_core::models::{parse_date_lenient, AnalysisMeta, BBox, ChangeTarget, DateBound};
use eagle_inference::{InferenceEngine, SeededIntensity};

use crate::cli::InferArgs;
use crate::output::OutputWriter;
use crate::output_types::LayerRow;

pub async fn execute(args: InferArgs, config: &AppConfig, output: &OutputWriter) -> Result<()> {
    let bbox = BBox::from_slice(&args.bbox).context("Invalid --bbox")?;
    let meta = AnalysisMeta {
        target: args.target.as_deref().map(ChangeTarget::from_loose).unwrap_or_default(),
        start_date: args
            .start_date
            .as_deref()
            .and_then(|d| parse_date_lenient(d, DateBound::Start)),
        end_date: args.end_date.as_deref().and_then(|d| parse_date_lenient(d, DateBound::End)),
    };

    let mut engine = InferenceEngine::from_config(config);
    if let Some(seed) = args.seed {
        engine = engine
            .with_intensity(Arc::new(SeededIntensity::new(seed)))
            .with_input_seed(seed);
    }

    let result = engine.run(&bbox, &meta).await;

    if output.is_json() {
        return output.result(&result);
    }

    output.kv("Bounding box", format!("{:?}", bbox.to_array()));
    output.kv("Target", meta.target);
    if result.is_degraded() {
        output.warning(format!(
            "Simulated layers; model artifact at {} missing or unusable",
            engine.model_path().display()
        ));
    }
    output.table(result.layers.iter().map(LayerRow::from).collect());

    Ok(())
}
