use anyhow::Result;
use eagle_core::config::AppConfig;
use eagle_pipeline::QueryOrchestrator;

use crate::cli::QueryArgs;
use crate::output::OutputWriter;
use crate::output_types::LayerRow;

pub async fn execute(
    args: QueryArgs,
    config: &AppConfig,
    offline: bool,
    output: &OutputWriter,
) -> Result<()> {
    let text = args.text();
    let pipeline = if offline {
        QueryOrchestrator::offline(config)
    } else {
        QueryOrchestrator::from_config(config)
    };

    let response = pipeline.run(&text).await?;

    if output.is_json() {
        return output.result(&response);
    }

    output.success(format!("Resolved {}", response.place));
    output.kv("Bounding box", format!("{:?}", response.bbox.to_array()));

    output.section("Analysis");
    println!("{}", response.analysis_text);

    output.section("Layers");
    if response.geojson_layers.iter().any(|l| l.is_simulated()) {
        output.warning("No usable model artifact; layers are simulated");
    }
    output.table(response.geojson_layers.iter().map(LayerRow::from).collect());

    Ok(())
}
