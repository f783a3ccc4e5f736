use anyhow::Result;
use console::style;
use eagle_core::config::AppConfig;
use eagle_inference::LoadedModel;
use eagle_pipeline::QueryOrchestrator;

use crate::cli::DoctorArgs;
use crate::output::OutputWriter;
use crate::output_types::{Check, ConfigRow, DoctorOutput};

pub async fn execute(
    args: DoctorArgs,
    config: &AppConfig,
    offline: bool,
    output: &OutputWriter,
) -> Result<()> {
    let pipeline = if offline {
        QueryOrchestrator::offline(config)
    } else {
        QueryOrchestrator::from_config(config)
    };

    let model_path = config.model_path();
    let mut checks = Vec::new();

    checks.push(Check::pass("geocoder", pipeline.geocoder_name()));

    if config.has_openai_credential() {
        checks.push(Check::pass("analyzer", format!("{} via OpenAI", config.openai_model.value)));
    } else {
        checks.push(Check::fail("analyzer", "OPENAI_API_KEY not set; templated summaries"));
    }

    let model_check = if !model_path.exists() {
        Check::fail("model", format!("{} not found; simulated layers", model_path.display()))
    } else {
        match LoadedModel::load(&model_path).await {
            Ok(model) => Check::pass(
                "model",
                format!("{} ({} classes)", model.name(), model.classes().len()),
            ),
            Err(e) => Check::fail("model", format!("{e}; fallback layer")),
        }
    };
    checks.push(model_check);

    let static_dir = &config.static_dir.value;
    if static_dir.is_dir() {
        checks.push(Check::pass("static", static_dir.display().to_string()));
    } else {
        checks.push(Check::fail("static", format!("{} not found", static_dir.display())));
    }

    if output.is_json() {
        return output.result(DoctorOutput {
            geocoder: pipeline.geocoder_name().to_string(),
            analyzer: pipeline.analyzer_name().to_string(),
            model_path: model_path.display().to_string(),
            checks,
        });
    }

    println!("\n{}", style("EAGLE Lens Health Check").bold().underlined());
    println!("{}", style("═".repeat(60)).dim());

    for check in &checks {
        let mark = if check.ok { style("✓").green() } else { style("⚠").yellow() };
        println!("{} {}: {}", mark, check.name, check.detail);
    }

    if args.verbose {
        output.section("Configuration");
        let mut rows: Vec<ConfigRow> = config
            .to_inspection_map()
            .into_iter()
            .map(|(key, (value, source))| ConfigRow { key, value, source: format!("{:?}", source) })
            .collect();
        rows.sort_by(|a, b| a.key.cmp(&b.key));
        output.table(rows);
    }

    let passed = checks.iter().filter(|c| c.ok).count();
    println!();
    if passed == checks.len() {
        output.success("All backends available");
    } else {
        output.info(format!(
            "{}/{} checks passed; the pipeline still answers every query using fallbacks",
            passed,
            checks.len()
        ));
    }

    Ok(())
}
