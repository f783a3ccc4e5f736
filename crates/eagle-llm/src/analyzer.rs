use std::sync::Arc;

use async_trait::async_trait;
use eagle_core::config::AppConfig;
use eagle_core::models::{AnalysisResult, GeoLocation};
use eagle_core::ports::Analyzer;

use crate::extract::parse_analysis_reply;
use crate::openai::OpenAiChatModel;
use crate::ports::ChatModel;
use crate::template::TemplateAnalyzer;

/// Sentinel the model answers with when no place is mentioned
pub const UNKNOWN_LOCATION: &str = "unknown";

/// Two-stage analyzer backed by a chat model.
///
/// Stage one refines the location phrase; stage two asks for a summary with
/// an embedded JSON object. A failed refinement keeps the geocoder's display
/// name, a failed analysis call falls back to the template, and an
/// unparseable reply becomes the summary verbatim.
pub struct LlmAnalyzer<M: ChatModel> {
    model: M,
}

impl<M: ChatModel> LlmAnalyzer<M> {
    pub fn new(model: M) -> Self {
        Self { model }
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    /// Stage one: location phrase, or `geo.display_name` when unknown
    async fn refine_location(&self, text: &str, geo: &GeoLocation) -> String {
        match self.model.complete(&location_prompt(text)).await {
            Ok(answer) => {
                let answer = clean_location_answer(&answer);
                if answer.is_empty() || answer.eq_ignore_ascii_case(UNKNOWN_LOCATION) {
                    geo.display_name.clone()
                } else {
                    answer
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "Location refinement failed; keeping geocoder name");
                geo.display_name.clone()
            }
        }
    }
}

#[async_trait]
impl<M: ChatModel> Analyzer for LlmAnalyzer<M> {
    async fn analyze(&self, text: &str, geo: &GeoLocation) -> AnalysisResult {
        let location = self.refine_location(text, geo).await;

        let reply = match self.model.complete(&analysis_prompt(text, &location, geo)).await {
            Ok(reply) if !reply.trim().is_empty() => reply,
            Ok(_) => {
                tracing::warn!(
                    model = self.model.model_name(),
                    "Empty analysis reply; using template"
                );
                return TemplateAnalyzer::analysis_for(geo, location);
            }
            Err(e) => {
                tracing::warn!(error = %e, "Analysis call failed; using template");
                return TemplateAnalyzer::analysis_for(geo, location);
            }
        };

        let parsed = parse_analysis_reply(&reply);
        if !parsed.structured {
            tracing::warn!("Analysis reply had no JSON object; using raw text as summary");
        }

        AnalysisResult {
            summary: parsed.summary,
            target: parsed.target,
            start_date: parsed.start_date,
            end_date: parsed.end_date,
            location,
            degraded: !parsed.structured,
        }
    }

    fn name(&self) -> &str {
        self.model.model_name()
    }
}

/// The LLM analyzer when `OPENAI_API_KEY` is set, otherwise the template
pub fn analyzer_from_config(config: &AppConfig) -> Arc<dyn Analyzer> {
    let Some(key) = config.openai_api_key.value.clone() else {
        tracing::info!("OPENAI_API_KEY not set; using templated analysis");
        return Arc::new(TemplateAnalyzer::new());
    };

    match OpenAiChatModel::new(
        key,
        config.openai_base_url.value.clone(),
        config.openai_model.value.clone(),
    ) {
        Ok(model) => {
            tracing::info!(model = %config.openai_model.value, "LLM analyzer enabled");
            Arc::new(LlmAnalyzer::new(model))
        }
        Err(e) => {
            tracing::warn!(error = %e, "Chat model unavailable; using templated analysis");
            Arc::new(TemplateAnalyzer::new())
        }
    }
}

fn location_prompt(text: &str) -> String {
    format!(
        "Extract the geographic location (city, region, or country) mentioned in this request. \
         Reply with only the place name, or the single word \"{UNKNOWN_LOCATION}\" if no place \
         is mentioned.\n\nRequest: \"{text}\""
    )
}

fn analysis_prompt(text: &str, location: &str, geo: &GeoLocation) -> String {
    format!(
        "You are a satellite imagery analyst. User query: \"{text}\". Location: {location} \
         ({}, {}). Produce a concise analysis summary (3-6 bullet points) that includes target \
         detection (deforestation, vegetation change, urban expansion), possible timeframe if \
         the user mentioned years, and a recommendation for visualizations (NDVI, change \
         polygons). Provide a JSON object with keys: summary, target, startDate, endDate.",
        geo.lat, geo.lon
    )
}

/// Strip quoting and trailing punctuation models like to add
fn clean_location_answer(answer: &str) -> String {
    answer
        .trim()
        .trim_matches(|c: char| c == '"' || c == '\'' || c == '`')
        .trim_end_matches('.')
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_location_answer() {
        assert_eq!(clean_location_answer("  \"Mangalore, India\".\n"), "Mangalore, India");
        assert_eq!(clean_location_answer("Unknown."), "Unknown");
        assert_eq!(clean_location_answer("   "), "");
    }

    #[test]
    fn test_prompts_mention_query_and_keys() {
        let geo = GeoLocation::padded(1.0, 2.0, "Place");
        let prompt = analysis_prompt("urban growth in Place", "Place", &geo);
        assert!(prompt.contains("urban growth in Place"));
        assert!(prompt.contains("summary, target, startDate, endDate"));
        assert!(location_prompt("x").contains(UNKNOWN_LOCATION));
    }

    #[test]
    fn test_from_config_without_key_is_template() {
        let analyzer = analyzer_from_config(&AppConfig::with_defaults());
        assert_eq!(analyzer.name(), "template");
    }

    #[test]
    fn test_from_config_with_key_is_llm() {
        let config = AppConfig::with_defaults()
            .load_from_lookup(|key| (key == "OPENAI_API_KEY").then(|| "sk-test".to_string()))
            .unwrap();
        let analyzer = analyzer_from_config(&config);
        assert_eq!(analyzer.name(), "gpt-4o-mini");
    }
}
