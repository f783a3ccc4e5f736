//! Tests for the two-stage LLM analyzer and its fallbacks

use async_trait::async_trait;
use chrono::NaiveDate;
use eagle_core::error::{EagleError, Result};
use eagle_core::models::{ChangeTarget, GeoLocation};
use eagle_core::ports::Analyzer;
use eagle_llm::{parse_analysis_reply, templated_summary, ChatModel, LlmAnalyzer, OpenAiChatModel};
use proptest::prelude::*;
use std::collections::VecDeque;
use std::sync::Mutex;

/// Chat model that replays scripted answers in order
struct ScriptedModel {
    replies: Mutex<VecDeque<Result<String>>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedModel {
    fn new(replies: Vec<Result<String>>) -> Self {
        Self { replies: Mutex::new(replies.into()), prompts: Mutex::new(Vec::new()) }
    }

    fn prompt(&self, index: usize) -> String {
        self.prompts.lock().unwrap()[index].clone()
    }
}

#[async_trait]
impl ChatModel for ScriptedModel {
    async fn complete(&self, prompt: &str) -> Result<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.replies.lock().unwrap().pop_front().unwrap_or_else(|| {
            Err(EagleError::AnalyzerUnavailable { reason: "script exhausted".to_string() })
        })
    }

    fn model_name(&self) -> &str {
        "scripted"
    }
}

fn unavailable() -> Result<String> {
    Err(EagleError::AnalyzerUnavailable { reason: "connection refused".to_string() })
}

fn mangalore() -> GeoLocation {
    GeoLocation::padded(12.9, 74.85, "Mangaluru, Karnataka, India")
}

#[tokio::test]
async fn test_structured_reply_is_used() {
    let model = ScriptedModel::new(vec![
        Ok("Mangalore".to_string()),
        Ok(r#"Sure! {"summary": "Canopy loss near the Western Ghats", "target": "deforestation",
            "startDate": "2019-01-01", "endDate": null}"#
            .to_string()),
    ]);
    let analyzer = LlmAnalyzer::new(model);

    let result = analyzer.analyze("deforestation in Mangalore since 2019", &mangalore()).await;

    assert_eq!(result.summary, "Canopy loss near the Western Ghats");
    assert_eq!(result.target, ChangeTarget::Deforestation);
    assert_eq!(result.start_date, NaiveDate::from_ymd_opt(2019, 1, 1));
    assert_eq!(result.end_date, None);
    assert_eq!(result.location, "Mangalore");
    assert!(!result.degraded);
}

#[tokio::test]
async fn test_refined_location_feeds_analysis_prompt() {
    let model = ScriptedModel::new(vec![
        Ok("Mangalore, India".to_string()),
        Ok(r#"{"summary": "ok"}"#.to_string()),
    ]);
    let analyzer = LlmAnalyzer::new(model);
    analyzer.analyze("urban sprawl in Mangalore", &mangalore()).await;

    let model = analyzer.model();
    assert!(model.prompt(0).contains("urban sprawl in Mangalore"));
    assert!(model.prompt(1).contains("Location: Mangalore, India"));
}

#[tokio::test]
async fn test_unknown_location_keeps_display_name() {
    let model = ScriptedModel::new(vec![
        Ok("unknown".to_string()),
        Ok(r#"{"summary": "s", "target": "urban"}"#.to_string()),
    ]);
    let analyzer = LlmAnalyzer::new(model);

    let result = analyzer.analyze("show me changes", &mangalore()).await;

    assert_eq!(result.location, "Mangaluru, Karnataka, India");
    assert_eq!(result.target, ChangeTarget::Urban);
}

#[tokio::test]
async fn test_failed_refinement_keeps_display_name() {
    let model = ScriptedModel::new(vec![unavailable(), Ok(r#"{"summary": "s"}"#.to_string())]);
    let analyzer = LlmAnalyzer::new(model);

    let result = analyzer.analyze("deforestation in Mangalore", &mangalore()).await;

    assert_eq!(result.location, "Mangaluru, Karnataka, India");
    assert_eq!(result.summary, "s");
}

#[tokio::test]
async fn test_unstructured_reply_becomes_summary() {
    let raw = "Vegetation appears stable; no major clearing detected.";
    let model = ScriptedModel::new(vec![Ok("Mangalore".to_string()), Ok(raw.to_string())]);
    let analyzer = LlmAnalyzer::new(model);

    let result = analyzer.analyze("vegetation in Mangalore", &mangalore()).await;

    assert_eq!(result.summary, raw);
    assert_eq!(result.target, ChangeTarget::LandUse);
    assert_eq!(result.start_date, None);
    assert!(result.degraded);
}

#[tokio::test]
async fn test_failed_analysis_uses_template() {
    let model = ScriptedModel::new(vec![Ok("Mangalore".to_string()), unavailable()]);
    let analyzer = LlmAnalyzer::new(model);
    let geo = mangalore();

    let result = analyzer.analyze("deforestation in Mangalore", &geo).await;

    assert_eq!(result.summary, templated_summary(&geo));
    assert_eq!(result.target, ChangeTarget::LandUse);
    assert_eq!(result.location, "Mangalore");
    assert!(result.degraded);
}

#[tokio::test]
async fn test_openai_backed_analyzer_over_http() {
    let mut server = mockito::Server::new_async().await;

    let _mock = server
        .mock("POST", "/chat/completions")
        .match_header("authorization", "Bearer sk-test")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{
                "choices": [{
                    "message": {
                        "role": "assistant",
                        "content": "{\"summary\": \"Urban expansion to the north\", \"target\": \"urban expansion\", \"startDate\": \"2015\", \"endDate\": \"2020\"}"
                    }
                }]
            }"#,
        )
        .expect(2)
        .create_async()
        .await;

    let model = OpenAiChatModel::new("sk-test", server.url(), "gpt-4o-mini").unwrap();
    let analyzer = LlmAnalyzer::new(model);

    let result = analyzer.analyze("urban growth in Mangalore", &mangalore()).await;

    assert_eq!(result.summary, "Urban expansion to the north");
    assert_eq!(result.target, ChangeTarget::Urban);
    assert_eq!(result.start_date, NaiveDate::from_ymd_opt(2015, 1, 1));
    assert_eq!(result.end_date, NaiveDate::from_ymd_opt(2020, 12, 31));
}

#[tokio::test]
async fn test_openai_error_status_falls_back_to_template() {
    let mut server = mockito::Server::new_async().await;

    let _mock = server
        .mock("POST", "/chat/completions")
        .with_status(401)
        .with_body(r#"{"error": {"message": "invalid api key"}}"#)
        .create_async()
        .await;

    let model = OpenAiChatModel::new("sk-bad", server.url(), "gpt-4o-mini").unwrap();
    let analyzer = LlmAnalyzer::new(model);
    let geo = mangalore();

    let result = analyzer.analyze("deforestation in Mangalore", &geo).await;

    assert_eq!(result.summary, templated_summary(&geo));
    assert_eq!(result.location, geo.display_name);
}

proptest! {
    #[test]
    fn prop_reply_without_braces_is_raw_summary(reply in "[^{}]{0,200}") {
        let parsed = parse_analysis_reply(&reply);
        prop_assert!(!parsed.structured);
        prop_assert_eq!(parsed.summary, reply.trim());
        prop_assert_eq!(parsed.target, ChangeTarget::LandUse);
    }

    #[test]
    fn prop_parse_never_panics(reply in ".{0,300}") {
        let _ = parse_analysis_reply(&reply);
    }
}
