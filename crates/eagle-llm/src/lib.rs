//! EAGLE LLM - Query analysis
//!
//! This crate defines the chat-model port and its OpenAI-compatible adapter,
//! the best-effort extraction of structured data from model replies, and the
//! two analyzers: a deterministic template and the two-stage LLM analyzer.

pub mod analyzer;
pub mod extract;
pub mod openai;
pub mod ports;
pub mod template;

// Re-export main types
pub use analyzer::{analyzer_from_config, LlmAnalyzer};
pub use extract::{extract_json_object, parse_analysis_reply, ParsedReply};
pub use openai::OpenAiChatModel;
pub use ports::ChatModel;
pub use template::{templated_summary, TemplateAnalyzer};
