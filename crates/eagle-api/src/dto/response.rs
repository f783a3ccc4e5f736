use serde::Serialize;

pub const SERVICE_NAME: &str = "eagle-api";

/// `GET /health` body
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self { status: "ok", service: SERVICE_NAME }
    }
}
