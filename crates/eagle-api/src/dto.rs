mod request;
mod response;

pub use request::{QueryRequest, RunInferenceRequest};
pub use response::HealthResponse;
