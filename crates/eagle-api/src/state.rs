use eagle_pipeline::QueryOrchestrator;

#[derive(Clone)]
pub struct AppState {
    pub pipeline: QueryOrchestrator,
}

impl AppState {
    pub fn new(pipeline: QueryOrchestrator) -> Self {
        Self { pipeline }
    }
}
