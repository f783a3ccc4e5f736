use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use eagle_pipeline::QueryResponse;

use crate::dto::QueryRequest;
use crate::error::ApiError;
use crate::state::AppState;

const TEXT_REQUIRED: &str = "text is required";

pub async fn handle_query(
    State(state): State<Arc<AppState>>,
    request: Result<Json<QueryRequest>, JsonRejection>,
) -> Result<Json<QueryResponse>, ApiError> {
    let Json(request) = request.map_err(|e| {
        tracing::debug!(error = %e, "Rejected query body");
        ApiError::bad_request(TEXT_REQUIRED)
    })?;
    let text = request.text().ok_or_else(|| ApiError::bad_request(TEXT_REQUIRED))?;

    tracing::info!(query = %text, "Processing query request");

    let response = state.pipeline.run(text).await.map_err(|e| {
        tracing::error!(error = %e, query = %text, "Query failed");
        ApiError::from(e)
    })?;

    Ok(Json(response))
}
