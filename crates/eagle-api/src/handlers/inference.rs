use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use eagle_core::models::InferenceResult;

use crate::dto::RunInferenceRequest;
use crate::error::ApiError;
use crate::state::AppState;

pub async fn handle_run_inference(
    State(state): State<Arc<AppState>>,
    request: Result<Json<RunInferenceRequest>, JsonRejection>,
) -> Result<Json<InferenceResult>, ApiError> {
    let Json(request) = request.map_err(|e| {
        tracing::warn!(error = %e, "Rejected inference body");
        ApiError::internal("inference failed").with_details(e.body_text())
    })?;

    let bbox = request.bbox().map_err(|e| {
        tracing::warn!(error = %e, "Invalid inference bbox");
        ApiError::from(e)
    })?;
    let meta = request.meta();

    tracing::info!(bbox = ?bbox.to_array(), target = %meta.target, "Processing inference request");

    let result = state.pipeline.run_inference_only(&bbox, &meta).await;
    Ok(Json(result))
}
