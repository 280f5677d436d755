use axum::{
    extract::{Path, State},
    Json,
};
use std::sync::Arc;

use crate::builder::CommandKind;
use crate::models::{BuildConfigRequest, BuildOutcome, FieldMap};
use crate::AppState;

use super::ApiError;

/// Build one device configuration.
///
/// An unknown kind is a 400. Derivation and template failures are part of the
/// normal outcome and come back as `{"status": "error", ...}`.
pub async fn build_config(
    State(state): State<Arc<AppState>>,
    Path(kind): Path<String>,
    Json(req): Json<BuildConfigRequest>,
) -> Result<Json<BuildOutcome>, ApiError> {
    let kind: CommandKind = kind.parse()?;
    let fields = FieldMap::from_json(&req.data);

    // template files are read from disk
    let result = tokio::task::spawn_blocking(move || {
        state.builder.build(kind, req.template.as_deref(), fields)
    })
    .await
    .map_err(anyhow::Error::from)?;

    if let Err(e) = &result {
        tracing::warn!("Build of {} config failed: {}", kind, e);
    }
    Ok(Json(BuildOutcome::from(result)))
}
