use axum::{extract::State, Json};
use std::sync::Arc;

use crate::addressing::{parse_ip_table, IpTableRow};
use crate::AppState;

use super::ApiError;

/// Parsed address-allocation table
pub async fn get_ip_table(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<IpTableRow>>, ApiError> {
    let text = tokio::fs::read_to_string(&state.config.ip_table_path)
        .await
        .map_err(|e| {
            tracing::warn!("Cannot read IP table {}: {}", state.config.ip_table_path, e);
            ApiError::not_found("IP table")
        })?;
    Ok(Json(parse_ip_table(&text)))
}
