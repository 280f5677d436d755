use axum::Json;

use crate::inventory::{group_from_template_name, groups, insert_into_group};
use crate::models::*;

use super::ApiError;

/// Insert a device line under its group and return the updated document
pub async fn insert_line(
    Json(req): Json<InventoryInsertRequest>,
) -> Result<Json<InventoryInsertResponse>, ApiError> {
    let group = req
        .group
        .as_deref()
        .map(str::trim)
        .filter(|g| !g.is_empty())
        .map(str::to_string)
        .or_else(|| req.template.as_deref().map(group_from_template_name))
        .filter(|g| !g.is_empty())
        .ok_or_else(|| ApiError::bad_request("group or template is required"))?;

    let document = insert_into_group(&req.document, &req.line, &group)?;
    tracing::info!("Inserted inventory line into group {}", group);
    Ok(Json(InventoryInsertResponse { document, group }))
}

/// List the groups of an inventory document
pub async fn list_groups(
    Json(req): Json<InventoryGroupsRequest>,
) -> Json<InventoryGroupsResponse> {
    Json(InventoryGroupsResponse {
        groups: groups(&req.document),
    })
}
