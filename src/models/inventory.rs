use serde::{Deserialize, Serialize};

/// InventoryInsertRequest adds one device line to an inventory document.
/// The group is taken from `group`, or derived from `template` when absent.
#[derive(Debug, Clone, Deserialize)]
pub struct InventoryInsertRequest {
    #[serde(default)]
    pub document: String,
    pub line: String,
    #[serde(default)]
    pub group: Option<String>,
    #[serde(default)]
    pub template: Option<String>,
}

/// InventoryInsertResponse returns the full updated document
#[derive(Debug, Clone, Serialize)]
pub struct InventoryInsertResponse {
    pub document: String,
    pub group: String,
}

/// InventoryGroupsRequest asks for the groups of a document
#[derive(Debug, Clone, Deserialize)]
pub struct InventoryGroupsRequest {
    #[serde(default)]
    pub document: String,
}

/// InventoryGroupsResponse lists group names in document order
#[derive(Debug, Clone, Serialize)]
pub struct InventoryGroupsResponse {
    pub groups: Vec<String>,
}
