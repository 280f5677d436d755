use axum::{
    extract::{Path, State},
    Json,
};
use std::sync::Arc;

use crate::builder::render_bundle;
use crate::inventory::group_from_template_name;
use crate::models::*;
use crate::render::{self, PlaceholderStyle};
use crate::templates::{DirTemplates, TemplateSource};
use crate::AppState;

use super::ApiError;

/// Firewall skeletons are the `.conf` templates; they use `{{KEY}}`.
fn style_for(name: &str) -> PlaceholderStyle {
    if name.to_lowercase().ends_with(".conf") {
        PlaceholderStyle::DoubleBrace
    } else {
        PlaceholderStyle::SingleBrace
    }
}

async fn list_dir(store: DirTemplates) -> Result<Json<TemplateList>, ApiError> {
    let templates = tokio::task::spawn_blocking(move || store.names())
        .await
        .map_err(anyhow::Error::from)?;
    Ok(Json(TemplateList { templates }))
}

async fn placeholders_of(
    store: DirTemplates,
    name: String,
    style: PlaceholderStyle,
) -> Result<Json<TemplatePlaceholders>, ApiError> {
    let text = {
        let name = name.clone();
        tokio::task::spawn_blocking(move || store.load(&name))
            .await
            .map_err(anyhow::Error::from)??
    };
    Ok(Json(TemplatePlaceholders {
        placeholders: render::placeholders(&text, style),
        template: name,
        style,
    }))
}

/// List device configuration templates
pub async fn list_templates(
    State(state): State<Arc<AppState>>,
) -> Result<Json<TemplateList>, ApiError> {
    list_dir(state.builder.templates().clone()).await
}

/// Placeholders used by one device configuration template
pub async fn get_template_placeholders(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<Json<TemplatePlaceholders>, ApiError> {
    let style = style_for(&name);
    placeholders_of(state.builder.templates().clone(), name, style).await
}

/// List backup-system snippet templates
pub async fn list_oxidized_templates(
    State(state): State<Arc<AppState>>,
) -> Result<Json<TemplateList>, ApiError> {
    list_dir(state.snippets.clone()).await
}

/// Placeholders used by one snippet template
pub async fn get_oxidized_placeholders(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<Json<TemplatePlaceholders>, ApiError> {
    placeholders_of(state.snippets.clone(), name, PlaceholderStyle::SingleBrace).await
}

/// Render the snippets for a new device and report their inventory group
pub async fn generate_bundle(
    State(state): State<Arc<AppState>>,
    Json(req): Json<BundleRequest>,
) -> Result<Json<BundleResponse>, ApiError> {
    if req.template_principal.trim().is_empty() {
        return Err(ApiError::bad_request("template_principal is required"));
    }

    let fields = FieldMap::from_json(&req.dados);
    let grupo = group_from_template_name(&req.template_principal);

    let preview = tokio::task::spawn_blocking(move || {
        render_bundle(
            &state.snippets,
            &req.template_principal,
            req.template_secundario.as_deref(),
            &fields,
        )
    })
    .await
    .map_err(anyhow::Error::from)??;

    tracing::info!("Generated snippet bundle for group {}", grupo);
    Ok(Json(BundleResponse { preview, grupo }))
}
