//! Axum route handlers for the JSON API.

use axum::{extract::State, Json};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::Serialize;

use crate::errors::AppError;
use crate::generation::{generate_document, DocumentRequest};
use crate::state::AppState;
use crate::styles::StyleManager;

#[derive(Debug, Serialize)]
pub struct DocumentResponse {
    pub name: String,
    pub pdf_base64: String,
}

#[derive(Debug, Serialize)]
pub struct StyleSummary {
    pub name: String,
    pub author_link: String,
}

/// POST /api/v1/documents
///
/// Same pipeline as the form, with the PDF returned base64-encoded.
pub async fn handle_create_document(
    State(state): State<AppState>,
    Json(request): Json<DocumentRequest>,
) -> Result<Json<DocumentResponse>, AppError> {
    if request.api_key.trim().is_empty() {
        return Err(AppError::Validation("api_key cannot be empty".to_string()));
    }
    if request.style.trim().is_empty() {
        return Err(AppError::Validation("style cannot be empty".to_string()));
    }

    let document =
        generate_document(state.toolkit.as_ref(), &state.settings, request).await?;

    Ok(Json(DocumentResponse {
        name: document.name,
        pdf_base64: STANDARD.encode(&document.pdf),
    }))
}

/// GET /api/v1/styles
pub async fn handle_list_styles(State(state): State<AppState>) -> Json<Vec<StyleSummary>> {
    let styles = StyleManager::new(&state.settings.styles_dir)
        .get_styles()
        .into_iter()
        .map(|(name, info)| StyleSummary {
            name,
            author_link: info.author_link,
        })
        .collect();
    Json(styles)
}
