//! Presentation layer: the HTML form and its submission handler.

pub mod page;
pub mod upload;

use axum::{
    extract::{Multipart, State},
    http::header,
    response::{Html, IntoResponse, Response},
};
use tracing::info;

use crate::errors::AppError;
use crate::generation::{generate_document, Action, DocumentRequest, GeneratedDocument};
use crate::state::AppState;
use crate::ui::page::{render_form, FormView};
use crate::ui::upload::{read_form, resume_text, GenerateForm};

pub const MISSING_INPUT_MESSAGE: &str = "Please provide API key, resume file and style";

/// GET /
pub async fn handle_form(State(state): State<AppState>) -> Html<String> {
    Html(render_form(&FormView {
        styles: state.style_names(),
        ..Default::default()
    }))
}

/// POST /generate
///
/// Returns the PDF as a download, or the form again with the error shown.
pub async fn handle_generate(State(state): State<AppState>, multipart: Multipart) -> Response {
    let mut view = FormView {
        styles: state.style_names(),
        ..Default::default()
    };

    let form = match read_form(multipart).await {
        Ok(form) => form,
        Err(e) => return error_page(view, e),
    };

    view.selected_style = Some(form.style.clone()).filter(|s| !s.is_empty());
    view.selected_action = form.action.parse().ok();
    view.job_url = form.job_url.clone();

    match generate_from_form(&state, form).await {
        Ok(document) => pdf_download(document),
        Err(e) => error_page(view, e),
    }
}

async fn generate_from_form(
    state: &AppState,
    form: GenerateForm,
) -> Result<GeneratedDocument, AppError> {
    let file = match &form.resume {
        Some(file) if !form.api_key.is_empty() && !form.style.is_empty() => file,
        _ => return Err(AppError::Validation(MISSING_INPUT_MESSAGE.to_string())),
    };

    let resume_text = resume_text(file).await?;
    let action: Action = form.action.parse()?;

    info!("Form submission: action={action}, file={}", file.file_name);
    generate_document(
        state.toolkit.as_ref(),
        &state.settings,
        DocumentRequest {
            action,
            api_key: form.api_key,
            resume_text,
            style: form.style,
            job_url: Some(form.job_url).filter(|u| !u.is_empty()),
        },
    )
    .await
}

fn pdf_download(document: GeneratedDocument) -> Response {
    let disposition = format!("attachment; filename=\"{}.pdf\"", document.name);
    (
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        document.pdf,
    )
        .into_response()
}

fn error_page(mut view: FormView, error: AppError) -> Response {
    error.log();
    let status = error.status();
    view.error = Some(error.public_message());
    (status, Html(render_form(&view))).into_response()
}
