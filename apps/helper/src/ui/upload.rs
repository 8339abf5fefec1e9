//! Multipart form parsing and resume file decoding.

use axum::extract::multipart::{Multipart, MultipartError};
use axum::http::StatusCode;
use bytes::Bytes;
use tracing::debug;

use crate::errors::AppError;
use crate::ui::page::ACCEPTED_EXTENSIONS;

#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub bytes: Bytes,
}

/// Raw form fields, before any validation.
#[derive(Debug, Clone, Default)]
pub struct GenerateForm {
    pub api_key: String,
    pub style: String,
    pub action: String,
    pub job_url: String,
    pub resume: Option<UploadedFile>,
}

fn multipart_error(e: MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge("Uploaded file is too large".to_string())
    } else {
        AppError::Validation(format!("Invalid form submission: {e}"))
    }
}

pub async fn read_form(mut multipart: Multipart) -> Result<GenerateForm, AppError> {
    let mut form = GenerateForm::default();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "resume" => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let bytes = field.bytes().await.map_err(multipart_error)?;
                // Browsers send an empty part when no file was chosen
                if !file_name.is_empty() || !bytes.is_empty() {
                    debug!("Received resume upload '{file_name}' ({} bytes)", bytes.len());
                    form.resume = Some(UploadedFile { file_name, bytes });
                }
            }
            "api_key" | "style" | "action" | "job_url" => {
                let value = field.text().await.map_err(multipart_error)?;
                let value = value.trim().to_string();
                match name.as_str() {
                    "api_key" => form.api_key = value,
                    "style" => form.style = value,
                    "action" => form.action = value,
                    _ => form.job_url = value,
                }
            }
            other => debug!("Ignoring unknown form field '{other}'"),
        }
    }

    Ok(form)
}

/// Converts an uploaded resume into text. PDFs are run through text
/// extraction; everything else must be UTF-8.
pub async fn resume_text(file: &UploadedFile) -> Result<String, AppError> {
    let extension = file
        .file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();

    if !extension.is_empty() && !ACCEPTED_EXTENSIONS.contains(&extension.as_str()) {
        return Err(AppError::Validation(format!(
            "Unsupported resume file type '.{extension}'; upload .txt, .yaml, .yml or .pdf"
        )));
    }

    if extension == "pdf" {
        let bytes = file.bytes.clone();
        let text = tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&bytes))
            .await
            // extraction panics on some malformed files
            .map_err(|_| AppError::Validation("Could not read PDF resume".to_string()))?
            .map_err(|e| AppError::Validation(format!("Could not read PDF resume: {e}")))?;
        return Ok(text);
    }

    String::from_utf8(file.bytes.to_vec())
        .map_err(|_| AppError::Validation("Resume file is not valid UTF-8 text".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(name: &str, bytes: &[u8]) -> UploadedFile {
        UploadedFile {
            file_name: name.to_string(),
            bytes: Bytes::copy_from_slice(bytes),
        }
    }

    #[tokio::test]
    async fn test_utf8_text_upload() {
        let text = resume_text(&file("resume.YAML", "name: Zoë".as_bytes()))
            .await
            .unwrap();
        assert_eq!(text, "name: Zoë");
    }

    #[tokio::test]
    async fn test_invalid_utf8_rejected() {
        let err = resume_text(&file("resume.txt", &[0xff, 0xfe, 0x00]))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Resume file is not valid UTF-8 text");
    }

    #[tokio::test]
    async fn test_unsupported_extension_rejected() {
        let err = resume_text(&file("resume.docx", b"PK"))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("'.docx'"));
    }

    /// One-page PDF drawing `line` in Helvetica, with a correct xref table.
    fn single_line_pdf(line: &str) -> Vec<u8> {
        let content = format!("BT /F1 12 Tf 72 720 Td ({line}) Tj ET");
        let objects = [
            "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
            "<< /Type /Pages /Kids [3 0 R] /Count 1 >>".to_string(),
            "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] \
             /Resources << /Font << /F1 4 0 R >> >> /Contents 5 0 R >>"
                .to_string(),
            "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>"
                .to_string(),
            format!(
                "<< /Length {} >>\nstream\n{content}\nendstream",
                content.len()
            ),
        ];

        let mut pdf = b"%PDF-1.4\n".to_vec();
        let mut offsets = Vec::new();
        for (i, object) in objects.iter().enumerate() {
            offsets.push(pdf.len());
            pdf.extend_from_slice(format!("{} 0 obj\n{object}\nendobj\n", i + 1).as_bytes());
        }
        let xref_start = pdf.len();
        let mut xref = format!("xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1);
        for offset in offsets {
            xref.push_str(&format!("{offset:010} 00000 n \n"));
        }
        xref.push_str(&format!(
            "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{xref_start}\n%%EOF\n",
            objects.len() + 1
        ));
        pdf.extend_from_slice(xref.as_bytes());
        pdf
    }

    #[tokio::test]
    async fn test_pdf_upload_becomes_plain_resume() {
        let pdf = single_line_pdf("Ada Lovelace Analytical Engine Programmer");
        let text = resume_text(&file("resume.PDF", &pdf)).await.unwrap();
        assert!(text.contains("Lovelace"), "extracted: {text:?}");

        let resume = crate::resume::Resume::parse(&text).unwrap();
        assert!(matches!(resume, crate::resume::Resume::Plain(_)));
    }

    #[tokio::test]
    async fn test_broken_pdf_is_validation_error() {
        let err = resume_text(&file("resume.pdf", b"definitely not a pdf"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_extensionless_upload_treated_as_text() {
        let text = resume_text(&file("resume", b"Plain resume")).await.unwrap();
        assert_eq!(text, "Plain resume");
    }
}
