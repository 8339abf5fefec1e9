//! Document pipeline: builds the facade for one request and dispatches the
//! selected action to it.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{info, Instrument};
use uuid::Uuid;

use crate::browser::{init_browser, Driver};
use crate::config::Config;
use crate::errors::AppError;
use crate::generation::action::Action;
use crate::generation::facade::{ResumeFacade, BASE_RESUME_NAME};
use crate::generation::generator::ResumeGenerator;
use crate::generation::writer::{ContentWriter, LlmWriter};
use crate::llm_client::LlmClient;
use crate::resume::Resume;
use crate::styles::StyleManager;

/// Builds the external collaborators of a request: the browser session and
/// the LLM-backed writer bound to the user's key.
#[async_trait]
pub trait Toolkit: Send + Sync {
    async fn launch_driver(&self) -> Result<Arc<dyn Driver>, AppError>;

    fn writer(&self, api_key: &str) -> Result<Arc<dyn ContentWriter>, AppError>;
}

/// Headless Chromium plus the Messages API.
#[derive(Debug, Clone)]
pub struct ChromeToolkit {
    chrome_executable: Option<PathBuf>,
    browser_timeout: Duration,
    llm_api_url: String,
    llm_model: String,
}

impl ChromeToolkit {
    pub fn from_config(config: &Config) -> Self {
        Self {
            chrome_executable: config.chrome_executable.clone(),
            browser_timeout: Duration::from_secs(config.browser_timeout_secs),
            llm_api_url: config.llm_api_url.clone(),
            llm_model: config.llm_model.clone(),
        }
    }
}

#[async_trait]
impl Toolkit for ChromeToolkit {
    async fn launch_driver(&self) -> Result<Arc<dyn Driver>, AppError> {
        let driver = init_browser(self.chrome_executable.as_deref(), self.browser_timeout).await?;
        Ok(Arc::new(driver))
    }

    fn writer(&self, api_key: &str) -> Result<Arc<dyn ContentWriter>, AppError> {
        let llm = LlmClient::new(api_key, &self.llm_api_url, &self.llm_model)?;
        Ok(Arc::new(LlmWriter::new(llm)))
    }
}

/// Where styles are read from and outputs are written to.
#[derive(Debug, Clone)]
pub struct DocumentSettings {
    pub styles_dir: PathBuf,
    pub output_dir: PathBuf,
}

impl DocumentSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            styles_dir: config.styles_dir.clone(),
            output_dir: config.output_dir.clone(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DocumentRequest {
    pub action: Action,
    pub api_key: String,
    pub resume_text: String,
    pub style: String,
    #[serde(default)]
    pub job_url: Option<String>,
}

#[derive(Debug, Clone)]
pub struct GeneratedDocument {
    /// File stem for the download, e.g. `resume_base`.
    pub name: String,
    pub pdf: Vec<u8>,
}

/// Runs one request end to end. Every log line of the run carries the same
/// `request_id`.
pub async fn generate_document(
    toolkit: &dyn Toolkit,
    settings: &DocumentSettings,
    request: DocumentRequest,
) -> Result<GeneratedDocument, AppError> {
    let span = tracing::info_span!("document", request_id = %Uuid::new_v4());
    generate(toolkit, settings, request).instrument(span).await
}

async fn generate(
    toolkit: &dyn Toolkit,
    settings: &DocumentSettings,
    request: DocumentRequest,
) -> Result<GeneratedDocument, AppError> {
    info!(action = %request.action, style = %request.style, "Generating document");

    let mut style_manager = StyleManager::new(&settings.styles_dir);
    style_manager.set_selected_style(&request.style)?;

    let resume = Resume::parse(&request.resume_text)?;
    let mut generator = ResumeGenerator::new();
    generator.set_resume_object(resume.clone());

    // Fail before launching a browser when the action cannot run
    let job_url = request
        .job_url
        .as_deref()
        .map(str::trim)
        .filter(|u| !u.is_empty());
    if request.action.needs_job() && job_url.is_none() {
        return Err(AppError::Validation(
            "Job URL is required for this action".to_string(),
        ));
    }

    let writer = toolkit.writer(&request.api_key)?;
    let driver = toolkit.launch_driver().await?;

    let mut facade =
        ResumeFacade::new(writer, style_manager, generator, resume, &settings.output_dir);
    facade.set_driver(driver.clone());

    let result = run_action(&mut facade, request.action, job_url).await;
    driver.close().await;

    let document = result?;
    info!(name = %document.name, bytes = document.pdf.len(), "Document generated");
    Ok(document)
}

async fn run_action(
    facade: &mut ResumeFacade,
    action: Action,
    job_url: Option<&str>,
) -> Result<GeneratedDocument, AppError> {
    if action == Action::Resume {
        let pdf = facade.create_resume_pdf().await?;
        return Ok(GeneratedDocument {
            name: BASE_RESUME_NAME.to_string(),
            pdf,
        });
    }

    let url = job_url.ok_or_else(|| {
        AppError::Validation("Job URL is required for this action".to_string())
    })?;
    facade.link_to_job(url).await?;

    let (pdf, name) = match action {
        Action::TailoredResume => facade.create_resume_pdf_job_tailored().await?,
        _ => facade.create_cover_letter().await?,
    };
    Ok(GeneratedDocument { name, pdf })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{styles_dir, FakeToolkit, SAMPLE_RESUME};

    fn request(action: Action, job_url: Option<&str>) -> DocumentRequest {
        DocumentRequest {
            action,
            api_key: "sk-test".to_string(),
            resume_text: SAMPLE_RESUME.to_string(),
            style: "Plain".to_string(),
            job_url: job_url.map(str::to_string),
        }
    }

    fn settings(styles: &std::path::Path, out: &std::path::Path) -> DocumentSettings {
        DocumentSettings {
            styles_dir: styles.to_path_buf(),
            output_dir: out.to_path_buf(),
        }
    }

    #[tokio::test]
    async fn test_plain_resume_is_named_resume_base() {
        let styles = styles_dir();
        let out = tempfile::tempdir().unwrap();
        let toolkit = FakeToolkit::default();

        let doc = generate_document(
            &toolkit,
            &settings(styles.path(), out.path()),
            request(Action::Resume, None),
        )
        .await
        .unwrap();

        assert_eq!(doc.name, "resume_base");
        assert!(doc.pdf.starts_with(b"%PDF"));
        let driver = toolkit.last_driver().unwrap();
        assert!(driver.visited().is_empty());
        assert!(driver.is_closed());
    }

    #[tokio::test]
    async fn test_tailored_actions_require_job_url() {
        let styles = styles_dir();
        let out = tempfile::tempdir().unwrap();
        let toolkit = FakeToolkit::default();

        for (action, url) in [
            (Action::TailoredResume, None),
            (Action::TailoredCoverLetter, Some("   ")),
        ] {
            let err = generate_document(
                &toolkit,
                &settings(styles.path(), out.path()),
                request(action, url),
            )
            .await
            .unwrap_err();
            assert_eq!(err.to_string(), "Job URL is required for this action");
        }
        assert_eq!(toolkit.launches(), 0);
    }

    #[tokio::test]
    async fn test_tailored_resume_and_cover_letter_names() {
        let styles = styles_dir();
        let out = tempfile::tempdir().unwrap();
        let toolkit = FakeToolkit::default();
        let settings = settings(styles.path(), out.path());

        let resume = generate_document(
            &toolkit,
            &settings,
            request(Action::TailoredResume, Some("https://jobs.example.com/1")),
        )
        .await
        .unwrap();
        assert_eq!(resume.name, "resume_acme-rust-engineer");

        let letter = generate_document(
            &toolkit,
            &settings,
            request(Action::TailoredCoverLetter, Some("https://jobs.example.com/1")),
        )
        .await
        .unwrap();
        assert_eq!(letter.name, "cover_letter_acme-rust-engineer");
        assert_eq!(toolkit.launches(), 2);
    }

    #[tokio::test]
    async fn test_unknown_style_fails_before_browser_launch() {
        let styles = styles_dir();
        let out = tempfile::tempdir().unwrap();
        let toolkit = FakeToolkit::default();
        let mut req = request(Action::Resume, None);
        req.style = "Neon".to_string();

        let err = generate_document(&toolkit, &settings(styles.path(), out.path()), req)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
        assert_eq!(toolkit.launches(), 0);
    }

    #[tokio::test]
    async fn test_driver_closed_even_when_action_fails() {
        let styles = styles_dir();
        let out = tempfile::tempdir().unwrap();
        let toolkit = FakeToolkit::default();

        let err = generate_document(
            &toolkit,
            &settings(styles.path(), out.path()),
            request(Action::TailoredResume, Some("mailto:hr@example.com")),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert!(toolkit.last_driver().unwrap().is_closed());
    }

    #[test]
    fn test_document_request_deserializes_labels() {
        let json = r#"{
            "action": "Generate Tailored Cover Letter for Job Description",
            "api_key": "k",
            "resume_text": "text",
            "style": "Plain",
            "job_url": "https://x.io"
        }"#;
        let req: DocumentRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.action, Action::TailoredCoverLetter);
        assert_eq!(req.job_url.as_deref(), Some("https://x.io"));
    }
}
