//! In-process stand-ins for the browser and the LLM, shared by unit tests.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tempfile::TempDir;

use crate::browser::{BrowserError, Driver, JobPage, JobReader, PdfRenderer};
use crate::errors::AppError;
use crate::generation::job_parser::ParsedJob;
use crate::generation::tone::JobTone;
use crate::generation::writer::{ContentWriter, TailoredResume};
use crate::generation::Toolkit;
use crate::resume::Resume;

pub const SAMPLE_RESUME: &str = r#"
personal_information:
  name: "Ada"
  surname: "Lovelace"
  email: "ada@example.com"
experience_details:
  - position: "Analyst"
    company: "Analytical Engines Ltd"
    key_responsibilities:
      - "Wrote the first published algorithm"
    skills_acquired: ["Mathematics", "Programming"]
"#;

/// A styles directory holding one style named "Plain".
pub fn styles_dir() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("plain.css"),
        "/* Plain $https://example.com/plain */\nbody { font-family: Georgia; }\n",
    )
    .unwrap();
    dir
}

pub struct FakeDriver {
    page_text: String,
    rendered: Mutex<Vec<String>>,
    visited: Mutex<Vec<String>>,
    closed: AtomicBool,
}

impl Default for FakeDriver {
    fn default() -> Self {
        Self::with_page_text("Acme is hiring a Rust Engineer to build engines.")
    }
}

impl FakeDriver {
    pub fn with_page_text(text: &str) -> Self {
        Self {
            page_text: text.to_string(),
            rendered: Mutex::new(Vec::new()),
            visited: Mutex::new(Vec::new()),
            closed: AtomicBool::new(false),
        }
    }

    pub fn rendered(&self) -> Vec<String> {
        self.rendered.lock().unwrap().clone()
    }

    pub fn visited(&self) -> Vec<String> {
        self.visited.lock().unwrap().clone()
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PdfRenderer for FakeDriver {
    async fn render_pdf(&self, html: &str) -> Result<Vec<u8>, BrowserError> {
        self.rendered.lock().unwrap().push(html.to_string());
        Ok(format!("%PDF-1.7 fake {}", html.len()).into_bytes())
    }
}

#[async_trait]
impl JobReader for FakeDriver {
    async fn read_job_page(&self, url: &str) -> Result<JobPage, BrowserError> {
        self.visited.lock().unwrap().push(url.to_string());
        Ok(JobPage {
            url: url.to_string(),
            title: Some("Rust Engineer - Acme".to_string()),
            text: self.page_text.clone(),
        })
    }
}

#[async_trait]
impl Driver for FakeDriver {
    async fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }
}

#[derive(Default)]
pub struct FakeWriter;

#[async_trait]
impl ContentWriter for FakeWriter {
    async fn analyze_job(&self, _page: &JobPage) -> Result<ParsedJob, AppError> {
        Ok(ParsedJob {
            company: "Acme".to_string(),
            role: "Rust Engineer".to_string(),
            summary: "Build engines.".to_string(),
            keywords: vec!["Rust".to_string()],
            detected_tone: JobTone::ProductOriented,
        })
    }

    async fn tailor_resume(
        &self,
        _resume: &Resume,
        job: &ParsedJob,
    ) -> Result<TailoredResume, AppError> {
        Ok(TailoredResume {
            summary: format!("Analyst ready to join {}.", job.company),
            highlighted_skills: vec!["Mathematics".to_string()],
        })
    }

    async fn write_cover_letter(
        &self,
        _resume: &Resume,
        job: &ParsedJob,
    ) -> Result<String, AppError> {
        Ok(format!(
            "I would love to build engines at {}.\n\nThank you.",
            job.company
        ))
    }
}

/// Hands out `FakeDriver`s and remembers the last one for inspection.
#[derive(Default)]
pub struct FakeToolkit {
    launches: AtomicUsize,
    last: Mutex<Option<Arc<FakeDriver>>>,
}

impl FakeToolkit {
    pub fn launches(&self) -> usize {
        self.launches.load(Ordering::SeqCst)
    }

    pub fn last_driver(&self) -> Option<Arc<FakeDriver>> {
        self.last.lock().unwrap().clone()
    }
}

#[async_trait]
impl Toolkit for FakeToolkit {
    async fn launch_driver(&self) -> Result<Arc<dyn Driver>, AppError> {
        self.launches.fetch_add(1, Ordering::SeqCst);
        let driver = Arc::new(FakeDriver::default());
        *self.last.lock().unwrap() = Some(driver.clone());
        Ok(driver)
    }

    fn writer(&self, api_key: &str) -> Result<Arc<dyn ContentWriter>, AppError> {
        if api_key.trim().is_empty() {
            return Err(AppError::Validation("API key is empty".to_string()));
        }
        Ok(Arc::new(FakeWriter))
    }
}
