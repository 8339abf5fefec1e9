//! Browser driver: headless Chromium over the DevTools protocol.
//!
//! Two capabilities are exposed as traits so the facade never touches
//! chromiumoxide directly: printing HTML to PDF and reading a job posting.

pub mod chrome;

use async_trait::async_trait;
use thiserror::Error;

pub use chrome::init_browser;

#[derive(Debug, Error)]
pub enum BrowserError {
    #[error("failed to launch browser: {0}")]
    Launch(String),

    #[error("page operation failed: {0}")]
    Page(String),

    #[error("navigation to {url} failed: {message}")]
    Navigation { url: String, message: String },

    #[error("browser operation timed out after {secs}s")]
    Timeout { secs: u64 },

    #[error("unexpected script result: {0}")]
    Decode(#[from] serde_json::Error),

    #[error(transparent)]
    Cdp(#[from] chromiumoxide::error::CdpError),
}

/// Visible content of a job posting page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobPage {
    pub url: String,
    pub title: Option<String>,
    pub text: String,
}

/// Prints a complete HTML document to PDF bytes.
#[async_trait]
pub trait PdfRenderer: Send + Sync {
    async fn render_pdf(&self, html: &str) -> Result<Vec<u8>, BrowserError>;
}

/// Loads a job posting and returns its visible text.
#[async_trait]
pub trait JobReader: Send + Sync {
    async fn read_job_page(&self, url: &str) -> Result<JobPage, BrowserError>;
}

/// A browser session that can do both, and must be shut down when done.
#[async_trait]
pub trait Driver: PdfRenderer + JobReader {
    async fn close(&self);
}
