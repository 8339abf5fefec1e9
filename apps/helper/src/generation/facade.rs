//! Resume Facade: the single object the presentation layer talks to.
//!
//! Holds everything one generation request needs: the resume, the selected
//! style, the content writer bound to the user's API key, and the browser
//! driver. Every PDF it produces is also written under `output_path`.

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use reqwest::Url;
use tracing::{info, warn};

use crate::browser::Driver;
use crate::errors::AppError;
use crate::generation::generator::ResumeGenerator;
use crate::generation::job_parser::{output_slug, ParsedJob};
use crate::generation::writer::ContentWriter;
use crate::resume::Resume;
use crate::styles::StyleManager;

/// Name of the untailored resume output.
pub const BASE_RESUME_NAME: &str = "resume_base";

/// A job posting the facade has read and analysed.
#[derive(Debug, Clone)]
pub struct LinkedJob {
    pub url: String,
    pub parsed: ParsedJob,
}

impl LinkedJob {
    fn slug(&self) -> String {
        output_slug(&self.parsed, &self.url)
    }
}

pub struct ResumeFacade {
    writer: Arc<dyn ContentWriter>,
    style_manager: StyleManager,
    generator: ResumeGenerator,
    resume: Resume,
    output_path: PathBuf,
    driver: Option<Arc<dyn Driver>>,
    job: Option<LinkedJob>,
}

impl ResumeFacade {
    pub fn new(
        writer: Arc<dyn ContentWriter>,
        style_manager: StyleManager,
        generator: ResumeGenerator,
        resume: Resume,
        output_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            writer,
            style_manager,
            generator,
            resume,
            output_path: output_path.into(),
            driver: None,
            job: None,
        }
    }

    pub fn set_driver(&mut self, driver: Arc<dyn Driver>) {
        self.driver = Some(driver);
    }

    #[cfg(test)]
    pub fn linked_job(&self) -> Option<&LinkedJob> {
        self.job.as_ref()
    }

    fn driver(&self) -> Result<&dyn Driver, AppError> {
        self.driver
            .as_deref()
            .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Browser driver not initialised")))
    }

    fn job(&self) -> Result<&LinkedJob, AppError> {
        self.job.as_ref().ok_or_else(|| {
            AppError::Validation("No job linked; call link_to_job first".to_string())
        })
    }

    /// Reads the posting at `url` and analyses it for later tailoring.
    pub async fn link_to_job(&mut self, url: &str) -> Result<(), AppError> {
        let url = url.trim();
        let parsed_url = Url::parse(url)
            .map_err(|e| AppError::Validation(format!("Invalid job URL '{url}': {e}")))?;
        if !matches!(parsed_url.scheme(), "http" | "https") {
            return Err(AppError::Validation(format!(
                "Invalid job URL '{url}': only http and https are supported"
            )));
        }
        if !is_public_host(&parsed_url) {
            return Err(AppError::Validation(format!(
                "Invalid job URL '{url}': local and private network addresses are not allowed"
            )));
        }

        let page = self.driver()?.read_job_page(url).await?;
        if page.text.trim().is_empty() {
            return Err(AppError::Validation(format!(
                "Job page at {url} has no readable text"
            )));
        }

        let parsed = self.writer.analyze_job(&page).await?;
        self.job = Some(LinkedJob {
            url: url.to_string(),
            parsed,
        });
        Ok(())
    }

    pub async fn create_resume_pdf(&self) -> Result<Vec<u8>, AppError> {
        let css = self.style_manager.selected_style_css()?;
        let html = self.generator.create_resume(&css)?;
        let pdf = self.driver()?.render_pdf(&html).await?;
        self.save(BASE_RESUME_NAME, &pdf).await;
        Ok(pdf)
    }

    pub async fn create_resume_pdf_job_tailored(&self) -> Result<(Vec<u8>, String), AppError> {
        let job = self.job()?;
        let css = self.style_manager.selected_style_css()?;
        let tailored = self.writer.tailor_resume(&self.resume, &job.parsed).await?;
        let html = self.generator.create_resume_tailored(&css, &tailored)?;
        let pdf = self.driver()?.render_pdf(&html).await?;

        let name = format!("resume_{}", job.slug());
        self.save(&name, &pdf).await;
        Ok((pdf, name))
    }

    pub async fn create_cover_letter(&self) -> Result<(Vec<u8>, String), AppError> {
        let job = self.job()?;
        let css = self.style_manager.selected_style_css()?;
        let letter = self
            .writer
            .write_cover_letter(&self.resume, &job.parsed)
            .await?;
        let today = chrono::Local::now().date_naive();
        let html = self
            .generator
            .create_cover_letter(&css, &letter, &job.parsed, today)?;
        let pdf = self.driver()?.render_pdf(&html).await?;

        let name = format!("cover_letter_{}", job.slug());
        self.save(&name, &pdf).await;
        Ok((pdf, name))
    }

    /// Best-effort copy to disk; the caller still receives the bytes on failure.
    async fn save(&self, name: &str, pdf: &[u8]) {
        let path = self.output_path.join(format!("{name}.pdf"));
        match write_file(&self.output_path, &path, pdf).await {
            Ok(()) => info!("Saved {} ({} bytes)", path.display(), pdf.len()),
            Err(e) => warn!("Could not save {}: {e}", path.display()),
        }
    }
}

/// False for localhost names and for loopback, private, link-local or
/// unspecified IP literals. Hostnames are not resolved here.
fn is_public_host(url: &Url) -> bool {
    let Some(host) = url.host_str() else {
        return false;
    };
    let host = host.trim_end_matches('.').to_ascii_lowercase();
    if host == "localhost" || host.ends_with(".localhost") {
        return false;
    }
    match host.trim_start_matches('[').trim_end_matches(']').parse::<IpAddr>() {
        Ok(IpAddr::V4(ip)) => is_public_v4(ip),
        Ok(IpAddr::V6(ip)) => is_public_v6(ip),
        Err(_) => true,
    }
}

fn is_public_v4(ip: Ipv4Addr) -> bool {
    !(ip.is_loopback() || ip.is_private() || ip.is_link_local() || ip.is_unspecified())
}

fn is_public_v6(ip: Ipv6Addr) -> bool {
    if let Some(v4) = ip.to_ipv4_mapped() {
        return is_public_v4(v4);
    }
    let first = ip.segments()[0];
    let unique_local = first & 0xfe00 == 0xfc00;
    let link_local = first & 0xffc0 == 0xfe80;
    !(ip.is_loopback() || ip.is_unspecified() || unique_local || link_local)
}

async fn write_file(dir: &Path, path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    tokio::fs::create_dir_all(dir).await?;
    tokio::fs::write(path, bytes).await
}
