use std::future::Future;
use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use chromiumoxide::cdp::browser_protocol::page::PrintToPdfParams;
use chromiumoxide::{Browser, BrowserConfig};
use futures::StreamExt;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use super::{BrowserError, Driver, JobPage, JobReader, PdfRenderer};

/// Returns the text of the page body, or an empty string for body-less documents.
const BODY_TEXT_SCRIPT: &str = "document.body ? document.body.innerText : ''";

/// US letter in inches, the page size Chromium uses when the stylesheet sets none.
const PAPER_WIDTH_IN: f64 = 8.5;
const PAPER_HEIGHT_IN: f64 = 11.0;

/// A launched headless browser. One instance serves a single generation
/// request and is closed when the request finishes.
pub struct ChromeDriver {
    browser: Mutex<Browser>,
    handler: JoinHandle<()>,
    timeout: Duration,
}

/// Launches a headless browser.
pub async fn init_browser(
    executable: Option<&Path>,
    timeout: Duration,
) -> Result<ChromeDriver, BrowserError> {
    info!("Launching headless browser...");

    let mut builder = BrowserConfig::builder().new_headless_mode().args(vec![
        "--disable-gpu",
        "--no-sandbox",
        "--disable-dev-shm-usage",
        "--remote-debugging-port=0",
    ]);
    if let Some(path) = executable {
        debug!("Using browser executable {}", path.display());
        builder = builder.chrome_executable(path);
    }
    let config = builder.build().map_err(|e| {
        error!("Browser configuration failed: {e}");
        BrowserError::Launch(e)
    })?;

    let (browser, mut handler) = Browser::launch(config).await.map_err(|e| {
        error!("Browser launch failed: {e}");
        BrowserError::Launch(e.to_string())
    })?;

    // The handler stream must be polled for the connection to make progress
    let handler = tokio::spawn(async move {
        while let Some(event) = handler.next().await {
            if event.is_err() {
                break;
            }
        }
    });

    info!("Headless browser ready");
    Ok(ChromeDriver {
        browser: Mutex::new(browser),
        handler,
        timeout,
    })
}

impl ChromeDriver {
    async fn with_timeout<T, F>(&self, fut: F) -> Result<T, BrowserError>
    where
        F: Future<Output = Result<T, BrowserError>>,
    {
        tokio::time::timeout(self.timeout, fut)
            .await
            .map_err(|_| BrowserError::Timeout {
                secs: self.timeout.as_secs(),
            })?
    }
}

#[async_trait]
impl Driver for ChromeDriver {
    /// Closes the browser process and stops the event handler.
    async fn close(&self) {
        let mut browser = self.browser.lock().await;
        if let Err(e) = browser.close().await {
            warn!("Browser close failed: {e}");
        }
        if let Err(e) = browser.wait().await {
            warn!("Waiting for browser exit failed: {e}");
        }
        self.handler.abort();
        debug!("Browser closed");
    }
}

#[async_trait]
impl PdfRenderer for ChromeDriver {
    async fn render_pdf(&self, html: &str) -> Result<Vec<u8>, BrowserError> {
        self.with_timeout(async {
            let browser = self.browser.lock().await;
            let page = browser
                .new_page("about:blank")
                .await
                .map_err(|e| BrowserError::Page(format!("creating page: {e}")))?;
            page.set_content(html).await?;

            let params = PrintToPdfParams {
                print_background: Some(true),
                prefer_css_page_size: Some(true),
                paper_width: Some(PAPER_WIDTH_IN),
                paper_height: Some(PAPER_HEIGHT_IN),
                ..Default::default()
            };
            let pdf = page.pdf(params).await?;
            if let Err(e) = page.close().await {
                warn!("Closing render page failed: {e}");
            }

            debug!("Rendered PDF ({} bytes)", pdf.len());
            Ok(pdf)
        })
        .await
    }
}

#[async_trait]
impl JobReader for ChromeDriver {
    async fn read_job_page(&self, url: &str) -> Result<JobPage, BrowserError> {
        self.with_timeout(async {
            let browser = self.browser.lock().await;
            info!("Opening job posting {url}");
            let page = browser
                .new_page(url)
                .await
                .map_err(|e| BrowserError::Navigation {
                    url: url.to_string(),
                    message: e.to_string(),
                })?;

            let title = page.get_title().await.ok().flatten();
            let text: String = page.evaluate(BODY_TEXT_SCRIPT).await?.into_value()?;
            if let Err(e) = page.close().await {
                warn!("Closing job page failed: {e}");
            }

            debug!("Job page {url}: title={title:?}, {} chars", text.len());
            Ok(JobPage {
                url: url.to_string(),
                title,
                text,
            })
        })
        .await
    }
}
