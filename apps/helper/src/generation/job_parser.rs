//! Job parser: turns a captured job posting page into a structured `ParsedJob`.

use reqwest::Url;
use serde::{Deserialize, Serialize};

use crate::browser::JobPage;
use crate::generation::prompts::{fill_template, JOB_PARSE_PROMPT_TEMPLATE, JOB_PARSE_SYSTEM};
use crate::generation::tone::JobTone;
use crate::llm_client::prompts::JSON_ONLY_SYSTEM;
use crate::llm_client::{LlmClient, LlmError};

/// Posting text beyond this is dropped before prompting.
const MAX_JOB_TEXT_CHARS: usize = 15_000;
const MAX_SLUG_CHARS: usize = 60;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParsedJob {
    pub company: String,
    pub role: String,
    pub summary: String,
    pub keywords: Vec<String>,
    pub detected_tone: JobTone,
}

/// Asks the LLM to extract company, role, summary, keywords and tone.
pub async fn parse_job(page: &JobPage, llm: &LlmClient) -> Result<ParsedJob, LlmError> {
    let mut text = truncate_chars(page.text.trim(), MAX_JOB_TEXT_CHARS).to_string();
    if let Some(title) = page.title.as_deref().filter(|t| !t.trim().is_empty()) {
        text = format!("PAGE TITLE: {title}\n\n{text}");
    }
    let prompt = fill_template(JOB_PARSE_PROMPT_TEMPLATE, &[("job_text", &text)]);
    let system = format!("{JOB_PARSE_SYSTEM} {JSON_ONLY_SYSTEM}");
    llm.call_json::<ParsedJob>(&prompt, &system).await
}

fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// File-name-safe identifier for a job: `company-role`, or the URL host when
/// the posting yielded neither.
pub fn output_slug(job: &ParsedJob, url: &str) -> String {
    let slug = slugify(&format!("{} {}", job.company, job.role));
    if !slug.is_empty() {
        return slug;
    }
    let host = Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(|h| h.trim_start_matches("www.").to_string()))
        .unwrap_or_default();
    let slug = slugify(&host);
    if slug.is_empty() {
        "job".to_string()
    } else {
        slug
    }
}

fn slugify(text: &str) -> String {
    let mut slug = String::new();
    for word in text
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|w| !w.is_empty())
    {
        let word = word.to_ascii_lowercase();
        let sep = usize::from(!slug.is_empty());
        if slug.len() + sep + word.len() > MAX_SLUG_CHARS {
            if slug.is_empty() {
                slug.push_str(&word[..MAX_SLUG_CHARS]);
            }
            break;
        }
        if sep == 1 {
            slug.push('-');
        }
        slug.push_str(&word);
    }
    slug
}
