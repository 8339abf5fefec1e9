//! Content writer: the LLM-backed half of tailoring. The facade only sees
//! the `ContentWriter` trait; `LlmWriter` is the production implementation.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::browser::JobPage;
use crate::errors::AppError;
use crate::generation::job_parser::{parse_job, ParsedJob};
use crate::generation::prompts::{
    fill_template, COVER_LETTER_PROMPT_TEMPLATE, COVER_LETTER_SYSTEM, TAILOR_PROMPT_TEMPLATE,
    TAILOR_SYSTEM,
};
use crate::generation::tone::get_tone_examples;
use crate::llm_client::prompts::{GROUNDING_INSTRUCTION, JSON_ONLY_SYSTEM};
use crate::llm_client::LlmClient;
use crate::resume::Resume;

/// Job-specific additions rendered on top of the base resume.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TailoredResume {
    pub summary: String,
    pub highlighted_skills: Vec<String>,
}

#[async_trait]
pub trait ContentWriter: Send + Sync {
    async fn analyze_job(&self, page: &JobPage) -> Result<ParsedJob, AppError>;

    async fn tailor_resume(
        &self,
        resume: &Resume,
        job: &ParsedJob,
    ) -> Result<TailoredResume, AppError>;

    /// Returns the letter body as plain-text paragraphs.
    async fn write_cover_letter(&self, resume: &Resume, job: &ParsedJob)
        -> Result<String, AppError>;
}

pub struct LlmWriter {
    llm: LlmClient,
}

impl LlmWriter {
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl ContentWriter for LlmWriter {
    async fn analyze_job(&self, page: &JobPage) -> Result<ParsedJob, AppError> {
        let parsed = parse_job(page, &self.llm)
            .await
            .map_err(|e| AppError::Llm(format!("Job description parsing failed: {e}")))?;
        info!(
            "Job parsed: company={:?}, role={:?}, tone={:?}",
            parsed.company, parsed.role, parsed.detected_tone
        );
        Ok(parsed)
    }

    async fn tailor_resume(
        &self,
        resume: &Resume,
        job: &ParsedJob,
    ) -> Result<TailoredResume, AppError> {
        let prompt = tailor_prompt(resume, job);
        let system = format!("{TAILOR_SYSTEM} {JSON_ONLY_SYSTEM}");

        let tailored: TailoredResume = self
            .llm
            .call_json(&prompt, &system)
            .await
            .map_err(|e| AppError::Llm(format!("Resume tailoring failed: {e}")))?;
        Ok(keep_known_skills(tailored, resume))
    }

    async fn write_cover_letter(
        &self,
        resume: &Resume,
        job: &ParsedJob,
    ) -> Result<String, AppError> {
        let prompt = cover_letter_prompt(resume, job);
        self.llm
            .call_text(&prompt, COVER_LETTER_SYSTEM)
            .await
            .map_err(|e| AppError::Llm(format!("Cover letter generation failed: {e}")))
    }
}

fn tailor_prompt(resume: &Resume, job: &ParsedJob) -> String {
    fill_template(
        TAILOR_PROMPT_TEMPLATE,
        &[
            ("grounding_instruction", GROUNDING_INSTRUCTION),
            ("tone_hint", &get_tone_examples(job.detected_tone).prompt_hint()),
            ("job_summary", &job.summary),
            ("keywords", &job.keywords.join(", ")),
            ("resume", &resume.to_prompt_text()),
        ],
    )
}

fn cover_letter_prompt(resume: &Resume, job: &ParsedJob) -> String {
    fill_template(
        COVER_LETTER_PROMPT_TEMPLATE,
        &[
            ("grounding_instruction", GROUNDING_INSTRUCTION),
            ("tone_hint", &get_tone_examples(job.detected_tone).prompt_hint()),
            ("company", non_empty_or(&job.company, "the company")),
            ("role", non_empty_or(&job.role, "the advertised position")),
            ("job_summary", &job.summary),
            ("resume", &resume.to_prompt_text()),
        ],
    )
}

fn non_empty_or<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if value.trim().is_empty() {
        fallback
    } else {
        value
    }
}

/// Drops highlighted skills the resume never lists. Resumes without skill
/// lists are matched against their full text instead.
fn keep_known_skills(mut tailored: TailoredResume, resume: &Resume) -> TailoredResume {
    let known: Vec<String> = resume.skills().iter().map(|s| s.to_lowercase()).collect();
    let haystack = resume.to_prompt_text().to_lowercase();
    tailored.highlighted_skills.retain(|s| {
        let needle = s.trim().to_lowercase();
        if needle.is_empty() {
            return false;
        }
        match resume {
            Resume::Structured(_) if !known.is_empty() => known.contains(&needle),
            _ => haystack.contains(&needle),
        }
    });
    tailored
}
