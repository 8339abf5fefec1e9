// LLM prompt constants for the generation module.
// Reuses cross-cutting fragments from llm_client::prompts.

/// System prompt for job posting analysis.
pub const JOB_PARSE_SYSTEM: &str = "You are an expert recruiter who reads job postings \
    and extracts the facts a candidate needs to tailor an application.";

/// Job posting analysis prompt. Replace `{job_text}` before sending.
pub const JOB_PARSE_PROMPT_TEMPLATE: &str = r#"The text below was captured from a job posting web page. It may contain navigation menus, cookie banners and unrelated links; ignore them.

Return a JSON object with this EXACT schema:
{
  "company": "Hiring company name, or empty string if unknown",
  "role": "Job title as advertised, or empty string if unknown",
  "summary": "Three to five sentences describing the role, team and main responsibilities",
  "keywords": ["Rust", "distributed systems"],
  "detected_tone": "CollaborativeEnterprise"
}

TONE OPTIONS (pick exactly one):
- "AggressiveStartup": "own", "drive", "move fast", "spearhead", "disrupt"
- "CollaborativeEnterprise": "partner", "collaborate", "contribute", "support teams"
- "ResearchOriented": "investigate", "publish", "evaluate", "propose"
- "ProductOriented": "ship", "launch", "deliver", "improve user experience"

KEYWORDS: the skills, tools and qualifications the posting asks for, most important first, at most 15.

JOB POSTING TEXT:
{job_text}"#;

/// System prompt for resume tailoring.
pub const TAILOR_SYSTEM: &str = "You are an expert resume writer who tailors a candidate's \
    resume to a specific job without misrepresenting the candidate.";

/// Resume tailoring prompt.
/// Replace: {grounding_instruction}, {tone_hint}, {job_summary}, {keywords}, {resume}
pub const TAILOR_PROMPT_TEMPLATE: &str = r#"{grounding_instruction}

TONE CALIBRATION for this role:
{tone_hint}

JOB SUMMARY:
{job_summary}

JOB KEYWORDS:
{keywords}

CANDIDATE RESUME:
{resume}

Return a JSON object:
{
  "summary": "A three to four sentence professional summary aimed at this job",
  "highlighted_skills": ["Skills from the resume most relevant to this job, most relevant first, at most 12"]
}

Only list skills that appear in the resume."#;

/// System prompt for cover letters. Output is plain prose.
pub const COVER_LETTER_SYSTEM: &str = "You are an expert career writer. \
    Write in plain text paragraphs separated by blank lines. \
    Do NOT use markdown. Do NOT include a greeting, sign-off, address block or date.";

/// Cover letter prompt.
/// Replace: {grounding_instruction}, {tone_hint}, {company}, {role}, {job_summary}, {resume}
pub const COVER_LETTER_PROMPT_TEMPLATE: &str = r#"{grounding_instruction}

TONE CALIBRATION for this role:
{tone_hint}

Write the body of a cover letter for the role of {role} at {company}.

JOB SUMMARY:
{job_summary}

CANDIDATE RESUME:
{resume}

Write three or four short paragraphs: why this role, the two or three most relevant experiences, and a closing line inviting further conversation."#;

/// Substitutes `{name}` placeholders in one pass. Inserted values are never
/// scanned again; braces that do not name a known placeholder are kept.
pub fn fill_template(template: &str, vars: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        let hit = after.find('}').and_then(|end| {
            let key = &after[..end];
            vars.iter()
                .find(|(name, _)| *name == key)
                .map(|(_, value)| (end, *value))
        });
        match hit {
            Some((end, value)) => {
                out.push_str(value);
                rest = &after[end + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}
