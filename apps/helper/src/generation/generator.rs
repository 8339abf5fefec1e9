//! Resume Generator: renders resumes and cover letters as standalone HTML
//! documents with the selected style inlined. The browser driver prints the
//! result to PDF.

use std::fmt::Write as _;

use chrono::NaiveDate;

use crate::errors::AppError;
use crate::generation::job_parser::ParsedJob;
use crate::generation::writer::TailoredResume;
use crate::resume::{Resume, StructuredResume};

#[derive(Debug, Clone, Default)]
pub struct ResumeGenerator {
    resume: Option<Resume>,
}

impl ResumeGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_resume_object(&mut self, resume: Resume) {
        self.resume = Some(resume);
    }

    fn resume(&self) -> Result<&Resume, AppError> {
        self.resume
            .as_ref()
            .ok_or_else(|| AppError::Validation("No resume loaded".to_string()))
    }

    /// The resume as written, with no job-specific content.
    pub fn create_resume(&self, css: &str) -> Result<String, AppError> {
        let resume = self.resume()?;
        Ok(document(&resume.display_name(), css, &resume_body(resume, None)))
    }

    /// The resume with a job-specific summary and skill highlights.
    pub fn create_resume_tailored(
        &self,
        css: &str,
        tailored: &TailoredResume,
    ) -> Result<String, AppError> {
        let resume = self.resume()?;
        Ok(document(
            &resume.display_name(),
            css,
            &resume_body(resume, Some(tailored)),
        ))
    }

    /// A cover letter. `letter` is plain text with blank-line separated paragraphs.
    pub fn create_cover_letter(
        &self,
        css: &str,
        letter: &str,
        job: &ParsedJob,
        date: NaiveDate,
    ) -> Result<String, AppError> {
        let resume = self.resume()?;
        let name = resume.display_name();

        let mut body = String::from("<main id=\"cover-letter\">\n");
        body.push_str(&header(resume));
        let _ = writeln!(
            body,
            "<p class=\"date\">{}</p>",
            date.format("%B %-d, %Y")
        );
        let recipient = if job.company.trim().is_empty() {
            "Hiring Team".to_string()
        } else {
            format!("Hiring Team, {}", job.company.trim())
        };
        let _ = writeln!(body, "<p class=\"recipient\">{}</p>", escape_html(&recipient));
        if !job.role.trim().is_empty() {
            let _ = writeln!(
                body,
                "<p class=\"subject\">Re: {}</p>",
                escape_html(job.role.trim())
            );
        }
        body.push_str("<p>Dear Hiring Manager,</p>\n");
        body.push_str(&paragraphs(letter));
        let _ = writeln!(
            body,
            "<p class=\"closing\">Sincerely,<br>{}</p>",
            escape_html(&name)
        );
        body.push_str("</main>\n");

        Ok(document(&format!("Cover Letter - {name}"), css, &body))
    }
}

fn document(title: &str, css: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{}</title>\n<style>\n{css}\n</style>\n</head>\n<body>\n{body}</body>\n</html>\n",
        escape_html(title)
    )
}

fn resume_body(resume: &Resume, tailored: Option<&TailoredResume>) -> String {
    let mut body = String::from("<main id=\"resume\">\n");
    body.push_str(&header(resume));

    if let Some(t) = tailored {
        if !t.summary.trim().is_empty() {
            body.push_str(&section("Summary", &paragraphs(&t.summary)));
        }
        if !t.highlighted_skills.is_empty() {
            body.push_str(&section("Key Skills", &list(&t.highlighted_skills)));
        }
    }

    match resume {
        Resume::Structured(r) => body.push_str(&structured_sections(r)),
        Resume::Plain(text) => body.push_str(&section("Profile", &paragraphs(text))),
    }

    body.push_str("</main>\n");
    body
}

fn header(resume: &Resume) -> String {
    let mut out = format!(
        "<header>\n<h1 class=\"name\">{}</h1>\n",
        escape_html(&resume.display_name())
    );
    if let Resume::Structured(r) = resume {
        if let Some(p) = &r.personal_information {
            let phone = match (&p.phone_prefix, &p.phone) {
                (Some(prefix), Some(phone)) => Some(format!("{prefix} {phone}")),
                (None, Some(phone)) => Some(phone.clone()),
                _ => None,
            };
            let location = [p.city.as_deref(), p.country.as_deref()]
                .into_iter()
                .flatten()
                .collect::<Vec<_>>()
                .join(", ");
            let contact: Vec<String> = [
                p.email.clone(),
                phone,
                Some(location),
                p.linkedin.clone(),
                p.github.clone(),
            ]
            .into_iter()
            .flatten()
            .filter(|s| !s.trim().is_empty())
            .map(|s| format!("<span>{}</span>", escape_html(&s)))
            .collect();
            if !contact.is_empty() {
                let _ = writeln!(out, "<p class=\"contact\">{}</p>", contact.join(" | "));
            }
        }
    }
    out.push_str("</header>\n");
    out
}

fn structured_sections(r: &StructuredResume) -> String {
    let mut out = String::new();

    if !r.experience_details.is_empty() {
        let mut html = String::new();
        for exp in &r.experience_details {
            html.push_str("<div class=\"entry\">\n");
            let title = join_present(&[exp.position.as_deref(), exp.company.as_deref()], " - ");
            let meta = join_present(
                &[exp.employment_period.as_deref(), exp.location.as_deref()],
                " | ",
            );
            entry_heading(&mut html, &title, &meta);
            let bullets: Vec<String> = exp.key_responsibilities.iter().map(|b| b.text()).collect();
            if !bullets.is_empty() {
                html.push_str(&list(&bullets));
            }
            if !exp.skills_acquired.is_empty() {
                let _ = writeln!(
                    html,
                    "<p class=\"skills\">{}</p>",
                    escape_html(&exp.skills_acquired.join(", "))
                );
            }
            html.push_str("</div>\n");
        }
        out.push_str(&section("Experience", &html));
    }

    if !r.education_details.is_empty() {
        let mut html = String::new();
        for edu in &r.education_details {
            html.push_str("<div class=\"entry\">\n");
            let title = join_present(
                &[edu.education_level.as_deref(), edu.field_of_study.as_deref()],
                " in ",
            );
            let period = join_present(
                &[edu.start_date.as_deref(), edu.year_of_completion.as_deref()],
                " - ",
            );
            let meta = join_present(&[edu.institution.as_deref(), Some(period.as_str())], " | ");
            entry_heading(&mut html, &title, &meta);
            if let Some(grade) = edu.final_evaluation_grade.as_deref() {
                let _ = writeln!(html, "<p>Grade: {}</p>", escape_html(grade));
            }
            html.push_str("</div>\n");
        }
        out.push_str(&section("Education", &html));
    }

    if !r.projects.is_empty() {
        let items: Vec<String> = r
            .projects
            .iter()
            .map(|p| {
                let mut item = join_present(&[p.name.as_deref(), p.description.as_deref()], ": ");
                if let Some(link) = p.link.as_deref().filter(|l| !l.trim().is_empty()) {
                    item = format!("{item} ({link})");
                }
                item
            })
            .collect();
        out.push_str(&section("Projects", &list(&items)));
    }

    for (title, entries) in [
        ("Achievements", &r.achievements),
        ("Certifications", &r.certifications),
    ] {
        if !entries.is_empty() {
            let items: Vec<String> = entries
                .iter()
                .map(|a| join_present(&[a.name.as_deref(), a.description.as_deref()], ": "))
                .collect();
            out.push_str(&section(title, &list(&items)));
        }
    }

    if !r.languages.is_empty() {
        let items: Vec<String> = r
            .languages
            .iter()
            .map(|l| join_present(&[l.language.as_deref(), l.proficiency.as_deref()], " - "))
            .collect();
        out.push_str(&section("Languages", &list(&items)));
    }

    if !r.interests.is_empty() {
        out.push_str(&section(
            "Interests",
            &format!("<p>{}</p>\n", escape_html(&r.interests.join(", "))),
        ));
    }

    out
}

fn entry_heading(html: &mut String, title: &str, meta: &str) {
    if !title.is_empty() {
        let _ = writeln!(html, "<h3>{}</h3>", escape_html(title));
    }
    if !meta.is_empty() {
        let _ = writeln!(html, "<p class=\"meta\">{}</p>", escape_html(meta));
    }
}

fn section(title: &str, inner: &str) -> String {
    format!(
        "<section>\n<h2>{}</h2>\n{inner}</section>\n",
        escape_html(title)
    )
}

fn list(items: &[String]) -> String {
    let mut out = String::from("<ul>\n");
    for item in items.iter().filter(|i| !i.trim().is_empty()) {
        let _ = writeln!(out, "<li>{}</li>", escape_html(item.trim()));
    }
    out.push_str("</ul>\n");
    out
}

/// Blank lines separate paragraphs; single newlines become `<br>`.
fn paragraphs(text: &str) -> String {
    let mut out = String::new();
    let normalized = text.replace("\r\n", "\n");
    for para in normalized.split("\n\n").map(str::trim).filter(|p| !p.is_empty()) {
        let lines: Vec<String> = para.lines().map(|l| escape_html(l.trim())).collect();
        let _ = writeln!(out, "<p>{}</p>", lines.join("<br>"));
    }
    out
}

fn join_present(parts: &[Option<&str>], sep: &str) -> String {
    parts
        .iter()
        .flatten()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(sep)
}

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const CSS: &str = "body { font-family: serif; }";

    fn generator(text: &str) -> ResumeGenerator {
        let mut generator = ResumeGenerator::new();
        generator.set_resume_object(Resume::parse(text).unwrap());
        generator
    }

    const YAML: &str = r#"
personal_information:
  name: "Grace"
  surname: "Hopper"
  email: "grace@example.com"
  phone_prefix: "+1"
  phone: "555 0100"
  city: "Arlington"
  country: "USA"
experience_details:
  - position: "Rear Admiral"
    company: "US Navy"
    employment_period: "1943 - 1986"
    key_responsibilities:
      - "Led the <COBOL> effort & more"
    skills_acquired: ["Compilers", "Leadership"]
education_details:
  - education_level: "PhD"
    field_of_study: "Mathematics"
    institution: "Yale"
    year_of_completion: "1934"
languages:
  - language: "English"
    proficiency: "Native"
"#;

    #[test]
    fn test_generator_requires_resume() {
        let err = ResumeGenerator::new().create_resume(CSS).unwrap_err();
        assert_eq!(err.to_string(), "No resume loaded");
    }

    #[test]
    fn test_base_resume_contains_sections_and_css() {
        let html = generator(YAML).create_resume(CSS).unwrap();
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains(CSS));
        assert!(html.contains("<h1 class=\"name\">Grace Hopper</h1>"));
        assert!(html.contains("<span>+1 555 0100</span>"));
        assert!(html.contains("<span>Arlington, USA</span>"));
        assert!(html.contains("<h3>Rear Admiral - US Navy</h3>"));
        assert!(html.contains("<h3>PhD in Mathematics</h3>"));
        assert!(html.contains("<p class=\"meta\">Yale | 1934</p>"));
        assert!(html.contains("<li>English - Native</li>"));
        assert!(!html.contains("<h2>Summary</h2>"));
    }

    #[test]
    fn test_user_text_is_escaped() {
        let html = generator(YAML).create_resume(CSS).unwrap();
        assert!(html.contains("<li>Led the &lt;COBOL&gt; effort &amp; more</li>"));
        assert!(!html.contains("<COBOL>"));
    }

    #[test]
    fn test_tailored_resume_adds_summary_and_skills() {
        let tailored = TailoredResume {
            summary: "Compiler pioneer.".to_string(),
            highlighted_skills: vec!["Compilers".to_string()],
        };
        let html = generator(YAML)
            .create_resume_tailored(CSS, &tailored)
            .unwrap();
        let summary = html.find("<h2>Summary</h2>").unwrap();
        let experience = html.find("<h2>Experience</h2>").unwrap();
        assert!(summary < experience);
        assert!(html.contains("<p>Compiler pioneer.</p>"));
        assert!(html.contains("<h2>Key Skills</h2>\n<ul>\n<li>Compilers</li>"));
    }

    #[test]
    fn test_plain_resume_renders_paragraphs() {
        let html = generator("Jane Doe\nEngineer\n\nLoves Rust & Go")
            .create_resume(CSS)
            .unwrap();
        assert!(html.contains("<h2>Profile</h2>"));
        assert!(html.contains("<p>Jane Doe<br>Engineer</p>"));
        assert!(html.contains("<p>Loves Rust &amp; Go</p>"));
    }

    #[test]
    fn test_cover_letter_layout() {
        let job = ParsedJob {
            company: "Acme".to_string(),
            role: "Compiler Engineer".to_string(),
            ..Default::default()
        };
        let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        let html = generator(YAML)
            .create_cover_letter(CSS, "First paragraph.\n\nSecond <b>para</b>.", &job, date)
            .unwrap();
        assert!(html.contains("<title>Cover Letter - Grace Hopper</title>"));
        assert!(html.contains("<p class=\"date\">March 9, 2024</p>"));
        assert!(html.contains("<p class=\"recipient\">Hiring Team, Acme</p>"));
        assert!(html.contains("<p class=\"subject\">Re: Compiler Engineer</p>"));
        assert!(html.contains("<p>First paragraph.</p>\n<p>Second &lt;b&gt;para&lt;/b&gt;.</p>"));
        assert!(html.contains("Sincerely,<br>Grace Hopper"));
    }

    #[test]
    fn test_cover_letter_without_company() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let html = generator(YAML)
            .create_cover_letter(CSS, "Body.", &ParsedJob::default(), date)
            .unwrap();
        assert!(html.contains("<p class=\"recipient\">Hiring Team</p>"));
        assert!(!html.contains("class=\"subject\""));
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("a<b>&\"c'"), "a&lt;b&gt;&amp;&quot;c&#39;");
    }
}
