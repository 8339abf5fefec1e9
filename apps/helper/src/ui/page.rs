//! Server-rendered form page.

use std::fmt::Write as _;

use crate::generation::generator::escape_html;
use crate::generation::Action;

pub const PAGE_TITLE: &str = "Job Application Helper";
pub const NO_STYLES_WARNING: &str = "No styles available";
pub const ACCEPTED_EXTENSIONS: &[&str] = &["txt", "yaml", "yml", "pdf"];

const PAGE_CSS: &str = "\
body{font-family:system-ui,sans-serif;max-width:44rem;margin:2rem auto;padding:0 1rem;color:#222}\
label{display:block;margin-top:1rem;font-weight:600}\
input,select{width:100%;padding:.4rem;margin-top:.25rem;box-sizing:border-box}\
button{margin-top:1.5rem;padding:.6rem 1.4rem;font-size:1rem}\
.error{background:#fde8e8;border:1px solid #e0a0a0;padding:.75rem;border-radius:4px}\
.warning{background:#fff6db;border:1px solid #e6cf80;padding:.75rem;border-radius:4px}";

/// Values echoed back into the form after a failed submission.
#[derive(Debug, Clone, Default)]
pub struct FormView {
    pub styles: Vec<String>,
    pub selected_style: Option<String>,
    pub selected_action: Option<Action>,
    pub job_url: String,
    pub error: Option<String>,
}

pub fn render_form(view: &FormView) -> String {
    let mut html = String::new();
    let _ = write!(
        html,
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{PAGE_TITLE}</title>\n<style>{PAGE_CSS}</style>\n</head>\n<body>\n\
         <h1>{PAGE_TITLE}</h1>\n"
    );

    if let Some(error) = &view.error {
        let _ = writeln!(
            html,
            "<div class=\"error\" role=\"alert\">{}</div>",
            escape_html(error)
        );
    }

    html.push_str(
        "<form method=\"post\" action=\"/generate\" enctype=\"multipart/form-data\">\n\
         <label for=\"api_key\">LLM API Key</label>\n\
         <input type=\"password\" id=\"api_key\" name=\"api_key\" autocomplete=\"off\">\n",
    );

    if view.styles.is_empty() {
        let _ = writeln!(html, "<p class=\"warning\">{NO_STYLES_WARNING}</p>");
        html.push_str("<input type=\"hidden\" name=\"style\" value=\"\">\n");
    } else {
        html.push_str("<label for=\"style\">Select style</label>\n<select id=\"style\" name=\"style\">\n");
        for style in &view.styles {
            let selected = if view.selected_style.as_deref() == Some(style.as_str()) {
                " selected"
            } else {
                ""
            };
            let escaped = escape_html(style);
            let _ = writeln!(html, "<option value=\"{escaped}\"{selected}>{escaped}</option>");
        }
        html.push_str("</select>\n");
    }

    html.push_str("<label for=\"action\">Select action</label>\n<select id=\"action\" name=\"action\">\n");
    for action in Action::ALL {
        let selected = if view.selected_action == Some(action) {
            " selected"
        } else {
            ""
        };
        let label = escape_html(action.label());
        let _ = writeln!(html, "<option value=\"{label}\"{selected}>{label}</option>");
    }
    html.push_str("</select>\n");

    let accept = ACCEPTED_EXTENSIONS
        .iter()
        .map(|e| format!(".{e}"))
        .collect::<Vec<_>>()
        .join(",");
    let _ = write!(
        html,
        "<label for=\"resume\">Upload plain text resume</label>\n\
         <input type=\"file\" id=\"resume\" name=\"resume\" accept=\"{accept}\">\n\
         <label for=\"job_url\">Job URL</label>\n\
         <input type=\"url\" id=\"job_url\" name=\"job_url\" value=\"{}\">\n\
         <button type=\"submit\">Generate</button>\n</form>\n</body>\n</html>\n",
        escape_html(&view.job_url)
    );

    html
}
