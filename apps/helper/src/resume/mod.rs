//! Resume model: parses the uploaded plain-text resume.
//!
//! Structured resumes are YAML documents with the sections below. Anything
//! that is not a YAML mapping with at least one known section is kept as a
//! free-text resume and rendered as paragraphs.

use std::collections::BTreeMap;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

use crate::errors::AppError;

const KNOWN_SECTIONS: &[&str] = &[
    "personal_information",
    "education_details",
    "experience_details",
    "projects",
    "achievements",
    "certifications",
    "languages",
    "interests",
];

#[derive(Debug, Clone, PartialEq)]
pub enum Resume {
    Structured(Box<StructuredResume>),
    Plain(String),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StructuredResume {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub personal_information: Option<PersonalInformation>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub education_details: Vec<Education>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub experience_details: Vec<Experience>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub projects: Vec<Project>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub achievements: Vec<Achievement>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub certifications: Vec<Achievement>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub languages: Vec<Language>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub interests: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersonalInformation {
    pub name: Option<String>,
    pub surname: Option<String>,
    pub email: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub phone_prefix: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub phone: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub linkedin: Option<String>,
    pub github: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Education {
    pub education_level: Option<String>,
    pub institution: Option<String>,
    pub field_of_study: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub final_evaluation_grade: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub start_date: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub year_of_completion: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Experience {
    pub position: Option<String>,
    pub company: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub employment_period: Option<String>,
    pub location: Option<String>,
    pub industry: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub key_responsibilities: Vec<TextItem>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub skills_acquired: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Project {
    pub name: Option<String>,
    pub description: Option<String>,
    pub link: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Achievement {
    pub name: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Language {
    pub language: Option<String>,
    pub proficiency: Option<String>,
}

/// A bullet that may be written either as a bare string or as a one-key
/// mapping (`- responsibility_1: "Built the thing"`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TextItem {
    Text(String),
    Keyed(BTreeMap<String, String>),
}

impl TextItem {
    pub fn text(&self) -> String {
        match self {
            TextItem::Text(s) => s.clone(),
            TextItem::Keyed(map) => map.values().cloned().collect::<Vec<_>>().join(" "),
        }
    }
}

impl Resume {
    pub fn parse(text: &str) -> Result<Self, AppError> {
        let text = text.trim_start_matches('\u{feff}');
        if text.trim().is_empty() {
            return Err(AppError::Validation("Resume text is empty".to_string()));
        }

        match serde_yaml::from_str::<serde_yaml::Value>(text) {
            Ok(serde_yaml::Value::Mapping(map)) => {
                let has_known_section = map
                    .keys()
                    .filter_map(|k| k.as_str())
                    .any(|k| KNOWN_SECTIONS.contains(&k));
                if !has_known_section {
                    return Ok(Resume::Plain(text.trim().to_string()));
                }
                serde_yaml::from_value::<StructuredResume>(serde_yaml::Value::Mapping(map))
                    .map(|r| Resume::Structured(Box::new(r)))
                    .map_err(|e| AppError::Validation(format!("Invalid resume YAML: {e}")))
            }
            Ok(_) => Ok(Resume::Plain(text.trim().to_string())),
            Err(e) if looks_structured(text) => {
                Err(AppError::Validation(format!("Invalid resume YAML: {e}")))
            }
            Err(_) => Ok(Resume::Plain(text.trim().to_string())),
        }
    }

    /// "Name Surname", or "Resume" when the resume carries no name.
    pub fn display_name(&self) -> String {
        let info = match self {
            Resume::Structured(r) => r.personal_information.as_ref(),
            Resume::Plain(_) => None,
        };
        let parts: Vec<&str> = info
            .into_iter()
            .flat_map(|p| [p.name.as_deref(), p.surname.as_deref()])
            .flatten()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect();
        if parts.is_empty() {
            "Resume".to_string()
        } else {
            parts.join(" ")
        }
    }

    /// All skills listed across experiences, first occurrence order, no duplicates.
    pub fn skills(&self) -> Vec<String> {
        let Resume::Structured(r) = self else {
            return Vec::new();
        };
        let mut seen = std::collections::HashSet::new();
        r.experience_details
            .iter()
            .flat_map(|e| e.skills_acquired.iter())
            .filter(|s| seen.insert(s.to_lowercase()))
            .cloned()
            .collect()
    }

    /// Canonical text handed to the LLM.
    pub fn to_prompt_text(&self) -> String {
        match self {
            Resume::Structured(r) => {
                serde_yaml::to_string(r.as_ref()).unwrap_or_else(|_| format!("{r:?}"))
            }
            Resume::Plain(text) => text.clone(),
        }
    }
}

/// Accepts scalars of any type for free-text fields, so `year_of_completion: 2020`
/// and `phone: 5550100` parse the same as their quoted forms.
fn lenient_string<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    use serde_yaml::Value;

    match Option::<Value>::deserialize(d)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(Value::Bool(b)) => Ok(Some(b.to_string())),
        Some(other) => Err(D::Error::custom(format!(
            "expected a text value, found {other:?}"
        ))),
    }
}

/// True when the first meaningful line opens a known resume section.
fn looks_structured(text: &str) -> bool {
    text.lines()
        .map(str::trim)
        .find(|l| !l.is_empty() && !l.starts_with('#') && l != &"---")
        .and_then(|l| l.split_once(':'))
        .map(|(key, _)| KNOWN_SECTIONS.contains(&key.trim()))
        .unwrap_or(false)
}
