use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::AppError;

/// What the user asked to generate. The form posts the label verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Action {
    Resume,
    TailoredResume,
    TailoredCoverLetter,
}

impl Action {
    pub const ALL: [Action; 3] = [
        Action::Resume,
        Action::TailoredResume,
        Action::TailoredCoverLetter,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Action::Resume => "Generate Resume",
            Action::TailoredResume => "Generate Resume Tailored for Job Description",
            Action::TailoredCoverLetter => "Generate Tailored Cover Letter for Job Description",
        }
    }

    /// Tailored actions read the job posting first.
    pub fn needs_job(self) -> bool {
        !matches!(self, Action::Resume)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Action {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Action::ALL
            .into_iter()
            .find(|a| a.label() == s)
            .ok_or_else(|| AppError::Validation(format!("Unknown action '{s}'")))
    }
}

impl TryFrom<String> for Action {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Action> for String {
    fn from(action: Action) -> Self {
        action.label().to_string()
    }
}
