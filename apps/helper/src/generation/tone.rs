//! Tone calibration: maps the detected job posting tone to verb sets used in
//! tailoring and cover letter prompts.

use serde::{Deserialize, Serialize};

/// Detected tone of a job posting. Drives verb selection in generation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobTone {
    AggressiveStartup,
    #[default]
    CollaborativeEnterprise,
    ResearchOriented,
    ProductOriented,
}

/// Verb sets calibrated to a specific tone.
#[derive(Debug, Clone)]
pub struct ToneExamples {
    pub strong_verbs: &'static [&'static str],
    pub avoid_verbs: &'static [&'static str],
    /// Register for the cover letter's voice.
    pub letter_voice: &'static str,
}

pub fn get_tone_examples(tone: JobTone) -> ToneExamples {
    match tone {
        JobTone::AggressiveStartup => ToneExamples {
            strong_verbs: &["Built", "Shipped", "Launched", "Drove", "Led", "Scaled"],
            avoid_verbs: &["assisted", "helped", "participated in"],
            letter_voice: "direct and energetic, emphasising ownership and speed",
        },
        JobTone::CollaborativeEnterprise => ToneExamples {
            strong_verbs: &[
                "Contributed to",
                "Partnered with",
                "Collaborated on",
                "Enabled",
                "Facilitated",
            ],
            avoid_verbs: &["spearheaded", "disrupted", "single-handedly"],
            letter_voice: "professional and team-oriented, emphasising reliability",
        },
        JobTone::ResearchOriented => ToneExamples {
            strong_verbs: &["Investigated", "Analyzed", "Evaluated", "Published", "Proposed"],
            avoid_verbs: &["shipped", "moved fast", "disrupted"],
            letter_voice: "precise and curious, emphasising rigour and findings",
        },
        JobTone::ProductOriented => ToneExamples {
            strong_verbs: &["Shipped", "Delivered", "Improved", "Launched", "Simplified"],
            avoid_verbs: &["investigated", "theorized"],
            letter_voice: "user-focused, emphasising delivered outcomes",
        },
    }
}

impl ToneExamples {
    /// One-paragraph tone guidance embedded in prompts.
    pub fn prompt_hint(&self) -> String {
        format!(
            "Prefer verbs such as: {}. Avoid: {}. Voice: {}.",
            self.strong_verbs.join(", "),
            self.avoid_verbs.join(", "),
            self.letter_voice
        )
    }
}
