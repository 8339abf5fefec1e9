// Shared prompt fragments.
// Each service that needs LLM calls defines its own prompts.rs alongside it.

/// System prompt fragment that enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Appended to every prompt that rewrites candidate material.
pub const GROUNDING_INSTRUCTION: &str = "\
    CRITICAL: Every claim you write must be supported by the resume provided. \
    Do NOT invent employers, titles, dates, degrees, metrics or skills. \
    If the resume does not support a claim, omit it.";
