// Shared prompt fragments. Each pipeline stage keeps its own templates in
// pipeline/prompts.rs; only the cross-cutting pieces live here.

/// System prompt that enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "You are a precise, structured assistant. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT include explanations or apologies.";

/// System prompt for free-form writing tasks.
pub const WRITER_SYSTEM: &str = "You are an expert career and business communication writer. \
    Respond with the requested text only, with no preamble and no closing remarks.";

/// Flat-shape rule appended to every structured extraction prompt.
pub const FLAT_FIELDS_INSTRUCTION: &str = "\
    CRITICAL: every field value MUST be a plain string or an array of plain strings. \
    NEVER return nested objects (for example, write \"2+ years (preferred: 5 years)\" \
    instead of {\"minimum\": \"2+ years\", \"preferred\": \"5 years\"}).";
