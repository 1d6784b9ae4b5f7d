//! Job extractor — asks the model for one job posting as JSON, then coerces
//! whatever shape comes back into a flat `JobRecord`.
//!
//! Model output is not trusted. Each field is first classified into a
//! `FieldValue`, and every variant has exactly one coercion rule. Supporting a
//! new shape means adding a variant, not another type check at a call site.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Deserializer, Map, Value};
use thiserror::Error;
use tracing::{debug, warn};

use crate::llm_client::prompts::{FLAT_FIELDS_INSTRUCTION, JSON_ONLY_SYSTEM};
use crate::llm_client::{strip_json_fences, CompletionPrompt, CompletionProvider, LlmError};
use crate::pipeline::models::JobRecord;
use crate::pipeline::prompts::EXTRACT_PROMPT_TEMPLATE;

const EXTRACT_MAX_TOKENS: u32 = 1024;

/// A fenced code block anywhere in the reply, with an optional `json` tag.
static FENCED_BLOCK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```(?:json)?\s*(.*?)```").expect("valid regex"));

/// Role values that mean "the model found no job".
const PLACEHOLDER_ROLES: &[&str] = &[
    "n/a",
    "na",
    "none",
    "null",
    "unknown",
    "not specified",
    "not available",
    "not provided",
];

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("model output is not valid JSON: {0}")]
    MalformedJson(String),

    #[error("model output has no job role")]
    MissingRole,

    #[error("provider error: {0}")]
    Provider(LlmError),
}

impl From<LlmError> for ExtractionError {
    fn from(e: LlmError) -> Self {
        match e {
            // No text is not JSON either.
            LlmError::EmptyContent => {
                ExtractionError::MalformedJson("model returned no content".to_string())
            }
            other => ExtractionError::Provider(other),
        }
    }
}

/// Shape of a single field as the model actually returned it.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// Key missing or `null`.
    Absent,
    Text(String),
    TextList(Vec<FieldValue>),
    /// `{"minimum": .., "preferred": ..}`, as models like to emit for experience.
    Range { minimum: String, preferred: String },
    /// Numbers, booleans and objects without recognizable keys.
    Unknown(Value),
}

impl FieldValue {
    pub fn from_json(value: Option<&Value>) -> Self {
        match value {
            None | Some(Value::Null) => FieldValue::Absent,
            Some(Value::String(s)) => FieldValue::Text(s.clone()),
            Some(Value::Array(items)) => {
                FieldValue::TextList(items.iter().map(|v| FieldValue::from_json(Some(v))).collect())
            }
            Some(Value::Object(map)) => {
                let minimum = range_bound(map.get("minimum"));
                let preferred = range_bound(map.get("preferred"));
                match (minimum, preferred) {
                    (Some(minimum), Some(preferred)) => FieldValue::Range { minimum, preferred },
                    _ => FieldValue::Unknown(Value::Object(map.clone())),
                }
            }
            Some(other) => FieldValue::Unknown(other.clone()),
        }
    }

    /// Coerces to a single string.
    pub fn into_text(self) -> String {
        match self {
            FieldValue::Absent => String::new(),
            FieldValue::Text(s) => s,
            FieldValue::TextList(items) => items
                .into_iter()
                .map(FieldValue::into_text)
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect::<Vec<_>>()
                .join(", "),
            FieldValue::Range { minimum, preferred } => {
                format!("{minimum} (preferred: {preferred})")
            }
            // Compact JSON for objects, plain rendering for numbers and booleans.
            FieldValue::Unknown(value) => value.to_string(),
        }
    }

    /// Coerces to a list of strings.
    pub fn into_list(self) -> Vec<String> {
        let items: Vec<String> = match self {
            FieldValue::Absent => Vec::new(),
            FieldValue::TextList(items) => items.into_iter().map(FieldValue::into_text).collect(),
            FieldValue::Text(s) => s.split(',').map(str::to_string).collect(),
            other => vec![other.into_text()],
        };
        items
            .into_iter()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    }
}

/// A range bound counts only when it renders to non-blank text.
fn range_bound(value: Option<&Value>) -> Option<String> {
    let text = FieldValue::from_json(value).into_text();
    (!text.trim().is_empty()).then_some(text)
}

/// Runs the extraction completion and validates its output.
pub async fn extract_job(
    text: &str,
    llm: &dyn CompletionProvider,
) -> Result<JobRecord, ExtractionError> {
    let prompt = EXTRACT_PROMPT_TEMPLATE
        .replace("{flat_fields}", FLAT_FIELDS_INSTRUCTION)
        .replace("{page_data}", text);

    let response = llm
        .complete(&CompletionPrompt {
            system: JSON_ONLY_SYSTEM,
            user: &prompt,
            max_tokens: EXTRACT_MAX_TOKENS,
        })
        .await?;

    debug!("Extraction response: {response}");
    parse_job_response(&response)
}

/// Parses raw model text into a `JobRecord`.
pub fn parse_job_response(response: &str) -> Result<JobRecord, ExtractionError> {
    let value = locate_json(response)?;
    let posting = select_posting(value)?;
    job_from_object(&posting)
}

/// Finds the JSON value in a response that may carry code fences or prose.
///
/// Tried in order: the whole (unfenced) reply, the first fenced block, then the
/// first `{` or `[` from which a complete posting parses. Text after that value
/// is ignored.
fn locate_json(response: &str) -> Result<Value, ExtractionError> {
    let text = strip_json_fences(response);

    let first_error = match serde_json::from_str::<Value>(text) {
        Ok(value) => return Ok(value),
        Err(e) => e,
    };

    if let Some(block) = FENCED_BLOCK_RE.captures(response).and_then(|c| c.get(1)) {
        if let Ok(value) = serde_json::from_str::<Value>(block.as_str().trim()) {
            return Ok(value);
        }
    }

    response
        .char_indices()
        .filter(|(_, c)| matches!(c, '{' | '['))
        .find_map(|(start, _)| leading_posting(&response[start..]))
        .ok_or_else(|| ExtractionError::MalformedJson(first_error.to_string()))
}

/// Parses the first JSON value at the start of `text`, if it can hold a posting.
fn leading_posting(text: &str) -> Option<Value> {
    let value = Deserializer::from_str(text)
        .into_iter::<Value>()
        .next()?
        .ok()?;
    match &value {
        Value::Object(_) => Some(value),
        Value::Array(items) if items.iter().any(Value::is_object) => Some(value),
        _ => None,
    }
}

/// One job per request: an object is used as-is, an array yields its first object.
fn select_posting(value: Value) -> Result<Map<String, Value>, ExtractionError> {
    match value {
        Value::Object(map) => Ok(map),
        Value::Array(items) => {
            let count = items.len();
            let first = items.into_iter().find_map(|item| match item {
                Value::Object(map) => Some(map),
                _ => None,
            });
            match first {
                Some(map) => {
                    if count > 1 {
                        warn!("Model returned {count} postings, keeping the first");
                    }
                    Ok(map)
                }
                None => Err(ExtractionError::MalformedJson(
                    "array contains no job object".to_string(),
                )),
            }
        }
        other => Err(ExtractionError::MalformedJson(format!(
            "expected a JSON object, got {}",
            json_kind(&other)
        ))),
    }
}

fn job_from_object(posting: &Map<String, Value>) -> Result<JobRecord, ExtractionError> {
    let role = FieldValue::from_json(posting.get("role"))
        .into_text()
        .trim()
        .to_string();
    if role.is_empty() || PLACEHOLDER_ROLES.contains(&role.to_ascii_lowercase().as_str()) {
        return Err(ExtractionError::MissingRole);
    }

    let details = posting
        .get("job_details")
        .or_else(|| posting.get("jobDetails"));

    Ok(JobRecord {
        role,
        skills: FieldValue::from_json(posting.get("skills")).into_list(),
        experience: FieldValue::from_json(posting.get("experience"))
            .into_text()
            .trim()
            .to_string(),
        job_details: FieldValue::from_json(details).into_text().trim().to_string(),
    })
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
