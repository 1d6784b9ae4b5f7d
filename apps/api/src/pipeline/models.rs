use serde::{Deserialize, Serialize};

/// A single job posting extracted from a page or pasted text.
///
/// Every field is flat: a string or a list of strings. Model output that does
/// not fit this shape is coerced by the extractor before a `JobRecord` exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobRecord {
    pub role: String,
    pub skills: Vec<String>,
    pub experience: String,
    #[serde(alias = "jobDetails")]
    pub job_details: String,
}

/// Voice used when composing the email.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EmailPersona {
    /// A candidate applying for the role.
    #[default]
    Individual,
    /// A company pitching its services to the hiring organisation.
    BusinessExecutive,
}

/// One job/email pair produced by a successful pipeline run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PipelineResult {
    pub job: JobRecord,
    pub email: String,
}
