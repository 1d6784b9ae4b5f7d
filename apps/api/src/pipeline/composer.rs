//! Email composer — turns a `JobRecord` into a cold email in the chosen persona.
//! The model's reply is returned as-is.

use thiserror::Error;

use crate::llm_client::prompts::WRITER_SYSTEM;
use crate::llm_client::{CompletionPrompt, CompletionProvider, LlmError};
use crate::pipeline::models::{EmailPersona, JobRecord};
use crate::pipeline::prompts::{
    render_email_prompt, EXECUTIVE_EMAIL_TEMPLATE, INDIVIDUAL_EMAIL_TEMPLATE,
};

const COMPOSE_MAX_TOKENS: u32 = 1024;

#[derive(Debug, Error)]
pub enum CompositionError {
    #[error("provider error: {0}")]
    Provider(LlmError),

    #[error("model returned an empty email")]
    EmptyResponse,

    #[error("could not serialize job for the prompt: {0}")]
    Prompt(#[source] serde_json::Error),
}

impl From<LlmError> for CompositionError {
    fn from(e: LlmError) -> Self {
        match e {
            LlmError::EmptyContent => CompositionError::EmptyResponse,
            other => CompositionError::Provider(other),
        }
    }
}

fn template_for(persona: EmailPersona) -> &'static str {
    match persona {
        EmailPersona::Individual => INDIVIDUAL_EMAIL_TEMPLATE,
        EmailPersona::BusinessExecutive => EXECUTIVE_EMAIL_TEMPLATE,
    }
}

/// Builds the composition prompt. Same job and persona always give the same prompt.
pub fn build_email_prompt(job: &JobRecord, persona: EmailPersona) -> Result<String, CompositionError> {
    let job_description = serde_json::to_string(job)
        .map_err(CompositionError::Prompt)?;
    Ok(render_email_prompt(template_for(persona), &job_description))
}

pub async fn compose_email(
    job: &JobRecord,
    persona: EmailPersona,
    llm: &dyn CompletionProvider,
) -> Result<String, CompositionError> {
    let prompt = build_email_prompt(job, persona)?;

    let email = llm
        .complete(&CompletionPrompt {
            system: WRITER_SYSTEM,
            user: &prompt,
            max_tokens: COMPOSE_MAX_TOKENS,
        })
        .await?;

    if email.trim().is_empty() {
        return Err(CompositionError::EmptyResponse);
    }
    Ok(email)
}
