use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::pipeline::composer::CompositionError;
use crate::pipeline::extractor::ExtractionError;
use crate::pipeline::{PipelineError, StageFailure};

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error(transparent)]
    Pipeline(#[from] StageFailure),
}

impl AppError {
    /// Status, stable code and user-facing message. Messages never carry
    /// provider output or raw model text.
    fn parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Pipeline(failure) => {
                let (status, code, message) = match &failure.error {
                    PipelineError::EmptyInput => (
                        StatusCode::BAD_REQUEST,
                        "EMPTY_INPUT",
                        "Please provide a job posting URL or the job description text.",
                    ),
                    PipelineError::Fetch(_) => (
                        StatusCode::BAD_GATEWAY,
                        "FETCH_FAILED",
                        "Could not reach or read the URL. Check the link or paste the job description instead.",
                    ),
                    PipelineError::Extraction(ExtractionError::MissingRole) => (
                        StatusCode::UNPROCESSABLE_ENTITY,
                        "NO_JOB_FOUND",
                        "Could not find a job posting in the provided content.",
                    ),
                    PipelineError::Extraction(ExtractionError::MalformedJson(_)) => (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "EXTRACTION_FAILED",
                        "Could not understand the job posting. Please try again.",
                    ),
                    PipelineError::Extraction(ExtractionError::Provider(_))
                    | PipelineError::Composition(CompositionError::Provider(_)) => (
                        StatusCode::SERVICE_UNAVAILABLE,
                        "MODEL_UNAVAILABLE",
                        "The language model is unavailable right now. Please try again shortly.",
                    ),
                    PipelineError::Composition(
                        CompositionError::EmptyResponse | CompositionError::Prompt(_),
                    ) => (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "COMPOSITION_FAILED",
                        "Could not generate the email. Please try again.",
                    ),
                };
                (status, code, message.to_string())
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.parts();

        match &self {
            AppError::Pipeline(failure) if status.is_server_error() => {
                match failure.error.provider_cause() {
                    Some(cause) => tracing::error!("{code} at {}: {cause:?}", failure.stage),
                    None => tracing::error!("{code}: {failure}"),
                }
            }
            _ => tracing::debug!("{code}: {self}"),
        }

        let body = Json(json!({
            "error": message,
            "code": code
        }));

        (status, body).into_response()
    }
}
