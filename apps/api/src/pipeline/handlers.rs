//! Axum route handlers for the generation API.
//!
//! Every route funnels into the same `Pipeline::run`; the legacy routes only
//! fix the persona.

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::pipeline::models::{EmailPersona, PipelineResult};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    /// A job posting URL or the job description itself.
    pub input: String,
    #[serde(default)]
    pub mode: EmailPersona,
}

/// Body of the legacy single-purpose endpoints.
#[derive(Debug, Deserialize)]
pub struct LegacyRequest {
    pub url: String,
}

/// Always one result today; a list so multi-posting responses fit later.
#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub results: Vec<PipelineResult>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/generate
///
/// Accepts a URL or pasted text and returns the extracted job plus an email.
pub async fn handle_generate(
    State(state): State<AppState>,
    request: Result<Json<GenerateRequest>, JsonRejection>,
) -> Result<Json<GenerateResponse>, AppError> {
    let Json(request) = request.map_err(|e| AppError::Validation(e.body_text()))?;
    run(&state, &request.input, request.mode).await
}

/// POST /api/process1
///
/// Legacy "Email as Individual" endpoint.
pub async fn handle_process_individual(
    State(state): State<AppState>,
    request: Result<Json<LegacyRequest>, JsonRejection>,
) -> Result<Json<GenerateResponse>, AppError> {
    let Json(request) = request.map_err(|e| AppError::Validation(e.body_text()))?;
    run(&state, &request.url, EmailPersona::Individual).await
}

/// POST /api/process2
///
/// Legacy "Email as Business Executive" endpoint.
pub async fn handle_process_executive(
    State(state): State<AppState>,
    request: Result<Json<LegacyRequest>, JsonRejection>,
) -> Result<Json<GenerateResponse>, AppError> {
    let Json(request) = request.map_err(|e| AppError::Validation(e.body_text()))?;
    run(&state, &request.url, EmailPersona::BusinessExecutive).await
}

async fn run(
    state: &AppState,
    input: &str,
    persona: EmailPersona,
) -> Result<Json<GenerateResponse>, AppError> {
    let result = state.pipeline.run(input, persona).await?;
    Ok(Json(GenerateResponse {
        results: vec![result],
    }))
}
