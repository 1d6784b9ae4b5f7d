//! Pipeline orchestrator.
//!
//! Flow: classify → (fetch → normalize_scraped | normalize_direct) → truncate →
//!       extract_job → compose_email.
//!
//! The first failing stage ends the run; later stages never start. `Pipeline`
//! holds no mutable state, so one instance serves every request concurrently.

use std::sync::Arc;

use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::llm_client::CompletionProvider;
use crate::pipeline::classifier::{classify, InputKind};
use crate::pipeline::composer::compose_email;
use crate::pipeline::error::{PipelineError, Stage, StageFailure};
use crate::pipeline::extractor::extract_job;
use crate::pipeline::fetcher::PageFetcher;
use crate::pipeline::models::{EmailPersona, PipelineResult};
use crate::pipeline::normalizer::{normalize_direct, normalize_scraped, truncate, DEFAULT_MAX_TOKENS};

#[derive(Clone)]
pub struct Pipeline {
    fetcher: Arc<dyn PageFetcher>,
    llm: Arc<dyn CompletionProvider>,
    max_input_tokens: usize,
}

/// Tracks where a single run is, for logging and failure tagging.
struct RunState {
    stage: Stage,
}

impl RunState {
    fn new() -> Self {
        Self { stage: Stage::Idle }
    }

    fn advance(&mut self, next: Stage) {
        debug!("{} -> {}", self.stage, next);
        self.stage = next;
    }

    fn fail(&self, error: impl Into<PipelineError>) -> StageFailure {
        let error = error.into();
        // The HTTP layer reports server-class failures at error level.
        match &error {
            PipelineError::EmptyInput => debug!(stage = %self.stage, "Rejected empty input"),
            e if e.is_provider_failure() => {
                warn!(stage = %self.stage, error = %e, "Model provider failed")
            }
            e => warn!(stage = %self.stage, error = %e, "Pipeline run failed"),
        }
        StageFailure {
            stage: self.stage,
            error,
        }
    }
}

impl Pipeline {
    pub fn new(fetcher: Arc<dyn PageFetcher>, llm: Arc<dyn CompletionProvider>) -> Self {
        Self {
            fetcher,
            llm,
            max_input_tokens: DEFAULT_MAX_TOKENS,
        }
    }

    pub fn with_max_input_tokens(mut self, max_input_tokens: usize) -> Self {
        self.max_input_tokens = max_input_tokens;
        self
    }

    /// Runs one request end to end and returns exactly one job/email pair.
    #[instrument(skip_all, fields(run_id = %Uuid::new_v4(), persona = ?persona))]
    pub async fn run(
        &self,
        raw_input: &str,
        persona: EmailPersona,
    ) -> Result<PipelineResult, StageFailure> {
        let mut run = RunState::new();

        run.advance(Stage::Classifying);
        let kind = classify(raw_input).map_err(|e| run.fail(e))?;

        let text = match kind {
            InputKind::Url(url) => {
                info!("Input classified as URL: {url}");
                run.advance(Stage::Fetching);
                let document = self.fetcher.fetch(&url).await.map_err(|e| run.fail(e))?;
                info!(
                    "Fetched {} ({} chars, title: {:?})",
                    document.url,
                    document.text.len(),
                    document.title
                );
                run.advance(Stage::Normalizing);
                normalize_scraped(&document.text)
            }
            InputKind::PlainText(text) => {
                info!("Input classified as plain text ({} chars)", text.len());
                run.advance(Stage::Normalizing);
                normalize_direct(&text)
            }
        };
        let text = truncate(&text, self.max_input_tokens);

        run.advance(Stage::Extracting);
        let job = extract_job(&text, self.llm.as_ref())
            .await
            .map_err(|e| run.fail(e))?;
        info!("Extracted job: role={:?}, {} skills", job.role, job.skills.len());

        run.advance(Stage::Composing);
        let email = compose_email(&job, persona, self.llm.as_ref())
            .await
            .map_err(|e| run.fail(e))?;

        run.advance(Stage::Done);
        Ok(PipelineResult { job, email })
    }
}
