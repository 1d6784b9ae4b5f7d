use std::fmt;

use thiserror::Error;

use crate::llm_client::LlmError;
use crate::pipeline::composer::CompositionError;
use crate::pipeline::extractor::ExtractionError;
use crate::pipeline::fetcher::FetchError;

/// Every way a pipeline run can end without a result. All kinds are terminal.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("input is empty")]
    EmptyInput,

    #[error("fetch failed: {0}")]
    Fetch(#[from] FetchError),

    #[error("extraction failed: {0}")]
    Extraction(#[from] ExtractionError),

    #[error("composition failed: {0}")]
    Composition(#[from] CompositionError),
}

impl PipelineError {
    /// True when the provider (not the input or the model's output) was at fault.
    pub fn is_provider_failure(&self) -> bool {
        matches!(
            self,
            PipelineError::Extraction(ExtractionError::Provider(_))
                | PipelineError::Composition(CompositionError::Provider(_))
        )
    }

    pub fn provider_cause(&self) -> Option<&LlmError> {
        match self {
            PipelineError::Extraction(ExtractionError::Provider(e))
            | PipelineError::Composition(CompositionError::Provider(e)) => Some(e),
            _ => None,
        }
    }
}

/// Position of a run in the pipeline state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Idle,
    Classifying,
    Fetching,
    Normalizing,
    Extracting,
    Composing,
    Done,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Idle => "idle",
            Stage::Classifying => "classifying",
            Stage::Fetching => "fetching",
            Stage::Normalizing => "normalizing",
            Stage::Extracting => "extracting",
            Stage::Composing => "composing",
            Stage::Done => "done",
        };
        f.write_str(name)
    }
}

/// A failed run: the error as raised by its component, tagged with the stage
/// that raised it.
#[derive(Debug, Error)]
#[error("pipeline failed while {stage}: {error}")]
pub struct StageFailure {
    pub stage: Stage,
    #[source]
    pub error: PipelineError,
}
