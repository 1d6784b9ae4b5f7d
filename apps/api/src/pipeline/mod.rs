// Job-to-email pipeline: classify input, fetch and clean text, extract a job
// record, compose the email. All model calls go through llm_client.

pub mod classifier;
pub mod composer;
pub mod error;
pub mod extractor;
pub mod fetcher;
pub mod handlers;
pub mod models;
pub mod normalizer;
pub mod orchestrator;
pub mod prompts;

#[cfg(test)]
pub mod testing;

pub use error::{PipelineError, StageFailure};
pub use orchestrator::Pipeline;
