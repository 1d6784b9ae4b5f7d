use crate::pipeline::Pipeline;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Stateless; cloned per request, backed by shared fetcher and provider handles.
    pub pipeline: Pipeline,
}
