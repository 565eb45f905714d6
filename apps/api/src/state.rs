use std::sync::Arc;

use crate::config::Config;
use crate::screening::pipeline::ScreeningPipeline;

/// Shared application state injected into all route handlers via Axum extractors.
/// Holds no per-request data; every batch is screened and discarded within its request.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Extraction, scoring and bias policy, with their collaborators already wired in.
    pub pipeline: Arc<ScreeningPipeline>,
}
