use thiserror::Error;

use crate::{ConfigError, UnknownFeature, ValidationError};

/// Unified error type for callers that drive the evaluators end to end.
///
/// The evaluators themselves never return configuration errors; see
/// [`run_json()`](crate::run_json) for the only fallible entry point.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    UnknownFeature(#[from] UnknownFeature),
}
