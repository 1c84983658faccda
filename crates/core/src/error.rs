use crate::scan::Stage;

/// Domain errors shared by the job service and its transports.
///
/// Every variant is an expected, recoverable condition; callers map them to
/// structured responses rather than aborting.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CoreError {
    /// The caller supplied unusable input (e.g. an empty file collection).
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A required parameter was omitted.
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),

    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: String },

    /// Results were requested before the job reached `completed`.
    #[error("Job {id} is not ready (current stage: {stage})")]
    NotReady { id: String, stage: Stage },

    /// The job terminated in the `error` stage.
    #[error("Processing failed: {0}")]
    ProcessingFailed(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
