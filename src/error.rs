use thiserror::Error;

/// Errors that abort a pipeline run.
///
/// Malformed cells and absent count columns are not errors: they degrade to
/// null cells and zero-filled columns and are tallied on the loaded table.
#[derive(Debug, Clone, Error)]
pub enum PipelineError {
    /// The source could not be reached or did not return usable CSV.
    #[error("source unavailable ({source_id}): {reason}")]
    SourceUnavailable { source_id: String, reason: String },
}

impl PipelineError {
    pub fn source_unavailable(source_id: impl Into<String>, reason: impl ToString) -> Self {
        PipelineError::SourceUnavailable {
            source_id: source_id.into(),
            reason: reason.to_string(),
        }
    }
}
