use storyreel_core::error::CoreError;
use storyreel_db::store::StoreError;

/// Errors surfaced synchronously by [`crate::Orchestrator`] trigger points.
///
/// Generation failures never appear here: background stages absorb them
/// into a `failed` status on the owning row.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// Not found, validation, or precondition failure.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// The record store rejected a read or write.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Convenience alias for orchestrator return values.
pub type PipelineResult<T> = Result<T, PipelineError>;
