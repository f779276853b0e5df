use thiserror::Error;

/// The result type for this crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in this crate.
#[derive(Debug, Error)]
pub enum Error {
    /// A value could not be marshaled into the engine's data space.
    #[error("marshal: {0}")]
    Marshal(#[source] serde_json::Error),

    /// Script construction or execution failed.
    #[error(transparent)]
    Script(#[from] rustyscript::Error),

    /// A value read back from the engine does not fit the expected shape.
    #[error("unmarshal: {0}")]
    Unmarshal(#[source] serde_json::Error),

    /// The worker thread is gone; no further jobs can run.
    #[error("script worker closed")]
    WorkerClosed,
}
