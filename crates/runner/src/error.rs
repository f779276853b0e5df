use thiserror::Error;

/// The result type for this crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in this crate.
#[derive(Debug, Error)]
pub enum Error {
    /// Request building or execution failed.
    #[error(transparent)]
    Request(#[from] reqwire_request::Error),

    /// Post-processing script failed.
    #[error(transparent)]
    Script(#[from] reqwire_script::Error),

    /// The output sink rejected the result.
    #[error("output sink: {0}")]
    Sink(String),

    /// The data source could not supply the template.
    #[error("data source: {0}")]
    Source(String),

    /// Template binding or parsing failed.
    #[error(transparent)]
    Template(#[from] reqwire_template::Error),
}
