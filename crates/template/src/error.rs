use thiserror::Error;

/// The result type for this crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in this crate.
#[derive(Debug, Error)]
pub enum Error {
    /// A placeholder has neither a bound value nor a default.
    #[error("variable not found: {0}")]
    MissingVariable(String),

    /// The substituted template is not a valid escaped string literal, or the
    /// recovered document does not parse into a request description.
    #[error("template format: {0}: {1}")]
    TemplateFormat(&'static str, #[source] serde_json::Error),
}
