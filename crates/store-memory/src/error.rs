use thiserror::Error;

/// Errors that can occur in this crate.
#[derive(Debug, Error)]
pub enum Error {
    /// No template is stored under the requested key.
    #[error("template not found: {0}")]
    TemplateNotFound(String),
}
