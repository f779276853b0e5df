use thiserror::Error;

/// The result type for this crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in this crate.
#[derive(Debug, Error)]
pub enum Error {
    /// Body content does not match the declared content type.
    #[error("content not correct: {0}")]
    ContentMismatch(String),

    /// Header name or value cannot go on the wire.
    #[error("invalid header: {0}")]
    Header(String),

    /// Request URL failed to parse.
    #[error("invalid url")]
    InvalidUrl(#[from] url::ParseError),

    /// Method string is not a valid HTTP method token.
    #[error("invalid method: {0}")]
    Method(String),

    /// Proxy URL or address could not be turned into a proxy configuration.
    #[error("proxy config: {0}")]
    ProxyConfig(#[source] reqwest::Error),

    /// Network-level failure, surfaced verbatim.
    #[error("transport: {0}")]
    Transport(#[from] reqwest::Error),
}
