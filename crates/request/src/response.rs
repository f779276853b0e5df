use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::error;

/// A response captured as plain data for script injection and bookkeeping.
///
/// Header values are joined with `;` when a header carries multiple values,
/// matching what post-processing scripts see.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct ResponseSnapshot {
    /// HTTP status code.
    pub status_code: u16,

    /// The final request URI.
    pub uri: String,

    /// Response headers, values `;`-joined.
    pub header: BTreeMap<String, String>,

    /// Response body text.
    pub body: String,
}

impl ResponseSnapshot {
    /// Consumes a response into a snapshot.
    ///
    /// A body read failure is logged and leaves the body empty rather than
    /// failing the capture; the rest of the context is still usable.
    pub async fn capture(response: reqwest::Response) -> Self {
        let status_code = response.status().as_u16();
        let uri = response.url().to_string();
        let headers = response.headers().clone();
        let mut header = BTreeMap::new();
        for key in headers.keys() {
            let joined = headers
                .get_all(key)
                .iter()
                .filter_map(|value| value.to_str().ok())
                .collect::<Vec<_>>()
                .join(";");
            header.insert(key.as_str().to_string(), joined);
        }
        let body = match response.text().await {
            Ok(text) => text,
            Err(err) => {
                error!(%err, "failed to read response body");
                String::new()
            }
        };
        Self {
            status_code,
            uri,
            header,
            body,
        }
    }
}
