//! Orchestrates template loading, request execution and script
//! post-processing.
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

mod error;

pub use error::{Error, Result};

use std::collections::HashMap;

use bytes::Bytes;
use reqwire_request::{Param, ResponseSnapshot};
use reqwire_script::{ScriptJob, ScriptPool};
use reqwire_store::{DataSource, OutputSink};
use serde_json::Value;
use tracing::info;

/// The result of one run: the request description actually used (after any
/// script modification), the captured response, and the bytes written to the
/// sink.
#[derive(Clone, Debug)]
pub struct RunOutcome {
    /// The request description, as modified by the post-script if one ran.
    pub param: Param,

    /// The captured response.
    pub response: ResponseSnapshot,

    /// What was written to the sink: the script's output when a post-script
    /// ran, otherwise the response body.
    pub output: Vec<u8>,
}

/// Drives one templated request from source to sink.
#[derive(Clone, Debug)]
pub struct Runner<DS, OS>
where
    DS: DataSource,
    OS: OutputSink,
{
    source: DS,
    sink: OS,
    pool: ScriptPool,
}

impl<DS, OS> Runner<DS, OS>
where
    DS: DataSource,
    OS: OutputSink,
{
    /// Creates a runner over the given collaborators.
    pub const fn new(source: DS, sink: OS, pool: ScriptPool) -> Self {
        Self { source, sink, pool }
    }

    /// Loads the template under `key`, binds `values`, performs the call,
    /// optionally post-processes the response with `post_script`, and writes
    /// the outcome to the sink under the same key.
    ///
    /// The call itself is always synchronous; `resp_type` dispatch is left to
    /// the caller, who gets the full outcome back.
    ///
    /// # Errors
    ///
    /// Source, template, request, script and sink errors, each fatal to the
    /// run; nothing is retried.
    pub async fn run(
        &self,
        key: &str,
        values: &HashMap<String, Value>,
        post_script: Option<&str>,
    ) -> Result<RunOutcome> {
        let template = self
            .source
            .load(key)
            .await
            .map_err(|err| Error::Source(err.to_string()))?;
        let param = template.set(values)?;

        info!(key, url = %param.url, "executing templated request");
        let response = param.send().await?;
        let response = ResponseSnapshot::capture(response).await;

        let (param, output) = match post_script {
            Some(script) => {
                let outcome = self
                    .pool
                    .execute(ScriptJob {
                        param: Some(param.clone()),
                        response: Some(response.clone()),
                        script: script.to_string(),
                    })
                    .await?;
                (outcome.param.unwrap_or(param), outcome.output)
            }
            None => {
                let body = response.body.clone().into_bytes();
                (param, body)
            }
        };

        self.sink
            .set(key, Bytes::from(output.clone()))
            .await
            .map_err(|err| Error::Sink(err.to_string()))?;

        Ok(RunOutcome {
            param,
            response,
            output,
        })
    }
}
