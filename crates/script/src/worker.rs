use std::thread;

use reqwire_request::{Param, ResponseSnapshot};
use tokio::sync::{mpsc, oneshot};
use tracing::error;

use crate::bridge::ScriptBridge;
use crate::error::{Error, Result};

/// One unit of script work: optional request/response context plus the
/// script text to run.
#[derive(Clone, Debug)]
pub struct ScriptJob {
    /// Request description to bind as `param` before the script runs.
    pub param: Option<Param>,

    /// Response context to bind before the script runs.
    pub response: Option<ResponseSnapshot>,

    /// The script text.
    pub script: String,
}

/// The result of a [`ScriptJob`].
#[derive(Clone, Debug)]
pub struct ScriptOutcome {
    /// The `param` global read back after the script ran, if one was bound.
    pub param: Option<Param>,

    /// The script's final expression value as JSON bytes; empty for
    /// null/undefined.
    pub output: Vec<u8>,
}

type WorkerRequest = (ScriptJob, oneshot::Sender<Result<ScriptOutcome>>);

/// A dedicated thread owning one engine instance.
///
/// The engine is not `Send`, so it lives on its own thread and jobs are fed
/// over a channel. The handle itself is cheap to clone and `Send`; jobs on
/// one worker run strictly one at a time.
#[derive(Clone, Debug)]
pub struct ScriptWorker {
    sender: mpsc::Sender<WorkerRequest>,
}

impl ScriptWorker {
    /// Spawns the worker thread and constructs its engine.
    ///
    /// # Errors
    ///
    /// Returns the engine construction error when the bridge cannot start.
    pub async fn new() -> Result<Self> {
        let (sender, mut receiver) = mpsc::channel::<WorkerRequest>(1);
        let (ready_sender, ready_receiver) = oneshot::channel();

        thread::spawn(move || match ScriptBridge::new() {
            Ok(mut bridge) => {
                if ready_sender.send(None).is_err() {
                    return;
                }
                while let Some((job, responder)) = receiver.blocking_recv() {
                    let result = run_job(&mut bridge, job);
                    if responder.send(result).is_err() {
                        error!("script job caller went away before the result");
                    }
                }
            }
            Err(err) => {
                let _ = ready_sender.send(Some(err));
            }
        });

        match ready_receiver.await {
            Ok(None) => Ok(Self { sender }),
            Ok(Some(err)) => Err(err),
            Err(_) => Err(Error::WorkerClosed),
        }
    }

    /// Runs one job on the worker's engine.
    ///
    /// # Errors
    ///
    /// Script, marshal and unmarshal errors from the job itself, or
    /// [`Error::WorkerClosed`] when the worker thread is gone.
    pub async fn execute(&self, job: ScriptJob) -> Result<ScriptOutcome> {
        let (responder, receiver) = oneshot::channel();
        self.sender
            .send((job, responder))
            .await
            .map_err(|_| Error::WorkerClosed)?;
        receiver.await.map_err(|_| Error::WorkerClosed)?
    }
}

fn run_job(bridge: &mut ScriptBridge, job: ScriptJob) -> Result<ScriptOutcome> {
    let had_param = job.param.is_some();
    if let Some(param) = &job.param {
        bridge.load_param(param)?;
    }
    if let Some(response) = &job.response {
        bridge.load_response(response)?;
    }
    let output = bridge.exec(&job.script)?;
    let param = if had_param {
        Some(bridge.take_param()?)
    } else {
        None
    };
    Ok(ScriptOutcome { param, output })
}
