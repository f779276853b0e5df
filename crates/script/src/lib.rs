//! Embedded-JavaScript post-processing for request descriptions and
//! responses.
//!
//! [`ScriptBridge`] marshals data in and out of one engine instance;
//! [`ScriptWorker`] keeps that instance on a dedicated thread (the engine is
//! not `Send`); [`ScriptPool`] hands out workers for parallel evaluation.
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

mod bridge;
mod error;
mod pool;
mod worker;

pub use bridge::ScriptBridge;
pub use error::{Error, Result};
pub use pool::ScriptPool;
pub use worker::{ScriptJob, ScriptOutcome, ScriptWorker};
