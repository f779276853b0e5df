use std::time::Duration;

use reqwire_request::{Param, ResponseSnapshot};
use serde_json::Value;

use crate::error::{Error, Result};

const SCRIPT_TIMEOUT: Duration = Duration::from_secs(60);

/// Adapter between request/response data and an embedded JavaScript engine.
///
/// One engine instance per bridge; the engine is not safe for concurrent use,
/// so a bridge must stay on one thread and run one script at a time. Use
/// [`crate::ScriptPool`] for parallel evaluation.
pub struct ScriptBridge {
    runtime: rustyscript::Runtime,
}

impl ScriptBridge {
    /// Creates a bridge with a fresh engine instance.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Script`] when the engine cannot be constructed.
    pub fn new() -> Result<Self> {
        let runtime = rustyscript::Runtime::new(rustyscript::RuntimeOptions {
            timeout: SCRIPT_TIMEOUT,
            ..Default::default()
        })?;
        Ok(Self { runtime })
    }

    /// Binds the request description as the global `param` object.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Marshal`] or [`Error::Script`].
    pub fn load_param(&mut self, param: &Param) -> Result<()> {
        let json = serde_json::to_string(param).map_err(Error::Marshal)?;
        self.runtime
            .eval::<Value>(&format!("globalThis.param = {json}"))?;
        Ok(())
    }

    /// Binds response context as the globals `statusCode`, `uri`, `header`
    /// and `body`, with each header's values already `;`-joined.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Marshal`] or [`Error::Script`].
    pub fn load_response(&mut self, snapshot: &ResponseSnapshot) -> Result<()> {
        let header = serde_json::to_string(&snapshot.header).map_err(Error::Marshal)?;
        let uri = serde_json::to_string(&snapshot.uri).map_err(Error::Marshal)?;
        let body = serde_json::to_string(&snapshot.body).map_err(Error::Marshal)?;
        let script = format!(
            "globalThis.statusCode = {status}; globalThis.uri = {uri}; \
             globalThis.header = {header}; globalThis.body = {body}",
            status = snapshot.status_code,
        );
        self.runtime.eval::<Value>(&script)?;
        Ok(())
    }

    /// Reads the (possibly script-modified) global `param` back out.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Script`] when the read fails and [`Error::Unmarshal`]
    /// when the value no longer fits the request description shape.
    pub fn take_param(&mut self) -> Result<Param> {
        let value: Value = self.runtime.eval("globalThis.param")?;
        serde_json::from_value(value).map_err(Error::Unmarshal)
    }

    /// Runs a script and marshals its final expression value to JSON bytes.
    ///
    /// A null or undefined result yields an empty byte vector, not an error.
    ///
    /// # Errors
    ///
    /// Script errors are returned verbatim; marshaling failures are
    /// [`Error::Marshal`].
    pub fn exec(&mut self, script: &str) -> Result<Vec<u8>> {
        let value: Value = self.runtime.eval(script)?;
        if value.is_null() {
            return Ok(Vec::new());
        }
        serde_json::to_vec(&value).map_err(Error::Marshal)
    }
}
