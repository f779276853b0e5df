use reqwest::{Client, Proxy};
use tracing::warn;

use crate::error::{Error, Result};
use crate::param::Param;

impl Param {
    /// Builds a client configured for this description's proxy and timeout.
    ///
    /// `http_proxy` wins when both proxies are set. A `socket_proxy` without
    /// a scheme is dialed as SOCKS5. A malformed timeout string is logged and
    /// ignored so that best-effort configs still make the call.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ProxyConfig`] when the proxy URL or address cannot be
    /// turned into a proxy, and [`Error::Transport`] when client construction
    /// fails.
    pub fn build_client(&self) -> Result<Client> {
        let mut builder = Client::builder();
        if !self.http_proxy.is_empty() {
            let proxy = Proxy::all(&self.http_proxy).map_err(Error::ProxyConfig)?;
            builder = builder.proxy(proxy);
        } else if !self.socket_proxy.is_empty() {
            let addr = if self.socket_proxy.contains("://") {
                self.socket_proxy.clone()
            } else {
                format!("socks5://{}", self.socket_proxy)
            };
            let proxy = Proxy::all(&addr).map_err(Error::ProxyConfig)?;
            builder = builder.proxy(proxy);
        }
        if !self.timeout.is_empty() {
            match humantime::parse_duration(&self.timeout) {
                Ok(timeout) => builder = builder.timeout(timeout),
                Err(err) => {
                    warn!(timeout = %self.timeout, %err, "ignoring malformed timeout");
                }
            }
        }
        Ok(builder.build()?)
    }
}
