use std::collections::BTreeMap;

use reqwest::header::{HeaderName, HeaderValue};
use reqwest::{Client, Method, Request, Response};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::body::BodyContent;
use crate::error::{Error, Result};

/// How the caller intends to consume the result of a request.
///
/// The core always performs a synchronous call and hands back the response;
/// async and callback dispatch are the caller's concern. Wire format is an
/// integer: `1` async, `2` sync, `3` callback. `0` or absent reads as `Sync`.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum RespType {
    /// Caller consumes the result asynchronously.
    Async,

    /// Caller waits for the response.
    #[default]
    Sync,

    /// Result is delivered to `callback_addr`.
    Callback,
}

impl From<RespType> for u8 {
    fn from(resp_type: RespType) -> Self {
        match resp_type {
            RespType::Async => 1,
            RespType::Sync => 2,
            RespType::Callback => 3,
        }
    }
}

impl TryFrom<u8> for RespType {
    type Error = String;

    fn try_from(value: u8) -> std::result::Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Async),
            0 | 2 => Ok(Self::Sync),
            3 => Ok(Self::Callback),
            other => Err(format!("unknown resp type: {other}")),
        }
    }
}

/// A complete, serializable description of one HTTP request.
///
/// This is the value templates produce and the builder consumes. Instances
/// are plain values; building a request never mutates them, so sharing an
/// immutable `Param` across tasks is safe.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Param {
    /// Request URL. May already carry a query string.
    pub url: String,

    /// HTTP method. Empty means GET.
    pub method: String,

    /// Query parameters merged into the URL. An entry here overrides a
    /// duplicate key already present in the URL's query string.
    pub uri_param: BTreeMap<String, String>,

    /// Headers added onto the outbound request.
    pub header: BTreeMap<String, String>,

    /// HTTP proxy URL. Takes precedence over `socket_proxy` when both are set.
    pub http_proxy: String,

    /// SOCKS5 proxy address (`host:port`, scheme optional).
    pub socket_proxy: String,

    /// Request timeout as a duration string such as `30s` or `500ms`.
    /// Empty or malformed means the client default (malformed is logged).
    pub timeout: String,

    /// Free-form caller bookkeeping, carried through uninterpreted.
    pub variable: BTreeMap<String, String>,

    /// Delivery address used when `resp_type` is [`RespType::Callback`].
    pub callback_addr: String,

    /// The request body and its content-type discriminator.
    #[serde(flatten)]
    pub body: BodyContent,

    /// How the caller treats the result.
    pub resp_type: RespType,
}

impl Param {
    /// Assembles the complete outbound request: parsed URL with merged query
    /// parameters, defaulted method, headers, and encoded body.
    ///
    /// No network I/O happens here except the deliberate per-file fetches of
    /// multipart file fields.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidUrl`], [`Error::Method`] or [`Error::Header`]
    /// for malformed inputs, and body encoding errors from
    /// [`BodyContent::apply`].
    pub async fn build_request(&self, client: &Client) -> Result<Request> {
        let mut url = Url::parse(&self.url)?;
        if !self.uri_param.is_empty() {
            // Keep pairs for untouched keys as-is, duplicates included; an
            // overridden key collapses to the single value from `uri_param`.
            let kept: Vec<(String, String)> = url
                .query_pairs()
                .into_owned()
                .filter(|(key, _)| !self.uri_param.contains_key(key))
                .collect();
            let mut pairs = url.query_pairs_mut();
            pairs.clear();
            for (key, value) in &kept {
                pairs.append_pair(key, value);
            }
            for (key, value) in &self.uri_param {
                pairs.append_pair(key, value);
            }
            drop(pairs);
        }

        let method = if self.method.is_empty() {
            Method::GET
        } else {
            Method::from_bytes(self.method.to_uppercase().as_bytes())
                .map_err(|_| Error::Method(self.method.clone()))?
        };

        let mut builder = client.request(method, url);
        for (name, value) in &self.header {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|_| Error::Header(name.clone()))?;
            let value =
                HeaderValue::from_str(value).map_err(|_| Error::Header(value.clone()))?;
            builder = builder.header(name, value);
        }

        builder = self.body.apply(client, builder).await?;
        Ok(builder.build()?)
    }

    /// Builds the configured client, builds the request and performs the call.
    ///
    /// One in-flight request per invocation; no retries, no redirect policy
    /// beyond the client default. Network failures surface verbatim.
    ///
    /// # Errors
    ///
    /// Any client construction, request building or transport error.
    pub async fn send(&self) -> Result<Response> {
        let client = self.build_client()?;
        let request = self.build_request(&client).await?;
        Ok(client.execute(request).await?)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[tokio::test]
    async fn empty_method_defaults_to_get() {
        let param = Param {
            url: "http://localhost/normal".to_string(),
            ..Param::default()
        };
        let request = param.build_request(&Client::new()).await.unwrap();
        assert_eq!(request.method(), Method::GET);
    }

    #[tokio::test]
    async fn method_is_uppercased() {
        let param = Param {
            url: "http://localhost/".to_string(),
            method: "put".to_string(),
            ..Param::default()
        };
        let request = param.build_request(&Client::new()).await.unwrap();
        assert_eq!(request.method(), Method::PUT);
    }

    #[tokio::test]
    async fn uri_params_merge_into_query() {
        let param = Param {
            url: "http://localhost/uri".to_string(),
            uri_param: [("a", "1"), ("b", "2")]
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            ..Param::default()
        };
        let request = param.build_request(&Client::new()).await.unwrap();
        let query: HashMap<String, String> =
            request.url().query_pairs().into_owned().collect();
        assert_eq!(query["a"], "1");
        assert_eq!(query["b"], "2");
        assert_eq!(query.len(), 2);
    }

    #[tokio::test]
    async fn uri_params_override_existing_query_keys() {
        let param = Param {
            url: "http://localhost/uri?a=0&c=3".to_string(),
            uri_param: [("a".to_string(), "1".to_string())].into(),
            ..Param::default()
        };
        let request = param.build_request(&Client::new()).await.unwrap();
        let query: HashMap<String, String> =
            request.url().query_pairs().into_owned().collect();
        assert_eq!(query["a"], "1");
        assert_eq!(query["c"], "3");
    }

    #[tokio::test]
    async fn untouched_duplicate_query_pairs_survive_the_merge() {
        let param = Param {
            url: "http://localhost/uri?a=1&a=2&b=0".to_string(),
            uri_param: [("b".to_string(), "3".to_string())].into(),
            ..Param::default()
        };
        let request = param.build_request(&Client::new()).await.unwrap();
        let query: Vec<(String, String)> =
            request.url().query_pairs().into_owned().collect();
        assert_eq!(
            query,
            [("a", "1"), ("a", "2"), ("b", "3")]
                .map(|(k, v)| (k.to_string(), v.to_string()))
        );
    }

    #[tokio::test]
    async fn headers_are_added() {
        let param = Param {
            url: "http://localhost/".to_string(),
            header: [("Header".to_string(), "header".to_string())].into(),
            ..Param::default()
        };
        let request = param.build_request(&Client::new()).await.unwrap();
        assert_eq!(request.headers().get("Header").unwrap(), "header");
    }

    #[tokio::test]
    async fn malformed_url_is_rejected() {
        let param = Param {
            url: "not a url".to_string(),
            ..Param::default()
        };
        let err = param.build_request(&Client::new()).await.unwrap_err();
        assert!(matches!(err, Error::InvalidUrl(_)));
    }

    #[tokio::test]
    async fn malformed_method_is_rejected() {
        let param = Param {
            url: "http://localhost/".to_string(),
            method: "GE T".to_string(),
            ..Param::default()
        };
        let err = param.build_request(&Client::new()).await.unwrap_err();
        assert!(matches!(err, Error::Method(_)));
    }

    #[test]
    fn wire_field_names_round_trip() {
        let param = Param {
            url: "http://localhost/".to_string(),
            method: "POST".to_string(),
            uri_param: [("k".to_string(), "v".to_string())].into(),
            header: [("h".to_string(), "v".to_string())].into(),
            http_proxy: "http://proxy:8080".to_string(),
            socket_proxy: "proxy:1080".to_string(),
            timeout: "30s".to_string(),
            variable: [("x".to_string(), "y".to_string())].into(),
            callback_addr: "http://cb".to_string(),
            body: BodyContent::Json("{}".to_string()),
            resp_type: RespType::Callback,
        };
        let json = serde_json::to_value(&param).unwrap();
        for field in [
            "url",
            "method",
            "uriParam",
            "header",
            "httpProxy",
            "socketProxy",
            "timeout",
            "variable",
            "callbackAddr",
            "contentType",
            "content",
            "respType",
        ] {
            assert!(json.get(field).is_some(), "missing wire field {field}");
        }
        assert_eq!(json["respType"], 3);
        let back: Param = serde_json::from_value(json).unwrap();
        assert_eq!(back, param);
    }

    #[test]
    fn resp_type_zero_reads_as_sync() {
        let param: Param = serde_json::from_str(r#"{"respType":0}"#).unwrap();
        assert_eq!(param.resp_type, RespType::Sync);
    }
}
