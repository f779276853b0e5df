use std::collections::BTreeMap;

use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};
use crate::form_data::{FormDataKind, FormDataValue};

const CONTENT_TYPE_WWW_FORM: &str = "application/x-www-form-urlencoded";
const CONTENT_TYPE_FORM_DATA: &str = "multipart/form-data";
const CONTENT_TYPE_JSON: &str = "application/json";

/// A request body, keyed by its declared content type.
///
/// The wire format is a pair of sibling fields, `contentType` and `content`,
/// where the JSON shape of `content` depends on `contentType`. Shape checking
/// happens at deserialization; a mismatch is an error, never a coercion.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(try_from = "BodyContentWire", into = "BodyContentWire")]
pub enum BodyContent {
    /// No body.
    #[default]
    Empty,

    /// URL-encoded form fields. Encoded in key order, so output is deterministic.
    WwwForm(BTreeMap<String, String>),

    /// Multipart form fields.
    FormData(BTreeMap<String, FormDataValue>),

    /// Pre-serialized JSON text, passed through as-is. The Content-Type header
    /// is not stamped by the encoder; callers supply it via `header`.
    Json(String),

    /// Any other content type with a string payload, passed through as-is.
    Raw {
        /// The declared content type, kept only for re-serialization.
        content_type: String,
        /// The body text.
        text: String,
    },
}

/// Sibling-field wire form of [`BodyContent`].
#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub(crate) struct BodyContentWire {
    content_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    content: Option<Value>,
}

impl TryFrom<BodyContentWire> for BodyContent {
    type Error = Error;

    fn try_from(wire: BodyContentWire) -> Result<Self> {
        // An explicit JSON null reads the same as an absent field.
        let content = wire.content.filter(|value| !value.is_null());
        match wire.content_type.as_str() {
            CONTENT_TYPE_WWW_FORM => match content {
                Some(content) => serde_json::from_value(content)
                    .map(Self::WwwForm)
                    .map_err(|_| Error::ContentMismatch(wire.content_type)),
                None => Err(Error::ContentMismatch(wire.content_type)),
            },
            CONTENT_TYPE_FORM_DATA => match content {
                Some(content) => serde_json::from_value(content)
                    .map(Self::FormData)
                    .map_err(|_| Error::ContentMismatch(wire.content_type)),
                None => Err(Error::ContentMismatch(wire.content_type)),
            },
            CONTENT_TYPE_JSON => match content {
                Some(Value::String(text)) => Ok(Self::Json(text)),
                _ => Err(Error::ContentMismatch(wire.content_type)),
            },
            _ => match content {
                Some(Value::String(text)) => Ok(Self::Raw {
                    content_type: wire.content_type,
                    text,
                }),
                Some(_) => Err(Error::ContentMismatch(wire.content_type)),
                None => Ok(Self::Empty),
            },
        }
    }
}

impl From<BodyContent> for BodyContentWire {
    fn from(body: BodyContent) -> Self {
        match body {
            BodyContent::Empty => Self {
                content_type: String::new(),
                content: None,
            },
            BodyContent::WwwForm(fields) => Self {
                content_type: CONTENT_TYPE_WWW_FORM.to_string(),
                content: serde_json::to_value(fields).ok(),
            },
            BodyContent::FormData(fields) => Self {
                content_type: CONTENT_TYPE_FORM_DATA.to_string(),
                content: serde_json::to_value(fields).ok(),
            },
            BodyContent::Json(text) => Self {
                content_type: CONTENT_TYPE_JSON.to_string(),
                content: Some(Value::String(text)),
            },
            BodyContent::Raw { content_type, text } => Self {
                content_type,
                content: Some(Value::String(text)),
            },
        }
    }
}

impl BodyContent {
    /// Attaches this body to an outbound request.
    ///
    /// Form variants get their Content-Type header (with boundary, for
    /// multipart) from the encoding itself. `Json` and `Raw` attach bytes
    /// only. `File` fields are fetched with `client` one by one; the first
    /// failed fetch aborts the whole build and no partial body escapes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ContentMismatch`] for a file field without a
    /// filename, or [`Error::Transport`] when a file fetch fails.
    pub async fn apply(&self, client: &Client, builder: RequestBuilder) -> Result<RequestBuilder> {
        match self {
            Self::Empty => Ok(builder),
            Self::WwwForm(fields) => Ok(builder.form(fields)),
            Self::FormData(fields) => {
                let form = build_form(client, fields).await?;
                Ok(builder.multipart(form))
            }
            Self::Json(text) | Self::Raw { text, .. } => Ok(builder.body(text.clone())),
        }
    }
}

async fn build_form(client: &Client, fields: &BTreeMap<String, FormDataValue>) -> Result<Form> {
    let mut form = Form::new();
    for (name, field) in fields {
        form = match field.kind {
            FormDataKind::Str => form.text(name.clone(), field.value.clone()),
            FormDataKind::File => {
                if field.file_name.is_empty() {
                    return Err(Error::ContentMismatch(format!(
                        "file field {name} has no fileName"
                    )));
                }
                let bytes = client.get(&field.value).send().await?.bytes().await?;
                let part = Part::bytes(bytes.to_vec()).file_name(field.file_name.clone());
                form.part(name.clone(), part)
            }
        };
    }
    Ok(form)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> Result<BodyContent> {
        let wire: BodyContentWire = serde_json::from_str(json).unwrap();
        BodyContent::try_from(wire)
    }

    #[test]
    fn www_form_requires_string_map() {
        let body = parse(
            r#"{"contentType":"application/x-www-form-urlencoded","content":{"a":"1","b":"2"}}"#,
        )
        .unwrap();
        let BodyContent::WwwForm(fields) = body else {
            panic!("expected www form");
        };
        assert_eq!(fields["a"], "1");
        assert_eq!(fields["b"], "2");

        let err =
            parse(r#"{"contentType":"application/x-www-form-urlencoded","content":"a=1"}"#)
                .unwrap_err();
        assert!(matches!(err, Error::ContentMismatch(_)));
    }

    #[test]
    fn form_data_requires_field_map() {
        let body = parse(
            r#"{"contentType":"multipart/form-data","content":{"a":{"value":"1","type":1}}}"#,
        )
        .unwrap();
        let BodyContent::FormData(fields) = body else {
            panic!("expected form data");
        };
        assert_eq!(fields["a"].value, "1");
        assert_eq!(fields["a"].kind, FormDataKind::Str);

        let err = parse(r#"{"contentType":"multipart/form-data","content":{"a":"1"}}"#)
            .unwrap_err();
        assert!(matches!(err, Error::ContentMismatch(_)));
    }

    #[test]
    fn json_content_must_be_string() {
        let body =
            parse(r#"{"contentType":"application/json","content":"{\"A\":1}"}"#).unwrap();
        assert_eq!(body, BodyContent::Json("{\"A\":1}".to_string()));

        let err = parse(r#"{"contentType":"application/json","content":{"A":1}}"#).unwrap_err();
        assert!(matches!(err, Error::ContentMismatch(_)));
    }

    #[test]
    fn unknown_content_type_falls_back_to_raw() {
        let body = parse(r#"{"contentType":"text/csv","content":"a,b"}"#).unwrap();
        assert_eq!(
            body,
            BodyContent::Raw {
                content_type: "text/csv".to_string(),
                text: "a,b".to_string(),
            }
        );
    }

    #[test]
    fn missing_content_without_a_typed_content_type_is_empty() {
        assert_eq!(parse(r#"{"contentType":""}"#).unwrap(), BodyContent::Empty);
        assert_eq!(
            parse(r#"{"contentType":"","content":null}"#).unwrap(),
            BodyContent::Empty
        );
        assert_eq!(parse("{}").unwrap(), BodyContent::Empty);
    }

    #[test]
    fn typed_content_types_reject_missing_content() {
        for content_type in [
            "application/x-www-form-urlencoded",
            "multipart/form-data",
            "application/json",
        ] {
            for json in [
                format!(r#"{{"contentType":"{content_type}"}}"#),
                format!(r#"{{"contentType":"{content_type}","content":null}}"#),
            ] {
                let err = parse(&json).unwrap_err();
                assert!(
                    matches!(&err, Error::ContentMismatch(ct) if ct == content_type),
                    "expected content mismatch for {json}, got {err:?}"
                );
            }
        }
    }

    #[tokio::test]
    async fn www_form_body_is_deterministic_and_sorted() {
        let client = Client::new();
        let fields: BTreeMap<String, String> = [("b", "2"), ("a", "1")]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        let body = BodyContent::WwwForm(fields);
        for _ in 0..3 {
            let builder = client.post("http://localhost/ignored");
            let request = body
                .apply(&client, builder)
                .await
                .unwrap()
                .build()
                .unwrap();
            assert_eq!(
                request.body().unwrap().as_bytes().unwrap(),
                b"a=1&b=2".as_slice()
            );
            assert_eq!(
                request
                    .headers()
                    .get("content-type")
                    .unwrap()
                    .to_str()
                    .unwrap(),
                "application/x-www-form-urlencoded"
            );
        }
    }

    #[tokio::test]
    async fn json_body_passes_bytes_through_without_header() {
        let client = Client::new();
        let body = BodyContent::Json("{\"A\":1}".to_string());
        let builder = client.post("http://localhost/ignored");
        let request = body
            .apply(&client, builder)
            .await
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(
            request.body().unwrap().as_bytes().unwrap(),
            b"{\"A\":1}".as_slice()
        );
        assert!(request.headers().get("content-type").is_none());
    }

    #[tokio::test]
    async fn file_field_without_filename_is_rejected() {
        let client = Client::new();
        let fields: BTreeMap<String, FormDataValue> = [(
            "file".to_string(),
            FormDataValue {
                value: "http://localhost/blob".to_string(),
                kind: FormDataKind::File,
                file_name: String::new(),
            },
        )]
        .into();
        let err = BodyContent::FormData(fields)
            .apply(&client, client.post("http://localhost/ignored"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::ContentMismatch(_)));
    }
}
