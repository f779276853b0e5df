use serde::{Deserialize, Serialize};

/// Discriminator for one multipart form field.
///
/// Wire format is an integer: `1` for a plain string field, `2` for a file
/// field. `0` (the unset zero value in older payloads) is read as `Str`.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum FormDataKind {
    /// Plain string field.
    #[default]
    Str,

    /// File field; the value is a URL whose fetched bytes become the part content.
    File,
}

impl From<FormDataKind> for u8 {
    fn from(kind: FormDataKind) -> Self {
        match kind {
            FormDataKind::Str => 1,
            FormDataKind::File => 2,
        }
    }
}

impl TryFrom<u8> for FormDataKind {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 | 1 => Ok(Self::Str),
            2 => Ok(Self::File),
            other => Err(format!("unknown form data type: {other}")),
        }
    }
}

/// One multipart form field.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FormDataValue {
    /// Field value. For `File` fields this is the URL to fetch.
    pub value: String,

    /// Field discriminator.
    #[serde(rename = "type")]
    pub kind: FormDataKind,

    /// Multipart filename. Mandatory for `File` fields.
    pub file_name: String,
}
