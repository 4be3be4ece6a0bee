use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::lenient;

/// Declarative description of one upload target
///
/// Every field is optional in the document; missing strings deserialize as
/// empty and missing maps as empty. A value of the wrong type only empties
/// its own field. Interpretation (methods, request and response kinds)
/// happens later, when a request is built or a reply parsed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetConfig {
    #[serde(default, deserialize_with = "lenient::string")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub display_name: String,
    #[serde(default, deserialize_with = "lenient::section")]
    pub request: RequestSpec,
    #[serde(default, deserialize_with = "lenient::section")]
    pub response: ResponseSpec,
}

/// How to send a file
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestSpec {
    /// URL template, may contain `${ENV:NAME}` and `${FILENAME}`
    #[serde(default, deserialize_with = "lenient::string")]
    pub url: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub method: String,
    /// `raw` or `multipart`; empty means multipart
    #[serde(default, rename = "type", deserialize_with = "lenient::string")]
    pub kind: String,
    /// Header values are templates (`${ENV:NAME}` only)
    #[serde(default, deserialize_with = "lenient::string_map")]
    pub headers: BTreeMap<String, String>,
    /// Content-Type for raw uploads
    #[serde(default, deserialize_with = "lenient::string")]
    pub content_type: String,
    #[serde(default, deserialize_with = "lenient::section")]
    pub multipart: MultipartSpec,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MultipartSpec {
    #[serde(default, deserialize_with = "lenient::string")]
    pub file_field: String,
    /// Static form fields, sent verbatim
    #[serde(default, deserialize_with = "lenient::string_map")]
    pub fields: BTreeMap<String, String>,
}

/// How to find the uploaded URL in a reply
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ResponseSpec {
    /// `text_url`, `regex` or `json_pointer`
    #[serde(default, rename = "type", deserialize_with = "lenient::string")]
    pub kind: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub pattern: String,
    /// Capture group holding the URL; negative never matches
    #[serde(default = "default_group", deserialize_with = "lenient::group")]
    pub group: i64,
    #[serde(default, deserialize_with = "lenient::string")]
    pub pointer: String,
}

impl Default for ResponseSpec {
    fn default() -> Self {
        Self {
            kind: String::new(),
            pattern: String::new(),
            group: default_group(),
            pointer: String::new(),
        }
    }
}

fn default_group() -> i64 {
    lenient::DEFAULT_GROUP
}

impl TargetConfig {
    /// Parse a target document
    pub fn from_json(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }

    /// True when the document carried nothing at all (e.g. `{}`)
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Name shown to the user, falling back to the id when blank
    pub fn display_name(&self) -> &str {
        if self.display_name.trim().is_empty() {
            &self.id
        } else {
            &self.display_name
        }
    }
}
