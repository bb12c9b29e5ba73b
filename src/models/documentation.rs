//! Generated documentation schema.

use serde::{Deserialize, Serialize};

use super::lenient;

/// A named, typed value: a function parameter or a class attribute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterDoc {
    #[serde(deserialize_with = "lenient::required_text")]
    pub name: String,
    #[serde(rename = "type", default, deserialize_with = "lenient::text")]
    pub type_name: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub description: String,
}

/// What a function hands back.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReturnDoc {
    #[serde(rename = "type", default, deserialize_with = "lenient::text")]
    pub type_name: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub description: String,
}

/// Documentation for one function or method.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionDoc {
    #[serde(deserialize_with = "lenient::required_text")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub description: String,
    #[serde(default, deserialize_with = "lenient::seq")]
    pub parameters: Vec<ParameterDoc>,
    #[serde(default, deserialize_with = "returns")]
    pub returns: ReturnDoc,
    #[serde(default, deserialize_with = "lenient::seq")]
    pub examples: Vec<String>,
}

/// Documentation for one class. Methods do not nest further.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassDoc {
    #[serde(deserialize_with = "lenient::required_text")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub description: String,
    #[serde(default, deserialize_with = "lenient::seq")]
    pub attributes: Vec<ParameterDoc>,
    #[serde(default, deserialize_with = "lenient::seq")]
    pub methods: Vec<FunctionDoc>,
}

/// Normalized outcome of a document request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentationResult {
    #[serde(default, deserialize_with = "lenient::text")]
    pub overview: String,
    #[serde(default, deserialize_with = "lenient::seq")]
    pub functions: Vec<FunctionDoc>,
    #[serde(default, deserialize_with = "lenient::seq")]
    pub classes: Vec<ClassDoc>,
    #[serde(default, deserialize_with = "lenient::seq")]
    pub usage_examples: Vec<String>,
}

impl DocumentationResult {
    /// Degraded result carrying the reason the backend reply was unusable.
    pub fn fallback(reason: &str) -> Self {
        Self {
            overview: format!("Error generating documentation: {reason}"),
            functions: Vec::new(),
            classes: Vec::new(),
            usage_examples: Vec::new(),
        }
    }
}

/// `returns` may be `null`, a bare type string, or the full object.
fn returns<'de, D>(deserializer: D) -> Result<ReturnDoc, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    match value {
        serde_json::Value::Null => Ok(ReturnDoc::default()),
        serde_json::Value::String(type_name) => Ok(ReturnDoc {
            type_name,
            description: String::new(),
        }),
        other => serde_json::from_value(other).map_err(serde::de::Error::custom),
    }
}
