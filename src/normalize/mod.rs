//! Backend reply normalization.
//!
//! Turns untrusted free text into a schema-conformant result. Parsing
//! failures never escape this module: [`normalize`] absorbs them into the
//! result kind's fallback value so the pipeline always yields a well-typed
//! result, with the failure reason visible in its summary/overview text.

pub mod fence;

use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::models::{DocumentationResult, ReviewResult};

use fence::Wrapping;

/// Maximum number of reply characters echoed into debug logs.
const LOG_PREVIEW_LEN: usize = 200;

/// Why a reply could not be parsed.
#[derive(Error, Debug)]
pub enum ParseFailure {
    #[error("the response was empty")]
    Empty,

    #[error("invalid JSON: {0}")]
    Syntax(#[source] serde_json::Error),

    #[error("expected a JSON object but found {0}")]
    NotAnObject(&'static str),

    #[error("JSON does not match the expected shape: {0}")]
    Shape(#[source] serde_json::Error),
}

/// A result kind the normalizer can produce.
pub trait Schema: DeserializeOwned {
    /// Short label used in logs.
    const NAME: &'static str;

    /// Value returned when the reply cannot be parsed.
    fn fallback(reason: &str) -> Self;
}

impl Schema for ReviewResult {
    const NAME: &'static str = "review";

    fn fallback(reason: &str) -> Self {
        ReviewResult::fallback(reason)
    }
}

impl Schema for DocumentationResult {
    const NAME: &'static str = "documentation";

    fn fallback(reason: &str) -> Self {
        DocumentationResult::fallback(reason)
    }
}

/// Strictly parse a reply into `T`, reporting why it failed.
pub fn parse<T: Schema>(raw: &str) -> Result<T, ParseFailure> {
    let trimmed = raw.trim();
    let (wrapping, body) = fence::unwrap(trimmed);
    if wrapping != Wrapping::None {
        tracing::debug!(schema = T::NAME, ?wrapping, "stripped code fence");
    }

    if body.is_empty() {
        return Err(ParseFailure::Empty);
    }

    let value: serde_json::Value = serde_json::from_str(body).map_err(ParseFailure::Syntax)?;
    if !value.is_object() {
        return Err(ParseFailure::NotAnObject(kind_of(&value)));
    }
    serde_json::from_value(value).map_err(ParseFailure::Shape)
}

/// Parse a reply into `T`, substituting the fallback on failure.
pub fn normalize<T: Schema>(raw: &str) -> T {
    match parse::<T>(raw) {
        Ok(result) => result,
        Err(failure) => {
            let preview: String = raw.chars().take(LOG_PREVIEW_LEN).collect();
            tracing::warn!(
                schema = T::NAME,
                reason = %failure,
                preview = %preview,
                "backend reply could not be parsed; using fallback result"
            );
            T::fallback(&failure.to_string())
        }
    }
}

/// Normalize a reply to an analyze request.
pub fn normalize_review(raw: &str) -> ReviewResult {
    normalize(raw)
}

/// Normalize a reply to a document request.
pub fn normalize_documentation(raw: &str) -> DocumentationResult {
    normalize(raw)
}

fn kind_of(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}
